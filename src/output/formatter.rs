//! Output formatters for directive results
//!
//! Provides JSON, table, and summary output formats.

use crate::models::{RunResult, RunSummary};

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    JsonPretty,
    Summary,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            "summary" => Some(OutputFormat::Summary),
            _ => None,
        }
    }
}

/// Result formatter
pub struct ResultFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    /// Format a single run result
    pub fn format_result(&self, index: usize, result: &RunResult) -> String {
        let status_str = match (self.colorize, result.ok) {
            (true, true) => "\x1b[32m✓ PASS\x1b[0m",
            (true, false) => "\x1b[31m✗ FAIL\x1b[0m",
            (false, true) => "✓ PASS",
            (false, false) => "✗ FAIL",
        };

        let last_line = result
            .stdout
            .iter()
            .rev()
            .find(|line| !line.trim().is_empty())
            .map(String::as_str)
            .unwrap_or("");

        format!("{:3}. {} {}", index + 1, status_str, last_line)
    }

    /// Format a directive summary with the results it was built from
    pub fn format_summary(&self, summary: &RunSummary, results: &[RunResult]) -> String {
        match self.format {
            OutputFormat::Table => self.format_summary_table(summary, results),
            OutputFormat::Json => serde_json::to_string(summary).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(summary).unwrap_or_default(),
            OutputFormat::Summary => self.format_summary_brief(summary),
        }
    }

    fn format_summary_table(&self, summary: &RunSummary, results: &[RunResult]) -> String {
        let mut output = String::new();

        // Header
        output.push_str("\n╔══════════════════════════════════════════════════════════════╗\n");
        output.push_str(&format!(
            "║  {:10} directive - {:4} item(s)                            ║\n",
            summary.strategy, summary.items
        ));
        output.push_str("╠══════════════════════════════════════════════════════════════╣\n");

        for (index, result) in results.iter().enumerate() {
            output.push_str(&format!("║  {}\n", self.format_result(index, result)));
        }

        // Footer
        output.push_str("╠══════════════════════════════════════════════════════════════╣\n");

        let pass_str = if self.colorize {
            format!("\x1b[32m{}\x1b[0m", summary.passed)
        } else {
            summary.passed.to_string()
        };
        let fail_str = if self.colorize && summary.failed > 0 {
            format!("\x1b[31m{}\x1b[0m", summary.failed)
        } else {
            summary.failed.to_string()
        };

        output.push_str(&format!(
            "║  Executed: {:3} | Pass: {} | Fail: {} | Skipped: {:3}\n",
            summary.executed,
            pass_str,
            fail_str,
            summary.skipped()
        ));
        output.push_str(&format!(
            "║  Pass Rate: {:5.1}% | Verdict: {}\n",
            summary.pass_rate(),
            self.verdict(summary.ok)
        ));
        output.push_str("╚══════════════════════════════════════════════════════════════╝\n");

        output
    }

    fn format_summary_brief(&self, summary: &RunSummary) -> String {
        format!(
            "{} directive: {}/{} passed, {} skipped - {}",
            summary.strategy,
            summary.passed,
            summary.executed,
            summary.skipped(),
            self.verdict(summary.ok)
        )
    }

    fn verdict(&self, ok: bool) -> String {
        match (self.colorize, ok) {
            (true, true) => "\x1b[32mOK\x1b[0m".to_string(),
            (true, false) => "\x1b[31mFAILED\x1b[0m".to_string(),
            (false, true) => "OK".to_string(),
            (false, false) => "FAILED".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (RunSummary, Vec<RunResult>) {
        let results = vec![
            RunResult::passed().with_stdout(["collected 3 items", "3 passed in 0.12s"]),
            RunResult::failed().with_stdout(["1 failed in 0.30s", ""]),
        ];
        (RunSummary::new("chain", 3, &results, false), results)
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("table"), Some(OutputFormat::Table));
        assert_eq!(OutputFormat::from_str("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("json-pretty"), Some(OutputFormat::JsonPretty));
        assert_eq!(OutputFormat::from_str("csv"), None);
    }

    #[test]
    fn test_format_result_uses_last_output_line() {
        let (_, results) = sample();
        let formatter = ResultFormatter::new(OutputFormat::Table).no_color();

        assert_eq!(formatter.format_result(0, &results[0]), "  1. ✓ PASS 3 passed in 0.12s");
        assert_eq!(formatter.format_result(1, &results[1]), "  2. ✗ FAIL 1 failed in 0.30s");
    }

    #[test]
    fn test_format_summary_brief() {
        let (summary, results) = sample();
        let formatter = ResultFormatter::new(OutputFormat::Summary).no_color();

        assert_eq!(
            formatter.format_summary(&summary, &results),
            "chain directive: 1/2 passed, 1 skipped - FAILED"
        );
    }

    #[test]
    fn test_format_summary_json() {
        let (summary, results) = sample();
        let formatter = ResultFormatter::new(OutputFormat::Json);

        let json = formatter.format_summary(&summary, &results);
        let parsed: RunSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, summary);
    }

    #[test]
    fn test_format_summary_table() {
        let (summary, results) = sample();
        let formatter = ResultFormatter::new(OutputFormat::Table).no_color();

        let table = formatter.format_summary(&summary, &results);
        assert!(table.contains("chain"));
        assert!(table.contains("Executed:   2 | Pass: 1 | Fail: 1 | Skipped:   1"));
        assert!(table.contains("Verdict: FAILED"));
    }
}
