//! Directive plan files
//!
//! A plan describes a tree of directives in YAML or JSON. Leaves are target
//! strings handed to a resolver; mappings are nested directives.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::is_yaml_file;
use crate::error::DirectiveError;
use crate::executor::{Directive, Item, StrategyKind, TargetResolver};

/// One directive in a plan
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanNode {
    pub strategy: StrategyKind,

    /// Initial run arguments
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    /// Chunk count, only used by parallel nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunks: Option<usize>,

    #[serde(default)]
    pub items: Vec<PlanItem>,
}

/// A plan member: a target or a nested directive
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlanItem {
    Target(String),
    Directive(PlanNode),
}

impl PlanNode {
    /// Load a plan from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read plan file: {}", path.display()))?;

        if is_yaml_file(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML plan: {}", path.display()))
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON plan: {}", path.display()))
        }
    }

    /// Plan with a single flat directive over `targets`
    pub fn flat(strategy: StrategyKind, targets: impl IntoIterator<Item = String>) -> Self {
        Self {
            strategy,
            args: Vec::new(),
            chunks: None,
            items: targets.into_iter().map(PlanItem::Target).collect(),
        }
    }

    /// Number of targets in the whole tree
    pub fn target_count(&self) -> usize {
        self.items
            .iter()
            .map(|item| match item {
                PlanItem::Target(_) => 1,
                PlanItem::Directive(node) => node.target_count(),
            })
            .sum()
    }

    /// Build the directive tree, resolving every target up front
    pub fn build<R>(&self, resolver: &R, default_chunks: usize) -> Result<Directive, DirectiveError>
    where
        R: TargetResolver<Target = String> + ?Sized,
    {
        let items = self
            .items
            .iter()
            .map(|item| match item {
                PlanItem::Target(target) => Ok(Item::target(target.clone())),
                PlanItem::Directive(node) => node.build(resolver, default_chunks).map(Item::from),
            })
            .collect::<Result<Vec<_>, DirectiveError>>()?;

        let strategy = self.strategy.build(self.chunks.unwrap_or(default_chunks));
        Ok(Directive::new(items, strategy, resolver)?.with_run_args(self.args.clone()))
    }
}
