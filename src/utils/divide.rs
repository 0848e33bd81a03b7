//! List partitioning
//!
//! Splits an ordered collection into a fixed number of near-equal,
//! contiguous chunks.

use crate::error::DirectiveError;

/// Divide `items` into exactly `count_parts` contiguous chunks.
///
/// The first `len % count_parts` chunks hold one extra element. When there
/// are more parts than items the trailing chunks are empty. Lazy iterators
/// are consumed once, in order.
pub fn divide<I>(count_parts: usize, items: I) -> Result<Vec<Vec<I::Item>>, DirectiveError>
where
    I: IntoIterator,
{
    if count_parts < 1 {
        return Err(DirectiveError::invalid_argument(
            "'count_parts' must be at least 1",
        ));
    }

    let items: Vec<I::Item> = items.into_iter().collect();
    let base = items.len() / count_parts;
    let remainder = items.len() % count_parts;

    let mut iter = items.into_iter();
    let chunks = (0..count_parts)
        .map(|index| {
            let size = if index < remainder { base + 1 } else { base };
            iter.by_ref().take(size).collect()
        })
        .collect();

    Ok(chunks)
}

/// Divide a collection that may be absent.
///
/// An absent collection is not iterable and fails with `TypeMismatch`.
pub fn divide_optional<I>(
    count_parts: usize,
    items: Option<I>,
) -> Result<Vec<Vec<I::Item>>, DirectiveError>
where
    I: IntoIterator,
{
    match items {
        Some(items) => divide(count_parts, items),
        None => Err(DirectiveError::type_mismatch("iterable", "none")),
    }
}
