//! Budget-aware truncation of rendered queries.
//!
//! When a query renders longer than the budget, large subtrees (target
//! lists, WHERE clauses, CTE bodies, column lists) are swapped for the
//! [`Node::Truncated`] marker one at a time, deepest and longest first, on a
//! copy of the tree. The first rendering that fits is returned. If none does,
//! the original text is cut hard and suffixed with `...`.

mod candidates;

pub use candidates::{PossibleTruncation, TruncationKind, possible_truncations};
use candidates::char_len;
use log::debug;

use crate::{deparse::Deparse, error::AppResult, node::Node};

/// Suffix appended by the hard cut
pub const ELLIPSIS: &str = "...";

/// Candidates measuring less than this are not worth replacing
const MIN_TRUNCATION_LENGTH: usize = 3;

/// Render `statements` in at most `max_length` characters
///
/// The caller's tree is never modified. The result fits the budget whenever
/// `max_length >= 3`; smaller budgets still return `...`.
///
/// # Errors
///
/// Propagates any deparser failure, and fails if a candidate path no longer
/// fits the working copy.
pub fn truncate<D>(statements: &[Node], max_length: usize, deparser: &D) -> AppResult<String>
where
    D: Deparse + ?Sized
{
    let output = deparser.deparse(statements)?;
    if char_len(&output) <= max_length {
        return Ok(output);
    }

    let mut truncations = possible_truncations(statements, deparser)?;
    // Deepest first, then longest
    truncations.sort_by(|a, b| {
        b.location
            .len()
            .cmp(&a.location.len())
            .then(b.length.cmp(&a.length))
    });
    debug!(
        "{} possible truncations for {} character budget",
        truncations.len(),
        max_length
    );

    let mut tree = statements.to_vec();
    for truncation in &truncations {
        if truncation.length < MIN_TRUNCATION_LENGTH {
            continue;
        }
        truncation
            .location
            .replace(&mut tree, truncation.replacement())?;
        let candidate = deparser.deparse(&tree)?;
        if char_len(&candidate) <= max_length {
            debug!(
                "{:?} at {} brought query within budget",
                truncation.kind, truncation.location
            );
            return Ok(candidate);
        }
    }

    debug!("no structural truncation fits, cutting hard");
    Ok(hard_cut(&output, max_length))
}

/// First `max_length - 3` characters of `output` followed by [`ELLIPSIS`]
pub fn hard_cut(output: &str, max_length: usize) -> String {
    let keep = max_length.saturating_sub(ELLIPSIS.len());
    let mut cut: String = output.chars().take(keep).collect();
    cut.push_str(ELLIPSIS);
    cut
}
