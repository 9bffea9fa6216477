//! Builds the corrected document from the original text and current selections.
//!
//! Spans whose chosen value is "no replacement" are ignored. The rest are
//! applied in descending offset order (ties broken by issue index); a span
//! that intersects text already rewritten by a previously applied span is
//! skipped for this composition. Its selection in the store is untouched.

use crate::span::{byte_offset, IssueSpan};
use log::{debug, warn};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Composition {
    pub text: String,
    /// Indices of spans whose replacement was applied, in application order.
    pub applied: Vec<usize>,
    /// Indices of consuming spans dropped by the overlap rule.
    pub skipped: Vec<usize>,
}

/// Corrected text for `original` under the selections in `spans`.
pub fn compose(original: &str, spans: &[IssueSpan]) -> String {
    compose_with_report(original, spans).text
}

pub fn compose_with_report(original: &str, spans: &[IssueSpan]) -> Composition {
    let mut consuming: Vec<&IssueSpan> = spans.iter().filter(|s| s.is_consuming()).collect();
    consuming.sort_by(|a, b| b.offset().cmp(&a.offset()).then(a.index().cmp(&b.index())));

    let mut text = original.to_string();
    let mut applied = Vec::new();
    let mut skipped = Vec::new();
    // Lowest offset rewritten so far. Every later span starts at or below it,
    // so it intersects rewritten text exactly when it ends past this point.
    let mut floor = usize::MAX;

    for span in consuming {
        if span.end() > floor {
            warn!(
                "Skipping issue {} ({}..{}): overlaps an applied correction",
                span.index(),
                span.offset(),
                span.end()
            );
            skipped.push(span.index());
            continue;
        }

        // Only text above `floor` has changed, so offsets into the
        // original are still valid here.
        let start = byte_offset(original, span.offset());
        let end = byte_offset(original, span.end());
        text.replace_range(start..end, span.chosen().unwrap_or_default());

        floor = span.offset();
        applied.push(span.index());
    }

    debug!(
        "Composed {} corrections ({} skipped)",
        applied.len(),
        skipped.len()
    );

    Composition {
        text,
        applied,
        skipped,
    }
}
