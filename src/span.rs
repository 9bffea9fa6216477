use crate::error::{Error, Result};
use crate::service::IssueRecord;
use serde::Serialize;
use std::fmt;
use std::ops::Range;
use unicode_segmentation::UnicodeSegmentation;

/// Kind of problem an issue reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Spelling,
    Grammar,
    Style,
}

impl Category {
    /// Map a service `issueType` key. Unknown keys fall back to `Grammar`.
    pub fn from_issue_type(issue_type: &str) -> Self {
        match issue_type {
            "misspelling" | "typographical" => Category::Spelling,
            "style" => Category::Style,
            // "grammar", "uncategorized" and anything the service adds later
            _ => Category::Grammar,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Spelling => "spelling",
            Category::Grammar => "grammar",
            Category::Style => "style",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One issue anchored to `[offset, offset + length)` of the original text,
/// counted in characters. Only `chosen` changes after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueSpan {
    index: usize,
    offset: usize,
    length: usize,
    category: Category,
    rule_id: String,
    message: String,
    context: String,
    candidates: Vec<String>,
    /// `None` means "no replacement", distinct from `Some("")` (deletion).
    chosen: Option<String>,
}

impl IssueSpan {
    pub fn new(index: usize, offset: usize, length: usize, candidates: Vec<String>) -> Self {
        let chosen = candidates.first().cloned();
        Self {
            index,
            offset,
            length,
            category: Category::Grammar,
            rule_id: String::new(),
            message: String::new(),
            context: String::new(),
            candidates,
            chosen,
        }
    }

    /// Build the span for the `index`-th record of a response over a text of
    /// `text_len` characters. Records pointing outside the text are rejected.
    pub fn from_record(index: usize, record: &IssueRecord, text_len: usize) -> Result<Self> {
        let in_bounds = record
            .offset
            .checked_add(record.length)
            .is_some_and(|end| end <= text_len);
        if record.length == 0 || !in_bounds {
            return Err(Error::service(format!(
                "issue {} at offset {} with length {} is outside text of {} characters",
                index, record.offset, record.length, text_len
            )));
        }

        let candidates = record
            .replacements
            .iter()
            .map(|r| r.value.clone())
            .collect();

        Ok(Self::new(index, record.offset, record.length, candidates)
            .with_category(Category::from_issue_type(&record.rule.issue_type))
            .with_message(record.message.clone())
            .with_rule_id(record.rule.id.clone())
            .with_context(record.context.text.clone()))
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_rule_id(mut self, rule_id: impl Into<String>) -> Self {
        self.rule_id = rule_id.into();
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    pub fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn rule_id(&self) -> &str {
        &self.rule_id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn chosen(&self) -> Option<&str> {
        self.chosen.as_deref()
    }

    /// Whether composing this span rewrites its region.
    pub fn is_consuming(&self) -> bool {
        self.chosen.is_some()
    }

    pub fn overlaps(&self, other: &IssueSpan) -> bool {
        self.offset < other.end() && other.offset < self.end()
    }

    /// Select a candidate, or `None` for "no replacement".
    /// Fails without touching the span when `value` is not a candidate.
    pub fn set_chosen(&mut self, value: Option<&str>) -> Result<()> {
        match value {
            None => self.chosen = None,
            Some(v) if self.candidates.iter().any(|c| c == v) => {
                self.chosen = Some(v.to_string());
            }
            Some(v) => {
                return Err(Error::InvalidSelection {
                    index: self.index,
                    value: v.to_string(),
                })
            }
        }
        Ok(())
    }

    /// Back to the service's first suggestion, or "no replacement" if it had none.
    pub fn reset(&mut self) {
        self.chosen = self.candidates.first().cloned();
    }

    /// The flagged slice of `original`.
    pub fn excerpt<'a>(&self, original: &'a str) -> &'a str {
        let start = byte_offset(original, self.offset);
        let end = byte_offset(original, self.end());
        &original[start..end]
    }

    /// A window of roughly `radius` characters either side of the issue,
    /// cut on grapheme boundaries, with ellipses where text was dropped.
    pub fn snippet(&self, original: &str, radius: usize) -> String {
        let from = byte_offset(original, self.offset.saturating_sub(radius));
        let to = byte_offset(original, self.end() + radius);

        let mut start = 0;
        let mut end = original.len();
        for (pos, grapheme) in original.grapheme_indices(true) {
            if pos <= from {
                start = pos;
            }
            if pos + grapheme.len() >= to {
                end = pos + grapheme.len();
                break;
            }
        }

        let window = &original[start..end];
        match (start > 0, end < original.len()) {
            (true, true) => format!("...{}...", window),
            (true, false) => format!("...{}", window),
            (false, true) => format!("{}...", window),
            (false, false) => window.to_string(),
        }
    }
}

/// Byte position of the `chars`-th character, clamped to the end of `text`.
pub(crate) fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(pos, _)| pos)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::fixtures::record;

    fn span(candidates: &[&str]) -> IssueSpan {
        IssueSpan::new(0, 2, 3, candidates.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_category_mapping() {
        assert_eq!(Category::from_issue_type("misspelling"), Category::Spelling);
        assert_eq!(Category::from_issue_type("typographical"), Category::Spelling);
        assert_eq!(Category::from_issue_type("grammar"), Category::Grammar);
        assert_eq!(Category::from_issue_type("style"), Category::Style);
        assert_eq!(Category::from_issue_type("uncategorized"), Category::Grammar);
        assert_eq!(Category::from_issue_type("locale-violation"), Category::Grammar);
        assert_eq!(Category::from_issue_type(""), Category::Grammar);
    }

    #[test]
    fn test_default_selection() {
        assert_eq!(span(&["their", "there"]).chosen(), Some("their"));
        assert_eq!(span(&[]).chosen(), None);
        assert!(!span(&[]).is_consuming());
    }

    #[test]
    fn test_set_chosen() {
        let mut s = span(&["their", "there", ""]);
        s.set_chosen(Some("there")).unwrap();
        assert_eq!(s.chosen(), Some("there"));

        s.set_chosen(Some("")).unwrap();
        assert_eq!(s.chosen(), Some(""));
        assert!(s.is_consuming());

        s.set_chosen(None).unwrap();
        assert_eq!(s.chosen(), None);

        s.reset();
        assert_eq!(s.chosen(), Some("their"));
    }

    #[test]
    fn test_invalid_selection_leaves_span_unchanged() {
        let mut s = span(&["their", "there"]);
        let err = s.set_chosen(Some("they're")).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidSelection {
                index: 0,
                value: "they're".to_string()
            }
        );
        assert_eq!(s.chosen(), Some("their"));
    }

    #[test]
    fn test_from_record() {
        let s = IssueSpan::from_record(4, &record(0, 4, "misspelling", &["This"]), 15).unwrap();
        assert_eq!(s.index(), 4);
        assert_eq!(s.range(), 0..4);
        assert_eq!(s.category(), Category::Spelling);
        assert_eq!(s.chosen(), Some("This"));
        assert_eq!(s.rule_id(), "TEST_RULE");
    }

    #[test]
    fn test_from_record_rejects_out_of_bounds() {
        assert!(IssueSpan::from_record(0, &record(10, 6, "grammar", &[]), 15).is_err());
        assert!(IssueSpan::from_record(0, &record(3, 0, "grammar", &[]), 15).is_err());
        assert!(IssueSpan::from_record(0, &record(10, 5, "grammar", &[]), 15).is_ok());
    }

    #[test]
    fn test_from_record_rejects_overflowing_offset() {
        let err = IssueSpan::from_record(0, &record(usize::MAX, 2, "grammar", &["x"]), 11)
            .unwrap_err();
        assert!(matches!(err, Error::ServiceUnavailable(_)));

        let err = IssueSpan::from_record(0, &record(3, usize::MAX, "grammar", &["x"]), 11)
            .unwrap_err();
        assert!(matches!(err, Error::ServiceUnavailable(_)));
    }

    #[test]
    fn test_overlaps() {
        let a = IssueSpan::new(0, 0, 4, vec![]);
        let b = IssueSpan::new(1, 2, 3, vec![]);
        let c = IssueSpan::new(2, 4, 1, vec![]);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&c));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_excerpt_counts_characters() {
        let text = "Café naïve test";
        let s = IssueSpan::new(0, 5, 5, vec![]);
        assert_eq!(s.excerpt(text), "naïve");
    }

    #[test]
    fn test_snippet() {
        let text = "The quick brown fox jumps over the lazy dog";
        let s = IssueSpan::new(0, 16, 3, vec![]);
        assert_eq!(s.snippet(text, 4), "...own fox jum...");
        assert_eq!(s.snippet(text, 100), text);
    }
}
