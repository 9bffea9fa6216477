use crate::error::{Error, Result};
use crate::service::IssueRecord;
use crate::span::IssueSpan;
use log::debug;

/// The spans of one checked document, in the order the service returned them.
#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    original: String,
    spans: Vec<IssueSpan>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a fresh service response.
    pub fn from_records(original: &str, records: &[IssueRecord]) -> Result<Self> {
        let mut store = Self::new();
        store.initialize(original, records)?;
        Ok(store)
    }

    /// Replace all state with one span per record. On error the previous
    /// state is kept as is.
    pub fn initialize(&mut self, original: &str, records: &[IssueRecord]) -> Result<()> {
        let text_len = original.chars().count();
        let spans = records
            .iter()
            .enumerate()
            .map(|(index, record)| IssueSpan::from_record(index, record, text_len))
            .collect::<Result<Vec<_>>>()?;

        debug!("Selection store initialised with {} spans", spans.len());
        self.original = original.to_string();
        self.spans = spans;
        Ok(())
    }

    pub fn get(&self, index: usize) -> Result<&IssueSpan> {
        self.spans.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.spans.len(),
        })
    }

    /// Set the chosen replacement of span `index`; `None` keeps the original text.
    pub fn select(&mut self, index: usize, value: Option<&str>) -> Result<()> {
        let len = self.spans.len();
        let span = self
            .spans
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;
        span.set_chosen(value)?;
        debug!("Issue {} now {:?}", index, span.chosen());
        Ok(())
    }

    /// Return every span to its first candidate.
    pub fn reset_all(&mut self) {
        for span in &mut self.spans {
            span.reset();
        }
    }

    pub fn all(&self) -> &[IssueSpan] {
        &self.spans
    }

    pub fn original_text(&self) -> &str {
        &self.original
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::fixtures::record;

    fn store() -> SelectionStore {
        SelectionStore::from_records(
            "Thsi are a test",
            &[
                record(0, 4, "misspelling", &["This", "Thus"]),
                record(5, 3, "grammar", &["is"]),
                record(9, 1, "style", &[]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_initialize_preserves_order_and_defaults() {
        let store = store();
        assert_eq!(store.len(), 3);
        assert_eq!(store.original_text(), "Thsi are a test");

        let offsets: Vec<_> = store.all().iter().map(|s| s.offset()).collect();
        assert_eq!(offsets, vec![0, 5, 9]);
        assert_eq!(store.get(0).unwrap().chosen(), Some("This"));
        assert_eq!(store.get(2).unwrap().chosen(), None);
    }

    #[test]
    fn test_select_round_trip() {
        let mut store = store();
        store.select(0, Some("Thus")).unwrap();
        assert_eq!(store.get(0).unwrap().chosen(), Some("Thus"));

        store.select(1, None).unwrap();
        assert_eq!(store.get(1).unwrap().chosen(), None);

        store.reset_all();
        assert_eq!(store.get(0).unwrap().chosen(), Some("This"));
        assert_eq!(store.get(1).unwrap().chosen(), Some("is"));
    }

    #[test]
    fn test_select_invalid_value() {
        let mut store = store();
        let err = store.select(0, Some("not a candidate")).unwrap_err();
        assert!(matches!(err, Error::InvalidSelection { index: 0, .. }));
        assert_eq!(store.get(0).unwrap().chosen(), Some("This"));
    }

    #[test]
    fn test_index_out_of_range() {
        let mut store = store();
        assert_eq!(
            store.get(3).unwrap_err(),
            Error::IndexOutOfRange { index: 3, len: 3 }
        );
        assert!(matches!(
            store.select(7, None),
            Err(Error::IndexOutOfRange { index: 7, len: 3 })
        ));
    }

    #[test]
    fn test_failed_initialize_keeps_previous_state() {
        let mut store = store();
        let err = store
            .initialize("short", &[record(2, 10, "grammar", &["x"])])
            .unwrap_err();
        assert!(matches!(err, Error::ServiceUnavailable(_)));
        assert_eq!(store.len(), 3);
        assert_eq!(store.original_text(), "Thsi are a test");
    }

    #[test]
    fn test_overflowing_offset_in_response_is_rejected() {
        let body = r#"{"matches": [{"message": "m", "offset": 18446744073709551615, "length": 2,
            "replacements": [{"value": "x"}], "rule": {"issueType": "grammar"}}]}"#;
        let records = crate::service::CheckResponse::parse(body).unwrap().matches;

        let err = SelectionStore::from_records("Hello there", &records).unwrap_err();
        assert!(matches!(err, Error::ServiceUnavailable(_)));
    }

    #[test]
    fn test_reinitialize_discards_spans() {
        let mut store = store();
        store.initialize("Fine text.", &[]).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.original_text(), "Fine text.");
    }
}
