use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Nothing to check: the submitted text is empty or whitespace only.
    #[error("Please enter some text to check")]
    EmptyInput,

    /// Transport failure, non-2xx status or a malformed response body.
    #[error("Grammar service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("'{value}' is not a candidate for issue {index}")]
    InvalidSelection { index: usize, value: String },

    #[error("Issue index {index} out of range (have {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

impl Error {
    pub fn service(reason: impl Into<String>) -> Self {
        Error::ServiceUnavailable(reason.into())
    }

    /// Errors the user can fix by changing input or retrying.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::EmptyInput | Error::ServiceUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_errors() {
        assert!(Error::EmptyInput.is_recoverable());
        assert!(Error::service("timeout").is_recoverable());
        assert!(!Error::IndexOutOfRange { index: 3, len: 1 }.is_recoverable());
    }

    #[test]
    fn test_error_messages() {
        let err = Error::InvalidSelection {
            index: 2,
            value: "teh".to_string(),
        };
        assert_eq!(err.to_string(), "'teh' is not a candidate for issue 2");
    }
}
