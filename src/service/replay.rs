use crate::error::{Error, Result};
use crate::service::{CheckResponse, GrammarService, IssueRecord};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Answers every check with a response previously saved to disk.
pub struct ReplayService {
    path: PathBuf,
}

impl ReplayService {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl GrammarService for ReplayService {
    fn check(&self, _text: &str, language: &str) -> Result<Vec<IssueRecord>> {
        info!("Replaying {} response from {}", language, self.path.display());

        let body = fs::read_to_string(&self.path).map_err(|e| {
            Error::service(format!("failed to read {}: {}", self.path.display(), e))
        })?;

        Ok(CheckResponse::parse(&body)?.matches)
    }
}
