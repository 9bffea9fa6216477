pub mod languagetool;
pub mod replay;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

pub use languagetool::LanguageToolClient;
pub use replay::ReplayService;

/// Something that can find issues in a piece of text.
pub trait GrammarService {
    fn check(&self, text: &str, language: &str) -> Result<Vec<IssueRecord>>;
}

/// Body returned by a check request. Only `matches` is consumed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckResponse {
    pub matches: Vec<IssueRecord>,
}

impl CheckResponse {
    pub fn parse(body: &str) -> Result<Self> {
        serde_json::from_str(body)
            .map_err(|e| Error::service(format!("malformed response body: {}", e)))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRecord {
    pub offset: usize,
    pub length: usize,
    pub message: String,
    #[serde(default)]
    pub short_message: Option<String>,
    #[serde(default)]
    pub replacements: Vec<Replacement>,
    #[serde(default)]
    pub context: IssueContext,
    #[serde(default)]
    pub rule: Rule,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Replacement {
    pub value: String,
}

/// Display excerpt around the issue. `offset`/`length` are relative to `text`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueContext {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub length: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub issue_type: String,
    #[serde(default)]
    pub category: Option<RuleCategory>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleCategory {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}
