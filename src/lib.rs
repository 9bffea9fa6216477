pub mod cli;
pub mod compose;
pub mod config;
pub mod error;
pub mod service;
pub mod session;
pub mod sinks;
pub mod span;
pub mod stats;
pub mod store;

pub use compose::{compose, compose_with_report, Composition};
pub use config::Config;
pub use error::{Error, Result};
pub use session::{Session, SessionOptions, SessionState, ViewModel};
pub use span::{Category, IssueSpan};
pub use stats::Statistics;
pub use store::SelectionStore;
