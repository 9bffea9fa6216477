//! Drives one document through check, review and clear.
//!
//! A session is `Idle` until text is submitted, `Checking` while the service
//! call is outstanding and `Reviewing` once the issues are loaded. A new
//! submit supersedes any check still in flight: every check gets a sequence
//! number and only the response carrying the latest one is applied.

use crate::compose::{compose_with_report, Composition};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::service::{GrammarService, IssueRecord};
use crate::span::IssueSpan;
use crate::stats::Statistics;
use crate::store::SelectionStore;
use log::{debug, info, warn};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Checking,
    Reviewing,
}

/// Receives the view after every check and selection change.
pub trait RenderSink {
    fn render(&mut self, view: &ViewModel<'_>);

    fn cleared(&mut self) {}
}

pub trait ClipboardSink {
    fn copy(&mut self, text: &str) -> anyhow::Result<()>;
}

pub trait SpeechSink {
    fn start(&mut self, text: &str, rate: f32) -> anyhow::Result<()>;

    /// Stop playback. Does nothing when nothing is playing.
    fn stop(&mut self);

    /// Block until playback ends.
    fn finish(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Everything a front end needs to draw the review screen.
#[derive(Debug, Serialize)]
pub struct ViewModel<'a> {
    pub original: &'a str,
    pub issues: &'a [IssueSpan],
    pub corrected: &'a str,
    pub skipped: &'a [usize],
    pub stats: Statistics,
}

impl ViewModel<'_> {
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}

/// Handle for a check in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckTicket {
    seq: u64,
    text: String,
}

impl CheckTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub language: String,
    pub words_per_minute: usize,
    pub speech_rate: f32,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for SessionOptions {
    fn from(config: &Config) -> Self {
        Self {
            language: config.language.clone(),
            words_per_minute: config.words_per_minute,
            speech_rate: config.speech_rate,
        }
    }
}

struct Review {
    store: SelectionStore,
    composition: Composition,
    stats: Statistics,
}

pub struct Session {
    service: Box<dyn GrammarService>,
    options: SessionOptions,
    state: SessionState,
    seq: u64,
    review: Option<Review>,
    renderer: Option<Box<dyn RenderSink>>,
    clipboard: Option<Box<dyn ClipboardSink>>,
    speech: Option<Box<dyn SpeechSink>>,
}

impl Session {
    pub fn new(service: Box<dyn GrammarService>, options: SessionOptions) -> Self {
        Self {
            service,
            options,
            state: SessionState::Idle,
            seq: 0,
            review: None,
            renderer: None,
            clipboard: None,
            speech: None,
        }
    }

    pub fn with_renderer(mut self, renderer: Box<dyn RenderSink>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_clipboard(mut self, clipboard: Box<dyn ClipboardSink>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    pub fn with_speech(mut self, speech: Box<dyn SpeechSink>) -> Self {
        self.speech = Some(speech);
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Check `text` and load the issues, blocking on the service.
    pub fn submit(&mut self, text: &str) -> Result<()> {
        let ticket = self.begin_check(text)?;
        let result = self.run_check(&ticket);
        self.finish_check(ticket, result).map(|_| ())
    }

    /// Ask the service about `ticket`'s text. Touches no session state, so a
    /// front end can wrap it in progress output before calling `finish_check`.
    pub fn run_check(&self, ticket: &CheckTicket) -> Result<Vec<IssueRecord>> {
        self.service.check(ticket.text(), &self.options.language)
    }

    /// Start a check. Drops any previous review and supersedes any check in flight.
    pub fn begin_check(&mut self, text: &str) -> Result<CheckTicket> {
        if text.trim().is_empty() {
            return Err(Error::EmptyInput);
        }

        self.stop_speaking();
        self.review = None;
        self.seq += 1;
        self.state = SessionState::Checking;
        info!("Check #{} started ({} characters)", self.seq, text.chars().count());

        Ok(CheckTicket {
            seq: self.seq,
            text: text.to_string(),
        })
    }

    /// Apply the service's answer for `ticket`. Returns `Ok(false)` when the
    /// ticket was superseded and the answer was dropped.
    pub fn finish_check(
        &mut self,
        ticket: CheckTicket,
        result: Result<Vec<IssueRecord>>,
    ) -> Result<bool> {
        if ticket.seq != self.seq || self.state != SessionState::Checking {
            warn!(
                "Discarding stale response for check #{} (current #{})",
                ticket.seq, self.seq
            );
            return Ok(false);
        }

        let loaded =
            result.and_then(|records| SelectionStore::from_records(&ticket.text, &records));
        let store = match loaded {
            Ok(store) => store,
            Err(e) => {
                warn!("Check #{} failed: {}", ticket.seq, e);
                self.state = SessionState::Idle;
                return Err(match e {
                    Error::ServiceUnavailable(_) => e,
                    other => Error::service(other.to_string()),
                });
            }
        };

        info!("Check #{} found {} issues", ticket.seq, store.len());
        let stats = self.statistics_for(store.original_text());
        let composition = compose_with_report(store.original_text(), store.all());
        self.review = Some(Review {
            store,
            composition,
            stats,
        });
        self.state = SessionState::Reviewing;
        self.render();
        Ok(true)
    }

    /// Choose the replacement for issue `index`, `None` to keep the original text.
    pub fn select(&mut self, index: usize, value: Option<&str>) -> Result<()> {
        let review = self
            .review
            .as_mut()
            .ok_or(Error::IndexOutOfRange { index, len: 0 })?;
        review.store.select(index, value)?;
        review.recompose();
        self.render();
        Ok(())
    }

    pub fn reject(&mut self, index: usize) -> Result<()> {
        self.select(index, None)
    }

    /// Take the first suggestion for every issue.
    pub fn accept_all(&mut self) {
        if let Some(review) = self.review.as_mut() {
            review.store.reset_all();
            review.recompose();
            self.render();
        }
    }

    pub fn clear(&mut self) {
        self.stop_speaking();
        self.review = None;
        self.state = SessionState::Idle;
        debug!("Session cleared");
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.cleared();
        }
    }

    pub fn store(&self) -> Option<&SelectionStore> {
        self.review.as_ref().map(|r| &r.store)
    }

    pub fn spans(&self) -> &[IssueSpan] {
        self.review.as_ref().map(|r| r.store.all()).unwrap_or(&[])
    }

    pub fn corrected_text(&self) -> Option<&str> {
        self.review.as_ref().map(|r| r.composition.text.as_str())
    }

    /// Statistics of the submitted text, not of the corrected one.
    pub fn statistics(&self) -> Option<Statistics> {
        self.review.as_ref().map(|r| r.stats)
    }

    pub fn statistics_for(&self, text: &str) -> Statistics {
        Statistics::compute_with_wpm(text, self.options.words_per_minute)
    }

    pub fn view(&self) -> Option<ViewModel<'_>> {
        self.review.as_ref().map(Review::view)
    }

    pub fn copy(&mut self) -> anyhow::Result<()> {
        let text = self
            .corrected_text()
            .ok_or_else(|| anyhow::anyhow!("No corrected text to copy"))?
            .to_string();
        let clipboard = self
            .clipboard
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("No clipboard configured"))?;
        clipboard.copy(&text)
    }

    /// Read the corrected text aloud, restarting if already speaking.
    pub fn speak(&mut self) -> anyhow::Result<()> {
        let text = self
            .corrected_text()
            .ok_or_else(|| anyhow::anyhow!("No corrected text to speak"))?
            .to_string();
        let rate = self.options.speech_rate;
        let speech = self
            .speech
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("No speech command configured"))?;
        speech.stop();
        speech.start(&text, rate)
    }

    /// Wait for the current utterance, if any, to end.
    pub fn finish_speaking(&mut self) -> anyhow::Result<()> {
        match self.speech.as_mut() {
            Some(speech) => speech.finish(),
            None => Ok(()),
        }
    }

    pub fn stop_speaking(&mut self) {
        if let Some(speech) = self.speech.as_mut() {
            speech.stop();
        }
    }

    fn render(&mut self) {
        if let (Some(renderer), Some(review)) = (self.renderer.as_mut(), self.review.as_ref()) {
            renderer.render(&review.view());
        }
    }
}

impl Review {
    fn recompose(&mut self) {
        self.composition = compose_with_report(self.store.original_text(), self.store.all());
    }

    fn view(&self) -> ViewModel<'_> {
        ViewModel {
            original: self.store.original_text(),
            issues: self.store.all(),
            corrected: &self.composition.text,
            skipped: &self.composition.skipped,
            stats: self.stats,
        }
    }
}
