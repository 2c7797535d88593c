use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::defs::ResponseEnvelope;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum SourcePhase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Last-known state of one source.
///
/// Transitions:
/// - any phase --request--> `Loading` (error cleared, data kept)
/// - `Loading` --success--> `Loaded` (data replaced)
/// - `Loading` --failure--> `Failed` (error set, data kept)
///
/// Clearing back to `Idle` is done by dropping the state altogether.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SourceState {
    phase: SourcePhase,
    data: Option<ResponseEnvelope>,
    is_loading: bool,
    error_message: Option<String>,
    updated_at: Option<DateTime<Utc>>,
}

impl SourceState {
    pub fn phase(&self) -> SourcePhase {
        self.phase
    }

    pub fn data(&self) -> Option<&ResponseEnvelope> {
        self.data.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// When the last fetch for this source settled.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn begin_request(&mut self) {
        self.phase = SourcePhase::Loading;
        self.is_loading = true;
        self.error_message = None;
    }

    pub fn complete(&mut self, envelope: ResponseEnvelope) {
        self.phase = SourcePhase::Loaded;
        self.data = Some(envelope);
        self.is_loading = false;
        self.error_message = None;
        self.updated_at = Some(Utc::now());
    }

    /// Record a failure. Previously loaded data stays visible.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.phase = SourcePhase::Failed;
        self.is_loading = false;
        self.error_message = Some(message.into());
        self.updated_at = Some(Utc::now());
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
        if self.phase == SourcePhase::Failed {
            self.phase = if self.data.is_some() {
                SourcePhase::Loaded
            } else {
                SourcePhase::Idle
            };
        }
    }
}

/// Store-wide flags for the batch call currently in flight (if any).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchStatus {
    pub loading: bool,
    pub error: Option<String>,
}
