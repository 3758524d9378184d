//! Feature panels: Upload, Builder, Analyzer, Job Recommendations.
//!
//! Every panel has the same shape:
//! - a pure `precondition()` over its draft, deciding whether submit is enabled
//! - one [`RequestSlot`] per network action, holding pending/result/error
//! - a draft that lives exactly as long as the panel value does
//!
//! Panels get the backend and the session through a borrowed
//! [`PanelContext`]; they never own either.

use tracing::warn;

use crate::config::AuthPolicy;
use crate::errors::{ClientError, Result, CONNECT_FAILED};
use crate::models::profile::ProfileResumeStatus;
use crate::session::SessionStore;
use crate::state::AppState;

pub mod analyzer;
pub mod builder;
pub mod dialog;
pub mod files;
pub mod jobs;
pub mod upload;

/// Shortest job description any panel accepts, in characters.
pub const MIN_JOB_DESCRIPTION_LEN: usize = 50;

// ────────────────────────────────────────────────────────────────────────────
// Preconditions
// ────────────────────────────────────────────────────────────────────────────

/// Outcome of a panel's input check. Submit is enabled only on `Pass`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precondition {
    Pass,
    Fail(String),
}

impl Precondition {
    pub fn fail(reason: impl Into<String>) -> Self {
        Precondition::Fail(reason.into())
    }

    pub fn passed(&self) -> bool {
        matches!(self, Precondition::Pass)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Precondition::Pass => None,
            Precondition::Fail(reason) => Some(reason),
        }
    }

    pub fn into_result(self) -> Result<()> {
        match self {
            Precondition::Pass => Ok(()),
            Precondition::Fail(reason) => Err(ClientError::Validation(reason)),
        }
    }
}

/// Character count, not byte length, so non-ASCII descriptions are not
/// measured as longer than they read.
pub fn job_description_long_enough(text: &str) -> bool {
    text.chars().count() >= MIN_JOB_DESCRIPTION_LEN
}

// ────────────────────────────────────────────────────────────────────────────
// Request slots
// ────────────────────────────────────────────────────────────────────────────

/// State of one network action. Result and error are mutually exclusive by
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Idle,
    Pending,
    Ready(T),
    Failed(String),
}

/// Holds the outcome of a panel action and enforces one request at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSlot<T> {
    outcome: Outcome<T>,
}

impl<T> Default for RequestSlot<T> {
    fn default() -> Self {
        Self {
            outcome: Outcome::Idle,
        }
    }
}

impl<T> RequestSlot<T> {
    pub fn outcome(&self) -> &Outcome<T> {
        &self.outcome
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.outcome, Outcome::Pending)
    }

    pub fn result(&self) -> Option<&T> {
        match &self.outcome {
            Outcome::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    /// Clears the previous result and error and marks the slot pending.
    pub fn begin(&mut self) -> Result<()> {
        if self.is_pending() {
            return Err(ClientError::Busy);
        }
        self.outcome = Outcome::Pending;
        Ok(())
    }

    /// Settles a pending slot. `fallback` is the message for failures that
    /// carry none of their own.
    pub fn complete(&mut self, result: Result<T>, fallback: &str) {
        self.complete_offline(result, fallback, CONNECT_FAILED);
    }

    /// `complete` with a panel-specific message for unreachable servers.
    pub fn complete_offline(&mut self, result: Result<T>, fallback: &str, connect_failed: &str) {
        self.outcome = match result {
            Ok(value) => Outcome::Ready(value),
            Err(e) => Outcome::Failed(e.user_message_offline(fallback, connect_failed)),
        };
    }

    pub fn reset(&mut self) {
        self.outcome = Outcome::Idle;
    }
}

/// What a "save to profile" action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveGate {
    /// The upload was issued; its outcome is in the panel's slot.
    Sent,
    /// A profile resume exists; the confirm dialog is now open.
    AwaitingConfirmation,
}

// ────────────────────────────────────────────────────────────────────────────
// Context
// ────────────────────────────────────────────────────────────────────────────

/// What a panel may touch while handling an action: the shared services and
/// a read-only view of the session.
#[derive(Clone, Copy)]
pub struct PanelContext<'a> {
    pub app: &'a AppState,
    pub session: &'a SessionStore,
}

impl<'a> PanelContext<'a> {
    pub fn new(app: &'a AppState, session: &'a SessionStore) -> Self {
        Self { app, session }
    }

    pub fn bearer(&self, policy: AuthPolicy) -> Result<Option<&'a str>> {
        self.session.bearer_for(policy)
    }

    /// Mount-time profile lookup. A failure reads as "no profile resume"; it
    /// only picks defaults, so it is logged and not shown.
    pub async fn profile_status(&self) -> ProfileResumeStatus {
        let token = match self.bearer(self.app.config.endpoint_auth.profile_status) {
            Ok(token) => token,
            Err(e) => {
                warn!("Skipping profile resume lookup: {e}");
                return ProfileResumeStatus::default();
            }
        };
        match self.app.api.profile_status(token).await {
            Ok(status) => status,
            Err(e) => {
                warn!("Failed to check profile resume: {e}");
                ProfileResumeStatus::default()
            }
        }
    }
}
