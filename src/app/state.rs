//! Application state definitions
//!
//! `AppState` wraps the wizard session with the things only the terminal
//! needs: the text field, the live check list, and transient UI flags.

use crate::input::TextInput;
use crate::types::CheckStatus;
use crate::validation::{CheckResult, ValidationCheck, ValidationEvent};
use crate::wizard::{WizardSession, WizardStep};

/// Main application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Wizard progress and per-step results
    pub session: WizardSession,
    /// File reference text field
    pub input: TextInput,
    /// One row per check, updated as worker events arrive
    pub checks: Vec<CheckResult>,
    /// A validation worker is running
    pub validating: bool,
    /// A statistics worker is running
    pub loading_statistics: bool,
    /// Why the statistics preview is missing, when it failed
    pub statistics_error: Option<String>,
    /// Status message for user feedback
    pub status_message: String,
    /// Whether help overlay is visible
    pub help_visible: bool,
    /// Bumped whenever in-flight worker results become stale
    pub generation: u64,
    /// Scroll offset of the recommendation panel
    pub recommend_scroll: u16,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            session: WizardSession::new(),
            input: TextInput::new(),
            checks: pending_checks(),
            validating: false,
            loading_statistics: false,
            statistics_error: None,
            status_message: "Enter an S3 URL, HTTPS URL, or CMR concept ID".to_string(),
            help_visible: false,
            generation: 0,
            recommend_scroll: 0,
        }
    }
}

/// Every check in run order, all pending
pub fn pending_checks() -> Vec<CheckResult> {
    ValidationCheck::ALL
        .iter()
        .map(|&check| CheckResult {
            check,
            status: CheckStatus::Pending,
            message: String::new(),
        })
        .collect()
}

impl AppState {
    #[inline]
    pub fn step(&self) -> WizardStep {
        self.session.step()
    }

    /// Keys go to the text field rather than to shortcuts
    pub fn is_typing(&self) -> bool {
        self.step() == WizardStep::Input && !self.help_visible
    }

    /// Apply a progress event to the check list
    pub fn apply_event(&mut self, event: &ValidationEvent) {
        match event {
            ValidationEvent::CheckStarted(check) => {
                if let Some(row) = self.checks.iter_mut().find(|r| r.check == *check) {
                    row.status = CheckStatus::Running;
                    row.message.clear();
                }
            }
            ValidationEvent::CheckFinished(result) => {
                if let Some(row) = self.checks.iter_mut().find(|r| r.check == result.check) {
                    *row = result.clone();
                }
            }
        }
    }

    /// Drop everything tied to the current run and invalidate in-flight workers
    pub fn reset_progress(&mut self) {
        self.generation += 1;
        self.checks = pending_checks();
        self.validating = false;
        self.loading_statistics = false;
        self.statistics_error = None;
        self.recommend_scroll = 0;
    }

    /// Checks that have reached a final status
    pub fn finished_checks(&self) -> usize {
        self.checks.iter().filter(|r| r.status.is_finished()).count()
    }
}
