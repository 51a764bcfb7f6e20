//! Wizard step state machine
//!
//! [`WizardSession`] is the single source of truth for where the user is in
//! the flow and what each step produced. Transitions are validated: the
//! session cannot reach a recommendation without a successful validation
//! report, and going back discards everything downstream.
//!
//! # Step Flow
//!
//! ```text
//! Input
//!   ↓  (input parses)
//! Validate
//!   ↓  (report finished, not aborted)
//! Recommend
//!   ↓
//! Done
//!
//! (Validate and Recommend can go back to Input)
//! ```

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::info;

use crate::api::BandStatistics;
use crate::logic::Recommendation;
use crate::source::FileReference;
use crate::validation::ValidationReport;

/// Wizard steps in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WizardStep {
    /// Enter a file reference
    #[default]
    Input,
    /// Run checks against the external APIs
    Validate,
    /// Show the recommended service
    Recommend,
    /// Session finished (terminal)
    Done,
}

impl WizardStep {
    /// Number of user-facing steps (Done is not counted)
    pub const TOTAL_STEPS: usize = 3;

    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Input => Some(Self::Validate),
            Self::Validate => Some(Self::Recommend),
            Self::Recommend => Some(Self::Done),
            Self::Done => None,
        }
    }

    /// Going back always lands on Input; there is nothing to revisit in between.
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::Validate | Self::Recommend => Some(Self::Input),
            Self::Input | Self::Done => None,
        }
    }

    pub const fn can_go_back(self) -> bool {
        self.previous().is_some()
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done)
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Input => "File Reference",
            Self::Validate => "Validation",
            Self::Recommend => "Recommendation",
            Self::Done => "Finished",
        }
    }

    /// 1-indexed step number for display; Done reports the last step
    pub const fn step_number(self) -> usize {
        match self {
            Self::Input => 1,
            Self::Validate => 2,
            Self::Recommend | Self::Done => 3,
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Errors that can occur during step transitions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardTransitionError {
    #[error("cannot continue: {reason}")]
    InvalidInput { reason: String },

    #[error("validation has not finished yet")]
    ValidationPending,

    #[error("validation failed: {reason}")]
    ValidationFailed { reason: String },

    #[error("no previous step from {from}")]
    NoPreviousStep { from: WizardStep },

    #[error("cannot advance from {from} (session is finished)")]
    FromTerminalStep { from: WizardStep },

    #[error("expected to be at {expected}, but at {actual}")]
    WrongStep { expected: WizardStep, actual: WizardStep },
}

/// All per-session state
#[derive(Debug, Clone, Default)]
pub struct WizardSession {
    step: WizardStep,
    /// Raw text typed by the user
    pub input: String,
    reference: Option<FileReference>,
    report: Option<ValidationReport>,
    recommendation: Option<Recommendation>,
    statistics: Option<BandStatistics>,
    history: Vec<(WizardStep, u64)>,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl WizardSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session with pre-filled input
    pub fn with_input(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            ..Self::default()
        }
    }

    #[inline]
    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn reference(&self) -> Option<&FileReference> {
        self.reference.as_ref()
    }

    pub fn report(&self) -> Option<&ValidationReport> {
        self.report.as_ref()
    }

    pub fn recommendation(&self) -> Option<&Recommendation> {
        self.recommendation.as_ref()
    }

    pub fn statistics(&self) -> Option<&BandStatistics> {
        self.statistics.as_ref()
    }

    /// Steps entered so far, with unix timestamps
    pub fn history(&self) -> &[(WizardStep, u64)] {
        &self.history
    }

    fn enter(&mut self, step: WizardStep) {
        info!("Wizard step: {} -> {}", self.step, step);
        self.history.push((step, unix_now()));
        self.step = step;
    }

    fn expect_step(&self, expected: WizardStep) -> Result<(), WizardTransitionError> {
        if self.step == expected {
            Ok(())
        } else if self.step.is_terminal() {
            Err(WizardTransitionError::FromTerminalStep { from: self.step })
        } else {
            Err(WizardTransitionError::WrongStep {
                expected,
                actual: self.step,
            })
        }
    }

    /// Input -> Validate. The input must parse as a file reference.
    pub fn submit_input(&mut self) -> Result<&FileReference, WizardTransitionError> {
        self.expect_step(WizardStep::Input)?;
        let reference = FileReference::parse(&self.input).map_err(|e| {
            WizardTransitionError::InvalidInput {
                reason: e.to_string(),
            }
        })?;
        self.report = None;
        self.recommendation = None;
        self.statistics = None;
        self.enter(WizardStep::Validate);
        Ok(self.reference.insert(reference))
    }

    /// Store the finished validation report. Only accepted on the Validate step.
    pub fn set_report(&mut self, report: ValidationReport) -> Result<(), WizardTransitionError> {
        self.expect_step(WizardStep::Validate)?;
        self.report = Some(report);
        Ok(())
    }

    /// Forget the current report so validation can run again
    pub fn clear_report(&mut self) {
        self.report = None;
    }

    /// Validate -> Recommend. Requires a finished, non-aborted report.
    pub fn accept_report(&mut self, recommendation: Recommendation) -> Result<(), WizardTransitionError> {
        self.expect_step(WizardStep::Validate)?;
        self.ensure_report_ok()?;
        self.recommendation = Some(recommendation);
        self.enter(WizardStep::Recommend);
        Ok(())
    }

    /// Whether the current report allows moving on
    pub fn ensure_report_ok(&self) -> Result<&ValidationReport, WizardTransitionError> {
        let report = self
            .report
            .as_ref()
            .ok_or(WizardTransitionError::ValidationPending)?;
        if let Some(failure) = report.fatal_failure() {
            return Err(WizardTransitionError::ValidationFailed {
                reason: format!("{}: {}", failure.check.title(), failure.message),
            });
        }
        if report.aborted {
            return Err(WizardTransitionError::ValidationFailed {
                reason: "validation did not complete".to_string(),
            });
        }
        Ok(report)
    }

    /// Attach preview statistics on the Recommend step
    pub fn set_statistics(&mut self, stats: BandStatistics) -> Result<(), WizardTransitionError> {
        self.expect_step(WizardStep::Recommend)?;
        self.statistics = Some(stats);
        Ok(())
    }

    /// Recommend -> Done
    pub fn finish(&mut self) -> Result<(), WizardTransitionError> {
        self.expect_step(WizardStep::Recommend)?;
        self.enter(WizardStep::Done);
        Ok(())
    }

    /// Return to Input and drop everything produced after it
    pub fn back(&mut self) -> Result<WizardStep, WizardTransitionError> {
        let previous = self
            .step
            .previous()
            .ok_or(WizardTransitionError::NoPreviousStep { from: self.step })?;
        self.clear_downstream();
        self.enter(previous);
        Ok(previous)
    }

    /// Start over from Input. The typed input is kept for editing.
    pub fn reset(&mut self) {
        self.clear_downstream();
        if self.step != WizardStep::Input {
            self.enter(WizardStep::Input);
        }
    }

    fn clear_downstream(&mut self) {
        self.reference = None;
        self.report = None;
        self.recommendation = None;
        self.statistics = None;
    }
}
