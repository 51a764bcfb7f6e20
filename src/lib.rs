//! geoviz-wizard library
//!
//! Validates a geospatial file reference (S3 URL, HTTPS URL, or CMR concept
//! ID) against hosted services and recommends how to visualize it. The
//! terminal wizard and the headless `check` command are thin layers over
//! these modules.

pub mod api;
pub mod app;
pub mod cli;
pub mod components;
pub mod config_file;
pub mod error;
pub mod input;
pub mod logic;
pub mod output;
pub mod source;
pub mod stats;
pub mod theme;
pub mod types;
pub mod ui;
pub mod validation;
pub mod wizard;

// Re-export main types for convenience
pub use api::{ApiError, HttpVisualizationApi, VisualizationApi};
pub use config_file::WizardConfig;
pub use error::{Result, WizardError};
pub use logic::{recommend, recommend_from_report, Recommendation};
pub use source::{FileReference, SourceError};
pub use types::{
    CheckStatus, CmrBackend, CmrConceptKind, ConversionTarget, FileFormat, ServiceKind,
    SourceKind, SpatialType,
};
pub use validation::{DetectedProperties, ValidationReport, ValidationRunner};
pub use wizard::{WizardSession, WizardStep, WizardTransitionError};
