//! Validation module - structural snapshot checks and venue tagging findings.

mod snapshot_checks;
mod tagging_check;
mod validation_model;
mod validation_service;
mod validation_traits;

pub use snapshot_checks::check_snapshot;
pub use tagging_check::TaggingCheck;
pub use validation_model::{FindingKind, Severity, ValidationFinding, ValidationReport};
pub use validation_service::ValidationService;
pub use validation_traits::ValidationServiceTrait;
