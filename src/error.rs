//! Error types for promptlab.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use crate::exit_codes;
use crate::prompt::TemplateError;
use std::time::Duration;
use thiserror::Error;

/// Main error type for promptlab operations.
///
/// Each variant maps to an exit code (see [`exit_codes`]).
#[derive(Error, Debug)]
pub enum LabError {
    /// A tool file or entry matched neither the simple nor the complex shape.
    #[error("malformed tool data in '{source_name}': {reason}")]
    MalformedToolData { source_name: String, reason: String },

    /// A problem file or entry is missing required fields or has a bad level.
    #[error("malformed problem data in '{source_name}': {reason}")]
    MalformedProblemData { source_name: String, reason: String },

    /// The prompt template could not be rendered.
    #[error("template render failed: {0}")]
    TemplateRender(#[from] TemplateError),

    /// Generation parameters were rejected before assembly.
    #[error("invalid generation request: {0}")]
    InvalidRequest(String),

    /// The model call exceeded the configured timeout.
    #[error("generation timed out after {timeout:?} (attempt {attempt})")]
    GenerationTimeout { timeout: Duration, attempt: u32 },

    /// The model call failed permanently or ran out of retries.
    #[error("generation failed after {attempts} attempt(s): {last_cause}")]
    GenerationFailed { attempts: u32, last_cause: String },

    /// The caller abandoned the model call.
    #[error("generation cancelled by caller")]
    GenerationCancelled,

    /// No pricing entry exists for the requested model.
    #[error("no pricing configured for model '{0}'")]
    UnknownPricingModel(String),

    /// No stored result record with this id.
    #[error("result record '{0}' not found")]
    RecordNotFound(String),

    /// The API key is not available.
    #[error("missing credential: {0}")]
    MissingCredential(String),

    /// Configuration file could not be read, parsed or validated.
    #[error("config error: {0}")]
    ConfigError(String),

    /// User provided invalid arguments or the filesystem is in an invalid state.
    #[error("{0}")]
    UserError(String),

    /// Broken internal invariant.
    #[error("internal error: {0}")]
    Internal(String),
}

impl LabError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LabError::MalformedToolData { .. }
            | LabError::MalformedProblemData { .. }
            | LabError::RecordNotFound(_)
            | LabError::ConfigError(_)
            | LabError::UserError(_)
            | LabError::Internal(_) => exit_codes::USER_ERROR,
            LabError::TemplateRender(_)
            | LabError::InvalidRequest(_)
            | LabError::UnknownPricingModel(_) => exit_codes::RUN_REJECTED,
            LabError::GenerationTimeout { .. }
            | LabError::GenerationFailed { .. }
            | LabError::GenerationCancelled => exit_codes::GENERATION_FAILURE,
            LabError::MissingCredential(_) => exit_codes::MISSING_CREDENTIAL,
        }
    }

    /// Whether the caller may reasonably retry the same run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            LabError::GenerationTimeout { .. }
                | LabError::GenerationFailed { .. }
                | LabError::GenerationCancelled
        )
    }
}

/// Result type alias for promptlab operations.
pub type Result<T> = std::result::Result<T, LabError>;
