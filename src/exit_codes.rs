//! Exit code constants for the promptlab CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, bad data, missing record)
//! - 2: Template or pricing failure (run rejected before any model call)
//! - 3: Generation failure (timeout, retries exhausted, cancelled)
//! - 4: Missing credential

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, malformed data files, unknown record.
pub const USER_ERROR: i32 = 1;

/// Run rejected during assembly or pricing; nothing was sent to the model.
pub const RUN_REJECTED: i32 = 2;

/// The model call failed, timed out or was abandoned.
pub const GENERATION_FAILURE: i32 = 3;

/// No API key available at startup.
pub const MISSING_CREDENTIAL: i32 = 4;
