//! API key resolution.
//!
//! The key is resolved once, before a generating command does any work, so a
//! missing key surfaces as `MissingCredential` at startup rather than midway
//! through a run. A `.env` file in the working directory is honored (loaded
//! by `main` through `dotenvy`).

use crate::error::{LabError, Result};
use std::fmt;

/// A secret API key. `Debug` and `Display` never print the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Read the key from the environment variable `var`.
    pub fn from_env(var: &str) -> Result<Self> {
        Self::resolve_with(var, |name| std::env::var(name).ok())
    }

    /// Resolve the key through an arbitrary lookup (environment, secret store).
    ///
    /// Unset, empty and whitespace-only values all count as missing.
    pub fn resolve_with<F>(var: &str, lookup: F) -> Result<Self>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        match lookup(var) {
            Some(value) if !value.trim().is_empty() => Ok(Self(value.trim().to_string())),
            _ => Err(LabError::MissingCredential(format!(
                "{} is not set.\n\
                 Fix: export {}=<your key> or add it to a .env file.",
                var, var
            ))),
        }
    }

    /// The raw key, for the one place that sends it.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey(<redacted>)")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<redacted>")
    }
}
