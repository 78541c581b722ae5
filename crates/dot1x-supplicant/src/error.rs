//! Management-surface error codes (spec.md §4.10, mirrored from the
//! authenticator side for the supplicant's own setters).

use thiserror::Error;

/// Result of validating or committing a management write.
pub type Result<T> = std::result::Result<T, ManagementError>;

/// Errors the supplicant's two-phase-commit setters can return.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ManagementError {
    /// The value is outside the parameter's allowed range.
    #[error("value out of range for {parameter}: {value}")]
    WrongValue {
        /// Parameter name.
        parameter: &'static str,
        /// Offending value, formatted for display.
        value: String,
    },
}
