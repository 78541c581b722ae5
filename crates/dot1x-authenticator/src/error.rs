//! Management-surface error codes (spec.md §4.10, §7: "Configuration
//! errors ... returned from setters; no state changes").

use thiserror::Error;

/// Result of validating or committing a management write.
pub type Result<T> = std::result::Result<T, ManagementError>;

/// Errors a two-phase-commit setter can return. Distinct from
/// [`dot1x_types::Error`] because these map onto the specific codes
/// spec.md §4.10 names (`WrongValue`, `InvalidPort`).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ManagementError {
    /// The port index does not exist.
    #[error("no such port: {index}")]
    InvalidPort {
        /// Offending index.
        index: u32,
    },
    /// The value is outside the parameter's allowed range.
    #[error("value out of range for {parameter}: {value}")]
    WrongValue {
        /// Parameter name.
        parameter: &'static str,
        /// Offending value, formatted for display.
        value: String,
    },
}
