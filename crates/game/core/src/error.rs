//! Common error infrastructure for game-core.
//!
//! Domain-specific errors (e.g., [`crate::skill::SkillError`]) live next to the
//! operations that produce them and implement [`GameError`] so the runtime can
//! classify them uniformly.
//!
//! # Design Principles
//!
//! - **Discriminated results**: validation failures are values, never panics
//! - **Severity Classification**: errors are categorized for logging and recovery
//! - **Deterministic**: no I/O, no allocation-heavy context capture

use crate::state::EntityId;

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Validation**: the request was invalid; the caller shows a notice
/// - **Missing**: content or behavior is absent; treated as a logged no-op
/// - **Internal**: unexpected state inconsistency that should be investigated
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Invalid input, should not be retried without changes.
    ///
    /// Examples: unknown target, target out of range
    Validation,

    /// Data or behavior not present for the request.
    ///
    /// Examples: actor does not know the skill, no handler registered
    Missing,

    /// Unexpected state inconsistency.
    ///
    /// Examples: actor vanished from its own region mid-request
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Missing => "missing",
            Self::Internal => "internal",
        }
    }

    /// Returns true if the failure should be surfaced to the acting player.
    pub const fn is_user_facing(&self) -> bool {
        matches!(self, Self::Validation)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all game-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on who has to act on the failure
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Entity that triggered the error, if any.
    fn actor(&self) -> Option<EntityId> {
        None
    }

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_helpers() {
        assert!(ErrorSeverity::Validation.is_user_facing());
        assert!(!ErrorSeverity::Missing.is_user_facing());
        assert!(ErrorSeverity::Internal.is_internal());
        assert_eq!(ErrorSeverity::Missing.as_str(), "missing");
    }
}
