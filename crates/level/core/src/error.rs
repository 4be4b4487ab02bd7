//! Error classification shared by the level editor crates.
//!
//! Each crate defines its own error enums next to the operations that fail
//! (`GridError` here, `SelectionError` and `CodecError` in the selection
//! engine) and implements [`EditorError`] for them, so a front end can decide
//! between a status-bar notice and a hard failure without matching variants.
//!
//! Misuse of the selection session (beginning a second move while one is in
//! flight, mismatched buffer sizes) panics instead.

/// How a failure should be surfaced.
///
/// - **Recoverable**: the gesture was refused but nothing changed; the user
///   may try again (a magic-wand click on too large a region)
/// - **Validation**: the input itself is unusable (foreign clipboard bytes,
///   a cell outside the grid)
/// - **Internal**: the editor reached a state it should never be in
/// - **Fatal**: the level data can no longer be trusted
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Internal,
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Failures caused by what the user did, as opposed to editor bugs.
    /// These are reported as a notice and the interaction carries on.
    pub const fn is_user_facing(&self) -> bool {
        matches!(self, Self::Recoverable | Self::Validation)
    }
}

/// Implemented by every editor error enum.
///
/// `error_code` returns a stable UPPER_SNAKE_CASE identifier per variant, e.g.
/// `SELECTION_FLOOD_FILL_TOO_LARGE`.
pub trait EditorError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Falls back to the type name when a type has no per-variant codes.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_facing_severities() {
        assert!(ErrorSeverity::Recoverable.is_user_facing());
        assert!(ErrorSeverity::Validation.is_user_facing());
        assert!(!ErrorSeverity::Internal.is_user_facing());
        assert!(!ErrorSeverity::Fatal.is_user_facing());
        assert!(!ErrorSeverity::Validation.is_recoverable());
        assert_eq!(ErrorSeverity::Fatal.as_str(), "fatal");
    }
}
