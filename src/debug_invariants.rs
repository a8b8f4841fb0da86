//! Invariant checking for derived row sequences.
//!
//! Checks run in debug builds, or in release builds with the
//! `strict-invariants` / `check-invariants` features. Release builds without
//! those features compile them away.

use crate::statement_error::StatementError;

/// Validation of structural invariants.
pub trait DebugInvariants {
    /// Validate invariants and return the first violation found.
    fn validate_invariants(&self) -> Result<(), StatementError>;

    /// Panic on the first violation when invariant checking is enabled.
    #[inline]
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "invariant violation");
    }
}

/// Run a fallible check and panic with `context` on error when invariant
/// checking is enabled.
#[macro_export]
macro_rules! debug_invariants {
    ($check:expr, $($context:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(err) = $check {
            panic!(concat!("[invariants] ", $($context)*, ": {}"), err);
        }
    };
}
