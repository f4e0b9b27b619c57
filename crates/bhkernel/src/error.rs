//! Error types for bhkernel.
//!
//! Arena exhaustion is not an error: a build that runs out of nodes
//! degrades locally and reports it through [`crate::quadtree::TreeStats`].

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum KernelError {
    #[error("buffer `{buffer}` has length {actual}, expected {expected}")]
    LengthMismatch {
        buffer: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("time step must be finite, got {0}")]
    InvalidTimeStep(f64),
}

pub type Result<T> = std::result::Result<T, KernelError>;

/// Checks that `actual` matches the body count of the call.
pub(crate) fn check_len(buffer: &'static str, expected: usize, actual: usize) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(KernelError::LengthMismatch {
            buffer,
            expected,
            actual,
        })
    }
}
