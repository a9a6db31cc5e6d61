//! Failure model shared by every container.
//!
//! Mutating operations return `Result<_, Error>`. Read operations that have
//! no answer return `None` instead of an error.

use core::fmt;
use std::io::{self, Write};

use thiserror::Error;

/// Closed set of failure kinds.
///
/// Each kind renders to a fixed English message, [`Error::message`], which
/// is also what `Display` prints. Success is `Ok(..)`; its message is
/// available through [`describe`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// A required input was missing or unusable (e.g. zero capacity).
    InvalidInput,
    /// Storage could not provide room for a new element.
    AllocFailed,
    /// No element compares equal to the given key.
    NotFound,
    /// An element comparing equal to the new one is already present.
    Duplicate,
    /// The container holds no elements.
    Empty,
    /// An index is past the end of the container.
    OutOfRange,
    /// A bounded container is at capacity.
    CapacityExceeded,
    /// A container was configured without a comparator.
    ComparatorMissing,
    /// A structural invariant does not hold.
    InvariantViolation,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Message rendered for a successful operation.
pub const OK_MESSAGE: &str = "ok";

impl Error {
    /// Every failure kind, in declaration order.
    pub const ALL: [Error; 9] = [
        Error::InvalidInput,
        Error::AllocFailed,
        Error::NotFound,
        Error::Duplicate,
        Error::Empty,
        Error::OutOfRange,
        Error::CapacityExceeded,
        Error::ComparatorMissing,
        Error::InvariantViolation,
    ];

    /// Returns the fixed message for this kind.
    pub const fn message(self) -> &'static str {
        match self {
            Error::InvalidInput => "invalid input",
            Error::AllocFailed => "memory allocation failed",
            Error::NotFound => "element not found",
            Error::Duplicate => "duplicate element",
            Error::Empty => "container is empty",
            Error::OutOfRange => "index out of range",
            Error::CapacityExceeded => "capacity exceeded",
            Error::ComparatorMissing => "comparator missing",
            Error::InvariantViolation => "invariant violation",
        }
    }

    /// Writes the message, newline terminated, to `out`.
    pub fn render<W: Write>(self, mut out: W) -> io::Result<()> {
        writeln!(out, "{}", self.message())
    }

    /// Writes the message to stderr and emits a `tracing` event for it.
    ///
    /// A failed write to stderr is dropped; the `tracing` event still fires.
    pub fn report(self) {
        tracing::error!(error = ?self, "{}", self.message());
        self.render(io::stderr().lock()).ok();
    }
}

/// Logs a broken invariant found by a `validate` pass.
pub(crate) fn violation(invariant: &'static str) -> Error {
    tracing::warn!(invariant, "invariant violated");
    Error::InvariantViolation
}

/// Returns the message for an operation outcome, including success.
///
/// ```
/// use nexus_ordered::{Error, describe};
///
/// assert_eq!(describe(&Ok::<(), Error>(())), "ok");
/// assert_eq!(describe(&Err::<(), _>(Error::Duplicate)), "duplicate element");
/// ```
pub fn describe<T>(result: &Result<T, Error>) -> &'static str {
    match result {
        Ok(_) => OK_MESSAGE,
        Err(err) => err.message(),
    }
}
