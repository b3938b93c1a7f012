use std::fmt;

/// Unrecoverable engine failures. A register that has surfaced one of these
/// is left in an unspecified state and must not be used further.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// An entry-array or hash-table (re)allocation failed.
    OutOfMemory,
    /// A dense matrix of the wrong shape was supplied.
    DimMismatch,
    /// A hash-index invariant was violated.
    Internal,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::OutOfMemory => write!(f, "allocation failed"),
            Error::DimMismatch => write!(f, "matrix dimension mismatch"),
            Error::Internal => write!(f, "hash index corrupted"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
