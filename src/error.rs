//! Error type and the `err_at!` helper macro used throughout this crate.

use std::{fmt, result};

/// Result alias used across the crate.
pub type Result<T> = result::Result<T, Error>;

/// Error variants produced by this crate.
#[derive(Debug)]
pub enum Error {
    /// Invariant violated in a way that cannot be recovered from locally.
    Fatal(String),
    /// A [Config](crate::config::Config) value failed validation.
    InvalidConfig(String),
    /// A writer exhausted its retry budget chasing sibling links.
    RetryExhausted(String),
    /// Caller violated a documented precondition (e.g. duplicate key).
    PreconditionViolation(String),
    /// Node/slot capacity could not satisfy the request.
    AllocFail(String),
    /// Wraps a `std::io::Error` for the rare ambient I/O the crate performs.
    IOError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Fatal(msg) => write!(f, "Fatal: {}", msg),
            Error::InvalidConfig(msg) => write!(f, "InvalidConfig: {}", msg),
            Error::RetryExhausted(msg) => write!(f, "RetryExhausted: {}", msg),
            Error::PreconditionViolation(msg) => write!(f, "PreconditionViolation: {}", msg),
            Error::AllocFail(msg) => write!(f, "AllocFail: {}", msg),
            Error::IOError(msg) => write!(f, "IOError: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Build or wrap an [Error], tagging it with the source location.
///
/// Two forms:
/// * `err_at!(Variant, expr)` — evaluate `expr` (a `Result<T, E>` where
///   `E: ToString`), mapping `Err` into `Error::Variant`.
/// * `err_at!(Variant, msg: "fmt", args...)` — format a message directly
///   into `Error::Variant`.
#[macro_export]
macro_rules! err_at {
    ($v:ident, msg: $($arg:expr),+) => {{
        let msg = format!($($arg),+);
        Err($crate::Error::$v(format!("{}:{} {}", file!(), line!(), msg)))
    }};
    ($v:ident, $e:expr $(,$arg:expr)*) => {{
        match $e {
            Ok(val) => Ok(val),
            Err(err) => {
                let msg = format!("{}:{} {}", file!(), line!(), err);
                Err($crate::Error::$v(msg))
            }
        }
    }};
}

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;
