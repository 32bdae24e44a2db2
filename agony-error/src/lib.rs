//! # agony-error
//!
//! Unified error handling for the Agony virtual machine.
//!
//! ## Design
//!
//! - **ErrorKind**: what went wrong (e.g. ProgramTooLong, ConfigInvalid)
//! - **ErrorStatus**: whether retrying can help (Permanent, Temporary, Persistent)
//! - **Context**: key/value pairs that locate the cause
//! - **Source**: the wrapped underlying error, never leaked as a raw type
//!
//! Program-level anomalies (unmatched brackets, unknown symbols, exhausted
//! cycle budgets) are part of the machine's semantics and never become errors.
//! This crate only covers configuration and host I/O failures.
//!
//! ## Usage
//!
//! ```rust
//! use agony_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::ProgramTooLong, "warrior 2 too long")
//!         .with_operation("arena::load")
//!         .with_context("agent", "2")
//!         .with_context("max_length", "100"))
//! }
//! ```

mod error;
mod kind;
mod status;

pub use error::Error;
pub use kind::ErrorKind;
pub use status::ErrorStatus;

/// Result type alias using the Agony error
pub type Result<T> = std::result::Result<T, Error>;
