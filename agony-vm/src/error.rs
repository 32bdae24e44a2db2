//! Agony VM error types
//!
//! Re-exports agony-error and provides VM-specific conveniences.

pub use agony_error::{Error, ErrorKind, ErrorStatus, Result};

/// Create a ConfigInvalid error for one configuration field
pub fn config_invalid(field: &'static str, reason: impl Into<String>) -> Error {
    Error::config_invalid(reason).with_context("field", field)
}

/// Create a ProgramTooLong error
pub fn program_too_long(agent: usize, length: usize, max: usize) -> Error {
    Error::new(
        ErrorKind::ProgramTooLong,
        format!("warrior {} too long: {} > {}", agent + 1, length, max),
    )
    .with_context("agent", (agent + 1).to_string())
    .with_context("length", length.to_string())
    .with_context("max_length", max.to_string())
}

/// Create a TooFewAgents error
pub fn too_few_agents(count: usize) -> Error {
    Error::new(
        ErrorKind::TooFewAgents,
        format!("an arena needs at least 2 programs, got {}", count),
    )
    .with_context("count", count.to_string())
}

/// Create a PlacementFailed error
pub fn placement_failed(agent: usize, core_size: usize) -> Error {
    Error::new(
        ErrorKind::PlacementFailed,
        format!("no free offset left for warrior {}", agent + 1),
    )
    .with_context("agent", (agent + 1).to_string())
    .with_context("core_size", core_size.to_string())
}

/// Create a ParseFailed error for a configuration document
pub fn parse_error(message: impl Into<String>) -> Error {
    Error::parse_failed(message)
}
