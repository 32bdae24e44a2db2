//! # Agony VM
//!
//! A virtual machine for Agony, a nibble-addressed esoteric language, and
//! its multi-program arena.
//!
//! ## Core Concepts
//! - **Core**: a circular array of 4-bit cells holding both code and data
//! - **Registers**: a cell pointer (data) and an execution pointer (code)
//! - **Characters**: two adjacent cells read as one byte
//! - **Brackets**: `()` loop on the cell, `[]` loop on the character; pairs
//!   are matched at runtime by scanning the core
//! - **Host**: where `.`, `,` and `*` go (streams and a buffer, or nowhere)
//! - **Arena**: several programs sharing one core, stepped in turns

pub mod opcode;
pub mod error;
pub mod memory;
pub mod bracket;
pub mod host;
pub mod engine;
pub mod loader;
pub mod interpreter;
pub mod arena;

pub use opcode::{Opcode, Program, SYMBOLS};
pub use error::{Error, ErrorKind, ErrorStatus, Result};
pub use memory::{Core, DEFAULT_CORE_SIZE};
pub use bracket::BracketFamily;
pub use host::{ArenaHost, Host, StreamHost};
pub use engine::{HaltReason, Registers, Status};
pub use interpreter::{ExecutionResult, ExecutionState, Interpreter, InterpreterConfig};
pub use arena::{Agent, Arena, ArenaConfig, BattleReport, RoundReport};
