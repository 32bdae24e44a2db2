//! # Agony Interpreter
//!
//! Runs a single program on its own core. The program is loaded at address
//! zero and stepped until it halts or the cycle budget runs out. Running out
//! of cycles is a normal outcome, not an error.

use crate::engine::{self, HaltReason, Registers, Status};
use crate::error::{self, Result};
use crate::host::Host;
use crate::loader;
use crate::memory::{Core, DEFAULT_CORE_SIZE};
use crate::opcode::Program;
use serde::{Deserialize, Serialize};

/// Default cycle budget for a single run
pub const DEFAULT_MAX_CYCLES: u64 = 100_000_000;

/// Interpreter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Number of cells in the core
    pub core_size: usize,
    /// Maximum number of steps before the run is stopped
    pub max_cycles: u64,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            core_size: DEFAULT_CORE_SIZE,
            max_cycles: DEFAULT_MAX_CYCLES,
        }
    }
}

impl InterpreterConfig {
    pub fn with_core_size(mut self, core_size: usize) -> Self {
        self.core_size = core_size;
        self
    }

    pub fn with_max_cycles(mut self, max_cycles: u64) -> Self {
        self.max_cycles = max_cycles;
        self
    }

    /// Check the configuration
    pub fn validate(&self) -> Result<()> {
        if self.core_size == 0 {
            return Err(error::config_invalid("core_size", "core size must be nonzero")
                .with_operation("interpreter::validate"));
        }
        Ok(())
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ExecutionResult {
    /// The program stopped by itself
    Halted { reason: HaltReason, cycles: u64 },
    /// The cycle budget ran out first
    CycleLimitReached { cycles: u64 },
}

impl ExecutionResult {
    /// Steps executed during the run
    pub fn cycles(&self) -> u64 {
        match self {
            ExecutionResult::Halted { cycles, .. } => *cycles,
            ExecutionResult::CycleLimitReached { cycles } => *cycles,
        }
    }
}

/// Current state of the interpreter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionState {
    Running,
    Halted(HaltReason),
}

/// Single-program interpreter
pub struct Interpreter<H: Host> {
    core: Core,
    registers: Registers,
    host: H,
    config: InterpreterConfig,
    cycles: u64,
    state: ExecutionState,
}

impl<H: Host> Interpreter<H> {
    /// Create an interpreter with the default configuration
    pub fn new(program: &Program, host: H) -> Self {
        Self::build(InterpreterConfig::default(), program, host)
    }

    /// Create an interpreter with a custom configuration
    pub fn with_config(config: InterpreterConfig, program: &Program, host: H) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, program, host))
    }

    fn build(config: InterpreterConfig, program: &Program, host: H) -> Self {
        let mut core = Core::new(config.core_size);
        let registers = loader::load(&mut core, 0, program);
        Self {
            core,
            registers,
            host,
            config,
            cycles: 0,
            state: ExecutionState::Running,
        }
    }

    /// Execute one instruction. Stepping a halted interpreter does nothing.
    pub fn step(&mut self) -> Result<ExecutionState> {
        if let ExecutionState::Halted(_) = self.state {
            return Ok(self.state);
        }

        self.cycles += 1;
        if let Status::Halted(reason) = engine::step(&mut self.core, &mut self.registers, &mut self.host)? {
            tracing::debug!(?reason, cycles = self.cycles, exec = self.registers.exec, "program halted");
            self.state = ExecutionState::Halted(reason);
        }
        Ok(self.state)
    }

    /// Step until the program halts or the cycle budget is spent
    pub fn run(&mut self) -> Result<ExecutionResult> {
        loop {
            if let ExecutionState::Halted(reason) = self.state {
                return Ok(ExecutionResult::Halted {
                    reason,
                    cycles: self.cycles,
                });
            }
            if self.cycles >= self.config.max_cycles {
                tracing::warn!(max_cycles = self.config.max_cycles, "cycle limit reached");
                return Ok(ExecutionResult::CycleLimitReached {
                    cycles: self.cycles,
                });
            }
            self.step()?;
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn core(&self) -> &Core {
        &self.core
    }

    pub fn registers(&self) -> Registers {
        self.registers
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn state(&self) -> ExecutionState {
        self.state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }
}
