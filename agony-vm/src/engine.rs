//! # Execution Engine
//!
//! Decodes and executes one instruction for one pointer pair. The engine
//! holds no state of its own: the core, the [`Registers`] and the [`Host`]
//! are passed in, which lets the interpreter and every arena agent share the
//! same step function.

use crate::bracket::{self, BracketFamily};
use crate::error::Result;
use crate::host::Host;
use crate::memory::{Core, NIBBLE_MASK};
use crate::opcode::Opcode;
use serde::Serialize;

/// The pointer pair of one running program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Registers {
    /// Current data cell
    pub cell: usize,
    /// Next instruction cell
    pub exec: usize,
}

/// Why a program stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HaltReason {
    /// Executed `$`
    Instruction,
    /// A bracket scan wrapped all the way around without a match
    UnmatchedBracket,
}

/// Outcome of a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Halted(HaltReason),
}

impl Status {
    pub fn is_running(&self) -> bool {
        matches!(self, Status::Running)
    }
}

/// Execute the instruction under `regs.exec`.
///
/// On every non-halting instruction the execution pointer advances by one
/// afterwards, including after a successful jump, which leaves it on the
/// matching bracket. Only the host can produce an error.
pub fn step<H: Host>(core: &mut Core, regs: &mut Registers, host: &mut H) -> Result<Status> {
    let op = core.opcode(regs.exec);
    let cell = regs.cell;

    tracing::trace!(exec = regs.exec, cell, op = op.mnemonic(), "step");

    match op {
        Opcode::Halt => return Ok(Status::Halted(HaltReason::Instruction)),
        Opcode::Right => regs.cell = core.offset(cell, 1),
        Opcode::Left => regs.cell = core.offset(cell, -1),
        Opcode::RightTwo => regs.cell = core.offset(cell, 2),
        Opcode::LeftTwo => regs.cell = core.offset(cell, -2),
        Opcode::IncCell => {
            let value = core.read(cell);
            core.write(cell, value.wrapping_add(1) & NIBBLE_MASK);
        }
        Opcode::DecCell => {
            let value = core.read(cell);
            core.write(cell, value.wrapping_sub(1) & NIBBLE_MASK);
        }
        Opcode::IncChar => {
            let value = core.read_character(cell);
            core.assign_character(cell, value.wrapping_add(1));
        }
        Opcode::DecChar => {
            let value = core.read_character(cell);
            core.assign_character(cell, value.wrapping_sub(1));
        }
        Opcode::Output => host.output(core.read_character(cell))?,
        Opcode::Input => {
            if let Some(byte) = host.input()? {
                core.assign_character(cell, byte);
            }
        }
        Opcode::LoopCell => {
            if core.read(cell) == 0 && !jump(core, regs, BracketFamily::Cell, true) {
                return Ok(Status::Halted(HaltReason::UnmatchedBracket));
            }
        }
        Opcode::EndCell => {
            if core.read(cell) != 0 && !jump(core, regs, BracketFamily::Cell, false) {
                return Ok(Status::Halted(HaltReason::UnmatchedBracket));
            }
        }
        Opcode::LoopChar => {
            if core.read_character(cell) == 0 && !jump(core, regs, BracketFamily::Character, true) {
                return Ok(Status::Halted(HaltReason::UnmatchedBracket));
            }
        }
        Opcode::EndChar => {
            if core.read_character(cell) != 0
                && !jump(core, regs, BracketFamily::Character, false)
            {
                return Ok(Status::Halted(HaltReason::UnmatchedBracket));
            }
        }
        Opcode::Swap => {
            if let Some(previous) = host.swap(core.read_character(cell)) {
                core.assign_character(cell, previous);
            }
        }
    }

    regs.exec = core.offset(regs.exec, 1);
    Ok(Status::Running)
}

/// Move the execution pointer onto the matching bracket. Returns false if
/// there is none.
fn jump(core: &Core, regs: &mut Registers, family: BracketFamily, forward: bool) -> bool {
    let target = if forward {
        bracket::jump_forward(core, regs.exec, family)
    } else {
        bracket::jump_backward(core, regs.exec, family)
    };

    match target {
        Some(pos) => {
            regs.exec = pos;
            true
        }
        None => {
            tracing::trace!(exec = regs.exec, ?family, "no matching bracket");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{ArenaHost, StreamHost};
    use crate::loader;
    use crate::opcode::Program;

    fn setup(source: &str, size: usize) -> (Core, Registers) {
        let mut core = Core::new(size);
        let regs = loader::load(&mut core, 0, &Program::parse(source));
        (core, regs)
    }

    fn run_to_halt<H: Host>(core: &mut Core, regs: &mut Registers, host: &mut H) -> HaltReason {
        for _ in 0..100_000 {
            if let Status::Halted(reason) = step(core, regs, host).unwrap() {
                return reason;
            }
        }
        panic!("program did not halt");
    }

    #[test]
    fn test_pointer_moves_wrap() {
        let mut core = Core::new(4);
        let mut regs = Registers { cell: 0, exec: 1 };
        core.write(1, Opcode::Left.nibble());
        core.write(2, Opcode::LeftTwo.nibble());
        core.write(3, Opcode::RightTwo.nibble());

        step(&mut core, &mut regs, &mut ArenaHost).unwrap();
        assert_eq!(regs.cell, 3);
        step(&mut core, &mut regs, &mut ArenaHost).unwrap();
        assert_eq!(regs.cell, 1);
        step(&mut core, &mut regs, &mut ArenaHost).unwrap();
        assert_eq!(regs.cell, 3);
        assert_eq!(regs.exec, 0);
    }

    #[test]
    fn test_cell_arithmetic_wraps_mod_16() {
        let mut core = Core::new(8);
        core.write(0, Opcode::DecCell.nibble());
        core.write(1, Opcode::IncCell.nibble());
        let mut regs = Registers { cell: 5, exec: 0 };

        step(&mut core, &mut regs, &mut ArenaHost).unwrap();
        assert_eq!(core.read(5), 15);
        step(&mut core, &mut regs, &mut ArenaHost).unwrap();
        assert_eq!(core.read(5), 0);
    }

    #[test]
    fn test_inc_dec_cell_are_inverses() {
        for start in 0..16u8 {
            let mut core = Core::new(8);
            core.write(0, Opcode::IncCell.nibble());
            core.write(1, Opcode::DecCell.nibble());
            core.write(2, Opcode::DecCell.nibble());
            core.write(3, Opcode::IncCell.nibble());
            core.write(6, start);
            let mut regs = Registers { cell: 6, exec: 0 };

            for _ in 0..2 {
                step(&mut core, &mut regs, &mut ArenaHost).unwrap();
            }
            assert_eq!(core.read(6), start);
            for _ in 0..2 {
                step(&mut core, &mut regs, &mut ArenaHost).unwrap();
            }
            assert_eq!(core.read(6), start);
        }
    }

    #[test]
    fn test_character_arithmetic_carries_across_cells() {
        let mut core = Core::new(8);
        core.write(0, Opcode::IncChar.nibble());
        core.write(1, Opcode::DecChar.nibble());
        core.write(2, Opcode::DecChar.nibble());
        core.assign_character(6, 0x0f);
        let mut regs = Registers { cell: 6, exec: 0 };

        step(&mut core, &mut regs, &mut ArenaHost).unwrap();
        assert_eq!((core.read(5), core.read(6)), (0x1, 0x0));
        step(&mut core, &mut regs, &mut ArenaHost).unwrap();
        step(&mut core, &mut regs, &mut ArenaHost).unwrap();
        assert_eq!(core.read_character(6), 0x0e);
    }

    #[test]
    fn test_char_decrement_wraps_to_ff() {
        let mut core = Core::new(8);
        core.write(0, Opcode::DecChar.nibble());
        let mut regs = Registers { cell: 4, exec: 0 };
        step(&mut core, &mut regs, &mut ArenaHost).unwrap();
        assert_eq!(core.read_character(4), 0xff);
    }

    #[test]
    fn test_halt_does_not_advance() {
        let mut core = Core::new(4);
        let mut regs = Registers { cell: 2, exec: 3 };
        let status = step(&mut core, &mut regs, &mut ArenaHost).unwrap();
        assert_eq!(status, Status::Halted(HaltReason::Instruction));
        assert_eq!(regs.exec, 3);
    }

    #[test]
    fn test_lone_close_bracket_halts() {
        let (mut core, mut regs) = setup(")", 16);
        core.write(regs.cell, 1);
        let status = step(&mut core, &mut regs, &mut ArenaHost).unwrap();
        assert_eq!(status, Status::Halted(HaltReason::UnmatchedBracket));
    }

    #[test]
    fn test_close_bracket_with_zero_cell_falls_through() {
        let (mut core, mut regs) = setup(")", 16);
        let status = step(&mut core, &mut regs, &mut ArenaHost).unwrap();
        assert!(status.is_running());
        assert_eq!(regs.exec, 1);
    }

    #[test]
    fn test_forward_jump_lands_past_bracket() {
        // Cell is zero, so `(` skips to just past `)`.
        let (mut core, mut regs) = setup("(@@)~", 16);
        step(&mut core, &mut regs, &mut ArenaHost).unwrap();
        assert_eq!(regs.exec, 4);
    }

    #[test]
    fn test_increment_loop_clears_cell() {
        let (mut core, mut regs) = setup("@(~)", 16);
        let origin = regs.cell;
        let reason = run_to_halt(&mut core, &mut regs, &mut ArenaHost);
        assert_eq!(reason, HaltReason::Instruction);
        assert_eq!(core.read(origin), 0);
        assert_eq!(regs.exec, 4);
    }

    #[test]
    fn test_character_loop_counts_down() {
        // 0x12 in the character: `[-]` runs it to zero.
        let (mut core, mut regs) = setup("[-]", 16);
        core.assign_character(regs.cell, 0x12);
        let reason = run_to_halt(&mut core, &mut regs, &mut ArenaHost);
        assert_eq!(reason, HaltReason::Instruction);
        assert_eq!(core.read_character(regs.cell), 0);
    }

    #[test]
    fn test_stream_host_io_and_swap() {
        // Read 'a', stash it, read EOF (0), swap 'a' back, print it.
        let (mut core, mut regs) = setup(",*,*.$", 16);
        let mut host = StreamHost::new(&b"a"[..], Vec::new());
        let reason = run_to_halt(&mut core, &mut regs, &mut host);
        assert_eq!(reason, HaltReason::Instruction);
        assert_eq!(host.buffer(), 0);
        let (_, out) = host.into_parts();
        assert_eq!(out, b"a");
    }

    #[test]
    fn test_arena_host_makes_io_inert() {
        let (mut core, mut regs) = setup("+,*.", 16);
        let cell = regs.cell;
        let reason = run_to_halt(&mut core, &mut regs, &mut ArenaHost);
        assert_eq!(reason, HaltReason::Instruction);
        assert_eq!(core.read_character(cell), 1);
    }
}
