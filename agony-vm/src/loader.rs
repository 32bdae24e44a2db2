//! # Program Loader
//!
//! Writes a decoded [`Program`] into the core, one opcode per cell, starting
//! at an origin. Bracket balance is never checked here; unmatched brackets
//! only matter if execution reaches them.

use crate::engine::Registers;
use crate::memory::Core;
use crate::opcode::Program;

/// Load `program` at `origin` and return the pointer pair to start it with.
///
/// The execution pointer starts on the first loaded cell. The cell pointer
/// starts one past the cell that follows the program, so the first
/// character it addresses is the two cells right after the code.
pub fn load(core: &mut Core, origin: usize, program: &Program) -> Registers {
    let origin = core.wrap(origin);
    let mut cell = origin;
    for op in program.code() {
        core.write(cell, op.nibble());
        cell = core.offset(cell, 1);
    }

    tracing::debug!(origin, cells = program.len(), "program loaded");

    Registers {
        cell: core.offset(cell, 1),
        exec: origin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::Opcode;

    #[test]
    fn test_load_writes_opcodes_in_order() {
        let mut core = Core::new(16);
        let regs = load(&mut core, 0, &Program::parse("@(~)"));
        assert_eq!(&core.cells()[..5], &[5, 11, 6, 12, 0]);
        assert_eq!(regs, Registers { cell: 5, exec: 0 });
    }

    #[test]
    fn test_unknown_symbols_take_no_cells() {
        let mut core = Core::new(16);
        let regs = load(&mut core, 0, &Program::parse("a @ b\n~ c"));
        assert_eq!(core.opcode(0), Opcode::IncCell);
        assert_eq!(core.opcode(1), Opcode::DecCell);
        assert_eq!(regs.cell, 3);
    }

    #[test]
    fn test_load_at_origin_wraps() {
        let mut core = Core::new(6);
        let regs = load(&mut core, 4, &Program::parse("}}}"));
        assert_eq!(core.cells(), &[1, 0, 0, 0, 1, 1]);
        assert_eq!(regs, Registers { cell: 2, exec: 4 });
    }

    #[test]
    fn test_empty_program() {
        let mut core = Core::new(8);
        let regs = load(&mut core, 3, &Program::parse("hello world"));
        assert!(core.cells().iter().all(|&c| c == 0));
        assert_eq!(regs, Registers { cell: 4, exec: 3 });
    }

    #[test]
    fn test_unbalanced_brackets_load() {
        let mut core = Core::new(8);
        load(&mut core, 0, &Program::parse(")))(("));
        assert_eq!(core.disassemble(), ")))(($$$");
    }
}
