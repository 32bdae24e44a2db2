//! # Bracket Resolver
//!
//! Brackets are matched at runtime by scanning the core, never by parsing the
//! program ahead of time: code is data, so the pairing can change while the
//! program runs.
//!
//! A scan walks one cell at a time from the bracket under the execution
//! pointer, counting only the codes of its own family. It succeeds on the
//! cell where the depth returns to zero and fails once it has walked the
//! whole core back to its starting cell.

use crate::memory::Core;
use crate::opcode::Opcode;

/// The two independently matched bracket pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BracketFamily {
    /// `(` and `)`, tested against the cell
    Cell,
    /// `[` and `]`, tested against the character
    Character,
}

impl BracketFamily {
    /// The opening bracket of this family
    pub fn open(self) -> Opcode {
        match self {
            BracketFamily::Cell => Opcode::LoopCell,
            BracketFamily::Character => Opcode::LoopChar,
        }
    }

    /// The closing bracket of this family
    pub fn close(self) -> Opcode {
        match self {
            BracketFamily::Cell => Opcode::EndCell,
            BracketFamily::Character => Opcode::EndChar,
        }
    }

    /// The family an opcode belongs to, if it is a bracket
    pub fn of(op: Opcode) -> Option<Self> {
        match op {
            Opcode::LoopCell | Opcode::EndCell => Some(BracketFamily::Cell),
            Opcode::LoopChar | Opcode::EndChar => Some(BracketFamily::Character),
            _ => None,
        }
    }
}

/// Find the close bracket matching the open bracket at `start`.
///
/// Returns the address of the matching bracket, or `None` if a full lap of
/// the core found none.
pub fn jump_forward(core: &Core, start: usize, family: BracketFamily) -> Option<usize> {
    scan(core, start, 1, family.open(), family.close())
}

/// Find the open bracket matching the close bracket at `start`.
///
/// Returns the address of the matching bracket, or `None` if a full lap of
/// the core found none.
pub fn jump_backward(core: &Core, start: usize, family: BracketFamily) -> Option<usize> {
    scan(core, start, -1, family.close(), family.open())
}

/// Walk in `direction`, nesting on `deeper` and unwinding on `shallower`.
fn scan(core: &Core, start: usize, direction: isize, deeper: Opcode, shallower: Opcode) -> Option<usize> {
    let start = core.wrap(start);
    let mut pos = start;
    let mut depth: usize = 1;

    loop {
        pos = core.offset(pos, direction);
        let op = core.opcode(pos);
        if op == deeper {
            depth += 1;
        } else if op == shallower {
            depth -= 1;
            if depth == 0 {
                return Some(pos);
            }
        }
        if pos == start {
            return None;
        }
    }
}
