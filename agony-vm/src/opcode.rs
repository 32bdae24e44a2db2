//! # Agony Opcodes
//!
//! The closed, 16-entry instruction set. Every nibble is a valid opcode, so a
//! cell read by the execution pointer always decodes; there is no "invalid
//! instruction" state.
//!
//! | Code | Symbol | Opcode      |
//! |------|--------|-------------|
//! | 0    | `$`    | `Halt`      |
//! | 1    | `}`    | `Right`     |
//! | 2    | `{`    | `Left`      |
//! | 3    | `>`    | `RightTwo`  |
//! | 4    | `<`    | `LeftTwo`   |
//! | 5    | `@`    | `IncCell`   |
//! | 6    | `~`    | `DecCell`   |
//! | 7    | `+`    | `IncChar`   |
//! | 8    | `-`    | `DecChar`   |
//! | 9    | `.`    | `Output`    |
//! | 10   | `,`    | `Input`     |
//! | 11   | `(`    | `LoopCell`  |
//! | 12   | `)`    | `EndCell`   |
//! | 13   | `[`    | `LoopChar`  |
//! | 14   | `]`    | `EndChar`   |
//! | 15   | `*`    | `Swap`      |

use serde::{Deserialize, Serialize};
use std::fmt;

/// Program symbols in opcode order
pub const SYMBOLS: [char; 16] = [
    '$', '}', '{', '>', '<', '@', '~', '+', '-', '.', ',', '(', ')', '[', ']', '*',
];

/// Agony opcode - one nibble of the core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Opcode {
    // =========================================================================
    // CONTROL
    // =========================================================================
    /// Halt the program
    Halt = 0,

    // =========================================================================
    // POINTER MOVEMENT - the cell pointer only
    // =========================================================================
    /// Move the cell pointer one cell right
    Right = 1,
    /// Move the cell pointer one cell left
    Left = 2,
    /// Move the cell pointer two cells right (one character)
    RightTwo = 3,
    /// Move the cell pointer two cells left (one character)
    LeftTwo = 4,

    // =========================================================================
    // ARITHMETIC
    // =========================================================================
    /// Increment the cell, mod 16
    IncCell = 5,
    /// Decrement the cell, mod 16
    DecCell = 6,
    /// Increment the character, mod 256
    IncChar = 7,
    /// Decrement the character, mod 256
    DecChar = 8,

    // =========================================================================
    // I/O - no-ops inside the arena
    // =========================================================================
    /// Write the character to the output stream
    Output = 9,
    /// Read a character from the input stream (end of input reads as 0)
    Input = 10,

    // =========================================================================
    // BRACKETS
    // =========================================================================
    /// Jump past the matching `)` if the cell is zero
    LoopCell = 11,
    /// Jump back to the matching `(` if the cell is nonzero
    EndCell = 12,
    /// Jump past the matching `]` if the character is zero
    LoopChar = 13,
    /// Jump back to the matching `[` if the character is nonzero
    EndChar = 14,

    // =========================================================================
    // BUFFER
    // =========================================================================
    /// Swap the character with the buffer register (no-op inside the arena)
    Swap = 15,
}

impl Opcode {
    /// All opcodes, indexed by their nibble value
    pub const ALL: [Opcode; 16] = [
        Opcode::Halt,
        Opcode::Right,
        Opcode::Left,
        Opcode::RightTwo,
        Opcode::LeftTwo,
        Opcode::IncCell,
        Opcode::DecCell,
        Opcode::IncChar,
        Opcode::DecChar,
        Opcode::Output,
        Opcode::Input,
        Opcode::LoopCell,
        Opcode::EndCell,
        Opcode::LoopChar,
        Opcode::EndChar,
        Opcode::Swap,
    ];

    /// Decode a cell. Only the low four bits are significant.
    pub fn from_nibble(nibble: u8) -> Self {
        Self::ALL[(nibble & 0x0f) as usize]
    }

    /// Look up the opcode for a program symbol
    pub fn from_symbol(symbol: char) -> Option<Self> {
        SYMBOLS
            .iter()
            .position(|&s| s == symbol)
            .map(|i| Self::ALL[i])
    }

    /// The nibble stored in the core for this opcode
    pub fn nibble(self) -> u8 {
        self as u8
    }

    /// The program symbol for this opcode
    pub fn symbol(self) -> char {
        SYMBOLS[self as usize]
    }

    /// Get the opcode name (for display/logging)
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Halt => "HALT",
            Opcode::Right => "RIGHT",
            Opcode::Left => "LEFT",
            Opcode::RightTwo => "RIGHT_TWO",
            Opcode::LeftTwo => "LEFT_TWO",
            Opcode::IncCell => "INC_CELL",
            Opcode::DecCell => "DEC_CELL",
            Opcode::IncChar => "INC_CHAR",
            Opcode::DecChar => "DEC_CHAR",
            Opcode::Output => "OUTPUT",
            Opcode::Input => "INPUT",
            Opcode::LoopCell => "LOOP_CELL",
            Opcode::EndCell => "END_CELL",
            Opcode::LoopChar => "LOOP_CHAR",
            Opcode::EndChar => "END_CHAR",
            Opcode::Swap => "SWAP",
        }
    }

    /// One-line description of the instruction's effect
    pub fn description(&self) -> &'static str {
        match self {
            Opcode::Halt => "Halt the program here",
            Opcode::Right => "Move pointer right",
            Opcode::Left => "Move pointer left",
            Opcode::RightTwo => "Move pointer right 2 cells",
            Opcode::LeftTwo => "Move pointer left 2 cells",
            Opcode::IncCell => "Increment cell",
            Opcode::DecCell => "Decrement cell",
            Opcode::IncChar => "Increment character",
            Opcode::DecChar => "Decrement character",
            Opcode::Output => "Output the character (2 cells) at pointer-1 and pointer",
            Opcode::Input => "Input a character (2 cells) to pointer-1 and pointer",
            Opcode::LoopCell => "Jump past the matching ) if the cell under the pointer is zero",
            Opcode::EndCell => "Jump back to the matching ( if the cell under the pointer is nonzero",
            Opcode::LoopChar => {
                "Jump past the matching ] if the character under the pointer is zero"
            }
            Opcode::EndChar => {
                "Jump back to the matching [ if the character under the pointer is nonzero"
            }
            Opcode::Swap => "Swap the character at pointer with the buffer (initially 0000 0000)",
        }
    }

    /// Check if this opcode belongs to either bracket family
    pub fn is_bracket(&self) -> bool {
        matches!(
            self,
            Opcode::LoopCell | Opcode::EndCell | Opcode::LoopChar | Opcode::EndChar
        )
    }

    /// Check if the opcode only has an effect outside the arena
    pub fn is_host_only(&self) -> bool {
        matches!(self, Opcode::Output | Opcode::Input | Opcode::Swap)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A decoded program: the source text plus the opcodes it loads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    source: String,
    code: Vec<Opcode>,
}

impl Program {
    /// Decode program text. Characters that are not instruction symbols are
    /// skipped without error.
    pub fn parse(source: impl Into<String>) -> Self {
        let source = source.into();
        let code = source.chars().filter_map(Opcode::from_symbol).collect();
        Self { source, code }
    }

    /// The original program text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Decoded opcodes, in load order
    pub fn code(&self) -> &[Opcode] {
        &self.code
    }

    /// Number of cells the program occupies once loaded
    pub fn len(&self) -> usize {
        self.code.len()
    }

    /// Check if the program loads no cells at all
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Length of the source text in characters, including skipped ones.
    ///
    /// This is the length the arena checks against its maximum.
    pub fn source_len(&self) -> usize {
        self.source.chars().count()
    }

    /// Canonical rendering: only the instruction symbols
    pub fn to_source(&self) -> String {
        self.code.iter().map(|op| op.symbol()).collect()
    }

    /// Print the program listing
    pub fn pretty_print(&self) {
        println!("Instructions: {}", self.code.len());
        for (i, op) in self.code.iter().enumerate() {
            println!("{:4} | {}  {:<10} {}", i, op.symbol(), op.mnemonic(), op.description());
        }
        println!();
    }
}

impl From<&str> for Program {
    fn from(source: &str) -> Self {
        Program::parse(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_table_matches_nibbles() {
        for (i, op) in Opcode::ALL.iter().enumerate() {
            assert_eq!(op.nibble() as usize, i);
            assert_eq!(Opcode::from_nibble(i as u8), *op);
            assert_eq!(Opcode::from_symbol(op.symbol()), Some(*op));
        }
    }

    #[test]
    fn test_unknown_symbols() {
        assert_eq!(Opcode::from_symbol('a'), None);
        assert_eq!(Opcode::from_symbol(' '), None);
        assert_eq!(Opcode::from_symbol('\n'), None);
    }

    #[test]
    fn test_from_nibble_masks_high_bits() {
        assert_eq!(Opcode::from_nibble(0x10), Opcode::Halt);
        assert_eq!(Opcode::from_nibble(0xff), Opcode::Swap);
    }

    #[test]
    fn test_program_parse_skips_comments() {
        let program = Program::parse("@ increment ( ~ )\n");
        assert_eq!(
            program.code(),
            &[Opcode::IncCell, Opcode::LoopCell, Opcode::DecCell, Opcode::EndCell]
        );
        assert_eq!(program.len(), 4);
        assert_eq!(program.source_len(), 18);
        assert_eq!(program.to_source(), "@(~)");
    }

    #[test]
    fn test_is_bracket() {
        let brackets: Vec<_> = Opcode::ALL.iter().filter(|op| op.is_bracket()).collect();
        assert_eq!(brackets.len(), 4);
        assert!(!Opcode::Halt.is_bracket());
        assert!(Opcode::Swap.is_host_only());
    }

    #[test]
    fn test_opcode_serialization() {
        let json = serde_json::to_string(&Opcode::LoopChar).unwrap();
        assert_eq!(json, "\"LOOP_CHAR\"");

        let parsed: Opcode = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Opcode::LoopChar);
        assert_eq!(json.trim_matches('"'), Opcode::LoopChar.mnemonic());
    }
}
