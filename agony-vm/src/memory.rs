//! # Agony Memory
//!
//! The core: a fixed-size circular array of 4-bit cells shared by code and
//! data. Every address wraps modulo the core size, so no out-of-bounds
//! access is representable.
//!
//! Characters are layered on top of the nibbles: the cell *before* a pointer
//! holds the high nibble and the cell *at* the pointer holds the low nibble.

use crate::opcode::Opcode;

/// Core size of the single-program interpreter
pub const DEFAULT_CORE_SIZE: usize = 1500;

/// Mask for the four significant bits of a cell
pub const NIBBLE_MASK: u8 = 0x0f;

/// The circular cell array
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Core {
    cells: Vec<u8>,
}

impl Core {
    /// Create a zeroed core with `size` cells.
    ///
    /// # Panics
    /// Panics if `size` is zero. Configuration validation rejects that
    /// before a core is ever built.
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "core size must be nonzero");
        Self {
            cells: vec![0; size],
        }
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false: a core has at least one cell
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Reduce any address into `[0, len)`
    pub fn wrap(&self, addr: usize) -> usize {
        addr % self.cells.len()
    }

    /// Move `addr` by a signed distance, wrapping in both directions
    pub fn offset(&self, addr: usize, delta: isize) -> usize {
        let size = self.cells.len() as isize;
        let base = (addr % self.cells.len()) as isize;
        (base + delta).rem_euclid(size) as usize
    }

    /// Read the nibble at `addr`
    pub fn read(&self, addr: usize) -> u8 {
        self.cells[self.wrap(addr)]
    }

    /// Write a nibble at `addr`; bits above the low four are dropped
    pub fn write(&mut self, addr: usize, nibble: u8) {
        let addr = self.wrap(addr);
        self.cells[addr] = nibble & NIBBLE_MASK;
    }

    /// Decode the cell at `addr` as an instruction
    pub fn opcode(&self, addr: usize) -> Opcode {
        Opcode::from_nibble(self.read(addr))
    }

    /// Reset every cell to zero
    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    /// All cells, in address order
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    // =========================================================================
    // Character codec
    // =========================================================================

    /// Store `byte` as the character at `pointer`: high nibble at
    /// `pointer - 1`, low nibble at `pointer`.
    pub fn assign_character(&mut self, pointer: usize, byte: u8) {
        let high = self.offset(pointer, -1);
        self.write(high, (byte >> 4) & NIBBLE_MASK);
        self.write(pointer, byte & NIBBLE_MASK);
    }

    /// Read the character whose low nibble sits at `pointer`
    pub fn read_character(&self, pointer: usize) -> u8 {
        let high = self.read(self.offset(pointer, -1));
        self.read(pointer) | (high << 4)
    }

    // =========================================================================
    // Dumps
    // =========================================================================

    /// Render every cell as its instruction symbol
    pub fn disassemble(&self) -> String {
        self.cells
            .iter()
            .map(|&cell| Opcode::from_nibble(cell).symbol())
            .collect()
    }

    /// Render the pointer row that goes under [`Core::disassemble`]:
    /// `#` where both pointers meet, `^` for the execution pointer and `!`
    /// for the cell pointer.
    pub fn pointer_line(&self, cell: usize, exec: usize) -> String {
        let cell = self.wrap(cell);
        let exec = self.wrap(exec);
        (0..self.cells.len())
            .map(|i| match (i == exec, i == cell) {
                (true, true) => '#',
                (true, false) => '^',
                (false, true) => '!',
                (false, false) => ' ',
            })
            .collect()
    }
}

impl Default for Core {
    fn default() -> Self {
        Self::new(DEFAULT_CORE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_read_write_wraps() {
        let mut core = Core::new(8);
        core.write(9, 7);
        assert_eq!(core.read(1), 7);
        assert_eq!(core.read(17), 7);
    }

    #[test]
    fn test_write_masks_to_nibble() {
        let mut core = Core::new(4);
        core.write(0, 0x1f);
        assert_eq!(core.read(0), 0x0f);
    }

    #[test]
    fn test_offset_wraps_both_ways() {
        let core = Core::new(10);
        assert_eq!(core.offset(0, -1), 9);
        assert_eq!(core.offset(0, -2), 8);
        assert_eq!(core.offset(9, 1), 0);
        assert_eq!(core.offset(8, 2), 0);
        assert_eq!(core.offset(3, -23), 0);
    }

    #[test]
    fn test_character_layout() {
        let mut core = Core::new(6);
        core.assign_character(3, 0xa5);
        assert_eq!(core.read(2), 0x0a);
        assert_eq!(core.read(3), 0x05);
        assert_eq!(core.read_character(3), 0xa5);
    }

    #[test]
    fn test_character_at_origin_uses_last_cell() {
        let mut core = Core::new(5);
        core.assign_character(0, 0x4f);
        assert_eq!(core.read(4), 0x04);
        assert_eq!(core.read(0), 0x0f);
        assert_eq!(core.read_character(0), 0x4f);
    }

    #[test]
    fn test_clear() {
        let mut core = Core::new(4);
        core.write(1, 3);
        core.assign_character(3, 0xff);
        core.clear();
        assert!(core.cells().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_disassemble_and_pointer_line() {
        let mut core = Core::new(5);
        core.write(0, Opcode::IncCell.nibble());
        core.write(1, Opcode::LoopCell.nibble());
        core.write(2, Opcode::DecCell.nibble());
        core.write(3, Opcode::EndCell.nibble());
        assert_eq!(core.disassemble(), "@(~)$");
        assert_eq!(core.pointer_line(4, 1), " ^  !");
        assert_eq!(core.pointer_line(2, 2), "  #  ");
    }

    proptest! {
        #[test]
        fn prop_offset_stays_in_range(size in 1usize..5000, addr in 0usize..10_000, delta in -20_000isize..20_000) {
            let core = Core::new(size);
            let moved = core.offset(addr, delta);
            prop_assert!(moved < size);
            prop_assert_eq!(core.offset(moved, -delta), core.wrap(addr));
        }

        #[test]
        fn prop_character_round_trip(size in 2usize..64, pointer in 0usize..128, byte in any::<u8>()) {
            let mut core = Core::new(size);
            core.assign_character(pointer, byte);
            prop_assert_eq!(core.read_character(pointer), byte);
        }
    }
}
