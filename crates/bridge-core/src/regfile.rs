//! Synchronous 8-entry byte register file exposed on the bus.
//!
//! Single read port, single write port, both indexed by the latched
//! 3-bit address and both owned exclusively by the cycle decoder.
//! Writes stage for one clock and commit at the tick boundary, so a
//! read issued in the same tick as a write still observes the old
//! value (read-before-write semantics).

use crate::signal::ADDR_MASK;

/// Number of byte registers exposed on the bus.
pub const REGISTER_COUNT: usize = 8;

/// Byte-addressable storage backing the bus device.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RegisterFile {
    cells: [u8; REGISTER_COUNT],
    staged: Option<(usize, u8)>,
}

impl RegisterFile {
    /// Creates a register file with every cell at its power-up value
    /// of zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the committed value at a 3-bit address.
    ///
    /// A write staged earlier in the same tick is not yet visible.
    #[must_use]
    pub const fn read(&self, addr: u8) -> u8 {
        self.cells[(addr & ADDR_MASK) as usize]
    }

    /// Stages a write to a 3-bit address for commit at the end of the
    /// current tick. At most one write port exists, so a second stage
    /// in the same tick replaces the first.
    #[allow(clippy::missing_const_for_fn)]
    pub fn write(&mut self, addr: u8, value: u8) {
        self.staged = Some(((addr & ADDR_MASK) as usize, value));
    }

    /// Commits a staged write, making it visible to later reads.
    /// Called once per clock by the cycle decoder.
    #[allow(clippy::missing_const_for_fn)]
    pub fn commit(&mut self) {
        if let Some((index, value)) = self.staged.take() {
            self.cells[index] = value;
        }
    }

    /// Clears every cell and any staged write back to power-up state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::{RegisterFile, REGISTER_COUNT};

    #[test]
    fn power_up_state_is_all_zero() {
        let file = RegisterFile::new();
        assert_eq!(REGISTER_COUNT, 8);
        for addr in 0..8u8 {
            assert_eq!(file.read(addr), 0);
        }
    }

    #[test]
    fn committed_write_round_trips() {
        let mut file = RegisterFile::new();
        file.write(3, 0xBE);
        file.commit();
        assert_eq!(file.read(3), 0xBE);
    }

    #[test]
    fn same_tick_read_observes_value_before_write() {
        let mut file = RegisterFile::new();
        file.write(5, 0x11);
        file.commit();

        file.write(5, 0x22);
        assert_eq!(file.read(5), 0x11);
        file.commit();
        assert_eq!(file.read(5), 0x22);
    }

    #[test]
    fn addresses_wrap_at_the_3_bit_boundary() {
        let mut file = RegisterFile::new();
        file.write(0b1010, 0x44);
        file.commit();
        assert_eq!(file.read(0b010), 0x44);
    }

    #[test]
    fn reset_discards_cells_and_staged_write() {
        let mut file = RegisterFile::new();
        file.write(1, 0x55);
        file.commit();
        file.write(2, 0x66);
        file.reset();
        file.commit();

        assert_eq!(file.read(1), 0);
        assert_eq!(file.read(2), 0);
    }
}
