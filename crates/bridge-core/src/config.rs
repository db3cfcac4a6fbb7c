//! Pin-to-role binding and top-level bridge configuration.
//!
//! The core never consults physical pin numbers at runtime; the
//! decoder only sees signal roles. [`PortMap`] exists so an embedding
//! that owns real I/O can carry the role-to-pin assignment alongside
//! the core, with the concrete default layout the reference hardware
//! uses.

use thiserror::Error;

use crate::channel::DEFAULT_FIFO_DEPTH;

/// Role-to-physical-pin assignment for the bus lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct PortMap {
    /// Address lines A0..A2.
    pub addr: [u8; 3],
    /// Bidirectional data lines D0..D7.
    pub data: [u8; 8],
    /// Chip select line.
    pub cs: u8,
    /// Read strobe line (active low).
    pub ior: u8,
    /// Write strobe line (active low).
    pub iow: u8,
    /// First interrupt line.
    pub irq: u8,
    /// Second interrupt line.
    pub irq2: u8,
}

impl Default for PortMap {
    /// Reference layout: address on pins 0-2, data on pins 3-10, then
    /// cs, ior, iow, irq, irq2 on pins 11-15.
    fn default() -> Self {
        Self {
            addr: [0, 1, 2],
            data: [3, 4, 5, 6, 7, 8, 9, 10],
            cs: 11,
            ior: 12,
            iow: 13,
            irq: 14,
            irq2: 15,
        }
    }
}

/// Invalid pin assignment in a [`PortMap`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortMapError {
    /// The same physical pin is bound to more than one signal role.
    #[error("pin {pin} is bound to more than one signal role")]
    DuplicatePin {
        /// The doubly assigned physical pin number.
        pin: u8,
    },
}

impl PortMap {
    /// Checks that every signal role is bound to a distinct pin.
    ///
    /// # Errors
    ///
    /// Returns [`PortMapError::DuplicatePin`] naming the first pin
    /// bound to two roles.
    pub fn validate(&self) -> Result<(), PortMapError> {
        let mut pins = Vec::with_capacity(16);
        pins.extend_from_slice(&self.addr);
        pins.extend_from_slice(&self.data);
        pins.extend_from_slice(&[self.cs, self.ior, self.iow, self.irq, self.irq2]);
        pins.sort_unstable();
        for pair in pins.windows(2) {
            if pair[0] == pair[1] {
                return Err(PortMapError::DuplicatePin { pin: pair[0] });
            }
        }
        Ok(())
    }
}

/// Top-level configuration for one bridge instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct BridgeConfig {
    /// Role-to-pin assignment carried for the embedding.
    pub port_map: PortMap,
    /// Depth of the outbound byte FIFO.
    pub fifo_depth: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            port_map: PortMap::default(),
            fifo_depth: DEFAULT_FIFO_DEPTH,
        }
    }
}
