//! Bus-cycle state machine, the framing side of the outbound channel,
//! and the bidirectional data-line driver.
//!
//! The decoder advances exactly one step per clock tick on already
//! synchronized line levels. Each completed bus cycle performs one
//! register-file access and queues one `[tag][address][data]` frame,
//! one byte per framing state. The FIFO push uses a readiness
//! handshake: a state that queues a byte holds (and retries) until the
//! FIFO accepts it, so back-pressure stalls the bus cycle instead of
//! dropping bytes.

use crate::channel::{PushError, TraceSender};
use crate::frame::CommandTag;
use crate::regfile::RegisterFile;
use crate::signal::{BusLines, ADDR_MASK};

/// Bus-cycle decoder state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecoderState {
    /// Waiting for chip select plus a strobe; data driver disabled.
    Idle,
    /// Cycle latched; queueing the address byte and resolving the
    /// transaction direction.
    Prepare,
    /// Driving the stored value onto the data lines.
    Read,
    /// Capturing the external data-line value into the register file.
    Write,
    /// Frame complete; waiting for the bus to release both strobes.
    Cleanup,
}

/// Output driver for the shared bidirectional data lines.
///
/// Disabled whenever the decoder sits in [`DecoderState::Idle`];
/// enabled while a read cycle drives the stored byte and held through
/// cleanup so the value stays valid until the bus releases the cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DataDriver {
    enabled: bool,
    value: u8,
}

impl DataDriver {
    /// Returns the driven level while the driver is enabled.
    #[must_use]
    pub const fn output(&self) -> Option<u8> {
        if self.enabled {
            Some(self.value)
        } else {
            None
        }
    }

    /// Returns true while the bridge owns the data lines.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn drive(&mut self, value: u8) {
        self.enabled = true;
        self.value = value;
    }

    fn release(&mut self) {
        self.enabled = false;
    }
}

/// The clocked bus-transaction decoder.
///
/// Owns the register file, the latched cycle address, and the producer
/// endpoint of the outbound channel. Exactly one bus cycle is in
/// flight at a time; a new cycle cannot begin until cleanup has
/// observed both strobes released. A bus master that never releases
/// its strobes parks the machine in cleanup indefinitely, which is the
/// protocol's own back-pressure, not an error.
#[derive(Debug)]
pub struct CycleDecoder {
    state: DecoderState,
    regfile: RegisterFile,
    latched_addr: u8,
    driver: DataDriver,
    sender: TraceSender,
    addr_queued: bool,
}

impl CycleDecoder {
    /// Creates an idle decoder producing into the given channel
    /// endpoint.
    #[must_use]
    pub fn new(sender: TraceSender) -> Self {
        Self {
            state: DecoderState::Idle,
            regfile: RegisterFile::new(),
            latched_addr: 0,
            driver: DataDriver::default(),
            sender,
            addr_queued: false,
        }
    }

    /// Current state, exposed for harnesses and invariant checks.
    #[must_use]
    pub const fn state(&self) -> DecoderState {
        self.state
    }

    /// The data-line driver as seen by the external bus.
    #[must_use]
    pub const fn driver(&self) -> &DataDriver {
        &self.driver
    }

    /// Committed register-file contents, for inspection.
    #[must_use]
    pub const fn regfile(&self) -> &RegisterFile {
        &self.regfile
    }

    /// Queues one frame byte under the readiness handshake.
    ///
    /// A full FIFO reports `false` and the caller holds its state for
    /// a retry next tick. A disconnected reader accepts the byte into
    /// the void: with no consumer left there is nothing to stall for,
    /// and the bus keeps its timing.
    fn queue_byte(&mut self, byte: u8) -> bool {
        match self.sender.try_push(byte) {
            Ok(()) | Err(PushError::Disconnected) => true,
            Err(PushError::Full) => false,
        }
    }

    /// Advances the machine one clock tick on synchronized lines.
    pub fn tick(&mut self, lines: &BusLines) {
        match self.state {
            DecoderState::Idle => {
                self.driver.release();
                // Read strobe checked first: simultaneous strobes are
                // an out-of-spec bus condition treated as a read.
                if lines.cs && !lines.ior_n {
                    self.begin_cycle(lines.addr, CommandTag::ReadTrace);
                } else if lines.cs && !lines.iow_n {
                    self.begin_cycle(lines.addr, CommandTag::WriteTrace);
                }
            }
            DecoderState::Prepare => {
                if !self.addr_queued {
                    if !self.queue_byte(self.latched_addr) {
                        self.regfile.commit();
                        return;
                    }
                    self.addr_queued = true;
                }
                if !lines.ior_n {
                    self.state = DecoderState::Read;
                } else if !lines.iow_n {
                    self.state = DecoderState::Write;
                }
                // Both strobes released mid-cycle: hold here until the
                // master reasserts one. The address byte is already
                // queued and is not queued again.
            }
            DecoderState::Read => {
                let value = self.regfile.read(self.latched_addr);
                if self.queue_byte(value) {
                    self.driver.drive(value);
                    self.state = DecoderState::Cleanup;
                }
            }
            DecoderState::Write => {
                let value = lines.data;
                if self.queue_byte(value) {
                    self.regfile.write(self.latched_addr, value);
                    self.state = DecoderState::Cleanup;
                }
            }
            DecoderState::Cleanup => {
                if lines.ior_n && lines.iow_n {
                    self.state = DecoderState::Idle;
                }
            }
        }
        self.regfile.commit();
    }

    fn begin_cycle(&mut self, addr: u8, tag: CommandTag) {
        if self.queue_byte(tag.as_u8()) {
            self.latched_addr = addr & ADDR_MASK;
            self.addr_queued = false;
            self.state = DecoderState::Prepare;
        }
    }

    /// Returns the machine, driver, and register file to power-up
    /// state. The channel endpoint is kept.
    pub fn reset(&mut self) {
        self.state = DecoderState::Idle;
        self.latched_addr = 0;
        self.addr_queued = false;
        self.driver = DataDriver::default();
        self.regfile.reset();
    }
}
