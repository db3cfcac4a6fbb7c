//! Assembled synchronous half of the bridge: sampler plus decoder.
//!
//! One [`IsaBridge::tick`] call models one clock edge of the whole
//! hardware domain. Raw external line levels enter the two-stage
//! synchronizer, and the synchronized view feeds the cycle decoder.

use crate::channel::{trace_channel, TraceReceiver, TraceSender};
use crate::config::BridgeConfig;
use crate::decoder::{CycleDecoder, DataDriver, DecoderState};
use crate::regfile::RegisterFile;
use crate::signal::{BusLines, SignalSampler};

/// The complete clocked logic core.
#[derive(Debug)]
pub struct IsaBridge {
    sampler: SignalSampler,
    decoder: CycleDecoder,
}

impl IsaBridge {
    /// Creates a bridge producing into an existing channel endpoint.
    #[must_use]
    pub fn new(sender: TraceSender) -> Self {
        Self {
            sampler: SignalSampler::new(),
            decoder: CycleDecoder::new(sender),
        }
    }

    /// Creates a bridge and its outbound channel from a configuration,
    /// returning the consumer endpoint for the host side.
    #[must_use]
    pub fn with_config(config: &BridgeConfig) -> (Self, TraceReceiver) {
        let (tx, rx) = trace_channel(config.fifo_depth);
        (Self::new(tx), rx)
    }

    /// Advances the hardware domain one clock on raw external lines.
    pub fn tick(&mut self, raw: BusLines) {
        let synced = self.sampler.sample(raw);
        self.decoder.tick(&synced);
    }

    /// Decoder state, for harnesses and invariant checks.
    #[must_use]
    pub const fn state(&self) -> DecoderState {
        self.decoder.state()
    }

    /// The data-line driver as seen by the external bus.
    #[must_use]
    pub const fn driver(&self) -> &DataDriver {
        self.decoder.driver()
    }

    /// Committed register-file contents, for inspection.
    #[must_use]
    pub const fn regfile(&self) -> &RegisterFile {
        self.decoder.regfile()
    }

    /// Returns sampler, decoder, and register file to power-up state.
    pub fn reset(&mut self) {
        self.sampler.reset();
        self.decoder.reset();
    }
}
