//! Core crate for the mini ISA bus bridge.
//!
//! Two halves: a clocked logic core that samples the external bus
//! lines, decodes bus cycles against an 8-entry register file, and
//! frames each transaction onto a bounded outbound byte channel; and a
//! host-side decoder that regroups that byte stream into structured
//! events for logging and inspection.

/// External bus line model and two-stage input synchronizer.
pub mod signal;
pub use signal::{BusLines, SignalSampler, ADDR_MASK};

/// Synchronous byte-addressable register file.
pub mod regfile;
pub use regfile::{RegisterFile, REGISTER_COUNT};

/// Command tags and the 3-byte frame codec.
pub mod frame;
pub use frame::{CommandTag, Frame, FRAME_LEN};

/// Bounded outbound byte channel between the two domains.
pub mod channel;
pub use channel::{trace_channel, PushError, TraceReceiver, TraceSender, DEFAULT_FIFO_DEPTH};

/// Pin-to-role binding and bridge configuration.
pub mod config;
pub use config::{BridgeConfig, PortMap, PortMapError};

/// Bus-cycle state machine, framer, and data-line driver.
pub mod decoder;
pub use decoder::{CycleDecoder, DataDriver, DecoderState};

/// Assembled synchronous half of the bridge.
pub mod bridge;
pub use bridge::IsaBridge;

/// Host-side stream decoder and event sinks.
pub mod host;
pub use host::{
    BusEvent, ByteSource, EventSink, FramingError, HostDecoder, LogSink, StopToken, VecSink,
};

#[cfg(test)]
use env_logger as _;
#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
