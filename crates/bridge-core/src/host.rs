//! Host-side decoder that regroups the outbound byte stream into
//! structured bus events.
//!
//! The decoder performs a blocking read of one byte at a time, three
//! per event, and reports each event to a sink. It deliberately does
//! not validate that byte boundaries align with frame boundaries: if a
//! byte is ever lost or duplicated upstream, the decoder silently
//! desynchronizes and every following event is misattributed. That
//! fragility is part of the modeled protocol; only a failure of the
//! underlying stream itself surfaces as an error.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::debug;
use thiserror::Error;

use crate::channel::TraceReceiver;
use crate::frame::CommandTag;

/// Host-side stream failure.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FramingError {
    /// The byte source closed; no further events can be decoded.
    #[error("trace byte source closed")]
    SourceClosed,
}

/// Blocking single-byte input consumed by the host decoder.
pub trait ByteSource {
    /// Blocks until one byte is available.
    ///
    /// # Errors
    ///
    /// Returns [`FramingError::SourceClosed`] when the stream ends.
    fn read_byte(&mut self) -> Result<u8, FramingError>;
}

impl ByteSource for TraceReceiver {
    fn read_byte(&mut self) -> Result<u8, FramingError> {
        self.recv().ok_or(FramingError::SourceClosed)
    }
}

/// One regrouped 3-byte event as observed by the host.
///
/// Carries the raw tag byte: the decoder performs no validation, so a
/// desynchronized stream yields events whose "tag" is really an
/// address or data byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BusEvent {
    /// First byte of the group, nominally the command tag.
    pub raw_tag: u8,
    /// Second byte of the group, nominally the latched address.
    pub address: u8,
    /// Third byte of the group, nominally the data byte.
    pub data: u8,
}

impl BusEvent {
    /// Interprets the raw tag byte, when it is a known command code.
    #[must_use]
    pub const fn tag(&self) -> Option<CommandTag> {
        CommandTag::from_u8(self.raw_tag)
    }
}

/// Destination for decoded events.
pub trait EventSink {
    /// Records one event in stream order.
    fn on_event(&mut self, event: &BusEvent);
}

/// Sink that reports every event through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn on_event(&mut self, event: &BusEvent) {
        debug!(
            "isa event: cmd={:#04x} addr={:#04x} data={:#04x}",
            event.raw_tag, event.address, event.data
        );
    }
}

/// Sink that collects events for inspection in tests and harnesses.
#[derive(Debug, Default, Clone)]
pub struct VecSink {
    /// Events in arrival order.
    pub events: Vec<BusEvent>,
}

impl EventSink for VecSink {
    fn on_event(&mut self, event: &BusEvent) {
        self.events.push(*event);
    }
}

/// Cloneable cancellation flag for the host read loop.
///
/// The original consumer loops unboundedly with no shutdown signal;
/// the token makes the loop cancellable while an unset token preserves
/// that run-forever default. The token is only observed between
/// events, so a loop blocked inside a read ends when the producer side
/// is dropped.
#[derive(Debug, Default, Clone)]
pub struct StopToken(Arc<AtomicBool>);

impl StopToken {
    /// Creates an unset token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that the read loop stop before its next event.
    pub fn request_stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns true once a stop has been requested.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// The host consumer: drains a byte source and regroups every three
/// consecutive bytes into a [`BusEvent`].
#[derive(Debug)]
pub struct HostDecoder<R, S> {
    source: R,
    sink: S,
}

impl<R: ByteSource, S: EventSink> HostDecoder<R, S> {
    /// Creates a decoder over a byte source and an event sink.
    pub const fn new(source: R, sink: S) -> Self {
        Self { source, sink }
    }

    /// Reads exactly three bytes, regroups them, and reports the
    /// event to the sink.
    ///
    /// # Errors
    ///
    /// Returns [`FramingError::SourceClosed`] when the stream ends,
    /// including between the bytes of a group.
    pub fn read_event(&mut self) -> Result<BusEvent, FramingError> {
        let raw_tag = self.source.read_byte()?;
        let address = self.source.read_byte()?;
        let data = self.source.read_byte()?;

        let event = BusEvent {
            raw_tag,
            address,
            data,
        };
        self.sink.on_event(&event);
        Ok(event)
    }

    /// Decodes events until the source closes or the token is set.
    pub fn run(&mut self, stop: &StopToken) {
        while !stop.is_stopped() {
            if self.read_event().is_err() {
                return;
            }
        }
    }

    /// Consumes the decoder and returns its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }
}
