//! Bounded outbound byte channel between the clocked core and the
//! host consumer.
//!
//! The channel is a strict FIFO: bytes are observed in emission order,
//! never reordered, never duplicated. The hardware side pushes without
//! blocking (a full FIFO stalls the cycle decoder instead, see
//! [`crate::decoder`]); the host side performs blocking single-byte
//! reads.

use std::sync::mpsc::{self, Receiver, SyncSender, TryRecvError, TrySendError};

use thiserror::Error;

/// Default depth of the outbound FIFO, in bytes.
pub const DEFAULT_FIFO_DEPTH: usize = 64;

/// Failure modes for a non-blocking push from the hardware domain.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PushError {
    /// The FIFO is at capacity; the producer must hold and retry.
    #[error("outbound fifo is full")]
    Full,
    /// The host-side reader is gone; no byte can ever be drained.
    #[error("outbound fifo reader disconnected")]
    Disconnected,
}

/// Creates a bounded outbound channel of the given depth.
#[must_use]
pub fn trace_channel(depth: usize) -> (TraceSender, TraceReceiver) {
    let (tx, rx) = mpsc::sync_channel(depth);
    (TraceSender { tx }, TraceReceiver { rx })
}

/// Producer endpoint owned by the framing side of the cycle decoder.
#[derive(Debug, Clone)]
pub struct TraceSender {
    tx: SyncSender<u8>,
}

impl TraceSender {
    /// Queues one byte without blocking.
    ///
    /// # Errors
    ///
    /// Returns [`PushError::Full`] when the FIFO has no room and
    /// [`PushError::Disconnected`] when the receiver was dropped.
    pub fn try_push(&self, byte: u8) -> Result<(), PushError> {
        self.tx.try_send(byte).map_err(|err| match err {
            TrySendError::Full(_) => PushError::Full,
            TrySendError::Disconnected(_) => PushError::Disconnected,
        })
    }
}

/// Consumer endpoint drained toward the host decoder.
#[derive(Debug)]
pub struct TraceReceiver {
    rx: Receiver<u8>,
}

impl TraceReceiver {
    /// Blocks until one byte is available.
    ///
    /// Returns `None` once the producer is dropped and the FIFO is
    /// drained.
    #[must_use]
    pub fn recv(&self) -> Option<u8> {
        self.rx.recv().ok()
    }

    /// Takes one byte if immediately available.
    ///
    /// Returns `None` when the FIFO is currently empty or the
    /// producer is gone.
    #[must_use]
    pub fn try_recv(&self) -> Option<u8> {
        match self.rx.try_recv() {
            Ok(byte) => Some(byte),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}
