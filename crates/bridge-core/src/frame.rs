//! Command tags and the 3-byte frame codec for the outbound channel.
//!
//! Every completed bus cycle is reported to the host as exactly one
//! frame in fixed `[tag][address][data]` order. Frames are never
//! interleaved: the cycle decoder is the channel's only producer and
//! queues all three bytes of a cycle before starting the next one.

/// Number of bytes in one outbound frame.
pub const FRAME_LEN: usize = 3;

/// Enumerated command byte identifying the kind of framed event.
///
/// Only [`CommandTag::ReadTrace`] and [`CommandTag::WriteTrace`] are
/// emitted by the current transaction protocol; the remaining values
/// are reserved wire codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum CommandTag {
    /// Reserved no-operation code.
    Nop = 0x00,
    /// Reserved plain-read code.
    Read = 0x01,
    /// Reserved plain-write code.
    Write = 0x02,
    /// Trace record for a completed read cycle.
    ReadTrace = 0x03,
    /// Trace record for a completed write cycle.
    WriteTrace = 0x04,
}

impl CommandTag {
    /// Converts the tag to its stable wire byte.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Converts a wire byte back into a known tag.
    #[must_use]
    pub const fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Self::Nop),
            0x01 => Some(Self::Read),
            0x02 => Some(Self::Write),
            0x03 => Some(Self::ReadTrace),
            0x04 => Some(Self::WriteTrace),
            _ => None,
        }
    }
}

/// One decoded bus transaction as it appears on the outbound channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Frame {
    /// Transaction kind.
    pub tag: CommandTag,
    /// Latched 3-bit bus address, in the low bits of the byte.
    pub address: u8,
    /// Data byte read from or written to the register file.
    pub data: u8,
}

impl Frame {
    /// Serializes the frame into wire order `[tag][address][data]`.
    #[must_use]
    pub const fn to_bytes(self) -> [u8; FRAME_LEN] {
        [self.tag.as_u8(), self.address, self.data]
    }

    /// Rebuilds a frame from three wire bytes.
    ///
    /// Returns `None` when the first byte is not a known command tag.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; FRAME_LEN]) -> Option<Self> {
        match CommandTag::from_u8(bytes[0]) {
            Some(tag) => Some(Self {
                tag,
                address: bytes[1],
                data: bytes[2],
            }),
            None => None,
        }
    }
}
