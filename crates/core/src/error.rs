//! Decode error taxonomy

use crate::ClientVersion;

/// Classified failure of a single packet decode.
///
/// Every variant is fatal to the packet being decoded; no partial record is
/// ever returned alongside one of these.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A read would consume more bytes than remain in the body.
    #[error("Buffer underrun: needed {requested} byte(s), {available} remaining")]
    BufferUnderrun { requested: usize, available: usize },

    /// An embedded compressed block failed to inflate or inflated to the wrong size.
    #[error("Data error: {0}")]
    DataError(String),

    /// No decode routine is registered for this identifier under the negotiated era.
    #[error("Unrecognized variant: packet 0x{packet_id:02X} for client {version}")]
    UnrecognizedVariant { packet_id: u8, version: ClientVersion },
}

impl DecodeError {
    pub fn underrun(requested: usize, available: usize) -> Self {
        Self::BufferUnderrun {
            requested,
            available,
        }
    }

    pub fn is_underrun(&self) -> bool {
        matches!(self, Self::BufferUnderrun { .. })
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;
