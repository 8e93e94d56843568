//! Wire format.
//!
//! On byte streams each message is:
//!   [4 bytes big-endian length][bincode v2 payload]
//!
//! A datagram carries exactly one bincode v2 payload with no prefix.

use bincode::{Decode, Encode};

use crate::error::ProtocolError;

/// Maximum message size (1 MiB). Prevents allocation bombs.
pub const MAX_MESSAGE_SIZE: u32 = 1024 * 1024;

/// Largest datagram we read; anything bigger is truncated by the kernel.
pub const MAX_DATAGRAM_SIZE: usize = 64 * 1024;

/// Encode a message as a bare bincode v2 payload.
pub fn encode_payload<T: Encode>(msg: &T) -> Result<Vec<u8>, ProtocolError> {
    let config = bincode::config::standard();
    bincode::encode_to_vec(msg, config).map_err(|e| ProtocolError::Serialization(e.to_string()))
}

/// Encode a message to a length-prefixed byte vector.
pub fn encode_message<T: Encode>(msg: &T) -> Result<Vec<u8>, ProtocolError> {
    let payload = encode_payload(msg)?;

    let len = u32::try_from(payload.len())
        .map_err(|_| ProtocolError::Serialization("message too large".to_string()))?;
    if len > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::Serialization(format!(
            "message size {len} exceeds maximum {MAX_MESSAGE_SIZE}"
        )));
    }

    let mut buf = Vec::with_capacity(4 + payload.len());
    buf.extend_from_slice(&len.to_be_bytes());
    buf.extend_from_slice(&payload);
    Ok(buf)
}

/// Decode a message from a bincode v2 payload (without the length prefix).
pub fn decode_message<T: Decode<()>>(payload: &[u8]) -> Result<T, ProtocolError> {
    let config = bincode::config::standard();
    let (msg, _) = bincode::decode_from_slice(payload, config)
        .map_err(|e| ProtocolError::Deserialization(e.to_string()))?;
    Ok(msg)
}
