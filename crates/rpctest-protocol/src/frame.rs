//! Length-prefixed framing on byte streams.

use bincode::{Decode, Encode};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::trace;

use crate::error::ProtocolError;
use crate::wire::{self, MAX_MESSAGE_SIZE};

/// Send a message, encoding it as length-prefixed bincode.
pub async fn write_frame<W, T>(stream: &mut W, msg: &T) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
    T: Encode,
{
    let buf = wire::encode_message(msg)?;
    stream
        .write_all(&buf)
        .await
        .map_err(|e| ProtocolError::Connection(e.to_string()))?;
    stream
        .flush()
        .await
        .map_err(|e| ProtocolError::Connection(e.to_string()))?;

    trace!(len = buf.len() - 4, "sent frame");
    Ok(())
}

/// Receive and decode a message.
///
/// Returns `None` if the stream has been cleanly closed by the peer.
pub async fn read_frame<R, T>(stream: &mut R) -> Result<Option<T>, ProtocolError>
where
    R: AsyncRead + Unpin,
    T: Decode<()>,
{
    // Read 4-byte length prefix
    let mut len_buf = [0u8; 4];
    match stream.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(ProtocolError::Connection(e.to_string())),
    }

    let len = u32::from_be_bytes(len_buf);
    if len > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::Deserialization(format!(
            "message size {len} exceeds maximum {MAX_MESSAGE_SIZE}"
        )));
    }

    let mut payload = vec![0u8; len as usize];
    match stream.read_exact(&mut payload).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            return Err(ProtocolError::StreamClosed);
        }
        Err(e) => return Err(ProtocolError::Connection(e.to_string())),
    }

    trace!(len, "received frame");
    wire::decode_message(&payload).map(Some)
}
