//! Minimal client for calling a registered program.

use std::net::SocketAddr;
use std::time::Duration;

use rpctest_types::{CallMessage, ReplyMessage};
use tokio::net::{TcpStream, UdpSocket};
use tracing::debug;

use crate::error::ProtocolError;
use crate::frame::{read_frame, write_frame};
use crate::wire::{self, MAX_DATAGRAM_SIZE};

/// How long a datagram call waits for its reply.
pub const UDP_REPLY_TIMEOUT: Duration = Duration::from_secs(5);

/// Send one call over a fresh TCP connection and wait for the reply.
pub async fn call_tcp(addr: SocketAddr, call: &CallMessage) -> Result<ReplyMessage, ProtocolError> {
    let mut stream = TcpStream::connect(addr)
        .await
        .map_err(|e| ProtocolError::Connection(e.to_string()))?;
    debug!(remote = %addr, xid = call.xid, "tcp call");

    write_frame(&mut stream, call).await?;
    read_frame(&mut stream)
        .await?
        .ok_or(ProtocolError::StreamClosed)
}

/// Send one call as a datagram and wait for the matching reply.
///
/// Replies carrying a different transaction id are discarded.
pub async fn call_udp(addr: SocketAddr, call: &CallMessage) -> Result<ReplyMessage, ProtocolError> {
    let local: SocketAddr = if addr.is_ipv4() {
        ([0, 0, 0, 0], 0).into()
    } else {
        (std::net::Ipv6Addr::UNSPECIFIED, 0).into()
    };
    let socket = UdpSocket::bind(local).await?;
    socket
        .connect(addr)
        .await
        .map_err(|e| ProtocolError::Connection(e.to_string()))?;
    debug!(remote = %addr, xid = call.xid, "udp call");

    socket.send(&wire::encode_payload(call)?).await?;

    let wait = async {
        let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];
        loop {
            let n = socket.recv(&mut buf).await?;
            let reply: ReplyMessage = wire::decode_message(&buf[..n])?;
            if reply.xid == call.xid {
                return Ok::<_, ProtocolError>(reply);
            }
            debug!(xid = reply.xid, "dropping stale reply");
        }
    };

    tokio::time::timeout(UDP_REPLY_TIMEOUT, wait)
        .await
        .map_err(|_| ProtocolError::Timeout(UDP_REPLY_TIMEOUT))?
}
