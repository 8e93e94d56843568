//! Serve loop: one task per endpoint, one task per TCP connection.

use std::sync::Arc;

use rpctest_protocol::transport::AsyncEndpoint;
use rpctest_protocol::wire::{self, MAX_DATAGRAM_SIZE};
use rpctest_protocol::{read_frame, write_frame, Endpoint};
use rpctest_types::CallMessage;
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::error::ServiceError;
use crate::program::ProgramTable;

/// Serve `programs` on every endpoint until all endpoints stop.
///
/// Must be called from within a runtime context. Endpoints only stop on
/// fatal socket errors, so a return from here means the service is gone.
pub async fn run(endpoints: Vec<Endpoint>, programs: Arc<ProgramTable>) -> Result<(), ServiceError> {
    if endpoints.is_empty() {
        return Err(ServiceError::NoEndpoints);
    }

    let mut tasks = JoinSet::new();
    for endpoint in endpoints {
        let addr = endpoint.local_addr()?;
        match endpoint.into_async()? {
            AsyncEndpoint::Tcp(listener) => {
                info!(addr = %addr, "serving tcp");
                tasks.spawn(serve_tcp(listener, Arc::clone(&programs)));
            }
            AsyncEndpoint::Udp(socket) => {
                info!(addr = %addr, "serving udp");
                tasks.spawn(serve_udp(socket, Arc::clone(&programs)));
            }
        }
    }

    while let Some(result) = tasks.join_next().await {
        match result {
            Ok(Ok(())) => warn!("endpoint stopped"),
            Ok(Err(e)) => warn!(error = %e, "endpoint failed"),
            Err(e) => warn!(error = %e, "endpoint task panicked"),
        }
    }
    Ok(())
}

async fn serve_tcp(listener: TcpListener, programs: Arc<ProgramTable>) -> Result<(), ServiceError> {
    loop {
        match listener.accept().await {
            Ok((stream, remote)) => {
                debug!(remote = %remote, "accepted connection");
                tokio::spawn(handle_connection(stream, Arc::clone(&programs)));
            }
            Err(e) => {
                debug!(error = %e, "accept error");
            }
        }
    }
}

async fn handle_connection(mut stream: TcpStream, programs: Arc<ProgramTable>) {
    loop {
        let call: CallMessage = match read_frame(&mut stream).await {
            Ok(Some(call)) => call,
            Ok(None) => break,
            Err(e) => {
                debug!(error = %e, "dropping connection");
                break;
            }
        };

        let reply = programs.dispatch(&call);
        if let Err(e) = write_frame(&mut stream, &reply).await {
            debug!(error = %e, "failed to send reply");
            break;
        }
    }
}

async fn serve_udp(socket: UdpSocket, programs: Arc<ProgramTable>) -> Result<(), ServiceError> {
    let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];
    loop {
        let (n, peer) = match socket.recv_from(&mut buf).await {
            Ok(received) => received,
            Err(e) => {
                debug!(error = %e, "receive error");
                continue;
            }
        };

        // Without a decodable call there is no xid to answer to.
        let call: CallMessage = match wire::decode_message(&buf[..n]) {
            Ok(call) => call,
            Err(e) => {
                debug!(peer = %peer, error = %e, "dropping datagram");
                continue;
            }
        };

        let reply = programs.dispatch(&call);
        match wire::encode_payload(&reply) {
            Ok(bytes) => {
                if let Err(e) = socket.send_to(&bytes, peer).await {
                    debug!(peer = %peer, error = %e, "failed to send reply");
                }
            }
            Err(e) => warn!(error = %e, "failed to encode reply"),
        }
    }
}
