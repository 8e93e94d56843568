//! Endpoint binding for TCP and UDP.
//!
//! Endpoints are bound with blocking std sockets so they can be created
//! before the process detaches and before any async runtime exists. They
//! are converted to tokio sockets only once serving starts.

use std::net::{SocketAddr, TcpListener, UdpSocket};

use rpctest_types::Protocol;
use tracing::info;

use crate::error::ProtocolError;

/// A bound, not yet serving, transport endpoint.
#[derive(Debug)]
pub enum Endpoint {
    Tcp(TcpListener),
    Udp(UdpSocket),
}

/// An endpoint registered with the async runtime.
#[derive(Debug)]
pub enum AsyncEndpoint {
    Tcp(tokio::net::TcpListener),
    Udp(tokio::net::UdpSocket),
}

impl Endpoint {
    /// Bind an endpoint of the given protocol.
    pub fn bind(protocol: Protocol, addr: SocketAddr) -> Result<Self, ProtocolError> {
        let endpoint = match protocol {
            Protocol::Tcp => TcpListener::bind(addr).map(Self::Tcp),
            Protocol::Udp => UdpSocket::bind(addr).map(Self::Udp),
        }
        .map_err(|source| ProtocolError::Bind {
            protocol,
            addr,
            source,
        })?;

        info!(protocol = %protocol, addr = %endpoint.local_addr()?, "endpoint bound");
        Ok(endpoint)
    }

    pub fn protocol(&self) -> Protocol {
        match self {
            Self::Tcp(_) => Protocol::Tcp,
            Self::Udp(_) => Protocol::Udp,
        }
    }

    /// Get the local address this endpoint is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, ProtocolError> {
        let addr = match self {
            Self::Tcp(l) => l.local_addr()?,
            Self::Udp(s) => s.local_addr()?,
        };
        Ok(addr)
    }

    /// Hand the socket over to tokio.
    ///
    /// Must be called from within a runtime context.
    pub fn into_async(self) -> Result<AsyncEndpoint, ProtocolError> {
        match self {
            Self::Tcp(listener) => {
                listener.set_nonblocking(true)?;
                Ok(AsyncEndpoint::Tcp(tokio::net::TcpListener::from_std(
                    listener,
                )?))
            }
            Self::Udp(socket) => {
                socket.set_nonblocking(true)?;
                Ok(AsyncEndpoint::Udp(tokio::net::UdpSocket::from_std(socket)?))
            }
        }
    }
}
