//! Protocol and transport errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("failed to bind {protocol} endpoint on {addr}: {source}")]
    Bind {
        protocol: rpctest_types::Protocol,
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("serialisation error: {0}")]
    Serialization(String),

    #[error("deserialisation error: {0}")]
    Deserialization(String),

    #[error("stream closed unexpectedly")]
    StreamClosed,

    #[error("no reply within {0:?}")]
    Timeout(std::time::Duration),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
