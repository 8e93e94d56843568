//! Service registry errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Nettype(#[from] rpctest_types::NettypeError),

    #[error("protocol error: {0}")]
    Protocol(#[from] rpctest_protocol::ProtocolError),

    #[error("no transports registered")]
    NoEndpoints,

    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
