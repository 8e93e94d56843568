//! Transport endpoints and wire protocol for rpctest services.
//!
//! This crate binds TCP and UDP endpoints for a nettype, encodes calls and
//! replies (via bincode v2), frames them on byte streams, and provides a
//! small client used by tests and diagnostics.

pub mod client;
pub mod error;
pub mod frame;
pub mod transport;
pub mod wire;

pub use client::{call_tcp, call_udp};
pub use error::ProtocolError;
pub use frame::{read_frame, write_frame};
pub use transport::Endpoint;
