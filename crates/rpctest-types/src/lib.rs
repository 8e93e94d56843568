//! Shared types for rpctest.
//!
//! This crate contains the identifiers shared across the rpctest workspace:
//! program and version numbers, the square test program, transport
//! protocols and nettypes, and the call/reply messages exchanged with a
//! registered service.

pub mod message;
pub mod nettype;
pub mod program;

pub use message::{CallMessage, ReplyBody, ReplyMessage};
pub use nettype::{Nettype, NettypeError, Protocol};
pub use program::{ProgramId, SquareIn, SquareOut, NULLPROC, SQUAREPROC, SQUARE_PROG, SQUARE_VERS};
