//! Call and reply messages.
//!
//! A call names the program, version and procedure it targets and carries
//! the procedure arguments as an opaque bincode payload. The reply echoes
//! the transaction id so datagram clients can match answers to calls.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::program::ProgramId;

/// A procedure call addressed to a registered program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct CallMessage {
    /// Transaction id chosen by the caller.
    pub xid: u32,
    pub program: ProgramId,
    pub procedure: u32,
    /// Encoded procedure arguments.
    pub args: Vec<u8>,
}

/// The answer to a [`CallMessage`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct ReplyMessage {
    pub xid: u32,
    pub body: ReplyBody,
}

/// Outcome of dispatching a call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub enum ReplyBody {
    /// The procedure ran; payload is the encoded result.
    Success(Vec<u8>),
    /// No such program is registered.
    ProgUnavail,
    /// The program exists but not at the requested version.
    ProgMismatch { low: u32, high: u32 },
    /// The program does not implement the procedure.
    ProcUnavail,
    /// The arguments could not be decoded.
    GarbageArgs,
    /// The procedure failed while running.
    SystemErr,
}

impl ReplyBody {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}
