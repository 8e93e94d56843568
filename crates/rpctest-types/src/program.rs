//! Program identity and the square test program.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Program number of the square test service.
pub const SQUARE_PROG: u32 = 0x3123_0000;

/// The only version of the square program.
pub const SQUARE_VERS: u32 = 1;

/// The null procedure every program answers with an empty result.
pub const NULLPROC: u32 = 0;

/// Procedure computing the square of its argument.
pub const SQUAREPROC: u32 = 1;

/// A (program, version) pair a service is registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub struct ProgramId {
    pub program: u32,
    pub version: u32,
}

impl ProgramId {
    pub const fn new(program: u32, version: u32) -> Self {
        Self { program, version }
    }

    /// Identity of the square test program.
    pub const fn square() -> Self {
        Self::new(SQUARE_PROG, SQUARE_VERS)
    }
}

impl std::fmt::Display for ProgramId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}/{}", self.program, self.version)
    }
}

/// Argument of `SQUAREPROC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct SquareIn {
    pub arg1: i64,
}

/// Result of `SQUAREPROC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct SquareOut {
    pub res1: i64,
}
