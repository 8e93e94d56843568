//! Service registration and dispatch for rpctest.
//!
//! This crate defines the [`ServiceRegistry`] capability the launcher uses
//! to bind a program to one or more transports and then serve it, and the
//! [`Dispatch`] capability a program implements to answer calls. The
//! socket-backed registry lives in [`socket`]; test doubles live in
//! [`mock`] behind the `mock` feature.

use std::sync::Arc;

use rpctest_types::{ProgramId, ReplyBody};

pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod program;
pub mod server;
pub mod socket;
pub mod square;

pub use error::ServiceError;
pub use program::ProgramTable;
pub use socket::{SocketRegistry, SocketRegistryConfig};
pub use square::SquareService;

/// Answers calls addressed to one program version.
pub trait Dispatch: Send + Sync + 'static {
    /// Run `procedure` with the encoded `args` and produce the reply body.
    fn dispatch(&self, procedure: u32, args: &[u8]) -> ReplyBody;
}

/// Binds programs to transports and runs the dispatch loop.
///
/// Registration is synchronous and either succeeds or fails immediately.
/// Nothing registered is ever rolled back by the registry itself.
pub trait ServiceRegistry {
    /// Register `handler` for `program` on the transports selected by
    /// `nettype`. `None` expresses no transport preference.
    fn register(
        &mut self,
        program: ProgramId,
        handler: Arc<dyn Dispatch>,
        nettype: Option<&str>,
    ) -> Result<(), ServiceError>;

    /// Legacy entry point: bind datagram then stream transports explicitly.
    fn register_oldstyle(
        &mut self,
        program: ProgramId,
        handler: Arc<dyn Dispatch>,
    ) -> Result<(), ServiceError>;

    /// Current entry point: register with no transport preference.
    fn register_newstyle(
        &mut self,
        program: ProgramId,
        handler: Arc<dyn Dispatch>,
    ) -> Result<(), ServiceError>;

    /// Serve registered programs. Blocks; returning at all is abnormal.
    fn serve(&mut self) -> Result<(), ServiceError>;
}
