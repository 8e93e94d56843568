//! Socket-backed [`ServiceRegistry`].

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use rpctest_protocol::Endpoint;
use rpctest_types::{Nettype, ProgramId, Protocol};
use tracing::{debug, info};

use crate::error::ServiceError;
use crate::program::ProgramTable;
use crate::{server, Dispatch, ServiceRegistry};

/// Where endpoints are bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocketRegistryConfig {
    pub bind: IpAddr,
    /// `0` picks an ephemeral port per endpoint.
    pub port: u16,
}

impl Default for SocketRegistryConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 0,
        }
    }
}

/// Binds one std socket per protocol and serves every registered program
/// on all of them.
///
/// Sockets are created at registration time so they exist before the
/// process detaches; the async runtime is only built by [`serve`].
///
/// [`serve`]: ServiceRegistry::serve
#[derive(Debug)]
pub struct SocketRegistry {
    config: SocketRegistryConfig,
    endpoints: Vec<Endpoint>,
    programs: ProgramTable,
}

impl SocketRegistry {
    pub fn new(config: SocketRegistryConfig) -> Self {
        Self {
            config,
            endpoints: Vec::new(),
            programs: ProgramTable::new(),
        }
    }

    /// Addresses of the endpoints bound so far.
    pub fn local_addrs(&self) -> Vec<(Protocol, SocketAddr)> {
        self.endpoints
            .iter()
            .filter_map(|e| e.local_addr().ok().map(|addr| (e.protocol(), addr)))
            .collect()
    }

    fn ensure_bound(&mut self, protocol: Protocol) -> Result<(), ServiceError> {
        if self.endpoints.iter().any(|e| e.protocol() == protocol) {
            debug!(protocol = %protocol, "endpoint already bound");
            return Ok(());
        }
        let addr = SocketAddr::new(self.config.bind, self.config.port);
        self.endpoints.push(Endpoint::bind(protocol, addr)?);
        Ok(())
    }

    fn register_protocols(
        &mut self,
        program: ProgramId,
        handler: Arc<dyn Dispatch>,
        protocols: &[Protocol],
    ) -> Result<(), ServiceError> {
        for protocol in protocols {
            self.ensure_bound(*protocol)?;
        }
        self.programs.insert(program, handler);
        Ok(())
    }
}

impl ServiceRegistry for SocketRegistry {
    fn register(
        &mut self,
        program: ProgramId,
        handler: Arc<dyn Dispatch>,
        nettype: Option<&str>,
    ) -> Result<(), ServiceError> {
        let resolved = Nettype::resolve(nettype)?;
        self.register_protocols(program, handler, resolved.protocols())?;
        info!(program = %program, nettype = %resolved, "service registered");
        Ok(())
    }

    fn register_oldstyle(
        &mut self,
        program: ProgramId,
        handler: Arc<dyn Dispatch>,
    ) -> Result<(), ServiceError> {
        self.register_protocols(program, handler, &[Protocol::Udp, Protocol::Tcp])?;
        info!(program = %program, "service registered (oldstyle)");
        Ok(())
    }

    fn register_newstyle(
        &mut self,
        program: ProgramId,
        handler: Arc<dyn Dispatch>,
    ) -> Result<(), ServiceError> {
        self.register(program, handler, None)
    }

    fn serve(&mut self) -> Result<(), ServiceError> {
        let endpoints = std::mem::take(&mut self.endpoints);
        if endpoints.is_empty() {
            return Err(ServiceError::NoEndpoints);
        }
        let programs = Arc::new(self.programs.clone());

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(ServiceError::Runtime)?;
        runtime.block_on(server::run(endpoints, programs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SquareService;

    fn loopback() -> SocketRegistry {
        SocketRegistry::new(SocketRegistryConfig {
            bind: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
        })
    }

    fn protocols(registry: &SocketRegistry) -> Vec<Protocol> {
        registry.local_addrs().into_iter().map(|(p, _)| p).collect()
    }

    #[test]
    fn no_preference_binds_tcp_and_udp() {
        let mut registry = loopback();
        registry
            .register(ProgramId::square(), Arc::new(SquareService), None)
            .unwrap();
        assert_eq!(protocols(&registry), vec![Protocol::Tcp, Protocol::Udp]);
    }

    #[test]
    fn repeated_protocol_binds_once() {
        let mut registry = loopback();
        let handler: Arc<dyn Dispatch> = Arc::new(SquareService);
        registry
            .register(ProgramId::square(), Arc::clone(&handler), Some("tcp"))
            .unwrap();
        registry
            .register(ProgramId::square(), Arc::clone(&handler), Some("circuit_v"))
            .unwrap();
        assert_eq!(protocols(&registry), vec![Protocol::Tcp]);
    }

    #[test]
    fn oldstyle_binds_udp_first() {
        let mut registry = loopback();
        registry
            .register_oldstyle(ProgramId::square(), Arc::new(SquareService))
            .unwrap();
        assert_eq!(protocols(&registry), vec![Protocol::Udp, Protocol::Tcp]);
    }

    #[test]
    fn unknown_nettype_fails_without_binding() {
        let mut registry = loopback();
        let err = registry
            .register(ProgramId::square(), Arc::new(SquareService), Some("ipx"))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Nettype(_)));
        assert!(registry.local_addrs().is_empty());
    }

    #[test]
    fn serve_without_endpoints_fails() {
        let mut registry = loopback();
        assert!(matches!(registry.serve(), Err(ServiceError::NoEndpoints)));
    }
}
