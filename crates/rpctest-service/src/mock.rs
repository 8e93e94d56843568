//! Mock service registry for testing.

use std::sync::{Arc, Mutex};

use rpctest_types::ProgramId;

use crate::error::ServiceError;
use crate::{Dispatch, ServiceRegistry};

/// A call made against [`MockRegistry`], recorded in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryCall {
    Register {
        program: ProgramId,
        nettype: Option<String>,
    },
    Oldstyle(ProgramId),
    Newstyle(ProgramId),
    Serve,
}

#[derive(Debug, Default)]
struct MockRegistryState {
    calls: Vec<RegistryCall>,
    failing_nettypes: Vec<Option<String>>,
    fail_entry_points: bool,
}

/// Records every registry call and fails the ones it was told to.
///
/// `serve()` returns immediately so tests can observe that the launcher
/// reached its serving state.
pub struct MockRegistry {
    state: Arc<Mutex<MockRegistryState>>,
}

impl Default for MockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRegistry {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockRegistryState::default())),
        }
    }

    /// Make `register` fail for this nettype (`None` = no preference).
    #[must_use]
    pub fn fail_on(self, nettype: Option<&str>) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing_nettypes
            .push(nettype.map(str::to_string));
        self
    }

    /// Make both fallback entry points fail.
    #[must_use]
    pub fn fail_entry_points(self) -> Self {
        self.state.lock().unwrap().fail_entry_points = true;
        self
    }

    /// Get a clonable handle for observing calls from tests.
    pub fn handle(&self) -> MockRegistryHandle {
        MockRegistryHandle {
            state: Arc::clone(&self.state),
        }
    }
}

/// Clonable observer handle for [`MockRegistry`].
#[derive(Clone)]
pub struct MockRegistryHandle {
    state: Arc<Mutex<MockRegistryState>>,
}

impl MockRegistryHandle {
    /// Get a snapshot of all recorded calls.
    pub fn calls(&self) -> Vec<RegistryCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Nettypes passed to `register`, in call order.
    pub fn registered_nettypes(&self) -> Vec<Option<String>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                RegistryCall::Register { nettype, .. } => Some(nettype),
                _ => None,
            })
            .collect()
    }

    /// Check if `serve()` was called.
    pub fn served(&self) -> bool {
        self.calls().contains(&RegistryCall::Serve)
    }
}

fn refused(what: &str) -> ServiceError {
    ServiceError::Other(anyhow::anyhow!("mock registry refused {what}"))
}

impl ServiceRegistry for MockRegistry {
    fn register(
        &mut self,
        program: ProgramId,
        _handler: Arc<dyn Dispatch>,
        nettype: Option<&str>,
    ) -> Result<(), ServiceError> {
        let mut state = self.state.lock().unwrap();
        let nettype = nettype.map(str::to_string);
        state.calls.push(RegistryCall::Register {
            program,
            nettype: nettype.clone(),
        });
        if state.failing_nettypes.contains(&nettype) {
            return Err(refused(nettype.as_deref().unwrap_or("<none>")));
        }
        Ok(())
    }

    fn register_oldstyle(
        &mut self,
        program: ProgramId,
        _handler: Arc<dyn Dispatch>,
    ) -> Result<(), ServiceError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RegistryCall::Oldstyle(program));
        if state.fail_entry_points {
            return Err(refused("oldstyle"));
        }
        Ok(())
    }

    fn register_newstyle(
        &mut self,
        program: ProgramId,
        _handler: Arc<dyn Dispatch>,
    ) -> Result<(), ServiceError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RegistryCall::Newstyle(program));
        if state.fail_entry_points {
            return Err(refused("newstyle"));
        }
        Ok(())
    }

    fn serve(&mut self) -> Result<(), ServiceError> {
        self.state.lock().unwrap().calls.push(RegistryCall::Serve);
        Ok(())
    }
}
