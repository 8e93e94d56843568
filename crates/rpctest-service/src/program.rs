//! Table of registered program versions.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use rpctest_types::{CallMessage, ProgramId, ReplyBody, ReplyMessage};
use tracing::trace;

use crate::Dispatch;

/// Maps program numbers and versions to their handlers.
#[derive(Clone, Default)]
pub struct ProgramTable {
    programs: HashMap<u32, BTreeMap<u32, Arc<dyn Dispatch>>>,
}

impl ProgramTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, replacing any previous one for the same version.
    pub fn insert(&mut self, id: ProgramId, handler: Arc<dyn Dispatch>) {
        self.programs
            .entry(id.program)
            .or_default()
            .insert(id.version, handler);
    }

    pub fn contains(&self, id: ProgramId) -> bool {
        self.programs
            .get(&id.program)
            .is_some_and(|versions| versions.contains_key(&id.version))
    }

    /// Route a call to its handler and build the reply.
    pub fn dispatch(&self, call: &CallMessage) -> ReplyMessage {
        let body = match self.programs.get(&call.program.program) {
            None => ReplyBody::ProgUnavail,
            Some(versions) => match versions.get(&call.program.version) {
                Some(handler) => handler.dispatch(call.procedure, &call.args),
                None => ReplyBody::ProgMismatch {
                    low: versions.keys().next().copied().unwrap_or_default(),
                    high: versions.keys().next_back().copied().unwrap_or_default(),
                },
            },
        };
        trace!(xid = call.xid, program = %call.program, procedure = call.procedure, "dispatched");
        ReplyMessage {
            xid: call.xid,
            body,
        }
    }
}

impl std::fmt::Debug for ProgramTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<ProgramId> = self
            .programs
            .iter()
            .flat_map(|(p, versions)| versions.keys().map(|v| ProgramId::new(*p, *v)))
            .collect();
        ids.sort_by_key(|id| (id.program, id.version));
        f.debug_struct("ProgramTable").field("programs", &ids).finish()
    }
}
