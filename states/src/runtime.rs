use std::any::TypeId;
use std::collections::BTreeSet;

use flume::{Receiver, Sender};

use crate::updater::Update;
use crate::{ComputeDeps, Graph, TaskId, TopologyError, Updater};

/// Inbox of completion messages plus the compute dependency graph.
#[derive(Debug)]
pub struct StateRuntime {
    send: Sender<Update>,
    recv: Receiver<Update>,

    graph: Graph<TypeId>,
}

impl Default for StateRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl StateRuntime {
    pub fn new() -> Self {
        let (send, recv) = flume::unbounded();
        Self {
            send,
            recv,
            graph: Graph::new(),
        }
    }

    /// Unfenced updater: every message it sends is applied.
    pub fn updater(&self) -> Updater {
        Updater::new(self.send.clone(), None)
    }

    pub(crate) fn fenced_updater(&self, task: TaskId) -> Updater {
        Updater::new(self.send.clone(), Some(task))
    }

    pub(crate) fn drain(&self) -> impl Iterator<Item = Update> + '_ {
        self.recv.try_iter()
    }

    pub fn record(&mut self, compute: TypeId, deps: &ComputeDeps) {
        for dep in deps.iter() {
            self.graph.route_to(dep, compute);
        }
    }

    pub fn dependents(&self, id: TypeId) -> BTreeSet<TypeId> {
        self.graph.dependents(id)
    }

    pub fn verify_deps(&self) -> Result<Vec<TypeId>, TopologyError<TypeId>> {
        self.graph.topology_sort()
    }
}
