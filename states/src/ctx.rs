use std::any::{Any, TypeId, type_name};
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::sync::Arc;

use log::{debug, error, warn};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::{
    Command, CommandSnapshot, Compute, Dep, Error, State, StateRuntime, StateSyncStatus, TaskHandle,
    TaskId, Updater,
};

struct ComputeSlot {
    compute: Box<dyn Compute>,
    status: StateSyncStatus,
}

/// Owner of every state, compute and command of the application.
///
/// The context is driven by a single control loop (one egui frame, or a test
/// step):
/// 1. `sync_computes` applies completion messages in the order they were sent
///    and drops stale ones from superseded latest-only commands.
/// 2. The caller reads and writes states (`state`, `state_mut`, `update`).
/// 3. `dispatch` / `flush_commands` spawn commands on the tokio runtime with an
///    owned snapshot of the current states.
/// 4. `run_computed` re-runs derived computes whose inputs changed.
///
/// Nothing but the control loop mutates the context, so there are no
/// concurrent writes; async work only ever talks back through an [`Updater`].
pub struct StateCtx {
    runtime: StateRuntime,

    states: BTreeMap<TypeId, Box<dyn State>>,
    computes: BTreeMap<TypeId, ComputeSlot>,
    commands: BTreeMap<TypeId, Arc<dyn Command>>,

    command_queue: VecDeque<TypeId>,
    tasks: JoinSet<()>,
    generations: BTreeMap<TypeId, u64>,
    latest_tasks: BTreeMap<TypeId, TaskHandle>,
}

impl Default for StateCtx {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StateCtx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateCtx")
            .field("states", &self.states.len())
            .field("computes", &self.computes.len())
            .field("commands", &self.commands.len())
            .field("queued_commands", &self.command_queue.len())
            .field("tasks", &self.tasks.len())
            .finish()
    }
}

impl StateCtx {
    pub fn new() -> Self {
        Self {
            runtime: StateRuntime::new(),
            states: BTreeMap::new(),
            computes: BTreeMap::new(),
            commands: BTreeMap::new(),
            command_queue: VecDeque::new(),
            tasks: JoinSet::new(),
            generations: BTreeMap::new(),
            latest_tasks: BTreeMap::new(),
        }
    }

    // =====================
    // Registration
    // =====================

    pub fn add_state<T: State>(&mut self, state: T) {
        self.states.insert(TypeId::of::<T>(), Box::new(state));
    }

    pub fn record_compute<T: Compute>(&mut self, compute: T) {
        let id = TypeId::of::<T>();
        self.runtime.record(id, &compute.deps());
        self.computes.insert(
            id,
            ComputeSlot {
                compute: Box::new(compute),
                status: StateSyncStatus::BeforeInit,
            },
        );
    }

    pub fn record_command<T: Command>(&mut self, command: T) {
        self.commands.insert(TypeId::of::<T>(), Arc::new(command));
    }

    /// Checks the compute graph for cycles and duplicate edges.
    pub fn verify_deps(&self) -> Result<(), Error> {
        self.runtime.verify_deps()?;
        Ok(())
    }

    // =====================
    // States
    // =====================

    pub fn try_state<T: State>(&self) -> Result<&T, Error> {
        let id = TypeId::of::<T>();
        self.states
            .get(&id)
            .and_then(|state| state.as_any().downcast_ref::<T>())
            .ok_or_else(|| Error::state_not_found(id, type_name::<T>()))
    }

    /// # Panics
    /// Panics if `T` was never registered with `add_state`.
    pub fn state<T: State>(&self) -> &T {
        self.try_state::<T>()
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// Mutable access. Marks every compute depending on `T` dirty.
    ///
    /// # Panics
    /// Panics if `T` was never registered with `add_state`.
    pub fn state_mut<T: State>(&mut self) -> &mut T {
        let id = TypeId::of::<T>();
        self.mark_dependents_dirty(id);
        self.states
            .get_mut(&id)
            .and_then(|state| state.as_any_mut().downcast_mut::<T>())
            .unwrap_or_else(|| panic!("State {} is not registered", type_name::<T>()))
    }

    pub fn update<T: State>(&mut self, f: impl FnOnce(&mut T)) {
        f(self.state_mut::<T>());
    }

    // =====================
    // Computes
    // =====================

    pub fn cached<T: Compute>(&self) -> Option<&T> {
        self.computes
            .get(&TypeId::of::<T>())
            .and_then(|slot| slot.compute.as_any().downcast_ref::<T>())
    }

    /// # Panics
    /// Panics if `T` was never registered with `record_compute`.
    pub fn compute<T: Compute>(&self) -> &T {
        self.cached::<T>().unwrap_or_else(|| {
            panic!(
                "{}",
                Error::compute_not_found(TypeId::of::<T>(), type_name::<T>())
            )
        })
    }

    /// Mutable access to a command-fed cache, e.g. to reset it after its
    /// result has been consumed. Marks dependents dirty.
    ///
    /// # Panics
    /// Panics if `T` was never registered with `record_compute`.
    pub fn compute_mut<T: Compute>(&mut self) -> &mut T {
        let id = TypeId::of::<T>();
        self.mark_dependents_dirty(id);
        self.computes
            .get_mut(&id)
            .and_then(|slot| slot.compute.as_any_mut().downcast_mut::<T>())
            .unwrap_or_else(|| panic!("Compute {} is not registered", type_name::<T>()))
    }

    pub fn compute_status<T: Compute>(&self) -> Option<StateSyncStatus> {
        self.computes
            .get(&TypeId::of::<T>())
            .map(|slot| slot.status)
    }

    /// Runs every compute that was never run or whose inputs changed, in
    /// dependency order. Outputs arrive through the updater and are visible
    /// after the next `sync_computes`.
    pub fn run_computed(&mut self) {
        let order = match self.runtime.verify_deps() {
            Ok(order) => order,
            Err(err) => {
                error!("Refusing to run computes: {err}");
                return;
            }
        };

        let mut ids: Vec<TypeId> = order
            .into_iter()
            .filter(|id| self.computes.contains_key(id))
            .collect();
        for id in self.computes.keys() {
            if !ids.contains(id) {
                ids.push(*id);
            }
        }

        for id in ids {
            let Some(slot) = self.computes.get(&id) else {
                continue;
            };
            if !slot.status.needs_run() {
                continue;
            }
            slot.compute
                .compute(Dep::new(&self.states), self.runtime.updater());
            if let Some(slot) = self.computes.get_mut(&id) {
                slot.status = StateSyncStatus::Clean;
            }
        }
    }

    // =====================
    // Updates
    // =====================

    pub fn updater(&self) -> Updater {
        self.runtime.updater()
    }

    /// Applies every queued update in arrival order.
    ///
    /// Updates from a latest-only command are dropped unless they come from the
    /// most recently dispatched run of that command.
    pub fn sync_computes(&mut self) {
        self.reap_finished_tasks();

        let updates: Vec<_> = self.runtime.drain().collect();
        for update in updates {
            if let Some(task) = update.task
                && !self.is_latest(task)
            {
                debug!(
                    "Dropping stale update from task generation {}",
                    task.generation()
                );
                continue;
            }
            self.apply(update.target, update.value);
        }
    }

    fn apply(&mut self, target: TypeId, value: Box<dyn Any + Send>) {
        if let Some(state) = self.states.get_mut(&target) {
            state.assign_box(value);
        } else if let Some(slot) = self.computes.get_mut(&target) {
            slot.compute.assign_box(value);
        } else {
            warn!("Dropping update for unregistered type {target:?}");
            return;
        }
        self.mark_dependents_dirty(target);
    }

    fn mark_dependents_dirty(&mut self, id: TypeId) {
        for dependent in self.runtime.dependents(id) {
            if let Some(slot) = self.computes.get_mut(&dependent) {
                slot.status = StateSyncStatus::Dirty;
            }
        }
    }

    fn is_latest(&self, task: TaskId) -> bool {
        self.generations.get(&task.type_id()) == Some(&task.generation())
    }

    // =====================
    // Commands
    // =====================

    pub fn enqueue_command<T: Command>(&mut self) {
        let id = TypeId::of::<T>();
        if self.commands.contains_key(&id) {
            self.command_queue.push_back(id);
        } else {
            error!("Command {} is not recorded, ignoring", type_name::<T>());
        }
    }

    /// Enqueue and immediately flush `T`.
    pub fn dispatch<T: Command>(&mut self) {
        self.enqueue_command::<T>();
        self.flush_commands();
    }

    /// Spawns every queued command on the current tokio runtime.
    pub fn flush_commands(&mut self) {
        if self.command_queue.is_empty() {
            return;
        }
        if tokio::runtime::Handle::try_current().is_err() {
            error!(
                "No tokio runtime available, dropping {} queued command(s)",
                self.command_queue.len()
            );
            self.command_queue.clear();
            return;
        }

        while let Some(id) = self.command_queue.pop_front() {
            let Some(command) = self.commands.get(&id).cloned() else {
                continue;
            };

            let generation = self.generations.entry(id).or_insert(0);
            *generation += 1;
            let task_id = TaskId::new(id, *generation);
            let token = CancellationToken::new();

            let updater = if command.latest_only() {
                let handle = TaskHandle::new(task_id, token.clone());
                if let Some(previous) = self.latest_tasks.insert(id, handle) {
                    debug!(
                        "Superseding task generation {}",
                        previous.id().generation()
                    );
                    previous.cancel();
                }
                self.runtime.fenced_updater(task_id)
            } else {
                self.runtime.updater()
            };

            let future = command.run(self.snapshot(), updater, token);
            self.tasks.spawn(future);
        }
    }

    fn snapshot(&self) -> CommandSnapshot {
        let mut snap = CommandSnapshot::new();
        for (id, state) in &self.states {
            if let Some(value) = state.snapshot() {
                snap.insert_cloned(*id, value);
            }
        }
        for (id, slot) in &self.computes {
            if let Some(value) = slot.compute.snapshot() {
                snap.insert_cloned(*id, value);
            }
        }
        snap
    }

    /// Most recent task of a latest-only command.
    pub fn latest_task<T: Command>(&self) -> Option<TaskId> {
        self.latest_tasks
            .get(&TypeId::of::<T>())
            .map(TaskHandle::id)
    }

    fn reap_finished_tasks(&mut self) {
        while let Some(result) = self.tasks.try_join_next() {
            if let Err(err) = result
                && err.is_panic()
            {
                error!("Command task panicked: {err}");
            }
        }
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn task_set_mut(&mut self) -> &mut JoinSet<()> {
        &mut self.tasks
    }

    /// Cancels and aborts every running command task.
    pub async fn shutdown(&mut self) {
        for handle in self.latest_tasks.values() {
            handle.cancel();
        }
        self.tasks.shutdown().await;
    }
}
