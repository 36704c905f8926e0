use std::any::{Any, TypeId, type_name};

use log::error;

use crate::{Dep, State, Updater};

/// Declared inputs of a [`Compute`].
///
/// A compute is marked dirty whenever one of the listed states or computes is
/// written, and runs on the next [`StateCtx::run_computed`](crate::StateCtx::run_computed).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComputeDeps {
    states: Vec<TypeId>,
    computes: Vec<TypeId>,
}

impl ComputeDeps {
    /// No dependencies. Used by command-fed caches.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn state<T: State>(mut self) -> Self {
        self.states.push(TypeId::of::<T>());
        self
    }

    pub fn compute<T: Compute>(mut self) -> Self {
        self.computes.push(TypeId::of::<T>());
        self
    }

    pub fn states(&self) -> &[TypeId] {
        &self.states
    }

    pub fn computes(&self) -> &[TypeId] {
        &self.computes
    }

    /// All inputs, states first.
    pub fn iter(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.states.iter().chain(self.computes.iter()).copied()
    }
}

/// Derived or command-fed value cached inside a [`StateCtx`](crate::StateCtx).
///
/// `compute` must not perform side effects: it runs implicitly whenever a
/// dependency changes. Its output is delivered through the [`Updater`] and
/// becomes visible after the next `sync_computes`.
///
/// Caches written only by commands return [`ComputeDeps::none`] and keep
/// `compute` as a no-op.
pub trait Compute: Any {
    fn deps(&self) -> ComputeDeps;

    fn compute(&self, deps: Dep<'_>, updater: Updater);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Owned copy handed to commands. `None` keeps the compute out of snapshots.
    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        None
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>);
}

/// Shared `assign_box` body for computes.
pub fn assign_impl<T: Compute>(target: &mut T, new_self: Box<dyn Any + Send>) {
    match new_self.downcast::<T>() {
        Ok(value) => *target = *value,
        Err(_) => error!("Refusing to assign a value of another type to {}", type_name::<T>()),
    }
}
