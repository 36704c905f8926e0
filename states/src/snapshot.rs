use std::any::{Any, TypeId, type_name};
use std::collections::BTreeMap;

/// Owned copies of every snapshot-capable state and compute, taken when a
/// command is flushed.
///
/// Commands run on the async runtime and never touch the live
/// [`StateCtx`](crate::StateCtx); everything they read comes from here.
#[derive(Default)]
pub struct CommandSnapshot {
    inner: BTreeMap<TypeId, Box<dyn Any + Send>>,
}

impl CommandSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_cloned(&mut self, id: TypeId, value: Box<dyn Any + Send>) {
        self.inner.insert(id, value);
    }

    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.inner
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<T>())
    }

    /// # Panics
    /// Panics if the state was not registered or does not implement `snapshot`.
    pub fn state<T: 'static>(&self) -> &T {
        self.get::<T>()
            .unwrap_or_else(|| panic!("State snapshot for {} is missing", type_name::<T>()))
    }

    /// # Panics
    /// Panics if the compute was not recorded or does not implement `snapshot`.
    pub fn compute<T: 'static>(&self) -> &T {
        self.get::<T>()
            .unwrap_or_else(|| panic!("Compute snapshot for {} is missing", type_name::<T>()))
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
