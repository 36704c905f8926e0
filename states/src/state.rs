use std::any::{Any, type_name};

use log::error;

/// Plain application state stored in a [`StateCtx`](crate::StateCtx).
///
/// States are written by the control loop (`state_mut`, `update`) or by
/// completion messages sent through an [`Updater`](crate::Updater). Every write
/// marks the computes that depend on the state as dirty.
pub trait State: Any {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Owned copy handed to commands through a
    /// [`CommandSnapshot`](crate::CommandSnapshot).
    ///
    /// States returning `None` are invisible to commands.
    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        None
    }

    /// Replace `self` with a value received from an [`Updater`](crate::Updater).
    fn assign_box(&mut self, new_self: Box<dyn Any + Send>);
}

/// Shared `assign_box` body for states.
pub fn state_assign_impl<T: State>(target: &mut T, new_self: Box<dyn Any + Send>) {
    match new_self.downcast::<T>() {
        Ok(value) => *target = *value,
        Err(_) => error!("Refusing to assign a value of another type to {}", type_name::<T>()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Clone, PartialEq, Eq)]
    struct Counter(u32);

    impl State for Counter {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }

        fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
            state_assign_impl(self, new_self);
        }
    }

    #[test]
    fn assign_replaces_value() {
        let mut counter = Counter(1);
        counter.assign_box(Box::new(Counter(7)));
        assert_eq!(counter, Counter(7));
    }

    #[test]
    fn assign_ignores_foreign_type() {
        let mut counter = Counter(1);
        counter.assign_box(Box::new("not a counter"));
        assert_eq!(counter, Counter(1));
    }

    #[test]
    fn snapshot_defaults_to_none() {
        assert!(Counter(3).snapshot().is_none());
    }
}
