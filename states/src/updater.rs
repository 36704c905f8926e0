use std::any::{Any, TypeId, type_name};
use std::fmt;

use flume::Sender;
use log::warn;

use crate::TaskId;

/// A completion message waiting in the runtime inbox.
pub(crate) struct Update {
    pub(crate) task: Option<TaskId>,
    pub(crate) target: TypeId,
    pub(crate) value: Box<dyn Any + Send>,
}

/// Sends new values for states or computes back to the owning
/// [`StateCtx`](crate::StateCtx).
///
/// Values are queued in order and applied by `sync_computes`. An updater
/// created for a latest-only command carries its [`TaskId`]; its messages are
/// dropped once a newer run of the same command has been dispatched.
#[derive(Clone)]
pub struct Updater {
    send: Sender<Update>,
    task: Option<TaskId>,
}

impl Updater {
    pub(crate) fn new(send: Sender<Update>, task: Option<TaskId>) -> Self {
        Self { send, task }
    }

    /// Queue `value` as the new content of the state or compute of type `T`.
    pub fn set<T: Any + Send>(&self, value: T) {
        let update = Update {
            task: self.task,
            target: TypeId::of::<T>(),
            value: Box::new(value),
        };
        if self.send.send(update).is_err() {
            warn!(
                "State context dropped, discarding update for {}",
                type_name::<T>()
            );
        }
    }
}

impl fmt::Debug for Updater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Updater").field("task", &self.task).finish()
    }
}
