//! Identity and cancellation for spawned command tasks.
//!
//! Every flushed command gets a `TaskId` made of the command's `TypeId` and a
//! per-command generation counter. The context remembers the newest generation
//! of each command; for latest-only commands, updates tagged with an older
//! generation are stale and get dropped, and the older task's
//! `CancellationToken` is cancelled.

use std::any::TypeId;

use tokio_util::sync::CancellationToken;

/// Unique identifier for a spawned task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId {
    type_id: TypeId,
    generation: u64,
}

impl TaskId {
    pub fn new(type_id: TypeId, generation: u64) -> Self {
        Self {
            type_id,
            generation,
        }
    }

    /// `TypeId` of the command that spawned the task.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Higher generations were dispatched later.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Handle to a spawned task with cooperative cancellation.
///
/// Cancelling does not abort the task; the command observes the token, usually
/// through `tokio::select!` on `token.cancelled()`.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: TaskId,
    cancel_token: CancellationToken,
}

impl TaskHandle {
    pub fn new(id: TaskId, cancel_token: CancellationToken) -> Self {
        Self { id, cancel_token }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}
