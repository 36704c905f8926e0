use std::future::Future;
use std::pin::Pin;

use tokio_util::sync::CancellationToken;

use crate::{CommandSnapshot, Updater};

/// Future returned by [`Command::run`].
pub type CommandFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Manual-only side effect (network IO and the like).
///
/// Commands never run implicitly. They are queued with
/// [`StateCtx::enqueue_command`](crate::StateCtx::enqueue_command) or
/// [`StateCtx::dispatch`](crate::StateCtx::dispatch), read their inputs from an
/// owned [`CommandSnapshot`] and report back through the [`Updater`].
pub trait Command: Send + Sync + 'static {
    /// When `true`, dispatching the command again supersedes the run in flight:
    /// the older run is cancelled and any update it still sends is dropped by
    /// `sync_computes`.
    fn latest_only(&self) -> bool {
        false
    }

    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        cancel: CancellationToken,
    ) -> CommandFuture;
}
