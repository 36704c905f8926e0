//! State, compute and command runtime driven by a single control loop.
//!
//! * [`State`]: plain values owned by the [`StateCtx`].
//! * [`Compute`]: cached values, either derived from declared dependencies or
//!   written by commands.
//! * [`Command`]: manual-only side effects spawned on tokio with an owned
//!   [`CommandSnapshot`]; results come back through an [`Updater`].
//!
//! Completion messages are applied in arrival order by
//! [`StateCtx::sync_computes`]. Latest-only commands are fenced by a
//! per-command generation so that only the most recent run can write.

mod command;
mod compute;
mod ctx;
mod dep;
mod error;
mod graph;
mod runtime;
mod snapshot;
mod state;
mod state_sync_status;
mod task;
mod time;
pub(crate) mod updater;

pub use command::{Command, CommandFuture};
pub use compute::{Compute, ComputeDeps, assign_impl};
pub use ctx::StateCtx;
pub use dep::Dep;
pub use error::Error;
pub use graph::{DepRoute, Graph, TopologyError};
pub use runtime::StateRuntime;
pub use snapshot::CommandSnapshot;
pub use state::{State, state_assign_impl};
pub use state_sync_status::StateSyncStatus;
pub use task::{TaskHandle, TaskId};
pub use time::Time;
pub use updater::Updater;

#[cfg(test)]
mod state_runtime_test {
    use std::any::Any;
    use std::time::Duration;

    use tokio_util::sync::CancellationToken;

    use super::*;

    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    struct Counter(i64);

    impl State for Counter {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }

        fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
            Some(Box::new(*self))
        }

        fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
            state_assign_impl(self, new_self);
        }
    }

    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    struct Answer(i64);

    impl State for Answer {
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

    #[derive(Debug, Default, PartialEq, Eq)]
    struct Doubled(i64);

    impl Compute for Doubled {
        fn deps(&self) -> ComputeDeps {
            ComputeDeps::none().state::<Counter>()
        }

        fn compute(&self, deps: Dep<'_>, updater: Updater) {
            let counter = deps.get_state_ref::<Counter>();
            updater.set(Doubled(counter.0 * 2));
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }

        fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
            assign_impl(self, new_self);
        }
    }

    /// Answers with the counter value; a counter of 1 answers slowly and
    /// ignores cancellation so it finishes after any later run.
    struct SlowEcho;

    impl Command for SlowEcho {
        fn latest_only(&self) -> bool {
            true
        }

        fn run(
            &self,
            snap: CommandSnapshot,
            updater: Updater,
            _cancel: CancellationToken,
        ) -> CommandFuture {
            let value = snap.state::<Counter>().0;
            Box::pin(async move {
                if value == 1 {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                }
                updater.set(Answer(value));
            })
        }
    }

    /// Same as `SlowEcho` without fencing.
    struct UnfencedEcho;

    impl Command for UnfencedEcho {
        fn run(
            &self,
            snap: CommandSnapshot,
            updater: Updater,
            _cancel: CancellationToken,
        ) -> CommandFuture {
            let value = snap.state::<Counter>().0;
            Box::pin(async move {
                if value == 1 {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                }
                updater.set(Answer(value));
            })
        }
    }

    async fn drain_tasks(ctx: &mut StateCtx) {
        while ctx.task_set_mut().join_next().await.is_some() {}
        ctx.sync_computes();
    }

    #[test]
    fn updates_apply_in_arrival_order() {
        let mut ctx = StateCtx::new();
        ctx.add_state(Counter(0));

        let updater = ctx.updater();
        updater.set(Counter(1));
        updater.set(Counter(2));
        assert_eq!(*ctx.state::<Counter>(), Counter(0));

        ctx.sync_computes();
        assert_eq!(*ctx.state::<Counter>(), Counter(2));
    }

    #[test]
    fn derived_compute_follows_its_state() {
        let mut ctx = StateCtx::new();
        ctx.add_state(Counter(3));
        ctx.record_compute(Doubled::default());
        assert_eq!(
            ctx.compute_status::<Doubled>(),
            Some(StateSyncStatus::BeforeInit)
        );

        ctx.run_computed();
        ctx.sync_computes();
        assert_eq!(*ctx.compute::<Doubled>(), Doubled(6));
        assert_eq!(ctx.compute_status::<Doubled>(), Some(StateSyncStatus::Clean));

        ctx.update::<Counter>(|counter| counter.0 = 5);
        assert_eq!(ctx.compute_status::<Doubled>(), Some(StateSyncStatus::Dirty));

        ctx.run_computed();
        ctx.sync_computes();
        assert_eq!(*ctx.compute::<Doubled>(), Doubled(10));
    }

    #[test]
    fn missing_state_is_an_error() {
        let ctx = StateCtx::new();
        let err = ctx.try_state::<Counter>().unwrap_err();
        assert!(matches!(err, Error::StateNotFound { .. }));
        assert!(ctx.cached::<Doubled>().is_none());
    }

    #[test]
    fn cyclic_computes_are_rejected() {
        #[derive(Default)]
        struct Left;
        #[derive(Default)]
        struct Right;

        macro_rules! cyclic {
            ($name:ident, $other:ident) => {
                impl Compute for $name {
                    fn deps(&self) -> ComputeDeps {
                        ComputeDeps::none().compute::<$other>()
                    }

                    fn compute(&self, _deps: Dep<'_>, _updater: Updater) {}

                    fn as_any(&self) -> &dyn Any {
                        self
                    }

                    fn as_any_mut(&mut self) -> &mut dyn Any {
                        self
                    }

                    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
                        assign_impl(self, new_self);
                    }
                }
            };
        }
        cyclic!(Left, Right);
        cyclic!(Right, Left);

        let mut ctx = StateCtx::new();
        ctx.record_compute(Left);
        ctx.record_compute(Right);

        match ctx.verify_deps() {
            Err(Error::Topology(TopologyError::CycleDetected(route))) => {
                assert_eq!(route.nodes().len(), 3);
            }
            other => panic!("Expected a cycle, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unrecorded_command_is_ignored() {
        let mut ctx = StateCtx::new();
        ctx.dispatch::<SlowEcho>();
        assert_eq!(ctx.task_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_run_cannot_write() {
        let mut ctx = StateCtx::new();
        ctx.add_state(Counter(1));
        ctx.add_state(Answer(0));
        ctx.record_command(SlowEcho);

        ctx.dispatch::<SlowEcho>();
        let first = ctx.latest_task::<SlowEcho>().map(|task| task.generation());
        ctx.update::<Counter>(|counter| counter.0 = 2);
        ctx.dispatch::<SlowEcho>();
        let second = ctx.latest_task::<SlowEcho>().map(|task| task.generation());
        assert_eq!(first, Some(1));
        assert_eq!(second, Some(2));

        drain_tasks(&mut ctx).await;
        assert_eq!(*ctx.state::<Answer>(), Answer(2));
    }

    #[tokio::test(start_paused = true)]
    async fn unfenced_commands_apply_last_arrival() {
        let mut ctx = StateCtx::new();
        ctx.add_state(Counter(1));
        ctx.add_state(Answer(0));
        ctx.record_command(UnfencedEcho);

        ctx.dispatch::<UnfencedEcho>();
        ctx.update::<Counter>(|counter| counter.0 = 2);
        ctx.dispatch::<UnfencedEcho>();
        assert!(ctx.latest_task::<UnfencedEcho>().is_none());

        drain_tasks(&mut ctx).await;
        assert_eq!(*ctx.state::<Answer>(), Answer(1));
    }

    #[tokio::test]
    async fn shutdown_clears_tasks() {
        let mut ctx = StateCtx::new();
        ctx.add_state(Counter(1));
        ctx.record_command(SlowEcho);
        ctx.dispatch::<SlowEcho>();

        ctx.shutdown().await;
        assert_eq!(ctx.task_count(), 0);
    }
}
