//! Delete-by-id compute + command, and the confirmation step before it.

use std::any::Any;

use log::{info, warn};
use roster_states::{
    Command, CommandFuture, CommandSnapshot, Compute, ComputeDeps, Dep, State, Updater,
    assign_impl, state_assign_impl,
};
use tokio_util::sync::CancellationToken;

use crate::BusinessConfig;
use crate::api;
use crate::model::{User, UserId};

/// Row waiting for the user to confirm its deletion. Nothing is sent until
/// the confirmation is accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteConfirmation {
    pub target: Option<User>,
}

impl State for DeleteConfirmation {
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteRequest {
    pub id: UserId,
    /// Rows on the page when the delete was dispatched.
    pub rows_on_page: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteUserInput {
    pub request: Option<DeleteRequest>,
}

impl State for DeleteUserInput {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DeleteUserResult {
    #[default]
    Idle,
    Pending { id: UserId },
    Deleted { id: UserId, rows_on_page: usize },
    Failed { id: UserId, message: String },
}

#[derive(Debug, Clone, Default)]
pub struct DeleteUserCompute {
    pub result: DeleteUserResult,
}

impl DeleteUserCompute {
    pub fn is_pending(&self) -> bool {
        matches!(self.result, DeleteUserResult::Pending { .. })
    }

    pub fn is_finished(&self) -> bool {
        matches!(
            self.result,
            DeleteUserResult::Deleted { .. } | DeleteUserResult::Failed { .. }
        )
    }
}

impl Compute for DeleteUserCompute {
    fn deps(&self) -> ComputeDeps {
        ComputeDeps::none()
    }

    fn compute(&self, _deps: Dep<'_>, _updater: Updater) {
        // Written by DeleteUserCommand only.
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

#[derive(Debug, Default)]
pub struct DeleteUserCommand;

impl Command for DeleteUserCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        _cancel: CancellationToken,
    ) -> CommandFuture {
        let request = snap.state::<DeleteUserInput>().request;
        let config = snap.state::<BusinessConfig>().clone();

        Box::pin(async move {
            let Some(DeleteRequest { id, rows_on_page }) = request else {
                warn!("DeleteUserCommand dispatched without a request");
                return;
            };

            info!("Deleting user {id}");
            let result = match api::delete_user(&config.api_url(), id).await {
                Ok(()) => DeleteUserResult::Deleted { id, rows_on_page },
                Err(err) => {
                    warn!("Deleting user {id} failed: {err}");
                    DeleteUserResult::Failed {
                        id,
                        message: err.to_string(),
                    }
                }
            };
            updater.set(DeleteUserCompute { result });
        })
    }
}
