//! Create / update compute + command.

use std::any::Any;

use log::{info, warn};
use roster_states::{
    Command, CommandFuture, CommandSnapshot, Compute, ComputeDeps, Dep, State, Updater,
    assign_impl, state_assign_impl,
};
use tokio_util::sync::CancellationToken;

use crate::BusinessConfig;
use crate::api;
use crate::model::{NewUser, User, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTarget {
    Create,
    Update(UserId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRequest {
    pub target: SubmitTarget,
    pub user: NewUser,
}

/// Validated request handed to `SubmitUserCommand`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitUserInput {
    pub request: Option<SubmitRequest>,
}

impl State for SubmitUserInput {
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
pub enum SubmitUserResult {
    #[default]
    Idle,
    Pending,
    /// The backend may answer 2xx without echoing the stored user.
    Created(Option<User>),
    Updated(Option<User>),
    Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct SubmitUserCompute {
    pub result: SubmitUserResult,
}

impl SubmitUserCompute {
    pub fn is_pending(&self) -> bool {
        matches!(self.result, SubmitUserResult::Pending)
    }

    pub fn is_finished(&self) -> bool {
        matches!(
            self.result,
            SubmitUserResult::Created(_) | SubmitUserResult::Updated(_) | SubmitUserResult::Failed(_)
        )
    }
}

impl Compute for SubmitUserCompute {
    fn deps(&self) -> ComputeDeps {
        ComputeDeps::none()
    }

    fn compute(&self, _deps: Dep<'_>, _updater: Updater) {
        // Written by SubmitUserCommand only.
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

/// Sends `SubmitUserInput::request` as POST (create) or PUT (update).
///
/// Does not re-validate: the controller only dispatches validated drafts.
#[derive(Debug, Default)]
pub struct SubmitUserCommand;

impl Command for SubmitUserCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        _cancel: CancellationToken,
    ) -> CommandFuture {
        let request = snap.state::<SubmitUserInput>().request.clone();
        let config = snap.state::<BusinessConfig>().clone();

        Box::pin(async move {
            let Some(SubmitRequest { target, user }) = request else {
                warn!("SubmitUserCommand dispatched without a request");
                updater.set(SubmitUserCompute {
                    result: SubmitUserResult::Failed("Nothing to submit".to_owned()),
                });
                return;
            };

            let api_url = config.api_url();
            let result = match target {
                SubmitTarget::Create => {
                    info!("Creating user {}", user.name);
                    api::create_user(&api_url, &user)
                        .await
                        .map(SubmitUserResult::Created)
                }
                SubmitTarget::Update(id) => {
                    info!("Updating user {id}");
                    api::update_user(&api_url, id, &user)
                        .await
                        .map(SubmitUserResult::Updated)
                }
            };

            let result = result.unwrap_or_else(|err| {
                warn!("Saving user failed: {err}");
                SubmitUserResult::Failed(err.to_string())
            });
            updater.set(SubmitUserCompute { result });
        })
    }
}
