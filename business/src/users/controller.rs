//! The user-list control loop.
//!
//! Every event source (mount, page change, user action) only edits states and
//! dispatches commands. `pump` runs once per frame: it applies the results
//! that arrived since the last frame, then issues the page fetch the current
//! index calls for.

use log::{debug, info, warn};
use roster_states::{StateCtx, Time};
use thiserror::Error;

use crate::model::User;
use crate::users::delete_user::{
    DeleteConfirmation, DeleteRequest, DeleteUserCommand, DeleteUserCompute, DeleteUserInput,
    DeleteUserResult,
};
use crate::users::draft::{DraftError, UserDraft};
use crate::users::load_page::{LoadPageCommand, LoadPageCompute, LoadPageResult};
use crate::users::page::PageState;
use crate::users::submit_user::{
    SubmitRequest, SubmitTarget, SubmitUserCommand, SubmitUserCompute, SubmitUserInput,
    SubmitUserResult,
};
use crate::users::toast::ToastState;
use crate::users::view::UserListView;
use crate::BusinessConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("A submission is already in flight")]
    InFlight,
    #[error("The form has {} problem(s)", .0.len())]
    Invalid(Vec<DraftError>),
}

pub struct UserListController;

impl UserListController {
    /// Registers every state, compute and command of the user list.
    pub fn register(ctx: &mut StateCtx, config: BusinessConfig) {
        ctx.add_state(config);
        ctx.add_state(Time::default());
        ctx.add_state(PageState::default());
        ctx.add_state(UserDraft::default());
        ctx.add_state(ToastState::default());
        ctx.add_state(DeleteConfirmation::default());
        ctx.add_state(SubmitUserInput::default());
        ctx.add_state(DeleteUserInput::default());

        ctx.record_compute(LoadPageCompute::default());
        ctx.record_compute(SubmitUserCompute::default());
        ctx.record_compute(DeleteUserCompute::default());
        ctx.record_compute(UserListView::default());

        ctx.record_command(LoadPageCommand);
        ctx.record_command(SubmitUserCommand);
        ctx.record_command(DeleteUserCommand);
    }

    /// Shows the list and fetches the current page.
    pub fn mount(ctx: &mut StateCtx) {
        if ctx.state::<PageState>().mounted {
            return;
        }
        info!("Mounting user list");
        ctx.update::<PageState>(|page| page.mounted = true);
        Self::ensure_page_loaded(ctx);
    }

    /// One iteration of the control loop.
    pub fn pump(ctx: &mut StateCtx) {
        ctx.sync_computes();

        Self::apply_page_result(ctx);
        Self::apply_submit_result(ctx);
        Self::apply_delete_result(ctx);
        Self::expire_toast(ctx);
        Self::ensure_page_loaded(ctx);

        ctx.run_computed();
        ctx.sync_computes();
    }

    // =====================
    // Pagination
    // =====================

    pub fn go_to_previous(ctx: &mut StateCtx) -> bool {
        let moved = ctx.state_mut::<PageState>().go_to_previous();
        if !moved {
            debug!("Already on the first page");
        }
        moved
    }

    pub fn go_to_next(ctx: &mut StateCtx) -> bool {
        let moved = ctx.state_mut::<PageState>().go_to_next();
        if !moved {
            debug!("Already on the last page");
        }
        moved
    }

    pub fn refresh(ctx: &mut StateCtx) {
        ctx.update::<PageState>(PageState::request_reload);
    }

    fn ensure_page_loaded(ctx: &mut StateCtx) {
        if !ctx.state::<PageState>().needs_fetch() {
            return;
        }
        ctx.update::<PageState>(PageState::mark_fetch_started);
        ctx.dispatch::<LoadPageCommand>();
    }

    fn apply_page_result(ctx: &mut StateCtx) {
        if !ctx.compute::<LoadPageCompute>().result.is_finished() {
            return;
        }
        let result = std::mem::take(&mut ctx.compute_mut::<LoadPageCompute>().result);
        let page = ctx.state_mut::<PageState>();
        let fetched_index = match &result {
            LoadPageResult::Loaded { page_index, .. }
            | LoadPageResult::Malformed { page_index, .. }
            | LoadPageResult::Failed { page_index, .. } => *page_index,
            LoadPageResult::Idle | LoadPageResult::Loading { .. } => return,
        };
        // The fetch for the current index is still in flight; `loading` stays set.
        if fetched_index != page.page_index {
            debug!(
                "Dropping result for page {fetched_index}, showing page {}",
                page.page_index
            );
            return;
        }
        match result {
            LoadPageResult::Loaded { view, .. } => page.apply_loaded(view),
            LoadPageResult::Malformed { message, .. } => page.apply_malformed(message),
            LoadPageResult::Failed { message, .. } => page.apply_failed(message),
            LoadPageResult::Idle | LoadPageResult::Loading { .. } => {}
        }
    }

    // =====================
    // Form
    // =====================

    /// Validates the draft and sends it. An invalid draft never reaches the
    /// network; its problems are kept in `UserDraft::errors`.
    pub fn submit_draft(ctx: &mut StateCtx) -> Result<(), SubmitError> {
        if ctx.compute::<SubmitUserCompute>().is_pending() {
            return Err(SubmitError::InFlight);
        }

        let validated = {
            let config = ctx.state::<BusinessConfig>();
            ctx.state::<UserDraft>().validate(config)
        };
        let user = match validated {
            Ok(user) => user,
            Err(errors) => {
                debug!("Draft rejected: {errors:?}");
                ctx.state_mut::<UserDraft>().errors = errors.clone();
                return Err(SubmitError::Invalid(errors));
            }
        };

        let draft = ctx.state_mut::<UserDraft>();
        draft.errors.clear();
        let target = draft
            .editing
            .map_or(SubmitTarget::Create, SubmitTarget::Update);

        ctx.state_mut::<SubmitUserInput>().request = Some(SubmitRequest { target, user });
        ctx.compute_mut::<SubmitUserCompute>().result = SubmitUserResult::Pending;
        ctx.dispatch::<SubmitUserCommand>();
        Ok(())
    }

    pub fn start_edit(ctx: &mut StateCtx, user: &User) {
        *ctx.state_mut::<UserDraft>() = UserDraft::from_user(user);
    }

    pub fn cancel_edit(ctx: &mut StateCtx) {
        ctx.update::<UserDraft>(UserDraft::reset);
    }

    fn apply_submit_result(ctx: &mut StateCtx) {
        if !ctx.compute::<SubmitUserCompute>().is_finished() {
            return;
        }
        let result = std::mem::take(&mut ctx.compute_mut::<SubmitUserCompute>().result);
        ctx.state_mut::<SubmitUserInput>().request = None;
        let now = ctx.state::<Time>().now();

        match result {
            SubmitUserResult::Created(_) => {
                ctx.update::<UserDraft>(UserDraft::reset);
                ctx.update::<PageState>(PageState::request_reload);
                ctx.state_mut::<ToastState>().success("User added", now);
            }
            SubmitUserResult::Updated(_) => {
                ctx.update::<UserDraft>(UserDraft::reset);
                ctx.update::<PageState>(PageState::request_reload);
                ctx.state_mut::<ToastState>().success("User updated", now);
            }
            SubmitUserResult::Failed(message) => {
                ctx.state_mut::<ToastState>()
                    .error(format!("Failed to save user: {message}"), now);
            }
            SubmitUserResult::Idle | SubmitUserResult::Pending => {}
        }
    }

    // =====================
    // Delete
    // =====================

    /// Asks for confirmation; nothing is sent yet.
    pub fn request_delete(ctx: &mut StateCtx, user: User) {
        ctx.state_mut::<DeleteConfirmation>().target = Some(user);
    }

    pub fn cancel_delete(ctx: &mut StateCtx) {
        ctx.state_mut::<DeleteConfirmation>().target = None;
    }

    /// Sends the confirmed delete. The row count of the page is captured now
    /// and decides, on success, whether to step back a page.
    pub fn confirm_delete(ctx: &mut StateCtx) -> bool {
        if ctx.compute::<DeleteUserCompute>().is_pending() {
            warn!("A delete is already in flight");
            return false;
        }
        let Some(user) = ctx.state_mut::<DeleteConfirmation>().target.take() else {
            return false;
        };

        let rows_on_page = ctx.state::<PageState>().users.len();
        ctx.state_mut::<DeleteUserInput>().request = Some(DeleteRequest {
            id: user.id,
            rows_on_page,
        });
        ctx.compute_mut::<DeleteUserCompute>().result = DeleteUserResult::Pending { id: user.id };
        ctx.dispatch::<DeleteUserCommand>();
        true
    }

    fn apply_delete_result(ctx: &mut StateCtx) {
        if !ctx.compute::<DeleteUserCompute>().is_finished() {
            return;
        }
        let result = std::mem::take(&mut ctx.compute_mut::<DeleteUserCompute>().result);
        ctx.state_mut::<DeleteUserInput>().request = None;
        let now = ctx.state::<Time>().now();

        match result {
            DeleteUserResult::Deleted { id, rows_on_page } => {
                info!("User {id} deleted");
                ctx.update::<PageState>(|page| {
                    if rows_on_page == 1 && page.page_index > 0 {
                        page.page_index -= 1;
                    } else {
                        page.request_reload();
                    }
                });
                ctx.state_mut::<ToastState>().success("User deleted", now);
            }
            DeleteUserResult::Failed { id, message } => {
                ctx.state_mut::<ToastState>()
                    .error(format!("Failed to delete user {id}: {message}"), now);
            }
            DeleteUserResult::Idle | DeleteUserResult::Pending { .. } => {}
        }
    }

    // =====================
    // Toast
    // =====================

    fn expire_toast(ctx: &mut StateCtx) {
        let now = ctx.state::<Time>().now();
        let duration = ctx.state::<BusinessConfig>().toast_duration;
        if ctx.state::<ToastState>().is_expired(now, duration) {
            ctx.state_mut::<ToastState>().expire(now, duration);
        }
    }
}
