use std::any::Any;

use roster_states::{Compute, ComputeDeps, Dep, Time, Updater, assign_impl};

use crate::users::page::ViewPhase;
use crate::users::toast::Notification;
use crate::{BusinessConfig, PageState, ToastState};

/// Presentation flags derived from the page, the toast slot and the clock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserListView {
    pub phase: ViewPhase,
    pub error: Option<String>,
    pub toast: Option<Notification>,
    pub can_go_previous: bool,
    pub can_go_next: bool,
    pub page_label: String,
}

impl Compute for UserListView {
    fn deps(&self) -> ComputeDeps {
        ComputeDeps::none()
            .state::<PageState>()
            .state::<ToastState>()
            .state::<Time>()
            .state::<BusinessConfig>()
    }

    fn compute(&self, deps: Dep<'_>, updater: Updater) {
        let page = deps.get_state_ref::<PageState>();
        let toast = deps.get_state_ref::<ToastState>();
        let now = deps.get_state_ref::<Time>().now();
        let config = deps.get_state_ref::<BusinessConfig>();

        updater.set(Self {
            phase: page.phase(),
            error: page.error.clone(),
            toast: toast.visible(now, config.toast_duration).cloned(),
            can_go_previous: page.can_go_previous(),
            can_go_next: page.can_go_next(),
            page_label: page.label(),
        });
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
