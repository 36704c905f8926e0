//! Page fetch compute + command.
//!
//! `LoadPageCommand` is latest-only: dispatching it again cancels the run in
//! flight, and anything the older run still reports is dropped, so only the
//! most recently requested page can reach the view.

use std::any::Any;

use log::{debug, info, warn};
use roster_states::{
    Command, CommandFuture, CommandSnapshot, Compute, ComputeDeps, Dep, Updater, assign_impl,
};
use tokio_util::sync::CancellationToken;

use crate::api;
use crate::error::ApiError;
use crate::model::PageView;
use crate::{BusinessConfig, PageState};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadPageResult {
    /// Nothing to apply.
    #[default]
    Idle,
    Loading { page_index: usize },
    Loaded { page_index: usize, view: PageView },
    /// Non-2xx or unreadable body.
    Malformed { page_index: usize, message: String },
    /// Transport failure.
    Failed { page_index: usize, message: String },
}

impl LoadPageResult {
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            Self::Loaded { .. } | Self::Malformed { .. } | Self::Failed { .. }
        )
    }
}

/// Latest page fetch outcome, consumed by the controller.
#[derive(Debug, Clone, Default)]
pub struct LoadPageCompute {
    pub result: LoadPageResult,
}

impl Compute for LoadPageCompute {
    fn deps(&self) -> ComputeDeps {
        ComputeDeps::none()
    }

    fn compute(&self, _deps: Dep<'_>, _updater: Updater) {
        // Written by LoadPageCommand only.
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

/// Fetches `PageState::page_index` as seen at dispatch.
#[derive(Debug, Default)]
pub struct LoadPageCommand;

impl Command for LoadPageCommand {
    fn latest_only(&self) -> bool {
        true
    }

    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        cancel: CancellationToken,
    ) -> CommandFuture {
        let page_index = snap.state::<PageState>().page_index;
        let config = snap.state::<BusinessConfig>().clone();

        Box::pin(async move {
            info!("Loading page {page_index}");
            updater.set(LoadPageCompute {
                result: LoadPageResult::Loading { page_index },
            });

            let api_url = config.api_url();
            let response = tokio::select! {
                () = cancel.cancelled() => {
                    debug!("Fetch of page {page_index} superseded");
                    return;
                }
                response = api::list_users(&api_url, page_index, config.page_size) => response,
            };

            let result = match response {
                Ok(view) => {
                    info!(
                        "Loaded page {page_index}: {} rows of {} pages",
                        view.content.len(),
                        view.total_pages
                    );
                    LoadPageResult::Loaded { page_index, view }
                }
                Err(err @ ApiError::Transport(_)) => {
                    warn!("Fetch of page {page_index} failed: {err}");
                    LoadPageResult::Failed {
                        page_index,
                        message: err.to_string(),
                    }
                }
                Err(err) => {
                    warn!("Page {page_index} could not be used: {err}");
                    LoadPageResult::Malformed {
                        page_index,
                        message: err.to_string(),
                    }
                }
            };
            updater.set(LoadPageCompute { result });
        })
    }
}
