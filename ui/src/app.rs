use std::time::Duration;

use chrono::Utc;
use roster_business::{BusinessConfig, UserListController, UserListView};
use roster_states::Time;

use crate::{state::State, widgets};

/// Repaint cadence while requests are in flight or a notification is shown.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct RosterApp {
    pub state: State,
}

impl RosterApp {
    /// Called once before the first frame.
    pub fn new(state: State) -> Self {
        Self { state }
    }
}

impl eframe::App for RosterApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let state_ctx = &mut self.state.ctx;

        state_ctx.update::<Time>(|time| time.set(Utc::now()));
        UserListController::mount(state_ctx);
        UserListController::pump(state_ctx);

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.strong("Roster");
                ui.separator();
                ui.weak(state_ctx.state::<BusinessConfig>().api_base_url.as_str());
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                widgets::users_panel(state_ctx, ui);
            });
        });

        widgets::delete_confirmation_modal(state_ctx, ctx);
        widgets::toast(state_ctx, ctx);

        let toast_shown = state_ctx.compute::<UserListView>().toast.is_some();
        if state_ctx.task_count() > 0 || toast_shown {
            ctx.request_repaint_after(POLL_INTERVAL);
        }
    }
}
