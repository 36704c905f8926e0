//! Main users panel: table, status line, pagination and form.

use egui::{RichText, Ui};
use roster_business::{PageState, UserListController, UserListView, ViewPhase};
use roster_states::StateCtx;

use super::form::user_form;
use super::pagination::pagination_bar;
use super::table::{RowAction, users_table};
use crate::utils::colors::{COLOR_AMBER, COLOR_RED};

/// Renders the whole user management page.
pub fn users_panel(state_ctx: &mut StateCtx, ui: &mut Ui) {
    ui.horizontal(|ui| {
        ui.heading("Users");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Refresh").clicked() {
                UserListController::refresh(state_ctx);
            }
        });
    });
    ui.separator();

    let users = state_ctx.state::<PageState>().users.clone();
    if users.is_empty() {
        if state_ctx.compute::<UserListView>().phase == ViewPhase::Loaded {
            ui.label("No users found");
        }
    } else if let Some(action) = users_table(ui, &users) {
        match action {
            RowAction::Edit(user) => UserListController::start_edit(state_ctx, &user),
            RowAction::Delete(user) => UserListController::request_delete(state_ctx, user),
        }
    }

    ui.add_space(4.0);
    status_line(state_ctx, ui);

    ui.add_space(8.0);
    pagination_bar(state_ctx, ui);

    ui.add_space(12.0);
    ui.separator();
    user_form(state_ctx, ui);
}

fn status_line(state_ctx: &StateCtx, ui: &mut Ui) {
    let view = state_ctx.compute::<UserListView>();
    match view.phase {
        ViewPhase::Idle | ViewPhase::Loaded => {}
        ViewPhase::Loading => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(RichText::new("Loading users...").color(COLOR_AMBER));
            });
        }
        ViewPhase::Error => {
            let message = view.error.as_deref().unwrap_or("Unknown error");
            ui.colored_label(COLOR_RED, format!("Error: {message}"));
        }
    }
}
