//! Delete confirmation dialog.

use egui::{Context, RichText, Window};
use roster_business::{DeleteConfirmation, UserListController};
use roster_states::StateCtx;

use crate::utils::colors::COLOR_RED;

/// Shown while a delete awaits confirmation. Nothing is sent until
/// "Confirm delete" is clicked; closing the window declines.
pub fn delete_confirmation_modal(state_ctx: &mut StateCtx, ctx: &Context) {
    let Some(user) = state_ctx.state::<DeleteConfirmation>().target.clone() else {
        return;
    };

    let mut open = true;
    let mut confirmed = false;
    let mut cancelled = false;

    Window::new("Delete user")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(format!("Delete {} (ID {})?", user.name, user.id));
            ui.label(RichText::new("This cannot be undone.").color(COLOR_RED));
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Confirm delete").clicked() {
                    confirmed = true;
                }
                if ui.button("Cancel").clicked() {
                    cancelled = true;
                }
            });
        });

    if confirmed {
        UserListController::confirm_delete(state_ctx);
    } else if cancelled || !open {
        UserListController::cancel_delete(state_ctx);
    }
}
