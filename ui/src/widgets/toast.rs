//! Transient notification shown in the bottom-right corner.

use egui::{Align2, Area, Context, Frame, Id, Margin, RichText};
use roster_business::{Severity, UserListView};
use roster_states::StateCtx;

use crate::utils::colors::{COLOR_GREEN, COLOR_RED};

/// Renders the current notification, if it has not expired yet.
pub fn toast(state_ctx: &StateCtx, ctx: &Context) {
    let Some(notification) = &state_ctx.compute::<UserListView>().toast else {
        return;
    };

    let color = match notification.severity {
        Severity::Success => COLOR_GREEN,
        Severity::Error => COLOR_RED,
    };

    Area::new(Id::new("roster_toast"))
        .anchor(Align2::RIGHT_BOTTOM, [-16.0, -16.0])
        .interactable(false)
        .show(ctx, |ui| {
            Frame::popup(ui.style())
                .inner_margin(Margin::symmetric(12, 8))
                .stroke(egui::Stroke::new(1.0, color))
                .show(ui, |ui| {
                    ui.label(RichText::new(&notification.message).color(color));
                });
        });
}
