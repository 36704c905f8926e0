//! Row rendering for the users table.

use egui::{RichText, Ui};
use egui_extras::TableRow;
use roster_business::User;

/// What the user clicked in a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    Edit(User),
    Delete(User),
}

/// Renders one user. Returns the clicked action, if any.
#[inline]
pub fn render_user_row(row: &mut TableRow<'_, '_>, user: &User) -> Option<RowAction> {
    let mut action = None;

    row.col(|ui| {
        centered(ui, RichText::new(user.id.to_string()).monospace());
    });
    row.col(|ui| {
        ui.label(user.name.as_str());
    });
    row.col(|ui| {
        centered(ui, RichText::new(&user.phone_number));
    });
    row.col(|ui| {
        centered(ui, RichText::new(&user.aadhar_number).monospace());
    });
    row.col(|ui| {
        centered(ui, RichText::new(user.region.label()));
    });
    row.col(|ui| {
        centered(ui, RichText::new(user.amount.to_string()).monospace());
    });
    row.col(|ui| {
        ui.horizontal_centered(|ui| {
            if ui.button("Edit").on_hover_text("Edit this user").clicked() {
                action = Some(RowAction::Edit(user.clone()));
            }
            if ui.button("Delete").on_hover_text("Delete this user").clicked() {
                action = Some(RowAction::Delete(user.clone()));
            }
        });
    });

    action
}

#[inline]
fn centered(ui: &mut Ui, text: RichText) {
    ui.centered_and_justified(|ui| {
        ui.label(text);
    });
}
