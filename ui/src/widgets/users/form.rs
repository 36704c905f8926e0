//! Create / edit form.

use egui::{ComboBox, Grid, TextEdit, Ui};
use log::debug;
use roster_business::{
    BusinessConfig, Region, SubmitUserCompute, UserDraft, UserListController,
};
use roster_states::StateCtx;

use crate::utils::colors::COLOR_RED;

const FIELD_WIDTH: f32 = 240.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormAction {
    Submit,
    CancelEdit,
}

/// Renders the draft fields and the submit button. While a submission is in
/// flight the submit button is disabled.
pub fn user_form(state_ctx: &mut StateCtx, ui: &mut Ui) {
    let pending = state_ctx.compute::<SubmitUserCompute>().is_pending();
    let aadhar_hint = format!(
        "{} characters",
        state_ctx.state::<BusinessConfig>().aadhar_length
    );
    let amount_hint = {
        let range = state_ctx.state::<BusinessConfig>().amount_range();
        format!("{} to {}", range.start(), range.end())
    };

    let mut action = None;
    {
        let draft = state_ctx.state_mut::<UserDraft>();
        let title = match draft.editing {
            Some(id) => format!("Edit user {id}"),
            None => "New user".to_owned(),
        };
        ui.heading(title);
        ui.add_space(4.0);

        Grid::new("user_form_grid")
            .num_columns(2)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                ui.label("Name");
                ui.add(TextEdit::singleline(&mut draft.name).desired_width(FIELD_WIDTH));
                ui.end_row();

                ui.label("Phone");
                ui.add(
                    TextEdit::singleline(&mut draft.phone_number).desired_width(FIELD_WIDTH),
                );
                ui.end_row();

                ui.label("Aadhar");
                ui.add(
                    TextEdit::singleline(&mut draft.aadhar_number)
                        .hint_text(aadhar_hint.as_str())
                        .desired_width(FIELD_WIDTH),
                );
                ui.end_row();

                ui.label("Region");
                region_picker(ui, &mut draft.region);
                ui.end_row();

                ui.label("Amount");
                ui.add(
                    TextEdit::singleline(&mut draft.amount)
                        .hint_text(amount_hint.as_str())
                        .desired_width(FIELD_WIDTH),
                );
                ui.end_row();
            });

        for error in &draft.errors {
            ui.colored_label(COLOR_RED, error.to_string());
        }

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            let submit_label = if draft.is_editing() {
                "Save changes"
            } else {
                "Add user"
            };
            if ui
                .add_enabled(!pending, egui::Button::new(submit_label))
                .clicked()
            {
                action = Some(FormAction::Submit);
            }
            if draft.is_editing() && ui.button("Cancel edit").clicked() {
                action = Some(FormAction::CancelEdit);
            }
            if pending {
                ui.spinner();
            }
        });
    }

    match action {
        Some(FormAction::Submit) => {
            if let Err(err) = UserListController::submit_draft(state_ctx) {
                debug!("Submit refused: {err}");
            }
        }
        Some(FormAction::CancelEdit) => UserListController::cancel_edit(state_ctx),
        None => {}
    }
}

fn region_picker(ui: &mut Ui, region: &mut Option<Region>) {
    let selected = region.map_or("Select region", Region::label);
    ComboBox::from_id_salt("region_picker")
        .selected_text(selected)
        .width(FIELD_WIDTH)
        .show_ui(ui, |ui| {
            for option in Region::ALL {
                ui.selectable_value(region, Some(option), option.label());
            }
        });
}
