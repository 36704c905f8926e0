use egui::Ui;
use roster_business::{UserListController, UserListView};
use roster_states::StateCtx;

/// "Previous" / "Next" buttons around the page label. Buttons are disabled at
/// the bounds, and a click there is ignored anyway.
pub fn pagination_bar(state_ctx: &mut StateCtx, ui: &mut Ui) {
    let (can_go_previous, can_go_next, label) = {
        let view = state_ctx.compute::<UserListView>();
        (view.can_go_previous, view.can_go_next, view.page_label.clone())
    };

    ui.horizontal(|ui| {
        if ui
            .add_enabled(can_go_previous, egui::Button::new("Previous"))
            .clicked()
        {
            UserListController::go_to_previous(state_ctx);
        }
        ui.label(label);
        if ui
            .add_enabled(can_go_next, egui::Button::new("Next"))
            .clicked()
        {
            UserListController::go_to_next(state_ctx);
        }
    });
}
