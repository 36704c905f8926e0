//! Table components for the users page:
//! - `columns`: column definitions and widths
//! - `header`: header rendering
//! - `row`: row rendering and the per-row actions

pub mod columns;
pub mod header;
pub mod row;

use egui::Ui;
use egui_extras::TableBuilder;
use roster_business::User;

use self::columns::{HEADER_HEIGHT, ROW_HEIGHT, table_columns};
use self::header::render_table_header;
pub use self::row::RowAction;
use self::row::render_user_row;

/// Renders the users of the current page. Returns the action clicked in any
/// row during this frame.
pub fn users_table(ui: &mut Ui, users: &[User]) -> Option<RowAction> {
    let mut clicked = None;

    let builder = TableBuilder::new(ui)
        .id_salt("users_table")
        .striped(true)
        .resizable(false)
        .vscroll(false)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center));
    let builder = table_columns()
        .into_iter()
        .fold(builder, |builder, column| builder.column(column));

    builder
        .header(HEADER_HEIGHT, |mut header| {
            render_table_header(&mut header);
        })
        .body(|mut body| {
            for user in users {
                body.row(ROW_HEIGHT, |mut row| {
                    if let Some(action) = render_user_row(&mut row, user) {
                        clicked = Some(action);
                    }
                });
            }
        });

    clicked
}
