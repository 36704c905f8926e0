//! Column definitions for the users table.

use egui_extras::Column;

pub const ID_WIDTH: f32 = 50.0;
pub const PHONE_WIDTH: f32 = 120.0;
pub const AADHAR_WIDTH: f32 = 160.0;
pub const REGION_WIDTH: f32 = 80.0;
pub const AMOUNT_WIDTH: f32 = 70.0;
pub const ACTIONS_WIDTH: f32 = 120.0;
pub const ROW_HEIGHT: f32 = 28.0;
pub const HEADER_HEIGHT: f32 = 24.0;

/// Columns in display order: ID, Name (fills the remaining width), Phone,
/// Aadhar, Region, Amount, Actions.
#[inline]
pub fn table_columns() -> Vec<Column> {
    vec![
        Column::exact(ID_WIDTH),
        Column::remainder().at_least(120.0),
        Column::exact(PHONE_WIDTH),
        Column::exact(AADHAR_WIDTH),
        Column::exact(REGION_WIDTH),
        Column::exact(AMOUNT_WIDTH),
        Column::exact(ACTIONS_WIDTH),
    ]
}
