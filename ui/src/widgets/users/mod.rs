//! User management page.
//!
//! Widgets read the states and computes of `roster_business::users`, collect
//! what the user clicked, and hand the actions to `UserListController` once
//! they no longer borrow the context.

mod form;
mod modals;
mod pagination;
mod panel;
mod table;

pub use modals::delete_confirmation_modal;
pub use panel::users_panel;
