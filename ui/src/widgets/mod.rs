mod toast;
mod users;

pub use toast::toast;
pub use users::{delete_confirmation_modal, users_panel};
