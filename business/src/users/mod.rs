//! User list domain module.
//!
//! Home of every state, compute and command behind the user table:
//! - states: the page shown, the form draft, the notification slot, the
//!   pending delete confirmation and the command inputs
//! - computes: command-fed result caches plus the derived `UserListView`
//! - commands: page fetch, create/update, delete
//!
//! UI code reads states and computes and calls `UserListController`; it does
//! not define states or commands of its own.

pub mod controller;
pub mod delete_user;
pub mod draft;
pub mod load_page;
pub mod page;
pub mod submit_user;
pub mod toast;
pub mod view;

pub use controller::{SubmitError, UserListController};
pub use delete_user::{
    DeleteConfirmation, DeleteRequest, DeleteUserCommand, DeleteUserCompute, DeleteUserInput,
    DeleteUserResult,
};
pub use draft::{DraftError, UserDraft};
pub use load_page::{LoadPageCommand, LoadPageCompute, LoadPageResult};
pub use page::{PageState, ViewPhase};
pub use submit_user::{
    SubmitRequest, SubmitTarget, SubmitUserCommand, SubmitUserCompute, SubmitUserInput,
    SubmitUserResult,
};
pub use toast::{Notification, Severity, ToastState};
pub use view::UserListView;
