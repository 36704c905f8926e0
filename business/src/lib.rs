//! Business layer of the Roster front end: REST API helpers, user-list
//! states, computes and commands, and the controller driving them.

pub mod api;
mod config;
mod error;
pub mod http;
pub mod model;
pub mod users;

#[cfg(test)]
mod test_utils;

pub use config::{
    AADHAR_LENGTH, AMOUNT_MAX, AMOUNT_MIN, BusinessConfig, DEFAULT_API_BASE_URL, PAGE_SIZE,
};
pub use error::{ApiError, ApiResult};
pub use model::{NewUser, PageView, ParseRegionError, Region, User, UserId};
pub use users::{
    DeleteConfirmation, DeleteUserCommand, DeleteUserCompute, DeleteUserInput, DeleteUserResult,
    DraftError, LoadPageCommand, LoadPageCompute, LoadPageResult, Notification, PageState,
    Severity, SubmitError, SubmitTarget, SubmitUserCommand, SubmitUserCompute, SubmitUserInput,
    SubmitUserResult, ToastState, UserDraft, UserListController, UserListView, ViewPhase,
};
