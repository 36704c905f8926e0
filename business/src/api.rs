//! Users REST API helpers.
//!
//! These functions perform network IO against `{api_url}/users` and are meant
//! to be called from commands only. Callers map results into compute updates.

use log::warn;

use crate::error::{ApiError, ApiResult};
use crate::http::{Client, Response};
use crate::model::{NewUser, PageView, User, UserId};

fn ensure_success(response: &Response) -> ApiResult<()> {
    if response.is_success() {
        Ok(())
    } else {
        Err(ApiError::Status(response.status))
    }
}

/// The backend answers create/update with the stored user, but a 2xx without
/// one still counts as success.
fn parse_saved_user(response: &Response) -> Option<User> {
    match response.json::<User>() {
        Ok(user) => Some(user),
        Err(e) => {
            warn!("Saved user could not be read from response: {e}");
            None
        }
    }
}

/// GET `/users?page={page}&size={size}`
pub async fn list_users(api_url: &str, page: usize, size: usize) -> ApiResult<PageView> {
    let url = format!("{api_url}/users");

    let response = Client::get(&url)
        .query("page", page)
        .query("size", size)
        .header("accept", "application/json")
        .send()
        .await?;

    ensure_success(&response)?;
    PageView::parse(&response.body)
}

/// POST `/users`
pub async fn create_user(api_url: &str, user: &NewUser) -> ApiResult<Option<User>> {
    let url = format!("{api_url}/users");

    let response = Client::post(&url)
        .json(user)
        .map_err(|e| ApiError::Encode(e.to_string()))?
        .send()
        .await?;

    ensure_success(&response)?;
    Ok(parse_saved_user(&response))
}

/// PUT `/users/{id}`
pub async fn update_user(api_url: &str, id: UserId, user: &NewUser) -> ApiResult<Option<User>> {
    let url = format!("{api_url}/users/{id}");

    let response = Client::put(&url)
        .json(user)
        .map_err(|e| ApiError::Encode(e.to_string()))?
        .send()
        .await?;

    ensure_success(&response)?;
    Ok(parse_saved_user(&response))
}

/// DELETE `/users/{id}`
pub async fn delete_user(api_url: &str, id: UserId) -> ApiResult<()> {
    let url = format!("{api_url}/users/{id}");

    let response = Client::delete(&url).send().await?;

    ensure_success(&response)
}
