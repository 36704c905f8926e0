//! Mock-server helpers for driving the user list through `StateCtx`.
//!
//! ```ignore
//! let mut test_ctx = TestContext::new().await;
//! test_ctx.mock_page(0, sample_users(1..=3), 1).await;
//!
//! test_ctx.mount_and_wait().await;
//! assert_eq!(test_ctx.page().users.len(), 3);
//! ```

use std::time::{Duration, Instant};

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use roster_states::{StateCtx, Time};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

use crate::{BusinessConfig, PageState, Region, User, UserId, UserListController, UserListView};

pub struct TestContext {
    pub mock_server: MockServer,
    pub ctx: StateCtx,
}

impl TestContext {
    pub async fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let mock_server = MockServer::start().await;
        let config = BusinessConfig::new(mock_server.uri());

        let mut ctx = StateCtx::new();
        UserListController::register(&mut ctx, config);
        ctx.state_mut::<Time>().set(start_time());

        Self { mock_server, ctx }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.ctx.state::<Time>().now()
    }

    pub fn set_elapsed_ms(&mut self, ms: i64) {
        self.ctx
            .state_mut::<Time>()
            .set(start_time() + TimeDelta::milliseconds(ms));
    }

    pub fn page(&self) -> &PageState {
        self.ctx.state::<PageState>()
    }

    pub fn view(&self) -> &UserListView {
        self.ctx.compute::<UserListView>()
    }

    /// Pump until no command task is left, awaiting tasks in between.
    ///
    /// Results applied by one pump may dispatch follow-up commands (a reload
    /// after a mutation), so this loops until a pump spawns nothing.
    pub async fn flush_and_wait(&mut self) {
        let timeout = Duration::from_secs(5);
        let start = Instant::now();

        loop {
            UserListController::pump(&mut self.ctx);
            if self.ctx.task_count() == 0 {
                break;
            }

            while self.ctx.task_count() > 0 {
                if start.elapsed() > timeout {
                    panic!(
                        "Timed out waiting for pending tasks ({} still in JoinSet)",
                        self.ctx.task_count()
                    );
                }
                self.ctx.task_set_mut().join_next().await;
            }
        }
    }

    pub async fn mount_and_wait(&mut self) {
        UserListController::mount(&mut self.ctx);
        self.flush_and_wait().await;
    }

    /// Requests received with the given method and path.
    pub async fn count_requests(&self, http_method: &str, request_path: &str) -> usize {
        self.mock_server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| {
                request.method.as_str() == http_method && request.url.path() == request_path
            })
            .count()
    }

    /// `GET /api/users` requests for the given page.
    pub async fn count_page_requests(&self, page: usize) -> usize {
        let page = page.to_string();
        self.mock_server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| {
                request.method.as_str() == "GET"
                    && request.url.path() == "/api/users"
                    && request
                        .url
                        .query_pairs()
                        .any(|(key, value)| key == "page" && value == page.as_str())
            })
            .count()
    }

    // =========================================================================
    // Mock endpoint helpers
    // =========================================================================

    pub async fn mock_page(&self, page: usize, users: Vec<User>, total_pages: usize) {
        self.mock_page_response(
            page,
            ResponseTemplate::new(200).set_body_json(page_body(&users, total_pages)),
        )
        .await;
    }

    pub async fn mock_page_response(&self, page: usize, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/api/users"))
            .and(query_param("page", page.to_string()))
            .and(query_param("size", "10"))
            .respond_with(response)
            .mount(&self.mock_server)
            .await;
    }

    /// Serve `users` split into pages of ten.
    pub async fn mock_dataset(&self, users: &[User]) {
        let total_pages = users.len().div_ceil(10);
        for (page, chunk) in users.chunks(10).enumerate() {
            self.mock_page(page, chunk.to_vec(), total_pages).await;
        }
    }

    pub async fn mock_create(&self, status: u16) {
        let response = if (200..300).contains(&status) {
            ResponseTemplate::new(status).set_body_json(sample_user(100))
        } else {
            ResponseTemplate::new(status).set_body_json(serde_json::json!({
                "error": "Aadhar number already exists"
            }))
        };

        Mock::given(method("POST"))
            .and(path("/api/users"))
            .respond_with(response)
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_update(&self, id: i64, status: u16) {
        Mock::given(method("PUT"))
            .and(path(format!("/api/users/{id}")))
            .respond_with(ResponseTemplate::new(status).set_body_json(sample_user(id)))
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_delete(&self, id: i64, status: u16) {
        Mock::given(method("DELETE"))
            .and(path(format!("/api/users/{id}")))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.mock_server)
            .await;
    }
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

pub fn sample_user(id: i64) -> User {
    let region = Region::ALL[usize::try_from(id).unwrap_or(0) % Region::ALL.len()];
    User {
        id: UserId(id),
        name: format!("User {id}"),
        phone_number: format!("98765{id:05}"),
        aadhar_number: format!("{id:016}"),
        region,
        amount: i32::try_from(id % 1000).unwrap_or(0),
    }
}

pub fn sample_users(ids: std::ops::RangeInclusive<i64>) -> Vec<User> {
    ids.map(sample_user).collect()
}

pub fn page_body(users: &[User], total_pages: usize) -> serde_json::Value {
    serde_json::json!({
        "content": users,
        "totalPages": total_pages,
        "totalElements": users.len(),
    })
}
