use std::time::Duration;

use egui_kittest::Harness;
use roster_business::{DeleteUserCompute, PageState, SubmitUserCompute};
use roster_ui::RosterApp;
use roster_ui::state::State;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Sleep between frames while requests are in flight.
pub const DEFAULT_NETWORK_WAIT_MS: u64 = 10;
/// Upper bound on frames spent waiting for the app to go idle.
pub const MAX_SETTLE_STEPS: usize = 300;

pub struct TestCtx<'a> {
    mock_server: MockServer,
    harness: Harness<'a, RosterApp>,
}

impl<'a> TestCtx<'a> {
    /// Builds the app against `mock_server`. Mount the mocks first: the
    /// first frame already fetches page 0.
    pub fn new(mock_server: MockServer) -> Self {
        let state = State::test(mock_server.uri());
        let app = RosterApp::new(state);
        let harness = Harness::new_eframe(|_| app);

        Self {
            mock_server,
            harness,
        }
    }

    pub fn harness_mut(&mut self) -> &mut Harness<'a, RosterApp> {
        &mut self.harness
    }

    #[allow(unused)]
    pub fn harness(&self) -> &Harness<'a, RosterApp> {
        &self.harness
    }

    #[allow(unused)]
    pub fn mock_server(&self) -> &MockServer {
        &self.mock_server
    }

    /// Steps frames until no command is running and no result is pending.
    pub async fn settle(&mut self) {
        for _ in 0..MAX_SETTLE_STEPS {
            self.harness.step();
            if is_idle(self.harness.state()) {
                self.harness.step();
                return;
            }
            yield_wait_for_network(DEFAULT_NETWORK_WAIT_MS).await;
        }
        panic!("App did not settle within {MAX_SETTLE_STEPS} frames");
    }

    /// Requests received with the given method and path.
    #[allow(unused)]
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
}

fn is_idle(app: &RosterApp) -> bool {
    let ctx = &app.state.ctx;
    let page = ctx.state::<PageState>();
    ctx.task_count() == 0
        && !page.loading
        && !page.needs_fetch()
        && !ctx.compute::<SubmitUserCompute>().is_pending()
        && !ctx.compute::<DeleteUserCompute>().is_pending()
}

/// Lets spawned requests and the mock server make progress.
pub async fn yield_wait_for_network(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

pub async fn start_server() -> MockServer {
    let _ = env_logger::builder().is_test(true).try_init();
    MockServer::start().await
}

/// Wire format of one user row.
#[allow(unused)]
pub fn user_json(id: i64) -> serde_json::Value {
    let region = ["REGION1", "REGION2", "REGION3"][usize::try_from(id).unwrap_or(0) % 3];
    serde_json::json!({
        "id": id,
        "name": format!("User {id}"),
        "phoneNumber": format!("98765{id:05}"),
        "aadharNumber": format!("{id:016}"),
        "region": region,
        "amount": id % 1000,
    })
}

#[allow(unused)]
pub async fn mock_page(
    server: &MockServer,
    page: usize,
    ids: std::ops::RangeInclusive<i64>,
    total_pages: usize,
) {
    let content: Vec<_> = ids.map(user_json).collect();
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(query_param("page", page.to_string()))
        .and(query_param("size", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "content": content,
            "totalPages": total_pages,
        })))
        .mount(server)
        .await;
}

#[allow(unused)]
pub async fn mock_empty_page(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "content": [],
            "totalPages": 0,
        })))
        .mount(server)
        .await;
}
