use axum::extract::ConnectInfo;
use axum_test::TestServer;
use serde_json::json;
use sqlx::SqlitePool;
use std::net::SocketAddr;
use std::time::Duration;
use tinyurl_service::routes::{HttpSettings, RateLimitSettings, app_router};
use tinyurl_service::state::{AppState, ServiceSettings};
use tower::Layer;

#[derive(Clone)]
struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

fn rate_limited_server(pool: SqlitePool, burst: u32) -> TestServer {
    let state = AppState::new(pool, None, ServiceSettings::default());
    let settings = HttpSettings {
        rate_limit: Some(RateLimitSettings {
            per_second: 60,
            burst,
            behind_proxy: false,
        }),
        request_timeout: Duration::from_secs(5),
    };

    let app = app_router(state, &settings).layer(MockConnectInfoLayer);

    TestServer::new(app).unwrap()
}

#[sqlx::test]
async fn test_shorten_is_rate_limited(pool: SqlitePool) {
    let server = rate_limited_server(pool, 2);

    for n in 0..2 {
        let response = server
            .post("/shorten")
            .json(&json!({ "url": format!("https://example.com/{n}") }))
            .await;
        assert_eq!(response.status_code(), 201);
    }

    let response = server
        .post("/shorten")
        .json(&json!({ "url": "https://example.com/over-limit" }))
        .await;

    assert_eq!(response.status_code(), 429);
}

#[sqlx::test]
async fn test_health_is_not_rate_limited(pool: SqlitePool) {
    let server = rate_limited_server(pool, 1);

    for _ in 0..5 {
        server.get("/health").await.assert_status_ok();
    }
}

#[sqlx::test]
async fn test_unknown_route_is_not_found(pool: SqlitePool) {
    let state = AppState::new(pool, None, ServiceSettings::default());
    let server = TestServer::new(app_router(state, &HttpSettings::default())).unwrap();

    let response = server.get("/some/nested/path").await;

    assert_eq!(response.status_code(), 404);
    assert_eq!(response.text(), "not found");
}
