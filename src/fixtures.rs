//! In-process upstream feed for unit tests.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub struct Upstream {
    pub url: String,
    body: &'static str,
    hits: AtomicUsize,
    failing: AtomicBool,
    delay_ms: AtomicU64,
}

impl Upstream {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Duration) {
        self.delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }
}

/// Serves `body` on the current runtime until the test ends.
pub async fn spawn_upstream(body: &'static str) -> Arc<Upstream> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind upstream");
    let addr = listener.local_addr().expect("upstream addr");
    let upstream = Arc::new(Upstream {
        url: format!("http://{addr}/gym_capacity_data.json"),
        body,
        hits: AtomicUsize::new(0),
        failing: AtomicBool::new(false),
        delay_ms: AtomicU64::new(0),
    });

    let app = Router::new()
        .route("/gym_capacity_data.json", get(serve_feed))
        .with_state(Arc::clone(&upstream));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    upstream
}

async fn serve_feed(State(upstream): State<Arc<Upstream>>) -> Response {
    upstream.hits.fetch_add(1, Ordering::SeqCst);
    let delay = upstream.delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
    if upstream.failing.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    ([(header::CONTENT_TYPE, "application/json")], upstream.body).into_response()
}
