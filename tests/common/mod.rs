//! Shared utilities for integration tests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;

/// A request as seen by the mock document endpoint.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct RecordedRequest {
    pub id: String,
    pub if_none_match: Option<String>,
    pub partition_key: Option<String>,
    pub authorization: Option<String>,
}

#[derive(Clone, Default)]
struct MockState {
    documents: Arc<Mutex<HashMap<String, (String, String)>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    forced_status: Arc<AtomicU16>,
    revision: Arc<AtomicU64>,
}

/// Document endpoint serving `GET /docs/{id}` with etag preconditions.
#[derive(Clone)]
pub struct MockDocumentServer {
    pub addr: SocketAddr,
    state: MockState,
}

#[allow(dead_code)]
impl MockDocumentServer {
    /// Bind on an ephemeral port and start serving.
    pub async fn start() -> Self {
        let state = MockState::default();
        let app = Router::new()
            .route("/docs/{id}", get(read_document))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn endpoint(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Store a document body, returning its new etag.
    pub fn put(&self, id: &str, body: &str) -> String {
        let revision = self.state.revision.fetch_add(1, Ordering::SeqCst) + 1;
        let etag = format!("\"rev-{}\"", revision);
        self.state
            .documents
            .lock()
            .unwrap()
            .insert(id.to_string(), (body.to_string(), etag.clone()));
        etag
    }

    /// Answer every request with `status` (0 restores normal behavior).
    pub fn force_status(&self, status: u16) {
        self.state.forced_status.store(status, Ordering::SeqCst);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

async fn read_document(
    State(state): State<MockState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let header_str = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let if_none_match = header_str("if-none-match");
    state.requests.lock().unwrap().push(RecordedRequest {
        id: id.clone(),
        if_none_match: if_none_match.clone(),
        partition_key: header_str("x-partition-key"),
        authorization: header_str("authorization"),
    });

    let forced = state.forced_status.load(Ordering::SeqCst);
    if forced != 0 {
        let status = StatusCode::from_u16(forced).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return status.into_response();
    }

    let document = state.documents.lock().unwrap().get(&id).cloned();
    match document {
        None => StatusCode::NOT_FOUND.into_response(),
        Some((_, etag)) if if_none_match.as_deref() == Some(etag.as_str()) => {
            StatusCode::NOT_MODIFIED.into_response()
        }
        Some((body, etag)) => (StatusCode::OK, [(header::ETAG, etag)], body).into_response(),
    }
}
