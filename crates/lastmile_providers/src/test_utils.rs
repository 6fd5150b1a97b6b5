use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Router,
    extract::{Query, State},
    http::{StatusCode, Uri, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use parking_lot::Mutex;

use crate::{
    directions::DirectionsProvider,
    profile::ProviderKind,
    route::{Route, RouteQuery, RouteResult},
};

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub path: String,
    pub query: HashMap<String, String>,
}

/// Canned HTTP provider served by axum on an ephemeral local port.
pub struct MockProvider {
    status: u16,
    body: String,
    delay: Option<Duration>,
}

struct MockState {
    status: u16,
    body: String,
    delay: Option<Duration>,
    requests: Mutex<Vec<RecordedRequest>>,
}

pub struct MockServer {
    pub url: String,
    state: Arc<MockState>,
}

impl MockProvider {
    /// A one-route OSRM/Mapbox style answer from the gate to the front door.
    pub fn directions(duration_s: f64, distance_m: f64) -> Self {
        Self::json(&format!(
            r#"{{
                "code": "Ok",
                "routes": [{{
                    "geometry": {{"type": "LineString", "coordinates": [[127.181887, 37.556844], [127.18250, 37.55695], [127.183036, 37.557088]]}},
                    "distance": {distance_m},
                    "duration": {duration_s}
                }}]
            }}"#
        ))
    }

    pub fn json(body: &str) -> Self {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn start(self) -> MockServer {
        let state = Arc::new(MockState {
            status: self.status,
            body: self.body,
            delay: self.delay,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        MockServer {
            url: format!("http://{address}"),
            state,
        }
    }
}

impl MockServer {
    pub fn request_count(&self) -> usize {
        self.state.requests.lock().len()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.state.requests.lock().last().cloned()
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    state.requests.lock().push(RecordedRequest {
        path: uri.path().to_string(),
        query,
    });

    if let Some(delay) = state.delay {
        tokio::time::sleep(delay).await;
    }

    let status = StatusCode::from_u16(state.status).unwrap();
    (
        status,
        [(CONTENT_TYPE, "application/json")],
        state.body.clone(),
    )
        .into_response()
}

pub fn mock_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

/// Address nothing listens on.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    format!("http://{address}")
}

/// In-memory provider returning a fixed answer and counting calls.
pub struct FakeProvider {
    kind: ProviderKind,
    result: RouteResult,
    calls: AtomicUsize,
    queries: Mutex<Vec<RouteQuery>>,
}

impl FakeProvider {
    pub fn new(kind: ProviderKind, result: RouteResult) -> Self {
        Self {
            kind,
            result,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn minutes(kind: ProviderKind, duration_min: f64) -> Self {
        Self::new(
            kind,
            Ok(Route {
                geometry: Vec::new(),
                distance_km: 1.0,
                duration_min,
            }),
        )
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<RouteQuery> {
        self.queries.lock().clone()
    }
}

impl DirectionsProvider for FakeProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn fetch(&self, query: &RouteQuery) -> RouteResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().push(query.clone());
        self.result.clone()
    }
}
