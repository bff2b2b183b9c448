//! Shared utilities for integration tests: mock upstreams and a relay runner.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use convai_relay::{Credential, HttpServer, RelayConfig, Shutdown};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::handshake::server::{
    ErrorResponse, Request, Response as HandshakeResponse,
};
use tokio_tungstenite::{accept_hdr_async, WebSocketStream};

/// One request as seen by the mock upstream REST API.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    /// Raw path as received (percent-encoding preserved).
    pub path: String,
    pub api_key: Option<String>,
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// What the mock upstream answers with.
#[derive(Debug, Clone)]
pub struct MockReply {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: String,
    pub delay: Option<Duration>,
}

impl MockReply {
    pub fn json(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.into(),
            delay: None,
        }
    }

    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body: body.into(),
            delay: None,
        }
    }
}

type Responder = dyn Fn(&RecordedRequest) -> MockReply + Send + Sync;

/// Recording mock of the upstream REST API.
#[derive(Clone)]
pub struct MockUpstream {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockUpstream {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[derive(Clone)]
struct MockState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    responder: Arc<Responder>,
}

/// Start a mock upstream REST API; every request is recorded and answered
/// by `responder`.
pub async fn start_mock_upstream<F>(responder: F) -> MockUpstream
where
    F: Fn(&RecordedRequest) -> MockReply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));

    let state = MockState {
        requests: requests.clone(),
        responder: Arc::new(responder),
    };
    let app = Router::new().fallback(record).with_state(state);

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream { addr, requests }
}

async fn record(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let request = RecordedRequest {
        method,
        path: uri.path().to_string(),
        api_key: header("xi-api-key"),
        content_type: header("content-type"),
        body,
    };

    let reply = (state.responder)(&request);
    state.requests.lock().unwrap().push(request);

    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }
    (reply.status, [(CONTENT_TYPE, reply.content_type)], reply.body).into_response()
}

/// One upgrade request as seen by the mock upstream WebSocket server.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedHandshake {
    pub api_key: Option<String>,
    pub query: Option<String>,
}

/// Mock upstream conversation WebSocket server; records handshakes.
pub struct WsUpstream {
    pub addr: SocketAddr,
    handshakes: Arc<Mutex<Vec<RecordedHandshake>>>,
}

impl WsUpstream {
    pub fn url(&self) -> String {
        format!("ws://{}/v1/convai/conversation", self.addr)
    }

    /// Every handshake so far.
    pub fn handshakes(&self) -> Vec<RecordedHandshake> {
        self.handshakes.lock().unwrap().clone()
    }
}

/// Start a mock upstream WebSocket server; each accepted socket is handed to
/// `handler` on its own task.
pub async fn start_ws_upstream<F, Fut>(handler: F) -> WsUpstream
where
    F: Fn(WebSocketStream<TcpStream>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handshakes = Arc::new(Mutex::new(Vec::new()));
    let handler = Arc::new(handler);
    let recorded = handshakes.clone();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let handler = handler.clone();
            let recorded = recorded.clone();
            tokio::spawn(async move {
                let callback = |req: &Request, resp: HandshakeResponse| {
                    let api_key = req
                        .headers()
                        .get("xi-api-key")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    let query = req.uri().query().map(str::to_string);
                    recorded
                        .lock()
                        .unwrap()
                        .push(RecordedHandshake { api_key, query });
                    Ok::<_, ErrorResponse>(resp)
                };
                if let Ok(ws) = accept_hdr_async(stream, callback).await {
                    handler(ws).await;
                }
            });
        }
    });

    WsUpstream { addr, handshakes }
}

/// Config pointing both upstream legs at local mocks.
pub fn relay_config(api_base_url: &str, conversation_ws_url: &str) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.api_base_url = api_base_url.into();
    config.upstream.conversation_ws_url = conversation_ws_url.into();
    config.upstream.agent_id = "test-agent".into();
    config
}

/// An address nothing listens on.
pub async fn dead_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Serve the relay on an ephemeral port.
pub async fn start_relay(config: RelayConfig, credential: Option<Credential>) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config, credential).unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
