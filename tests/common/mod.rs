//! Stub ActiveMQ brokers for integration tests
//!
//! Each stub serves the two endpoints the producer talks to: the REST
//! publish endpoint and the Jolokia `Slave` attribute read.

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU16, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// One message as the broker received it
#[derive(Debug, Clone)]
pub struct ReceivedMessage {
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub authorization: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Debug)]
struct StubState {
    master: AtomicBool,
    publish_status: AtomicU16,
    received: Mutex<Vec<ReceivedMessage>>,
}

/// A broker bound to an ephemeral loopback port
pub struct StubBroker {
    addr: SocketAddr,
    state: Arc<StubState>,
    handle: JoinHandle<()>,
}

impl StubBroker {
    pub async fn start(master: bool) -> Self {
        let state = Arc::new(StubState {
            master: AtomicBool::new(master),
            publish_status: AtomicU16::new(200),
            received: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/api/message", post(publish))
            .route("/api/jolokia/read/*mbean", get(probe))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub broker");
        let addr = listener.local_addr().expect("Failed to get local address");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    /// `host:port` as it appears in producer configuration
    pub fn endpoint(&self) -> String {
        format!("127.0.0.1:{}", self.addr.port())
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn set_master(&self, master: bool) {
        self.state.master.store(master, Ordering::SeqCst);
    }

    pub fn set_publish_status(&self, status: u16) {
        self.state.publish_status.store(status, Ordering::SeqCst);
    }

    pub fn received(&self) -> Vec<ReceivedMessage> {
        self.state.received.lock().unwrap().clone()
    }

    /// Stop serving; later connections to the port are refused
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }
}

async fn publish(
    State(state): State<Arc<StubState>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.received.lock().unwrap().push(ReceivedMessage {
        query,
        content_type: header_value(header::CONTENT_TYPE),
        authorization: header_value(header::AUTHORIZATION),
        body: body.to_vec(),
    });
    StatusCode::from_u16(state.publish_status.load(Ordering::SeqCst))
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

async fn probe(State(state): State<Arc<StubState>>) -> impl IntoResponse {
    let slave = !state.master.load(Ordering::SeqCst);
    let body = serde_json::json!({
        "request": {
            "mbean": "org.apache.activemq:brokerName=*,type=Broker",
            "attribute": "Slave",
            "type": "read"
        },
        "value": {
            "org.apache.activemq:brokerName=localhost,type=Broker": { "Slave": slave }
        },
        "status": 200
    });
    (
        [(header::CONTENT_TYPE, "application/json")],
        body.to_string(),
    )
}
