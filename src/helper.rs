// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Test helpers.

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::RawQuery;
use axum::extract::State;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::http::Uri;
use portpicker::pick_unused_port;
use quizely_core::error::Fallible;
use serde_json::Value;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::spawn;
use tokio::time::sleep;

use crate::config::GenerationConfig;
use crate::utils::wait_for_server;

pub const TEST_HOST: &str = "127.0.0.1";

/// What the mock generation service answers with.
#[derive(Clone)]
pub struct MockReply {
    status: u16,
    body: String,
    delay: Duration,
}

impl MockReply {
    /// A successful response carrying `text` as the generated definition.
    pub fn text(text: &str) -> Self {
        let body = json!({
            "candidates": [
                { "content": { "role": "model", "parts": [ { "text": text } ] } }
            ]
        });
        Self::status(200, body)
    }

    pub fn status(status: u16, body: Value) -> Self {
        Self::raw(status, &body.to_string())
    }

    /// A response whose body is sent as-is, even if it is not JSON.
    pub fn raw(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    /// Wait for `delay` before answering.
    pub fn delayed(self, delay: Duration) -> Self {
        Self { delay, ..self }
    }
}

/// A request received by the mock generation service.
#[derive(Clone, Debug)]
pub struct MockRequest {
    pub path: String,
    pub query: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct MockState {
    reply: MockReply,
    requests: Arc<Mutex<Vec<MockRequest>>>,
}

pub struct MockGenerator {
    /// Value for [`GenerationConfig::endpoint`].
    pub endpoint: String,
    requests: Arc<Mutex<Vec<MockRequest>>>,
}

impl MockGenerator {
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Start a stand-in for the generation service that answers every request
/// with `reply`.
pub async fn start_mock_generator(reply: MockReply) -> Fallible<MockGenerator> {
    let port = pick_unused_port().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        reply,
        requests: requests.clone(),
    };
    let app = Router::new().fallback(mock_handler).with_state(state);
    let listener = TcpListener::bind(format!("{TEST_HOST}:{port}")).await?;
    spawn(async move { axum::serve(listener, app).await });
    wait_for_server(TEST_HOST, port).await?;
    Ok(MockGenerator {
        endpoint: format!("http://{TEST_HOST}:{port}/v1beta/models"),
        requests,
    })
}

async fn mock_handler(
    State(state): State<MockState>,
    uri: Uri,
    RawQuery(query): RawQuery,
    Json(body): Json<Value>,
) -> (StatusCode, [(HeaderName, &'static str); 1], String) {
    state.requests.lock().unwrap().push(MockRequest {
        path: uri.path().to_string(),
        query,
        body,
    });
    sleep(state.reply.delay).await;
    let status = StatusCode::from_u16(state.reply.status).unwrap();
    (
        status,
        [(CONTENT_TYPE, "application/json")],
        state.reply.body.clone(),
    )
}

pub fn test_generation_config(endpoint: &str) -> GenerationConfig {
    GenerationConfig {
        endpoint: endpoint.to_string(),
        ..GenerationConfig::default()
    }
}

pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;
