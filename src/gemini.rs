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

//! Client for the Gemini `generateContent` endpoint.

use quizely_core::error::ErrorReport;
use quizely_core::error::Fallible;
use quizely_core::generation::ApiErrorBody;
use quizely_core::generation::GenerateRequest;
use quizely_core::generation::GenerateResponse;
use quizely_core::generation::GenerationError;
use quizely_core::generation::Generator;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;

use crate::config::GenerationConfig;

pub struct GeminiClient {
    client: Client,
    url: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(config: &GenerationConfig) -> Fallible<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ErrorReport::new(format!("Failed to build HTTP client: {e}")))?;
        let url = format!(
            "{}/{}:generateContent",
            config.endpoint.trim_end_matches('/'),
            config.model
        );
        let api_key = Some(config.api_key.clone()).filter(|key| !key.is_empty());
        Ok(Self {
            client,
            url,
            api_key,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Generator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let mut request = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .json(&GenerateRequest::from_prompt(prompt));
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }
        let response = request
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let fallback = status
                .canonical_reason()
                .unwrap_or(status.as_str())
                .to_string();
            let message = response
                .json::<ApiErrorBody>()
                .await
                .ok()
                .and_then(ApiErrorBody::into_message)
                .unwrap_or(fallback);
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        // A success status with an undecodable body is treated like one
        // without generated text.
        let body: GenerateResponse = response.json().await.map_err(|e| {
            if e.is_decode() {
                log::debug!("Undecodable generation response: {e}");
                GenerationError::MalformedResponse
            } else {
                GenerationError::Transport(e.to_string())
            }
        })?;
        body.extract_text()
    }
}
