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

//! Wire format of the text-generation endpoint, and the [`Generator`] seam
//! through which a session requests definitions.

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;
use std::future::Future;

use serde::Deserialize;
use serde::Serialize;

/// Build the prompt sent for a term. The term is interpolated verbatim.
pub fn definition_prompt(term: &str) -> String {
    format!("Provide a concise definition for the term \"{term}\".")
}

/// Something that can turn a prompt into generated text.
pub trait Generator {
    fn generate(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<String, GenerationError>> + Send;
}

/// Errors that can occur while generating a definition.
#[derive(Clone, Debug, PartialEq)]
pub enum GenerationError {
    /// The request never produced a usable HTTP response.
    Transport(String),
    /// The service answered with a non-success status.
    Api { status: u16, message: String },
    /// The service answered successfully but without generated text.
    MalformedResponse,
}

impl Display for GenerationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationError::Transport(detail) => write!(f, "{detail}"),
            GenerationError::Api { message, .. } => write!(f, "API error: {message}"),
            GenerationError::MalformedResponse => {
                write!(f, "the response did not contain a generated definition")
            }
        }
    }
}

impl Error for GenerationError {}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

/// Body of a `generateContent` request.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
}

impl GenerateRequest {
    /// A request holding a single user-role prompt.
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        }
    }
}

// The response is decoded leniently: every level may be missing, and
// whatever is missing is reported as a malformed response rather than a
// decoding error.

#[derive(Debug, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

impl GenerateResponse {
    /// The text of the first part of the first candidate.
    pub fn extract_text(self) -> Result<String, GenerationError> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .filter(|text| !text.is_empty())
            .ok_or(GenerationError::MalformedResponse)
    }
}

/// Body of an error response.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub message: Option<String>,
}

impl ApiErrorBody {
    /// The upstream message, if there is a non-empty one.
    pub fn into_message(self) -> Option<String> {
        self.error
            .and_then(|detail| detail.message)
            .filter(|message| !message.is_empty())
    }
}
