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

//! quizely-core: Core library for the quizely flashcard editor.
//!
//! This library provides:
//! - The flashcard editing session and its state transitions
//! - The wire format of the definition generation service
//! - Markdown rendering of definitions

pub mod error;
pub mod generation;
pub mod markdown;
pub mod session;
pub mod types;

// Re-exports for convenience
pub use error::{ErrorReport, Fallible, fail};
pub use generation::{GenerationError, Generator};
pub use session::{GenerationRequest, Session, SessionError};
pub use types::flashcard::{CardId, Flashcard};
pub use types::view::View;
