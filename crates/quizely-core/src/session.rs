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

//! The flashcard editing session.
//!
//! A [`Session`] owns everything the editor shows: the flashcards added so
//! far, the draft being typed, the active view, whether a definition is
//! being generated, and the message of the last failed operation. Every
//! failure is recoverable and is reported twice: as the returned
//! [`SessionError`] and as the session's error message, which replaces any
//! previous one.
//!
//! Generation is split in two phases so that callers sharing a session
//! behind a lock never hold the lock across the network call:
//! [`Session::begin_generation`] marks the request as in flight and hands
//! back the prompt, and [`Session::finish_generation`] applies the outcome.
//! [`Session::generate_definition`] runs both phases for callers that own the
//! session outright.

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

use crate::generation::GenerationError;
use crate::generation::Generator;
use crate::generation::definition_prompt;
use crate::types::flashcard::CardId;
use crate::types::flashcard::Flashcard;
use crate::types::view::View;

#[derive(Clone, Debug, PartialEq)]
pub enum SessionError {
    /// The term or the definition is blank.
    MissingFields,
    /// Generation was requested with a blank term.
    MissingTerm,
    /// Generation was requested while another request is outstanding.
    GenerationInFlight,
    /// The generation request failed.
    Generation(GenerationError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::MissingFields => {
                write!(f, "Please enter both a term and a definition.")
            }
            SessionError::MissingTerm => {
                write!(f, "Please enter a term before generating a definition.")
            }
            SessionError::GenerationInFlight => {
                write!(f, "A definition is already being generated.")
            }
            SessionError::Generation(e) => write!(f, "Failed to generate definition: {e}"),
        }
    }
}

impl Error for SessionError {}

/// A generation request that has been issued but not yet resolved.
#[derive(Clone, Debug)]
pub struct GenerationRequest {
    term: String,
    prompt: String,
}

impl GenerationRequest {
    /// The draft term at the time the request was issued.
    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

#[derive(Debug, Default)]
pub struct Session {
    flashcards: Vec<Flashcard>,
    draft_term: String,
    draft_definition: String,
    active_view: View,
    generation_in_flight: bool,
    error_message: Option<String>,
    next_id: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flashcards(&self) -> &[Flashcard] {
        &self.flashcards
    }

    pub fn draft_term(&self) -> &str {
        &self.draft_term
    }

    pub fn draft_definition(&self) -> &str {
        &self.draft_definition
    }

    pub fn active_view(&self) -> View {
        self.active_view
    }

    pub fn is_generating(&self) -> bool {
        self.generation_in_flight
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn switch_view(&mut self, view: View) {
        self.active_view = view;
        self.error_message = None;
    }

    pub fn edit_draft_term(&mut self, text: impl Into<String>) {
        self.draft_term = text.into();
    }

    pub fn edit_draft_definition(&mut self, text: impl Into<String>) {
        self.draft_definition = text.into();
    }

    /// Turn the draft into a flashcard.
    ///
    /// The draft is stored as typed; trimming is only used to reject blank
    /// fields.
    pub fn add_flashcard(&mut self) -> Result<CardId, SessionError> {
        if self.draft_term.trim().is_empty() || self.draft_definition.trim().is_empty() {
            return Err(self.report(SessionError::MissingFields));
        }
        let id = CardId::new(self.next_id);
        self.next_id += 1;
        let term = std::mem::take(&mut self.draft_term);
        let definition = std::mem::take(&mut self.draft_definition);
        self.flashcards.push(Flashcard::new(id, term, definition));
        self.error_message = None;
        log::debug!("Added flashcard {id}");
        Ok(id)
    }

    /// Remove the flashcard at `index`. Out-of-range indices are ignored.
    pub fn delete_flashcard(&mut self, index: usize) -> Option<Flashcard> {
        if index < self.flashcards.len() {
            Some(self.flashcards.remove(index))
        } else {
            None
        }
    }

    /// Remove the flashcard with the given identifier, if it still exists.
    pub fn delete_flashcard_by_id(&mut self, id: CardId) -> Option<Flashcard> {
        let index = self.flashcards.iter().position(|card| card.id() == id)?;
        self.delete_flashcard(index)
    }

    /// Start generating a definition for the draft term.
    ///
    /// On success the session is marked as generating until
    /// [`Session::finish_generation`] is called.
    pub fn begin_generation(&mut self) -> Result<GenerationRequest, SessionError> {
        if self.draft_term.trim().is_empty() {
            return Err(self.report(SessionError::MissingTerm));
        }
        if self.generation_in_flight {
            return Err(self.report(SessionError::GenerationInFlight));
        }
        self.generation_in_flight = true;
        self.error_message = None;
        log::debug!("Generating a definition for {:?}", self.draft_term);
        Ok(GenerationRequest {
            term: self.draft_term.clone(),
            prompt: definition_prompt(&self.draft_term),
        })
    }

    /// Apply the outcome of a generation request.
    ///
    /// The outcome is applied even if the user has since switched views or
    /// changed the draft term.
    pub fn finish_generation(
        &mut self,
        request: GenerationRequest,
        outcome: Result<String, GenerationError>,
    ) -> Result<(), SessionError> {
        self.generation_in_flight = false;
        if request.term != self.draft_term {
            log::debug!(
                "Draft term changed from {:?} while generating; applying the result anyway",
                request.term
            );
        }
        match outcome {
            Ok(text) => {
                self.draft_definition = text;
                self.error_message = None;
                Ok(())
            }
            Err(e) => {
                log::warn!("Failed to generate a definition for {:?}: {e}", request.term);
                Err(self.report(SessionError::Generation(e)))
            }
        }
    }

    /// Generate a definition for the draft term and write it into the draft
    /// definition.
    ///
    /// The session stays marked as generating only while the returned future
    /// is pending: dropping the future early also clears the flag.
    pub async fn generate_definition<G: Generator>(
        &mut self,
        generator: &G,
    ) -> Result<(), SessionError> {
        let request = self.begin_generation()?;
        let guard = InFlightGuard { session: self };
        let outcome = generator.generate(request.prompt()).await;
        guard.session.finish_generation(request, outcome)
    }

    fn report(&mut self, err: SessionError) -> SessionError {
        self.error_message = Some(err.to_string());
        err
    }
}

/// Clears the in-flight flag when dropped.
struct InFlightGuard<'a> {
    session: &'a mut Session,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.session.generation_in_flight = false;
    }
}
