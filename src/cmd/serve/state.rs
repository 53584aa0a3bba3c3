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

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use quizely_core::session::Session;

use crate::gemini::GeminiClient;

#[derive(Clone)]
pub struct ServerState {
    pub generator: Arc<GeminiClient>,
    session: Arc<Mutex<Session>>,
}

impl ServerState {
    pub fn new(generator: GeminiClient) -> Self {
        Self {
            generator: Arc::new(generator),
            session: Arc::new(Mutex::new(Session::new())),
        }
    }

    /// Lock the session. Session updates never panic halfway, so a poisoned
    /// lock still guards a consistent session.
    pub fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
