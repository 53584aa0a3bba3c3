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

use axum::Form;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Redirect;
use axum::response::Response;
use quizely_core::generation::GenerationError;
use quizely_core::generation::Generator;
use quizely_core::session::GenerationRequest;
use quizely_core::session::Session;
use quizely_core::types::flashcard::CardId;
use quizely_core::types::view::View;
use serde::Deserialize;
use tokio::spawn;

use crate::cmd::serve::state::ServerState;

#[derive(Deserialize)]
pub struct FormData {
    action: String,
    term: Option<String>,
    definition: Option<String>,
    card: Option<u64>,
}

enum Action {
    Create,
    View,
    Add,
    Generate,
    Delete(CardId),
}

impl Action {
    fn from_form(form: &FormData) -> Option<Self> {
        match form.action.as_str() {
            "Create" => Some(Action::Create),
            "View" => Some(Action::View),
            "Add" => Some(Action::Add),
            "Generate" => Some(Action::Generate),
            "Delete" => form.card.map(|id| Action::Delete(CardId::new(id))),
            _ => None,
        }
    }
}

pub async fn post_handler(State(state): State<ServerState>, Form(form): Form<FormData>) -> Response {
    let Some(action) = Action::from_form(&form) else {
        log::debug!("Rejected form with action {:?}", form.action);
        return (StatusCode::BAD_REQUEST, "Bad Request").into_response();
    };
    let request = {
        let mut session = state.session();
        apply_drafts(&mut session, form);
        match action {
            Action::Create => {
                session.switch_view(View::Create);
                None
            }
            Action::View => {
                session.switch_view(View::View);
                None
            }
            Action::Add => {
                let _ = session.add_flashcard();
                None
            }
            Action::Delete(id) => {
                if session.delete_flashcard_by_id(id).is_none() {
                    log::debug!("Flashcard {id} is already gone");
                }
                None
            }
            Action::Generate => session.begin_generation().ok(),
        }
    };
    if let Some(request) = request {
        generate(state, request).await;
    }
    Redirect::to("/").into_response()
}

/// Copy the draft fields submitted with the form into the session.
fn apply_drafts(session: &mut Session, form: FormData) {
    if let Some(term) = form.term {
        session.edit_draft_term(term);
    }
    if let Some(definition) = form.definition {
        session.edit_draft_definition(definition);
    }
}

/// Run a generation request to completion and apply its outcome.
///
/// The request runs in its own task, so it completes and releases the
/// session's in-flight flag even if the client that asked for it goes away.
async fn generate(state: ServerState, request: GenerationRequest) {
    let fallback = request.clone();
    let task_state = state.clone();
    let task = spawn(async move {
        let outcome = task_state.generator.generate(request.prompt()).await;
        let _ = task_state.session().finish_generation(request, outcome);
    });
    if let Err(e) = task.await {
        log::error!("Generation task failed: {e}");
        let outcome = Err(GenerationError::Transport(
            "the generation task failed".to_string(),
        ));
        let _ = state.session().finish_generation(fallback, outcome);
    }
}
