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

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use maud::Markup;
use maud::PreEscaped;
use maud::html;
use quizely_core::markdown::definition_to_html_inline;
use quizely_core::session::Session;
use quizely_core::types::view::View;

use crate::cmd::serve::state::ServerState;
use crate::cmd::serve::template::page_template;

pub async fn get_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    let html = {
        let session = state.session();
        render_page(&session)
    };
    (StatusCode::OK, Html(html.into_string()))
}

pub fn render_page(session: &Session) -> Markup {
    let body = html! {
        div.root {
            (render_header(session.active_view()))
            @match session.active_view() {
                View::Create => {
                    (render_create(session))
                },
                View::View => {
                    (render_cards(session))
                },
            }
        }
    };
    page_template(body)
}

fn render_header(active: View) -> Markup {
    // In the create view the navigation buttons submit the draft form, so
    // that whatever has been typed is kept in the session.
    let form_id: Option<&str> = (active == View::Create).then_some("create-form");
    html! {
        header {
            h1 { "Quizely" }
            form.nav action="/" method="post" {
                button.active[active == View::Create] form=[form_id] type="submit" name="action" value="Create" {
                    "Create Flashcard"
                }
                button.active[active == View::View] form=[form_id] type="submit" name="action" value="View" {
                    "View Flashcards"
                }
            }
        }
    }
}

fn render_error(session: &Session) -> Markup {
    html! {
        @if let Some(message) = session.error_message() {
            div.error role="alert" {
                span { (message) }
            }
        }
    }
}

fn render_create(session: &Session) -> Markup {
    let generating = session.is_generating();
    html! {
        section.create {
            h2 { "Create New Flashcard" }
            (render_error(session))
            form id="create-form" action="/" method="post" {
                input id="term" type="text" name="term" placeholder="Enter Term" value=(session.draft_term());
                div.definition {
                    textarea id="definition" name="definition" placeholder="Enter Definition" rows="4" {
                        (session.draft_definition())
                    }
                    button id="generate" type="submit" name="action" value="Generate" disabled[generating] {
                        @if generating {
                            "Generating..."
                        } @else {
                            "Generate Definition"
                        }
                    }
                }
                button id="add" type="submit" name="action" value="Add" {
                    "Add Flashcard"
                }
            }
        }
    }
}

fn render_cards(session: &Session) -> Markup {
    html! {
        section.cards {
            h2 { "Your Flashcards" }
            (render_error(session))
            @if session.flashcards().is_empty() {
                p.empty { "No flashcards yet. Go to \"Create Flashcard\" to add some!" }
            } @else {
                div.grid {
                    @for card in session.flashcards() {
                        div.card {
                            h3.term { (card.term()) }
                            div.definition {
                                (PreEscaped(definition_to_html_inline(card.definition())))
                            }
                            form action="/" method="post" {
                                input type="hidden" name="card" value=(card.id().value());
                                button.delete type="submit" name="action" value="Delete" aria-label="Delete flashcard" title="Delete flashcard" {
                                    "×"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
