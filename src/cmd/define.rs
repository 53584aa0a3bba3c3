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

use quizely_core::error::Fallible;
use quizely_core::generation::Generator;
use quizely_core::session::Session;

use crate::config::GenerationConfig;
use crate::gemini::GeminiClient;

/// Print a generated definition for `term`.
pub async fn define_term(term: String, config: GenerationConfig) -> Fallible<()> {
    let generator = GeminiClient::new(&config)?;
    let definition = define(term, &generator).await?;
    println!("{definition}");
    Ok(())
}

async fn define<G: Generator>(term: String, generator: &G) -> Fallible<String> {
    let mut session = Session::new();
    session.edit_draft_term(term);
    session.generate_definition(generator).await?;
    Ok(session.draft_definition().to_string())
}
