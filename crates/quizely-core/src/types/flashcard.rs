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

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

/// Opaque identifier assigned to a flashcard when it is added to a session.
///
/// Identifiers are never reused within a session, so a stale identifier
/// (e.g. from a form rendered before another card was deleted) can never
/// address the wrong card.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(u64);

impl CardId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl Display for CardId {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A term and its definition.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Flashcard {
    id: CardId,
    term: String,
    definition: String,
}

impl Flashcard {
    pub fn new(id: CardId, term: String, definition: String) -> Self {
        Self {
            id,
            term,
            definition,
        }
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn definition(&self) -> &str {
        &self.definition
    }
}
