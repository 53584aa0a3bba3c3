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

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use quizely_core::error::ErrorReport;
use quizely_core::error::Fallible;
use serde::Deserialize;

/// The configuration file looked up in the working directory when no path is
/// given on the command line.
pub const DEFAULT_CONFIG_FILE: &str = "quizely.toml";

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub generation: GenerationConfig,
}

/// Settings for the definition generation service.
#[derive(Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct GenerationConfig {
    /// Base URL of the models collection. The model name and the
    /// `:generateContent` method are appended to it.
    pub endpoint: String,
    pub model: String,
    /// Sent as the `key` query parameter when non-empty.
    pub api_key: String,
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl GenerationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Values given on the command line, which take precedence over the file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub model: Option<String>,
}

impl Config {
    /// Load the configuration.
    ///
    /// An explicit path must exist. Without one, `quizely.toml` in the
    /// current directory is used if present, and the defaults otherwise.
    pub fn load(path: Option<String>, overrides: Overrides) -> Fallible<Self> {
        let path: Option<PathBuf> = match path {
            Some(path) => {
                let path = PathBuf::from(path);
                if !path.exists() {
                    return Err(ErrorReport::new(format!(
                        "config file does not exist: {}",
                        path.display()
                    )));
                }
                Some(path)
            }
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if path.exists() { Some(path) } else { None }
            }
        };
        let config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        Ok(config.with_overrides(overrides))
    }

    fn from_file(path: &Path) -> Fallible<Self> {
        log::debug!("Reading configuration from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Fallible<Self> {
        toml::from_str(text)
            .map_err(|e| ErrorReport::new(format!("Failed to parse configuration: {e}")))
    }

    fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(api_key) = overrides.api_key {
            self.generation.api_key = api_key;
        }
        if let Some(model) = overrides.model {
            self.generation.model = model;
        }
        self
    }
}
