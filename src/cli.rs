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

use std::process::exit;

use clap::Parser;
use quizely_core::error::Fallible;
use tokio::spawn;

use crate::cmd::define::define_term;
use crate::cmd::serve::server::ServerConfig;
use crate::cmd::serve::server::start_server;
use crate::config::Config;
use crate::config::Overrides;
use crate::utils::wait_for_server;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Edit flashcards through a web interface.
    Serve {
        /// The host address to bind to. Default is 127.0.0.1.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// The port to use for the web server. Default is 8000.
        #[arg(long, default_value_t = 8000)]
        port: u16,
        /// Whether to open the browser automatically. Default is true.
        #[arg(long)]
        open_browser: Option<bool>,
        #[command(flatten)]
        generation: GenerationArgs,
    },
    /// Print a generated definition for a term.
    Define {
        /// The term to define.
        term: String,
        #[command(flatten)]
        generation: GenerationArgs,
    },
}

#[derive(clap::Args)]
struct GenerationArgs {
    /// Path to the configuration file. By default, `quizely.toml` in the current directory is used if it exists.
    #[arg(long)]
    config: Option<String>,
    /// API key for the generation service. Overrides the configuration file.
    #[arg(long)]
    api_key: Option<String>,
    /// Model used to generate definitions. Overrides the configuration file.
    #[arg(long)]
    model: Option<String>,
}

impl GenerationArgs {
    fn load(self) -> Fallible<Config> {
        let overrides = Overrides {
            api_key: self.api_key,
            model: self.model,
        };
        Config::load(self.config, overrides)
    }
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Serve {
            host,
            port,
            open_browser,
            generation,
        } => {
            let config = generation.load()?;
            if open_browser.unwrap_or(true) {
                // Start a separate task to open the browser once the server is up.
                let browser_host = host.clone();
                spawn(async move {
                    match wait_for_server(&browser_host, port).await {
                        Ok(_) => {
                            if let Err(e) = open::that(format!("http://{browser_host}:{port}/")) {
                                log::warn!("Failed to open the browser: {e}");
                            }
                        }
                        Err(e) => {
                            eprintln!("Failed to connect to server: {e}");
                            exit(-1)
                        }
                    }
                });
            }
            let config = ServerConfig {
                host,
                port,
                generation: config.generation,
            };
            start_server(config).await
        }
        Command::Define { term, generation } => {
            let config = generation.load()?;
            define_term(term, config.generation).await
        }
    }
}
