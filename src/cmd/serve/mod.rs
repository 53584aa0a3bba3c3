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

mod get;
mod post;
pub mod server;
mod state;
mod template;

#[cfg(test)]
mod tests {
    use std::time::Duration;
    use std::time::Instant;

    use portpicker::pick_unused_port;
    use reqwest::StatusCode;
    use serde_json::Value;
    use serde_json::json;
    use tokio::spawn;

    use crate::cmd::serve::server::ServerConfig;
    use crate::cmd::serve::server::start_server;
    use crate::helper::MockGenerator;
    use crate::helper::MockReply;
    use crate::helper::TEST_HOST;
    use crate::helper::TestResult;
    use crate::helper::start_mock_generator;
    use crate::helper::test_generation_config;
    use crate::utils::wait_for_server;

    /// GET the page until it shows a generation in progress.
    async fn wait_for_generating(port: u16) -> TestResult<String> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let html = reqwest::get(format!("http://{TEST_HOST}:{port}/"))
                .await?
                .text()
                .await?;
            if html.contains("Generating...") {
                return Ok(html);
            }
            assert!(Instant::now() < deadline, "generation never started");
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    /// Start a server whose definitions come from a mock service answering
    /// with `reply`. Returns the server's port and the mock.
    async fn start(reply: MockReply) -> TestResult<(u16, MockGenerator)> {
        let mock = start_mock_generator(reply).await?;
        let port = pick_unused_port().unwrap();
        let config = ServerConfig {
            host: TEST_HOST.to_string(),
            port,
            generation: test_generation_config(&mock.endpoint),
        };
        spawn(async move { start_server(config).await });
        wait_for_server(TEST_HOST, port).await?;
        Ok((port, mock))
    }

    async fn submit(port: u16, form: &[(&str, &str)]) -> TestResult<String> {
        let response = reqwest::Client::new()
            .post(format!("http://{TEST_HOST}:{port}/"))
            .form(form)
            .send()
            .await?;
        assert!(response.status().is_success());
        Ok(response.text().await?)
    }

    #[tokio::test]
    async fn test_start_server_on_port_in_use() -> TestResult<()> {
        let (port, _mock) = start(MockReply::text("unused")).await?;
        let config = ServerConfig {
            host: TEST_HOST.to_string(),
            port,
            generation: test_generation_config("http://127.0.0.1:1/v1beta/models"),
        };
        assert!(start_server(config).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_e2e() -> TestResult<()> {
        let (port, mock) = start(MockReply::text("A test definition.")).await?;

        // Hit the `style.css` endpoint.
        let response = reqwest::get(format!("http://{TEST_HOST}:{port}/style.css")).await?;
        assert!(response.status().is_success());
        assert_eq!(response.headers().get("content-type").unwrap(), "text/css");

        // Hit the `script.js` endpoint.
        let response = reqwest::get(format!("http://{TEST_HOST}:{port}/script.js")).await?;
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/javascript"
        );

        // Hit the not found endpoint.
        let response = reqwest::get(format!("http://{TEST_HOST}:{port}/herp-derp")).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // Hit the root endpoint.
        let response = reqwest::get(format!("http://{TEST_HOST}:{port}/")).await?;
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/html; charset=utf-8"
        );
        let html = response.text().await?;
        assert!(html.contains("Create New Flashcard"));

        // Add with a blank term.
        let html = submit(port, &[("action", "Add"), ("term", " "), ("definition", "x")]).await?;
        assert!(html.contains("Please enter both a term and a definition."));

        // Generate a definition.
        let html = submit(
            port,
            &[
                ("action", "Generate"),
                ("term", "photosynthesis"),
                ("definition", ""),
            ],
        )
        .await?;
        assert!(html.contains("A test definition."));
        assert!(!html.contains("Please enter both"));
        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].body,
            json!({ "contents": [ { "role": "user", "parts": [
                { "text": "Provide a concise definition for the term \"photosynthesis\"." }
            ] } ] })
        );

        // Add the card.
        let html = submit(
            port,
            &[
                ("action", "Add"),
                ("term", "photosynthesis"),
                ("definition", "A test definition."),
            ],
        )
        .await?;
        assert!(!html.contains("photosynthesis"));

        // Browse.
        let html = submit(port, &[("action", "View")]).await?;
        assert!(html.contains("Your Flashcards"));
        assert!(html.contains("photosynthesis"));
        assert!(html.contains("A test definition."));

        // Export.
        let response = reqwest::get(format!("http://{TEST_HOST}:{port}/flashcards.json")).await?;
        assert!(response.status().is_success());
        let cards: Value = response.json().await?;
        assert_eq!(
            cards,
            json!([ { "id": 0, "term": "photosynthesis", "definition": "A test definition." } ])
        );

        // Delete the card.
        let html = submit(port, &[("action", "Delete"), ("card", "0")]).await?;
        assert!(html.contains("No flashcards yet."));

        Ok(())
    }

    #[tokio::test]
    async fn test_requests_while_generating() -> TestResult<()> {
        let delay = Duration::from_millis(800);
        let (port, mock) = start(MockReply::text("A late definition.").delayed(delay)).await?;

        let generating = spawn(async move {
            reqwest::Client::new()
                .post(format!("http://{TEST_HOST}:{port}/"))
                .form(&[
                    ("action", "Generate"),
                    ("term", "photosynthesis"),
                    ("definition", ""),
                ])
                .send()
                .await?
                .text()
                .await
        });

        // The page can be rendered while the request is outstanding.
        let html = wait_for_generating(port).await?;
        assert!(html.contains("value=\"Generate\" disabled"));

        // A second request is turned away.
        let html = submit(
            port,
            &[
                ("action", "Generate"),
                ("term", "photosynthesis"),
                ("definition", ""),
            ],
        )
        .await?;
        assert!(html.contains("A definition is already being generated."));

        // Adding a card does not wait for the generation.
        let started = Instant::now();
        let html = submit(port, &[("action", "Add"), ("term", "A"), ("definition", "a")]).await?;
        assert!(started.elapsed() < delay / 2);
        assert!(!html.contains("role=\"alert\""));
        assert!(html.contains("Generating..."));

        // The result lands in the draft although the draft has moved on.
        let html = generating.await??;
        assert!(html.contains("A late definition."));
        assert!(html.contains("Generate Definition"));
        assert!(!html.contains("Generating..."));
        assert_eq!(mock.requests().len(), 1);

        let html = submit(port, &[("action", "View")]).await?;
        assert!(html.contains("<h3 class=\"term\">A</h3>"));
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_without_term() -> TestResult<()> {
        let (port, mock) = start(MockReply::text("unused")).await?;
        let html = submit(
            port,
            &[("action", "Generate"), ("term", "  "), ("definition", "")],
        )
        .await?;
        assert!(html.contains("Please enter a term before generating a definition."));
        assert!(mock.requests().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_failure() -> TestResult<()> {
        let reply = MockReply::status(500, json!({ "error": { "message": "Internal error." } }));
        let (port, _mock) = start(reply).await?;
        let html = submit(
            port,
            &[
                ("action", "Generate"),
                ("term", "photosynthesis"),
                ("definition", "mine"),
            ],
        )
        .await?;
        assert!(html.contains("Failed to generate definition: API error: Internal error."));
        assert!(html.contains("mine"));
        assert!(html.contains("Generate Definition"));
        Ok(())
    }

    #[tokio::test]
    async fn test_switch_view_keeps_draft_and_clears_error() -> TestResult<()> {
        let (port, _mock) = start(MockReply::text("unused")).await?;
        let html = submit(
            port,
            &[("action", "Add"), ("term", "draft"), ("definition", "")],
        )
        .await?;
        assert!(html.contains("Please enter both a term and a definition."));

        let html = submit(
            port,
            &[("action", "View"), ("term", "draft"), ("definition", "")],
        )
        .await?;
        assert!(!html.contains("Please enter both"));

        let html = submit(port, &[("action", "Create")]).await?;
        assert!(html.contains("value=\"draft\""));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_card() -> TestResult<()> {
        let (port, _mock) = start(MockReply::text("unused")).await?;
        submit(port, &[("action", "Add"), ("term", "A"), ("definition", "a")]).await?;
        let html = submit(port, &[("action", "Delete"), ("card", "99")]).await?;
        assert!(!html.contains("role=\"alert\""));
        let html = submit(port, &[("action", "View")]).await?;
        assert!(html.contains("<h3 class=\"term\">A</h3>"));
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_action() -> TestResult<()> {
        let (port, _mock) = start(MockReply::text("unused")).await?;
        let response = reqwest::Client::new()
            .post(format!("http://{TEST_HOST}:{port}/"))
            .form(&[("action", "Shutdown")])
            .send()
            .await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let response = reqwest::Client::new()
            .post(format!("http://{TEST_HOST}:{port}/"))
            .form(&[("action", "Delete")])
            .send()
            .await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }
}
