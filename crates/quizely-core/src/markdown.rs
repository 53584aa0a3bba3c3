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

use pulldown_cmark::CowStr;
use pulldown_cmark::Event;
use pulldown_cmark::Options;
use pulldown_cmark::Parser;
use pulldown_cmark::Tag;
use pulldown_cmark::html::push_html;

const SAFE_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

/// Whether a link or image target may be emitted as-is. Relative URLs are
/// allowed; absolute ones must use one of [`SAFE_SCHEMES`].
fn is_safe_url(url: &str) -> bool {
    let url = url.trim();
    let scheme_end = match url.find(':') {
        Some(pos) => pos,
        None => return true,
    };
    // A colon after a path, query, or fragment delimiter is not a scheme.
    if url[..scheme_end].contains(['/', '?', '#']) {
        return true;
    }
    let scheme = url[..scheme_end].to_ascii_lowercase();
    SAFE_SCHEMES.contains(&scheme.as_str())
}

fn sanitize_url(url: CowStr<'_>) -> CowStr<'_> {
    if is_safe_url(&url) {
        url
    } else {
        CowStr::Borrowed("")
    }
}

/// Render a flashcard definition from Markdown to HTML.
///
/// Definitions come from the user or from the generation service, so raw HTML
/// in the source is rendered as escaped text rather than passed through, and
/// link and image targets with other schemes than [`SAFE_SCHEMES`] are
/// emptied.
pub fn definition_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(html) | Event::InlineHtml(html) => Event::Text(html),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: sanitize_url(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: sanitize_url(dest_url),
            title,
            id,
        }),
        _ => event,
    });
    let mut html_output: String = String::new();
    push_html(&mut html_output, parser);
    html_output
}

/// Like [`definition_to_html`], but a definition consisting of a single
/// paragraph is returned without the enclosing `<p>` tag.
pub fn definition_to_html_inline(markdown: &str) -> String {
    let text = definition_to_html(markdown);
    match text
        .strip_prefix("<p>")
        .and_then(|rest| rest.strip_suffix("</p>\n"))
    {
        Some(inner) if !inner.contains("<p>") => inner.to_string(),
        _ => text,
    }
}
