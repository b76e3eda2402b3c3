//! Documentation page served when no other route applies.

use axum::response::Response;

use crate::config::SourceRegistry;
use crate::http::response;

const TEMPLATE: &str = include_str!("docs.html");

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_page(origin: &str, default_prefix: &str, registry: &SourceRegistry) -> String {
    let sources: Vec<String> = registry
        .iter()
        .map(|source| {
            format!(
                "  <li><code>{}</code> ({}): <code>{}/?format=1&amp;source={}</code></li>",
                escape_html(&source.key),
                escape_html(&source.display_name),
                escape_html(origin),
                escape_html(&source.key),
            )
        })
        .collect();

    TEMPLATE
        .replace("{{ORIGIN}}", &escape_html(origin))
        .replace("{{PREFIX}}", &escape_html(default_prefix))
        .replace("{{DEFAULT_SOURCE}}", &escape_html(registry.default_key()))
        .replace("{{SOURCES}}", &sources.join("\n"))
}

pub fn page(origin: &str, default_prefix: &str, registry: &SourceRegistry) -> Response {
    response::html(render_page(origin, default_prefix, registry))
}
