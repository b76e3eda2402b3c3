//! Recursive rewrite of upstream API URLs inside config documents.
//!
//! Every URL-bearing field `F` holding `https://up.example/api.php` becomes
//! `<base>/p/<source-id>?url=https://up.example/api.php`, so later calls to
//! that API go through the proxy relay. Rewriting an already rewritten
//! document with the same prefix yields the same document.

use serde_json::{Map, Value};

use crate::config::RewriteConfig;
use crate::rewrite::source_id::derive_id;

/// Query marker separating a gateway route from the original URL.
pub const URL_MARKER: &str = "?url=";

/// Rewrites the configured URL-bearing fields of a JSON document.
#[derive(Debug, Clone)]
pub struct RewriteEngine {
    url_fields: Vec<String>,
}

impl RewriteEngine {
    pub fn new<I, S>(url_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            url_fields: url_fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &RewriteConfig) -> Self {
        Self::new(config.url_fields.iter().cloned())
    }

    fn is_url_field(&self, key: &str) -> bool {
        self.url_fields.iter().any(|f| f == key)
    }

    /// Produce a rewritten copy of `document`. The input is never modified.
    pub fn rewrite(&self, document: &Value, prefix: &str) -> Value {
        match document {
            Value::Array(items) => Value::Array(
                items.iter().map(|item| self.rewrite(item, prefix)).collect(),
            ),
            Value::Object(fields) => {
                let mut out = Map::with_capacity(fields.len());
                for (key, value) in fields {
                    let rewritten = match value {
                        Value::String(url) if self.is_url_field(key) => {
                            Value::String(rewrite_url(url, prefix))
                        }
                        other => self.rewrite(other, prefix),
                    };
                    out.insert(key.clone(), rewritten);
                }
                Value::Object(out)
            }
            scalar => scalar.clone(),
        }
    }
}

/// `prefix` without a trailing `/?url=` or `?url=`.
pub fn prefix_base(prefix: &str) -> &str {
    prefix
        .strip_suffix(URL_MARKER)
        .map(|base| base.strip_suffix('/').unwrap_or(base))
        .unwrap_or(prefix)
}

fn after_marker(value: &str) -> Option<&str> {
    value
        .find(URL_MARKER)
        .map(|idx| &value[idx + URL_MARKER.len()..])
}

/// Text after the `?url=` that follows a `<base>/p/<id>` route, if `value`
/// has that form.
fn after_route<'a>(value: &'a str, route: &str) -> Option<&'a str> {
    value.strip_prefix(route).and_then(after_marker)
}

/// Strip previous gateway routing from `value`. This engine's own
/// `<base>/p/<id>?url=` routes are peeled first, since the prefix itself may
/// contain `?url=`. Un-nesting then repeats while the remainder is itself
/// routed through `prefix`.
fn unnest<'a>(value: &'a str, prefix: &str) -> &'a str {
    let route = format!("{}/p/", prefix_base(prefix));

    let mut rest = value;
    while let Some(inner) = after_route(rest, &route) {
        rest = inner;
    }
    if rest.len() == value.len() {
        rest = after_marker(value).unwrap_or(value);
    }

    while rest.starts_with(prefix) {
        match after_marker(rest) {
            Some(inner) => rest = inner,
            None => break,
        }
    }
    rest
}

/// Rewrite a single URL against `prefix`.
pub fn rewrite_url(value: &str, prefix: &str) -> String {
    let original = unnest(value, prefix);
    if original.starts_with(prefix) {
        return original.to_string();
    }

    let source_id = derive_id(original);
    format!("{}/p/{}{}{}", prefix_base(prefix), source_id, URL_MARKER, original)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PREFIX: &str = "https://gw.example/?url=";

    fn engine() -> RewriteEngine {
        RewriteEngine::new(["api", "baseUrl"])
    }

    #[test]
    fn test_prefix_base() {
        assert_eq!(prefix_base("https://gw.example/?url="), "https://gw.example");
        assert_eq!(prefix_base("https://gw.example?url="), "https://gw.example");
        assert_eq!(prefix_base("https://gw.example/proxy"), "https://gw.example/proxy");
    }

    #[test]
    fn test_rewrites_base_url_field() {
        let doc = json!({"baseUrl": "https://caiji.foo.com/api.php"});
        assert_eq!(
            engine().rewrite(&doc, PREFIX),
            json!({"baseUrl": "https://gw.example/p/foo?url=https://caiji.foo.com/api.php"})
        );
    }

    #[test]
    fn test_walks_nested_structures() {
        let doc = json!({
            "cache_time": 7200,
            "api_site": {
                "ikun": {"api": "https://ikunzy.com/api.php/provide/vod", "name": "iKun"},
                "dead": {"api": null, "name": "Dead"}
            },
            "list": [{"baseUrl": "https://api.bar.net/vod"}, "https://not-a-field.example"],
            "detail": "https://untouched.example"
        });

        let out = engine().rewrite(&doc, PREFIX);
        assert_eq!(
            out["api_site"]["ikun"]["api"],
            "https://gw.example/p/ikun?url=https://ikunzy.com/api.php/provide/vod"
        );
        assert_eq!(out["api_site"]["ikun"]["name"], "iKun");
        assert_eq!(out["api_site"]["dead"]["api"], Value::Null);
        assert_eq!(out["list"][0]["baseUrl"], "https://gw.example/p/bar?url=https://api.bar.net/vod");
        assert_eq!(out["list"][1], "https://not-a-field.example");
        assert_eq!(out["detail"], "https://untouched.example");
        assert_eq!(out["cache_time"], 7200);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let doc = json!({"api": "https://abczyapi.com/x"});
        let snapshot = doc.clone();
        let _ = engine().rewrite(&doc, PREFIX);
        assert_eq!(doc, snapshot);
    }

    #[test]
    fn test_previous_gateway_is_replaced() {
        let doc = json!({"api": "https://old-gw.example/p/foo?url=https://caiji.foo.com/api.php"});
        assert_eq!(
            engine().rewrite(&doc, PREFIX)["api"],
            "https://gw.example/p/foo?url=https://caiji.foo.com/api.php"
        );
    }

    #[test]
    fn test_scalars_pass_through() {
        for doc in [json!(null), json!(true), json!(3.5), json!("https://caiji.foo.com")] {
            assert_eq!(engine().rewrite(&doc, PREFIX), doc);
        }
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let docs = [
            json!({"api": "https://caiji.foo.com/api.php"}),
            json!([{"baseUrl": "https://x.example/?url=https://abczyapi.com/x"}]),
            json!({"api": "https://gw.example/?url=https://gw.example/?url=https://y.example"}),
            json!({"api": "not a url"}),
            json!({"nested": {"api": ["https://a.example"], "baseUrl": ""}}),
        ];
        let prefixes = [
            PREFIX,
            "https://gw.example?url=",
            "http://127.0.0.1:8080/?url=",
            "https://gw.example/relay",
            "https://gw.example/?url=x",
            "https://gw.example/?url=a?url=b/?url=",
        ];

        for doc in &docs {
            for prefix in prefixes {
                let once = engine().rewrite(doc, prefix);
                let twice = engine().rewrite(&once, prefix);
                assert_eq!(once, twice, "prefix {prefix} doc {doc}");
            }
        }
    }

    #[test]
    fn test_marker_inside_prefix_is_not_rewrapped() {
        let prefix = "https://gw.example/?url=x";
        let doc = json!({"api": "https://caiji.foo.com/api.php"});

        let once = engine().rewrite(&doc, prefix);
        assert_eq!(
            once["api"],
            "https://gw.example/?url=x/p/foo?url=https://caiji.foo.com/api.php"
        );
        assert_eq!(engine().rewrite(&once, prefix), once);
    }

    #[test]
    fn test_value_already_under_prefix_is_kept() {
        let prefix = "https://gw.example/relay";
        let value = "https://gw.example/relay/p/foo";
        assert_eq!(rewrite_url(value, prefix), value);
    }
}
