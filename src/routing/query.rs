//! Query-string view of an inbound request.

use url::form_urlencoded;

/// Decoded query pairs in arrival order, plus the raw query string.
///
/// `get` is last-wins on duplicate keys; `pairs` keeps every occurrence for
/// callers that merge parameters.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    raw: Option<String>,
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn parse(raw: Option<&str>) -> Self {
        let pairs = raw
            .map(|q| {
                form_urlencoded::parse(q.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            raw: raw.map(str::to_string),
            pairs,
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == name)
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// First non-empty, still percent-encoded value of `name` in the raw
    /// query string.
    pub fn raw_value(&self, name: &str) -> Option<&str> {
        self.raw.as_deref()?.split('&').find_map(|segment| {
            let value = segment.strip_prefix(name)?.strip_prefix('=')?;
            (!value.is_empty()).then_some(value)
        })
    }
}
