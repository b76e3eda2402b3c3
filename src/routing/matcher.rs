//! Route matching logic.
//!
//! # Responsibilities
//! - Match exact paths and path prefixes (case-sensitive)
//! - Match presence of query parameters
//! - Combine conditions with AND / OR semantics
//!
//! # Design Decisions
//! - No regex to guarantee O(n) matching
//! - Matchers see the path and the decoded query, never the body

use crate::routing::query::QueryParams;

/// Trait for matching requests against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the request matches this condition.
    fn matches(&self, path: &str, query: &QueryParams) -> bool;
}

/// Matches one exact path.
#[derive(Debug, Clone)]
pub struct ExactPathMatcher {
    path: String,
}

impl ExactPathMatcher {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl Matcher for ExactPathMatcher {
    fn matches(&self, path: &str, _query: &QueryParams) -> bool {
        path == self.path
    }
}

/// Matches the request path prefix.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Matcher for PathPrefixMatcher {
    fn matches(&self, path: &str, _query: &QueryParams) -> bool {
        path.starts_with(&self.prefix)
    }
}

/// Matches when a query parameter is present. With `require_value`, an
/// empty value does not count.
#[derive(Debug, Clone)]
pub struct QueryParamMatcher {
    name: String,
    require_value: bool,
}

impl QueryParamMatcher {
    pub fn present(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            require_value: false,
        }
    }

    pub fn non_empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            require_value: true,
        }
    }
}

impl Matcher for QueryParamMatcher {
    fn matches(&self, _path: &str, query: &QueryParams) -> bool {
        if self.require_value {
            query.get(&self.name).is_some_and(|v| !v.is_empty())
        } else {
            query.contains(&self.name)
        }
    }
}

/// Combines multiple matchers with AND semantics.
#[derive(Debug)]
pub struct AndMatcher {
    matchers: Vec<Box<dyn Matcher>>,
}

impl AndMatcher {
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }
}

impl Matcher for AndMatcher {
    fn matches(&self, path: &str, query: &QueryParams) -> bool {
        self.matchers.iter().all(|m| m.matches(path, query))
    }
}

/// Combines multiple matchers with OR semantics.
#[derive(Debug)]
pub struct AnyMatcher {
    matchers: Vec<Box<dyn Matcher>>,
}

impl AnyMatcher {
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }
}

impl Matcher for AnyMatcher {
    fn matches(&self, path: &str, query: &QueryParams) -> bool {
        self.matchers.iter().any(|m| m.matches(path, query))
    }
}
