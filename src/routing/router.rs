//! Request dispatch.
//!
//! # Order
//! 1. `OPTIONS` → preflight
//! 2. `/health` → liveness
//! 3. (`/p/*` or `/`) with a non-empty `url` → proxy relay
//! 4. `format` present (even empty) → config pipeline
//! 5. anything else → documentation page
//!
//! Immutable after construction; every request maps to exactly one outcome.

use axum::http::Method;

use crate::routing::matcher::{
    AndMatcher, AnyMatcher, ExactPathMatcher, Matcher, PathPrefixMatcher, QueryParamMatcher,
};
use crate::routing::query::QueryParams;

pub const HEALTH_PATH: &str = "/health";
pub const PROXY_PATH_PREFIX: &str = "/p/";

/// Where a request goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Preflight,
    Health,
    /// Decoded `url` parameter.
    Proxy { target: String },
    /// Raw `format` parameter value.
    Config { format: String },
    Docs,
}

impl Dispatch {
    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Dispatch::Preflight => "preflight",
            Dispatch::Health => "health",
            Dispatch::Proxy { .. } => "proxy",
            Dispatch::Config { .. } => "config",
            Dispatch::Docs => "docs",
        }
    }
}

#[derive(Debug)]
pub struct GatewayRouter {
    health: Box<dyn Matcher>,
    proxy: Box<dyn Matcher>,
    config: Box<dyn Matcher>,
}

impl GatewayRouter {
    pub fn new() -> Self {
        Self {
            health: Box::new(ExactPathMatcher::new(HEALTH_PATH)),
            proxy: Box::new(AndMatcher::new(vec![
                Box::new(AnyMatcher::new(vec![
                    Box::new(PathPrefixMatcher::new(PROXY_PATH_PREFIX)),
                    Box::new(ExactPathMatcher::new("/")),
                ])),
                Box::new(QueryParamMatcher::non_empty("url")),
            ])),
            config: Box::new(QueryParamMatcher::present("format")),
        }
    }

    pub fn classify(&self, method: &Method, path: &str, query: &QueryParams) -> Dispatch {
        if *method == Method::OPTIONS {
            return Dispatch::Preflight;
        }
        if self.health.matches(path, query) {
            return Dispatch::Health;
        }
        if self.proxy.matches(path, query) {
            if let Some(target) = query.get("url") {
                return Dispatch::Proxy {
                    target: target.to_string(),
                };
            }
        }
        if self.config.matches(path, query) {
            if let Some(format) = query.get("format") {
                return Dispatch::Config {
                    format: format.to_string(),
                };
            }
        }
        Dispatch::Docs
    }
}

impl Default for GatewayRouter {
    fn default() -> Self {
        Self::new()
    }
}
