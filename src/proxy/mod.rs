//! Proxy relay subsystem.
//!
//! # Data Flow
//! ```text
//! /p/<id>?url=<target>&extra=...
//!     → target.rs (scheme + loop checks, raw url decode, merge extras)
//!     → forwarder.rs (upstream call with timeout)
//!     → security::headers (CORS, strip framing/cookies)
//!     → client
//! ```

pub mod forwarder;
pub mod target;

pub use forwarder::{clean_text_body, ProxyForwarder};
pub use target::ProxyTarget;
