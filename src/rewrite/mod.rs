//! Config-document rewriting.
//!
//! # Data Flow
//! ```text
//! ConfigDocument (serde_json::Value)
//!     → engine.rs (walk arrays/objects, find URL-bearing fields)
//!     → source_id.rs (short id per upstream host)
//!     → new Value with gateway-relative URLs
//! ```

pub mod engine;
pub mod source_id;

pub use engine::{prefix_base, rewrite_url, RewriteEngine, URL_MARKER};
pub use source_id::derive_id;
