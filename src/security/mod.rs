//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Forwarded request:
//!     → headers.rs (drop hop-by-hop and host headers)
//! Relayed response:
//!     → headers.rs (CORS set, drop framing and cookie headers, charset)
//! ```
//!
//! # Design Decisions
//! - Session state never crosses origins (cookies stripped)
//! - Every response, including errors, carries CORS headers

pub mod headers;
