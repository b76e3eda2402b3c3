//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path, query)
//!     → query.rs (decoded pairs + raw query)
//!     → router.rs (ordered dispatch)
//!     → matcher.rs (evaluate match conditions)
//!     → Dispatch::{Preflight | Health | Proxy | Config | Docs}
//! ```
//!
//! # Design Decisions
//! - Router built at startup, immutable at runtime
//! - Deterministic: same input always yields the same dispatch
//! - No unhandled path: the documentation page is the fallback

pub mod matcher;
pub mod query;
pub mod router;

pub use query::QueryParams;
pub use router::{Dispatch, GatewayRouter};
