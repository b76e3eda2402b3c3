//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, dispatch)
//!     → request.rs (request ID, gateway origin)
//!     → [routing decides preflight/health/proxy/config/docs]
//!     → response.rs / docs.rs (body, CORS headers)
//!     → Send to client
//! ```

pub mod docs;
pub mod request;
pub mod response;
pub mod server;

pub use request::{gateway_origin, UuidRequestId, X_REQUEST_ID};
pub use server::HttpServer;
