//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → registry.rs (source lookup table)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the source registry never changes at runtime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod registry;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use registry::{ConfigSource, SourceRegistry};
pub use schema::{
    CacheConfig, GatewayConfig, ListenerConfig, ObservabilityConfig, ProxyConfig,
    RewriteConfig, SecurityConfig, SourceEntry, SourcesConfig, TimeoutConfig,
};
