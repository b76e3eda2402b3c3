//! Config-document caching.
//!
//! # Data Flow
//! ```text
//! get_cached(source_url)
//!     → store.rs   get("CACHE_" + url)   hit → parse → return
//!                                        corrupt → delete, fall through
//!     → fetcher.rs fetch source (non-2xx → FetchError)
//!     → store.rs   put(key, json, ttl)
//! ```
//!
//! # Design Decisions
//! - The store is an accelerator, never a source of truth
//! - No request coalescing; the TTL bounds the cost of concurrent misses
//! - Store failures degrade to direct fetches

pub mod fetcher;
pub mod layer;
pub mod store;

pub use fetcher::{FetchError, HttpFetcher, SourceFetcher};
pub use layer::{CacheError, ConfigCache};
pub use store::{KvStore, MemoryKvStore, StoreError};
