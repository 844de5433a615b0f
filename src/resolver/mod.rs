//! Entity resolution against the Wikidata knowledge base
//!
//! ```text
//! EntityResolver::resolve("Dostoevsky")
//!         │
//!         ├─► normalize_mention      (trim, newlines → spaces)
//!         ├─► ResolutionCache::get   (hit → return, no network)
//!         └─► EntitySearch::search   (up to max_retries, 2^i backoff)
//!                 ├─► Ok(Some/None)  → cached, returned
//!                 └─► Err after last → logged, NOT cached
//! ```

pub mod cache;
pub mod normalize;
pub mod search;
pub mod service;

pub use cache::{ResolutionCache, ResolutionResult};
pub use normalize::{node_local_name, normalize_mention};
pub use search::{EntitySearch, WikidataSearch};
pub use service::{EntityResolver, ResolverStats};
