//! Search Tooling
//!
//! This module provides the search side of a workflow: the provider seam and
//! the never-failing operation that wraps it.
//!
//! # Module Structure
//!
//! - [`search`](crate::tools::search) - `SearchProvider`, `DuckDuckGoProvider`, `SearchOperation`
//!
//! # Web Search
//!
//! ```ignore
//! let op = SearchOperation::new(Arc::new(DuckDuckGoProvider::new()))
//!     .with_max_results(5)
//!     .with_timeout(Duration::from_secs(30));
//!
//! let result = op.execute("rust programming").await;
//! for hit in &result.results {
//!     println!("{}: {}", hit.title, hit.url);
//! }
//! ```
//!
//! Providers are swappable: anything implementing [`SearchProvider`] can back
//! a search node, which is how the tests inject deterministic results.

/// Web search provider and operation.
pub mod search;

pub use search::{
    DuckDuckGoProvider, ProviderHit, SearchOperation, SearchProvider, DEFAULT_MAX_RESULTS,
};
