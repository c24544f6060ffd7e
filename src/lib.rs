//! bandsearch: in-memory approximate nearest neighbor search.
//!
//! - [`hash`]: banded random-threshold LSH ([`LshIndex`])
//! - [`store`]: append-only [`VectorStore`] with LSH candidates, exact cosine
//!   re-ranking and brute-force fallback
//! - [`similarity`]: cosine similarity with a typed [`Similarity`] score
//! - [`pca`]: power-iteration PCA ([`PcaReducer`]) for coarse projections
//!
//! ```rust
//! use bandsearch::{Item, PcaReducer, VectorStore};
//!
//! let mut store = VectorStore::new();
//! store.add(Item::new(1, vec![0.3, 0.9, 0.1, 0.4, 0.7], "casual tee"));
//! store.add(Item::new(2, vec![0.7, 0.1, 0.9, 0.1, 0.5], "dress shirt"));
//! store.add(Item::new(3, vec![0.4, 0.3, 0.1, 0.9, 0.8], "sport tee"));
//!
//! for hit in store.search(&[0.3, 0.8, 0.1, 0.3, 0.8], 2) {
//!     println!("{} {:.2}", hit.item.metadata, hit.similarity);
//! }
//!
//! let reduced = PcaReducer::default().reduce(&store.vectors(), 2)?;
//! assert_eq!(reduced.len(), 3);
//! # Ok::<(), bandsearch::RetrieveError>(())
//! ```
//!
//! # Behavior on degenerate input
//!
//! Scoring never fails: mismatched dimensions and zero vectors score
//! [`Similarity::ZERO`]. A query whose buckets are all empty is answered by
//! scanning the whole store. Errors are reserved for invalid parameters and
//! for PCA batches that cannot yield a covariance estimate.
//!
//! # Concurrency
//!
//! Everything is synchronous. `add` takes `&mut self` and `search` takes
//! `&self`, so wrapping a store in a read-write lock gives concurrent searches
//! and serialized inserts.

pub mod error;
pub mod hash;
pub mod pca;
pub mod similarity;
pub mod simd;
pub mod store;

pub use error::{Result, RetrieveError};
pub use hash::{BucketKey, LshIndex, LshParams, LshStats};
pub use pca::{PcaConfig, PcaModel, PcaReducer};
pub use similarity::{cosine_similarity, Similarity};
pub use store::{Item, SearchResult, SearchStats, VectorStore};
