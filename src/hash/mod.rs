//! Locality-sensitive hashing over dense vectors.
//!
//! The core idea: **design hash functions where similar items collide more
//! often than dissimilar ones**. Traditional hash functions try to minimize
//! collisions; LSH wants them for nearby inputs, so a query only needs to be
//! compared against the items sharing its buckets.
//!
//! ## Banded thresholds
//!
//! This index compares each vector position against a random threshold in
//! `[0, 1)`. Two vectors disagree on a position only when a threshold falls
//! between their values, so for features scaled to `[0, 1]`:
//!
//! ```text
//! P[bit_p(a) = bit_p(b)] = 1 - |a_p - b_p|
//! ```
//!
//! Bits are grouped into `num_bands` bands of `band_size` bits. A table's key
//! is the sequence of band codes, so two vectors share a bucket only when
//! every compared position agrees. Several independent tables (each with its
//! own threshold stream) recover recall: a query's candidates are the union
//! of its buckets over all tables.
//!
//! Only the first `num_bands * band_size` positions take part in hashing.
//! Vectors shorter than that hash with fewer bits.
//!
//! ```rust
//! use bandsearch::hash::{LshIndex, LshParams};
//!
//! let mut index = LshIndex::new(LshParams::new(5, 4, 2))?;
//! index.insert(0, &[0.3, 0.9, 0.1, 0.4, 0.7]);
//! index.insert(1, &[0.7, 0.1, 0.9, 0.1, 0.5]);
//!
//! // Candidates still need exact re-ranking.
//! let candidates = index.candidates(&[0.3, 0.9, 0.1, 0.4, 0.7]);
//! assert!(candidates.contains(&0));
//! # Ok::<(), bandsearch::RetrieveError>(())
//! ```
//!
//! ## References
//!
//! - Indyk & Motwani (1998). "Approximate nearest neighbors: towards removing
//!   the curse of dimensionality."
//! - Leskovec, Rajaraman & Ullman, *Mining of Massive Datasets*, ch. 3
//!   (banding technique).

mod hyperplane;
mod index;
mod table;

pub use hyperplane::{BucketKey, RandomHyperplaneHasher};
pub use index::{LshIndex, LshParams, LshStats, MAX_HASH_WIDTH, MAX_TABLES};
