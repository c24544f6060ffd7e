//! Append-only vector store with LSH-backed top-k search.
//!
//! Items are kept in insertion order; their position is the identifier the
//! index uses. Search gathers LSH candidates and re-ranks them with exact
//! cosine similarity. When no bucket matches, the store scores every item
//! instead, so a non-empty store never returns an empty result for `k > 0`.
//!
//! ```rust
//! use bandsearch::{Item, VectorStore};
//!
//! let mut store = VectorStore::new();
//! store.add(Item::new(1, vec![0.3, 0.9, 0.1, 0.4, 0.7], "casual tee"));
//! store.add(Item::new(2, vec![0.7, 0.1, 0.9, 0.1, 0.5], "dress shirt"));
//!
//! let hits = store.search(&[0.3, 0.8, 0.1, 0.3, 0.8], 1);
//! assert_eq!(hits[0].item.id, 1);
//! ```

use tracing::{debug, trace};

use crate::hash::{LshIndex, LshParams, LshStats};
use crate::similarity::{cosine_similarity, Similarity};
use crate::Result;

/// A stored vector with its caller-facing id and payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Item<M = ()> {
    pub id: u64,
    pub vector: Vec<f32>,
    pub metadata: M,
}

impl<M> Item<M> {
    pub fn new(id: u64, vector: Vec<f32>, metadata: M) -> Self {
        Self {
            id,
            vector,
            metadata,
        }
    }
}

/// One ranked hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult<'a, M = ()> {
    pub item: &'a Item<M>,
    pub similarity: Similarity,
}

/// How a search arrived at its results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Distinct positions returned by the LSH lookup.
    pub candidates: usize,
    /// Items actually scored.
    pub scored: usize,
    /// The candidate set was empty and every item was scored.
    pub fell_back: bool,
}

/// In-memory store serving `add` and `search`.
#[derive(Debug, Clone)]
pub struct VectorStore<M = ()> {
    items: Vec<Item<M>>,
    index: LshIndex,
}

impl<M> Default for VectorStore<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> VectorStore<M> {
    /// Store backed by an index with [`LshParams::default`]
    /// (5 tables, 4 bands, 2 bits per band).
    pub fn new() -> Self {
        let index = match LshIndex::new(LshParams::default()) {
            Ok(index) => index,
            Err(e) => unreachable!("default LSH parameters are valid: {e}"),
        };
        Self {
            items: Vec::new(),
            index,
        }
    }

    /// Store backed by an index with custom parameters.
    pub fn with_params(params: LshParams) -> Result<Self> {
        Ok(Self {
            items: Vec::new(),
            index: LshIndex::new(params)?,
        })
    }

    /// Append `item` and index it. Returns its position.
    ///
    /// Identical vectors are not deduplicated; each `add` creates a new entry.
    pub fn add(&mut self, item: Item<M>) -> usize {
        let position = self.items.len();
        self.index.insert(position, &item.vector);
        trace!(position, id = item.id, dim = item.vector.len(), "store add");
        self.items.push(item);
        position
    }

    /// Top-`top_k` items by cosine similarity to `query`, best first.
    ///
    /// Ties are returned in unspecified order.
    pub fn search(&self, query: &[f32], top_k: usize) -> Vec<SearchResult<'_, M>> {
        self.search_with_stats(query, top_k).0
    }

    /// [`search`](Self::search), also reporting candidate and fallback counts.
    pub fn search_with_stats(
        &self,
        query: &[f32],
        top_k: usize,
    ) -> (Vec<SearchResult<'_, M>>, SearchStats) {
        if top_k == 0 {
            return (Vec::new(), SearchStats::default());
        }

        let candidates = self.index.candidates(query);
        let fell_back = candidates.is_empty();
        let results = if fell_back {
            self.score(query, 0..self.items.len())
        } else {
            self.score(query, candidates.iter().copied())
        };

        let stats = SearchStats {
            candidates: candidates.len(),
            scored: results.len(),
            fell_back,
        };
        debug!(
            candidates = stats.candidates,
            scored = stats.scored,
            fell_back,
            top_k,
            "store search"
        );

        (rank(results, top_k), stats)
    }

    /// Brute-force top-`top_k` over every stored item.
    pub fn search_exact(&self, query: &[f32], top_k: usize) -> Vec<SearchResult<'_, M>> {
        if top_k == 0 {
            return Vec::new();
        }
        rank(self.score(query, 0..self.items.len()), top_k)
    }

    fn score(
        &self,
        query: &[f32],
        positions: impl Iterator<Item = usize>,
    ) -> Vec<SearchResult<'_, M>> {
        positions
            .filter_map(|p| self.items.get(p))
            .map(|item| SearchResult {
                item,
                similarity: cosine_similarity(query, &item.vector),
            })
            .collect()
    }

    /// Item at insertion position `position`.
    pub fn get(&self, position: usize) -> Option<&Item<M>> {
        self.items.get(position)
    }

    /// All items in insertion order.
    pub fn items(&self) -> &[Item<M>] {
        &self.items
    }

    /// Copies of every stored vector, in insertion order.
    ///
    /// This is the batch shape [`crate::PcaReducer::reduce`] takes.
    pub fn vectors(&self) -> Vec<Vec<f32>> {
        self.items.iter().map(|item| item.vector.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn index(&self) -> &LshIndex {
        &self.index
    }

    pub fn index_stats(&self) -> LshStats {
        self.index.stats()
    }
}

/// Sort descending by similarity and keep the first `top_k`.
fn rank<M>(mut results: Vec<SearchResult<'_, M>>, top_k: usize) -> Vec<SearchResult<'_, M>> {
    results.sort_unstable_by(|a, b| b.similarity.total_cmp(&a.similarity));
    results.truncate(top_k);
    results
}
