//! Multi-table LSH index over insertion positions.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::hyperplane::{BucketKey, RandomHyperplaneHasher};
use super::table::BucketTable;
use crate::{Result, RetrieveError};

/// Upper bound on `num_tables`.
pub const MAX_TABLES: usize = 1024;

/// Upper bound on `num_bands * band_size`, the thresholds drawn per table.
pub const MAX_HASH_WIDTH: usize = 1 << 16;

/// LSH parameters.
///
/// - `num_tables`: more tables = better recall, more candidates to re-rank
/// - `num_bands` × `band_size`: how many leading vector positions feed the key
/// - `band_size`: bits per band, at most 64
/// - `num_tables` ≤ [`MAX_TABLES`], `num_bands * band_size` ≤ [`MAX_HASH_WIDTH`]
/// - `seed`: table `t` draws its thresholds from `seed + t`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LshParams {
    pub num_tables: usize,
    pub num_bands: usize,
    pub band_size: usize,
    pub seed: u64,
}

impl Default for LshParams {
    fn default() -> Self {
        Self {
            num_tables: 5,
            num_bands: 4,
            band_size: 2,
            seed: 0,
        }
    }
}

impl LshParams {
    /// Create parameters with the default seed.
    pub fn new(num_tables: usize, num_bands: usize, band_size: usize) -> Self {
        Self {
            num_tables,
            num_bands,
            band_size,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check that the parameters describe a usable index.
    pub fn validate(&self) -> Result<()> {
        if self.num_tables == 0 || self.num_tables > MAX_TABLES {
            return Err(RetrieveError::InvalidParameter(format!(
                "num_tables must be in 1..={MAX_TABLES}, got {}",
                self.num_tables
            )));
        }
        if self.num_bands == 0 {
            return Err(RetrieveError::InvalidParameter(
                "num_bands must be greater than 0".to_string(),
            ));
        }
        if self.band_size == 0 || self.band_size > 64 {
            return Err(RetrieveError::InvalidParameter(format!(
                "band_size must be in 1..=64, got {}",
                self.band_size
            )));
        }
        match self.num_bands.checked_mul(self.band_size) {
            Some(width) if width <= MAX_HASH_WIDTH => Ok(()),
            _ => Err(RetrieveError::InvalidParameter(format!(
                "num_bands * band_size must be at most {MAX_HASH_WIDTH}, got {} * {}",
                self.num_bands, self.band_size
            ))),
        }
    }
}

/// Bucket occupancy summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LshStats {
    pub num_tables: usize,
    pub num_indexed: usize,
    /// Non-empty buckets per table.
    pub buckets_per_table: Vec<usize>,
    /// Largest bucket across all tables.
    pub largest_bucket: usize,
}

/// Locality-sensitive hash index.
///
/// Stores positions only; vectors live with the caller (see
/// [`crate::VectorStore`]). Every inserted position lands in exactly one
/// bucket per table. Tables only grow.
#[derive(Debug, Clone)]
pub struct LshIndex {
    params: LshParams,
    hasher: RandomHyperplaneHasher,
    tables: Vec<BucketTable>,
    num_indexed: usize,
}

impl LshIndex {
    /// Create an empty index.
    pub fn new(params: LshParams) -> Result<Self> {
        params.validate()?;
        let hasher = RandomHyperplaneHasher::new(
            params.num_tables,
            params.num_bands,
            params.band_size,
            params.seed,
        );

        Ok(Self {
            params,
            hasher,
            tables: vec![BucketTable::default(); params.num_tables],
            num_indexed: 0,
        })
    }

    /// Bucket key of `vector` in table `table`, or `None` if there is no
    /// such table.
    pub fn hash(&self, vector: &[f32], table: usize) -> Option<BucketKey> {
        self.hasher.hash(vector, table)
    }

    /// Add `position` to the matching bucket of every table.
    ///
    /// Inserting the same position twice puts it in its buckets twice; the
    /// store never does this since positions are assigned by append.
    pub fn insert(&mut self, position: usize, vector: &[f32]) {
        let keys = self.hasher.keys(vector);
        for (t, (table, key)) in self.tables.iter_mut().zip(keys).enumerate() {
            trace!(position, table = t, key = %key, "lsh insert");
            table.insert(key, position);
        }
        self.num_indexed += 1;
    }

    /// Union of the buckets `query` hashes to, across all tables.
    pub fn candidates(&self, query: &[f32]) -> HashSet<usize> {
        let mut candidates = HashSet::new();
        for (table, key) in self.tables.iter().zip(self.hasher.keys(query)) {
            if let Some(bucket) = table.get(&key) {
                candidates.extend(bucket.iter().copied());
            }
        }
        candidates
    }

    /// Positions stored in one table's bucket.
    ///
    /// Returns an empty slice when the bucket does not exist.
    pub fn bucket(&self, table: usize, key: &BucketKey) -> &[usize] {
        self.tables
            .get(table)
            .and_then(|t| t.get(key))
            .unwrap_or(&[])
    }

    pub fn params(&self) -> &LshParams {
        &self.params
    }

    pub fn num_tables(&self) -> usize {
        self.tables.len()
    }

    /// Number of `insert` calls so far.
    pub fn len(&self) -> usize {
        self.num_indexed
    }

    pub fn is_empty(&self) -> bool {
        self.num_indexed == 0
    }

    pub fn stats(&self) -> LshStats {
        LshStats {
            num_tables: self.tables.len(),
            num_indexed: self.num_indexed,
            buckets_per_table: self.tables.iter().map(BucketTable::num_buckets).collect(),
            largest_bucket: self
                .tables
                .iter()
                .map(BucketTable::largest_bucket)
                .max()
                .unwrap_or(0),
        }
    }

    /// Entries stored in table `table` (equals `len()` for every table).
    #[cfg(test)]
    pub(crate) fn table_entries(&self, table: usize) -> usize {
        self.tables.get(table).map_or(0, BucketTable::num_entries)
    }
}
