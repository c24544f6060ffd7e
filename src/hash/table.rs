//! Bucket storage for a single LSH table.

use std::collections::HashMap;

use super::hyperplane::BucketKey;

/// Map from bucket key to the positions hashed into it, in insertion order.
#[derive(Debug, Clone, Default)]
pub(crate) struct BucketTable {
    buckets: HashMap<BucketKey, Vec<usize>>,
}

impl BucketTable {
    pub(crate) fn insert(&mut self, key: BucketKey, position: usize) {
        self.buckets.entry(key).or_default().push(position);
    }

    pub(crate) fn get(&self, key: &BucketKey) -> Option<&[usize]> {
        self.buckets.get(key).map(Vec::as_slice)
    }

    /// Number of non-empty buckets.
    pub(crate) fn num_buckets(&self) -> usize {
        self.buckets.len()
    }

    pub(crate) fn largest_bucket(&self) -> usize {
        self.buckets.values().map(Vec::len).max().unwrap_or(0)
    }

    /// Total entries across buckets.
    #[cfg(test)]
    pub(crate) fn num_entries(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}
