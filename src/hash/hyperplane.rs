//! Banded random-threshold hashing.
//!
//! Each table owns a fixed stream of thresholds drawn uniformly from `[0, 1)`.
//! Position `p` of a vector is compared against threshold `p` of the table's
//! stream, producing one bit. Consecutive positions are grouped into bands of
//! `band_size` bits, and the band codes together form the bucket key.
//!
//! ```text
//! vector      0.3  0.9 | 0.1  0.4 | 0.7  ...
//! thresholds  0.5  0.2 | 0.6  0.1 | 0.9  ...
//! bits          0    1 |   0    1 |   0  ...
//! key         _1_1_0...
//! ```
//!
//! The stream for table `t` is seeded from `seed + t` and drawn once at
//! construction, so inserts and queries always see the same thresholds.
//!
//! Vectors shorter than `num_bands * band_size` are fine: positions past the
//! end contribute no bits, which weakens discrimination but never fails.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smallvec::SmallVec;

/// Bucket key for one table: one code per band.
///
/// Displays as `_b0_b1_..._bn`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BucketKey(SmallVec<[u64; 8]>);

impl BucketKey {
    /// Band codes in band order.
    #[inline]
    pub fn bands(&self) -> &[u64] {
        &self.0
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for code in &self.0 {
            write!(f, "_{code}")?;
        }
        Ok(())
    }
}

/// Per-table threshold hasher.
#[derive(Debug, Clone)]
pub struct RandomHyperplaneHasher {
    num_bands: usize,
    band_size: usize,
    /// `thresholds[t]` has `num_bands * band_size` entries.
    thresholds: Vec<Vec<f32>>,
}

impl RandomHyperplaneHasher {
    /// Draw threshold streams for `num_tables` tables.
    ///
    /// `band_size` must be at most 64 and `num_bands * band_size` must not
    /// overflow; [`crate::hash::LshParams::validate`] enforces both before
    /// [`crate::hash::LshIndex`] constructs a hasher.
    pub fn new(num_tables: usize, num_bands: usize, band_size: usize, seed: u64) -> Self {
        let width = num_bands.saturating_mul(band_size);
        let thresholds = (0..num_tables)
            .map(|table| {
                let mut rng = StdRng::seed_from_u64(table_seed(seed, table));
                (0..width).map(|_| rng.random::<f32>()).collect()
            })
            .collect();

        Self {
            num_bands,
            band_size,
            thresholds,
        }
    }

    /// Hash `vector` against table `table`.
    ///
    /// Returns `None` if `table >= self.num_tables()`.
    pub fn hash(&self, vector: &[f32], table: usize) -> Option<BucketKey> {
        self.thresholds
            .get(table)
            .map(|thresholds| self.key(vector, thresholds))
    }

    /// Keys of `vector` in every table, in table order.
    pub(crate) fn keys<'a>(&'a self, vector: &'a [f32]) -> impl Iterator<Item = BucketKey> + 'a {
        self.thresholds.iter().map(move |t| self.key(vector, t))
    }

    fn key(&self, vector: &[f32], thresholds: &[f32]) -> BucketKey {
        let mut bands = SmallVec::with_capacity(self.num_bands);

        for band in 0..self.num_bands {
            let start = band * self.band_size;
            let end = (start + self.band_size).min(vector.len());
            let mut code = 0u64;
            // Empty when the vector ends before this band starts.
            for p in start..end {
                code = (code << 1) | u64::from(vector[p] > thresholds[p]);
            }
            bands.push(code);
        }

        BucketKey(bands)
    }

    /// Number of tables this hasher serves.
    pub fn num_tables(&self) -> usize {
        self.thresholds.len()
    }

    /// Threshold stream for one table.
    pub fn thresholds(&self, table: usize) -> Option<&[f32]> {
        self.thresholds.get(table).map(Vec::as_slice)
    }
}

#[inline]
fn table_seed(seed: u64, table: usize) -> u64 {
    seed.wrapping_add(table as u64)
}
