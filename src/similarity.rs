//! Cosine similarity for dense vectors.
//!
//! Scoring never fails. Inputs that cannot be compared meaningfully score
//! [`Similarity::ZERO`]:
//!
//! - vectors of different lengths,
//! - any vector whose L2 norm is exactly zero (two zero vectors included).
//!
//! ```rust
//! use bandsearch::similarity::{cosine_similarity, Similarity};
//!
//! let a = [1.0_f32, 0.0];
//! let b = [2.0_f32, 0.0];
//! assert!((cosine_similarity(&a, &b).value() - 1.0).abs() < 1e-6);
//! assert_eq!(cosine_similarity(&a, &[1.0, 0.0, 0.0]), Similarity::ZERO);
//! ```

use std::cmp::Ordering;
use std::fmt;

use crate::simd;

/// A cosine similarity score in `[-1, 1]`.
///
/// `Default` is [`Similarity::ZERO`], the score used for incomparable inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Similarity(f32);

impl Similarity {
    /// Score for incomparable inputs (mismatched lengths, zero vectors).
    pub const ZERO: Similarity = Similarity(0.0);

    /// Wrap a raw score, clamping to `[-1, 1]` to absorb rounding drift.
    ///
    /// NaN maps to [`Similarity::ZERO`].
    #[inline]
    #[must_use]
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            Self::ZERO
        } else {
            Self(value.clamp(-1.0, 1.0))
        }
    }

    /// Raw score.
    #[inline]
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Total order, used for ranking.
    #[inline]
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl From<Similarity> for f32 {
    fn from(s: Similarity) -> f32 {
        s.0
    }
}

impl fmt::Display for Similarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Cosine similarity between `a` and `b`.
///
/// Dot product and both norms are accumulated in one pass.
#[inline]
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Similarity {
    if a.len() != b.len() {
        return Similarity::ZERO;
    }

    let (dot, norm_a_sq, norm_b_sq) = simd::dot_and_norms(a, b);
    if norm_a_sq == 0.0 || norm_b_sq == 0.0 {
        return Similarity::ZERO;
    }

    Similarity::new(dot / (norm_a_sq.sqrt() * norm_b_sq.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_score_one() {
        let a = [0.3_f32, 0.9, 0.1, 0.4, 0.7];
        assert!((cosine_similarity(&a, &a).value() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn opposite_vectors_score_minus_one() {
        let a = [1.0_f32, -2.0, 3.0];
        let b = [-1.0_f32, 2.0, -3.0];
        assert!((cosine_similarity(&a, &b).value() + 1.0).abs() < 1e-6);
    }

    #[test]
    fn orthogonal_vectors_score_zero() {
        let s = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]);
        assert!(s.value().abs() < 1e-6);
    }

    #[test]
    fn zero_vector_scores_zero() {
        let z = [0.0_f32; 3];
        assert_eq!(cosine_similarity(&[1.0, 2.0, 3.0], &z), Similarity::ZERO);
        assert_eq!(cosine_similarity(&z, &z), Similarity::ZERO);
    }

    #[test]
    fn length_mismatch_scores_zero() {
        assert_eq!(
            cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]),
            Similarity::ZERO
        );
        assert_eq!(cosine_similarity(&[], &[1.0]), Similarity::ZERO);
    }

    #[test]
    fn empty_vectors_score_zero() {
        assert_eq!(cosine_similarity(&[], &[]), Similarity::ZERO);
    }

    #[test]
    fn scale_invariant() {
        let a = [0.5_f32, 0.8, 0.3];
        let b = [5.0_f32, 8.0, 3.0];
        assert!((cosine_similarity(&a, &b).value() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn new_clamps_and_rejects_nan() {
        assert_eq!(Similarity::new(1.0000002).value(), 1.0);
        assert_eq!(Similarity::new(f32::NAN), Similarity::ZERO);
        assert_eq!(Similarity::default(), Similarity::ZERO);
    }
}
