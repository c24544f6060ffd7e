//! Dense vector kernels.
//!
//! When the `innr` feature is enabled (default), `dot` and `norm` come from
//! the `innr` crate's SIMD implementations. Otherwise portable fallbacks are
//! used. Callers pass slices of equal length; dimensionality is checked
//! before these are reached.
//!
//! ```rust
//! use bandsearch::simd::{dot, norm};
//!
//! let a = [3.0_f32, 4.0];
//! assert!((dot(&a, &a) - 25.0).abs() < 1e-6);
//! assert!((norm(&a) - 5.0).abs() < 1e-6);
//! ```

#[cfg(feature = "innr")]
pub use innr::{dot, norm};

#[cfg(any(test, not(feature = "innr")))]
mod fallback {
    //! Portable fallback implementations when innr is not available.

    /// Dot product of two vectors (portable implementation).
    #[inline]
    #[must_use]
    pub fn dot(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
    }

    /// L2 norm of a vector.
    #[inline]
    #[must_use]
    pub fn norm(v: &[f32]) -> f32 {
        dot(v, v).sqrt()
    }
}

#[cfg(not(feature = "innr"))]
pub use fallback::*;

// ─────────────────────────────────────────────────────────────────────────────
// Fused kernels (always local, innr has no single-pass cosine terms)
// ─────────────────────────────────────────────────────────────────────────────

const LANES: usize = 4;

/// Dot product and both squared norms in a single pass.
///
/// Returns `(a·b, ‖a‖², ‖b‖²)`. Unequal lengths are truncated to the shorter.
#[inline]
#[must_use]
pub fn dot_and_norms(a: &[f32], b: &[f32]) -> (f32, f32, f32) {
    let n = a.len().min(b.len());
    let (a, b) = (&a[..n], &b[..n]);

    let mut ab = [0.0_f32; LANES];
    let mut aa = [0.0_f32; LANES];
    let mut bb = [0.0_f32; LANES];
    let chunks = n / LANES;
    for c in 0..chunks {
        let base = c * LANES;
        for lane in 0..LANES {
            let x = a[base + lane];
            let y = b[base + lane];
            ab[lane] += x * y;
            aa[lane] += x * x;
            bb[lane] += y * y;
        }
    }

    let mut dot = ab.iter().sum::<f32>();
    let mut na = aa.iter().sum::<f32>();
    let mut nb = bb.iter().sum::<f32>();
    for i in chunks * LANES..n {
        dot += a[i] * b[i];
        na += a[i] * a[i];
        nb += b[i] * b[i];
    }
    (dot, na, nb)
}

/// Scale `v` to unit L2 norm in place.
///
/// Returns the norm before scaling. A zero vector is left untouched and `0.0`
/// is returned.
#[inline]
pub fn normalize_in_place(v: &mut [f32]) -> f32 {
    let n = norm(v);
    if n > 0.0 {
        for x in v.iter_mut() {
            *x /= n;
        }
    }
    n
}
