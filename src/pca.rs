//! Principal component analysis by power iteration.
//!
//! Fits `k` directions to a batch of vectors and projects the batch onto them:
//!
//! 1. subtract the per-dimension mean,
//! 2. build the sample covariance matrix (divisor `n - 1`),
//! 3. for each component, start from a random direction and run a fixed
//!    number of power-iteration steps `d ← C·d / ‖C·d‖`,
//! 4. project each centered vector onto the components.
//!
//! # Approximation
//!
//! By default components are found independently: each starts from its own
//! random direction and iterates against the same, undeflated covariance
//! matrix. Since every start converges toward the dominant eigenvector, the
//! components are typically near-parallel rather than orthogonal. This is
//! cheap and adequate for coarse projections. Set [`PcaConfig::deflate`] to
//! subtract `λ·d·dᵀ` after each component when orthogonal axes are needed.
//!
//! ```rust
//! use bandsearch::{PcaConfig, PcaReducer};
//!
//! let batch = vec![
//!     vec![0.3, 0.9, 0.1, 0.4, 0.7],
//!     vec![0.7, 0.1, 0.9, 0.1, 0.5],
//!     vec![0.4, 0.3, 0.1, 0.9, 0.8],
//!     vec![0.5, 0.8, 0.3, 0.2, 0.6],
//! ];
//! let reducer = PcaReducer::new(PcaConfig::default().with_seed(7));
//! let reduced = reducer.reduce(&batch, 3)?;
//! assert_eq!(reduced.len(), 4);
//! assert!(reduced.iter().all(|v| v.len() == 3));
//! # Ok::<(), bandsearch::RetrieveError>(())
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::simd;
use crate::{Result, RetrieveError};

/// Power-iteration settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PcaConfig {
    /// Power-iteration steps per component.
    pub iterations: usize,
    /// Seed for the random start directions. `None` draws one from entropy.
    pub seed: Option<u64>,
    /// Deflate the covariance matrix after each component.
    pub deflate: bool,
}

impl Default for PcaConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            seed: None,
            deflate: false,
        }
    }
}

impl PcaConfig {
    /// Repeated fits on the same batch produce identical components.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Extract mutually orthogonal components by deflation.
    #[must_use]
    pub fn deflating(mut self) -> Self {
        self.deflate = true;
        self
    }
}

/// Fitted projection: batch mean plus unit-length (or zero) components.
#[derive(Debug, Clone, PartialEq)]
pub struct PcaModel {
    mean: Vec<f32>,
    components: Vec<Vec<f32>>,
    eigenvalues: Vec<f32>,
}

impl PcaModel {
    /// Project one vector into the reduced space.
    pub fn transform(&self, vector: &[f32]) -> Result<Vec<f32>> {
        if vector.len() != self.mean.len() {
            return Err(RetrieveError::DimensionMismatch {
                expected: self.mean.len(),
                actual: vector.len(),
            });
        }
        let centered: Vec<f32> = vector
            .iter()
            .zip(&self.mean)
            .map(|(x, m)| x - m)
            .collect();
        Ok(self.project(&centered))
    }

    /// Project a batch, preserving order.
    pub fn transform_batch(&self, vectors: &[Vec<f32>]) -> Result<Vec<Vec<f32>>> {
        vectors.iter().map(|v| self.transform(v)).collect()
    }

    fn project(&self, centered: &[f32]) -> Vec<f32> {
        self.components
            .iter()
            .map(|c| simd::dot(centered, c))
            .collect()
    }

    /// Per-dimension mean of the fitted batch.
    pub fn mean(&self) -> &[f32] {
        &self.mean
    }

    /// Principal directions, one per output dimension.
    pub fn components(&self) -> &[Vec<f32>] {
        &self.components
    }

    /// Rayleigh-quotient variance estimate `dᵀ·C·d` for each component.
    pub fn eigenvalues(&self) -> &[f32] {
        &self.eigenvalues
    }

    pub fn source_dim(&self) -> usize {
        self.mean.len()
    }

    pub fn target_dim(&self) -> usize {
        self.components.len()
    }
}

/// Batch dimensionality reducer.
#[derive(Debug, Clone, Default)]
pub struct PcaReducer {
    config: PcaConfig,
}

impl PcaReducer {
    pub fn new(config: PcaConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PcaConfig {
        &self.config
    }

    /// Reduce `vectors` to `target_dim` dimensions.
    ///
    /// Returns the batch unchanged when it is empty or when `target_dim` is
    /// not smaller than the source dimension.
    ///
    /// # Errors
    ///
    /// - [`RetrieveError::InsufficientSamples`] for a single-vector batch
    ///   (the unbiased covariance divides by `n - 1`).
    /// - [`RetrieveError::DimensionMismatch`] if vectors differ in length.
    pub fn reduce(&self, vectors: &[Vec<f32>], target_dim: usize) -> Result<Vec<Vec<f32>>> {
        let Some(first) = vectors.first() else {
            return Ok(Vec::new());
        };
        if target_dim >= first.len() {
            return Ok(vectors.to_vec());
        }

        let model = self.fit(vectors, target_dim)?;
        Ok(centered(vectors, &model.mean)
            .iter()
            .map(|c| model.project(c))
            .collect())
    }

    /// Fit `target_dim` components to `vectors`.
    pub fn fit(&self, vectors: &[Vec<f32>], target_dim: usize) -> Result<PcaModel> {
        if self.config.iterations == 0 {
            return Err(RetrieveError::InvalidParameter(
                "iterations must be greater than 0".to_string(),
            ));
        }
        let n = vectors.len();
        if n < 2 {
            return Err(RetrieveError::InsufficientSamples {
                required: 2,
                actual: n,
            });
        }
        let dim = vectors[0].len();
        if let Some(bad) = vectors.iter().find(|v| v.len() != dim) {
            return Err(RetrieveError::DimensionMismatch {
                expected: dim,
                actual: bad.len(),
            });
        }
        if target_dim > dim {
            return Err(RetrieveError::InvalidParameter(format!(
                "target_dim {target_dim} exceeds source dimension {dim}"
            )));
        }

        let mean = mean(vectors, dim);
        let centered = centered(vectors, &mean);
        let mut cov = covariance(&centered, dim);

        let seed = self.config.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = StdRng::seed_from_u64(seed);

        let mut components = Vec::with_capacity(target_dim);
        let mut eigenvalues = Vec::with_capacity(target_dim);
        for i in 0..target_dim {
            let start: Vec<f32> = (0..dim).map(|_| rng.random::<f32>()).collect();
            let direction = power_iteration(&cov, dim, start, self.config.iterations);
            let lambda = rayleigh_quotient(&cov, dim, &direction);
            debug!(component = i, eigenvalue = lambda, "pca component");

            if self.config.deflate {
                deflate(&mut cov, dim, &direction, lambda);
            }
            components.push(direction);
            eigenvalues.push(lambda);
        }

        Ok(PcaModel {
            mean,
            components,
            eigenvalues,
        })
    }
}

fn mean(vectors: &[Vec<f32>], dim: usize) -> Vec<f32> {
    let mut mean = vec![0.0_f32; dim];
    for v in vectors {
        for (m, x) in mean.iter_mut().zip(v) {
            *m += x;
        }
    }
    let n = vectors.len() as f32;
    for m in &mut mean {
        *m /= n;
    }
    mean
}

fn centered(vectors: &[Vec<f32>], mean: &[f32]) -> Vec<Vec<f32>> {
    vectors
        .iter()
        .map(|v| v.iter().zip(mean).map(|(x, m)| x - m).collect())
        .collect()
}

/// Row-major `dim × dim` sample covariance of already-centered rows.
fn covariance(centered: &[Vec<f32>], dim: usize) -> Vec<f32> {
    let denom = (centered.len() - 1) as f32;
    let mut cov = vec![0.0_f32; dim * dim];
    for i in 0..dim {
        for j in i..dim {
            let s: f32 = centered.iter().map(|row| row[i] * row[j]).sum();
            let c = s / denom;
            cov[i * dim + j] = c;
            cov[j * dim + i] = c;
        }
    }
    cov
}

fn mat_vec(m: &[f32], dim: usize, v: &[f32]) -> Vec<f32> {
    m.chunks_exact(dim).map(|row| simd::dot(row, v)).collect()
}

/// Run exactly `iterations` normalized multiplications.
///
/// If `C·d` vanishes (zero-variance data, or a start orthogonal to every
/// non-null direction) the component is the zero vector.
fn power_iteration(cov: &[f32], dim: usize, start: Vec<f32>, iterations: usize) -> Vec<f32> {
    let mut direction = start;
    for step in 0..iterations {
        let mut next = mat_vec(cov, dim, &direction);
        if simd::normalize_in_place(&mut next) == 0.0 {
            warn!(step, "power iteration collapsed to zero; using zero component");
            return vec![0.0; dim];
        }
        direction = next;
    }
    direction
}

fn rayleigh_quotient(cov: &[f32], dim: usize, d: &[f32]) -> f32 {
    simd::dot(d, &mat_vec(cov, dim, d))
}

/// `C ← C − λ·d·dᵀ`.
fn deflate(cov: &mut [f32], dim: usize, d: &[f32], lambda: f32) {
    for i in 0..dim {
        for j in 0..dim {
            cov[i * dim + j] -= lambda * d[i] * d[j];
        }
    }
}
