//! Projection engine: two-component PCA
//!
//! The covariance matrix of the centred feature vectors is decomposed by
//! power iteration with deflation. Each component's sign is fixed so its
//! largest-magnitude loading is positive, which keeps repeated runs over the
//! same input bit-identical.
//!
//! Nothing is cached between calls; skipping a recompute when inputs are
//! unchanged is the caller's business (see [`crate::session::Session`]).

use ndarray::{Array1, Array2, ArrayView1, Axis};
use tracing::debug;

use crate::error::{Error, Result};
use crate::geometry::Point2;

/// Number of output components.
pub const N_COMPONENTS: usize = 2;

const MAX_POWER_ITERATIONS: usize = 1000;
const CONVERGENCE_TOLERANCE: f64 = 1e-12;
/// Eigenvalues at or below this are treated as zero variance.
const ZERO_VARIANCE: f64 = 1e-12;

/// A fitted PCA model.
#[derive(Debug, Clone)]
pub struct PcaModel {
    mean: Array1<f64>,
    components: [Array1<f64>; N_COMPONENTS],
    eigenvalues: [f64; N_COMPONENTS],
    total_variance: f64,
}

impl PcaModel {
    /// Fit on at least two equally sized vectors.
    pub fn fit(vectors: &[Vec<f64>]) -> Result<Self> {
        let data = to_matrix(vectors)?;
        let (n, d) = data.dim();

        let mean = data.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(d));
        let centered = &data - &mean;
        let mut cov = centered.t().dot(&centered) / (n as f64 - 1.0);
        let total_variance = cov.diag().sum();

        let (mut first, mut first_value) = dominant_eigenpair(&cov);
        deflate(&mut cov, &first, first_value);
        let (mut second, mut second_value) = dominant_eigenpair(&cov);
        if second_value > first_value {
            std::mem::swap(&mut first, &mut second);
            std::mem::swap(&mut first_value, &mut second_value);
        }

        debug!(
            n_points = n,
            n_columns = d,
            lambda_1 = first_value,
            lambda_2 = second_value,
            "pca fit"
        );

        Ok(Self {
            mean,
            components: [first, second],
            eigenvalues: [first_value, second_value],
            total_variance,
        })
    }

    /// Project vectors of the fitted width onto the two components.
    pub fn transform(&self, vectors: &[Vec<f64>]) -> Result<Vec<Point2>> {
        let expected = self.mean.len();
        if let Some((row, v)) = vectors.iter().enumerate().find(|(_, v)| v.len() != expected) {
            return Err(Error::DimensionMismatch {
                row,
                expected,
                found: v.len(),
            });
        }

        Ok(vectors
            .iter()
            .map(|v| {
                let centered = ArrayView1::from(v.as_slice()).to_owned() - &self.mean;
                Point2::new(
                    centered.dot(&self.components[0]),
                    centered.dot(&self.components[1]),
                )
            })
            .collect())
    }

    pub fn n_columns(&self) -> usize {
        self.mean.len()
    }

    /// Unit-length principal axes; an all-zero axis means no variance left.
    pub fn components(&self) -> &[Array1<f64>; N_COMPONENTS] {
        &self.components
    }

    /// Variance captured by each axis.
    pub fn eigenvalues(&self) -> [f64; N_COMPONENTS] {
        self.eigenvalues
    }

    /// Share of the total variance captured by each axis.
    pub fn explained_variance_ratio(&self) -> [f64; N_COMPONENTS] {
        if self.total_variance <= ZERO_VARIANCE {
            return [0.0; N_COMPONENTS];
        }
        self.eigenvalues.map(|l| l / self.total_variance)
    }
}

/// Fit a fresh model and project the same vectors, index-aligned with the input.
pub fn project(vectors: &[Vec<f64>]) -> Result<Vec<Point2>> {
    PcaModel::fit(vectors)?.transform(vectors)
}

fn to_matrix(vectors: &[Vec<f64>]) -> Result<Array2<f64>> {
    if vectors.len() < 2 {
        return Err(Error::InsufficientData {
            found: vectors.len(),
        });
    }
    let expected = vectors[0].len();
    if let Some((row, v)) = vectors.iter().enumerate().find(|(_, v)| v.len() != expected) {
        return Err(Error::DimensionMismatch {
            row,
            expected,
            found: v.len(),
        });
    }
    Ok(Array2::from_shape_fn((vectors.len(), expected), |(i, j)| {
        vectors[i][j]
    }))
}

fn norm(v: ArrayView1<'_, f64>) -> f64 {
    v.dot(&v).sqrt()
}

/// Largest eigenpair of a symmetric PSD matrix by power iteration.
///
/// Returns a zero vector and 0 when the matrix carries no variance.
fn dominant_eigenpair(cov: &Array2<f64>) -> (Array1<f64>, f64) {
    let d = cov.nrows();
    let zero = || (Array1::zeros(d), 0.0);

    if d == 0 {
        return zero();
    }

    // Off-axis start: a basis vector or a covariance column can be exactly
    // orthogonal to the dominant eigenvector and never leave a smaller one.
    let mut v = cov.dot(&start_vector(d));
    if norm(v.view()) <= ZERO_VARIANCE {
        // Start happened to lie in the null space; use the widest column.
        let widest = (0..d).max_by(|&a, &b| norm(cov.column(a)).total_cmp(&norm(cov.column(b))));
        let Some(widest) = widest else {
            return zero();
        };
        v = cov.column(widest).to_owned();
    }
    let start_norm = norm(v.view());
    if start_norm <= ZERO_VARIANCE {
        return zero();
    }
    v.mapv_inplace(|x| x / start_norm);

    for _ in 0..MAX_POWER_ITERATIONS {
        let mut next = cov.dot(&v);
        let next_norm = norm(next.view());
        if next_norm <= ZERO_VARIANCE {
            return zero();
        }
        next.mapv_inplace(|x| x / next_norm);
        let delta: f64 = next.iter().zip(v.iter()).map(|(a, b)| (a - b).abs()).sum();
        v = next;
        if delta < CONVERGENCE_TOLERANCE {
            break;
        }
    }

    let eigenvalue = v.dot(&cov.dot(&v));
    if eigenvalue <= ZERO_VARIANCE {
        return zero();
    }

    let pivot = v
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
        .map(|(i, _)| i);
    if let Some(i) = pivot {
        if v[i] < 0.0 {
            v.mapv_inplace(|x| -x);
        }
    }

    (v, eigenvalue)
}

/// Deterministic start vector with unequal positive entries (golden-ratio
/// sequence), so it is not aligned with any axis or with all-ones.
fn start_vector(d: usize) -> Array1<f64> {
    const GOLDEN: f64 = 0.618_033_988_749_894_9;
    Array1::from_shape_fn(d, |i| 1.0 + 0.5 * ((i + 1) as f64 * GOLDEN).fract())
}

/// Remove an eigenpair from the matrix: `cov -= λ v vᵀ`.
fn deflate(cov: &mut Array2<f64>, v: &Array1<f64>, eigenvalue: f64) {
    if eigenvalue == 0.0 {
        return;
    }
    let column = v.view().insert_axis(Axis(1));
    let row = v.view().insert_axis(Axis(0));
    cov.scaled_add(-eigenvalue, &column.dot(&row));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn fewer_than_two_vectors() {
        let err = project(&[vec![1.0, 2.0]]).unwrap_err();
        assert!(matches!(err, Error::InsufficientData { found: 1 }), "got {:?}", err);
        let err = project(&[]).unwrap_err();
        assert!(matches!(err, Error::InsufficientData { found: 0 }));
    }

    #[test]
    fn ragged_rows() {
        let err = project(&[vec![1.0, 2.0], vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(
            matches!(
                err,
                Error::DimensionMismatch {
                    row: 2,
                    expected: 2,
                    found: 1
                }
            ),
            "got {:?}",
            err
        );
    }

    #[test]
    fn one_dimensional_data_stays_ordered() {
        let points = project(&[vec![1.0], vec![2.0], vec![3.0]]).unwrap();
        assert!(approx(points[0].x, -1.0));
        assert!(approx(points[1].x, 0.0));
        assert!(approx(points[2].x, 1.0));
        assert!(points.iter().all(|p| p.y == 0.0));
    }

    #[test]
    fn recovers_axis_aligned_variance() {
        // Wide spread on column 1, narrow spread on column 0.
        let vectors = vec![
            vec![0.0, -4.0],
            vec![1.0, 0.0],
            vec![0.0, 4.0],
            vec![-1.0, 0.0],
        ];
        let model = PcaModel::fit(&vectors).unwrap();
        let [c0, c1] = model.components();
        assert!(approx(c0[1], 1.0) && approx(c0[0], 0.0), "first axis {:?}", c0);
        assert!(approx(c1[0].abs(), 1.0) && approx(c1[1], 0.0), "second axis {:?}", c1);

        let [r0, r1] = model.explained_variance_ratio();
        assert!(r0 > r1);
        assert!(approx(r0 + r1, 1.0));
    }

    #[test]
    fn components_are_orthonormal() {
        let vectors = vec![
            vec![1.0, 2.0, 0.5, 3.0],
            vec![2.0, 1.0, 0.0, 1.0],
            vec![0.0, 4.0, 1.5, 2.5],
            vec![3.0, 3.0, 2.0, 0.0],
            vec![1.5, 0.5, 1.0, 1.0],
        ];
        let model = PcaModel::fit(&vectors).unwrap();
        let [c0, c1] = model.components();
        assert!(approx(c0.dot(c0), 1.0));
        assert!(approx(c1.dot(c1), 1.0));
        assert!(c0.dot(c1).abs() < 1e-6, "dot = {}", c0.dot(c1));
        let [l0, l1] = model.eigenvalues();
        assert!(l0 >= l1 && l1 >= 0.0);
    }

    #[test]
    fn dominant_axis_not_on_widest_column() {
        // Column 0 has the largest variance on its own, but columns 1 and 2
        // move together and carry more variance as a pair.
        let vectors = vec![
            vec![1.3, 1.0, 1.0],
            vec![1.3, -1.0, -1.0],
            vec![-1.3, 1.0, 1.0],
            vec![-1.3, -1.0, -1.0],
        ];
        let model = PcaModel::fit(&vectors).unwrap();
        let [l0, l1] = model.eigenvalues();
        assert!((l0 - 8.0 / 3.0).abs() < 1e-6, "lambda_1 = {}", l0);
        assert!((l1 - 4.0 * 1.69 / 3.0).abs() < 1e-6, "lambda_2 = {}", l1);

        let [c0, c1] = model.components();
        let half = std::f64::consts::FRAC_1_SQRT_2;
        assert!(c0[0].abs() < 1e-6, "first axis {:?}", c0);
        assert!((c0[1].abs() - half).abs() < 1e-6 && (c0[2].abs() - half).abs() < 1e-6);
        assert!((c1[0].abs() - 1.0).abs() < 1e-6, "second axis {:?}", c1);

        let [r0, r1] = model.explained_variance_ratio();
        assert!(r0 > r1, "ratios {} {}", r0, r1);
    }

    #[test]
    fn eigenvalues_are_descending_for_axis_aligned_data() {
        // Covariance is diagonal, every start column is itself an eigenvector.
        let vectors = vec![
            vec![3.0, 0.0, 0.0],
            vec![-3.0, 0.0, 0.0],
            vec![0.0, 4.0, 0.0],
            vec![0.0, -4.0, 0.0],
            vec![0.0, 0.0, 1.0],
            vec![0.0, 0.0, -1.0],
        ];
        let model = PcaModel::fit(&vectors).unwrap();
        let [l0, l1] = model.eigenvalues();
        assert!(l0 >= l1, "{} < {}", l0, l1);
        let [c0, c1] = model.components();
        assert!((c0[1].abs() - 1.0).abs() < 1e-6, "first axis {:?}", c0);
        assert!((c1[0].abs() - 1.0).abs() < 1e-6, "second axis {:?}", c1);
    }

    #[test]
    fn identical_vectors_collapse_to_origin() {
        let points = project(&[vec![1.0, 1.0], vec![1.0, 1.0], vec![1.0, 1.0]]).unwrap();
        assert!(points.iter().all(|p| *p == Point2::ORIGIN));
    }

    #[test]
    fn transform_checks_width() {
        let model = PcaModel::fit(&[vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        let err = model.transform(&[vec![1.0, 2.0, 3.0]]).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { row: 0, .. }));
        assert_eq!(model.transform(&[vec![0.5, 0.5]]).unwrap().len(), 1);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let vectors = vec![vec![1.0, 5.0, 2.0], vec![4.0, 1.0, 0.0], vec![2.0, 2.0, 7.0]];
        assert_eq!(project(&vectors).unwrap(), project(&vectors).unwrap());
    }
}
