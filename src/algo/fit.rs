//! Rigid transform fitting for influences.
//!
//! Given rest and deformed vertex positions, each influence's transform is
//! recovered as the weighted best-fit rigid motion of the vertices it drives.
//! This is the orthogonal Procrustes (Kabsch) problem:
//!
//! 1. Weighted centroids `c_r`, `c_d` of rest and deformed points
//! 2. Covariance `S = Σ w_i (d_i - c_d)(r_i - c_r)^T`
//! 3. `S = U Σ V^T`, rotation `R = U V^T` (if that is a reflection, the
//!    column of `U` for the smallest singular value is negated)
//! 4. Translation `t = c_d - R c_r`
//!
//! # References
//!
//! - Kabsch, W. (1976). "A solution for the best rotation to relate two sets
//!   of vectors." Acta Crystallographica A32.
//! - Sorkine-Hornung, O. & Rabinovich, M. (2017). "Least-Squares Rigid Motion
//!   Using SVD."

use log::warn;
use nalgebra::{Isometry3, Matrix3, Point3, Rotation3, Translation3, UnitQuaternion, Vector3};

use crate::error::{Result, WeightError};
use crate::mesh::InfluenceId;
use crate::weights::{WeightMatrix, WeightStore};

use super::normalize::ZERO_SUM_EPSILON;

/// Weighted best-fit rigid transform taking `rest` onto `deformed`.
///
/// Returns `Ok(None)` if the weights sum to zero, since no transform is
/// determined. Negative weights are treated as zero.
///
/// # Example
///
/// ```
/// use heft::algo::fit::fit_rigid;
/// use nalgebra::{Point3, Vector3};
///
/// let rest = [
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
///     Point3::new(0.0, 0.0, 1.0),
/// ];
/// let shift = Vector3::new(0.5, -1.0, 2.0);
/// let deformed: Vec<_> = rest.iter().map(|p| p + shift).collect();
///
/// let iso = fit_rigid(&rest, &deformed, &[1.0; 4]).unwrap().unwrap();
/// assert!((iso.translation.vector - shift).norm() < 1e-9);
/// ```
pub fn fit_rigid(
    rest: &[Point3<f64>],
    deformed: &[Point3<f64>],
    weights: &[f64],
) -> Result<Option<Isometry3<f64>>> {
    if deformed.len() != rest.len() {
        return Err(WeightError::MatrixMismatch {
            expected: rest.len(),
            found: deformed.len(),
        });
    }
    if weights.len() != rest.len() {
        return Err(WeightError::MatrixMismatch {
            expected: rest.len(),
            found: weights.len(),
        });
    }

    let mut total = 0.0;
    let mut rest_centroid = Vector3::zeros();
    let mut deformed_centroid = Vector3::zeros();
    for ((r, d), &w) in rest.iter().zip(deformed).zip(weights) {
        let w = w.max(0.0);
        total += w;
        rest_centroid += w * r.coords;
        deformed_centroid += w * d.coords;
    }

    if total <= ZERO_SUM_EPSILON {
        return Ok(None);
    }
    rest_centroid /= total;
    deformed_centroid /= total;

    let mut covariance = Matrix3::zeros();
    for ((r, d), &w) in rest.iter().zip(deformed).zip(weights) {
        let w = w.max(0.0);
        if w == 0.0 {
            continue;
        }
        covariance += w * (d.coords - deformed_centroid) * (r.coords - rest_centroid).transpose();
    }

    let Some(rotation) = closest_rotation(&covariance) else {
        warn!("SVD did not produce singular vectors; skipping fit");
        return Ok(None);
    };

    let translation = deformed_centroid - rotation * rest_centroid;
    let rotation = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(rotation));
    Ok(Some(Isometry3::from_parts(Translation3::from(translation), rotation)))
}

/// Closest proper rotation to `m` in the Frobenius sense.
fn closest_rotation(m: &Matrix3<f64>) -> Option<Matrix3<f64>> {
    let svd = m.svd(true, true);
    let (mut u, v_t) = (svd.u?, svd.v_t?);

    let r = u * v_t;
    if r.determinant() >= 0.0 {
        return Some(r);
    }

    // Reflection: flip the axis of the smallest singular value.
    let smallest = svd
        .singular_values
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(b.1))
        .map_or(2, |(i, _)| i);
    let mut column = u.column_mut(smallest);
    column.neg_mut();
    Some(u * v_t)
}

/// Fit the transform of one influence from its weight column.
///
/// Fails with [`WeightError::DegenerateFit`] if the influence has no weight
/// anywhere.
pub fn fit_influence_transform(
    matrix: &WeightMatrix,
    influence: InfluenceId,
    rest: &[Point3<f64>],
    deformed: &[Point3<f64>],
) -> Result<Isometry3<f64>> {
    check_positions(matrix, rest, deformed)?;
    if influence.index() >= matrix.num_influences() {
        return Err(WeightError::invalid_param("influence", influence, "column out of range"));
    }

    let weights: Vec<f64> = matrix.rows().map(|row| row[influence.index()]).collect();
    fit_rigid(rest, deformed, &weights)?.ok_or(WeightError::DegenerateFit {
        influence: influence.index(),
    })
}

/// Fit a transform for every influence, in column order.
///
/// Influences without any weight yield `None`.
pub fn fit_influence_transforms(
    matrix: &WeightMatrix,
    rest: &[Point3<f64>],
    deformed: &[Point3<f64>],
) -> Result<Vec<Option<Isometry3<f64>>>> {
    check_positions(matrix, rest, deformed)?;

    let mut weights = vec![0.0; rest.len()];
    let mut transforms = Vec::with_capacity(matrix.num_influences());
    for column in 0..matrix.num_influences() {
        for (w, row) in weights.iter_mut().zip(matrix.rows()) {
            *w = row[column];
        }
        transforms.push(fit_rigid(rest, deformed, &weights)?);
    }
    Ok(transforms)
}

fn check_positions(matrix: &WeightMatrix, rest: &[Point3<f64>], deformed: &[Point3<f64>]) -> Result<()> {
    for positions in [rest, deformed] {
        if positions.len() != matrix.num_vertices() {
            return Err(WeightError::MatrixMismatch {
                expected: matrix.num_vertices(),
                found: positions.len(),
            });
        }
    }
    Ok(())
}
