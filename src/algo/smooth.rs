//! Neighbor averaging of skin weights.
//!
//! Each target vertex is pulled towards the mean weight row of its first ring:
//!
//! ```text
//! avg   = (Σ_j R_j) / n
//! R_new = clamp(R_old + (avg - R_old) * blend, 0, 1)
//! ```
//!
//! A pass reads only from the rows as they were before the pass started, so
//! the result does not depend on the order in which targets are visited. That
//! also makes the per-vertex work independent, and it runs on rayon's thread
//! pool unless [`AverageOptions::parallel`] is off.
//!
//! # Example
//!
//! ```
//! use heft::algo::smooth::{average_weights, support_region, AverageOptions};
//! use heft::mesh::{TargetSet, Topology, VertexId};
//! use heft::weights::{InfluenceSet, WeightMatrix};
//!
//! // Vertex 0 sits between vertices 1 and 2.
//! let topo = Topology::from_adjacency(&[vec![1, 2], vec![0], vec![0]]).unwrap();
//! let influences = InfluenceSet::new(["a", "b", "c"]).unwrap();
//! let matrix = WeightMatrix::from_rows(
//!     influences,
//!     &[[0.5, 0.5, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
//! ).unwrap();
//!
//! let targets = TargetSet::new([VertexId::new(0)]);
//! let region = support_region(&topo, &targets).unwrap();
//! let snapshot = matrix.snapshot(&region).unwrap();
//! let result = average_weights(&topo, &snapshot, &targets, &AverageOptions::default()).unwrap();
//! assert_eq!(result.row(0), &[0.5, 0.0, 0.5]);
//! ```

use log::debug;
use rayon::prelude::*;

use crate::error::{Result, WeightError};
use crate::mesh::{Adjacency, TargetSet, VertexId};
use crate::weights::WeightRows;

/// Options for neighbor averaging.
#[derive(Debug, Clone)]
pub struct AverageOptions {
    /// Blend factor in `[0, 1]`: 0 keeps the old row, 1 replaces it with the
    /// neighbor mean.
    pub blend: f64,

    /// Number of averaging passes.
    pub iterations: usize,

    /// Whether to use parallel execution (default: true).
    pub parallel: bool,
}

impl Default for AverageOptions {
    fn default() -> Self {
        Self {
            blend: 1.0,
            iterations: 1,
            parallel: true,
        }
    }
}

impl AverageOptions {
    /// Set the blend factor, clamped to `[0, 1]`.
    pub fn with_blend(mut self, blend: f64) -> Self {
        self.blend = blend.clamp(0.0, 1.0);
        self
    }

    /// Set the number of passes.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.blend) {
            return Err(WeightError::invalid_param("blend", self.blend, "must be in [0, 1]"));
        }
        Ok(())
    }
}

/// Blend `prior` towards the mean of `neighbors`.
///
/// With no neighbors the prior row is returned unchanged. A blend of 0 also
/// returns the prior row unchanged, without clamping.
pub fn average_row<'a, N>(prior: &[f64], neighbors: N, blend: f64) -> Vec<f64>
where
    N: IntoIterator<Item = &'a [f64]>,
{
    if blend == 0.0 {
        return prior.to_vec();
    }

    let mut sum = vec![0.0; prior.len()];
    let mut count = 0usize;
    for row in neighbors {
        for (s, &w) in sum.iter_mut().zip(row) {
            *s += w;
        }
        count += 1;
    }

    if count == 0 {
        return prior.to_vec();
    }

    let inv = 1.0 / count as f64;
    sum.iter()
        .zip(prior)
        .map(|(&s, &old)| {
            let avg = s * inv;
            let new = if blend >= 1.0 { avg } else { old + (avg - old) * blend };
            new.clamp(0.0, 1.0)
        })
        .collect()
}

/// The targets plus their first rings, sorted and unique.
///
/// These are the rows [`average_weights`] needs in its snapshot. Fails with
/// [`WeightError::InvalidVertex`] if a target is not part of the mesh.
pub fn support_region<A: Adjacency + ?Sized>(adjacency: &A, targets: &TargetSet) -> Result<Vec<VertexId>> {
    let mut region: Vec<VertexId> = targets.vertices().to_vec();
    for &v in targets.vertices() {
        region.extend_from_slice(adjacency.neighbors(v)?);
    }
    region.sort_unstable();
    region.dedup();
    Ok(region)
}

/// Per-target work: where its row lives in the working buffer, where its
/// neighbors' rows live, and how strongly it blends.
struct Plan {
    slot: usize,
    neighbors: Vec<usize>,
    blend: f64,
}

/// Average the weights of `targets` over their first rings.
///
/// `snapshot` must hold a row for every target and every neighbor of a
/// target (see [`support_region`]); it is never modified. The result holds
/// one row per target, in target order. The effective blend of a target is
/// `options.blend` times its strength in `targets`.
///
/// # Errors
///
/// - [`WeightError::InvalidParameter`] if the blend is outside `[0, 1]`
/// - [`WeightError::InvalidVertex`] if a target is not part of the mesh
/// - [`WeightError::MissingRow`] if the snapshot lacks a needed row
///
/// All checks happen before any averaging.
pub fn average_weights<A: Adjacency + ?Sized>(
    adjacency: &A,
    snapshot: &WeightRows,
    targets: &TargetSet,
    options: &AverageOptions,
) -> Result<WeightRows> {
    options.validate()?;

    let index = snapshot.index_map();
    let slot_of = |v: VertexId| {
        index
            .get(&v)
            .copied()
            .ok_or(WeightError::MissingRow { vertex: v.index() })
    };

    let mut plans = Vec::with_capacity(targets.len());
    for (v, strength) in targets.iter() {
        let neighbors = adjacency
            .neighbors(v)?
            .iter()
            .map(|&n| slot_of(n))
            .collect::<Result<Vec<_>>>()?;
        plans.push(Plan {
            slot: slot_of(v)?,
            neighbors,
            blend: options.blend * strength,
        });
    }

    let n = snapshot.num_influences();
    let mut working = snapshot.values().to_vec();

    if options.blend > 0.0 {
        for pass in 0..options.iterations {
            let frozen = &working;
            let row_at = move |slot: usize| &frozen[slot * n..(slot + 1) * n];
            let compute = move |plan: &Plan| {
                average_row(
                    row_at(plan.slot),
                    plan.neighbors.iter().map(|&s| row_at(s)),
                    plan.blend,
                )
            };

            let updated: Vec<Vec<f64>> = if options.parallel {
                plans.par_iter().map(&compute).collect()
            } else {
                plans.iter().map(&compute).collect()
            };

            for (plan, row) in plans.iter().zip(updated) {
                working[plan.slot * n..(plan.slot + 1) * n].copy_from_slice(&row);
            }
            debug!("averaging pass {} updated {} rows", pass + 1, plans.len());
        }
    }

    let mut result = WeightRows::with_capacity(n, plans.len());
    for ((v, _), plan) in targets.iter().zip(&plans) {
        result.push(v, &working[plan.slot * n..(plan.slot + 1) * n])?;
    }
    Ok(result)
}
