//! Complete weight edits: average, prune, limit, normalize, write.
//!
//! [`run`] is what a command or brush stroke calls. It reads the rows it
//! needs from a [`WeightStore`], computes the new rows for the targets, and
//! writes them back in a single `set_weights` call. The rows that call
//! replaced become the `before` half of the returned [`OperationRecord`].
//!
//! Stages, in order:
//!
//! 1. neighbor averaging ([`average_weights`]), skipped when the blend factor is 0
//! 2. pruning of weights below [`SkinConfig::prune_below`]
//! 3. influence limiting to [`SkinConfig::max_influences`]
//! 4. normalization, if [`SkinConfig::normalize`] is set
//!
//! Limiting runs before normalizing so that the surviving weights are
//! rescaled to sum to one.
//!
//! # Example
//!
//! ```
//! use heft::history;
//! use heft::mesh::{TargetSet, Topology, VertexId};
//! use heft::pipeline::{run, SkinConfig};
//! use heft::weights::{InfluenceSet, WeightMatrix, WeightStore};
//!
//! let topo = Topology::from_adjacency(&[vec![1, 2], vec![0], vec![0]]).unwrap();
//! let influences = InfluenceSet::new(["a", "b", "c"]).unwrap();
//! let mut matrix = WeightMatrix::from_rows(
//!     influences.clone(),
//!     &[[0.5, 0.5, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
//! ).unwrap();
//! let original = matrix.clone();
//!
//! let targets = TargetSet::new([VertexId::new(0)]);
//! let outcome = run(&topo, &mut matrix, &influences, &targets, &SkinConfig::default()).unwrap();
//! assert_eq!(matrix.row(VertexId::new(0)).unwrap(), &[0.5, 0.0, 0.5]);
//!
//! history::undo(outcome.record().unwrap(), &mut matrix).unwrap();
//! assert_eq!(matrix, original);
//! ```

use log::{debug, info, warn};

use crate::algo::limit::{limit_rows, prune_rows};
use crate::algo::normalize::normalize_rows;
use crate::algo::smooth::{average_weights, support_region, AverageOptions};
use crate::error::{Result, WeightError};
use crate::history::OperationRecord;
use crate::mesh::{Adjacency, TargetSet};
use crate::weights::{InfluenceSet, WeightStore};

/// Settings for one weight edit.
///
/// Resolve this once from user input or host preferences and pass it down;
/// the algorithms never look anything up on their own.
#[derive(Debug, Clone)]
pub struct SkinConfig {
    /// Blend between the current row (0) and the neighbor mean (1).
    pub blend_factor: f64,

    /// Number of averaging passes.
    pub iterations: usize,

    /// Rescale rows to sum to one after limiting.
    pub normalize: bool,

    /// Maximum number of nonzero influences per vertex (0 = unlimited).
    pub max_influences: usize,

    /// Zero weights strictly below this value (0 = off).
    pub prune_below: f64,

    /// Whether to use parallel execution (default: true).
    pub parallel: bool,
}

impl Default for SkinConfig {
    fn default() -> Self {
        Self {
            blend_factor: 1.0,
            iterations: 1,
            normalize: true,
            max_influences: 0,
            prune_below: 0.0,
            parallel: true,
        }
    }
}

impl SkinConfig {
    /// A configuration that only limits and normalizes, without averaging.
    pub fn cleanup() -> Self {
        Self {
            blend_factor: 0.0,
            ..Self::default()
        }
    }

    /// Set the blend factor.
    pub fn with_blend_factor(mut self, blend_factor: f64) -> Self {
        self.blend_factor = blend_factor;
        self
    }

    /// Set the number of averaging passes.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set whether rows are normalized.
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Set the influence limit (0 = unlimited).
    pub fn with_max_influences(mut self, max_influences: usize) -> Self {
        self.max_influences = max_influences;
        self
    }

    /// Set the pruning threshold.
    pub fn with_prune_below(mut self, prune_below: f64) -> Self {
        self.prune_below = prune_below;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.blend_factor) {
            return Err(WeightError::invalid_param(
                "blend_factor",
                self.blend_factor,
                "must be in [0, 1]",
            ));
        }
        if !self.prune_below.is_finite() || self.prune_below < 0.0 {
            return Err(WeightError::invalid_param(
                "prune_below",
                self.prune_below,
                "must be a finite, non-negative number",
            ));
        }
        Ok(())
    }

    /// The averaging stage of this configuration.
    pub fn average_options(&self) -> AverageOptions {
        AverageOptions {
            blend: self.blend_factor,
            iterations: self.iterations,
            parallel: self.parallel,
        }
    }
}

/// Result of [`run`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Nothing was written: the target set was empty or every resulting row
    /// was all zero.
    Unchanged,
    /// Rows were written.
    Applied(OperationRecord),
}

impl Outcome {
    /// The undo record, if anything was written.
    pub fn record(&self) -> Option<&OperationRecord> {
        match self {
            Outcome::Unchanged => None,
            Outcome::Applied(record) => Some(record),
        }
    }

    /// Take the undo record, if anything was written.
    pub fn into_record(self) -> Option<OperationRecord> {
        match self {
            Outcome::Unchanged => None,
            Outcome::Applied(record) => Some(record),
        }
    }

    /// Check whether rows were written.
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }
}

/// Run one weight edit on `targets`.
///
/// Rows are read and written with the columns of `influences`, which must
/// stay fixed for the duration of the call.
///
/// # Errors
///
/// Configuration, shape, and vertex errors are reported before the store is
/// written. If the store hands back prior rows that do not match the rows
/// written, the prior rows are written back and
/// [`WeightError::PriorMismatch`] is returned. On error nothing has changed.
pub fn run<A, S>(
    adjacency: &A,
    store: &mut S,
    influences: &InfluenceSet,
    targets: &TargetSet,
    config: &SkinConfig,
) -> Result<Outcome>
where
    A: Adjacency + ?Sized,
    S: WeightStore + ?Sized,
{
    config.validate()?;

    if store.num_vertices() != adjacency.num_vertices() {
        return Err(WeightError::MatrixMismatch {
            expected: adjacency.num_vertices(),
            found: store.num_vertices(),
        });
    }

    if targets.is_empty() {
        info!("no target vertices, nothing to do");
        return Ok(Outcome::Unchanged);
    }

    let region = support_region(adjacency, targets)?;
    let snapshot = store.get_weights(&region, influences)?;
    debug!(
        "read {} rows ({} targets) over {} influences",
        region.len(),
        targets.len(),
        influences.len()
    );

    let mut rows = average_weights(adjacency, &snapshot, targets, &config.average_options())?;

    let pruned = prune_rows(&mut rows, config.prune_below);
    let limited = limit_rows(&mut rows, config.max_influences);
    let normalized = if config.normalize { normalize_rows(&mut rows) } else { 0 };
    debug!(
        "pruned {} weights, limited {} weights, normalized {} rows",
        pruned, limited, normalized
    );

    if rows.is_all_zero() {
        info!("every target row came out zero, leaving weights untouched");
        return Ok(Outcome::Unchanged);
    }

    let prior = store.set_weights(&rows, influences)?;
    if prior.vertices() != rows.vertices() || prior.num_influences() != rows.num_influences() {
        // Without a matching prior there is no undo record; put the old rows back.
        if let Err(e) = store.set_weights(&prior, influences) {
            warn!("failed to restore weights after a mismatched write: {}", e);
        }
        return Err(WeightError::PriorMismatch {
            expected: rows.len(),
            found: prior.len(),
        });
    }
    info!("updated weights of {} vertices", rows.len());

    OperationRecord::new(influences.clone(), prior, rows).map(Outcome::Applied)
}
