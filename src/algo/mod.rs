//! Skin weight algorithms.
//!
//! - **Smoothing**: neighbor averaging over the first ring ([`smooth`])
//! - **Limiting**: keep the largest N influences per vertex, prune small weights ([`limit`])
//! - **Normalization**: rescale rows to sum to one ([`normalize`])
//! - **Fitting**: recover rigid influence transforms from deformed points ([`fit`])
//!
//! The functions here work on plain rows and never touch a weight store;
//! [`crate::pipeline`] chains them into a complete, undoable operation.

pub mod fit;
pub mod limit;
pub mod normalize;
pub mod smooth;
