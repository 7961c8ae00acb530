//! Error types for model loading and lookup.

use std::io;

use crate::id::{ActivityId, DecisionPointId, PatternId, ResourceTypeId, ResultId};

/// Errors raised while loading a model descriptor or resolving an index
/// against it.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The descriptor could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The descriptor is not valid JSON or does not match the schema.
    #[error("invalid model descriptor: {0}")]
    Json(#[from] serde_json::Error),
    /// A resource type index is outside `resource_types`.
    #[error("unknown resource type {index}")]
    UnknownResourceType {
        /// The out-of-range index.
        index: ResourceTypeId,
    },
    /// A pattern index is outside `patterns`.
    #[error("unknown pattern {index}")]
    UnknownPattern {
        /// The out-of-range index.
        index: PatternId,
    },
    /// A decision point index is outside `decision_points`.
    #[error("unknown decision point {index}")]
    UnknownDecisionPoint {
        /// The out-of-range index.
        index: DecisionPointId,
    },
    /// An activity index is outside its decision point's activity list.
    #[error("decision point {decision_point} has no activity {activity}")]
    UnknownActivity {
        /// The decision point that was searched.
        decision_point: DecisionPointId,
        /// The out-of-range activity index.
        activity: ActivityId,
    },
    /// A result index is outside `results`.
    #[error("unknown result {index}")]
    UnknownResult {
        /// The out-of-range index.
        index: ResultId,
    },
    /// A table entry refers to an item that does not exist.
    #[error("dangling reference: {detail}")]
    DanglingReference {
        /// Which reference is broken.
        detail: String,
    },
}
