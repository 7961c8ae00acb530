//! Error types for legacy trace translation.

use std::io;

use simtrace_log::LogError;
use simtrace_model::{ActivityId, DecisionPointId, ModelError, ResourceId, ResourceTypeId};

/// Errors that stop translation of the current entry.
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    /// The entry could not be read or parsed.
    #[error(transparent)]
    Log(#[from] LogError),
    /// A model lookup failed while rendering.
    #[error("model: {0}")]
    Model(#[from] ModelError),
    /// Writing the rendered trace failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// A resource was referenced before it was given a legacy id.
    #[error("resource {resource} of type {resource_type} has no legacy id")]
    MissingResourceId {
        /// Resource type index.
        resource_type: ResourceTypeId,
        /// Instance number within the type.
        resource: ResourceId,
    },
    /// The decision point does not track operations for this activity.
    #[error("no action container for activity {activity} of decision point {decision_point}")]
    MissingActionContainer {
        /// Decision point index.
        decision_point: DecisionPointId,
        /// Activity index.
        activity: ActivityId,
    },
    /// An operation ended that never began.
    #[error("action {action} of activity {activity} (decision point {decision_point}) is not running")]
    MissingAction {
        /// Decision point index.
        decision_point: DecisionPointId,
        /// Activity index.
        activity: ActivityId,
        /// Engine-assigned action number.
        action: u32,
    },
}
