//! Model-structure descriptor for simtrace.
//!
//! This is the leaf crate with zero internal dependencies. It describes the
//! static shape of a simulation model as seen by the trace decoders:
//! resource types and their parameter schemas, patterns and the resource
//! types they touch, decision points with their activities, and results.
//!
//! The descriptor is loaded once (usually from JSON) before any log entry
//! is decoded and is only ever read afterwards.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod layout;
pub mod structure;
pub mod value;

pub use error::ModelError;
pub use id::{ActivityId, DecisionPointId, PatternId, ResourceId, ResourceTypeId, ResultId};
pub use layout::{ParameterLayout, ParameterLayouts, ParameterSlot};
pub use structure::{
    ActivityDef, DecisionPointDef, DecisionPointKind, ModelStructure, ParameterDef, PatternDef,
    ResourceTypeDef, ResultDef,
};
pub use value::{Value, ValueType};
