//! Strongly-typed model indexes.
//!
//! Every index is the zero-based position of an item in its model table.
//! The legacy trace format prints most of them one-based; use
//! `one_based()` at the rendering site rather than adjusting the index.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! model_index {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Position of this item in its model table.
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// The legacy one-based ordinal of this item.
            pub fn one_based(self) -> u64 {
                u64::from(self.0) + 1
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(v: u32) -> Self {
                Self(v)
            }
        }
    };
}

model_index!(
    /// Identifies a resource type: `ResourceTypeId(n)` is `resource_types[n]`.
    ResourceTypeId
);

model_index!(
    /// Identifies a resource instance within its resource type.
    ///
    /// Instance numbers are assigned by the simulation engine and are only
    /// unique per type; the legacy trace remaps the `(type, instance)` pair.
    ResourceId
);

model_index!(
    /// Identifies a pattern: `PatternId(n)` is `patterns[n]`.
    PatternId
);

model_index!(
    /// Identifies a decision point: `DecisionPointId(n)` is `decision_points[n]`.
    DecisionPointId
);

model_index!(
    /// Identifies an activity within its decision point.
    ActivityId
);

model_index!(
    /// Identifies a result: `ResultId(n)` is `results[n]`.
    ResultId
);
