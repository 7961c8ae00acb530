//! The model-structure descriptor and its lookup helpers.
//!
//! [`ModelStructure`] mirrors the JSON document the simulation engine
//! exports alongside its binary log:
//!
//! ```json
//! {
//!   "name": "barbershop",
//!   "resource_types": [{ "name": "Client", "parameters": [{ "name": "state", "type": "enum" }] }],
//!   "patterns": [{ "name": "Arrival", "relevant_resource_types": [0] }],
//!   "decision_points": [{ "name": "dp", "type": "some", "activities": [{ "name": "a", "pattern": 0 }] }],
//!   "results": [{ "name": "served", "value_type": "integer" }]
//! }
//! ```

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::id::{ActivityId, DecisionPointId, PatternId, ResourceTypeId, ResultId};
use crate::layout::ParameterLayout;
use crate::value::ValueType;

/// A single declared resource parameter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDef {
    /// Parameter name, for diagnostics.
    pub name: String,
    /// Declared type; determines the wire width and rendering.
    #[serde(rename = "type")]
    pub value_type: ValueType,
}

/// A resource type and its parameter schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTypeDef {
    /// Resource type name.
    pub name: String,
    /// Parameters in declaration order, which is also wire order.
    #[serde(default)]
    pub parameters: Vec<ParameterDef>,
}

impl ResourceTypeDef {
    /// Byte layout of this type's parameter block.
    pub fn layout(&self) -> ParameterLayout {
        ParameterLayout::for_parameters(&self.parameters)
    }
}

/// A pattern and the resource types of its relevant resources.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternDef {
    /// Pattern name.
    pub name: String,
    /// Type of each relevant resource slot, in slot order.
    #[serde(default, alias = "relResTypes")]
    pub relevant_resource_types: Vec<ResourceTypeId>,
}

/// How a decision point chooses among its activities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionPointKind {
    /// First applicable activity fires.
    Some,
    /// Activities are ranked by priority.
    Prior,
    /// Best-first search over activity sequences.
    Search,
}

impl DecisionPointKind {
    /// Whether operations started by this decision point carry action
    /// numbers that need legacy slot remapping.
    pub fn tracks_actions(self) -> bool {
        matches!(self, Self::Some | Self::Prior)
    }
}

/// A candidate activity of a decision point.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDef {
    /// Activity name.
    pub name: String,
    /// The pattern this activity instantiates.
    pub pattern: PatternId,
}

/// A decision point and its activities.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionPointDef {
    /// Decision point name.
    pub name: String,
    /// Evaluation strategy.
    #[serde(rename = "type")]
    pub kind: DecisionPointKind,
    /// Activities in declaration order.
    #[serde(default)]
    pub activities: Vec<ActivityDef>,
}

/// A collected result and the type of its value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultDef {
    /// Result name.
    pub name: String,
    /// Declared value type.
    #[serde(alias = "valueType")]
    pub value_type: ValueType,
}

/// Static description of a simulation model.
///
/// Loaded once before decoding and shared read-only by every trace session
/// translating a run of this model.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelStructure {
    /// Model name.
    #[serde(default)]
    pub name: String,
    /// Resource types; `ResourceTypeId(n)` is `resource_types[n]`.
    #[serde(default)]
    pub resource_types: Vec<ResourceTypeDef>,
    /// Patterns; `PatternId(n)` is `patterns[n]`.
    #[serde(default)]
    pub patterns: Vec<PatternDef>,
    /// Decision points; `DecisionPointId(n)` is `decision_points[n]`.
    #[serde(default)]
    pub decision_points: Vec<DecisionPointDef>,
    /// Results; `ResultId(n)` is `results[n]`.
    #[serde(default)]
    pub results: Vec<ResultDef>,
}

impl ModelStructure {
    /// Parse and validate a JSON descriptor.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let model: Self = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    /// Read, parse and validate a JSON descriptor.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ModelError> {
        let model: Self = serde_json::from_reader(reader)?;
        model.validate()?;
        Ok(model)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every cross-table reference points at an existing item.
    pub fn validate(&self) -> Result<(), ModelError> {
        for pattern in &self.patterns {
            for ty in &pattern.relevant_resource_types {
                if ty.index() >= self.resource_types.len() {
                    return Err(ModelError::DanglingReference {
                        detail: format!(
                            "pattern '{}' refers to resource type {ty}, but only {} exist",
                            pattern.name,
                            self.resource_types.len()
                        ),
                    });
                }
            }
        }
        for dpt in &self.decision_points {
            for activity in &dpt.activities {
                if activity.pattern.index() >= self.patterns.len() {
                    return Err(ModelError::DanglingReference {
                        detail: format!(
                            "activity '{}' of decision point '{}' refers to pattern {}, \
                             but only {} exist",
                            activity.name,
                            dpt.name,
                            activity.pattern,
                            self.patterns.len()
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    /// Look up a resource type.
    pub fn resource_type(&self, id: ResourceTypeId) -> Result<&ResourceTypeDef, ModelError> {
        self.resource_types
            .get(id.index())
            .ok_or(ModelError::UnknownResourceType { index: id })
    }

    /// Look up a pattern.
    pub fn pattern(&self, id: PatternId) -> Result<&PatternDef, ModelError> {
        self.patterns
            .get(id.index())
            .ok_or(ModelError::UnknownPattern { index: id })
    }

    /// Look up a decision point.
    pub fn decision_point(&self, id: DecisionPointId) -> Result<&DecisionPointDef, ModelError> {
        self.decision_points
            .get(id.index())
            .ok_or(ModelError::UnknownDecisionPoint { index: id })
    }

    /// Look up an activity of a decision point.
    pub fn activity(
        &self,
        decision_point: DecisionPointId,
        activity: ActivityId,
    ) -> Result<&ActivityDef, ModelError> {
        self.decision_point(decision_point)?
            .activities
            .get(activity.index())
            .ok_or(ModelError::UnknownActivity {
                decision_point,
                activity,
            })
    }

    /// Resolve decision point → activity → pattern.
    pub fn activity_pattern(
        &self,
        decision_point: DecisionPointId,
        activity: ActivityId,
    ) -> Result<PatternId, ModelError> {
        Ok(self.activity(decision_point, activity)?.pattern)
    }

    /// Relevant resource types of a pattern.
    pub fn relevant_resource_types(&self, id: PatternId) -> Result<&[ResourceTypeId], ModelError> {
        Ok(&self.pattern(id)?.relevant_resource_types)
    }

    /// Look up a result.
    pub fn result(&self, id: ResultId) -> Result<&ResultDef, ModelError> {
        self.results
            .get(id.index())
            .ok_or(ModelError::UnknownResult { index: id })
    }
}
