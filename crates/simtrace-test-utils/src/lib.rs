//! Test fixtures and record builders for simtrace development.
//!
//! [`sample_model`] is a small job-shop model that touches every value
//! type and every decision point kind. The builder functions in
//! [`records`] produce typed records against it, and [`encode_log`] frames
//! a record sequence as a complete binary log.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod records;

use simtrace_log::{LogWriter, Record};
use simtrace_model::{
    ActivityDef, DecisionPointDef, DecisionPointId, DecisionPointKind, ModelStructure,
    ParameterDef, PatternDef, PatternId, ResourceTypeDef, ResourceTypeId, ResultDef, ValueType,
};

pub use records::*;

/// `Machine` resource type.
pub const MACHINE: ResourceTypeId = ResourceTypeId(0);
/// `Part` resource type.
pub const PART: ResourceTypeId = ResourceTypeId(1);

/// `Arrival` event pattern: one part.
pub const ARRIVAL: PatternId = PatternId(0);
/// `Load` operation pattern: machine, part.
pub const LOAD: PatternId = PatternId(1);
/// `Inspect` rule pattern: machine.
pub const INSPECT: PatternId = PatternId(2);
/// `Move` search rule pattern: part, machine.
pub const MOVE: PatternId = PatternId(3);

/// `production` decision point (`some`): load, inspect.
pub const PRODUCTION: DecisionPointId = DecisionPointId(0);
/// `planner` decision point (`search`): move.
pub const PLANNER: DecisionPointId = DecisionPointId(1);
/// `maintenance` decision point (`prior`): service.
pub const MAINTENANCE: DecisionPointId = DecisionPointId(2);

fn param(name: &str, value_type: ValueType) -> ParameterDef {
    ParameterDef {
        name: name.into(),
        value_type,
    }
}

fn activity(name: &str, pattern: PatternId) -> ActivityDef {
    ActivityDef {
        name: name.into(),
        pattern,
    }
}

fn result_def(name: &str, value_type: ValueType) -> ResultDef {
    ResultDef {
        name: name.into(),
        value_type,
    }
}

/// The job-shop fixture model.
pub fn sample_model() -> ModelStructure {
    ModelStructure {
        name: "job_shop".into(),
        resource_types: vec![
            ResourceTypeDef {
                name: "Machine".into(),
                parameters: vec![
                    param("label", ValueType::String),
                    param("load", ValueType::Integer),
                    param("speed", ValueType::Real),
                    param("busy", ValueType::Boolean),
                    param("state", ValueType::Enum),
                ],
            },
            ResourceTypeDef {
                name: "Part".into(),
                parameters: vec![param("weight", ValueType::Real)],
            },
        ],
        patterns: vec![
            PatternDef {
                name: "Arrival".into(),
                relevant_resource_types: vec![PART],
            },
            PatternDef {
                name: "Load".into(),
                relevant_resource_types: vec![MACHINE, PART],
            },
            PatternDef {
                name: "Inspect".into(),
                relevant_resource_types: vec![MACHINE],
            },
            PatternDef {
                name: "Move".into(),
                relevant_resource_types: vec![PART, MACHINE],
            },
        ],
        decision_points: vec![
            DecisionPointDef {
                name: "production".into(),
                kind: DecisionPointKind::Some,
                activities: vec![activity("load", LOAD), activity("inspect", INSPECT)],
            },
            DecisionPointDef {
                name: "planner".into(),
                kind: DecisionPointKind::Search,
                activities: vec![activity("move", MOVE)],
            },
            DecisionPointDef {
                name: "maintenance".into(),
                kind: DecisionPointKind::Prior,
                activities: vec![activity("service", LOAD)],
            },
        ],
        results: vec![
            result_def("throughput", ValueType::Integer),
            result_def("utilization", ValueType::Real),
            result_def("idle", ValueType::Boolean),
            result_def("report", ValueType::String),
            result_def("mode", ValueType::Enum),
        ],
    }
}

/// [`sample_model`] as the engine exports it, using the engine's
/// camel-case aliases.
pub fn sample_model_json() -> &'static str {
    r#"{
  "name": "job_shop",
  "resource_types": [
    {
      "name": "Machine",
      "parameters": [
        { "name": "label", "type": "string" },
        { "name": "load", "type": "integer" },
        { "name": "speed", "type": "real" },
        { "name": "busy", "type": "boolean" },
        { "name": "state", "type": "enum" }
      ]
    },
    { "name": "Part", "parameters": [{ "name": "weight", "type": "real" }] }
  ],
  "patterns": [
    { "name": "Arrival", "relResTypes": [1] },
    { "name": "Load", "relResTypes": [0, 1] },
    { "name": "Inspect", "relResTypes": [0] },
    { "name": "Move", "relResTypes": [1, 0] }
  ],
  "decision_points": [
    {
      "name": "production",
      "type": "some",
      "activities": [
        { "name": "load", "pattern": 1 },
        { "name": "inspect", "pattern": 2 }
      ]
    },
    { "name": "planner", "type": "search", "activities": [{ "name": "move", "pattern": 3 }] },
    { "name": "maintenance", "type": "prior", "activities": [{ "name": "service", "pattern": 1 }] }
  ],
  "results": [
    { "name": "throughput", "valueType": "integer" },
    { "name": "utilization", "valueType": "real" },
    { "name": "idle", "valueType": "boolean" },
    { "name": "report", "valueType": "string" },
    { "name": "mode", "valueType": "enum" }
  ]
}"#
}

/// Encode `records` against `model` as a complete log.
///
/// Panics if a record does not fit the model.
pub fn encode_log(model: &ModelStructure, records: &[Record]) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut writer = LogWriter::new(&mut buf).expect("writing to a Vec cannot fail");
    for record in records {
        writer
            .write_record(record, model)
            .unwrap_or_else(|e| panic!("record {record:?} does not fit the model: {e}"));
    }
    drop(writer);
    buf
}
