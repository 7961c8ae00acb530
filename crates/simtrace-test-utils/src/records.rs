//! Terse constructors for typed records.
//!
//! Indexes are plain `u32`s so scenarios read like the log they describe.

use simtrace_log::{
    ActivityRef, PatternRecord, Record, RelevantResources, ResourceEntryKind, ResourceRecord,
    ResultRecord, SearchRecord, SearchStats, SpawnStatus, StopCode, SystemEntryKind, SystemRecord,
};
use simtrace_model::{
    ActivityId, DecisionPointId, PatternId, ResourceId, ResourceTypeId, ResultId, Value,
};

fn resources(ids: &[u32]) -> RelevantResources {
    ids.iter().copied().map(ResourceId).collect()
}

fn activity_ref(decision_point: DecisionPointId, activity: u32) -> ActivityRef {
    ActivityRef {
        decision_point,
        activity: ActivityId(activity),
    }
}

pub fn system(time: f64, kind: SystemEntryKind) -> Record {
    Record::System(SystemRecord { time, kind })
}

pub fn resource(
    time: f64,
    kind: ResourceEntryKind,
    resource_type: ResourceTypeId,
    resource: u32,
    parameters: Vec<Value>,
) -> Record {
    Record::Resource(ResourceRecord {
        time,
        kind,
        resource_type,
        resource: ResourceId(resource),
        parameters,
    })
}

pub fn created(time: f64, ty: ResourceTypeId, res: u32, parameters: Vec<Value>) -> Record {
    resource(time, ResourceEntryKind::Created, ty, res, parameters)
}

pub fn altered(time: f64, ty: ResourceTypeId, res: u32, parameters: Vec<Value>) -> Record {
    resource(time, ResourceEntryKind::Altered, ty, res, parameters)
}

/// An erase written without a state snapshot.
pub fn erased(time: f64, ty: ResourceTypeId, res: u32) -> Record {
    resource(time, ResourceEntryKind::Erased, ty, res, Vec::new())
}

/// Parameters of a `Machine`.
pub fn machine(label: &str, load: i32, speed: f64, busy: bool, state: i16) -> Vec<Value> {
    vec![
        Value::String(label.into()),
        Value::Integer(load),
        Value::Real(speed),
        Value::Boolean(busy),
        Value::Enum(state),
    ]
}

/// Parameters of a `Part`.
pub fn part(weight: f64) -> Vec<Value> {
    vec![Value::Real(weight)]
}

pub fn event(time: f64, pattern: PatternId, res: &[u32]) -> Record {
    Record::Pattern(PatternRecord::Event {
        time,
        pattern,
        resources: resources(res),
    })
}

pub fn rule(time: f64, dpt: DecisionPointId, activity: u32, res: &[u32]) -> Record {
    Record::Pattern(PatternRecord::Rule {
        time,
        activity: activity_ref(dpt, activity),
        resources: resources(res),
    })
}

pub fn operation_begin(
    time: f64,
    dpt: DecisionPointId,
    activity: u32,
    action: u32,
    res: &[u32],
) -> Record {
    Record::Pattern(PatternRecord::OperationBegin {
        time,
        activity: activity_ref(dpt, activity),
        action,
        resources: resources(res),
    })
}

pub fn operation_end(
    time: f64,
    dpt: DecisionPointId,
    activity: u32,
    action: u32,
    res: &[u32],
) -> Record {
    Record::Pattern(PatternRecord::OperationEnd {
        time,
        activity: activity_ref(dpt, activity),
        action,
        resources: resources(res),
    })
}

pub fn search_begin(time: f64, dpt: DecisionPointId) -> Record {
    Record::Search(SearchRecord::Begin {
        time,
        decision_point: dpt,
    })
}

pub fn search_end(time: f64, stop: StopCode, stats: SearchStats) -> Record {
    Record::Search(SearchRecord::End { stop, time, stats })
}

pub fn open(node: i32, parent: i32, g: f64, h: f64) -> Record {
    Record::Search(SearchRecord::Open { node, parent, g, h })
}

#[allow(clippy::too_many_arguments)]
pub fn spawn(
    status: SpawnStatus,
    child: i32,
    parent: i32,
    g: f64,
    h: f64,
    activity: u32,
    rule_cost: f64,
    res: &[u32],
) -> Record {
    Record::Search(SearchRecord::Spawn {
        status,
        child,
        parent,
        g,
        h,
        activity: ActivityId(activity),
        rule_cost,
        resources: resources(res),
    })
}

pub fn decision(node: i32, activity: i32) -> Record {
    Record::Search(SearchRecord::Decision { node, activity })
}

pub fn result(time: f64, id: u32, value: Value) -> Record {
    Record::Result(ResultRecord {
        time,
        result: ResultId(id),
        value,
    })
}
