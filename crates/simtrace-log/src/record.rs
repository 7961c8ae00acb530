//! Typed log records.
//!
//! [`Record`] is a closed sum type with one variant per entry category and,
//! inside each, one variant or discriminant per sub-type. Parsing consults
//! the model structure for everything the wire leaves implicit: resource
//! parameter schemas, result value types, and the relevant-resource count
//! of a search spawn.

use smallvec::SmallVec;

use simtrace_model::{
    ActivityId, DecisionPointId, ModelStructure, ParameterLayout, ParameterLayouts, ParameterSlot,
    PatternId, ResourceId, ResourceTypeDef, ResourceTypeId, ResultId, Value, ValueType,
};

use crate::codec::ByteCursor;
use crate::entry::{
    EntryCategory, PatternEntryKind, RawEntry, ResourceEntryKind, SearchEntryKind, SpawnStatus,
    StopCode, SystemEntryKind,
};
use crate::error::LogError;

/// Instance numbers of a pattern's relevant resources, in slot order.
pub type RelevantResources = SmallVec<[ResourceId; 4]>;

/// A `(decision point, activity)` pair as written by rules and operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ActivityRef {
    /// Owning decision point.
    pub decision_point: DecisionPointId,
    /// Activity within the decision point.
    pub activity: ActivityId,
}

/// Everything outside an entry that parsing depends on.
#[derive(Clone, Copy, Debug)]
pub struct ParseContext<'m> {
    /// The model the log was produced from.
    pub model: &'m ModelStructure,
    /// Decision point of the search episode in progress, if any.
    pub active_search: Option<DecisionPointId>,
    /// Precomputed parameter layouts of `model`. Without them each
    /// resource entry computes its type's layout afresh.
    pub layouts: Option<&'m ParameterLayouts>,
}

impl<'m> ParseContext<'m> {
    /// Context with no search episode in progress.
    pub fn new(model: &'m ModelStructure) -> Self {
        Self {
            model,
            active_search: None,
            layouts: None,
        }
    }

    /// Same context reading parameter layouts from `layouts`, which must
    /// have been computed for the same model.
    pub fn with_layouts(self, layouts: &'m ParameterLayouts) -> Self {
        Self {
            layouts: Some(layouts),
            ..self
        }
    }

    /// Same context with `decision_point` searching.
    pub fn with_active_search(self, decision_point: DecisionPointId) -> Self {
        Self {
            active_search: Some(decision_point),
            ..self
        }
    }
}

/// A system lifecycle marker.
#[derive(Clone, Debug, PartialEq)]
pub struct SystemRecord {
    /// Simulation time.
    pub time: f64,
    /// Which marker.
    pub kind: SystemEntryKind,
}

/// A resource state change.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceRecord {
    /// Simulation time.
    pub time: f64,
    /// What happened to the resource.
    pub kind: ResourceEntryKind,
    /// The resource's type.
    pub resource_type: ResourceTypeId,
    /// The resource's instance number within its type.
    pub resource: ResourceId,
    /// Parameter values in declaration order. Empty when the entry carries
    /// no state snapshot.
    pub parameters: Vec<Value>,
}

/// An event, rule, or operation firing.
#[derive(Clone, Debug, PartialEq)]
pub enum PatternRecord {
    /// An event fired.
    Event {
        /// Simulation time.
        time: f64,
        /// The event's pattern, indexed directly.
        pattern: PatternId,
        /// Relevant resource instances.
        resources: RelevantResources,
    },
    /// A rule fired.
    Rule {
        /// Simulation time.
        time: f64,
        /// The activity that fired.
        activity: ActivityRef,
        /// Relevant resource instances.
        resources: RelevantResources,
    },
    /// An operation began.
    OperationBegin {
        /// Simulation time.
        time: f64,
        /// The activity that started.
        activity: ActivityRef,
        /// Engine-assigned action number, unique while the operation runs.
        action: u32,
        /// Relevant resource instances.
        resources: RelevantResources,
    },
    /// An operation ended.
    OperationEnd {
        /// Simulation time.
        time: f64,
        /// The activity that finished.
        activity: ActivityRef,
        /// Action number given at the matching begin.
        action: u32,
        /// Relevant resource instances.
        resources: RelevantResources,
    },
}

impl PatternRecord {
    /// Simulation time of the firing.
    pub fn time(&self) -> f64 {
        match self {
            Self::Event { time, .. }
            | Self::Rule { time, .. }
            | Self::OperationBegin { time, .. }
            | Self::OperationEnd { time, .. } => *time,
        }
    }

    /// The wire sub-type.
    pub fn kind(&self) -> PatternEntryKind {
        match self {
            Self::Event { .. } => PatternEntryKind::Event,
            Self::Rule { .. } => PatternEntryKind::Rule,
            Self::OperationBegin { .. } => PatternEntryKind::OperationBegin,
            Self::OperationEnd { .. } => PatternEntryKind::OperationEnd,
        }
    }

    /// Relevant resource instances.
    pub fn resources(&self) -> &[ResourceId] {
        match self {
            Self::Event { resources, .. }
            | Self::Rule { resources, .. }
            | Self::OperationBegin { resources, .. }
            | Self::OperationEnd { resources, .. } => resources,
        }
    }
}

/// Counters reported when a search episode ends.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchStats {
    /// Wall-clock duration in milliseconds.
    pub elapsed_ms: i64,
    /// Memory used by the search graph, in bytes.
    pub memory: i64,
    /// Cost of the best solution.
    pub final_cost: f64,
    /// Nodes opened.
    pub opened: i32,
    /// Nodes in the graph.
    pub nodes: i32,
    /// Nodes added to the open list.
    pub added: i32,
    /// Nodes spawned.
    pub spawned: i32,
}

/// Decision-point search progress.
#[derive(Clone, Debug, PartialEq)]
pub enum SearchRecord {
    /// A search episode began.
    Begin {
        /// Simulation time.
        time: f64,
        /// The searching decision point.
        decision_point: DecisionPointId,
    },
    /// A search episode ended.
    End {
        /// Why it stopped.
        stop: StopCode,
        /// Simulation time.
        time: f64,
        /// Episode counters.
        stats: SearchStats,
    },
    /// A node was opened.
    Open {
        /// Zero-based node number.
        node: i32,
        /// Zero-based parent node number (`-1` for none).
        parent: i32,
        /// Path cost so far.
        g: f64,
        /// Heuristic estimate of the remaining cost.
        h: f64,
    },
    /// A child node was spawned.
    Spawn {
        /// Relation to the existing graph.
        status: SpawnStatus,
        /// Zero-based child node number.
        child: i32,
        /// Zero-based parent node number.
        parent: i32,
        /// Path cost so far.
        g: f64,
        /// Heuristic estimate of the remaining cost.
        h: f64,
        /// Activity of the searching decision point that produced the child.
        activity: ActivityId,
        /// Cost of applying the activity.
        rule_cost: f64,
        /// Relevant resource instances of the activity's pattern.
        resources: RelevantResources,
    },
    /// A node was chosen along the solution path.
    Decision {
        /// Node number as written by the engine.
        node: i32,
        /// Activity number as written by the engine.
        activity: i32,
    },
}

/// A collected result value.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultRecord {
    /// Simulation time.
    pub time: f64,
    /// Which result.
    pub result: ResultId,
    /// The value, typed per the result's declaration.
    pub value: Value,
}

/// A fully typed log entry.
#[derive(Clone, Debug, PartialEq)]
pub enum Record {
    /// System lifecycle marker.
    System(SystemRecord),
    /// Resource state change.
    Resource(ResourceRecord),
    /// Event, rule, or operation firing.
    Pattern(PatternRecord),
    /// Search progress.
    Search(SearchRecord),
    /// Result value.
    Result(ResultRecord),
}

impl Record {
    /// Category of this record.
    pub fn category(&self) -> EntryCategory {
        match self {
            Self::System(_) => EntryCategory::System,
            Self::Resource(_) => EntryCategory::Resource,
            Self::Pattern(_) => EntryCategory::Pattern,
            Self::Search(_) => EntryCategory::Search,
            Self::Result(_) => EntryCategory::Result,
        }
    }

    /// Simulation time, for records that carry one.
    pub fn time(&self) -> Option<f64> {
        match self {
            Self::System(r) => Some(r.time),
            Self::Resource(r) => Some(r.time),
            Self::Pattern(r) => Some(r.time()),
            Self::Search(SearchRecord::Begin { time, .. })
            | Self::Search(SearchRecord::End { time, .. }) => Some(*time),
            Self::Search(_) => None,
            Self::Result(r) => Some(r.time),
        }
    }

    /// Interpret a raw entry.
    pub fn parse(entry: &RawEntry, ctx: &ParseContext<'_>) -> Result<Self, LogError> {
        let category = entry.category()?;
        let mut header = ByteCursor::new(&entry.header);
        header.skip(1)?;
        let mut data = ByteCursor::new(&entry.data);

        let record = match category {
            EntryCategory::System => Self::System(SystemRecord {
                time: header.get_f64()?,
                kind: SystemEntryKind::decode(header.get_u8()?)?,
            }),
            EntryCategory::Resource => {
                let time = header.get_f64()?;
                let kind = ResourceEntryKind::decode(header.get_u8()?)?;
                let resource_type = ResourceTypeId(header.get_index("resource type")?);
                let resource = ResourceId(header.get_index("resource")?);
                let def = ctx.model.resource_type(resource_type)?;
                let parameters = match ctx.layouts.and_then(|l| l.get(resource_type)) {
                    Some(layout) => parse_parameters(&entry.data, def, layout)?,
                    None => parse_parameters(&entry.data, def, &def.layout())?,
                };
                Self::Resource(ResourceRecord {
                    time,
                    kind,
                    resource_type,
                    resource,
                    parameters,
                })
            }
            EntryCategory::Pattern => Self::Pattern(parse_pattern(&mut header, &mut data)?),
            EntryCategory::Search => Self::Search(parse_search(&mut header, &mut data, ctx)?),
            EntryCategory::Result => {
                let time = header.get_f64()?;
                let result = ResultId(header.get_index("result")?);
                let value_type = ctx.model.result(result)?.value_type;
                Self::Result(ResultRecord {
                    time,
                    result,
                    value: parse_result_value(&mut data, value_type)?,
                })
            }
        };
        Ok(record)
    }

    /// Encode into a raw entry, the inverse of [`parse`](Self::parse).
    ///
    /// The action numbers that the engine writes into event and rule
    /// entries are never read back and are encoded as zero.
    pub fn encode(&self, model: &ModelStructure) -> Result<RawEntry, LogError> {
        let mut header = vec![self.category().tag()];
        let mut data = Vec::new();

        match self {
            Self::System(r) => {
                header.extend_from_slice(&r.time.to_be_bytes());
                header.push(r.kind.tag());
            }
            Self::Resource(r) => {
                header.extend_from_slice(&r.time.to_be_bytes());
                header.push(r.kind.tag());
                put_index(&mut header, r.resource_type.0, "resource type")?;
                put_index(&mut header, r.resource.0, "resource")?;
                let def = model.resource_type(r.resource_type)?;
                data = encode_parameters(&r.parameters, def)?;
            }
            Self::Pattern(r) => {
                header.extend_from_slice(&r.time().to_be_bytes());
                header.push(r.kind().tag());
                match r {
                    PatternRecord::Event { pattern, .. } => {
                        put_index(&mut data, pattern.0, "pattern")?;
                        put_index(&mut data, 0, "action")?;
                    }
                    PatternRecord::Rule { activity, .. } => {
                        put_activity(&mut data, activity)?;
                        put_index(&mut data, 0, "action")?;
                    }
                    PatternRecord::OperationBegin {
                        activity, action, ..
                    }
                    | PatternRecord::OperationEnd {
                        activity, action, ..
                    } => {
                        put_activity(&mut data, activity)?;
                        put_index(&mut data, *action, "action")?;
                    }
                }
                let resources = r.resources();
                let count = u32::try_from(resources.len())
                    .map_err(|_| LogError::malformed("too many relevant resources"))?;
                put_index(&mut data, count, "relevant resource count")?;
                put_resources(&mut data, resources)?;
            }
            Self::Search(r) => encode_search(r, &mut header, &mut data)?,
            Self::Result(r) => {
                header.extend_from_slice(&r.time.to_be_bytes());
                put_index(&mut header, r.result.0, "result")?;
                let declared = model.result(r.result)?.value_type;
                encode_value(&mut data, declared, &r.value)?;
            }
        }

        Ok(RawEntry { header, data })
    }
}

// ── Parsing helpers ─────────────────────────────────────────────

fn parse_parameters(
    data: &[u8],
    def: &ResourceTypeDef,
    layout: &ParameterLayout,
) -> Result<Vec<Value>, LogError> {
    if data.is_empty() {
        return Ok(Vec::new());
    }

    let block = ByteCursor::new(data);
    let mut values = Vec::with_capacity(def.parameters.len());

    for (param, slot) in def.parameters.iter().zip(layout.slots()) {
        let value = match (*slot, param.value_type) {
            (ParameterSlot::Inline { offset, .. }, ValueType::Integer) => {
                Value::Integer(block.i32_at(offset)?)
            }
            (ParameterSlot::Inline { offset, .. }, ValueType::Real) => {
                Value::Real(block.f64_at(offset)?)
            }
            (ParameterSlot::Inline { offset, .. }, ValueType::Boolean) => {
                Value::Boolean(block.u8_at(offset)? != 0)
            }
            (ParameterSlot::Inline { offset, .. }, ValueType::Enum) => {
                Value::Enum(block.i16_at(offset)?)
            }
            (ParameterSlot::Indirect { table_offset }, _) => {
                let position = non_negative(block.i32_at(table_offset)?, "string offset")?;
                let len = non_negative(block.i32_at(position)?, "string length")?;
                let bytes = block.slice_at(position + 4, len)?;
                let text = String::from_utf8(bytes.to_vec()).map_err(|e| {
                    LogError::malformed(format!("parameter '{}' is not UTF-8: {e}", param.name))
                })?;
                Value::String(text)
            }
            (_, value_type) => return Err(LogError::UnsupportedValueType { value_type }),
        };
        values.push(value);
    }
    Ok(values)
}

fn parse_pattern(
    header: &mut ByteCursor<'_>,
    data: &mut ByteCursor<'_>,
) -> Result<PatternRecord, LogError> {
    let time = header.get_f64()?;
    let kind = PatternEntryKind::decode(header.get_u8()?)?;

    let record = match kind {
        PatternEntryKind::Event => {
            let pattern = PatternId(data.get_index("pattern")?);
            data.skip(4)?;
            PatternRecord::Event {
                time,
                pattern,
                resources: parse_counted_resources(data)?,
            }
        }
        PatternEntryKind::Rule => {
            let activity = parse_activity(data)?;
            data.skip(4)?;
            PatternRecord::Rule {
                time,
                activity,
                resources: parse_counted_resources(data)?,
            }
        }
        PatternEntryKind::OperationBegin => {
            let activity = parse_activity(data)?;
            let action = data.get_index("action")?;
            PatternRecord::OperationBegin {
                time,
                activity,
                action,
                resources: parse_counted_resources(data)?,
            }
        }
        PatternEntryKind::OperationEnd => {
            let activity = parse_activity(data)?;
            let action = data.get_index("action")?;
            PatternRecord::OperationEnd {
                time,
                activity,
                action,
                resources: parse_counted_resources(data)?,
            }
        }
    };
    Ok(record)
}

fn parse_search(
    header: &mut ByteCursor<'_>,
    data: &mut ByteCursor<'_>,
    ctx: &ParseContext<'_>,
) -> Result<SearchRecord, LogError> {
    let kind = SearchEntryKind::decode(header.get_u8()?)?;

    let record = match kind {
        SearchEntryKind::Begin => {
            let time = data.get_f64()?;
            let decision_point = DecisionPointId(data.get_index("decision point")?);
            data.skip(4)?;
            SearchRecord::Begin {
                time,
                decision_point,
            }
        }
        SearchEntryKind::End => SearchRecord::End {
            stop: StopCode::decode(data.get_u8()?)?,
            time: data.get_f64()?,
            stats: SearchStats {
                elapsed_ms: data.get_i64()?,
                memory: data.get_i64()?,
                final_cost: data.get_f64()?,
                opened: data.get_i32()?,
                nodes: data.get_i32()?,
                added: data.get_i32()?,
                spawned: data.get_i32()?,
            },
        },
        SearchEntryKind::Open => SearchRecord::Open {
            node: data.get_i32()?,
            parent: data.get_i32()?,
            g: data.get_f64()?,
            h: data.get_f64()?,
        },
        SearchEntryKind::Spawn => {
            let status = SpawnStatus::decode(data.get_u8()?)?;
            let child = data.get_i32()?;
            let parent = data.get_i32()?;
            let g = data.get_f64()?;
            let h = data.get_f64()?;
            let activity = ActivityId(data.get_index("activity")?);
            let rule_cost = data.get_f64()?;

            // The resource count is implied by the activity's pattern.
            let decision_point = ctx.active_search.ok_or(LogError::SpawnOutsideSearch)?;
            let pattern = ctx.model.activity_pattern(decision_point, activity)?;
            let count = ctx.model.relevant_resource_types(pattern)?.len();
            let mut resources = RelevantResources::with_capacity(count);
            for _ in 0..count {
                resources.push(ResourceId(data.get_index("resource")?));
            }

            SearchRecord::Spawn {
                status,
                child,
                parent,
                g,
                h,
                activity,
                rule_cost,
                resources,
            }
        }
        SearchEntryKind::Decision => SearchRecord::Decision {
            node: data.get_i32()?,
            activity: data.get_i32()?,
        },
    };
    Ok(record)
}

fn parse_result_value(data: &mut ByteCursor<'_>, value_type: ValueType) -> Result<Value, LogError> {
    let value = match value_type {
        ValueType::Integer => Value::Integer(data.get_i32()?),
        ValueType::Real => Value::Real(data.get_f64()?),
        ValueType::Boolean => Value::Boolean(data.get_u8()? != 0),
        ValueType::Enum => Value::Enum(data.get_i16()?),
        ValueType::String => {
            let bytes = data.take_rest();
            Value::String(String::from_utf8(bytes.to_vec()).map_err(|e| {
                LogError::malformed(format!("result string is not UTF-8: {e}"))
            })?)
        }
        ValueType::Array => return Err(LogError::UnsupportedValueType { value_type }),
    };
    Ok(value)
}

fn parse_activity(data: &mut ByteCursor<'_>) -> Result<ActivityRef, LogError> {
    Ok(ActivityRef {
        decision_point: DecisionPointId(data.get_index("decision point")?),
        activity: ActivityId(data.get_index("activity")?),
    })
}

fn parse_counted_resources(data: &mut ByteCursor<'_>) -> Result<RelevantResources, LogError> {
    let count = data.get_index("relevant resource count")? as usize;
    if count.saturating_mul(4) > data.remaining() {
        return Err(LogError::malformed(format!(
            "{count} relevant resources announced, {} bytes left",
            data.remaining()
        )));
    }
    let mut resources = RelevantResources::with_capacity(count);
    for _ in 0..count {
        resources.push(ResourceId(data.get_index("resource")?));
    }
    Ok(resources)
}

fn non_negative(v: i32, what: &str) -> Result<usize, LogError> {
    usize::try_from(v).map_err(|_| LogError::malformed(format!("negative {what} {v}")))
}

// ── Encoding helpers ────────────────────────────────────────────

fn put_index(buf: &mut Vec<u8>, v: u32, what: &str) -> Result<(), LogError> {
    let v = i32::try_from(v)
        .map_err(|_| LogError::malformed(format!("{what} index {v} does not fit in i32")))?;
    buf.extend_from_slice(&v.to_be_bytes());
    Ok(())
}

fn put_activity(buf: &mut Vec<u8>, activity: &ActivityRef) -> Result<(), LogError> {
    put_index(buf, activity.decision_point.0, "decision point")?;
    put_index(buf, activity.activity.0, "activity")
}

fn put_resources(buf: &mut Vec<u8>, resources: &[ResourceId]) -> Result<(), LogError> {
    for resource in resources {
        put_index(buf, resource.0, "resource")?;
    }
    Ok(())
}

fn check_type(declared: ValueType, value: &Value) -> Result<(), LogError> {
    if declared == ValueType::Array {
        return Err(LogError::UnsupportedValueType {
            value_type: declared,
        });
    }
    let found = value.value_type();
    if found != declared {
        return Err(LogError::ValueTypeMismatch {
            expected: declared,
            found,
        });
    }
    Ok(())
}

fn encode_value(buf: &mut Vec<u8>, declared: ValueType, value: &Value) -> Result<(), LogError> {
    check_type(declared, value)?;
    match value {
        Value::Integer(v) => buf.extend_from_slice(&v.to_be_bytes()),
        Value::Real(v) => buf.extend_from_slice(&v.to_be_bytes()),
        Value::Boolean(v) => buf.push(u8::from(*v)),
        Value::Enum(v) => buf.extend_from_slice(&v.to_be_bytes()),
        Value::String(s) => buf.extend_from_slice(s.as_bytes()),
    }
    Ok(())
}

fn encode_parameters(values: &[Value], def: &ResourceTypeDef) -> Result<Vec<u8>, LogError> {
    if values.is_empty() {
        return Ok(Vec::new());
    }
    if values.len() != def.parameters.len() {
        return Err(LogError::malformed(format!(
            "resource type '{}' declares {} parameters, record has {}",
            def.name,
            def.parameters.len(),
            values.len()
        )));
    }

    let layout = def.layout();
    let mut block = vec![0u8; layout.bodies_offset()];
    for ((param, slot), value) in def.parameters.iter().zip(layout.slots()).zip(values) {
        check_type(param.value_type, value)?;
        match (*slot, value) {
            (ParameterSlot::Inline { offset, size }, value) => {
                let mut bytes = Vec::with_capacity(size);
                encode_value(&mut bytes, param.value_type, value)?;
                block[offset..offset + size].copy_from_slice(&bytes);
            }
            (ParameterSlot::Indirect { table_offset }, Value::String(s)) => {
                let position = i32::try_from(block.len())
                    .map_err(|_| LogError::malformed("parameter block too large"))?;
                let len = i32::try_from(s.len())
                    .map_err(|_| LogError::malformed("string parameter too large"))?;
                block[table_offset..table_offset + 4].copy_from_slice(&position.to_be_bytes());
                block.extend_from_slice(&len.to_be_bytes());
                block.extend_from_slice(s.as_bytes());
            }
            _ => {
                return Err(LogError::UnsupportedValueType {
                    value_type: param.value_type,
                })
            }
        }
    }
    Ok(block)
}

fn encode_search(
    record: &SearchRecord,
    header: &mut Vec<u8>,
    data: &mut Vec<u8>,
) -> Result<(), LogError> {
    match record {
        SearchRecord::Begin {
            time,
            decision_point,
        } => {
            header.push(SearchEntryKind::Begin.tag());
            data.extend_from_slice(&time.to_be_bytes());
            put_index(data, decision_point.0, "decision point")?;
            data.extend_from_slice(&0i32.to_be_bytes());
        }
        SearchRecord::End { stop, time, stats } => {
            header.push(SearchEntryKind::End.tag());
            data.push(stop.tag());
            data.extend_from_slice(&time.to_be_bytes());
            data.extend_from_slice(&stats.elapsed_ms.to_be_bytes());
            data.extend_from_slice(&stats.memory.to_be_bytes());
            data.extend_from_slice(&stats.final_cost.to_be_bytes());
            data.extend_from_slice(&stats.opened.to_be_bytes());
            data.extend_from_slice(&stats.nodes.to_be_bytes());
            data.extend_from_slice(&stats.added.to_be_bytes());
            data.extend_from_slice(&stats.spawned.to_be_bytes());
        }
        SearchRecord::Open { node, parent, g, h } => {
            header.push(SearchEntryKind::Open.tag());
            data.extend_from_slice(&node.to_be_bytes());
            data.extend_from_slice(&parent.to_be_bytes());
            data.extend_from_slice(&g.to_be_bytes());
            data.extend_from_slice(&h.to_be_bytes());
        }
        SearchRecord::Spawn {
            status,
            child,
            parent,
            g,
            h,
            activity,
            rule_cost,
            resources,
        } => {
            header.push(SearchEntryKind::Spawn.tag());
            data.push(status.tag());
            data.extend_from_slice(&child.to_be_bytes());
            data.extend_from_slice(&parent.to_be_bytes());
            data.extend_from_slice(&g.to_be_bytes());
            data.extend_from_slice(&h.to_be_bytes());
            put_index(data, activity.0, "activity")?;
            data.extend_from_slice(&rule_cost.to_be_bytes());
            put_resources(data, resources)?;
        }
        SearchRecord::Decision { node, activity } => {
            header.push(SearchEntryKind::Decision.tag());
            data.extend_from_slice(&node.to_be_bytes());
            data.extend_from_slice(&activity.to_be_bytes());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use simtrace_model::{
        ActivityDef, DecisionPointDef, DecisionPointKind, ParameterDef, PatternDef, ResultDef,
    };
    use smallvec::smallvec;

    fn model() -> ModelStructure {
        ModelStructure {
            name: "unit".into(),
            resource_types: vec![
                ResourceTypeDef {
                    name: "Machine".into(),
                    parameters: vec![
                        ParameterDef {
                            name: "label".into(),
                            value_type: ValueType::String,
                        },
                        ParameterDef {
                            name: "load".into(),
                            value_type: ValueType::Integer,
                        },
                        ParameterDef {
                            name: "busy".into(),
                            value_type: ValueType::Boolean,
                        },
                    ],
                },
                ResourceTypeDef {
                    name: "Matrix".into(),
                    parameters: vec![ParameterDef {
                        name: "cells".into(),
                        value_type: ValueType::Array,
                    }],
                },
            ],
            patterns: vec![PatternDef {
                name: "Move".into(),
                relevant_resource_types: vec![ResourceTypeId(0), ResourceTypeId(0)],
            }],
            decision_points: vec![DecisionPointDef {
                name: "planner".into(),
                kind: DecisionPointKind::Search,
                activities: vec![ActivityDef {
                    name: "move".into(),
                    pattern: PatternId(0),
                }],
            }],
            results: vec![
                ResultDef {
                    name: "label".into(),
                    value_type: ValueType::String,
                },
                ResultDef {
                    name: "busy".into(),
                    value_type: ValueType::Boolean,
                },
            ],
        }
    }

    fn resource_header(kind: ResourceEntryKind, ty: i32, res: i32) -> Vec<u8> {
        let mut header = vec![EntryCategory::Resource.tag()];
        header.extend_from_slice(&2.5f64.to_be_bytes());
        header.push(kind.tag());
        header.extend_from_slice(&ty.to_be_bytes());
        header.extend_from_slice(&res.to_be_bytes());
        header
    }

    #[test]
    fn string_parameter_follows_offset_table() {
        // Inline region: load (4) + busy (1) = 5 bytes, then one table
        // entry, then the string body.
        let mut data = Vec::new();
        data.extend_from_slice(&42i32.to_be_bytes());
        data.push(1);
        data.extend_from_slice(&9i32.to_be_bytes());
        data.extend_from_slice(&3i32.to_be_bytes());
        data.extend_from_slice(b"lat");

        let entry = RawEntry {
            header: resource_header(ResourceEntryKind::Altered, 0, 4),
            data,
        };
        let model = model();
        let record = Record::parse(&entry, &ParseContext::new(&model)).unwrap();
        match record {
            Record::Resource(r) => {
                assert_eq!(r.resource, ResourceId(4));
                assert_eq!(
                    r.parameters,
                    vec![
                        Value::String("lat".into()),
                        Value::Integer(42),
                        Value::Boolean(true),
                    ]
                );
            }
            other => panic!("expected resource record, got {other:?}"),
        }
    }

    #[test]
    fn precomputed_layouts_parse_like_fresh_ones() {
        let mut data = Vec::new();
        data.extend_from_slice(&7i32.to_be_bytes());
        data.push(0);
        data.extend_from_slice(&9i32.to_be_bytes());
        data.extend_from_slice(&2i32.to_be_bytes());
        data.extend_from_slice(b"ab");

        let entry = RawEntry {
            header: resource_header(ResourceEntryKind::Created, 0, 1),
            data,
        };
        let model = model();
        let layouts = ParameterLayouts::for_model(&model);
        let ctx = ParseContext::new(&model).with_layouts(&layouts);
        assert!(ctx.layouts.is_some());

        let cached = Record::parse(&entry, &ctx).unwrap();
        let fresh = Record::parse(&entry, &ParseContext::new(&model)).unwrap();
        assert_eq!(cached, fresh);
    }

    #[test]
    fn empty_data_yields_no_parameters() {
        let entry = RawEntry {
            header: resource_header(ResourceEntryKind::Erased, 0, 0),
            data: vec![],
        };
        let model = model();
        match Record::parse(&entry, &ParseContext::new(&model)).unwrap() {
            Record::Resource(r) => assert!(r.parameters.is_empty()),
            other => panic!("expected resource record, got {other:?}"),
        }
    }

    #[test]
    fn array_parameter_is_unsupported() {
        let entry = RawEntry {
            header: resource_header(ResourceEntryKind::Created, 1, 0),
            data: vec![0; 8],
        };
        let model = model();
        assert!(matches!(
            Record::parse(&entry, &ParseContext::new(&model)),
            Err(LogError::UnsupportedValueType {
                value_type: ValueType::Array
            })
        ));
    }

    #[test]
    fn unknown_resource_type_is_model_error() {
        let entry = RawEntry {
            header: resource_header(ResourceEntryKind::Created, 7, 0),
            data: vec![],
        };
        let model = model();
        assert!(matches!(
            Record::parse(&entry, &ParseContext::new(&model)),
            Err(LogError::Model(_))
        ));
    }

    #[test]
    fn string_offset_out_of_block_is_malformed() {
        let mut data = vec![0u8; 5];
        data.extend_from_slice(&1000i32.to_be_bytes());
        let entry = RawEntry {
            header: resource_header(ResourceEntryKind::Altered, 0, 0),
            data,
        };
        let model = model();
        assert!(matches!(
            Record::parse(&entry, &ParseContext::new(&model)),
            Err(LogError::MalformedEntry { .. })
        ));
    }

    #[test]
    fn unknown_resource_subtype_rejected() {
        let mut header = resource_header(ResourceEntryKind::Created, 0, 0);
        header[9] = 17;
        let entry = RawEntry {
            header,
            data: vec![],
        };
        let model = model();
        assert!(matches!(
            Record::parse(&entry, &ParseContext::new(&model)),
            Err(LogError::UnknownSubtype {
                kind: "resource entry",
                tag: 17
            })
        ));
    }

    fn spawn() -> Record {
        Record::Search(SearchRecord::Spawn {
            status: SpawnStatus::Better,
            child: 3,
            parent: 1,
            g: 2.0,
            h: 0.5,
            activity: ActivityId(0),
            rule_cost: 1.0,
            resources: smallvec![ResourceId(0), ResourceId(5)],
        })
    }

    #[test]
    fn spawn_needs_active_search() {
        let model = model();
        let entry = spawn().encode(&model).unwrap();
        assert!(matches!(
            Record::parse(&entry, &ParseContext::new(&model)),
            Err(LogError::SpawnOutsideSearch)
        ));
    }

    #[test]
    fn spawn_resource_count_comes_from_pattern() {
        let model = model();
        let entry = spawn().encode(&model).unwrap();
        // Two relevant resources, no count on the wire.
        assert_eq!(entry.data.len(), 1 + 4 + 4 + 8 + 8 + 4 + 8 + 2 * 4);
        let ctx = ParseContext::new(&model).with_active_search(DecisionPointId(0));
        assert_eq!(Record::parse(&entry, &ctx).unwrap(), spawn());
    }

    #[test]
    fn search_header_carries_no_time() {
        let model = model();
        let begin = Record::Search(SearchRecord::Begin {
            time: 4.0,
            decision_point: DecisionPointId(0),
        });
        let entry = begin.encode(&model).unwrap();
        assert_eq!(entry.header, vec![EntryCategory::Search.tag(), 0]);
        assert_eq!(entry.data.len(), 16);
        assert_eq!(begin.time(), Some(4.0));
    }

    #[test]
    fn relevant_resource_count_larger_than_data_is_malformed() {
        let mut header = vec![EntryCategory::Pattern.tag()];
        header.extend_from_slice(&0f64.to_be_bytes());
        header.push(PatternEntryKind::Event.tag());
        let mut data = Vec::new();
        data.extend_from_slice(&0i32.to_be_bytes());
        data.extend_from_slice(&0i32.to_be_bytes());
        data.extend_from_slice(&1_000_000i32.to_be_bytes());
        let entry = RawEntry { header, data };
        let model = model();
        assert!(matches!(
            Record::parse(&entry, &ParseContext::new(&model)),
            Err(LogError::MalformedEntry { .. })
        ));
    }

    #[test]
    fn result_string_reads_to_end_of_data() {
        let model = model();
        let mut header = vec![EntryCategory::Result.tag()];
        header.extend_from_slice(&1f64.to_be_bytes());
        header.extend_from_slice(&0i32.to_be_bytes());
        let entry = RawEntry {
            header,
            data: b"done here".to_vec(),
        };
        match Record::parse(&entry, &ParseContext::new(&model)).unwrap() {
            Record::Result(r) => assert_eq!(r.value, Value::String("done here".into())),
            other => panic!("expected result record, got {other:?}"),
        }
    }

    #[test]
    fn encode_rejects_mistyped_result() {
        let model = model();
        let record = Record::Result(ResultRecord {
            time: 0.0,
            result: ResultId(1),
            value: Value::Integer(1),
        });
        assert!(matches!(
            record.encode(&model),
            Err(LogError::ValueTypeMismatch {
                expected: ValueType::Boolean,
                found: ValueType::Integer
            })
        ));
    }

    #[test]
    fn encode_rejects_short_parameter_list() {
        let model = model();
        let record = Record::Resource(ResourceRecord {
            time: 0.0,
            kind: ResourceEntryKind::Created,
            resource_type: ResourceTypeId(0),
            resource: ResourceId(0),
            parameters: vec![Value::String("x".into())],
        });
        assert!(matches!(
            record.encode(&model),
            Err(LogError::MalformedEntry { .. })
        ));
    }

    proptest! {
        #[test]
        fn machine_parameters_survive_encoding(
            label in "[a-zA-Z0-9 ]{0,24}",
            load in any::<i32>(),
            busy in any::<bool>(),
        ) {
            let model = model();
            let record = Record::Resource(ResourceRecord {
                time: 1.0,
                kind: ResourceEntryKind::Created,
                resource_type: ResourceTypeId(0),
                resource: ResourceId(2),
                parameters: vec![
                    Value::String(label),
                    Value::Integer(load),
                    Value::Boolean(busy),
                ],
            });
            let entry = record.encode(&model).unwrap();
            let got = Record::parse(&entry, &ParseContext::new(&model)).unwrap();
            prop_assert_eq!(got, record);
        }
    }
}
