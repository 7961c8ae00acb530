//! Rendering of typed records as legacy trace lines.
//!
//! [`Decoder`] owns every piece of state a line can depend on: both id
//! allocators, the search tracker, and the one-shot "simulation started"
//! flag. Each record renders to exactly one line; the bracketing lines of
//! search episodes are produced by the tracker, not here.

use simtrace_log::{
    LogError, ParseContext, PatternRecord, Record, ResourceEntryKind, ResourceRecord,
    ResultRecord, SearchRecord, SpawnStatus, StopCode, SystemEntryKind, SystemRecord,
};
use simtrace_model::{ModelStructure, ParameterLayouts, PatternId, ResourceTypeId, Value};

use crate::action_ids::ActionSlotAllocator;
use crate::error::TraceError;
use crate::format::format_bool;
use crate::line::{Fields, TraceLine, TraceType};
use crate::resource_ids::ResourceIdAllocator;
use crate::search::SearchTracker;

/// Per-run rendering state.
#[derive(Clone, Debug)]
pub struct Decoder<'m> {
    model: &'m ModelStructure,
    layouts: ParameterLayouts,
    resources: ResourceIdAllocator,
    actions: ActionSlotAllocator,
    search: SearchTracker,
    simulation_started: bool,
}

impl<'m> Decoder<'m> {
    /// Fresh state for one run of `model`.
    pub fn new(model: &'m ModelStructure, simulation_started: bool) -> Self {
        Self {
            model,
            layouts: ParameterLayouts::for_model(model),
            resources: ResourceIdAllocator::new(),
            actions: ActionSlotAllocator::for_model(model),
            search: SearchTracker::new(),
            simulation_started,
        }
    }

    /// The model being traced.
    pub fn model(&self) -> &'m ModelStructure {
        self.model
    }

    /// Parameter layouts of every resource type, computed once per run.
    pub fn layouts(&self) -> &ParameterLayouts {
        &self.layouts
    }

    /// Context for parsing the next entry.
    pub fn parse_context(&self) -> ParseContext<'_> {
        let ctx = ParseContext::new(self.model).with_layouts(&self.layouts);
        match self.search.active() {
            Some(dpt) => ctx.with_active_search(dpt),
            None => ctx,
        }
    }

    /// Whether SIM_START has been seen.
    pub fn simulation_started(&self) -> bool {
        self.simulation_started
    }

    /// Resource id state.
    pub fn resources(&self) -> &ResourceIdAllocator {
        &self.resources
    }

    /// Action slot state.
    pub fn actions(&self) -> &ActionSlotAllocator {
        &self.actions
    }

    /// Search bracketing state.
    pub fn search(&self) -> &SearchTracker {
        &self.search
    }

    pub(crate) fn search_mut(&mut self) -> &mut SearchTracker {
        &mut self.search
    }

    /// Render one record, updating state.
    pub fn render(&mut self, record: &Record) -> Result<TraceLine, TraceError> {
        match record {
            Record::System(r) => Ok(self.render_system(r)),
            Record::Resource(r) => self.render_resource(r),
            Record::Pattern(r) => self.render_pattern(r),
            Record::Search(r) => self.render_search(r),
            Record::Result(r) => Ok(render_result(r)),
        }
    }

    fn render_system(&mut self, record: &SystemRecord) -> TraceLine {
        let code = match record.kind {
            SystemEntryKind::TraceStart => 1,
            SystemEntryKind::SimStart => {
                self.simulation_started = true;
                3
            }
            SystemEntryKind::NormalTermination
            | SystemEntryKind::NoMoreEvents
            | SystemEntryKind::Abort
            | SystemEntryKind::RunTimeError => 2,
        };
        let mut fields = Fields::tagged(TraceType::System);
        fields.real(record.time).push(code);
        fields.finish(TraceType::System)
    }

    fn render_resource(&mut self, record: &ResourceRecord) -> Result<TraceLine, TraceError> {
        let ty = record.resource_type;
        let res = record.resource;
        let (trace_type, id) = match record.kind {
            ResourceEntryKind::Created => {
                let trace_type = if self.simulation_started {
                    TraceType::ResourceCreate
                } else {
                    TraceType::ResourceKeep
                };
                (trace_type, self.resources.assign(ty, res))
            }
            ResourceEntryKind::Erased => (TraceType::ResourceErase, self.resources.release(ty, res)?),
            ResourceEntryKind::Altered => (TraceType::ResourceKeep, self.resources.lookup(ty, res)?),
            ResourceEntryKind::Search | ResourceEntryKind::Solution => (
                TraceType::SearchResourceKeep,
                self.resources.lookup(ty, res)?,
            ),
        };

        let mut fields = Fields::tagged(trace_type);
        fields.real(record.time).push(ty.one_based()).push(id);
        for value in &record.parameters {
            push_value(&mut fields, value);
        }
        Ok(fields.finish(trace_type))
    }

    fn render_pattern(&mut self, record: &PatternRecord) -> Result<TraceLine, TraceError> {
        let (trace_type, mut fields, pattern) = match record {
            PatternRecord::Event { time, pattern, .. } => {
                let mut fields = Fields::tagged(TraceType::Event);
                fields
                    .real(*time)
                    .push(pattern.one_based())
                    .push(pattern.one_based());
                (TraceType::Event, fields, *pattern)
            }
            PatternRecord::Rule { time, activity, .. } => {
                let pattern = self
                    .model
                    .activity_pattern(activity.decision_point, activity.activity)?;
                let mut fields = Fields::tagged(TraceType::Rule);
                fields
                    .real(*time)
                    .push(1)
                    .push(activity.activity.one_based())
                    .push(pattern.one_based());
                (TraceType::Rule, fields, pattern)
            }
            PatternRecord::OperationBegin {
                time,
                activity,
                action,
                ..
            }
            | PatternRecord::OperationEnd {
                time,
                activity,
                action,
                ..
            } => {
                let begin = matches!(record, PatternRecord::OperationBegin { .. });
                let trace_type = if begin {
                    TraceType::OperationBegin
                } else {
                    TraceType::OperationEnd
                };
                let slot = if begin {
                    self.actions
                        .assign(activity.decision_point, activity.activity, *action)?
                } else {
                    self.actions
                        .release(activity.decision_point, activity.activity, *action)?
                };
                let pattern = self
                    .model
                    .activity_pattern(activity.decision_point, activity.activity)?;
                let mut fields = Fields::tagged(trace_type);
                fields
                    .real(*time)
                    .push(u64::from(slot) + 1)
                    .push(activity.activity.one_based())
                    .push(pattern.one_based());
                (trace_type, fields, pattern)
            }
        };

        let resources = record.resources();
        let types = self.relevant_types(pattern, resources.len())?;
        fields.push(resources.len()).gap();
        for (&ty, &res) in types.iter().zip(resources) {
            fields.push(self.resources.assign(ty, res));
        }
        Ok(fields.finish(trace_type))
    }

    fn render_search(&mut self, record: &SearchRecord) -> Result<TraceLine, TraceError> {
        let line = match record {
            SearchRecord::Begin {
                time,
                decision_point,
            } => {
                tracing::debug!(decision_point = %decision_point, time, "search episode began");
                self.search.begin(*decision_point);
                let mut fields = Fields::tagged(TraceType::SearchBegin);
                fields.real(*time).push(decision_point.one_based());
                fields.finish(TraceType::SearchBegin)
            }
            SearchRecord::End { stop, time, stats } => {
                tracing::debug!(?stop, time, nodes = stats.nodes, "search episode ended");
                self.search.end(*time);
                let trace_type = match stop {
                    StopCode::Aborted => TraceType::SearchEndAborted,
                    StopCode::Condition => TraceType::SearchEndCondition,
                    StopCode::Success => TraceType::SearchEndSuccess,
                    StopCode::Fail => TraceType::SearchEndFail,
                };
                let mut fields = Fields::tagged(trace_type);
                fields
                    .real(*time)
                    .push(stats.elapsed_ms)
                    .push(stats.memory)
                    .real(stats.final_cost)
                    .push(stats.opened)
                    .push(stats.nodes)
                    .push(stats.added)
                    .push(stats.spawned);
                fields.finish(trace_type)
            }
            SearchRecord::Open { node, parent, g, h } => {
                let mut fields = Fields::new("SO");
                fields
                    .push(i64::from(*node) + 1)
                    .push(i64::from(*parent) + 1)
                    .real(*g)
                    .real(g + h);
                fields.finish(TraceType::SearchOpen)
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
                let decision_point = self.search.active().ok_or(LogError::SpawnOutsideSearch)?;
                let pattern = self.model.activity_pattern(decision_point, *activity)?;
                let types = self.relevant_types(pattern, resources.len())?;
                let trace_type = match status {
                    SpawnStatus::New => TraceType::SearchSpawnNew,
                    SpawnStatus::Worse => TraceType::SearchSpawnWorse,
                    SpawnStatus::Better => TraceType::SearchSpawnBetter,
                };
                let mut fields = Fields::tagged(trace_type);
                fields
                    .push(i64::from(*child) + 1)
                    .push(i64::from(*parent) + 1)
                    .real(*g)
                    .real(g + h)
                    .push(activity.one_based())
                    .push(pattern.one_based())
                    .real(*rule_cost)
                    .push(resources.len())
                    .gap();
                for (&ty, &res) in types.iter().zip(resources) {
                    fields.push(self.resources.lookup(ty, res)?);
                }
                fields.finish(trace_type)
            }
            SearchRecord::Decision { node, activity } => {
                let mut fields = Fields::new("SD");
                fields.push(node).push(activity);
                fields.finish(TraceType::SearchDecision)
            }
        };
        Ok(line)
    }

    /// Relevant resource types of `pattern`, checked to cover `count` resources.
    fn relevant_types(
        &self,
        pattern: PatternId,
        count: usize,
    ) -> Result<&'m [ResourceTypeId], TraceError> {
        let types = self.model.relevant_resource_types(pattern)?;
        if count > types.len() {
            return Err(LogError::MalformedEntry {
                detail: format!(
                    "pattern {pattern} has {} relevant resource types, entry lists {count} resources",
                    types.len()
                ),
            }
            .into());
        }
        Ok(types)
    }
}

fn render_result(record: &ResultRecord) -> TraceLine {
    let mut fields = Fields::tagged(TraceType::Result);
    fields.real(record.time).push(record.result.one_based()).gap();
    push_value(&mut fields, &record.value);
    fields.finish(TraceType::Result)
}

fn push_value(fields: &mut Fields, value: &Value) {
    match value {
        Value::Integer(v) => fields.push(v),
        Value::Real(v) => fields.real(*v),
        Value::Boolean(v) => fields.push(format_bool(*v)),
        Value::Enum(v) => fields.push(v),
        Value::String(v) => fields.push(v),
    };
}

