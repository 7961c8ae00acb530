//! Legacy action slots.
//!
//! Every `(decision point, activity)` pair of a `some` or `prior` decision
//! point owns a container mapping engine action numbers to legacy slots.
//! Freed slots go to one pool shared by all containers and are reused
//! lowest first; when the pool is empty a container hands out its own
//! current size.
//!
//! The shared pool combined with per-container fresh numbering can give
//! two running actions of one container the same slot. The legacy tool
//! behaves this way and its consumers expect it.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use indexmap::IndexMap;
use simtrace_model::{ActivityId, DecisionPointId, ModelStructure};

use crate::error::TraceError;

type ContainerKey = (DecisionPointId, ActivityId);

/// Maps running operations to legacy action slots.
#[derive(Clone, Debug, Default)]
pub struct ActionSlotAllocator {
    containers: IndexMap<ContainerKey, IndexMap<u32, u32>>,
    vacant: BinaryHeap<Reverse<u32>>,
}

impl ActionSlotAllocator {
    /// One empty container per activity of every decision point that
    /// tracks operations.
    pub fn for_model(model: &ModelStructure) -> Self {
        let mut containers = IndexMap::new();
        for (dpt, def) in model.decision_points.iter().enumerate() {
            if !def.kind.tracks_actions() {
                continue;
            }
            for activity in 0..def.activities.len() {
                containers.insert(
                    (DecisionPointId(dpt as u32), ActivityId(activity as u32)),
                    IndexMap::new(),
                );
            }
        }
        Self {
            containers,
            vacant: BinaryHeap::new(),
        }
    }

    /// Give `action` a slot, zero-based.
    pub fn assign(
        &mut self,
        decision_point: DecisionPointId,
        activity: ActivityId,
        action: u32,
    ) -> Result<u32, TraceError> {
        let container = self
            .containers
            .get_mut(&(decision_point, activity))
            .ok_or(TraceError::MissingActionContainer {
                decision_point,
                activity,
            })?;
        let slot = match self.vacant.pop() {
            Some(Reverse(slot)) => slot,
            None => container.len() as u32,
        };
        container.insert(action, slot);
        Ok(slot)
    }

    /// Free the slot held by `action` and return it.
    pub fn release(
        &mut self,
        decision_point: DecisionPointId,
        activity: ActivityId,
        action: u32,
    ) -> Result<u32, TraceError> {
        let container = self
            .containers
            .get_mut(&(decision_point, activity))
            .ok_or(TraceError::MissingActionContainer {
                decision_point,
                activity,
            })?;
        let slot = container
            .shift_remove(&action)
            .ok_or(TraceError::MissingAction {
                decision_point,
                activity,
                action,
            })?;
        self.vacant.push(Reverse(slot));
        Ok(slot)
    }

    /// Number of containers.
    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    /// Number of running actions across all containers.
    pub fn running(&self) -> usize {
        self.containers.values().map(IndexMap::len).sum()
    }

    /// Number of slots waiting in the shared pool.
    pub fn vacant_count(&self) -> usize {
        self.vacant.len()
    }
}
