//! Legacy resource ids.
//!
//! The legacy consumer identifies resources by a single dense positive
//! integer. A `(type, instance)` pair holds its id from the first
//! assignment until it is erased; a new assignment always takes the
//! smallest positive id not currently held by any resource of any type.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use simtrace_model::{ResourceId, ResourceTypeId};

use crate::error::TraceError;

type ResourceKey = (ResourceTypeId, ResourceId);

/// Maps `(type, instance)` pairs to reusable legacy ids.
#[derive(Clone, Debug, Default)]
pub struct ResourceIdAllocator {
    ids: IndexMap<ResourceKey, u32>,
    taken: BTreeSet<u32>,
}

impl ResourceIdAllocator {
    /// Empty allocator.
    pub fn new() -> Self {
        Self::default()
    }

    /// The pair's id, assigning the smallest free one if it has none.
    pub fn assign(&mut self, resource_type: ResourceTypeId, resource: ResourceId) -> u32 {
        if let Some(&id) = self.ids.get(&(resource_type, resource)) {
            return id;
        }
        let id = self.smallest_free();
        self.taken.insert(id);
        self.ids.insert((resource_type, resource), id);
        id
    }

    /// The pair's current id.
    pub fn lookup(
        &self,
        resource_type: ResourceTypeId,
        resource: ResourceId,
    ) -> Result<u32, TraceError> {
        self.ids
            .get(&(resource_type, resource))
            .copied()
            .ok_or(TraceError::MissingResourceId {
                resource_type,
                resource,
            })
    }

    /// Drop the pair's mapping and free its id, returning the id.
    pub fn release(
        &mut self,
        resource_type: ResourceTypeId,
        resource: ResourceId,
    ) -> Result<u32, TraceError> {
        let id = self
            .ids
            .shift_remove(&(resource_type, resource))
            .ok_or(TraceError::MissingResourceId {
                resource_type,
                resource,
            })?;
        self.taken.remove(&id);
        Ok(id)
    }

    /// Number of live mappings.
    pub fn live_count(&self) -> usize {
        self.ids.len()
    }

    /// Whether `id` is currently held.
    pub fn is_taken(&self, id: u32) -> bool {
        self.taken.contains(&id)
    }

    /// Live mappings in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceTypeId, ResourceId, u32)> + '_ {
        self.ids.iter().map(|(&(ty, res), &id)| (ty, res, id))
    }

    fn smallest_free(&self) -> u32 {
        let mut candidate = 1;
        for &id in &self.taken {
            if id != candidate {
                break;
            }
            candidate += 1;
        }
        candidate
    }
}
