//! Byte layout of a resource parameter block.
//!
//! Inline parameters are packed in declaration order. String parameters
//! take no room in that sequence; instead, an offset table with one `i32`
//! per string follows the inline region, each entry pointing at a
//! `len i32 + bytes` body elsewhere in the block.
//!
//! ```text
//! [inline params...] [string offset table] [string bodies...]
//! ```

use crate::id::ResourceTypeId;
use crate::structure::{ModelStructure, ParameterDef};
use crate::value::ValueType;

/// Width of one string offset table entry.
pub const OFFSET_ENTRY_SIZE: usize = 4;

/// Where a single parameter lives inside the block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParameterSlot {
    /// Stored inline at a fixed offset.
    Inline {
        /// Offset from the start of the block.
        offset: usize,
        /// Width in bytes.
        size: usize,
    },
    /// Stored indirectly through the string offset table.
    Indirect {
        /// Offset of this string's entry in the offset table.
        table_offset: usize,
    },
    /// No wire representation (array parameters).
    Unsupported,
}

/// Precomputed positions for every parameter of one resource type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterLayout {
    slots: Vec<ParameterSlot>,
    fixed_len: usize,
    string_count: usize,
}

impl ParameterLayout {
    /// Compute the layout for a parameter list in declaration order.
    pub fn for_parameters(parameters: &[ParameterDef]) -> Self {
        let fixed_len: usize = parameters
            .iter()
            .filter_map(|p| p.value_type.fixed_size())
            .sum();

        let mut slots = Vec::with_capacity(parameters.len());
        let mut offset = 0;
        let mut string_count = 0;
        for param in parameters {
            let slot = match param.value_type {
                ValueType::String => {
                    let table_offset = fixed_len + string_count * OFFSET_ENTRY_SIZE;
                    string_count += 1;
                    ParameterSlot::Indirect { table_offset }
                }
                ValueType::Array => ParameterSlot::Unsupported,
                inline => {
                    // fixed_size() is Some for every remaining type.
                    let size = inline.fixed_size().unwrap_or(0);
                    let slot = ParameterSlot::Inline { offset, size };
                    offset += size;
                    slot
                }
            };
            slots.push(slot);
        }

        Self {
            slots,
            fixed_len,
            string_count,
        }
    }

    /// One slot per declared parameter, in declaration order.
    pub fn slots(&self) -> &[ParameterSlot] {
        &self.slots
    }

    /// Total width of the inline region.
    pub fn fixed_len(&self) -> usize {
        self.fixed_len
    }

    /// Number of string parameters.
    pub fn string_count(&self) -> usize {
        self.string_count
    }

    /// Offset at which string bodies may start (inline region + offset table).
    pub fn bodies_offset(&self) -> usize {
        self.fixed_len + self.string_count * OFFSET_ENTRY_SIZE
    }
}

/// The parameter layout of every resource type of a model, computed once.
///
/// Indexed like [`ModelStructure::resource_types`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParameterLayouts {
    layouts: Vec<ParameterLayout>,
}

impl ParameterLayouts {
    /// Compute the layouts of all of `model`'s resource types.
    pub fn for_model(model: &ModelStructure) -> Self {
        Self {
            layouts: model.resource_types.iter().map(|t| t.layout()).collect(),
        }
    }

    /// Layout of `resource_type`, if the model declares it.
    pub fn get(&self, resource_type: ResourceTypeId) -> Option<&ParameterLayout> {
        self.layouts.get(resource_type.index())
    }

    /// Number of resource types covered.
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    /// Whether the model declares no resource types.
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn param(value_type: ValueType) -> ParameterDef {
        ParameterDef {
            name: format!("{value_type}"),
            value_type,
        }
    }

    #[test]
    fn inline_params_pack_in_order() {
        let layout = ParameterLayout::for_parameters(&[
            param(ValueType::Integer),
            param(ValueType::Real),
            param(ValueType::Boolean),
            param(ValueType::Enum),
        ]);
        assert_eq!(
            layout.slots(),
            &[
                ParameterSlot::Inline { offset: 0, size: 4 },
                ParameterSlot::Inline { offset: 4, size: 8 },
                ParameterSlot::Inline { offset: 12, size: 1 },
                ParameterSlot::Inline { offset: 13, size: 2 },
            ]
        );
        assert_eq!(layout.fixed_len(), 15);
        assert_eq!(layout.bodies_offset(), 15);
    }

    #[test]
    fn strings_index_table_after_inline_region() {
        let layout = ParameterLayout::for_parameters(&[
            param(ValueType::String),
            param(ValueType::Integer),
            param(ValueType::String),
            param(ValueType::Real),
        ]);
        assert_eq!(
            layout.slots(),
            &[
                ParameterSlot::Indirect { table_offset: 12 },
                ParameterSlot::Inline { offset: 0, size: 4 },
                ParameterSlot::Indirect { table_offset: 16 },
                ParameterSlot::Inline { offset: 4, size: 8 },
            ]
        );
        assert_eq!(layout.string_count(), 2);
        assert_eq!(layout.bodies_offset(), 20);
    }

    fn arb_value_type() -> impl Strategy<Value = ValueType> {
        prop_oneof![
            Just(ValueType::Integer),
            Just(ValueType::Real),
            Just(ValueType::Boolean),
            Just(ValueType::Enum),
            Just(ValueType::String),
        ]
    }

    proptest! {
        #[test]
        fn slots_never_overlap(types in prop::collection::vec(arb_value_type(), 0..16)) {
            let params: Vec<_> = types.into_iter().map(param).collect();
            let layout = ParameterLayout::for_parameters(&params);

            let mut next_inline = 0;
            let mut next_entry = layout.fixed_len();
            for slot in layout.slots() {
                match *slot {
                    ParameterSlot::Inline { offset, size } => {
                        prop_assert_eq!(offset, next_inline);
                        next_inline += size;
                    }
                    ParameterSlot::Indirect { table_offset } => {
                        prop_assert_eq!(table_offset, next_entry);
                        next_entry += OFFSET_ENTRY_SIZE;
                    }
                    ParameterSlot::Unsupported => unreachable!(),
                }
            }
            prop_assert_eq!(next_inline, layout.fixed_len());
            prop_assert_eq!(next_entry, layout.bodies_offset());
        }
    }

    #[test]
    fn model_layouts_match_per_type_layouts() {
        use crate::structure::ResourceTypeDef;

        let model = ModelStructure {
            resource_types: vec![
                ResourceTypeDef {
                    name: "Client".into(),
                    parameters: vec![param(ValueType::String), param(ValueType::Integer)],
                },
                ResourceTypeDef {
                    name: "Desk".into(),
                    parameters: vec![param(ValueType::Real)],
                },
            ],
            ..ModelStructure::default()
        };
        let layouts = ParameterLayouts::for_model(&model);
        assert_eq!(layouts.len(), 2);
        for (i, def) in model.resource_types.iter().enumerate() {
            assert_eq!(layouts.get(ResourceTypeId(i as u32)), Some(&def.layout()));
        }
        assert_eq!(layouts.get(ResourceTypeId(2)), None);
        assert!(ParameterLayouts::for_model(&ModelStructure::default()).is_empty());
    }

    #[test]
    fn arrays_take_no_space() {
        let layout =
            ParameterLayout::for_parameters(&[param(ValueType::Array), param(ValueType::Integer)]);
        assert_eq!(layout.slots()[0], ParameterSlot::Unsupported);
        assert_eq!(layout.slots()[1], ParameterSlot::Inline { offset: 0, size: 4 });
    }
}
