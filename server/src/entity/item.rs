//! Item entity: an inventory-held field-array kind. Items are never placed
//! in a cell (spec.md §3 lists Cell's buckets as players/units/gameobjects
//! only); they live in a character's inventory and are addressed by guid.

use core::types::Guid;

use crate::update_field::{fields, EntityKind, UpdateFieldArray};

#[derive(Debug)]
pub struct ItemEntity {
    pub guid: Guid,
    pub template_entry: u32,
    pub owner_guid: Guid,
    pub stack_count: u32,
    pub fields: UpdateFieldArray,
}

impl ItemEntity {
    pub fn new(guid: Guid, template_entry: u32, owner_guid: Guid) -> Self {
        let mut fields = UpdateFieldArray::new(EntityKind::Item);
        fields.set_uint64(fields::OBJECT_FIELD_GUID, guid.raw());
        fields.set_uint64(fields::ITEM_FIELD_OWNER, owner_guid.raw());
        fields.set_uint32(fields::ITEM_FIELD_STACK_COUNT, 1);
        ItemEntity { guid, template_entry, owner_guid, stack_count: 1, fields }
    }

    pub fn set_stack_count(&mut self, count: u32) {
        self.stack_count = count;
        self.fields.set_uint32(fields::ITEM_FIELD_STACK_COUNT, count);
    }
}
