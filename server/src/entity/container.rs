//! Container entity: a bag of item slots, itself an inventory item.

use core::types::Guid;

use crate::entity::item::ItemEntity;
use crate::update_field::{fields, EntityKind, UpdateFieldArray};

#[derive(Debug)]
pub struct ContainerEntity {
    pub guid: Guid,
    pub owner_guid: Guid,
    pub slots: Vec<Option<Guid>>,
    pub fields: UpdateFieldArray,
}

impl ContainerEntity {
    pub fn new(guid: Guid, owner_guid: Guid, slot_count: usize) -> Self {
        let mut fields = UpdateFieldArray::new(EntityKind::Container);
        fields.set_uint64(fields::OBJECT_FIELD_GUID, guid.raw());
        fields.set_uint32(fields::CONTAINER_FIELD_SLOT_COUNT, slot_count as u32);
        ContainerEntity { guid, owner_guid, slots: vec![None; slot_count], fields }
    }

    pub fn place(&mut self, slot: usize, item: &ItemEntity) -> Result<(), crate::error::WorldError> {
        let dest = self.slots.get_mut(slot).ok_or(crate::error::WorldError::NotFound)?;
        *dest = Some(item.guid);
        Ok(())
    }

    pub fn take(&mut self, slot: usize) -> Option<Guid> {
        self.slots.get_mut(slot).and_then(|s| s.take())
    }
}
