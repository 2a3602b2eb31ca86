//! S4 end-to-end: an entity's field writes flow through to the exact wire
//! bytes a handler would send, not just the encoder in isolation.

use core::types::{Guid, HighGuid, Vector3};

use server::entity::{Entity, EntityVariant, UnitData};
use server::packet::{partial_update_packet, UpdateType};
use server::update_field::fields;

#[test]
fn s4_partial_update_packet_carries_only_the_written_fields() {
    let guid = Guid::tagged(HighGuid::Unit, 5);
    let mut entity = Entity::new(guid, 0, Vector3::new(0.0, 0.0, 0.0, 0.0), EntityVariant::Unit(UnitData::default()));

    entity.fields.reset(); // drop the GUID/scale writes `Entity::new` made
    entity.fields.set_uint32(fields::UNIT_FIELD_FLAGS, 5);
    entity.fields.set_float(fields::OBJECT_FIELD_SCALE_X, 1.0);

    let packet = partial_update_packet(guid, &entity.fields);
    assert_eq!(&packet[0..4], &1u32.to_le_bytes());
    assert_eq!(packet[4], UpdateType::Partial as u8);
    assert_eq!(&packet[5..13], &guid.raw().to_le_bytes());

    let decoded = server::update_field::decode_field_delta(&packet[13..]);
    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded[0].0, fields::OBJECT_FIELD_SCALE_X);
    assert_eq!(f32::from_bits(decoded[0].1), 1.0);
    assert_eq!(decoded[1].0, fields::UNIT_FIELD_FLAGS);
    assert_eq!(decoded[1].1, 5);

    entity.fields.reset();
    assert!(!entity.fields.is_set(fields::UNIT_FIELD_FLAGS));
    assert_eq!(entity.fields.get_uint32(fields::UNIT_FIELD_FLAGS), 5);
    assert_eq!(entity.fields.get_float(fields::OBJECT_FIELD_SCALE_X), 1.0);
}
