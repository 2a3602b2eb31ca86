//! Wire packet assembly (spec.md §4.4, §6). Grounded on
//! `ObjectManager.py`'s `_get_base_structure`/`_get_movement_fields`/
//! `get_object_create_packet`/`get_destroy_packet` and the quest-broker
//! opcodes in §6.

use core::types::{Guid, MovementFlags, Vector3};
use core::{push_length_prefixed_string, write_f32, write_u32, write_u64, write_u8};

use crate::update_field::UpdateFieldArray;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateType {
    CreateObject = 0,
    Movement = 1,
    Partial = 2,
}

/// `{transportGuid:u64, transport.xyz:f32, transport.o:f32, location.xyz:f32,
/// location.o:f32, pitch:f32, movementFlags:u32, fallTime:u32=0,
/// walkSpeed/runSpeed/swimSpeed/turnRate:f32}` (spec.md §4.4).
/// `movement_flags` is carried as [`MovementFlags`] and serialized via
/// `.bits()`.
#[derive(Debug, Clone, Copy)]
pub struct MovementBlock {
    pub transport_guid: u64,
    pub transport: Vector3,
    pub location: Vector3,
    pub pitch: f32,
    pub movement_flags: MovementFlags,
    pub walk_speed: f32,
    pub run_speed: f32,
    pub swim_speed: f32,
    pub turn_rate: f32,
}

impl MovementBlock {
    fn write(&self, buf: &mut Vec<u8>) {
        write_u64!(buf, self.transport_guid);
        write_f32!(buf, self.transport.x);
        write_f32!(buf, self.transport.y);
        write_f32!(buf, self.transport.z);
        write_f32!(buf, self.transport.o);
        write_f32!(buf, self.location.x);
        write_f32!(buf, self.location.y);
        write_f32!(buf, self.location.z);
        write_f32!(buf, self.location.o);
        write_f32!(buf, self.pitch);
        write_u32!(buf, self.movement_flags.bits());
        write_u32!(buf, 0u32); // fallTime, always 0
        write_f32!(buf, self.walk_speed);
        write_f32!(buf, self.run_speed);
        write_f32!(buf, self.swim_speed);
        write_f32!(buf, self.turn_rate);
    }
}

fn base_structure(update_type: UpdateType, guid: Guid) -> Vec<u8> {
    let mut buf = Vec::new();
    write_u32!(buf, 1u32); // transactionCount, always 1
    write_u8!(buf, update_type as u8);
    write_u64!(buf, guid.raw());
    buf
}

/// `{isSelfFlag, attackCycle, timerId, victimGuid}` (spec.md §4.4).
#[derive(Debug, Clone, Copy, Default)]
pub struct MiscBlock {
    pub is_self: bool,
    pub attack_cycle: bool,
    pub victim_guid: u64,
}

impl MiscBlock {
    fn write(&self, buf: &mut Vec<u8>) {
        write_u32!(buf, self.is_self as u32);
        write_u32!(buf, self.attack_cycle as u32);
        write_u32!(buf, 0u32); // timerId, unused by the core
        write_u64!(buf, self.victim_guid);
    }
}

/// header, type-id byte, movement block, misc block, full field-delta.
pub fn create_object_packet(
    guid: Guid,
    type_id: u8,
    movement: &MovementBlock,
    misc: &MiscBlock,
    fields: &UpdateFieldArray,
) -> Vec<u8> {
    let mut buf = base_structure(UpdateType::CreateObject, guid);
    write_u8!(buf, type_id);
    movement.write(&mut buf);
    misc.write(&mut buf);
    buf.extend_from_slice(&fields.full_snapshot_bytes());
    buf
}

/// header, movement block only.
pub fn movement_packet(guid: Guid, movement: &MovementBlock) -> Vec<u8> {
    let mut buf = base_structure(UpdateType::Movement, guid);
    movement.write(&mut buf);
    buf
}

/// header, field-delta only.
pub fn partial_update_packet(guid: Guid, fields: &UpdateFieldArray) -> Vec<u8> {
    let mut buf = base_structure(UpdateType::Partial, guid);
    buf.extend_from_slice(&fields.field_delta_bytes());
    buf
}

/// `SMSG_DESTROY_OBJECT`: `{guid:u64}` (spec.md §6).
pub fn destroy_object_packet(guid: Guid) -> Vec<u8> {
    let mut buf = Vec::new();
    write_u64!(buf, guid.raw());
    buf
}

/// `SMSG_QUESTGIVER_STATUS`: `{giverGuid:u64, status:u32}` (spec.md §6).
pub fn questgiver_status_packet(giver_guid: Guid, status: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    write_u64!(buf, giver_guid.raw());
    write_u32!(buf, status);
    buf
}

/// One entry of `SMSG_QUESTGIVER_QUEST_LIST`.
#[derive(Debug, Clone)]
pub struct QuestListEntry {
    pub entry: u32,
    pub state: u32,
    pub level: u32,
    pub title: String,
}

/// `SMSG_QUESTGIVER_QUEST_LIST`: `{giverGuid:u64, message:lp-string,
/// delay:u32=0, emote:u32=0, count:u8, [{entry, state, level, title}]}`
/// (spec.md §6). This is a wire-boundary artifact only — quest selection
/// logic itself is out of scope.
pub fn questgiver_quest_list_packet(
    giver_guid: Guid,
    message: &str,
    quests: &[QuestListEntry],
) -> Vec<u8> {
    let mut buf = Vec::new();
    write_u64!(buf, giver_guid.raw());
    push_length_prefixed_string(&mut buf, message);
    write_u32!(buf, 0u32); // delay
    write_u32!(buf, 0u32); // emote
    write_u8!(buf, quests.len() as u8);
    for q in quests {
        write_u32!(buf, q.entry);
        write_u32!(buf, q.state);
        write_u32!(buf, q.level);
        push_length_prefixed_string(&mut buf, &q.title);
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::types::HighGuid;

    #[test]
    fn partial_packet_header_matches_scenario_s4() {
        let guid = Guid::tagged(HighGuid::Player, 7);
        let mut fields = UpdateFieldArray::new(crate::update_field::EntityKind::Player);
        fields.set_uint32(crate::update_field::fields::UNIT_FIELD_FLAGS, 5);
        fields.set_float(crate::update_field::fields::OBJECT_FIELD_SCALE_X, 1.0);

        let packet = partial_update_packet(guid, &fields);
        // transactionCount (u32=1), updateType (u8=2=PARTIAL), guid (u64)
        assert_eq!(&packet[0..4], &1u32.to_le_bytes());
        assert_eq!(packet[4], UpdateType::Partial as u8);
        assert_eq!(&packet[5..13], &guid.raw().to_le_bytes());
    }

    #[test]
    fn destroy_packet_carries_raw_guid() {
        let guid = Guid::tagged(HighGuid::Unit, 99);
        let packet = destroy_object_packet(guid);
        assert_eq!(packet.len(), 8);
        assert_eq!(&packet[..], &guid.raw().to_le_bytes());
    }
}
