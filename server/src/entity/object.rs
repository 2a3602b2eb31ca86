//! The placed-entity shared header (spec.md §4.4, design note: "Type-tagged
//! entity hierarchy ... model as a tagged union with a shared header (guid,
//! map, location, field array). Kind-specific fields live in the tail").

use core::types::{Guid, MapId, MovementFlags, Vector3};

use crate::cell::CellKey;
use crate::entity::gameobject::GameObjectData;
use crate::entity::player::PlayerData;
use crate::entity::unit::UnitData;
use crate::packet::{destroy_object_packet, MiscBlock, MovementBlock};
use crate::update_field::{fields, EntityKind, UpdateFieldArray};

/// Movement parameters shared by every placed kind (spec.md §3 "Entity").
#[derive(Debug, Clone, Copy)]
pub struct MovementParams {
    pub walk_speed: f32,
    pub run_speed: f32,
    pub swim_speed: f32,
    pub turn_rate: f32,
    pub movement_flags: MovementFlags,
    pub transport_guid: u64,
    pub transport: Vector3,
    pub pitch: f32,
}

impl Default for MovementParams {
    fn default() -> Self {
        use core::constants::*;
        MovementParams {
            walk_speed: DEFAULT_WALK_SPEED,
            run_speed: DEFAULT_RUN_SPEED,
            swim_speed: DEFAULT_SWIM_SPEED,
            turn_rate: DEFAULT_TURN_RATE,
            movement_flags: MovementFlags::empty(),
            transport_guid: 0,
            transport: Vector3::ZERO,
            pitch: 0.0,
        }
    }
}

/// Kind-specific tail data (spec.md §4.4: each kind is "a strict superset of
/// its parent's field layout"). Only the three cell-placed kinds live here —
/// items and containers (§4.4's inventory-only kinds) are modeled separately
/// in [`crate::entity::item`] / [`crate::entity::container`].
#[derive(Debug)]
pub enum EntityVariant {
    Unit(UnitData),
    Player(PlayerData),
    GameObject(GameObjectData),
}

impl EntityVariant {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityVariant::Unit(_) => EntityKind::Unit,
            EntityVariant::Player(_) => EntityKind::Player,
            EntityVariant::GameObject(_) => EntityKind::GameObject,
        }
    }

    pub fn type_id(&self) -> u8 {
        match self {
            EntityVariant::Unit(_) => 1,
            EntityVariant::Player(_) => 2,
            EntityVariant::GameObject(_) => 3,
        }
    }
}

/// A placed world entity: shared header plus a kind-tagged tail.
#[derive(Debug)]
pub struct Entity {
    pub guid: Guid,
    pub map_id: MapId,
    pub location: Vector3,
    pub movement: MovementParams,
    pub bounding_radius: f32,
    pub fields: UpdateFieldArray,
    pub current_cell: Option<CellKey>,
    pub variant: EntityVariant,
}

impl Entity {
    pub fn new(guid: Guid, map_id: MapId, location: Vector3, variant: EntityVariant) -> Self {
        let kind = variant.kind();
        let mut fields = UpdateFieldArray::new(kind);
        fields.set_uint64(fields::OBJECT_FIELD_GUID, guid.raw());
        fields.set_float(fields::OBJECT_FIELD_SCALE_X, 1.0);
        Entity {
            guid,
            map_id,
            location,
            movement: MovementParams::default(),
            bounding_radius: core::constants::DEFAULT_BOUNDING_RADIUS,
            fields,
            current_cell: None,
            variant,
        }
    }

    /// Invoked by [`crate::grid_manager::GridManager::update_object`] after a
    /// cell transition (spec.md §4.4 state machine). No kind currently
    /// overrides this; AI wake-up is driven by the active-cell callback, not
    /// by the transition itself.
    pub fn on_cell_change(&mut self) {}

    pub fn destroy_packet(&self) -> Vec<u8> {
        destroy_object_packet(self.guid)
    }

    pub fn movement_block(&self) -> MovementBlock {
        MovementBlock {
            transport_guid: self.movement.transport_guid,
            transport: self.movement.transport,
            location: self.location,
            pitch: self.movement.pitch,
            movement_flags: self.movement.movement_flags,
            walk_speed: self.movement.walk_speed,
            run_speed: self.movement.run_speed,
            swim_speed: self.movement.swim_speed,
            turn_rate: self.movement.turn_rate,
        }
    }

    pub fn misc_block(&self, is_self: bool) -> MiscBlock {
        let (attack_cycle, victim_guid) = match &self.variant {
            EntityVariant::Unit(data) => (data.combat_target.is_some(), data.combat_target.map_or(0, |g| g.raw())),
            _ => (false, 0),
        };
        MiscBlock { is_self, attack_cycle, victim_guid }
    }

    /// Per-tick hook for creatures/gameobjects (spec.md §4.2 `tick_creatures`
    /// / `tick_gameobjects`). Players are never ticked this way — their
    /// state changes only through handler-driven mutation.
    pub fn tick(&mut self) {
        match &mut self.variant {
            EntityVariant::Unit(data) => data.tick_count = data.tick_count.wrapping_add(1),
            EntityVariant::GameObject(data) => data.tick_count = data.tick_count.wrapping_add(1),
            EntityVariant::Player(_) => {}
        }
    }
}
