//! Per-map cell owner and active-cell tracker (spec.md §4.2). Grounded on
//! `GridManager.py`.

use std::collections::{HashMap, HashSet};

use core::types::{Guid, MapId, Vector3};

use crate::cell::{cell_key, BroadcastFilter, Cell, CellKey, EntityHandle};
use crate::update_field::EntityKind;

/// Invoked when a cell transitions to active: the trigger for terrain tile
/// loading and creature AI wake-up (spec.md §4.1, §4.2).
pub trait ActiveCellCallback {
    fn on_cell_active(&mut self, entity: &EntityHandle);
}

pub struct GridManager {
    pub map_id: MapId,
    pub cell_size: f32,
    cells: HashMap<CellKey, Cell>,
    active_cell_keys: HashSet<CellKey>,
    active_cell_callback: Box<dyn ActiveCellCallback>,
}

impl GridManager {
    pub fn new(map_id: MapId, cell_size: f32, active_cell_callback: Box<dyn ActiveCellCallback>) -> Self {
        GridManager {
            map_id,
            cell_size,
            cells: HashMap::new(),
            active_cell_keys: HashSet::new(),
            active_cell_callback,
        }
    }

    fn key_for(&self, location: Vector3) -> CellKey {
        cell_key(location.x, location.y, self.map_id, self.cell_size)
    }

    /// Resolve the cell for `entity`'s current location, materialising it on
    /// first reference; if `store`, place the entity into it (spec.md §4.2
    /// `add_or_get`). Mirrors `Cell.add`'s three extra steps for players:
    /// active-cell callback for self, activating this cell and its 8
    /// neighbours, and waking already-present neighbour creatures.
    pub fn add_or_get(&mut self, entity: &EntityHandle, store: bool) -> CellKey {
        let key = self.key_for(entity.borrow().location);
        self.cells.entry(key).or_insert_with(|| Cell::new(key, self.cell_size));

        if store {
            let is_player = matches!(entity.borrow().variant, crate::entity::EntityVariant::Player(_));
            self.cells.get_mut(&key).unwrap().insert(entity.clone());

            if is_player {
                self.active_cell_callback.on_cell_active(entity);

                let neighbour_keys = self.neighbour_keys(key, 1);
                for nk in &neighbour_keys {
                    self.active_cell_keys.insert(*nk);
                    if let Some(neighbour_cell) = self.cells.get(nk) {
                        for creature in neighbour_cell.units.values() {
                            self.active_cell_callback.on_cell_active(creature);
                        }
                    }
                }
            }
        }

        key
    }

    /// Recompute the entity's cell key; no-op if unchanged, otherwise moves
    /// it and invokes `on_cell_change` (spec.md §4.2 `update_object`).
    pub fn update_object(&mut self, entity: &EntityHandle) {
        let new_key = self.key_for(entity.borrow().location);
        let old_key = entity.borrow().current_cell;

        if old_key == Some(new_key) {
            return;
        }

        let kind = entity.borrow().variant.kind();
        let guid = entity.borrow().guid;
        if let Some(ok) = old_key {
            if let Some(cell) = self.cells.get_mut(&ok) {
                cell.remove(guid, kind);
            }
        }

        self.add_or_get(entity, true);
        entity.borrow_mut().on_cell_change();
    }

    /// Remove from its current cell and broadcast a destroy packet to
    /// everyone within `CELL_SIZE`, excluding the entity itself (spec.md
    /// §4.2 `remove_object`).
    pub fn remove_object(&mut self, entity: &EntityHandle) {
        let (guid, kind, location, old_key) = {
            let e = entity.borrow();
            (e.guid, e.variant.kind(), e.location, e.current_cell)
        };
        let Some(key) = old_key else { return };
        let Some(cell) = self.cells.get_mut(&key) else { return };
        cell.remove(guid, kind);

        let packet = entity.borrow().destroy_packet();
        let filter = BroadcastFilter { exclude_source: Some(guid), ..Default::default() };
        cell.broadcast_within(&packet, self.cell_size, location, &filter);
    }

    /// The up-to-9 already-materialised cells within `range` cells of `key`.
    pub fn neighbour_keys(&self, key: CellKey, range: i64) -> Vec<CellKey> {
        let mut out = Vec::new();
        for dx in -range..=range {
            for dy in -range..=range {
                let candidate = CellKey { ix: key.ix + dx, iy: key.iy + dy, map_id: key.map_id };
                if self.cells.contains_key(&candidate) {
                    out.push(candidate);
                }
            }
        }
        out
    }

    pub fn neighbours(&self, key: CellKey) -> Vec<&Cell> {
        self.neighbour_keys(key, 1).into_iter().filter_map(|k| self.cells.get(&k)).collect()
    }

    /// Union of matching buckets over the 9 neighbours of `entity`'s cell.
    pub fn surrounding_entities(&self, entity: &EntityHandle, kind: EntityKind) -> HashMap<Guid, EntityHandle> {
        let Some(key) = entity.borrow().current_cell else { return HashMap::new() };
        let mut out = HashMap::new();
        for cell in self.neighbours(key) {
            let bucket = match kind {
                EntityKind::Player => &cell.players,
                EntityKind::Unit => &cell.units,
                EntityKind::GameObject => &cell.gameobjects,
                _ => continue,
            };
            for (guid, handle) in bucket {
                out.insert(*guid, handle.clone());
            }
        }
        out
    }

    /// Forward a broadcast to every neighbour of `entity`'s cell.
    pub fn send_surrounding(&self, entity: &EntityHandle, packet: &[u8], filter: &BroadcastFilter) {
        let Some(key) = entity.borrow().current_cell else { return };
        for cell in self.neighbours(key) {
            cell.broadcast(packet, filter);
        }
    }

    pub fn send_surrounding_in_range(
        &self,
        entity: &EntityHandle,
        packet: &[u8],
        range: f32,
        filter: &BroadcastFilter,
    ) {
        let (key, location) = {
            let e = entity.borrow();
            let Some(k) = e.current_cell else { return };
            (k, e.location)
        };
        for cell in self.neighbours(key) {
            cell.broadcast_within(packet, range, location, filter);
        }
    }

    /// Drop cells from the active set that have no player in themselves or
    /// any 8-neighbour. Cell objects and loaded tiles are never evicted
    /// (design note §9(a), preserved deliberately: "whether this is
    /// intentional ... or a bug is unclear — preserve current behaviour").
    pub fn deactivate_cells(&mut self) {
        let mut to_drop = Vec::new();
        for &key in &self.active_cell_keys {
            let players_near = self
                .neighbours(key)
                .iter()
                .any(|c| c.has_players());
            if !players_near {
                to_drop.push(key);
            }
        }
        for key in to_drop {
            self.active_cell_keys.remove(&key);
        }
    }

    /// Per-tick update of every creature in an active cell, insertion order
    /// within a cell (spec.md §4.2 `tick_creatures`).
    pub fn tick_creatures(&mut self) {
        for key in self.active_cell_keys.clone() {
            if let Some(cell) = self.cells.get(&key) {
                for handle in cell.units.values() {
                    handle.borrow_mut().tick();
                }
            }
        }
    }

    /// Per-tick update of every gameobject in an active cell (spec.md §4.2
    /// `tick_gameobjects`). Creatures are ticked first within one tick
    /// (spec.md §4.2 ordering guarantee) by the caller invoking
    /// [`Self::tick_creatures`] before this.
    pub fn tick_gameobjects(&mut self) {
        for key in self.active_cell_keys.clone() {
            if let Some(cell) = self.cells.get(&key) {
                for handle in cell.gameobjects.values() {
                    handle.borrow_mut().tick();
                }
            }
        }
    }

    pub fn cells(&self) -> &HashMap<CellKey, Cell> {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::types::{HighGuid, Vector3};
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::entity::{Entity, EntityVariant, PlayerData, UnitData};
    use crate::session::new_session_handle;

    struct RecordingCallback {
        woken: Rc<RefCell<Vec<Guid>>>,
    }
    impl ActiveCellCallback for RecordingCallback {
        fn on_cell_active(&mut self, entity: &EntityHandle) {
            self.woken.borrow_mut().push(entity.borrow().guid);
        }
    }

    fn new_player(guid: u64, x: f32, y: f32) -> EntityHandle {
        let g = Guid::tagged(HighGuid::Player, guid);
        let data = PlayerData::new(new_session_handle(), 1);
        Rc::new(RefCell::new(Entity::new(g, 0, Vector3::new(x, y, 0.0, 0.0), EntityVariant::Player(data))))
    }

    fn new_unit(guid: u64, x: f32, y: f32) -> EntityHandle {
        let g = Guid::tagged(HighGuid::Unit, guid);
        Rc::new(RefCell::new(Entity::new(g, 0, Vector3::new(x, y, 0.0, 0.0), EntityVariant::Unit(UnitData::default()))))
    }

    #[test]
    fn s1_placement_and_move_across_cell_boundary() {
        let cb = RecordingCallback { woken: Rc::new(RefCell::new(Vec::new())) };
        let mut grid = GridManager::new(0, 100.0, Box::new(cb));

        let player = new_player(1, 50.0, 50.0);
        let key0 = grid.add_or_get(&player, true);
        assert_eq!(key0, CellKey { ix: 0, iy: 0, map_id: 0 });

        player.borrow_mut().location = Vector3::new(150.0, 50.0, 0.0, 0.0);
        grid.update_object(&player);

        let new_key = player.borrow().current_cell.unwrap();
        assert_eq!(new_key, CellKey { ix: 1, iy: 0, map_id: 0 });
        assert!(!grid.cells()[&key0].players.contains_key(&player.borrow().guid));
    }

    #[test]
    fn s3_active_cell_wake_up_notifies_neighbour_creature() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let cb = RecordingCallback { woken: log.clone() };
        let mut grid = GridManager::new(0, 100.0, Box::new(cb));

        let creature = new_unit(2, 150.0, 50.0);
        grid.add_or_get(&creature, true);

        let player = new_player(1, 50.0, 50.0);
        grid.add_or_get(&player, true);

        assert!(log.borrow().contains(&creature.borrow().guid));
    }
}
