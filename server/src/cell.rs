//! Cell: an axis-aligned square spatial bucket (spec.md §3, §4.1). Grounded
//! on `GridManager.py`'s `Cell` class.
//!
//! The key is an integer `(ix, iy, mapId)` triple rather than the source's
//! rounded-decimal string concatenation, per the design note: "a
//! systems-language implementation should derive an integer cell coordinate
//! ... this is equivalent modulo TOLERANCE and avoids floating-point
//! equality issues."

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use core::constants::TOLERANCE;
use core::types::{Guid, MapId, Vector3};

use crate::entity::{Entity, EntityVariant};
use crate::update_field::EntityKind;

pub type EntityHandle = Rc<RefCell<Entity>>;

/// Integer cell coordinate: `floor(x / CELL_SIZE)`, `floor(y / CELL_SIZE)`,
/// plus the map id. Two points fall in the same cell iff they share a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellKey {
    pub ix: i64,
    pub iy: i64,
    pub map_id: MapId,
}

/// Derive the cell key covering world point `(x, y)` on `map_id`.
pub fn cell_key(x: f32, y: f32, map_id: MapId, cell_size: f32) -> CellKey {
    CellKey {
        ix: (x / cell_size).floor() as i64,
        iy: (y / cell_size).floor() as i64,
        map_id,
    }
}

/// World-space bounds of a cell, `max - min = cell_size - 2 * TOLERANCE`
/// (spec.md §3), for boundary-tolerant containment checks.
pub fn cell_bounds(key: CellKey, cell_size: f32) -> (f32, f32, f32, f32) {
    let min_x = key.ix as f32 * cell_size + TOLERANCE;
    let min_y = key.iy as f32 * cell_size + TOLERANCE;
    let max_x = min_x + cell_size - 2.0 * TOLERANCE;
    let max_y = min_y + cell_size - 2.0 * TOLERANCE;
    (min_x, min_y, max_x, max_y)
}

/// Three predicates applied in order by [`Cell::broadcast`] /
/// [`Cell::broadcast_within`] (spec.md §4.1).
#[derive(Default)]
pub struct BroadcastFilter<'a> {
    pub exclude_source: Option<Guid>,
    pub exclude_guids: Option<&'a HashSet<Guid>>,
    /// When set, a recipient who has this guid on their ignore list is
    /// skipped (SPEC_FULL.md supplemented friends/ignore-list gate).
    pub use_ignore_of: Option<Guid>,
}

impl<'a> BroadcastFilter<'a> {
    fn admits(&self, recipient_guid: Guid, ignores: impl Fn(Guid) -> bool) -> bool {
        if self.exclude_source == Some(recipient_guid) {
            return false;
        }
        if let Some(set) = self.exclude_guids {
            if set.contains(&recipient_guid) {
                return false;
            }
        }
        if let Some(source) = self.use_ignore_of {
            if ignores(source) {
                return false;
            }
        }
        true
    }
}

pub struct Cell {
    pub key: CellKey,
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
    pub cell_size: f32,
    pub players: HashMap<Guid, EntityHandle>,
    pub units: HashMap<Guid, EntityHandle>,
    pub gameobjects: HashMap<Guid, EntityHandle>,
}

impl Cell {
    pub fn new(key: CellKey, cell_size: f32) -> Self {
        let (min_x, min_y, max_x, max_y) = cell_bounds(key, cell_size);
        Cell {
            key,
            min_x,
            min_y,
            max_x,
            max_y,
            cell_size,
            players: HashMap::new(),
            units: HashMap::new(),
            gameobjects: HashMap::new(),
        }
    }

    pub fn has_players(&self) -> bool {
        !self.players.is_empty()
    }

    pub fn contains(&self, location: Vector3, map_id: MapId) -> bool {
        map_id == self.key.map_id
            && location.x >= self.min_x - TOLERANCE
            && location.x <= self.max_x + TOLERANCE
            && location.y >= self.min_y - TOLERANCE
            && location.y <= self.max_y + TOLERANCE
    }

    /// Insert the entity into the bucket matching its kind and stamp its
    /// `current_cell`. Active-set/neighbour-wake bookkeeping (spec.md §4.1
    /// steps ii/iii) lives in [`crate::grid_manager::GridManager::add_or_get`]
    /// since only the grid manager can mutate its own active-cell set while
    /// this cell is borrowed out of its map.
    pub fn insert(&mut self, handle: EntityHandle) {
        let guid = handle.borrow().guid;
        let kind = handle.borrow().variant.kind();
        match kind {
            EntityKind::Player => {
                self.players.insert(guid, handle.clone());
            }
            EntityKind::Unit => {
                self.units.insert(guid, handle.clone());
            }
            EntityKind::GameObject => {
                self.gameobjects.insert(guid, handle.clone());
            }
            _ => unreachable!("only unit/player/gameobject entities are cell-placed"),
        }
        handle.borrow_mut().current_cell = Some(self.key);
    }

    /// Drop the entity from its bucket by guid. No neighbour bookkeeping
    /// (spec.md §4.1).
    pub fn remove(&mut self, guid: Guid, kind: EntityKind) -> Option<EntityHandle> {
        match kind {
            EntityKind::Player => self.players.remove(&guid),
            EntityKind::Unit => self.units.remove(&guid),
            EntityKind::GameObject => self.gameobjects.remove(&guid),
            _ => None,
        }
    }

    /// Unconditional broadcast honouring the three optional predicates, in
    /// order. Only online players receive packets.
    pub fn broadcast(&self, packet: &[u8], filter: &BroadcastFilter) {
        for (guid, handle) in &self.players {
            let entity = handle.borrow();
            let EntityVariant::Player(data) = &entity.variant else { continue };
            if !data.online {
                continue;
            }
            if !filter.admits(*guid, |source| data.ignores(source)) {
                continue;
            }
            data.session.borrow_mut().enqueue(packet.to_vec());
        }
    }

    /// Range-limited broadcast; `range <= 0` degrades to unconditional
    /// (spec.md §4.1).
    pub fn broadcast_within(
        &self,
        packet: &[u8],
        range: f32,
        source_location: Vector3,
        filter: &BroadcastFilter,
    ) {
        if range <= 0.0 {
            self.broadcast(packet, filter);
            return;
        }
        for (guid, handle) in &self.players {
            let entity = handle.borrow();
            let EntityVariant::Player(data) = &entity.variant else { continue };
            if !data.online {
                continue;
            }
            if entity.location.distance_2d(&source_location) > range {
                continue;
            }
            if !filter.admits(*guid, |source| data.ignores(source)) {
                continue;
            }
            data.session.borrow_mut().enqueue(packet.to_vec());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_key_partitions_the_plane() {
        let a = cell_key(50.0, 50.0, 0, 100.0);
        let b = cell_key(99.9, 0.0, 0, 100.0);
        let c = cell_key(150.0, 50.0, 0, 100.0);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn contains_respects_derived_bounds() {
        let key = cell_key(50.0, 50.0, 0, 100.0);
        let cell = Cell::new(key, 100.0);
        assert!(cell.contains(Vector3::new(50.0, 50.0, 0.0, 0.0), 0));
        assert!(!cell.contains(Vector3::new(150.0, 50.0, 0.0, 0.0), 0));
    }
}
