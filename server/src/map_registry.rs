//! Process-wide map registry (spec.md §4.2/§4.3): one [`Map`] per `map_id`,
//! each owning its [`GridManager`] and [`TileTable`]. Grounded on
//! `MapManager.py`'s static `MAPS` dict and on the teacher's
//! `Repository::initialize`/`get` `OnceLock` singleton idiom.

use std::collections::HashMap;
use std::sync::OnceLock;

use core::types::MapId;

use crate::error::{WorldError, WorldResult};
use crate::grid_manager::{ActiveCellCallback, GridManager};
use crate::single_thread_cell::SingleThreadCell;
use crate::terrain::{self, TileTable};

/// AI wake-up is gameplay logic and stays out of scope; this callback only
/// records that a cell went active, matching `on_cell_turn_active`'s role
/// as a trigger point rather than a behavior implementation.
struct NoopWakeCallback;
impl ActiveCellCallback for NoopWakeCallback {
    fn on_cell_active(&mut self, entity: &crate::cell::EntityHandle) {
        log::trace!("cell active: guid={:?}", entity.borrow().guid);
    }
}

pub struct Map {
    pub map_id: MapId,
    pub grid: GridManager,
    pub tiles: TileTable,
    pub use_map_tiles: bool,
}

impl Map {
    fn new(map_id: MapId, cell_size: f32, use_map_tiles: bool) -> Self {
        Map {
            map_id,
            grid: GridManager::new(map_id, cell_size, Box::new(NoopWakeCallback)),
            tiles: TileTable::new(),
            use_map_tiles,
        }
    }

    /// Height at `(x, y)` on this map, loading the surrounding tile
    /// footprint first if `use_map_tiles` (spec.md §4.3).
    pub fn height_at(&mut self, x: f32, y: f32, default_z: f32) -> f32 {
        self.tiles.load_tiles_around(x, y, self.use_map_tiles);
        terrain::height(&self.tiles, x, y, default_z)
    }

    pub fn water_at(&mut self, x: f32, y: f32) -> f32 {
        self.tiles.load_tiles_around(x, y, self.use_map_tiles);
        terrain::water(&self.tiles, x, y)
    }

    pub fn terrain_type_at(&mut self, x: f32, y: f32) -> f32 {
        self.tiles.load_tiles_around(x, y, self.use_map_tiles);
        terrain::terrain_type(&self.tiles, x, y)
    }

    pub fn area_flag_at(&mut self, x: f32, y: f32) -> f32 {
        self.tiles.load_tiles_around(x, y, self.use_map_tiles);
        terrain::area_flag(&self.tiles, x, y)
    }
}

/// `map_id` -> cell size for every map the world serves. Static rather than
/// data-driven since spec.md's map catalogue is fixed at process start
/// (mirrors `MapManager.MAPS` being populated once at import time).
fn catalogue() -> &'static [(MapId, f32)] {
    &[(0, 100.0)]
}

pub struct MapRegistry {
    maps: HashMap<MapId, SingleThreadCell<Map>>,
}

static REGISTRY: OnceLock<MapRegistry> = OnceLock::new();

impl MapRegistry {
    pub(crate) fn build(use_map_tiles: bool) -> Self {
        let mut maps = HashMap::new();
        for &(map_id, cell_size) in catalogue() {
            maps.insert(map_id, SingleThreadCell::new(Map::new(map_id, cell_size, use_map_tiles)));
        }
        MapRegistry { maps }
    }

    pub fn initialize(use_map_tiles: bool) {
        let _ = REGISTRY.set(Self::build(use_map_tiles));
    }

    pub fn get() -> &'static MapRegistry {
        REGISTRY.get().expect("MapRegistry::initialize must run before MapRegistry::get")
    }

    pub fn with_map<R>(&self, map_id: MapId, f: impl FnOnce(&mut Map) -> R) -> WorldResult<R> {
        let cell = self.maps.get(&map_id).ok_or(WorldError::NotFound)?;
        Ok(cell.with_mut(f))
    }

    pub fn map_ids(&self) -> impl Iterator<Item = &MapId> {
        self.maps.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_map_id_is_not_found() {
        let registry = MapRegistry::build(false);
        let result = registry.with_map(999, |_| ());
        assert!(matches!(result, Err(WorldError::NotFound)));
    }

    #[test]
    fn known_map_resolves_terrain_default() {
        let registry = MapRegistry::build(false);
        let z = registry.with_map(0, |map| map.height_at(10.0, 10.0, 5.0)).unwrap();
        assert_eq!(z, 5.0);
    }
}
