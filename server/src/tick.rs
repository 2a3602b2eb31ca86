//! Tick scheduler (spec.md §4.2): a periodic drive of creature/gameobject
//! updates and idle-cell retirement across every registered map. Grounded
//! on `MapManager.update_creatures`/`update_gameobjects`/`deactivate_cells`
//! iterating its static `MAPS` dict, and on the teacher's `main.rs` tick
//! loop shape.

use crate::map_registry::MapRegistry;

/// Drive one tick of every map: creatures before gameobjects within a map
/// (spec.md §4.2 ordering guarantee), then retire idle cells.
pub fn tick_all_maps(registry: &MapRegistry) {
    for &map_id in registry.map_ids().collect::<Vec<_>>().iter() {
        let result = registry.with_map(map_id, |map| {
            map.grid.tick_creatures();
            map.grid.tick_gameobjects();
            map.grid.deactivate_cells();
        });
        if let Err(e) = result {
            log::error!("tick: map {map_id} failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticking_a_freshly_built_registry_does_not_panic() {
        let registry = MapRegistry::build(false);
        tick_all_maps(&registry);
    }
}
