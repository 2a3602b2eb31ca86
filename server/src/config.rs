//! Runtime configuration (spec.md §6): cell size, tile usage, unit default
//! speeds, and the database connection string. Environment variables
//! override the built-in defaults when set, following the same
//! `env::var(...).unwrap_or_else(...)` idiom the teacher uses for KeyDB.

use std::env;
use std::sync::OnceLock;

use core::constants;

const DEFAULT_DATABASE_URL: &str = "world.sqlite3";

#[derive(Debug, Clone)]
pub struct WorldConfig {
    pub cell_size: f32,
    pub use_map_tiles: bool,
    pub walk_speed: f32,
    pub run_speed: f32,
    pub swim_speed: f32,
    pub turn_rate: f32,
    pub bounding_radius: f32,
    pub database_url: String,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            cell_size: constants::DEFAULT_CELL_SIZE,
            use_map_tiles: true,
            walk_speed: constants::DEFAULT_WALK_SPEED,
            run_speed: constants::DEFAULT_RUN_SPEED,
            swim_speed: constants::DEFAULT_SWIM_SPEED,
            turn_rate: constants::DEFAULT_TURN_RATE,
            bounding_radius: constants::DEFAULT_BOUNDING_RADIUS,
            database_url: database_url(),
        }
    }
}

fn database_url() -> String {
    env::var("WORLD_DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

static CONFIG: OnceLock<WorldConfig> = OnceLock::new();

impl WorldConfig {
    /// Install the process-wide configuration. Call once at startup.
    pub fn initialize(config: WorldConfig) -> Result<(), String> {
        CONFIG
            .set(config)
            .map_err(|_| "WorldConfig already initialized".to_string())
    }

    /// Borrow the process-wide configuration.
    pub fn get() -> &'static WorldConfig {
        CONFIG.get().expect("WorldConfig not initialized")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pull_constants_from_core() {
        let cfg = WorldConfig::default();
        assert_eq!(cfg.cell_size, constants::DEFAULT_CELL_SIZE);
        assert!(cfg.use_map_tiles);
    }
}
