//! Spatial and protocol constants shared by the grid/cell layer, terrain
//! query surface, and wire codec.

/// Compile-time tile edge length in world units. 64 tiles per map axis, and
/// the world half-extent below is `32 * SIZE` in each direction from origin.
pub const SIZE: f32 = 533.333_33;

/// World half-extent: coordinates are clamped to `[-W, W]` at query
/// boundaries (never rejected). `32.0 * SIZE`.
pub const W: f32 = 32.0 * SIZE;

/// Tiles per map axis; the tile table is `TILE_COUNT * TILE_COUNT`.
pub const TILE_COUNT: usize = 64;

/// Default cell edge length in world units, overridable via
/// [`crate::WorldConfig`]-style configuration in the consuming crate.
pub const DEFAULT_CELL_SIZE: f32 = 100.0;

/// Floating point slack used when deriving/comparing cell bounds so that a
/// point exactly on a cell boundary falls into exactly one cell.
pub const TOLERANCE: f32 = 0.00001;

/// Sampling resolution (samples per tile edge) for the height grid.
pub const RESOLUTION_ZMAP: i32 = 8;
/// Sampling resolution (samples per tile edge) for the water-level grid.
pub const RESOLUTION_WATER: i32 = 8;
/// Sampling resolution (samples per tile edge) for the terrain-type grid.
pub const RESOLUTION_TERRAIN: i32 = 1;
/// Sampling resolution (samples per tile edge) for the area-flag grid.
///
/// Per spec §9(c): `get_area_flag` reads from the same grid as terrain type
/// in the original source rather than a flags grid of its own. Preserved
/// here rather than silently split into a distinct grid.
pub const RESOLUTION_FLAGS: i32 = RESOLUTION_TERRAIN;

/// Default unit walk speed, world units per tick.
pub const DEFAULT_WALK_SPEED: f32 = 2.5;
/// Default unit run speed, world units per tick.
pub const DEFAULT_RUN_SPEED: f32 = 7.0;
/// Default unit swim speed, world units per tick.
pub const DEFAULT_SWIM_SPEED: f32 = 4.722_2;
/// Default unit turn rate, radians per tick.
pub const DEFAULT_TURN_RATE: f32 = std::f32::consts::PI;
/// Default unit bounding radius, world units.
pub const DEFAULT_BOUNDING_RADIUS: f32 = 0.388_999_99;
