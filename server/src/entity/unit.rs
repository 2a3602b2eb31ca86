//! Unit (non-player creature) tail data.

use core::types::Guid;

#[derive(Debug, Default)]
pub struct UnitData {
    pub faction: u32,
    pub combat_target: Option<Guid>,
    pub tick_count: u64,
}
