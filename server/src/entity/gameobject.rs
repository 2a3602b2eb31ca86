//! Gameobject (interactive world prop) tail data.

#[derive(Debug, Default)]
pub struct GameObjectData {
    pub state: u32,
    pub tick_count: u64,
}
