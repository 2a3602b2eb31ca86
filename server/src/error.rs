//! Error kinds the core surfaces to handlers (spec.md §7). Programmer-error
//! invariant violations — a field index outside a kind's range, a cell-key
//! mismatch — are not represented here; they panic, since they are fatal to
//! the world thread and must not be swallowed.

use std::fmt;

/// Distinguishes a bad password from no such account, per spec.md §7.3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    BadPassword,
    NoSuchUser,
}

/// Bag/money/stock failures surfaced to the player via a dedicated opcode,
/// never fatal (spec.md §7.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryError {
    BagNotEmpty,
    CannotCarryMore,
    ItemSoldOut,
    NotEnoughMoney,
    ItemNotFound,
}

impl fmt::Display for InventoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            InventoryError::BagNotEmpty => "bag is not empty",
            InventoryError::CannotCarryMore => "cannot carry any more",
            InventoryError::ItemSoldOut => "item is sold out",
            InventoryError::NotEnoughMoney => "not enough money",
            InventoryError::ItemNotFound => "item not found",
        };
        f.write_str(msg)
    }
}

/// User-caused and adapter-surfaced errors the core exposes (spec.md §7).
#[derive(Debug)]
pub enum WorldError {
    /// Entity, ticket, or persisted record absent.
    NotFound,
    /// Character/guild name collision.
    NameTaken,
    /// Login with bad password vs. no such account.
    AuthFailed(AuthFailure),
    /// Bag-not-empty, cannot-carry-more, item-sold-out, not-enough-money, can't-find-item.
    Inventory(InventoryError),
    /// A handler received too few bytes; the caller should short-circuit
    /// without mutating state.
    Protocol,
    /// Tile data absent; callers fall back to a supplied default.
    TerrainMissing,
    /// Surfaced by the persistence adapter. Not retried automatically.
    Persistence(String),
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldError::NotFound => write!(f, "not found"),
            WorldError::NameTaken => write!(f, "name already taken"),
            WorldError::AuthFailed(AuthFailure::BadPassword) => write!(f, "bad password"),
            WorldError::AuthFailed(AuthFailure::NoSuchUser) => write!(f, "no such account"),
            WorldError::Inventory(e) => write!(f, "inventory error: {e}"),
            WorldError::Protocol => write!(f, "malformed packet"),
            WorldError::TerrainMissing => write!(f, "terrain data missing"),
            WorldError::Persistence(msg) => write!(f, "persistence error: {msg}"),
        }
    }
}

impl std::error::Error for WorldError {}

pub type WorldResult<T> = Result<T, WorldError>;
