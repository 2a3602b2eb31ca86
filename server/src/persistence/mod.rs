//! Persistence adapter contract (spec.md §4.5): the abstract interface the
//! core calls through to load and save accounts, characters, tickets, and
//! guilds. The core never opens a connection directly.

pub mod sqlite_adapter;

use core::types::Guid;

use crate::error::WorldResult;

/// Returned on a successful [`PersistenceAdapter::try_login`]: the account
/// id plus the ip the login was attempted from, which `try_login` also
/// persists to the account row (spec.md §3 "mutated on login (last-ip)").
#[derive(Debug, Clone, PartialEq)]
pub struct AccountHandle {
    pub id: u64,
    pub ip: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoginStatus {
    Success(AccountHandle),
    BadPassword,
    NoSuchUser,
}

#[derive(Debug, Clone)]
pub struct CharacterRecord {
    pub guid: Guid,
    pub account_id: u64,
    pub name: String,
    pub map_id: core::types::MapId,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub level: u32,
    pub gold: u64,
}

#[derive(Debug, Clone)]
pub struct Ticket {
    pub id: u64,
    pub account_id: u64,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct Guild {
    pub id: u64,
    pub name: String,
    pub leader_account_id: u64,
}

#[derive(Debug, Clone)]
pub struct GuildPetition {
    pub item_guid: Guid,
    pub owner_account_id: u64,
    pub guild_name: String,
}

/// The abstract persistence surface (spec.md §4.5). Every operation is
/// synchronous from the caller's point of view and isolated per call — no
/// user-visible transaction spans two trait calls.
pub trait PersistenceAdapter {
    // Accounts
    fn try_login(&self, name: &str, password: &str, ip: &str) -> WorldResult<LoginStatus>;
    fn create_account(&self, name: &str, password: &str, ip: &str) -> WorldResult<u64>;
    fn characters_of(&self, account_id: u64) -> WorldResult<Vec<CharacterRecord>>;

    // Characters
    fn get_character_by_guid(&self, guid: Guid) -> WorldResult<Option<CharacterRecord>>;
    fn get_character_by_name(&self, name: &str) -> WorldResult<Option<CharacterRecord>>;
    fn character_name_exists(&self, name: &str) -> WorldResult<bool>;
    fn create_character(&self, record: &CharacterRecord) -> WorldResult<()>;
    fn update_character(&self, record: &CharacterRecord) -> WorldResult<()>;
    /// Idempotent: deleting an already-deleted guid returns `Ok(())` rather
    /// than an error (spec.md §4.5 invariant).
    fn delete_character(&self, guid: Guid) -> WorldResult<()>;

    // Tickets
    fn add_ticket(&self, account_id: u64, text: &str) -> WorldResult<u64>;
    fn get_ticket(&self, id: u64) -> WorldResult<Option<Ticket>>;
    fn delete_ticket(&self, id: u64) -> WorldResult<()>;
    fn list_tickets(&self) -> WorldResult<Vec<Ticket>>;

    // Guilds
    fn create_guild(&self, name: &str, leader_account_id: u64) -> WorldResult<u64>;
    fn add_guild_member(&self, guild_id: u64, account_id: u64) -> WorldResult<()>;
    fn remove_guild_member(&self, guild_id: u64, account_id: u64) -> WorldResult<()>;
    fn list_guild_members(&self, guild_id: u64) -> WorldResult<Vec<u64>>;
    fn update_guild(&self, guild: &Guild) -> WorldResult<()>;
    fn destroy_guild(&self, guild_id: u64) -> WorldResult<()>;

    fn create_guild_petition(&self, petition: &GuildPetition) -> WorldResult<()>;
    fn get_guild_petition_by_item(&self, item_guid: Guid) -> WorldResult<Option<GuildPetition>>;
    fn get_guild_petitions_by_owner(&self, owner_account_id: u64) -> WorldResult<Vec<GuildPetition>>;
    fn get_guild_petition_by_name(&self, guild_name: &str) -> WorldResult<Option<GuildPetition>>;
    fn destroy_guild_petition(&self, item_guid: Guid) -> WorldResult<()>;

    /// Distinct account ids among a guild's members.
    fn guild_accounts(&self, guild_id: u64) -> WorldResult<Vec<u64>>;
}
