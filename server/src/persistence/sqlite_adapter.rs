//! `rusqlite`-backed [`PersistenceAdapter`]. Schema and statement style
//! grounded on `sqlite-bench/src/schema/normalized.rs`'s `params!`/
//! `prepare`/`execute` usage, adapted from a benchmarking harness to a
//! small normalized schema covering the contract in spec.md §4.5.
//!
//! sqlite's native integer type is `i64`; every `u64` id or guid low-part
//! crosses this boundary cast through `i64`, which is lossless for every
//! value this adapter actually produces (guids mask off the high byte,
//! rowids never approach `i64::MAX`).

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};

use core::types::{Guid, HighGuid, MapId};

use crate::error::{WorldError, WorldResult};
use crate::persistence::{
    AccountHandle, CharacterRecord, Guild, GuildPetition, LoginStatus, PersistenceAdapter, Ticket,
};

fn to_world_err(e: rusqlite::Error) -> WorldError {
    WorldError::Persistence(e.to_string())
}

/// Wraps a single `rusqlite::Connection` behind a mutex: the adapter itself
/// may be called from any I/O thread, but sqlite only allows one writer at
/// a time per connection (spec.md §5 "the adapter ... is free to use a
/// connection pool but must return on the same call" — a mutex is the
/// single-connection degenerate case of that pool).
pub struct SqliteAdapter {
    conn: Mutex<Connection>,
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS accounts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    last_ip TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS characters (
    guid INTEGER PRIMARY KEY,
    account_id INTEGER NOT NULL REFERENCES accounts(id),
    name TEXT NOT NULL UNIQUE,
    map_id INTEGER NOT NULL,
    x REAL NOT NULL,
    y REAL NOT NULL,
    z REAL NOT NULL,
    level INTEGER NOT NULL,
    gold INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS tickets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    account_id INTEGER NOT NULL,
    text TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS guilds (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    leader_account_id INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS guild_members (
    guild_id INTEGER NOT NULL REFERENCES guilds(id),
    account_id INTEGER NOT NULL,
    PRIMARY KEY (guild_id, account_id)
);

CREATE TABLE IF NOT EXISTS guild_petitions (
    item_guid INTEGER PRIMARY KEY,
    owner_account_id INTEGER NOT NULL,
    guild_name TEXT NOT NULL
);
";

impl SqliteAdapter {
    pub fn open(path: &str) -> WorldResult<Self> {
        let conn = Connection::open(path).map_err(to_world_err)?;
        conn.execute_batch(SCHEMA).map_err(to_world_err)?;
        Ok(SqliteAdapter { conn: Mutex::new(conn) })
    }

    pub fn open_in_memory() -> WorldResult<Self> {
        let conn = Connection::open_in_memory().map_err(to_world_err)?;
        conn.execute_batch(SCHEMA).map_err(to_world_err)?;
        Ok(SqliteAdapter { conn: Mutex::new(conn) })
    }

    fn character_row(row: &rusqlite::Row) -> rusqlite::Result<CharacterRecord> {
        let guid_low: i64 = row.get(0)?;
        let account_id: i64 = row.get(1)?;
        let map_id: u32 = row.get(3)?;
        let level: i64 = row.get(7)?;
        let gold: i64 = row.get(8)?;
        Ok(CharacterRecord {
            guid: Guid::tagged(HighGuid::Player, guid_low as u64),
            account_id: account_id as u64,
            name: row.get(2)?,
            map_id: map_id as MapId,
            x: row.get(4)?,
            y: row.get(5)?,
            z: row.get(6)?,
            level: level as u32,
            gold: gold as u64,
        })
    }

    fn petition_row(row: &rusqlite::Row) -> rusqlite::Result<GuildPetition> {
        let low: i64 = row.get(0)?;
        let owner: i64 = row.get(1)?;
        Ok(GuildPetition {
            item_guid: Guid::tagged(HighGuid::Item, low as u64),
            owner_account_id: owner as u64,
            guild_name: row.get(2)?,
        })
    }
}

impl PersistenceAdapter for SqliteAdapter {
    fn try_login(&self, name: &str, password: &str, ip: &str) -> WorldResult<LoginStatus> {
        let conn = self.conn.lock();
        let row: Option<(i64, String)> = conn
            .query_row("SELECT id, password FROM accounts WHERE name = ?1", params![name], |r| {
                Ok((r.get(0)?, r.get(1)?))
            })
            .optional()
            .map_err(to_world_err)?;

        match row {
            None => Ok(LoginStatus::NoSuchUser),
            Some((_, stored)) if stored != password => Ok(LoginStatus::BadPassword),
            Some((id, _)) => {
                conn.execute(
                    "UPDATE accounts SET last_ip = ?2 WHERE id = ?1",
                    params![id, ip],
                )
                .map_err(to_world_err)?;
                Ok(LoginStatus::Success(AccountHandle { id: id as u64, ip: ip.to_string() }))
            }
        }
    }

    fn create_account(&self, name: &str, password: &str, ip: &str) -> WorldResult<u64> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO accounts (name, password, last_ip) VALUES (?1, ?2, ?3)",
            params![name, password, ip],
        )
        .map_err(to_world_err)?;
        Ok(conn.last_insert_rowid() as u64)
    }

    fn characters_of(&self, account_id: u64) -> WorldResult<Vec<CharacterRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare(
                "SELECT guid, account_id, name, map_id, x, y, z, level, gold
                 FROM characters WHERE account_id = ?1",
            )
            .map_err(to_world_err)?;
        let rows = stmt
            .query_map(params![account_id as i64], Self::character_row)
            .map_err(to_world_err)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(to_world_err)
    }

    fn get_character_by_guid(&self, guid: Guid) -> WorldResult<Option<CharacterRecord>> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT guid, account_id, name, map_id, x, y, z, level, gold
             FROM characters WHERE guid = ?1",
            params![guid.low() as i64],
            Self::character_row,
        )
        .optional()
        .map_err(to_world_err)
    }

    fn get_character_by_name(&self, name: &str) -> WorldResult<Option<CharacterRecord>> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT guid, account_id, name, map_id, x, y, z, level, gold
             FROM characters WHERE name = ?1",
            params![name],
            Self::character_row,
        )
        .optional()
        .map_err(to_world_err)
    }

    fn character_name_exists(&self, name: &str) -> WorldResult<bool> {
        let conn = self.conn.lock();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM characters WHERE name = ?1", params![name], |r| r.get(0))
            .map_err(to_world_err)?;
        Ok(count > 0)
    }

    fn create_character(&self, record: &CharacterRecord) -> WorldResult<()> {
        if self.character_name_exists(&record.name)? {
            return Err(WorldError::NameTaken);
        }
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO characters (guid, account_id, name, map_id, x, y, z, level, gold)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                record.guid.low() as i64,
                record.account_id as i64,
                record.name,
                record.map_id,
                record.x,
                record.y,
                record.z,
                record.level,
                record.gold as i64,
            ],
        )
        .map_err(to_world_err)?;
        Ok(())
    }

    fn update_character(&self, record: &CharacterRecord) -> WorldResult<()> {
        let conn = self.conn.lock();
        conn.execute(
            "UPDATE characters SET map_id = ?2, x = ?3, y = ?4, z = ?5, level = ?6, gold = ?7
             WHERE guid = ?1",
            params![
                record.guid.low() as i64,
                record.map_id,
                record.x,
                record.y,
                record.z,
                record.level,
                record.gold as i64,
            ],
        )
        .map_err(to_world_err)?;
        Ok(())
    }

    fn delete_character(&self, guid: Guid) -> WorldResult<()> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM characters WHERE guid = ?1", params![guid.low() as i64])
            .map_err(to_world_err)?;
        Ok(())
    }

    fn add_ticket(&self, account_id: u64, text: &str) -> WorldResult<u64> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO tickets (account_id, text) VALUES (?1, ?2)",
            params![account_id as i64, text],
        )
        .map_err(to_world_err)?;
        Ok(conn.last_insert_rowid() as u64)
    }

    fn get_ticket(&self, id: u64) -> WorldResult<Option<Ticket>> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT id, account_id, text FROM tickets WHERE id = ?1",
            params![id as i64],
            |r| {
                let id: i64 = r.get(0)?;
                let account_id: i64 = r.get(1)?;
                Ok(Ticket { id: id as u64, account_id: account_id as u64, text: r.get(2)? })
            },
        )
        .optional()
        .map_err(to_world_err)
    }

    fn delete_ticket(&self, id: u64) -> WorldResult<()> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM tickets WHERE id = ?1", params![id as i64]).map_err(to_world_err)?;
        Ok(())
    }

    fn list_tickets(&self) -> WorldResult<Vec<Ticket>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT id, account_id, text FROM tickets").map_err(to_world_err)?;
        let rows = stmt
            .query_map([], |r| {
                let id: i64 = r.get(0)?;
                let account_id: i64 = r.get(1)?;
                Ok(Ticket { id: id as u64, account_id: account_id as u64, text: r.get(2)? })
            })
            .map_err(to_world_err)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(to_world_err)
    }

    fn create_guild(&self, name: &str, leader_account_id: u64) -> WorldResult<u64> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO guilds (name, leader_account_id) VALUES (?1, ?2)",
            params![name, leader_account_id as i64],
        )
        .map_err(to_world_err)?;
        let id = conn.last_insert_rowid() as u64;
        conn.execute(
            "INSERT INTO guild_members (guild_id, account_id) VALUES (?1, ?2)",
            params![id as i64, leader_account_id as i64],
        )
        .map_err(to_world_err)?;
        Ok(id)
    }

    fn add_guild_member(&self, guild_id: u64, account_id: u64) -> WorldResult<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT OR IGNORE INTO guild_members (guild_id, account_id) VALUES (?1, ?2)",
            params![guild_id as i64, account_id as i64],
        )
        .map_err(to_world_err)?;
        Ok(())
    }

    fn remove_guild_member(&self, guild_id: u64, account_id: u64) -> WorldResult<()> {
        let conn = self.conn.lock();
        conn.execute(
            "DELETE FROM guild_members WHERE guild_id = ?1 AND account_id = ?2",
            params![guild_id as i64, account_id as i64],
        )
        .map_err(to_world_err)?;
        Ok(())
    }

    fn list_guild_members(&self, guild_id: u64) -> WorldResult<Vec<u64>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare("SELECT account_id FROM guild_members WHERE guild_id = ?1")
            .map_err(to_world_err)?;
        let rows = stmt
            .query_map(params![guild_id as i64], |r| r.get::<_, i64>(0))
            .map_err(to_world_err)?;
        rows.map(|r| r.map(|v| v as u64)).collect::<Result<Vec<_>, _>>().map_err(to_world_err)
    }

    fn update_guild(&self, guild: &Guild) -> WorldResult<()> {
        let conn = self.conn.lock();
        conn.execute(
            "UPDATE guilds SET name = ?2, leader_account_id = ?3 WHERE id = ?1",
            params![guild.id as i64, guild.name, guild.leader_account_id as i64],
        )
        .map_err(to_world_err)?;
        Ok(())
    }

    fn destroy_guild(&self, guild_id: u64) -> WorldResult<()> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM guild_members WHERE guild_id = ?1", params![guild_id as i64])
            .map_err(to_world_err)?;
        conn.execute("DELETE FROM guilds WHERE id = ?1", params![guild_id as i64]).map_err(to_world_err)?;
        Ok(())
    }

    fn create_guild_petition(&self, petition: &GuildPetition) -> WorldResult<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO guild_petitions (item_guid, owner_account_id, guild_name)
             VALUES (?1, ?2, ?3)",
            params![
                petition.item_guid.low() as i64,
                petition.owner_account_id as i64,
                petition.guild_name,
            ],
        )
        .map_err(to_world_err)?;
        Ok(())
    }

    fn get_guild_petition_by_item(&self, item_guid: Guid) -> WorldResult<Option<GuildPetition>> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT item_guid, owner_account_id, guild_name FROM guild_petitions WHERE item_guid = ?1",
            params![item_guid.low() as i64],
            Self::petition_row,
        )
        .optional()
        .map_err(to_world_err)
    }

    fn get_guild_petitions_by_owner(&self, owner_account_id: u64) -> WorldResult<Vec<GuildPetition>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare("SELECT item_guid, owner_account_id, guild_name FROM guild_petitions WHERE owner_account_id = ?1")
            .map_err(to_world_err)?;
        let rows = stmt
            .query_map(params![owner_account_id as i64], Self::petition_row)
            .map_err(to_world_err)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(to_world_err)
    }

    fn get_guild_petition_by_name(&self, guild_name: &str) -> WorldResult<Option<GuildPetition>> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT item_guid, owner_account_id, guild_name FROM guild_petitions WHERE guild_name = ?1",
            params![guild_name],
            Self::petition_row,
        )
        .optional()
        .map_err(to_world_err)
    }

    fn destroy_guild_petition(&self, item_guid: Guid) -> WorldResult<()> {
        let conn = self.conn.lock();
        conn.execute(
            "DELETE FROM guild_petitions WHERE item_guid = ?1",
            params![item_guid.low() as i64],
        )
        .map_err(to_world_err)?;
        Ok(())
    }

    fn guild_accounts(&self, guild_id: u64) -> WorldResult<Vec<u64>> {
        self.list_guild_members(guild_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(name: &str, account_id: u64, low_guid: u64) -> CharacterRecord {
        CharacterRecord {
            guid: Guid::tagged(HighGuid::Player, low_guid),
            account_id,
            name: name.to_string(),
            map_id: 0,
            x: 10.0,
            y: 20.0,
            z: 0.0,
            level: 1,
            gold: 0,
        }
    }

    #[test]
    fn login_distinguishes_no_user_from_bad_password() {
        let adapter = SqliteAdapter::open_in_memory().unwrap();
        let id = adapter.create_account("erek", "hunter2", "127.0.0.1").unwrap();
        assert_eq!(
            adapter.try_login("erek", "hunter2", "1.2.3.4").unwrap(),
            LoginStatus::Success(AccountHandle { id, ip: "1.2.3.4".to_string() })
        );
        assert_eq!(adapter.try_login("erek", "wrong", "127.0.0.1").unwrap(), LoginStatus::BadPassword);
        assert_eq!(adapter.try_login("nobody", "x", "127.0.0.1").unwrap(), LoginStatus::NoSuchUser);
    }

    #[test]
    fn successful_login_persists_last_ip() {
        let adapter = SqliteAdapter::open_in_memory().unwrap();
        adapter.create_account("erek", "hunter2", "127.0.0.1").unwrap();
        adapter.try_login("erek", "hunter2", "9.9.9.9").unwrap();

        let stored_ip: String = adapter
            .conn
            .lock()
            .query_row("SELECT last_ip FROM accounts WHERE name = 'erek'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(stored_ip, "9.9.9.9");

        // A bad-password attempt must not overwrite the last successful ip.
        adapter.try_login("erek", "wrong", "1.1.1.1").unwrap();
        let stored_ip: String = adapter
            .conn
            .lock()
            .query_row("SELECT last_ip FROM accounts WHERE name = 'erek'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(stored_ip, "9.9.9.9");
    }

    #[test]
    fn guid_and_name_lookup_agree() {
        let adapter = SqliteAdapter::open_in_memory().unwrap();
        let account = adapter.create_account("erek", "hunter2", "127.0.0.1").unwrap();
        let record = sample("Erek", account, 7);
        adapter.create_character(&record).unwrap();

        let by_guid = adapter.get_character_by_guid(record.guid).unwrap().unwrap();
        let by_name = adapter.get_character_by_name("Erek").unwrap().unwrap();
        assert_eq!(by_guid.guid, by_name.guid);
    }

    #[test]
    fn delete_is_idempotent() {
        let adapter = SqliteAdapter::open_in_memory().unwrap();
        let account = adapter.create_account("erek", "hunter2", "127.0.0.1").unwrap();
        let record = sample("Erek", account, 7);
        adapter.create_character(&record).unwrap();

        adapter.delete_character(record.guid).unwrap();
        adapter.delete_character(record.guid).unwrap();
        assert!(adapter.get_character_by_guid(record.guid).unwrap().is_none());
    }

    #[test]
    fn creating_duplicate_name_is_rejected() {
        let adapter = SqliteAdapter::open_in_memory().unwrap();
        let account = adapter.create_account("erek", "hunter2", "127.0.0.1").unwrap();
        adapter.create_character(&sample("Erek", account, 1)).unwrap();
        let result = adapter.create_character(&sample("Erek", account, 2));
        assert!(matches!(result, Err(WorldError::NameTaken)));
    }

    #[test]
    fn guild_accounts_lists_distinct_members() {
        let adapter = SqliteAdapter::open_in_memory().unwrap();
        let leader = adapter.create_account("leader", "pw", "127.0.0.1").unwrap();
        let member = adapter.create_account("member", "pw", "127.0.0.1").unwrap();
        let guild_id = adapter.create_guild("Iron Fist", leader).unwrap();
        adapter.add_guild_member(guild_id, member).unwrap();

        let accounts = adapter.guild_accounts(guild_id).unwrap();
        assert_eq!(accounts.len(), 2);
        assert!(accounts.contains(&leader));
        assert!(accounts.contains(&member));
    }
}
