//! End-to-end persistence scenarios (spec.md §8 S6, invariants 7-8) against
//! the `SqliteAdapter`, exercised only through the `PersistenceAdapter`
//! trait object the way a login/character handler would use it.

use core::types::{Guid, HighGuid};

use server::error::WorldError;
use server::persistence::sqlite_adapter::SqliteAdapter;
use server::persistence::{AccountHandle, CharacterRecord, LoginStatus, PersistenceAdapter};

fn adapter() -> Box<dyn PersistenceAdapter> {
    Box::new(SqliteAdapter::open_in_memory().unwrap())
}

/// S6 — Login path: no matching row -> NoSuchUser; after account_create, a
/// repeat login succeeds and yields a handle whose ip matches the one the
/// login was attempted from.
#[test]
fn s6_login_path_distinguishes_no_user_then_succeeds() {
    let adapter = adapter();

    assert_eq!(
        adapter.try_login("u", "p", "1.2.3.4").unwrap(),
        LoginStatus::NoSuchUser
    );

    let account_id = adapter.create_account("u", "p", "1.2.3.4").unwrap();
    assert_eq!(
        adapter.try_login("u", "p", "1.2.3.4").unwrap(),
        LoginStatus::Success(AccountHandle { id: account_id, ip: "1.2.3.4".to_string() })
    );
}

/// Invariant 7 — idempotent delete: deleting twice returns success both
/// times and leaves the store empty, not an error on the second call.
#[test]
fn invariant7_deleting_character_twice_is_idempotent() {
    let adapter = adapter();
    let account_id = adapter.create_account("erek", "hunter2", "127.0.0.1").unwrap();
    let record = CharacterRecord {
        guid: Guid::tagged(HighGuid::Player, 42),
        account_id,
        name: "Erek".to_string(),
        map_id: 0,
        x: 0.0,
        y: 0.0,
        z: 0.0,
        level: 1,
        gold: 0,
    };
    adapter.create_character(&record).unwrap();

    adapter.delete_character(record.guid).unwrap();
    adapter.delete_character(record.guid).unwrap();

    assert!(adapter.get_character_by_guid(record.guid).unwrap().is_none());
}

/// Invariant 8 — HighGuid transparency: a lookup by the tagged guid resolves
/// the same row as one by the bare name, since only the low bits are stored.
#[test]
fn invariant8_high_guid_lookup_matches_name_lookup() {
    let adapter = adapter();
    let account_id = adapter.create_account("erek", "hunter2", "127.0.0.1").unwrap();
    let guid = Guid::tagged(HighGuid::Player, 7);
    let record = CharacterRecord {
        guid,
        account_id,
        name: "Erek".to_string(),
        map_id: 0,
        x: 1.0,
        y: 2.0,
        z: 3.0,
        level: 5,
        gold: 100,
    };
    adapter.create_character(&record).unwrap();

    let by_guid = adapter.get_character_by_guid(guid).unwrap().unwrap();
    let by_name = adapter.get_character_by_name("Erek").unwrap().unwrap();
    assert_eq!(by_guid.guid, by_name.guid);
    assert_eq!(by_guid.guid.low(), 7);

    let dup = CharacterRecord { guid: Guid::tagged(HighGuid::Player, 8), ..record };
    let result = adapter.create_character(&dup);
    assert!(matches!(result, Err(WorldError::NameTaken)));
}
