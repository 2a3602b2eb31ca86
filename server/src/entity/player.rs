//! Player tail data, including the session outbox link and the
//! friends/ignore-list broadcast gate (SPEC_FULL.md supplemented feature,
//! grounded on `Cell.send_all`'s `use_ignore` / `friends_manager.has_ignore`
//! check in `GridManager.py`).

use std::collections::HashSet;

use core::types::Guid;

use crate::session::SessionHandle;

#[derive(Debug)]
pub struct PlayerData {
    pub session: SessionHandle,
    pub online: bool,
    /// Guids this player has put on ignore. A broadcast with the ignore gate
    /// enabled skips this player when the packet's source guid is in here.
    pub ignore_list: HashSet<Guid>,
    pub account_id: u64,
}

impl PlayerData {
    pub fn new(session: SessionHandle, account_id: u64) -> Self {
        PlayerData { session, online: true, ignore_list: HashSet::new(), account_id }
    }

    pub fn ignores(&self, guid: Guid) -> bool {
        self.ignore_list.contains(&guid)
    }
}
