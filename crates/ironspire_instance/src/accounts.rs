//! Capacity-gated account-level collections shared by login and realm code
//! (C11, §4.11). The same generic container backs both the player manager
//! (online character sessions) and the world manager (connected realm/world
//! nodes); this crate is agnostic to what `T` actually is.

use rustc_hash::FxHashMap;

use crate::error::AccountManagerError;

pub struct AccountManager<T> {
    capacity: usize,
    by_id: FxHashMap<u64, T>,
    id_by_name: FxHashMap<String, u64>,
}

impl<T> AccountManager<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            by_id: FxHashMap::default(),
            id_by_name: FxHashMap::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn capacity_reached(&self) -> bool {
        self.by_id.len() >= self.capacity
    }

    /// Adds `value` under `account_id`/`account_name` (§4.11 `add`).
    /// Account names are matched case-insensitively, mirroring how login
    /// servers in this domain treat account names.
    pub fn add(&mut self, account_id: u64, account_name: &str, value: T) -> Result<(), AccountManagerError> {
        if self.capacity_reached() {
            return Err(AccountManagerError::CapacityReached);
        }
        if self.by_id.contains_key(&account_id) {
            return Err(AccountManagerError::DuplicateAccountId);
        }
        let key = account_name.to_ascii_lowercase();
        if self.id_by_name.contains_key(&key) {
            return Err(AccountManagerError::DuplicateAccountName);
        }
        self.id_by_name.insert(key, account_id);
        self.by_id.insert(account_id, value);
        Ok(())
    }

    /// Removes the entry for `account_id` on disconnect (§4.11
    /// `remove-on-disconnect`). A miss is not an error: disconnect handling
    /// must be idempotent against a session that never finished joining.
    pub fn remove_on_disconnect(&mut self, account_id: u64) -> Option<T> {
        let value = self.by_id.remove(&account_id)?;
        self.id_by_name.retain(|_, id| *id != account_id);
        Some(value)
    }

    pub fn by_account_id(&self, account_id: u64) -> Option<&T> {
        self.by_id.get(&account_id)
    }

    pub fn by_account_id_mut(&mut self, account_id: u64) -> Option<&mut T> {
        self.by_id.get_mut(&account_id)
    }

    pub fn by_account_name(&self, account_name: &str) -> Option<&T> {
        let id = self.id_by_name.get(&account_name.to_ascii_lowercase())?;
        self.by_id.get(id)
    }
}

/// Online player character sessions, capacity-gated by `player_capacity`
/// (§4.11, [`ironspire_core::ServerConfig::player_capacity`]).
pub type PlayerManager<T> = AccountManager<T>;

/// Connected realm/world nodes, capacity-gated by `world_capacity`
/// ([`ironspire_core::ServerConfig::world_capacity`]).
pub type WorldManager<T> = AccountManager<T>;
