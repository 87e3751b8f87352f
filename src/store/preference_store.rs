/// SQLite-backed user preferences (one-shot hints and similar flags).
///
/// Without an open database the store keeps flags in memory for the session,
/// so callers never have to care whether persistence is available.
use crate::core::config;
use crate::core::error::StoreError;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;

pub struct PreferenceStore {
    conn: Option<Connection>,
    session: HashMap<String, bool>,
}

impl PreferenceStore {
    /// A session-only store.
    pub fn new() -> Self {
        Self {
            conn: None,
            session: HashMap::new(),
        }
    }

    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(db_path)?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    /// Open the database, falling back to a session-only store on failure.
    pub fn open_or_session(db_path: impl AsRef<Path>) -> Self {
        let path = db_path.as_ref();
        match Self::open(path) {
            Ok(store) => store,
            Err(e) => {
                log::warn!(
                    "preferences at {} unavailable, using session store: {}",
                    path.display(),
                    e
                );
                Self::new()
            }
        }
    }

    pub fn is_persistent(&self) -> bool {
        self.conn.is_some()
    }

    pub fn close(&mut self) {
        self.conn = None;
    }

    // ===== Flags =====

    pub fn flag(&self, key: &str) -> bool {
        let Some(conn) = &self.conn else {
            return self.session.get(key).copied().unwrap_or(false);
        };

        let value: Result<Option<bool>, rusqlite::Error> = conn
            .query_row(
                "SELECT value FROM flags WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional();

        match value {
            Ok(v) => v.unwrap_or(false),
            Err(e) => {
                log::warn!("failed to read preference {}: {}", key, e);
                self.session.get(key).copied().unwrap_or(false)
            }
        }
    }

    pub fn set_flag(&mut self, key: &str, value: bool) {
        self.session.insert(key.to_string(), value);

        let Some(conn) = &self.conn else {
            return;
        };
        if let Err(e) = conn.execute(
            "INSERT OR REPLACE INTO flags (key, value) VALUES (?1, ?2)",
            params![key, value],
        ) {
            log::warn!("failed to persist preference {}: {}", key, e);
        }
    }

    // ===== Navigation hint =====

    pub fn navigation_hint_seen(&self) -> bool {
        self.flag(config::PREF_NAVIGATION_HINT_SEEN)
    }

    pub fn mark_navigation_hint_seen(&mut self) {
        self.set_flag(config::PREF_NAVIGATION_HINT_SEEN, true);
    }

    // ===== Internal =====

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS flags (
                key         TEXT PRIMARY KEY,
                value       INTEGER NOT NULL,
                updated_at  INTEGER DEFAULT (strftime('%s','now'))
            );
            ",
        )?;
        Ok(Self {
            conn: Some(conn),
            session: HashMap::new(),
        })
    }
}

impl Default for PreferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_store_flags() {
        let mut store = PreferenceStore::new();
        assert!(!store.is_persistent());
        assert!(!store.navigation_hint_seen());
        store.mark_navigation_hint_seen();
        assert!(store.navigation_hint_seen());
    }

    #[test]
    fn test_in_memory_database() {
        let mut store = PreferenceStore::open_in_memory().unwrap();
        assert!(store.is_persistent());
        assert!(!store.flag("x"));
        store.set_flag("x", true);
        assert!(store.flag("x"));
        store.set_flag("x", false);
        assert!(!store.flag("x"));
    }

    #[test]
    fn test_flag_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.db");
        {
            let mut store = PreferenceStore::open(&path).unwrap();
            store.mark_navigation_hint_seen();
        }
        let store = PreferenceStore::open(&path).unwrap();
        assert!(store.navigation_hint_seen());
    }

    #[test]
    fn test_unopenable_path_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened as a database file
        let mut store = PreferenceStore::open_or_session(dir.path());
        assert!(!store.is_persistent());
        store.mark_navigation_hint_seen();
        assert!(store.navigation_hint_seen());
    }
}
