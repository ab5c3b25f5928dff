// SPDX-FileCopyrightText: 2026 Caplink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed key-value preference store.
//!
//! Values are stored as JSON text in a single table. All access goes through
//! tokio-rusqlite's single background connection; a watch channel carries a
//! revision counter that bumps after every successful mutation so observers
//! can re-snapshot.

use std::collections::BTreeMap;
use std::path::Path;

use rusqlite::OptionalExtension;
use tokio::sync::watch;
use tokio_rusqlite::Connection;
use tracing::debug;

use caplink_core::{CaplinkError, ConfigValue};

/// Helper to convert tokio_rusqlite errors into CaplinkError::Store.
fn store_err(e: tokio_rusqlite::Error) -> CaplinkError {
    CaplinkError::Store {
        source: Box::new(e),
    }
}

fn codec_err(e: serde_json::Error) -> CaplinkError {
    CaplinkError::Store {
        source: Box::new(e),
    }
}

/// Persistent preference store with typed values and change notification.
pub struct LocalConfigStore {
    conn: Connection,
    revision: watch::Sender<u64>,
}

impl LocalConfigStore {
    /// Open (creating if needed) the store at `path`.
    pub async fn open(path: &Path) -> Result<Self, CaplinkError> {
        let conn = Connection::open(path)
            .await
            .map_err(tokio_rusqlite::Error::from)
            .map_err(store_err)?;
        let store = Self::init(conn).await?;
        debug!(path = %path.display(), "local config store opened");
        Ok(store)
    }

    /// Open an in-memory store, used in tests and ephemeral hosts.
    pub async fn open_in_memory() -> Result<Self, CaplinkError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(tokio_rusqlite::Error::from)
            .map_err(store_err)?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self, CaplinkError> {
        conn.call(|conn| {
            conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS local_config (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );",
            )?;
            Ok(())
        })
        .await
        .map_err(store_err)?;
        let (revision, _) = watch::channel(0u64);
        Ok(Self { conn, revision })
    }

    /// Subscribe to the revision counter; it bumps after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn bump(&self) {
        self.revision.send_modify(|r| *r += 1);
    }

    /// Insert or replace one value.
    pub async fn set(&self, key: &str, value: ConfigValue) -> Result<(), CaplinkError> {
        let key = key.to_string();
        let json = serde_json::to_string(&value).map_err(codec_err)?;
        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO local_config (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    rusqlite::params![key, json],
                )?;
                Ok(())
            })
            .await
            .map_err(store_err)?;
        self.bump();
        Ok(())
    }

    /// Insert or replace many values in one transaction.
    pub async fn set_many(&self, entries: Vec<(String, ConfigValue)>) -> Result<(), CaplinkError> {
        let mut rows = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            rows.push((key, serde_json::to_string(&value).map_err(codec_err)?));
        }
        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                for (key, json) in rows {
                    tx.execute(
                        "INSERT INTO local_config (key, value) VALUES (?1, ?2)
                         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                        rusqlite::params![key, json],
                    )?;
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(store_err)?;
        self.bump();
        Ok(())
    }

    /// Remove one key. No-op if absent.
    pub async fn reset(&self, key: &str) -> Result<(), CaplinkError> {
        let key = key.to_string();
        self.conn
            .call(move |conn| {
                conn.execute("DELETE FROM local_config WHERE key = ?1", rusqlite::params![key])?;
                Ok(())
            })
            .await
            .map_err(store_err)?;
        self.bump();
        Ok(())
    }

    /// Remove many keys in one transaction.
    pub async fn reset_many(&self, keys: Vec<String>) -> Result<(), CaplinkError> {
        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                for key in keys {
                    tx.execute("DELETE FROM local_config WHERE key = ?1", rusqlite::params![key])?;
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(store_err)?;
        self.bump();
        Ok(())
    }

    /// Remove every key.
    pub async fn reset_all(&self) -> Result<(), CaplinkError> {
        self.conn
            .call(|conn| {
                conn.execute("DELETE FROM local_config", [])?;
                Ok(())
            })
            .await
            .map_err(store_err)?;
        self.bump();
        Ok(())
    }

    /// Read one value.
    pub async fn get(&self, key: &str) -> Result<Option<ConfigValue>, CaplinkError> {
        let key = key.to_string();
        let json: Option<String> = self
            .conn
            .call(move |conn| {
                let value = conn
                    .query_row(
                        "SELECT value FROM local_config WHERE key = ?1",
                        rusqlite::params![key],
                        |row| row.get(0),
                    )
                    .optional()?;
                Ok(value)
            })
            .await
            .map_err(store_err)?;
        match json {
            Some(json) => Ok(Some(serde_json::from_str(&json).map_err(codec_err)?)),
            None => Ok(None),
        }
    }

    /// Full contents, sorted by key.
    pub async fn snapshot(&self) -> Result<BTreeMap<String, ConfigValue>, CaplinkError> {
        let rows: Vec<(String, String)> = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare("SELECT key, value FROM local_config")?;
                let rows = stmt
                    .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
            .map_err(store_err)?;

        let mut snapshot = BTreeMap::new();
        for (key, json) in rows {
            snapshot.insert(key, serde_json::from_str(&json).map_err(codec_err)?);
        }
        Ok(snapshot)
    }
}
