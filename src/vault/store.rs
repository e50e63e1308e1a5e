//! SQLite persistence for a vault file.
//!
//! `VaultStore` is an opaque-blob layer: every value it reads or writes
//! is already ciphertext (or public metadata).  It never sees a
//! passphrase or key, and performs no cryptography.
//!
//! Schema (shared with every existing `.she` file):
//!
//! ```text
//! metadata(uuid TEXT, salt BLOB, verify BLOB, verify_iv BLOB)
//! entries(id INTEGER PRIMARY KEY AUTOINCREMENT,
//!         name BLOB, name_iv BLOB, username BLOB, username_iv BLOB,
//!         password BLOB, password_iv BLOB, auto_enabled INTEGER DEFAULT 0)
//! ```

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, ErrorCode, OpenFlags, OptionalExtension, Row};
use tracing::{debug, warn};

use super::entry::{EntryField, EntryRow, VaultMetadata};
use crate::crypto::Sealed;
use crate::errors::{Result, ShecretsError};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS metadata (
        uuid       TEXT NOT NULL,
        salt       BLOB NOT NULL,
        verify     BLOB NOT NULL,
        verify_iv  BLOB NOT NULL
    );

    CREATE TABLE IF NOT EXISTS entries (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        name          BLOB NOT NULL,
        name_iv       BLOB NOT NULL,
        username      BLOB NOT NULL,
        username_iv   BLOB NOT NULL,
        password      BLOB NOT NULL,
        password_iv   BLOB NOT NULL,
        auto_enabled  INTEGER DEFAULT 0
    );
";

/// An open vault file.  Dropping it (or calling `close`) releases the
/// underlying database handle.
pub struct VaultStore {
    conn: Connection,
    path: PathBuf,
}

impl VaultStore {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Open an existing vault file for reading and writing.
    ///
    /// Never creates the file: a missing path is `VaultNotFound`.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ShecretsError::VaultNotFound(path.to_path_buf()));
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        debug!(path = %path.display(), "opened vault file");

        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Create a new, empty database file at `path`.
    pub fn create(path: &Path) -> Result<Self> {
        if path.exists() {
            return Err(ShecretsError::VaultAlreadyExists(path.to_path_buf()));
        }

        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "created vault file");

        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Open an in-memory store (used by tests).
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
            path: PathBuf::from(":memory:"),
        })
    }

    /// Close the database handle, surfacing any error from SQLite.
    pub fn close(self) -> Result<()> {
        let path = self.path;
        self.conn.close().map_err(|(_, e)| e)?;
        debug!(path = %path.display(), "closed vault file");
        Ok(())
    }

    /// Returns the path to the vault file on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    // ------------------------------------------------------------------
    // Schema and metadata
    // ------------------------------------------------------------------

    /// Create the `metadata` and `entries` tables if they do not exist.
    pub fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Insert the vault's metadata row.
    pub fn insert_metadata(&self, meta: &VaultMetadata) -> Result<()> {
        self.conn.execute(
            "INSERT INTO metadata (uuid, salt, verify, verify_iv) VALUES (?1, ?2, ?3, ?4)",
            params![meta.uuid, meta.salt, meta.verify.ciphertext, meta.verify.nonce],
        )?;
        Ok(())
    }

    /// Read the metadata row.
    ///
    /// Returns `None` when the file is not a vault: not a database at
    /// all, corrupt pages, no `metadata` table, no row, or a row of the
    /// wrong shape.
    pub fn get_metadata(&self) -> Result<Option<VaultMetadata>> {
        let result = self
            .conn
            .query_row(
                "SELECT uuid, salt, verify, verify_iv FROM metadata ORDER BY rowid LIMIT 1",
                [],
                |row| {
                    Ok(VaultMetadata {
                        uuid: row.get(0)?,
                        salt: row.get(1)?,
                        verify: Sealed {
                            ciphertext: row.get(2)?,
                            nonce: row.get(3)?,
                        },
                    })
                },
            )
            .optional();

        match result {
            Ok(meta) => Ok(meta),
            Err(e) if is_not_a_vault(&e) => {
                warn!(path = %self.path.display(), error = %e, "file has no usable metadata");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    // ------------------------------------------------------------------
    // Entries
    // ------------------------------------------------------------------

    /// Insert a new entry with `auto_enabled = 0`, returning its id.
    pub fn insert_entry(&self, name: &Sealed, username: &Sealed, password: &Sealed) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO entries (name, name_iv, username, username_iv, password, password_iv)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                name.ciphertext,
                name.nonce,
                username.ciphertext,
                username.nonce,
                password.ciphertext,
                password.nonce,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(id, "inserted entry");
        Ok(id)
    }

    /// All entry rows in id (creation) order.
    pub fn list_entries(&self) -> Result<Vec<EntryRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, name_iv, username, username_iv, password, password_iv, auto_enabled
             FROM entries ORDER BY id",
        )?;
        let rows = stmt.query_map([], entry_from_row)?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    /// A single entry row by id.
    pub fn get_entry(&self, id: i64) -> Result<Option<EntryRow>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, name_iv, username, username_iv, password, password_iv, auto_enabled
                 FROM entries WHERE id = ?1",
                params![id],
                entry_from_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Hard-delete an entry.  Returns `false` if no row had that id.
    pub fn remove_entry(&self, id: i64) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM entries WHERE id = ?1", params![id])?;
        debug!(id, changed, "removed entry");
        Ok(changed > 0)
    }

    /// Replace one field's ciphertext and nonce, leaving the rest of the
    /// row untouched.  Returns `false` if no row had that id.
    pub fn update_entry_field(&self, id: i64, field: EntryField, value: &Sealed) -> Result<bool> {
        let (data_col, iv_col) = field.columns();
        let sql = format!("UPDATE entries SET {data_col} = ?1, {iv_col} = ?2 WHERE id = ?3");
        let changed = self
            .conn
            .execute(&sql, params![value.ciphertext, value.nonce, id])?;
        debug!(id, field = field.label(), changed, "updated entry field");
        Ok(changed > 0)
    }

    /// Set the auto flag.  Returns `false` if no row had that id.
    pub fn set_auto_enabled(&self, id: i64, enabled: bool) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE entries SET auto_enabled = ?1 WHERE id = ?2",
            params![i64::from(enabled), id],
        )?;
        debug!(id, enabled, changed, "set auto flag");
        Ok(changed > 0)
    }
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<EntryRow> {
    let auto: Option<i64> = row.get(7)?;
    Ok(EntryRow {
        id: row.get(0)?,
        name: Sealed {
            ciphertext: row.get(1)?,
            nonce: row.get(2)?,
        },
        username: Sealed {
            ciphertext: row.get(3)?,
            nonce: row.get(4)?,
        },
        password: Sealed {
            ciphertext: row.get(5)?,
            nonce: row.get(6)?,
        },
        auto_enabled: auto == Some(1),
    })
}

/// Errors that mean "this file is not a readable vault" rather than an
/// operational failure.
fn is_not_a_vault(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, msg) => {
            e.code == ErrorCode::NotADatabase
                || e.code == ErrorCode::DatabaseCorrupt
                || msg
                    .as_deref()
                    .is_some_and(|m| m.starts_with("no such table") || m.starts_with("no such column"))
        }
        rusqlite::Error::InvalidColumnType(..) | rusqlite::Error::FromSqlConversionFailure(..) => {
            true
        }
        _ => false,
    }
}
