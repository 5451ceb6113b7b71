//! # Database State
//!
//! Wraps the `Database` handle for use in command functions.
//!
//! ## Thread Safety
//! The `Database` struct from `fiado-db` contains a `SqlitePool`, which is
//! thread-safe. The single writer is serialized by `ShopState`, not here.

use std::path::{Path, PathBuf};

use fiado_db::Database;

/// Wrapper around `Database` plus the file it was opened from.
#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
    path: PathBuf,
}

impl DbState {
    /// Creates a new DbState wrapping the database connection.
    pub fn new(db: Database, path: impl Into<PathBuf>) -> Self {
        DbState {
            db,
            path: path.into(),
        }
    }

    /// Returns a reference to the inner Database.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let shop = db_state.inner().shop().load().await?;
    /// ```
    pub fn inner(&self) -> &Database {
        &self.db
    }

    /// Database file path (`:memory:` in tests).
    pub fn path(&self) -> &Path {
        &self.path
    }
}
