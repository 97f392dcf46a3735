pub mod memory;
pub mod migrations;
pub mod queries;

use anyhow::Result;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

pub use memory::MemoryTokenStore;

/// Key the session token is stored under.
pub const TOKEN_KEY: &str = "token";

/// Persistence for the single opaque session token.
pub trait TokenStore: Send + Sync {
    fn load_token(&self) -> Result<Option<String>>;
    fn save_token(&self, token: &str) -> Result<()>;
    fn clear_token(&self) -> Result<()>;
}

impl<T: TokenStore + ?Sized> TokenStore for Arc<T> {
    fn load_token(&self) -> Result<Option<String>> {
        (**self).load_token()
    }

    fn save_token(&self, token: &str) -> Result<()> {
        (**self).save_token(token)
    }

    fn clear_token(&self) -> Result<()> {
        (**self).clear_token()
    }
}

/// SQLite-backed key/value storage, the desktop stand-in for browser
/// local storage.
pub struct LocalStorage {
    conn: Mutex<Connection>,
}

impl LocalStorage {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        migrations::run(&conn)?;

        info!("Local storage opened at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        migrations::run(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(|e| anyhow::anyhow!("storage lock poisoned: {}", e))?;
        f(&conn)
    }
}

impl TokenStore for LocalStorage {
    fn load_token(&self) -> Result<Option<String>> {
        self.get_item(TOKEN_KEY)
    }

    fn save_token(&self, token: &str) -> Result<()> {
        self.set_item(TOKEN_KEY, token)
    }

    fn clear_token(&self) -> Result<()> {
        self.remove_item(TOKEN_KEY)
    }
}
