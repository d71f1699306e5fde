pub mod memory;
pub mod migrations;
pub mod queries;
pub mod seed;
pub mod sqlite;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Result, bail};
use cachette_types::models::{Call, Message, NewCall, NewMessage, NewUser, User};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Capability surface shared by every backend. All operations are
/// read-or-append; records are never mutated or deleted once created, and
/// each backend assigns identifiers atomically in insertion order.
pub trait Store: Send + Sync {
    fn user(&self, id: i64) -> Result<Option<User>>;

    /// Exact-match lookup among active users only.
    fn user_by_access_code(&self, code: &str) -> Result<Option<User>>;

    fn create_user(&self, user: NewUser) -> Result<User>;

    fn users(&self) -> Result<Vec<User>>;

    /// All messages, ascending by creation order.
    fn messages(&self) -> Result<Vec<Message>>;

    fn create_message(&self, message: NewMessage) -> Result<Message>;

    /// Calls where the given user is caller or receiver, most recent first.
    fn calls_for(&self, user_id: i64) -> Result<Vec<Call>>;

    fn create_call(&self, call: NewCall) -> Result<Call>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Sqlite,
}

impl std::str::FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "memory" => Ok(StoreBackend::Memory),
            "sqlite" => Ok(StoreBackend::Sqlite),
            other => bail!("unknown store backend '{other}' (expected 'memory' or 'sqlite')"),
        }
    }
}

/// Construct the configured backend. `db_path` is only consulted for sqlite.
pub fn open(backend: StoreBackend, db_path: &Path) -> Result<Arc<dyn Store>> {
    Ok(match backend {
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
        StoreBackend::Sqlite => Arc::new(SqliteStore::open(db_path)?),
    })
}
