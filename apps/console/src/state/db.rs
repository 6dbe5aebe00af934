//! # Database State
//!
//! Wraps the `Database` connection for use in commands.

use std::sync::Arc;

use warehub_db::Database;
use warehub_scan::InventoryStore;

#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Returns a reference to the inner Database.
    pub fn inner(&self) -> &Database {
        &self.db
    }

    /// The database as the workflow's inventory store.
    pub fn store(&self) -> Arc<dyn InventoryStore> {
        Arc::new(self.db.clone())
    }
}
