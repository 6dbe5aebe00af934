//! # Repository Module
//!
//! Database repository implementations for Warehub.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Scan workflow / console                                               │
//! │       │                                                                 │
//! │       │  db.inventory().find_by_identifier("WHW-00001")                │
//! │       ▼                                                                 │
//! │  InventoryRepository                                                   │
//! │  ├── find_by_identifier(&self, value)                                  │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── insert(&self, item)                                               │
//! │  ├── update_quantity(&self, id, quantity)                              │
//! │  └── list / count / last_generated_sku                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod inventory;
