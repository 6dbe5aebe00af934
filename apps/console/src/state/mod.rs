//! # State Module
//!
//! Focused state types, each command takes only what it needs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────────┐   ┌──────────────────────────────────────────────┐   │
//! │  │   DbState    │   │              WorkflowState                   │   │
//! │  │              │   │                                              │   │
//! │  │  Database    │──►│  ScanWorkflow                                │   │
//! │  │  (SQLite     │   │   • ScanController (one session at a time)  │   │
//! │  │   pool)      │   │   • LookupResolver                          │   │
//! │  │              │   │   • QuantityAdjuster (change notices)       │   │
//! │  └──────────────┘   └──────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  • DbState: the pool is thread-safe, no locking                        │
//! │  • WorkflowState: the controller guards its own session slot           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod db;
mod workflow;

pub use db::DbState;
pub use workflow::WorkflowState;
