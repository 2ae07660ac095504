//! # Callsight Store
//!
//! SQLite persistence for call transcripts and analysis results:
//! - WAL mode with a small thread-safe connection pool
//! - versioned schema migrations applied on open
//! - typed CRUD returning [`callsight_core::StoreError`]
//!
//! Transcripts are immutable once created and analysis results are
//! append-only: re-analysis inserts new rows instead of updating old ones.

pub mod migration;
pub mod pool;
mod store;

pub use migration::{Migration, MigrationEngine};
pub use pool::{PooledConnection, SqlitePool};
pub use store::TranscriptStore;
