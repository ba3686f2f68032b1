//! # Storage Module
//!
//! Handles all data persistence for the point tracker.
//!
//! The domain layer only sees the traits in [`traits`]; the SQLite
//! implementation in [`sqlite`] is one backend behind them.
//!
//! ## Key Responsibilities
//!
//! - **Data Persistence**: classes, students, aspects/rules, staff, settings
//!   and the append-only point records
//! - **Storage Abstraction**: repositories created through a `Connection`
//! - **Schema Management**: tables created idempotently at connect time
//! - **Atomic Batches**: multi-row writes run inside one transaction

pub mod sqlite;
pub mod traits;

pub use sqlite::DbConnection;
pub use traits::*;
