//! # SQLite Storage Module
//!
//! - **connection.rs** - connection pool and schema setup
//! - **repositories/** - one repository per table family

pub mod connection;
pub mod repositories;

pub use connection::DbConnection;
pub use repositories::{
    AspectRepository, ClassRepository, RecordRepository, SettingsRepository, StaffRepository,
    StudentRepository,
};
