//! # Storage Module
//!
//! Handles all data persistence for the finance tracker.
//!
//! The embedded store is SQLite accessed through SQLx; one repository per
//! entity wraps a shared [`DbConnection`]. Repositories only move rows in
//! and out of the store — derived values (latest budget, category totals)
//! are computed by SQL queries, never cached here, and everything above
//! this layer treats the store as the single source of truth.
//!
//! Schema changes are handled by dropping and recreating the database file;
//! there is no forward migration of existing rows.

pub mod connection;
pub mod repositories;

pub use connection::DbConnection;
pub use repositories::{
    UserRepository,
    CategoryRepository,
    TransactionRepository,
    BudgetRepository,
    SessionRepository,
};
