//! SQLite storage implementation for Venuemap.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the venue store traits defined in `venuemap-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The venue profile repository
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! The core crate is database-agnostic and works with traits.
//!
//! ```text
//!        core (domain)
//!              │
//!              ▼
//!   storage-sqlite (this crate)
//!              │
//!              ▼
//!          SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod venues;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, open, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use venues::VenueRepository;

// Re-export from venuemap-core for convenience
pub use venuemap_core::errors::{DatabaseError, Error, Result};
