//! Venuemap Core - venue taxonomy, regional synonyms and explainable matching.
//!
//! This crate contains the engine's domain logic. It is storage-agnostic and
//! defines the `VenueProfileStore` read path implemented by the
//! `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod matching;
pub mod settings;
pub mod synonyms;
pub mod taxonomies;
pub mod validation;
pub mod venues;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
