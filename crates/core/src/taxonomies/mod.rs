//! Taxonomies module - the venue classification hierarchy.
//!
//! Category -> Subcategory -> required amenity tags, loaded as versioned,
//! immutable snapshots and published through a [`RegistryHandle`].

mod registry_handle;
mod taxonomy_errors;
mod taxonomy_model;
mod taxonomy_registry;
mod taxonomy_service;
mod taxonomy_traits;

pub use registry_handle::RegistryHandle;
pub use taxonomy_errors::{SchemaError, TaxonomyError};
pub use taxonomy_model::{
    AmenityTag, NodeKind, SnapshotSummary, TaxonomyNode, TaxonomySnapshot, VenueType,
};
pub use taxonomy_registry::TaxonomyRegistry;
pub use taxonomy_service::TaxonomyService;
pub use taxonomy_traits::TaxonomyServiceTrait;
