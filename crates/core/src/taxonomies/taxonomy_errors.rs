//! Taxonomy error types.

use thiserror::Error;

/// Errors raised by registry loads and lookups.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TaxonomyError {
    /// The snapshot violates a structural invariant; the load is abandoned
    /// and the previously published snapshot stays active.
    #[error("Invalid taxonomy snapshot: {0}")]
    Schema(#[from] SchemaError),

    #[error("Taxonomy node '{0}' not found")]
    NodeNotFound(String),

    #[error("Taxonomy node '{0}' is not a category")]
    NotACategory(String),

    #[error("Unknown term '{term}' for region '{region_code}'")]
    UnknownTerm { region_code: String, term: String },
}

/// Structural violations detected while loading a snapshot.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Snapshot document is malformed: {0}")]
    Malformed(String),

    #[error("Field '{field}' must not be empty ({context})")]
    EmptyField { field: &'static str, context: String },

    #[error("Duplicate node id '{0}'")]
    DuplicateNodeId(String),

    #[error("Duplicate amenity tag '{0}'")]
    DuplicateAmenityTag(String),

    #[error("Category '{0}' must not have a parent")]
    CategoryWithParent(String),

    #[error("Subcategory '{0}' has no parent")]
    MissingParent(String),

    #[error("Subcategory '{node_id}' references missing parent '{parent_id}'")]
    OrphanSubcategory { node_id: String, parent_id: String },

    #[error("Subcategory '{node_id}' has parent '{parent_id}' which is not a category")]
    NestedSubcategory { node_id: String, parent_id: String },

    #[error("Node '{node_id}' requires undeclared amenity tag '{tag}'")]
    UnknownAmenityTag { node_id: String, tag: String },

    #[error("Category '{category_id}' declares {actual} subcategories, expected {expected}")]
    SubcategoryCount {
        category_id: String,
        expected: usize,
        actual: usize,
    },

    #[error("Duplicate synonym '{local_term}' for region '{region_code}'")]
    DuplicateSynonym {
        region_code: String,
        local_term: String,
    },

    #[error("Synonym '{local_term}' ({region_code}) targets missing node '{node_id}'")]
    SynonymTargetMissing {
        region_code: String,
        local_term: String,
        node_id: String,
    },

    #[error("Synonym '{local_term}' ({region_code}) targets retired node '{node_id}'")]
    SynonymTargetRetired {
        region_code: String,
        local_term: String,
        node_id: String,
    },
}
