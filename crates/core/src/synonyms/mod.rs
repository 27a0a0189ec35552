//! Synonyms module - regional terminology mapped to canonical taxonomy nodes.

mod synonym_model;
mod synonym_resolver;
mod synonym_table;

pub use synonym_model::{normalize_region, normalize_term, SynonymEntry, TermResolution};
pub use synonym_resolver::SynonymResolver;
pub use synonym_table::SynonymTable;
