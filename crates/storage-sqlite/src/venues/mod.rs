//! SQLite-backed venue profile store.

mod model;
mod repository;

pub use model::{VenueChangesetDB, VenueDB, VenueNodeAssignmentDB};
pub use repository::VenueRepository;
