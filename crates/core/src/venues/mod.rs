//! Venues module - venue profiles and the store read path.

mod in_memory_store;
mod venues_model;
mod venues_traits;

pub use in_memory_store::InMemoryVenueStore;
pub use venues_model::{Location, VenueProfile};
pub use venues_traits::{VenueProfileStore, VenueStream, VenueWriterTrait};
