pub mod json_loader;

pub use json_loader::{load_entity_subset, load_questions};
