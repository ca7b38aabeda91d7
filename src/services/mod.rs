pub mod entity_extractor;
pub mod progress_writer;
pub mod reference_validator;
pub mod statistics;

pub use entity_extractor::EntityExtractor;
pub use progress_writer::ProgressWriter;
pub use statistics::{calculate_statistics, Statistics};
