//! Utility helpers: JSON payload loading and value coercions shared by the
//! transformations and formatters.
pub mod serialization;
pub mod values;

pub use serialization::{load_task, read_payload, PayloadSource};
