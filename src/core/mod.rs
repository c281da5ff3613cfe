pub mod cache;
pub mod config;
pub mod error;
pub mod format;
pub mod input;
pub mod outcome;
pub mod processor;
pub mod transform;
pub mod types;
pub mod validator;

pub use cache::{FifoCache, Fingerprint, ResultCache};
pub use config::{ConfigLoader, FlowsmithConfig};
pub use error::AppError;
pub use format::{format_output, format_value, OutputFormat};
pub use input::normalize_input;
pub use outcome::Outcome;
pub use processor::{DataProcessor, Degradation, ProcessingTrace, ProcessorSettings};
pub use transform::{apply_all, ChainOutput, TransformError, Transformation};
pub use types::*;
pub use validator::validate;
