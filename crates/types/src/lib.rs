//! Shared data model for flowsmith: task definitions handed to the pipeline and
//! the processing results it returns.

pub mod result;
pub mod task;

pub use result::{ProcessingMetadata, ProcessingResult};
pub use task::{
    DataProcessingParams, Task, TaskParameters, TransformKind, TransformStep,
    DATA_PROCESSING_ACTION,
};
