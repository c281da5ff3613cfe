//! Transformation library and the fail-safe chain that applies it.
//!
//! Each transformation is a pure function of `(value, config)`. A step only
//! errors when its config has the wrong shape; the chain turns any such error
//! into a revert to the pre-chain value.

use flowsmith_types::TransformKind;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

mod aggregate;
mod augment;
mod chain;
mod filter;
mod normalize;
mod sort;

pub use aggregate::AggregateTransform;
pub use augment::AugmentTransform;
pub use chain::{apply_all, ChainOutput};
pub use filter::FilterTransform;
pub use normalize::NormalizeTransform;
pub use sort::SortTransform;

#[derive(Debug, Error, PartialEq)]
pub enum TransformError {
    #[error("invalid {kind} config: {message}")]
    InvalidConfig {
        kind: TransformKind,
        message: String,
    },
}

/// Pure data-reshaping step applied by the chain.
pub trait Transformation: Send + Sync {
    fn kind(&self) -> TransformKind;
    fn apply(&self, value: Value, config: Option<&Value>) -> Result<Value, TransformError>;
}

/// Built-in implementation for a transformation kind.
pub fn transformation_for(kind: TransformKind) -> &'static dyn Transformation {
    match kind {
        TransformKind::Normalize => &NormalizeTransform,
        TransformKind::Filter => &FilterTransform,
        TransformKind::Augment => &AugmentTransform,
        TransformKind::Aggregate => &AggregateTransform,
        TransformKind::Sort => &SortTransform,
    }
}

/// Apply a single transformation kind to a value.
pub fn apply_transformation(
    kind: TransformKind,
    value: Value,
    config: Option<&Value>,
) -> Result<Value, TransformError> {
    transformation_for(kind).apply(value, config)
}

/// Decode a step config, treating an absent or null config as the default.
fn parse_config<T>(kind: TransformKind, config: Option<&Value>) -> Result<T, TransformError>
where
    T: DeserializeOwned + Default,
{
    match config {
        None | Some(Value::Null) => Ok(T::default()),
        Some(raw) => {
            serde_json::from_value(raw.clone()).map_err(|err| TransformError::InvalidConfig {
                kind,
                message: err.to_string(),
            })
        }
    }
}
