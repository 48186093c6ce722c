pub mod batch;
pub mod json;
pub mod sample;

use ndarray::{Array1, ArrayD, arr0};
use thiserror::Error;

pub use batch::Batch;
pub use sample::Sample;

/// Dynamic-rank tensor used for every numeric field.
pub type Tensor = ArrayD<f64>;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("cannot collate an empty sample list")]
    EmptyBatch,
    #[error("field `{field}` is missing from sample {index}")]
    MissingField { field: String, index: usize },
    #[error(
        "field `{field}` in sample {index} has trailing shape {found:?}, expected {expected:?}"
    )]
    ShapeMismatch {
        field: String,
        index: usize,
        expected: Vec<usize>,
        found: Vec<usize>,
    },
    #[error("unsupported value for field `{field}`: {reason}")]
    UnsupportedValue { field: String, reason: String },
    #[error("field `{field}` holds non-finite value {value}, which JSON cannot represent")]
    NonFinite { field: String, value: f64 },
    #[error("shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A field value as produced by the upstream graph pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Tensor(Tensor),
    Float(f64),
    Int(i64),
    List(Vec<f64>),
}

impl Value {
    pub fn as_tensor(&self) -> Option<&Tensor> {
        match self {
            Value::Tensor(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_tensor(&self) -> bool {
        matches!(self, Value::Tensor(_))
    }

    /// Coerce into a tensor. Scalars become 0-d tensors, lists become 1-d.
    pub fn into_tensor(self) -> Tensor {
        match self {
            Value::Tensor(t) => t,
            Value::Float(v) => arr0(v).into_dyn(),
            Value::Int(v) => arr0(v as f64).into_dyn(),
            Value::List(v) => Array1::from_vec(v).into_dyn(),
        }
    }

    pub fn to_tensor(&self) -> Tensor {
        self.clone().into_tensor()
    }
}

impl From<Tensor> for Value {
    fn from(value: Tensor) -> Self {
        Value::Tensor(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<Vec<f64>> for Value {
    fn from(value: Vec<f64>) -> Self {
        Value::List(value)
    }
}

/// Named-field access shared by samples and batches.
pub trait FieldStore {
    fn field(&self, name: &str) -> Option<&Tensor>;

    fn set_field(&mut self, name: &str, value: Tensor);

    fn remove_field(&mut self, name: &str) -> Option<Tensor>;

    fn field_names(&self) -> Vec<&str>;

    fn has_field(&self, name: &str) -> bool {
        self.field_names().contains(&name)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/data/mod.rs"]
mod tests;
