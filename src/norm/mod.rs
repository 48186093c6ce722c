//! Reversible per-target normalization.
//!
//! The forward transform stamps `<target>_norm_mean` and `<target>_norm_std`
//! onto each sample. Every later stage recovers the scale parameters from
//! those stamped fields alone, so batches can be denormalized long after the
//! target configuration is gone.

pub mod affine;
pub mod discover;
pub mod inverse;
pub mod key;
pub mod masked;
pub mod scoped;
pub mod transform;

use std::collections::BTreeMap;

use thiserror::Error;

use crate::data::Tensor;

pub use discover::discover_norm_keys;
pub use inverse::denormalize_batch;
pub use key::{MEAN_SUFFIX, NormKey, NormalizedField, STD_SUFFIX, ScaleParams};
pub use masked::{Mask, denormalize_tensors, normalize_tensors};
pub use scoped::{DenormalizedScope, with_denormalized};
pub use transform::NormalizerTransform;

/// Tensors kept outside any batch but scaled with a batch's parameters,
/// keyed by target name.
pub type SideTensors = BTreeMap<String, Tensor>;

#[derive(Debug, Error)]
pub enum NormError {
    #[error("target {0} not found in sample")]
    MissingTarget(String),
    #[error("expected exactly one batch, got {count}")]
    MultiBatchNotSupported { count: usize },
    #[error("normalized field {key} is missing {missing}")]
    MissingNormFields { key: String, missing: String },
    #[error("shapes for {key} do not broadcast: {shapes:?}")]
    ShapeMismatch { key: String, shapes: Vec<Vec<usize>> },
    #[error("invalid mask: {0}")]
    InvalidMask(String),
    #[error("target name {0} ends with a reserved normalization suffix")]
    ReservedSuffix(String),
    #[error("duplicate target: {0}")]
    DuplicateTarget(String),
    #[error("renormalization skipped for fields: {0:?}")]
    RenormalizeSkipped(Vec<String>),
}
