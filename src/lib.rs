pub mod cli;
pub mod data;
pub mod norm;
pub mod targets;

pub mod prelude {
    pub use crate::data::{Batch, FieldStore, Sample, Tensor, Value};
    pub use crate::norm::{
        DenormalizedScope, Mask, NormError, NormKey, NormalizerTransform, SideTensors,
        denormalize_batch, denormalize_tensors, discover_norm_keys, with_denormalized,
    };
    pub use crate::targets::defs::{TargetConfig, TargetSet};
}
