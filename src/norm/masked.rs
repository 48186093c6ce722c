use std::borrow::Cow;

use ndarray::Axis;

use crate::data::{FieldStore, Tensor};
use crate::norm::affine::{self, Direction};
use crate::norm::{NormError, NormKey, ScaleParams};

/// Row selector applied along axis 0 of the stamped scale tensors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mask {
    Bool(Vec<bool>),
    Index(Vec<usize>),
}

impl Mask {
    /// Row indices selected out of `len` rows.
    pub fn indices(&self, len: usize) -> Result<Vec<usize>, NormError> {
        match self {
            Mask::Bool(flags) => {
                if flags.len() != len {
                    return Err(NormError::InvalidMask(format!(
                        "boolean mask has {} entries for {len} rows",
                        flags.len()
                    )));
                }
                Ok(flags
                    .iter()
                    .enumerate()
                    .filter_map(|(i, keep)| keep.then_some(i))
                    .collect())
            }
            Mask::Index(indices) => {
                if let Some(bad) = indices.iter().find(|&&i| i >= len) {
                    return Err(NormError::InvalidMask(format!(
                        "index {bad} out of bounds for {len} rows"
                    )));
                }
                Ok(indices.clone())
            }
        }
    }

    pub fn select(&self, tensor: &Tensor) -> Result<Tensor, NormError> {
        if tensor.ndim() == 0 {
            return Err(NormError::InvalidMask("cannot mask a 0-d tensor".to_string()));
        }
        let indices = self.indices(tensor.len_of(Axis(0)))?;
        Ok(tensor.select(Axis(0), &indices))
    }
}

impl From<Vec<bool>> for Mask {
    fn from(value: Vec<bool>) -> Self {
        Mask::Bool(value)
    }
}

impl From<Vec<usize>> for Mask {
    fn from(value: Vec<usize>) -> Self {
        Mask::Index(value)
    }
}

/// Maps `tensors` to physical units with the scale parameters stamped for
/// `key` on the single batch in `batches`, optionally restricted by `mask`.
///
/// Neither the batch nor `tensors` is modified.
pub fn denormalize_tensors<S: FieldStore>(
    batches: &[S],
    key: &str,
    tensors: &[Tensor],
    mask: Option<&Mask>,
) -> Result<Vec<Tensor>, NormError> {
    rescale(batches, key, tensors, mask, Direction::Denormalize)
}

/// Inverse of [`denormalize_tensors`]: `(value - mean) / std`.
pub fn normalize_tensors<S: FieldStore>(
    batches: &[S],
    key: &str,
    tensors: &[Tensor],
    mask: Option<&Mask>,
) -> Result<Vec<Tensor>, NormError> {
    rescale(batches, key, tensors, mask, Direction::Normalize)
}

fn rescale<S: FieldStore>(
    batches: &[S],
    key: &str,
    tensors: &[Tensor],
    mask: Option<&Mask>,
    direction: Direction,
) -> Result<Vec<Tensor>, NormError> {
    let [batch] = batches else {
        return Err(NormError::MultiBatchNotSupported {
            count: batches.len(),
        });
    };
    let key = NormKey::new(key);
    let scale = ScaleParams::resolve(batch, &key)?;

    let (mean, std): (Cow<'_, Tensor>, Cow<'_, Tensor>) = match mask {
        Some(mask) => (
            Cow::Owned(mask.select(scale.mean)?),
            Cow::Owned(mask.select(scale.std)?),
        ),
        None => (Cow::Borrowed(scale.mean), Cow::Borrowed(scale.std)),
    };

    tensors
        .iter()
        .map(|value| -> Result<Tensor, NormError> {
            affine::check_broadcast(key.as_str(), &[value, &*std, &*mean])?;
            Ok(direction.apply(value, &mean, &std))
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/src_inline/norm/masked.rs"]
mod tests;
