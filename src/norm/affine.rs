use crate::data::Tensor;
use crate::norm::NormError;

/// NumPy-style broadcast shape of `shapes`, or `None` if they conflict.
pub fn broadcast_shape(shapes: &[&[usize]]) -> Option<Vec<usize>> {
    let ndim = shapes.iter().map(|s| s.len()).max().unwrap_or(0);
    let mut out = vec![1usize; ndim];
    for shape in shapes {
        let offset = ndim - shape.len();
        for (i, &dim) in shape.iter().enumerate() {
            let slot = &mut out[offset + i];
            if *slot == 1 {
                *slot = dim;
            } else if dim != 1 && dim != *slot {
                return None;
            }
        }
    }
    Some(out)
}

pub(crate) fn check_broadcast(key: &str, tensors: &[&Tensor]) -> Result<(), NormError> {
    let shapes: Vec<&[usize]> = tensors.iter().map(|t| t.shape()).collect();
    match broadcast_shape(&shapes) {
        Some(_) => Ok(()),
        None => Err(NormError::ShapeMismatch {
            key: key.to_string(),
            shapes: shapes.iter().map(|s| s.to_vec()).collect(),
        }),
    }
}

/// `value * std + mean`. Shapes must already be known to broadcast.
pub fn denormalize(value: &Tensor, mean: &Tensor, std: &Tensor) -> Tensor {
    let scaled = value * std;
    &scaled + mean
}

/// `(value - mean) / std`. Shapes must already be known to broadcast.
pub fn normalize(value: &Tensor, mean: &Tensor, std: &Tensor) -> Tensor {
    let centered = value - mean;
    &centered / std
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Denormalize,
    Normalize,
}

impl Direction {
    pub(crate) fn apply(self, value: &Tensor, mean: &Tensor, std: &Tensor) -> Tensor {
        match self {
            Direction::Denormalize => denormalize(value, mean, std),
            Direction::Normalize => normalize(value, mean, std),
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Direction::Denormalize => "denormalize",
            Direction::Normalize => "normalize",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/norm/affine.rs"]
mod tests;
