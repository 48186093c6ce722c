use std::borrow::Borrow;
use std::fmt;

use crate::data::{FieldStore, Tensor};
use crate::norm::NormError;
use crate::norm::affine;

pub const MEAN_SUFFIX: &str = "_norm_mean";
pub const STD_SUFFIX: &str = "_norm_std";

/// Base name of a normalized field.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NormKey(String);

impl NormKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn mean_field(&self) -> String {
        format!("{}{MEAN_SUFFIX}", self.0)
    }

    pub fn std_field(&self) -> String {
        format!("{}{STD_SUFFIX}", self.0)
    }

    /// True for names that would collide with a stamped scale field.
    pub fn is_reserved(name: &str) -> bool {
        name.ends_with(MEAN_SUFFIX) || name.ends_with(STD_SUFFIX)
    }
}

impl fmt::Display for NormKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NormKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NormKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Stamped mean/std for one key, borrowed from a store.
#[derive(Debug, Clone, Copy)]
pub struct ScaleParams<'a> {
    pub mean: &'a Tensor,
    pub std: &'a Tensor,
}

impl<'a> ScaleParams<'a> {
    pub fn resolve<S: FieldStore + ?Sized>(store: &'a S, key: &NormKey) -> Result<Self, NormError> {
        let mean = require(store, key, key.mean_field())?;
        let std = require(store, key, key.std_field())?;
        Ok(Self { mean, std })
    }

    /// Checks that `value` can be mapped with these parameters.
    pub fn check(&self, key: &NormKey, value: &Tensor) -> Result<(), NormError> {
        affine::check_broadcast(key.as_str(), &[value, self.std, self.mean])
    }

    pub fn denormalize(&self, value: &Tensor) -> Tensor {
        affine::denormalize(value, self.mean, self.std)
    }

    pub fn normalize(&self, value: &Tensor) -> Tensor {
        affine::normalize(value, self.mean, self.std)
    }
}

/// A value together with the scale parameters stamped next to it.
///
/// Construction fails unless all three fields exist and broadcast together.
#[derive(Debug, Clone, Copy)]
pub struct NormalizedField<'a> {
    pub value: &'a Tensor,
    pub mean: &'a Tensor,
    pub std: &'a Tensor,
}

impl<'a> NormalizedField<'a> {
    pub fn resolve<S: FieldStore + ?Sized>(store: &'a S, key: &NormKey) -> Result<Self, NormError> {
        let scale = ScaleParams::resolve(store, key)?;
        let value = require(store, key, key.as_str().to_string())?;
        scale.check(key, value)?;
        Ok(Self {
            value,
            mean: scale.mean,
            std: scale.std,
        })
    }

    pub fn scale(&self) -> ScaleParams<'a> {
        ScaleParams {
            mean: self.mean,
            std: self.std,
        }
    }

    /// `value * std + mean`
    pub fn denormalized(&self) -> Tensor {
        affine::denormalize(self.value, self.mean, self.std)
    }

    /// `(value - mean) / std`
    pub fn normalized(&self) -> Tensor {
        affine::normalize(self.value, self.mean, self.std)
    }
}

fn require<'a, S: FieldStore + ?Sized>(
    store: &'a S,
    key: &NormKey,
    name: String,
) -> Result<&'a Tensor, NormError> {
    store.field(&name).ok_or_else(|| NormError::MissingNormFields {
        key: key.to_string(),
        missing: name,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/norm/key.rs"]
mod tests;
