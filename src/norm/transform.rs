use std::collections::HashSet;

use crate::data::{Sample, Tensor, Value};
use crate::norm::{NormError, NormKey};
use crate::targets::defs::{TargetConfig, TargetSet};

/// Standardizes configured targets and stamps their scale parameters.
#[derive(Debug, Clone)]
pub struct NormalizerTransform {
    targets: Vec<(NormKey, TargetConfig)>,
}

impl NormalizerTransform {
    /// Targets are processed in iteration order. Names carrying a reserved
    /// suffix or appearing twice are rejected. `std` is not checked.
    pub fn new<I, K>(targets: I) -> Result<Self, NormError>
    where
        I: IntoIterator<Item = (K, TargetConfig)>,
        K: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for (name, config) in targets {
            let name = name.into();
            if NormKey::is_reserved(&name) {
                return Err(NormError::ReservedSuffix(name));
            }
            if !seen.insert(name.clone()) {
                return Err(NormError::DuplicateTarget(name));
            }
            out.push((NormKey::new(name), config));
        }
        Ok(Self { targets: out })
    }

    pub fn from_targets(set: &TargetSet) -> Result<Self, NormError> {
        Self::new(set.iter())
    }

    pub fn targets(&self) -> impl Iterator<Item = (&NormKey, &TargetConfig)> {
        self.targets.iter().map(|(k, c)| (k, c))
    }

    /// Replaces each target with `(value - mean) / std` and writes `mean` and
    /// `std`, filled to the target's shape, next to it.
    ///
    /// Fails on the first target missing from `sample`. Targets processed
    /// before it stay transformed.
    pub fn apply<'s>(&self, sample: &'s mut Sample) -> Result<&'s mut Sample, NormError> {
        for (key, config) in &self.targets {
            let slot = sample
                .get_mut(key.as_str())
                .ok_or_else(|| NormError::MissingTarget(key.to_string()))?;

            let raw = std::mem::replace(slot, Value::Float(0.0)).into_tensor();
            let (mean, std) = (config.mean, config.std);
            let standardized = raw.mapv_into(|v| (v - mean) / std);
            let dim = standardized.raw_dim();
            *slot = Value::Tensor(standardized);

            sample.insert(key.mean_field(), Tensor::from_elem(dim.clone(), mean));
            sample.insert(key.std_field(), Tensor::from_elem(dim, std));
            tracing::trace!(target_name = key.as_str(), mean, std, "normalized target");
        }
        Ok(sample)
    }

    pub fn apply_all(&self, samples: &mut [Sample]) -> Result<(), NormError> {
        for sample in samples.iter_mut() {
            self.apply(sample)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/norm/transform.rs"]
mod tests;
