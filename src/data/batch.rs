use std::collections::BTreeMap;

use ndarray::{ArrayViewD, Axis, concatenate};

use crate::data::{DataError, FieldStore, Sample, Tensor};

/// Several samples stacked along axis 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    fields: BTreeMap<String, Tensor>,
    num_samples: usize,
}

impl Batch {
    pub fn new(num_samples: usize) -> Self {
        Self {
            fields: BTreeMap::new(),
            num_samples,
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: Tensor) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tensor)> {
        self.fields.iter().map(|(n, t)| (n.as_str(), t))
    }

    /// Concatenates every field of `samples` along axis 0.
    ///
    /// Scalar fields are stacked into a 1-d tensor of length
    /// `samples.len()`. All samples must carry the same field names and
    /// agree on every axis but the first.
    pub fn collate(samples: &[Sample]) -> Result<Self, DataError> {
        let first = samples.first().ok_or(DataError::EmptyBatch)?;

        for (index, sample) in samples.iter().enumerate() {
            for name in sample.names() {
                if !first.contains(name) {
                    return Err(DataError::MissingField {
                        field: name.to_string(),
                        index: 0,
                    });
                }
            }
            for name in first.names() {
                if !sample.contains(name) {
                    return Err(DataError::MissingField {
                        field: name.to_string(),
                        index,
                    });
                }
            }
        }

        let mut batch = Batch::new(samples.len());
        for name in first.names() {
            let mut parts = Vec::with_capacity(samples.len());
            for sample in samples {
                let Some(value) = sample.get(name) else {
                    continue;
                };
                let tensor = value.to_tensor();
                let tensor = if tensor.ndim() == 0 {
                    tensor.insert_axis(Axis(0))
                } else {
                    tensor
                };
                parts.push(tensor);
            }

            let expected = parts[0].shape()[1..].to_vec();
            for (index, part) in parts.iter().enumerate() {
                if part.shape()[1..] != expected[..] {
                    return Err(DataError::ShapeMismatch {
                        field: name.to_string(),
                        index,
                        expected,
                        found: part.shape()[1..].to_vec(),
                    });
                }
            }

            let views: Vec<ArrayViewD<'_, f64>> = parts.iter().map(|p| p.view()).collect();
            let stacked = concatenate(Axis(0), &views)?;
            batch.fields.insert(name.to_string(), stacked);
        }

        tracing::debug!(
            samples = batch.num_samples,
            fields = batch.fields.len(),
            "collated batch"
        );
        Ok(batch)
    }
}

impl FieldStore for Batch {
    fn field(&self, name: &str) -> Option<&Tensor> {
        self.fields.get(name)
    }

    fn set_field(&mut self, name: &str, value: Tensor) {
        self.fields.insert(name.to_string(), value);
    }

    fn remove_field(&mut self, name: &str) -> Option<Tensor> {
        self.fields.remove(name)
    }

    fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/data/batch.rs"]
mod tests;
