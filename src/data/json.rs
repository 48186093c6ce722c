//! JSON representation of samples, batches and side tensors.
//!
//! A sample is an object whose values are numbers or rectangular nested
//! arrays of numbers. Tensors are written back as nested arrays.

use std::path::Path;

use ndarray::{ArrayViewD, IxDyn};
use serde_json::{Map, Value as Json};

use crate::data::{Batch, DataError, Sample, Tensor, Value};
use crate::norm::SideTensors;

pub fn value_from_json(field: &str, json: &Json) -> Result<Value, DataError> {
    match json {
        Json::Number(n) => match n.as_i64() {
            Some(i) => Ok(Value::Int(i)),
            None => n
                .as_f64()
                .map(Value::Float)
                .ok_or_else(|| unsupported(field, "number out of range")),
        },
        Json::Array(_) => {
            let shape = infer_shape(json);
            let mut data = Vec::with_capacity(shape.iter().product());
            flatten(json, &shape, &mut data).map_err(|reason| unsupported(field, &reason))?;
            if shape.len() == 1 {
                Ok(Value::List(data))
            } else {
                Ok(Value::Tensor(Tensor::from_shape_vec(IxDyn(&shape), data)?))
            }
        }
        other => Err(unsupported(
            field,
            &format!("expected a number or array, found {}", kind(other)),
        )),
    }
}

/// Writes a value back as JSON. Non-finite numbers are rejected rather than
/// written as `null`.
pub fn value_to_json(field: &str, value: &Value) -> Result<Json, DataError> {
    match value {
        Value::Tensor(t) => tensor_to_json(field, t),
        Value::Float(v) => number(field, *v),
        Value::Int(v) => Ok(Json::from(*v)),
        Value::List(v) => v
            .iter()
            .map(|x| number(field, *x))
            .collect::<Result<Vec<_>, _>>()
            .map(Json::Array),
    }
}

pub fn tensor_to_json(field: &str, tensor: &Tensor) -> Result<Json, DataError> {
    view_to_json(field, tensor.view())
}

fn view_to_json(field: &str, view: ArrayViewD<'_, f64>) -> Result<Json, DataError> {
    if view.ndim() == 0 {
        return match view.iter().next() {
            Some(v) => number(field, *v),
            None => Ok(Json::Null),
        };
    }
    view.outer_iter()
        .map(|inner| view_to_json(field, inner))
        .collect::<Result<Vec<_>, _>>()
        .map(Json::Array)
}

fn number(field: &str, value: f64) -> Result<Json, DataError> {
    if !value.is_finite() {
        return Err(DataError::NonFinite {
            field: field.to_string(),
            value,
        });
    }
    Ok(Json::from(value))
}

/// Reads one sample. Every field is stored as a tensor.
pub fn sample_from_json(json: &Json) -> Result<Sample, DataError> {
    let Json::Object(map) = json else {
        return Err(unsupported(
            "<sample>",
            &format!("expected an object, found {}", kind(json)),
        ));
    };
    let mut sample = Sample::new();
    for (name, value) in map {
        sample.insert(name.clone(), value_from_json(name, value)?.into_tensor());
    }
    Ok(sample)
}

pub fn sample_to_json(sample: &Sample) -> Result<Json, DataError> {
    let mut map = Map::new();
    for (name, value) in sample.iter() {
        map.insert(name.to_string(), value_to_json(name, value)?);
    }
    Ok(Json::Object(map))
}

pub fn batch_to_json(batch: &Batch) -> Result<Json, DataError> {
    let mut fields = Map::new();
    for (name, tensor) in batch.iter() {
        fields.insert(name.to_string(), tensor_to_json(name, tensor)?);
    }
    let mut map = Map::new();
    map.insert("num_samples".to_string(), Json::from(batch.num_samples()));
    map.insert("fields".to_string(), Json::Object(fields));
    Ok(Json::Object(map))
}

pub fn side_tensors_from_json(json: &Json) -> Result<SideTensors, DataError> {
    let Json::Object(map) = json else {
        return Err(unsupported(
            "<side tensors>",
            &format!("expected an object, found {}", kind(json)),
        ));
    };
    let mut side = SideTensors::new();
    for (name, value) in map {
        side.insert(name.clone(), value_from_json(name, value)?.into_tensor());
    }
    Ok(side)
}

pub fn side_tensors_to_json(side: &SideTensors) -> Result<Json, DataError> {
    let mut map = Map::new();
    for (name, tensor) in side {
        map.insert(name.clone(), tensor_to_json(name, tensor)?);
    }
    Ok(Json::Object(map))
}

/// Reads a JSON array of samples. A single object is read as one sample.
pub fn read_samples(path: &Path) -> Result<Vec<Sample>, DataError> {
    let text = std::fs::read_to_string(path)?;
    let json: Json = serde_json::from_str(&text)?;
    match &json {
        Json::Array(items) => items.iter().map(sample_from_json).collect(),
        Json::Object(_) => Ok(vec![sample_from_json(&json)?]),
        other => Err(unsupported(
            "<samples>",
            &format!("expected an array or object, found {}", kind(other)),
        )),
    }
}

pub fn read_side_tensors(path: &Path) -> Result<SideTensors, DataError> {
    let text = std::fs::read_to_string(path)?;
    let json: Json = serde_json::from_str(&text)?;
    side_tensors_from_json(&json)
}

pub fn write_json(path: &Path, json: &Json) -> Result<(), DataError> {
    let text = serde_json::to_string_pretty(json)?;
    std::fs::write(path, text)?;
    Ok(())
}

fn infer_shape(json: &Json) -> Vec<usize> {
    let mut shape = Vec::new();
    let mut current = json;
    while let Json::Array(items) = current {
        shape.push(items.len());
        match items.first() {
            Some(first) => current = first,
            None => break,
        }
    }
    shape
}

fn flatten(json: &Json, shape: &[usize], out: &mut Vec<f64>) -> Result<(), String> {
    match shape.split_first() {
        None => match json.as_f64() {
            Some(v) => {
                out.push(v);
                Ok(())
            }
            None => Err(format!("expected a number, found {}", kind(json))),
        },
        Some((&len, rest)) => match json {
            Json::Array(items) if items.len() == len => {
                for item in items {
                    flatten(item, rest, out)?;
                }
                Ok(())
            }
            Json::Array(items) => Err(format!(
                "ragged array: expected {len} elements, found {}",
                items.len()
            )),
            other => Err(format!("expected an array, found {}", kind(other))),
        },
    }
}

fn kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "an array",
        Json::Object(_) => "an object",
    }
}

fn unsupported(field: &str, reason: &str) -> DataError {
    DataError::UnsupportedValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/data/json.rs"]
mod tests;
