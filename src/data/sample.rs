use crate::data::{FieldStore, Tensor, Value};

/// One structure's feature set. Fields keep their insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sample {
    fields: Vec<(String, Value)>,
}

impl Sample {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Inserts or replaces a field. A replaced field keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let name = name.into();
        let value = value.into();
        match self.get_mut(&name) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.fields.push((name, value));
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let pos = self.fields.iter().position(|(n, _)| n == name)?;
        Some(self.fields.remove(pos).1)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }
}

/// The store view covers tensor-valued fields only. Scalars and lists stay
/// invisible to it until coerced.
impl FieldStore for Sample {
    fn field(&self, name: &str) -> Option<&Tensor> {
        self.get(name).and_then(Value::as_tensor)
    }

    fn set_field(&mut self, name: &str, value: Tensor) {
        self.insert(name, Value::Tensor(value));
    }

    fn remove_field(&mut self, name: &str) -> Option<Tensor> {
        self.remove(name).map(Value::into_tensor)
    }

    fn field_names(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, value)| value.is_tensor())
            .map(|(name, _)| name)
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/data/sample.rs"]
mod tests;
