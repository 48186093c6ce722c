use serde::{Deserialize, Serialize};

/// Scale parameters for one target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetConfig {
    pub mean: f64,
    pub std: f64,
}

impl TargetConfig {
    pub fn new(mean: f64, std: f64) -> Self {
        Self { mean, std }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetDef {
    pub name: String,
    pub mean: f64,
    pub std: f64,
}

impl TargetDef {
    pub fn config(&self) -> TargetConfig {
        TargetConfig::new(self.mean, self.std)
    }
}

/// Ordered target definitions; order is the processing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TargetSet {
    #[serde(default)]
    pub targets: Vec<TargetDef>,
}

impl TargetSet {
    pub fn get(&self, name: &str) -> Option<TargetConfig> {
        self.targets
            .iter()
            .find(|t| t.name == name)
            .map(TargetDef::config)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.targets.iter().map(|t| t.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, TargetConfig)> {
        self.targets.iter().map(|t| (t.name.as_str(), t.config()))
    }
}
