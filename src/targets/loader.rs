use std::collections::HashSet;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::targets::defs::{TargetDef, TargetSet};

#[derive(Debug, Error)]
pub enum TargetConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("no targets found in {0}")]
    Empty(String),
    #[error("duplicate target: {0}")]
    Duplicate(String),
    #[error("target {0} has a non-finite mean or std")]
    NonFinite(String),
    #[error("target {0} has zero std")]
    ZeroStd(String),
}

#[derive(serde::Deserialize)]
struct TargetFile {
    #[serde(default)]
    target: Vec<TargetDef>,
}

pub fn load_targets(path: &Path) -> Result<TargetSet, TargetConfigError> {
    let text = fs::read_to_string(path)?;
    let set = parse_targets(&text, &path.to_string_lossy())?;
    tracing::debug!(
        path = %path.display(),
        targets = set.targets.len(),
        "loaded target config"
    );
    Ok(set)
}

pub fn parse_targets(text: &str, origin: &str) -> Result<TargetSet, TargetConfigError> {
    let parsed: TargetFile = toml::from_str(text)?;
    if parsed.target.is_empty() {
        return Err(TargetConfigError::Empty(origin.to_string()));
    }

    let mut seen = HashSet::new();
    for def in &parsed.target {
        if !seen.insert(def.name.as_str()) {
            return Err(TargetConfigError::Duplicate(def.name.clone()));
        }
        if !def.mean.is_finite() || !def.std.is_finite() {
            return Err(TargetConfigError::NonFinite(def.name.clone()));
        }
        if def.std == 0.0 {
            return Err(TargetConfigError::ZeroStd(def.name.clone()));
        }
    }

    Ok(TargetSet {
        targets: parsed.target,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/targets/loader.rs"]
mod tests;
