//! Equipment models known to the renderer.
//!
//! Calculation results reference equipment models by name. Only names registered here are
//! turned into equipment objects; anything else is reported as unknown equipment while the
//! slot's placeholder is still drawn.
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where a renderer finds a model and how to scale it into tile metres.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct ModelEntry {
    /// Asset path or other renderer-specific source.
    pub source: String,
    #[cfg_attr(feature = "serde", serde(default = "default_scale"))]
    pub scale: f32,
}

#[cfg(feature = "serde")]
fn default_scale() -> f32 {
    1.0
}

impl ModelEntry {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            scale: 1.0,
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}

/// Model names mapped to their [`ModelEntry`].
#[derive(Clone, Debug, Default)]
pub struct ModelRegistry {
    models: HashMap<String, ModelEntry>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn register(&mut self, name: impl Into<String>, entry: ModelEntry) {
        self.models.insert(name.into(), entry);
    }

    /// Registers every model of `other`, overwriting entries with the same name.
    pub fn extend_from(&mut self, other: &ModelRegistry) {
        for (k, v) in other.models.iter() {
            self.models.insert(k.clone(), v.clone());
        }
    }

    /// Entry for `name`. An empty name never resolves, even if one was registered.
    pub fn get(&self, name: &str) -> Option<&ModelEntry> {
        if name.is_empty() {
            return None;
        }
        self.models.get(name)
    }
}
