//! Tunable settings for coercion and recipe selection.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Carrier keys searched, in order, when a string is wrapped in an object.
pub const DEFAULT_CARRIER_KEYS: &[&str] =
    &["text", "value", "content", "name", "label", "amount", "number"];

/// Recursion bound for string coercion.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 32;

/// How a recipe is picked when the prompt gives no slide count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecipeSelection {
    /// Stable pick derived from a digest of the prompt.
    #[default]
    PromptHash,
    /// Always the first declared recipe for the stage.
    First,
}

/// Settings shared by the transformer and the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeckConfig {
    pub carrier_keys: Vec<String>,
    pub max_nesting_depth: usize,
    pub recipe_selection: RecipeSelection,
    pub request_structure: bool,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            carrier_keys: DEFAULT_CARRIER_KEYS.iter().map(|k| k.to_string()).collect(),
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            recipe_selection: RecipeSelection::default(),
            request_structure: true,
        }
    }
}

impl DeckConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: DeckConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.carrier_keys.is_empty() {
            return Err(Error::ConfigError("carrierKeys must not be empty".into()));
        }
        if let Some(blank) = self.carrier_keys.iter().position(|k| k.trim().is_empty()) {
            return Err(Error::ConfigError(format!(
                "carrierKeys[{blank}] is blank"
            )));
        }
        if self.max_nesting_depth == 0 {
            return Err(Error::ConfigError(
                "maxNestingDepth must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
