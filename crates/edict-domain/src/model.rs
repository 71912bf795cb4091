//! Model catalog - the closed set of model aliases

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Alias used when a request does not name a model
pub const DEFAULT_MODEL_ALIAS: &str = "dolphin";

/// An alias outside the configured catalog was requested
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown model '{alias}' (available: {})", available.join(", "))]
pub struct UnknownModelError {
    /// The alias that was requested
    pub alias: String,

    /// Every alias the catalog knows about
    pub available: Vec<String>,
}

/// Named model aliases mapped to provider-specific identifiers
///
/// Immutable once the process has started. One alias is the default and is
/// only used when the caller expresses no preference.
///
/// # Examples
///
/// ```
/// use edict_domain::ModelCatalog;
///
/// let catalog = ModelCatalog::default();
/// assert_eq!(catalog.default_alias(), "dolphin");
/// assert_eq!(catalog.resolve("gemma").unwrap(), "google/gemma-3n-e4b-it:free");
/// assert!(catalog.resolve("gpt-17").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCatalog {
    /// Alias of the default model
    #[serde(default = "default_alias")]
    default_model: String,

    /// Alias to provider identifier
    #[serde(default = "default_aliases")]
    aliases: BTreeMap<String, String>,
}

fn default_alias() -> String {
    DEFAULT_MODEL_ALIAS.to_string()
}

fn default_aliases() -> BTreeMap<String, String> {
    [
        ("gemma", "google/gemma-3n-e4b-it:free"),
        ("deepseek", "tngtech/deepseek-r1t2-chimera:free"),
        ("dolphin", "cognitivecomputations/dolphin3.0-r1-mistral-24b:free"),
    ]
    .into_iter()
    .map(|(alias, id)| (alias.to_string(), id.to_string()))
    .collect()
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self {
            default_model: default_alias(),
            aliases: default_aliases(),
        }
    }
}

impl ModelCatalog {
    /// Create a catalog, checking that the default alias is a member
    pub fn new(
        aliases: BTreeMap<String, String>,
        default_model: impl Into<String>,
    ) -> Result<Self, UnknownModelError> {
        let catalog = Self {
            default_model: default_model.into(),
            aliases,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check that the default alias is a member of the catalog
    pub fn validate(&self) -> Result<(), UnknownModelError> {
        self.resolve(&self.default_model).map(|_| ())
    }

    /// Resolve an alias to its provider identifier
    ///
    /// Unknown aliases are rejected, never substituted with the default.
    pub fn resolve(&self, alias: &str) -> Result<&str, UnknownModelError> {
        self.aliases
            .get(alias)
            .map(String::as_str)
            .ok_or_else(|| UnknownModelError {
                alias: alias.to_string(),
                available: self.aliases.keys().cloned().collect(),
            })
    }

    /// Resolve an optional preference
    ///
    /// `None` means the caller omitted a preference and gets the default
    /// model. `Some(alias)` is resolved strictly. Returns the effective alias
    /// together with the provider identifier.
    pub fn resolve_preference<'a>(
        &'a self,
        preference: Option<&'a str>,
    ) -> Result<(&'a str, &'a str), UnknownModelError> {
        let alias = preference.unwrap_or(&self.default_model);
        let model_id = self.resolve(alias)?;
        Ok((alias, model_id))
    }

    /// Alias of the default model
    pub fn default_alias(&self) -> &str {
        &self.default_model
    }

    /// All aliases with their provider identifiers, sorted by alias
    pub fn aliases(&self) -> &BTreeMap<String, String> {
        &self.aliases
    }

    /// Check if an alias is known
    pub fn contains(&self, alias: &str) -> bool {
        self.aliases.contains_key(alias)
    }
}
