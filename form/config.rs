//! # Form Configuration
//!
//! The `(selector, fields, mapping)` triples that parameterize each synchronizer, plus
//! the policy applied to unmapped selector values. Configurations are stored as TOML,
//! the same human-readable format used for the toolkit's other artifacts.
//!
//! `FormConfig::heart_disease` reproduces the fixed wiring of the heart disease form.
//! A configuration loaded from disk is validated before it is handed to a controller:
//! every variable's mapping must build, selector ids and hidden field names must be
//! unique across variables (so no two synchronizers can touch the same field), and the
//! declared default must be one of the variable's categories.

use crate::mapping::{CategoryMapping, MappingError};
use crate::types::UnmappedPolicy;
use crate::variable::CategoricalVariable;
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read or write configuration file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML configuration file: {0}")]
    TomlParseError(#[from] toml::de::Error),
    #[error("Failed to serialize configuration to TOML format: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),
    #[error("The configuration declares no categorical variables.")]
    NoVariables,
    #[error("Invalid mapping for variable '{variable}': {source}")]
    InvalidMapping {
        variable: String,
        #[source]
        source: MappingError,
    },
    #[error("The variable name '{0}' is declared more than once.")]
    DuplicateVariable(String),
    #[error("The selector '{selector}' is claimed by both '{first}' and '{second}'.")]
    SharedSelector {
        selector: String,
        first: String,
        second: String,
    },
    #[error("The hidden field '{field}' belongs to both '{first}' and '{second}'.")]
    SharedField {
        field: String,
        first: String,
        second: String,
    },
    #[error("The default value '{default}' of variable '{variable}' is not one of its categories.")]
    UnknownDefault { variable: String, default: String },
}

/// One categorical variable: its selector, its field group and the mapping between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableConfig {
    pub name: String,
    /// Element id of the selector.
    pub selector: String,
    /// Value the selector holds when the document is first rendered.
    pub default: String,
    /// Hidden fields of the group, in document order.
    pub fields: Vec<String>,
    /// Category → hidden field name. Kept sorted by category, so a mapping built from
    /// a configuration lists its categories alphabetically; `fields` carries the order.
    pub mapping: BTreeMap<String, String>,
}

impl VariableConfig {
    pub fn from_variable(variable: CategoricalVariable) -> Self {
        Self {
            name: variable.name().to_string(),
            selector: variable.selector_id().to_string(),
            default: variable.default_category().to_string(),
            fields: variable.field_names().map(str::to_string).collect(),
            mapping: variable
                .categories()
                .iter()
                .map(|&(category, field)| (category.to_string(), field.to_string()))
                .collect(),
        }
    }

    /// Builds the validated mapping for this variable.
    pub fn build_mapping(&self) -> Result<CategoryMapping, ConfigError> {
        CategoryMapping::new(
            self.fields.iter().map(String::as_str),
            self.mapping
                .iter()
                .map(|(category, field)| (category.as_str(), field.as_str())),
        )
        .map_err(|source| ConfigError::InvalidMapping {
            variable: self.name.clone(),
            source,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormConfig {
    #[serde(default)]
    pub unmapped_policy: UnmappedPolicy,
    pub variables: Vec<VariableConfig>,
}

impl FormConfig {
    /// The five variables of the heart disease form.
    pub fn heart_disease() -> Self {
        Self {
            unmapped_policy: UnmappedPolicy::Zeroed,
            variables: CategoricalVariable::ALL
                .into_iter()
                .map(VariableConfig::from_variable)
                .collect(),
        }
    }

    pub fn with_policy(mut self, policy: UnmappedPolicy) -> Self {
        self.unmapped_policy = policy;
        self
    }

    pub fn variable(&self, name: &str) -> Option<&VariableConfig> {
        self.variables.iter().find(|variable| variable.name == name)
    }

    /// Checks the whole configuration, returning the mapping of each variable in order.
    pub fn validate(&self) -> Result<Vec<CategoryMapping>, ConfigError> {
        if self.variables.is_empty() {
            return Err(ConfigError::NoVariables);
        }

        let mut names = AHashSet::new();
        let mut selector_owner: BTreeMap<&str, &str> = BTreeMap::new();
        let mut field_owner: BTreeMap<&str, &str> = BTreeMap::new();
        let mut mappings = Vec::with_capacity(self.variables.len());

        for variable in &self.variables {
            if !names.insert(variable.name.as_str()) {
                return Err(ConfigError::DuplicateVariable(variable.name.clone()));
            }

            let mapping = variable.build_mapping()?;

            if let Some(first) = selector_owner.insert(&variable.selector, &variable.name) {
                return Err(ConfigError::SharedSelector {
                    selector: variable.selector.clone(),
                    first: first.to_string(),
                    second: variable.name.clone(),
                });
            }
            for field in &variable.fields {
                if let Some(first) = field_owner.insert(field, &variable.name) {
                    return Err(ConfigError::SharedField {
                        field: field.clone(),
                        first: first.to_string(),
                        second: variable.name.clone(),
                    });
                }
            }

            if mapping.field_for(&variable.default).is_none() {
                return Err(ConfigError::UnknownDefault {
                    variable: variable.name.clone(),
                    default: variable.default.clone(),
                });
            }

            mappings.push(mapping);
        }

        Ok(mappings)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Reads a configuration from disk and validates it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        config.validate()?;
        log::debug!(
            "Loaded form configuration with {} variables from {}",
            config.variables.len(),
            path.display()
        );
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self::heart_disease()
    }
}
