//! Base converter types
//!
//! This module provides the generic value tree produced by conversion and the
//! configuration shared by converters.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::names;

/// Default reserved key under which element attributes are stored
pub const ATTRIBUTES_KEY: &str = "@attributes";

/// Configuration for converters
#[derive(Debug, Clone)]
pub struct ConverterConfig {
    /// Key used for the attribute mapping in decoded output
    attributes_key: String,
    /// Whether to trim leaf text content
    trim_text: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            attributes_key: ATTRIBUTES_KEY.to_string(),
            trim_text: false,
        }
    }
}

impl ConverterConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the attributes key
    pub fn attributes_key(&self) -> &str {
        &self.attributes_key
    }

    /// Check if leaf text is trimmed
    pub fn trim_text(&self) -> bool {
        self.trim_text
    }

    /// Set the attributes key
    pub fn with_attributes_key(mut self, key: impl Into<String>) -> Self {
        self.attributes_key = key.into();
        self
    }

    /// Set text trimming
    pub fn with_trim_text(mut self, trim: bool) -> Self {
        self.trim_text = trim;
        self
    }

    /// Check the configuration for keys that could collide with tag names
    ///
    /// The attributes key shares a mapping with child tag names, so it must
    /// not itself be a valid XML Name.
    pub fn validate(&self) -> Result<()> {
        if self.attributes_key.is_empty() || names::is_valid_name(&self.attributes_key) {
            return Err(Error::Name(format!(
                "attributes key '{}' could collide with an element name",
                self.attributes_key
            )));
        }
        Ok(())
    }
}

/// Generic, JSON-compatible representation of XML content
///
/// A tag that occurs once under a parent is stored directly; a tag that
/// occurs two or more times becomes a [`GenericValue::List`]. Readers must
/// therefore accept either shape for any child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GenericValue {
    /// Text content of a leaf element or attribute value
    Scalar(String),
    /// Same-tag siblings in document order
    List(Vec<GenericValue>),
    /// Attributes and child groups keyed by name, in first-seen order
    Mapping(IndexMap<String, GenericValue>),
}

impl GenericValue {
    /// Create a scalar value
    pub fn scalar(text: impl Into<String>) -> Self {
        GenericValue::Scalar(text.into())
    }

    /// Get the string if this is a scalar
    pub fn as_str(&self) -> Option<&str> {
        match self {
            GenericValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Get the items if this is a list
    pub fn as_list(&self) -> Option<&[GenericValue]> {
        match self {
            GenericValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Get the entries if this is a mapping
    pub fn as_mapping(&self) -> Option<&IndexMap<String, GenericValue>> {
        match self {
            GenericValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a mapping entry by key
    pub fn get(&self, key: &str) -> Option<&GenericValue> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Items of this value read as "one or many"
    ///
    /// A list yields its items, anything else yields itself once.
    pub fn items(&self) -> Vec<&GenericValue> {
        match self {
            GenericValue::List(items) => items.iter().collect(),
            other => vec![other],
        }
    }
}

impl From<&str> for GenericValue {
    fn from(s: &str) -> Self {
        GenericValue::Scalar(s.to_string())
    }
}

impl From<String> for GenericValue {
    fn from(s: String) -> Self {
        GenericValue::Scalar(s)
    }
}
