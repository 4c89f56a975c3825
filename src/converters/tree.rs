//! Generic tree converter
//!
//! Turns an element tree into a [`GenericValue`] without any schema:
//!
//! - attributes go under the reserved attributes key as a flat mapping
//! - child elements are grouped by tag name in first-seen order
//! - a group of one is stored as its value, a larger group as a list
//! - an element without child elements becomes its text content
//!
//! Text between child elements (usually indentation) is ignored once an
//! element has at least one child element.

use indexmap::IndexMap;

use super::base::{ConverterConfig, GenericValue};
use crate::documents::{Document, Element};
use crate::error::Result;

/// Schema-less XML to [`GenericValue`] converter
#[derive(Debug, Clone, Default)]
pub struct GenericTreeConverter {
    config: ConverterConfig,
}

impl GenericTreeConverter {
    /// Create a converter with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration
    pub fn with_config(config: ConverterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the configuration
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Parse `xml` and convert its root element
    pub fn convert_str(&self, xml: &str) -> Result<GenericValue> {
        let doc = Document::from_string(xml)?;
        Ok(self.convert(doc.root()))
    }

    /// Convert an element into a mapping
    ///
    /// The element passed in is always rendered as a mapping, even when it
    /// has no attributes or children; only nested leaves collapse to scalars.
    pub fn convert(&self, element: &Element) -> GenericValue {
        tracing::trace!(element = %element.name(), "converting element");
        GenericValue::Mapping(self.element_to_mapping(element))
    }

    fn element_to_mapping(&self, element: &Element) -> IndexMap<String, GenericValue> {
        let mut result = IndexMap::new();

        if element.has_attributes() {
            let attrs = element
                .attributes()
                .iter()
                .map(|attr| (attr.name.clone(), GenericValue::scalar(attr.value.clone())))
                .collect();
            result.insert(
                self.config.attributes_key().to_string(),
                GenericValue::Mapping(attrs),
            );
        }

        let mut groups: IndexMap<&str, Vec<GenericValue>> = IndexMap::new();
        for child in element.child_elements() {
            let value = if child.has_child_elements() {
                GenericValue::Mapping(self.element_to_mapping(child))
            } else {
                self.leaf_value(child)
            };
            groups.entry(child.name()).or_default().push(value);
        }

        for (name, mut values) in groups {
            let value = if values.len() == 1 {
                values.remove(0)
            } else {
                GenericValue::List(values)
            };
            result.insert(name.to_string(), value);
        }

        result
    }

    fn leaf_value(&self, element: &Element) -> GenericValue {
        let text = element.text_content();
        if self.config.trim_text() {
            GenericValue::scalar(text.trim())
        } else {
            GenericValue::Scalar(text)
        }
    }
}
