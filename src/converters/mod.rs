//! XML converters
//!
//! This module turns parsed XML into schema-less, JSON-compatible data and
//! derives shape metadata from it.
//!
//! - [`GenericTreeConverter`]: element tree to [`GenericValue`]
//! - [`StructureSummary`]: one-level shape report of an element
//! - [`XmlMetadata`]: root name, declared namespaces and structure summary

mod base;
mod structure;
mod tree;

pub use base::{ConverterConfig, GenericValue, ATTRIBUTES_KEY};
pub use structure::{ChildCount, StructureSummary};
pub use tree::GenericTreeConverter;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::documents::{Document, Element};
use crate::error::Result;
use crate::namespaces;

/// Metadata describing a document's root element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XmlMetadata {
    /// Root element tag name
    pub root_element: String,
    /// Namespace URIs declared on the root element
    pub namespaces: BTreeSet<String>,
    /// Shape of the root element
    pub structure: StructureSummary,
}

impl XmlMetadata {
    /// Build metadata for a root element
    pub fn of(root: &Element) -> Self {
        Self {
            root_element: root.name().to_string(),
            namespaces: namespaces::extract_namespaces(root),
            structure: StructureSummary::of(root),
        }
    }

    /// Parse `xml` and build metadata for its root element
    pub fn parse(xml: &str) -> Result<Self> {
        let doc = Document::from_string(xml)?;
        Ok(Self::of(doc.root()))
    }
}
