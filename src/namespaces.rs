//! XML namespace declarations
//!
//! Namespace declarations are read straight from an element's attributes:
//! `xmlns` declares the default namespace, `xmlns:prefix` a prefixed one.
//! Only the element itself is inspected, never its descendants.

use crate::documents::Element;
use std::collections::BTreeSet;

/// Namespace prefix
pub type Prefix = String;

/// XML Namespace URI
pub type NamespaceUri = String;

/// Prefix of a prefixed namespace declaration attribute
pub const XMLNS_PREFIX: &str = "xmlns:";

/// Name of the default namespace declaration attribute
pub const XMLNS: &str = "xmlns";

/// A single namespace declaration found on an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDeclaration {
    /// Declared prefix, `None` for the default namespace
    pub prefix: Option<Prefix>,
    /// Namespace URI
    pub uri: NamespaceUri,
}

impl NamespaceDeclaration {
    /// Interpret an attribute as a namespace declaration, if it is one
    pub fn from_attribute(name: &str, value: &str) -> Option<Self> {
        if name == XMLNS {
            Some(Self {
                prefix: None,
                uri: value.to_string(),
            })
        } else {
            name.strip_prefix(XMLNS_PREFIX).map(|prefix| Self {
                prefix: Some(prefix.to_string()),
                uri: value.to_string(),
            })
        }
    }

    /// Check if this declares the default namespace
    pub fn is_default(&self) -> bool {
        self.prefix.is_none()
    }
}

/// All namespace declarations on `element`, in attribute order
pub fn declarations(element: &Element) -> Vec<NamespaceDeclaration> {
    element
        .attributes()
        .iter()
        .filter_map(|attr| NamespaceDeclaration::from_attribute(&attr.name, &attr.value))
        .collect()
}

/// Deduplicated set of namespace URIs declared on `element`
///
/// The default namespace contributes only when its value is non-empty
/// (`xmlns=""` undeclares rather than declares). Every `xmlns:*` value is
/// included as written.
pub fn extract_namespaces(element: &Element) -> BTreeSet<NamespaceUri> {
    declarations(element)
        .into_iter()
        .filter(|decl| !(decl.is_default() && decl.uri.is_empty()))
        .map(|decl| decl.uri)
        .collect()
}
