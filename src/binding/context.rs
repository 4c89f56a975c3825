//! Binding contexts and their cache

use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use super::{Bindable, BoundObject, FieldDescriptor, FieldKind};
use crate::documents::Document;
use crate::error::{Error, Result};
use crate::names;

/// XML declaration written ahead of every marshalled document
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Indentation used by the marshaller
const INDENT_CHAR: char = ' ';
const INDENT_SIZE: usize = 4;

type UnmarshalFn = fn(&str) -> Result<Box<dyn BoundObject>>;
type MarshalFn = fn(&dyn BoundObject) -> Result<String>;

/// Compiled XML layout of one bindable type
///
/// Building a context validates the type's declared shape once; afterwards
/// the context converts between XML text and values of that type.
pub struct BindingContext {
    identifier: &'static str,
    root_element: &'static str,
    fields: &'static [FieldDescriptor],
    unmarshal_fn: UnmarshalFn,
    marshal_fn: MarshalFn,
}

impl fmt::Debug for BindingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingContext")
            .field("identifier", &self.identifier)
            .field("root_element", &self.root_element)
            .field("fields", &self.fields.len())
            .finish()
    }
}

impl BindingContext {
    /// Build the context for `T`
    ///
    /// Fails with [`Error::Binding`] when the declared root element or any
    /// field name is not a valid XML name, or when two fields map to the
    /// same attribute or element.
    pub fn for_type<T: Bindable>() -> Result<Self> {
        let identifier = T::identifier();
        tracing::debug!(%identifier, "building binding context");

        Self::check_shape(identifier, T::ROOT_ELEMENT, T::FIELDS)?;

        Ok(Self {
            identifier,
            root_element: T::ROOT_ELEMENT,
            fields: T::FIELDS,
            unmarshal_fn: unmarshal_as::<T>,
            marshal_fn: marshal_as::<T>,
        })
    }

    fn check_shape(
        identifier: &str,
        root_element: &str,
        fields: &[FieldDescriptor],
    ) -> Result<()> {
        let invalid = |err: Error| {
            Error::Binding(format!("type {} is not bindable: {}", identifier, err))
        };

        names::validate_qname(root_element).map_err(invalid)?;

        let mut field_names = HashSet::new();
        let mut xml_names = HashSet::new();
        for field in fields {
            if !field_names.insert(field.name) {
                return Err(Error::Binding(format!(
                    "type {} declares field '{}' twice",
                    identifier, field.name
                )));
            }
            names::validate_qname(field.xml_name).map_err(invalid)?;
            if !xml_names.insert((field.kind, field.xml_name)) {
                return Err(Error::Binding(format!(
                    "type {} maps two fields to {} '{}'",
                    identifier,
                    match field.kind {
                        FieldKind::Attribute => "attribute",
                        FieldKind::Element => "element",
                    },
                    field.xml_name
                )));
            }
        }
        Ok(())
    }

    /// Identifier of the bound type
    pub fn identifier(&self) -> &'static str {
        self.identifier
    }

    /// Name of the document element
    pub fn root_element(&self) -> &'static str {
        self.root_element
    }

    /// Declared fields in declaration order
    pub fn fields(&self) -> &'static [FieldDescriptor] {
        self.fields
    }

    /// Parse `xml` into a value of the bound type
    pub fn unmarshal(&self, xml: &str) -> Result<Box<dyn BoundObject>> {
        (self.unmarshal_fn)(xml)
    }

    /// Serialize `value` as indented XML
    pub fn marshal(&self, value: &dyn BoundObject) -> Result<String> {
        (self.marshal_fn)(value)
    }
}

/// Parse `xml` as a `T`
///
/// Malformed input, an unexpected document element and any serde mismatch
/// all surface as [`Error::Binding`].
pub(crate) fn decode<T: Bindable>(xml: &str) -> Result<T> {
    let doc = Document::from_string(xml).map_err(|e| Error::Binding(e.to_string()))?;

    let (_, local_name) = names::split_qname(doc.root().name());
    if local_name != T::ROOT_ELEMENT {
        return Err(Error::Binding(format!(
            "unexpected element <{}>, expected <{}>",
            doc.root().name(),
            T::ROOT_ELEMENT
        )));
    }

    Ok(quick_xml::de::from_str::<T>(xml)?)
}

/// Serialize a `T` under its root element with fixed indentation
pub(crate) fn encode<T: Bindable>(value: &T) -> Result<String> {
    let mut buffer = String::new();
    buffer.push_str(XML_DECLARATION);
    buffer.push('\n');

    let mut serializer = quick_xml::se::Serializer::with_root(&mut buffer, Some(T::ROOT_ELEMENT))?;
    serializer.indent(INDENT_CHAR, INDENT_SIZE);
    value.serialize(serializer)?;

    Ok(buffer)
}

fn unmarshal_as<T: Bindable>(xml: &str) -> Result<Box<dyn BoundObject>> {
    Ok(Box::new(decode::<T>(xml)?))
}

fn marshal_as<T: Bindable>(value: &dyn BoundObject) -> Result<String> {
    let typed = value.downcast_ref::<T>().ok_or_else(|| {
        Error::Binding(format!(
            "cannot marshal a {} with the context of {}",
            value.type_identifier(),
            T::identifier()
        ))
    })?;
    encode(typed)
}

/// Process-wide store of binding contexts, keyed by type identifier
///
/// Lookups take a shared lock. A miss takes the exclusive lock, checks
/// again, and only then builds, so each identifier is built at most once.
/// Failed builds are not stored and are retried on the next request.
#[derive(Default)]
pub struct BindingContextCache {
    contexts: RwLock<HashMap<String, Arc<BindingContext>>>,
}

impl BindingContextCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached context for `identifier`, building it with `build` on a miss
    pub fn get_or_create<F>(&self, identifier: &str, build: F) -> Result<Arc<BindingContext>>
    where
        F: FnOnce() -> Result<BindingContext>,
    {
        if let Some(context) = self.contexts.read().get(identifier) {
            tracing::trace!(%identifier, "binding context cache hit");
            return Ok(Arc::clone(context));
        }

        let mut contexts = self.contexts.write();
        if let Some(context) = contexts.get(identifier) {
            return Ok(Arc::clone(context));
        }

        let context = match build() {
            Ok(context) => Arc::new(context),
            Err(err) => {
                tracing::warn!(%identifier, error = %err, "failed to build binding context");
                return Err(err);
            }
        };
        contexts.insert(identifier.to_string(), Arc::clone(&context));
        tracing::debug!(%identifier, cached = contexts.len(), "binding context cached");

        Ok(context)
    }

    /// Cached context for `identifier`, if any
    pub fn get(&self, identifier: &str) -> Option<Arc<BindingContext>> {
        self.contexts.read().get(identifier).cloned()
    }

    /// Number of cached contexts
    pub fn len(&self) -> usize {
        self.contexts.read().len()
    }

    /// Check if nothing has been cached yet
    pub fn is_empty(&self) -> bool {
        self.contexts.read().is_empty()
    }
}

impl fmt::Debug for BindingContextCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingContextCache")
            .field("contexts", &self.len())
            .finish()
    }
}
