//! Typed marshal/unmarshal service

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{Bindable, BindingContext, BindingContextCache, BoundObject, TypeRegistry};
use crate::error::{Error, Result};

/// Declared field name and type of a bound value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    /// Field name
    pub name: String,
    /// Declared type name
    #[serde(rename = "type")]
    pub type_name: String,
}

/// Description of a bound value's type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMetadata {
    /// Simple type name (last path segment)
    pub class_name: String,
    /// Module path the type is declared in
    pub package_name: String,
    /// Declared fields in declaration order
    pub fields: Vec<FieldInfo>,
}

impl ObjectMetadata {
    fn from_context(context: &BindingContext) -> Self {
        let identifier = context.identifier();
        let (package_name, class_name) = match identifier.rsplit_once("::") {
            Some((package, class)) => (package, class),
            None => ("", identifier),
        };
        Self {
            class_name: class_name.to_string(),
            package_name: package_name.to_string(),
            fields: field_report(context),
        }
    }
}

fn field_report(context: &BindingContext) -> Vec<FieldInfo> {
    context
        .fields()
        .iter()
        .map(|field| FieldInfo {
            name: field.name.to_string(),
            type_name: field.type_name.to_string(),
        })
        .collect()
}

/// Marshals values to XML and unmarshals XML to values
///
/// Binding by identifier is limited to the types in the registry. Binding
/// contexts are built on first use and shared afterwards.
#[derive(Debug)]
pub struct XmlMarshaller {
    registry: TypeRegistry,
    cache: BindingContextCache,
}

impl Default for XmlMarshaller {
    fn default() -> Self {
        Self::new(TypeRegistry::with_defaults())
    }
}

impl XmlMarshaller {
    /// Create a marshaller over `registry`
    pub fn new(registry: TypeRegistry) -> Self {
        Self {
            registry,
            cache: BindingContextCache::new(),
        }
    }

    /// Get the type registry
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Get the binding context cache
    pub fn cache(&self) -> &BindingContextCache {
        &self.cache
    }

    /// Binding context for a registered type identifier
    pub fn context(&self, identifier: &str) -> Result<Arc<BindingContext>> {
        let descriptor = self.registry.resolve(identifier)?;
        self.cache
            .get_or_create(descriptor.identifier(), || descriptor.build())
    }

    fn context_of(&self, value: &dyn BoundObject) -> Result<Arc<BindingContext>> {
        self.cache
            .get_or_create(value.type_identifier(), || value.binding_context())
    }

    /// Parse `xml` into a value of the type named by `identifier`
    ///
    /// Fails with [`Error::TargetTypeNotFound`] for an unregistered
    /// identifier and with [`Error::Binding`] when the XML does not fit.
    pub fn unmarshal(&self, xml: &str, identifier: &str) -> Result<Box<dyn BoundObject>> {
        let context = self.context(identifier)?;
        tracing::debug!(%identifier, "unmarshalling");
        context.unmarshal(xml).inspect_err(|err| {
            tracing::debug!(%identifier, error = %err, "unmarshalling failed");
        })
    }

    /// Parse `xml` into a `T`
    pub fn unmarshal_typed<T: Bindable>(&self, xml: &str) -> Result<T> {
        let context = self
            .cache
            .get_or_create(T::identifier(), BindingContext::for_type::<T>)?;
        let bound = context.unmarshal(xml)?;
        bound
            .into_any()
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| Error::Other(format!("context did not produce a {}", T::identifier())))
    }

    /// Serialize `value` as indented XML
    ///
    /// The context is looked up by the value's runtime type, so any bindable
    /// value can be marshalled, registered or not.
    pub fn marshal(&self, value: &dyn BoundObject) -> Result<String> {
        let context = self.context_of(value)?;
        context.marshal(value)
    }

    /// Declared fields of `value`'s type, in declaration order
    pub fn field_report(&self, value: &dyn BoundObject) -> Result<Vec<FieldInfo>> {
        let context = self.context_of(value)?;
        Ok(field_report(&context))
    }

    /// Type name, module path and declared fields of `value`
    pub fn object_metadata(&self, value: &dyn BoundObject) -> Result<ObjectMetadata> {
        let context = self.context_of(value)?;
        Ok(ObjectMetadata::from_context(&context))
    }
}
