//! Typed XML binding
//!
//! Types opt into binding by implementing [`Bindable`]: serde handles the
//! XML mapping (through quick-xml), while the trait supplies the document
//! element name and the declared field list used for metadata reports.
//!
//! Binding by identifier goes through a closed [`TypeRegistry`]; only
//! registered types can be instantiated from an identifier string. Compiled
//! [`BindingContext`]s are cached per identifier for the life of the
//! [`XmlMarshaller`].

mod context;
mod marshaller;
pub mod model;
mod registry;

pub use context::{BindingContext, BindingContextCache};
pub use marshaller::{FieldInfo, ObjectMetadata, XmlMarshaller};
pub use registry::{TypeDescriptor, TypeRegistry};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::Any;
use std::fmt;

use crate::error::Result;

/// How a field appears in XML
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Attribute of the document element
    Attribute,
    /// Child element (possibly repeated or wrapping other elements)
    Element,
}

/// Declared field of a bindable type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Rust field name
    pub name: &'static str,
    /// Declared Rust type, as written
    pub type_name: &'static str,
    /// Attribute or element name in XML
    pub xml_name: &'static str,
    /// Attribute or element
    pub kind: FieldKind,
    /// Whether the XML must contain this field
    pub required: bool,
}

impl FieldDescriptor {
    /// Describe an element field
    pub const fn element(name: &'static str, type_name: &'static str, required: bool) -> Self {
        Self {
            name,
            type_name,
            xml_name: name,
            kind: FieldKind::Element,
            required,
        }
    }

    /// Describe an attribute field
    pub const fn attribute(name: &'static str, type_name: &'static str, required: bool) -> Self {
        Self {
            name,
            type_name,
            xml_name: name,
            kind: FieldKind::Attribute,
            required,
        }
    }

    /// Use a different XML name than the field name
    pub const fn renamed(mut self, xml_name: &'static str) -> Self {
        self.xml_name = xml_name;
        self
    }
}

/// A type that can be bound to and from XML
///
/// The serde derive must agree with [`Bindable::FIELDS`]: attributes use the
/// `@name` rename convention of quick-xml, elements use plain names.
///
/// Element text is trimmed on unmarshal: leading and trailing whitespace of a
/// string field does not survive a marshal/unmarshal round trip. Attribute
/// values are kept as written.
pub trait Bindable: Serialize + DeserializeOwned + fmt::Debug + Send + Sync + 'static {
    /// Name of the document element
    const ROOT_ELEMENT: &'static str;

    /// The type's own declared fields, in declaration order
    const FIELDS: &'static [FieldDescriptor];

    /// Stable identifier of the type (its fully-qualified path)
    fn identifier() -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Type-erased bound value
pub trait BoundObject: fmt::Debug + Send + Sync {
    /// Identifier of the value's runtime type
    fn type_identifier(&self) -> &'static str;

    /// Build a fresh binding context for the value's runtime type
    fn binding_context(&self) -> Result<BindingContext>;

    /// JSON rendering of the value
    fn to_json(&self) -> Result<serde_json::Value>;

    /// Borrow as `Any` for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Convert into `Any` for downcasting by value
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Bindable> BoundObject for T {
    fn type_identifier(&self) -> &'static str {
        T::identifier()
    }

    fn binding_context(&self) -> Result<BindingContext> {
        BindingContext::for_type::<T>()
    }

    fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl dyn BoundObject + '_ {
    /// Downcast to a concrete bindable type
    pub fn downcast_ref<T: Bindable>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}
