//! Request boundary
//!
//! [`XmlService`] combines the generic converter and the typed marshaller
//! into the two request shapes callers use, and maps every failure to an
//! [`ErrorResponse`] carrying its [`ErrorKind`].

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::binding::{BoundObject, ObjectMetadata, XmlMarshaller};
use crate::converters::{GenericTreeConverter, GenericValue, XmlMetadata};
use crate::documents::Document;
use crate::error::{Error, ErrorKind, Result};

/// Successful generic parse
#[derive(Debug, Clone, Serialize)]
pub struct ParseResponse {
    /// Converted document
    pub data: GenericValue,
    /// Root element metadata
    pub metadata: XmlMetadata,
}

/// Successful typed bind
#[derive(Debug)]
pub struct BindResponse {
    /// Bound value
    pub object: Box<dyn BoundObject>,
    /// Type name and declared fields of the bound value
    pub metadata: ObjectMetadata,
}

impl Serialize for BindResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let object = self.object.to_json().map_err(serde::ser::Error::custom)?;
        let mut state = serializer.serialize_struct("BindResponse", 2)?;
        state.serialize_field("object", &object)?;
        state.serialize_field("metadata", &self.metadata)?;
        state.end()
    }
}

/// Failure payload returned to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    /// Error classification
    pub kind: ErrorKind,
    /// Human-readable message
    pub error: String,
}

impl From<Error> for ErrorResponse {
    fn from(err: Error) -> Self {
        Self {
            kind: err.kind(),
            error: err.to_string(),
        }
    }
}

/// Entry point for generic parse and typed bind requests
#[derive(Debug, Default)]
pub struct XmlService {
    converter: GenericTreeConverter,
    marshaller: XmlMarshaller,
}

impl XmlService {
    /// Create a service with the default converter and registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a service from its parts
    pub fn with_parts(converter: GenericTreeConverter, marshaller: XmlMarshaller) -> Self {
        Self {
            converter,
            marshaller,
        }
    }

    /// Get the typed marshaller
    pub fn marshaller(&self) -> &XmlMarshaller {
        &self.marshaller
    }

    /// Convert `xml` to a generic value plus root metadata
    pub fn parse(&self, xml: &str) -> Result<ParseResponse> {
        // Well-formedness is checked before the tree is built
        let doc = Document::from_string(xml)?;
        let root = doc.root();
        tracing::debug!(root = %root.name(), "generic parse");

        Ok(ParseResponse {
            data: self.converter.convert(root),
            metadata: XmlMetadata::of(root),
        })
    }

    /// Bind `xml` to the registered type named by `identifier`
    pub fn bind(&self, xml: &str, identifier: &str) -> Result<BindResponse> {
        let object = self.marshaller.unmarshal(xml, identifier)?;
        let metadata = self.marshaller.object_metadata(&*object)?;
        Ok(BindResponse { object, metadata })
    }

    /// [`XmlService::parse`] with failures mapped to an [`ErrorResponse`]
    pub fn handle_parse(&self, xml: &str) -> std::result::Result<ParseResponse, ErrorResponse> {
        self.parse(xml).map_err(|err| {
            tracing::debug!(error = %err, "parse request failed");
            ErrorResponse::from(err)
        })
    }

    /// [`XmlService::bind`] with failures mapped to an [`ErrorResponse`]
    pub fn handle_bind(
        &self,
        xml: &str,
        identifier: &str,
    ) -> std::result::Result<BindResponse, ErrorResponse> {
        self.bind(xml, identifier).map_err(|err| {
            tracing::debug!(%identifier, error = %err, "bind request failed");
            ErrorResponse::from(err)
        })
    }
}
