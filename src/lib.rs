//! # xmlbind
//!
//! Dual-mode XML processing:
//!
//! - **Generic conversion**: arbitrary, schema-less XML becomes a
//!   JSON-compatible [`GenericValue`] tree, plus metadata about the root
//!   element (declared namespaces and a one-level structure summary).
//! - **Typed binding**: XML is unmarshalled into, and marshalled from,
//!   registered Rust types through cached binding contexts.
//!
//! ## Example
//!
//! ```rust
//! use xmlbind::XmlService;
//!
//! let service = XmlService::new();
//! let response = service.parse(r#"<shelf><book/><book/><note/></shelf>"#)?;
//!
//! assert_eq!(response.metadata.root_element, "shelf");
//! assert_eq!(response.metadata.structure.count_of("book"), 2);
//! # Ok::<(), xmlbind::Error>(())
//! ```
//!
//! ```rust
//! use xmlbind::binding::{model::Book, Bindable, XmlMarshaller};
//!
//! let marshaller = XmlMarshaller::default();
//! let xml = "<book><title>Emma</title><author>Jane Austen</author></book>";
//! let bound = marshaller.unmarshal(xml, Book::identifier())?;
//!
//! assert_eq!(bound.downcast_ref::<Book>().map(|b| b.year), Some(0));
//! # Ok::<(), xmlbind::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod limits;
pub mod names;

// Parsing
pub mod documents;
pub mod loaders;
pub mod namespaces;
pub mod wellformed;

// Generic conversion
pub mod converters;

// Typed binding
pub mod binding;

// Request boundary
pub mod service;

// Re-exports for convenience
pub use converters::{GenericValue, XmlMetadata};
pub use error::{Error, ErrorKind, Result};
pub use service::{BindResponse, ErrorResponse, ParseResponse, XmlService};
pub use wellformed::is_well_formed;

/// Version of the xmlbind library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
