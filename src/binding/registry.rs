//! Registry of bindable types
//!
//! Maps type identifiers to the function that builds their binding context.
//! Only types registered here can be bound from an identifier string.

use indexmap::IndexMap;

use super::model::Book;
use super::{Bindable, BindingContext};
use crate::error::{Error, Result};

/// Entry of the registry for one bindable type
#[derive(Debug, Clone, Copy)]
pub struct TypeDescriptor {
    identifier: &'static str,
    root_element: &'static str,
    build: fn() -> Result<BindingContext>,
}

impl TypeDescriptor {
    /// Describe `T`
    pub fn of<T: Bindable>() -> Self {
        Self {
            identifier: T::identifier(),
            root_element: T::ROOT_ELEMENT,
            build: BindingContext::for_type::<T>,
        }
    }

    /// Type identifier
    pub fn identifier(&self) -> &'static str {
        self.identifier
    }

    /// Document element of the type
    pub fn root_element(&self) -> &'static str {
        self.root_element
    }

    /// Build a fresh binding context for the type
    pub fn build(&self) -> Result<BindingContext> {
        (self.build)()
    }
}

/// Closed set of types that may be bound by identifier
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: IndexMap<&'static str, TypeDescriptor>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the types shipped with the crate
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register::<Book>();
        registry
    }

    /// Register `T` under its identifier
    pub fn register<T: Bindable>(&mut self) -> &mut Self {
        let descriptor = TypeDescriptor::of::<T>();
        tracing::debug!(identifier = descriptor.identifier(), "registering bindable type");
        self.types.insert(descriptor.identifier(), descriptor);
        self
    }

    /// Look up the descriptor for `identifier`
    pub fn resolve(&self, identifier: &str) -> Result<&TypeDescriptor> {
        self.types
            .get(identifier)
            .ok_or_else(|| Error::TargetTypeNotFound(identifier.to_string()))
    }

    /// Check if `identifier` is registered
    pub fn contains(&self, identifier: &str) -> bool {
        self.types.contains_key(identifier)
    }

    /// Registered identifiers in registration order
    pub fn identifiers(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.types.keys().copied()
    }

    /// Registered descriptors in registration order
    pub fn descriptors(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.values()
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if no types are registered
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_defaults_include_book() {
        let registry = TypeRegistry::with_defaults();
        assert!(registry.contains(Book::identifier()));
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.resolve(Book::identifier()).unwrap().root_element(),
            "book"
        );
    }

    #[test]
    fn test_unknown_identifier() {
        let registry = TypeRegistry::with_defaults();
        let err = registry.resolve("does.not.Exist").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TargetTypeNotFound);
    }

    #[test]
    fn test_empty_registry() {
        let registry = TypeRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.resolve(Book::identifier()).is_err());
    }

    #[test]
    fn test_descriptor_builds_context() {
        let descriptor = TypeDescriptor::of::<Book>();
        let context = descriptor.build().unwrap();
        assert_eq!(context.identifier(), descriptor.identifier());
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = TypeRegistry::new();
        registry.register::<Book>().register::<Book>();
        assert_eq!(registry.identifiers().collect::<Vec<_>>(), vec![Book::identifier()]);
    }
}
