//! Input limits
//!
//! The size bound is applied by the I/O layer when loading documents (see
//! [`crate::loaders::Loader`]). The depth bound is applied by the
//! well-formedness check before any recursive parse runs.

use crate::error::{Error, Result};

/// Limits applied when loading XML input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum XML input size in bytes
    pub max_xml_size: usize,
    /// Maximum element nesting depth
    pub max_xml_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_xml_size: 100 * 1024 * 1024, // 100 MB
            max_xml_depth: 256,
        }
    }
}

impl Limits {
    /// Create a new Limits with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create strict limits (more restrictive)
    pub fn strict() -> Self {
        Self {
            max_xml_size: 10 * 1024 * 1024, // 10 MB
            max_xml_depth: 100,
        }
    }

    /// Create permissive limits (less restrictive, use with caution)
    pub fn permissive() -> Self {
        Self {
            max_xml_size: 1024 * 1024 * 1024, // 1 GB
            max_xml_depth: 1000,
        }
    }

    /// Set the maximum XML size
    pub fn with_max_xml_size(mut self, max: usize) -> Self {
        self.max_xml_size = max;
        self
    }

    /// Set the maximum nesting depth
    pub fn with_max_xml_depth(mut self, max: usize) -> Self {
        self.max_xml_depth = max;
        self
    }

    /// Check if XML depth is within limits
    pub fn check_xml_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_xml_depth {
            Err(Error::LimitExceeded(format!(
                "XML depth {} exceeds maximum {}",
                depth, self.max_xml_depth
            )))
        } else {
            Ok(())
        }
    }

    /// Check if XML size is within limits
    pub fn check_xml_size(&self, size: usize) -> Result<()> {
        if size > self.max_xml_size {
            Err(Error::LimitExceeded(format!(
                "XML size {} bytes exceeds maximum {} bytes",
                size, self.max_xml_size
            )))
        } else {
            Ok(())
        }
    }
}
