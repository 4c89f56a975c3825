//! XML input loading
//!
//! This module reads XML text from files, standard input or memory and
//! applies the configured [`Limits`] before the text reaches the core.

use crate::error::{Error, Result};
use crate::limits::Limits;
use std::fs;
use std::io::Read;
use std::path::PathBuf;

/// Where XML input comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// File system path
    Path(PathBuf),
    /// Standard input
    Stdin,
    /// In-memory text
    String(String),
}

impl Source {
    /// Interpret a command-line argument: `-` means standard input
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            Source::Stdin
        } else {
            Source::Path(PathBuf::from(arg))
        }
    }
}

/// Resource loader for XML documents
#[derive(Debug, Default)]
pub struct Loader {
    /// Resource limits
    limits: Limits,
}

impl Loader {
    /// Create a new loader with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Get the limits
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Load a source as a string
    pub fn load(&self, source: &Source) -> Result<String> {
        let content = match source {
            Source::Path(path) => {
                let size = fs::metadata(path)
                    .map_err(|e| {
                        Error::Io(std::io::Error::new(
                            e.kind(),
                            format!("Failed to read file '{}': {}", path.display(), e),
                        ))
                    })?
                    .len();
                self.limits
                    .check_xml_size(usize::try_from(size).unwrap_or(usize::MAX))?;
                fs::read_to_string(path)?
            }
            Source::Stdin => {
                let mut content = String::new();
                let cap = u64::try_from(self.limits.max_xml_size)
                    .unwrap_or(u64::MAX)
                    .saturating_add(1);
                std::io::stdin().take(cap).read_to_string(&mut content)?;
                content
            }
            Source::String(s) => s.clone(),
        };

        self.limits.check_xml_size(content.len())?;
        tracing::debug!(bytes = content.len(), "loaded XML input");
        Ok(content)
    }
}
