//! Bundled resources that hold the engine payload.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use hljs_mcp_core::{Error, Result};

/// Read-only store of UTF-8 script resources addressed by name and extension.
pub trait ResourceBundle: Send + Sync {
    /// Load `name.extension` as text.
    ///
    /// Fails with [`Error::ResourceNotFound`] when the resource is absent.
    fn load(&self, name: &str, extension: &str) -> Result<String>;
}

/// Resources stored as files under a root directory.
#[derive(Debug, Clone)]
pub struct DirectoryBundle {
    root: PathBuf,
}

impl DirectoryBundle {
    /// Create a bundle rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ResourceBundle for DirectoryBundle {
    fn load(&self, name: &str, extension: &str) -> Result<String> {
        let path = self.root.join(format!("{name}.{extension}"));
        std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::ResourceNotFound {
                name: name.to_string(),
                extension: extension.to_string(),
            },
            _ => Error::Io(e),
        })
    }
}

/// Resources compiled into the binary or built in memory.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedBundle {
    entries: HashMap<String, String>,
}

impl EmbeddedBundle {
    /// Create an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource, replacing any previous one with the same name.
    pub fn with_resource(
        mut self,
        name: &str,
        extension: &str,
        source: impl Into<String>,
    ) -> Self {
        self.entries
            .insert(format!("{name}.{extension}"), source.into());
        self
    }

    /// Number of resources in the bundle.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bundle holds no resources.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResourceBundle for EmbeddedBundle {
    fn load(&self, name: &str, extension: &str) -> Result<String> {
        self.entries
            .get(&format!("{name}.{extension}"))
            .cloned()
            .ok_or_else(|| Error::ResourceNotFound {
                name: name.to_string(),
                extension: extension.to_string(),
            })
    }
}
