//! Foreign package resolution
//!
//! The checker never introspects a host ecosystem itself. Imports of
//! foreign packages go through a [`ForeignResolver`], which maps a package
//! path to the names (and, where known, the types) it exports.

use crate::types::Type;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// What a resolver knows about one foreign package
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignPackage {
    /// The package's own name, used when the import does not rename it
    pub name: String,
    /// Exported names; `None` when the type of an export is not known
    pub exports: BTreeMap<String, Option<Type>>,
}

impl ForeignPackage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            exports: BTreeMap::new(),
        }
    }

    /// Add an export whose type is known
    pub fn export(mut self, name: impl Into<String>, ty: Type) -> Self {
        self.exports.insert(name.into(), Some(ty));
        self
    }

    /// Add an export known by name only
    pub fn export_untyped(mut self, name: impl Into<String>) -> Self {
        self.exports.insert(name.into(), None);
        self
    }
}

/// Errors from resolving a foreign package
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("package {0:?} not found")]
    NotFound(String),
    #[error("resolving {path:?} failed: {reason}")]
    Failed { path: String, reason: String },
}

/// Maps foreign package paths to their exports
pub trait ForeignResolver {
    fn resolve(&self, path: &str) -> Result<ForeignPackage, ResolveError>;
}

/// Resolver that knows no packages at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoForeignPackages;

impl ForeignResolver for NoForeignPackages {
    fn resolve(&self, path: &str) -> Result<ForeignPackage, ResolveError> {
        Err(ResolveError::NotFound(path.to_string()))
    }
}

/// In-memory resolver over a fixed set of packages
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    packages: HashMap<String, ForeignPackage>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_package(mut self, path: impl Into<String>, package: ForeignPackage) -> Self {
        self.packages.insert(path.into(), package);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, package: ForeignPackage) {
        self.packages.insert(path.into(), package);
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl ForeignResolver for StaticResolver {
    fn resolve(&self, path: &str) -> Result<ForeignPackage, ResolveError> {
        self.packages
            .get(path)
            .cloned()
            .ok_or_else(|| ResolveError::NotFound(path.to_string()))
    }
}

/// A package's default local name: the last segment of its path
pub fn default_name(path: &str) -> String {
    path.rsplit('/').next().unwrap_or(path).to_string()
}
