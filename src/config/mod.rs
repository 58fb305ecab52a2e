//! Checker configuration (numgrad.toml)

use crate::typechecker::{bridge, ForeignPackage, StaticResolver};
use crate::types::Type;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the working directory when no path is given
pub const CONFIG_FILE: &str = "numgrad.toml";

/// Checker configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Lint switches
    #[serde(default)]
    pub lint: LintConfig,

    /// Foreign packages available to `import`
    #[serde(default)]
    pub foreign: ForeignConfig,
}

/// Lint switches
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LintConfig {
    /// Warn about `:=` variables that are never used (W0001)
    #[serde(default)]
    pub unused_variables: bool,
}

/// Foreign package table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForeignConfig {
    /// Packages keyed by import path
    #[serde(default)]
    pub packages: HashMap<String, PackageConfig>,
}

/// One foreign package
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageConfig {
    /// Package name; defaults to the last segment of the import path
    #[serde(default)]
    pub name: Option<String>,

    /// Exported names whose types are not known
    #[serde(default)]
    pub exports: Vec<String>,

    /// Exported names with known types
    #[serde(default)]
    pub types: BTreeMap<String, Type>,
}

impl Config {
    /// Load a configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content)
    }

    /// Load `path` if given, else `numgrad.toml` from `dir` if present,
    /// else the defaults
    pub fn discover(path: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "using configuration");
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse a configuration from a TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Build the resolver for the configured foreign packages
    pub fn resolver(&self) -> StaticResolver {
        let mut resolver = StaticResolver::new();
        for (path, package) in &self.foreign.packages {
            resolver.insert(path.clone(), package.to_package(path));
        }
        resolver
    }
}

impl PackageConfig {
    fn to_package(&self, path: &str) -> ForeignPackage {
        let name = self
            .name
            .clone()
            .unwrap_or_else(|| bridge::default_name(path));
        let mut package = ForeignPackage::new(name);
        for export in &self.exports {
            package = package.export_untyped(export.clone());
        }
        for (export, ty) in &self.types {
            package = package.export(export.clone(), ty.clone());
        }
        package
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests;
