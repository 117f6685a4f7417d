//! Schema catalog for looking up widget schemas by name.
//!
//! Scans a schemas directory, parses JSON and YAML schema files, and
//! provides lookup by widget name for generating adapters.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::generator::{generate, CodegenError};
use crate::schema::ComponentSchema;

/// A catalog of widget schemas.
#[derive(Debug, Default)]
pub struct SchemaCatalog {
    /// Cached schemas by name (lowercase)
    schemas: HashMap<String, CachedSchema>,
}

/// A parsed schema with the file it came from.
#[derive(Debug, Clone)]
pub struct CachedSchema {
    /// Source file path
    pub source_path: PathBuf,

    /// Parsed schema
    pub schema: ComponentSchema,
}

impl SchemaCatalog {
    /// Create a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan a directory for schema files and populate the catalog.
    pub fn scan(&mut self, schemas_dir: &Path) -> Result<usize, CatalogError> {
        if !schemas_dir.exists() {
            return Err(CatalogError::DirectoryNotFound(
                schemas_dir.display().to_string(),
            ));
        }

        let mut count = 0;

        for entry in WalkDir::new(schemas_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if !matches!(ext, "json" | "yaml" | "yml") {
                continue;
            }

            let source = match fs::read_to_string(path) {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", path.display(), e);
                    continue;
                }
            };

            let parsed = if ext == "json" {
                ComponentSchema::from_json(&source).map_err(|e| e.to_string())
            } else {
                ComponentSchema::from_yaml(&source).map_err(|e| e.to_string())
            };
            let schema = match parsed {
                Ok(schema) => schema,
                Err(e) => {
                    tracing::warn!("Skipping invalid schema {}: {}", path.display(), e);
                    continue;
                }
            };

            match self.insert(path.to_path_buf(), schema) {
                Some(replaced) => tracing::warn!(
                    "{} replaces {} with the same widget name",
                    path.display(),
                    replaced.source_path.display()
                ),
                None => count += 1,
            }
        }

        Ok(count)
    }

    /// Add a schema, returning the one it replaced with the same name.
    pub fn insert(&mut self, source_path: PathBuf, schema: ComponentSchema) -> Option<CachedSchema> {
        self.schemas.insert(
            schema.name.to_lowercase(),
            CachedSchema {
                source_path,
                schema,
            },
        )
    }

    /// Look up a schema by widget name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&CachedSchema> {
        self.schemas.get(&name.to_lowercase())
    }

    /// Check if a schema exists.
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(&name.to_lowercase())
    }

    /// All registered widget names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .schemas
            .values()
            .map(|c| c.schema.name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Iterate over all cached schemas.
    pub fn iter(&self) -> impl Iterator<Item = &CachedSchema> {
        self.schemas.values()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Generate the adapter source for a registered widget.
    pub fn generate(&self, name: &str) -> Result<String, CatalogError> {
        let cached = self
            .get(name)
            .ok_or_else(|| CatalogError::SchemaNotFound(name.to_string()))?;

        Ok(generate(&cached.schema)?)
    }
}

/// Errors that can occur with the catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Schemas directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("Schema not found: {0}")]
    SchemaNotFound(String),

    #[error(transparent)]
    Codegen(#[from] CodegenError),
}
