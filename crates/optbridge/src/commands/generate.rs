//! Adapter generation command.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use optbridge_codegen::{generate, ComponentSchema, SchemaCatalog};
use rayon::prelude::*;
use serde::Deserialize;

/// Configuration file structure (optbridge.toml).
#[derive(Debug, Deserialize, Default)]
pub(crate) struct ConfigFile {
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeneratorConfig {
    #[serde(default = "default_schemas")]
    pub schemas: String,
    #[serde(default = "default_output")]
    pub output: String,
}

/// Import paths filled into schemas that leave them out.
#[derive(Debug, Deserialize)]
pub(crate) struct PathsConfig {
    #[serde(default = "default_base_component")]
    pub base_component: String,
    #[serde(default = "default_config_component")]
    pub config_component: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            schemas: default_schemas(),
            output: default_output(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            base_component: default_base_component(),
            config_component: default_config_component(),
        }
    }
}

fn default_schemas() -> String {
    "schemas".to_string()
}
fn default_output() -> String {
    "generated".to_string()
}
fn default_base_component() -> String {
    "./core/component".to_string()
}
fn default_config_component() -> String {
    "./core/nested-option".to_string()
}

/// Load configuration if the file exists.
/// Returns an error if the config file exists but is malformed.
pub(crate) fn load_config(config_path: &Path) -> Result<ConfigFile> {
    if config_path.exists() {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;
        tracing::info!("Loaded config from {}", config_path.display());
        return Ok(config);
    }
    Ok(ConfigFile::default())
}

/// Run the generate command.
pub fn run(
    config_path: &Path,
    schemas: Option<PathBuf>,
    output: Option<PathBuf>,
    check: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let root = config_path.parent().unwrap_or(Path::new(""));

    let schemas_dir = schemas.unwrap_or_else(|| root.join(&config.generator.schemas));
    let output_dir = output.unwrap_or_else(|| root.join(&config.generator.output));

    let mut catalog = SchemaCatalog::new();
    let count = catalog
        .scan(&schemas_dir)
        .with_context(|| format!("Failed to scan {}", schemas_dir.display()))?;
    if count == 0 {
        tracing::warn!("No schemas found in {}", schemas_dir.display());
        return Ok(());
    }
    tracing::info!("Found {} schemas in {}", count, schemas_dir.display());

    let cached: Vec<_> = catalog.iter().collect();
    let mut outputs: Vec<(PathBuf, String)> = cached
        .par_iter()
        .map(|cached| -> Result<(PathBuf, String)> {
            let schema = with_default_paths(cached.schema.clone(), &config.paths);
            let source = generate(&schema).with_context(|| {
                format!("Failed to generate {}", cached.source_path.display())
            })?;
            Ok((output_dir.join(output_file_name(&schema.name)), source))
        })
        .collect::<Result<_>>()?;
    outputs.sort_by(|a, b| a.0.cmp(&b.0));

    if check {
        let stale: Vec<String> = outputs
            .iter()
            .filter(|(path, source)| fs::read_to_string(path).ok().as_deref() != Some(source.as_str()))
            .map(|(path, _)| path.display().to_string())
            .collect();
        if !stale.is_empty() {
            anyhow::bail!("{} generated files are out of date: {}", stale.len(), stale.join(", "));
        }
        tracing::info!("All {} generated files are up to date", outputs.len());
        return Ok(());
    }

    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;
    for (path, source) in &outputs {
        fs::write(path, source).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::debug!("Wrote {}", path.display());
    }

    tracing::info!("Generated {} adapters into {}", outputs.len(), output_dir.display());

    Ok(())
}

/// Fill import paths the schema leaves out from the config.
fn with_default_paths(mut schema: ComponentSchema, paths: &PathsConfig) -> ComponentSchema {
    if schema.base_component_path.is_empty() {
        schema.base_component_path = paths.base_component.clone();
    }
    if schema.config_component_path.is_none() {
        schema.config_component_path = Some(paths.config_component.clone());
    }
    schema
}

/// `DataGrid` -> `data-grid.ts`
fn output_file_name(name: &str) -> String {
    let mut file = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c.is_uppercase() && prev_lower {
            file.push('-');
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        file.extend(c.to_lowercase());
    }
    file.push_str(".ts");
    file
}
