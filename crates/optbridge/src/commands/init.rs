//! Initialize adapter generation in a project.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command, writing next to `config_path`.
pub fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing optbridge...");

    let root = config_path.parent().unwrap_or(Path::new(""));
    let schemas_dir = root.join("schemas");

    if schemas_dir.exists() {
        if !yes {
            tracing::warn!("schemas/ directory already exists. Use --yes to overwrite.");
            return Ok(());
        }
    } else {
        fs::create_dir_all(&schemas_dir).context("Failed to create schemas directory")?;
    }

    if !config_path.exists() || yes {
        fs::write(config_path, DEFAULT_CONFIG)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        tracing::info!("Created {}", config_path.display());
    }

    let sample_path = schemas_dir.join("slider.yaml");
    if !sample_path.exists() || yes {
        fs::write(&sample_path, DEFAULT_SCHEMA).context("Failed to write slider.yaml")?;
        tracing::info!("Created schemas/slider.yaml");
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'optbridge generate' to generate adapters.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# optbridge configuration

[generator]
# Directory containing widget schemas (*.json, *.yaml)
schemas = "schemas"

# Output directory for generated adapters
output = "generated"

[paths]
# Import path of the adapter base component
base_component = "./core/component"

# Import path of the nested option base component
config_component = "./core/nested-option"
"#;

const DEFAULT_SCHEMA: &str = r#"name: Slider
dxExportPath: ui/slider
templates:
  - tooltipTemplate
subscribableOptions:
  - name: value
    type: number
nestedComponents:
  - className: Label
    ownerClassName: Slider
    optionName: label
    options:
      - name: visible
        type: boolean
        isSubscribable: true
      - name: format
        type: string
propTypings:
  - propName: value
    types: [number]
"#;
