//! Schema model describing one widget adapter.

use serde::Deserialize;

/// Everything needed to generate one adapter.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSchema {
    /// Adapter class name (e.g. "DataGrid")
    pub name: String,

    /// Import path of the adapter base component
    #[serde(default)]
    pub base_component_path: String,

    /// Import path of the nested option base component
    #[serde(default)]
    pub config_component_path: Option<String>,

    /// Widget module path under "devextreme/"
    pub dx_export_path: String,

    /// Generate an extension component instead of a regular one
    #[serde(default)]
    pub is_extension: bool,

    /// Template option names (e.g. "itemTemplate")
    #[serde(default)]
    pub templates: Vec<String>,

    /// Options that get an uncontrolled `defaultX` counterpart
    #[serde(default)]
    pub subscribable_options: Vec<SubscribableOption>,

    /// Nested option components
    #[serde(default)]
    pub nested_components: Vec<NestedComponent>,

    /// Runtime prop type checks
    #[serde(default)]
    pub prop_typings: Vec<PropTyping>,
}

impl ComponentSchema {
    /// Parse a schema from JSON.
    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    /// Parse a schema from YAML.
    pub fn from_yaml(source: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(source)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SubscribableOption {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

/// A nested option component class.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NestedComponent {
    pub class_name: String,
    pub owner_class_name: String,
    pub option_name: String,
    #[serde(default)]
    pub is_collection_item: bool,
    #[serde(default)]
    pub options: Vec<NestedProp>,
}

/// One field of a nested option, possibly with its own sub-fields.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NestedProp {
    pub name: String,
    #[serde(default, rename = "type")]
    pub type_name: Option<String>,
    #[serde(default)]
    pub is_subscribable: bool,
    #[serde(default)]
    pub nested: Vec<NestedProp>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropTyping {
    pub prop_name: String,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub acceptable_values: Vec<String>,
}
