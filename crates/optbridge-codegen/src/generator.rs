//! Adapter source generator.

use std::sync::LazyLock;

use optbridge_core::TemplateProp;
use regex::Regex;

use crate::schema::{ComponentSchema, NestedComponent, NestedProp, PropTyping};

static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("Invalid identifier regex"));

/// Errors that can occur while generating an adapter.
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    #[error("Invalid identifier for {field}: {value:?}")]
    InvalidIdentifier { field: &'static str, value: String },

    #[error("{0} declares nested components but no configComponentPath")]
    MissingConfigComponentPath(String),
}

/// Generate the adapter source for `schema`.
///
/// Output is deterministic: the same schema always yields the same text.
pub fn generate(schema: &ComponentSchema) -> Result<String, CodegenError> {
    validate(schema)?;

    let name = &schema.name;
    let templates: Vec<TemplateProp> = schema
        .templates
        .iter()
        .map(|t| TemplateProp::from_option(t))
        .collect();
    let has_own_options = !templates.is_empty() || !schema.subscribable_options.is_empty();
    let prop_types = render_prop_typings(&schema.prop_typings);

    let mut out = String::new();

    // Widget import
    out.push_str(&format!("import dx{name}, {{\n"));
    if has_own_options {
        out.push_str("    IOptions\n");
    } else {
        out.push_str(&format!("    IOptions as I{name}Options\n"));
    }
    out.push_str(&format!("}} from \"devextreme/{}\";\n\n", schema.dx_export_path));

    // Support imports
    if !prop_types.is_empty() {
        out.push_str("import { PropTypes } from \"prop-types\";\n");
    }
    let base = if schema.is_extension {
        "ExtensionComponent"
    } else {
        "Component"
    };
    out.push_str(&format!(
        "import {{ {base} as BaseComponent }} from \"{}\";\n",
        schema.base_component_path
    ));
    if !schema.nested_components.is_empty() {
        let path = schema
            .config_component_path
            .as_deref()
            .ok_or_else(|| CodegenError::MissingConfigComponentPath(name.clone()))?;
        out.push_str(&format!("import NestedOption from \"{path}\";\n"));
    }
    out.push('\n');

    if has_own_options {
        out.push_str(&format!("interface I{name}Options extends IOptions {{\n"));
        for t in &templates {
            out.push_str(&format!("  {}?: (props: any) => React.ReactNode;\n", t.render));
            out.push_str(&format!("  {}?: React.ComponentType<any>;\n", t.component));
        }
        for option in &schema.subscribable_options {
            out.push_str(&format!(
                "  {}?: {};\n",
                default_prop_name(&option.name),
                option.type_name
            ));
        }
        out.push_str("}\n\n");
    }

    render_widget_class(&mut out, schema, &templates);

    if !schema.nested_components.is_empty() {
        out.push_str("// tslint:disable:max-classes-per-file\n\n");
        for component in &schema.nested_components {
            render_nested_class(&mut out, component);
            out.push('\n');
        }
        for component in &schema.nested_components {
            out.push_str(&format!(
                "({} as any).OwnerType = {};\n",
                component.class_name, component.owner_class_name
            ));
        }
        out.push('\n');
    }

    if !prop_types.is_empty() {
        out.push_str(&format!("({name} as any).propTypes = {{\n"));
        out.push_str(&prop_types.join(",\n"));
        out.push_str("\n};\n");
    }

    let mut exports = vec![name.clone(), format!("I{name}Options")];
    exports.extend(schema.nested_components.iter().map(|c| c.class_name.clone()));

    out.push_str(&format!("export default {name};\n"));
    out.push_str("export {\n");
    out.push_str(
        &exports
            .iter()
            .map(|e| format!("  {e}"))
            .collect::<Vec<_>>()
            .join(",\n"),
    );
    out.push_str("\n};\n");

    Ok(out)
}

fn validate(schema: &ComponentSchema) -> Result<(), CodegenError> {
    check_identifier("name", &schema.name)?;
    for component in &schema.nested_components {
        check_identifier("className", &component.class_name)?;
        check_identifier("ownerClassName", &component.owner_class_name)?;
    }
    Ok(())
}

fn check_identifier(field: &'static str, value: &str) -> Result<(), CodegenError> {
    if IDENTIFIER_RE.is_match(value) {
        Ok(())
    } else {
        Err(CodegenError::InvalidIdentifier {
            field,
            value: value.to_string(),
        })
    }
}

fn render_widget_class(out: &mut String, schema: &ComponentSchema, templates: &[TemplateProp]) {
    let name = &schema.name;

    out.push_str(&format!(
        "class {name} extends BaseComponent<I{name}Options> {{\n\n"
    ));
    out.push_str(&format!("  public get instance(): dx{name} {{\n"));
    out.push_str("    return this._instance;\n");
    out.push_str("  }\n\n");
    out.push_str(&format!("  protected _WidgetClass = dx{name};\n"));

    if !templates.is_empty() {
        let entries: Vec<String> = templates
            .iter()
            .map(|t| {
                format!(
                    "{{\n    tmplOption: \"{}\",\n    render: \"{}\",\n    component: \"{}\"\n  }}",
                    t.tmpl_option, t.render, t.component
                )
            })
            .collect();
        out.push_str(&format!(
            "\n  protected _templateProps = [{}];\n",
            entries.join(", ")
        ));
    }

    if !schema.subscribable_options.is_empty() {
        let entries: Vec<String> = schema
            .subscribable_options
            .iter()
            .map(|o| format!("    {}: \"{}\"", default_prop_name(&o.name), o.name))
            .collect();
        out.push_str("\n  protected _defaults = {\n");
        out.push_str(&entries.join(",\n"));
        out.push_str("\n  };\n");
    }

    out.push_str("}\n");
}

fn render_nested_class(out: &mut String, component: &NestedComponent) {
    let subscribable: Vec<(&str, &str)> = component
        .options
        .iter()
        .filter(|o| o.is_subscribable && o.nested.is_empty())
        .map(|o| (o.name.as_str(), o.type_name.as_deref().unwrap_or("any")))
        .collect();

    out.push_str(&format!(
        "class {} extends NestedOption<{{\n",
        component.class_name
    ));
    render_fields(out, &component.options, 1);
    for (option, type_name) in &subscribable {
        out.push_str(&format!("  {}?: {};\n", default_prop_name(option), type_name));
    }
    out.push_str("}> {\n");

    out.push_str(&format!(
        "  public static OptionName = \"{}\";\n",
        component.option_name
    ));
    if !subscribable.is_empty() {
        let entries: Vec<String> = subscribable
            .iter()
            .map(|(option, _)| format!("    {}: \"{}\"", default_prop_name(option), option))
            .collect();
        out.push_str("  public static DefaultsProps = {\n");
        out.push_str(&entries.join(",\n"));
        out.push_str("\n  };\n");
    }
    if component.is_collection_item {
        out.push_str("  public static IsCollectionItem = true;\n");
    }
    out.push_str("}\n");
}

fn render_fields(out: &mut String, props: &[NestedProp], depth: usize) {
    let indent = "  ".repeat(depth);
    for prop in props {
        if prop.nested.is_empty() {
            let type_name = prop.type_name.as_deref().unwrap_or("any");
            out.push_str(&format!("{indent}{}?: {type_name};\n", prop.name));
        } else {
            out.push_str(&format!("{indent}{}?: {{\n", prop.name));
            render_fields(out, &prop.nested, depth + 1);
            out.push_str(&format!("{indent}}};\n"));
        }
    }
}

/// Rendered `propTypes` entries, sorted by prop name ignoring case with
/// uppercase first on ties.
fn render_prop_typings(typings: &[PropTyping]) -> Vec<String> {
    let mut sorted: Vec<&PropTyping> = typings.iter().collect();
    sorted.sort_by(|a, b| {
        a.prop_name
            .to_lowercase()
            .cmp(&b.prop_name.to_lowercase())
            .then_with(|| a.prop_name.cmp(&b.prop_name))
    });

    sorted
        .into_iter()
        .filter_map(|typing| {
            let check = if !typing.acceptable_values.is_empty() {
                let values: Vec<String> = typing
                    .acceptable_values
                    .iter()
                    .map(|v| format!("    {v}"))
                    .collect();
                format!("PropTypes.oneOf([\n{}\n  ])", values.join(",\n"))
            } else {
                match typing.types.as_slice() {
                    [] => return None,
                    [single] => format!("PropTypes.{single}"),
                    several => {
                        let types: Vec<String> = several
                            .iter()
                            .map(|t| format!("    PropTypes.{t}"))
                            .collect();
                        format!("PropTypes.oneOfType([\n{}\n  ])", types.join(",\n"))
                    }
                }
            };
            Some(format!("  {}: {}", typing.prop_name, check))
        })
        .collect()
}

/// `value` -> `defaultValue`.
fn default_prop_name(option: &str) -> String {
    let mut chars = option.chars();
    match chars.next() {
        Some(first) => format!("default{}{}", first.to_uppercase(), chars.as_str()),
        None => "default".to_string(),
    }
}
