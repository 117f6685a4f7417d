//! Splitting element props into options, defaults and templates.

use std::collections::BTreeMap;

use crate::path::Props;

/// Props that are never forwarded as options.
const IGNORED_PROPS: &[&str] = &["children"];

/// Template option and the two props that can provide it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateProp {
    /// Widget option receiving the template (e.g. "itemTemplate")
    pub tmpl_option: String,
    /// Render-function prop (e.g. "itemRender")
    pub render: String,
    /// Component prop (e.g. "itemComponent")
    pub component: String,
}

impl TemplateProp {
    /// Derive the render/component prop names from a template option name.
    ///
    /// `itemTemplate` maps to `itemRender`/`itemComponent`; a bare `template`
    /// maps to `render`/`component`.
    pub fn from_option(tmpl_option: &str) -> Self {
        let prefix = tmpl_option
            .strip_suffix("Template")
            .or_else(|| tmpl_option.strip_suffix("template"))
            .unwrap_or(tmpl_option);

        let (render, component) = if prefix.is_empty() {
            ("render".to_string(), "component".to_string())
        } else {
            (format!("{prefix}Render"), format!("{prefix}Component"))
        };

        Self {
            tmpl_option: tmpl_option.to_string(),
            render,
            component,
        }
    }
}

/// Result of [`separate_props`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeparatedProps {
    pub options: Props,
    pub defaults: Props,
    pub templates: Props,
}

/// Split `props` into plain options, defaults and template props.
///
/// A key listed in `defaults_props` lands in `defaults` under the option key
/// it maps to; a key naming a template's render or component prop lands in
/// `templates`; everything else is an option.
pub fn separate_props(
    props: &Props,
    defaults_props: &BTreeMap<String, String>,
    template_props: &[TemplateProp],
) -> SeparatedProps {
    let mut separated = SeparatedProps::default();

    for (key, value) in props {
        if IGNORED_PROPS.contains(&key.as_str()) {
            continue;
        }

        if let Some(option) = defaults_props.get(key) {
            separated.defaults.insert(option.clone(), value.clone());
            continue;
        }

        if template_props
            .iter()
            .any(|t| t.render == *key || t.component == *key)
        {
            separated.templates.insert(key.clone(), value.clone());
            continue;
        }

        separated.options.insert(key.clone(), value.clone());
    }

    separated
}
