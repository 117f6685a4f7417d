//! Declarative elements and the option tags that mark nested options.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::path::Props;

/// Static description carried by every nested-option element type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionTag {
    /// Type name of the element itself (e.g. "Column")
    pub component: String,

    /// Option name inside the owner's configuration (e.g. "columns")
    pub option_name: String,

    /// Type name the element must be declared under
    pub owner_type: String,

    /// Whether repeated declarations form an array of items
    pub is_collection_item: bool,

    /// External prop name -> option key, for subscribable sub-options
    pub defaults_props: BTreeMap<String, String>,
}

impl OptionTag {
    /// Create a single-slot option tag.
    pub fn new(
        component: impl Into<String>,
        option_name: impl Into<String>,
        owner_type: impl Into<String>,
    ) -> Self {
        Self {
            component: component.into(),
            option_name: option_name.into(),
            owner_type: owner_type.into(),
            is_collection_item: false,
            defaults_props: BTreeMap::new(),
        }
    }

    /// Mark the option as a collection of items.
    pub fn collection(mut self) -> Self {
        self.is_collection_item = true;
        self
    }

    /// Map the `prop` default prop onto the `option` key.
    pub fn with_default(mut self, prop: impl Into<String>, option: impl Into<String>) -> Self {
        self.defaults_props.insert(prop.into(), option.into());
        self
    }

    /// A tag is usable only with both an option name and an owner type.
    pub fn is_recognized(&self) -> bool {
        !self.option_name.is_empty() && !self.owner_type.is_empty()
    }
}

/// What kind of element this is.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// A nested option element
    Option(Rc<OptionTag>),
    /// Any other child (markup, templates, ...)
    Other(String),
}

/// A declarative element: a type plus its props.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    kind: ElementKind,
    props: Props,
}

impl Element {
    /// Create a nested option element.
    pub fn option(tag: Rc<OptionTag>, props: Props) -> Self {
        Self {
            kind: ElementKind::Option(tag),
            props,
        }
    }

    /// Create an element that does not describe an option.
    pub fn other(type_name: impl Into<String>, props: Props) -> Self {
        Self {
            kind: ElementKind::Other(type_name.into()),
            props,
        }
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    /// The option tag, if the element carries a recognized one.
    pub fn option_tag(&self) -> Option<&Rc<OptionTag>> {
        match &self.kind {
            ElementKind::Option(tag) if tag.is_recognized() => Some(tag),
            _ => None,
        }
    }
}

/// The type identity of whatever an element is declared under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    type_name: String,
    base_types: Vec<String>,
}

impl Owner {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            base_types: Vec::new(),
        }
    }

    /// Add a base type this owner also counts as.
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base_types.push(base.into());
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Whether this owner is `type_name` or derives from it.
    pub fn is_instance_of(&self, type_name: &str) -> bool {
        self.type_name == type_name || self.base_types.iter().any(|b| b == type_name)
    }
}
