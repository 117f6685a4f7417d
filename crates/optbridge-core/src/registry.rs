//! Nested-option registry.
//!
//! Records which declarative children describe nested option groups of an
//! owner, mirroring the owner/child structure of the tree, and flattens them
//! on demand into the plain configuration object a widget expects.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde_json::Value;

use crate::config::separate_props;
use crate::element::{Element, OptionTag, Owner};
use crate::path::Props;

pub(crate) type SharedProps = Rc<RefCell<Props>>;
pub(crate) type SharedScope = Rc<RefCell<OptionScope>>;

/// Descriptors declared under one owner, in first-declaration order.
#[derive(Debug, Default)]
pub(crate) struct OptionScope {
    descriptors: Vec<NestedOptionDescr>,
}

impl OptionScope {
    fn ensure(&mut self, tag: &OptionTag) -> &mut NestedOptionDescr {
        let index = match self
            .descriptors
            .iter()
            .position(|d| d.name == tag.option_name)
        {
            Some(index) => index,
            None => {
                self.descriptors.push(NestedOptionDescr::new(tag));
                self.descriptors.len() - 1
            }
        };
        &mut self.descriptors[index]
    }

    fn get(&self, name: &str) -> Option<&NestedOptionDescr> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    fn flatten(&self) -> Props {
        self.descriptors
            .iter()
            .filter_map(|descr| Some((descr.name.clone(), descr.value()?)))
            .collect()
    }
}

/// One declaration of a nested option: live props plus its own children.
#[derive(Debug)]
struct ElementEntry {
    props: SharedProps,
    children: SharedScope,
}

/// All declarations of one option name within a scope.
#[derive(Debug)]
pub(crate) struct NestedOptionDescr {
    name: String,
    defaults: BTreeMap<String, String>,
    is_collection_item: bool,
    entries: Vec<ElementEntry>,
}

impl NestedOptionDescr {
    fn new(tag: &OptionTag) -> Self {
        Self {
            name: tag.option_name.clone(),
            defaults: tag.defaults_props.clone(),
            is_collection_item: tag.is_collection_item,
            entries: Vec::new(),
        }
    }

    /// Flattened value: every entry for a collection, the last one otherwise.
    pub(crate) fn value(&self) -> Option<Value> {
        let merged = self.entries.iter().map(|entry| self.merge(entry));

        if self.is_collection_item {
            Some(Value::Array(merged.map(Value::Object).collect()))
        } else {
            merged.last().map(Value::Object)
        }
    }

    fn merge(&self, entry: &ElementEntry) -> Props {
        let separated = separate_props(&entry.props.borrow(), &self.defaults, &[]);

        let mut merged = separated.defaults;
        merged.extend(separated.options);
        merged.extend(entry.children.borrow().flatten());
        merged
    }
}

/// A successful registration, handed to the element's adapter.
#[derive(Debug)]
pub(crate) struct Registration {
    pub full_name: String,
    pub tag: Rc<OptionTag>,
    pub props: SharedProps,
    pub children: SharedScope,
}

/// The registry's parent scope for a nested registration.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ParentScope<'a> {
    pub full_name: &'a str,
    pub children: &'a SharedScope,
}

/// Top-level nested option descriptors of one adapter.
#[derive(Debug, Default)]
pub struct NestedOptionRegistry {
    root: SharedScope,
}

impl NestedOptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `element` declared under `owner`.
    ///
    /// Returns `None` when the element is not a nested option of that owner,
    /// so arbitrary children can sit next to option elements.
    pub(crate) fn register(
        &self,
        element: &Element,
        owner: &Owner,
        parent: Option<ParentScope<'_>>,
    ) -> Option<Registration> {
        let Some(tag) = element.option_tag() else {
            tracing::trace!("Ignoring child without an option tag: {:?}", element.kind());
            return None;
        };

        if !owner.is_instance_of(&tag.owner_type) {
            tracing::debug!(
                "Ignoring {} declared under {}, expected owner {}",
                tag.component,
                owner.type_name(),
                tag.owner_type
            );
            return None;
        }

        let (full_name, scope) = match parent {
            Some(parent) => (
                format!("{}.{}", parent.full_name, tag.option_name),
                parent.children,
            ),
            None => (tag.option_name.clone(), &self.root),
        };

        let props: SharedProps = Rc::new(RefCell::new(element.props().clone()));
        let children = SharedScope::default();

        scope.borrow_mut().ensure(tag).entries.push(ElementEntry {
            props: Rc::clone(&props),
            children: Rc::clone(&children),
        });
        tracing::trace!("Registered nested option {}", full_name);

        Some(Registration {
            full_name,
            tag: Rc::clone(tag),
            props,
            children,
        })
    }

    /// Flatten every descriptor into a plain configuration object.
    pub fn flatten(&self) -> Props {
        self.root.borrow().flatten()
    }

    /// Flattened value and collection flag of a top-level option group.
    pub fn group_value(&self, name: &str) -> Option<(Value, bool)> {
        let root = self.root.borrow();
        let descr = root.get(name)?;
        Some((descr.value()?, descr.is_collection_item))
    }

    /// Whether `name` is a registered top-level option group.
    pub fn contains(&self, name: &str) -> bool {
        self.root.borrow().get(name).is_some()
    }

    /// Names of the top-level option groups.
    pub fn names(&self) -> Vec<String> {
        self.root
            .borrow()
            .descriptors
            .iter()
            .map(|d| d.name.clone())
            .collect()
    }
}
