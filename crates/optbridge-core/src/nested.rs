//! Adapter handle for a registered nested option element.

use std::rc::Rc;

use crate::config::separate_props;
use crate::element::{Element, OptionTag, Owner};
use crate::error::SyncError;
use crate::manager::OptionsManager;
use crate::path::{add_prefix_to_keys, Props};
use crate::registry::{ParentScope, Registration, SharedProps, SharedScope};

/// A nested option element that has been registered with an engine.
///
/// Children declared inside it register through
/// [`register_nested_option`](Self::register_nested_option); prop updates go
/// through [`update`](Self::update).
#[derive(Debug)]
pub struct NestedOption {
    manager: OptionsManager,
    tag: Rc<OptionTag>,
    full_name: String,
    props: SharedProps,
    children: SharedScope,
}

impl NestedOption {
    pub(crate) fn new(manager: OptionsManager, registration: Registration) -> Self {
        Self {
            manager,
            tag: registration.tag,
            full_name: registration.full_name,
            props: registration.props,
            children: registration.children,
        }
    }

    /// Full dotted option path (e.g. "editing.popup").
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn option_name(&self) -> &str {
        &self.tag.option_name
    }

    pub fn tag(&self) -> &OptionTag {
        &self.tag
    }

    /// This element as the owner of its own children.
    pub fn owner(&self) -> Owner {
        Owner::new(self.tag.component.clone())
    }

    /// Current props of the element.
    pub fn props(&self) -> Props {
        self.props.borrow().clone()
    }

    /// Register a child element declared inside this option.
    pub fn register_nested_option(&self, element: &Element, owner: &Owner) -> Option<NestedOption> {
        self.manager.register_in(
            element,
            owner,
            Some(ParentScope {
                full_name: &self.full_name,
                children: &self.children,
            }),
        )
    }

    /// Replace the element's props and forward changed options to the widget
    /// under this option's full path.
    pub fn update(&self, new_props: Props) -> Result<(), SyncError> {
        let prev_props = self.props.replace(new_props);
        let prefix = format!("{}.", self.full_name);

        let (new_options, prev_options) = {
            let current = self.props.borrow();
            let defaults = &self.tag.defaults_props;
            (
                separate_props(&current, defaults, &[]).options,
                separate_props(&prev_props, defaults, &[]).options,
            )
        };

        self.manager.apply_changed_props(
            &add_prefix_to_keys(&new_options, &prefix),
            &add_prefix_to_keys(&prev_options, &prefix),
        )
    }
}
