//! Runtime base for generated widget adapters.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::config::{separate_props, TemplateProp};
use crate::element::{Element, Owner};
use crate::error::SyncError;
use crate::manager::OptionsManager;
use crate::nested::NestedOption;
use crate::path::Props;
use crate::scheduler::TaskQueue;
use crate::widget::WidgetInstance;

/// Binds one widget instance to the props of its declarative adapter.
///
/// `defaults` and `templates` correspond to the `_defaults` and
/// `_templateProps` members emitted by the code generator.
#[derive(Debug)]
pub struct WidgetAdapter {
    owner: Owner,
    props: Rc<RefCell<Props>>,
    defaults: BTreeMap<String, String>,
    templates: Vec<TemplateProp>,
    manager: OptionsManager,
}

impl WidgetAdapter {
    /// Create an adapter for the widget type `owner` with initial props.
    pub fn new(owner: Owner, props: Props, queue: Rc<dyn TaskQueue>) -> Self {
        let props = Rc::new(RefCell::new(props));
        let lookup = Rc::clone(&props);
        let manager = OptionsManager::new(move |name| lookup.borrow().get(name).cloned(), queue);

        Self {
            owner,
            props,
            defaults: BTreeMap::new(),
            templates: Vec::new(),
            manager,
        }
    }

    /// Map the `prop` default prop (e.g. "defaultValue") onto `option`.
    pub fn with_default(mut self, prop: impl Into<String>, option: impl Into<String>) -> Self {
        self.defaults.insert(prop.into(), option.into());
        self
    }

    /// Accept render/component props for the template option `tmpl_option`.
    pub fn with_template(mut self, tmpl_option: &str) -> Self {
        self.templates.push(TemplateProp::from_option(tmpl_option));
        self
    }

    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    pub fn manager(&self) -> &OptionsManager {
        &self.manager
    }

    /// Register a child element declared directly inside the adapter.
    pub fn register_nested_option(&self, element: &Element) -> Option<NestedOption> {
        self.manager.register_nested_option(element, &self.owner)
    }

    /// Options to construct the widget with: defaults, then explicit
    /// options, then flattened nested options.
    pub fn initial_options(&self) -> Props {
        let separated = separate_props(&self.props.borrow(), &self.defaults, &self.templates);

        let mut options = separated.defaults;
        options.extend(separated.options);
        options.extend(self.manager.get_flattened_options());
        options
    }

    /// Render/component props supplied for template options.
    pub fn templates(&self) -> Props {
        separate_props(&self.props.borrow(), &self.defaults, &self.templates).templates
    }

    /// Bind the constructed widget. Its change events still need to be routed
    /// to [`OptionsManager::option_changed_handler`].
    pub fn attach(&self, instance: Rc<dyn WidgetInstance>) {
        self.manager.set_instance(instance);
    }

    /// Replace the adapter's props and write changed options to the widget.
    pub fn update(&self, new_props: Props) -> Result<(), SyncError> {
        let prev_props = self.props.replace(new_props);

        let (new_options, prev_options) = {
            let current = self.props.borrow();
            (
                separate_props(&current, &self.defaults, &self.templates).options,
                separate_props(&prev_props, &self.defaults, &self.templates).options,
            )
        };

        self.manager.apply_changed_props(&new_options, &prev_options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::OptionTag;
    use crate::scheduler::MacrotaskQueue;
    use crate::widget::{MemoryWidget, WidgetCall};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn props(value: Value) -> Props {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    fn slider(initial: Value, queue: Rc<MacrotaskQueue>) -> WidgetAdapter {
        WidgetAdapter::new(Owner::new("Slider"), props(initial), queue)
            .with_default("defaultValue", "value")
            .with_template("tooltipTemplate")
    }

    #[test]
    fn initial_options_merge_defaults_options_and_nested() {
        let adapter = slider(
            json!({"defaultValue": 3, "max": 10, "tooltipRender": "fn"}),
            Rc::new(MacrotaskQueue::new()),
        );
        let label = Rc::new(OptionTag::new("Label", "label", "Slider"));
        adapter
            .register_nested_option(&Element::option(label, props(json!({"visible": true}))))
            .unwrap();

        assert_eq!(
            Value::Object(adapter.initial_options()),
            json!({"value": 3, "max": 10, "label": {"visible": true}})
        );
        assert_eq!(Value::Object(adapter.templates()), json!({"tooltipRender": "fn"}));
    }

    #[test]
    fn controlled_value_is_restored_after_widget_change() {
        let queue = Rc::new(MacrotaskQueue::new());
        let adapter = slider(json!({"value": 4}), queue.clone());
        let widget = Rc::new(MemoryWidget::new(adapter.initial_options()));
        widget.on_option_changed(adapter.manager().option_changed_handler());
        adapter.attach(widget.clone());

        widget.emit_change("value", json!(7));
        queue.run_until_idle().unwrap();

        assert_eq!(widget.calls(), [WidgetCall::SetOption("value".to_string(), json!(4))]);
    }

    #[test]
    fn accepted_widget_change_cancels_the_restore() {
        let queue = Rc::new(MacrotaskQueue::new());
        let adapter = slider(json!({"value": 4}), queue.clone());
        let widget = Rc::new(MemoryWidget::new(adapter.initial_options()));
        widget.on_option_changed(adapter.manager().option_changed_handler());
        adapter.attach(widget.clone());

        widget.emit_change("value", json!(7));
        adapter.update(props(json!({"value": 7}))).unwrap();
        queue.run_until_idle().unwrap();

        assert_eq!(
            widget.calls(),
            [WidgetCall::BeginUpdate, WidgetCall::SetOption("value".to_string(), json!(7)), WidgetCall::EndUpdate]
        );
        assert_eq!(adapter.manager().pending_guards(), 0);
    }

    #[test]
    fn uncontrolled_value_is_left_to_the_widget() {
        let queue = Rc::new(MacrotaskQueue::new());
        let adapter = slider(json!({"defaultValue": 4}), queue.clone());
        let widget = Rc::new(MemoryWidget::new(adapter.initial_options()));
        widget.on_option_changed(adapter.manager().option_changed_handler());
        adapter.attach(widget.clone());

        widget.emit_change("value", json!(7));

        assert!(queue.is_empty());
        assert_eq!(widget.option("value"), Some(json!(7)));
    }

    #[test]
    fn template_props_are_not_written_as_options() {
        let queue = Rc::new(MacrotaskQueue::new());
        let adapter = slider(json!({"value": 1}), queue);
        let widget = Rc::new(MemoryWidget::default());
        adapter.attach(widget.clone());

        adapter
            .update(props(json!({"value": 1, "tooltipRender": "fn"})))
            .unwrap();

        assert!(widget.calls().is_empty());
    }

    #[test]
    fn unchanged_composite_props_are_not_rewritten() {
        let queue = Rc::new(MacrotaskQueue::new());
        let adapter = WidgetAdapter::new(
            Owner::new("DataGrid"),
            props(json!({"paging": {"size": 10}, "columns": ["id", "name"]})),
            queue,
        );
        let widget = Rc::new(MemoryWidget::new(adapter.initial_options()));
        adapter.attach(widget.clone());

        adapter
            .update(props(json!({"paging": {"size": 10}, "columns": ["id", "name"]})))
            .unwrap();
        assert!(widget.calls().is_empty());

        adapter
            .update(props(json!({"paging": {"size": 20}, "columns": ["id", "name"]})))
            .unwrap();
        assert_eq!(
            widget.calls(),
            [
                WidgetCall::BeginUpdate,
                WidgetCall::SetOption("paging".to_string(), json!({"size": 20})),
                WidgetCall::EndUpdate,
            ]
        );
    }
}
