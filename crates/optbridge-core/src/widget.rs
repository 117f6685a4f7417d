//! The widget instance surface and an in-memory implementation.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::error::InstanceError;
use crate::path::{get_nested_value, set_nested_value, split_head, Props};

/// Imperative option access on a wrapped widget.
///
/// Methods take `&self`: change notifications re-enter the synchronization
/// engine while a write is still in progress, so implementations hold their
/// state behind interior mutability.
pub trait WidgetInstance {
    /// Read the option at a dotted path.
    fn option(&self, path: &str) -> Option<Value>;

    /// Write the option at a dotted path.
    fn set_option(&self, path: &str, value: Value) -> Result<(), InstanceError>;

    /// Open a batch update scope.
    fn begin_update(&self) -> Result<(), InstanceError>;

    /// Close the innermost batch update scope.
    fn end_update(&self) -> Result<(), InstanceError>;
}

/// A runtime option change reported by a widget.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionChanged {
    /// Top-level option name (e.g. "range")
    pub name: String,

    /// Full dotted path (e.g. "range.start")
    pub full_name: String,

    /// New value at `full_name`
    pub value: Value,
}

impl OptionChanged {
    /// Build a change event, deriving `name` from the first path segment.
    pub fn new(full_name: impl Into<String>, value: Value) -> Self {
        let full_name = full_name.into();
        let name = split_head(&full_name).0.to_string();
        Self {
            name,
            full_name,
            value,
        }
    }
}

/// One recorded call on a [`MemoryWidget`].
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetCall {
    BeginUpdate,
    EndUpdate,
    SetOption(String, Value),
}

type Listener = Rc<dyn Fn(&OptionChanged)>;

/// Widget that keeps its options in memory.
///
/// Every write is recorded and broadcast to listeners as an
/// [`OptionChanged`], synchronously, like a real widget would.
#[derive(Default)]
pub struct MemoryWidget {
    options: RefCell<Props>,
    update_depth: Cell<u32>,
    calls: RefCell<Vec<WidgetCall>>,
    listeners: RefCell<Vec<Listener>>,
}

impl MemoryWidget {
    /// Create a widget with the given initial options.
    pub fn new(options: Props) -> Self {
        Self {
            options: RefCell::new(options),
            ..Self::default()
        }
    }

    /// Subscribe to option changes.
    pub fn on_option_changed(&self, listener: impl Fn(&OptionChanged) + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    /// Snapshot of all options.
    pub fn options(&self) -> Props {
        self.options.borrow().clone()
    }

    /// Calls made so far, in order.
    pub fn calls(&self) -> Vec<WidgetCall> {
        self.calls.borrow().clone()
    }

    /// Forget recorded calls.
    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Whether a batch update scope is open.
    pub fn is_updating(&self) -> bool {
        self.update_depth.get() > 0
    }

    /// Change an option the way user interaction inside the widget would:
    /// store it and notify listeners, without recording a call.
    pub fn emit_change(&self, path: &str, value: Value) {
        set_nested_value(&mut self.options.borrow_mut(), path, value.clone());
        self.notify(&OptionChanged::new(path, value));
    }

    fn notify(&self, change: &OptionChanged) {
        let listeners: Vec<Listener> = self.listeners.borrow().clone();
        for listener in listeners {
            listener(change);
        }
    }
}

impl WidgetInstance for MemoryWidget {
    fn option(&self, path: &str) -> Option<Value> {
        let options = self.options.borrow();
        let (head, rest) = split_head(path);
        get_nested_value(options.get(head)?, rest.as_slice()).cloned()
    }

    fn set_option(&self, path: &str, value: Value) -> Result<(), InstanceError> {
        self.calls
            .borrow_mut()
            .push(WidgetCall::SetOption(path.to_string(), value.clone()));
        set_nested_value(&mut self.options.borrow_mut(), path, value.clone());
        self.notify(&OptionChanged::new(path, value));
        Ok(())
    }

    fn begin_update(&self) -> Result<(), InstanceError> {
        self.calls.borrow_mut().push(WidgetCall::BeginUpdate);
        self.update_depth.set(self.update_depth.get() + 1);
        Ok(())
    }

    fn end_update(&self) -> Result<(), InstanceError> {
        let depth = self.update_depth.get();
        if depth == 0 {
            return Err(InstanceError::Batch(
                "end_update called without a matching begin_update".to_string(),
            ));
        }
        self.calls.borrow_mut().push(WidgetCall::EndUpdate);
        self.update_depth.set(depth - 1);
        Ok(())
    }
}

impl fmt::Debug for MemoryWidget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryWidget")
            .field("options", &self.options.borrow())
            .field("update_depth", &self.update_depth.get())
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn derives_top_level_name() {
        let change = OptionChanged::new("range.start", json!(2));

        assert_eq!(change.name, "range");
        assert_eq!(change.full_name, "range.start");
    }

    #[test]
    fn stores_and_reads_dotted_options() {
        let widget = MemoryWidget::default();

        widget.set_option("range.start", json!(1)).unwrap();
        widget.set_option("zoomLevel", json!(5)).unwrap();

        assert_eq!(widget.option("range.start"), Some(json!(1)));
        assert_eq!(widget.option("range"), Some(json!({"start": 1})));
        assert_eq!(widget.option("zoomLevel"), Some(json!(5)));
        assert_eq!(widget.option("missing"), None);
    }

    #[test]
    fn notifies_listeners_on_every_write() {
        let widget = MemoryWidget::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        widget.on_option_changed(move |change| sink.borrow_mut().push(change.clone()));

        widget.set_option("a.b", json!(true)).unwrap();
        widget.emit_change("c", json!(3));

        assert_eq!(
            *seen.borrow(),
            [OptionChanged::new("a.b", json!(true)), OptionChanged::new("c", json!(3))]
        );
        assert_eq!(widget.calls(), [WidgetCall::SetOption("a.b".to_string(), json!(true))]);
    }

    #[test]
    fn rejects_unbalanced_end_update() {
        let widget = MemoryWidget::default();

        widget.begin_update().unwrap();
        assert!(widget.is_updating());
        widget.end_update().unwrap();

        assert!(matches!(widget.end_update(), Err(InstanceError::Batch(_))));
    }
}
