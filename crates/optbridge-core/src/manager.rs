//! The option synchronization engine.
//!
//! Declarative prop changes become batched `set_option` calls on the bound
//! widget. Changes the widget reports on its own arm a guard that writes the
//! declarative value back on a later turn unless the declarative side
//! writes the same path first.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use serde_json::Value;

use crate::element::{Element, Owner};
use crate::error::SyncError;
use crate::nested::NestedOption;
use crate::path::{get_nested_value, split_head, Props};
use crate::registry::{NestedOptionRegistry, ParentScope};
use crate::scheduler::{TaskId, TaskQueue};
use crate::widget::{OptionChanged, WidgetInstance};

/// Looks up the declarative value of a plain (non-nested) option.
pub type OptionValueGetter = Box<dyn Fn(&str) -> Option<Value>>;

pub(crate) struct Inner {
    instance: RefCell<Option<Rc<dyn WidgetInstance>>>,
    guards: RefCell<HashMap<String, TaskId>>,
    registry: NestedOptionRegistry,
    option_value_getter: OptionValueGetter,
    queue: Rc<dyn TaskQueue>,
    updating_props: Cell<bool>,
}

impl Inner {
    fn instance(&self) -> Result<Rc<dyn WidgetInstance>, SyncError> {
        self.instance.borrow().clone().ok_or(SyncError::NoInstance)
    }
}

/// Keeps one widget instance and its declarative props in sync.
///
/// Cloning yields another handle to the same engine.
#[derive(Clone)]
pub struct OptionsManager {
    inner: Rc<Inner>,
}

impl OptionsManager {
    /// Create an engine with no bound instance and no nested options.
    pub fn new(
        option_value_getter: impl Fn(&str) -> Option<Value> + 'static,
        queue: Rc<dyn TaskQueue>,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                instance: RefCell::new(None),
                guards: RefCell::new(HashMap::new()),
                registry: NestedOptionRegistry::new(),
                option_value_getter: Box::new(option_value_getter),
                queue,
                updating_props: Cell::new(false),
            }),
        }
    }

    /// Bind the widget instance. Call once it has been constructed.
    pub fn set_instance(&self, instance: Rc<dyn WidgetInstance>) {
        *self.inner.instance.borrow_mut() = Some(instance);
    }

    /// Whether a declarative batch write is in progress.
    pub fn updating_props(&self) -> bool {
        self.inner.updating_props.get()
    }

    /// Whether a guard is pending for `path`.
    pub fn has_guard(&self, path: &str) -> bool {
        self.inner.guards.borrow().contains_key(path)
    }

    /// Number of pending guards.
    pub fn pending_guards(&self) -> usize {
        self.inner.guards.borrow().len()
    }

    pub fn registry(&self) -> &NestedOptionRegistry {
        &self.inner.registry
    }

    /// The full configuration of all registered nested options.
    pub fn get_flattened_options(&self) -> Props {
        self.inner.registry.flatten()
    }

    /// Register a top-level child element declared under `owner`.
    pub fn register_nested_option(&self, element: &Element, owner: &Owner) -> Option<NestedOption> {
        self.register_in(element, owner, None)
    }

    pub(crate) fn register_in(
        &self,
        element: &Element,
        owner: &Owner,
        parent: Option<ParentScope<'_>>,
    ) -> Option<NestedOption> {
        let registration = self.inner.registry.register(element, owner, parent)?;
        Some(NestedOption::new(self.clone(), registration))
    }

    /// A listener to subscribe to the widget's option-changed channel.
    ///
    /// Holds only a weak reference, so the widget keeping it alive does not
    /// keep the engine alive.
    pub fn option_changed_handler(&self) -> impl Fn(&OptionChanged) + 'static {
        let weak: Weak<Inner> = Rc::downgrade(&self.inner);
        move |change: &OptionChanged| {
            if let Some(inner) = weak.upgrade() {
                OptionsManager { inner }.handle_option_change(change);
            }
        }
    }

    /// React to an option change reported by the widget.
    pub fn handle_option_change(&self, change: &OptionChanged) {
        if self.inner.updating_props.get() {
            tracing::trace!("Ignoring echo of {} during prop update", change.full_name);
            return;
        }

        let (_, rest) = split_head(&change.full_name);

        let option_value = match self.inner.registry.group_value(&change.name) {
            Some((group, is_collection_item)) => {
                if change.name == change.full_name {
                    // A collection's array has no keys to decompose into.
                    if let Value::Object(fields) = &group {
                        for key in fields.keys() {
                            self.handle_option_change(&OptionChanged {
                                name: change.name.clone(),
                                full_name: format!("{}.{}", change.full_name, key),
                                value: change.value.get(key).cloned().unwrap_or(Value::Null),
                            });
                        }
                    }
                    return;
                }

                if is_collection_item {
                    None
                } else {
                    // Nothing to restore when the tree already holds the value.
                    get_nested_value(&group, rest.as_slice())
                        .filter(|current| **current != change.value)
                        .cloned()
                }
            }
            None => (self.inner.option_value_getter)(&change.name)
                .and_then(|value| get_nested_value(&value, rest.as_slice()).cloned()),
        };

        match option_value {
            Some(value) if !value.is_null() => self.set_guard(&change.full_name, value),
            _ => tracing::trace!("No declarative value for {}", change.full_name),
        }
    }

    fn set_guard(&self, path: &str, value: Value) {
        if self.has_guard(path) {
            return;
        }

        let weak = Rc::downgrade(&self.inner);
        let key = path.to_string();
        let id = self.inner.queue.schedule(Box::new(move || {
            let Some(inner) = weak.upgrade() else {
                return Ok(());
            };
            let written = inner
                .instance()
                .and_then(|instance| Ok(instance.set_option(&key, value)?));
            inner.guards.borrow_mut().remove(&key);
            tracing::trace!("Flushed guard for {}", key);
            written
        }));

        self.inner.guards.borrow_mut().insert(path.to_string(), id);
        tracing::debug!("Armed guard for {}", path);
    }

    /// Write every prop that differs from `prev_props` to the widget.
    ///
    /// Writes follow the insertion order of `new_props` and share one batch
    /// scope; nothing is opened when no prop changed. A pending guard on a
    /// written key is canceled.
    pub fn apply_changed_props(&self, new_props: &Props, prev_props: &Props) -> Result<(), SyncError> {
        let inner = &self.inner;
        inner.updating_props.set(false);

        let mut batch: Option<Rc<dyn WidgetInstance>> = None;

        for (name, value) in new_props {
            if is_same_value(value, prev_props.get(name)) {
                continue;
            }

            let guard = inner.guards.borrow_mut().remove(name);
            if let Some(id) = guard {
                inner.queue.cancel(id);
                tracing::debug!("Declarative write to {} superseded its guard", name);
            }

            let instance = match &batch {
                Some(instance) => Rc::clone(instance),
                None => {
                    let instance = inner.instance()?;
                    instance.begin_update()?;
                    inner.updating_props.set(true);
                    batch = Some(Rc::clone(&instance));
                    instance
                }
            };
            instance.set_option(name, value.clone())?;
        }

        if let Some(instance) = batch {
            inner.updating_props.set(false);
            instance.end_update()?;
        }

        Ok(())
    }
}

impl fmt::Debug for OptionsManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionsManager")
            .field("registry", &self.inner.registry)
            .field("guards", &self.inner.guards.borrow())
            .field("updating_props", &self.inner.updating_props.get())
            .field("bound", &self.inner.instance.borrow().is_some())
            .finish()
    }
}

/// Props are owned snapshots, so an object or array that compares equal is
/// the same value the widget already holds. A missing key equals `null`.
fn is_same_value(new: &Value, prev: Option<&Value>) -> bool {
    match prev {
        Some(prev) => new == prev,
        None => new.is_null(),
    }
}
