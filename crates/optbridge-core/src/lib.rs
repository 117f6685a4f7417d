//! Option synchronization for widget adapters.
//!
//! This crate binds an imperative widget instance (anything implementing
//! [`WidgetInstance`]) to a declarative prop model. Nested option elements are
//! collected by the [`NestedOptionRegistry`] and flattened into the plain
//! configuration a widget is created with; the [`OptionsManager`] keeps both
//! sides in sync afterwards without echoing changes back and forth.
//!
//! # Features
//!
//! - `tokio`: enables `LocalTaskQueue`, which defers guard writes with
//!   `tokio::task::spawn_local`. Its tests only build with the feature on:
//!   `cargo test -p optbridge-core --features tokio`.

pub mod component;
pub mod config;
pub mod element;
pub mod error;
pub mod manager;
pub mod nested;
pub mod path;
pub mod registry;
pub mod scheduler;
pub mod widget;

pub use component::WidgetAdapter;
pub use config::{separate_props, SeparatedProps, TemplateProp};
pub use element::{Element, OptionTag, Owner};
pub use error::{InstanceError, SyncError};
pub use manager::OptionsManager;
pub use nested::NestedOption;
pub use path::{add_prefix_to_keys, get_nested_value, set_nested_value, Props};
pub use registry::NestedOptionRegistry;
#[cfg(feature = "tokio")]
pub use scheduler::LocalTaskQueue;
pub use scheduler::{MacrotaskQueue, Task, TaskId, TaskQueue};
pub use widget::{MemoryWidget, OptionChanged, WidgetCall, WidgetInstance};
