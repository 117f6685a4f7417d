//! Adapter source generation from widget option schemas.
//!
//! A [`ComponentSchema`] describes one widget: its plain, subscribable and
//! template options, nested option components and prop typings. The
//! [`generate`] function turns it into adapter source text.

pub mod catalog;
pub mod generator;
pub mod schema;

pub use catalog::{CachedSchema, CatalogError, SchemaCatalog};
pub use generator::{generate, CodegenError};
pub use schema::{
    ComponentSchema, NestedComponent, NestedProp, PropTyping, SubscribableOption,
};
