//! Storefront domain: value objects, aggregates, events and the catalog filter pipeline.
pub mod aggregates;
pub mod events;
pub mod filters;
pub mod value_objects;
