//! core
//!
//! Entity model and the building blocks the catalog is made of.
//!
//! # Modules
//!
//! - [`types`] - Strong types: CatalogId, Fingerprint
//! - [`model`] - Catalog entity records
//! - [`factory`] - Detached entity construction
//! - [`visitor`] - Per-variant dispatch over entities
//! - [`config`] - Configuration schema and loading
//! - [`ops`] - Configuration lock
//!
//! # Design Principles
//!
//! - Entities are plain values that reference each other by id
//! - Schemas are strict and self-describing
//! - Nothing in `core` mutates a catalog

pub mod config;
pub mod factory;
pub mod model;
pub mod ops;
pub mod types;
pub mod visitor;
