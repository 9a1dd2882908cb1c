//! geocatalog - consistency engine for a geospatial publishing catalog
//!
//! The catalog holds workspaces, namespaces, stores, resources, layers,
//! layer groups and styles, and keeps the reference graph between them
//! consistent as entities are added, modified and removed.
//!
//! # Architecture
//!
//! - [`core`] - Entity model, visitor dispatch, configuration, locking
//! - [`catalog`] - The catalog: storage facade, events, validation,
//!   cascade deletion, namespace/workspace consistency
//!
//! # Correctness Invariants
//!
//! 1. Every add and save is validated before it is committed
//! 2. Removals never leave references to missing entities
//! 3. A namespace and the workspace of the same name change together
//! 4. A unit of work holding the read lock upgrades to write at most once

pub mod catalog;
pub mod core;
