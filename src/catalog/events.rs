//! catalog::events
//!
//! Catalog notifications and the listener contract.
//!
//! # Dispatch
//!
//! Events are delivered synchronously on the mutating thread, in listener
//! registration order, from a snapshot of the listener list, so a listener
//! may itself call back into the catalog. A save produces two events: a
//! modify event before the change is committed (old and new state are both
//! visible) and a post-modify event after it.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::model::{CatalogInfo, NamespaceInfo, StoreInfo, WorkspaceInfo};
use crate::core::types::CatalogId;

use super::Catalog;

/// An entity was added.
#[derive(Debug, Clone, PartialEq)]
pub struct AddEvent {
    pub source: CatalogInfo,
}

/// An entity was removed.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoveEvent {
    pub source: CatalogInfo,
}

/// An entity or one of the catalog's default pointers changed.
#[derive(Debug, Clone, PartialEq)]
pub enum ModifyEvent {
    /// An entity was saved.
    Info {
        old: CatalogInfo,
        new: CatalogInfo,
        /// Names of the properties that differ.
        changed: Vec<&'static str>,
    },
    DefaultWorkspace {
        old: Option<WorkspaceInfo>,
        new: Option<WorkspaceInfo>,
    },
    DefaultNamespace {
        old: Option<NamespaceInfo>,
        new: Option<NamespaceInfo>,
    },
    DefaultDataStore {
        workspace: CatalogId,
        old: Option<StoreInfo>,
        new: Option<StoreInfo>,
    },
}

impl ModifyEvent {
    /// Names of the changed properties.
    pub fn property_names(&self) -> Vec<&'static str> {
        match self {
            ModifyEvent::Info { changed, .. } => changed.clone(),
            ModifyEvent::DefaultWorkspace { .. } => vec!["default_workspace"],
            ModifyEvent::DefaultNamespace { .. } => vec!["default_namespace"],
            ModifyEvent::DefaultDataStore { .. } => vec!["default_data_store"],
        }
    }
}

/// Receives catalog notifications.
///
/// Every method defaults to doing nothing. An error returned from a handler
/// does not stop the other listeners; the catalog re-raises the first
/// [`CatalogError`](super::CatalogError) once all listeners ran and logs any
/// other error.
pub trait CatalogListener: Send + Sync {
    fn handle_add_event(&self, _catalog: &Catalog, _event: &AddEvent) -> anyhow::Result<()> {
        Ok(())
    }

    fn handle_modify_event(&self, _catalog: &Catalog, _event: &ModifyEvent) -> anyhow::Result<()> {
        Ok(())
    }

    fn handle_post_modify_event(
        &self,
        _catalog: &Catalog,
        _event: &ModifyEvent,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    fn handle_remove_event(&self, _catalog: &Catalog, _event: &RemoveEvent) -> anyhow::Result<()> {
        Ok(())
    }

    /// The catalog contents were replaced wholesale.
    fn reloaded(&self) {}
}

/// Handle returned by `Catalog::add_listener`, used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        ListenerId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}
