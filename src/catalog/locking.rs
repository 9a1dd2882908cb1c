//! catalog::locking
//!
//! Facade decorator that upgrades the configuration lock before mutations.
//!
//! # Architecture
//!
//! Every facade operation is classified by name. Mutations (`add*`, `save*`,
//! `remove*`, `set*`) issued while the calling thread holds the lock in READ
//! mode call [`LockManager::try_upgrade`] first; with WRITE or no lock held
//! they are delegated unchanged. After the first upgrade the state is WRITE,
//! so a unit of work upgrades at most once no matter how many primitive
//! mutations it composes.
//!
//! `set_catalog` (binding a facade to its owning catalog) is excluded from
//! the mutation set: it happens at wiring time, never inside a unit of work.

use std::sync::Arc;

use tracing::debug;

use crate::core::model::{CatalogInfo, InfoKind, NamespaceInfo, StoreInfo, WorkspaceInfo};
use crate::core::ops::lock::{LockManager, LockState};
use crate::core::types::CatalogId;

use super::facade::CatalogFacade;
use super::CatalogError;

/// Operation names that never need the write lock.
const NON_MUTATING_SETTERS: &[&str] = &["set_catalog"];

/// Whether the facade operation named `operation` mutates the catalog.
pub fn is_mutation(operation: &str) -> bool {
    if NON_MUTATING_SETTERS.contains(&operation) {
        return false;
    }
    ["set", "remove", "add", "save"]
        .iter()
        .any(|prefix| operation.starts_with(prefix))
}

/// A [`CatalogFacade`] that upgrades the lock before delegating mutations.
pub struct LockingCatalogFacade {
    inner: Box<dyn CatalogFacade>,
    lock: Arc<dyn LockManager>,
}

impl LockingCatalogFacade {
    pub fn new(inner: Box<dyn CatalogFacade>, lock: Arc<dyn LockManager>) -> Self {
        Self { inner, lock }
    }

    fn before(&self, operation: &'static str) -> Result<(), CatalogError> {
        if is_mutation(operation) && self.lock.current_state() == LockState::Read {
            debug!(operation, "upgrading configuration lock before mutation");
            self.lock.try_upgrade()?;
        }
        Ok(())
    }
}

impl CatalogFacade for LockingCatalogFacade {
    fn get(&self, kind: InfoKind, id: &CatalogId) -> Option<CatalogInfo> {
        self.inner.get(kind, id)
    }

    fn list(&self, kind: InfoKind) -> Vec<CatalogInfo> {
        self.inner.list(kind)
    }

    fn add(&self, info: CatalogInfo) -> Result<CatalogInfo, CatalogError> {
        self.before("add")?;
        self.inner.add(info)
    }

    fn save(&self, info: CatalogInfo) -> Result<CatalogInfo, CatalogError> {
        self.before("save")?;
        self.inner.save(info)
    }

    fn remove(&self, info: &CatalogInfo) -> Result<(), CatalogError> {
        self.before("remove")?;
        self.inner.remove(info)
    }

    fn default_workspace(&self) -> Option<WorkspaceInfo> {
        self.inner.default_workspace()
    }

    fn set_default_workspace(
        &self,
        workspace: Option<&WorkspaceInfo>,
    ) -> Result<(), CatalogError> {
        self.before("set_default_workspace")?;
        self.inner.set_default_workspace(workspace)
    }

    fn default_namespace(&self) -> Option<NamespaceInfo> {
        self.inner.default_namespace()
    }

    fn set_default_namespace(
        &self,
        namespace: Option<&NamespaceInfo>,
    ) -> Result<(), CatalogError> {
        self.before("set_default_namespace")?;
        self.inner.set_default_namespace(namespace)
    }

    fn default_data_store(&self, workspace: &CatalogId) -> Option<StoreInfo> {
        self.inner.default_data_store(workspace)
    }

    fn set_default_data_store(
        &self,
        workspace: &CatalogId,
        store: Option<&StoreInfo>,
    ) -> Result<(), CatalogError> {
        self.before("set_default_data_store")?;
        self.inner.set_default_data_store(workspace, store)
    }
}
