//! catalog::facade
//!
//! Storage contract behind the catalog and its in-memory implementation.
//!
//! # Design
//!
//! The facade is a dumb store: it keeps entities by id and the default
//! pointers, and knows nothing about validation, events or cascades. The
//! [`Catalog`](super::Catalog) is the only caller and the only place where
//! consistency rules live.
//!
//! [`MemoryCatalogFacade`] keeps insertion order, records the mutating
//! operations it performs, and can be told to fail a given operation so
//! tests can observe partial cascades.
//!
//! # Example
//!
//! ```
//! use geocatalog::catalog::facade::{CatalogFacade, MemoryCatalogFacade};
//! use geocatalog::core::factory::CatalogFactory;
//! use geocatalog::core::model::InfoKind;
//!
//! let facade = MemoryCatalogFacade::new();
//! let ws = CatalogFactory.create_workspace("topp");
//! facade.add(ws.clone().into()).unwrap();
//!
//! assert!(facade.get(InfoKind::Workspace, &ws.id).is_some());
//! assert_eq!(facade.list(InfoKind::Workspace).len(), 1);
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::core::model::{CatalogInfo, InfoKind, NamespaceInfo, StoreInfo, WorkspaceInfo};
use crate::core::types::CatalogId;

use super::CatalogError;

/// Storage for catalog entities and default pointers.
///
/// Implementations must be strongly consistent: a read after a mutation on
/// the same thread observes the mutation.
pub trait CatalogFacade: Send + Sync {
    fn get(&self, kind: InfoKind, id: &CatalogId) -> Option<CatalogInfo>;

    /// All entities of `kind` in insertion order.
    fn list(&self, kind: InfoKind) -> Vec<CatalogInfo>;

    fn add(&self, info: CatalogInfo) -> Result<CatalogInfo, CatalogError>;

    /// Replace the stored entity with the same id.
    fn save(&self, info: CatalogInfo) -> Result<CatalogInfo, CatalogError>;

    fn remove(&self, info: &CatalogInfo) -> Result<(), CatalogError>;

    fn default_workspace(&self) -> Option<WorkspaceInfo>;

    fn set_default_workspace(&self, workspace: Option<&WorkspaceInfo>)
        -> Result<(), CatalogError>;

    fn default_namespace(&self) -> Option<NamespaceInfo>;

    fn set_default_namespace(&self, namespace: Option<&NamespaceInfo>)
        -> Result<(), CatalogError>;

    fn default_data_store(&self, workspace: &CatalogId) -> Option<StoreInfo>;

    fn set_default_data_store(
        &self,
        workspace: &CatalogId,
        store: Option<&StoreInfo>,
    ) -> Result<(), CatalogError>;
}

/// A shared facade, so the caller can keep a handle on the one it hands to
/// a catalog.
impl<F: CatalogFacade + ?Sized> CatalogFacade for Arc<F> {
    fn get(&self, kind: InfoKind, id: &CatalogId) -> Option<CatalogInfo> {
        (**self).get(kind, id)
    }

    fn list(&self, kind: InfoKind) -> Vec<CatalogInfo> {
        (**self).list(kind)
    }

    fn add(&self, info: CatalogInfo) -> Result<CatalogInfo, CatalogError> {
        (**self).add(info)
    }

    fn save(&self, info: CatalogInfo) -> Result<CatalogInfo, CatalogError> {
        (**self).save(info)
    }

    fn remove(&self, info: &CatalogInfo) -> Result<(), CatalogError> {
        (**self).remove(info)
    }

    fn default_workspace(&self) -> Option<WorkspaceInfo> {
        (**self).default_workspace()
    }

    fn set_default_workspace(
        &self,
        workspace: Option<&WorkspaceInfo>,
    ) -> Result<(), CatalogError> {
        (**self).set_default_workspace(workspace)
    }

    fn default_namespace(&self) -> Option<NamespaceInfo> {
        (**self).default_namespace()
    }

    fn set_default_namespace(
        &self,
        namespace: Option<&NamespaceInfo>,
    ) -> Result<(), CatalogError> {
        (**self).set_default_namespace(namespace)
    }

    fn default_data_store(&self, workspace: &CatalogId) -> Option<StoreInfo> {
        (**self).default_data_store(workspace)
    }

    fn set_default_data_store(
        &self,
        workspace: &CatalogId,
        store: Option<&StoreInfo>,
    ) -> Result<(), CatalogError> {
        (**self).set_default_data_store(workspace, store)
    }
}

/// A mutating facade operation, as recorded by [`MemoryCatalogFacade`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacadeOperation {
    Add(InfoKind, CatalogId),
    Save(InfoKind, CatalogId),
    Remove(InfoKind, CatalogId),
    SetDefaultWorkspace(Option<CatalogId>),
    SetDefaultNamespace(Option<CatalogId>),
    SetDefaultDataStore(CatalogId, Option<CatalogId>),
}

/// Operation that [`MemoryCatalogFacade`] should fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailOn {
    Add(InfoKind),
    Save(InfoKind),
    Remove(InfoKind),
}

#[derive(Debug, Default)]
struct FacadeState {
    /// Entities in insertion order.
    entries: Vec<CatalogInfo>,
    default_workspace: Option<CatalogId>,
    default_namespace: Option<CatalogId>,
    /// Workspace id -> data store id.
    default_data_stores: BTreeMap<CatalogId, CatalogId>,
    fail_on: Option<FailOn>,
    operations: Vec<FacadeOperation>,
}

impl FacadeState {
    fn position(&self, kind: InfoKind, id: &CatalogId) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.kind() == kind && e.id() == id)
    }

    fn find(&self, kind: InfoKind, id: &CatalogId) -> Option<&CatalogInfo> {
        self.position(kind, id).map(|i| &self.entries[i])
    }

    fn check_fail(&self, op: &FailOn) -> Result<(), CatalogError> {
        if self.fail_on.as_ref() == Some(op) {
            return Err(CatalogError::Facade(format!("injected failure: {:?}", op)));
        }
        Ok(())
    }
}

/// In-memory facade.
#[derive(Debug, Default)]
pub struct MemoryCatalogFacade {
    state: RwLock<FacadeState>,
}

impl MemoryCatalogFacade {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the given operation from now on.
    pub fn fail_on(&self, op: FailOn) {
        self.state.write().fail_on = Some(op);
    }

    /// Stop failing operations.
    pub fn clear_failure(&self) {
        self.state.write().fail_on = None;
    }

    /// Mutating operations performed so far.
    pub fn operations(&self) -> Vec<FacadeOperation> {
        self.state.read().operations.clone()
    }
}

impl CatalogFacade for MemoryCatalogFacade {
    fn get(&self, kind: InfoKind, id: &CatalogId) -> Option<CatalogInfo> {
        self.state.read().find(kind, id).cloned()
    }

    fn list(&self, kind: InfoKind) -> Vec<CatalogInfo> {
        self.state
            .read()
            .entries
            .iter()
            .filter(|e| e.kind() == kind)
            .cloned()
            .collect()
    }

    fn add(&self, info: CatalogInfo) -> Result<CatalogInfo, CatalogError> {
        let mut state = self.state.write();
        state.check_fail(&FailOn::Add(info.kind()))?;
        if state.entries.iter().any(|e| e.id() == info.id()) {
            return Err(CatalogError::Facade(format!(
                "an entity with id '{}' already exists",
                info.id()
            )));
        }
        state
            .operations
            .push(FacadeOperation::Add(info.kind(), info.id().clone()));
        state.entries.push(info.clone());
        Ok(info)
    }

    fn save(&self, info: CatalogInfo) -> Result<CatalogInfo, CatalogError> {
        let mut state = self.state.write();
        state.check_fail(&FailOn::Save(info.kind()))?;
        let index = state
            .position(info.kind(), info.id())
            .ok_or_else(|| CatalogError::NotFound {
                kind: info.kind(),
                id: info.id().clone(),
            })?;
        state
            .operations
            .push(FacadeOperation::Save(info.kind(), info.id().clone()));
        state.entries[index] = info.clone();
        Ok(info)
    }

    fn remove(&self, info: &CatalogInfo) -> Result<(), CatalogError> {
        let mut state = self.state.write();
        state.check_fail(&FailOn::Remove(info.kind()))?;
        let index = state
            .position(info.kind(), info.id())
            .ok_or_else(|| CatalogError::NotFound {
                kind: info.kind(),
                id: info.id().clone(),
            })?;
        state.entries.remove(index);
        state
            .operations
            .push(FacadeOperation::Remove(info.kind(), info.id().clone()));

        // no dangling default pointers
        let id = info.id();
        if state.default_workspace.as_ref() == Some(id) {
            state.default_workspace = None;
        }
        if state.default_namespace.as_ref() == Some(id) {
            state.default_namespace = None;
        }
        state
            .default_data_stores
            .retain(|ws, store| ws != id && store != id);
        Ok(())
    }

    fn default_workspace(&self) -> Option<WorkspaceInfo> {
        let state = self.state.read();
        let id = state.default_workspace.as_ref()?;
        state
            .find(InfoKind::Workspace, id)
            .and_then(|i| i.as_workspace())
            .cloned()
    }

    fn set_default_workspace(
        &self,
        workspace: Option<&WorkspaceInfo>,
    ) -> Result<(), CatalogError> {
        let mut state = self.state.write();
        if let Some(ws) = workspace {
            if state.find(InfoKind::Workspace, &ws.id).is_none() {
                return Err(CatalogError::NotFound {
                    kind: InfoKind::Workspace,
                    id: ws.id.clone(),
                });
            }
        }
        let id = workspace.map(|ws| ws.id.clone());
        state
            .operations
            .push(FacadeOperation::SetDefaultWorkspace(id.clone()));
        state.default_workspace = id;
        Ok(())
    }

    fn default_namespace(&self) -> Option<NamespaceInfo> {
        let state = self.state.read();
        let id = state.default_namespace.as_ref()?;
        state
            .find(InfoKind::Namespace, id)
            .and_then(|i| i.as_namespace())
            .cloned()
    }

    fn set_default_namespace(
        &self,
        namespace: Option<&NamespaceInfo>,
    ) -> Result<(), CatalogError> {
        let mut state = self.state.write();
        if let Some(ns) = namespace {
            if state.find(InfoKind::Namespace, &ns.id).is_none() {
                return Err(CatalogError::NotFound {
                    kind: InfoKind::Namespace,
                    id: ns.id.clone(),
                });
            }
        }
        let id = namespace.map(|ns| ns.id.clone());
        state
            .operations
            .push(FacadeOperation::SetDefaultNamespace(id.clone()));
        state.default_namespace = id;
        Ok(())
    }

    fn default_data_store(&self, workspace: &CatalogId) -> Option<StoreInfo> {
        let state = self.state.read();
        let id = state.default_data_stores.get(workspace)?;
        state
            .find(InfoKind::Store, id)
            .and_then(|i| i.as_store())
            .cloned()
    }

    fn set_default_data_store(
        &self,
        workspace: &CatalogId,
        store: Option<&StoreInfo>,
    ) -> Result<(), CatalogError> {
        let mut state = self.state.write();
        if let Some(store) = store {
            if state.find(InfoKind::Store, &store.id).is_none() {
                return Err(CatalogError::NotFound {
                    kind: InfoKind::Store,
                    id: store.id.clone(),
                });
            }
        }
        let id = store.map(|s| s.id.clone());
        state
            .operations
            .push(FacadeOperation::SetDefaultDataStore(workspace.clone(), id.clone()));
        match id {
            Some(id) => {
                state.default_data_stores.insert(workspace.clone(), id);
            }
            None => {
                state.default_data_stores.remove(workspace);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::factory::CatalogFactory;
    use crate::core::model::StoreKind;

    #[test]
    fn add_get_save_remove() {
        let facade = MemoryCatalogFacade::new();
        let ws = CatalogFactory.create_workspace("ws");
        facade.add(ws.clone().into()).unwrap();

        let mut renamed = ws.clone();
        renamed.name = "renamed".into();
        facade.save(renamed.clone().into()).unwrap();
        assert_eq!(
            facade.get(InfoKind::Workspace, &ws.id),
            Some(renamed.clone().into())
        );

        facade.remove(&renamed.into()).unwrap();
        assert!(facade.get(InfoKind::Workspace, &ws.id).is_none());
        assert_eq!(
            facade.operations(),
            vec![
                FacadeOperation::Add(InfoKind::Workspace, ws.id.clone()),
                FacadeOperation::Save(InfoKind::Workspace, ws.id.clone()),
                FacadeOperation::Remove(InfoKind::Workspace, ws.id.clone()),
            ]
        );
    }

    #[test]
    fn duplicate_ids_rejected() {
        let facade = MemoryCatalogFacade::new();
        let ws = CatalogFactory.create_workspace("ws");
        facade.add(ws.clone().into()).unwrap();
        assert!(matches!(
            facade.add(ws.into()),
            Err(CatalogError::Facade(_))
        ));
    }

    #[test]
    fn missing_entities_not_found() {
        let facade = MemoryCatalogFacade::new();
        let ws = CatalogFactory.create_workspace("ws");
        assert!(matches!(
            facade.save(ws.clone().into()),
            Err(CatalogError::NotFound { .. })
        ));
        assert!(matches!(
            facade.remove(&ws.clone().into()),
            Err(CatalogError::NotFound { .. })
        ));
        assert!(facade.set_default_workspace(Some(&ws)).is_err());
    }

    #[test]
    fn list_keeps_insertion_order() {
        let facade = MemoryCatalogFacade::new();
        let f = CatalogFactory;
        let names = ["c", "a", "b"];
        for name in names {
            facade.add(f.create_workspace(name).into()).unwrap();
        }
        facade.add(f.create_style("s").into()).unwrap();

        let listed: Vec<_> = facade
            .list(InfoKind::Workspace)
            .iter()
            .map(|i| i.name().to_string())
            .collect();
        assert_eq!(listed, names);
    }

    #[test]
    fn remove_clears_default_pointers() {
        let facade = MemoryCatalogFacade::new();
        let ws = CatalogFactory.create_workspace("ws");
        let ds = CatalogFactory.create_store(StoreKind::Data, &ws, "ds");
        facade.add(ws.clone().into()).unwrap();
        facade.add(ds.clone().into()).unwrap();
        facade.set_default_workspace(Some(&ws)).unwrap();
        facade.set_default_data_store(&ws.id, Some(&ds)).unwrap();
        assert_eq!(facade.default_data_store(&ws.id), Some(ds.clone()));

        facade.remove(&ds.into()).unwrap();
        assert!(facade.default_data_store(&ws.id).is_none());

        facade.remove(&ws.into()).unwrap();
        assert!(facade.default_workspace().is_none());
    }

    #[test]
    fn injected_failures() {
        let facade = MemoryCatalogFacade::new();
        let ws = CatalogFactory.create_workspace("ws");
        facade.fail_on(FailOn::Add(InfoKind::Workspace));
        assert!(facade.add(ws.clone().into()).is_err());
        assert!(facade.operations().is_empty());

        facade.clear_failure();
        facade.add(ws.into()).unwrap();
    }
}
