//! catalog
//!
//! The catalog: the single mutation entry point for the entity graph.
//!
//! # Architecture
//!
//! Every mutation follows the same path:
//!
//! ```text
//! add/save/remove -> lock upgrade -> validation / removal guards -> facade
//!                 -> listeners (synchronous, snapshot of the listener list)
//! ```
//!
//! The lock is upgraded before anything is checked, so the state a mutation
//! was validated against is the state it commits to.
//!
//! Removal of a non-leaf entity is refused while dependents exist; use
//! [`Catalog::cascade_remove`] (or a [`cascade::CascadeDeleteVisitor`]) to
//! remove an entity together with everything that depends on it.
//!
//! # Modules
//!
//! - [`facade`] - Storage contract and in-memory implementation
//! - [`locking`] - Lock-upgrading facade decorator
//! - [`events`] - Notifications and the listener contract
//! - [`validation`] - Violation collection before commit
//! - [`cascade`] - Cascade deletion and dry-run preview
//! - [`consistency`] - Namespace/workspace pairing listener
//! - [`styles`] - Default style selection
//! - [`external`] - Style storage and reader source contracts
//!
//! # Invariants
//!
//! - Entities are replaced wholesale on save; the catalog never hands out
//!   references into its storage
//! - The first workspace, namespace and data store (per workspace) added
//!   become the defaults
//! - Listener errors never stop other listeners from running
//!
//! # Example
//!
//! ```
//! use geocatalog::catalog::Catalog;
//! use geocatalog::core::factory::CatalogFactory;
//! use geocatalog::core::model::StoreKind;
//!
//! let catalog = Catalog::new();
//! let f = CatalogFactory;
//!
//! let ws = f.create_workspace("topp");
//! catalog.add(ws.clone()).unwrap();
//! catalog.add(f.create_namespace("topp", "http://www.openplans.org/topp")).unwrap();
//! catalog.add(f.create_store(StoreKind::Data, &ws, "states")).unwrap();
//!
//! assert_eq!(catalog.default_workspace().map(|w| w.name), Some("topp".to_string()));
//!
//! let report = catalog.cascade_remove(ws).unwrap();
//! assert_eq!(report.removed.len(), 3);
//! assert!(catalog.workspaces().is_empty());
//! ```

pub mod cascade;
pub mod consistency;
pub mod events;
pub mod external;
pub mod facade;
pub mod locking;
pub mod styles;
pub mod validation;

use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::config::CatalogConfig;
use crate::core::model::{
    CatalogInfo, InfoKind, LayerGroupInfo, LayerInfo, NamespaceInfo, PublishedType,
    ResourceInfo, StoreInfo, StoreKind, StyleInfo, WorkspaceInfo,
};
use crate::core::ops::lock::{LockError, LockManager, LockState};
use crate::core::types::{CatalogId, Fingerprint};
use crate::core::visitor::Visitable;

use cascade::{CascadeDeleteVisitor, CascadeReport};
use consistency::NamespaceWorkspaceConsistencyListener;
use events::{AddEvent, CatalogListener, ListenerId, ModifyEvent, RemoveEvent};
use external::{ReaderSource, StyleError};
use facade::{CatalogFacade, MemoryCatalogFacade};
use locking::LockingCatalogFacade;
use styles::DefaultStyleResolver;
use validation::{CatalogValidator, ValidationResult};

/// Errors from catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: InfoKind, id: CatalogId },

    /// The operation would leave the graph inconsistent.
    #[error("{0}")]
    InvariantViolation(String),

    #[error("{summary} ({count} violation(s))")]
    Validation { summary: String, count: usize },

    #[error("lock error: {0}")]
    Lock(#[from] LockError),

    #[error("style error: {0}")]
    Style(#[from] StyleError),

    #[error("facade error: {0}")]
    Facade(String),
}

/// Builder for [`Catalog`].
pub struct CatalogBuilder {
    facade: Option<Box<dyn CatalogFacade>>,
    lock: Option<Arc<dyn LockManager>>,
    config: CatalogConfig,
    reader_source: Option<Arc<dyn ReaderSource>>,
    consistency_listener: bool,
}

impl CatalogBuilder {
    /// Storage backend. Defaults to a [`MemoryCatalogFacade`].
    pub fn facade(mut self, facade: Box<dyn CatalogFacade>) -> Self {
        self.facade = Some(facade);
        self
    }

    /// Upgrade `lock` from READ to WRITE at the start of every mutation.
    /// The facade is wrapped as well, so direct facade mutations upgrade too.
    pub fn lock_manager(mut self, lock: Arc<dyn LockManager>) -> Self {
        self.lock = Some(lock);
        self
    }

    pub fn config(mut self, config: CatalogConfig) -> Self {
        self.config = config;
        self
    }

    pub fn reader_source(mut self, source: Arc<dyn ReaderSource>) -> Self {
        self.reader_source = Some(source);
        self
    }

    /// Whether to register the namespace/workspace consistency listener.
    /// Enabled by default.
    pub fn consistency_listener(mut self, enabled: bool) -> Self {
        self.consistency_listener = enabled;
        self
    }

    pub fn build(self) -> Catalog {
        let mut facade = self
            .facade
            .unwrap_or_else(|| Box::new(MemoryCatalogFacade::new()));
        if let Some(lock) = &self.lock {
            facade = Box::new(LockingCatalogFacade::new(facade, Arc::clone(lock)));
        }

        let catalog = Catalog {
            facade,
            lock: self.lock,
            listeners: RwLock::new(Vec::new()),
            validators: RwLock::new(Vec::new()),
            styles: DefaultStyleResolver::new(self.config.style_names().clone()),
            config: self.config,
            reader_source: self.reader_source,
        };
        if self.consistency_listener {
            catalog.add_listener(Arc::new(NamespaceWorkspaceConsistencyListener::new()));
        }
        catalog
    }
}

/// The catalog. Share it as `Arc<Catalog>`.
pub struct Catalog {
    facade: Box<dyn CatalogFacade>,
    lock: Option<Arc<dyn LockManager>>,
    listeners: RwLock<Vec<(ListenerId, Arc<dyn CatalogListener>)>>,
    validators: RwLock<Vec<Arc<dyn CatalogValidator>>>,
    config: CatalogConfig,
    reader_source: Option<Arc<dyn ReaderSource>>,
    styles: DefaultStyleResolver,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// In-memory catalog with default configuration and the consistency
    /// listener registered.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> CatalogBuilder {
        CatalogBuilder {
            facade: None,
            lock: None,
            config: CatalogConfig::default(),
            reader_source: None,
            consistency_listener: true,
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn reader_source(&self) -> Option<&dyn ReaderSource> {
        self.reader_source.as_deref()
    }

    pub fn style_resolver(&self) -> &DefaultStyleResolver {
        &self.styles
    }

    // =========================================================================
    // Listeners and validators
    // =========================================================================

    pub fn add_listener(&self, listener: Arc<dyn CatalogListener>) -> ListenerId {
        let id = ListenerId::next();
        self.listeners.write().push((id, listener));
        id
    }

    /// Unregister a listener. Returns `false` if it was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    pub fn add_validator(&self, validator: Arc<dyn CatalogValidator>) {
        self.validators.write().push(validator);
    }

    /// Tell every listener the catalog was reloaded.
    pub fn fire_reloaded(&self) {
        for listener in self.listener_snapshot() {
            listener.reloaded();
        }
    }

    fn listener_snapshot(&self) -> Vec<Arc<dyn CatalogListener>> {
        self.listeners
            .read()
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect()
    }

    /// Run `notify` for every listener. The first [`CatalogError`] is
    /// returned after all listeners ran; other failures are logged.
    fn dispatch<F>(&self, event: &'static str, mut notify: F) -> Result<(), CatalogError>
    where
        F: FnMut(&dyn CatalogListener) -> anyhow::Result<()>,
    {
        let mut first: Option<CatalogError> = None;
        for listener in self.listener_snapshot() {
            let Err(err) = notify(listener.as_ref()) else {
                continue;
            };
            match err.downcast::<CatalogError>() {
                Ok(catalog_err) if first.is_none() => first = Some(catalog_err),
                Ok(catalog_err) => {
                    warn!(event, error = %catalog_err, "catalog listener failed")
                }
                Err(other) => warn!(event, error = %other, "catalog listener failed"),
            }
        }
        match first {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Upgrade a held READ lock before a mutation reads the state it checks.
    fn begin_mutation(&self, operation: &'static str) -> Result<(), CatalogError> {
        if let Some(lock) = &self.lock {
            if lock.current_state() == LockState::Read {
                debug!(operation, "upgrading configuration lock before mutation");
                lock.try_upgrade()?;
            }
        }
        Ok(())
    }

    /// Validate and add a new entity.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Validation`] if the entity is invalid
    /// - Facade and listener errors
    pub fn add(&self, info: impl Into<CatalogInfo>) -> Result<CatalogInfo, CatalogError> {
        self.begin_mutation("add")?;
        let mut info = self.prepare(info.into(), true);
        self.validate(&info, true).throw_if_invalid()?;

        let timestamps = info.timestamps_mut();
        if timestamps.created.is_none() {
            timestamps.created = Some(Utc::now());
        }

        let added = self.facade.add(info)?;
        debug!(kind = %added.kind(), id = %added.id(), name = added.name(), "added");

        self.assign_initial_defaults(&added)?;
        let event = AddEvent {
            source: added.clone(),
        };
        self.dispatch("add", |l| l.handle_add_event(self, &event))?;
        Ok(added)
    }

    /// Validate and commit a modified copy of an existing entity.
    ///
    /// Listeners see a modify event before the commit and a post-modify
    /// event after it.
    pub fn save(&self, info: impl Into<CatalogInfo>) -> Result<CatalogInfo, CatalogError> {
        self.begin_mutation("save")?;
        let mut info = self.prepare(info.into(), false);
        let old = self
            .facade
            .get(info.kind(), info.id())
            .ok_or_else(|| CatalogError::NotFound {
                kind: info.kind(),
                id: info.id().clone(),
            })?;
        self.validate(&info, false).throw_if_invalid()?;

        let created = old.timestamps().created;
        let timestamps = info.timestamps_mut();
        timestamps.created = created;
        timestamps.modified = Some(Utc::now());

        let changed = CatalogInfo::changed_properties(&old, &info);
        let event = ModifyEvent::Info {
            old,
            new: info.clone(),
            changed,
        };
        self.dispatch("modify", |l| l.handle_modify_event(self, &event))?;

        let saved = self.facade.save(info)?;
        debug!(kind = %saved.kind(), id = %saved.id(), name = saved.name(), "saved");

        let event = match event {
            ModifyEvent::Info { old, changed, .. } => ModifyEvent::Info {
                old,
                new: saved.clone(),
                changed,
            },
            other => other,
        };
        self.dispatch("post_modify", |l| l.handle_post_modify_event(self, &event))?;
        Ok(saved)
    }

    /// Remove a single entity.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NotFound`] if the entity is not in the catalog
    /// - [`CatalogError::InvariantViolation`] if other entities still depend
    ///   on it
    pub fn remove(&self, info: impl Into<CatalogInfo>) -> Result<(), CatalogError> {
        self.begin_mutation("remove")?;
        let info = info.into();
        let current = self
            .facade
            .get(info.kind(), info.id())
            .ok_or_else(|| CatalogError::NotFound {
                kind: info.kind(),
                id: info.id().clone(),
            })?;
        self.check_removal(&current)?;

        let was_default = self.is_default(&current);
        self.facade.remove(&current)?;
        debug!(kind = %current.kind(), id = %current.id(), name = current.name(), "removed");

        if was_default {
            self.reassign_default(&current)?;
        }
        let event = RemoveEvent { source: current };
        self.dispatch("remove", |l| l.handle_remove_event(self, &event))
    }

    /// Remove an entity together with everything that depends on it.
    pub fn cascade_remove(
        &self,
        info: impl Into<CatalogInfo>,
    ) -> Result<CascadeReport, CatalogError> {
        self.begin_mutation("cascade_remove")?;
        let mut visitor = CascadeDeleteVisitor::new(self);
        info.into().accept(&mut visitor)?;
        Ok(visitor.into_report())
    }

    /// Validate `info` without committing anything.
    pub fn validate(&self, info: &CatalogInfo, is_new: bool) -> ValidationResult {
        let validators = self.validators.read().clone();
        validation::validate(self, &validators, info, is_new)
    }

    /// Fill in derived values before validation. A missing layer default
    /// style is only assigned to new layers.
    fn prepare(&self, mut info: CatalogInfo, is_new: bool) -> CatalogInfo {
        match &mut info {
            CatalogInfo::Resource(resource) => {
                if resource.native_name.is_none() {
                    resource.native_name = Some(resource.name.clone());
                }
            }
            CatalogInfo::Layer(layer) => {
                let resource = layer.resource.as_ref().and_then(|id| self.resource(id));
                if let Some(resource) = resource {
                    if layer.kind.is_none() {
                        layer.kind = Some(PublishedType::from(&resource.kind));
                    }
                    if is_new && layer.default_style.is_none() {
                        match self.default_style_for(&resource) {
                            Some(style) => {
                                info!(
                                    layer = %layer.name,
                                    style = %style.name,
                                    "layer is missing the default style, assigning one"
                                );
                                layer.default_style = Some(style.id);
                            }
                            None => {
                                debug!(layer = %layer.name, "no default style available for layer");
                            }
                        }
                    }
                }
            }
            _ => {}
        }
        info
    }

    /// Refuse removals that would leave dangling references.
    fn check_removal(&self, info: &CatalogInfo) -> Result<(), CatalogError> {
        let violation = |msg: String| Err(CatalogError::InvariantViolation(msg));
        match info {
            CatalogInfo::Workspace(ws) => {
                if self.namespace_by_prefix(&ws.name).is_some() {
                    return violation(format!(
                        "cannot delete workspace '{}' with linked namespace",
                        ws.name
                    ));
                }
                let owns_styles = self
                    .styles()
                    .iter()
                    .any(|s| s.workspace.as_ref() == Some(&ws.id));
                let owns_groups = self
                    .layer_groups()
                    .iter()
                    .any(|g| g.workspace.as_ref() == Some(&ws.id));
                if !self.stores_by_workspace(&ws.id).is_empty() || owns_styles || owns_groups {
                    return violation(format!("cannot delete non-empty workspace '{}'", ws.name));
                }
            }
            CatalogInfo::Namespace(ns) => {
                if let Some(ws) = self.workspace_by_name(&ns.prefix) {
                    let has_resources = self
                        .stores_by_workspace(&ws.id)
                        .iter()
                        .any(|s| !self.resources_by_store(&s.id).is_empty());
                    if has_resources {
                        return violation(format!(
                            "unable to delete non-empty namespace '{}'",
                            ns.prefix
                        ));
                    }
                }
            }
            CatalogInfo::Store(store) => {
                if !self.resources_by_store(&store.id).is_empty() {
                    return violation(format!("unable to delete non-empty store '{}'", store.name));
                }
            }
            CatalogInfo::Resource(resource) => {
                if !self.layers_by_resource(&resource.id).is_empty() {
                    return violation(format!(
                        "unable to delete resource '{}' referenced by layer",
                        resource.name
                    ));
                }
            }
            CatalogInfo::Layer(layer) => {
                if let Some(group) = self
                    .layer_groups()
                    .into_iter()
                    .find(|g| g.references_layer(&layer.id))
                {
                    return violation(format!(
                        "unable to delete layer '{}' referenced by layer group '{}'",
                        layer.name, group.name
                    ));
                }
            }
            CatalogInfo::Style(style) => {
                if let Some(layer) = self.layers_by_style(&style.id).into_iter().next() {
                    return violation(format!(
                        "unable to delete style '{}' referenced by '{}'",
                        style.name, layer.name
                    ));
                }
                if let Some(group) = self
                    .layer_groups()
                    .into_iter()
                    .find(|g| g.references_style(&style.id))
                {
                    return violation(format!(
                        "unable to delete style '{}' referenced by layer group '{}'",
                        style.name, group.name
                    ));
                }
                if self.is_default_style(style) {
                    return violation(format!("unable to delete default style '{}'", style.name));
                }
            }
            CatalogInfo::LayerGroup(_) => {}
        }
        Ok(())
    }

    // =========================================================================
    // Default pointers
    // =========================================================================

    pub fn default_workspace(&self) -> Option<WorkspaceInfo> {
        self.facade.default_workspace()
    }

    pub fn set_default_workspace(
        &self,
        workspace: Option<&WorkspaceInfo>,
    ) -> Result<(), CatalogError> {
        self.begin_mutation("set_default_workspace")?;
        let old = self.facade.default_workspace();
        if old.as_ref().map(|w| &w.id) == workspace.map(|w| &w.id) {
            return Ok(());
        }
        let event = ModifyEvent::DefaultWorkspace {
            old,
            new: workspace.cloned(),
        };
        self.dispatch("modify", |l| l.handle_modify_event(self, &event))?;
        self.facade.set_default_workspace(workspace)?;
        self.dispatch("post_modify", |l| l.handle_post_modify_event(self, &event))
    }

    pub fn default_namespace(&self) -> Option<NamespaceInfo> {
        self.facade.default_namespace()
    }

    pub fn set_default_namespace(
        &self,
        namespace: Option<&NamespaceInfo>,
    ) -> Result<(), CatalogError> {
        self.begin_mutation("set_default_namespace")?;
        let old = self.facade.default_namespace();
        if old.as_ref().map(|n| &n.id) == namespace.map(|n| &n.id) {
            return Ok(());
        }
        let event = ModifyEvent::DefaultNamespace {
            old,
            new: namespace.cloned(),
        };
        self.dispatch("modify", |l| l.handle_modify_event(self, &event))?;
        self.facade.set_default_namespace(namespace)?;
        self.dispatch("post_modify", |l| l.handle_post_modify_event(self, &event))
    }

    pub fn default_data_store(&self, workspace: &CatalogId) -> Option<StoreInfo> {
        self.facade.default_data_store(workspace)
    }

    pub fn set_default_data_store(
        &self,
        workspace: &CatalogId,
        store: Option<&StoreInfo>,
    ) -> Result<(), CatalogError> {
        self.begin_mutation("set_default_data_store")?;
        if let Some(store) = store {
            if store.kind != StoreKind::Data || store.workspace.as_ref() != Some(workspace) {
                return Err(CatalogError::InvariantViolation(format!(
                    "store '{}' is not a data store of workspace '{}'",
                    store.name, workspace
                )));
            }
        }
        let old = self.facade.default_data_store(workspace);
        if old.as_ref().map(|s| &s.id) == store.map(|s| &s.id) {
            return Ok(());
        }
        let event = ModifyEvent::DefaultDataStore {
            workspace: workspace.clone(),
            old,
            new: store.cloned(),
        };
        self.dispatch("modify", |l| l.handle_modify_event(self, &event))?;
        self.facade.set_default_data_store(workspace, store)?;
        self.dispatch("post_modify", |l| l.handle_post_modify_event(self, &event))
    }

    fn assign_initial_defaults(&self, added: &CatalogInfo) -> Result<(), CatalogError> {
        match added {
            CatalogInfo::Workspace(ws) if self.default_workspace().is_none() => {
                self.set_default_workspace(Some(ws))
            }
            CatalogInfo::Namespace(ns) if self.default_namespace().is_none() => {
                self.set_default_namespace(Some(ns))
            }
            CatalogInfo::Store(store) if store.kind == StoreKind::Data => match &store.workspace {
                Some(ws) if self.default_data_store(ws).is_none() => {
                    self.set_default_data_store(ws, Some(store))
                }
                _ => Ok(()),
            },
            _ => Ok(()),
        }
    }

    fn is_default(&self, info: &CatalogInfo) -> bool {
        match info {
            CatalogInfo::Workspace(ws) => {
                self.default_workspace().map(|d| d.id).as_ref() == Some(&ws.id)
            }
            CatalogInfo::Namespace(ns) => {
                self.default_namespace().map(|d| d.id).as_ref() == Some(&ns.id)
            }
            CatalogInfo::Store(store) => store.workspace.as_ref().is_some_and(|ws| {
                self.default_data_store(ws).map(|d| d.id).as_ref() == Some(&store.id)
            }),
            _ => false,
        }
    }

    /// Point a default at the first remaining candidate after its target
    /// was removed.
    fn reassign_default(&self, removed: &CatalogInfo) -> Result<(), CatalogError> {
        match removed {
            CatalogInfo::Workspace(_) => {
                let next = self.workspaces().into_iter().next();
                self.set_default_workspace(next.as_ref())
            }
            CatalogInfo::Namespace(_) => {
                let next = self.namespaces().into_iter().next();
                self.set_default_namespace(next.as_ref())
            }
            CatalogInfo::Store(store) => match &store.workspace {
                Some(ws) if self.workspace(ws).is_some() => {
                    let next = self
                        .stores_by_workspace(ws)
                        .into_iter()
                        .find(|s| s.kind == StoreKind::Data);
                    self.set_default_data_store(ws, next.as_ref())
                }
                _ => Ok(()),
            },
            _ => Ok(()),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn get(&self, kind: InfoKind, id: &CatalogId) -> Option<CatalogInfo> {
        self.facade.get(kind, id)
    }

    pub fn workspace(&self, id: &CatalogId) -> Option<WorkspaceInfo> {
        self.get(InfoKind::Workspace, id)?.into_workspace()
    }

    pub fn workspaces(&self) -> Vec<WorkspaceInfo> {
        list(&*self.facade, InfoKind::Workspace, CatalogInfo::into_workspace)
    }

    pub fn workspace_by_name(&self, name: &str) -> Option<WorkspaceInfo> {
        self.workspaces().into_iter().find(|ws| ws.name == name)
    }

    pub fn namespace(&self, id: &CatalogId) -> Option<NamespaceInfo> {
        self.get(InfoKind::Namespace, id)?.into_namespace()
    }

    pub fn namespaces(&self) -> Vec<NamespaceInfo> {
        list(&*self.facade, InfoKind::Namespace, CatalogInfo::into_namespace)
    }

    pub fn namespace_by_prefix(&self, prefix: &str) -> Option<NamespaceInfo> {
        self.namespaces().into_iter().find(|ns| ns.prefix == prefix)
    }

    pub fn store(&self, id: &CatalogId) -> Option<StoreInfo> {
        self.get(InfoKind::Store, id)?.into_store()
    }

    pub fn stores(&self) -> Vec<StoreInfo> {
        list(&*self.facade, InfoKind::Store, CatalogInfo::into_store)
    }

    pub fn stores_by_workspace(&self, workspace: &CatalogId) -> Vec<StoreInfo> {
        self.stores()
            .into_iter()
            .filter(|s| s.workspace.as_ref() == Some(workspace))
            .collect()
    }

    pub fn store_by_name(&self, workspace: &CatalogId, name: &str) -> Option<StoreInfo> {
        self.stores_by_workspace(workspace)
            .into_iter()
            .find(|s| s.name == name)
    }

    pub fn resource(&self, id: &CatalogId) -> Option<ResourceInfo> {
        self.get(InfoKind::Resource, id)?.into_resource()
    }

    pub fn resources(&self) -> Vec<ResourceInfo> {
        list(&*self.facade, InfoKind::Resource, CatalogInfo::into_resource)
    }

    pub fn resources_by_store(&self, store: &CatalogId) -> Vec<ResourceInfo> {
        self.resources()
            .into_iter()
            .filter(|r| r.store.as_ref() == Some(store))
            .collect()
    }

    pub fn layer(&self, id: &CatalogId) -> Option<LayerInfo> {
        self.get(InfoKind::Layer, id)?.into_layer()
    }

    pub fn layers(&self) -> Vec<LayerInfo> {
        list(&*self.facade, InfoKind::Layer, CatalogInfo::into_layer)
    }

    pub fn layers_by_resource(&self, resource: &CatalogId) -> Vec<LayerInfo> {
        self.layers()
            .into_iter()
            .filter(|l| l.resource.as_ref() == Some(resource))
            .collect()
    }

    /// Layers using `style` as their default or as an extra style.
    pub fn layers_by_style(&self, style: &CatalogId) -> Vec<LayerInfo> {
        self.layers()
            .into_iter()
            .filter(|l| l.default_style.as_ref() == Some(style) || l.styles.contains(style))
            .collect()
    }

    pub fn layer_group(&self, id: &CatalogId) -> Option<LayerGroupInfo> {
        self.get(InfoKind::LayerGroup, id)?.into_layer_group()
    }

    pub fn layer_groups(&self) -> Vec<LayerGroupInfo> {
        list(&*self.facade, InfoKind::LayerGroup, CatalogInfo::into_layer_group)
    }

    /// Layer group named `name` in `workspace` (`None` for global groups).
    pub fn layer_group_by_name(
        &self,
        workspace: Option<&CatalogId>,
        name: &str,
    ) -> Option<LayerGroupInfo> {
        self.layer_groups()
            .into_iter()
            .find(|g| g.name == name && g.workspace.as_ref() == workspace)
    }

    pub fn style(&self, id: &CatalogId) -> Option<StyleInfo> {
        self.get(InfoKind::Style, id)?.into_style()
    }

    pub fn styles(&self) -> Vec<StyleInfo> {
        list(&*self.facade, InfoKind::Style, CatalogInfo::into_style)
    }

    /// Style named `name` in `workspace` (`None` for global styles).
    pub fn style_by_name(&self, workspace: Option<&CatalogId>, name: &str) -> Option<StyleInfo> {
        self.styles()
            .into_iter()
            .find(|s| s.name == name && s.workspace.as_ref() == workspace)
    }

    /// Workspace owning the store of `resource`.
    pub fn workspace_of_resource(&self, resource: &ResourceInfo) -> Option<CatalogId> {
        resource
            .store
            .as_ref()
            .and_then(|id| self.store(id))
            .and_then(|s| s.workspace)
    }

    /// Workspace owning the resource published by `layer`.
    pub fn workspace_of_layer(&self, layer: &LayerInfo) -> Option<CatalogId> {
        layer
            .resource
            .as_ref()
            .and_then(|id| self.resource(id))
            .and_then(|r| self.workspace_of_resource(&r))
    }

    /// Whether `style` is a canonical default style.
    pub fn is_default_style(&self, style: &StyleInfo) -> bool {
        self.styles.is_default_style(style)
    }

    /// The canonical style for `resource`, if it is in the catalog.
    pub fn default_style_for(&self, resource: &ResourceInfo) -> Option<StyleInfo> {
        self.styles.resolve(self, &resource.kind)
    }

    /// Content fingerprint of the whole catalog, independent of insertion
    /// order.
    pub fn fingerprint(&self) -> Result<Fingerprint, CatalogError> {
        let kinds = [
            InfoKind::Workspace,
            InfoKind::Namespace,
            InfoKind::Store,
            InfoKind::Resource,
            InfoKind::Layer,
            InfoKind::LayerGroup,
            InfoKind::Style,
        ];
        let mut entries = Vec::new();
        for kind in kinds {
            for info in self.facade.list(kind) {
                let json = serde_json::to_string(&info)
                    .map_err(|e| CatalogError::Facade(e.to_string()))?;
                entries.push((info.id().clone(), json));
            }
        }
        Ok(Fingerprint::compute(&entries))
    }
}

fn list<T>(
    facade: &dyn CatalogFacade,
    kind: InfoKind,
    convert: fn(CatalogInfo) -> Option<T>,
) -> Vec<T> {
    facade.list(kind).into_iter().filter_map(convert).collect()
}
