//! catalog::consistency
//!
//! Keeps each namespace and the workspace of the same name in step.
//!
//! A namespace is paired with the workspace whose name equals its prefix.
//! [`NamespaceWorkspaceConsistencyListener`] reacts to catalog events on
//! either side and applies the matching change to the other:
//!
//! - renames (namespace prefix / workspace name)
//! - default namespace / default workspace pointers
//! - the `isolated` flag
//! - namespace URI, copied into the `namespace` connection parameter of the
//!   paired workspace's data stores
//! - namespace removal, which cascades to the workspace
//!
//! Changes made by the listener produce events of their own. While it is
//! applying one, the listener ignores rename and default pointer events so
//! a change never bounces back.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::core::model::{CatalogInfo, NamespaceInfo, StoreKind, WorkspaceInfo, NAMESPACE_PARAM};
use crate::core::visitor::Visitable;

use super::cascade::CascadeDeleteVisitor;
use super::events::{AddEvent, CatalogListener, ModifyEvent, RemoveEvent};
use super::Catalog;

/// Marks the listener as editing until dropped.
struct EditingScope<'a> {
    flag: &'a AtomicBool,
}

impl<'a> EditingScope<'a> {
    /// `None` if the listener is already editing.
    fn enter(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for EditingScope<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Listener pairing namespaces and workspaces by name.
///
/// Registered by default on every [`Catalog`] (see
/// [`CatalogBuilder::consistency_listener`](super::CatalogBuilder::consistency_listener)).
#[derive(Debug, Default)]
pub struct NamespaceWorkspaceConsistencyListener {
    editing: AtomicBool,
}

impl NamespaceWorkspaceConsistencyListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the listener is currently applying a change.
    pub fn is_editing(&self) -> bool {
        self.editing.load(Ordering::Acquire)
    }

    fn sync_isolation(&self, catalog: &Catalog, source: &CatalogInfo) -> anyhow::Result<()> {
        match source {
            CatalogInfo::Workspace(ws) => {
                let Some(mut ns) = catalog.namespace_by_prefix(&ws.name) else {
                    return Ok(());
                };
                if ns.isolated != ws.isolated {
                    let Some(_scope) = EditingScope::enter(&self.editing) else {
                        return Ok(());
                    };
                    debug!(namespace = %ns.prefix, isolated = ws.isolated, "syncing namespace isolation");
                    ns.isolated = ws.isolated;
                    catalog.save(ns)?;
                }
            }
            CatalogInfo::Namespace(ns) => {
                let Some(mut ws) = catalog.workspace_by_name(&ns.prefix) else {
                    return Ok(());
                };
                if ws.isolated != ns.isolated {
                    let Some(_scope) = EditingScope::enter(&self.editing) else {
                        return Ok(());
                    };
                    debug!(workspace = %ws.name, isolated = ns.isolated, "syncing workspace isolation");
                    ws.isolated = ns.isolated;
                    catalog.save(ws)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn propagate_uri(&self, catalog: &Catalog, ns: &NamespaceInfo) -> anyhow::Result<()> {
        let Some(ws) = catalog.workspace_by_name(&ns.prefix) else {
            return Ok(());
        };
        for mut store in catalog.stores_by_workspace(&ws.id) {
            if store.kind != StoreKind::Data {
                continue;
            }
            let Some(current) = store.connection_parameters.get(NAMESPACE_PARAM) else {
                continue;
            };
            if current != &ns.uri {
                debug!(store = %store.name, uri = %ns.uri, "updating store namespace");
                store
                    .connection_parameters
                    .insert(NAMESPACE_PARAM.to_string(), ns.uri.clone());
                catalog.save(store)?;
            }
        }
        Ok(())
    }

    fn rename_workspace(&self, catalog: &Catalog, old: &str, new: &str) -> anyhow::Result<()> {
        if let Some(mut ws) = catalog.workspace_by_name(old) {
            debug!(from = old, to = new, "renaming workspace to follow namespace");
            ws.name = new.to_string();
            catalog.save(ws)?;
        }
        Ok(())
    }

    fn rename_namespace(&self, catalog: &Catalog, old: &str, new: &str) -> anyhow::Result<()> {
        if let Some(mut ns) = catalog.namespace_by_prefix(old) {
            debug!(from = old, to = new, "renaming namespace to follow workspace");
            ns.prefix = new.to_string();
            catalog.save(ns)?;
        }
        Ok(())
    }
}

impl CatalogListener for NamespaceWorkspaceConsistencyListener {
    fn handle_add_event(&self, catalog: &Catalog, event: &AddEvent) -> anyhow::Result<()> {
        self.sync_isolation(catalog, &event.source)
    }

    fn handle_modify_event(&self, catalog: &Catalog, event: &ModifyEvent) -> anyhow::Result<()> {
        let Some(_scope) = EditingScope::enter(&self.editing) else {
            return Ok(());
        };
        match event {
            ModifyEvent::Info { old, new, changed } => match (old, new) {
                (CatalogInfo::Namespace(old), CatalogInfo::Namespace(new))
                    if changed.contains(&"prefix") =>
                {
                    self.rename_workspace(catalog, &old.prefix, &new.prefix)
                }
                (CatalogInfo::Workspace(old), CatalogInfo::Workspace(new))
                    if changed.contains(&"name") =>
                {
                    self.rename_namespace(catalog, &old.name, &new.name)
                }
                _ => Ok(()),
            },
            ModifyEvent::DefaultNamespace { new: Some(ns), .. } => {
                if let Some(ws) = catalog.workspace_by_name(&ns.prefix) {
                    catalog.set_default_workspace(Some(&ws))?;
                }
                Ok(())
            }
            ModifyEvent::DefaultWorkspace { new: Some(ws), .. } => {
                if let Some(ns) = catalog.namespace_by_prefix(&ws.name) {
                    catalog.set_default_namespace(Some(&ns))?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn handle_post_modify_event(
        &self,
        catalog: &Catalog,
        event: &ModifyEvent,
    ) -> anyhow::Result<()> {
        let ModifyEvent::Info { new, .. } = event else {
            return Ok(());
        };
        if let CatalogInfo::Namespace(ns) = new {
            self.propagate_uri(catalog, ns)?;
        }
        self.sync_isolation(catalog, new)
    }

    fn handle_remove_event(&self, catalog: &Catalog, event: &RemoveEvent) -> anyhow::Result<()> {
        let CatalogInfo::Namespace(ns) = &event.source else {
            return Ok(());
        };
        let Some(ws) = catalog.workspace_by_name(&ns.prefix) else {
            return Ok(());
        };
        debug!(workspace = %ws.name, "namespace removed, removing its workspace");
        remove_workspace(catalog, &ws)
    }
}

fn remove_workspace(catalog: &Catalog, ws: &WorkspaceInfo) -> anyhow::Result<()> {
    let mut visitor = CascadeDeleteVisitor::new(catalog);
    ws.accept(&mut visitor)?;
    Ok(())
}
