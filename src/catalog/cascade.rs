//! catalog::cascade
//!
//! Cascade deletion: remove an entity and everything that depends on it.
//!
//! # Architecture
//!
//! [`CascadeDeleteVisitor`] walks the dependency graph depth first and
//! removes leaves before their owners, so every individual
//! [`Catalog::remove`] passes the removal guards:
//!
//! ```text
//! workspace -> stores -> resources -> layers -> (layer groups fixed up)
//!           -> workspace layer groups
//!           -> workspace styles -> (layers and groups restyled)
//!           -> namespace with the same prefix
//! ```
//!
//! Every operation re-reads its target by id and does nothing when it is
//! already gone. Listeners (the namespace/workspace consistency listener in
//! particular) may remove entities while a cascade is running, and
//! cascading the same entity twice is a no-op.
//!
//! [`CascadeCollector`] performs the same walk without mutating anything and
//! reports what a cascade would remove and modify.
//!
//! # Invariants
//!
//! - Default styles are never removed
//! - A layer group left without members, or an EO group left without a root
//!   layer or root style, is removed instead of saved
//! - Removal is not transactional: on error, everything removed before the
//!   failure stays removed and is listed in the visitor's report

use std::collections::HashSet;
use std::convert::Infallible;

use tracing::{debug, warn};

use crate::core::model::{
    CatalogInfo, LayerGroupInfo, LayerInfo, NamespaceInfo, ResourceInfo, StoreInfo, StyleInfo,
    WorkspaceInfo,
};
use crate::core::types::CatalogId;
use crate::core::visitor::{CatalogVisitor, Visitable};

use super::external::StyleStore;
use super::{Catalog, CatalogError};

/// Contents of a removed style document.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleBackup {
    pub style: StyleInfo,
    pub contents: Vec<u8>,
}

/// What a cascade removed and modified, in order.
#[derive(Debug, Clone, Default)]
pub struct CascadeReport {
    pub removed: Vec<CatalogInfo>,
    /// Entities saved with references to removed entities dropped. Entities
    /// later removed by the same cascade are not listed.
    pub modified: Vec<CatalogInfo>,
    pub style_backups: Vec<StyleBackup>,
}

impl CascadeReport {
    pub fn was_removed(&self, id: &CatalogId) -> bool {
        self.removed.iter().any(|i| i.id() == id)
    }

    pub fn was_modified(&self, id: &CatalogId) -> bool {
        self.modified.iter().any(|i| i.id() == id)
    }

    fn record_removed(&mut self, info: CatalogInfo) {
        self.modified.retain(|i| i.id() != info.id());
        if !self.was_removed(info.id()) {
            self.removed.push(info);
        }
    }

    fn record_modified(&mut self, info: CatalogInfo) {
        match self.modified.iter_mut().find(|i| i.id() == info.id()) {
            Some(existing) => *existing = info,
            None => self.modified.push(info),
        }
    }
}

/// Removes visited entities together with their dependents.
pub struct CascadeDeleteVisitor<'a> {
    catalog: &'a Catalog,
    style_store: Option<&'a dyn StyleStore>,
    report: CascadeReport,
}

impl<'a> CascadeDeleteVisitor<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            style_store: None,
            report: CascadeReport::default(),
        }
    }

    /// Back up removed style documents from `store` into the report.
    pub fn with_style_store(mut self, store: &'a dyn StyleStore) -> Self {
        self.style_store = Some(store);
        self
    }

    pub fn report(&self) -> &CascadeReport {
        &self.report
    }

    pub fn into_report(self) -> CascadeReport {
        self.report
    }

    fn remove(&mut self, info: CatalogInfo) -> Result<(), CatalogError> {
        self.catalog.remove(info.clone())?;
        debug!(kind = %info.kind(), name = info.name(), "cascade removed");
        self.report.record_removed(info);
        Ok(())
    }

    fn save(&mut self, info: CatalogInfo) -> Result<(), CatalogError> {
        let saved = self.catalog.save(info)?;
        self.report.record_modified(saved);
        Ok(())
    }

    fn cascade_store(&mut self, store: &StoreInfo) -> Result<(), CatalogError> {
        let Some(store) = self.catalog.store(&store.id) else {
            return Ok(());
        };
        for resource in self.catalog.resources_by_store(&store.id) {
            resource.accept(self)?;
        }
        self.remove(store.into())
    }

    fn cascade_resource(&mut self, resource: &ResourceInfo) -> Result<(), CatalogError> {
        if self.catalog.resource(&resource.id).is_none() {
            return Ok(());
        }
        for layer in self.catalog.layers_by_resource(&resource.id) {
            layer.accept(self)?;
        }
        // removing the last layer also removes the resource
        match self.catalog.resource(&resource.id) {
            Some(current) => self.remove(current.into()),
            None => Ok(()),
        }
    }

    /// Style to use for `layer` once `removed` is gone.
    fn replacement_style(&self, layer: &LayerInfo, removed: &StyleInfo) -> Option<CatalogId> {
        let resource = layer.resource.as_ref().and_then(|id| self.catalog.resource(id));
        let canonical = resource
            .and_then(|r| self.catalog.default_style_for(&r))
            .filter(|s| s.id != removed.id);
        if let Some(style) = canonical {
            return Some(style.id);
        }

        let names = self.catalog.style_resolver().names();
        if let Some(point) = self.catalog.style_by_name(None, &names.point) {
            warn!(layer = %layer.name, style = %point.name, "no canonical style for layer, falling back");
            return Some(point.id);
        }
        if let Some(any) = self
            .catalog
            .styles()
            .into_iter()
            .find(|s| s.workspace.is_none() && s.id != removed.id)
        {
            warn!(layer = %layer.name, style = %any.name, "no canonical style for layer, falling back");
            return Some(any.id);
        }
        warn!(layer = %layer.name, "no style left to use as the layer default");
        None
    }

    fn restyle_layers(&mut self, style: &StyleInfo) -> Result<(), CatalogError> {
        for mut layer in self.catalog.layers_by_style(&style.id) {
            if layer.default_style.as_ref() == Some(&style.id) {
                layer.default_style = self.replacement_style(&layer, style);
            }
            layer.styles.remove(&style.id);
            self.save(layer.into())?;
        }
        Ok(())
    }

    fn restyle_groups(&mut self, style: &StyleInfo) -> Result<(), CatalogError> {
        let groups: Vec<_> = self
            .catalog
            .layer_groups()
            .into_iter()
            .filter(|g| g.references_style(&style.id))
            .collect();

        for mut group in groups {
            for i in 0..group.styles.len() {
                if group.styles[i].as_ref() == Some(&style.id) {
                    group.styles[i] = group
                        .layers
                        .get(i)
                        .and_then(|id| self.catalog.layer(id))
                        .and_then(|l| l.default_style);
                }
            }
            if group.root_layer_style.as_ref() == Some(&style.id) {
                group.root_layer_style = group
                    .root_layer
                    .as_ref()
                    .and_then(|id| self.catalog.layer(id))
                    .and_then(|l| l.default_style);
                if group.root_layer_style.is_none() && group.mode.requires_root() {
                    warn!(group = %group.name, "no root layer style left, removing layer group");
                    group.accept(self)?;
                    continue;
                }
            }
            self.save(group.into())?;
        }
        Ok(())
    }
}

impl CatalogVisitor for CascadeDeleteVisitor<'_> {
    type Error = CatalogError;

    fn visit_workspace(&mut self, workspace: &WorkspaceInfo) -> Result<(), CatalogError> {
        let Some(ws) = self.catalog.workspace(&workspace.id) else {
            return Ok(());
        };

        for store in self.catalog.stores_by_workspace(&ws.id) {
            store.accept(self)?;
        }
        let groups = self.catalog.layer_groups();
        for group in groups.iter().filter(|g| g.workspace.as_ref() == Some(&ws.id)) {
            group.accept(self)?;
        }
        let styles = self.catalog.styles();
        for style in styles.iter().filter(|s| s.workspace.as_ref() == Some(&ws.id)) {
            style.accept(self)?;
        }
        if let Some(ns) = self.catalog.namespace_by_prefix(&ws.name) {
            ns.accept(self)?;
        }

        // the consistency listener removes the workspace along with its
        // namespace
        if self.catalog.workspace(&ws.id).is_some() {
            self.remove(ws.into())
        } else {
            self.report.record_removed(ws.into());
            Ok(())
        }
    }

    fn visit_namespace(&mut self, namespace: &NamespaceInfo) -> Result<(), CatalogError> {
        match self.catalog.namespace(&namespace.id) {
            Some(ns) => self.remove(ns.into()),
            None => Ok(()),
        }
    }

    fn visit_data_store(&mut self, store: &StoreInfo) -> Result<(), CatalogError> {
        self.cascade_store(store)
    }

    fn visit_coverage_store(&mut self, store: &StoreInfo) -> Result<(), CatalogError> {
        self.cascade_store(store)
    }

    fn visit_wms_store(&mut self, store: &StoreInfo) -> Result<(), CatalogError> {
        self.cascade_store(store)
    }

    fn visit_wmts_store(&mut self, store: &StoreInfo) -> Result<(), CatalogError> {
        self.cascade_store(store)
    }

    fn visit_feature_type(&mut self, resource: &ResourceInfo) -> Result<(), CatalogError> {
        self.cascade_resource(resource)
    }

    fn visit_coverage(&mut self, resource: &ResourceInfo) -> Result<(), CatalogError> {
        self.cascade_resource(resource)
    }

    fn visit_wms_layer(&mut self, resource: &ResourceInfo) -> Result<(), CatalogError> {
        self.cascade_resource(resource)
    }

    fn visit_wmts_layer(&mut self, resource: &ResourceInfo) -> Result<(), CatalogError> {
        self.cascade_resource(resource)
    }

    fn visit_layer(&mut self, layer: &LayerInfo) -> Result<(), CatalogError> {
        let Some(layer) = self.catalog.layer(&layer.id) else {
            return Ok(());
        };

        let groups: Vec<_> = self
            .catalog
            .layer_groups()
            .into_iter()
            .filter(|g| g.references_layer(&layer.id))
            .collect();
        for mut group in groups {
            group.remove_layer(&layer.id);
            if group.root_layer.as_ref() == Some(&layer.id) {
                group.root_layer = None;
                group.root_layer_style = None;
            }
            if group.layers.is_empty() || (group.mode.requires_root() && group.root_layer.is_none())
            {
                group.accept(self)?;
            } else {
                self.save(group.into())?;
            }
        }

        let resource = layer.resource.clone();
        self.remove(layer.into())?;

        if let Some(resource_id) = resource {
            if self.catalog.layers_by_resource(&resource_id).is_empty() {
                if let Some(resource) = self.catalog.resource(&resource_id) {
                    self.remove(resource.into())?;
                }
            }
        }
        Ok(())
    }

    fn visit_style(&mut self, style: &StyleInfo) -> Result<(), CatalogError> {
        let Some(style) = self.catalog.style(&style.id) else {
            return Ok(());
        };
        if self.catalog.is_default_style(&style) {
            return Err(CatalogError::InvariantViolation(format!(
                "unable to delete default style '{}'",
                style.name
            )));
        }

        self.restyle_layers(&style)?;
        self.restyle_groups(&style)?;

        if let Some(store) = self.style_store {
            match store.read_style(&style) {
                Ok(contents) => self.report.style_backups.push(StyleBackup {
                    style: style.clone(),
                    contents,
                }),
                Err(e) => warn!(style = %style.name, error = %e, "unable to back up style document"),
            }
        }
        self.remove(style.into())
    }

    fn visit_layer_group(&mut self, group: &LayerGroupInfo) -> Result<(), CatalogError> {
        match self.catalog.layer_group(&group.id) {
            Some(current) => self.remove(current.into()),
            None => Ok(()),
        }
    }
}

/// Re-add a style removed by a cascade and write its document back.
pub fn restore_style_backup(
    catalog: &Catalog,
    store: &dyn StyleStore,
    backup: &StyleBackup,
) -> Result<StyleInfo, CatalogError> {
    let added = catalog.add(backup.style.clone())?;
    let style = added
        .into_style()
        .ok_or_else(|| CatalogError::Facade("restored entity is not a style".to_string()))?;
    store.write_style(&style, &backup.contents)?;
    Ok(style)
}

/// Result of a dry run.
#[derive(Debug, Clone, Default)]
pub struct CascadePreview {
    pub removed: Vec<CatalogInfo>,
    pub modified: Vec<CatalogInfo>,
}

impl CascadePreview {
    pub fn removes(&self, id: &CatalogId) -> bool {
        self.removed.iter().any(|i| i.id() == id)
    }

    pub fn modifies(&self, id: &CatalogId) -> bool {
        self.modified.iter().any(|i| i.id() == id)
    }
}

/// Collects what a cascade would touch, without touching it.
///
/// Visit any number of entities, then call [`CascadeCollector::preview`].
/// Listener side effects are not simulated.
pub struct CascadeCollector<'a> {
    catalog: &'a Catalog,
    removed: Vec<CatalogInfo>,
    marked: HashSet<CatalogId>,
}

impl<'a> CascadeCollector<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            removed: Vec::new(),
            marked: HashSet::new(),
        }
    }

    fn mark(&mut self, info: CatalogInfo) {
        if self.marked.insert(info.id().clone()) {
            self.removed.push(info);
        }
    }

    fn collect_store(&mut self, store: &StoreInfo) {
        for resource in self.catalog.resources_by_store(&store.id) {
            self.collect_resource(&resource);
        }
        self.mark(store.clone().into());
    }

    fn collect_resource(&mut self, resource: &ResourceInfo) {
        for layer in self.catalog.layers_by_resource(&resource.id) {
            self.mark(layer.into());
        }
        self.mark(resource.clone().into());
    }

    /// Everything collected so far, plus the layer groups and layers that
    /// would be saved or removed as a consequence.
    pub fn preview(&self) -> CascadePreview {
        let mut removed = self.removed.clone();
        let mut modified = Vec::new();
        let removed_style = |id: &Option<CatalogId>| id.as_ref().is_some_and(|s| self.marked.contains(s));

        for group in self.catalog.layer_groups() {
            if self.marked.contains(&group.id) {
                continue;
            }
            let mut after = group.clone();
            for layer in &group.layers {
                if self.marked.contains(layer) {
                    after.remove_layer(layer);
                }
            }
            if after.root_layer.as_ref().is_some_and(|l| self.marked.contains(l)) {
                after.root_layer = None;
                after.root_layer_style = None;
            }
            if after.layers.is_empty() || (after.mode.requires_root() && after.root_layer.is_none())
            {
                removed.push(group.into());
            } else if after != group
                || after.styles.iter().any(|s| removed_style(s))
                || removed_style(&after.root_layer_style)
            {
                modified.push(group.into());
            }
        }

        for layer in self.catalog.layers() {
            if self.marked.contains(&layer.id) {
                continue;
            }
            if removed_style(&layer.default_style)
                || layer.styles.iter().any(|s| self.marked.contains(s))
            {
                modified.push(layer.into());
            }
        }

        CascadePreview { removed, modified }
    }
}

impl CatalogVisitor for CascadeCollector<'_> {
    type Error = Infallible;

    fn visit_workspace(&mut self, ws: &WorkspaceInfo) -> Result<(), Infallible> {
        for store in self.catalog.stores_by_workspace(&ws.id) {
            self.collect_store(&store);
        }
        for group in self.catalog.layer_groups() {
            if group.workspace.as_ref() == Some(&ws.id) {
                self.mark(group.into());
            }
        }
        for style in self.catalog.styles() {
            if style.workspace.as_ref() == Some(&ws.id) {
                self.mark(style.into());
            }
        }
        if let Some(ns) = self.catalog.namespace_by_prefix(&ws.name) {
            self.mark(ns.into());
        }
        self.mark(ws.clone().into());
        Ok(())
    }

    fn visit_namespace(&mut self, ns: &NamespaceInfo) -> Result<(), Infallible> {
        self.mark(ns.clone().into());
        Ok(())
    }

    fn visit_data_store(&mut self, store: &StoreInfo) -> Result<(), Infallible> {
        self.collect_store(store);
        Ok(())
    }

    fn visit_coverage_store(&mut self, store: &StoreInfo) -> Result<(), Infallible> {
        self.collect_store(store);
        Ok(())
    }

    fn visit_wms_store(&mut self, store: &StoreInfo) -> Result<(), Infallible> {
        self.collect_store(store);
        Ok(())
    }

    fn visit_wmts_store(&mut self, store: &StoreInfo) -> Result<(), Infallible> {
        self.collect_store(store);
        Ok(())
    }

    fn visit_feature_type(&mut self, resource: &ResourceInfo) -> Result<(), Infallible> {
        self.collect_resource(resource);
        Ok(())
    }

    fn visit_coverage(&mut self, resource: &ResourceInfo) -> Result<(), Infallible> {
        self.collect_resource(resource);
        Ok(())
    }

    fn visit_wms_layer(&mut self, resource: &ResourceInfo) -> Result<(), Infallible> {
        self.collect_resource(resource);
        Ok(())
    }

    fn visit_wmts_layer(&mut self, resource: &ResourceInfo) -> Result<(), Infallible> {
        self.collect_resource(resource);
        Ok(())
    }

    fn visit_layer(&mut self, layer: &LayerInfo) -> Result<(), Infallible> {
        self.mark(layer.clone().into());
        if let Some(resource_id) = &layer.resource {
            let orphaned = self
                .catalog
                .layers_by_resource(resource_id)
                .iter()
                .all(|l| self.marked.contains(&l.id));
            if let (true, Some(resource)) = (orphaned, self.catalog.resource(resource_id)) {
                self.mark(resource.into());
            }
        }
        Ok(())
    }

    fn visit_style(&mut self, style: &StyleInfo) -> Result<(), Infallible> {
        if !self.catalog.is_default_style(style) {
            self.mark(style.clone().into());
        }
        Ok(())
    }

    fn visit_layer_group(&mut self, group: &LayerGroupInfo) -> Result<(), Infallible> {
        self.mark(group.clone().into());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::external::MemoryStyleStore;
    use crate::core::factory::CatalogFactory;
    use crate::core::model::{GeometryKind, LayerGroupMode, ResourceKind, StoreKind};

    struct Fixture {
        catalog: Catalog,
        ws: WorkspaceInfo,
        ds: StoreInfo,
        roads: ResourceInfo,
        roads_layer: LayerInfo,
        rivers_layer: LayerInfo,
        fancy: StyleInfo,
        line: StyleInfo,
    }

    fn fixture() -> Fixture {
        let catalog = Catalog::new();
        let f = CatalogFactory;
        let ws = f.create_workspace("ws");
        let ns = f.create_namespace("ws", "http://ws.example.org");
        let ds = f.create_store(StoreKind::Data, &ws, "ds");
        let line_kind = ResourceKind::FeatureType {
            geometry: Some(GeometryKind::LineString),
        };
        let roads = f.create_resource(line_kind, &ds, "roads");
        let rivers = f.create_resource(line_kind, &ds, "rivers");
        let line = f.create_style("line");
        let fancy = f.create_style("fancy");

        catalog.add(ws.clone()).unwrap();
        catalog.add(ns).unwrap();
        catalog.add(ds.clone()).unwrap();
        catalog.add(roads.clone()).unwrap();
        catalog.add(rivers.clone()).unwrap();
        catalog.add(line.clone()).unwrap();
        catalog.add(fancy.clone()).unwrap();

        let mut roads_layer = f.create_layer(&roads);
        roads_layer.default_style = Some(fancy.id.clone());
        let rivers_layer = f.create_layer(&rivers);
        catalog.add(roads_layer.clone()).unwrap();
        catalog.add(rivers_layer.clone()).unwrap();

        Fixture {
            catalog,
            ws,
            ds,
            roads,
            roads_layer,
            rivers_layer,
            fancy,
            line,
        }
    }

    #[test]
    fn layer_removal_fixes_groups_and_orphaned_resource() {
        let fx = fixture();
        let f = CatalogFactory;
        let mut both = f.create_layer_group("both");
        both.push(fx.roads_layer.id.clone(), None);
        both.push(fx.rivers_layer.id.clone(), Some(fx.line.id.clone()));
        let mut only = f.create_layer_group("only");
        only.push(fx.roads_layer.id.clone(), None);
        fx.catalog.add(both.clone()).unwrap();
        fx.catalog.add(only.clone()).unwrap();

        let report = fx.catalog.cascade_remove(fx.roads_layer.clone()).unwrap();

        let both = fx.catalog.layer_group(&both.id).unwrap();
        assert_eq!(both.layers, vec![fx.rivers_layer.id.clone()]);
        assert_eq!(both.styles, vec![Some(fx.line.id.clone())]);
        assert!(fx.catalog.layer_group(&only.id).is_none());
        assert!(fx.catalog.resource(&fx.roads.id).is_none());

        assert!(report.was_removed(&only.id));
        assert!(report.was_removed(&fx.roads.id));
        assert!(report.was_modified(&both.id));
    }

    #[test]
    fn eo_group_losing_root_is_removed() {
        let fx = fixture();
        let mut eo = CatalogFactory.create_layer_group("eo");
        eo.mode = LayerGroupMode::Eo;
        eo.push(fx.rivers_layer.id.clone(), None);
        eo.root_layer = Some(fx.roads_layer.id.clone());
        eo.root_layer_style = Some(fx.fancy.id.clone());
        fx.catalog.add(eo.clone()).unwrap();

        fx.catalog.cascade_remove(fx.roads_layer.clone()).unwrap();
        assert!(fx.catalog.layer_group(&eo.id).is_none());
    }

    #[test]
    fn style_removal_restyles_layers() {
        let fx = fixture();
        let mut rivers = fx.rivers_layer.clone();
        rivers.default_style = Some(fx.line.id.clone());
        rivers.styles.insert(fx.fancy.id.clone());
        fx.catalog.save(rivers).unwrap();

        let report = fx.catalog.cascade_remove(fx.fancy.clone()).unwrap();

        let roads = fx.catalog.layer(&fx.roads_layer.id).unwrap();
        assert_eq!(roads.default_style, Some(fx.line.id.clone()));
        let rivers = fx.catalog.layer(&fx.rivers_layer.id).unwrap();
        assert!(rivers.styles.is_empty());
        assert!(fx.catalog.style(&fx.fancy.id).is_none());
        assert_eq!(report.modified.len(), 2);
    }

    #[test]
    fn style_backup_round_trip() {
        let fx = fixture();
        let store = MemoryStyleStore::new();
        store.write_style(&fx.fancy, b"<sld/>").unwrap();

        let mut visitor = CascadeDeleteVisitor::new(&fx.catalog).with_style_store(&store);
        fx.fancy.accept(&mut visitor).unwrap();
        let report = visitor.into_report();
        assert_eq!(report.style_backups.len(), 1);
        assert_eq!(report.style_backups[0].contents, b"<sld/>".to_vec());

        let restored = restore_style_backup(&fx.catalog, &store, &report.style_backups[0]).unwrap();
        assert_eq!(restored.name, "fancy");
        assert_eq!(store.read_style(&restored).unwrap(), b"<sld/>".to_vec());
    }

    #[test]
    fn default_style_is_refused() {
        let fx = fixture();
        let result = fx.catalog.cascade_remove(fx.line.clone());
        assert!(matches!(result, Err(CatalogError::InvariantViolation(_))));
        assert!(fx.catalog.style(&fx.line.id).is_some());
    }

    #[test]
    fn store_cascade_and_repeat_is_noop() {
        let fx = fixture();
        let report = fx.catalog.cascade_remove(fx.ds.clone()).unwrap();
        assert!(report.was_removed(&fx.ds.id));
        assert_eq!(report.removed.len(), 5);
        assert!(fx.catalog.layers().is_empty());

        let again = fx.catalog.cascade_remove(fx.ds.clone()).unwrap();
        assert!(again.removed.is_empty());
    }

    #[test]
    fn collector_matches_cascade() {
        let fx = fixture();
        let mut group = CatalogFactory.create_layer_group("g");
        group.push(fx.roads_layer.id.clone(), None);
        fx.catalog.add(group.clone()).unwrap();

        let mut collector = CascadeCollector::new(&fx.catalog);
        fx.ws.accept(&mut collector).unwrap_or_else(|never| match never {});
        let preview = collector.preview();

        let report = fx.catalog.cascade_remove(fx.ws.clone()).unwrap();
        let mut expected: Vec<_> = report.removed.iter().map(|i| i.id().clone()).collect();
        let mut predicted: Vec<_> = preview.removed.iter().map(|i| i.id().clone()).collect();
        expected.sort();
        predicted.sort();
        assert_eq!(predicted, expected);
        assert!(preview.removes(&group.id));
    }
}
