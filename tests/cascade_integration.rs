//! Integration tests for cascade deletion.
//!
//! These tests build small catalogs through the public API and check what
//! is left after cascading removals.

use std::collections::BTreeSet;
use std::sync::Arc;

use geocatalog::catalog::cascade::{CascadeCollector, CascadeDeleteVisitor};
use geocatalog::catalog::facade::{FailOn, MemoryCatalogFacade};
use geocatalog::catalog::{Catalog, CatalogError};
use geocatalog::core::factory::CatalogFactory;
use geocatalog::core::model::{
    CatalogInfo, GeometryKind, InfoKind, LayerInfo, ResourceKind, StoreKind, StyleInfo,
    WorkspaceInfo,
};
use geocatalog::core::types::CatalogId;
use geocatalog::core::visitor::Visitable;

// =============================================================================
// Test Helpers
// =============================================================================

const POINTS: ResourceKind = ResourceKind::FeatureType {
    geometry: Some(GeometryKind::Point),
};

/// Every entity in the catalog, keyed by id.
fn snapshot(catalog: &Catalog) -> Vec<CatalogInfo> {
    let mut all: Vec<CatalogInfo> = Vec::new();
    all.extend(catalog.workspaces().into_iter().map(Into::into));
    all.extend(catalog.namespaces().into_iter().map(Into::into));
    all.extend(catalog.stores().into_iter().map(Into::into));
    all.extend(catalog.resources().into_iter().map(Into::into));
    all.extend(catalog.layers().into_iter().map(Into::into));
    all.extend(catalog.layer_groups().into_iter().map(Into::into));
    all.extend(catalog.styles().into_iter().map(Into::into));
    all
}

fn ids(infos: &[CatalogInfo]) -> BTreeSet<CatalogId> {
    infos.iter().map(|i| i.id().clone()).collect()
}

/// A workspace with its namespace, one data store, and `layers` point
/// layers each publishing its own feature type.
fn populated_workspace(catalog: &Catalog, name: &str, layers: &[&str]) -> (WorkspaceInfo, Vec<LayerInfo>) {
    let f = CatalogFactory;
    let ws = f.create_workspace(name);
    catalog.add(ws.clone()).unwrap();
    catalog
        .add(f.create_namespace(name, format!("http://{}.example.org", name)))
        .unwrap();
    let store = f.create_store(StoreKind::Data, &ws, format!("{}-store", name));
    catalog.add(store.clone()).unwrap();

    let mut added = Vec::new();
    for layer_name in layers {
        let resource = f.create_resource(POINTS, &store, *layer_name);
        catalog.add(resource.clone()).unwrap();
        let layer = f.create_layer(&resource);
        catalog.add(layer.clone()).unwrap();
        added.push(catalog.layer(&layer.id).unwrap());
    }
    (ws, added)
}

fn with_point_style(catalog: &Catalog) -> StyleInfo {
    let point = CatalogFactory.create_style("point");
    catalog.add(point.clone()).unwrap();
    point
}

// =============================================================================
// Workspace cascade
// =============================================================================

#[test]
fn workspace_cascade_removes_everything_it_owns() {
    let catalog = Catalog::new();
    with_point_style(&catalog);
    let (ws1, layers) = populated_workspace(&catalog, "ws1", &["r1"]);
    let l1 = &layers[0];
    let mut g1 = CatalogFactory.create_layer_group("g1");
    g1.push(l1.id.clone(), None);
    catalog.add(g1.clone()).unwrap();

    populated_workspace(&catalog, "ws2", &["other"]);
    let untouched: Vec<CatalogInfo> = snapshot(&catalog)
        .into_iter()
        .filter(|i| i.name() != "ws1" && i.name() != "ws1-store" && i.name() != "r1" && i.name() != "g1")
        .collect();

    let report = catalog.cascade_remove(ws1.clone()).unwrap();

    assert!(catalog.workspace(&ws1.id).is_none());
    assert!(catalog.namespace_by_prefix("ws1").is_none());
    assert!(catalog.store_by_name(&ws1.id, "ws1-store").is_none());
    assert!(catalog.layer(&l1.id).is_none());
    assert!(catalog.layer_group(&g1.id).is_none());
    assert!(catalog.resources().iter().all(|r| r.name != "r1"));

    // namespace, workspace, store, resource, layer, group
    assert_eq!(report.removed.len(), 6);
    assert!(report.modified.is_empty());
    assert_eq!(snapshot(&catalog), untouched);
}

#[test]
fn second_cascade_is_a_noop() {
    let catalog = Catalog::new();
    with_point_style(&catalog);
    let (ws, _) = populated_workspace(&catalog, "ws", &["a", "b"]);
    populated_workspace(&catalog, "keep", &["c"]);

    catalog.cascade_remove(ws.clone()).unwrap();
    let after_first = catalog.fingerprint().unwrap();

    let report = catalog.cascade_remove(ws).unwrap();
    assert!(report.removed.is_empty());
    assert_eq!(catalog.fingerprint().unwrap(), after_first);
}

#[test]
fn defaults_move_to_remaining_workspace() {
    let catalog = Catalog::new();
    let (first, _) = populated_workspace(&catalog, "first", &[]);
    let (second, _) = populated_workspace(&catalog, "second", &[]);
    assert_eq!(catalog.default_workspace().map(|w| w.id), Some(first.id.clone()));

    catalog.cascade_remove(first).unwrap();

    assert_eq!(catalog.default_workspace().map(|w| w.id), Some(second.id));
    assert_eq!(
        catalog.default_namespace().map(|n| n.prefix),
        Some("second".to_string())
    );
}

// =============================================================================
// Style cascade
// =============================================================================

#[test]
fn style_cascade_restyles_layers_and_groups() {
    let catalog = Catalog::new();
    let point = with_point_style(&catalog);
    let point_style = CatalogFactory.create_style("pointStyle");
    catalog.add(point_style.clone()).unwrap();

    let (_, layers) = populated_workspace(&catalog, "ws", &["l1", "l2", "l3"]);
    let mut l1 = layers[0].clone();
    let mut l2 = layers[1].clone();
    let mut l3 = layers[2].clone();
    l1.default_style = Some(point_style.id.clone());
    l2.default_style = Some(point_style.id.clone());
    l3.styles.insert(point_style.id.clone());
    for layer in [&l1, &l2, &l3] {
        catalog.save(layer.clone()).unwrap();
    }

    let mut g1 = CatalogFactory.create_layer_group("g1");
    g1.push(l1.id.clone(), Some(point_style.id.clone()));
    g1.push(l3.id.clone(), None);
    catalog.add(g1.clone()).unwrap();

    let mut collector = CascadeCollector::new(&catalog);
    point_style
        .accept(&mut collector)
        .unwrap_or_else(|never| match never {});
    let preview = collector.preview();

    let report = catalog.cascade_remove(point_style.clone()).unwrap();

    let l1 = catalog.layer(&l1.id).unwrap();
    let l2 = catalog.layer(&l2.id).unwrap();
    let l3 = catalog.layer(&l3.id).unwrap();
    assert_eq!(l1.default_style, Some(point.id.clone()));
    assert_eq!(l2.default_style, Some(point.id.clone()));
    assert!(!l3.styles.contains(&point_style.id));

    let g1 = catalog.layer_group(&g1.id).unwrap();
    assert_eq!(g1.styles[0], l1.default_style);
    assert_eq!(g1.styles[1], None);
    assert!(catalog.style(&point_style.id).is_none());

    assert_eq!(ids(&preview.removed), ids(&report.removed));
    assert_eq!(ids(&preview.modified), ids(&report.modified));
}

#[test]
fn style_cascade_without_canonical_styles_falls_back_to_any_global() {
    let catalog = Catalog::new();
    let spare = CatalogFactory.create_style("spare");
    let doomed = CatalogFactory.create_style("doomed");
    catalog.add(spare.clone()).unwrap();
    catalog.add(doomed.clone()).unwrap();

    let (_, layers) = populated_workspace(&catalog, "ws", &["l"]);
    let mut layer = layers[0].clone();
    layer.default_style = Some(doomed.id.clone());
    catalog.save(layer.clone()).unwrap();

    catalog.cascade_remove(doomed).unwrap();
    assert_eq!(catalog.layer(&layer.id).unwrap().default_style, Some(spare.id));
}

// =============================================================================
// Partial failure
// =============================================================================

#[test]
fn failed_cascade_keeps_what_was_removed() {
    let facade = Arc::new(MemoryCatalogFacade::new());
    let catalog = Catalog::builder().facade(Box::new(facade.clone())).build();
    with_point_style(&catalog);
    let (ws, layers) = populated_workspace(&catalog, "ws", &["a"]);

    facade.fail_on(FailOn::Remove(InfoKind::Store));
    let mut visitor = CascadeDeleteVisitor::new(&catalog);
    let result = ws.accept(&mut visitor);

    assert!(matches!(result, Err(CatalogError::Facade(_))));
    let report = visitor.report();
    assert!(report.was_removed(&layers[0].id));
    assert!(catalog.layer(&layers[0].id).is_none());
    assert!(catalog.workspace(&ws.id).is_some());
    assert_eq!(catalog.stores_by_workspace(&ws.id).len(), 1);

    // resuming after the failure finishes the job
    facade.clear_failure();
    catalog.cascade_remove(ws.clone()).unwrap();
    assert!(catalog.workspace(&ws.id).is_none());
}
