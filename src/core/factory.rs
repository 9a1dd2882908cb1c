//! core::factory
//!
//! Side-effect free construction of catalog entities.
//!
//! The factory only assigns identifiers and sensible defaults. Nothing it
//! returns is visible in a catalog until passed to `Catalog::add`.
//!
//! # Example
//!
//! ```
//! use geocatalog::core::factory::CatalogFactory;
//!
//! let factory = CatalogFactory;
//! let ws = factory.create_workspace("topp");
//! let ns = factory.create_namespace("topp", "http://www.openplans.org/topp");
//! assert_eq!(ws.name, ns.prefix);
//! assert_ne!(ws.id, ns.id);
//! ```

use std::collections::{BTreeMap, BTreeSet};

use super::model::{
    LayerGroupInfo, LayerGroupMode, LayerInfo, NamespaceInfo, PublishedType, ResourceInfo,
    ResourceKind, StoreInfo, StoreKind, StyleInfo, Timestamps, WorkspaceInfo,
};
use super::types::CatalogId;

/// Creates detached catalog entities with fresh identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogFactory;

impl CatalogFactory {
    pub fn create_workspace(&self, name: impl Into<String>) -> WorkspaceInfo {
        WorkspaceInfo {
            id: CatalogId::generate("WorkspaceInfo"),
            name: name.into(),
            isolated: false,
            timestamps: Timestamps::default(),
        }
    }

    pub fn create_namespace(&self, prefix: impl Into<String>, uri: impl Into<String>) -> NamespaceInfo {
        NamespaceInfo {
            id: CatalogId::generate("NamespaceInfo"),
            prefix: prefix.into(),
            uri: uri.into(),
            isolated: false,
            timestamps: Timestamps::default(),
        }
    }

    /// Create a store of `kind` in `workspace`. Stores start enabled.
    pub fn create_store(
        &self,
        kind: StoreKind,
        workspace: &WorkspaceInfo,
        name: impl Into<String>,
    ) -> StoreInfo {
        let prefix = match kind {
            StoreKind::Data => "DataStoreInfo",
            StoreKind::Coverage => "CoverageStoreInfo",
            StoreKind::Wms => "WMSStoreInfo",
            StoreKind::Wmts => "WMTSStoreInfo",
        };
        StoreInfo {
            id: CatalogId::generate(prefix),
            kind,
            name: name.into(),
            workspace: Some(workspace.id.clone()),
            enabled: true,
            description: None,
            url: None,
            connection_parameters: BTreeMap::new(),
            timestamps: Timestamps::default(),
        }
    }

    /// Create a resource of `kind` in `store`. `native_name` is left unset and
    /// defaults to `name` when added.
    pub fn create_resource(
        &self,
        kind: ResourceKind,
        store: &StoreInfo,
        name: impl Into<String>,
    ) -> ResourceInfo {
        let prefix = match kind {
            ResourceKind::FeatureType { .. } => "FeatureTypeInfo",
            ResourceKind::Coverage => "CoverageInfo",
            ResourceKind::WmsLayer => "WMSLayerInfo",
            ResourceKind::WmtsLayer => "WMTSLayerInfo",
        };
        ResourceInfo {
            id: CatalogId::generate(prefix),
            kind,
            name: name.into(),
            native_name: None,
            store: Some(store.id.clone()),
            enabled: true,
            title: None,
            timestamps: Timestamps::default(),
        }
    }

    /// Create a layer publishing `resource`, named after it.
    pub fn create_layer(&self, resource: &ResourceInfo) -> LayerInfo {
        LayerInfo {
            id: CatalogId::generate("LayerInfo"),
            name: resource.name.clone(),
            resource: Some(resource.id.clone()),
            kind: Some(PublishedType::from(&resource.kind)),
            default_style: None,
            styles: BTreeSet::new(),
            enabled: true,
            timestamps: Timestamps::default(),
        }
    }

    pub fn create_layer_group(&self, name: impl Into<String>) -> LayerGroupInfo {
        LayerGroupInfo {
            id: CatalogId::generate("LayerGroupInfo"),
            name: name.into(),
            workspace: None,
            mode: LayerGroupMode::Single,
            layers: Vec::new(),
            styles: Vec::new(),
            root_layer: None,
            root_layer_style: None,
            timestamps: Timestamps::default(),
        }
    }

    /// Create a global SLD style backed by `<name>.sld`.
    pub fn create_style(&self, name: impl Into<String>) -> StyleInfo {
        let name = name.into();
        StyleInfo {
            id: CatalogId::generate("StyleInfo"),
            filename: format!("{}.sld", name),
            name,
            workspace: None,
            format: "sld".to_string(),
            timestamps: Timestamps::default(),
        }
    }
}
