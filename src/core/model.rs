//! core::model
//!
//! Catalog entity records.
//!
//! # Entities
//!
//! - [`WorkspaceInfo`] - Top level container, owns stores
//! - [`NamespaceInfo`] - URI namespace paired 1:1 with a workspace by name
//! - [`StoreInfo`] - Data/coverage/WMS/WMTS connection owned by a workspace
//! - [`ResourceInfo`] - Feature type/coverage/cascaded layer owned by a store
//! - [`LayerInfo`] - Publishes one resource with a default and extra styles
//! - [`LayerGroupInfo`] - Ordered (layer, style) pairs
//! - [`StyleInfo`] - Named style backed by a style document
//!
//! # Invariants
//!
//! - Entities reference each other by [`CatalogId`], never by embedding.
//! - Entities are plain values. The catalog replaces them wholesale on save;
//!   callers edit a detached clone and submit it.
//! - `LayerGroupInfo::layers` and `LayerGroupInfo::styles` are parallel lists
//!   of equal length once validated.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::CatalogId;

/// Reserved name that cannot be used for workspaces or namespace prefixes.
pub const DEFAULT: &str = "default";

/// Connection parameter key that carries a data store's namespace URI.
pub const NAMESPACE_PARAM: &str = "namespace";

/// Creation and modification times, stamped by the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    /// Set when the entity is first added.
    pub created: Option<DateTime<Utc>>,
    /// Set on every save.
    pub modified: Option<DateTime<Utc>>,
}

/// Kind of catalog entity, used in errors and lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InfoKind {
    Workspace,
    Namespace,
    Store,
    Resource,
    Layer,
    LayerGroup,
    Style,
}

impl std::fmt::Display for InfoKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            InfoKind::Workspace => "workspace",
            InfoKind::Namespace => "namespace",
            InfoKind::Store => "store",
            InfoKind::Resource => "resource",
            InfoKind::Layer => "layer",
            InfoKind::LayerGroup => "layer group",
            InfoKind::Style => "style",
        };
        write!(f, "{}", s)
    }
}

/// A workspace. Owns stores and, optionally, styles and layer groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceInfo {
    pub id: CatalogId,
    pub name: String,
    pub isolated: bool,
    #[serde(default)]
    pub timestamps: Timestamps,
}

/// A namespace, paired with the workspace whose name equals `prefix`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamespaceInfo {
    pub id: CatalogId,
    pub prefix: String,
    pub uri: String,
    pub isolated: bool,
    #[serde(default)]
    pub timestamps: Timestamps,
}

/// Store variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoreKind {
    Data,
    Coverage,
    Wms,
    Wmts,
}

impl StoreKind {
    /// Whether a resource of `kind` may live in a store of this kind.
    pub fn accepts(&self, kind: &ResourceKind) -> bool {
        matches!(
            (self, kind),
            (StoreKind::Data, ResourceKind::FeatureType { .. })
                | (StoreKind::Coverage, ResourceKind::Coverage)
                | (StoreKind::Wms, ResourceKind::WmsLayer)
                | (StoreKind::Wmts, ResourceKind::WmtsLayer)
        )
    }
}

/// A store, owned by exactly one workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreInfo {
    pub id: CatalogId,
    pub kind: StoreKind,
    pub name: String,
    /// Owning workspace. `None` only on detached, not yet added stores.
    pub workspace: Option<CatalogId>,
    pub enabled: bool,
    pub description: Option<String>,
    /// Coverage file location or remote capabilities URL.
    pub url: Option<String>,
    pub connection_parameters: BTreeMap<String, String>,
    #[serde(default)]
    pub timestamps: Timestamps,
}

/// Geometry binding of a feature type, used to pick its default style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon,
    /// Mixed or generic geometry.
    Geometry,
}

/// Resource variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Vector data. `geometry` is `None` for geometryless feature types.
    FeatureType { geometry: Option<GeometryKind> },
    Coverage,
    WmsLayer,
    WmtsLayer,
}

/// A resource, owned by exactly one store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceInfo {
    pub id: CatalogId,
    pub kind: ResourceKind,
    pub name: String,
    /// Name in the underlying source. Defaults to `name` on add.
    pub native_name: Option<String>,
    /// Owning store. `None` only on detached, not yet added resources.
    pub store: Option<CatalogId>,
    pub enabled: bool,
    pub title: Option<String>,
    #[serde(default)]
    pub timestamps: Timestamps,
}

/// How a layer is published, derived from its resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PublishedType {
    Vector,
    Raster,
    Wms,
    Wmts,
}

impl From<&ResourceKind> for PublishedType {
    fn from(kind: &ResourceKind) -> Self {
        match kind {
            ResourceKind::FeatureType { .. } => PublishedType::Vector,
            ResourceKind::Coverage => PublishedType::Raster,
            ResourceKind::WmsLayer => PublishedType::Wms,
            ResourceKind::WmtsLayer => PublishedType::Wmts,
        }
    }
}

/// A layer publishing exactly one resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerInfo {
    pub id: CatalogId,
    pub name: String,
    /// Published resource. `None` only on detached, not yet added layers.
    pub resource: Option<CatalogId>,
    /// Derived from the resource on add when unset.
    pub kind: Option<PublishedType>,
    pub default_style: Option<CatalogId>,
    /// Extra styles. The default style is not required to be a member.
    pub styles: BTreeSet<CatalogId>,
    pub enabled: bool,
    #[serde(default)]
    pub timestamps: Timestamps,
}

/// Presentation mode of a layer group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerGroupMode {
    #[default]
    Single,
    OpaqueContainer,
    Named,
    Container,
    /// Earth observation. Requires a root layer and root layer style.
    Eo,
}

impl LayerGroupMode {
    /// Whether this mode requires a root layer and style.
    pub fn requires_root(&self) -> bool {
        matches!(self, LayerGroupMode::Eo)
    }
}

/// A layer group: parallel `layers`/`styles` lists.
///
/// `layers[i]` is rendered with `styles[i]`; a `None` style means "use the
/// layer's default style".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerGroupInfo {
    pub id: CatalogId,
    pub name: String,
    pub workspace: Option<CatalogId>,
    pub mode: LayerGroupMode,
    pub layers: Vec<CatalogId>,
    pub styles: Vec<Option<CatalogId>>,
    pub root_layer: Option<CatalogId>,
    pub root_layer_style: Option<CatalogId>,
    #[serde(default)]
    pub timestamps: Timestamps,
}

impl LayerGroupInfo {
    /// Append a (layer, style) pair, keeping both lists aligned.
    pub fn push(&mut self, layer: CatalogId, style: Option<CatalogId>) {
        self.layers.push(layer);
        self.styles.push(style);
    }

    /// Remove every pair whose layer is `layer`.
    ///
    /// Returns the original indices that were removed. Both lists shrink at
    /// the same positions.
    pub fn remove_layer(&mut self, layer: &CatalogId) -> Vec<usize> {
        let removed: Vec<usize> = self
            .layers
            .iter()
            .enumerate()
            .filter(|(_, l)| *l == layer)
            .map(|(i, _)| i)
            .collect();

        for &i in removed.iter().rev() {
            self.layers.remove(i);
            if i < self.styles.len() {
                self.styles.remove(i);
            }
        }
        removed
    }

    /// Whether the group references `layer` as a member or as its root.
    pub fn references_layer(&self, layer: &CatalogId) -> bool {
        self.layers.contains(layer) || self.root_layer.as_ref() == Some(layer)
    }

    /// Whether the group references `style` in a pair or as its root style.
    pub fn references_style(&self, style: &CatalogId) -> bool {
        self.styles.iter().any(|s| s.as_ref() == Some(style))
            || self.root_layer_style.as_ref() == Some(style)
    }
}

/// A style. Name is unique within its workspace, or globally when unscoped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleInfo {
    pub id: CatalogId,
    pub name: String,
    pub workspace: Option<CatalogId>,
    /// Backing style document reference.
    pub filename: String,
    pub format: String,
    #[serde(default)]
    pub timestamps: Timestamps,
}

/// The closed set of catalog entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CatalogInfo {
    Workspace(WorkspaceInfo),
    Namespace(NamespaceInfo),
    Store(StoreInfo),
    Resource(ResourceInfo),
    Layer(LayerInfo),
    LayerGroup(LayerGroupInfo),
    Style(StyleInfo),
}

impl CatalogInfo {
    /// The entity's identifier.
    pub fn id(&self) -> &CatalogId {
        match self {
            CatalogInfo::Workspace(i) => &i.id,
            CatalogInfo::Namespace(i) => &i.id,
            CatalogInfo::Store(i) => &i.id,
            CatalogInfo::Resource(i) => &i.id,
            CatalogInfo::Layer(i) => &i.id,
            CatalogInfo::LayerGroup(i) => &i.id,
            CatalogInfo::Style(i) => &i.id,
        }
    }

    /// The entity's kind.
    pub fn kind(&self) -> InfoKind {
        match self {
            CatalogInfo::Workspace(_) => InfoKind::Workspace,
            CatalogInfo::Namespace(_) => InfoKind::Namespace,
            CatalogInfo::Store(_) => InfoKind::Store,
            CatalogInfo::Resource(_) => InfoKind::Resource,
            CatalogInfo::Layer(_) => InfoKind::Layer,
            CatalogInfo::LayerGroup(_) => InfoKind::LayerGroup,
            CatalogInfo::Style(_) => InfoKind::Style,
        }
    }

    /// The entity's display name (namespace prefix for namespaces).
    pub fn name(&self) -> &str {
        match self {
            CatalogInfo::Workspace(i) => &i.name,
            CatalogInfo::Namespace(i) => &i.prefix,
            CatalogInfo::Store(i) => &i.name,
            CatalogInfo::Resource(i) => &i.name,
            CatalogInfo::Layer(i) => &i.name,
            CatalogInfo::LayerGroup(i) => &i.name,
            CatalogInfo::Style(i) => &i.name,
        }
    }

    pub fn timestamps(&self) -> &Timestamps {
        match self {
            CatalogInfo::Workspace(i) => &i.timestamps,
            CatalogInfo::Namespace(i) => &i.timestamps,
            CatalogInfo::Store(i) => &i.timestamps,
            CatalogInfo::Resource(i) => &i.timestamps,
            CatalogInfo::Layer(i) => &i.timestamps,
            CatalogInfo::LayerGroup(i) => &i.timestamps,
            CatalogInfo::Style(i) => &i.timestamps,
        }
    }

    pub fn timestamps_mut(&mut self) -> &mut Timestamps {
        match self {
            CatalogInfo::Workspace(i) => &mut i.timestamps,
            CatalogInfo::Namespace(i) => &mut i.timestamps,
            CatalogInfo::Store(i) => &mut i.timestamps,
            CatalogInfo::Resource(i) => &mut i.timestamps,
            CatalogInfo::Layer(i) => &mut i.timestamps,
            CatalogInfo::LayerGroup(i) => &mut i.timestamps,
            CatalogInfo::Style(i) => &mut i.timestamps,
        }
    }

    /// Names of the properties that differ between `old` and `new`.
    ///
    /// Timestamps are ignored. Entities of different kinds have no common
    /// properties and report `["kind"]`.
    pub fn changed_properties(old: &CatalogInfo, new: &CatalogInfo) -> Vec<&'static str> {
        let mut changed = Vec::new();
        macro_rules! diff {
            ($a:expr, $b:expr, $($field:ident),+) => {{
                $( if $a.$field != $b.$field { changed.push(stringify!($field)); } )+
            }};
        }
        match (old, new) {
            (CatalogInfo::Workspace(a), CatalogInfo::Workspace(b)) => {
                diff!(a, b, name, isolated)
            }
            (CatalogInfo::Namespace(a), CatalogInfo::Namespace(b)) => {
                diff!(a, b, prefix, uri, isolated)
            }
            (CatalogInfo::Store(a), CatalogInfo::Store(b)) => diff!(
                a,
                b,
                kind,
                name,
                workspace,
                enabled,
                description,
                url,
                connection_parameters
            ),
            (CatalogInfo::Resource(a), CatalogInfo::Resource(b)) => {
                diff!(a, b, kind, name, native_name, store, enabled, title)
            }
            (CatalogInfo::Layer(a), CatalogInfo::Layer(b)) => {
                diff!(a, b, name, resource, kind, default_style, styles, enabled)
            }
            (CatalogInfo::LayerGroup(a), CatalogInfo::LayerGroup(b)) => diff!(
                a,
                b,
                name,
                workspace,
                mode,
                layers,
                styles,
                root_layer,
                root_layer_style
            ),
            (CatalogInfo::Style(a), CatalogInfo::Style(b)) => {
                diff!(a, b, name, workspace, filename, format)
            }
            _ => changed.push("kind"),
        }
        changed
    }

    pub fn as_workspace(&self) -> Option<&WorkspaceInfo> {
        match self {
            CatalogInfo::Workspace(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_namespace(&self) -> Option<&NamespaceInfo> {
        match self {
            CatalogInfo::Namespace(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_store(&self) -> Option<&StoreInfo> {
        match self {
            CatalogInfo::Store(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_resource(&self) -> Option<&ResourceInfo> {
        match self {
            CatalogInfo::Resource(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_layer(&self) -> Option<&LayerInfo> {
        match self {
            CatalogInfo::Layer(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_layer_group(&self) -> Option<&LayerGroupInfo> {
        match self {
            CatalogInfo::LayerGroup(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_style(&self) -> Option<&StyleInfo> {
        match self {
            CatalogInfo::Style(i) => Some(i),
            _ => None,
        }
    }
}

macro_rules! impl_from_info {
    ($($ty:ident => $variant:ident, $into:ident),+ $(,)?) => {
        $(
            impl From<$ty> for CatalogInfo {
                fn from(info: $ty) -> Self {
                    CatalogInfo::$variant(info)
                }
            }
        )+

        impl CatalogInfo {
            $(
                pub fn $into(self) -> Option<$ty> {
                    match self {
                        CatalogInfo::$variant(i) => Some(i),
                        _ => None,
                    }
                }
            )+
        }
    };
}

impl_from_info!(
    WorkspaceInfo => Workspace, into_workspace,
    NamespaceInfo => Namespace, into_namespace,
    StoreInfo => Store, into_store,
    ResourceInfo => Resource, into_resource,
    LayerInfo => Layer, into_layer,
    LayerGroupInfo => LayerGroup, into_layer_group,
    StyleInfo => Style, into_style,
);
