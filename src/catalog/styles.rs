//! catalog::styles
//!
//! Default style selection by resource type.

use tracing::debug;

use crate::core::config::StyleNames;
use crate::core::model::{GeometryKind, ResourceKind, StyleInfo};

use super::Catalog;

/// Picks the canonical global style for a resource.
///
/// Coverages and cascaded WMS/WMTS layers get the raster style. Feature types
/// get the style matching their geometry; a geometryless feature type has no
/// default style.
#[derive(Debug, Clone, Default)]
pub struct DefaultStyleResolver {
    names: StyleNames,
}

impl DefaultStyleResolver {
    pub fn new(names: StyleNames) -> Self {
        Self { names }
    }

    pub fn names(&self) -> &StyleNames {
        &self.names
    }

    /// Name of the canonical style for `kind`.
    pub fn style_name_for(&self, kind: &ResourceKind) -> Option<&str> {
        let name = match kind {
            ResourceKind::Coverage | ResourceKind::WmsLayer | ResourceKind::WmtsLayer => {
                &self.names.raster
            }
            ResourceKind::FeatureType { geometry } => match geometry {
                None => return None,
                Some(GeometryKind::Point | GeometryKind::MultiPoint) => &self.names.point,
                Some(GeometryKind::LineString | GeometryKind::MultiLineString) => {
                    &self.names.line
                }
                Some(GeometryKind::Polygon | GeometryKind::MultiPolygon) => &self.names.polygon,
                Some(GeometryKind::Geometry) => &self.names.generic,
            },
        };
        Some(name.as_str())
    }

    /// Look up the canonical style for `kind` in `catalog`.
    pub fn resolve(&self, catalog: &Catalog, kind: &ResourceKind) -> Option<StyleInfo> {
        let name = self.style_name_for(kind)?;
        let style = catalog.style_by_name(None, name);
        if style.is_none() {
            debug!(style = name, "canonical style is not in the catalog");
        }
        style
    }

    /// Whether `style` is one of the canonical global styles.
    pub fn is_default_style(&self, style: &StyleInfo) -> bool {
        style.workspace.is_none() && self.names.contains(&style.name)
    }
}
