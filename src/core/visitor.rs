//! core::visitor
//!
//! Double dispatch over the closed set of catalog entity variants.
//!
//! # Architecture
//!
//! Algorithms over the catalog (cascade deletion, validation dispatch,
//! dependency collection) are written as [`CatalogVisitor`] implementations
//! instead of methods on the entities. The variant set is closed: stores and
//! resources dispatch on their `kind` to a dedicated method, so a visitor
//! never inspects types itself.
//!
//! Every method has a no-op default, which makes every visitor its own
//! adapter: implement only the variants of interest.
//!
//! # Example
//!
//! ```
//! use geocatalog::core::factory::CatalogFactory;
//! use geocatalog::core::model::{StoreInfo, StoreKind};
//! use geocatalog::core::visitor::{CatalogVisitor, Visitable};
//!
//! #[derive(Default)]
//! struct CountCoverageStores(usize);
//!
//! impl CatalogVisitor for CountCoverageStores {
//!     type Error = std::convert::Infallible;
//!
//!     fn visit_coverage_store(&mut self, _store: &StoreInfo) -> Result<(), Self::Error> {
//!         self.0 += 1;
//!         Ok(())
//!     }
//! }
//!
//! let f = CatalogFactory;
//! let ws = f.create_workspace("ws");
//! let mut counter = CountCoverageStores::default();
//! f.create_store(StoreKind::Coverage, &ws, "a").accept(&mut counter).unwrap();
//! f.create_store(StoreKind::Data, &ws, "b").accept(&mut counter).unwrap();
//! ws.accept(&mut counter).unwrap();
//! assert_eq!(counter.0, 1);
//! ```

use super::model::{
    CatalogInfo, LayerGroupInfo, LayerInfo, NamespaceInfo, ResourceInfo, ResourceKind, StoreInfo,
    StoreKind, StyleInfo, WorkspaceInfo,
};

/// One operation per entity variant. Defaults do nothing.
pub trait CatalogVisitor {
    /// Error type produced by the visitor's operations.
    type Error;

    fn visit_workspace(&mut self, _workspace: &WorkspaceInfo) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_namespace(&mut self, _namespace: &NamespaceInfo) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_data_store(&mut self, _store: &StoreInfo) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_coverage_store(&mut self, _store: &StoreInfo) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_wms_store(&mut self, _store: &StoreInfo) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_wmts_store(&mut self, _store: &StoreInfo) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_feature_type(&mut self, _resource: &ResourceInfo) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_coverage(&mut self, _resource: &ResourceInfo) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_wms_layer(&mut self, _resource: &ResourceInfo) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_wmts_layer(&mut self, _resource: &ResourceInfo) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_layer(&mut self, _layer: &LayerInfo) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_style(&mut self, _style: &StyleInfo) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_layer_group(&mut self, _group: &LayerGroupInfo) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Entities that can dispatch to the matching visitor operation.
pub trait Visitable {
    fn accept<V: CatalogVisitor + ?Sized>(&self, visitor: &mut V) -> Result<(), V::Error>;
}

impl Visitable for WorkspaceInfo {
    fn accept<V: CatalogVisitor + ?Sized>(&self, visitor: &mut V) -> Result<(), V::Error> {
        visitor.visit_workspace(self)
    }
}

impl Visitable for NamespaceInfo {
    fn accept<V: CatalogVisitor + ?Sized>(&self, visitor: &mut V) -> Result<(), V::Error> {
        visitor.visit_namespace(self)
    }
}

impl Visitable for StoreInfo {
    fn accept<V: CatalogVisitor + ?Sized>(&self, visitor: &mut V) -> Result<(), V::Error> {
        match self.kind {
            StoreKind::Data => visitor.visit_data_store(self),
            StoreKind::Coverage => visitor.visit_coverage_store(self),
            StoreKind::Wms => visitor.visit_wms_store(self),
            StoreKind::Wmts => visitor.visit_wmts_store(self),
        }
    }
}

impl Visitable for ResourceInfo {
    fn accept<V: CatalogVisitor + ?Sized>(&self, visitor: &mut V) -> Result<(), V::Error> {
        match self.kind {
            ResourceKind::FeatureType { .. } => visitor.visit_feature_type(self),
            ResourceKind::Coverage => visitor.visit_coverage(self),
            ResourceKind::WmsLayer => visitor.visit_wms_layer(self),
            ResourceKind::WmtsLayer => visitor.visit_wmts_layer(self),
        }
    }
}

impl Visitable for LayerInfo {
    fn accept<V: CatalogVisitor + ?Sized>(&self, visitor: &mut V) -> Result<(), V::Error> {
        visitor.visit_layer(self)
    }
}

impl Visitable for StyleInfo {
    fn accept<V: CatalogVisitor + ?Sized>(&self, visitor: &mut V) -> Result<(), V::Error> {
        visitor.visit_style(self)
    }
}

impl Visitable for LayerGroupInfo {
    fn accept<V: CatalogVisitor + ?Sized>(&self, visitor: &mut V) -> Result<(), V::Error> {
        visitor.visit_layer_group(self)
    }
}

impl Visitable for CatalogInfo {
    fn accept<V: CatalogVisitor + ?Sized>(&self, visitor: &mut V) -> Result<(), V::Error> {
        match self {
            CatalogInfo::Workspace(i) => i.accept(visitor),
            CatalogInfo::Namespace(i) => i.accept(visitor),
            CatalogInfo::Store(i) => i.accept(visitor),
            CatalogInfo::Resource(i) => i.accept(visitor),
            CatalogInfo::Layer(i) => i.accept(visitor),
            CatalogInfo::LayerGroup(i) => i.accept(visitor),
            CatalogInfo::Style(i) => i.accept(visitor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::factory::CatalogFactory;
    use crate::core::model::GeometryKind;

    /// Records which operation each entity dispatched to.
    #[derive(Default)]
    struct Recorder(Vec<&'static str>);

    impl CatalogVisitor for Recorder {
        type Error = ();

        fn visit_workspace(&mut self, _: &WorkspaceInfo) -> Result<(), ()> {
            self.0.push("workspace");
            Ok(())
        }
        fn visit_namespace(&mut self, _: &NamespaceInfo) -> Result<(), ()> {
            self.0.push("namespace");
            Ok(())
        }
        fn visit_data_store(&mut self, _: &StoreInfo) -> Result<(), ()> {
            self.0.push("data_store");
            Ok(())
        }
        fn visit_coverage_store(&mut self, _: &StoreInfo) -> Result<(), ()> {
            self.0.push("coverage_store");
            Ok(())
        }
        fn visit_wms_store(&mut self, _: &StoreInfo) -> Result<(), ()> {
            self.0.push("wms_store");
            Ok(())
        }
        fn visit_wmts_store(&mut self, _: &StoreInfo) -> Result<(), ()> {
            self.0.push("wmts_store");
            Ok(())
        }
        fn visit_feature_type(&mut self, _: &ResourceInfo) -> Result<(), ()> {
            self.0.push("feature_type");
            Ok(())
        }
        fn visit_coverage(&mut self, _: &ResourceInfo) -> Result<(), ()> {
            self.0.push("coverage");
            Ok(())
        }
        fn visit_wms_layer(&mut self, _: &ResourceInfo) -> Result<(), ()> {
            self.0.push("wms_layer");
            Ok(())
        }
        fn visit_wmts_layer(&mut self, _: &ResourceInfo) -> Result<(), ()> {
            self.0.push("wmts_layer");
            Ok(())
        }
        fn visit_layer(&mut self, _: &LayerInfo) -> Result<(), ()> {
            self.0.push("layer");
            Ok(())
        }
        fn visit_style(&mut self, _: &StyleInfo) -> Result<(), ()> {
            self.0.push("style");
            Ok(())
        }
        fn visit_layer_group(&mut self, _: &LayerGroupInfo) -> Result<(), ()> {
            self.0.push("layer_group");
            Ok(())
        }
    }

    #[test]
    fn dispatch_covers_every_variant() {
        let f = CatalogFactory;
        let ws = f.create_workspace("ws");
        let ds = f.create_store(StoreKind::Data, &ws, "ds");
        let cs = f.create_store(StoreKind::Coverage, &ws, "cs");
        let wms = f.create_store(StoreKind::Wms, &ws, "wms");
        let wmts = f.create_store(StoreKind::Wmts, &ws, "wmts");
        let ft = f.create_resource(
            ResourceKind::FeatureType {
                geometry: Some(GeometryKind::Point),
            },
            &ds,
            "ft",
        );
        let cov = f.create_resource(ResourceKind::Coverage, &cs, "cov");
        let wl = f.create_resource(ResourceKind::WmsLayer, &wms, "wl");
        let wtl = f.create_resource(ResourceKind::WmtsLayer, &wmts, "wtl");

        let infos: Vec<CatalogInfo> = vec![
            ws.clone().into(),
            f.create_namespace("ws", "http://ws").into(),
            ds.into(),
            cs.into(),
            wms.into(),
            wmts.into(),
            f.create_layer(&ft).into(),
            ft.into(),
            cov.into(),
            wl.into(),
            wtl.into(),
            f.create_style("s").into(),
            f.create_layer_group("g").into(),
        ];

        let mut recorder = Recorder::default();
        for info in &infos {
            info.accept(&mut recorder).unwrap();
        }

        assert_eq!(
            recorder.0,
            vec![
                "workspace",
                "namespace",
                "data_store",
                "coverage_store",
                "wms_store",
                "wmts_store",
                "layer",
                "feature_type",
                "coverage",
                "wms_layer",
                "wmts_layer",
                "style",
                "layer_group",
            ]
        );
    }

    #[test]
    fn default_operations_are_noops() {
        struct Nothing;
        impl CatalogVisitor for Nothing {
            type Error = ();
        }

        let ws = CatalogFactory.create_workspace("ws");
        assert!(ws.accept(&mut Nothing).is_ok());
    }

    #[test]
    fn errors_propagate() {
        struct Fails;
        impl CatalogVisitor for Fails {
            type Error = String;
            fn visit_style(&mut self, style: &StyleInfo) -> Result<(), String> {
                Err(style.name.clone())
            }
        }

        let style = CatalogFactory.create_style("broken");
        assert_eq!(style.accept(&mut Fails), Err("broken".to_string()));
    }
}
