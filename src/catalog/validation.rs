//! catalog::validation
//!
//! Structural validation of entities before they are committed.
//!
//! # Architecture
//!
//! Validation never stops at the first problem: every check runs and every
//! [`Violation`] is collected into a [`ValidationResult`]. Callers decide
//! whether to fail ([`ValidationResult::throw_if_invalid`]) or inspect the
//! list. `Catalog::add` and `Catalog::save` always fail on an invalid result.
//!
//! Two visitors do the dispatch:
//!
//! - [`StructuralValidator`] runs the built-in checks (names, links,
//!   uniqueness in scope, layer group shape, default style protection)
//! - [`ExtensionDispatch`] hands the entity to each registered
//!   [`CatalogValidator`] when extended validation is enabled
//!
//! # Example
//!
//! ```
//! use geocatalog::catalog::Catalog;
//! use geocatalog::catalog::validation::Violation;
//! use geocatalog::core::factory::CatalogFactory;
//!
//! let catalog = Catalog::new();
//! let ws = CatalogFactory.create_workspace("default");
//!
//! let result = catalog.validate(&ws.into(), true);
//! assert!(!result.is_valid());
//! assert!(matches!(result.violations()[0], Violation::ReservedName { .. }));
//! ```

use std::convert::Infallible;

use thiserror::Error;

use crate::core::model::{
    CatalogInfo, InfoKind, LayerGroupInfo, LayerGroupMode, LayerInfo, NamespaceInfo,
    ResourceInfo, ResourceKind, StoreInfo, StyleInfo, WorkspaceInfo, DEFAULT,
};
use crate::core::types::CatalogId;
use crate::core::visitor::{CatalogVisitor, Visitable};

use super::{Catalog, CatalogError};

/// A single constraint violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("{kind} {field} must not be empty")]
    MissingField { kind: InfoKind, field: &'static str },

    #[error("{kind} '{name}' must be part of a {target}")]
    MissingLink {
        kind: InfoKind,
        name: String,
        target: InfoKind,
    },

    #[error("{kind} '{name}' references unknown {target} '{id}'")]
    UnknownReference {
        kind: InfoKind,
        name: String,
        target: InfoKind,
        id: CatalogId,
    },

    #[error("{kind} named '{name}' already exists{scope}")]
    Duplicate {
        kind: InfoKind,
        name: String,
        /// Human readable scope suffix, e.g. " in workspace 'topp'".
        scope: String,
    },

    #[error("'{name}' is a reserved keyword, can't be used as a {kind} name")]
    ReservedName { kind: InfoKind, name: String },

    #[error("invalid URI syntax for '{uri}' in namespace '{prefix}'")]
    InvalidUri { prefix: String, uri: String },

    #[error("namespace with URI '{0}' already exists")]
    DuplicateUri(String),

    #[error("{kind} '{name}' is isolated but isolated workspaces are not supported by this catalog")]
    IsolationUnsupported { kind: InfoKind, name: String },

    #[error("{store_kind:?} store '{store}' cannot hold resource '{name}'")]
    KindMismatch {
        name: String,
        store: String,
        store_kind: crate::core::model::StoreKind,
    },

    #[error("no reader source found for coverage '{0}'")]
    MissingReaderSource(String),

    #[error("layer group '{0}' must not be empty")]
    EmptyLayerGroup(String),

    #[error("layer group '{name}' has {styles} styles for {layers} layers")]
    StyleCountMismatch {
        name: String,
        layers: usize,
        styles: usize,
    },

    #[error("layer group '{name}' in mode {mode:?} must have a root layer")]
    MissingRootLayer { name: String, mode: LayerGroupMode },

    #[error("layer group '{name}' in mode {mode:?} must have a root layer style")]
    MissingRootStyle { name: String, mode: LayerGroupMode },

    #[error("layer group '{name}' in mode {mode:?} must not have a root layer")]
    UnexpectedRootLayer { name: String, mode: LayerGroupMode },

    #[error("layer group '{name}' in mode {mode:?} must not have a root layer style")]
    UnexpectedRootStyle { name: String, mode: LayerGroupMode },

    #[error("layer group within workspace '{workspace}' cannot contain {kind} '{member}' from another workspace")]
    ForeignMember {
        workspace: String,
        kind: InfoKind,
        member: String,
    },

    #[error("cannot rename default style '{0}'")]
    DefaultStyleRenamed(String),

    #[error("cannot change the workspace of default style '{0}'")]
    DefaultStyleMoved(String),

    /// Reported by a [`CatalogValidator`] extension.
    #[error("{0}")]
    Custom(String),
}

/// Every violation found for one entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    violations: Vec<Violation>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Fail with a one-line summary naming the first violation and the
    /// total count.
    pub fn throw_if_invalid(&self) -> Result<(), CatalogError> {
        match self.violations.first() {
            None => Ok(()),
            Some(first) => Err(CatalogError::Validation {
                summary: first.to_string(),
                count: self.violations.len(),
            }),
        }
    }
}

/// Pluggable validation, run after the built-in checks.
///
/// Each method defaults to accepting the entity.
pub trait CatalogValidator: Send + Sync {
    fn validate_workspace(&self, _ws: &WorkspaceInfo, _is_new: bool) -> Result<(), Violation> {
        Ok(())
    }

    fn validate_namespace(&self, _ns: &NamespaceInfo, _is_new: bool) -> Result<(), Violation> {
        Ok(())
    }

    fn validate_store(&self, _store: &StoreInfo, _is_new: bool) -> Result<(), Violation> {
        Ok(())
    }

    fn validate_resource(&self, _resource: &ResourceInfo, _is_new: bool) -> Result<(), Violation> {
        Ok(())
    }

    fn validate_layer(&self, _layer: &LayerInfo, _is_new: bool) -> Result<(), Violation> {
        Ok(())
    }

    fn validate_layer_group(
        &self,
        _group: &LayerGroupInfo,
        _is_new: bool,
    ) -> Result<(), Violation> {
        Ok(())
    }

    fn validate_style(&self, _style: &StyleInfo, _is_new: bool) -> Result<(), Violation> {
        Ok(())
    }
}

/// Run the built-in checks and, if enabled, the extensions for `info`.
pub(crate) fn validate(
    catalog: &Catalog,
    validators: &[std::sync::Arc<dyn CatalogValidator>],
    info: &CatalogInfo,
    is_new: bool,
) -> ValidationResult {
    let mut result = ValidationResult::new();

    let mut structural = StructuralValidator::new(catalog, is_new, &mut result);
    info.accept(&mut structural).unwrap_or_else(|never| match never {});

    if catalog.config().extended_validation() {
        for validator in validators {
            let mut dispatch = ExtensionDispatch {
                validator: validator.as_ref(),
                is_new,
                result: &mut result,
            };
            info.accept(&mut dispatch).unwrap_or_else(|never| match never {});
        }
    }
    result
}

/// Built-in structural checks.
pub struct StructuralValidator<'a> {
    catalog: &'a Catalog,
    is_new: bool,
    result: &'a mut ValidationResult,
}

impl<'a> StructuralValidator<'a> {
    pub fn new(catalog: &'a Catalog, is_new: bool, result: &'a mut ValidationResult) -> Self {
        Self {
            catalog,
            is_new,
            result,
        }
    }

    fn require_name(&mut self, kind: InfoKind, field: &'static str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.result.push(Violation::MissingField { kind, field });
            return false;
        }
        true
    }

    fn workspace_name(&self, id: &CatalogId) -> String {
        self.catalog
            .workspace(id)
            .map(|ws| ws.name)
            .unwrap_or_else(|| id.to_string())
    }

    fn check_isolation(&mut self, kind: InfoKind, name: &str, isolated: bool) {
        if isolated && !self.catalog.config().isolated_workspaces() {
            self.result.push(Violation::IsolationUnsupported {
                kind,
                name: name.to_string(),
            });
        }
    }

    fn check_store(&mut self, store: &StoreInfo) {
        self.require_name(InfoKind::Store, "name", &store.name);

        let Some(ws_id) = &store.workspace else {
            self.result.push(Violation::MissingLink {
                kind: InfoKind::Store,
                name: store.name.clone(),
                target: InfoKind::Workspace,
            });
            return;
        };
        let Some(ws) = self.catalog.workspace(ws_id) else {
            self.result.push(Violation::UnknownReference {
                kind: InfoKind::Store,
                name: store.name.clone(),
                target: InfoKind::Workspace,
                id: ws_id.clone(),
            });
            return;
        };

        if let Some(existing) = self.catalog.store_by_name(ws_id, &store.name) {
            if existing.id != store.id {
                self.result.push(Violation::Duplicate {
                    kind: InfoKind::Store,
                    name: store.name.clone(),
                    scope: format!(" in workspace '{}'", ws.name),
                });
            }
        }
    }

    fn check_resource(&mut self, resource: &ResourceInfo) {
        self.require_name(InfoKind::Resource, "name", &resource.name);
        match &resource.native_name {
            Some(native) => {
                self.require_name(InfoKind::Resource, "native name", native);
            }
            None => self.result.push(Violation::MissingField {
                kind: InfoKind::Resource,
                field: "native name",
            }),
        }

        let Some(store_id) = &resource.store else {
            self.result.push(Violation::MissingLink {
                kind: InfoKind::Resource,
                name: resource.name.clone(),
                target: InfoKind::Store,
            });
            return;
        };
        let Some(store) = self.catalog.store(store_id) else {
            self.result.push(Violation::UnknownReference {
                kind: InfoKind::Resource,
                name: resource.name.clone(),
                target: InfoKind::Store,
                id: store_id.clone(),
            });
            return;
        };

        if !store.kind.accepts(&resource.kind) {
            self.result.push(Violation::KindMismatch {
                name: resource.name.clone(),
                store: store.name.clone(),
                store_kind: store.kind,
            });
        }

        let in_store = self
            .catalog
            .resources_by_store(store_id)
            .into_iter()
            .any(|r| r.name == resource.name && r.id != resource.id);
        if in_store {
            self.result.push(Violation::Duplicate {
                kind: InfoKind::Resource,
                name: resource.name.clone(),
                scope: format!(" in store '{}'", store.name),
            });
        } else if let Some(ws_id) = &store.workspace {
            // resource names are unique per namespace, i.e. per workspace
            let in_workspace = self.catalog.stores_by_workspace(ws_id).iter().any(|s| {
                self.catalog
                    .resources_by_store(&s.id)
                    .into_iter()
                    .any(|r| r.name == resource.name && r.id != resource.id)
            });
            if in_workspace {
                let scope = format!(" in namespace '{}'", self.workspace_name(ws_id));
                self.result.push(Violation::Duplicate {
                    kind: InfoKind::Resource,
                    name: resource.name.clone(),
                    scope,
                });
            }
        }

        if resource.kind == ResourceKind::Coverage {
            if let Some(source) = self.catalog.reader_source() {
                let native = resource.native_name.as_deref().unwrap_or(&resource.name);
                if !source.has_reader_source(native) {
                    self.result
                        .push(Violation::MissingReaderSource(resource.name.clone()));
                }
            }
        }
    }

    fn check_style_ref(&mut self, kind: InfoKind, name: &str, style: &CatalogId) {
        if self.catalog.style(style).is_none() {
            self.result.push(Violation::UnknownReference {
                kind,
                name: name.to_string(),
                target: InfoKind::Style,
                id: style.clone(),
            });
        }
    }

    fn check_group_member_workspace(&mut self, group_ws: &CatalogId, layer: &LayerInfo) {
        let layer_ws = self.catalog.workspace_of_layer(layer);
        if layer_ws.as_ref() != Some(group_ws) {
            let workspace = self.workspace_name(group_ws);
            self.result.push(Violation::ForeignMember {
                workspace,
                kind: InfoKind::Layer,
                member: layer.name.clone(),
            });
        }
    }
}

impl CatalogVisitor for StructuralValidator<'_> {
    type Error = Infallible;

    fn visit_workspace(&mut self, ws: &WorkspaceInfo) -> Result<(), Infallible> {
        self.check_isolation(InfoKind::Workspace, &ws.name, ws.isolated);
        if !self.require_name(InfoKind::Workspace, "name", &ws.name) {
            return Ok(());
        }
        if ws.name == DEFAULT {
            self.result.push(Violation::ReservedName {
                kind: InfoKind::Workspace,
                name: ws.name.clone(),
            });
        }
        if let Some(existing) = self.catalog.workspace_by_name(&ws.name) {
            if existing.id != ws.id {
                self.result.push(Violation::Duplicate {
                    kind: InfoKind::Workspace,
                    name: ws.name.clone(),
                    scope: String::new(),
                });
            }
        }
        Ok(())
    }

    fn visit_namespace(&mut self, ns: &NamespaceInfo) -> Result<(), Infallible> {
        self.check_isolation(InfoKind::Namespace, &ns.prefix, ns.isolated);
        if self.require_name(InfoKind::Namespace, "prefix", &ns.prefix) {
            if ns.prefix == DEFAULT {
                self.result.push(Violation::ReservedName {
                    kind: InfoKind::Namespace,
                    name: ns.prefix.clone(),
                });
            }
            if let Some(existing) = self.catalog.namespace_by_prefix(&ns.prefix) {
                if existing.id != ns.id {
                    self.result.push(Violation::Duplicate {
                        kind: InfoKind::Namespace,
                        name: ns.prefix.clone(),
                        scope: String::new(),
                    });
                }
            }
        }

        if !self.require_name(InfoKind::Namespace, "uri", &ns.uri) {
            return Ok(());
        }
        if !ns.isolated {
            // isolated namespaces may share a URI
            let clash = self
                .catalog
                .namespaces()
                .into_iter()
                .any(|other| other.uri == ns.uri && other.id != ns.id && !other.isolated);
            if clash {
                self.result.push(Violation::DuplicateUri(ns.uri.clone()));
            }
        }
        if url::Url::parse(&ns.uri).is_err() {
            self.result.push(Violation::InvalidUri {
                prefix: ns.prefix.clone(),
                uri: ns.uri.clone(),
            });
        }
        Ok(())
    }

    fn visit_data_store(&mut self, store: &StoreInfo) -> Result<(), Infallible> {
        self.check_store(store);
        Ok(())
    }

    fn visit_coverage_store(&mut self, store: &StoreInfo) -> Result<(), Infallible> {
        self.check_store(store);
        Ok(())
    }

    fn visit_wms_store(&mut self, store: &StoreInfo) -> Result<(), Infallible> {
        self.check_store(store);
        Ok(())
    }

    fn visit_wmts_store(&mut self, store: &StoreInfo) -> Result<(), Infallible> {
        self.check_store(store);
        Ok(())
    }

    fn visit_feature_type(&mut self, resource: &ResourceInfo) -> Result<(), Infallible> {
        self.check_resource(resource);
        Ok(())
    }

    fn visit_coverage(&mut self, resource: &ResourceInfo) -> Result<(), Infallible> {
        self.check_resource(resource);
        Ok(())
    }

    fn visit_wms_layer(&mut self, resource: &ResourceInfo) -> Result<(), Infallible> {
        self.check_resource(resource);
        Ok(())
    }

    fn visit_wmts_layer(&mut self, resource: &ResourceInfo) -> Result<(), Infallible> {
        self.check_resource(resource);
        Ok(())
    }

    fn visit_layer(&mut self, layer: &LayerInfo) -> Result<(), Infallible> {
        self.require_name(InfoKind::Layer, "name", &layer.name);

        match &layer.resource {
            None => self.result.push(Violation::MissingLink {
                kind: InfoKind::Layer,
                name: layer.name.clone(),
                target: InfoKind::Resource,
            }),
            Some(id) if self.catalog.resource(id).is_none() => {
                self.result.push(Violation::UnknownReference {
                    kind: InfoKind::Layer,
                    name: layer.name.clone(),
                    target: InfoKind::Resource,
                    id: id.clone(),
                })
            }
            Some(_) => {
                let ws = self.catalog.workspace_of_layer(layer);
                let clash = self.catalog.layers().into_iter().any(|other| {
                    other.name == layer.name
                        && other.id != layer.id
                        && self.catalog.workspace_of_layer(&other) == ws
                });
                if clash {
                    let scope = ws
                        .map(|id| format!(" in workspace '{}'", self.workspace_name(&id)))
                        .unwrap_or_default();
                    self.result.push(Violation::Duplicate {
                        kind: InfoKind::Layer,
                        name: layer.name.clone(),
                        scope,
                    });
                }
            }
        }

        if let Some(style) = &layer.default_style {
            self.check_style_ref(InfoKind::Layer, &layer.name, style);
        }
        for style in &layer.styles {
            self.check_style_ref(InfoKind::Layer, &layer.name, style);
        }
        Ok(())
    }

    fn visit_style(&mut self, style: &StyleInfo) -> Result<(), Infallible> {
        let named = self.require_name(InfoKind::Style, "name", &style.name);
        self.require_name(InfoKind::Style, "filename", &style.filename);

        if let Some(ws) = &style.workspace {
            if self.catalog.workspace(ws).is_none() {
                self.result.push(Violation::UnknownReference {
                    kind: InfoKind::Style,
                    name: style.name.clone(),
                    target: InfoKind::Workspace,
                    id: ws.clone(),
                });
            }
        }

        if named {
            if let Some(existing) = self
                .catalog
                .style_by_name(style.workspace.as_ref(), &style.name)
            {
                if existing.id != style.id {
                    let scope = existing
                        .workspace
                        .as_ref()
                        .map(|ws| format!(" in workspace '{}'", self.workspace_name(ws)))
                        .unwrap_or_default();
                    self.result.push(Violation::Duplicate {
                        kind: InfoKind::Style,
                        name: style.name.clone(),
                        scope,
                    });
                }
            }
        }

        if !self.is_new {
            if let Some(current) = self.catalog.style(&style.id) {
                if self.catalog.is_default_style(&current) {
                    if current.name != style.name {
                        self.result
                            .push(Violation::DefaultStyleRenamed(current.name.clone()));
                    }
                    if style.workspace.is_some() {
                        self.result.push(Violation::DefaultStyleMoved(current.name));
                    }
                }
            }
        }
        Ok(())
    }

    fn visit_layer_group(&mut self, group: &LayerGroupInfo) -> Result<(), Infallible> {
        let named = self.require_name(InfoKind::LayerGroup, "name", &group.name);

        if let Some(ws) = &group.workspace {
            if self.catalog.workspace(ws).is_none() {
                self.result.push(Violation::UnknownReference {
                    kind: InfoKind::LayerGroup,
                    name: group.name.clone(),
                    target: InfoKind::Workspace,
                    id: ws.clone(),
                });
            }
        }

        if named {
            if let Some(existing) = self
                .catalog
                .layer_group_by_name(group.workspace.as_ref(), &group.name)
            {
                if existing.id != group.id {
                    let scope = group
                        .workspace
                        .as_ref()
                        .map(|ws| format!(" in workspace '{}'", self.workspace_name(ws)))
                        .unwrap_or_default();
                    self.result.push(Violation::Duplicate {
                        kind: InfoKind::LayerGroup,
                        name: group.name.clone(),
                        scope,
                    });
                }
            }
        }

        if group.layers.is_empty() {
            self.result
                .push(Violation::EmptyLayerGroup(group.name.clone()));
        }
        if !group.styles.is_empty() && group.styles.len() != group.layers.len() {
            self.result.push(Violation::StyleCountMismatch {
                name: group.name.clone(),
                layers: group.layers.len(),
                styles: group.styles.len(),
            });
        }

        for layer_id in &group.layers {
            match self.catalog.layer(layer_id) {
                None => self.result.push(Violation::UnknownReference {
                    kind: InfoKind::LayerGroup,
                    name: group.name.clone(),
                    target: InfoKind::Layer,
                    id: layer_id.clone(),
                }),
                Some(layer) => {
                    if let Some(ws) = &group.workspace {
                        self.check_group_member_workspace(ws, &layer);
                    }
                }
            }
        }
        for style in group.styles.iter().flatten() {
            self.check_style_ref(InfoKind::LayerGroup, &group.name, style);
        }

        if group.mode.requires_root() {
            if group.root_layer.is_none() {
                self.result.push(Violation::MissingRootLayer {
                    name: group.name.clone(),
                    mode: group.mode,
                });
            }
            if group.root_layer_style.is_none() {
                self.result.push(Violation::MissingRootStyle {
                    name: group.name.clone(),
                    mode: group.mode,
                });
            }
        } else {
            if group.root_layer.is_some() {
                self.result.push(Violation::UnexpectedRootLayer {
                    name: group.name.clone(),
                    mode: group.mode,
                });
            }
            if group.root_layer_style.is_some() {
                self.result.push(Violation::UnexpectedRootStyle {
                    name: group.name.clone(),
                    mode: group.mode,
                });
            }
        }

        if let Some(root) = &group.root_layer {
            match self.catalog.layer(root) {
                None => self.result.push(Violation::UnknownReference {
                    kind: InfoKind::LayerGroup,
                    name: group.name.clone(),
                    target: InfoKind::Layer,
                    id: root.clone(),
                }),
                Some(layer) => {
                    if let Some(ws) = &group.workspace {
                        self.check_group_member_workspace(ws, &layer);
                    }
                }
            }
        }
        if let Some(style_id) = &group.root_layer_style {
            match self.catalog.style(style_id) {
                None => self.check_style_ref(InfoKind::LayerGroup, &group.name, style_id),
                Some(style) => {
                    if let (Some(group_ws), Some(style_ws)) = (&group.workspace, &style.workspace)
                    {
                        if group_ws != style_ws {
                            let workspace = self.workspace_name(group_ws);
                            self.result.push(Violation::ForeignMember {
                                workspace,
                                kind: InfoKind::Style,
                                member: style.name,
                            });
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// Dispatches an entity to one [`CatalogValidator`].
pub struct ExtensionDispatch<'a> {
    validator: &'a dyn CatalogValidator,
    is_new: bool,
    result: &'a mut ValidationResult,
}

impl ExtensionDispatch<'_> {
    fn collect(&mut self, outcome: Result<(), Violation>) -> Result<(), Infallible> {
        if let Err(violation) = outcome {
            self.result.push(violation);
        }
        Ok(())
    }
}

impl CatalogVisitor for ExtensionDispatch<'_> {
    type Error = Infallible;

    fn visit_workspace(&mut self, ws: &WorkspaceInfo) -> Result<(), Infallible> {
        let outcome = self.validator.validate_workspace(ws, self.is_new);
        self.collect(outcome)
    }

    fn visit_namespace(&mut self, ns: &NamespaceInfo) -> Result<(), Infallible> {
        let outcome = self.validator.validate_namespace(ns, self.is_new);
        self.collect(outcome)
    }

    fn visit_data_store(&mut self, store: &StoreInfo) -> Result<(), Infallible> {
        let outcome = self.validator.validate_store(store, self.is_new);
        self.collect(outcome)
    }

    fn visit_coverage_store(&mut self, store: &StoreInfo) -> Result<(), Infallible> {
        let outcome = self.validator.validate_store(store, self.is_new);
        self.collect(outcome)
    }

    fn visit_wms_store(&mut self, store: &StoreInfo) -> Result<(), Infallible> {
        let outcome = self.validator.validate_store(store, self.is_new);
        self.collect(outcome)
    }

    fn visit_wmts_store(&mut self, store: &StoreInfo) -> Result<(), Infallible> {
        let outcome = self.validator.validate_store(store, self.is_new);
        self.collect(outcome)
    }

    fn visit_feature_type(&mut self, resource: &ResourceInfo) -> Result<(), Infallible> {
        let outcome = self.validator.validate_resource(resource, self.is_new);
        self.collect(outcome)
    }

    fn visit_coverage(&mut self, resource: &ResourceInfo) -> Result<(), Infallible> {
        let outcome = self.validator.validate_resource(resource, self.is_new);
        self.collect(outcome)
    }

    fn visit_wms_layer(&mut self, resource: &ResourceInfo) -> Result<(), Infallible> {
        let outcome = self.validator.validate_resource(resource, self.is_new);
        self.collect(outcome)
    }

    fn visit_wmts_layer(&mut self, resource: &ResourceInfo) -> Result<(), Infallible> {
        let outcome = self.validator.validate_resource(resource, self.is_new);
        self.collect(outcome)
    }

    fn visit_layer(&mut self, layer: &LayerInfo) -> Result<(), Infallible> {
        let outcome = self.validator.validate_layer(layer, self.is_new);
        self.collect(outcome)
    }

    fn visit_style(&mut self, style: &StyleInfo) -> Result<(), Infallible> {
        let outcome = self.validator.validate_style(style, self.is_new);
        self.collect(outcome)
    }

    fn visit_layer_group(&mut self, group: &LayerGroupInfo) -> Result<(), Infallible> {
        let outcome = self.validator.validate_layer_group(group, self.is_new);
        self.collect(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::external::ReaderSource;
    use crate::core::config::{CatalogConfig, CatalogConfigFile};
    use crate::core::factory::CatalogFactory;
    use crate::core::model::{GeometryKind, StoreKind};
    use std::sync::Arc;

    #[test]
    fn result_summary_names_first_and_count() {
        let mut result = ValidationResult::new();
        assert!(result.throw_if_invalid().is_ok());

        result.push(Violation::EmptyLayerGroup("g".into()));
        result.push(Violation::Custom("second".into()));

        match result.throw_if_invalid() {
            Err(CatalogError::Validation { summary, count }) => {
                assert_eq!(summary, "layer group 'g' must not be empty");
                assert_eq!(count, 2);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn workspace_violations_are_aggregated() {
        let catalog = Catalog::builder()
            .config(
                CatalogConfig::from_file(CatalogConfigFile {
                    isolated_workspaces: Some(false),
                    ..Default::default()
                })
                .unwrap(),
            )
            .build();
        let mut ws = CatalogFactory.create_workspace("default");
        ws.isolated = true;

        let result = catalog.validate(&ws.into(), true);
        assert_eq!(result.violations().len(), 2);
        assert!(matches!(
            result.violations()[0],
            Violation::IsolationUnsupported { .. }
        ));
        assert!(matches!(
            result.violations()[1],
            Violation::ReservedName { .. }
        ));
    }

    #[test]
    fn namespace_uri_rules() {
        let catalog = Catalog::new();
        let f = CatalogFactory;
        catalog
            .add(f.create_namespace("a", "http://example.org/a"))
            .unwrap();

        let dup = f.create_namespace("b", "http://example.org/a");
        assert!(catalog
            .validate(&dup.clone().into(), true)
            .violations()
            .contains(&Violation::DuplicateUri("http://example.org/a".into())));

        let mut isolated = dup;
        isolated.isolated = true;
        assert!(catalog.validate(&isolated.into(), true).is_valid());

        let bad = f.create_namespace("c", "not a uri");
        assert!(matches!(
            catalog.validate(&bad.into(), true).violations()[0],
            Violation::InvalidUri { .. }
        ));
    }

    #[test]
    fn layer_group_shape() {
        let catalog = Catalog::new();
        let f = CatalogFactory;
        let ws = f.create_workspace("ws");
        let ds = f.create_store(StoreKind::Data, &ws, "ds");
        let ft = f.create_resource(
            ResourceKind::FeatureType {
                geometry: Some(GeometryKind::Point),
            },
            &ds,
            "ft",
        );
        let layer = f.create_layer(&ft);
        catalog.add(ws).unwrap();
        catalog.add(ds).unwrap();
        catalog.add(ft).unwrap();
        catalog.add(layer.clone()).unwrap();

        let empty = f.create_layer_group("empty");
        assert_eq!(
            catalog.validate(&empty.into(), true).violations(),
            &[Violation::EmptyLayerGroup("empty".into())]
        );

        let mut mismatched = f.create_layer_group("g");
        mismatched.layers = vec![layer.id.clone(), layer.id.clone()];
        mismatched.styles = vec![None];
        mismatched.mode = LayerGroupMode::Eo;
        let violations = catalog.validate(&mismatched.into(), true);
        assert_eq!(violations.violations().len(), 3);
        assert!(violations
            .violations()
            .iter()
            .any(|v| matches!(v, Violation::StyleCountMismatch { .. })));
    }

    #[test]
    fn default_styles_cannot_be_renamed() {
        let catalog = Catalog::new();
        let point = CatalogFactory.create_style("point");
        catalog.add(point.clone()).unwrap();

        let mut renamed = point;
        renamed.name = "dot".into();
        assert_eq!(
            catalog.validate(&renamed.into(), false).violations(),
            &[Violation::DefaultStyleRenamed("point".into())]
        );
    }

    struct NoReaders;

    impl ReaderSource for NoReaders {
        fn has_reader_source(&self, _resource_name: &str) -> bool {
            false
        }
    }

    #[test]
    fn coverage_requires_reader_source() {
        let catalog = Catalog::builder().reader_source(Arc::new(NoReaders)).build();
        let f = CatalogFactory;
        let ws = f.create_workspace("ws");
        let cs = f.create_store(StoreKind::Coverage, &ws, "cs");
        catalog.add(ws).unwrap();
        catalog.add(cs.clone()).unwrap();

        let mut cov = f.create_resource(ResourceKind::Coverage, &cs, "dem");
        cov.native_name = Some("dem".into());
        assert_eq!(
            catalog.validate(&cov.into(), true).violations(),
            &[Violation::MissingReaderSource("dem".into())]
        );
    }

    struct NoUppercase;

    impl CatalogValidator for NoUppercase {
        fn validate_workspace(&self, ws: &WorkspaceInfo, _is_new: bool) -> Result<(), Violation> {
            if ws.name.chars().any(|c| c.is_uppercase()) {
                return Err(Violation::Custom(format!("'{}' has uppercase", ws.name)));
            }
            Ok(())
        }
    }

    #[test]
    fn extensions_run_when_enabled() {
        let catalog = Catalog::new();
        catalog.add_validator(Arc::new(NoUppercase));
        let ws = CatalogFactory.create_workspace("Topp");
        assert_eq!(
            catalog.validate(&ws.clone().into(), true).violations(),
            &[Violation::Custom("'Topp' has uppercase".into())]
        );

        let disabled = Catalog::builder()
            .config(
                CatalogConfig::from_file(CatalogConfigFile {
                    extended_validation: Some(false),
                    ..Default::default()
                })
                .unwrap(),
            )
            .build();
        disabled.add_validator(Arc::new(NoUppercase));
        assert!(disabled.validate(&ws.into(), true).is_valid());
    }
}
