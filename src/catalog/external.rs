//! catalog::external
//!
//! Contracts for collaborators outside the catalog core.
//!
//! - [`StyleStore`] reads and writes style documents as opaque bytes
//! - [`ReaderSource`] answers whether data can be read for a resource
//!
//! [`MemoryStyleStore`] is an in-memory style store for embedding and tests.

use std::collections::BTreeMap;

use parking_lot::Mutex;
use thiserror::Error;

use crate::core::model::StyleInfo;

/// Errors from style document I/O.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
    #[error("style document '{0}' not found")]
    NotFound(String),
}

/// Style document storage.
pub trait StyleStore: Send + Sync {
    fn read_style(&self, style: &StyleInfo) -> Result<Vec<u8>, StyleError>;

    fn write_style(&self, style: &StyleInfo, contents: &[u8]) -> Result<(), StyleError>;
}

/// Data access contract for resources.
pub trait ReaderSource: Send + Sync {
    /// Whether a reader source exists for the resource with this native name.
    fn has_reader_source(&self, resource_name: &str) -> bool;
}

/// Style documents kept in memory, keyed by workspace and filename.
#[derive(Debug, Default)]
pub struct MemoryStyleStore {
    documents: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStyleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage path of a style: `<workspace id>/<filename>` or `<filename>`.
    pub fn path_of(style: &StyleInfo) -> String {
        match &style.workspace {
            Some(ws) => format!("{}/{}", ws, style.filename),
            None => style.filename.clone(),
        }
    }

    pub fn contains(&self, style: &StyleInfo) -> bool {
        self.documents.lock().contains_key(&Self::path_of(style))
    }

    pub fn len(&self) -> usize {
        self.documents.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.lock().is_empty()
    }
}

impl StyleStore for MemoryStyleStore {
    fn read_style(&self, style: &StyleInfo) -> Result<Vec<u8>, StyleError> {
        let path = Self::path_of(style);
        self.documents
            .lock()
            .get(&path)
            .cloned()
            .ok_or(StyleError::NotFound(path))
    }

    fn write_style(&self, style: &StyleInfo, contents: &[u8]) -> Result<(), StyleError> {
        self.documents
            .lock()
            .insert(Self::path_of(style), contents.to_vec());
        Ok(())
    }
}
