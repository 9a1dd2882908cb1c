//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`CatalogId`] - Opaque, immutable identifier of a catalog entity
//! - [`Fingerprint`] - Catalog content hash for change detection
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs.
//!
//! # Examples
//!
//! ```
//! use geocatalog::core::types::CatalogId;
//!
//! // Valid constructions
//! let id = CatalogId::new("WorkspaceInfo-1").unwrap();
//! assert_eq!(id.as_str(), "WorkspaceInfo-1");
//!
//! // Invalid constructions fail at creation time
//! assert!(CatalogId::new("").is_err());
//! assert!(CatalogId::new("has space").is_err());
//! ```

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid catalog id: {0}")]
    InvalidId(String),
}

/// An opaque catalog entity identifier.
///
/// Identifiers are assigned once by the factory and never change, even when
/// the entity is renamed. Lookups by name go through the catalog; lookups by
/// id are stable across renames.
///
/// # Example
///
/// ```
/// use geocatalog::core::types::CatalogId;
///
/// let id = CatalogId::generate("StyleInfo");
/// assert!(id.as_str().starts_with("StyleInfo-"));
///
/// let other = CatalogId::generate("StyleInfo");
/// assert_ne!(id, other);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CatalogId(String);

impl CatalogId {
    /// Create a validated identifier from an existing string.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidId` if the id is empty or contains
    /// whitespace or control characters.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        if id.is_empty() {
            return Err(TypeError::InvalidId("id cannot be empty".into()));
        }
        if id.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(TypeError::InvalidId(format!(
                "id '{}' cannot contain whitespace or control characters",
                id.escape_debug()
            )));
        }
        Ok(Self(id))
    }

    /// Generate a fresh identifier of the form `<prefix>-<uuid v4>`.
    pub fn generate(prefix: &str) -> Self {
        Self(format!("{}-{}", prefix, Uuid::new_v4()))
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CatalogId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<CatalogId> for String {
    fn from(id: CatalogId) -> Self {
        id.0
    }
}

impl AsRef<str> for CatalogId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CatalogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fingerprint of catalog contents.
///
/// Computed as SHA-256 over `(id, serialized entity)` pairs, sorted by id.
/// Two catalogs holding the same entities in the same state produce the same
/// fingerprint regardless of insertion order. Used to detect whether an
/// operation changed anything at all.
///
/// # Example
///
/// ```
/// use geocatalog::core::types::{CatalogId, Fingerprint};
///
/// let a = CatalogId::new("a").unwrap();
/// let b = CatalogId::new("b").unwrap();
///
/// let fp1 = Fingerprint::compute(&[(a.clone(), "x".to_string()), (b.clone(), "y".to_string())]);
/// let fp2 = Fingerprint::compute(&[(b, "y".to_string()), (a, "x".to_string())]);
/// assert_eq!(fp1, fp2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute a fingerprint from `(id, canonical form)` pairs.
    pub fn compute(entries: &[(CatalogId, String)]) -> Self {
        let mut sorted: Vec<_> = entries.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));

        let mut hasher = Sha256::new();
        for (id, body) in sorted {
            hasher.update(id.as_str().as_bytes());
            hasher.update(b"\0");
            hasher.update(body.as_bytes());
            hasher.update(b"\n");
        }

        Self(hex::encode(hasher.finalize()))
    }

    /// Get the fingerprint as a hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod catalog_id {
        use super::*;

        #[test]
        fn valid_ids() {
            assert!(CatalogId::new("WorkspaceInfo-123").is_ok());
            assert!(CatalogId::new("a:b/c").is_ok());
        }

        #[test]
        fn rejects_empty() {
            assert!(matches!(
                CatalogId::new(""),
                Err(TypeError::InvalidId(_))
            ));
        }

        #[test]
        fn rejects_whitespace() {
            assert!(CatalogId::new("a b").is_err());
            assert!(CatalogId::new("a\tb").is_err());
            assert!(CatalogId::new("a\nb").is_err());
        }

        #[test]
        fn generated_ids_are_unique() {
            let a = CatalogId::generate("LayerInfo");
            let b = CatalogId::generate("LayerInfo");
            assert_ne!(a, b);
            assert!(a.as_str().starts_with("LayerInfo-"));
        }

        #[test]
        fn serde_rejects_invalid() {
            let parsed: Result<CatalogId, _> = serde_json::from_str("\"\"");
            assert!(parsed.is_err());
        }
    }

    mod fingerprint {
        use super::*;

        #[test]
        fn order_independent() {
            let a = CatalogId::new("a").unwrap();
            let b = CatalogId::new("b").unwrap();
            let fp1 = Fingerprint::compute(&[(a.clone(), "1".into()), (b.clone(), "2".into())]);
            let fp2 = Fingerprint::compute(&[(b, "2".into()), (a, "1".into())]);
            assert_eq!(fp1, fp2);
        }

        #[test]
        fn content_sensitive() {
            let a = CatalogId::new("a").unwrap();
            let fp1 = Fingerprint::compute(&[(a.clone(), "1".into())]);
            let fp2 = Fingerprint::compute(&[(a, "2".into())]);
            assert_ne!(fp1, fp2);
        }

        #[test]
        fn empty_is_stable() {
            assert_eq!(Fingerprint::compute(&[]), Fingerprint::compute(&[]));
            assert_eq!(Fingerprint::compute(&[]).as_str().len(), 64);
        }
    }
}
