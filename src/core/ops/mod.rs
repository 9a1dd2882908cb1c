//! core::ops
//!
//! Operational concerns shared by catalog mutations.
//!
//! # Modules
//!
//! - [`lock`] - Reentrant configuration lock with read-to-write upgrade

pub mod lock;

pub use lock::{ConfigurationLock, LockError, LockManager, LockScope, LockState, LockType};
