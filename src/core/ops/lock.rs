//! core::ops::lock
//!
//! Reentrant configuration lock with read-to-write upgrade.
//!
//! # Architecture
//!
//! A unit of work acquires the configuration lock in READ mode and holds it
//! for its whole duration. The first mutation inside the unit of work
//! upgrades to WRITE through [`LockManager::try_upgrade`]; the lock then
//! stays WRITE until the outermost [`LockScope`] is dropped.
//!
//! Lock state is tracked per thread and per lock instance, so nested scopes
//! on the same thread are reentrant and [`LockManager::current_state`]
//! answers for the calling thread only.
//!
//! # Invariants
//!
//! - The lock is released when the outermost scope drops (RAII pattern)
//! - An upgrade releases the read hold before waiting for exclusive access,
//!   so two readers upgrading at once cannot deadlock
//! - A failed upgrade restores the read hold and leaves the state READ
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use geocatalog::core::ops::lock::{ConfigurationLock, LockManager, LockState, LockType};
//!
//! let lock = ConfigurationLock::new(Duration::from_secs(1));
//! {
//!     let _scope = lock.lock(LockType::Read).unwrap();
//!     assert_eq!(lock.current_state(), LockState::Read);
//!
//!     lock.try_upgrade().unwrap();
//!     assert_eq!(lock.current_state(), LockState::Write);
//! }
//! assert_eq!(lock.current_state(), LockState::None);
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{ArcRwLockReadGuard, ArcRwLockWriteGuard, RawRwLock, RwLock};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::config::CatalogConfig;

/// Errors from locking operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LockError {
    /// Other holders did not leave within the upgrade timeout.
    #[error("timed out after {0:?} waiting to upgrade the configuration lock")]
    UpgradeTimeout(Duration),

    /// The calling thread holds no lock to upgrade.
    #[error("cannot upgrade: the configuration lock is not held by this thread")]
    NotHeld,
}

/// Lock state as seen by the calling thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockState {
    None,
    Read,
    Write,
}

/// Requested lock mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockType {
    Read,
    Write,
}

/// External lock manager contract used by the locking facade.
pub trait LockManager: Send + Sync {
    /// State of the lock for the calling thread.
    fn current_state(&self) -> LockState;

    /// Upgrade a held READ lock to WRITE.
    ///
    /// A no-op when the calling thread already holds WRITE.
    fn try_upgrade(&self) -> Result<(), LockError>;
}

static NEXT_LOCK_ID: AtomicU64 = AtomicU64::new(1);

enum HeldGuard {
    Read(ArcRwLockReadGuard<RawRwLock, ()>),
    Write(ArcRwLockWriteGuard<RawRwLock, ()>),
}

impl HeldGuard {
    fn state(&self) -> LockState {
        match self {
            HeldGuard::Read(_) => LockState::Read,
            HeldGuard::Write(_) => LockState::Write,
        }
    }
}

struct Held {
    guard: HeldGuard,
    depth: usize,
}

thread_local! {
    static HELD: RefCell<HashMap<u64, Held>> = RefCell::new(HashMap::new());
}

/// Process-wide configuration lock.
///
/// Share it behind an `Arc`; every clone of the `Arc` refers to the same
/// underlying read/write lock.
#[derive(Debug)]
pub struct ConfigurationLock {
    id: u64,
    lock: Arc<RwLock<()>>,
    upgrade_timeout: Duration,
}

impl ConfigurationLock {
    /// Create a lock whose upgrades wait at most `upgrade_timeout`.
    pub fn new(upgrade_timeout: Duration) -> Self {
        Self {
            id: NEXT_LOCK_ID.fetch_add(1, Ordering::Relaxed),
            lock: Arc::new(RwLock::new(())),
            upgrade_timeout,
        }
    }

    /// Create a lock using the configured upgrade timeout.
    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(config.upgrade_timeout())
    }

    /// Acquire the lock in `lock_type` mode for the calling thread.
    ///
    /// Reentrant: if the thread already holds the lock the depth is
    /// incremented, and a WRITE request on a READ hold upgrades it.
    ///
    /// # Errors
    ///
    /// - [`LockError::UpgradeTimeout`] if a nested WRITE request cannot
    ///   upgrade within the timeout
    pub fn lock(&self, lock_type: LockType) -> Result<LockScope<'_>, LockError> {
        match self.held_state() {
            Some(state) => {
                if lock_type == LockType::Write && state == LockState::Read {
                    self.try_upgrade()?;
                }
                HELD.with(|held| {
                    if let Some(entry) = held.borrow_mut().get_mut(&self.id) {
                        entry.depth += 1;
                    }
                });
            }
            None => {
                let guard = match lock_type {
                    LockType::Read => HeldGuard::Read(self.lock.read_arc()),
                    LockType::Write => HeldGuard::Write(self.lock.write_arc()),
                };
                HELD.with(|held| {
                    held.borrow_mut().insert(self.id, Held { guard, depth: 1 });
                });
                debug!(lock = self.id, mode = ?lock_type, "configuration lock acquired");
            }
        }

        Ok(LockScope {
            lock: self,
            _not_send: PhantomData,
        })
    }

    /// The configured upgrade timeout.
    pub fn upgrade_timeout(&self) -> Duration {
        self.upgrade_timeout
    }

    fn held_state(&self) -> Option<LockState> {
        HELD.with(|held| held.borrow().get(&self.id).map(|h| h.guard.state()))
    }

    fn release_one(&self) {
        // The thread-local may already be gone during thread teardown.
        let released = HELD
            .try_with(|held| {
                let mut held = held.borrow_mut();
                let done = match held.get_mut(&self.id) {
                    Some(entry) => {
                        entry.depth = entry.depth.saturating_sub(1);
                        entry.depth == 0
                    }
                    None => false,
                };
                if done {
                    held.remove(&self.id)
                } else {
                    None
                }
            })
            .ok()
            .flatten();

        if released.is_some() {
            debug!(lock = self.id, "configuration lock released");
        }
        drop(released);
    }
}

impl LockManager for ConfigurationLock {
    fn current_state(&self) -> LockState {
        self.held_state().unwrap_or(LockState::None)
    }

    fn try_upgrade(&self) -> Result<(), LockError> {
        let depth = match HELD.with(|held| {
            held.borrow()
                .get(&self.id)
                .map(|h| (h.guard.state(), h.depth))
        }) {
            None => return Err(LockError::NotHeld),
            Some((LockState::Write, _)) => return Ok(()),
            Some((_, depth)) => depth,
        };

        let read_hold = HELD.with(|held| held.borrow_mut().remove(&self.id));
        drop(read_hold);

        match self.lock.try_write_arc_for(self.upgrade_timeout) {
            Some(guard) => {
                HELD.with(|held| {
                    held.borrow_mut().insert(
                        self.id,
                        Held {
                            guard: HeldGuard::Write(guard),
                            depth,
                        },
                    );
                });
                debug!(lock = self.id, "configuration lock upgraded to write");
                Ok(())
            }
            None => {
                let guard = self.lock.read_arc();
                HELD.with(|held| {
                    held.borrow_mut().insert(
                        self.id,
                        Held {
                            guard: HeldGuard::Read(guard),
                            depth,
                        },
                    );
                });
                warn!(
                    lock = self.id,
                    timeout = ?self.upgrade_timeout,
                    "configuration lock upgrade timed out"
                );
                Err(LockError::UpgradeTimeout(self.upgrade_timeout))
            }
        }
    }
}

/// A held configuration lock.
///
/// Released when the outermost scope for the thread is dropped. Not `Send`:
/// the hold belongs to the thread that acquired it.
#[derive(Debug)]
#[must_use = "the lock is released as soon as the scope is dropped"]
pub struct LockScope<'a> {
    lock: &'a ConfigurationLock,
    _not_send: PhantomData<*const ()>,
}

impl LockScope<'_> {
    /// Current state of the underlying lock for this thread.
    pub fn state(&self) -> LockState {
        self.lock.current_state()
    }
}

impl Drop for LockScope<'_> {
    fn drop(&mut self) {
        self.lock.release_one();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::thread;

    fn lock() -> ConfigurationLock {
        ConfigurationLock::new(Duration::from_millis(50))
    }

    #[test]
    fn unlocked_thread_reports_none() {
        let lock = lock();
        assert_eq!(lock.current_state(), LockState::None);
        assert_eq!(lock.try_upgrade(), Err(LockError::NotHeld));
    }

    #[test]
    fn read_then_upgrade() {
        let lock = lock();
        let scope = lock.lock(LockType::Read).unwrap();
        assert_eq!(scope.state(), LockState::Read);

        lock.try_upgrade().unwrap();
        assert_eq!(scope.state(), LockState::Write);

        // second upgrade is a no-op
        lock.try_upgrade().unwrap();
        assert_eq!(lock.current_state(), LockState::Write);

        drop(scope);
        assert_eq!(lock.current_state(), LockState::None);
    }

    #[test]
    fn nested_scopes_are_reentrant() {
        let lock = lock();
        let outer = lock.lock(LockType::Read).unwrap();
        {
            let inner = lock.lock(LockType::Write).unwrap();
            assert_eq!(inner.state(), LockState::Write);
        }
        // the upgrade survives the inner scope
        assert_eq!(outer.state(), LockState::Write);
        drop(outer);
        assert_eq!(lock.current_state(), LockState::None);
    }

    #[test]
    fn state_is_per_thread() {
        let lock = lock();
        let _scope = lock.lock(LockType::Read).unwrap();

        thread::scope(|s| {
            s.spawn(|| {
                assert_eq!(lock.current_state(), LockState::None);
                // readers share the lock
                let other = lock.lock(LockType::Read).unwrap();
                assert_eq!(other.state(), LockState::Read);
            });
        });
    }

    #[test]
    fn upgrade_times_out_while_another_reader_holds() {
        let lock = &lock();
        let (held_tx, held_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();

        thread::scope(|s| {
            s.spawn(move || {
                let _scope = lock.lock(LockType::Read).unwrap();
                held_tx.send(()).unwrap();
                release_rx.recv().unwrap();
            });

            held_rx.recv().unwrap();
            let scope = lock.lock(LockType::Read).unwrap();
            assert_eq!(
                lock.try_upgrade(),
                Err(LockError::UpgradeTimeout(Duration::from_millis(50)))
            );
            assert_eq!(scope.state(), LockState::Read);

            release_tx.send(()).unwrap();
        });
    }

    #[test]
    fn upgrade_succeeds_after_reader_leaves() {
        let lock = &ConfigurationLock::new(Duration::from_secs(5));
        let (held_tx, held_rx) = mpsc::channel();

        thread::scope(|s| {
            s.spawn(move || {
                let _scope = lock.lock(LockType::Read).unwrap();
                held_tx.send(()).unwrap();
                thread::sleep(Duration::from_millis(20));
            });

            held_rx.recv().unwrap();
            let scope = lock.lock(LockType::Read).unwrap();
            lock.try_upgrade().unwrap();
            assert_eq!(scope.state(), LockState::Write);
        });
    }

    #[test]
    fn from_config_uses_timeout() {
        let lock = ConfigurationLock::from_config(&CatalogConfig::default());
        assert_eq!(lock.upgrade_timeout(), Duration::from_secs(10));
    }
}
