//! Lock helpers for state that is only ever replaced wholesale
//!
//! A value that is written with a single assignment cannot be left half
//! updated by a panicking writer, so a poisoned lock still guards a valid
//! value. These helpers log the poisoning once per acquisition and hand out
//! the guard instead of propagating an error.

use std::sync::{LockResult, PoisonError, RwLockReadGuard, RwLockWriteGuard};

/// Take a read guard, recovering from poisoning
pub fn read_recovering<'a, T>(
    result: LockResult<RwLockReadGuard<'a, T>>,
    what: &str,
) -> RwLockReadGuard<'a, T> {
    result.unwrap_or_else(|poison_err: PoisonError<_>| {
        log::warn!(
            "Recovering poisoned read lock on {} (a writer panicked while holding it)",
            what
        );
        poison_err.into_inner()
    })
}

/// Take a write guard, recovering from poisoning
pub fn write_recovering<'a, T>(
    result: LockResult<RwLockWriteGuard<'a, T>>,
    what: &str,
) -> RwLockWriteGuard<'a, T> {
    result.unwrap_or_else(|poison_err: PoisonError<_>| {
        log::warn!(
            "Recovering poisoned write lock on {} (a writer panicked while holding it)",
            what
        );
        poison_err.into_inner()
    })
}
