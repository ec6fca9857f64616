//! # Settings Stores
//!
//! The persistence seam of the engine.
//!
//! The [`SettingsStore`] trait defines the five operations the traversal
//! engine needs: scalar get/set, existence checks, and hierarchical scope
//! management. Scopes form a stack of name segments joined into a
//! `/`-separated key prefix; every `begin_group` must pair with exactly one
//! `end_group`, which the engine enforces with [`ScopeGuard`].
//!
//! Two backends ship in-crate:
//! - [`MemoryStore`]: deterministic in-memory BTreeMap backend
//! - [`RedbStore`]: disk-backed, redb single-table backend

mod memory;
mod redb_store;

pub use memory::MemoryStore;
pub use redb_store::RedbStore;

use crate::primitives::SCOPE_SEPARATOR;
use crate::types::Value;

// =============================================================================
// SETTINGS STORE TRAIT
// =============================================================================

/// Scoped key-value persistence, as the traversal engine sees it.
///
/// `value` and `contains` are only well-defined relative to the currently
/// entered scope chain. The contract is infallible by design: backends
/// that can fail on I/O absorb writes and surface errors from an explicit
/// flush instead (see [`RedbStore::sync`]).
pub trait SettingsStore {
    /// Store `value` under `key` within the current scope.
    fn set_value(&mut self, key: &str, value: Value);

    /// Read the value under `key` within the current scope.
    fn value(&self, key: &str) -> Option<Value>;

    /// Whether `key` exists within the current scope.
    fn contains(&self, key: &str) -> bool;

    /// Push a scope segment. Must be balanced by [`SettingsStore::end_group`].
    fn begin_group(&mut self, name: &str);

    /// Pop the innermost scope segment.
    fn end_group(&mut self);
}

/// Join a scope chain and a key into an effective store key.
///
/// Empty segments are skipped, so an unnamed scope contributes nothing to
/// the path (while still occupying a stack slot for balance).
pub(crate) fn scoped_key(scope: &[String], key: &str) -> String {
    let mut path = String::new();
    for segment in scope.iter().filter(|s| !s.is_empty()) {
        path.push_str(segment);
        path.push(SCOPE_SEPARATOR);
    }
    path.push_str(key);
    path
}

// =============================================================================
// SCOPE GUARD
// =============================================================================

/// Stack-discipline guard over one store scope.
///
/// Entering pushes a scope segment; dropping pops it. The engine routes
/// every store access inside a scope through the guard, so a failure on
/// any inner path still closes the scope exactly once.
pub struct ScopeGuard<'a, S: SettingsStore + ?Sized> {
    store: &'a mut S,
}

impl<'a, S: SettingsStore + ?Sized> ScopeGuard<'a, S> {
    /// Push `name` and take custody of the store until drop.
    pub fn enter(store: &'a mut S, name: &str) -> Self {
        store.begin_group(name);
        Self { store }
    }

    /// The guarded store, scoped.
    pub fn store(&mut self) -> &mut S {
        self.store
    }
}

impl<S: SettingsStore + ?Sized> Drop for ScopeGuard<'_, S> {
    fn drop(&mut self) {
        self.store.end_group();
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_key_joins_segments() {
        let scope = vec!["mainWindow".to_string(), "tabs".to_string()];
        assert_eq!(scoped_key(&scope, "fontSize"), "mainWindow/tabs/fontSize");
        assert_eq!(scoped_key(&[], "fontSize"), "fontSize");
    }

    #[test]
    fn scoped_key_skips_empty_segments() {
        let scope = vec!["mainWindow".to_string(), String::new()];
        assert_eq!(scoped_key(&scope, "x"), "mainWindow/x");
    }

    #[test]
    fn guard_closes_scope_on_drop() {
        let mut store = MemoryStore::new();
        {
            let mut guard = ScopeGuard::enter(&mut store, "outer");
            guard.store().set_value("k", Value::Int(1));
        }
        assert_eq!(store.scope_depth(), 0);
        assert!(store.contains("outer/k"));
    }

    #[test]
    fn guard_closes_scope_on_early_return() {
        fn failing_path(store: &mut MemoryStore) -> bool {
            let mut guard = ScopeGuard::enter(store, "grp");
            if !guard.store().contains("missing") {
                return false;
            }
            true
        }

        let mut store = MemoryStore::new();
        assert!(!failing_path(&mut store));
        assert_eq!(store.scope_depth(), 0);
    }
}
