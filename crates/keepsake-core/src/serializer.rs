//! # Traversal Engine
//!
//! The recursive cascade over a widget tree.
//!
//! A cascade entry point decides whether a store scope must be opened
//! (explicit group name, or the root is a window), runs window-state
//! handling inside that scope, dispatches the root to the leaf codec
//! table, and recurses into eligible children. Save and load share one
//! traversal parameterized by an internal direction flag; leaf failures
//! never abort the walk.
//!
//! Scope boundaries exist only at entry points: a window nested inside a
//! cascaded subtree does not open a scope of its own. Every opened scope
//! is closed by a [`ScopeGuard`] on every path, including failures deep in
//! the recursion.

use crate::codec::{self, LeafCtx, Outcome};
use crate::policy::Policies;
use crate::primitives::{INTERNAL_PREFIX, TAB_STACK_NAME};
use crate::store::{ScopeGuard, SettingsStore};
use crate::tree::{ControlKind, WidgetTree};
use crate::types::WidgetId;
use crate::window;

/// Traversal direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Save,
    Load,
}

// =============================================================================
// SERIALIZER
// =============================================================================

/// The widget serializer: a settings store plus traversal configuration.
///
/// Owns the store for the duration of its lifetime (retrieve it with
/// [`Serializer::into_store`]) together with the policy side-table and the
/// two serializer-global suppression flags.
///
/// The traversal is single-threaded, synchronous and non-reentrant; a
/// cascade assumes exclusive access to both the store and the tree until
/// it returns.
#[derive(Debug)]
pub struct Serializer<S: SettingsStore> {
    store: S,
    policies: Policies,
    omit_history: bool,
    omit_window: bool,
}

impl<S: SettingsStore> Serializer<S> {
    /// Create a serializer over `store` with default policies.
    pub fn new(store: S) -> Self {
        Self {
            store,
            policies: Policies::new(),
            omit_history: false,
            omit_window: false,
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the underlying store.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Consume the serializer, returning the store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// The policy side-table.
    pub fn policies(&self) -> &Policies {
        &self.policies
    }

    /// Mutable access to the policy side-table.
    pub fn policies_mut(&mut self) -> &mut Policies {
        &mut self.policies
    }

    /// Whether editable-choice history is suppressed for this serializer.
    #[must_use]
    pub fn omit_history(&self) -> bool {
        self.omit_history
    }

    /// Suppress or re-enable editable-choice history.
    pub fn set_omit_history(&mut self, omit_history: bool) {
        self.omit_history = omit_history;
    }

    /// Whether window-state handling is suppressed for this serializer.
    #[must_use]
    pub fn omit_window(&self) -> bool {
        self.omit_window
    }

    /// Suppress or re-enable window-state handling.
    pub fn set_omit_window(&mut self, omit_window: bool) {
        self.omit_window = omit_window;
    }

    // =========================================================================
    // SINGLE-WIDGET DISPATCH
    // =========================================================================

    /// Save one widget through the leaf codec table, without recursion.
    pub fn save_control(
        &mut self,
        tree: &WidgetTree,
        id: WidgetId,
        name: Option<&str>,
    ) -> Outcome {
        let ctx = LeafCtx {
            policies: &self.policies,
            omit_history: self.omit_history,
        };
        codec::save_leaf(&mut self.store, &ctx, tree, id, name)
    }

    /// Load one widget through the leaf codec table, without recursion.
    pub fn load_control(
        &mut self,
        tree: &mut WidgetTree,
        id: WidgetId,
        name: Option<&str>,
    ) -> Outcome {
        let ctx = LeafCtx {
            policies: &self.policies,
            omit_history: self.omit_history,
        };
        codec::load_leaf(&mut self.store, &ctx, tree, id, name)
    }

    // =========================================================================
    // WINDOW STATE
    // =========================================================================

    /// Persist a window's state into the current scope.
    pub fn save_window(&mut self, tree: &WidgetTree, id: WidgetId) -> bool {
        window::save_window(&mut self.store, tree, id)
    }

    /// Restore a window's state from the current scope.
    pub fn load_window(&mut self, tree: &mut WidgetTree, id: WidgetId) -> bool {
        window::load_window(&mut self.store, tree, id)
    }

    // =========================================================================
    // CASCADES
    // =========================================================================

    /// Recursively save `root` and its eligible descendants.
    ///
    /// `group` forces a scope of that name; otherwise a scope opens only
    /// when `root` is a window, named after the widget. Returns false only
    /// when `root` is not in the tree.
    ///
    /// The tree is borrowed mutably so save and load share one traversal;
    /// a save never modifies it.
    pub fn save_cascade(
        &mut self,
        tree: &mut WidgetTree,
        root: WidgetId,
        group: Option<&str>,
    ) -> bool {
        let env = CascadeEnv {
            policies: &self.policies,
            omit_history: self.omit_history,
            omit_window: self.omit_window,
        };
        cascade_entry(&mut self.store, &env, tree, root, group, Op::Save)
    }

    /// Recursively load `root` and its eligible descendants.
    pub fn load_cascade(
        &mut self,
        tree: &mut WidgetTree,
        root: WidgetId,
        group: Option<&str>,
    ) -> bool {
        let env = CascadeEnv {
            policies: &self.policies,
            omit_history: self.omit_history,
            omit_window: self.omit_window,
        };
        cascade_entry(&mut self.store, &env, tree, root, group, Op::Load)
    }

    /// Save only `root`'s children, seeding a scope without persisting the
    /// root's own value or window state.
    pub fn save_children(
        &mut self,
        tree: &mut WidgetTree,
        root: WidgetId,
        group: Option<&str>,
    ) -> bool {
        let env = CascadeEnv {
            policies: &self.policies,
            omit_history: self.omit_history,
            omit_window: self.omit_window,
        };
        children_entry(&mut self.store, &env, tree, root, group, Op::Save)
    }

    /// Load only `root`'s children; see [`Serializer::save_children`].
    pub fn load_children(
        &mut self,
        tree: &mut WidgetTree,
        root: WidgetId,
        group: Option<&str>,
    ) -> bool {
        let env = CascadeEnv {
            policies: &self.policies,
            omit_history: self.omit_history,
            omit_window: self.omit_window,
        };
        children_entry(&mut self.store, &env, tree, root, group, Op::Load)
    }
}

// =============================================================================
// TRAVERSAL INTERNALS
// =============================================================================

/// Shared read-only traversal configuration, split from the serializer so
/// the store can be borrowed mutably alongside it.
struct CascadeEnv<'a> {
    policies: &'a Policies,
    omit_history: bool,
    omit_window: bool,
}

fn cascade_entry<S: SettingsStore + ?Sized>(
    store: &mut S,
    env: &CascadeEnv<'_>,
    tree: &mut WidgetTree,
    id: WidgetId,
    group: Option<&str>,
    op: Op,
) -> bool {
    if !tree.contains(id) {
        return false;
    }
    let explicit = group.unwrap_or("");
    if !explicit.is_empty() || tree.is_window(id) {
        let scope_name = if explicit.is_empty() {
            tree.name(id).unwrap_or_default().to_string()
        } else {
            explicit.to_string()
        };
        let mut guard = ScopeGuard::enter(store, &scope_name);
        cascade_root(guard.store(), env, tree, id, op);
    } else {
        cascade_root(store, env, tree, id, op);
    }
    true
}

fn children_entry<S: SettingsStore + ?Sized>(
    store: &mut S,
    env: &CascadeEnv<'_>,
    tree: &mut WidgetTree,
    id: WidgetId,
    group: Option<&str>,
    op: Op,
) -> bool {
    if !tree.contains(id) {
        return false;
    }
    let explicit = group.unwrap_or("");
    if !explicit.is_empty() || tree.is_window(id) {
        let scope_name = if explicit.is_empty() {
            tree.name(id).unwrap_or_default().to_string()
        } else {
            explicit.to_string()
        };
        let mut guard = ScopeGuard::enter(store, &scope_name);
        cascade_children(guard.store(), env, tree, id, op);
    } else {
        cascade_children(store, env, tree, id, op);
    }
    true
}

/// Window-state handling plus the node cascade; runs once per entry point.
fn cascade_root<S: SettingsStore + ?Sized>(
    store: &mut S,
    env: &CascadeEnv<'_>,
    tree: &mut WidgetTree,
    id: WidgetId,
    op: Op,
) {
    if !env.omit_window {
        // Non-windows report false here; that is "nothing to do".
        match op {
            Op::Save => {
                let _ = window::save_window(store, tree, id);
            }
            Op::Load => {
                let _ = window::load_window(store, tree, id);
            }
        }
    }
    cascade_node(store, env, tree, id, op);
}

/// Leaf-dispatch one widget, then descend into its children unless the
/// widget is a menu or its cascadable policy is off.
fn cascade_node<S: SettingsStore + ?Sized>(
    store: &mut S,
    env: &CascadeEnv<'_>,
    tree: &mut WidgetTree,
    id: WidgetId,
    op: Op,
) {
    let ctx = LeafCtx {
        policies: env.policies,
        omit_history: env.omit_history,
    };
    // Leaf outcome is deliberately dropped: a broken control must not
    // abort its siblings.
    let _: Outcome = match op {
        Op::Save => codec::save_leaf(store, &ctx, tree, id, None),
        Op::Load => codec::load_leaf(store, &ctx, tree, id, None),
    };

    if tree.widget(id).map(|w| w.control.kind()) == Some(ControlKind::Menu) {
        return;
    }
    if !env.policies.cascadable(id) {
        return;
    }
    cascade_children(store, env, tree, id, op);
}

/// Enumerate and cascade a widget's children.
///
/// Tab views redirect to their internal content holder; everywhere else,
/// children carrying the reserved internal prefix or an explicit
/// serializable=false policy are skipped.
fn cascade_children<S: SettingsStore + ?Sized>(
    store: &mut S,
    env: &CascadeEnv<'_>,
    tree: &mut WidgetTree,
    id: WidgetId,
    op: Op,
) {
    let Some(kind) = tree.widget(id).map(|w| w.control.kind()) else {
        return;
    };
    if kind == ControlKind::TabView {
        if let Some(stack) = tree.find_child_named(id, TAB_STACK_NAME) {
            cascade_children(store, env, tree, stack, op);
        }
        return;
    }

    let child_ids: Vec<WidgetId> = tree.children(id).to_vec();
    for child in child_ids {
        let internal = match tree.name(child) {
            Some(name) => name.starts_with(INTERNAL_PREFIX),
            None => true,
        };
        if internal {
            continue;
        }
        if !env.policies.serializable(child) {
            continue;
        }
        cascade_node(store, env, tree, child, op);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::tree::Control;
    use crate::types::Value;

    #[test]
    fn accessors_expose_store_policies_and_flags() {
        let mut serializer = Serializer::new(MemoryStore::new());
        assert!(serializer.policies().is_empty());
        assert!(!serializer.omit_history());
        assert!(!serializer.omit_window());

        serializer.set_omit_history(true);
        assert!(serializer.omit_history());

        serializer.store_mut().set_value("seed", Value::Int(1));
        let store = serializer.into_store();
        assert!(store.contains("seed"));
    }

    #[test]
    fn cascade_of_missing_root_fails_without_scope_leak() {
        let mut serializer = Serializer::new(MemoryStore::new());
        let mut tree = WidgetTree::new();

        assert!(!serializer.save_cascade(&mut tree, WidgetId(404), Some("grp")));
        assert_eq!(serializer.store().scope_depth(), 0);
        assert!(serializer.store().is_empty());
    }

    #[test]
    fn explicit_group_prefixes_keys() {
        let mut serializer = Serializer::new(MemoryStore::new());
        let mut tree = WidgetTree::new();
        let root = tree.insert_root("form", Control::Container);
        tree.insert_child(root, "enableLogging", Control::Checkbox { checked: true })
            .expect("child");

        assert!(serializer.save_cascade(&mut tree, root, Some("settings")));
        assert_eq!(
            serializer.store().value("settings/enableLogging"),
            Some(Value::Bool(true))
        );
        assert_eq!(serializer.store().scope_depth(), 0);
    }

    #[test]
    fn non_window_root_without_group_writes_at_top_level() {
        let mut serializer = Serializer::new(MemoryStore::new());
        let mut tree = WidgetTree::new();
        let root = tree.insert_root("form", Control::Container);
        tree.insert_child(root, "fontSize", Control::SpinBox { value: 9 })
            .expect("child");

        assert!(serializer.save_cascade(&mut tree, root, None));
        assert!(serializer.store().contains("fontSize"));
    }

    #[test]
    fn save_children_skips_the_root_itself() {
        let mut serializer = Serializer::new(MemoryStore::new());
        let mut tree = WidgetTree::new();
        let root = tree.insert_root("rootBox", Control::Checkbox { checked: true });
        tree.insert_child(root, "inner", Control::Checkbox { checked: false })
            .expect("child");

        assert!(serializer.save_children(&mut tree, root, Some("grp")));
        assert!(!serializer.store().contains("grp/rootBox"));
        assert_eq!(
            serializer.store().value("grp/inner"),
            Some(Value::Bool(false))
        );
    }
}
