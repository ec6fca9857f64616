//! # Leaf Codec Table
//!
//! Per-control save/load rules and the dispatch over the sealed
//! [`Control`] enumeration.
//!
//! Every rule is a function of (widget, resolved key, store) with one side
//! effect: a write on save, a read-and-apply on load. Failures are
//! boolean, mutate nothing, and never abort the caller's traversal.
//! Control kinds with no rule (windows, containers, menus) report
//! [`Outcome::Unhandled`], which is "nothing to do", not an error.
//!
//! ## Key resolution
//!
//! The effective key is the explicit name argument if non-empty, else the
//! widget's own name; if both are empty the operation fails for that
//! widget. Action and action-group keys additionally have the reserved
//! case-insensitive `action` prefix stripped.

use crate::policy::Policies;
use crate::primitives::{ACTION_PREFIX, ITEMS_SUFFIX};
use crate::store::SettingsStore;
use crate::tree::{Control, ControlKind, WidgetTree};
use crate::types::{Value, WidgetId};

// =============================================================================
// OUTCOME
// =============================================================================

/// Result of dispatching one widget to the codec table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The rule ran and its side effect took place.
    Applied,
    /// A rule exists but a precondition failed or required data was
    /// absent. Nothing was written or applied.
    Failed,
    /// No rule exists for this control kind. Nothing to do.
    Unhandled,
}

impl Outcome {
    /// Whether a rule exists for the widget's kind.
    #[must_use]
    pub fn handled(self) -> bool {
        !matches!(self, Self::Unhandled)
    }

    /// Whether the rule ran successfully.
    #[must_use]
    pub fn succeeded(self) -> bool {
        matches!(self, Self::Applied)
    }

    pub(crate) fn from_flag(ok: bool) -> Self {
        if ok { Self::Applied } else { Self::Failed }
    }
}

/// Per-dispatch context: the policy table and the serializer-global
/// history suppression flag, needed by the editable-choice rules.
pub(crate) struct LeafCtx<'a> {
    pub policies: &'a Policies,
    pub omit_history: bool,
}

// =============================================================================
// KEY RESOLUTION
// =============================================================================

/// Strip the reserved case-insensitive action prefix from a name.
pub(crate) fn strip_action_prefix(name: &str) -> &str {
    let len = ACTION_PREFIX.len();
    match name.get(..len) {
        Some(head) if head.eq_ignore_ascii_case(ACTION_PREFIX) => &name[len..],
        _ => name,
    }
}

fn resolve_key(tree: &WidgetTree, id: WidgetId, name: Option<&str>) -> Option<String> {
    match name {
        Some(explicit) if !explicit.is_empty() => Some(explicit.to_string()),
        _ => {
            let own = tree.name(id)?;
            if own.is_empty() {
                None
            } else {
                Some(own.to_string())
            }
        }
    }
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Save one widget through its codec rule.
///
/// Arm order is the fixed dispatch priority; the first matching rule wins.
pub(crate) fn save_leaf<S: SettingsStore + ?Sized>(
    store: &mut S,
    ctx: &LeafCtx<'_>,
    tree: &WidgetTree,
    id: WidgetId,
    name: Option<&str>,
) -> Outcome {
    let Some(kind) = tree.widget(id).map(|w| w.control.kind()) else {
        return Outcome::Failed;
    };
    match kind {
        ControlKind::ActionGroup => Outcome::from_flag(save_action_group(store, tree, id, name)),
        ControlKind::Action => Outcome::from_flag(save_action(store, tree, id, name)),
        ControlKind::Checkbox => Outcome::from_flag(save_checked(store, tree, id, name)),
        ControlKind::ToggleButton => Outcome::from_flag(save_toggle(store, tree, id, name)),
        ControlKind::RadioButton => Outcome::from_flag(save_checked(store, tree, id, name)),
        ControlKind::SpinBox => Outcome::from_flag(save_spin(store, tree, id, name)),
        ControlKind::DoubleSpinBox => Outcome::from_flag(save_double_spin(store, tree, id, name)),
        ControlKind::TextField => Outcome::from_flag(save_text(store, tree, id, name)),
        ControlKind::TabView => Outcome::from_flag(save_tab(store, tree, id, name)),
        ControlKind::Splitter => Outcome::from_flag(save_splitter(store, tree, id, name)),
        ControlKind::ComboBox => Outcome::from_flag(save_combo(store, ctx, tree, id, name)),
        ControlKind::Menu | ControlKind::Window | ControlKind::Container => Outcome::Unhandled,
    }
}

/// Load one widget through its codec rule.
pub(crate) fn load_leaf<S: SettingsStore + ?Sized>(
    store: &mut S,
    ctx: &LeafCtx<'_>,
    tree: &mut WidgetTree,
    id: WidgetId,
    name: Option<&str>,
) -> Outcome {
    let Some(kind) = tree.widget(id).map(|w| w.control.kind()) else {
        return Outcome::Failed;
    };
    match kind {
        ControlKind::ActionGroup => Outcome::from_flag(load_action_group(store, tree, id, name)),
        ControlKind::Action => Outcome::from_flag(load_action(store, tree, id, name)),
        ControlKind::Checkbox => Outcome::from_flag(load_checked(store, tree, id, name)),
        ControlKind::ToggleButton => Outcome::from_flag(load_toggle(store, tree, id, name)),
        ControlKind::RadioButton => Outcome::from_flag(load_checked(store, tree, id, name)),
        ControlKind::SpinBox => Outcome::from_flag(load_spin(store, tree, id, name)),
        ControlKind::DoubleSpinBox => Outcome::from_flag(load_double_spin(store, tree, id, name)),
        ControlKind::TextField => Outcome::from_flag(load_text(store, tree, id, name)),
        ControlKind::TabView => Outcome::from_flag(load_tab(store, tree, id, name)),
        ControlKind::Splitter => Outcome::from_flag(load_splitter(store, tree, id, name)),
        ControlKind::ComboBox => Outcome::from_flag(load_combo(store, ctx, tree, id, name)),
        ControlKind::Menu | ControlKind::Window | ControlKind::Container => Outcome::Unhandled,
    }
}

// =============================================================================
// CHECKED CONTROLS (checkbox, radio button, toggle button)
// =============================================================================

fn save_checked<S: SettingsStore + ?Sized>(
    store: &mut S,
    tree: &WidgetTree,
    id: WidgetId,
    name: Option<&str>,
) -> bool {
    let Some(key) = resolve_key(tree, id, name) else {
        return false;
    };
    let checked = match tree.widget(id).map(|w| &w.control) {
        Some(Control::Checkbox { checked } | Control::RadioButton { checked }) => *checked,
        _ => return false,
    };
    store.set_value(&key, Value::Bool(checked));
    true
}

fn load_checked<S: SettingsStore + ?Sized>(
    store: &mut S,
    tree: &mut WidgetTree,
    id: WidgetId,
    name: Option<&str>,
) -> bool {
    let Some(key) = resolve_key(tree, id, name) else {
        return false;
    };
    if !store.contains(&key) {
        return false;
    }
    let Some(stored) = store.value(&key).and_then(|v| v.as_bool()) else {
        return false;
    };
    match tree.widget_mut(id).map(|w| &mut w.control) {
        Some(Control::Checkbox { checked } | Control::RadioButton { checked }) => {
            *checked = stored;
            true
        }
        _ => false,
    }
}

fn save_toggle<S: SettingsStore + ?Sized>(
    store: &mut S,
    tree: &WidgetTree,
    id: WidgetId,
    name: Option<&str>,
) -> bool {
    let Some(key) = resolve_key(tree, id, name) else {
        return false;
    };
    let checked = match tree.widget(id).map(|w| &w.control) {
        Some(Control::ToggleButton { checkable, checked }) => {
            if !*checkable {
                return false;
            }
            *checked
        }
        _ => return false,
    };
    store.set_value(&key, Value::Bool(checked));
    true
}

fn load_toggle<S: SettingsStore + ?Sized>(
    store: &mut S,
    tree: &mut WidgetTree,
    id: WidgetId,
    name: Option<&str>,
) -> bool {
    let Some(key) = resolve_key(tree, id, name) else {
        return false;
    };
    if !store.contains(&key) {
        return false;
    }
    let Some(stored) = store.value(&key).and_then(|v| v.as_bool()) else {
        return false;
    };
    match tree.widget_mut(id).map(|w| &mut w.control) {
        Some(Control::ToggleButton { checkable, checked }) => {
            if !*checkable {
                return false;
            }
            *checked = stored;
            true
        }
        _ => false,
    }
}

// =============================================================================
// STEPPERS AND TEXT
// =============================================================================

fn save_spin<S: SettingsStore + ?Sized>(
    store: &mut S,
    tree: &WidgetTree,
    id: WidgetId,
    name: Option<&str>,
) -> bool {
    let Some(key) = resolve_key(tree, id, name) else {
        return false;
    };
    let Some(Control::SpinBox { value }) = tree.widget(id).map(|w| &w.control) else {
        return false;
    };
    store.set_value(&key, Value::Int(*value));
    true
}

fn load_spin<S: SettingsStore + ?Sized>(
    store: &mut S,
    tree: &mut WidgetTree,
    id: WidgetId,
    name: Option<&str>,
) -> bool {
    let Some(key) = resolve_key(tree, id, name) else {
        return false;
    };
    if !store.contains(&key) {
        return false;
    }
    let Some(stored) = store.value(&key).and_then(|v| v.as_int()) else {
        return false;
    };
    match tree.widget_mut(id).map(|w| &mut w.control) {
        Some(Control::SpinBox { value }) => {
            *value = stored;
            true
        }
        _ => false,
    }
}

fn save_double_spin<S: SettingsStore + ?Sized>(
    store: &mut S,
    tree: &WidgetTree,
    id: WidgetId,
    name: Option<&str>,
) -> bool {
    let Some(key) = resolve_key(tree, id, name) else {
        return false;
    };
    let Some(Control::DoubleSpinBox { value }) = tree.widget(id).map(|w| &w.control) else {
        return false;
    };
    store.set_value(&key, Value::Real(*value));
    true
}

fn load_double_spin<S: SettingsStore + ?Sized>(
    store: &mut S,
    tree: &mut WidgetTree,
    id: WidgetId,
    name: Option<&str>,
) -> bool {
    let Some(key) = resolve_key(tree, id, name) else {
        return false;
    };
    if !store.contains(&key) {
        return false;
    }
    let Some(stored) = store.value(&key).and_then(|v| v.as_real()) else {
        return false;
    };
    match tree.widget_mut(id).map(|w| &mut w.control) {
        Some(Control::DoubleSpinBox { value }) => {
            *value = stored;
            true
        }
        _ => false,
    }
}

fn save_text<S: SettingsStore + ?Sized>(
    store: &mut S,
    tree: &WidgetTree,
    id: WidgetId,
    name: Option<&str>,
) -> bool {
    let Some(key) = resolve_key(tree, id, name) else {
        return false;
    };
    let Some(Control::TextField { text }) = tree.widget(id).map(|w| &w.control) else {
        return false;
    };
    store.set_value(&key, Value::Text(text.clone()));
    true
}

fn load_text<S: SettingsStore + ?Sized>(
    store: &mut S,
    tree: &mut WidgetTree,
    id: WidgetId,
    name: Option<&str>,
) -> bool {
    let Some(key) = resolve_key(tree, id, name) else {
        return false;
    };
    if !store.contains(&key) {
        return false;
    }
    // Verbatim: no trimming, no validation.
    let Some(stored) = store.value(&key).and_then(|v| v.as_text()) else {
        return false;
    };
    match tree.widget_mut(id).map(|w| &mut w.control) {
        Some(Control::TextField { text }) => {
            *text = stored;
            true
        }
        _ => false,
    }
}

// =============================================================================
// CONTAINERS (tab view, splitter)
// =============================================================================

fn save_tab<S: SettingsStore + ?Sized>(
    store: &mut S,
    tree: &WidgetTree,
    id: WidgetId,
    name: Option<&str>,
) -> bool {
    let Some(key) = resolve_key(tree, id, name) else {
        return false;
    };
    let Some(Control::TabView { current }) = tree.widget(id).map(|w| &w.control) else {
        return false;
    };
    // Only the active index; page content cascades through the content
    // holder like any other child subtree.
    store.set_value(&key, Value::Int(*current));
    true
}

fn load_tab<S: SettingsStore + ?Sized>(
    store: &mut S,
    tree: &mut WidgetTree,
    id: WidgetId,
    name: Option<&str>,
) -> bool {
    let Some(key) = resolve_key(tree, id, name) else {
        return false;
    };
    if !store.contains(&key) {
        return false;
    }
    let Some(stored) = store.value(&key).and_then(|v| v.as_int()) else {
        return false;
    };
    match tree.widget_mut(id).map(|w| &mut w.control) {
        Some(Control::TabView { current }) => {
            *current = stored;
            true
        }
        _ => false,
    }
}

fn save_splitter<S: SettingsStore + ?Sized>(
    store: &mut S,
    tree: &WidgetTree,
    id: WidgetId,
    name: Option<&str>,
) -> bool {
    let Some(key) = resolve_key(tree, id, name) else {
        return false;
    };
    let Some(widget) = tree.widget(id) else {
        return false;
    };
    if !matches!(widget.control, Control::Splitter { .. }) {
        return false;
    }
    store.set_value(&key, Value::Blob(widget.layout_state()));
    true
}

fn load_splitter<S: SettingsStore + ?Sized>(
    store: &mut S,
    tree: &mut WidgetTree,
    id: WidgetId,
    name: Option<&str>,
) -> bool {
    let Some(key) = resolve_key(tree, id, name) else {
        return false;
    };
    if !store.contains(&key) {
        return false;
    }
    let Some(stored) = store.value(&key) else {
        return false;
    };
    let Some(bytes) = stored.as_blob() else {
        return false;
    };
    match tree.widget_mut(id) {
        Some(widget) if matches!(widget.control, Control::Splitter { .. }) => {
            // A blob the widget rejects leaves its state untouched; the
            // load itself still counts as done.
            let _ = widget.restore_layout(bytes);
            true
        }
        _ => false,
    }
}

// =============================================================================
// ACTIONS
// =============================================================================

fn save_action<S: SettingsStore + ?Sized>(
    store: &mut S,
    tree: &WidgetTree,
    id: WidgetId,
    name: Option<&str>,
) -> bool {
    let checked = match tree.widget(id).map(|w| &w.control) {
        Some(Control::Action {
            checkable, checked, ..
        }) => {
            if !*checkable {
                return false;
            }
            *checked
        }
        _ => return false,
    };
    let Some(key) = resolve_key(tree, id, name) else {
        return false;
    };
    let clean_key = strip_action_prefix(&key).to_string();
    store.set_value(&clean_key, Value::Bool(checked));
    true
}

fn load_action<S: SettingsStore + ?Sized>(
    store: &mut S,
    tree: &mut WidgetTree,
    id: WidgetId,
    name: Option<&str>,
) -> bool {
    match tree.widget(id).map(|w| &w.control) {
        Some(Control::Action { checkable, .. }) => {
            if !*checkable {
                return false;
            }
        }
        _ => return false,
    }
    let Some(key) = resolve_key(tree, id, name) else {
        return false;
    };
    let clean_key = strip_action_prefix(&key).to_string();
    if !store.contains(&clean_key) {
        return false;
    }
    let Some(stored) = store.value(&clean_key).and_then(|v| v.as_bool()) else {
        return false;
    };
    match tree.widget_mut(id).map(|w| &mut w.control) {
        Some(Control::Action { checked, .. }) => {
            // A solo action is only re-checked; triggering is reserved for
            // group restoration.
            *checked = stored;
            true
        }
        _ => false,
    }
}

fn save_action_group<S: SettingsStore + ?Sized>(
    store: &mut S,
    tree: &WidgetTree,
    id: WidgetId,
    name: Option<&str>,
) -> bool {
    let Some(key) = resolve_key(tree, id, name) else {
        return false;
    };
    let key = strip_action_prefix(&key).to_string();
    for &member in tree.children(id) {
        let Some(widget) = tree.widget(member) else {
            continue;
        };
        let Control::Action {
            checkable, checked, ..
        } = &widget.control
        else {
            continue;
        };
        if !*checkable {
            continue;
        }
        let member_name = strip_action_prefix(&widget.name);
        if member_name.is_empty() {
            continue;
        }
        if *checked {
            // First checked member wins; further checked members (a broken
            // exclusivity invariant) are intentionally not considered.
            store.set_value(&key, Value::Text(member_name.to_string()));
            return true;
        }
    }
    false
}

fn load_action_group<S: SettingsStore + ?Sized>(
    store: &mut S,
    tree: &mut WidgetTree,
    id: WidgetId,
    name: Option<&str>,
) -> bool {
    let Some(key) = resolve_key(tree, id, name) else {
        return false;
    };
    let key = strip_action_prefix(&key).to_string();
    if !store.contains(&key) {
        return false;
    }
    let Some(stored) = store.value(&key).and_then(|v| v.as_text()) else {
        return false;
    };
    let members: Vec<WidgetId> = tree.children(id).to_vec();
    for member in members {
        let Some(widget) = tree.widget(member) else {
            continue;
        };
        let Control::Action { checkable, .. } = &widget.control else {
            continue;
        };
        if !*checkable {
            continue;
        }
        let member_name = strip_action_prefix(&widget.name);
        if member_name.is_empty() {
            continue;
        }
        // Byte-for-byte match on the stripped name.
        if member_name == stored {
            if let Some(found) = tree.widget_mut(member) {
                if let Control::Action { checked, .. } = &mut found.control {
                    *checked = true;
                }
                found.trigger();
            }
            return true;
        }
    }
    false
}

// =============================================================================
// CHOICE LISTS
// =============================================================================

fn save_combo<S: SettingsStore + ?Sized>(
    store: &mut S,
    ctx: &LeafCtx<'_>,
    tree: &WidgetTree,
    id: WidgetId,
    name: Option<&str>,
) -> bool {
    let Some(key) = resolve_key(tree, id, name) else {
        return false;
    };
    let Some(Control::ComboBox {
        editable,
        index,
        text,
        items,
    }) = tree.widget(id).map(|w| &w.control)
    else {
        return false;
    };
    if *editable {
        store.set_value(&key, Value::Text(text.clone()));

        let limit = ctx.policies.history_limit(id);
        let stored_items = if limit > 0 {
            if ctx.omit_history {
                // The current text is already saved; history is globally
                // suppressed for this serializer.
                return true;
            }
            let cap = limit.saturating_sub(1) as usize;
            let mut list = Vec::with_capacity((limit as usize).min(items.len().saturating_add(1)));
            list.push(text.clone());
            for (i, item) in items.iter().enumerate() {
                if i >= cap {
                    break;
                }
                if item != text {
                    list.push(item.clone());
                }
            }
            list
        } else {
            items.clone()
        };
        store.set_value(&format!("{key}{ITEMS_SUFFIX}"), Value::List(stored_items));
    } else {
        store.set_value(&key, Value::Int(*index));
    }
    true
}

fn load_combo<S: SettingsStore + ?Sized>(
    store: &mut S,
    ctx: &LeafCtx<'_>,
    tree: &mut WidgetTree,
    id: WidgetId,
    name: Option<&str>,
) -> bool {
    let Some(key) = resolve_key(tree, id, name) else {
        return false;
    };
    let editable = match tree.widget(id).map(|w| &w.control) {
        Some(Control::ComboBox { editable, .. }) => *editable,
        _ => return false,
    };
    if editable {
        let items_key = format!("{key}{ITEMS_SUFFIX}");
        if store.contains(&items_key) {
            let limit = ctx.policies.history_limit(id);
            if let Some(Value::List(mut stored)) = store.value(&items_key) {
                if limit > 0 {
                    if !ctx.omit_history {
                        stored.truncate(limit as usize);
                        if let Some(Control::ComboBox { items, .. }) =
                            tree.widget_mut(id).map(|w| &mut w.control)
                        {
                            *items = stored;
                        }
                    }
                } else if let Some(Control::ComboBox { items, .. }) =
                    tree.widget_mut(id).map(|w| &mut w.control)
                {
                    *items = stored;
                }
            }
        }
        if store.contains(&key) {
            if let Some(stored_text) = store.value(&key).and_then(|v| v.as_text()) {
                if let Some(Control::ComboBox { text, .. }) =
                    tree.widget_mut(id).map(|w| &mut w.control)
                {
                    *text = stored_text;
                }
            }
        }
        true
    } else {
        if store.contains(&key) {
            if let Some(stored_index) = store.value(&key).and_then(|v| v.as_int()) {
                if let Some(Control::ComboBox { index, .. }) =
                    tree.widget_mut(id).map(|w| &mut w.control)
                {
                    *index = stored_index;
                }
            }
        }
        true
    }
}

// =============================================================================
// TESTS
// =============================================================================
