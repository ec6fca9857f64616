//! # Engine Primitives
//!
//! Hardcoded runtime constants for the Keepsake ENGINE.
//!
//! These primitives are compiled into the binary and are immutable at
//! runtime. They define the reserved naming conventions of the toolkit and
//! the fixed layout of persisted keys.

/// Reserved prefix marking internal implementation children.
///
/// Children whose name starts with this prefix are machinery the toolkit
/// itself creates (tab content holders, scroll viewports). They are never
/// visited during child recursion, regardless of policy flags.
pub const INTERNAL_PREFIX: &str = "ks_";

/// Name of the internal content-holder child of a tab view.
///
/// A tab view persists only its active-tab index; its pages cascade through
/// this single internal child, skipping the tab strip machinery.
pub const TAB_STACK_NAME: &str = "ks_tab_stack";

/// Case-insensitive prefix stripped from action and action-group names
/// before they are used as keys or as stored member names.
pub const ACTION_PREFIX: &str = "action";

/// Suffix deriving the history/item-list key of an editable choice control
/// from its main key.
pub const ITEMS_SUFFIX: &str = ".items";

/// Separator joining scope segments into an effective store key.
pub const SCOPE_SEPARATOR: char = '/';

// =============================================================================
// WINDOW STATE KEYS
// =============================================================================

/// Stored position of a dialog-class window.
pub const KEY_POSITION: &str = "_position";

/// Stored size of a dialog-class window.
pub const KEY_SIZE: &str = "_size";

/// Stored opaque geometry blob of a non-dialog window.
pub const KEY_GEOMETRY: &str = "_geometry";

/// Stored dockable-layout blob of a main-class window.
pub const KEY_DOCK_STATE: &str = "_state";

// =============================================================================
// LIMITS
// =============================================================================

/// Conventional history capacity for editable choice controls.
///
/// Callers enabling history without a specific bound use this value.
/// A limit of 0 disables history and persists the full item list instead.
pub const DEFAULT_HISTORY_LIMIT: u32 = 100;

/// Maximum accepted size of a single persisted value (16 MB).
///
/// Validated BEFORE deserializing when a disk-backed store loads its cache,
/// so a corrupted or malicious database cannot force unbounded allocation.
pub const MAX_VALUE_BYTES: usize = 16 * 1024 * 1024;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_stack_name_is_internal() {
        // The content holder must itself carry the reserved prefix so that
        // generic child enumeration never visits it directly.
        assert!(TAB_STACK_NAME.starts_with(INTERNAL_PREFIX));
    }

    #[test]
    fn window_keys_are_reserved() {
        for key in [KEY_POSITION, KEY_SIZE, KEY_GEOMETRY, KEY_DOCK_STATE] {
            assert!(key.starts_with('_'));
        }
    }
}
