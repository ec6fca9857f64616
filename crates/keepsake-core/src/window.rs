//! # Window State Handler
//!
//! Top-level save/load of window position, size, geometry and dock
//! layout, run once per scope boundary by the traversal engine.
//!
//! Dialogs persist position and size as two discrete values so a settings
//! file stays human-inspectable; every other window persists one opaque
//! geometry blob it produces itself. Main windows additionally persist
//! their dockable-layout blob. Loading tolerates partial state: only the
//! keys present in the store are applied.

use crate::primitives::{KEY_DOCK_STATE, KEY_GEOMETRY, KEY_POSITION, KEY_SIZE};
use crate::store::SettingsStore;
use crate::tree::{Control, WidgetTree, WindowClass};
use crate::types::{Value, WidgetId};

/// Persist a window's state into the current scope.
///
/// Returns false for missing widgets and non-windows; nothing is written.
pub fn save_window<S: SettingsStore + ?Sized>(
    store: &mut S,
    tree: &WidgetTree,
    id: WidgetId,
) -> bool {
    let Some(widget) = tree.widget(id) else {
        return false;
    };
    let Control::Window {
        class,
        x,
        y,
        width,
        height,
        dock_layout,
    } = &widget.control
    else {
        return false;
    };

    if *class == WindowClass::Dialog {
        store.set_value(KEY_POSITION, Value::Point(*x, *y));
        store.set_value(KEY_SIZE, Value::Size(*width, *height));
    } else {
        store.set_value(KEY_GEOMETRY, Value::Blob(widget.geometry_blob()));
    }
    if *class == WindowClass::Main {
        store.set_value(KEY_DOCK_STATE, Value::Blob(dock_layout.clone()));
    }
    true
}

/// Restore a window's state from the current scope.
///
/// Each component is applied independently; absent keys leave the
/// corresponding state untouched. Returns false for missing widgets and
/// non-windows.
pub fn load_window<S: SettingsStore + ?Sized>(
    store: &mut S,
    tree: &mut WidgetTree,
    id: WidgetId,
) -> bool {
    let class = match tree.widget(id).map(|w| &w.control) {
        Some(Control::Window { class, .. }) => *class,
        _ => return false,
    };

    if class == WindowClass::Dialog {
        if store.contains(KEY_POSITION) {
            if let Some((nx, ny)) = store.value(KEY_POSITION).and_then(|v| v.as_point()) {
                if let Some(Control::Window { x, y, .. }) =
                    tree.widget_mut(id).map(|w| &mut w.control)
                {
                    *x = nx;
                    *y = ny;
                }
            }
        }
        if store.contains(KEY_SIZE) {
            if let Some((nw, nh)) = store.value(KEY_SIZE).and_then(|v| v.as_size()) {
                if let Some(Control::Window { width, height, .. }) =
                    tree.widget_mut(id).map(|w| &mut w.control)
                {
                    *width = nw;
                    *height = nh;
                }
            }
        }
    } else if store.contains(KEY_GEOMETRY) {
        if let Some(Value::Blob(bytes)) = store.value(KEY_GEOMETRY) {
            if let Some(widget) = tree.widget_mut(id) {
                let _ = widget.restore_geometry(&bytes);
            }
        }
    }

    if class == WindowClass::Main && store.contains(KEY_DOCK_STATE) {
        if let Some(Value::Blob(bytes)) = store.value(KEY_DOCK_STATE) {
            if let Some(Control::Window { dock_layout, .. }) =
                tree.widget_mut(id).map(|w| &mut w.control)
            {
                *dock_layout = bytes;
            }
        }
    }
    true
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn window_tree(class: WindowClass) -> (WidgetTree, WidgetId) {
        let mut tree = WidgetTree::new();
        let id = tree.insert_root(
            "win",
            Control::Window {
                class,
                x: 15,
                y: 25,
                width: 640,
                height: 480,
                dock_layout: vec![9, 9, 9],
            },
        );
        (tree, id)
    }

    #[test]
    fn dialog_stores_position_and_size_separately() {
        let (tree, id) = window_tree(WindowClass::Dialog);
        let mut store = MemoryStore::new();

        assert!(save_window(&mut store, &tree, id));
        assert_eq!(store.value(KEY_POSITION), Some(Value::Point(15, 25)));
        assert_eq!(store.value(KEY_SIZE), Some(Value::Size(640, 480)));
        assert!(!store.contains(KEY_GEOMETRY));
        assert!(!store.contains(KEY_DOCK_STATE));
    }

    #[test]
    fn plain_window_stores_one_geometry_blob() {
        let (tree, id) = window_tree(WindowClass::Plain);
        let mut store = MemoryStore::new();

        assert!(save_window(&mut store, &tree, id));
        assert!(store.contains(KEY_GEOMETRY));
        assert!(!store.contains(KEY_POSITION));
        assert!(!store.contains(KEY_DOCK_STATE));
    }

    #[test]
    fn main_window_also_stores_dock_state() {
        let (tree, id) = window_tree(WindowClass::Main);
        let mut store = MemoryStore::new();

        assert!(save_window(&mut store, &tree, id));
        assert!(store.contains(KEY_GEOMETRY));
        assert_eq!(store.value(KEY_DOCK_STATE), Some(Value::Blob(vec![9, 9, 9])));
    }

    #[test]
    fn non_window_reports_false() {
        let mut tree = WidgetTree::new();
        let id = tree.insert_root("box", Control::Checkbox { checked: false });
        let mut store = MemoryStore::new();

        assert!(!save_window(&mut store, &tree, id));
        assert!(!load_window(&mut store, &mut tree, id));
        assert!(store.is_empty());
    }

    #[test]
    fn geometry_roundtrip() {
        let (tree, id) = window_tree(WindowClass::Main);
        let mut store = MemoryStore::new();
        save_window(&mut store, &tree, id);

        let (mut fresh, fresh_id) = window_tree(WindowClass::Main);
        if let Some(Control::Window {
            x, width, dock_layout, ..
        }) = fresh.widget_mut(fresh_id).map(|w| &mut w.control)
        {
            *x = 0;
            *width = 1;
            dock_layout.clear();
        }

        assert!(load_window(&mut store, &mut fresh, fresh_id));
        if let Some(Control::Window {
            x,
            y,
            width,
            height,
            dock_layout,
            ..
        }) = fresh.widget(fresh_id).map(|w| &w.control)
        {
            assert_eq!((*x, *y, *width, *height), (15, 25, 640, 480));
            assert_eq!(dock_layout, &[9, 9, 9]);
        }
    }

    #[test]
    fn partial_state_is_tolerated() {
        let mut store = MemoryStore::new();
        store.set_value(KEY_POSITION, Value::Point(5, 6));
        // No size stored.

        let (mut tree, id) = window_tree(WindowClass::Dialog);
        assert!(load_window(&mut store, &mut tree, id));
        if let Some(Control::Window {
            x, y, width, height, ..
        }) = tree.widget(id).map(|w| &w.control)
        {
            assert_eq!((*x, *y), (5, 6));
            assert_eq!((*width, *height), (640, 480));
        }
    }
}
