//! # Widget Tree
//!
//! The object graph the engine walks: an arena-owned tree of widgets.
//!
//! The tree owns its widgets in a `BTreeMap` keyed by monotonically
//! assigned [`WidgetId`]s, with ordered child lists and parent back-links,
//! so traversal order is the native insertion order and identities stay
//! valid for the policy side-table.
//!
//! [`Control`] is the sealed enumeration of supported control kinds with
//! state inline. Adding a kind means adding one variant plus one codec
//! entry; there is no subclassing.

use crate::primitives::TAB_STACK_NAME;
use crate::types::{KeepsakeError, WidgetId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// CONTROL KINDS
// =============================================================================

/// Classification of a top-level window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowClass {
    /// A main window: persists an opaque geometry blob plus a dockable
    /// layout blob.
    Main,
    /// A dialog: persists position and size as two separate values.
    Dialog,
    /// Any other top-level window: persists a geometry blob only.
    Plain,
}

/// A control's runtime type tag together with its transient state.
///
/// The tag is immutable after creation; the tree exposes no way to replace
/// a widget's control wholesale, only to mutate its state fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Control {
    /// Two-state checkbox.
    Checkbox { checked: bool },
    /// Radio button; exclusivity is the embedder's concern.
    RadioButton { checked: bool },
    /// Push button optionally acting as a toggle. Only checkable buttons
    /// participate in persistence.
    ToggleButton { checkable: bool, checked: bool },
    /// Integer stepper.
    SpinBox { value: i64 },
    /// Real-valued stepper.
    DoubleSpinBox { value: f64 },
    /// Single-line text input.
    TextField { text: String },
    /// Tab container; persists only the active-tab index. Pages live under
    /// the internal content-holder child.
    TabView { current: i64 },
    /// Splitter container; persists an opaque layout blob it produces
    /// itself.
    Splitter { sizes: Vec<u32> },
    /// Choice list. Fixed mode persists the selected index; editable mode
    /// persists the current text plus an item list or bounded history.
    ComboBox {
        editable: bool,
        index: i64,
        text: String,
        items: Vec<String>,
    },
    /// Checkable action. `triggered` counts side-effect firings.
    Action {
        checkable: bool,
        checked: bool,
        triggered: u64,
    },
    /// Mutually-exclusive action set; members are the group's direct
    /// `Action` children.
    ActionGroup,
    /// Menu; never cascaded into.
    Menu,
    /// Top-level window.
    Window {
        class: WindowClass,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        dock_layout: Vec<u8>,
    },
    /// Generic container with no persisted state of its own.
    Container,
}

/// Fieldless type tag of a [`Control`], used for codec dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlKind {
    Checkbox,
    RadioButton,
    ToggleButton,
    SpinBox,
    DoubleSpinBox,
    TextField,
    TabView,
    Splitter,
    ComboBox,
    Action,
    ActionGroup,
    Menu,
    Window,
    Container,
}

impl Control {
    /// The runtime type tag of this control.
    #[must_use]
    pub fn kind(&self) -> ControlKind {
        match self {
            Self::Checkbox { .. } => ControlKind::Checkbox,
            Self::RadioButton { .. } => ControlKind::RadioButton,
            Self::ToggleButton { .. } => ControlKind::ToggleButton,
            Self::SpinBox { .. } => ControlKind::SpinBox,
            Self::DoubleSpinBox { .. } => ControlKind::DoubleSpinBox,
            Self::TextField { .. } => ControlKind::TextField,
            Self::TabView { .. } => ControlKind::TabView,
            Self::Splitter { .. } => ControlKind::Splitter,
            Self::ComboBox { .. } => ControlKind::ComboBox,
            Self::Action { .. } => ControlKind::Action,
            Self::ActionGroup => ControlKind::ActionGroup,
            Self::Menu => ControlKind::Menu,
            Self::Window { .. } => ControlKind::Window,
            Self::Container => ControlKind::Container,
        }
    }
}

// =============================================================================
// WIDGET
// =============================================================================

/// A widget in the tree: identity, optional human-readable name, control
/// tag and state.
///
/// An empty name is legal; nameless widgets cannot resolve a settings key
/// of their own, so their leaf save/load fails non-fatally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    /// Tree-assigned identity.
    pub id: WidgetId,
    /// Human-readable identifier used as the default settings key.
    pub name: String,
    /// The control tag and its state.
    pub control: Control,
}

impl Widget {
    /// Whether this widget is a top-level window.
    #[must_use]
    pub fn is_window(&self) -> bool {
        matches!(self.control, Control::Window { .. })
    }

    /// Whether this widget is a dialog-class window.
    #[must_use]
    pub fn is_dialog(&self) -> bool {
        matches!(
            self.control,
            Control::Window {
                class: WindowClass::Dialog,
                ..
            }
        )
    }

    /// Whether this widget is a main-class window (carries dock layout).
    #[must_use]
    pub fn is_main_window(&self) -> bool {
        matches!(
            self.control,
            Control::Window {
                class: WindowClass::Main,
                ..
            }
        )
    }

    /// Opaque geometry blob of a window. Empty for non-windows.
    ///
    /// The blob is produced by the widget itself and is meaningful only to
    /// [`Widget::restore_geometry`].
    #[must_use]
    pub fn geometry_blob(&self) -> Vec<u8> {
        match &self.control {
            Control::Window {
                x,
                y,
                width,
                height,
                ..
            } => postcard::to_allocvec(&(*x, *y, *width, *height)).unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    /// Apply a geometry blob previously produced by [`Widget::geometry_blob`].
    ///
    /// Returns false (leaving state untouched) for non-windows and for
    /// blobs that do not decode.
    pub fn restore_geometry(&mut self, bytes: &[u8]) -> bool {
        let Control::Window {
            x,
            y,
            width,
            height,
            ..
        } = &mut self.control
        else {
            return false;
        };
        match postcard::from_bytes::<(i32, i32, u32, u32)>(bytes) {
            Ok((nx, ny, nw, nh)) => {
                *x = nx;
                *y = ny;
                *width = nw;
                *height = nh;
                true
            }
            Err(_) => false,
        }
    }

    /// Opaque layout blob of a splitter. Empty for non-splitters.
    #[must_use]
    pub fn layout_state(&self) -> Vec<u8> {
        match &self.control {
            Control::Splitter { sizes } => postcard::to_allocvec(sizes).unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    /// Apply a layout blob previously produced by [`Widget::layout_state`].
    pub fn restore_layout(&mut self, bytes: &[u8]) -> bool {
        let Control::Splitter { sizes } = &mut self.control else {
            return false;
        };
        match postcard::from_bytes::<Vec<u32>>(bytes) {
            Ok(restored) => {
                *sizes = restored;
                true
            }
            Err(_) => false,
        }
    }

    /// Fire an action's side effect. No-op for non-actions.
    pub fn trigger(&mut self) {
        if let Control::Action { triggered, .. } = &mut self.control {
            *triggered = triggered.saturating_add(1);
        }
    }
}

// =============================================================================
// WIDGET TREE
// =============================================================================

/// The arena-owned widget tree.
///
/// Uses `BTreeMap` exclusively for deterministic iteration; child lists
/// preserve insertion order, which is the traversal order the engine
/// guarantees (and the only ordering it guarantees).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WidgetTree {
    /// Widget storage: WidgetId -> Widget
    widgets: BTreeMap<WidgetId, Widget>,

    /// Ordered children per widget.
    children: BTreeMap<WidgetId, Vec<WidgetId>>,

    /// Non-owning parent back-links.
    parents: BTreeMap<WidgetId, WidgetId>,

    /// Next available WidgetId.
    next_id: u64,
}

impl WidgetTree {
    /// Create a new empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self, name: impl Into<String>, control: Control) -> WidgetId {
        let id = WidgetId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.widgets.insert(
            id,
            Widget {
                id,
                name: name.into(),
                control,
            },
        );
        id
    }

    /// Insert a parentless widget (a window root or free-standing group).
    pub fn insert_root(&mut self, name: impl Into<String>, control: Control) -> WidgetId {
        self.alloc(name, control)
    }

    /// Insert a widget as the last child of `parent`.
    pub fn insert_child(
        &mut self,
        parent: WidgetId,
        name: impl Into<String>,
        control: Control,
    ) -> Result<WidgetId, KeepsakeError> {
        if !self.widgets.contains_key(&parent) {
            return Err(KeepsakeError::WidgetNotFound(parent));
        }
        let id = self.alloc(name, control);
        self.children.entry(parent).or_default().push(id);
        self.parents.insert(id, parent);
        Ok(id)
    }

    /// Insert a tab view together with its internal content-holder child.
    ///
    /// Returns `(view, stack)`: pages must be inserted as children of
    /// `stack`, never of `view` directly.
    pub fn insert_tab_view(
        &mut self,
        parent: Option<WidgetId>,
        name: impl Into<String>,
        current: i64,
    ) -> Result<(WidgetId, WidgetId), KeepsakeError> {
        let view = match parent {
            Some(p) => self.insert_child(p, name, Control::TabView { current })?,
            None => self.insert_root(name, Control::TabView { current }),
        };
        let stack = self.insert_child(view, TAB_STACK_NAME, Control::Container)?;
        Ok((view, stack))
    }

    /// Lookup a widget by id.
    #[must_use]
    pub fn widget(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets.get(&id)
    }

    /// Mutable lookup of a widget by id.
    #[must_use]
    pub fn widget_mut(&mut self, id: WidgetId) -> Option<&mut Widget> {
        self.widgets.get_mut(&id)
    }

    /// A widget's name, if the widget exists.
    #[must_use]
    pub fn name(&self, id: WidgetId) -> Option<&str> {
        self.widgets.get(&id).map(|w| w.name.as_str())
    }

    /// Whether the tree contains `id`.
    #[must_use]
    pub fn contains(&self, id: WidgetId) -> bool {
        self.widgets.contains_key(&id)
    }

    /// Direct children of `id` in insertion order.
    #[must_use]
    pub fn children(&self, id: WidgetId) -> &[WidgetId] {
        match self.children.get(&id) {
            Some(ids) => ids.as_slice(),
            None => &[],
        }
    }

    /// The parent of `id`, if any.
    #[must_use]
    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.parents.get(&id).copied()
    }

    /// First direct child of `id` with the given name.
    #[must_use]
    pub fn find_child_named(&self, id: WidgetId, name: &str) -> Option<WidgetId> {
        self.children(id)
            .iter()
            .copied()
            .find(|child| self.name(*child) == Some(name))
    }

    /// Whether `id` is a top-level window.
    #[must_use]
    pub fn is_window(&self, id: WidgetId) -> bool {
        self.widgets.get(&id).is_some_and(Widget::is_window)
    }

    /// Whether `id` is a dialog-class window.
    #[must_use]
    pub fn is_dialog(&self, id: WidgetId) -> bool {
        self.widgets.get(&id).is_some_and(Widget::is_dialog)
    }

    /// Total number of widgets.
    #[must_use]
    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    /// All widgets in id order.
    pub fn widgets(&self) -> impl Iterator<Item = &Widget> {
        self.widgets.values()
    }
}

// =============================================================================
// TESTS
// =============================================================================
