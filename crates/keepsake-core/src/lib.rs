//! # keepsake-core
//!
//! The widget-state persistence engine for Keepsake - THE ENGINE.
//!
//! This crate persists and restores the transient state of a tree of
//! interactive UI controls (checkboxes, text fields, tab selections,
//! splitter layouts, window geometry, exclusive action groups, editable
//! combo-box history) to and from a scoped key-value settings store,
//! without per-widget hand-written save/load code.
//!
//! ## Architecture
//!
//! - The [`WidgetTree`] is the object graph: an arena-owned tree of
//!   [`Widget`]s, each carrying a sealed [`Control`] type tag with its
//!   state inline.
//! - The [`SettingsStore`] trait is the persistence seam; [`MemoryStore`]
//!   and [`RedbStore`] are the built-in backends.
//! - The [`Serializer`] is the traversal engine: it walks the tree,
//!   opens/closes store scopes with guaranteed stack discipline, dispatches
//!   each control to its leaf codec, and applies per-widget [`Policies`].
//!
//! ## Architectural Constraints
//!
//! - Single-threaded, synchronous, non-reentrant traversal
//! - No async, no network dependencies (pure Rust)
//! - BTreeMap-only collections for deterministic ordering
//! - Leaf failures never abort an in-progress cascade; the worst outcome
//!   is "state left as it was before the call"

// =============================================================================
// MODULES
// =============================================================================

pub mod codec;
pub mod policy;
pub mod primitives;
pub mod serializer;
pub mod store;
pub mod tree;
pub mod types;
pub mod window;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{KeepsakeError, Value, WidgetId};

// =============================================================================
// RE-EXPORTS: Widget Tree
// =============================================================================

pub use tree::{Control, ControlKind, Widget, WidgetTree, WindowClass};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use codec::Outcome;
pub use policy::{Policies, Policy};
pub use serializer::Serializer;

// =============================================================================
// RE-EXPORTS: Settings Stores
// =============================================================================

pub use store::{MemoryStore, RedbStore, ScopeGuard, SettingsStore};
