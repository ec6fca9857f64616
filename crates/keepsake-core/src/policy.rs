//! # Policy Side-Table
//!
//! Per-widget opt-in/opt-out flags consulted during a cascade.
//!
//! Policies live in an explicit side-table owned by the serializer
//! configuration, keyed by widget identity, with defaults applied on
//! lookup miss. They are control-flow flags for the engine, not domain
//! attributes of the widgets themselves.

use crate::types::WidgetId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// POLICY
// =============================================================================

/// The persistence policy of one widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Whether child enumeration visits this widget at all.
    pub serializable: bool,
    /// Whether the cascade descends into this widget's children.
    pub cascadable: bool,
    /// History capacity for editable choice controls. 0 disables history;
    /// the full item list is persisted instead.
    pub history_limit: u32,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            serializable: true,
            cascadable: true,
            history_limit: 0,
        }
    }
}

// =============================================================================
// POLICIES TABLE
// =============================================================================

/// The policy side-table. All setters are idempotent; readers fall back to
/// [`Policy::default`] for widgets with no entry.
#[derive(Debug, Clone, Default)]
pub struct Policies {
    table: BTreeMap<WidgetId, Policy>,
}

impl Policies {
    /// Create an empty table (every widget at defaults).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable serialization of one widget.
    pub fn set_serializable(&mut self, id: WidgetId, serializable: bool) {
        self.table.entry(id).or_default().serializable = serializable;
    }

    /// Enable or disable serialization of a batch of widgets.
    pub fn set_serializable_many(&mut self, ids: &[WidgetId], serializable: bool) {
        for &id in ids {
            self.set_serializable(id, serializable);
        }
    }

    /// Enable or disable descent into one widget's children.
    pub fn set_cascadable(&mut self, id: WidgetId, cascadable: bool) {
        self.table.entry(id).or_default().cascadable = cascadable;
    }

    /// Enable or disable descent for a batch of widgets.
    pub fn set_cascadable_many(&mut self, ids: &[WidgetId], cascadable: bool) {
        for &id in ids {
            self.set_cascadable(id, cascadable);
        }
    }

    /// Set the history capacity of one widget. 0 disables history.
    pub fn set_history_limit(&mut self, id: WidgetId, limit: u32) {
        self.table.entry(id).or_default().history_limit = limit;
    }

    /// Set the history capacity for a batch of widgets.
    pub fn set_history_limit_many(&mut self, ids: &[WidgetId], limit: u32) {
        for &id in ids {
            self.set_history_limit(id, limit);
        }
    }

    /// Whether child enumeration visits `id`. Defaults to true.
    #[must_use]
    pub fn serializable(&self, id: WidgetId) -> bool {
        self.table.get(&id).map_or(true, |p| p.serializable)
    }

    /// Whether the cascade descends into `id`'s children. Defaults to true.
    #[must_use]
    pub fn cascadable(&self, id: WidgetId) -> bool {
        self.table.get(&id).map_or(true, |p| p.cascadable)
    }

    /// History capacity of `id`. Defaults to 0 (disabled).
    #[must_use]
    pub fn history_limit(&self, id: WidgetId) -> u32 {
        self.table.get(&id).map_or(0, |p| p.history_limit)
    }

    /// The effective policy of `id`, defaults applied.
    #[must_use]
    pub fn policy(&self, id: WidgetId) -> Policy {
        self.table.get(&id).copied().unwrap_or_default()
    }

    /// Drop `id`'s entry, restoring defaults.
    pub fn reset(&mut self, id: WidgetId) {
        self.table.remove(&id);
    }

    /// Number of widgets with explicit entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether every widget is at defaults.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
