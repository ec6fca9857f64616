//! # Core Type Definitions
//!
//! This module contains the foundation types of the Keepsake engine:
//! - Widget identity (`WidgetId`)
//! - The store's variant value type (`Value`) and its coercions
//! - Error types (`KeepsakeError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module implement `Ord` where they key a `BTreeMap`,
//! and none of them performs floating-point arithmetic; real values are
//! carried, compared and converted, never computed on.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// WIDGET IDENTITY
// =============================================================================

/// Unique identifier for a widget in a [`crate::WidgetTree`].
///
/// Ids are assigned monotonically by the tree and never reused, so a
/// `WidgetId` also keys the policy side-table across a tree's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WidgetId(pub u64);

// =============================================================================
// STORE VALUES
// =============================================================================

/// A value held by a settings store.
///
/// This is the closed set of shapes the leaf codecs read and write. The
/// `as_*` accessors implement the minimal cross-type coercions a load path
/// relies on; anything beyond them is a type mismatch, which load rules
/// report as failure without touching the target widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Boolean (checked state).
    Bool(bool),
    /// Signed integer (stepper values, indices).
    Int(i64),
    /// Real number (real-valued stepper values).
    Real(f64),
    /// Raw text (text fields, action-group member names).
    Text(String),
    /// Ordered string list (editable-choice item lists and history).
    List(Vec<String>),
    /// Opaque binary blob (geometry, splitter and dock layouts).
    Blob(Vec<u8>),
    /// Screen position of a dialog.
    Point(i32, i32),
    /// Size of a dialog.
    Size(u32, u32),
}

impl Value {
    /// Coerce to a boolean.
    ///
    /// Integers coerce by zero-test; text coerces from the literal
    /// `true`/`false`/`1`/`0` spellings (ASCII case-insensitive).
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Int(i) => Some(*i != 0),
            Self::Text(s) => match s.to_ascii_lowercase().as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Coerce to a signed integer.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Bool(b) => Some(i64::from(*b)),
            Self::Real(r) => Some(*r as i64),
            Self::Text(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Coerce to a real number.
    #[must_use]
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Self::Real(r) => Some(*r),
            Self::Int(i) => Some(*i as f64),
            Self::Text(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Coerce to text. Scalars render with their canonical spelling.
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Int(i) => Some(i.to_string()),
            Self::Real(r) => Some(r.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Borrow as a string list. No coercion.
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow as an opaque blob. No coercion.
    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            Self::Blob(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Read as a position. No coercion.
    #[must_use]
    pub fn as_point(&self) -> Option<(i32, i32)> {
        match self {
            Self::Point(x, y) => Some((*x, *y)),
            _ => None,
        }
    }

    /// Read as a size. No coercion.
    #[must_use]
    pub fn as_size(&self) -> Option<(u32, u32)> {
        match self {
            Self::Size(w, h) => Some((*w, *h)),
            _ => None,
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors surfaced by Keepsake's fallible infrastructure.
///
/// The traversal engine itself never returns these: per spec, leaf and
/// cascade failures are boolean signals with no store mutation. This enum
/// covers the parts that CAN fail hard - disk-backed stores, blob
/// encoding, tree construction with dangling parents.
#[derive(Debug, Error)]
pub enum KeepsakeError {
    /// The referenced widget is not part of the tree.
    #[error("Widget not found: {0:?}")]
    WidgetNotFound(WidgetId),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A deserialization error occurred.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================
