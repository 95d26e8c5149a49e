//! Shared DOM value types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque element handle issued by a [`Document`](super::Document).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub i64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Rendered box of an element.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top edge.
    pub fn top(&self) -> f64 {
        self.y
    }

    /// Whether the box has any area at all.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Selection state carried by an `aria-checked` style attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Unchecked,
    Checked,
    Mixed,
}

impl CheckState {
    /// Interpret an `aria-checked` value. Missing or unknown values read as unchecked.
    pub fn from_aria(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("true") => CheckState::Checked,
            Some("mixed") => CheckState::Mixed,
            _ => CheckState::Unchecked,
        }
    }

    /// Checked or mixed: something is selected.
    pub fn has_selection(self) -> bool {
        !matches!(self, CheckState::Unchecked)
    }
}
