//! Synthetic pointer events.

use serde::Serialize;

/// DOM mouse event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseEventKind {
    MouseDown,
    Click,
    MouseUp,
}

impl MouseEventKind {
    /// DOM event type string.
    pub fn as_str(self) -> &'static str {
        match self {
            MouseEventKind::MouseDown => "mousedown",
            MouseEventKind::Click => "click",
            MouseEventKind::MouseUp => "mouseup",
        }
    }
}

/// Init dictionary of a synthetic `MouseEvent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyntheticMouseEvent {
    #[serde(rename = "type")]
    pub kind: MouseEventKind,
    pub bubbles: bool,
    pub cancelable: bool,
    /// Pressed-buttons bitmask; 1 is the primary button.
    pub buttons: u16,
}

impl SyntheticMouseEvent {
    /// Bubbling, cancelable event with the primary button held.
    pub fn primary(kind: MouseEventKind) -> Self {
        Self {
            kind,
            bubbles: true,
            cancelable: true,
            buttons: 1,
        }
    }
}
