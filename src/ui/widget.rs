//! What a widget reports back after seeing an input event

use crate::input::InputEvent;

#[derive(Clone, Debug, PartialEq)]
pub enum EventResult {
    /// Handled; nothing else should see the event
    Consumed,
    /// Not handled; the next widget may take it
    Ignored,
    /// The named control was activated
    Action(String),
    /// The named control was activated and its dialog should close
    Dismiss(String),
}

/// Screen position carried by a mouse event
pub fn mouse_position(event: &InputEvent) -> Option<(u16, u16)> {
    if let InputEvent::MouseClick { row, col } | InputEvent::MouseRelease { row, col } = event {
        Some((*row, *col))
    } else {
        None
    }
}
