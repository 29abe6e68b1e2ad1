//! Translation of raw terminal keys into dialog input events

use crate::terminal::{Key, MouseButton, MouseEvent};

/// Input events the dialog layer understands
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// Left button pressed at a 1-based screen position
    MouseClick { row: u16, col: u16 },
    MouseRelease { row: u16, col: u16 },
    Char(char),
    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,
    Enter,
    Tab,
    ShiftTab,
    Escape,
    F1,
    CtrlC,
    Unknown,
}

impl From<Key> for InputEvent {
    fn from(key: Key) -> Self {
        match key {
            Key::Char(c) => Self::Char(c),
            Key::Enter => Self::Enter,
            Key::Escape => Self::Escape,
            Key::Tab => Self::Tab,
            Key::ShiftTab => Self::ShiftTab,
            Key::Up => Self::CursorUp,
            Key::Down => Self::CursorDown,
            Key::Left => Self::CursorLeft,
            Key::Right => Self::CursorRight,
            Key::F(1) => Self::F1,
            Key::Ctrl('c') => Self::CtrlC,
            Key::Mouse(MouseEvent { button: MouseButton::Left, row, col, pressed }) => {
                if pressed {
                    Self::MouseClick { row, col }
                } else {
                    Self::MouseRelease { row, col }
                }
            }
            _ => Self::Unknown,
        }
    }
}

/// Whether an event moves focus forward (`Some(true)`) or backward
///
/// Arrow keys cycle focus the same way Tab and Shift+Tab do.
pub fn focus_direction(event: &InputEvent) -> Option<bool> {
    match event {
        InputEvent::Tab | InputEvent::CursorDown | InputEvent::CursorRight => Some(true),
        InputEvent::ShiftTab | InputEvent::CursorUp | InputEvent::CursorLeft => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mouse(button: MouseButton, pressed: bool) -> Key {
        Key::Mouse(MouseEvent { button, row: 3, col: 7, pressed })
    }

    #[test]
    fn test_left_button_press_and_release() {
        assert_eq!(
            InputEvent::from(mouse(MouseButton::Left, true)),
            InputEvent::MouseClick { row: 3, col: 7 }
        );
        assert_eq!(
            InputEvent::from(mouse(MouseButton::Left, false)),
            InputEvent::MouseRelease { row: 3, col: 7 }
        );
    }

    #[test]
    fn test_other_buttons_and_keys_are_unknown() {
        assert_eq!(InputEvent::from(mouse(MouseButton::Other, true)), InputEvent::Unknown);
        assert_eq!(InputEvent::from(Key::F(3)), InputEvent::Unknown);
        assert_eq!(InputEvent::from(Key::Backspace), InputEvent::Unknown);
    }

    #[test]
    fn test_focus_direction() {
        assert_eq!(focus_direction(&InputEvent::Tab), Some(true));
        assert_eq!(focus_direction(&InputEvent::CursorLeft), Some(false));
        assert_eq!(focus_direction(&InputEvent::Enter), None);
    }
}
