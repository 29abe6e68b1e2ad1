//! Focusable push button

use crate::input::InputEvent;
use crate::screen::Screen;
use crate::ui::layout::{Rect, SizeHint};
use crate::ui::theme::{Style, Theme};
use crate::ui::widget::{mouse_position, EventResult};
use crate::ui::widget_tree::TreeWidget;

/// A button that reports its control name when pressed
///
/// Pressing means Enter or Space while focused, or a left click inside
/// its bounds. A button built with [`Button::dismisses_dialog`] reports
/// [`EventResult::Dismiss`] so the host also hides the dialog.
pub struct Button {
    caption: String,
    /// Announced instead of the caption, for icon-like captions such as `[x]`
    spoken: Option<String>,
    control: String,
    focused: bool,
    dismisses: bool,
    /// Draw as `< caption >`
    bracketed: bool,
}

impl Button {
    pub fn new(caption: impl Into<String>, control: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            spoken: None,
            control: control.into(),
            focused: false,
            dismisses: false,
            bracketed: true,
        }
    }

    pub fn with_brackets(mut self, bracketed: bool) -> Self {
        self.bracketed = bracketed;
        self
    }

    pub fn accessible_label(mut self, label: impl Into<String>) -> Self {
        self.spoken = Some(label.into());
        self
    }

    pub fn dismisses_dialog(mut self) -> Self {
        self.dismisses = true;
        self
    }

    /// Text as drawn on screen
    fn face(&self) -> String {
        if self.bracketed {
            format!("< {} >", self.caption)
        } else {
            self.caption.clone()
        }
    }

    fn press(&self) -> EventResult {
        let control = self.control.clone();
        if self.dismisses {
            EventResult::Dismiss(control)
        } else {
            EventResult::Action(control)
        }
    }
}

impl TreeWidget for Button {
    fn draw(&self, screen: &mut Screen, bounds: Rect, theme: &Theme) {
        if bounds.height == 0 {
            return;
        }
        let Style { fg, bg } = if self.focused { theme.button_focused } else { theme.button };
        let face: String = self.face().chars().take(usize::from(bounds.width)).collect();
        screen.write_str(bounds.y, bounds.x, &face, fg, bg);
    }

    fn handle_event(&mut self, event: &InputEvent, bounds: Rect) -> EventResult {
        let pressed = match event {
            InputEvent::Enter | InputEvent::Char(' ') => self.focused,
            InputEvent::MouseClick { .. } => {
                mouse_position(event).is_some_and(|(row, col)| bounds.contains(row, col))
            }
            _ => false,
        };
        if pressed {
            self.press()
        } else {
            EventResult::Ignored
        }
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint {
            min_width: self.face().chars().count() as u16,
            min_height: 1,
            flex: 0,
        }
    }

    fn focusable(&self) -> bool {
        true
    }

    fn set_focus(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn wants_tight_width(&self) -> bool {
        true
    }

    fn accessible_text(&self) -> Option<String> {
        let name = self.spoken.as_ref().unwrap_or(&self.caption);
        Some(format!("{name}, button"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_press_only_when_focused() {
        let mut button = Button::new("Go", "go");
        let bounds = Rect::new(1, 1, 6, 1);
        assert_eq!(button.handle_event(&InputEvent::Enter, bounds), EventResult::Ignored);

        button.set_focus(true);
        assert_eq!(button.handle_event(&InputEvent::Enter, bounds), EventResult::Action("go".into()));
        assert_eq!(button.handle_event(&InputEvent::Char(' '), bounds), EventResult::Action("go".into()));
        assert_eq!(button.handle_event(&InputEvent::Char('g'), bounds), EventResult::Ignored);
    }

    #[test]
    fn test_click_presses_without_focus() {
        let mut button = Button::new("x", "close").with_brackets(false).dismisses_dialog();
        let result = button.handle_event(&InputEvent::MouseClick { row: 1, col: 1 }, Rect::new(1, 1, 1, 1));
        assert_eq!(result, EventResult::Dismiss("close".into()));
    }

    #[test]
    fn test_click_elsewhere_or_release_is_ignored() {
        let mut button = Button::new("Go", "go");
        let bounds = Rect::new(1, 1, 6, 1);
        assert_eq!(button.handle_event(&InputEvent::MouseClick { row: 2, col: 1 }, bounds), EventResult::Ignored);
        assert_eq!(button.handle_event(&InputEvent::MouseRelease { row: 1, col: 1 }, bounds), EventResult::Ignored);
    }

    #[test]
    fn test_width_and_spoken_name() {
        let button = Button::new("Go", "go");
        assert_eq!(button.size_hint().min_width, 6);

        let close = Button::new("[x]", "close").with_brackets(false).accessible_label("Close modal");
        assert_eq!(close.size_hint().min_width, 3);
        assert_eq!(close.accessible_text().as_deref(), Some("Close modal, button"));
    }
}
