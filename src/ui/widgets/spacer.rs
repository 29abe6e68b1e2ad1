//! Spacer widget - empty space between other widgets

use crate::input::InputEvent;
use crate::screen::Screen;
use crate::ui::layout::{Rect, SizeHint};
use crate::ui::theme::Theme;
use crate::ui::widget::EventResult;
use crate::ui::widget_tree::TreeWidget;

/// Blank space in a stack
///
/// `Fixed(n)` is an `n`-cell gap. `Fill` soaks up leftover space, which
/// centers whatever sits between two of them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Spacer {
    Fixed(u16),
    #[default]
    Fill,
}

impl Spacer {
    pub fn new() -> Self {
        Spacer::Fill
    }

    pub fn fixed(size: u16) -> Self {
        Spacer::Fixed(size)
    }
}

impl TreeWidget for Spacer {
    fn draw(&self, _screen: &mut Screen, _bounds: Rect, _theme: &Theme) {}

    fn handle_event(&mut self, _event: &InputEvent, _bounds: Rect) -> EventResult {
        EventResult::Ignored
    }

    fn size_hint(&self) -> SizeHint {
        match *self {
            Spacer::Fixed(n) => SizeHint { min_width: n, min_height: n, flex: 0 },
            Spacer::Fill => SizeHint { min_width: 0, min_height: 0, flex: 1 },
        }
    }

    fn wants_tight_width(&self) -> bool {
        matches!(self, Spacer::Fixed(_))
    }
}
