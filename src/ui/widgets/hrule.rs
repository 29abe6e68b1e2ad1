//! Separator line joined to the dialog border

use crate::input::InputEvent;
use crate::screen::Screen;
use crate::ui::layout::{Rect, SizeHint};
use crate::ui::theme::{Style, Theme};
use crate::ui::widget::EventResult;
use crate::ui::widget_tree::TreeWidget;

/// One row of `─` whose ends become `├` and `┤` on the border columns
/// just outside its bounds
#[derive(Clone, Debug, Default)]
pub struct HRule;

impl HRule {
    pub fn t_connector() -> Self {
        Self
    }
}

impl TreeWidget for HRule {
    fn draw(&self, screen: &mut Screen, bounds: Rect, theme: &Theme) {
        if bounds.width == 0 || bounds.x == 0 {
            return;
        }
        let Style { fg, bg } = theme.separator;
        let right = bounds.x + bounds.width;

        for col in bounds.x - 1..=right {
            let ch = match col {
                c if c < bounds.x => '├',
                c if c == right => '┤',
                _ => '─',
            };
            screen.set(bounds.y, col, ch, fg, bg);
        }
    }

    fn handle_event(&mut self, _event: &InputEvent, _bounds: Rect) -> EventResult {
        EventResult::Ignored
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint { min_width: 1, min_height: 1, flex: 0 }
    }

    fn wants_full_bleed(&self) -> bool {
        true
    }
}
