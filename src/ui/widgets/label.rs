//! Text labels

use crate::input::InputEvent;
use crate::screen::Screen;
use crate::ui::layout::{Rect, SizeHint};
use crate::ui::theme::{Style, Theme};
use crate::ui::widget::EventResult;
use crate::ui::widget_tree::TreeWidget;

/// Static text, one row per line
///
/// [`Label::wrapped`] breaks long text at a fixed column width so the
/// layout reserves one row for each wrapped line.
#[derive(Clone, Debug)]
pub struct Label {
    /// Unwrapped text, used for narration
    text: String,
    lines: Vec<String>,
    centered: bool,
    highlight: bool,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::from_lines(vec![text.clone()], text)
    }

    pub fn wrapped(text: impl Into<String>, width: u16) -> Self {
        let text = text.into();
        Self::from_lines(wrap_words(&text, usize::from(width)), text)
    }

    fn from_lines(lines: Vec<String>, text: String) -> Self {
        Self { text, lines, centered: false, highlight: false }
    }

    pub fn centered(mut self) -> Self {
        self.centered = true;
        self
    }

    /// Draw with the theme's title colors
    pub fn highlighted(mut self) -> Self {
        self.highlight = true;
        self
    }
}

/// Greedy word wrap; words longer than the width are split
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            lines.push(word.drain(..width).collect());
        }
        let word: String = word.into_iter().collect();
        if word.is_empty() {
            continue;
        }

        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

impl TreeWidget for Label {
    fn draw(&self, screen: &mut Screen, bounds: Rect, theme: &Theme) {
        let Style { fg, bg } = if self.highlight { theme.label_highlight } else { theme.label };

        for (row, line) in (bounds.y..).zip(self.lines.iter().take(usize::from(bounds.height))) {
            let shown: String = line.chars().take(usize::from(bounds.width)).collect();
            let indent = if self.centered {
                bounds.width.saturating_sub(shown.chars().count() as u16) / 2
            } else {
                0
            };
            screen.write_str(row, bounds.x + indent, &shown, fg, bg);
        }
    }

    fn handle_event(&mut self, _event: &InputEvent, _bounds: Rect) -> EventResult {
        EventResult::Ignored
    }

    fn size_hint(&self) -> SizeHint {
        let widest = self.lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        SizeHint {
            min_width: widest as u16,
            min_height: self.lines.len() as u16,
            flex: 0,
        }
    }

    fn accessible_text(&self) -> Option<String> {
        Some(self.text.trim())
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    }
}
