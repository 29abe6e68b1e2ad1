//! Color schemes for the dialog and its surroundings

use crate::terminal::Color;

/// Foreground and background of one kind of cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
}

const fn style(fg: Color, bg: Color) -> Style {
    Style { fg, bg }
}

/// Every color the UI draws with
#[derive(Clone, Debug)]
pub struct Theme {
    /// Dialog interior
    pub dialog: Style,
    pub border: Style,
    /// Whether the dialog casts a shadow onto the backdrop
    pub shadow: bool,
    pub button: Style,
    pub button_focused: Style,
    pub label: Style,
    /// Titles
    pub label_highlight: Style,
    pub separator: Style,
    /// Pattern filling the screen behind the dialog
    pub backdrop: Style,
    pub backdrop_char: char,
    /// Key hint row at the bottom
    pub hintbar: Style,
}

impl Theme {
    /// Light gray dialog over a blue backdrop
    pub fn classic_blue() -> Self {
        let panel = style(Color::Black, Color::LightGray);
        Self {
            dialog: panel,
            border: panel,
            shadow: true,
            button: panel,
            button_focused: style(Color::White, Color::Black),
            label: panel,
            label_highlight: style(Color::White, Color::LightGray),
            separator: panel,
            backdrop: style(Color::LightBlue, Color::Blue),
            backdrop_char: '░',
            hintbar: style(Color::Black, Color::Cyan),
        }
    }

    /// Black, white and yellow only
    pub fn high_contrast() -> Self {
        let panel = style(Color::White, Color::Black);
        let accent = style(Color::Yellow, Color::Black);
        Self {
            dialog: panel,
            border: accent,
            shadow: false,
            button: panel,
            button_focused: style(Color::Black, Color::Yellow),
            label: panel,
            label_highlight: accent,
            separator: accent,
            backdrop: style(Color::DarkGray, Color::Black),
            backdrop_char: ' ',
            hintbar: style(Color::Black, Color::White),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic_blue()
    }
}
