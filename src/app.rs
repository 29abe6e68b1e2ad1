//! Main application module

use std::cell::Cell;
use std::io;
use std::rc::Rc;

use tracing::{debug, info};

use crate::config::Config;
use crate::input::InputEvent;
use crate::screen::Screen;
use crate::speech::Narrator;
use crate::terminal::Terminal;
use crate::ui::dialogs::welcome::{Destination, DestinationCallback, WelcomeModal, REPLAY_SHORTCUT};
use crate::ui::modal::{DialogPrimitive, ModalHost};
use crate::ui::theme::Theme;

/// Key hints shown on the bottom row
pub const HINTS: &str = " F1 Replay instructions · Tab Move · Enter Select · Esc Close";

/// Main application
pub struct App {
    terminal: Terminal,
    screen: Screen,
    theme: Theme,
    host: Rc<ModalHost>,
    modal: WelcomeModal,
    /// Destination recorded by whichever callback ran
    outcome: Rc<Cell<Option<Destination>>>,
}

impl App {
    pub fn new(config: &Config, narrator: Rc<dyn Narrator>) -> io::Result<Self> {
        let terminal = Terminal::new()?;
        let (width, height) = terminal.size();
        let screen = Screen::new(width, height);
        let theme = config.theme.theme();

        let host = Rc::new(ModalHost::new(theme.clone()));
        host.set_screen_size(width, height);
        host.bind_shortcut(InputEvent::F1, REPLAY_SHORTCUT);

        let outcome = Rc::new(Cell::new(None));
        let modal = WelcomeModal::new(
            record_destination(&outcome, Destination::Tutorial),
            record_destination(&outcome, Destination::Game),
            host.clone(),
            narrator,
        );

        Ok(Self {
            terminal,
            screen,
            theme,
            host,
            modal,
            outcome,
        })
    }

    /// Show the welcome dialog and run until it closes.
    ///
    /// Returns the destination the player ended up with.
    pub fn run(&mut self) -> io::Result<Option<Destination>> {
        self.modal.init();

        while self.host.is_open(self.modal.id()) {
            self.terminal.update_size();
            let (width, height) = self.terminal.size();
            if (width, height) != self.screen.size() {
                debug!(width, height, "terminal resized");
                self.screen.resize(width, height);
                self.screen.invalidate();
                self.host.set_screen_size(width, height);
            }

            self.draw();
            self.screen.flush(&mut self.terminal)?;

            // Drain all pending input before the next draw
            let mut had_input = false;
            while let Some(key) = self.terminal.read_key()? {
                had_input = true;
                route_input(&self.host, self.modal.id(), InputEvent::from(key));
                if !self.host.is_open(self.modal.id()) {
                    break;
                }
            }

            if !had_input {
                std::thread::sleep(std::time::Duration::from_millis(10));
            }
        }

        Ok(self.outcome.get())
    }

    fn draw(&mut self) {
        draw_backdrop(&mut self.screen, &self.theme);
        self.host.draw(&mut self.screen);
        draw_hint_bar(&mut self.screen, &self.theme);
    }
}

/// Send an event to the dialog host. Ctrl-C dismisses the dialog `id`,
/// which takes the same path as Escape.
fn route_input(host: &ModalHost, id: &str, event: InputEvent) {
    if event == InputEvent::CtrlC {
        info!(dialog = %id, "interrupted, dismissing dialog");
        host.hide(id);
        return;
    }
    host.handle_event(&event);
}

/// Destination callback that stores its destination in `outcome`
fn record_destination(outcome: &Rc<Cell<Option<Destination>>>, destination: Destination) -> DestinationCallback {
    let outcome = Rc::clone(outcome);
    Box::new(move || {
        info!(%destination, "destination selected");
        outcome.set(Some(destination));
    })
}

fn draw_backdrop(screen: &mut Screen, theme: &Theme) {
    screen.clear_with(theme.backdrop_char, theme.backdrop.fg, theme.backdrop.bg);
}

fn draw_hint_bar(screen: &mut Screen, theme: &Theme) {
    let (width, height) = screen.size();
    if height == 0 {
        return;
    }
    screen.fill(height, 1, width, 1, ' ', theme.hintbar.fg, theme.hintbar.bg);
    screen.write_str(height, 1, HINTS, theme.hintbar.fg, theme.hintbar.bg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::SilentNarrator;
    use crate::ui::dialogs::welcome::Lifecycle;

    #[test]
    fn test_recorded_destination() {
        let outcome = Rc::new(Cell::new(None));
        let mut tutorial = record_destination(&outcome, Destination::Tutorial);
        assert_eq!(outcome.get(), None);
        tutorial();
        assert_eq!(outcome.get(), Some(Destination::Tutorial));
    }

    #[test]
    fn test_ctrl_c_dismisses_to_game() {
        let host = Rc::new(ModalHost::new(Theme::classic_blue()));
        let outcome = Rc::new(Cell::new(None));
        let game_calls = Rc::new(Cell::new(0));

        let calls = Rc::clone(&game_calls);
        let mut record_game = record_destination(&outcome, Destination::Game);
        let modal = WelcomeModal::new(
            record_destination(&outcome, Destination::Tutorial),
            Box::new(move || {
                calls.set(calls.get() + 1);
                record_game();
            }),
            host.clone(),
            Rc::new(SilentNarrator::new()),
        );
        modal.init();

        route_input(&host, modal.id(), InputEvent::Tab);
        assert!(host.is_open(modal.id()), "other keys go to the dialog");

        route_input(&host, modal.id(), InputEvent::CtrlC);
        assert!(!host.is_open(modal.id()));
        assert_eq!(game_calls.get(), 1);
        assert_eq!(outcome.get(), Some(Destination::Game));
        assert_eq!(modal.lifecycle(), Lifecycle::Closed(Destination::Game));

        route_input(&host, modal.id(), InputEvent::CtrlC);
        assert_eq!(game_calls.get(), 1, "a closed dialog does not run the game again");
    }

    #[test]
    fn test_hint_bar_on_last_row() {
        let theme = Theme::classic_blue();
        let mut screen = Screen::new(80, 25);
        draw_backdrop(&mut screen, &theme);
        draw_hint_bar(&mut screen, &theme);

        let row: String = (1..=80)
            .filter_map(|col| screen.get(25, col).map(|c| c.ch))
            .collect();
        assert!(row.starts_with(HINTS));
        assert_eq!(screen.get(24, 1).map(|c| c.ch), Some(theme.backdrop_char));
        assert_eq!(screen.get(25, 80).map(|c| c.bg), Some(theme.hintbar.bg));
    }
}
