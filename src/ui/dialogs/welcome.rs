//! Welcome dialog.
//!
//! Greets a new player and sends them either to the tutorial or straight
//! into the game. The dialog reads itself aloud when it opens and again on
//! request.
//!
//! Exactly one destination callback runs per dialog, whichever way it is
//! closed:
//!
//! - picking a destination button hides the dialog, then runs that
//!   destination's callback;
//! - dismissing the dialog any other way (close control, Escape, a click
//!   on the overlay) runs the game callback.
//!
//! Narration is cancelled whenever the dialog hides or focus leaves the
//! close control, and before every replay.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, info, warn};

use crate::speech::Narrator;
use crate::ui::modal::{DialogHost, DialogPrimitive, DialogSurface, Handler, DIALOG_WIDTH};
use crate::ui::widget_tree::WidgetNode;
use crate::ui::widgets::{Button, HRule, Label, Spacer};

/// Region id used when none is given
pub const WELCOME_DIALOG_ID: &str = "welcome_modal";

pub const CLOSE_CONTROL: &str = "close";
pub const TUTORIAL_CONTROL: &str = "tutorial";
pub const GAME_CONTROL: &str = "game";
pub const REPLAY_CONTROL: &str = "replay";
/// Page-level replay control, outside the dialog content
pub const REPLAY_SHORTCUT: &str = "replay_shortcut";

pub const TITLE: &str = "Welcome To Blockly Games Music!";
pub const BODY: &str = "Use the tab key to cycle through your options. \
                        If you have never played before we recommend you start with the tutorial.";

/// Where the player goes once the dialog closes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Destination {
    Tutorial,
    Game,
}

impl Destination {
    pub fn as_str(self) -> &'static str {
        match self {
            Destination::Tutorial => "tutorial",
            Destination::Game => "game",
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the dialog is in its single-use life
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Open,
    /// A destination button was picked and the dialog is being hidden
    ClosingViaChoice(Destination),
    Closed(Destination),
}

pub type DestinationCallback = Box<dyn FnMut()>;

/// State shared with the handlers registered on the host
struct Shared {
    id: String,
    lifecycle: Cell<Lifecycle>,
    tutorial: RefCell<DestinationCallback>,
    game: RefCell<DestinationCallback>,
    host: Weak<dyn DialogHost>,
    narrator: Rc<dyn Narrator>,
}

impl Shared {
    fn replay(&self) {
        let Some(host) = self.host.upgrade() else {
            return;
        };
        debug!(dialog = %self.id, "replaying narration");
        self.narrator.cancel();
        self.narrator.speak(&host.narration(&self.id));
    }

    fn choose_destination(&self, destination: Destination) {
        let state = self.lifecycle.get();
        if state != Lifecycle::Open {
            debug!(dialog = %self.id, ?state, %destination, "ignoring destination click");
            return;
        }

        info!(dialog = %self.id, %destination, "destination chosen");
        self.lifecycle.set(Lifecycle::ClosingViaChoice(destination));
        if let Some(host) = self.host.upgrade() {
            host.hide(&self.id);
        }
        self.invoke(destination);
    }

    fn on_hidden(&self) {
        self.narrator.cancel();
        match self.lifecycle.get() {
            Lifecycle::Open => {
                info!(dialog = %self.id, "dismissed, continuing to the game");
                self.lifecycle.set(Lifecycle::Closed(Destination::Game));
                self.invoke(Destination::Game);
            }
            Lifecycle::ClosingViaChoice(destination) => {
                self.lifecycle.set(Lifecycle::Closed(destination));
            }
            state => debug!(dialog = %self.id, ?state, "hide outside an open dialog"),
        }
    }

    fn invoke(&self, destination: Destination) {
        let callback = match destination {
            Destination::Tutorial => &self.tutorial,
            Destination::Game => &self.game,
        };
        let mut callback = callback.borrow_mut();
        (*callback)();
    }
}

/// Controller for the welcome dialog.
///
/// Single use: `init()` opens the dialog once. The controller does no
/// drawing or input handling itself; it registers handlers with its
/// [`DialogHost`] and reacts when they fire.
pub struct WelcomeModal {
    shared: Rc<Shared>,
    host: Rc<dyn DialogHost>,
}

impl WelcomeModal {
    pub fn new(
        tutorial: DestinationCallback,
        game: DestinationCallback,
        host: Rc<dyn DialogHost>,
        narrator: Rc<dyn Narrator>,
    ) -> Self {
        Self::with_id(WELCOME_DIALOG_ID, tutorial, game, host, narrator)
    }

    pub fn with_id(
        id: impl Into<String>,
        tutorial: DestinationCallback,
        game: DestinationCallback,
        host: Rc<dyn DialogHost>,
        narrator: Rc<dyn Narrator>,
    ) -> Self {
        let shared = Rc::new(Shared {
            id: id.into(),
            lifecycle: Cell::new(Lifecycle::Uninitialized),
            tutorial: RefCell::new(tutorial),
            game: RefCell::new(game),
            host: Rc::downgrade(&host),
            narrator,
        });
        Self { shared, host }
    }

    pub fn id(&self) -> &str {
        &self.shared.id
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.shared.lifecycle.get()
    }

    /// Render, show and narrate the dialog, and wire up its controls.
    pub fn init(&self) {
        let state = self.lifecycle();
        if state != Lifecycle::Uninitialized {
            warn!(dialog = %self.id(), ?state, "welcome dialog already initialised");
            return;
        }

        let id = self.id();
        self.host.render(id, build_content());
        self.host.on_click(id, REPLAY_SHORTCUT, self.handler(Shared::replay));
        self.host.on_blur(id, CLOSE_CONTROL, self.handler(|shared| shared.narrator.cancel()));

        self.host.show(id, self.handler(Shared::on_hidden));
        self.shared.lifecycle.set(Lifecycle::Open);
        info!(dialog = %id, "welcome dialog open");

        self.host.on_click(id, REPLAY_CONTROL, self.handler(Shared::replay));
        self.shared.narrator.speak(&self.host.narration(id));

        self.register_tutorial_button();
        self.register_game_button();
    }

    /// Send the player to the tutorial when its button is picked
    pub fn register_tutorial_button(&self) {
        self.host.on_click(
            self.id(),
            TUTORIAL_CONTROL,
            self.handler(|shared| shared.choose_destination(Destination::Tutorial)),
        );
    }

    /// Send the player to the game when its button is picked
    pub fn register_game_button(&self) {
        self.host.on_click(
            self.id(),
            GAME_CONTROL,
            self.handler(|shared| shared.choose_destination(Destination::Game)),
        );
    }

    fn handler(&self, f: impl Fn(&Shared) + 'static) -> Handler {
        let shared = Rc::clone(&self.shared);
        Rc::new(move || f(&shared))
    }
}

/// Static content of the welcome dialog
pub fn build_content() -> WidgetNode {
    // Box border plus root padding on each side
    let text_width = DIALOG_WIDTH - 4;

    WidgetNode::vstack("root")
        .padding(1)
        .child(
            WidgetNode::hstack("header")
                .leaf("title", Label::new(TITLE).centered().highlighted())
                .leaf(
                    CLOSE_CONTROL,
                    Button::new("[x]", CLOSE_CONTROL)
                        .with_brackets(false)
                        .accessible_label("Close modal")
                        .dismisses_dialog(),
                )
                .build(),
        )
        .child(WidgetNode::leaf("spacer1", Spacer::fixed(1)))
        .leaf("body", Label::wrapped(BODY, text_width))
        .child(WidgetNode::leaf("spacer2", Spacer::fixed(1)))
        .child(WidgetNode::leaf("hr", HRule::t_connector()))
        .child(
            WidgetNode::hstack("footer")
                .spacing(1)
                .child(WidgetNode::leaf("fl", Spacer::new()))
                .leaf(TUTORIAL_CONTROL, Button::new("Go to the tutorial", TUTORIAL_CONTROL))
                .leaf(GAME_CONTROL, Button::new("Go to the game", GAME_CONTROL))
                .leaf(REPLAY_CONTROL, Button::new("Replay Instructions", REPLAY_CONTROL))
                .child(WidgetNode::leaf("fr", Spacer::new()))
                .build(),
        )
        .build()
}
