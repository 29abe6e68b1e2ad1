//! Modal dialog hosting
//!
//! A dialog region is a widget tree that can be shown over the rest of the
//! screen. While a region is shown it is the active dialog: it captures all
//! input, keeps focus inside its own controls and dismisses itself on
//! Escape or on a click outside its box.
//!
//! Owners of a dialog never touch the widget tree directly. They talk to
//! the host through two traits:
//!
//! | Trait               | Concern                                        |
//! |---------------------|------------------------------------------------|
//! | [`DialogPrimitive`] | show and hide a region, hide notification      |
//! | [`DialogSurface`]   | content, click and blur handlers, narration    |
//!
//! Handlers are reference counted closures. The host never holds a borrow
//! of its own state while a handler runs, so handlers may call back into
//! the host (a click handler hiding its own dialog, for example).

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::input::InputEvent;
use crate::screen::Screen;
use crate::speech::Narration;
use super::layout::Rect;
use super::theme::Theme;
use super::widget::EventResult;
use super::widget_tree::{FocusChange, WidgetNode, WidgetTree};

/// Outer width of a dialog box, border included
pub const DIALOG_WIDTH: u16 = 72;

/// Callback registered with the host
pub type Handler = Rc<dyn Fn()>;

/// Showing and hiding dialog regions
pub trait DialogPrimitive {
    /// Make the region visible and active. `on_hide` runs once when the
    /// region is next hidden, whatever the cause.
    fn show(&self, id: &str, on_hide: Handler);

    /// Hide the region. A no-op when it is not visible.
    fn hide(&self, id: &str);

    fn is_open(&self, id: &str) -> bool;
}

/// Content and events of dialog regions
pub trait DialogSurface {
    /// Install the region's content, replacing anything rendered before
    fn render(&self, id: &str, content: WidgetNode);

    /// Run `handler` whenever `control` is activated
    fn on_click(&self, id: &str, control: &str, handler: Handler);

    /// Run `handler` whenever `control` loses focus
    fn on_blur(&self, id: &str, control: &str, handler: Handler);

    /// Accessible text of the region's content in document order
    fn narration(&self, id: &str) -> Narration;
}

/// Everything a dialog owner needs from its host
pub trait DialogHost: DialogPrimitive + DialogSurface {}

impl<T: DialogPrimitive + DialogSurface> DialogHost for T {}

#[derive(Default)]
struct Region {
    tree: Option<WidgetTree>,
    visible: bool,
    on_hide: Option<Handler>,
    click_handlers: Vec<(String, Handler)>,
    blur_handlers: Vec<(String, Handler)>,
}

/// Terminal implementation of the dialog traits
pub struct ModalHost {
    regions: RefCell<HashMap<String, Region>>,
    active: RefCell<Option<String>>,
    /// Keys that activate a control from anywhere while a dialog is open
    shortcuts: RefCell<Vec<(InputEvent, String)>>,
    theme: Theme,
    screen_size: Cell<(u16, u16)>,
}

impl ModalHost {
    pub fn new(theme: Theme) -> Self {
        Self {
            regions: RefCell::new(HashMap::new()),
            active: RefCell::new(None),
            shortcuts: RefCell::new(Vec::new()),
            theme,
            screen_size: Cell::new((80, 25)),
        }
    }

    /// Update screen size for centering
    pub fn set_screen_size(&self, width: u16, height: u16) {
        self.screen_size.set((width, height));
    }

    /// Bind a key to a control that lives outside the dialog content.
    /// Pressing it while a dialog is open raises a click for that control.
    pub fn bind_shortcut(&self, key: InputEvent, control: impl Into<String>) {
        self.shortcuts.borrow_mut().push((key, control.into()));
    }

    /// Id of the dialog currently capturing input
    pub fn active_dialog(&self) -> Option<String> {
        self.active.borrow().clone()
    }

    /// Route an input event to the active dialog.
    ///
    /// Returns false when no dialog is open and the event was not used.
    pub fn handle_event(&self, event: &InputEvent) -> bool {
        let Some(id) = self.active_dialog() else {
            return false;
        };

        let shortcut = self
            .shortcuts
            .borrow()
            .iter()
            .find(|(key, _)| key == event)
            .map(|(_, control)| control.clone());
        if let Some(control) = shortcut {
            self.fire_click(&id, &control);
            return true;
        }

        let Some(dialog) = self.dialog_rect(&id) else {
            return true;
        };

        match event {
            InputEvent::Escape => {
                debug!(dialog = %id, "dismissed with escape");
                self.hide(&id);
                return true;
            }
            InputEvent::MouseClick { row, col } if !dialog.contains(*row, *col) => {
                debug!(dialog = %id, "dismissed by overlay click");
                self.hide(&id);
                return true;
            }
            _ => {}
        }

        let (result, changes) = {
            let mut regions = self.regions.borrow_mut();
            match regions.get_mut(&id).and_then(|r| r.tree.as_mut()) {
                Some(tree) => {
                    let result = tree.handle_event(event, dialog.inset(1));
                    (result, tree.take_focus_changes())
                }
                None => (EventResult::Ignored, Vec::new()),
            }
        };
        self.report_focus_changes(&id, changes);

        match result {
            EventResult::Action(control) => self.fire_click(&id, &control),
            EventResult::Dismiss(control) => {
                self.fire_click(&id, &control);
                self.hide(&id);
            }
            EventResult::Consumed | EventResult::Ignored => {}
        }
        true
    }

    /// Draw the active dialog with its border and shadow
    pub fn draw(&self, screen: &mut Screen) {
        let Some(id) = self.active_dialog() else {
            return;
        };
        let Some(rect) = self.dialog_rect(&id) else {
            return;
        };

        let regions = self.regions.borrow();
        let Some(tree) = regions.get(&id).and_then(|r| r.tree.as_ref()) else {
            return;
        };
        let theme = tree.theme();

        if theme.shadow {
            screen.draw_shadow(rect.y, rect.x, rect.width, rect.height);
        }
        screen.fill(rect.y, rect.x, rect.width, rect.height, ' ', theme.dialog.fg, theme.dialog.bg);
        screen.draw_box(
            rect.y,
            rect.x,
            rect.width,
            rect.height,
            theme.border.fg,
            theme.border.bg,
        );
        tree.draw(screen, rect.inset(1));
    }

    /// Screen rectangle of a region's box, border included
    fn dialog_rect(&self, id: &str) -> Option<Rect> {
        let regions = self.regions.borrow();
        let tree = regions.get(id)?.tree.as_ref()?;
        let (width, height) = self.screen_size.get();
        Some(Rect::new(1, 1, width, height).centered(DIALOG_WIDTH, tree.natural_height() + 2))
    }

    fn fire_click(&self, id: &str, control: &str) {
        let handlers = self.handlers_for(id, control, |r| &r.click_handlers);
        if handlers.is_empty() {
            debug!(dialog = %id, control, "click with no handler");
        }
        for handler in handlers {
            handler();
        }
    }

    fn report_focus_changes(&self, id: &str, changes: Vec<FocusChange>) {
        for change in changes {
            match change {
                FocusChange::Focus(control) => debug!(dialog = %id, %control, "focus"),
                FocusChange::Blur(control) => {
                    debug!(dialog = %id, %control, "blur");
                    for handler in self.handlers_for(id, &control, |r| &r.blur_handlers) {
                        handler();
                    }
                }
            }
        }
    }

    /// Clone the matching handlers so no borrow is held while they run
    fn handlers_for(
        &self,
        id: &str,
        control: &str,
        list: impl Fn(&Region) -> &Vec<(String, Handler)>,
    ) -> Vec<Handler> {
        let regions = self.regions.borrow();
        regions
            .get(id)
            .map(|region| {
                list(region)
                    .iter()
                    .filter(|(name, _)| name == control)
                    .map(|(_, handler)| Rc::clone(handler))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl DialogPrimitive for ModalHost {
    fn show(&self, id: &str, on_hide: Handler) {
        let changes = {
            let mut regions = self.regions.borrow_mut();
            let region = regions.entry(id.to_string()).or_default();
            region.visible = true;
            region.on_hide = Some(on_hide);
            match region.tree.as_mut() {
                Some(tree) => {
                    tree.clear_focus();
                    tree.focus_next();
                    debug!(dialog = %id, focus = ?tree.focused_id(), "initial focus");
                    tree.take_focus_changes()
                }
                None => {
                    warn!(dialog = %id, "showing a dialog with no content");
                    Vec::new()
                }
            }
        };
        *self.active.borrow_mut() = Some(id.to_string());
        debug!(dialog = %id, "shown");
        self.report_focus_changes(id, changes);
    }

    fn hide(&self, id: &str) {
        let (on_hide, changes) = {
            let mut regions = self.regions.borrow_mut();
            let Some(region) = regions.get_mut(id) else {
                return;
            };
            if !region.visible {
                return;
            }
            region.visible = false;
            let changes = match region.tree.as_mut() {
                Some(tree) => {
                    tree.clear_focus();
                    tree.take_focus_changes()
                }
                None => Vec::new(),
            };
            (region.on_hide.take(), changes)
        };

        {
            let mut active = self.active.borrow_mut();
            if active.as_deref() == Some(id) {
                *active = None;
            }
        }
        debug!(dialog = %id, "hidden");

        self.report_focus_changes(id, changes);
        if let Some(handler) = on_hide {
            handler();
        }
    }

    fn is_open(&self, id: &str) -> bool {
        self.regions.borrow().get(id).map_or(false, |r| r.visible)
    }
}

impl DialogSurface for ModalHost {
    fn render(&self, id: &str, content: WidgetNode) {
        debug!(dialog = %id, root = content.id(), "content rendered");
        let tree = WidgetTree::with_theme(content, self.theme.clone());
        self.regions
            .borrow_mut()
            .entry(id.to_string())
            .or_default()
            .tree = Some(tree);
    }

    fn on_click(&self, id: &str, control: &str, handler: Handler) {
        self.regions
            .borrow_mut()
            .entry(id.to_string())
            .or_default()
            .click_handlers
            .push((control.to_string(), handler));
    }

    fn on_blur(&self, id: &str, control: &str, handler: Handler) {
        self.regions
            .borrow_mut()
            .entry(id.to_string())
            .or_default()
            .blur_handlers
            .push((control.to_string(), handler));
    }

    fn narration(&self, id: &str) -> Narration {
        let regions = self.regions.borrow();
        let utterances = regions
            .get(id)
            .and_then(|r| r.tree.as_ref())
            .map(WidgetTree::narration)
            .unwrap_or_default();
        Narration::new(utterances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::widgets::{Button, Label};

    const ID: &str = "dialog";

    fn content() -> WidgetNode {
        WidgetNode::vstack("root")
            .padding(1)
            .child(
                WidgetNode::hstack("header")
                    .leaf("title", Label::new("Title"))
                    .leaf(
                        "close",
                        Button::new("x", "close")
                            .with_brackets(false)
                            .accessible_label("Close dialog")
                            .dismisses_dialog(),
                    )
                    .build(),
            )
            .leaf("body", Label::new("Body"))
            .child(
                WidgetNode::hstack("buttons")
                    .leaf("one", Button::new("One", "one"))
                    .leaf("two", Button::new("Two", "two"))
                    .build(),
            )
            .build()
    }

    /// Host with one shown dialog and a log of everything that happened
    fn setup() -> (Rc<ModalHost>, Rc<RefCell<Vec<String>>>) {
        let host = Rc::new(ModalHost::new(Theme::classic_blue()));
        let log = Rc::new(RefCell::new(Vec::new()));
        host.render(ID, content());
        for control in ["close", "one", "two"] {
            let l = log.clone();
            host.on_click(ID, control, Rc::new(move || l.borrow_mut().push(format!("click {}", control))));
            let l = log.clone();
            host.on_blur(ID, control, Rc::new(move || l.borrow_mut().push(format!("blur {}", control))));
        }
        let l = log.clone();
        host.show(ID, Rc::new(move || l.borrow_mut().push("hidden".to_string())));
        (host, log)
    }

    fn focused(host: &ModalHost) -> Option<String> {
        host.regions
            .borrow()
            .get(ID)
            .and_then(|r| r.tree.as_ref())
            .and_then(|t| t.focused_id().map(str::to_string))
    }

    #[test]
    fn test_show_focuses_first_control() {
        let (host, _) = setup();
        assert!(host.is_open(ID));
        assert_eq!(host.active_dialog().as_deref(), Some(ID));
        assert_eq!(focused(&host).as_deref(), Some("close"));
    }

    #[test]
    fn test_tab_stays_inside_dialog_and_reports_blur() {
        let (host, log) = setup();
        for _ in 0..3 {
            host.handle_event(&InputEvent::Tab);
        }
        assert_eq!(focused(&host).as_deref(), Some("close"), "focus wraps within the dialog");
        assert_eq!(*log.borrow(), vec!["blur close", "blur one", "blur two"]);
    }

    #[test]
    fn test_enter_raises_click_for_focused_button() {
        let (host, log) = setup();
        host.handle_event(&InputEvent::Tab);
        host.handle_event(&InputEvent::Enter);
        assert_eq!(*log.borrow(), vec!["blur close", "click one"]);
        assert!(host.is_open(ID));
    }

    #[test]
    fn test_dismiss_control_clicks_then_hides() {
        let (host, log) = setup();
        host.handle_event(&InputEvent::Enter);
        assert!(!host.is_open(ID));
        assert_eq!(host.active_dialog(), None);
        assert_eq!(*log.borrow(), vec!["click close", "blur close", "hidden"]);
    }

    #[test]
    fn test_escape_hides_once() {
        let (host, log) = setup();
        host.handle_event(&InputEvent::Escape);
        host.hide(ID);
        assert!(!host.is_open(ID));
        assert_eq!(log.borrow().iter().filter(|e| *e == "hidden").count(), 1);
        assert!(!host.handle_event(&InputEvent::Escape), "no dialog left to take input");
    }

    #[test]
    fn test_overlay_click_hides() {
        let (host, log) = setup();
        host.handle_event(&InputEvent::MouseClick { row: 1, col: 1 });
        assert!(!host.is_open(ID));
        assert_eq!(log.borrow().last().map(String::as_str), Some("hidden"));
    }

    #[test]
    fn test_click_inside_box_does_not_hide() {
        let (host, _) = setup();
        let rect = host.dialog_rect(ID).unwrap();
        host.handle_event(&InputEvent::MouseClick { row: rect.y, col: rect.x });
        assert!(host.is_open(ID));
    }

    #[test]
    fn test_click_handler_may_hide_its_own_dialog() {
        let (host, log) = setup();
        let weak = Rc::downgrade(&host);
        host.on_click(ID, "two", Rc::new(move || {
            if let Some(host) = weak.upgrade() {
                host.hide(ID);
            }
        }));
        host.handle_event(&InputEvent::ShiftTab);
        host.handle_event(&InputEvent::Enter);
        assert!(!host.is_open(ID));
        assert_eq!(*log.borrow(), vec!["blur close", "click two", "blur two", "hidden"]);
    }

    #[test]
    fn test_shortcut_raises_click_for_outside_control() {
        let (host, log) = setup();
        let l = log.clone();
        host.on_click(ID, "replay", Rc::new(move || l.borrow_mut().push("click replay".to_string())));
        host.bind_shortcut(InputEvent::F1, "replay");
        host.handle_event(&InputEvent::F1);
        assert_eq!(*log.borrow(), vec!["click replay"]);
    }

    #[test]
    fn test_narration_reads_labels_and_buttons() {
        let (host, _) = setup();
        assert_eq!(
            host.narration(ID).utterances(),
            &["Title", "Close dialog, button", "Body", "One, button", "Two, button"]
        );
        assert!(host.narration("missing").is_empty());
    }

    #[test]
    fn test_draw_centers_box() {
        let (host, _) = setup();
        host.set_screen_size(80, 25);
        let mut screen = Screen::new(80, 25);
        host.draw(&mut screen);
        let rect = host.dialog_rect(ID).unwrap();
        assert_eq!(rect.width, DIALOG_WIDTH);
        assert_eq!(screen.get(rect.y, rect.x).map(|c| c.ch), Some('┌'));
    }
}
