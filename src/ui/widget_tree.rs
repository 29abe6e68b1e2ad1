//! Widget tree system for hierarchical UI composition
//!
//! The widget tree provides:
//! - Hierarchical widget composition (stacks and leaves)
//! - Automatic layout computation via the layout engine
//! - Recursive drawing with theme support
//! - Event routing to the focused or clicked leaf
//! - Tab navigation between focusable widgets, with blur reporting
//! - Accessible text in document order for narration
//!
//! Leaves are addressed by id. Ids must be unique within a tree.

use crate::input::{focus_direction, InputEvent};
use crate::screen::Screen;
use super::layout::{compute_child_bounds, Axis, LayoutItem, Rect, Size, SizeHint};
use super::theme::Theme;
use super::widget::{mouse_position, EventResult};

/// A node in the widget tree - either a leaf widget or a stack of nodes
pub enum WidgetNode {
    Leaf {
        id: String,
        widget: Box<dyn TreeWidget>,
    },
    Stack {
        id: String,
        axis: Axis,
        spacing: u16,
        padding: u16,
        children: Vec<WidgetNode>,
    },
}

/// A focus transition observed by the tree, identified by leaf id
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FocusChange {
    Focus(String),
    Blur(String),
}

impl WidgetNode {
    pub fn leaf(id: impl Into<String>, widget: impl TreeWidget + 'static) -> Self {
        WidgetNode::Leaf {
            id: id.into(),
            widget: Box::new(widget),
        }
    }

    /// Start a stack whose children run top to bottom
    pub fn vstack(id: impl Into<String>) -> StackBuilder {
        StackBuilder::new(id.into(), Axis::Vertical)
    }

    /// Start a stack whose children run left to right
    pub fn hstack(id: impl Into<String>) -> StackBuilder {
        StackBuilder::new(id.into(), Axis::Horizontal)
    }

    pub fn id(&self) -> &str {
        match self {
            WidgetNode::Leaf { id, .. } | WidgetNode::Stack { id, .. } => id,
        }
    }

    fn layout_item(&self) -> LayoutItem {
        match self {
            WidgetNode::Leaf { widget, .. } => {
                let hint = widget.size_hint();
                let mut item = LayoutItem::leaf();
                item.min_width = hint.min_width;
                item.min_height = hint.min_height;
                if widget.wants_tight_width() && hint.min_width > 0 {
                    item.width = Size::Fixed(hint.min_width);
                }
                item.height = if hint.flex > 0 {
                    Size::Flex(hint.flex)
                } else {
                    Size::Fixed(hint.min_height.max(1))
                };
                item
            }
            WidgetNode::Stack { axis, spacing, padding, children, .. } => {
                let children = children.iter().map(WidgetNode::layout_item).collect();
                let item = LayoutItem::stack(*axis, children).spacing(*spacing).padding(*padding);
                // Rows keep their natural height inside a vertical parent
                match axis {
                    Axis::Horizontal => {
                        let natural = item.natural_height();
                        item.fixed_height(natural)
                    }
                    Axis::Vertical => item,
                }
            }
        }
    }

    fn draw(&self, screen: &mut Screen, bounds: Rect, theme: &Theme) {
        match self {
            WidgetNode::Leaf { widget, .. } => widget.draw(screen, bounds, theme),
            WidgetNode::Stack { children, padding, .. } => {
                let rects = compute_child_bounds(&self.layout_item(), bounds);
                for (child, mut rect) in children.iter().zip(rects) {
                    let full_bleed = matches!(child, WidgetNode::Leaf { widget, .. } if widget.wants_full_bleed());
                    if full_bleed && *padding > 0 {
                        // Ignore padding across the stack
                        rect.x = bounds.x;
                        rect.width = bounds.width;
                    }
                    child.draw(screen, rect, theme);
                }
            }
        }
    }

    /// Id of the leaf under a screen position
    fn leaf_at(&self, row: u16, col: u16, bounds: Rect) -> Option<&str> {
        match self {
            WidgetNode::Leaf { id, .. } => bounds.contains(row, col).then_some(id.as_str()),
            WidgetNode::Stack { children, .. } => {
                let rects = compute_child_bounds(&self.layout_item(), bounds);
                children
                    .iter()
                    .zip(rects)
                    .filter(|(_, rect)| rect.contains(row, col))
                    .find_map(|(child, rect)| child.leaf_at(row, col, rect))
            }
        }
    }

    /// A leaf together with its laid-out bounds
    fn leaf_with_bounds(&mut self, target: &str, bounds: Rect) -> Option<(&mut dyn TreeWidget, Rect)> {
        let rects = match self {
            WidgetNode::Leaf { .. } => Vec::new(),
            WidgetNode::Stack { .. } => compute_child_bounds(&self.layout_item(), bounds),
        };
        match self {
            WidgetNode::Leaf { id, widget } => {
                if id == target {
                    Some((widget.as_mut(), bounds))
                } else {
                    None
                }
            }
            WidgetNode::Stack { children, .. } => {
                for (child, rect) in children.iter_mut().zip(rects) {
                    if let Some(found) = child.leaf_with_bounds(target, rect) {
                        return Some(found);
                    }
                }
                None
            }
        }
    }

    fn leaf_mut(&mut self, target: &str) -> Option<&mut dyn TreeWidget> {
        match self {
            WidgetNode::Leaf { id, widget } => {
                if id == target {
                    Some(widget.as_mut())
                } else {
                    None
                }
            }
            WidgetNode::Stack { children, .. } => {
                for child in children {
                    if let Some(found) = child.leaf_mut(target) {
                        return Some(found);
                    }
                }
                None
            }
        }
    }

    /// Every leaf in document order
    fn leaves<'a>(&'a self, out: &mut Vec<(&'a str, &'a dyn TreeWidget)>) {
        match self {
            WidgetNode::Leaf { id, widget } => out.push((id.as_str(), widget.as_ref())),
            WidgetNode::Stack { children, .. } => {
                for child in children {
                    child.leaves(out);
                }
            }
        }
    }
}

/// Builder for stack nodes
pub struct StackBuilder {
    id: String,
    axis: Axis,
    spacing: u16,
    padding: u16,
    children: Vec<WidgetNode>,
}

impl StackBuilder {
    fn new(id: String, axis: Axis) -> Self {
        Self {
            id,
            axis,
            spacing: 0,
            padding: 0,
            children: Vec::new(),
        }
    }

    /// Set spacing between children
    pub fn spacing(mut self, spacing: u16) -> Self {
        self.spacing = spacing;
        self
    }

    /// Set padding around children
    pub fn padding(mut self, padding: u16) -> Self {
        self.padding = padding;
        self
    }

    pub fn child(mut self, node: WidgetNode) -> Self {
        self.children.push(node);
        self
    }

    pub fn leaf(self, id: impl Into<String>, widget: impl TreeWidget + 'static) -> Self {
        self.child(WidgetNode::leaf(id, widget))
    }

    pub fn build(self) -> WidgetNode {
        WidgetNode::Stack {
            id: self.id,
            axis: self.axis,
            spacing: self.spacing,
            padding: self.padding,
            children: self.children,
        }
    }
}

/// A widget tree with focus tracking
pub struct WidgetTree {
    root: WidgetNode,
    theme: Theme,
    focused: Option<String>,
    /// Focus transitions not yet collected by the owner
    focus_changes: Vec<FocusChange>,
}

impl WidgetTree {
    pub fn with_theme(root: WidgetNode, theme: Theme) -> Self {
        Self {
            root,
            theme,
            focused: None,
            focus_changes: Vec::new(),
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn draw(&self, screen: &mut Screen, bounds: Rect) {
        self.root.draw(screen, bounds, &self.theme);
    }

    /// Height the content needs when laid out at its natural size
    pub fn natural_height(&self) -> u16 {
        self.root.layout_item().natural_height()
    }

    /// Route an event: focus keys move focus, mouse events go to the leaf
    /// under the pointer, everything else to the focused leaf.
    pub fn handle_event(&mut self, event: &InputEvent, bounds: Rect) -> EventResult {
        if let Some(forward) = focus_direction(event) {
            self.move_focus(forward);
            return EventResult::Consumed;
        }

        let target = match mouse_position(event) {
            Some((row, col)) => self.root.leaf_at(row, col, bounds).map(str::to_string),
            None => self.focused.clone(),
        };
        let Some(target) = target else {
            return EventResult::Ignored;
        };

        if matches!(event, InputEvent::MouseClick { .. })
            && self.focused.as_deref() != Some(target.as_str())
            && self.focus_order().contains(&target)
        {
            self.set_focus(&target);
        }

        match self.root.leaf_with_bounds(&target, bounds) {
            Some((widget, rect)) => widget.handle_event(event, rect),
            None => EventResult::Ignored,
        }
    }

    pub fn focus_next(&mut self) {
        self.move_focus(true);
    }

    /// Focusable leaf ids in tab order
    fn focus_order(&self) -> Vec<String> {
        let mut leaves = Vec::new();
        self.root.leaves(&mut leaves);
        leaves
            .into_iter()
            .filter(|(_, widget)| widget.focusable())
            .map(|(id, _)| id.to_string())
            .collect()
    }

    fn move_focus(&mut self, forward: bool) {
        let order = self.focus_order();
        let count = order.len();
        if count == 0 {
            return;
        }

        let current = self.focused.as_ref().and_then(|id| order.iter().position(|o| o == id));
        let next = match (current, forward) {
            (Some(i), true) => (i + 1) % count,
            (Some(i), false) => (i + count - 1) % count,
            (None, true) => 0,
            (None, false) => count - 1,
        };
        if current != Some(next) {
            self.set_focus(&order[next]);
        }
    }

    /// Focus a leaf, blurring the previous one
    pub fn set_focus(&mut self, id: &str) {
        self.clear_focus();
        if let Some(widget) = self.root.leaf_mut(id) {
            widget.set_focus(true);
        }
        self.focused = Some(id.to_string());
        self.focus_changes.push(FocusChange::Focus(id.to_string()));
    }

    /// Remove focus from the focused widget, reporting a blur
    pub fn clear_focus(&mut self) {
        let Some(id) = self.focused.take() else {
            return;
        };
        if let Some(widget) = self.root.leaf_mut(&id) {
            widget.set_focus(false);
        }
        self.focus_changes.push(FocusChange::Blur(id));
    }

    pub fn focused_id(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Drain focus transitions recorded since the last call
    pub fn take_focus_changes(&mut self) -> Vec<FocusChange> {
        std::mem::take(&mut self.focus_changes)
    }

    /// Accessible text of every widget, in document order
    pub fn narration(&self) -> Vec<String> {
        let mut leaves = Vec::new();
        self.root.leaves(&mut leaves);
        leaves.into_iter().filter_map(|(_, widget)| widget.accessible_text()).collect()
    }
}

/// Widget trait for use in widget trees
///
/// Widgets draw with theme colors and report size hints for the layout
/// engine.
pub trait TreeWidget {
    fn draw(&self, screen: &mut Screen, bounds: Rect, theme: &Theme);

    fn handle_event(&mut self, event: &InputEvent, bounds: Rect) -> EventResult;

    /// Take exactly the hinted minimum width instead of stretching
    fn wants_tight_width(&self) -> bool {
        false
    }

    /// Span the whole stack width, ignoring its padding
    fn wants_full_bleed(&self) -> bool {
        false
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint::default()
    }

    /// Whether this widget can receive keyboard focus
    fn focusable(&self) -> bool {
        false
    }

    fn set_focus(&mut self, _focused: bool) {}

    /// Text a screen reader should announce for this widget
    fn accessible_text(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::widgets::{Button, Label};

    fn sample_tree() -> WidgetTree {
        let root = WidgetNode::vstack("root")
            .leaf("title", Label::new("Hello"))
            .child(
                WidgetNode::hstack("row")
                    .leaf("ok", Button::new("OK", "ok"))
                    .leaf("cancel", Button::new("Cancel", "cancel"))
                    .build(),
            )
            .build();
        WidgetTree::with_theme(root, Theme::classic_blue())
    }

    #[test]
    fn test_tab_cycles_and_reports_blur() {
        let mut tree = sample_tree();
        let bounds = Rect::new(1, 1, 30, 5);

        tree.handle_event(&InputEvent::Tab, bounds);
        assert_eq!(tree.focused_id(), Some("ok"));
        assert_eq!(tree.take_focus_changes(), vec![FocusChange::Focus("ok".into())]);

        tree.handle_event(&InputEvent::Tab, bounds);
        tree.handle_event(&InputEvent::Tab, bounds);
        assert_eq!(tree.focused_id(), Some("ok"), "focus wraps around");
        assert_eq!(
            tree.take_focus_changes(),
            vec![
                FocusChange::Blur("ok".into()),
                FocusChange::Focus("cancel".into()),
                FocusChange::Blur("cancel".into()),
                FocusChange::Focus("ok".into()),
            ]
        );
    }

    #[test]
    fn test_shift_tab_from_nothing_goes_to_last() {
        let mut tree = sample_tree();
        tree.handle_event(&InputEvent::ShiftTab, Rect::new(1, 1, 30, 5));
        assert_eq!(tree.focused_id(), Some("cancel"));
        tree.move_focus(false);
        assert_eq!(tree.focused_id(), Some("ok"));
    }

    #[test]
    fn test_enter_on_focused_button_is_action() {
        let mut tree = sample_tree();
        let bounds = Rect::new(1, 1, 30, 5);
        assert_eq!(tree.handle_event(&InputEvent::Enter, bounds), EventResult::Ignored);
        tree.focus_next();
        assert_eq!(tree.handle_event(&InputEvent::Enter, bounds), EventResult::Action("ok".into()));
    }

    #[test]
    fn test_mouse_click_focuses_and_activates() {
        let mut tree = sample_tree();
        let bounds = Rect::new(1, 1, 30, 5);
        // Row 2 holds the buttons; "< OK >" spans columns 1..=6
        let result = tree.handle_event(&InputEvent::MouseClick { row: 2, col: 3 }, bounds);
        assert_eq!(result, EventResult::Action("ok".into()));
        assert_eq!(tree.focused_id(), Some("ok"));
    }

    #[test]
    fn test_click_on_label_keeps_focus() {
        let mut tree = sample_tree();
        let bounds = Rect::new(1, 1, 30, 5);
        tree.set_focus("cancel");
        let result = tree.handle_event(&InputEvent::MouseClick { row: 1, col: 2 }, bounds);
        assert_eq!(result, EventResult::Ignored);
        assert_eq!(tree.focused_id(), Some("cancel"));
    }

    #[test]
    fn test_clear_focus_reports_blur_once() {
        let mut tree = sample_tree();
        tree.focus_next();
        tree.take_focus_changes();
        tree.clear_focus();
        tree.clear_focus();
        assert_eq!(tree.take_focus_changes(), vec![FocusChange::Blur("ok".into())]);
        assert_eq!(tree.focused_id(), None);
    }

    #[test]
    fn test_narration_in_document_order() {
        let tree = sample_tree();
        assert_eq!(
            tree.narration(),
            vec!["Hello".to_string(), "OK, button".to_string(), "Cancel, button".to_string()]
        );
    }

    #[test]
    fn test_natural_height_of_nested_row() {
        assert_eq!(sample_tree().natural_height(), 2);
    }
}
