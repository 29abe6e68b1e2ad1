//! UI components for the welcome dialog

pub mod dialogs;
pub mod layout;
pub mod modal;
pub mod theme;
pub mod widget;
pub mod widget_tree;
pub mod widgets;
