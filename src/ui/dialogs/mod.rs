//! Dialog components
//!
//! Each dialog is a self-contained controller that owns its state and
//! registers its behavior with a [`DialogHost`](crate::ui::modal::DialogHost).

pub mod welcome;
