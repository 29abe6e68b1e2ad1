//! Leaf widgets for dialog content
//!
//! - Label: static text, optionally word-wrapped
//! - Button: focusable control that raises an action
//! - HRule: separator joined to the dialog border
//! - Spacer: fixed or filling blank space

mod button;
mod hrule;
mod label;
mod spacer;

pub use button::Button;
pub use hrule::HRule;
pub use label::Label;
pub use spacer::Spacer;
