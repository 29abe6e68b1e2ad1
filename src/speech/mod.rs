//! Narration: speaking dialog content aloud.
//!
//! The dialog controller talks to a [`Narrator`] trait object so that the
//! speech backend can be swapped without touching the controller.
//!
//! | Narrator            | Module      | Backend                              |
//! |---------------------|-------------|--------------------------------------|
//! | [`CommandNarrator`] | [`command`] | external program (`espeak-ng`, `say`) |
//! | [`SilentNarrator`]  | [`silent`]  | none; logs utterances                |
//!
//! Narration is fire-and-forget. A narrator never reports failure to its
//! caller; it logs and stays quiet instead.

pub mod command;
pub mod silent;

pub use command::CommandNarrator;
pub use silent::SilentNarrator;

/// Ordered accessible text of a dialog, one entry per widget.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Narration {
    utterances: Vec<String>,
}

impl Narration {
    pub fn new(utterances: Vec<String>) -> Self {
        Self { utterances }
    }

    pub fn utterances(&self) -> &[String] {
        &self.utterances
    }

    pub fn is_empty(&self) -> bool {
        self.utterances.iter().all(|u| u.trim().is_empty())
    }

    /// All utterances as one text, each ending in sentence punctuation so
    /// synthesizers pause between them.
    pub fn text(&self) -> String {
        self.utterances
            .iter()
            .map(|u| u.trim())
            .filter(|u| !u.is_empty())
            .map(|u| {
                if u.ends_with(&['.', '!', '?'][..]) {
                    u.to_string()
                } else {
                    format!("{}.", u)
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Backend-agnostic speech output.
///
/// Methods take `&self`: one narrator is shared by every event handler of a
/// dialog, and handlers never run concurrently.
pub trait Narrator {
    /// Start narrating. Any narration still running is discarded first.
    fn speak(&self, narration: &Narration);

    /// Stop any in-flight narration. Safe to call when nothing is speaking.
    fn cancel(&self);

    /// Whether a narration is currently running.
    fn is_speaking(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_adds_sentence_breaks() {
        let narration = Narration::new(vec![
            "Welcome!".to_string(),
            "Go to the game, button".to_string(),
            "  ".to_string(),
        ]);
        assert_eq!(narration.text(), "Welcome! Go to the game, button.");
    }

    #[test]
    fn test_blank_narration_is_empty() {
        assert!(Narration::default().is_empty());
        assert!(Narration::new(vec![" ".to_string()]).is_empty());
        assert!(!Narration::new(vec!["Hi".to_string()]).is_empty());
    }
}
