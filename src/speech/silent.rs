//! Narrator that produces no audio.

use std::cell::Cell;

use tracing::debug;

use super::{Narration, Narrator};

/// Used with `--no-speech` or when no speech program is available.
///
/// Utterances go to the debug log. Speaking lasts until the next cancel.
#[derive(Debug, Default)]
pub struct SilentNarrator {
    speaking: Cell<bool>,
}

impl SilentNarrator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Narrator for SilentNarrator {
    fn speak(&self, narration: &Narration) {
        for utterance in narration.utterances() {
            debug!(%utterance, "narrate");
        }
        self.speaking.set(!narration.is_empty());
    }

    fn cancel(&self) {
        if self.speaking.replace(false) {
            debug!("narration cancelled");
        }
    }

    fn is_speaking(&self) -> bool {
        self.speaking.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speaking_until_cancelled() {
        let narrator = SilentNarrator::new();
        assert!(!narrator.is_speaking());

        narrator.speak(&Narration::new(vec!["Welcome".to_string()]));
        assert!(narrator.is_speaking());

        narrator.cancel();
        assert!(!narrator.is_speaking());
        narrator.cancel();
        assert!(!narrator.is_speaking());
    }
}
