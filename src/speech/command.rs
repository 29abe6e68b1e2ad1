//! Narration through an external speech program.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use tracing::{debug, warn};

use super::{Narration, Narrator};
use crate::error::SpeechError;

/// Speech programs tried, in order, when none is configured.
pub const DEFAULT_PROGRAMS: &[&str] = &["espeak-ng", "espeak", "say"];

/// Runs one speech process per narration and kills it on cancel.
///
/// The narration text is passed as the last command-line argument, after
/// any configured arguments.
pub struct CommandNarrator {
    program: String,
    args: Vec<String>,
    child: RefCell<Option<Child>>,
}

impl CommandNarrator {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            child: RefCell::new(None),
        }
    }

    /// Use the first of [`DEFAULT_PROGRAMS`] found on `PATH`.
    pub fn detect(args: Vec<String>) -> Result<Self, SpeechError> {
        let path = std::env::var_os("PATH").unwrap_or_default();
        let dirs: Vec<PathBuf> = std::env::split_paths(&path).collect();

        DEFAULT_PROGRAMS
            .iter()
            .find(|name| find_in(&dirs, name).is_some())
            .map(|name| Self::new(*name, args))
            .ok_or_else(|| SpeechError::NoSpeechProgram {
                tried: DEFAULT_PROGRAMS.join(", "),
            })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn start(&self, text: &str) -> Result<Child, SpeechError> {
        Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| SpeechError::Spawn {
                program: self.program.clone(),
                source,
            })
    }

    /// Kill and reap the running process, if any
    fn stop(&self) -> Result<(), SpeechError> {
        let Some(mut child) = self.child.borrow_mut().take() else {
            return Ok(());
        };

        if let Ok(Some(_)) = child.try_wait() {
            return Ok(());
        }

        debug!(pid = child.id(), "stopping narration");
        match child.kill() {
            Ok(()) => {}
            // Exited between try_wait and kill
            Err(e) if e.kind() == std::io::ErrorKind::InvalidInput => {}
            Err(e) => return Err(SpeechError::Kill(e)),
        }
        child.wait().map(|_| ()).map_err(SpeechError::Kill)
    }
}

fn find_in(dirs: &[PathBuf], name: &str) -> Option<PathBuf> {
    dirs.iter()
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

impl Narrator for CommandNarrator {
    fn speak(&self, narration: &Narration) {
        if let Err(e) = self.stop() {
            warn!(error = %e, "could not discard stale narration");
        }

        if narration.is_empty() {
            debug!("nothing to narrate");
            return;
        }

        let text = narration.text();
        match self.start(&text) {
            Ok(child) => {
                debug!(program = %self.program, pid = child.id(), chars = text.len(), "narration started");
                *self.child.borrow_mut() = Some(child);
            }
            Err(e) => warn!(error = %e, "narration unavailable"),
        }
    }

    fn cancel(&self) {
        if let Err(e) = self.stop() {
            warn!(error = %e, "narration cancel failed");
        }
    }

    fn is_speaking(&self) -> bool {
        let status = match self.child.borrow_mut().as_mut() {
            Some(child) => child.try_wait(),
            None => return false,
        };
        match status {
            Ok(None) => true,
            Ok(Some(_)) => {
                // Finished on its own and already reaped
                self.child.borrow_mut().take();
                false
            }
            Err(e) => {
                warn!(error = %e, "could not poll narration process");
                self.cancel();
                false
            }
        }
    }
}

impl Drop for CommandNarrator {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sleeper() -> CommandNarrator {
        // `sh -c 'exec sleep 5' narrator <text>` ignores the text argument
        CommandNarrator::new(
            "sh",
            vec!["-c".to_string(), "exec sleep 5".to_string(), "narrator".to_string()],
        )
    }

    fn hello() -> Narration {
        Narration::new(vec!["Hello".to_string()])
    }

    #[test]
    fn test_cancel_stops_running_process() {
        let narrator = sleeper();
        narrator.speak(&hello());
        assert!(narrator.is_speaking(), "speech process should be running");

        narrator.cancel();
        assert!(!narrator.is_speaking());
        narrator.cancel(); // idempotent
    }

    #[test]
    fn test_speak_replaces_stale_process() {
        let narrator = sleeper();
        narrator.speak(&hello());
        let first = narrator.child.borrow().as_ref().map(Child::id);

        narrator.speak(&hello());
        let second = narrator.child.borrow().as_ref().map(Child::id);

        assert!(first.is_some() && second.is_some());
        assert_ne!(first, second, "old process must be replaced");
        narrator.cancel();
    }

    #[test]
    fn test_finished_process_is_released() {
        let narrator = CommandNarrator::new("sh", vec!["-c".to_string(), "exit 0".to_string(), "narrator".to_string()]);
        narrator.speak(&hello());
        assert!(narrator.child.borrow().is_some());

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while narrator.is_speaking() {
            assert!(std::time::Instant::now() < deadline, "short process never finished");
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        assert!(narrator.child.borrow().is_none(), "exited child leaves the slot");
    }

    #[test]
    fn test_missing_program_is_not_fatal() {
        let narrator = CommandNarrator::new("definitely-not-a-speech-program", vec![]);
        narrator.speak(&hello());
        assert!(!narrator.is_speaking());
    }

    #[test]
    fn test_empty_narration_starts_nothing() {
        let narrator = sleeper();
        narrator.speak(&Narration::default());
        assert!(!narrator.is_speaking());
    }

    #[test]
    fn test_find_in_skips_missing_dirs() {
        let dirs = vec![PathBuf::from("/nonexistent-dir"), PathBuf::from("/bin")];
        assert!(find_in(&dirs, "sh").is_some());
        assert!(find_in(&dirs, "definitely-not-a-speech-program").is_none());
    }
}
