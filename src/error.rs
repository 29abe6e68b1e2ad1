//! Error types.

/// Errors raised inside a narrator.
///
/// These never reach the dialog controller; the narrator logs them and
/// carries on silently.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    /// No speech program was configured or found on `PATH`.
    #[error("No speech program found (tried {tried})")]
    NoSpeechProgram { tried: String },

    /// The speech program could not be started.
    #[error("Failed to start speech program '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    /// An in-flight narration could not be stopped.
    #[error("Failed to stop narration: {0}")]
    Kill(#[source] std::io::Error),
}

/// Errors that end the program.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Terminal or file IO failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The log subscriber could not be installed.
    #[error("Failed to initialise logging: {0}")]
    Logging(String),
}
