//! Command-line configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::ui::theme::Theme;

/// Color scheme of the dialog
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ThemeName {
    #[default]
    Classic,
    Contrast,
}

impl ThemeName {
    pub fn theme(self) -> Theme {
        match self {
            ThemeName::Classic => Theme::classic_blue(),
            ThemeName::Contrast => Theme::high_contrast(),
        }
    }
}

/// Show a spoken welcome dialog and print the chosen destination
#[derive(Parser, Debug)]
#[command(name = "welcome")]
#[command(about = "Spoken welcome dialog; prints 'tutorial' or 'game' on exit")]
#[command(version)]
pub struct Cli {
    /// Do not speak; narration only goes to the log
    #[arg(long = "no-speech")]
    pub no_speech: bool,

    /// Speech program to run instead of the first one found on PATH
    #[arg(long = "speech-command", value_name = "PROGRAM", conflicts_with = "no_speech")]
    pub speech_command: Option<String>,

    /// Extra argument for the speech program, placed before the text
    #[arg(long = "speech-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub speech_args: Vec<String>,

    /// Color theme
    #[arg(long, value_enum, default_value_t = ThemeName::Classic)]
    pub theme: ThemeName,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// How narration is produced
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Speech {
    Off,
    /// Detect a speech program on PATH
    Auto { args: Vec<String> },
    Command { program: String, args: Vec<String> },
}

/// Resolved runtime configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub speech: Speech,
    pub theme: ThemeName,
    pub log_file: Option<PathBuf>,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        let speech = match (cli.no_speech, cli.speech_command) {
            (true, _) => Speech::Off,
            (false, Some(program)) => Speech::Command {
                program,
                args: cli.speech_args,
            },
            (false, None) => Speech::Auto {
                args: cli.speech_args,
            },
        };

        Self {
            speech,
            theme: cli.theme,
            log_file: cli.log_file,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Config {
        let argv = std::iter::once("welcome").chain(args.iter().copied());
        Config::from(Cli::parse_from(argv))
    }

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]);
        assert_eq!(config.speech, Speech::Auto { args: vec![] });
        assert_eq!(config.theme, ThemeName::Classic);
        assert!(config.log_file.is_none(), "logging is off unless asked for");
    }

    #[test]
    fn test_speech_command_with_args() {
        let config = parse(&["--speech-command", "espeak-ng", "--speech-arg", "-s", "--speech-arg", "150"]);
        assert_eq!(
            config.speech,
            Speech::Command {
                program: "espeak-ng".to_string(),
                args: vec!["-s".to_string(), "150".to_string()],
            }
        );
    }

    #[test]
    fn test_no_speech_and_theme() {
        let config = parse(&["--no-speech", "--theme", "contrast", "--log-file", "/tmp/welcome.log"]);
        assert_eq!(config.speech, Speech::Off);
        assert_eq!(config.theme, ThemeName::Contrast);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/welcome.log")));
    }

    #[test]
    fn test_no_speech_conflicts_with_command() {
        let result = Cli::try_parse_from(["welcome", "--no-speech", "--speech-command", "say"]);
        assert!(result.is_err());
    }
}
