//! Welcome dialog for new players
//!
//! Opens a narrated dialog over the terminal that offers the tutorial or
//! the game, then prints the destination (`tutorial` or `game`) on stdout
//! for the launcher. Uses raw ANSI escape sequences (no external TUI
//! libraries).

mod app;
mod config;
mod error;
mod input;
mod screen;
mod speech;
mod terminal;
mod ui;

use std::path::Path;
use std::rc::Rc;
use std::sync::Mutex;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use app::App;
use config::{Cli, Config, Speech};
use error::AppError;
use speech::{CommandNarrator, Narrator, SilentNarrator};
use ui::dialogs::welcome::Destination;

/// Logs go to a file because the terminal belongs to the UI
fn init_logging(path: Option<&Path>) -> Result<(), AppError> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = std::fs::File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))
}

fn build_narrator(speech: &Speech) -> Rc<dyn Narrator> {
    match speech {
        Speech::Off => Rc::new(SilentNarrator::new()),
        Speech::Command { program, args } => {
            info!(%program, "using configured speech program");
            Rc::new(CommandNarrator::new(program.clone(), args.clone()))
        }
        Speech::Auto { args } => match CommandNarrator::detect(args.clone()) {
            Ok(narrator) => {
                info!(program = narrator.program(), "speech program found");
                Rc::new(narrator)
            }
            Err(e) => {
                warn!(error = %e, "narration disabled");
                Rc::new(SilentNarrator::new())
            }
        },
    }
}

fn main() -> Result<(), AppError> {
    let config = Config::from(Cli::parse());
    init_logging(config.log_file.as_deref())?;
    info!(?config, "starting");

    let narrator = build_narrator(&config.speech);
    let destination = {
        let mut app = App::new(&config, narrator)?;
        app.run()?
    };

    // Every way of closing the dialog records a destination; game is the
    // fallback the dialog itself uses for dismissal.
    let destination = destination.unwrap_or(Destination::Game);
    println!("{}", destination);
    Ok(())
}
