//! The game module contains the terminal front end: the command-line configuration and the main
//! loop that reads keys, forwards them to the session and redraws the board.
//!
//! The loop itself keeps a single piece of state of its own, whether the current win has already
//! been announced, so the "you won" prompt shows up once per game and not on every later turn.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use console::{style, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;
use fastrand::Rng;
use log::info;

use crate::frame::draw;
use crate::input::{action, Action};
use crate::persistence::{Backend, Disabled, FileBackend};
use crate::random::Source;
use crate::session::{Command, Outcome, Session};

/// This struct holds the command-line options, parsed with clap's derive API. Every option can
/// also be given through an environment variable.
#[derive(Parser)]
#[command(name = "fortyeight", version, about)]
#[command(next_line_help = true)]
struct Cli {
    /// The JSON file the best score is kept in.
    ///
    /// The file is created on the first new best score. It is ignored when --no-persist is given.
    #[arg(long, default_value = "fortyeight.json")]
    #[arg(env = "FORTYEIGHT_BEST_FILE", value_name = "PATH")]
    best_file: PathBuf,
    /// Play without reading or writing the best score.
    #[arg(long)]
    no_persist: bool,
    /// The seed for the tile generator, to replay the same sequence of spawns.
    #[arg(short, long)]
    #[arg(env = "FORTYEIGHT_SEED", value_name = "SEED")]
    seed: Option<u64>,
}

/// Starts the game in the current terminal and runs it until the player quits. This is the
/// `main()` of the binary, kept in the library like the rest of the game.
///
/// # Errors
///
/// The function fails when the terminal cannot be read from or written to.
pub fn init() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let term = Term::stdout();
    let rng = cli.seed.map_or_else(Rng::new, Rng::with_seed);

    if cli.no_persist {
        info!("best score persistence disabled");
        play(&term, &Session::open(Disabled, rng))
    } else {
        info!("best score kept in {}", cli.best_file.display());
        play(&term, &Session::open(FileBackend::new(cli.best_file), rng))
    }
}

/// This function prepares the terminal, runs the game loop and restores the terminal whatever the
/// loop returned.
fn play<B: Backend, R: Source>(term: &Term, session: &Session<B, R>) -> Result<()> {
    term.set_title("2048");
    term.hide_cursor()?;

    let result = run(term, session);

    term.show_cursor()?;
    let last = session.snapshot();
    term.write_line(&format!(
        "{}",
        style(format!("Final score {}, best {}", last.score, last.best)).bold()
    ))?;

    result
}

/// This function is the game loop. It returns once the player quits, either with a key or by
/// declining another game after a loss.
fn run<B: Backend, R: Source>(term: &Term, session: &Session<B, R>) -> Result<()> {
    let mut announced = false;

    loop {
        let snapshot = session.snapshot();
        draw(term, &snapshot)?;

        if snapshot.won && !announced {
            announced = true;
            let command = if confirm(term, "You reached 2048! Keep playing?")? {
                Command::Continue
            } else {
                announced = false;
                Command::Reset
            };
            let _ = session.handle(command);
            continue;
        }

        if snapshot.over && (!snapshot.won || announced) {
            if !confirm(term, "No moves left. Try again?")? {
                break Ok(());
            }
            announced = false;
            let _ = session.handle(Command::Reset);
            continue;
        }

        match action(term.read_key()?) {
            Some(Action::Play(command)) => {
                if session.handle(command).outcome == Outcome::Reset {
                    announced = false;
                }
            }
            Some(Action::Quit) => break Ok(()),
            None => {}
        }
    }
}

/// This function asks a yes or no question under the board, defaulting to yes.
fn confirm(term: &Term, prompt: &str) -> Result<bool> {
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(true)
        .interact_on(term)?)
}
