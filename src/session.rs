//! The session module owns everything that changes from one turn to the next: the grid, the
//! running score, the best score and the two flags the front end renders.
//!
//! A turn is computed by [`Snapshot::apply`], a pure function from one snapshot to the next.
//! [`Session`] wraps that function behind a mutex, so reading the current snapshot, applying a
//! command and committing the result happen as one step no matter how many inputs race in.

use std::sync::{Mutex, PoisonError};

use log::{debug, log_enabled, trace, warn, Level};
use serde::{Deserialize, Serialize};

use crate::board::{Direction, Grid};
use crate::persistence::{load_best, Backend, BEST_SCORE_KEY};
use crate::random::Source;

/// An input the front end forwards to the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// This variant dismisses a win and keeps playing on the same grid.
    Continue,
    /// This variant pushes the tiles in a direction.
    Move(Direction),
    /// This variant throws the current game away and starts a fresh one.
    Reset,
}

/// What a command ended up doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// This variant is used when a win was dismissed.
    Continued,
    /// This variant is used when the command was not accepted in the current state, such as a move
    /// on a lost game or a continue without a win.
    Ignored,
    /// This variant is used when the tiles moved and a new tile was spawned.
    Moved {
        /// The points the move earned.
        gained: u32,
    },
    /// This variant is used when the move would not have changed the grid.
    NoOp,
    /// This variant is used when a new game was started.
    Reset,
}

/// The full state of a game as the front end sees it after a turn. It serializes to a flat JSON
/// object, the grid as four rows of numbers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// The best score reached so far, across games.
    pub best: u64,
    /// The current board.
    pub grid: Grid,
    /// This field is set when no move can change the grid anymore.
    pub over: bool,
    /// The score of the current game.
    pub score: u64,
    /// This field is set when the winning tile is on the grid and the win has not been dismissed.
    pub won: bool,
}

/// The result of applying a command to a snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// What the command did.
    pub outcome: Outcome,
    /// The snapshot after the command. It equals the input snapshot unless something happened.
    pub snapshot: Snapshot,
}

impl Snapshot {
    /// This function starts a game: a freshly initialized grid, a zero score and both flags
    /// cleared. The best score is carried over.
    pub fn start<R: Source + ?Sized>(best: u64, rng: &mut R) -> Self {
        Self {
            best,
            grid: Grid::initialize(rng),
            over: false,
            score: 0,
            won: false,
        }
    }

    /// This function runs one turn. Moves on a lost game are ignored, moves that change nothing
    /// leave the snapshot exactly as it was, and every other move spawns a tile, adds its points
    /// to the score and the best score, and recomputes both flags on the final grid.
    #[must_use]
    pub fn apply<R: Source + ?Sized>(self, command: Command, rng: &mut R) -> Turn {
        match command {
            Command::Move(direction) => self.play(direction, rng),
            Command::Continue if self.won => Turn {
                outcome: Outcome::Continued,
                snapshot: Self { won: false, ..self },
            },
            Command::Continue => self.unchanged(Outcome::Ignored),
            Command::Reset => Turn {
                outcome: Outcome::Reset,
                snapshot: Self::start(self.best, rng),
            },
        }
    }

    /// This function carries out a move command.
    fn play<R: Source + ?Sized>(self, direction: Direction, rng: &mut R) -> Turn {
        if self.over && !self.won {
            return self.unchanged(Outcome::Ignored);
        }

        let shift = self.grid.shift(direction);
        if shift.is_noop(&self.grid) {
            return self.unchanged(Outcome::NoOp);
        }

        let grid = shift.grid.spawn_random_tile(rng);
        let score = self.score + u64::from(shift.score);

        Turn {
            outcome: Outcome::Moved {
                gained: shift.score,
            },
            snapshot: Self {
                best: self.best.max(score),
                grid,
                over: grid.is_game_over(),
                score,
                won: grid.has_won(),
            },
        }
    }

    /// This function wraps the snapshot, untouched, into a turn.
    const fn unchanged(self, outcome: Outcome) -> Turn {
        Turn {
            outcome,
            snapshot: self,
        }
    }
}

/// The mutable pieces of a session, kept together under one lock.
struct Inner<B, R> {
    /// The store the best score is written through.
    backend: B,
    /// The generator new tiles are rolled from.
    rng: R,
    /// The committed state of the game.
    snapshot: Snapshot,
}

/// A running game shared with whatever feeds it input. Every command is applied under a single
/// lock, so two commands never see the same starting snapshot.
pub struct Session<B, R> {
    /// The state guarded by the lock.
    inner: Mutex<Inner<B, R>>,
}

impl<B: Backend, R: Source> Session<B, R> {
    /// This function starts a session: the best score is read from `backend` (a missing or
    /// unreadable value counts as zero) and a first game is dealt.
    pub fn open(backend: B, mut rng: R) -> Self {
        let snapshot = Snapshot::start(load_best(&backend), &mut rng);
        debug!("new session, best score {}", snapshot.best);

        Self {
            inner: Mutex::new(Inner {
                backend,
                rng,
                snapshot,
            }),
        }
    }

    /// This function applies a command to the current snapshot and commits the result. When the
    /// best score grows it is written through the backend; a failed write is logged and the game
    /// goes on.
    pub fn handle(&self, command: Command) -> Turn {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let inner = &mut *guard;

        let turn = inner.snapshot.apply(command, &mut inner.rng);
        match turn.outcome {
            Outcome::Moved { gained } => debug!(
                "{command:?} earned {gained}, score {}\n{}",
                turn.snapshot.score, turn.snapshot.grid
            ),
            Outcome::Continued | Outcome::Reset => debug!("{command:?} accepted"),
            Outcome::Ignored | Outcome::NoOp => trace!("{command:?} had no effect"),
        }
        if log_enabled!(Level::Debug) {
            match serde_json::to_string(&turn) {
                Ok(json) => debug!("committed {json}"),
                Err(err) => warn!("could not serialize the turn: {err}"),
            }
        }

        if turn.snapshot.best > inner.snapshot.best {
            if let Err(err) = inner.backend.set(BEST_SCORE_KEY, turn.snapshot.best) {
                warn!("could not save the best score: {err}");
            }
        }

        inner.snapshot = turn.snapshot;
        turn
    }

    /// This function returns the committed snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot
    }

    /// This function ends the session and hands the backend back.
    pub fn into_backend(self) -> B {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .backend
    }
}
