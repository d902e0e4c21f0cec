//! The library components of the game. They hold the board engine, the session that turns key
//! presses into new board states, the storage the best score is kept in, and the terminal front end
//! driving all of it.
//!
//! The starting point of the library is the game.rs file, which contains the main game loop. The
//! engine in board.rs never touches the terminal, the clock or a global generator, so it can be
//! driven from anywhere: every tile it spawns is rolled from a [`random::Source`] handed in by the
//! caller.

#![expect(
    clippy::cargo_common_metadata,
    reason = "The package has not yet been pushed to a remote."
)]

pub mod board;
mod frame;
mod game;
mod input;
pub mod persistence;
pub mod random;
pub mod session;

pub use board::{Direction, Grid};
pub use game::init;
pub use session::{Command, Session, Snapshot};
