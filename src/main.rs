//! # fortyeight
//!
//! This crate is the game of 2048 for the terminal. Tiles slide across a 4x4 board with the arrow
//! keys, and two equal tiles that run into each other merge into one worth their sum. Reaching the
//! 2048 tile wins the game, though you can keep going for a higher score.
//!
//! The best score is kept in a small JSON file between runs, unless told otherwise on the command
//! line. Logging goes to standard error and is off unless `RUST_LOG` asks for it.

#![expect(
    unused_crate_dependencies,
    reason = "The dependencies are used in the library crate."
)]

use anyhow::Result;
use fortyeight::init;

fn main() -> Result<()> {
    init()
}
