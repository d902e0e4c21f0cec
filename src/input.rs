//! This module contains the translation from raw key presses to what the game loop should do with
//! them. Arrow keys, `wasd` and `hjkl` all move; anything unbound is simply skipped.

use console::Key;

use crate::board::Direction;
use crate::session::Command;

/// This enum holds what a key press asks of the game loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    /// This variant forwards a command to the session.
    Play(Command),
    /// This variant is used when the player wants to leave the game.
    Quit,
}

/// This function maps a key press to an action, or to nothing when the key is not bound.
pub(crate) fn action(key: Key) -> Option<Action> {
    let command = match key {
        Key::ArrowLeft | Key::Char('a' | 'h' | 'A' | 'H') => Command::Move(Direction::Left),
        Key::ArrowRight | Key::Char('d' | 'l' | 'D' | 'L') => Command::Move(Direction::Right),
        Key::ArrowUp | Key::Char('w' | 'k' | 'W' | 'K') => Command::Move(Direction::Up),
        Key::ArrowDown | Key::Char('s' | 'j' | 'S' | 'J') => Command::Move(Direction::Down),
        Key::Char('r' | 'n' | 'R' | 'N') => Command::Reset,
        Key::Char('c' | 'C') => Command::Continue,
        Key::Char('q' | 'Q') | Key::Escape => return Some(Action::Quit),
        _ => return None,
    };

    Some(Action::Play(command))
}
