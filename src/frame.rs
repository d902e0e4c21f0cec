//! This module draws a snapshot of the game on the terminal. The frame is built as a list of lines
//! first, so it can be checked without a terminal, and then centered on the screen.

use anyhow::Result;
use console::{pad_str, style, Alignment, Style, Term};

use crate::board::Cell;
use crate::session::Snapshot;

/// The width, in columns, a single tile is padded to.
const TILE_WIDTH: usize = 6;

/// The help line shown under the board.
const HELP: &str = "arrows, wasd or hjkl to move | c continue | r new game | q quit";

/// This function returns the style a tile is painted with. Higher tiles get warmer colors; empty
/// cells are dimmed.
fn tile_style(cell: Cell) -> Style {
    match cell {
        None => Style::new().dim(),
        Some(2 | 4) => Style::new().black().on_white(),
        Some(8 | 16) => Style::new().black().on_yellow(),
        Some(32 | 64) => Style::new().white().on_red(),
        Some(128 | 256 | 512) => Style::new().white().on_magenta().bold(),
        Some(1024 | 2048) => Style::new().black().on_green().bold(),
        Some(_) => Style::new().black().on_cyan().bold(),
    }
}

/// This function renders one cell as a fixed-width, styled block.
fn tile(cell: Cell) -> String {
    let text = cell.map_or_else(|| String::from("."), |value| value.to_string());
    let padded = pad_str(&text, TILE_WIDTH, Alignment::Center, None);

    format!("{}", tile_style(cell).apply_to(padded))
}

/// This function builds every line of the frame for `snapshot`, top to bottom.
pub(crate) fn lines(snapshot: &Snapshot) -> Vec<String> {
    let mut lines = vec![
        format!("{}", style("2048").bold().yellow()),
        format!(
            "{}   {}",
            style(format!("Score {}", snapshot.score)).bold(),
            style(format!("Best {}", snapshot.best)).bold().on_cyan()
        ),
        String::new(),
    ];

    for cells in snapshot.grid.rows() {
        let row: Vec<String> = cells.iter().map(|&cell| tile(cell)).collect();
        lines.push(row.join(" "));
    }

    lines.push(String::new());
    if snapshot.won {
        lines.push(format!("{}", style("You won!").bold().green()));
    } else if snapshot.over {
        lines.push(format!("{}", style("Game over").bold().red()));
    } else {
        lines.push(String::new());
    }
    lines.push(format!("{}", style(HELP).dim()));

    lines
}

/// This function clears the terminal and draws the frame for `snapshot` in the middle of it.
pub(crate) fn draw(term: &Term, snapshot: &Snapshot) -> Result<()> {
    let (rows, cols) = term.size();
    let lines = lines(snapshot);
    let fill = usize::from(rows).saturating_sub(lines.len()) / 2;

    term.clear_screen()?;
    for _ in 0..fill {
        term.write_line("")?;
    }
    for line in &lines {
        term.write_line(&pad_str(line, usize::from(cols), Alignment::Center, None))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use console::strip_ansi_codes;

    use super::*;
    use crate::board::Grid;

    /// This function renders a snapshot and strips the styling, leaving the bare text.
    fn plain(snapshot: &Snapshot) -> Vec<String> {
        lines(snapshot)
            .iter()
            .map(|line| strip_ansi_codes(line).into_owned())
            .collect()
    }

    /// This function builds a snapshot around a literal grid.
    fn snapshot(rows: [[u32; 4]; 4]) -> Snapshot {
        Snapshot {
            best: 4096,
            grid: Grid::from_rows(rows).expect("literal grids hold valid tiles"),
            over: false,
            score: 1234,
            won: false,
        }
    }

    #[test]
    fn frame_shows_scores_and_board() {
        let text = plain(&snapshot([[2, 0, 0, 0], [0, 2048, 0, 0], [0; 4], [0, 0, 0, 16384]]));

        assert_eq!(text.len(), 3 + 4 + 3, "header, board and footer");
        assert!(text.iter().any(|line| line.contains("Score 1234")), "score");
        assert!(text.iter().any(|line| line.contains("Best 4096")), "best");
        assert_eq!(
            text.get(3).map(String::as_str),
            Some("  2      .      .      .   "),
            "first row"
        );
        assert!(
            text.get(4).is_some_and(|line| line.contains(" 2048 ")),
            "winning tile"
        );
        assert!(
            text.get(6).is_some_and(|line| line.ends_with("16384 ")),
            "wide tile"
        );
    }

    #[test]
    fn banner_follows_flags() {
        let playing = snapshot([[0; 4]; 4]);
        let won = Snapshot {
            won: true,
            ..playing
        };
        let over = Snapshot {
            over: true,
            ..playing
        };

        assert!(!plain(&playing).iter().any(|line| line.contains("You won")), "no banner");
        assert!(plain(&won).iter().any(|line| line.contains("You won!")), "win banner");
        assert!(plain(&over).iter().any(|line| line.contains("Game over")), "loss banner");
    }

    #[test]
    fn help_lists_every_bound_key() {
        let text = plain(&snapshot([[0; 4]; 4]));
        let help = text.last().map(String::as_str).unwrap_or_default();

        for (key, label) in [
            ('c', "c continue"),
            ('r', "r new game"),
            ('q', "q quit"),
            ('w', "wasd"),
        ] {
            assert!(
                crate::input::action(console::Key::Char(key)).is_some(),
                "{key} is bound"
            );
            assert!(help.contains(label), "help mentions {label:?}: {help}");
        }
    }
}
