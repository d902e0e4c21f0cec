//! This module holds the one-dimensional half of a move. A row or a column is pulled out of the
//! grid, slid toward one of its two edges, and written back by the caller.

use super::{Cell, SIZE};

/// This enum tells which end of a line the tiles are pushed against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Edge {
    /// This variant packs the tiles against the last index of the line, as right and down do.
    Far,
    /// This variant packs the tiles against index zero, as left and up do.
    Near,
}

/// This function slides a single line toward `edge`, merging adjacent equal tiles pairwise. It
/// returns the new line together with the sum of the tiles created by merges. The far edge is
/// handled as the mirror image of the near one.
pub(crate) fn slide(line: [Cell; SIZE], edge: Edge) -> ([Cell; SIZE], u32) {
    match edge {
        Edge::Near => pack(line),
        Edge::Far => {
            let mut mirrored = line;
            mirrored.reverse();
            let (mut packed, gained) = pack(mirrored);
            packed.reverse();
            (packed, gained)
        }
    }
}

/// This function drops the empty cells of a line and walks the remaining tiles from index zero.
/// When a tile equals the one right after it, both are consumed and replaced by their double, so a
/// tile born from a merge is never looked at again during the same move. A pair whose double does
/// not fit in a `u32` stays apart. The result is padded with empty cells at the tail.
fn pack(line: [Cell; SIZE]) -> ([Cell; SIZE], u32) {
    let mut tiles = line.into_iter().flatten().peekable();
    let mut packed = [None; SIZE];
    let mut gained: u32 = 0;

    for slot in &mut packed {
        let Some(value) = tiles.next() else {
            break;
        };

        let merged = value
            .checked_mul(2)
            .filter(|_| tiles.next_if_eq(&value).is_some());
        if let Some(double) = merged {
            gained = gained.saturating_add(double);
        }
        *slot = Some(merged.unwrap_or(value));
    }

    (packed, gained)
}
