use ndarray::Array2;
use rand::Rng;

use super::Cell;
use crate::*;

/// How much of the area around the first click is kept free of mines.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StartPolicy {
    /// The whole 3x3 block around the first click.
    AvoidBlock,
    /// Only the clicked cell itself.
    AvoidCell,
    /// No guarantee at all; only used when the board is completely full.
    Anywhere,
}

impl StartPolicy {
    /// Picks the strongest policy that still leaves room for `mines`.
    fn for_board(mines: CellCount, total: CellCount, block: CellCount) -> Self {
        if mines.saturating_add(block) <= total {
            Self::AvoidBlock
        } else if mines < total {
            log::warn!("Cannot keep first click neighborhood clear, fallback to safe cell only");
            Self::AvoidCell
        } else {
            log::warn!("Board would be full of mines, first click cannot be safe");
            Self::Anywhere
        }
    }
}

/// Scatters `mines` uniformly over `cells`, keeping `start` (and its neighborhood
/// when possible) clear, then fills in adjacency counts. Returns the number placed.
pub(crate) fn place_mines<R: Rng + ?Sized>(
    cells: &mut Array2<Cell>,
    mines: CellCount,
    start: Coord2,
    rng: &mut R,
) -> CellCount {
    let total = cells.len();
    let mines = mines.min(total.try_into().unwrap_or(CellCount::MAX));
    let mut banned: Array2<bool> = Array2::default(cells.dim());
    let block: CellCount = cells
        .moore_block(start)
        .count()
        .try_into()
        .unwrap_or(CellCount::MAX);

    match StartPolicy::for_board(mines, total.try_into().unwrap_or(CellCount::MAX), block) {
        StartPolicy::AvoidBlock => {
            for pos in cells.moore_block(start) {
                banned[pos.to_nd_index()] = true;
            }
        }
        StartPolicy::AvoidCell => banned[start.to_nd_index()] = true,
        StartPolicy::Anywhere => {}
    }

    let (cols, _) = cells.dim();
    let mut placed: CellCount = 0;
    while placed < mines {
        let pick = rng.random_range(0..total);
        let ix = [pick % cols, pick / cols];
        if banned[ix] || cells[ix].is_mine() {
            continue;
        }
        cells[ix] = Cell::Mine;
        placed += 1;
    }

    fill_adjacency(cells);
    log::debug!("placed {} mines avoiding {:?}", placed, start);
    placed
}

pub(crate) fn fill_adjacency(cells: &mut Array2<Cell>) {
    let (cols, rows) = cells.dim();
    for x in 0..cols {
        for y in 0..rows {
            // dimensions come from a Coord2 board, so they always fit
            let coords = (x as Coord, y as Coord);
            if cells[[x, y]].is_mine() {
                continue;
            }
            let count = cells
                .moore_neighbors(coords)
                .filter(|&pos| cells[pos.to_nd_index()].is_mine())
                .count();
            cells[[x, y]] = Cell::Empty(count as u8);
        }
    }
}
