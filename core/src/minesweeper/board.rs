use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::placement::place_mines;
use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difficulty {
    pub cols: Coord,
    pub rows: Coord,
    pub mines: CellCount,
}

impl Difficulty {
    pub const EASY: Self = Self::new_unchecked(9, 9, 10);
    pub const MEDIUM: Self = Self::new_unchecked(16, 16, 40);
    pub const HARD: Self = Self::new_unchecked(30, 16, 99);

    const fn new_unchecked(cols: Coord, rows: Coord, mines: CellCount) -> Self {
        Self { cols, rows, mines }
    }

    /// Clamps to at least a 1x1 board and leaves room for one safe first click.
    pub fn new(cols: Coord, rows: Coord, mines: CellCount) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        let mines = mines.min(mult(cols, rows).saturating_sub(1));
        Self::new_unchecked(cols, rows, mines)
    }

    pub const fn size(&self) -> Coord2 {
        (self.cols, self.rows)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.cols, self.rows)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Level {
    pub const KEYS: &'static [&'static str] = &["easy", "medium", "hard"];

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    pub const fn difficulty(self) -> Difficulty {
        match self {
            Self::Easy => Difficulty::EASY,
            Self::Medium => Difficulty::MEDIUM,
            Self::Hard => Difficulty::HARD,
        }
    }
}

/// Hidden content of a cell; fixed once mines are placed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Mine,
    Empty(u8),
}

impl Default for Cell {
    fn default() -> Self {
        Self::Empty(0)
    }
}

impl Cell {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }
}

/// What the player has done to a cell. A single enum keeps "revealed" and
/// "flagged" mutually exclusive.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mark {
    #[default]
    Hidden,
    Revealed,
    Flagged,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardState {
    /// Before the first reveal; no mines exist yet.
    #[default]
    Idle,
    Active,
    Won,
    Lost,
}

impl BoardState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Changed)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    difficulty: Difficulty,
    cells: Array2<Cell>,
    marks: Array2<Mark>,
    revealed_count: CellCount,
    flag_count: CellCount,
    state: BoardState,
    triggered_mine: Option<Coord2>,
}

impl Board {
    pub fn new(difficulty: Difficulty) -> Self {
        let size = difficulty.size().to_nd_index();
        Self {
            difficulty,
            cells: Array2::default(size),
            marks: Array2::default(size),
            revealed_count: 0,
            flag_count: 0,
            state: BoardState::Idle,
            triggered_mine: None,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn size(&self) -> Coord2 {
        self.difficulty.size()
    }

    pub fn mine_count(&self) -> CellCount {
        self.difficulty.mines
    }

    pub fn state(&self) -> BoardState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn flag_count(&self) -> CellCount {
        self.flag_count
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    /// Mines minus flags; negative when the player over-flags.
    pub fn mines_left(&self) -> isize {
        self.difficulty.mines as isize - self.flag_count as isize
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.cells[coords.to_nd_index()]
    }

    pub fn mark_at(&self, coords: Coord2) -> Mark {
        self.marks[coords.to_nd_index()]
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn contains(&self, x: i32, y: i32) -> Option<Coord2> {
        let x = Coord::try_from(x).ok()?;
        let y = Coord::try_from(y).ok()?;
        self.validate_coords((x, y)).ok()
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (cols, rows) = self.size();
        if coords.0 < cols && coords.1 < rows {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    /// Reveals a cell, laying out the mines first if this is the opening move.
    pub fn reveal<R: Rng + ?Sized>(&mut self, coords: Coord2, rng: &mut R) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;
        self.check_not_finished()?;

        if self.marks[coords.to_nd_index()] != Mark::Hidden {
            return Ok(RevealOutcome::NoChange);
        }

        if self.state == BoardState::Idle {
            place_mines(&mut self.cells, self.difficulty.mines, coords, rng);
            self.state = BoardState::Active;
            log::debug!("first reveal at {:?}, mines placed", coords);
        }

        if self.cells[coords.to_nd_index()].is_mine() {
            self.marks[coords.to_nd_index()] = Mark::Revealed;
            self.triggered_mine = Some(coords);
            self.end_game(false);
            return Ok(RevealOutcome::HitMine);
        }

        self.flood_reveal(coords);

        if self.revealed_count >= self.difficulty.safe_cells() {
            self.end_game(true);
            Ok(RevealOutcome::Won)
        } else {
            Ok(RevealOutcome::Revealed)
        }
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.validate_coords(coords)?;
        self.check_not_finished()?;

        let mark = &mut self.marks[coords.to_nd_index()];
        Ok(match *mark {
            Mark::Hidden => {
                *mark = Mark::Flagged;
                self.flag_count += 1;
                MarkOutcome::Changed
            }
            Mark::Flagged => {
                *mark = Mark::Hidden;
                self.flag_count -= 1;
                MarkOutcome::Changed
            }
            Mark::Revealed => MarkOutcome::NoChange,
        })
    }

    /// Depth-first zero expansion from `start`, which must be a hidden safe cell.
    fn flood_reveal(&mut self, start: Coord2) {
        let mut stack = Vec::from([start]);

        while let Some(coords) = stack.pop() {
            let ix = coords.to_nd_index();
            if self.marks[ix] != Mark::Hidden {
                continue;
            }

            self.marks[ix] = Mark::Revealed;
            self.revealed_count += 1;

            if self.cells[ix] == Cell::Empty(0) {
                stack.extend(self.cells.moore_neighbors(coords).filter(|&pos| {
                    self.marks[pos.to_nd_index()] == Mark::Hidden
                        && !self.cells[pos.to_nd_index()].is_mine()
                }));
            }
        }
        log::trace!("revealed {} safe cells so far", self.revealed_count);
    }

    fn end_game(&mut self, won: bool) {
        if self.state.is_finished() {
            return;
        }

        self.state = if won { BoardState::Won } else { BoardState::Lost };
        log::debug!("game over: {:?}", self.state);

        for (cell, mark) in self.cells.iter().zip(self.marks.iter_mut()) {
            if !cell.is_mine() || *mark != Mark::Hidden {
                continue;
            }
            if won {
                *mark = Mark::Flagged;
                self.flag_count += 1;
            } else {
                *mark = Mark::Revealed;
            }
        }
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }

    #[cfg(test)]
    pub(crate) fn with_mines(difficulty: Difficulty, mines: &[Coord2]) -> Self {
        let mut board = Self::new(difficulty);
        for &coords in mines {
            board.cells[coords.to_nd_index()] = Cell::Mine;
        }
        super::placement::fill_adjacency(&mut board.cells);
        board.state = BoardState::Active;
        board
    }
}
