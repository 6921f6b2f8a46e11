use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Single grid axis used for board width, height, and cell positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Grid coordinates `(x, y)`, column first.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

pub trait MooreExt {
    /// The up-to-8 in-bounds cells around `center`, excluding `center` itself.
    fn moore_neighbors(&self, center: Coord2) -> MooreIter;

    /// The up-to-9 in-bounds cells of the 3x3 block centered on `center`.
    fn moore_block(&self, center: Coord2) -> MooreIter;
}

impl<T> MooreExt for Array2<T> {
    fn moore_neighbors(&self, center: Coord2) -> MooreIter {
        MooreIter::new(center, grid_bounds(self), false)
    }

    fn moore_block(&self, center: Coord2) -> MooreIter {
        MooreIter::new(center, grid_bounds(self), true)
    }
}

fn grid_bounds<T>(grid: &Array2<T>) -> Coord2 {
    let (x, y) = grid.dim();
    (
        x.try_into().unwrap_or(Coord::MAX),
        y.try_into().unwrap_or(Coord::MAX),
    )
}

/// Walks a 3x3 block row by row, skipping anything outside `bounds`.
#[derive(Debug, Clone)]
pub struct MooreIter {
    center: Coord2,
    bounds: Coord2,
    include_center: bool,
    step: u8,
}

impl MooreIter {
    fn new(center: Coord2, bounds: Coord2, include_center: bool) -> Self {
        Self {
            center,
            bounds,
            include_center,
            step: 0,
        }
    }

    fn offset(axis: Coord, delta: u8, bound: Coord) -> Option<Coord> {
        let next = match delta {
            0 => axis.checked_sub(1)?,
            1 => axis,
            _ => axis.checked_add(1)?,
        };
        (next < bound).then_some(next)
    }
}

impl Iterator for MooreIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while self.step < 9 {
            let (dx, dy) = (self.step % 3, self.step / 3);
            self.step += 1;

            if dx == 1 && dy == 1 && !self.include_center {
                continue;
            }

            let Some(x) = Self::offset(self.center.0, dx, self.bounds.0) else {
                continue;
            };
            let Some(y) = Self::offset(self.center.1, dy, self.bounds.1) else {
                continue;
            };
            return Some((x, y));
        }
        None
    }
}

/// A position in surface-local pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned rectangle in surface-local pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub const fn at(origin: Point, w: f64, h: f64) -> Self {
        Self::new(origin.x, origin.y, w, h)
    }

    /// Edge-inclusive hit test.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    pub fn inset(&self, by: f64) -> Self {
        Self::new(self.x + by, self.y + by, self.w - 2. * by, self.h - 2. * by)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2., self.y + self.h / 2.)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_cell_has_three_neighbors() {
        let grid: Array2<bool> = Array2::default([9, 9]);

        let neighbors: Vec<_> = grid.moore_neighbors((0, 0)).collect();

        assert_eq!(neighbors, vec![(1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn interior_block_includes_center() {
        let grid: Array2<bool> = Array2::default([9, 9]);

        assert_eq!(grid.moore_neighbors((4, 4)).count(), 8);
        assert_eq!(grid.moore_block((4, 4)).count(), 9);
        assert!(grid.moore_block((4, 4)).any(|pos| pos == (4, 4)));
    }

    #[test]
    fn far_edge_is_clipped() {
        let grid: Array2<bool> = Array2::default([30, 16]);

        let block: Vec<_> = grid.moore_block((29, 15)).collect();

        assert_eq!(block, vec![(28, 14), (29, 14), (28, 15), (29, 15)]);
    }

    #[test]
    fn rect_hit_test_is_edge_inclusive() {
        let rect = Rect::new(10., 10., 20., 30.);

        assert!(rect.contains(Point::new(10., 10.)));
        assert!(rect.contains(Point::new(30., 40.)));
        assert!(!rect.contains(Point::new(30.5, 20.)));
    }
}
