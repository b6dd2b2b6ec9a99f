use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::ops::{Index, IndexMut};

/// Cell coordinate on the simulation grid. `y` is the row, `x` the column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub y: usize,
    pub x: usize,
}

impl Position {
    pub fn new(y: usize, x: usize) -> Self {
        Position { y, x }
    }

    /// Straight-line distance between two cells.
    pub fn distance(&self, other: &Position) -> f64 {
        let dy = self.y as f64 - other.y as f64;
        let dx = self.x as f64 - other.x as f64;
        (dy * dy + dx * dx).sqrt()
    }

    /// King-move distance between two cells.
    pub fn chebyshev(&self, other: &Position) -> usize {
        self.y.abs_diff(other.y).max(self.x.abs_diff(other.x))
    }

    /// The single (possibly diagonal) step from `self` toward `target`.
    pub fn step_toward(&self, target: &Position) -> Position {
        Position {
            y: step_axis(self.y, target.y),
            x: step_axis(self.x, target.x),
        }
    }
}

#[inline]
fn step_axis(from: usize, to: usize) -> usize {
    match to.cmp(&from) {
        Ordering::Greater => from + 1,
        Ordering::Less => from - 1,
        Ordering::Equal => from,
    }
}

/// In-bounds Moore neighbourhood of a cell.
pub type Neighbors = SmallVec<[Position; 8]>;

/// Dense `length x width` field stored row-major.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid<T> {
    length: usize,
    width: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub fn new(length: usize, width: usize, fill: T) -> Self {
        Grid {
            length,
            width,
            cells: vec![fill; length * width],
        }
    }

    /// Overwrite every cell with `value`.
    pub fn fill(&mut self, value: T) {
        for cell in &mut self.cells {
            *cell = value.clone();
        }
    }
}

impl<T> Grid<T> {
    /// Number of rows.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.y < self.length && pos.x < self.width
    }

    #[inline]
    fn cell_index(&self, pos: Position) -> usize {
        assert!(
            self.contains(pos),
            "position {:?} outside {}x{} grid",
            pos,
            self.length,
            self.width
        );
        pos.y * self.width + pos.x
    }

    pub fn get(&self, pos: Position) -> Option<&T> {
        if self.contains(pos) {
            self.cells.get(pos.y * self.width + pos.x)
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, pos: Position) -> Option<&mut T> {
        if self.contains(pos) {
            self.cells.get_mut(pos.y * self.width + pos.x)
        } else {
            None
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    /// Row slices, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.cells.chunks(self.width.max(1))
    }

    /// Every position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let width = self.width;
        (0..self.length * self.width).map(move |idx| Position::new(idx / width, idx % width))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, &T)> {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, cell)| (Position::new(idx / width, idx % width), cell))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Position, &mut T)> {
        let width = self.width;
        self.cells
            .iter_mut()
            .enumerate()
            .map(move |(idx, cell)| (Position::new(idx / width, idx % width), cell))
    }

    /// The up-to-eight cells at Chebyshev distance 1, in a fixed order
    /// (row by row, left to right). Off-grid neighbours are dropped.
    pub fn moore_neighbors(&self, pos: Position) -> Neighbors {
        let mut neighbors = Neighbors::new();
        for dy in -1isize..=1 {
            for dx in -1isize..=1 {
                if dy == 0 && dx == 0 {
                    continue;
                }
                if let Some(cell) = self.offset(pos, dy, dx) {
                    neighbors.push(cell);
                }
            }
        }
        neighbors
    }

    /// In-bounds cells whose Chebyshev distance to `pos` is exactly `ring`.
    pub fn ring(&self, pos: Position, ring: usize) -> Vec<Position> {
        if ring == 0 {
            return if self.contains(pos) { vec![pos] } else { Vec::new() };
        }
        let r = ring as isize;
        let mut cells = Vec::with_capacity(8 * ring);
        for dy in -r..=r {
            for dx in -r..=r {
                if dy.abs() != r && dx.abs() != r {
                    continue;
                }
                if let Some(cell) = self.offset(pos, dy, dx) {
                    cells.push(cell);
                }
            }
        }
        cells
    }

    fn offset(&self, pos: Position, dy: isize, dx: isize) -> Option<Position> {
        let y = pos.y.checked_add_signed(dy)?;
        let x = pos.x.checked_add_signed(dx)?;
        let cell = Position::new(y, x);
        self.contains(cell).then_some(cell)
    }

    /// Build a new grid of the same shape by combining this grid cell by cell
    /// with `other`.
    pub fn zip_map<U, V>(&self, other: &Grid<U>, mut f: impl FnMut(&T, &U) -> V) -> Grid<V> {
        assert_eq!(
            (self.length, self.width),
            (other.length, other.width),
            "grid shapes differ"
        );
        Grid {
            length: self.length,
            width: self.width,
            cells: self
                .cells
                .iter()
                .zip(other.cells.iter())
                .map(|(a, b)| f(a, b))
                .collect(),
        }
    }
}

impl Grid<bool> {
    /// Number of set cells.
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|cell| **cell).count()
    }
}

impl<T> Index<Position> for Grid<T> {
    type Output = T;

    fn index(&self, pos: Position) -> &T {
        &self.cells[self.cell_index(pos)]
    }
}

impl<T> IndexMut<Position> for Grid<T> {
    fn index_mut(&mut self, pos: Position) -> &mut T {
        let idx = self.cell_index(pos);
        &mut self.cells[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_has_three_neighbors() {
        let grid = Grid::new(10, 10, 0u8);
        let neighbors = grid.moore_neighbors(Position::new(0, 0));
        assert_eq!(neighbors.len(), 3);
        assert!(neighbors.iter().all(|p| grid.contains(*p)));
        assert_eq!(
            neighbors.as_slice(),
            &[Position::new(0, 1), Position::new(1, 0), Position::new(1, 1)]
        );
    }

    #[test]
    fn far_corner_and_edge_neighbors() {
        let grid = Grid::new(4, 6, 0u8);
        assert_eq!(grid.moore_neighbors(Position::new(3, 5)).len(), 3);
        assert_eq!(grid.moore_neighbors(Position::new(0, 3)).len(), 5);
        assert_eq!(grid.moore_neighbors(Position::new(2, 2)).len(), 8);
    }

    #[test]
    fn ring_two_excludes_inner_cells() {
        let grid = Grid::new(10, 10, 0u8);
        let center = Position::new(5, 5);
        let ring = grid.ring(center, 2);
        assert_eq!(ring.len(), 16);
        assert!(ring.iter().all(|p| p.chebyshev(&center) == 2));
    }

    #[test]
    fn step_toward_moves_one_cell_diagonally() {
        let from = Position::new(5, 5);
        assert_eq!(from.step_toward(&Position::new(9, 1)), Position::new(6, 4));
        assert_eq!(from.step_toward(&Position::new(5, 0)), Position::new(5, 4));
        assert_eq!(from.step_toward(&from), from);
    }

    #[test]
    fn indexing_is_row_major() {
        let mut grid = Grid::new(3, 4, 0u32);
        grid[Position::new(1, 2)] = 7;
        assert_eq!(grid.as_slice()[6], 7);
        assert_eq!(grid.get(Position::new(3, 0)), None);
        assert_eq!(grid.rows().nth(1).unwrap(), &[0, 0, 7, 0]);
    }

    #[test]
    #[should_panic]
    fn out_of_bounds_index_panics() {
        let grid = Grid::new(2, 2, 0u8);
        let _ = grid[Position::new(0, 2)];
    }
}
