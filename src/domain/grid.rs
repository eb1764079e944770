/// The tile grid: a flat, row-major array of `Tile`.
///
/// Rows are indexed top (0) to bottom (height - 1). Every cell always holds
/// exactly one tile.
///
/// Reads are bounds-tolerant: anything outside the grid reads as
/// `Unbreakable`, so moves off the edge are refused and the bottom row is a
/// floor. Writes outside the grid are contract violations and panic.

use super::tile::{Tile, TileKind};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Tile>,
}

impl Grid {
    pub fn new(width: usize, height: usize, fill: Tile) -> Self {
        Grid { width, height, cells: vec![fill; width * height] }
    }

    /// Build from rows. All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        assert!(
            rows.iter().all(|r| r.len() == width),
            "grid rows must all have length {width}"
        );
        Grid { width, height, cells: rows.into_iter().flatten().collect() }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn idx(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "cell ({x}, {y}) outside {}x{} grid", self.width, self.height
        );
        y * self.width + x
    }

    #[inline]
    pub fn in_bounds(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Tile at an in-bounds cell.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Tile {
        self.cells[self.idx(x, y)]
    }

    /// Tile at signed coordinates. Outside the grid = wall.
    #[inline]
    pub fn tile_at(&self, x: isize, y: isize) -> Tile {
        if self.in_bounds(x, y) {
            self.cells[y as usize * self.width + x as usize]
        } else {
            Tile::Unbreakable
        }
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, tile: Tile) {
        let i = self.idx(x, y);
        self.cells[i] = tile;
    }

    /// Row-major iteration over every cell.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
        let w = self.width;
        self.cells.iter().enumerate().map(move |(i, &t)| (i % w, i / w, t))
    }

    pub fn count(&self, kind: TileKind) -> usize {
        self.cells.iter().filter(|t| t.kind() == kind).count()
    }

    /// First cell of `kind` in row-major order.
    pub fn find(&self, kind: TileKind) -> Option<(usize, usize)> {
        self.cells().find(|&(_, _, t)| t.kind() == kind).map(|(x, y, _)| (x, y))
    }

    /// Replace every cell of `kind` with Air. Returns how many were cleared.
    pub fn dissolve(&mut self, kind: TileKind) -> usize {
        let mut cleared = 0;
        for cell in self.cells.iter_mut().filter(|t| t.kind() == kind) {
            *cell = Tile::Air;
            cleared += 1;
        }
        cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fall::FallState;

    fn sample() -> Grid {
        Grid::from_rows(vec![
            vec![Tile::Unbreakable, Tile::Lock1, Tile::Unbreakable],
            vec![Tile::Player, Tile::Air, Tile::Lock1],
            vec![Tile::Stone(FallState::Resting), Tile::Lock2, Tile::Air],
        ])
    }

    #[test]
    fn row_major_indexing() {
        let g = sample();
        assert_eq!(g.width(), 3);
        assert_eq!(g.height(), 3);
        assert_eq!(g.get(2, 1), Tile::Lock1);
        assert_eq!(g.get(0, 2), Tile::Stone(FallState::Resting));
    }

    #[test]
    fn out_of_bounds_reads_as_wall() {
        let g = sample();
        assert_eq!(g.tile_at(-1, 1), Tile::Unbreakable);
        assert_eq!(g.tile_at(1, 3), Tile::Unbreakable);
        assert_eq!(g.tile_at(1, 1), Tile::Air);
    }

    #[test]
    #[should_panic]
    fn out_of_bounds_write_panics() {
        let mut g = sample();
        g.set(3, 0, Tile::Air);
    }

    #[test]
    fn dissolve_clears_only_matching_kind() {
        let mut g = sample();
        assert_eq!(g.dissolve(TileKind::Lock1), 2);
        assert_eq!(g.count(TileKind::Lock1), 0);
        assert_eq!(g.count(TileKind::Lock2), 1);
        assert_eq!(g.get(1, 0), Tile::Air);
        assert_eq!(g.dissolve(TileKind::Lock1), 0);
    }

    #[test]
    fn find_and_cells_agree() {
        let g = sample();
        assert_eq!(g.find(TileKind::Player), Some((0, 1)));
        assert_eq!(g.cells().count(), 9);
        let (x, y, t) = g.cells().nth(5).unwrap();
        assert_eq!((x, y, t), (2, 1, Tile::Lock1));
    }

    #[test]
    #[should_panic]
    fn ragged_rows_rejected() {
        Grid::from_rows(vec![vec![Tile::Air, Tile::Air], vec![Tile::Air]]);
    }
}
