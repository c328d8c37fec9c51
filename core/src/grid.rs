use core::ops::Index;
use ndarray::Array2;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::line_coords;
use crate::*;

/// Square matrix of tiles, indexed `(row, col)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    cells: Array2<Tile>,
}

/// Result of sliding every line of a grid in one direction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slide {
    pub grid: Grid,
    pub moved: bool,
    pub score_delta: Score,
    /// Positions in the new grid that hold a freshly merged tile.
    pub merged: Vec<Coord2>,
}

/// Result of sliding a single line towards its index 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineMerge {
    pub tiles: Vec<Tile>,
    pub moved: bool,
    pub score_delta: Score,
    /// Indices into `tiles` that hold a merged tile.
    pub merged: Vec<usize>,
}

/// Compacts `line` towards index 0, then merges adjacent equal pairs once each, scanning from index 0.
pub fn merge_line(line: &[Tile]) -> LineMerge {
    let mut tiles = Vec::with_capacity(line.len());
    let mut merged = Vec::new();
    let mut score_delta: Score = 0;

    let mut compacted = line.iter().copied().filter(|tile| !tile.is_empty()).peekable();
    while let Some(tile) = compacted.next() {
        if compacted.next_if(|&next| tile.merges_with(next)).is_some() {
            let doubled = tile.doubled();
            merged.push(tiles.len());
            score_delta = score_delta.saturating_add(doubled.value());
            tiles.push(doubled);
        } else {
            tiles.push(tile);
        }
    }
    tiles.resize(line.len(), Tile::EMPTY);

    LineMerge {
        moved: tiles.as_slice() != line,
        tiles,
        score_delta,
        merged,
    }
}

impl Grid {
    pub fn new(size: Coord) -> Self {
        Self {
            cells: Array2::default((size, size).to_nd_index()),
        }
    }

    /// Builds a grid from raw row values, checking it is square and holds only valid tiles.
    pub fn from_rows<R: AsRef<[u32]>>(rows: &[R]) -> Result<Self> {
        let tile_rows = rows
            .iter()
            .map(|row| row.as_ref().iter().map(|&value| Tile::new(value)).collect())
            .collect::<Result<Vec<Vec<Tile>>>>()?;
        Self::from_tile_rows(tile_rows)
    }

    fn from_tile_rows(rows: Vec<Vec<Tile>>) -> Result<Self> {
        let size = rows.len();
        if size == 0 || Coord::try_from(size).is_err() || rows.iter().any(|row| row.len() != size) {
            return Err(GameError::InvalidBoardShape);
        }
        if let Some(tile) = rows.iter().flatten().find(|tile| !Tile::is_valid_value(tile.value())) {
            return Err(GameError::InvalidTile(tile.value()));
        }

        let cells = Array2::from_shape_vec((size, size), rows.into_iter().flatten().collect())
            .map_err(|_| GameError::InvalidBoardShape)?;
        Ok(Self { cells })
    }

    pub fn size(&self) -> Coord {
        Coord::try_from(self.cells.nrows()).unwrap_or(Coord::MAX)
    }

    pub fn to_rows(&self) -> Vec<Vec<u32>> {
        self.cells
            .rows()
            .into_iter()
            .map(|row| row.iter().map(|&tile| tile.value()).collect())
            .collect()
    }

    /// Places `tile`, returning false when `coords` is outside the grid.
    pub(crate) fn place(&mut self, coords: Coord2, tile: Tile) -> bool {
        match self.cells.get_mut(coords.to_nd_index()) {
            Some(cell) => {
                *cell = tile;
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord2, Tile)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, col), &tile)| ((row as Coord, col as Coord), tile))
    }

    pub fn empty_cells(&self) -> Vec<Coord2> {
        self.iter()
            .filter(|(_, tile)| tile.is_empty())
            .map(|(coords, _)| coords)
            .collect()
    }

    pub fn has_empty_cell(&self) -> bool {
        self.cells.iter().any(|tile| tile.is_empty())
    }

    /// Whether two orthogonally adjacent cells hold equal tiles.
    pub fn has_merge_pair(&self) -> bool {
        self.iter().any(|(coords, tile)| {
            self.cells
                .iter_forward_neighbors(coords)
                .any(|neighbor| tile.merges_with(self[neighbor]))
        })
    }

    pub fn can_move(&self) -> bool {
        self.has_empty_cell() || self.has_merge_pair()
    }

    pub fn contains(&self, tile: Tile) -> bool {
        self.cells.iter().any(|&cell| cell == tile)
    }

    pub fn max_tile(&self) -> Tile {
        self.cells.iter().copied().max().unwrap_or(Tile::EMPTY)
    }

    /// Checks that the grid has the expected side length.
    pub fn validate(&self, size: Coord) -> Result<()> {
        if self.cells.dim() != (usize::from(size), usize::from(size)) {
            return Err(GameError::InvalidBoardShape);
        }
        match self.cells.iter().find(|tile| !Tile::is_valid_value(tile.value())) {
            Some(tile) => Err(GameError::InvalidTile(tile.value())),
            None => Ok(()),
        }
    }

    pub fn slide(&self, direction: Direction) -> Slide {
        let size = self.size();
        let mut slide = Slide {
            grid: Self::new(size),
            moved: false,
            score_delta: 0,
            merged: Vec::new(),
        };

        for index in 0..size {
            let coords: Vec<Coord2> = line_coords(size, direction, index).collect();
            let line: Vec<Tile> = coords.iter().map(|&pos| self[pos]).collect();
            let result = merge_line(&line);

            slide.moved |= result.moved;
            slide.score_delta = slide.score_delta.saturating_add(result.score_delta);
            slide
                .merged
                .extend(result.merged.iter().filter_map(|&i| coords.get(i).copied()));
            for (&pos, &tile) in coords.iter().zip(&result.tiles) {
                slide.grid.place(pos, tile);
            }
        }

        slide
    }
}

impl Index<Coord2> for Grid {
    type Output = Tile;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl Serialize for Grid {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.cells.rows().into_iter().map(|row| row.to_vec()))
    }
}

impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let rows = Vec::<Vec<Tile>>::deserialize(deserializer)?;
        Self::from_tile_rows(rows).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiles(values: &[u32]) -> Vec<Tile> {
        values.iter().map(|&v| Tile::new(v).unwrap()).collect()
    }

    fn grid(rows: &[[u32; 4]]) -> Grid {
        Grid::from_rows(rows).unwrap()
    }

    #[test]
    fn merge_does_not_cascade() {
        let result = merge_line(&tiles(&[2, 2, 2, 2]));

        assert_eq!(result.tiles, tiles(&[4, 4, 0, 0]));
        assert_eq!(result.merged, vec![0, 1]);
        assert_eq!(result.score_delta, 8);
    }

    #[test]
    fn score_delta_sums_merged_values() {
        let result = merge_line(&tiles(&[2, 2, 4, 4]));

        assert_eq!(result.tiles, tiles(&[4, 8, 0, 0]));
        assert_eq!(result.score_delta, 12);
        assert!(result.moved);
    }

    #[test]
    fn merged_tile_does_not_merge_again() {
        let result = merge_line(&tiles(&[4, 2, 2, 0]));

        assert_eq!(result.tiles, tiles(&[4, 4, 0, 0]));
        assert_eq!(result.merged, vec![1]);
    }

    #[test]
    fn compaction_alone_counts_as_moved() {
        let result = merge_line(&tiles(&[0, 0, 2, 4]));

        assert_eq!(result.tiles, tiles(&[2, 4, 0, 0]));
        assert!(result.moved);
        assert_eq!(result.score_delta, 0);
    }

    #[test]
    fn settled_line_is_not_moved() {
        let result = merge_line(&tiles(&[2, 4, 0, 0]));

        assert!(!result.moved);
        assert!(result.merged.is_empty());
    }

    #[test]
    fn slide_right_maps_merges_back_to_grid_positions() {
        let start = grid(&[[0, 2, 0, 2], [4, 4, 8, 0], [0; 4], [0; 4]]);

        let slide = start.slide(Direction::Right);

        assert!(slide.moved);
        assert_eq!(slide.grid.to_rows()[0], vec![0, 0, 0, 4]);
        assert_eq!(slide.grid.to_rows()[1], vec![0, 0, 8, 8]);
        assert_eq!(slide.merged, vec![(0, 3), (1, 2)]);
        assert_eq!(slide.score_delta, 12);
    }

    #[test]
    fn slide_up_and_down_work_on_columns() {
        let start = grid(&[[2, 0, 0, 0], [0, 0, 0, 0], [2, 0, 0, 0], [4, 0, 0, 0]]);

        let up = start.slide(Direction::Up);
        assert_eq!(up.grid[(0, 0)], Tile::FOUR);
        assert_eq!(up.grid[(1, 0)], Tile::FOUR);
        assert_eq!(up.merged, vec![(0, 0)]);

        let down = start.slide(Direction::Down);
        assert_eq!(down.grid[(3, 0)], Tile::FOUR);
        assert_eq!(down.grid[(2, 0)], Tile::FOUR);
        assert_eq!(down.merged, vec![(2, 0)]);
    }

    #[test]
    fn sliding_twice_in_the_same_direction_is_a_no_op() {
        let start = grid(&[[2, 0, 2, 8], [0, 8, 0, 8], [2, 0, 0, 2], [16, 0, 0, 0]]);

        let first = start.slide(Direction::Left);
        let second = first.grid.slide(Direction::Left);

        assert!(first.moved);
        assert_eq!(first.grid.to_rows()[0], vec![4, 8, 0, 0]);
        assert!(!second.moved);
        assert_eq!(second.grid, first.grid);
    }

    #[test]
    fn full_grid_without_pairs_cannot_move() {
        let locked = grid(&[[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert!(!locked.can_move());

        let vertical_pair = grid(&[[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [2, 8, 16, 32]]);
        assert!(vertical_pair.can_move());

        let mut with_gap = locked.clone();
        with_gap.place((2, 2), Tile::EMPTY);
        assert!(with_gap.can_move());
    }

    #[test]
    fn from_rows_rejects_bad_shapes_and_values() {
        assert_eq!(
            Grid::from_rows(&[vec![2u32, 0], vec![0]]),
            Err(GameError::InvalidBoardShape)
        );
        assert_eq!(
            Grid::from_rows(&[[2u32, 3], [0, 0]]),
            Err(GameError::InvalidTile(3))
        );
        assert_eq!(
            grid(&[[0; 4]; 4]).validate(5),
            Err(GameError::InvalidBoardShape)
        );
    }

    #[test]
    fn serializes_as_rows() {
        let start = grid(&[[2, 0, 0, 0], [0, 4, 0, 0], [0; 4], [0; 4]]);

        let json = serde_json::to_string(&start).unwrap();
        assert_eq!(json, "[[2,0,0,0],[0,4,0,0],[0,0,0,0],[0,0,0,0]]");
        assert_eq!(serde_json::from_str::<Grid>(&json).unwrap(), start);
        assert!(serde_json::from_str::<Grid>("[[2,0],[0,5]]").is_err());
    }
}
