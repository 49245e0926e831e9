use alloc::vec::Vec;
use core::ops::{Index, IndexMut};
use ndarray::Array2;

use crate::*;

/// Snapshot of the whole board as last reported by the server.
///
/// Cells are stored as `(row, column)` in standard layout, so the backing
/// slice is exactly the flat `y * width + x` order used on the wire.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    size: Coord2,
    cells: Array2<CellState>,
}

impl Grid {
    /// Board where every cell is still unopened.
    pub fn new(size: Coord2) -> Result<Self> {
        let cells = alloc::vec![CellState::Hidden; mult(size.0, size.1) as usize];
        Self::from_cells(size, cells)
    }

    pub fn from_cells(size: Coord2, cells: Vec<CellState>) -> Result<Self> {
        let (width, height) = size;
        if width == 0 || height == 0 {
            return Err(GameError::InvalidBoardShape);
        }

        let cells = Array2::from_shape_vec((usize::from(height), usize::from(width)), cells)
            .map_err(|_| GameError::InvalidBoardShape)?;
        Ok(Self { size, cells })
    }

    pub fn from_codes(size: Coord2, codes: &[i16]) -> Result<Self> {
        let cells = codes
            .iter()
            .map(|&code| CellState::from_code(code))
            .collect::<Result<Vec<_>>>()?;
        Self::from_cells(size, cells)
    }

    pub fn size(&self) -> Coord2 {
        self.size
    }

    pub fn width(&self) -> Coord {
        self.size.0
    }

    pub fn height(&self) -> Coord {
        self.size.1
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        in_bounds(coords, self.size)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.contains(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn flat_index(&self, coords: Coord2) -> CellIndex {
        flat_index(coords, self.size.0)
    }

    pub fn coords_of(&self, index: CellIndex) -> Option<Coord2> {
        let width = CellIndex::from(self.size.0);
        let x = Coord::try_from(index % width).ok()?;
        let y = Coord::try_from(index / width).ok()?;
        self.validate_coords((x, y)).ok()
    }

    pub fn get(&self, coords: Coord2) -> Option<CellState> {
        self.contains(coords)
            .then(|| self.cells[coords.to_nd_index()])
    }

    pub fn as_slice(&self) -> &[CellState] {
        self.cells
            .as_slice()
            .expect("grid storage should be standard layout")
    }

    pub fn codes(&self) -> Vec<i16> {
        self.as_slice().iter().map(|cell| cell.code()).collect()
    }

    pub fn count(&self, state: CellState) -> CellCount {
        self.cells
            .iter()
            .filter(|&&cell| cell == state)
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX)
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size)
    }
}

impl Index<Coord2> for Grid {
    type Output = CellState;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl IndexMut<Coord2> for Grid {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.cells[coords.to_nd_index()]
    }
}
