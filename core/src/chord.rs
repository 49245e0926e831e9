use smallvec::SmallVec;

use crate::*;

/// Flat indices of cells drawn as pressed without having been opened.
pub type PressedCells = SmallVec<[CellIndex; 8]>;

/// Unopened neighbors that a chord centered on `origin` would try to open.
///
/// `origin_state` is the state captured when the press started rather than
/// the one currently in `grid`. Only an opened numbered origin yields targets;
/// anything else, including an origin outside the board, yields nothing.
pub fn chord_targets(grid: &Grid, origin: Coord2, origin_state: CellState) -> PressedCells {
    if !grid.contains(origin) {
        log::warn!(
            "Chord origin {:?} outside board of size {:?}",
            origin,
            grid.size()
        );
        return PressedCells::new();
    }

    if !origin_state.is_revealed() {
        return PressedCells::new();
    }

    let origin_index = grid.flat_index(origin);
    grid.iter_neighbors(origin)
        .filter(|&pos| grid[pos].is_hidden())
        .map(|pos| grid.flat_index(pos))
        .filter(|&index| index != origin_index)
        .collect()
}

/// Cells to highlight while the pointer is held down on `origin`.
///
/// An unopened origin previews only itself since releasing will open just that
/// cell. An opened number previews its chord targets.
pub fn press_preview(grid: &Grid, origin: Coord2, origin_state: CellState) -> PressedCells {
    match origin_state {
        CellState::Hidden if grid.contains(origin) => {
            smallvec::smallvec![grid.flat_index(origin)]
        }
        CellState::Revealed(_) => chord_targets(grid, origin, origin_state),
        _ => PressedCells::new(),
    }
}

/// [`press_preview`] over the raw wire representation.
///
/// Only the origin code and the codes of its neighbors are inspected, so an
/// unrecognized code elsewhere on the board does not affect the result. A grid
/// of the wrong length, an origin off the board or an unknown origin code
/// degrade to an empty result.
pub fn chord_targets_from_codes(
    codes: &[i16],
    size: Coord2,
    origin: Coord2,
    origin_code: i16,
) -> PressedCells {
    let (width, height) = size;
    if codes.len() != mult(width, height) as usize || !in_bounds(origin, size) {
        log::warn!(
            "Ignoring chord preview at {:?} on {} codes for board of size {:?}",
            origin,
            codes.len(),
            size
        );
        return PressedCells::new();
    }

    let origin_index = flat_index(origin, width);
    match CellState::from_code(origin_code) {
        Ok(CellState::Hidden) => smallvec::smallvec![origin_index],
        Ok(CellState::Revealed(_)) => NeighborIter::new(origin, size)
            .map(|pos| flat_index(pos, width))
            .filter(|&index| index != origin_index && codes[index] == CellState::HIDDEN_CODE)
            .collect(),
        Ok(_) => PressedCells::new(),
        Err(err) => {
            log::warn!("Ignoring chord preview on malformed origin: {}", err);
            PressedCells::new()
        }
    }
}
