use chordsweep_core::{CellState, Coord};

fn glyph(cell: CellState) -> char {
    use CellState::*;
    match cell {
        QuestionMarked => '?',
        Hidden => '#',
        Flagged => 'F',
        Revealed(count) => match count.get() {
            0 => '.',
            count => char::from(b'0' + count),
        },
        Mine | MineMarker => '*',
        TriggeredMine => 'X',
        Misflagged => 'x',
    }
}

/// Draws the board one row per line.
pub(crate) fn render(cells: &[CellState], width: Coord) -> String {
    let mut out = String::new();
    for row in cells.chunks(usize::from(width.max(1))) {
        out.extend(row.iter().map(|&cell| glyph(cell)));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chordsweep_core::Grid;

    #[test]
    fn draws_rows() {
        let grid = Grid::from_codes((3, 2), &[-2, 0, 3, -1, 65, 66]).unwrap();

        assert_eq!(render(grid.as_slice(), grid.width()), "#.3\nFXx\n");
    }
}
