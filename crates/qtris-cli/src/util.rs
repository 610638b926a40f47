use qtris_engine::{Board, Piece};

/// ASCII rendering of the board with the falling piece overlaid.
///
/// Locked cells are `#`, the falling piece is `@`; piece cells still
/// above the grid are not drawn.
pub(crate) fn render_field(board: &Board, piece: &Piece) -> String {
    let mut grid: Vec<Vec<char>> = board
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| if cell.is_filled() { '#' } else { '.' })
                .collect()
        })
        .collect();

    for (x, y) in piece.cells() {
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            continue;
        };
        if y < grid.len() && x < grid[y].len() {
            grid[y][x] = '@';
        }
    }

    grid.into_iter()
        .map(|row| row.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
