use serde::{Deserialize, Serialize};

use crate::piece::{Piece, PieceKind};

/// Score bonus for clearing 0-4 lines with a single lock.
const SCORE_TABLE: [u32; 5] = [0, 40, 100, 300, 1200];

/// A single cell in the board grid.
///
/// A filled cell remembers which piece kind produced it so hosts can
/// render the original colour; the engine itself only distinguishes
/// empty from filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Empty cell (no locked piece).
    #[default]
    Empty,
    /// Cell locked by a piece of the given kind.
    Filled(PieceKind),
}

impl Cell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    #[must_use]
    pub fn is_filled(self) -> bool {
        !self.is_empty()
    }
}

/// The fixed-size playing grid.
///
/// Dimensions are chosen once at construction (10×20 for the standard
/// demos) and never change; every lock/clear sequence preserves them.
/// Row 0 is the top of the visible grid. Piece cells with a negative
/// row are above the grid: they are checked against the horizontal
/// bounds but never against occupancy, and locking skips them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    width: usize,
    height: usize,
    rows: Vec<Vec<Cell>>,
}

impl Board {
    /// Creates an empty board.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero. A zero-size board is a host
    /// misconfiguration, not a recoverable runtime error.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "board dimensions must be nonzero");
        Self {
            width,
            height,
            rows: vec![vec![Cell::Empty; width]; height],
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns an iterator over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }

    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        self.rows[y][x]
    }

    #[must_use]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.rows[y][x].is_filled()
    }

    /// Checks whether the piece overlaps a wall, the floor, or an
    /// occupied cell.
    ///
    /// Out-of-bounds and overlap are treated uniformly as "invalid
    /// placement"; the caller reverts whatever mutation produced the
    /// piece. Cells above the grid (row < 0) are only checked against
    /// the horizontal bounds.
    #[must_use]
    pub fn collides(&self, piece: &Piece) -> bool {
        for (x, y) in piece.cells() {
            if x < 0 || x >= self.width as i32 || y >= self.height as i32 {
                return true;
            }
            if y >= 0 && self.is_occupied(x as usize, y as usize) {
                return true;
            }
        }
        false
    }

    /// Merges the piece into the grid at its current position.
    ///
    /// Cells above the grid (row < 0) are skipped, not written.
    pub fn lock(&mut self, piece: &Piece) {
        for (x, y) in piece.cells() {
            if y >= 0 {
                self.rows[y as usize][x as usize] = Cell::Filled(piece.kind());
            }
        }
    }

    /// Clears every full row and returns how many were removed.
    ///
    /// Remaining rows keep their relative order; that many empty rows
    /// are inserted at the top, so the grid dimensions are invariant.
    pub fn clear_full_rows(&mut self) -> usize {
        let width = self.width;
        let before = self.rows.len();
        self.rows.retain(|row| row.iter().any(|c| c.is_empty()));
        let count = before - self.rows.len();
        for _ in 0..count {
            self.rows.insert(0, vec![Cell::Empty; width]);
        }
        count
    }

    /// Game-over predicate: any cell in the top row is filled.
    #[must_use]
    pub fn is_top_row_occupied(&self) -> bool {
        self.rows[0].iter().any(|c| c.is_filled())
    }

    /// Score bonus for a simultaneous clear of `cleared` lines.
    ///
    /// # Panics
    ///
    /// Panics if `cleared > 4`; a single lock cannot clear more rows
    /// than a piece spans.
    #[must_use]
    pub fn line_score(cleared: usize) -> u32 {
        assert!(
            cleared < SCORE_TABLE.len(),
            "a single lock clears at most 4 lines, got {cleared}"
        );
        SCORE_TABLE[cleared]
    }

    /// Builds a board from ASCII art for tests.
    ///
    /// `#` is a filled cell, `.` an empty one. Dimensions are taken
    /// from the art: every non-blank line is one row.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let lines: Vec<Vec<char>> = art
            .lines()
            .map(|line| {
                line.chars()
                    .filter(|c| *c == '#' || *c == '.')
                    .collect::<Vec<_>>()
            })
            .filter(|chars| !chars.is_empty())
            .collect();
        let height = lines.len();
        let width = lines.first().map_or(0, Vec::len);
        let mut board = Self::new(width, height);
        for (y, chars) in lines.iter().enumerate() {
            assert_eq!(
                chars.len(),
                width,
                "every row must have exactly {width} cells, got {} at row {y}",
                chars.len(),
            );
            for (x, &ch) in chars.iter().enumerate() {
                if ch == '#' {
                    board.rows[y][x] = Cell::Filled(PieceKind::I);
                }
            }
        }
        board
    }
}

#[cfg(test)]
mod tests {
    use crate::piece::Piece;

    use super::*;

    #[test]
    fn new_board_is_empty() {
        let board = Board::new(10, 20);
        assert_eq!(board.width(), 10);
        assert_eq!(board.height(), 20);
        for row in board.rows() {
            assert!(row.iter().all(|c| c.is_empty()));
        }
    }

    #[test]
    #[should_panic(expected = "board dimensions must be nonzero")]
    fn zero_width_board_is_rejected() {
        let _ = Board::new(0, 20);
    }

    #[test]
    fn collision_at_horizontal_bounds() {
        let board = Board::new(10, 20);
        let mut piece = Piece::spawn(PieceKind::O, 10);

        while piece.x() >= 0 {
            piece = piece.moved_left();
        }
        assert!(board.collides(&piece));

        let mut piece = Piece::spawn(PieceKind::O, 10);
        while piece.cells().iter().all(|&(x, _)| x < 10) {
            piece = piece.moved_right();
        }
        assert!(board.collides(&piece));
    }

    #[test]
    fn collision_at_bottom_bound() {
        let board = Board::new(10, 20);
        let mut piece = Piece::spawn(PieceKind::O, 10);
        for _ in 0..19 {
            piece = piece.moved_down();
        }
        assert!(board.collides(&piece));
    }

    #[test]
    fn cells_above_grid_never_collide_with_contents() {
        let board = Board::from_ascii(
            r"
            ##########
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ",
        );
        // Fully above the (occupied) top row: horizontal bounds only.
        let piece = Piece::spawn(PieceKind::I, 10).moved_up();
        assert!(piece.cells().iter().all(|&(_, y)| y < 0));
        assert!(!board.collides(&piece));
    }

    #[test]
    fn lock_skips_rows_above_grid() {
        let mut board = Board::new(10, 20);
        // Upright I with its top three cells above the grid.
        let piece = Piece::spawn(PieceKind::I, 10)
            .rotated()
            .moved_up()
            .moved_up()
            .moved_up();
        board.lock(&piece);
        let filled: usize = board
            .rows()
            .flat_map(|row| row.iter())
            .filter(|c| c.is_filled())
            .count();
        assert_eq!(filled, 1);
        assert!(board.is_top_row_occupied());
    }

    #[test]
    fn clear_single_full_row() {
        let mut board = Board::from_ascii(
            r"
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            .#........
            ##########
            ",
        );
        assert_eq!(board.clear_full_rows(), 1);
        assert_eq!(board.height(), 20);
        // The partial row above drops into the cleared slot.
        assert_eq!(board.cell(1, 19), Cell::Filled(PieceKind::I));
        assert_eq!(board.cell(0, 19), Cell::Empty);
        assert!(board.rows().next().unwrap().iter().all(|c| c.is_empty()));
    }

    #[test]
    fn clear_preserves_relative_order_of_remaining_rows() {
        let mut board = Board::from_ascii(
            r"
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            #.........
            ##########
            .#........
            ##########
            ",
        );
        assert_eq!(board.clear_full_rows(), 2);
        assert!(board.is_occupied(0, 18));
        assert!(board.is_occupied(1, 19));
        assert!(!board.is_occupied(0, 19));
    }

    #[test]
    fn clear_nothing_when_no_row_is_full() {
        let mut board = Board::from_ascii(
            r"
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            #########.
            ",
        );
        assert_eq!(board.clear_full_rows(), 0);
        assert!(board.is_occupied(0, 19));
    }

    #[test]
    fn spawn_onto_a_filled_top_row_cell_collides() {
        let mut board = Board::new(10, 20);
        // Fill the cell the O piece's top-left maps to at spawn.
        board.rows[0][4] = Cell::Filled(PieceKind::L);
        let piece = Piece::spawn(PieceKind::O, 10);
        assert!(board.collides(&piece));
        assert!(board.is_top_row_occupied());
    }

    #[test]
    fn line_score_table() {
        assert_eq!(Board::line_score(0), 0);
        assert_eq!(Board::line_score(1), 40);
        assert_eq!(Board::line_score(2), 100);
        assert_eq!(Board::line_score(3), 300);
        assert_eq!(Board::line_score(4), 1200);
    }

    #[test]
    #[should_panic(expected = "a single lock clears at most 4 lines")]
    fn line_score_rejects_impossible_clears() {
        let _ = Board::line_score(5);
    }

    #[test]
    fn dimensions_invariant_across_lock_and_clear() {
        use rand::Rng as _;

        let mut board = Board::new(10, 20);
        let mut rng = rand::rng();
        for _ in 0..50 {
            let kind: PieceKind = rng.random();
            let mut piece = Piece::spawn(kind, 10);
            while !board.collides(&piece.moved_down()) {
                piece = piece.moved_down();
            }
            board.lock(&piece);
            board.clear_full_rows();
            assert_eq!(board.width(), 10);
            assert_eq!(board.height(), 20);
            assert_eq!(board.rows().count(), 20);
            if board.is_top_row_occupied() {
                break;
            }
        }
    }
}
