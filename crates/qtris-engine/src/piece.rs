use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// A tetromino with kind, rotation, and a signed board-anchor position.
///
/// The anchor is the top-left of the piece's current shape matrix. The
/// y coordinate may be negative while part of a freshly rotated piece is
/// still above the visible grid; collision checks treat those rows as
/// unoccupied (only the horizontal bounds apply there).
///
/// Pieces are immutable: movement and rotation return new `Piece` values,
/// so a caller can test a candidate against the board and simply discard
/// it on collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    kind: PieceKind,
    rotation: u8,
    x: i32,
    y: i32,
}

impl Piece {
    /// Spawns a piece at the top-centre of a board of the given width.
    ///
    /// The horizontal position centres the shape matrix:
    /// `x = width / 2 - shape_width / 2`.
    #[must_use]
    pub fn spawn(kind: PieceKind, board_width: usize) -> Self {
        let shape = kind.shape(0);
        let x = (board_width / 2) as i32 - (shape.cols / 2) as i32;
        Self {
            kind,
            rotation: 0,
            x,
            y: 0,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    #[must_use]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> i32 {
        self.y
    }

    #[must_use]
    pub fn shape(&self) -> &'static Shape {
        self.kind.shape(self.rotation)
    }

    /// Absolute board coordinates of the piece's four filled cells.
    #[must_use]
    pub fn cells(&self) -> ArrayVec<(i32, i32), 4> {
        let mut cells = ArrayVec::new();
        let shape = self.shape();
        for dy in 0..shape.rows {
            for dx in 0..shape.cols {
                if shape.cells[dy][dx] {
                    cells.push((self.x + dx as i32, self.y + dy as i32));
                }
            }
        }
        cells
    }

    #[must_use]
    pub fn moved_left(&self) -> Self {
        Self { x: self.x - 1, ..*self }
    }

    #[must_use]
    pub fn moved_right(&self) -> Self {
        Self { x: self.x + 1, ..*self }
    }

    #[must_use]
    pub fn moved_down(&self) -> Self {
        Self { y: self.y + 1, ..*self }
    }

    #[must_use]
    pub fn moved_up(&self) -> Self {
        Self { y: self.y - 1, ..*self }
    }

    /// Rotates 90° clockwise in place (same anchor, next precomputed
    /// shape matrix). The caller is responsible for reverting if the
    /// result collides.
    #[must_use]
    pub fn rotated(&self) -> Self {
        Self {
            rotation: (self.rotation + 1) % 4,
            ..*self
        }
    }

    /// Serializes the rotated shape matrix as a row-major digit string,
    /// e.g. `"010111"` for an upright T. Used by the tabular agent's
    /// state key.
    #[must_use]
    pub fn shape_key(&self) -> String {
        let shape = self.shape();
        let mut key = String::with_capacity(shape.rows * shape.cols);
        for dy in 0..shape.rows {
            for dx in 0..shape.cols {
                key.push(if shape.cells[dy][dx] { '1' } else { '0' });
            }
        }
        key
    }
}

/// One rotation state of a piece: a tight boolean matrix.
///
/// `rows`/`cols` are the matrix's effective dimensions; cells outside
/// them are always false. Rotation swaps the dimensions (an I piece is
/// 1×4 flat and 4×1 upright).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub cells: [[bool; 4]; 4],
    pub rows: usize,
    pub cols: usize,
}

impl Shape {
    const fn new(rows: usize, cols: usize, cells: [[bool; 4]; 4]) -> Self {
        Self { cells, rows, cols }
    }

    /// 90° clockwise rotation of the tight matrix:
    /// `rotated[x][rows - 1 - y] = cells[y][x]`, dimensions swapped.
    const fn rotated(&self) -> Self {
        let mut cells = [[false; 4]; 4];
        let mut y = 0;
        while y < self.rows {
            let mut x = 0;
            while x < self.cols {
                cells[x][self.rows - 1 - y] = self.cells[y][x];
                x += 1;
            }
            y += 1;
        }
        Self::new(self.cols, self.rows, cells)
    }
}

/// Generates all 4 rotation states of a shape.
///
/// Some kinds have degenerate rotations (O never changes, I and the
/// S/Z pair alternate between two distinct states); the full table is
/// stored anyway so rotation is always `(r + 1) % 4`.
const fn shape_rotations(base: Shape) -> [Shape; 4] {
    let r1 = base.rotated();
    let r2 = r1.rotated();
    let r3 = r2.rotated();
    [base, r1, r2, r3]
}

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// T-piece.
    T = 2,
    /// S-piece.
    S = 3,
    /// Z-piece.
    Z = 4,
    /// L-piece.
    L = 5,
    /// J-piece.
    J = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        match rng.random_range(0..=6) {
            0 => PieceKind::I,
            1 => PieceKind::O,
            2 => PieceKind::T,
            3 => PieceKind::S,
            4 => PieceKind::Z,
            5 => PieceKind::L,
            _ => PieceKind::J,
        }
    }
}

impl PieceKind {
    /// Number of piece kinds (7).
    pub const LEN: usize = 7;

    #[must_use]
    pub fn shape(self, rotation: u8) -> &'static Shape {
        &PIECE_SHAPES[self as usize][(rotation % 4) as usize]
    }

    /// CSS colour used by hosts to render locked cells of this kind.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            PieceKind::I => "#00f0f0",
            PieceKind::O => "#f0f000",
            PieceKind::T => "#a000f0",
            PieceKind::S => "#00f000",
            PieceKind::Z => "#f00000",
            PieceKind::L => "#f0a000",
            PieceKind::J => "#0000f0",
        }
    }
}

const PIECE_SHAPES: [[Shape; 4]; PieceKind::LEN] = {
    const C: bool = true;
    const E: bool = false;
    const EMPTY: [bool; 4] = [E; 4];

    [
        // I-piece: 1x4 flat bar
        shape_rotations(Shape::new(1, 4, [[C, C, C, C], EMPTY, EMPTY, EMPTY])),
        // O-piece: 2x2 square
        shape_rotations(Shape::new(
            2,
            2,
            [[C, C, E, E], [C, C, E, E], EMPTY, EMPTY],
        )),
        // T-piece
        shape_rotations(Shape::new(
            2,
            3,
            [[E, C, E, E], [C, C, C, E], EMPTY, EMPTY],
        )),
        // S-piece
        shape_rotations(Shape::new(
            2,
            3,
            [[E, C, C, E], [C, C, E, E], EMPTY, EMPTY],
        )),
        // Z-piece
        shape_rotations(Shape::new(
            2,
            3,
            [[C, C, E, E], [E, C, C, E], EMPTY, EMPTY],
        )),
        // L-piece
        shape_rotations(Shape::new(
            2,
            3,
            [[C, E, E, E], [C, C, C, E], EMPTY, EMPTY],
        )),
        // J-piece
        shape_rotations(Shape::new(
            2,
            3,
            [[E, E, C, E], [C, C, C, E], EMPTY, EMPTY],
        )),
    ]
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_rotation_has_four_cells() {
        for kind in [
            PieceKind::I,
            PieceKind::O,
            PieceKind::T,
            PieceKind::S,
            PieceKind::Z,
            PieceKind::L,
            PieceKind::J,
        ] {
            for rotation in 0..4 {
                let shape = kind.shape(rotation);
                let count: usize = shape
                    .cells
                    .iter()
                    .flatten()
                    .map(|&c| usize::from(c))
                    .sum();
                assert_eq!(count, 4, "{kind:?} rotation {rotation}");
            }
        }
    }

    #[test]
    fn o_piece_rotation_is_degenerate() {
        for rotation in 1..4 {
            assert_eq!(PieceKind::O.shape(rotation), PieceKind::O.shape(0));
        }
    }

    #[test]
    fn i_piece_alternates_between_two_orientations() {
        let flat = PieceKind::I.shape(0);
        let upright = PieceKind::I.shape(1);
        assert_eq!((flat.rows, flat.cols), (1, 4));
        assert_eq!((upright.rows, upright.cols), (4, 1));
        assert_eq!(PieceKind::I.shape(2), flat);
        assert_eq!(PieceKind::I.shape(3), upright);
    }

    #[test]
    fn t_piece_clockwise_rotation_matches_tight_matrix_rule() {
        // [.#.]        [#.]
        // [###]   ->   [##]
        //              [#.]
        let shape = PieceKind::T.shape(1);
        assert_eq!((shape.rows, shape.cols), (3, 2));
        assert!(shape.cells[0][0] && !shape.cells[0][1]);
        assert!(shape.cells[1][0] && shape.cells[1][1]);
        assert!(shape.cells[2][0] && !shape.cells[2][1]);
    }

    #[test]
    fn spawn_is_top_centre() {
        let piece = Piece::spawn(PieceKind::I, 10);
        assert_eq!((piece.x(), piece.y()), (3, 0));

        let piece = Piece::spawn(PieceKind::O, 10);
        assert_eq!((piece.x(), piece.y()), (4, 0));

        let piece = Piece::spawn(PieceKind::T, 10);
        assert_eq!((piece.x(), piece.y()), (4, 0));
    }

    #[test]
    fn cells_are_anchor_relative() {
        let piece = Piece::spawn(PieceKind::O, 10);
        let cells = piece.cells();
        assert_eq!(&cells[..], &[(4, 0), (5, 0), (4, 1), (5, 1)]);
    }

    #[test]
    fn shape_key_is_row_major() {
        let piece = Piece::spawn(PieceKind::T, 10);
        assert_eq!(piece.shape_key(), "010111");
        assert_eq!(piece.rotated().shape_key(), "101110");
    }

    #[test]
    fn four_rotations_return_to_start() {
        let piece = Piece::spawn(PieceKind::L, 10);
        assert_eq!(piece.rotation(), 0);
        assert_eq!(piece.rotated().rotation(), 1);
        let back = piece.rotated().rotated().rotated().rotated();
        assert_eq!(back.rotation(), 0);
        assert_eq!(piece, back);
    }
}
