//! Feature extraction for the agent's view of the board.
//!
//! Every tick the episode controller derives a fresh [`FeatureVector`]
//! from the board and the active piece. Features are pure functions of
//! the current state: nothing here is cached across board mutations.

pub use self::metrics::*;

mod metrics;

use qtris_engine::{Board, Piece};
use serde::{Deserialize, Serialize};

/// The six scalar features handed to the agents and the reward model.
///
/// `lines_cleared` is cumulative for the running episode and is supplied
/// by the controller; everything else is recomputed from the board and
/// the active piece.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Sum of per-column surface heights.
    pub total_height: u32,
    /// Sum of absolute height differences between adjacent columns.
    pub bumpiness: u32,
    /// Empty cells with at least one filled cell above them.
    pub holes: u32,
    /// Lines cleared so far this episode.
    pub lines_cleared: u32,
    /// Row (anchor y) of the active piece; deeper placements are larger.
    pub piece_row: i32,
    /// Longest filled run starting at a column's surface, max over columns.
    pub pillar: u32,
}

impl FeatureVector {
    /// The vector in fixed order, as network input.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn as_array(&self) -> [f32; 6] {
        [
            self.total_height as f32,
            self.bumpiness as f32,
            self.holes as f32,
            self.lines_cleared as f32,
            self.piece_row as f32,
            self.pillar as f32,
        ]
    }
}

/// Derives the feature vector for the current tick.
#[must_use]
pub fn extract(board: &Board, piece: &Piece, lines_cleared: u32) -> FeatureVector {
    let heights = column_heights(board);
    FeatureVector {
        total_height: heights.iter().sum(),
        bumpiness: bumpiness(&heights),
        holes: count_holes(board),
        lines_cleared,
        piece_row: piece.y(),
        pillar: pillar_height(board),
    }
}
