use qtris_engine::Board;

/// Surface height of every column, left to right.
///
/// A column's height is measured from its topmost filled cell to the
/// floor; an empty column contributes 0.
#[must_use]
pub fn column_heights(board: &Board) -> Vec<u32> {
    let mut heights = vec![0u32; board.width()];
    for (x, height) in heights.iter_mut().enumerate() {
        for y in 0..board.height() {
            if board.is_occupied(x, y) {
                *height = (board.height() - y) as u32;
                break;
            }
        }
    }
    heights
}

/// Height of the tallest column.
#[must_use]
pub fn max_height(board: &Board) -> u32 {
    column_heights(board).into_iter().max().unwrap_or(0)
}

/// Sum of absolute height differences between adjacent columns.
#[must_use]
pub fn bumpiness(heights: &[u32]) -> u32 {
    heights
        .windows(2)
        .map(|pair| pair[0].abs_diff(pair[1]))
        .sum()
}

/// Empty cells with at least one filled cell above them in the same
/// column.
#[must_use]
pub fn count_holes(board: &Board) -> u32 {
    let mut holes = 0;
    for x in 0..board.width() {
        let mut covered = false;
        for y in 0..board.height() {
            if board.is_occupied(x, y) {
                covered = true;
            } else if covered {
                holes += 1;
            }
        }
    }
    holes
}

/// Longest unbroken run of filled cells starting at a column's surface
/// (the topmost filled cell), maximised over columns.
///
/// This is not the same as the tallest stack: a column with a gap under
/// its surface only counts the cells above the gap.
#[must_use]
pub fn pillar_height(board: &Board) -> u32 {
    let mut max_run = 0;
    for x in 0..board.width() {
        let mut run = 0;
        let mut in_stack = false;
        for y in 0..board.height() {
            if board.is_occupied(x, y) {
                if !in_stack {
                    in_stack = true;
                }
                run += 1;
            } else if in_stack {
                break;
            }
        }
        max_run = max_run.max(run);
    }
    max_run
}
