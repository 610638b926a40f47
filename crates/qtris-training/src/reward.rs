use qtris_features::FeatureVector;

/// Reward per line cleared by a single lock.
const LINE_REWARD: f32 = 10.0;
/// Per-hole penalty when the stack is already high.
const HOLE_PENALTY_HIGH_STACK: f32 = -2.74;
/// Per-hole penalty at intermediate stack heights.
const HOLE_PENALTY_MID_STACK: f32 = -4.74;
/// Per-hole penalty on a low stack.
const HOLE_PENALTY_LOW_STACK: f32 = -6.0;
/// Weight of the bumpiness penalty.
const BUMPINESS_WEIGHT: f32 = 0.5;
/// Weight of the pillar penalty.
const PILLAR_WEIGHT: f32 = 0.3;
/// Flat penalty when the lock ends the game.
const GAME_OVER_PENALTY: f32 = 100.0;
/// Flat bonus when the episode score sets a new best.
const NEW_BEST_BONUS: f32 = 50.0;
/// Piece rows at or below this depth trigger the placement term.
const PLACEMENT_ROW_THRESHOLD: i32 = 12;

/// Scalar reward for one lock.
///
/// Pure function of the lines cleared by the lock, the feature vector
/// captured before it, and the game-over / new-best flags. All the
/// thresholds and weights are empirically tuned values; they are
/// contracts of the model, not knobs.
///
/// Note the placement term: `10 - row` is negative for every row past
/// [`PLACEMENT_ROW_THRESHOLD`], so subtracting it pays a small bonus
/// for deep placements while the stack is low, scaled up when the
/// board is nearly empty.
#[must_use]
#[expect(clippy::cast_precision_loss)]
pub fn placement_reward(
    lines_cleared: usize,
    features: &FeatureVector,
    game_over: bool,
    new_best: bool,
) -> f32 {
    let mut reward = 0.0;

    if lines_cleared > 0 {
        reward += lines_cleared as f32 * LINE_REWARD;
    }

    reward += features.holes as f32 * hole_penalty(features.total_height, features.bumpiness);

    if features.total_height <= 40 {
        if features.piece_row >= PLACEMENT_ROW_THRESHOLD {
            reward -= (10 - features.piece_row) as f32 * 2.0;
        }
    } else if features.total_height <= 100 && features.piece_row >= PLACEMENT_ROW_THRESHOLD {
        reward -= (10 - features.piece_row) as f32;
    }

    reward -= features.bumpiness as f32 * BUMPINESS_WEIGHT;
    reward -= features.pillar as f32 * PILLAR_WEIGHT;

    if game_over {
        reward -= GAME_OVER_PENALTY;
    }
    if new_best {
        reward += NEW_BEST_BONUS;
    }

    reward
}

/// Per-hole penalty, keyed on how full and uneven the board already is.
/// The higher the existing stack, the smaller the penalty, so late-game
/// holes do not drown out the rest of the signal.
fn hole_penalty(total_height: u32, bumpiness: u32) -> f32 {
    if total_height >= 140 || (total_height >= 110 && bumpiness >= 12) {
        HOLE_PENALTY_HIGH_STACK
    } else if total_height >= 90 || (total_height >= 70 && bumpiness >= 9) {
        HOLE_PENALTY_MID_STACK
    } else {
        HOLE_PENALTY_LOW_STACK
    }
}
