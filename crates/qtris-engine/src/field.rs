use rand::Rng;

use crate::{
    CollisionError,
    board::Board,
    piece::{Piece, PieceKind},
};

/// Board plus the falling piece and the piece on deck.
///
/// All movement operations are self-reverting: the candidate position is
/// tested against the board and only applied when it does not collide,
/// so the field is never observed in an invalid state.
#[derive(Debug, Clone)]
pub struct Playfield {
    board: Board,
    falling: Piece,
    next: PieceKind,
}

/// Result of locking the falling piece and spawning its successor.
#[derive(Debug, Clone, Copy)]
pub struct LockOutcome {
    /// Full rows removed by this lock.
    pub cleared_lines: usize,
    /// The freshly spawned piece already collides at its spawn position.
    pub spawn_blocked: bool,
}

impl Playfield {
    /// Creates a field with an empty board and two random pieces drawn.
    pub fn new<R>(width: usize, height: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let board = Board::new(width, height);
        let falling = Piece::spawn(rng.random(), width);
        let next = rng.random();
        Self {
            board,
            falling,
            next,
        }
    }

    /// Creates a field from a prepared board and pieces, for scripted
    /// scenarios.
    #[must_use]
    pub fn with_board(board: Board, falling: Piece, next: PieceKind) -> Self {
        Self {
            board,
            falling,
            next,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn falling_piece(&self) -> &Piece {
        &self.falling
    }

    #[must_use]
    pub fn next_piece(&self) -> PieceKind {
        self.next
    }

    fn set_falling(&mut self, piece: Piece) -> Result<(), CollisionError> {
        if self.board.collides(&piece) {
            return Err(CollisionError);
        }
        self.falling = piece;
        Ok(())
    }

    pub fn try_move_left(&mut self) -> Result<(), CollisionError> {
        self.set_falling(self.falling.moved_left())
    }

    pub fn try_move_right(&mut self) -> Result<(), CollisionError> {
        self.set_falling(self.falling.moved_right())
    }

    pub fn try_rotate(&mut self) -> Result<(), CollisionError> {
        self.set_falling(self.falling.rotated())
    }

    pub fn try_soft_drop(&mut self) -> Result<(), CollisionError> {
        self.set_falling(self.falling.moved_down())
    }

    /// Repeats descent until the piece would collide, then backs up one
    /// step. The piece is left resting; it is not locked.
    pub fn hard_drop(&mut self) {
        while self.try_soft_drop().is_ok() {}
    }

    /// Locks the falling piece into the board and clears full rows,
    /// returning how many were removed.
    ///
    /// The locked piece stays current until [`Playfield::spawn_next`]
    /// replaces it, so callers can still observe its resting position.
    pub fn lock_and_clear(&mut self) -> usize {
        self.board.lock(&self.falling);
        self.board.clear_full_rows()
    }

    /// Replaces the falling piece with the on-deck piece at the
    /// top-centre and draws a new on-deck piece.
    ///
    /// Returns `true` when the spawn already collides, which ends the
    /// episode.
    pub fn spawn_next<R>(&mut self, rng: &mut R) -> bool
    where
        R: Rng + ?Sized,
    {
        self.falling = Piece::spawn(self.next, self.board.width());
        self.next = rng.random();
        self.board.collides(&self.falling)
    }

    /// Locks the falling piece, clears full rows, and spawns the next
    /// piece at the top-centre.
    ///
    /// `spawn_blocked` in the outcome means the new piece collided at
    /// spawn, which ends the episode.
    pub fn lock_and_spawn<R>(&mut self, rng: &mut R) -> LockOutcome
    where
        R: Rng + ?Sized,
    {
        let cleared_lines = self.lock_and_clear();
        let spawn_blocked = self.spawn_next(rng);
        LockOutcome {
            cleared_lines,
            spawn_blocked,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64Mcg;

    use super::*;

    fn test_field() -> Playfield {
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        Playfield::new(10, 20, &mut rng)
    }

    #[test]
    fn moves_revert_at_walls() {
        let mut field = test_field();
        // Push the piece against the left wall; further moves fail and
        // leave the position unchanged.
        while field.try_move_left().is_ok() {}
        let resting = *field.falling_piece();
        assert!(field.try_move_left().is_err());
        assert_eq!(field.falling_piece(), &resting);
        assert!(field.falling_piece().cells().iter().all(|&(x, _)| x >= 0));
    }

    #[test]
    fn hard_drop_rests_on_floor() {
        let mut field = test_field();
        field.hard_drop();
        let piece = *field.falling_piece();
        assert!(field.board().collides(&piece.moved_down()));
        assert!(!field.board().collides(&piece));
    }

    #[test]
    fn lock_and_clear_keeps_the_resting_piece_current() {
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        let mut field = Playfield::new(10, 20, &mut rng);

        field.hard_drop();
        let resting = *field.falling_piece();
        let cleared = field.lock_and_clear();
        assert_eq!(cleared, 0);
        // The locked piece is still observable at its resting position.
        assert_eq!(field.falling_piece(), &resting);
        assert!(field.board().collides(&resting));

        let blocked = field.spawn_next(&mut rng);
        assert!(!blocked);
        assert_eq!(field.falling_piece().y(), 0);
    }

    #[test]
    fn lock_and_spawn_replaces_falling_piece() {
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        let mut field = Playfield::new(10, 20, &mut rng);
        let expected_next = field.next_piece();

        field.hard_drop();
        let outcome = field.lock_and_spawn(&mut rng);
        assert_eq!(outcome.cleared_lines, 0);
        assert!(!outcome.spawn_blocked);
        assert_eq!(field.falling_piece().kind(), expected_next);
        assert_eq!(field.falling_piece().y(), 0);
    }

    #[test]
    fn spawn_collision_is_reported() {
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        let mut field = Playfield::new(10, 20, &mut rng);

        // Stack pieces straight down the centre until a spawn collides.
        let mut blocked = false;
        for _ in 0..60 {
            field.hard_drop();
            let outcome = field.lock_and_spawn(&mut rng);
            if outcome.spawn_blocked {
                blocked = true;
                break;
            }
        }
        assert!(blocked, "centre stacking must eventually block the spawn");
    }
}
