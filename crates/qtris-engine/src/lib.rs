//! Tetris simulation core: board, pieces, and the falling-piece playfield.
//!
//! This crate owns the game rules only. It knows nothing about agents,
//! rewards, or episode scheduling - those live in the crates layered on
//! top of it:
//!
//! - [`Board`] - grid state, collision, locking, line clears, scoring
//! - [`Piece`] / [`PieceKind`] - the 7 tetromino shapes with precomputed
//!   rotations
//! - [`Playfield`] - board + falling piece + next piece, with
//!   self-reverting movement operations
//!
//! # Game Flow
//!
//! 1. Create a [`Playfield`] with the board dimensions
//! 2. Manipulate the falling piece (move, rotate, hard drop)
//! 3. Step gravity once per tick
//! 4. When gravity is blocked, lock the piece, clear lines, and spawn the
//!    next piece
//! 5. Repeat until a spawned piece collides or the top row is occupied
//!
//! # Example
//!
//! ```
//! use qtris_engine::Playfield;
//!
//! let mut rng = rand::rng();
//! let mut field = Playfield::new(10, 20, &mut rng);
//!
//! field.try_move_left().ok();
//! field.try_rotate().ok();
//!
//! if field.try_soft_drop().is_err() {
//!     let outcome = field.lock_and_spawn(&mut rng);
//!     if outcome.spawn_blocked {
//!         println!("Game over!");
//!     }
//! }
//! ```

pub use self::{board::*, field::*, piece::*};

mod board;
mod field;
mod piece;

/// The attempted piece mutation would overlap a wall or an occupied cell.
///
/// Callers revert (or never apply) the mutation; this is the normal
/// signal for "move not possible", not a failure.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("piece placement collides with bounds or occupied cells")]
pub struct CollisionError;
