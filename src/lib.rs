//! Falling-block puzzle rules engine.
//!
//! A deterministic, fixed-time-step implementation of the classic falling
//! tetromino game: a 10x20 board with a hidden spawn buffer, SRS-style
//! wall kicks, 7-bag piece generation, DAS auto-repeat, lock delay with a
//! move limit, a line clear pause, and level-scaled scoring.
//!
//! The crate is UI-agnostic: [`GameSession::update`] advances the game by
//! one fixed time step with the currently held inputs, and a frontend
//! renders from the [`Board`] and session queries in between. Sessions are
//! fully reproducible: the same seed and input trace always produce the
//! same game.
//!
//! ```
//! use quadfall::core::{Board, GameSession};
//! use quadfall::types::DEFAULT_TIME_STEP_SECS;
//!
//! let mut game = GameSession::new(Board::default(), DEFAULT_TIME_STEP_SECS, 7);
//! for _ in 0..200 {
//!     game.update(false, false, false);
//! }
//! assert!(!game.is_game_over());
//! ```

pub mod core;
pub mod types;

pub use crate::core::{Board, GameSession, Piece, PieceBag};
