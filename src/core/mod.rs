//! Core module - pure game logic
//!
//! Everything here is deterministic and free of I/O: board geometry and
//! line clearing, piece shapes and wall kicks, the seeded piece bag,
//! scoring tables, and the session state machine that ties them together.

pub mod board;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod session;

// Re-export commonly used types
pub use board::Board;
pub use pieces::Piece;
pub use rng::{PieceBag, SimpleRng};
pub use session::GameSession;
