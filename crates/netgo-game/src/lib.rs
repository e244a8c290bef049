//! Game records exchanged with the netgo scoring worker.
//!
//! The scoring module owns the schema of a game; these types give the main
//! thread a typed view of the same JSON so it can build scoring requests and
//! read scored results. The worker bridge never depends on them for relaying.
//!
//! # Example
//!
//! ```
//! use netgo_game::{Board, BoardSize, Game, Piece};
//!
//! let board = Board::from_flat(BoardSize::Full, vec![Piece::None; 19 * 19])?;
//! let game = Game::new(7, board);
//! assert!(!game.is_over);
//! assert!(game.last_move().is_none());
//! # Ok::<(), netgo_game::BoardError>(())
//! ```

mod board;
mod game;
mod moves;
mod piece;
mod score;

pub use self::{board::*, game::*, moves::*, piece::*, score::*};
