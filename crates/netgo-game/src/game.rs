use serde::{Deserialize, Serialize};

use crate::{Board, Move, Score};

/// A game as sent to and returned from the scoring module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    /// Server-side identifier.
    pub id: u64,
    /// Moves in play order.
    #[serde(default)]
    pub history: Vec<Move>,
    /// Current position.
    pub board: Board,
    /// Whether the game has finished.
    #[serde(default)]
    pub is_over: bool,
    /// Score, filled in by the scoring module.
    #[serde(default)]
    pub score: Score,
    /// User id of the black player.
    #[serde(default)]
    pub black_player_id: u64,
    /// User id of the white player.
    #[serde(default)]
    pub white_player_id: u64,
}

impl Game {
    /// Creates an unfinished game with an empty history.
    #[must_use]
    pub fn new(id: u64, board: Board) -> Self {
        Self {
            id,
            board,
            ..Self::default()
        }
    }

    /// Returns the most recent move.
    #[must_use]
    pub fn last_move(&self) -> Option<&Move> {
        self.history.last()
    }
}
