use serde::{Deserialize, Serialize};

use crate::{InvalidValue, Piece};

/// Kind of move.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::IsVariant,
)]
#[serde(try_from = "u32", into = "u32")]
pub enum MoveType {
    /// The player passed.
    #[default]
    Pass,
    /// The player placed a stone.
    PlayPiece,
}

impl From<MoveType> for u32 {
    fn from(move_type: MoveType) -> Self {
        match move_type {
            MoveType::Pass => 0,
            MoveType::PlayPiece => 1,
        }
    }
}

impl TryFrom<u32> for MoveType {
    type Error = InvalidValue;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MoveType::Pass),
            1 => Ok(MoveType::PlayPiece),
            _ => Err(InvalidValue::MoveType(value)),
        }
    }
}

/// One entry of a game's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    /// Pass or play.
    pub move_type: MoveType,
    /// Stone placed by the move.
    pub piece: Piece,
    /// Row-major coordinate; `0` for a pass.
    pub coord: u32,
}

impl Move {
    /// A pass by the player owning `piece`.
    #[must_use]
    pub const fn pass(piece: Piece) -> Self {
        Self {
            move_type: MoveType::Pass,
            piece,
            coord: 0,
        }
    }

    /// A stone placed at `coord`.
    #[must_use]
    pub const fn play(piece: Piece, coord: u32) -> Self {
        Self {
            move_type: MoveType::PlayPiece,
            piece,
            coord,
        }
    }

    /// Returns `true` if the player passed.
    #[must_use]
    pub fn is_pass(&self) -> bool {
        self.move_type.is_pass()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_json_shape() {
        let json = serde_json::to_value(Move::play(Piece::White, 42)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "moveType": 1, "piece": -1, "coord": 42 })
        );
    }

    #[test]
    fn test_pass_has_zero_coord() {
        let mv = Move::pass(Piece::Black);
        assert!(mv.is_pass());
        assert_eq!(mv.coord, 0);
    }

    #[test]
    fn test_unknown_move_type_is_rejected() {
        let err = serde_json::from_str::<Move>(r#"{"moveType":5,"piece":1,"coord":0}"#);
        assert!(err.is_err());
    }
}
