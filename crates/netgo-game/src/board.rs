use serde::{Deserialize, Serialize};

use crate::{InvalidValue, Piece};

/// Supported board sizes.
///
/// Serialized as the side length. `Undefined` (0) marks a board that has not
/// been set up yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum BoardSize {
    /// No size chosen.
    #[default]
    Undefined,
    /// The standard 19x19 board.
    Full,
}

impl BoardSize {
    /// Returns the side length.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        match self {
            BoardSize::Undefined => 0,
            BoardSize::Full => 19,
        }
    }
}

impl From<BoardSize> for u32 {
    fn from(size: BoardSize) -> Self {
        size.as_u32()
    }
}

impl TryFrom<u32> for BoardSize {
    type Error = InvalidValue;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(BoardSize::Undefined),
            19 => Ok(BoardSize::Full),
            _ => Err(InvalidValue::BoardSize(value)),
        }
    }
}

/// A board: its size and its rows of pieces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Side length.
    pub size: BoardSize,
    /// Rows of intersections, top to bottom.
    pub map: Vec<Vec<Piece>>,
}

/// Errors from building a [`Board`] out of a flat piece list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BoardError {
    /// The board size has a zero side length.
    #[display("board size must be greater than 0")]
    ZeroSize,
    /// The piece count is not a multiple of the side length.
    #[display("{len} pieces do not fit rows of {size}")]
    LengthMismatch {
        /// Number of pieces supplied.
        len: usize,
        /// Side length of the board.
        size: u32,
    },
}

impl Board {
    /// Splits a row-major piece list into rows of `size` pieces.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::ZeroSize`] for [`BoardSize::Undefined`] and
    /// [`BoardError::LengthMismatch`] when `pieces` does not divide evenly
    /// into rows.
    pub fn from_flat(size: BoardSize, pieces: Vec<Piece>) -> Result<Self, BoardError> {
        let side = size.as_u32();
        if side == 0 {
            return Err(BoardError::ZeroSize);
        }
        let width = side as usize;
        if pieces.len() % width != 0 {
            return Err(BoardError::LengthMismatch {
                len: pieces.len(),
                size: side,
            });
        }

        let map = pieces.chunks(width).map(<[Piece]>::to_vec).collect();
        Ok(Self { size, map })
    }

    /// Returns the piece at a row-major coordinate, if it is on the board.
    #[must_use]
    pub fn piece_at(&self, coord: u32) -> Option<Piece> {
        let width = self.size.as_u32();
        if width == 0 {
            return None;
        }
        let row = (coord / width) as usize;
        let col = (coord % width) as usize;
        self.map.get(row)?.get(col).copied()
    }

    /// Iterates over every stone on the board.
    pub fn stones(&self) -> impl Iterator<Item = Piece> + '_ {
        self.map
            .iter()
            .flatten()
            .copied()
            .filter(|piece| !piece.is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flat_splits_rows() {
        let mut pieces = vec![Piece::None; 19 * 2];
        pieces[20] = Piece::Black;
        let board = Board::from_flat(BoardSize::Full, pieces).unwrap();

        assert_eq!(board.map.len(), 2);
        assert!(board.map.iter().all(|row| row.len() == 19));
        assert_eq!(board.map[1][1], Piece::Black);
        assert_eq!(board.piece_at(20), Some(Piece::Black));
        assert_eq!(board.piece_at(19 * 2), None);
    }

    #[test]
    fn test_from_flat_rejects_zero_size() {
        assert_eq!(
            Board::from_flat(BoardSize::Undefined, vec![Piece::None; 4]),
            Err(BoardError::ZeroSize)
        );
    }

    #[test]
    fn test_from_flat_rejects_ragged_input() {
        assert_eq!(
            Board::from_flat(BoardSize::Full, vec![Piece::None; 20]),
            Err(BoardError::LengthMismatch { len: 20, size: 19 })
        );
    }

    #[test]
    fn test_board_size_wire_values() {
        assert_eq!(serde_json::to_string(&BoardSize::Full).unwrap(), "19");
        assert_eq!(
            serde_json::from_str::<BoardSize>("0").unwrap(),
            BoardSize::Undefined
        );
        assert!(serde_json::from_str::<BoardSize>("9").is_err());
    }

    #[test]
    fn test_stones_skips_empty() {
        let board = Board {
            size: BoardSize::Full,
            map: vec![vec![Piece::None, Piece::White, Piece::Black, Piece::None]],
        };
        assert_eq!(board.stones().count(), 2);
    }
}
