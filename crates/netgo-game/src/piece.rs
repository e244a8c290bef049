use serde::{Deserialize, Serialize};

/// Content of a single intersection.
///
/// Serialized as the integer `0` (empty), `1` (black) or `-1` (white).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::IsVariant,
)]
#[serde(try_from = "i8", into = "i8")]
pub enum Piece {
    /// Empty intersection.
    #[default]
    None,
    /// A black stone.
    Black,
    /// A white stone.
    White,
}

impl Piece {
    /// Returns the stone color, or `None` for an empty intersection.
    #[must_use]
    pub const fn color(self) -> Option<ColorChoice> {
        match self {
            Piece::None => None,
            Piece::Black => Some(ColorChoice::Black),
            Piece::White => Some(ColorChoice::White),
        }
    }
}

impl From<Piece> for i8 {
    fn from(piece: Piece) -> Self {
        match piece {
            Piece::None => 0,
            Piece::Black => 1,
            Piece::White => -1,
        }
    }
}

impl TryFrom<i8> for Piece {
    type Error = InvalidValue;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Piece::None),
            1 => Ok(Piece::Black),
            -1 => Ok(Piece::White),
            _ => Err(InvalidValue::Piece(value)),
        }
    }
}

/// A player color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// White, who receives komi.
    #[display("white")]
    White,
    /// Black, who moves first.
    #[display("black")]
    Black,
}

impl ColorChoice {
    /// Returns the other color.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            ColorChoice::White => ColorChoice::Black,
            ColorChoice::Black => ColorChoice::White,
        }
    }

    /// Returns the stone this color places.
    #[must_use]
    pub const fn piece(self) -> Piece {
        match self {
            ColorChoice::White => Piece::White,
            ColorChoice::Black => Piece::Black,
        }
    }
}

/// An integer on the wire that does not map to a known variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum InvalidValue {
    /// Not one of `-1`, `0`, `1`.
    #[display("invalid piece value: {_0}")]
    Piece(#[error(not(source))] i8),
    /// Not a supported board size.
    #[display("invalid board size: {_0}")]
    BoardSize(#[error(not(source))] u32),
    /// Not a known move type.
    #[display("invalid move type: {_0}")]
    MoveType(#[error(not(source))] u32),
}
