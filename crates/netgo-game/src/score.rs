use serde::{Deserialize, Serialize};

use crate::ColorChoice;

/// Points for each side, as reported by the scoring module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    /// Color that forfeited, if the game ended by forfeit.
    #[serde(default)]
    pub forfeit_color: Option<ColorChoice>,
    /// Points counted for black.
    pub black_points: f32,
    /// Points counted for white, before komi.
    pub white_points: f32,
    /// Compensation added to white.
    pub komi: f32,
}

impl Score {
    /// Returns the final total for `color`, with komi applied to white.
    #[must_use]
    pub fn total(&self, color: ColorChoice) -> f32 {
        match color {
            ColorChoice::Black => self.black_points,
            ColorChoice::White => self.white_points + self.komi,
        }
    }

    /// Returns the winning color.
    ///
    /// A forfeit decides the game for the opponent regardless of points.
    /// Equal totals yield `None`.
    #[must_use]
    pub fn winner(&self) -> Option<ColorChoice> {
        if let Some(forfeit) = self.forfeit_color {
            return Some(forfeit.opponent());
        }
        let black = self.total(ColorChoice::Black);
        let white = self.total(ColorChoice::White);
        match black.partial_cmp(&white)? {
            std::cmp::Ordering::Greater => Some(ColorChoice::Black),
            std::cmp::Ordering::Less => Some(ColorChoice::White),
            std::cmp::Ordering::Equal => None,
        }
    }
}
