use serde::{Deserialize, Serialize};

use crate::*;

/// Number of mined neighbors shown on an opened cell, always `0..=8`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct MineCount(u8);

impl MineCount {
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(8);

    pub const fn new(count: u8) -> Option<Self> {
        if count <= Self::MAX.0 {
            Some(Self(count))
        } else {
            None
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

/// Player-visible state of a single cell as reported by the server.
///
/// On the wire every state is a bare integer code; the mapping lives only in
/// [`CellState::code`] and [`CellState::from_code`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub enum CellState {
    QuestionMarked,
    Hidden,
    Flagged,
    /// Opened, with the number of mined neighbors.
    Revealed(MineCount),
    /// Mine shown after a loss.
    Mine,
    /// The mine that ended the game.
    TriggeredMine,
    /// Flag placed on a safe cell, shown after a loss.
    Misflagged,
    MineMarker,
}

impl CellState {
    pub const QUESTION_CODE: i16 = -3;
    pub const HIDDEN_CODE: i16 = -2;
    pub const FLAG_CODE: i16 = -1;
    pub const MINE_CODE: i16 = 64;
    pub const TRIGGERED_MINE_CODE: i16 = 65;
    pub const MISFLAGGED_CODE: i16 = 66;
    pub const MINE_MARKER_CODE: i16 = 67;

    pub const fn code(self) -> i16 {
        use CellState::*;
        match self {
            QuestionMarked => Self::QUESTION_CODE,
            Hidden => Self::HIDDEN_CODE,
            Flagged => Self::FLAG_CODE,
            Revealed(count) => count.get() as i16,
            Mine => Self::MINE_CODE,
            TriggeredMine => Self::TRIGGERED_MINE_CODE,
            Misflagged => Self::MISFLAGGED_CODE,
            MineMarker => Self::MINE_MARKER_CODE,
        }
    }

    pub const fn from_code(code: i16) -> Result<Self> {
        use CellState::*;
        Ok(match code {
            Self::QUESTION_CODE => QuestionMarked,
            Self::HIDDEN_CODE => Hidden,
            Self::FLAG_CODE => Flagged,
            0..=8 => Revealed(MineCount(code as u8)),
            Self::MINE_CODE => Mine,
            Self::TRIGGERED_MINE_CODE => TriggeredMine,
            Self::MISFLAGGED_CODE => Misflagged,
            Self::MINE_MARKER_CODE => MineMarker,
            _ => return Err(GameError::UnknownCellCode(code)),
        })
    }

    /// Opened cell showing `count`, or `None` when no cell can have that many
    /// neighbors.
    pub const fn revealed(count: u8) -> Option<Self> {
        match MineCount::new(count) {
            Some(count) => Some(Self::Revealed(count)),
            None => None,
        }
    }

    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }

    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed(_))
    }

    /// Whether a flag toggle on this cell makes sense.
    pub const fn is_flaggable(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Hidden
    }
}

impl TryFrom<i16> for CellState {
    type Error = GameError;

    fn try_from(code: i16) -> Result<Self> {
        Self::from_code(code)
    }
}

impl From<CellState> for i16 {
    fn from(state: CellState) -> Self {
        state.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_map_to_states() {
        assert_eq!(CellState::from_code(-3), Ok(CellState::QuestionMarked));
        assert_eq!(CellState::from_code(-2), Ok(CellState::Hidden));
        assert_eq!(CellState::from_code(-1), Ok(CellState::Flagged));
        assert_eq!(CellState::from_code(0), Ok(CellState::revealed(0).unwrap()));
        assert_eq!(CellState::from_code(8), Ok(CellState::revealed(8).unwrap()));
        assert_eq!(CellState::from_code(64), Ok(CellState::Mine));
        assert_eq!(CellState::from_code(65), Ok(CellState::TriggeredMine));
        assert_eq!(CellState::from_code(66), Ok(CellState::Misflagged));
        assert_eq!(CellState::from_code(67), Ok(CellState::MineMarker));
    }

    #[test]
    fn codes_outside_known_bands_are_rejected() {
        for code in [-4, 9, 63, 68, i16::MAX] {
            assert_eq!(
                CellState::from_code(code),
                Err(GameError::UnknownCellCode(code))
            );
        }
    }

    #[test]
    fn every_valid_code_maps_back_to_itself() {
        for code in (-3..=8).chain(64..=67) {
            let state = CellState::from_code(code).unwrap();
            assert_eq!(state.code(), code);
        }
    }

    #[test]
    fn neighbor_counts_stop_at_eight() {
        assert_eq!(MineCount::new(8), Some(MineCount::MAX));
        assert_eq!(MineCount::new(9), None);
        assert_eq!(CellState::revealed(9), None);
        assert_eq!(CellState::revealed(u8::MAX), None);
        assert_eq!(CellState::revealed(0), Some(CellState::Revealed(MineCount::ZERO)));
    }

    #[test]
    fn serde_uses_integer_codes() {
        let states: alloc::vec::Vec<CellState> = serde_json::from_str("[-2, 3, 65]").unwrap();
        assert_eq!(
            states,
            [
                CellState::Hidden,
                CellState::revealed(3).unwrap(),
                CellState::TriggeredMine
            ]
        );
        assert_eq!(serde_json::to_string(&CellState::Flagged).unwrap(), "-1");
        assert!(serde_json::from_str::<CellState>("12").is_err());
    }
}
