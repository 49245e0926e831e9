use alloc::string::String;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::*;

/// Parameters the server needs to create a new game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameParams {
    pub width: Coord,
    pub height: Coord,
    pub mine_count: CellCount,
    /// Ask the server for a board that can be solved without guessing.
    pub unique: bool,
}

impl GameParams {
    pub const fn new((width, height): Coord2, mine_count: CellCount, unique: bool) -> Self {
        Self {
            width,
            height,
            mine_count,
            unique,
        }
    }

    pub const fn size(&self) -> Coord2 {
        (self.width, self.height)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.width, self.height)
    }

    pub fn validate(self) -> Result<Self> {
        if self.width == 0 || self.height == 0 {
            return Err(GameError::InvalidBoardShape);
        }
        if self.mine_count >= self.total_cells() {
            return Err(GameError::TooManyMines);
        }
        Ok(self)
    }

    /// Leaderboard bucket for games played with these parameters.
    pub fn board_key(&self) -> String {
        let suffix = if self.unique { "u" } else { "" };
        alloc::format!(
            "{}x{}x{}{}",
            self.width,
            self.height,
            self.mine_count,
            suffix
        )
    }
}

impl Default for GameParams {
    fn default() -> Self {
        MEDIUM
    }
}

const EASY: GameParams = GameParams::new((9, 9), 10, true);
const MEDIUM: GameParams = GameParams::new((16, 16), 40, true);
const HARD: GameParams = GameParams::new((30, 16), 99, true);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetName {
    Easy,
    Medium,
    Hard,
    Custom,
}

impl PresetName {
    pub const PRESETS: [PresetName; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub const fn params(self) -> Option<GameParams> {
        match self {
            Self::Easy => Some(EASY),
            Self::Medium => Some(MEDIUM),
            Self::Hard => Some(HARD),
            Self::Custom => None,
        }
    }

    /// Preset whose board key matches `params`, or [`PresetName::Custom`].
    pub fn from_params(params: &GameParams) -> Self {
        let key = params.board_key();
        Self::PRESETS
            .into_iter()
            .find(|preset| {
                preset
                    .params()
                    .is_some_and(|preset_params| preset_params.board_key() == key)
            })
            .unwrap_or(Self::Custom)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Custom => "custom",
        }
    }
}

impl Default for PresetName {
    fn default() -> Self {
        Self::Medium
    }
}

impl fmt::Display for PresetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresetName {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            "custom" => Ok(Self::Custom),
            _ => Err(UnknownPreset),
        }
    }
}

#[derive(thiserror::Error, Debug, Copy, Clone, PartialEq, Eq)]
#[error("Unknown preset, expected one of easy, medium, hard, custom")]
pub struct UnknownPreset;
