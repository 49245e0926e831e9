use chordsweep_core::{CellCount, Coord, GameParams, Grid, Snapshot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::*;

/// Full board state pushed by the server after every move, over HTTP or the
/// session socket.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameUpdate {
    pub session_id: String,
    /// Row-major cell state codes, `y * width + x`.
    pub grid: Vec<i16>,
    pub width: Coord,
    pub height: Coord,
    pub mine_count: CellCount,
    pub unique: bool,
    pub dead: bool,
    pub won: bool,
    /// Unix seconds.
    pub started_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<i64>,
}

impl GameUpdate {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn params(&self) -> GameParams {
        GameParams::new((self.width, self.height), self.mine_count, self.unique)
    }
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or(ProtocolError::InvalidTimestamp(secs))
}

impl TryFrom<GameUpdate> for Snapshot {
    type Error = ProtocolError;

    fn try_from(update: GameUpdate) -> Result<Self> {
        let grid = Grid::from_codes((update.width, update.height), &update.grid)?;
        Ok(Snapshot {
            session_id: update.session_id,
            grid,
            mine_count: update.mine_count,
            unique: update.unique,
            dead: update.dead,
            won: update.won,
            started_at: timestamp(update.started_at)?,
            ended_at: update.ended_at.map(timestamp).transpose()?,
        })
    }
}

impl From<&Snapshot> for GameUpdate {
    fn from(snapshot: &Snapshot) -> Self {
        let (width, height) = snapshot.grid.size();
        Self {
            session_id: snapshot.session_id.clone(),
            grid: snapshot.grid.codes(),
            width,
            height,
            mine_count: snapshot.mine_count,
            unique: snapshot.unique,
            dead: snapshot.dead,
            won: snapshot.won,
            started_at: snapshot.started_at.timestamp(),
            ended_at: snapshot.ended_at.map(|ended_at| ended_at.timestamp()),
        }
    }
}

/// Finished game as listed on the leaderboards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub session_id: String,
    pub username: Option<String>,
    pub width: Coord,
    pub height: Coord,
    pub mine_count: CellCount,
    pub unique: bool,
    /// Milliseconds, not necessarily whole.
    pub playtime: f64,
}

impl GameRecord {
    pub fn params(&self) -> GameParams {
        GameParams::new((self.width, self.height), self.mine_count, self.unique)
    }

    pub fn board_key(&self) -> String {
        self.params().board_key()
    }

    pub fn playtime_secs(&self) -> f64 {
        self.playtime / 1000.0
    }
}
