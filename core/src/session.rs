use alloc::string::String;
use alloc::vec::Vec;
use chrono::{DateTime, Utc};

use crate::*;

/// Server-authoritative view of one game, replaced wholesale on every update.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub session_id: String,
    pub grid: Grid,
    pub mine_count: CellCount,
    pub unique: bool,
    pub dead: bool,
    pub won: bool,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub fn is_over(&self) -> bool {
        self.ended_at.is_some()
    }

    pub fn params(&self) -> GameParams {
        GameParams::new(self.grid.size(), self.mine_count, self.unique)
    }

    pub fn flag_count(&self) -> CellCount {
        self.grid.count(CellState::Flagged)
    }

    pub fn mines_left(&self) -> i64 {
        i64::from(self.mine_count) - i64::from(self.flag_count())
    }

    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> i64 {
        (self.ended_at.unwrap_or(now) - self.started_at)
            .num_seconds()
            .max(0)
    }

    pub fn face(&self) -> Face {
        if self.dead {
            Face::Lost
        } else if self.won {
            Face::Won
        } else {
            Face::Smile
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Face {
    Smile,
    Click,
    Won,
    Lost,
}

impl Default for Face {
    fn default() -> Self {
        Self::Smile
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct SessionState {
    pub session: Option<Snapshot>,
    pub preset: PresetName,
    pub params: GameParams,
    pub face: Face,
    pub timer_secs: i64,
    pub pressed: Option<PressedCells>,
}

impl SessionState {
    pub fn with_preset(preset: PresetName, params: GameParams) -> Self {
        Self {
            preset,
            params,
            ..Default::default()
        }
    }

    /// No moves are accepted until a game exists and while it has ended.
    pub fn is_over(&self) -> bool {
        self.session.as_ref().is_none_or(Snapshot::is_over)
    }

    pub fn board_size(&self) -> Coord2 {
        self.session
            .as_ref()
            .map_or(self.params.size(), |session| session.grid.size())
    }

    /// Current state of a cell, treating the board as all unopened before the
    /// first move.
    pub fn cell_at(&self, coords: Coord2) -> Option<CellState> {
        match &self.session {
            Some(session) => session.grid.get(coords),
            None => in_bounds(coords, self.params.size()).then_some(CellState::Hidden),
        }
    }

    pub fn mines_left(&self) -> i64 {
        self.session
            .as_ref()
            .map_or(i64::from(self.params.mine_count), Snapshot::mines_left)
    }

    /// Cells as they should be drawn, with pressed cells shown opened and empty.
    pub fn rendered_cells(&self) -> Vec<CellState> {
        let mut cells = match &self.session {
            Some(session) => session.grid.as_slice().to_vec(),
            None => alloc::vec![CellState::Hidden; self.params.total_cells() as usize],
        };

        for &index in self.pressed.iter().flatten() {
            if let Some(cell) = cells.get_mut(index) {
                *cell = CellState::Revealed(MineCount::ZERO);
            }
        }
        cells
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    /// Pointer pressed on a cell whose state was `state` at that moment.
    CellDown {
        coords: Coord2,
        state: CellState,
    },
    CellUp {
        coords: Coord2,
        state: CellState,
    },
    CellLeave,
    GameUpdated(Snapshot),
    /// First snapshot of a session loaded from an existing id.
    GameInit {
        snapshot: Snapshot,
        now: DateTime<Utc>,
    },
    PresetPicked(PresetName),
    GameReset {
        params: Option<GameParams>,
        preset: Option<PresetName>,
    },
    TimerTick {
        now: DateTime<Utc>,
    },
    Failed(String),
}

/// Applies one event to the session, returning the next state.
pub fn reduce(state: SessionState, event: GameEvent) -> SessionState {
    use GameEvent::*;

    if !matches!(event, TimerTick { .. }) {
        log::debug!("{:?}", event);
    }

    match event {
        CellDown { coords, state: cell } => press(state, coords, cell),
        CellUp { .. } | CellLeave => SessionState {
            face: state.session.as_ref().map_or(Face::Smile, Snapshot::face),
            pressed: None,
            ..state
        },
        GameUpdated(snapshot) => apply_update(state, snapshot),
        GameInit { snapshot, now } => {
            let preset = PresetName::from_params(&snapshot.params());
            let state = apply_update(state, snapshot);
            SessionState {
                preset,
                ..tick(state, now)
            }
        }
        PresetPicked(preset) => SessionState { preset, ..state },
        GameReset { params, preset } => {
            let params = params
                .or_else(|| state.session.as_ref().map(Snapshot::params))
                .or_else(|| state.preset.params())
                .unwrap_or_default();
            SessionState::with_preset(preset.unwrap_or(state.preset), params)
        }
        TimerTick { now } => tick(state, now),
        Failed(message) => {
            log::error!("Game request failed: {}", message);
            SessionState {
                pressed: None,
                ..state
            }
        }
    }
}

fn press(mut state: SessionState, coords: Coord2, cell: CellState) -> SessionState {
    if state.session.as_ref().is_some_and(Snapshot::is_over) {
        return state;
    }

    let pressed = match cell {
        CellState::Hidden => {
            let size = state.board_size();
            if !in_bounds(coords, size) {
                return state;
            }
            smallvec::smallvec![flat_index(coords, size.0)]
        }
        CellState::Revealed(_) => {
            let Some(session) = &state.session else {
                return state;
            };
            chord_targets(&session.grid, coords, cell)
        }
        _ => return state,
    };

    state.pressed = Some(pressed);
    if state.session.is_some() {
        state.face = Face::Click;
    }
    state
}

fn apply_update(state: SessionState, snapshot: Snapshot) -> SessionState {
    let timer_secs = match snapshot.ended_at {
        Some(ended_at) => (ended_at - snapshot.started_at).num_seconds(),
        None => state.timer_secs,
    };

    SessionState {
        face: snapshot.face(),
        timer_secs,
        pressed: None,
        params: snapshot.params(),
        session: Some(snapshot),
        ..state
    }
}

fn tick(state: SessionState, now: DateTime<Utc>) -> SessionState {
    let Some(session) = &state.session else {
        return state;
    };

    SessionState {
        timer_secs: session.elapsed_secs(now),
        ..state
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveKind {
    Open,
    Chord,
    Flag,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Move {
    pub kind: MoveKind,
    pub coords: Coord2,
}

/// What the client should ask of the server after an interaction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    /// No session yet, the first open creates one.
    CreateGame { origin: Coord2, params: GameParams },
    Send(Move),
}

/// Request to issue when the pointer is released over `coords`.
pub fn release_intent(state: &SessionState, coords: Coord2) -> Option<Intent> {
    match &state.session {
        None => in_bounds(coords, state.params.size()).then_some(Intent::CreateGame {
            origin: coords,
            params: state.params,
        }),
        Some(session) if session.is_over() => None,
        Some(session) => {
            let kind = if session.grid.get(coords)?.is_hidden() {
                MoveKind::Open
            } else {
                MoveKind::Chord
            };
            Some(Intent::Send(Move { kind, coords }))
        }
    }
}

/// Request to issue for the secondary action on `coords`.
pub fn flag_intent(state: &SessionState, coords: Coord2) -> Option<Intent> {
    if state.is_over() {
        return None;
    }

    state
        .cell_at(coords)
        .filter(|cell| cell.is_flaggable())
        .map(|_| {
            Intent::Send(Move {
                kind: MoveKind::Flag,
                coords,
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn snapshot(size: Coord2, codes: &[i16]) -> Snapshot {
        Snapshot {
            session_id: "abc".to_string(),
            grid: Grid::from_codes(size, codes).unwrap(),
            mine_count: 2,
            unique: true,
            dead: false,
            won: false,
            started_at: at(1_000),
            ended_at: None,
        }
    }

    fn playing() -> SessionState {
        let update = snapshot((3, 3), &[-2, -2, -2, -2, 2, -2, 0, -1, -2]);
        reduce(SessionState::default(), GameEvent::GameUpdated(update))
    }

    #[test]
    fn press_on_unopened_cell_before_game_highlights_it() {
        let state = SessionState::with_preset(PresetName::Easy, PresetName::Easy.params().unwrap());

        let state = reduce(
            state,
            GameEvent::CellDown {
                coords: (2, 1),
                state: CellState::Hidden,
            },
        );

        assert_eq!(state.pressed.unwrap().as_slice(), [11]);
        assert_eq!(state.face, Face::Smile);
    }

    #[test]
    fn press_on_number_highlights_unopened_neighbors() {
        let state = reduce(
            playing(),
            GameEvent::CellDown {
                coords: (1, 1),
                state: CellState::revealed(2).unwrap(),
            },
        );

        assert_eq!(state.pressed.unwrap().as_slice(), [0, 1, 2, 3, 5, 8]);
        assert_eq!(state.face, Face::Click);
    }

    #[test]
    fn press_on_number_without_session_is_ignored() {
        let state = reduce(
            SessionState::default(),
            GameEvent::CellDown {
                coords: (1, 1),
                state: CellState::revealed(2).unwrap(),
            },
        );

        assert_eq!(state, SessionState::default());
    }

    #[test]
    fn press_on_flag_changes_nothing() {
        let before = playing();

        let after = reduce(
            before.clone(),
            GameEvent::CellDown {
                coords: (1, 2),
                state: CellState::Flagged,
            },
        );

        assert_eq!(after, before);
    }

    #[test]
    fn press_after_game_over_is_ignored() {
        let mut update = snapshot((2, 1), &[-2, 1]);
        update.ended_at = Some(at(1_010));
        update.dead = true;
        let state = reduce(SessionState::default(), GameEvent::GameUpdated(update));

        let state = reduce(
            state,
            GameEvent::CellDown {
                coords: (0, 0),
                state: CellState::Hidden,
            },
        );

        assert_eq!(state.pressed, None);
        assert_eq!(state.face, Face::Lost);
    }

    #[test]
    fn release_and_leave_clear_pressed_cells() {
        let pressed = reduce(
            playing(),
            GameEvent::CellDown {
                coords: (0, 0),
                state: CellState::Hidden,
            },
        );
        assert!(pressed.pressed.is_some());

        let released = reduce(
            pressed.clone(),
            GameEvent::CellUp {
                coords: (0, 0),
                state: CellState::Hidden,
            },
        );
        assert_eq!(released.pressed, None);
        assert_eq!(released.face, Face::Smile);

        let left = reduce(pressed, GameEvent::CellLeave);
        assert_eq!(left.pressed, None);
    }

    #[test]
    fn update_replaces_snapshot_and_clears_pressed() {
        let pressed = reduce(
            playing(),
            GameEvent::CellDown {
                coords: (0, 0),
                state: CellState::Hidden,
            },
        );

        let mut update = snapshot((3, 3), &[1, -2, -2, -2, 2, -2, 0, -1, -2]);
        update.won = true;
        update.ended_at = Some(at(1_042));
        let state = reduce(pressed, GameEvent::GameUpdated(update.clone()));

        assert_eq!(state.pressed, None);
        assert_eq!(state.face, Face::Won);
        assert_eq!(state.timer_secs, 42);
        assert_eq!(state.session, Some(update));
        assert!(state.is_over());
    }

    #[test]
    fn timer_counts_from_start_until_end() {
        let state = reduce(playing(), GameEvent::TimerTick { now: at(1_007) });
        assert_eq!(state.timer_secs, 7);

        let idle = reduce(
            SessionState::default(),
            GameEvent::TimerTick { now: at(1_007) },
        );
        assert_eq!(idle.timer_secs, 0);
    }

    #[test]
    fn init_resolves_preset_and_starts_timer() {
        let mut update = snapshot((9, 9), &[-2; 81]);
        update.mine_count = 10;

        let state = reduce(
            SessionState::default(),
            GameEvent::GameInit {
                snapshot: update,
                now: at(1_003),
            },
        );

        assert_eq!(state.preset, PresetName::Easy);
        assert_eq!(state.timer_secs, 3);
        assert_eq!(state.params, PresetName::Easy.params().unwrap());
    }

    #[test]
    fn reset_keeps_params_of_finished_game() {
        let state = reduce(playing(), GameEvent::PresetPicked(PresetName::Custom));

        let state = reduce(
            state,
            GameEvent::GameReset {
                params: None,
                preset: None,
            },
        );

        assert_eq!(state.session, None);
        assert_eq!(state.preset, PresetName::Custom);
        assert_eq!(state.params, GameParams::new((3, 3), 2, true));
        assert_eq!(state.timer_secs, 0);
    }

    #[test]
    fn reset_without_game_uses_picked_preset() {
        let state = reduce(
            SessionState::default(),
            GameEvent::PresetPicked(PresetName::Hard),
        );

        let state = reduce(
            state,
            GameEvent::GameReset {
                params: None,
                preset: None,
            },
        );

        assert_eq!(state.preset, PresetName::Hard);
        assert_eq!(state.params, PresetName::Hard.params().unwrap());
    }

    #[test]
    fn reset_without_game_or_table_entry_uses_default() {
        let state = SessionState::with_preset(
            PresetName::Custom,
            GameParams::new((5, 5), 3, false),
        );

        let state = reduce(
            state,
            GameEvent::GameReset {
                params: None,
                preset: None,
            },
        );

        assert_eq!(state.preset, PresetName::Custom);
        assert_eq!(state.params, GameParams::default());
    }

    #[test]
    fn reset_prefers_explicit_params() {
        let hard = PresetName::Hard.params().unwrap();

        let state = reduce(
            playing(),
            GameEvent::GameReset {
                params: Some(hard),
                preset: Some(PresetName::Hard),
            },
        );

        assert_eq!(state.params, hard);
        assert_eq!(state.preset, PresetName::Hard);
    }

    #[test]
    fn failure_clears_pressed_and_keeps_session() {
        let pressed = reduce(
            playing(),
            GameEvent::CellDown {
                coords: (0, 0),
                state: CellState::Hidden,
            },
        );

        let state = reduce(pressed, GameEvent::Failed("HTTP 502".to_string()));

        assert_eq!(state.pressed, None);
        assert!(state.session.is_some());
    }

    #[test]
    fn release_without_session_creates_game() {
        let state = SessionState::default();

        assert_eq!(
            release_intent(&state, (3, 4)),
            Some(Intent::CreateGame {
                origin: (3, 4),
                params: GameParams::default(),
            })
        );
        assert_eq!(release_intent(&state, (16, 0)), None);
    }

    #[test]
    fn release_opens_unopened_and_chords_numbers() {
        let state = playing();

        assert_eq!(
            release_intent(&state, (0, 0)),
            Some(Intent::Send(Move {
                kind: MoveKind::Open,
                coords: (0, 0),
            }))
        );
        assert_eq!(
            release_intent(&state, (1, 1)),
            Some(Intent::Send(Move {
                kind: MoveKind::Chord,
                coords: (1, 1),
            }))
        );
        assert_eq!(release_intent(&state, (3, 3)), None);
    }

    #[test]
    fn flag_only_toggles_closed_cells_while_playing() {
        let state = playing();

        assert_eq!(
            flag_intent(&state, (1, 2)),
            Some(Intent::Send(Move {
                kind: MoveKind::Flag,
                coords: (1, 2),
            }))
        );
        assert!(flag_intent(&state, (2, 2)).is_some());
        assert_eq!(flag_intent(&state, (1, 1)), None);
        assert_eq!(flag_intent(&SessionState::default(), (0, 0)), None);
    }

    #[test]
    fn rendered_cells_overlay_pressed_cells() {
        let state = reduce(
            playing(),
            GameEvent::CellDown {
                coords: (1, 1),
                state: CellState::revealed(2).unwrap(),
            },
        );

        let cells = state.rendered_cells();

        assert_eq!(cells[0], CellState::revealed(0).unwrap());
        assert_eq!(cells[4], CellState::revealed(2).unwrap());
        assert_eq!(cells[7], CellState::Flagged);
        assert_eq!(state.mines_left(), 1);
    }
}
