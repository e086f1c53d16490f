use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - NotStarted -> Playing, on the first accepted reveal
/// - Playing -> Won
/// - Playing -> Lost
///
/// Restarting never transitions, it builds a new session in `NotStarted`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    NotStarted,
    Playing,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::NotStarted
    }
}

/// One game from board generation to win or loss.
///
/// Every move returns a new session and leaves `self` as it was, so callers can keep the previous value
/// around to compare against.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    board: Board,
    remaining_flags: i32,
    elapsed_secs: u32,
    state: GameState,
    started_at: Option<DateTime<Utc>>,
}

impl GameSession {
    pub fn new(board: Board) -> Self {
        let remaining_flags = i32::from(board.bomb_count());
        Self {
            board,
            remaining_flags,
            elapsed_secs: 0,
            state: Default::default(),
            started_at: None,
        }
    }

    /// Generates a board for `config` and wraps it in a fresh session, used for restarts and resizes alike.
    pub fn new_game(config: GameConfig, placement: impl BombPlacement) -> Result<Self> {
        let board = Board::generate(config, placement)?;
        log::debug!("new game: {:?}", config);
        Ok(Self::new(board))
    }

    /// New session with the same board size and bomb count, and a fresh placement.
    pub fn restart(&self, placement: impl BombPlacement) -> Result<Self> {
        Self::new_game(self.board.game_config(), placement)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Bombs minus placed flags, negative when over-flagged.
    pub fn remaining_flags(&self) -> i32 {
        self.remaining_flags
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn game_config(&self) -> GameConfig {
        self.board.game_config()
    }

    pub fn reveal(&self, coords: Coord2, now: DateTime<Utc>) -> Result<(Self, RevealOutcome)> {
        let coords = self.board.validate_coords(coords)?;

        if self.state.is_finished() {
            log::debug!("game already ended, ignoring reveal at {:?}", coords);
            return Ok((self.clone(), RevealOutcome::NoChange));
        }

        if self.board[coords].is_flagged() {
            return Ok((self.clone(), RevealOutcome::NoChange));
        }

        let (board, outcome) = self.board.reveal(coords)?;
        let mut next = Self {
            board,
            ..self.clone()
        };

        if next.state == GameState::NotStarted {
            log::debug!("started at {}", now);
            next.state = GameState::Playing;
            next.started_at = Some(now);
        }

        match outcome {
            RevealOutcome::Lost => next.finish(GameState::Lost, now),
            RevealOutcome::Won => {
                next.remaining_flags = 0;
                next.finish(GameState::Won, now);
            }
            RevealOutcome::NoChange | RevealOutcome::Revealed => {}
        }

        Ok((next, outcome))
    }

    pub fn toggle_flag(&self, coords: Coord2) -> Result<(Self, MarkOutcome)> {
        let coords = self.board.validate_coords(coords)?;

        if self.state.is_finished() {
            log::debug!("game already ended, ignoring flag at {:?}", coords);
            return Ok((self.clone(), MarkOutcome::NoChange));
        }

        let (board, outcome) = self.board.toggle_flag(coords)?;
        let next = Self {
            board,
            remaining_flags: self.remaining_flags + outcome.flag_delta(),
            ..self.clone()
        };
        Ok((next, outcome))
    }

    /// Recomputes the elapsed seconds while playing, any other state is returned unchanged.
    pub fn tick(&self, now: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        if self.state.is_playing() {
            next.elapsed_secs = self.elapsed_at(now);
        }
        next
    }

    fn elapsed_at(&self, now: DateTime<Utc>) -> u32 {
        let Some(started_at) = self.started_at else {
            return 0;
        };
        let millis = (now - started_at).num_milliseconds().max(0);
        u32::try_from(millis / 1000).unwrap_or(u32::MAX)
    }

    fn finish(&mut self, state: GameState, now: DateTime<Utc>) {
        self.elapsed_secs = self.elapsed_at(now);
        self.state = state;
        log::debug!("ended at {} ({:?})", now, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use chrono::TimeDelta;

    fn t0() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(1_700_000_000_000).unwrap()
    }

    fn at_millis(millis: i64) -> DateTime<Utc> {
        t0() + TimeDelta::milliseconds(millis)
    }

    /// Bombs in the top corners of a 3x3 board.
    fn corners_session() -> GameSession {
        GameSession::new_game(
            GameConfig::new_unchecked((3, 3), 2),
            FixedPlacement::new(vec![(0, 0), (2, 0)]),
        )
        .unwrap()
    }

    #[test]
    fn new_session_waits_for_first_reveal() {
        let session = corners_session();

        assert_eq!(session.state(), GameState::NotStarted);
        assert_eq!(session.remaining_flags(), 2);
        assert_eq!(session.elapsed_secs(), 0);
        assert_eq!(session.started_at(), None);
    }

    #[test]
    fn first_reveal_starts_the_clock() {
        let (session, outcome) = corners_session().reveal((2, 2), t0()).unwrap();

        assert_eq!(outcome, RevealOutcome::Revealed);
        assert_eq!(session.state(), GameState::Playing);
        assert_eq!(session.started_at(), Some(t0()));
    }

    #[test]
    fn revealing_last_safe_tile_wins() {
        let (session, _) = corners_session().reveal((2, 2), t0()).unwrap();
        let (session, _) = session.toggle_flag((0, 0)).unwrap();
        assert_eq!(session.remaining_flags(), 1);

        let (session, outcome) = session.reveal((1, 0), at_millis(4_200)).unwrap();

        assert_eq!(outcome, RevealOutcome::Won);
        assert_eq!(session.state(), GameState::Won);
        assert_eq!(session.remaining_flags(), 0);
        assert_eq!(session.elapsed_secs(), 4);
        assert!(session.board().tiles().filter(|t| t.is_bomb()).all(|t| t.is_flagged()));
        assert_eq!(
            session.board().revealed_count() + session.board().bomb_count(),
            session.board().total_cells()
        );
    }

    #[test]
    fn revealing_a_bomb_loses() {
        let (session, outcome) = corners_session().reveal((0, 0), t0()).unwrap();

        assert_eq!(outcome, RevealOutcome::Lost);
        assert_eq!(session.state(), GameState::Lost);
        assert!(session.board()[(0, 0)].is_revealed());
        assert!(session.board().tiles().filter(|t| t.is_bomb()).all(|t| t.is_revealed()));
    }

    #[test]
    fn finished_game_ignores_moves() {
        let (lost, _) = corners_session().reveal((0, 0), t0()).unwrap();

        let (after_reveal, outcome) = lost.reveal((2, 2), at_millis(1_000)).unwrap();
        assert_eq!(outcome, RevealOutcome::NoChange);
        assert_eq!(after_reveal, lost);

        let (after_flag, outcome) = lost.toggle_flag((1, 1)).unwrap();
        assert_eq!(outcome, MarkOutcome::NoChange);
        assert_eq!(after_flag, lost);
    }

    #[test]
    fn won_game_ignores_moves() {
        let (playing, _) = corners_session().reveal((2, 2), t0()).unwrap();
        let (won, _) = playing.reveal((1, 0), at_millis(2_000)).unwrap();
        assert_eq!(won.state(), GameState::Won);

        let (after_reveal, outcome) = won.reveal((1, 1), at_millis(3_000)).unwrap();
        assert_eq!(outcome, RevealOutcome::NoChange);
        assert_eq!(after_reveal, won);

        let (after_flag, outcome) = won.toggle_flag((0, 0)).unwrap();
        assert_eq!(outcome, MarkOutcome::NoChange);
        assert_eq!(after_flag, won);
        assert!(after_flag.board()[(0, 0)].is_flagged());
        assert_eq!(after_flag.remaining_flags(), 0);
    }

    #[test]
    fn flagged_reveal_does_not_start_the_game() {
        let (session, _) = corners_session().toggle_flag((2, 2)).unwrap();

        let (next, outcome) = session.reveal((2, 2), t0()).unwrap();

        assert_eq!(outcome, RevealOutcome::NoChange);
        assert_eq!(next, session);
        assert_eq!(next.state(), GameState::NotStarted);
    }

    #[test]
    fn flag_toggle_twice_restores_board_and_budget() {
        let session = corners_session();

        let (flagged, _) = session.toggle_flag((1, 1)).unwrap();
        let (restored, _) = flagged.toggle_flag((1, 1)).unwrap();

        assert_eq!(flagged.remaining_flags(), 1);
        assert_eq!(restored, session);
    }

    #[test]
    fn over_flagging_goes_negative() {
        let mut session = corners_session();
        for coords in [(0, 1), (1, 1), (2, 1)] {
            session = session.toggle_flag(coords).unwrap().0;
        }
        assert_eq!(session.remaining_flags(), -1);
    }

    #[test]
    fn tick_tracks_whole_seconds_while_playing() {
        let waiting = corners_session();
        assert_eq!(waiting.tick(at_millis(5_000)), waiting);

        let (playing, _) = waiting.reveal((2, 2), t0()).unwrap();
        assert_eq!(playing.tick(at_millis(999)).elapsed_secs(), 0);
        assert_eq!(playing.tick(at_millis(1_000)).elapsed_secs(), 1);
        assert_eq!(playing.tick(at_millis(61_900)).elapsed_secs(), 61);
        assert_eq!(playing.tick(at_millis(-5_000)).elapsed_secs(), 0);
    }

    #[test]
    fn tick_after_game_end_is_frozen() {
        let (playing, _) = corners_session().reveal((2, 2), t0()).unwrap();
        let (lost, _) = playing.reveal((0, 0), at_millis(3_500)).unwrap();
        assert_eq!(lost.elapsed_secs(), 3);

        let later = lost.tick(at_millis(90_000));
        assert_eq!(later.elapsed_secs(), 3);
        assert_eq!(later, lost);
    }

    #[test]
    fn restart_resets_everything() {
        let (playing, _) = corners_session().reveal((2, 2), t0()).unwrap();
        let (playing, _) = playing.toggle_flag((0, 0)).unwrap();
        let playing = playing.tick(at_millis(7_000));

        let restarted = playing
            .restart(FixedPlacement::new(vec![(1, 0), (1, 2)]))
            .unwrap();

        assert_eq!(restarted.state(), GameState::NotStarted);
        assert_eq!(restarted.remaining_flags(), 2);
        assert_eq!(restarted.elapsed_secs(), 0);
        assert_eq!(restarted.game_config(), playing.game_config());
        assert!(
            restarted
                .board()
                .tiles()
                .all(|t| !t.is_revealed() && !t.is_flagged())
        );
        assert!(restarted.board()[(1, 0)].is_bomb());
    }

    #[test]
    fn new_game_surfaces_invalid_configuration() {
        let result = GameSession::new_game(
            GameConfig::new_unchecked((3, 3), 9),
            RandomPlacement::new(0),
        );
        assert!(matches!(
            result,
            Err(GameError::InvalidConfiguration { bombs: 9, .. })
        ));
    }

    #[test]
    fn session_snapshot_survives_json() {
        let (session, _) = corners_session().reveal((2, 2), t0()).unwrap();

        let json = serde_json::to_string(&session).unwrap();
        let restored: GameSession = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, session);
    }
}
