use crate::settings::{Preset, Settings, SettingsView};
use crate::utils::*;
use bitflags::bitflags;
use chrono::prelude::*;
use clap::Args;
use gloo::timers::callback::Interval;
use minesweeper_core as game;
use yew::prelude::*;

/// Period of the elapsed-time refresh while a game is running.
const TICK_MILLIS: u32 = 100;

fn utc_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum ViewCellState {
    Hidden,
    Flagged,
    Blank,
    Number(u8),
    Bomb,
}

impl From<&game::Tile> for ViewCellState {
    fn from(tile: &game::Tile) -> Self {
        use ViewCellState::*;
        if tile.is_revealed() {
            match tile.adjacent_bombs() {
                _ if tile.is_bomb() => Bomb,
                Some(0) | None => Blank,
                Some(count) => Number(count),
            }
        } else if tile.is_flagged() {
            Flagged
        } else {
            Hidden
        }
    }
}

/// Face shown on the restart button.
const fn face_for(state: game::GameState) -> (&'static str, &'static str) {
    use game::GameState::*;
    match state {
        NotStarted => ("not-started", "\u{1F60A}"),
        Playing => ("in-progress", "\u{1F60A}"),
        Won => ("win", "\u{1F60E}"),
        Lost => ("lose", "\u{1F616}"),
    }
}

/// Keeps `timer` alive exactly while `state` is playing, calling `start` when one is needed.
fn sync_timer_slot<T>(timer: &mut Option<T>, state: game::GameState, start: impl FnOnce() -> T) {
    match (state.is_playing(), timer.is_some()) {
        (true, false) => {
            log::debug!("starting timer");
            *timer = Some(start());
        }
        (false, true) => {
            log::debug!("stopping timer");
            *timer = None;
        }
        _ => {}
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq)]
    struct MouseButtons: u16 {
        const LEFT    = 1;
        const RIGHT   = 1 << 1;
        const MIDDLE  = 1 << 2;
        const BACK    = 1 << 3;
        const FORWARD = 1 << 4;
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct CellPointerState {
    pos: game::Coord2,
    buttons: MouseButtons,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum CellMsg {
    Update(CellPointerState),
    Leave,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    CellEvent(CellMsg),
    Tick,
    NewGame,
    ToggleSettings,
    ApplySettings(Settings),
}

#[derive(Properties, Clone, PartialEq)]
struct CellProps {
    x: game::Coord,
    y: game::Coord,
    cell_state: ViewCellState,
    #[prop_or_default]
    pressed: bool,
    callback: Callback<CellMsg>,
}

#[function_component(CellView)]
fn cell_component(props: &CellProps) -> Html {
    use ViewCellState::*;

    let CellProps {
        x,
        y,
        cell_state,
        pressed,
        callback,
    } = props.clone();

    let mut class = classes!(
        "cell",
        match cell_state {
            Hidden => classes!(),
            Flagged => classes!("flag"),
            Blank => classes!("open"),
            Number(count) => classes!("open", format!("num-{}", count)),
            Bomb => classes!("open", "mine"),
        }
    );
    if pressed {
        class.push("pressed");
    }

    let label = match cell_state {
        Number(count) => count.to_string(),
        Flagged => "\u{1F6A9}".to_string(),
        Bomb => "\u{1F4A3}".to_string(),
        Hidden | Blank => String::new(),
    };

    let pointer_callback = |name: &'static str| {
        let callback = callback.clone();
        Callback::from(move |e: MouseEvent| {
            let buttons = MouseButtons::from_bits_truncate(e.buttons());
            callback.emit(CellMsg::Update(CellPointerState {
                pos: (x, y),
                buttons,
            }));
            log::trace!("({}, {}) mouse {} ({:?})", x, y, name, buttons);
        })
    };
    let onmousedown = pointer_callback("down");
    let onmouseup = pointer_callback("up");
    let onmouseenter = pointer_callback("enter");

    let onmouseleave = Callback::from(move |_: MouseEvent| {
        callback.emit(CellMsg::Leave);
        log::trace!("({}, {}) mouse leave", x, y);
    });

    html! {
        <td {class} {onmousedown} {onmouseup} {onmouseenter} {onmouseleave}>{label}</td>
    }
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Board size to start with
    #[arg(short, long, value_enum, default_value_t = Preset::Small)]
    #[prop_or_default]
    pub preset: Preset,
}

#[derive(Debug)]
pub(crate) struct GameView {
    settings: Settings,
    session: game::GameSession,
    fixed_seed: Option<u64>,
    settings_open: bool,
    current_cell_state: Option<CellPointerState>,
    /// Only present while the session is playing, dropping it cancels the interval.
    timer: Option<Interval>,
}

impl GameView {
    fn next_seed(&self) -> u64 {
        self.fixed_seed.unwrap_or_else(js_random_seed)
    }

    fn create_session(config: game::GameConfig, seed: u64) -> game::GameSession {
        game::GameSession::new_game(config, game::RandomPlacement::new(seed)).unwrap_or_else(
            |err| {
                log::error!("cannot start {:?}: {}, falling back to the small board", config, err);
                game::GameSession::new_game(
                    game::GameConfig::SMALL,
                    game::RandomPlacement::new(seed),
                )
                .expect("small preset is always valid")
            },
        )
    }

    /// Replaces the session with a fresh one, stopping the clock of the old one first.
    fn start_new_game(&mut self) {
        self.timer = None;
        self.session = Self::create_session(self.settings.game_config(), self.next_seed());
    }

    fn sync_timer(&mut self, ctx: &Context<Self>) {
        sync_timer_slot(&mut self.timer, self.session.state(), || Self::create_timer(ctx));
    }

    fn create_timer(ctx: &Context<Self>) -> Interval {
        let link = ctx.link().clone();
        Interval::new(TICK_MILLIS, move || link.send_message(Msg::Tick))
    }

    fn reveal_cell(&mut self, coords: game::Coord2) {
        match self.session.reveal(coords, utc_now()) {
            Ok((next, outcome)) => {
                log::debug!(
                    "reveal {:?}: {:?}, {} tiles changed",
                    coords,
                    outcome,
                    self.session.board().changed_tiles(next.board()).count()
                );
                self.session = next;
            }
            Err(err) => log::error!("reveal {:?} failed: {}", coords, err),
        }
    }

    fn mark_cell(&mut self, coords: game::Coord2) {
        if self.session.board()[coords].is_revealed() {
            return;
        }

        match self.session.toggle_flag(coords) {
            Ok((next, outcome)) => {
                log::debug!("flag {:?}: {:?}", coords, outcome);
                self.session = next;
            }
            Err(err) => log::error!("flag {:?} failed: {}", coords, err),
        }
    }

    fn is_mid_open(&self) -> bool {
        matches!(
            self.current_cell_state,
            Some(CellPointerState {
                buttons: MouseButtons::LEFT,
                ..
            })
        )
    }

    fn game_state_class(&self) -> Classes {
        let (class, _) = face_for(self.session.state());
        if self.is_mid_open() && !self.session.is_finished() {
            classes!("mid-open")
        } else {
            classes!(class)
        }
    }

    fn is_pressed(&self, coords: game::Coord2, cell_state: ViewCellState) -> bool {
        if self.session.is_finished() || cell_state != ViewCellState::Hidden {
            return false;
        }

        match self.current_cell_state {
            Some(CellPointerState {
                pos,
                buttons: MouseButtons::LEFT,
            }) if pos == coords => true,
            Some(CellPointerState {
                pos,
                buttons: MouseButtons::LEFT,
            }) if game::is_neighbor(pos, coords) => {
                let board = self.session.board();
                board[pos].is_revealed() && board.spreads_from(pos) == Ok(true)
            }
            _ => false,
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let GameProps { seed, preset } = ctx.props().clone();
        let settings = Settings::new(preset);
        let seed_for_first_game = seed.unwrap_or_else(js_random_seed);
        let session = Self::create_session(settings.game_config(), seed_for_first_game);

        Self {
            settings,
            session,
            fixed_seed: seed,
            settings_open: false,
            current_cell_state: None,
            timer: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use CellMsg::*;
        use Msg::*;

        let updated = match msg {
            CellEvent(Leave) => {
                log::trace!("cell leave");
                self.current_cell_state.take().is_some()
            }
            CellEvent(Update(cell_state)) => {
                log::trace!("cell update: {:?}", cell_state);
                if cell_state.buttons.is_empty() {
                    // buttons were released over `cell_state.pos`, what was held before decides
                    // the action; releasing always clears the pressed preview so every arm redraws
                    match self.current_cell_state.take() {
                        None => false,
                        Some(CellPointerState { pos, buttons }) => match buttons {
                            MouseButtons::LEFT => {
                                log::debug!("reveal cell: {:?}", pos);
                                self.reveal_cell(pos);
                                true
                            }
                            MouseButtons::RIGHT => {
                                log::debug!("flag cell: {:?}", pos);
                                self.mark_cell(pos);
                                true
                            }
                            // several buttons at once cancel, pressed cells still need redrawing
                            _ => true,
                        },
                    }
                } else {
                    match self.current_cell_state.replace(cell_state) {
                        None => true,
                        Some(previous) => previous != cell_state,
                    }
                }
            }
            Tick => {
                let next = self.session.tick(utc_now());
                let changed = next.elapsed_secs() != self.session.elapsed_secs();
                self.session = next;
                changed
            }
            NewGame => {
                log::debug!("new game");
                self.start_new_game();
                true
            }
            ToggleSettings => {
                self.settings_open = !self.settings_open;
                true
            }
            ApplySettings(settings) => {
                log::debug!("apply settings: {:?}", settings);
                self.settings = settings;
                self.settings_open = false;
                self.start_new_game();
                true
            }
        };

        self.sync_timer(ctx);
        updated
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let board = self.session.board();
        let (cols, rows) = board.size();
        let (_, face) = face_for(self.session.state());
        let game_state_class = self.game_state_class();
        let is_playable = !self.session.is_finished();
        let flags_left = format_for_counter(self.session.remaining_flags());
        let elapsed_time =
            format_for_counter(i32::try_from(self.session.elapsed_secs()).unwrap_or(i32::MAX));

        let cb_new_game = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            NewGame
        });
        let cb_show_settings = ctx.link().callback(|_: MouseEvent| ToggleSettings);
        let cb_apply_settings = ctx.link().callback(ApplySettings);
        let cb_close_settings = ctx.link().callback(|_: ()| ToggleSettings);

        html! {
            <div class="minesweeper" oncontextmenu={Callback::from(move |e: MouseEvent| e.prevent_default())}>
                <nav>
                    <aside>{flags_left}</aside>
                    <span><button class={game_state_class} onclick={cb_new_game}>{face}</button></span>
                    <aside>{elapsed_time}</aside>
                    <button class="settings" onclick={cb_show_settings}>{"\u{1F6E0}"}</button>
                </nav>
                <table class={classes!(is_playable.then_some("playable"))}>
                    {
                        for (0..rows).map(|y| html! {
                            <tr>
                                {
                                    for (0..cols).map(|x| {
                                        let pos = (x, y);
                                        let cell_state = ViewCellState::from(&board[pos]);
                                        let pressed = self.is_pressed(pos, cell_state);
                                        let callback = ctx.link().callback(Msg::CellEvent);
                                        html! {
                                            <CellView key={format!("{x},{y}")} {x} {y} {cell_state} {callback} {pressed}/>
                                        }
                                    })
                                }
                            </tr>
                        })
                    }
                </table>
                <SettingsView
                    open={self.settings_open}
                    current={self.settings}
                    on_apply={cb_apply_settings}
                    on_close={cb_close_settings}
                />
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn t0() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(0).unwrap()
    }

    fn corners_session() -> game::GameSession {
        game::GameSession::new_game(
            game::GameConfig::new((3, 3), 2).unwrap(),
            game::FixedPlacement::new(vec![(0, 0), (2, 0)]),
        )
        .unwrap()
    }

    fn view_rows(session: &game::GameSession) -> Vec<Vec<ViewCellState>> {
        let board = session.board();
        let (cols, rows) = board.size();
        (0..rows)
            .map(|y| (0..cols).map(|x| ViewCellState::from(&board[(x, y)])).collect())
            .collect()
    }

    #[test]
    fn opening_blank_corner_renders_numbers_and_blanks() {
        use ViewCellState::*;

        let (session, _) = corners_session().reveal((2, 2), t0()).unwrap();

        assert_eq!(
            view_rows(&session),
            vec![
                vec![Hidden, Hidden, Hidden],
                vec![Number(1), Number(2), Number(1)],
                vec![Blank, Blank, Blank],
            ]
        );
    }

    #[test]
    fn lost_game_renders_bombs_and_keeps_flags() {
        use ViewCellState::*;

        let (session, _) = corners_session().toggle_flag((2, 0)).unwrap();
        let (session, _) = session.reveal((0, 0), t0()).unwrap();

        assert_eq!(view_rows(&session)[0], vec![Bomb, Hidden, Flagged]);
        assert_eq!(face_for(session.state()), ("lose", "\u{1F616}"));
    }

    #[test]
    fn won_game_renders_flags_on_all_bombs() {
        use ViewCellState::*;

        let (session, _) = corners_session().reveal((2, 2), t0()).unwrap();
        let (session, _) = session.reveal((1, 0), t0()).unwrap();

        assert_eq!(view_rows(&session)[0], vec![Flagged, Number(2), Flagged]);
        assert_eq!(face_for(session.state()).0, "win");
    }

    #[test]
    fn faces_share_the_smile_until_the_game_ends() {
        assert_eq!(
            face_for(game::GameState::NotStarted).1,
            face_for(game::GameState::Playing).1
        );
        assert_ne!(
            face_for(game::GameState::Playing).1,
            face_for(game::GameState::Won).1
        );
    }

    /// Stand-in timer recording how many were started and how many are still alive.
    struct CountedTimer(Rc<Cell<u32>>);

    impl CountedTimer {
        fn start(alive: &Rc<Cell<u32>>, started: &Cell<u32>) -> Self {
            started.set(started.get() + 1);
            alive.set(alive.get() + 1);
            Self(alive.clone())
        }
    }

    impl Drop for CountedTimer {
        fn drop(&mut self) {
            self.0.set(self.0.get() - 1);
        }
    }

    #[test]
    fn timer_lives_only_while_playing_until_loss_and_restart() {
        let alive = Rc::new(Cell::new(0));
        let started = Cell::new(0);
        let mut timer = None;
        let sync = |timer: &mut Option<CountedTimer>, session: &game::GameSession| {
            sync_timer_slot(timer, session.state(), || CountedTimer::start(&alive, &started))
        };

        let session = corners_session();
        sync(&mut timer, &session);
        assert!(timer.is_none());

        let (session, _) = session.reveal((2, 2), t0()).unwrap();
        sync(&mut timer, &session);
        let session = session.tick(t0());
        sync(&mut timer, &session);
        assert!(timer.is_some());

        let (session, _) = session.reveal((0, 0), t0()).unwrap();
        sync(&mut timer, &session);
        assert!(timer.is_none());

        let session = session
            .restart(game::FixedPlacement::new(vec![(0, 0), (2, 0)]))
            .unwrap();
        sync(&mut timer, &session);
        assert!(timer.is_none());

        assert_eq!(started.get(), 1);
        assert_eq!(alive.get(), 0);
    }

    #[test]
    fn timer_stops_on_win_and_on_resize_mid_game() {
        let alive = Rc::new(Cell::new(0));
        let started = Cell::new(0);
        let mut timer = None;

        let (playing, _) = corners_session().reveal((2, 2), t0()).unwrap();
        sync_timer_slot(&mut timer, playing.state(), || CountedTimer::start(&alive, &started));
        let (won, _) = playing.reveal((1, 0), t0()).unwrap();
        sync_timer_slot(&mut timer, won.state(), || CountedTimer::start(&alive, &started));
        assert!(timer.is_none());
        assert_eq!(alive.get(), 0);

        sync_timer_slot(&mut timer, playing.state(), || CountedTimer::start(&alive, &started));
        assert_eq!(alive.get(), 1);
        let resized = game::GameSession::new_game(
            game::GameConfig::MEDIUM,
            game::RandomPlacement::new(7),
        )
        .unwrap();
        sync_timer_slot(&mut timer, resized.state(), || CountedTimer::start(&alive, &started));
        assert!(timer.is_none());
        assert_eq!((started.get(), alive.get()), (2, 0));
    }

    #[cfg(target_arch = "wasm32")]
    #[wasm_bindgen_test::wasm_bindgen_test]
    fn interval_is_dropped_when_game_is_lost() {
        let mut timer: Option<Interval> = None;

        let (playing, _) = corners_session().reveal((2, 2), t0()).unwrap();
        sync_timer_slot(&mut timer, playing.state(), || Interval::new(TICK_MILLIS, || {}));
        assert!(timer.is_some());

        let (lost, _) = playing.reveal((0, 0), t0()).unwrap();
        sync_timer_slot(&mut timer, lost.state(), || Interval::new(TICK_MILLIS, || {}));
        assert!(timer.is_none());
    }
}
