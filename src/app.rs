use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::config::Settings;
use crate::event::KeyTracker;
use crate::games::{self, GameKind, Scene};
use crate::scores::{HighScores, NAME_LEN, NUM_GAMES};
use crate::sim::FixedStep;

/// Home tiles are laid out in rows of this many
pub const TILES_PER_ROW: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Home,
    Breakout,
    Flappy,
    Shooter,
    Pong,
    Snake,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Home, Tab::Breakout, Tab::Flappy, Tab::Shooter, Tab::Pong, Tab::Snake]
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Home => 0,
            Tab::Breakout => 1,
            Tab::Flappy => 2,
            Tab::Shooter => 3,
            Tab::Pong => 4,
            Tab::Snake => 5,
        }
    }

    pub fn game(&self) -> Option<GameKind> {
        match self {
            Tab::Home => None,
            Tab::Breakout => Some(GameKind::Breakout),
            Tab::Flappy => Some(GameKind::Flappy),
            Tab::Shooter => Some(GameKind::Shooter),
            Tab::Pong => Some(GameKind::Pong),
            Tab::Snake => Some(GameKind::Snake),
        }
    }

    pub fn for_game(kind: GameKind) -> Tab {
        Tab::all()[kind.index() + 1]
    }
}

/// A scene plus the clock that decides how many of its ticks a frame runs
pub struct SceneSlot {
    pub scene: Box<dyn Scene>,
    clock: FixedStep,
}

impl SceneSlot {
    fn new(scene: Box<dyn Scene>) -> Self {
        let clock = FixedStep::new(scene.tick_rate());
        Self { scene, clock }
    }
}

pub struct App {
    pub should_quit: bool,
    pub current_tab: Tab,
    pub selected_game: usize,
    scenes: Vec<SceneSlot>,
    keys: KeyTracker,
    pub high_scores: HighScores,
    pub show_high_scores: bool,
    // Name entry state
    pub entering_name: bool,
    pub name_buffer: String,
    pub name_game_idx: usize,
    pub name_score: u32,
}

impl App {
    pub fn new(settings: &Settings, high_scores: HighScores, enhanced_keys: bool) -> Self {
        Self {
            should_quit: false,
            current_tab: Tab::Home,
            selected_game: 0,
            scenes: GameKind::ALL
                .iter()
                .map(|&kind| SceneSlot::new(games::build(kind, settings)))
                .collect(),
            keys: KeyTracker::new(enhanced_keys),
            high_scores,
            show_high_scores: false,
            entering_name: false,
            name_buffer: String::new(),
            name_game_idx: 0,
            name_score: 0,
        }
    }

    /// The scene behind the current tab, if any.
    pub fn active_scene(&mut self) -> Option<&mut dyn Scene> {
        let kind = self.current_tab.game()?;
        Some(self.scenes[kind.index()].scene.as_mut())
    }

    pub fn scene(&self, kind: GameKind) -> &dyn Scene {
        self.scenes[kind.index()].scene.as_ref()
    }

    pub fn open(&mut self, tab: Tab) {
        if tab == self.current_tab {
            return;
        }
        self.current_tab = tab;
        self.keys.clear();
        match tab.game() {
            Some(kind) => {
                self.selected_game = kind.index();
                self.scenes[kind.index()].clock.reset();
                log::info!("switched to {}", kind.name());
            }
            None => log::info!("back to home"),
        }
    }

    /// Runs the ticks of the active scene that `elapsed` wall time made due.
    pub fn on_frame(&mut self, elapsed: Duration) {
        // Don't update games while entering a name
        if self.entering_name {
            return;
        }

        let Some(kind) = self.current_tab.game() else {
            self.keys.end_frame();
            return;
        };

        let slot = &mut self.scenes[kind.index()];
        let ticks = slot.clock.advance(elapsed);
        if ticks > 0 {
            // Presses go to the first tick only; later ticks see held keys
            let input = self.keys.snapshot();
            slot.scene.update(&input);
            let held_only = input.without_presses();
            for _ in 1..ticks {
                slot.scene.update(&held_only);
            }
            self.keys.take_presses();
        }
        self.keys.end_frame();

        if slot.scene.wants_exit() {
            self.open(Tab::Home);
        }
        self.check_submit_scores();
    }

    fn check_submit_scores(&mut self) {
        for (idx, slot) in self.scenes.iter().enumerate().take(NUM_GAMES) {
            let scene = &slot.scene;
            if !scene.records_high_scores() {
                continue;
            }
            let game_over = scene.is_terminal();
            let score = scene.score();
            if game_over && score > 0 && !self.high_scores.was_submitted(idx) {
                self.high_scores.mark_submitted(idx);
                if self.high_scores.qualifies(idx, score) {
                    log::info!("{} score {score} qualifies for the table", scene.name());
                    self.entering_name = true;
                    self.name_buffer.clear();
                    self.name_game_idx = idx;
                    self.name_score = score;
                    return; // Only one at a time
                }
            }
            if !game_over && self.high_scores.was_submitted(idx) {
                self.high_scores.clear_submitted(idx);
            }
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            self.keys.record(key);
            return;
        }

        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // If entering a name, intercept all input
        if self.entering_name {
            self.handle_name_input(key);
            return;
        }

        // Global keys
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                if self.current_tab == Tab::Home {
                    self.should_quit = true;
                    return;
                }
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.prev_tab();
                } else {
                    self.next_tab();
                }
                return;
            }
            KeyCode::BackTab => {
                self.prev_tab();
                return;
            }
            KeyCode::Esc => {
                if self.current_tab != Tab::Home {
                    self.open(Tab::Home);
                    return;
                }
            }
            _ => {}
        }

        if self.current_tab == Tab::Home {
            self.handle_home_key(key);
            return;
        }

        // Everything else goes to the active game on its next tick
        self.keys.record(key);
    }

    fn handle_home_key(&mut self, key: KeyEvent) {
        if !key.modifiers.is_empty() && key.modifiers != KeyModifiers::SHIFT {
            return;
        }
        let count = GameKind::ALL.len();
        match key.code {
            KeyCode::Char(c @ '1'..='5') => {
                let idx = c as usize - '1' as usize;
                self.open(Tab::for_game(GameKind::ALL[idx]));
            }
            KeyCode::Char('h') | KeyCode::Char('H') => {
                self.show_high_scores = !self.show_high_scores;
            }
            KeyCode::Right => self.selected_game = (self.selected_game + 1) % count,
            KeyCode::Left => self.selected_game = (self.selected_game + count - 1) % count,
            // Two rows: jump between them, clamping onto the shorter one
            KeyCode::Up | KeyCode::Down => {
                self.selected_game = if self.selected_game < TILES_PER_ROW {
                    (self.selected_game + TILES_PER_ROW).min(count - 1)
                } else {
                    self.selected_game - TILES_PER_ROW
                };
            }
            KeyCode::Enter => self.open(Tab::for_game(GameKind::ALL[self.selected_game])),
            _ => {}
        }
    }

    fn handle_name_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                let name = if self.name_buffer.is_empty() {
                    "???".to_string()
                } else {
                    self.name_buffer.clone()
                };
                self.finish_name_entry(&name);
            }
            KeyCode::Backspace => {
                self.name_buffer.pop();
            }
            // Cancel keeps the score under a placeholder name
            KeyCode::Esc => self.finish_name_entry("???"),
            KeyCode::Char(c) => {
                if self.name_buffer.chars().count() < NAME_LEN && c.is_ascii_graphic() {
                    self.name_buffer.push(c.to_ascii_uppercase());
                }
            }
            _ => {}
        }
    }

    fn finish_name_entry(&mut self, name: &str) {
        self.high_scores.submit(self.name_game_idx, name, self.name_score);
        self.entering_name = false;
        self.name_buffer.clear();
    }

    fn next_tab(&mut self) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.open(tabs[(idx + 1) % tabs.len()]);
    }

    fn prev_tab(&mut self) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.open(tabs[(idx + tabs.len() - 1) % tabs.len()]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::InputSnapshot;
    use ratatui::prelude::{Frame, Rect};
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::rc::Rc;

    #[derive(Default)]
    struct Counts {
        updates: u32,
        presses: u32,
        held_ticks: u32,
    }

    struct StubScene {
        kind: GameKind,
        score: u32,
        over: bool,
        records: bool,
        counts: Rc<RefCell<Counts>>,
    }

    impl StubScene {
        fn new(kind: GameKind) -> Self {
            Self { kind, score: 0, over: false, records: true, counts: Rc::default() }
        }
    }

    impl Scene for StubScene {
        fn kind(&self) -> GameKind {
            self.kind
        }
        fn update(&mut self, input: &InputSnapshot) {
            let mut counts = self.counts.borrow_mut();
            counts.updates += 1;
            counts.presses += input.pressed.len() as u32;
            if input.is_held(KeyCode::Left) {
                counts.held_ticks += 1;
            }
        }
        fn render(&mut self, _frame: &mut Frame, _area: Rect) {}
        fn reset(&mut self) {}
        fn score(&self) -> u32 {
            self.score
        }
        fn is_terminal(&self) -> bool {
            self.over
        }
        fn records_high_scores(&self) -> bool {
            self.records
        }
    }

    fn temp_scores(tag: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("neoncade-app-{}-{tag}.scores", std::process::id()));
        let _ = std::fs::remove_file(&path);
        path
    }

    fn app(tag: &str) -> App {
        let settings = Settings { seed: Some(1), ..Settings::default() };
        App::new(&settings, HighScores::load_from(temp_scores(tag)), false)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn stub(app: &mut App, kind: GameKind, scene: StubScene) {
        app.scenes[kind.index()] = SceneSlot::new(Box::new(scene));
    }

    #[test]
    fn test_digits_open_games_and_esc_returns() {
        let mut app = app("digits");
        app.on_key(press(KeyCode::Char('2')));
        assert_eq!(app.current_tab, Tab::Flappy);
        assert_eq!(app.selected_game, 1);
        app.on_key(press(KeyCode::Esc));
        assert_eq!(app.current_tab, Tab::Home);
        app.on_key(press(KeyCode::Char('5')));
        assert_eq!(app.current_tab, Tab::Snake);
    }

    #[test]
    fn test_q_quits_only_from_home() {
        let mut app = app("quit");
        app.on_key(press(KeyCode::Char('4')));
        app.on_key(press(KeyCode::Char('q')));
        assert!(!app.should_quit);
        app.on_key(press(KeyCode::Esc));
        app.on_key(press(KeyCode::Char('q')));
        assert!(app.should_quit);

        let mut other = self::app("ctrlc");
        other.on_key(press(KeyCode::Char('1')));
        other.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(other.should_quit);
    }

    #[test]
    fn test_tab_cycles_all_tabs() {
        let mut app = app("tabs");
        for expected in [Tab::Breakout, Tab::Flappy, Tab::Shooter, Tab::Pong, Tab::Snake, Tab::Home] {
            app.on_key(press(KeyCode::Tab));
            assert_eq!(app.current_tab, expected);
        }
        app.on_key(press(KeyCode::BackTab));
        assert_eq!(app.current_tab, Tab::Snake);
    }

    #[test]
    fn test_home_grid_navigation() {
        let mut app = app("grid");
        app.on_key(press(KeyCode::Left));
        assert_eq!(app.selected_game, 4);
        app.on_key(press(KeyCode::Up));
        assert_eq!(app.selected_game, 1);
        app.on_key(press(KeyCode::Right));
        app.on_key(press(KeyCode::Down));
        // Column 2 has no tile below; clamp to the last one
        assert_eq!(app.selected_game, 4);
        app.on_key(press(KeyCode::Enter));
        assert_eq!(app.current_tab, Tab::Snake);
    }

    #[test]
    fn test_high_score_overlay_toggle() {
        let mut app = app("overlay");
        app.on_key(press(KeyCode::Char('h')));
        assert!(app.show_high_scores);
        app.on_key(press(KeyCode::Char('h')));
        assert!(!app.show_high_scores);
    }

    #[test]
    fn test_presses_reach_one_tick() {
        let mut app = app("presses");
        let scene = StubScene::new(GameKind::Breakout);
        let counts = Rc::clone(&scene.counts);
        stub(&mut app, GameKind::Breakout, scene);
        app.open(Tab::Breakout);

        app.on_key(press(KeyCode::Left));
        app.on_frame(Duration::from_millis(50));
        {
            let c = counts.borrow();
            assert_eq!(c.updates, 3);
            assert_eq!(c.presses, 1);
            assert_eq!(c.held_ticks, 3);
        }

        // Nothing due yet: the press waits for the next tick
        app.on_key(press(KeyCode::Char('x')));
        app.on_frame(Duration::ZERO);
        assert_eq!(counts.borrow().presses, 1);
        app.on_frame(Duration::from_millis(17));
        assert_eq!(counts.borrow().presses, 2);
    }

    #[test]
    fn test_shooter_quit_returns_home() {
        let mut app = app("shooter-quit");
        app.on_key(press(KeyCode::Char('3')));
        app.on_key(press(KeyCode::Down));
        app.on_key(press(KeyCode::Enter));
        app.on_frame(Duration::from_millis(17));
        assert_eq!(app.current_tab, Tab::Home);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_name_entry_after_qualifying_game_over() {
        let mut app = app("name");
        stub(
            &mut app,
            GameKind::Snake,
            StubScene { score: 50, over: true, ..StubScene::new(GameKind::Snake) },
        );
        app.open(Tab::Snake);
        app.on_frame(Duration::from_millis(17));
        assert!(app.entering_name);
        assert_eq!(app.name_game_idx, GameKind::Snake.index());

        for c in ['a', 'b', ' ', 'c'] {
            app.on_key(press(KeyCode::Char(c)));
        }
        app.on_key(press(KeyCode::Backspace));
        app.on_key(press(KeyCode::Enter));
        assert!(!app.entering_name);
        let top = app.high_scores.top_scores(GameKind::Snake.index());
        assert_eq!((top[0].name.as_str(), top[0].score), ("AB", 50));

        // Same game-over screen is not offered twice
        app.on_frame(Duration::from_millis(17));
        assert!(!app.entering_name);
        let _ = std::fs::remove_file(app.high_scores.path());
    }

    #[test]
    fn test_pong_never_prompts() {
        let mut app = app("pong");
        stub(
            &mut app,
            GameKind::Pong,
            StubScene { score: 10, over: true, records: false, ..StubScene::new(GameKind::Pong) },
        );
        app.open(Tab::Pong);
        app.on_frame(Duration::from_millis(17));
        assert!(!app.entering_name);
    }
}
