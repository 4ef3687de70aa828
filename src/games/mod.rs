pub mod breakout;
pub mod flappy;
pub mod pong;
pub mod shooter;
pub mod snake;

use clap::ValueEnum;
use ratatui::prelude::*;

use crate::config::Settings;
use crate::sim::InputSnapshot;

/// Lifecycle shared by every game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title/menu screen, waiting for the start input
    NotStarted,
    Playing,
    Paused,
    /// Terminal until an explicit restart; `won` marks the victory variant
    GameOver { won: bool },
}

impl GamePhase {
    pub fn is_playing(&self) -> bool {
        matches!(self, GamePhase::Playing)
    }

    pub fn is_over(&self) -> bool {
        matches!(self, GamePhase::GameOver { .. })
    }

    /// Playing <-> Paused; any other phase is left alone.
    pub fn toggle_pause(&mut self) {
        *self = match *self {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            other => other,
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GameKind {
    Breakout,
    Flappy,
    Shooter,
    Pong,
    Snake,
}

impl GameKind {
    pub const ALL: [GameKind; 5] = [
        GameKind::Breakout,
        GameKind::Flappy,
        GameKind::Shooter,
        GameKind::Pong,
        GameKind::Snake,
    ];

    pub fn index(&self) -> usize {
        match self {
            GameKind::Breakout => 0,
            GameKind::Flappy => 1,
            GameKind::Shooter => 2,
            GameKind::Pong => 3,
            GameKind::Snake => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GameKind::Breakout => "Breakout",
            GameKind::Flappy => "Flappy",
            GameKind::Shooter => "Shooter",
            GameKind::Pong => "Pong",
            GameKind::Snake => "Snake",
        }
    }
}

/// One playable game, driven by the controller at its own tick rate.
///
/// `update` is called once per fixed tick with that tick's input; `render`
/// is called every frame whatever the phase.
pub trait Scene {
    fn kind(&self) -> GameKind;
    fn name(&self) -> &'static str {
        self.kind().name()
    }
    fn tick_rate(&self) -> u32 {
        60
    }
    fn update(&mut self, input: &InputSnapshot);
    fn render(&mut self, frame: &mut Frame, area: Rect);
    fn reset(&mut self);
    fn score(&self) -> u32;
    fn is_terminal(&self) -> bool;
    /// True once when the game asks to go back to the home screen.
    fn wants_exit(&mut self) -> bool {
        false
    }
    /// Whether a finished run may enter the high score table.
    fn records_high_scores(&self) -> bool {
        true
    }
}

pub fn build(kind: GameKind, settings: &Settings) -> Box<dyn Scene> {
    match kind {
        GameKind::Breakout => Box::new(breakout::Breakout::new(settings)),
        GameKind::Flappy => Box::new(flappy::Flappy::new(settings)),
        GameKind::Shooter => Box::new(shooter::Shooter::new(settings)),
        GameKind::Pong => Box::new(pong::Pong::new(settings)),
        GameKind::Snake => Box::new(snake::SnakeGame::new(settings)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pause_toggle_only_affects_play() {
        let mut phase = GamePhase::Playing;
        phase.toggle_pause();
        assert_eq!(phase, GamePhase::Paused);
        phase.toggle_pause();
        assert_eq!(phase, GamePhase::Playing);

        let mut over = GamePhase::GameOver { won: false };
        over.toggle_pause();
        assert!(over.is_over());
        let mut menu = GamePhase::NotStarted;
        menu.toggle_pause();
        assert_eq!(menu, GamePhase::NotStarted);
    }

    #[test]
    fn test_build_every_kind() {
        let settings = Settings::default();
        for kind in GameKind::ALL {
            let scene = build(kind, &settings);
            assert_eq!(scene.kind(), kind);
            assert_eq!(scene.score(), 0);
            assert!(!scene.is_terminal());
        }
        assert_eq!(build(GameKind::Snake, &settings).tick_rate(), 10);
    }
}
