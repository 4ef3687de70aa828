use std::collections::VecDeque;

use crossterm::event::KeyCode;
use glam::Vec2;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::config::Settings;
use crate::games::{GameKind, GamePhase, Scene};
use crate::sim::{Aabb, Burst, GameRng, InputSnapshot, MovingBody, ParticleSystem, RandomSource};
use crate::ui::key_hints;
use crate::ui::surface::{fade, lerp_rgb, Surface};

const WIDTH: f32 = 800.0;
const HEIGHT: f32 = 600.0;
const GROUND_MARGIN: f32 = 30.0;

const BIRD_SIZE: f32 = 25.0;
const GRAVITY: f32 = 0.6;
const JUMP_FORCE: f32 = -9.0;
const TRAIL_LEN: usize = 15;

const PIPE_WIDTH: f32 = 70.0;
const PIPE_GAP: f32 = 180.0;
const PIPE_SPEED: f32 = 4.0;
/// A new pipe enters once the previous one is this far in from the right edge
const PIPE_SPACING: f32 = 300.0;

const MOTE_COUNT: usize = 50;

const JUMP_SPARKS: Burst = Burst::new(8, 50)
    .velocity((-3.0, 3.0), (-5.0, -2.0))
    .jitter(2.0)
    .spread(10.0)
    .gravity(0.1)
    .size(2.0, 6.0)
    .shrinking();
const SCORE_SPARKS: Burst = Burst::new(10, 50)
    .velocity((-2.0, 2.0), (-3.0, 0.0))
    .jitter(2.0)
    .spread(20.0)
    .gravity(0.1)
    .size(2.0, 6.0)
    .shrinking();
const MOTE: Burst = Burst::new(1, 50)
    .velocity((-1.0, 1.0), (-1.0, 1.0))
    .jitter(2.0)
    .gravity(0.1)
    .size(2.0, 6.0)
    .shrinking();

const BG_TOP: (u8, u8, u8) = (20, 20, 40);
const BG_BOTTOM: (u8, u8, u8) = (80, 40, 120);
const NEON_PINK: Color = Color::Rgb(255, 100, 255);
const NEON_CYAN: Color = Color::Rgb(100, 255, 255);
const PIPE_MAIN: Color = Color::Rgb(40, 40, 80);
const PIPE_GLOW: Color = Color::Rgb(150, 100, 255);
const GOLDEN: Color = Color::Rgb(255, 200, 100);
const TRAIL: Color = Color::Rgb(100, 200, 255);

struct Bird {
    body: MovingBody,
    /// Degrees, nose down positive
    rotation: f32,
    flap: f32,
    trail: VecDeque<Vec2>,
    particles: ParticleSystem,
}

impl Bird {
    fn new(particles: bool) -> Self {
        Self {
            body: MovingBody::circle(WIDTH / 4.0, HEIGHT / 2.0, BIRD_SIZE / 2.0),
            rotation: 0.0,
            flap: 0.0,
            trail: VecDeque::with_capacity(TRAIL_LEN + 1),
            particles: ParticleSystem::new(particles),
        }
    }

    fn update(&mut self) {
        self.body.integrate_with_gravity(GRAVITY);
        self.rotation = (self.body.vel.y * 4.0).clamp(-45.0, 45.0);
        self.flap += 0.4;

        self.trail.push_back(self.body.pos);
        if self.trail.len() > TRAIL_LEN {
            self.trail.pop_front();
        }
        self.particles.update();
    }

    fn jump(&mut self, rng: &mut dyn RandomSource) {
        self.body.vel.y = JUMP_FORCE;
        self.particles.burst(rng, self.body.pos, &JUMP_SPARKS, NEON_CYAN);
    }

    /// Square hitbox a little under the drawn size
    fn hitbox(&self) -> Aabb {
        let half = (BIRD_SIZE / 2.0).floor();
        Aabb::new(self.body.pos.x - half, self.body.pos.y - half, BIRD_SIZE, BIRD_SIZE)
    }

    fn glyph(&self) -> char {
        match self.rotation {
            r if r < -15.0 => '▲',
            r if r > 15.0 => '▼',
            _ => '►',
        }
    }
}

struct Pipe {
    x: f32,
    /// Centre of the opening
    gap_y: f32,
    passed: bool,
}

impl Pipe {
    fn new(x: f32, rng: &mut dyn RandomSource) -> Self {
        Self {
            x,
            gap_y: rng.int_inclusive(150, HEIGHT as i32 - 200) as f32,
            passed: false,
        }
    }

    fn rects(&self) -> [Aabb; 2] {
        let top_h = self.gap_y - PIPE_GAP / 2.0;
        let bottom_y = self.gap_y + PIPE_GAP / 2.0;
        [
            Aabb::new(self.x, 0.0, PIPE_WIDTH, top_h),
            Aabb::new(self.x, bottom_y, PIPE_WIDTH, HEIGHT - bottom_y),
        ]
    }
}

pub struct Flappy {
    bird: Bird,
    pipes: Vec<Pipe>,
    motes: ParticleSystem,
    score: u32,
    high_score: u32,
    phase: GamePhase,
    ticks: u64,
    particles_on: bool,
    rng: Box<dyn RandomSource>,
}

impl Flappy {
    pub fn new(settings: &Settings) -> Self {
        let rng = Box::new(GameRng::from_seed_opt(settings.seed_for(GameKind::Flappy)));
        Self::with_rng(rng, settings.particles)
    }

    fn with_rng(rng: Box<dyn RandomSource>, particles_on: bool) -> Self {
        let mut game = Self {
            bird: Bird::new(particles_on),
            pipes: Vec::new(),
            motes: ParticleSystem::new(particles_on),
            score: 0,
            high_score: 0,
            phase: GamePhase::NotStarted,
            ticks: 0,
            particles_on,
            rng,
        };
        game.top_up_motes();
        game
    }

    fn top_up_motes(&mut self) {
        let missing = MOTE_COUNT.saturating_sub(self.motes.len());
        if missing > 0 {
            let burst = Burst { count: missing, ..MOTE };
            let area = Aabb::new(0.0, 0.0, WIDTH, HEIGHT);
            self.motes.scatter(self.rng.as_mut(), area, &burst, &[GOLDEN]);
        }
    }

    fn handle_input(&mut self, input: &InputSnapshot) {
        if input.was_pressed(KeyCode::Char(' ')) {
            match self.phase {
                GamePhase::NotStarted => {
                    self.phase = GamePhase::Playing;
                    log::info!("flappy started");
                }
                GamePhase::Playing => self.bird.jump(self.rng.as_mut()),
                _ => {}
            }
        }
        if self.phase.is_over() && input.was_pressed_char('r') {
            self.reset();
        }
    }

    fn step_world(&mut self) {
        self.bird.update();

        let y = self.bird.body.pos.y;
        if y > HEIGHT - GROUND_MARGIN || y < 0.0 {
            self.crash();
        }

        for pipe in &mut self.pipes {
            pipe.x -= PIPE_SPEED;
        }
        self.pipes.retain(|p| p.x >= -PIPE_WIDTH);

        let bird_x = self.bird.body.pos.x;
        let hitbox = self.bird.hitbox();
        let mut scored = 0;
        let mut hit = false;
        for pipe in &mut self.pipes {
            if !pipe.passed && pipe.x + PIPE_WIDTH < bird_x {
                pipe.passed = true;
                scored += 1;
            }
            hit |= pipe.rects().iter().any(|r| r.intersects(&hitbox));
        }
        for _ in 0..scored {
            self.score += 1;
            let origin = self.bird.body.pos;
            self.bird.particles.burst(self.rng.as_mut(), origin, &SCORE_SPARKS, GOLDEN);
        }
        if hit {
            self.crash();
        }

        let spawn = self.pipes.last().map_or(true, |p| p.x < WIDTH - PIPE_SPACING);
        if spawn {
            let pipe = Pipe::new(WIDTH, self.rng.as_mut());
            self.pipes.push(pipe);
        }
    }

    fn crash(&mut self) {
        if self.phase.is_over() {
            return;
        }
        log::info!("flappy crashed with score {}", self.score);
        self.phase = GamePhase::GameOver { won: false };
        self.high_score = self.high_score.max(self.score);
    }

    fn render_field(&self, area: Rect) -> Vec<Line<'static>> {
        let mut s = Surface::new(area, WIDTH, HEIGHT, Color::Rgb(BG_TOP.0, BG_TOP.1, BG_TOP.2));
        s.gradient(BG_TOP, BG_BOTTOM);

        for p in self.motes.iter() {
            s.plot(p.body.pos, '·', fade(p.color, p.fade()));
        }

        let glow = ((self.ticks as f32 * 0.08).sin() + 1.0) * 0.5;
        let rim = lerp_rgb((40, 40, 80), (150, 100, 255), 0.4 + glow * 0.6);
        for pipe in &self.pipes {
            for r in pipe.rects() {
                s.fill_rect(r, '█', PIPE_MAIN);
                let edge = Aabb::new(r.x, r.y, 6.0, r.h);
                s.fill_rect(edge, '▌', rim);
                let edge = Aabb::new(r.right() - 6.0, r.y, 6.0, r.h);
                s.fill_rect(edge, '▐', rim);
            }
            let [top, bottom] = pipe.rects();
            s.fill_rect(Aabb::new(pipe.x - 5.0, top.bottom() - 25.0, PIPE_WIDTH + 10.0, 25.0), '▀', PIPE_GLOW);
            s.fill_rect(Aabb::new(pipe.x - 5.0, bottom.y, PIPE_WIDTH + 10.0, 25.0), '▄', PIPE_GLOW);
        }

        let n = self.bird.trail.len();
        for (i, pos) in self.bird.trail.iter().enumerate() {
            s.plot(*pos, '∙', fade(TRAIL, i as f32 / n as f32 * 0.5));
        }
        for p in self.bird.particles.iter() {
            s.plot(p.body.pos, '*', fade(p.color, p.fade()));
        }
        s.disc(self.bird.body.pos, BIRD_SIZE / 2.0, '●', Color::White);
        let wing = if self.flap_up() { '⌃' } else { '⌄' };
        s.plot(self.bird.body.pos - Vec2::new(BIRD_SIZE, 0.0), wing, NEON_PINK);
        s.plot_bold(self.bird.body.pos, self.bird.glyph(), NEON_CYAN);

        match self.phase {
            GamePhase::NotStarted => {
                s.banner(-6, "NEON FLAPPY BIRD", NEON_PINK);
                let pulse = ((self.ticks as f32 * 0.08).sin() + 1.0) * 0.5;
                s.banner(0, "PRESS SPACE TO START", fade(NEON_CYAN, 0.4 + pulse * 0.6));
                s.banner(2, "SPACE = FLAP WINGS", Color::White);
            }
            GamePhase::GameOver { .. } => {
                s.dim(0.6);
                s.banner(-4, "GAME OVER", NEON_PINK);
                s.banner(-2, &format!("FINAL SCORE: {}", self.score), Color::White);
                // Blinks at roughly 1 Hz
                if (self.ticks / 30) % 2 == 1 {
                    s.banner(0, "PRESS R TO RESTART", NEON_CYAN);
                }
                s.banner(2, "ESC FOR MENU", Color::White);
            }
            _ => {}
        }

        s.into_lines()
    }

    fn flap_up(&self) -> bool {
        self.bird.flap.sin() > 0.0
    }
}

impl Scene for Flappy {
    fn kind(&self) -> GameKind {
        GameKind::Flappy
    }

    fn update(&mut self, input: &InputSnapshot) {
        self.ticks += 1;
        self.handle_input(input);

        if self.phase.is_playing() {
            self.step_world();
        }

        self.motes.update();
        self.top_up_motes();
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(NEON_PINK))
            .title(" 🐦 Neon Flappy ")
            .title_style(Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(8), Constraint::Length(1)])
            .split(inner);

        let status = Line::from(vec![
            Span::styled(
                format!(" SCORE: {} ", self.score),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("🏆 High: {} ", self.high_score), Style::default().fg(NEON_PINK)),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("Pipes: {} ", self.pipes.len()), Style::default().fg(PIPE_GLOW)),
        ]);
        frame.render_widget(Paragraph::new(status), chunks[0]);

        frame.render_widget(Paragraph::new(self.render_field(chunks[1])), chunks[1]);

        let help = match self.phase {
            GamePhase::GameOver { .. } => key_hints(&[("R", "Restart"), ("Esc", "Menu")]),
            _ => key_hints(&[("Space", "Start / Flap"), ("Esc", "Menu")]),
        };
        frame.render_widget(Paragraph::new(help), chunks[2]);
    }

    fn reset(&mut self) {
        self.bird = Bird::new(self.particles_on);
        self.pipes.clear();
        self.motes.clear();
        self.top_up_motes();
        self.score = 0;
        self.phase = GamePhase::NotStarted;
        log::info!("flappy reset");
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn is_terminal(&self) -> bool {
        self.phase.is_over()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::ScriptedRng;

    const SPACE: KeyCode = KeyCode::Char(' ');

    fn game() -> Flappy {
        Flappy::with_rng(Box::new(GameRng::seeded(5)), true)
    }

    fn started() -> Flappy {
        let mut g = game();
        g.update(&InputSnapshot::with_pressed(&[SPACE]));
        assert!(g.phase.is_playing());
        g
    }

    #[test]
    fn test_first_space_only_starts() {
        let mut g = game();
        g.update(&InputSnapshot::with_pressed(&[SPACE]));
        assert!(g.phase.is_playing());
        // The start tick already ran one physics step from rest
        assert!((g.bird.body.vel.y - GRAVITY).abs() < 1e-5);
    }

    #[test]
    fn test_jump_sets_impulse_then_gravity_accumulates() {
        let mut g = started();
        for _ in 0..10 {
            g.update(&InputSnapshot::new());
        }
        g.update(&InputSnapshot::with_pressed(&[SPACE]));
        let expected = [-8.4, -7.8, -7.2, -6.6];
        assert!((g.bird.body.vel.y - expected[0]).abs() < 1e-4);
        for want in &expected[1..] {
            g.update(&InputSnapshot::new());
            assert!((g.bird.body.vel.y - want).abs() < 1e-4, "got {}", g.bird.body.vel.y);
        }
        assert_eq!(g.bird.particles.len(), 8);
    }

    #[test]
    fn test_rotation_follows_velocity() {
        let mut g = started();
        g.bird.body.vel.y = 20.0;
        g.bird.update();
        assert_eq!(g.bird.rotation, 45.0);
        g.bird.body.vel.y = -2.0;
        g.bird.update();
        assert!((g.bird.rotation - (-5.6)).abs() < 1e-4);
    }

    #[test]
    fn test_passing_pipe_scores_once() {
        let mut g = started();
        let bird_x = g.bird.body.pos.x;
        // Pipe whose right edge is just ahead of the bird, gap centred on it
        g.pipes = vec![Pipe { x: bird_x - PIPE_WIDTH + 2.0, gap_y: g.bird.body.pos.y, passed: false }];
        g.bird.body.vel.y = 0.0;
        g.update(&InputSnapshot::new());
        assert_eq!(g.score, 1);
        assert!(g.phase.is_playing());
        assert!(g.pipes[0].passed);
        assert_eq!(g.bird.particles.len(), 10);

        g.update(&InputSnapshot::new());
        assert_eq!(g.score, 1);
    }

    #[test]
    fn test_pipe_contact_is_fatal() {
        let mut g = started();
        let bird = g.bird.body.pos;
        g.pipes = vec![Pipe { x: bird.x, gap_y: bird.y + 200.0, passed: false }];
        g.update(&InputSnapshot::new());
        assert_eq!(g.phase, GamePhase::GameOver { won: false });
        assert!(g.is_terminal());
    }

    #[test]
    fn test_ground_and_ceiling() {
        let mut g = started();
        g.bird.body.pos.y = HEIGHT - GROUND_MARGIN;
        g.bird.body.vel.y = 1.0;
        g.update(&InputSnapshot::new());
        assert!(g.phase.is_over());

        let mut g = started();
        g.bird.body.pos.y = 2.0;
        g.bird.body.vel.y = -9.0;
        g.update(&InputSnapshot::new());
        assert!(g.phase.is_over());
    }

    #[test]
    fn test_pipes_spawn_spaced_and_expire() {
        let mut g = started();
        assert_eq!(g.pipes.len(), 1);
        for _ in 0..75 {
            g.bird.body.pos.y = HEIGHT / 2.0;
            g.bird.body.vel.y = 0.0;
            g.step_world();
        }
        // The second pipe waits until the first is 300 units in
        assert_eq!(g.pipes.len(), 1);
        g.step_world();
        assert_eq!(g.pipes.len(), 2);
        assert!(g.pipes.iter().all(|p| (150.0..=400.0).contains(&p.gap_y)));
    }

    #[test]
    fn test_gap_from_scripted_rng() {
        let mut rng = ScriptedRng::new(&[0.0, 0.999]);
        assert_eq!(Pipe::new(WIDTH, &mut rng).gap_y, 150.0);
        assert_eq!(Pipe::new(WIDTH, &mut rng).gap_y, 400.0);
    }

    #[test]
    fn test_restart_goes_back_to_title() {
        let mut g = started();
        g.crash();
        g.update(&InputSnapshot::with_pressed(&[KeyCode::Char('R')]));
        assert_eq!(g.phase, GamePhase::NotStarted);
        assert_eq!(g.score, 0);
        assert!(g.pipes.is_empty());
    }

    #[test]
    fn test_background_motes_stay_topped_up() {
        let mut g = game();
        for _ in 0..120 {
            g.update(&InputSnapshot::new());
        }
        assert_eq!(g.motes.len(), MOTE_COUNT);
    }
}
