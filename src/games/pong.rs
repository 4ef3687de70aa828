use std::collections::VecDeque;
use std::f32::consts::PI;

use crossterm::event::KeyCode;
use glam::Vec2;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::config::Settings;
use crate::games::{GameKind, GamePhase, Scene};
use crate::sim::collision::{self, Facing, Walls};
use crate::sim::{Aabb, Burst, GameRng, InputSnapshot, MovingBody, ParticleSystem, RandomSource};
use crate::ui::key_hints;
use crate::ui::surface::{brighten, fade, Surface};

const WIDTH: f32 = 1200.0;
const HEIGHT: f32 = 800.0;

const PADDLE_W: f32 = 15.0;
const PADDLE_H: f32 = 120.0;
const PADDLE_SPEED: f32 = 8.0;
const PADDLE_INSET: f32 = 50.0;

const BALL_RADIUS: f32 = 10.0;
const BALL_SPEED: f32 = 7.0;
const MAX_BALL_SPEED: f32 = 12.0;
const SPEEDUP: f32 = 1.05;
/// ±30° at the paddle ends
const MAX_BOUNCE_ANGLE: f32 = PI / 6.0;
const TRAIL_LEN: usize = 15;
const STAR_COUNT: usize = 100;

const MOVE_SPARK: Burst = Burst::new(1, 20).velocity((-2.0, 2.0), (-2.0, 2.0)).size(2.0, 4.0);
const PADDLE_HIT: Burst = Burst::new(25, 40).velocity((-5.0, 5.0), (-5.0, 5.0)).size(3.0, 6.0);
const WALL_HIT: Burst = Burst::new(15, 30).velocity((-4.0, 4.0), (-4.0, 4.0));
const SCORED: Burst = Burst::new(50, 60).velocity((-8.0, 8.0), (-8.0, 8.0)).size(3.0, 8.0).shrinking();
const VICTORY: Burst = Burst::new(200, 120).velocity((-5.0, 5.0), (-5.0, 5.0)).size(4.0, 12.0).shrinking();

const BG: Color = Color::Rgb(8, 8, 25);
const LIME: Color = Color::Rgb(57, 255, 20);
const HOT_PINK: Color = Color::Rgb(255, 20, 147);
const ELECTRIC_BLUE: Color = Color::Rgb(0, 191, 255);
const GOLD: Color = Color::Rgb(255, 215, 0);
const ORANGE: Color = Color::Rgb(255, 165, 0);
const RED_ORANGE: Color = Color::Rgb(255, 69, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    fn label(&self) -> &'static str {
        match self {
            Side::Left => "PLAYER 1",
            Side::Right => "PLAYER 2",
        }
    }
}

struct Paddle {
    body: MovingBody,
    color: Color,
    glow: u32,
    hit_flash: u32,
    particles: ParticleSystem,
}

impl Paddle {
    fn new(x: f32, color: Color, particles: bool) -> Self {
        Self {
            body: MovingBody::rect(x, HEIGHT / 2.0 - PADDLE_H / 2.0, PADDLE_W, PADDLE_H),
            color,
            glow: 0,
            hit_flash: 0,
            particles: ParticleSystem::new(particles),
        }
    }

    fn move_by(&mut self, dy: f32, rng: &mut dyn RandomSource) {
        let y = self.body.pos.y;
        let can_move = if dy < 0.0 { y > 0.0 } else { y < HEIGHT - PADDLE_H };
        if !can_move {
            return;
        }
        self.body.pos.y += dy;
        for _ in 0..3 {
            let origin = Vec2::new(self.body.pos.x + PADDLE_W / 2.0, self.body.pos.y + rng.uniform(0.0, PADDLE_H));
            self.particles.burst(rng, origin, &MOVE_SPARK, self.color);
        }
    }

    fn struck(&mut self, rng: &mut dyn RandomSource) {
        self.hit_flash = 30;
        self.glow = 100;
        let center = self.body.center();
        self.particles.burst(rng, center, &PADDLE_HIT, self.color);
    }

    fn update(&mut self) {
        self.hit_flash = self.hit_flash.saturating_sub(1);
        self.glow = self.glow.saturating_sub(2);
        self.particles.update();
    }

    fn draw_color(&self) -> Color {
        if self.hit_flash > 0 {
            brighten(self.color, self.hit_flash as f32 / 30.0 * 0.4)
        } else {
            self.color
        }
    }
}

struct Ball {
    body: MovingBody,
    trail: VecDeque<(Vec2, f32)>,
    energy: f32,
    rainbow: bool,
    rainbow_time: f32,
    sparks: ParticleSystem,
}

impl Ball {
    fn new(particles: bool) -> Self {
        let mut body = MovingBody::circle(WIDTH / 2.0, HEIGHT / 2.0, BALL_RADIUS);
        body.vel = Vec2::new(BALL_SPEED, BALL_SPEED);
        Self {
            body,
            trail: VecDeque::with_capacity(TRAIL_LEN + 1),
            energy: 0.0,
            rainbow: false,
            rainbow_time: 0.0,
            sparks: ParticleSystem::new(particles),
        }
    }

    /// Back to the centre at base speed, keeping the direction of travel.
    fn recenter(&mut self) {
        let v = self.body.vel;
        self.body.pos = Vec2::new(WIDTH / 2.0, HEIGHT / 2.0);
        self.body.vel = Vec2::new(BALL_SPEED.copysign(v.x), BALL_SPEED.copysign(v.y));
        self.trail.clear();
        self.energy = 0.0;
        self.rainbow = false;
        self.sparks.clear();
    }

    /// Effects that run every tick, paused or not.
    fn tick_effects(&mut self) {
        self.sparks.update();
        if self.energy > 0.0 {
            self.energy -= 0.5;
        }
        if self.energy <= 30.0 {
            self.rainbow = false;
        }
    }

    fn advance(&mut self, rng: &mut dyn RandomSource) {
        self.body.integrate();
        self.trail.push_back((self.body.pos, self.energy));
        if self.trail.len() > TRAIL_LEN {
            self.trail.pop_front();
        }
        if self.rainbow {
            self.rainbow_time += 0.1;
        }

        let bounds = Aabb::new(0.0, 0.0, WIDTH, HEIGHT);
        if collision::bounce_in_bounds(&mut self.body, bounds, Walls::TOP_AND_BOTTOM).any() {
            let at = self.body.pos;
            self.sparks.burst(rng, at, &WALL_HIT, ORANGE);
        }
    }

    /// Send the ball back off a paddle, faster, angled by the contact point.
    fn bounce_off(&mut self, paddle: &Aabb, facing: Facing) {
        let hit = collision::hit_fraction(self.body.pos.y, paddle.y, paddle.h);
        let speed = (self.body.speed() * SPEEDUP).min(MAX_BALL_SPEED);
        self.body.vel = collision::deflect(speed, hit, MAX_BOUNCE_ANGLE, facing);
        self.energy = (self.energy + 10.0).min(100.0);
        if self.energy > 50.0 {
            self.rainbow = true;
        }
    }

    fn color(&self) -> Color {
        if self.rainbow {
            let wave = |offset: f32| (127.0 + 127.0 * (self.rainbow_time + offset).sin()) as u8;
            return Color::Rgb(wave(0.0), wave(2.0), wave(4.0));
        }
        match self.energy / 100.0 {
            e if e < 0.3 => LIME,
            e if e < 0.6 => ORANGE,
            _ => RED_ORANGE,
        }
    }
}

struct Star {
    pos: Vec2,
    brightness: u8,
}

pub struct Pong {
    left: Paddle,
    right: Paddle,
    ball: Ball,
    score_left: u32,
    score_right: u32,
    winning_score: u32,
    winner: Option<Side>,
    phase: GamePhase,
    celebration: ParticleSystem,
    stars: Vec<Star>,
    time: f32,
    score_pulse: [u32; 2],
    shake: u32,
    particles_on: bool,
    rng: Box<dyn RandomSource>,
}

impl Pong {
    pub fn new(settings: &Settings) -> Self {
        let rng = Box::new(GameRng::from_seed_opt(settings.seed_for(GameKind::Pong)));
        Self::with_rng(rng, settings.pong_winning_score, settings.particles)
    }

    fn with_rng(mut rng: Box<dyn RandomSource>, winning_score: u32, particles_on: bool) -> Self {
        let stars = (0..STAR_COUNT)
            .map(|_| Star {
                pos: Vec2::new(rng.uniform(0.0, WIDTH), rng.uniform(0.0, HEIGHT)),
                brightness: 0,
            })
            .collect();
        Self {
            left: Paddle::new(PADDLE_INSET, HOT_PINK, particles_on),
            right: Paddle::new(WIDTH - PADDLE_INSET - PADDLE_W, ELECTRIC_BLUE, particles_on),
            ball: Ball::new(particles_on),
            score_left: 0,
            score_right: 0,
            winning_score,
            winner: None,
            phase: GamePhase::Playing,
            celebration: ParticleSystem::new(particles_on),
            stars,
            time: 0.0,
            score_pulse: [0, 0],
            shake: 0,
            particles_on,
            rng,
        }
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    fn handle_input(&mut self, input: &InputSnapshot) {
        if input.was_pressed(KeyCode::Char(' ')) {
            self.phase.toggle_pause();
        }
        if self.phase.is_over() && input.was_pressed_char('r') {
            self.reset();
            return;
        }
        if !self.phase.is_playing() {
            return;
        }

        let rng = self.rng.as_mut();
        if input.is_held_char('w') {
            self.left.move_by(-PADDLE_SPEED, rng);
        }
        if input.is_held_char('s') {
            self.left.move_by(PADDLE_SPEED, rng);
        }
        if input.is_held(KeyCode::Up) {
            self.right.move_by(-PADDLE_SPEED, rng);
        }
        if input.is_held(KeyCode::Down) {
            self.right.move_by(PADDLE_SPEED, rng);
        }
    }

    fn tick_effects(&mut self) {
        self.time += 0.016;
        for star in &mut self.stars {
            star.brightness = (127.0 + 127.0 * (self.time + star.pos.x * 0.01).sin()) as u8;
        }
        self.left.update();
        self.right.update();
        self.ball.tick_effects();
        self.score_pulse = self.score_pulse.map(|p| p.saturating_sub(2));
        self.shake = self.shake.saturating_sub(1);
    }

    fn step_ball(&mut self) {
        self.ball.advance(self.rng.as_mut());

        let ball_box = self.ball.body.aabb();
        let vx = self.ball.body.vel.x;
        if vx < 0.0 && ball_box.intersects(&self.left.body.aabb()) {
            self.ball.bounce_off(&self.left.body.aabb(), Facing::Right);
            self.left.struck(self.rng.as_mut());
            self.score_pulse[0] = 20;
            self.shake = 5;
            log::debug!("pong: left paddle return at speed {:.2}", self.ball.body.speed());
        }
        if vx > 0.0 && ball_box.intersects(&self.right.body.aabb()) {
            self.ball.bounce_off(&self.right.body.aabb(), Facing::Left);
            self.right.struck(self.rng.as_mut());
            self.score_pulse[1] = 20;
            self.shake = 5;
            log::debug!("pong: right paddle return at speed {:.2}", self.ball.body.speed());
        }

        let x = self.ball.body.pos.x;
        if x < 0.0 {
            self.point_for(Side::Right);
        } else if x > WIDTH {
            self.point_for(Side::Left);
        }
    }

    fn point_for(&mut self, side: Side) {
        let (score, origin, color, pulse) = match side {
            Side::Left => (&mut self.score_left, Vec2::new(100.0, HEIGHT / 2.0), HOT_PINK, 0),
            Side::Right => (&mut self.score_right, Vec2::new(WIDTH - 100.0, HEIGHT / 2.0), ELECTRIC_BLUE, 1),
        };
        *score += 1;
        let total = *score;
        self.score_pulse[pulse] = 50;
        self.ball.recenter();
        self.celebration.burst(self.rng.as_mut(), origin, &SCORED, color);
        log::debug!("pong: point to {}, {}-{}", side.label(), self.score_left, self.score_right);

        if total >= self.winning_score {
            self.winner = Some(side);
            self.phase = GamePhase::GameOver { won: true };
            let area = Aabb::new(0.0, 0.0, WIDTH, HEIGHT);
            let palette = [GOLD, LIME, HOT_PINK, ELECTRIC_BLUE];
            self.celebration.scatter(self.rng.as_mut(), area, &VICTORY, &palette);
            log::info!("pong won by {} {}-{}", side.label(), self.score_left, self.score_right);
        }
    }

    fn render_field(&mut self, area: Rect) -> Vec<Line<'static>> {
        let mut s = Surface::new(area, WIDTH, HEIGHT, BG);

        let grid = fade(ELECTRIC_BLUE, 0.15 + 0.1 * self.time.sin());
        for gx in (0..WIDTH as i32).step_by(50) {
            for gy in (0..HEIGHT as i32).step_by(50) {
                s.plot(Vec2::new(gx as f32, gy as f32), '·', grid);
            }
        }
        for star in &self.stars {
            let b = star.brightness;
            s.plot(star.pos, '∙', Color::Rgb(b, b, b));
        }

        // Pulsing dashed centre line
        let pulse = (self.time * 4.0).sin() * 0.3 + 0.7;
        let dash = 40.0 * pulse;
        let mut y = 0.0;
        while y < HEIGHT {
            s.fill_rect(Aabb::new(WIDTH / 2.0 - 4.0, y, 8.0, dash), '┃', fade(LIME, pulse));
            y += dash + 25.0;
        }

        for p in self.celebration.iter() {
            s.plot(p.body.pos, '✦', fade(p.color, p.fade()));
        }

        // Screen shake nudges the moving pieces, not the backdrop
        let jolt = if self.shake > 0 {
            let k = self.shake as f32 * 4.0;
            Vec2::new(self.rng.uniform(-k, k), self.rng.uniform(-k, k))
        } else {
            Vec2::ZERO
        };

        for paddle in [&self.left, &self.right] {
            for p in paddle.particles.iter() {
                s.plot(p.body.pos, '•', fade(p.color, p.fade()));
            }
            let mut b = paddle.body.aabb();
            if paddle.glow > 0 {
                let halo = Aabb::new(b.x - 12.0, b.y - 12.0, b.w + 24.0, b.h + 24.0);
                s.shade_rect(halo, fade(paddle.color, paddle.glow as f32 / 400.0));
            }
            b.x += jolt.x;
            b.y += jolt.y;
            s.fill_rect(b, '█', paddle.draw_color());
        }

        for p in self.ball.sparks.iter() {
            s.plot(p.body.pos, '*', fade(p.color, p.fade()));
        }
        let ball_color = self.ball.color();
        let n = self.ball.trail.len();
        for (i, (pos, energy)) in self.ball.trail.iter().enumerate() {
            let color = match *energy {
                e if e > 50.0 => RED_ORANGE,
                e if e > 20.0 => ORANGE,
                _ => ball_color,
            };
            s.plot(*pos, '∘', fade(color, (i + 1) as f32 / n as f32 * 0.6));
        }
        s.disc(self.ball.body.pos + jolt, BALL_RADIUS, '●', ball_color);

        match self.phase {
            GamePhase::Paused => {
                s.banner(-1, "⏸ GAME PAUSED ⏸", GOLD);
                s.banner(1, "Press SPACE to resume the action!", Color::White);
            }
            GamePhase::GameOver { .. } => {
                if let Some(side) = self.winner() {
                    let t = self.time * 3.0;
                    let wave = |o: f32| (127.0 + 127.0 * (t + o).sin()) as u8;
                    let rainbow = Color::Rgb(wave(0.0), wave(2.0), wave(4.0));
                    s.banner(-1, &format!("🏆 {} WINS! 🏆", side.label()), rainbow);
                }
                s.banner(2, "Press R to restart the battle!", LIME);
            }
            _ => {}
        }

        s.into_lines()
    }
}

impl Scene for Pong {
    fn kind(&self) -> GameKind {
        GameKind::Pong
    }

    fn update(&mut self, input: &InputSnapshot) {
        self.handle_input(input);
        self.tick_effects();

        if self.phase.is_playing() {
            self.step_ball();
        }
        if self.phase != GamePhase::Paused {
            self.celebration.update();
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(LIME))
            .title(" ⚡ Neon Pong Extreme ⚡ ")
            .title_style(Style::default().fg(HOT_PINK).add_modifier(Modifier::BOLD));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(8), Constraint::Length(1)])
            .split(inner);

        let pulse_style = |color: Color, pulse: u32| {
            let style = Style::default().fg(color).add_modifier(Modifier::BOLD);
            if pulse > 0 { style.add_modifier(Modifier::REVERSED) } else { style }
        };
        let energy = self.ball.energy.max(0.0) as u32;
        let status = Line::from(vec![
            Span::styled(" 🔥 P1 ", Style::default().fg(HOT_PINK)),
            Span::styled(format!(" {} ", self.score_left), pulse_style(HOT_PINK, self.score_pulse[0])),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("BALL ENERGY: {}% ", energy),
                Style::default().fg(if self.ball.rainbow { RED_ORANGE } else { ORANGE }),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("First to {} ", self.winning_score), Style::default().fg(GOLD)),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!(" {} ", self.score_right), pulse_style(ELECTRIC_BLUE, self.score_pulse[1])),
            Span::styled(" P2 ⚡", Style::default().fg(ELECTRIC_BLUE)),
        ]);
        frame.render_widget(Paragraph::new(status), chunks[0]);

        let field = self.render_field(chunks[1]);
        frame.render_widget(Paragraph::new(field), chunks[1]);

        let help = if self.phase.is_over() {
            key_hints(&[("R", "Restart"), ("Esc", "Menu")])
        } else {
            key_hints(&[("W/S", "Player 1"), ("↑↓", "Player 2"), ("Space", "Pause"), ("Esc", "Menu")])
        };
        frame.render_widget(Paragraph::new(help), chunks[2]);
    }

    fn reset(&mut self) {
        let particles = self.particles_on;
        self.left = Paddle::new(PADDLE_INSET, HOT_PINK, particles);
        self.right = Paddle::new(WIDTH - PADDLE_INSET - PADDLE_W, ELECTRIC_BLUE, particles);
        self.ball.recenter();
        self.score_left = 0;
        self.score_right = 0;
        self.winner = None;
        self.phase = GamePhase::Playing;
        self.celebration.clear();
        self.score_pulse = [0, 0];
        self.shake = 0;
        log::info!("pong reset");
    }

    /// The better of the two players' points.
    fn score(&self) -> u32 {
        self.score_left.max(self.score_right)
    }

    fn is_terminal(&self) -> bool {
        self.phase.is_over()
    }

    fn records_high_scores(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> Pong {
        Pong::with_rng(Box::new(GameRng::seeded(21)), 10, true)
    }

    #[test]
    fn test_game_over_exactly_at_winning_score() {
        let mut g = game();
        for n in 1..=10 {
            g.ball.body.pos = Vec2::new(WIDTH + 5.0, HEIGHT / 2.0);
            g.ball.body.vel = Vec2::new(7.0, 0.0);
            g.step_ball();
            assert_eq!(g.score_left, n);
            if n < 10 {
                assert!(g.phase.is_playing(), "over early at {n}");
            }
        }
        assert_eq!(g.phase, GamePhase::GameOver { won: true });
        assert_eq!(g.winner(), Some(Side::Left));
        assert_eq!(g.celebration.len(), 10 * 50 + 200);

        // Frozen until restart
        g.update(&InputSnapshot::new());
        assert_eq!(g.score_left, 10);
        g.update(&InputSnapshot::with_pressed(&[KeyCode::Char('r')]));
        assert!(g.phase.is_playing());
        assert_eq!(g.score(), 0);
    }

    #[test]
    fn test_paddle_returns_speed_up_and_cap() {
        let mut g = game();
        let mut last = g.ball.body.speed();
        for i in 0..20 {
            let (paddle, vx) = if i % 2 == 0 { (g.right.body.aabb(), 7.0) } else { (g.left.body.aabb(), -7.0) };
            let dir = Vec2::new(vx, 3.0).normalize() * last;
            g.ball.body.pos = Vec2::new(paddle.center().x, paddle.y + 20.0 + i as f32 * 4.0);
            g.ball.body.vel = dir;
            let facing = if vx > 0.0 { Facing::Left } else { Facing::Right };
            g.ball.bounce_off(&paddle, facing);

            let speed = g.ball.body.speed();
            assert!(speed >= last - 1e-4, "speed dropped from {last} to {speed}");
            assert!(speed <= MAX_BALL_SPEED + 1e-4);
            assert_eq!(g.ball.body.vel.x > 0.0, vx < 0.0, "ball goes back the other way");
            last = speed;
        }
        assert!((last - MAX_BALL_SPEED).abs() < 1e-3);
    }

    #[test]
    fn test_paddle_hit_in_play() {
        let mut g = game();
        let p = g.right.body.aabb();
        g.ball.body.pos = Vec2::new(p.x - 12.0, p.center().y);
        g.ball.body.vel = Vec2::new(7.0, 0.0);
        g.step_ball();
        assert!(g.ball.body.vel.x < 0.0);
        assert_eq!(g.right.hit_flash, 30);
        assert_eq!(g.right.particles.len(), 25);
        assert!((g.ball.energy - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_wall_bounce_sparks() {
        let mut g = game();
        g.ball.body.pos = Vec2::new(600.0, HEIGHT - 12.0);
        g.ball.body.vel = Vec2::new(7.0, 7.0);
        g.step_ball();
        assert!(g.ball.body.vel.y < 0.0);
        assert_eq!(g.ball.sparks.len(), 15);
    }

    #[test]
    fn test_pause_freezes_ball() {
        let mut g = game();
        g.update(&InputSnapshot::with_pressed(&[KeyCode::Char(' ')]));
        assert_eq!(g.phase, GamePhase::Paused);
        let pos = g.ball.body.pos;
        g.update(&InputSnapshot::with_held(&[KeyCode::Up]));
        assert_eq!(g.ball.body.pos, pos);
        g.update(&InputSnapshot::with_pressed(&[KeyCode::Char(' ')]));
        assert!(g.phase.is_playing());
        assert_ne!(g.ball.body.pos, pos);
    }

    #[test]
    fn test_paddles_stay_on_screen() {
        let mut g = game();
        let held = InputSnapshot::with_held(&[KeyCode::Char('w'), KeyCode::Down]);
        for _ in 0..100 {
            g.handle_input(&held);
        }
        assert!(g.left.body.pos.y <= 0.0 && g.left.body.pos.y > -PADDLE_SPEED);
        let bottom = g.right.body.pos.y + PADDLE_H;
        assert!(bottom >= HEIGHT && bottom < HEIGHT + PADDLE_SPEED);
    }

    #[test]
    fn test_recenter_keeps_direction() {
        let mut g = game();
        g.ball.body.vel = Vec2::new(-11.0, 3.0);
        g.ball.energy = 80.0;
        g.ball.recenter();
        assert_eq!(g.ball.body.vel, Vec2::new(-BALL_SPEED, BALL_SPEED));
        assert_eq!(g.ball.energy, 0.0);
    }
}
