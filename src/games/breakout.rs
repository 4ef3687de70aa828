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
use crate::ui::surface::{fade, Surface};

const WIDTH: f32 = 800.0;
const HEIGHT: f32 = 600.0;

const BRICK_ROWS: usize = 8;
const BRICK_COLS: usize = 10;
const BRICK_W: f32 = 75.0;
const BRICK_H: f32 = 30.0;
const BRICK_MARGIN: f32 = 5.0;
const BRICK_TOP: f32 = 50.0;

const PADDLE_W: f32 = 100.0;
const PADDLE_H: f32 = 15.0;
const PADDLE_SPEED: f32 = 8.0;

const BALL_RADIUS: f32 = 8.0;
const BALL_SPEED: f32 = 6.0;
/// ±72° off vertical at the paddle ends
const MAX_BOUNCE_ANGLE: f32 = 0.4 * PI;
const BOUNCE_JITTER: f32 = 0.5;
const TRAIL_LEN: usize = 10;
const STAR_COUNT: usize = 50;

const DEBRIS: Burst = Burst::new(10, 30).velocity((-3.0, 3.0), (-5.0, -1.0)).gravity(0.1).size(3.0, 3.0);

const BRICK_COLORS: [Color; BRICK_ROWS] = [
    Color::Rgb(255, 0, 0),     // Red
    Color::Rgb(255, 165, 0),   // Orange
    Color::Rgb(255, 255, 0),   // Yellow
    Color::Rgb(0, 255, 0),     // Green
    Color::Rgb(0, 255, 255),   // Cyan
    Color::Rgb(0, 0, 255),     // Blue
    Color::Rgb(128, 0, 128),   // Purple
    Color::Rgb(255, 192, 203), // Pink
];
const GOLD: Color = Color::Rgb(255, 215, 0);

struct Paddle {
    body: MovingBody,
}

impl Paddle {
    fn new() -> Self {
        Self { body: MovingBody::rect(WIDTH / 2.0 - PADDLE_W / 2.0, HEIGHT - 50.0, PADDLE_W, PADDLE_H) }
    }

    fn update(&mut self, input: &InputSnapshot) {
        let x = &mut self.body.pos.x;
        if input.is_held(KeyCode::Left) {
            *x = (*x - PADDLE_SPEED).max(0.0);
        }
        if input.is_held(KeyCode::Right) {
            *x = (*x + PADDLE_SPEED).min(WIDTH - PADDLE_W);
        }
    }
}

struct Ball {
    body: MovingBody,
    trail: VecDeque<Vec2>,
}

impl Ball {
    /// Served from the middle of the field, upward and to a random side.
    fn serve(rng: &mut dyn RandomSource) -> Self {
        let mut body = MovingBody::circle(WIDTH / 2.0, HEIGHT / 2.0, BALL_RADIUS);
        body.vel = Vec2::new(rng.sign() * BALL_SPEED * 0.7, -BALL_SPEED);
        Self { body, trail: VecDeque::with_capacity(TRAIL_LEN + 1) }
    }

    fn update(&mut self) {
        self.body.integrate();
        self.trail.push_back(self.body.pos);
        if self.trail.len() > TRAIL_LEN {
            self.trail.pop_front();
        }
        collision::bounce_in_bounds(&mut self.body, Aabb::new(0.0, 0.0, WIDTH, HEIGHT), Walls::SIDES_AND_TOP);
    }
}

#[derive(Clone)]
struct Brick {
    rect: Aabb,
    color: Color,
    points: u32,
    destroyed: bool,
}

pub struct Breakout {
    paddle: Paddle,
    ball: Ball,
    bricks: Vec<Brick>,
    particles: ParticleSystem,
    stars: Vec<Vec2>,
    score: u32,
    high_score: u32,
    lives: u32,
    start_lives: u32,
    phase: GamePhase,
    rng: Box<dyn RandomSource>,
}

impl Breakout {
    pub fn new(settings: &Settings) -> Self {
        let rng = Box::new(GameRng::from_seed_opt(settings.seed_for(GameKind::Breakout)));
        Self::with_rng(rng, settings.breakout_lives, settings.particles)
    }

    fn with_rng(mut rng: Box<dyn RandomSource>, lives: u32, particles: bool) -> Self {
        let ball = Ball::serve(rng.as_mut());
        let stars = (0..STAR_COUNT)
            .map(|_| Vec2::new(rng.uniform(0.0, WIDTH), rng.uniform(0.0, HEIGHT / 2.0)))
            .collect();
        Self {
            paddle: Paddle::new(),
            ball,
            bricks: build_wall(),
            particles: ParticleSystem::new(particles),
            stars,
            score: 0,
            high_score: 0,
            lives,
            start_lives: lives,
            phase: GamePhase::Playing,
            rng,
        }
    }

    fn handle_collisions(&mut self) {
        // Paddle, only while the ball is coming down
        let ball_box = self.ball.body.aabb();
        let paddle_box = self.paddle.body.aabb();
        if self.ball.body.vel.y > 0.0 && ball_box.intersects(&paddle_box) {
            let hit = collision::hit_fraction(self.ball.body.pos.x, paddle_box.x, paddle_box.w);
            let speed = self.ball.body.speed();
            let mut vel = collision::deflect(speed, hit, MAX_BOUNCE_ANGLE, Facing::Up);
            vel.x += self.rng.uniform(-BOUNCE_JITTER, BOUNCE_JITTER);
            self.ball.body.vel = vel;
        }

        // Bricks: at most one per tick, lowest index first
        let live: Vec<usize> = (0..self.bricks.len()).filter(|&i| !self.bricks[i].destroyed).collect();
        let targets: Vec<Aabb> = live.iter().map(|&i| self.bricks[i].rect).collect();
        let pairs = collision::collect_pairs(&[self.ball.body.aabb()], &targets);
        if let Some(&(_, t)) = collision::first_hits(&pairs).first() {
            self.break_brick(live[t]);
        }

        if self.bricks.iter().all(|b| b.destroyed) {
            log::info!("breakout cleared with score {}", self.score);
            self.finish(true);
            return;
        }

        if self.ball.body.pos.y > HEIGHT {
            self.lives = self.lives.saturating_sub(1);
            log::debug!("breakout ball lost, {} lives left", self.lives);
            if self.lives == 0 {
                log::info!("breakout game over with score {}", self.score);
                self.finish(false);
            } else {
                self.ball = Ball::serve(self.rng.as_mut());
            }
        }
    }

    fn break_brick(&mut self, idx: usize) {
        let brick = &mut self.bricks[idx];
        brick.destroyed = true;
        self.score += brick.points;
        let rect = brick.rect;
        let color = brick.color;
        log::debug!("brick {} destroyed for {} points", idx, brick.points);

        self.particles.burst(self.rng.as_mut(), rect.center(), &DEBRIS, color);
        let axis = collision::reflect_axis(self.ball.body.center(), &rect);
        collision::reflect(&mut self.ball.body.vel, axis);
    }

    fn finish(&mut self, won: bool) {
        self.phase = GamePhase::GameOver { won };
        self.high_score = self.high_score.max(self.score);
    }

    fn render_field(&self, area: Rect) -> Vec<Line<'static>> {
        let mut s = Surface::new(area, WIDTH, HEIGHT, Color::Rgb(10, 20, 40));
        s.gradient((10, 20, 40), (0, 0, 60));

        for star in &self.stars {
            s.plot(*star, '·', Color::Rgb(200, 200, 200));
        }

        for brick in self.bricks.iter().filter(|b| !b.destroyed) {
            s.fill_rect(brick.rect, '█', brick.color);
        }

        for p in self.particles.iter() {
            s.plot(p.body.pos, '•', fade(p.color, p.fade()));
        }

        s.fill_rect(self.paddle.body.aabb(), '▀', GOLD);

        let n = self.ball.trail.len();
        for (i, pos) in self.ball.trail.iter().enumerate() {
            let k = (i + 1) as f32 / n as f32 * 0.5;
            s.plot(*pos, '·', fade(Color::Rgb(255, 255, 255), k));
        }
        s.disc(self.ball.body.pos, BALL_RADIUS, '●', Color::Rgb(255, 255, 255));

        if let GamePhase::GameOver { won } = self.phase {
            s.dim(0.5);
            let (title, color) = if won {
                ("YOU WIN!", Color::Rgb(0, 255, 0))
            } else {
                ("GAME OVER", Color::Rgb(255, 0, 0))
            };
            s.banner(-3, title, color);
            let subtitle = if won { "All bricks destroyed!" } else { "Better luck next time!" };
            s.banner(-1, subtitle, Color::White);
            s.banner(1, &format!("Final Score: {}", self.score), GOLD);
            s.banner(3, "Press R to restart", Color::Rgb(128, 128, 128));
        }

        s.into_lines()
    }
}

fn build_wall() -> Vec<Brick> {
    let wall_w = BRICK_COLS as f32 * BRICK_W + (BRICK_COLS - 1) as f32 * BRICK_MARGIN;
    let start_x = ((WIDTH - wall_w) / 2.0).floor();
    let mut bricks = Vec::with_capacity(BRICK_ROWS * BRICK_COLS);
    for row in 0..BRICK_ROWS {
        for col in 0..BRICK_COLS {
            bricks.push(Brick {
                rect: Aabb::new(
                    start_x + col as f32 * (BRICK_W + BRICK_MARGIN),
                    BRICK_TOP + row as f32 * (BRICK_H + BRICK_MARGIN),
                    BRICK_W,
                    BRICK_H,
                ),
                color: BRICK_COLORS[row % BRICK_COLORS.len()],
                // Higher rows are worth more
                points: (BRICK_ROWS - row) as u32 * 10,
                destroyed: false,
            });
        }
    }
    bricks
}

impl Scene for Breakout {
    fn kind(&self) -> GameKind {
        GameKind::Breakout
    }

    fn update(&mut self, input: &InputSnapshot) {
        if self.phase.is_over() && input.was_pressed_char('r') {
            self.reset();
            return;
        }

        if self.phase.is_playing() {
            self.paddle.update(input);
            self.ball.update();
            self.handle_collisions();
        }

        // Debris keeps falling behind the game over screen
        self.particles.update();
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(220, 80, 80)))
            .title(" 🧱 Brick Breaker ")
            .title_style(Style::default().fg(Color::Rgb(255, 100, 100)).add_modifier(Modifier::BOLD));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(8), Constraint::Length(1)])
            .split(inner);

        let bricks_left = self.bricks.iter().filter(|b| !b.destroyed).count();
        let status = Line::from(vec![
            Span::styled(
                format!(" SCORE: {} ", self.score),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("LIVES: {} ", "♥ ".repeat(self.lives as usize)),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("🏆 High: {} ", self.high_score), Style::default().fg(Color::Cyan)),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("Bricks: {}/{} ", bricks_left, BRICK_ROWS * BRICK_COLS),
                Style::default().fg(Color::Green),
            ),
        ]);
        frame.render_widget(Paragraph::new(status), chunks[0]);

        frame.render_widget(Paragraph::new(self.render_field(chunks[1])), chunks[1]);

        let help = if self.phase.is_over() {
            key_hints(&[("R", "Restart"), ("Esc", "Menu")])
        } else {
            key_hints(&[("←→", "Move Paddle"), ("R", "Restart after game over"), ("Esc", "Menu")])
        };
        frame.render_widget(Paragraph::new(help), chunks[2]);
    }

    fn reset(&mut self) {
        let high = self.high_score;
        self.paddle = Paddle::new();
        self.ball = Ball::serve(self.rng.as_mut());
        self.bricks = build_wall();
        self.particles.clear();
        self.score = 0;
        self.lives = self.start_lives;
        self.phase = GamePhase::Playing;
        self.high_score = high;
        log::info!("breakout reset");
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

    fn game() -> Breakout {
        Breakout::with_rng(Box::new(GameRng::seeded(11)), 3, true)
    }

    /// Park the ball at `center` with velocity `vel`, away from the paddle.
    fn place_ball(g: &mut Breakout, center: Vec2, vel: Vec2) {
        g.ball.body.pos = center;
        g.ball.body.vel = vel;
    }

    #[test]
    fn test_wall_layout() {
        let g = game();
        assert_eq!(g.bricks.len(), 80);
        assert_eq!(g.bricks[0].rect.x, 2.0);
        assert_eq!(g.bricks[0].points, 80);
        assert_eq!(g.bricks[79].points, 10);
        let total: u32 = g.bricks.iter().map(|b| b.points).sum();
        assert_eq!(total, 3600);
    }

    #[test]
    fn test_side_hit_flips_vx_only() {
        let mut g = game();
        // Rightmost brick of the bottom row, so nothing sits beyond it
        let idx = 7 * BRICK_COLS + 9;
        let rect = g.bricks[idx].rect;
        let points = g.bricks[idx].points;
        place_ball(&mut g, Vec2::new(rect.right() + 5.0, rect.center().y), Vec2::new(-4.0, -6.0));

        g.handle_collisions();
        assert!(g.bricks[idx].destroyed);
        assert_eq!(g.ball.body.vel, Vec2::new(4.0, -6.0));
        assert_eq!(g.score, points);
        assert_eq!(g.particles.len(), 10);

        // Still overlapping next tick: no second award
        g.handle_collisions();
        assert_eq!(g.score, points);
    }

    #[test]
    fn test_bottom_hit_flips_vy() {
        let mut g = game();
        let idx = 7 * BRICK_COLS + 2;
        let rect = g.bricks[idx].rect;
        place_ball(&mut g, Vec2::new(rect.center().x, rect.bottom() + 4.0), Vec2::new(3.0, -5.0));
        g.handle_collisions();
        assert_eq!(g.ball.body.vel, Vec2::new(3.0, 5.0));
    }

    #[test]
    fn test_one_brick_per_tick() {
        let mut g = game();
        // Straddling the gap between two neighbours on the bottom row
        let left = g.bricks[7 * BRICK_COLS].rect;
        place_ball(&mut g, Vec2::new(left.right() + BRICK_MARGIN / 2.0, left.center().y), Vec2::new(0.0, -6.0));
        g.handle_collisions();
        assert_eq!(g.bricks.iter().filter(|b| b.destroyed).count(), 1);
        assert!(g.bricks[7 * BRICK_COLS].destroyed);
    }

    #[test]
    fn test_clearing_every_brick_scores_3600_and_wins() {
        let mut g = game();
        for i in 0..g.bricks.len() {
            let c = g.bricks[i].rect.center();
            place_ball(&mut g, c, Vec2::new(0.0, -6.0));
            g.handle_collisions();
        }
        assert_eq!(g.score, 3600);
        assert_eq!(g.phase, GamePhase::GameOver { won: true });
        assert!(g.is_terminal());
    }

    #[test]
    fn test_paddle_bounce_sends_ball_up() {
        let mut g = game();
        let p = g.paddle.body.aabb();
        place_ball(&mut g, Vec2::new(p.x + p.w * 0.9, p.y), Vec2::new(0.0, 6.0));
        g.handle_collisions();
        let v = g.ball.body.vel;
        assert!(v.y < 0.0);
        assert!(v.x > 0.0, "right side of the paddle deflects right");
    }

    #[test]
    fn test_losing_all_lives_ends_game() {
        let mut g = game();
        for expected in [2, 1] {
            place_ball(&mut g, Vec2::new(400.0, HEIGHT + 20.0), Vec2::new(0.0, 6.0));
            g.handle_collisions();
            assert_eq!(g.lives, expected);
            assert!(g.phase.is_playing());
        }
        place_ball(&mut g, Vec2::new(400.0, HEIGHT + 20.0), Vec2::new(0.0, 6.0));
        g.handle_collisions();
        assert_eq!(g.phase, GamePhase::GameOver { won: false });

        g.update(&InputSnapshot::with_pressed(&[KeyCode::Char('r')]));
        assert!(g.phase.is_playing());
        assert_eq!(g.lives, 3);
        assert_eq!(g.score, 0);
    }

    #[test]
    fn test_ball_update_is_pure_integration_mid_field() {
        let mut g = game();
        place_ball(&mut g, Vec2::new(400.0, 400.0), Vec2::new(4.0, -6.0));
        g.ball.update();
        assert_eq!(g.ball.body.pos, Vec2::new(404.0, 394.0));
        assert_eq!(g.ball.trail.len(), 1);
    }

    #[test]
    fn test_held_keys_move_paddle() {
        let mut g = game();
        let x0 = g.paddle.body.pos.x;
        g.update(&InputSnapshot::with_held(&[KeyCode::Left]));
        assert_eq!(g.paddle.body.pos.x, x0 - PADDLE_SPEED);
    }
}
