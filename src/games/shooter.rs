use crossterm::event::KeyCode;
use glam::Vec2;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::config::Settings;
use crate::games::{GameKind, GamePhase, Scene};
use crate::sim::collision;
use crate::sim::{Aabb, Burst, GameRng, InputSnapshot, MovingBody, ParticleSystem, RandomSource};
use crate::ui::key_hints;
use crate::ui::surface::{fade, Surface};

const WIDTH: f32 = 1200.0;
const HEIGHT: f32 = 800.0;
/// Keep-out band around the screen edge for the player
const MARGIN: f32 = 50.0;

const PLAYER_W: f32 = 80.0;
const PLAYER_H: f32 = 35.0;
const PLAYER_SPEED: f32 = 4.0;
/// Ticks between volleys (200 ms at 60 Hz)
const SHOT_DELAY: u32 = 12;

const BULLET_W: f32 = 12.0;
const BULLET_H: f32 = 4.0;
const BULLET_SPEED: f32 = 12.0;

const ENEMY_W: f32 = 60.0;
const ENEMY_H: f32 = 30.0;
const DAMAGE: u32 = 25;
const KILL_POINTS: u32 = 100;
const STAR_COUNT: usize = 150;

const EXPLOSION: Burst = Burst::new(25, 40).velocity((-4.0, 4.0), (-4.0, 4.0)).size(3.0, 8.0).shrinking();
const PLAYER_EXHAUST: Burst = Burst::new(1, 40).velocity((-4.0, 4.0), (-4.0, 4.0)).size(3.0, 3.0).shrinking();
const ENEMY_EXHAUST: Burst = Burst::new(1, 40).velocity((-4.0, 4.0), (-4.0, 4.0)).size(2.0, 2.0).shrinking();

const DARK_BG: Color = Color::Rgb(8, 12, 20);
const ACCENT_BLUE: Color = Color::Rgb(0, 150, 255);
const NEON_CYAN: Color = Color::Rgb(0, 255, 255);
const NEON_GREEN: Color = Color::Rgb(0, 255, 100);
const NEON_PINK: Color = Color::Rgb(255, 0, 150);
const NEON_PURPLE: Color = Color::Rgb(150, 0, 255);
const GOLD: Color = Color::Rgb(255, 215, 0);
const RED: Color = Color::Rgb(255, 50, 50);
const ORANGE: Color = Color::Rgb(255, 150, 0);
const GRAY: Color = Color::Rgb(100, 100, 100);
const ENEMY_COLORS: [Color; 3] = [NEON_PURPLE, RED, NEON_PINK];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    StartMission,
    Quit,
}

impl MenuItem {
    const ALL: [MenuItem; 2] = [MenuItem::StartMission, MenuItem::Quit];

    fn label(&self) -> &'static str {
        match self {
            MenuItem::StartMission => "START MISSION",
            MenuItem::Quit => "QUIT",
        }
    }

    fn toggle(self) -> Self {
        match self {
            MenuItem::StartMission => MenuItem::Quit,
            MenuItem::Quit => MenuItem::StartMission,
        }
    }
}

struct Star {
    pos: Vec2,
    speed: f32,
    brightness: u8,
}

impl Star {
    fn new(rng: &mut dyn RandomSource) -> Self {
        Self {
            pos: Vec2::new(rng.uniform(0.0, WIDTH), rng.uniform(0.0, HEIGHT)),
            speed: rng.uniform(0.5, 2.0),
            brightness: rng.int_inclusive(50, 200) as u8,
        }
    }

    fn update(&mut self, rng: &mut dyn RandomSource) {
        self.pos.x -= self.speed;
        if self.pos.x < 0.0 {
            self.pos = Vec2::new(WIDTH, rng.uniform(0.0, HEIGHT));
        }
    }
}

struct Player {
    body: MovingBody,
    bullets: Vec<MovingBody>,
    cooldown: u32,
    health: u32,
    max_health: u32,
    exhaust: ParticleSystem,
}

impl Player {
    fn new(max_health: u32, particles: bool) -> Self {
        Self {
            body: MovingBody::rect(100.0, HEIGHT / 2.0, PLAYER_W, PLAYER_H),
            bullets: Vec::new(),
            cooldown: 0,
            health: max_health,
            max_health,
            exhaust: ParticleSystem::new(particles),
        }
    }

    fn update(&mut self, input: &InputSnapshot, rng: &mut dyn RandomSource) {
        let pos = &mut self.body.pos;
        if input.is_held(KeyCode::Up) && pos.y > MARGIN {
            pos.y -= PLAYER_SPEED;
        }
        if input.is_held(KeyCode::Down) && pos.y < HEIGHT - PLAYER_H - MARGIN {
            pos.y += PLAYER_SPEED;
        }
        if input.is_held(KeyCode::Left) && pos.x > MARGIN {
            pos.x -= PLAYER_SPEED;
        }
        if input.is_held(KeyCode::Right) && pos.x < WIDTH - PLAYER_W - MARGIN {
            pos.x += PLAYER_SPEED;
        }

        self.cooldown = self.cooldown.saturating_sub(1);
        if input.is_held(KeyCode::Char(' ')) && self.cooldown == 0 {
            self.fire();
        }

        if rng.chance(0.3) {
            let origin = self.body.pos + Vec2::new(-5.0, PLAYER_H / 2.0);
            self.exhaust.burst(rng, origin, &PLAYER_EXHAUST, ACCENT_BLUE);
        }

        for bullet in &mut self.bullets {
            bullet.integrate();
        }
        self.bullets.retain(|b| b.pos.x <= WIDTH);
        self.exhaust.update();
    }

    /// Two rounds, one from each wing.
    fn fire(&mut self) {
        let nose = self.body.pos.x + PLAYER_W;
        for y in [self.body.pos.y + 8.0, self.body.pos.y + PLAYER_H - 8.0] {
            let mut bullet = MovingBody::rect(nose, y, BULLET_W, BULLET_H);
            bullet.vel = Vec2::new(BULLET_SPEED, 0.0);
            self.bullets.push(bullet);
        }
        self.cooldown = SHOT_DELAY;
    }

    fn hitbox(&self) -> Aabb {
        let p = self.body.pos;
        Aabb::new(p.x + 10.0, p.y + 8.0, PLAYER_W - 20.0, PLAYER_H - 16.0)
    }
}

struct Enemy {
    body: MovingBody,
    color: Color,
    exhaust: ParticleSystem,
}

impl Enemy {
    fn new(x: f32, y: f32, speed: f32, color: Color, particles: bool) -> Self {
        let mut body = MovingBody::rect(x, y, ENEMY_W, ENEMY_H);
        body.vel = Vec2::new(-speed, 0.0);
        Self { body, color, exhaust: ParticleSystem::new(particles) }
    }

    fn update(&mut self, rng: &mut dyn RandomSource) {
        self.body.integrate();
        if rng.chance(0.2) {
            let origin = self.body.pos + Vec2::new(ENEMY_W, ENEMY_H / 2.0);
            self.exhaust.burst(rng, origin, &ENEMY_EXHAUST, self.color);
        }
        self.exhaust.update();
    }

    fn hitbox(&self) -> Aabb {
        let p = self.body.pos;
        Aabb::new(p.x + 5.0, p.y + 8.0, ENEMY_W - 10.0, ENEMY_H - 16.0)
    }
}

pub struct Shooter {
    player: Player,
    enemies: Vec<Enemy>,
    explosions: ParticleSystem,
    stars: Vec<Star>,
    score: u32,
    level: u32,
    spawn_timer: u32,
    phase: GamePhase,
    menu: MenuItem,
    exit_requested: bool,
    max_health: u32,
    particles_on: bool,
    rng: Box<dyn RandomSource>,
}

impl Shooter {
    pub fn new(settings: &Settings) -> Self {
        let rng = Box::new(GameRng::from_seed_opt(settings.seed_for(GameKind::Shooter)));
        Self::with_rng(rng, settings.shooter_health, settings.particles)
    }

    fn with_rng(mut rng: Box<dyn RandomSource>, max_health: u32, particles_on: bool) -> Self {
        let stars = (0..STAR_COUNT).map(|_| Star::new(rng.as_mut())).collect();
        Self {
            player: Player::new(max_health, particles_on),
            enemies: Vec::new(),
            explosions: ParticleSystem::new(particles_on),
            stars,
            score: 0,
            level: 1,
            spawn_timer: 0,
            phase: GamePhase::NotStarted,
            menu: MenuItem::StartMission,
            exit_requested: false,
            max_health,
            particles_on,
            rng,
        }
    }

    /// Fresh mission, straight into play.
    fn start_mission(&mut self) {
        self.player = Player::new(self.max_health, self.particles_on);
        self.enemies.clear();
        self.explosions.clear();
        self.score = 0;
        self.level = 1;
        self.spawn_timer = 0;
        self.phase = GamePhase::Playing;
        log::info!("shooter mission started");
    }

    fn handle_input(&mut self, input: &InputSnapshot) {
        match self.phase {
            GamePhase::NotStarted => {
                if input.was_pressed(KeyCode::Up) || input.was_pressed(KeyCode::Down) {
                    self.menu = self.menu.toggle();
                }
                if input.was_pressed(KeyCode::Enter) {
                    match self.menu {
                        MenuItem::StartMission => self.start_mission(),
                        MenuItem::Quit => self.exit_requested = true,
                    }
                }
            }
            GamePhase::GameOver { .. } => {
                if input.was_pressed_char('r') {
                    self.start_mission();
                } else if input.was_pressed_char('q') {
                    self.exit_requested = true;
                }
            }
            _ => {}
        }
    }

    fn spawn_interval(&self) -> u32 {
        90u32.saturating_sub(self.level * 5).max(30)
    }

    fn spawn_enemy(&mut self) {
        if self.enemies.len() >= 6 + self.level as usize {
            return;
        }
        let y = self.rng.int_inclusive(80, HEIGHT as i32 - 100) as f32;
        let speed = self.rng.uniform(1.5, 3.5);
        let color = ENEMY_COLORS[self.rng.index(ENEMY_COLORS.len())];
        self.enemies.push(Enemy::new(WIDTH, y, speed, color, self.particles_on));
    }

    fn step_world(&mut self, input: &InputSnapshot) {
        self.player.update(input, self.rng.as_mut());

        self.spawn_timer += 1;
        if self.spawn_timer > self.spawn_interval() {
            self.spawn_enemy();
            self.spawn_timer = 0;
        }

        for enemy in &mut self.enemies {
            enemy.update(self.rng.as_mut());
        }
        self.enemies.retain(|e| e.body.pos.x >= -ENEMY_W);

        self.explosions.update();
        self.handle_collisions();
    }

    fn handle_collisions(&mut self) {
        let bullet_boxes: Vec<Aabb> = self.player.bullets.iter().map(MovingBody::aabb).collect();
        let enemy_boxes: Vec<Aabb> = self.enemies.iter().map(Enemy::hitbox).collect();
        let hits = collision::first_hits(&collision::collect_pairs(&bullet_boxes, &enemy_boxes));

        if !hits.is_empty() {
            let mut spent: Vec<usize> = hits.iter().map(|&(b, _)| b).collect();
            let mut downed: Vec<usize> = hits.iter().map(|&(_, e)| e).collect();
            spent.sort_unstable();
            downed.sort_unstable();

            for &i in downed.iter().rev() {
                let enemy = self.enemies.remove(i);
                self.score += KILL_POINTS;
                self.explosions.burst(self.rng.as_mut(), enemy.body.pos, &EXPLOSION, enemy.color);
                if self.score % 1000 == 0 {
                    self.level += 1;
                    log::info!("shooter level {}", self.level);
                }
            }
            for &i in spent.iter().rev() {
                self.player.bullets.remove(i);
            }
            log::debug!("shooter: {} enemies downed", downed.len());
        }

        let player_box = self.player.hitbox();
        let before = self.enemies.len();
        self.enemies.retain(|e| !e.hitbox().intersects(&player_box));
        for _ in self.enemies.len()..before {
            self.player.health = self.player.health.saturating_sub(DAMAGE);
            let at = self.player.body.pos;
            self.explosions.burst(self.rng.as_mut(), at, &EXPLOSION, RED);
            log::debug!("shooter: player hit, health {}", self.player.health);
        }
        if self.player.health == 0 && self.phase.is_playing() {
            log::info!("shooter mission failed with score {}", self.score);
            self.phase = GamePhase::GameOver { won: false };
        }
    }

    fn draw_player(&self, s: &mut Surface) {
        for p in self.player.exhaust.iter() {
            s.plot(p.body.pos, '·', fade(p.color, p.fade()));
        }
        let o = self.player.body.pos;
        s.fill_rect(Aabb::new(o.x + 10.0, o.y + 12.0, PLAYER_W - 20.0, 12.0), '▬', GRAY);
        s.fill_rect(Aabb::new(o.x + 20.0, o.y + 5.0, 40.0, 25.0), '◆', NEON_CYAN);
        s.fill_rect(Aabb::new(o.x + 45.0, o.y + 8.0, 25.0, 20.0), '█', ACCENT_BLUE);
        s.plot(o + Vec2::new(5.0, 17.0), '●', ORANGE);
        s.plot_bold(o + Vec2::new(76.0, 17.0), '►', Color::White);
        for b in &self.player.bullets {
            s.fill_rect(b.aabb(), '━', NEON_CYAN);
        }
    }

    fn draw_enemy(enemy: &Enemy, s: &mut Surface) {
        for p in enemy.exhaust.iter() {
            s.plot(p.body.pos, '·', fade(p.color, p.fade()));
        }
        let o = enemy.body.pos;
        s.fill_rect(Aabb::new(o.x + 10.0, o.y + 10.0, ENEMY_W - 20.0, 10.0), '▬', GRAY);
        s.fill_rect(Aabb::new(o.x + 15.0, o.y + 5.0, 30.0, 20.0), '◆', enemy.color);
        s.plot_bold(o + Vec2::new(2.0, 15.0), '◄', Color::White);
    }

    fn render_field(&self, area: Rect) -> Vec<Line<'static>> {
        let mut s = Surface::new(area, WIDTH, HEIGHT, DARK_BG);
        for star in &self.stars {
            let b = star.brightness;
            s.plot(star.pos, '·', Color::Rgb(b, b, b));
        }

        match self.phase {
            GamePhase::NotStarted => {
                s.banner(-7, "🚀 SKY DOMINATION", NEON_CYAN);
                s.banner(-5, "Modern Air Combat Experience", GOLD);
                for (i, item) in MenuItem::ALL.iter().enumerate() {
                    let selected = *item == self.menu;
                    let (label, color) = if selected {
                        (format!("▶ {} ◀", item.label()), NEON_GREEN)
                    } else {
                        (item.label().to_string(), Color::White)
                    };
                    s.banner(-2 + i as i32 * 2, &label, color);
                }
                s.banner(3, "Arrow Keys: Move Aircraft", NEON_CYAN);
                s.banner(4, "Spacebar: Fire Weapons", NEON_CYAN);
                s.banner(5, "Survive and Dominate the Skies!", NEON_CYAN);
            }
            GamePhase::GameOver { .. } => {
                s.dim(0.7);
                s.banner(-4, "MISSION FAILED", RED);
                s.banner(-2, &format!("Final Score: {}", thousands(self.score)), GOLD);
                s.banner(-1, &format!("Level Reached: {}", self.level), GOLD);
                s.banner(0, &format!("Enemies Defeated: {}", self.score / KILL_POINTS), GOLD);
                s.banner(2, "Press R to Restart Mission", NEON_GREEN);
                s.banner(3, "Press Q to Quit", Color::White);
            }
            _ => {
                self.draw_player(&mut s);
                for enemy in &self.enemies {
                    Self::draw_enemy(enemy, &mut s);
                }
                for p in self.explosions.iter() {
                    let ch = if p.current_size() > 4.0 { '✸' } else { '•' };
                    s.plot(p.body.pos, ch, fade(p.color, p.fade()));
                }
            }
        }
        s.into_lines()
    }

    fn health_bar(&self) -> Vec<Span<'static>> {
        const CELLS: usize = 20;
        let ratio = self.player.health as f32 / self.player.max_health.max(1) as f32;
        let filled = (ratio * CELLS as f32).round() as usize;
        let color = if ratio > 0.6 {
            NEON_GREEN
        } else if ratio > 0.3 {
            ORANGE
        } else {
            RED
        };
        vec![
            Span::styled("█".repeat(filled), Style::default().fg(color)),
            Span::styled("░".repeat(CELLS - filled.min(CELLS)), Style::default().fg(Color::Rgb(40, 40, 40))),
        ]
    }
}

/// `12345` -> `"12,345"`
fn thousands(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

impl Scene for Shooter {
    fn kind(&self) -> GameKind {
        GameKind::Shooter
    }

    fn update(&mut self, input: &InputSnapshot) {
        self.handle_input(input);

        for star in &mut self.stars {
            star.update(self.rng.as_mut());
        }

        if self.phase.is_playing() {
            self.step_world(input);
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(ACCENT_BLUE))
            .title(" 🚀 Sky Domination ")
            .title_style(Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(8), Constraint::Length(1)])
            .split(inner);

        let mut status = vec![
            Span::styled(
                format!(" 💰 SCORE: {} ", thousands(self.score)),
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("⚡ LEVEL: {} ", self.level), Style::default().fg(NEON_GREEN)),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled("❤ ", Style::default().fg(RED)),
        ];
        status.extend(self.health_bar());
        status.extend([
            Span::styled(format!(" {}% ", self.player.health), Style::default().fg(Color::White)),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("🎯 ENEMIES: {} ", self.enemies.len()), Style::default().fg(NEON_PINK)),
        ]);
        frame.render_widget(Paragraph::new(Line::from(status)), chunks[0]);

        frame.render_widget(Paragraph::new(self.render_field(chunks[1])), chunks[1]);

        let help = match self.phase {
            GamePhase::NotStarted => key_hints(&[("↑↓", "Select"), ("Enter", "Confirm"), ("Esc", "Menu")]),
            GamePhase::GameOver { .. } => key_hints(&[("R", "Restart"), ("Q", "Quit"), ("Esc", "Menu")]),
            _ => key_hints(&[("←↑↓→", "Move"), ("Space", "Fire"), ("Esc", "Menu")]),
        };
        frame.render_widget(Paragraph::new(help), chunks[2]);
    }

    fn reset(&mut self) {
        self.start_mission();
        self.enemies.clear();
        self.phase = GamePhase::NotStarted;
        self.menu = MenuItem::StartMission;
        self.exit_requested = false;
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn is_terminal(&self) -> bool {
        self.phase.is_over()
    }

    fn wants_exit(&mut self) -> bool {
        std::mem::take(&mut self.exit_requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPACE: KeyCode = KeyCode::Char(' ');

    fn game() -> Shooter {
        Shooter::with_rng(Box::new(GameRng::seeded(3)), 100, true)
    }

    fn playing() -> Shooter {
        let mut g = game();
        g.update(&InputSnapshot::with_pressed(&[KeyCode::Enter]));
        assert!(g.phase.is_playing());
        g
    }

    fn enemy_at(x: f32, y: f32) -> Enemy {
        Enemy::new(x, y, 0.0, NEON_PINK, true)
    }

    #[test]
    fn test_menu_quit_requests_exit_once() {
        let mut g = game();
        g.update(&InputSnapshot::with_pressed(&[KeyCode::Down]));
        g.update(&InputSnapshot::with_pressed(&[KeyCode::Enter]));
        assert_eq!(g.phase, GamePhase::NotStarted);
        assert!(g.wants_exit());
        assert!(!g.wants_exit());
    }

    #[test]
    fn test_holding_fire_shoots_pairs_on_cooldown() {
        let mut g = playing();
        let held = InputSnapshot::with_held(&[SPACE]);
        for _ in 0..SHOT_DELAY {
            g.update(&held);
        }
        assert_eq!(g.player.bullets.len(), 2);
        g.update(&held);
        assert_eq!(g.player.bullets.len(), 4);
    }

    #[test]
    fn test_bullet_downs_one_enemy() {
        let mut g = playing();
        g.enemies = vec![enemy_at(600.0, 300.0), enemy_at(600.0, 300.0)];
        let mut bullet = MovingBody::rect(620.0, 312.0, BULLET_W, BULLET_H);
        bullet.vel = Vec2::ZERO;
        g.player.bullets = vec![bullet];

        g.handle_collisions();
        assert_eq!(g.enemies.len(), 1);
        assert!(g.player.bullets.is_empty());
        assert_eq!(g.score, 100);
        assert_eq!(g.explosions.len(), 25);
    }

    #[test]
    fn test_two_bullets_in_one_enemy_score_once() {
        let mut g = playing();
        g.enemies = vec![enemy_at(600.0, 300.0)];
        g.player.bullets = vec![
            MovingBody::rect(620.0, 312.0, BULLET_W, BULLET_H),
            MovingBody::rect(630.0, 312.0, BULLET_W, BULLET_H),
        ];
        g.handle_collisions();
        assert!(g.enemies.is_empty());
        assert_eq!(g.player.bullets.len(), 1);
        assert_eq!(g.score, 100);
    }

    #[test]
    fn test_level_up_every_thousand() {
        let mut g = playing();
        g.score = 900;
        g.enemies = vec![enemy_at(600.0, 300.0)];
        g.player.bullets = vec![MovingBody::rect(620.0, 312.0, BULLET_W, BULLET_H)];
        g.handle_collisions();
        assert_eq!(g.score, 1000);
        assert_eq!(g.level, 2);
        assert_eq!(g.spawn_interval(), 80);
    }

    #[test]
    fn test_collisions_drain_health_then_end_mission() {
        let mut g = playing();
        let p = g.player.body.pos;
        for expected in [75, 50, 25] {
            g.enemies = vec![enemy_at(p.x, p.y)];
            g.handle_collisions();
            assert_eq!(g.player.health, expected);
            assert!(g.enemies.is_empty());
            assert!(g.phase.is_playing());
        }
        g.enemies = vec![enemy_at(p.x, p.y)];
        g.handle_collisions();
        assert_eq!(g.player.health, 0);
        assert_eq!(g.phase, GamePhase::GameOver { won: false });

        g.update(&InputSnapshot::with_pressed(&[KeyCode::Char('q')]));
        assert!(g.wants_exit());
        g.update(&InputSnapshot::with_pressed(&[KeyCode::Char('r')]));
        assert!(g.phase.is_playing());
        assert_eq!(g.player.health, 100);
        assert_eq!(g.score, 0);
    }

    #[test]
    fn test_enemies_spawn_on_timer_and_cap() {
        let mut g = playing();
        g.spawn_timer = 0;
        // 85-tick interval at level 1; the timer must pass it
        for _ in 0..85 {
            g.step_world(&InputSnapshot::new());
        }
        assert!(g.enemies.is_empty());
        g.step_world(&InputSnapshot::new());
        assert_eq!(g.enemies.len(), 1);
        let e = &g.enemies[0];
        assert!((80.0..=700.0).contains(&e.body.pos.y));
        assert!(-e.body.vel.x >= 1.5 && -e.body.vel.x < 3.5);

        for _ in 0..20 {
            g.spawn_enemy();
        }
        assert_eq!(g.enemies.len(), 7);
    }

    #[test]
    fn test_player_stays_inside_margin() {
        let mut g = playing();
        let up = InputSnapshot::with_held(&[KeyCode::Up, KeyCode::Left]);
        for _ in 0..400 {
            g.player.update(&up, g.rng.as_mut());
        }
        assert!(g.player.body.pos.y <= MARGIN && g.player.body.pos.y > MARGIN - PLAYER_SPEED);
        assert!(g.player.body.pos.x <= MARGIN && g.player.body.pos.x > MARGIN - PLAYER_SPEED);
    }

    #[test]
    fn test_thousands_separator() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(1234567), "1,234,567");
    }
}
