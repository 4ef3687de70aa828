use std::collections::VecDeque;

use crossterm::event::KeyCode;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::config::Settings;
use crate::games::{GameKind, GamePhase, Scene};
use crate::sim::{Aabb, GameRng, InputSnapshot, RandomSource};
use crate::ui::key_hints;
use crate::ui::surface::{fade, Surface};

pub const GRID_W: i32 = 40;
pub const GRID_H: i32 = 30;
const POINTS_PER_FOOD: u32 = 10;

const BACKGROUND: Color = Color::Rgb(18, 18, 18);
const GRID: Color = Color::Rgb(35, 35, 35);
const HEAD: Color = Color::Rgb(76, 175, 80);
const BODY: Color = Color::Rgb(56, 142, 60);
const FOOD: Color = Color::Rgb(244, 67, 54);
const ACCENT: Color = Color::Rgb(103, 58, 183);
const GAME_OVER: Color = Color::Rgb(255, 82, 82);

pub type Cell = (i32, i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(&self) -> Cell {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    fn from_key(code: KeyCode) -> Option<Direction> {
        match code {
            KeyCode::Up => Some(Direction::Up),
            KeyCode::Down => Some(Direction::Down),
            KeyCode::Left => Some(Direction::Left),
            KeyCode::Right => Some(Direction::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Moved,
    Ate,
    Crashed,
}

#[derive(Debug, Clone)]
pub struct Snake {
    /// Head first
    body: VecDeque<Cell>,
    /// Direction the last step was taken in
    heading: Direction,
    /// Direction the next step will take
    dir: Direction,
}

impl Snake {
    pub fn new(head: Cell, dir: Direction) -> Self {
        Self { body: VecDeque::from([head]), heading: dir, dir }
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter()
    }

    pub fn direction(&self) -> Direction {
        self.dir
    }

    /// Queue a turn. Turning back onto the neck is refused, judged against
    /// the last step taken so two quick turns cannot fold the snake.
    pub fn turn(&mut self, dir: Direction) -> bool {
        if dir == self.heading.opposite() {
            return false;
        }
        self.dir = dir;
        true
    }

    /// Advance one cell on a `w` x `h` grid. Eating is decided on this
    /// step: landing on `food` keeps the tail in place.
    pub fn step(&mut self, food: Option<Cell>, w: i32, h: i32) -> StepOutcome {
        let (hx, hy) = self.head();
        let (dx, dy) = self.dir.delta();
        let next = (hx + dx, hy + dy);

        if next.0 < 0 || next.0 >= w || next.1 < 0 || next.1 >= h {
            return StepOutcome::Crashed;
        }

        // Checked before the tail pops, so the tail cell is still solid
        if self.body.contains(&next) {
            return StepOutcome::Crashed;
        }

        let grows = food == Some(next);

        self.body.push_front(next);
        if !grows {
            self.body.pop_back();
        }
        self.heading = self.dir;
        if grows { StepOutcome::Ate } else { StepOutcome::Moved }
    }
}

/// Uniform pick over the cells the snake does not cover; `None` when the
/// board is full.
pub fn spawn_food(snake: &Snake, w: i32, h: i32, rng: &mut dyn RandomSource) -> Option<Cell> {
    let free: Vec<Cell> = (0..h)
        .flat_map(|y| (0..w).map(move |x| (x, y)))
        .filter(|&c| !snake.contains(c))
        .collect();
    if free.is_empty() {
        return None;
    }
    Some(free[rng.index(free.len())])
}

pub struct SnakeGame {
    snake: Snake,
    food: Option<Cell>,
    pulse: f32,
    score: u32,
    high_score: u32,
    phase: GamePhase,
    rng: Box<dyn RandomSource>,
}

impl SnakeGame {
    pub fn new(settings: &Settings) -> Self {
        let rng = Box::new(GameRng::from_seed_opt(settings.seed_for(GameKind::Snake)));
        Self::with_rng(rng)
    }

    fn with_rng(mut rng: Box<dyn RandomSource>) -> Self {
        let snake = Snake::new((GRID_W / 2, GRID_H / 2), Direction::Right);
        let food = spawn_food(&snake, GRID_W, GRID_H, rng.as_mut());
        Self {
            snake,
            food,
            pulse: 0.0,
            score: 0,
            high_score: 0,
            phase: GamePhase::Playing,
            rng,
        }
    }

    fn handle_input(&mut self, input: &InputSnapshot) {
        for &code in &input.pressed {
            if let Some(dir) = Direction::from_key(code) {
                if !self.phase.is_over() {
                    self.snake.turn(dir);
                }
            }
        }

        if input.was_pressed(KeyCode::Char(' ')) {
            if self.phase.is_over() {
                self.reset();
            } else {
                self.phase.toggle_pause();
            }
        } else if self.phase.is_over() && input.was_pressed_char('r') {
            self.reset();
        }
    }

    fn tick(&mut self) {
        match self.snake.step(self.food, GRID_W, GRID_H) {
            StepOutcome::Crashed => {
                log::info!("snake crashed at length {} with score {}", self.snake.len(), self.score);
                self.finish(false);
                return;
            }
            StepOutcome::Ate => {
                self.score += POINTS_PER_FOOD;
                self.food = spawn_food(&self.snake, GRID_W, GRID_H, self.rng.as_mut());
                log::debug!("snake ate, length {}", self.snake.len());
                if self.food.is_none() {
                    log::info!("snake filled the board with score {}", self.score);
                    self.finish(true);
                    return;
                }
            }
            StepOutcome::Moved => {}
        }
        self.pulse += 0.2;
    }

    fn finish(&mut self, won: bool) {
        self.phase = GamePhase::GameOver { won };
        self.high_score = self.high_score.max(self.score);
    }

    fn render_field(&self, area: Rect) -> Vec<Line<'static>> {
        let mut s = Surface::new(area, GRID_W as f32, GRID_H as f32, BACKGROUND);

        // Checkerboard stands in for grid lines
        for y in 0..GRID_H {
            for x in 0..GRID_W {
                if (x + y) % 2 == 0 {
                    s.shade_rect(Aabb::new(x as f32, y as f32, 1.0, 1.0), GRID);
                }
            }
        }

        if let Some((fx, fy)) = self.food {
            let glow = 0.7 + self.pulse.sin() * 0.3;
            s.fill_rect(Aabb::new(fx as f32, fy as f32, 1.0, 1.0), '●', fade(FOOD, glow));
        }

        for (i, &(x, y)) in self.snake.cells().enumerate() {
            let cell = Aabb::new(x as f32, y as f32, 1.0, 1.0);
            if i == 0 {
                let eyes = match self.snake.direction() {
                    Direction::Up => '▲',
                    Direction::Down => '▼',
                    Direction::Left => '◀',
                    Direction::Right => '▶',
                };
                s.fill_rect(cell, eyes, HEAD);
            } else {
                let k = (1.0 - i as f32 * 0.05).max(0.3);
                s.fill_rect(cell, '■', fade(BODY, k));
            }
        }

        match self.phase {
            GamePhase::GameOver { won } => {
                s.dim(0.7);
                if won {
                    s.banner(-2, "BOARD CLEARED!", HEAD);
                } else {
                    s.banner(-2, "GAME OVER", GAME_OVER);
                }
                s.banner(0, &format!("Final Score: {}", self.score), Color::White);
                s.banner(2, "Press SPACE or R to restart", ACCENT);
            }
            GamePhase::Paused => s.banner(0, "PAUSED", ACCENT),
            _ => {}
        }

        s.into_lines()
    }
}

impl Scene for SnakeGame {
    fn kind(&self) -> GameKind {
        GameKind::Snake
    }

    fn tick_rate(&self) -> u32 {
        10
    }

    fn update(&mut self, input: &InputSnapshot) {
        self.handle_input(input);
        if self.phase.is_playing() {
            self.tick();
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(HEAD))
            .title(" 🐍 Snake ")
            .title_style(Style::default().fg(HEAD).add_modifier(Modifier::BOLD));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(ratatui::layout::Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(8), Constraint::Length(1)])
            .split(inner);

        let status = Line::from(vec![
            Span::styled(
                format!(" Score: {} ", self.score),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("Length: {} ", self.snake.len()), Style::default().fg(HEAD)),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("🏆 High: {} ", self.high_score), Style::default().fg(ACCENT)),
        ]);
        frame.render_widget(Paragraph::new(status), chunks[0]);

        frame.render_widget(Paragraph::new(self.render_field(chunks[1])), chunks[1]);

        let help = if self.phase.is_over() {
            key_hints(&[("Space/R", "Restart"), ("Esc", "Menu")])
        } else {
            key_hints(&[("←↑↓→", "Move"), ("Space", "Pause"), ("Esc", "Menu")])
        };
        frame.render_widget(Paragraph::new(help), chunks[2]);
    }

    fn reset(&mut self) {
        self.snake = Snake::new((GRID_W / 2, GRID_H / 2), Direction::Right);
        self.food = spawn_food(&self.snake, GRID_W, GRID_H, self.rng.as_mut());
        self.pulse = 0.0;
        self.score = 0;
        self.phase = GamePhase::Playing;
        log::info!("snake reset");
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
    use std::collections::HashSet;

    use super::*;

    fn game() -> SnakeGame {
        SnakeGame::with_rng(Box::new(GameRng::seeded(8)))
    }

    #[test]
    fn test_eating_grows_and_scores() {
        let mut g = game();
        g.food = Some((21, 15));
        g.update(&InputSnapshot::new());
        assert_eq!(g.snake.len(), 2);
        assert_eq!(g.snake.head(), (21, 15));
        assert_eq!(g.score, 10);
        let food = g.food.expect("free cells remain");
        assert!(!g.snake.contains(food));
    }

    #[test]
    fn test_reversal_is_refused() {
        let mut s = Snake::new((20, 15), Direction::Right);
        assert!(!s.turn(Direction::Left));
        assert_eq!(s.direction(), Direction::Right);

        // Up then Left inside one tick: Left would still fold onto the neck
        assert!(s.turn(Direction::Up));
        assert!(!s.turn(Direction::Left));
        s.step(None, GRID_W, GRID_H);
        assert_eq!(s.head(), (20, 14));
        assert!(s.turn(Direction::Left));
    }

    #[test]
    fn test_wall_ends_game() {
        let mut g = game();
        g.snake = Snake::new((GRID_W - 1, 10), Direction::Right);
        g.food = Some((0, 0));
        g.update(&InputSnapshot::new());
        assert_eq!(g.phase, GamePhase::GameOver { won: false });
        assert_eq!(g.snake.head(), (GRID_W - 1, 10));

        g.update(&InputSnapshot::with_pressed(&[KeyCode::Char(' ')]));
        // Restarted and already one step along
        assert!(g.phase.is_playing());
        assert_eq!(g.snake.head(), (GRID_W / 2 + 1, GRID_H / 2));
    }

    #[test]
    fn test_moving_into_the_tail_crashes() {
        // 2x2 loop: head (1,0), then (1,1), (0,1), tail (0,0)
        let mut s = Snake {
            body: VecDeque::from([(1, 0), (1, 1), (0, 1), (0, 0)]),
            heading: Direction::Up,
            dir: Direction::Up,
        };
        assert_eq!(s.step(None, 5, 5), StepOutcome::Crashed, "out of the top");

        assert!(s.turn(Direction::Left));
        assert_eq!(s.step(None, 5, 5), StepOutcome::Crashed);
        assert_eq!(s.head(), (1, 0));
        assert_eq!(s.len(), 4);
    }

    #[test]
    fn test_tail_chase_ends_the_game() {
        let mut g = game();
        g.snake = Snake {
            body: VecDeque::from([(1, 0), (1, 1), (0, 1), (0, 0)]),
            heading: Direction::Up,
            dir: Direction::Left,
        };
        g.food = Some((10, 10));
        g.update(&InputSnapshot::new());
        assert_eq!(g.phase, GamePhase::GameOver { won: false });
        assert_eq!(g.snake.len(), 4);
    }

    #[test]
    fn test_biting_the_body_crashes() {
        let mut s = Snake {
            body: VecDeque::from([(1, 0), (1, 1), (0, 1), (0, 0)]),
            heading: Direction::Up,
            dir: Direction::Down,
        };
        assert_eq!(s.step(None, 5, 5), StepOutcome::Crashed);
        // Growing onto the tail cell is fatal since the tail stays
        s.dir = Direction::Left;
        assert_eq!(s.step(Some((0, 0)), 5, 5), StepOutcome::Crashed);
    }

    #[test]
    fn test_random_play_keeps_invariants() {
        let mut g = game();
        let mut driver = GameRng::seeded(99);
        let keys = [KeyCode::Up, KeyCode::Down, KeyCode::Left, KeyCode::Right];
        for _ in 0..3000 {
            let input = if driver.chance(0.3) {
                InputSnapshot::with_pressed(&[keys[driver.index(4)]])
            } else {
                InputSnapshot::new()
            };
            g.update(&input);

            assert_eq!(g.snake.len() as u32, 1 + g.score / POINTS_PER_FOOD);
            let unique: HashSet<Cell> = g.snake.cells().copied().collect();
            assert_eq!(unique.len(), g.snake.len());
            assert!(g.snake.cells().all(|&(x, y)| (0..GRID_W).contains(&x) && (0..GRID_H).contains(&y)));
            if let Some(f) = g.food {
                assert!(!g.snake.contains(f));
            }

            if g.phase.is_over() {
                g.update(&InputSnapshot::with_pressed(&[KeyCode::Char('r')]));
            }
        }
    }

    #[test]
    fn test_filling_the_board_wins() {
        // Serpentine through every cell; the head sits one step from the
        // only free cell at (0, 0)
        let mut path = Vec::new();
        for y in 0..GRID_H {
            if y % 2 == 0 {
                path.extend((0..GRID_W).map(|x| (x, y)));
            } else {
                path.extend((0..GRID_W).rev().map(|x| (x, y)));
            }
        }
        let mut g = game();
        g.snake = Snake {
            body: path[1..].iter().copied().collect(),
            heading: Direction::Left,
            dir: Direction::Left,
        };
        g.food = Some(path[0]);

        g.update(&InputSnapshot::new());
        assert_eq!(g.snake.len() as i32, GRID_W * GRID_H);
        assert_eq!(g.food, None);
        assert_eq!(g.phase, GamePhase::GameOver { won: true });
    }

    #[test]
    fn test_pause_holds_the_snake() {
        let mut g = game();
        g.update(&InputSnapshot::with_pressed(&[KeyCode::Char(' ')]));
        let head = g.snake.head();
        g.update(&InputSnapshot::new());
        assert_eq!(g.snake.head(), head);
        assert_eq!(g.phase, GamePhase::Paused);
    }

    #[test]
    fn test_spawn_food_scripted() {
        let s = Snake::new((0, 0), Direction::Right);
        let mut rng = crate::sim::rng::ScriptedRng::new(&[0.0]);
        // First free cell in row-major order
        assert_eq!(spawn_food(&s, 3, 3, &mut rng), Some((1, 0)));
    }
}
