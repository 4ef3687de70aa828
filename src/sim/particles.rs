//! Short-lived decorative particles; they never feed back into gameplay.

use glam::Vec2;
use ratatui::style::Color;

use super::body::{Aabb, MovingBody, Shape};
use super::rng::RandomSource;

#[derive(Debug, Clone)]
pub struct Particle {
    pub body: MovingBody,
    pub life: u32,
    pub max_life: u32,
    pub gravity: f32,
    /// Starting size in world units; see `current_size`.
    pub size: f32,
    pub shrink: bool,
    pub color: Color,
}

impl Particle {
    pub fn update(&mut self) {
        self.body.integrate_then_fall(self.gravity);
        self.life = self.life.saturating_sub(1);
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }

    /// Remaining life as a fraction in `[0, 1]`.
    pub fn fade(&self) -> f32 {
        if self.max_life == 0 {
            return 0.0;
        }
        self.life as f32 / self.max_life as f32
    }

    pub fn current_size(&self) -> f32 {
        if self.shrink { self.size * self.fade() } else { self.size }
    }
}

/// Recipe for a group of particles spawned by one event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Burst {
    pub count: usize,
    pub life: u32,
    pub vx: (f32, f32),
    pub vy: (f32, f32),
    /// Extra uniform kick added on both axes after the base velocity.
    pub jitter: f32,
    /// Half-width of the square the spawn point is scattered over.
    pub spread: f32,
    pub gravity: f32,
    pub size: (f32, f32),
    pub shrink: bool,
}

impl Burst {
    pub const fn new(count: usize, life: u32) -> Self {
        Self {
            count,
            life,
            vx: (0.0, 0.0),
            vy: (0.0, 0.0),
            jitter: 0.0,
            spread: 0.0,
            gravity: 0.0,
            size: (2.0, 2.0),
            shrink: false,
        }
    }

    pub const fn velocity(self, vx: (f32, f32), vy: (f32, f32)) -> Self {
        Self { vx, vy, ..self }
    }

    pub const fn jitter(self, jitter: f32) -> Self {
        Self { jitter, ..self }
    }

    pub const fn spread(self, spread: f32) -> Self {
        Self { spread, ..self }
    }

    pub const fn gravity(self, gravity: f32) -> Self {
        Self { gravity, ..self }
    }

    pub const fn size(self, lo: f32, hi: f32) -> Self {
        Self { size: (lo, hi), ..self }
    }

    pub const fn shrinking(self) -> Self {
        Self { shrink: true, ..self }
    }

    fn spawn(&self, rng: &mut dyn RandomSource, origin: Vec2, color: Color) -> Particle {
        let offset = Vec2::new(
            rng.uniform(-self.spread, self.spread),
            rng.uniform(-self.spread, self.spread),
        );
        let mut vel = Vec2::new(rng.uniform(self.vx.0, self.vx.1), rng.uniform(self.vy.0, self.vy.1));
        if self.jitter > 0.0 {
            vel += Vec2::new(
                rng.uniform(-self.jitter, self.jitter),
                rng.uniform(-self.jitter, self.jitter),
            );
        }
        let size = rng.uniform(self.size.0, self.size.1);
        Particle {
            body: MovingBody::new(origin + offset, vel, Shape::Circle { r: size }),
            life: self.life,
            max_life: self.life,
            gravity: self.gravity,
            size,
            shrink: self.shrink,
            color,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    enabled: bool,
}

impl ParticleSystem {
    pub fn new(enabled: bool) -> Self {
        Self { particles: Vec::new(), enabled }
    }

    pub fn burst(&mut self, rng: &mut dyn RandomSource, origin: Vec2, burst: &Burst, color: Color) {
        if !self.enabled {
            return;
        }
        for _ in 0..burst.count {
            let p = burst.spawn(rng, origin, color);
            self.particles.push(p);
        }
    }

    /// Spawn `burst.count` particles at random points of `area`, each
    /// coloured from `palette`.
    pub fn scatter(&mut self, rng: &mut dyn RandomSource, area: Aabb, burst: &Burst, palette: &[Color]) {
        if !self.enabled || palette.is_empty() {
            return;
        }
        for _ in 0..burst.count {
            let origin = Vec2::new(
                rng.uniform(area.x, area.right()),
                rng.uniform(area.y, area.bottom()),
            );
            let color = palette[rng.index(palette.len())];
            let p = burst.spawn(rng, origin, color);
            self.particles.push(p);
        }
    }

    /// Advance every particle one tick, then drop the expired ones.
    pub fn update(&mut self) {
        for p in &mut self.particles {
            p.update();
        }
        self.particles.retain(Particle::is_alive);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }
}
