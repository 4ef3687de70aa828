//! Kinematic bodies and axis-aligned boxes

use glam::Vec2;

/// Axis-aligned bounding box (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Strict overlap test: boxes that only share an edge do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    #[cfg(test)]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }
}

/// Collision footprint of a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Rectangle anchored at `pos` (top-left corner)
    Rect { w: f32, h: f32 },
    /// Circle centred on `pos`
    Circle { r: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MovingBody {
    pub pos: Vec2,
    pub vel: Vec2,
    pub shape: Shape,
}

impl MovingBody {
    pub fn new(pos: Vec2, vel: Vec2, shape: Shape) -> Self {
        Self { pos, vel, shape }
    }

    pub fn rect(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::new(Vec2::new(x, y), Vec2::ZERO, Shape::Rect { w, h })
    }

    pub fn circle(x: f32, y: f32, r: f32) -> Self {
        Self::new(Vec2::new(x, y), Vec2::ZERO, Shape::Circle { r })
    }

    /// One Euler step: `pos += vel`.
    pub fn integrate(&mut self) {
        self.pos += self.vel;
    }

    /// Accelerate first, then move (falling bird).
    pub fn integrate_with_gravity(&mut self, gravity: f32) {
        self.vel.y += gravity;
        self.pos += self.vel;
    }

    /// Move first, then accelerate (debris particles).
    pub fn integrate_then_fall(&mut self, gravity: f32) {
        self.pos += self.vel;
        self.vel.y += gravity;
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Centre of the footprint regardless of anchor.
    pub fn center(&self) -> Vec2 {
        match self.shape {
            Shape::Rect { w, h } => self.pos + Vec2::new(w / 2.0, h / 2.0),
            Shape::Circle { .. } => self.pos,
        }
    }

    pub fn aabb(&self) -> Aabb {
        match self.shape {
            Shape::Rect { w, h } => Aabb::new(self.pos.x, self.pos.y, w, h),
            Shape::Circle { r } => Aabb::new(self.pos.x - r, self.pos.y - r, r * 2.0, r * 2.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrate_adds_velocity_once() {
        let mut body = MovingBody::new(Vec2::new(10.0, 20.0), Vec2::new(3.0, -4.0), Shape::Circle { r: 2.0 });
        body.integrate();
        assert_eq!(body.pos, Vec2::new(13.0, 16.0));
        assert_eq!(body.vel, Vec2::new(3.0, -4.0));
    }

    #[test]
    fn test_gravity_orders() {
        let mut bird = MovingBody::circle(0.0, 0.0, 1.0);
        bird.integrate_with_gravity(0.5);
        assert_eq!(bird.pos.y, 0.5);
        assert_eq!(bird.vel.y, 0.5);

        let mut spark = MovingBody::circle(0.0, 0.0, 1.0);
        spark.integrate_then_fall(0.5);
        assert_eq!(spark.pos.y, 0.0);
        assert_eq!(spark.vel.y, 0.5);
    }

    #[test]
    fn test_aabb_edges_do_not_touch() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::new(10.0, 0.0, 10.0, 10.0);
        let c = Aabb::new(9.5, 9.5, 1.0, 1.0);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
        assert!(c.intersects(&b));
    }

    #[test]
    fn test_circle_bounds() {
        let ball = MovingBody::circle(50.0, 40.0, 8.0);
        assert_eq!(ball.aabb(), Aabb::new(42.0, 32.0, 16.0, 16.0));
        assert_eq!(ball.center(), Vec2::new(50.0, 40.0));
    }
}
