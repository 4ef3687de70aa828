//! Collision tests and responses
//!
//! Scenes resolve collisions in two phases: gather every overlapping pair
//! from a read-only pass, keep at most one pair per mover and per target
//! with `first_hits`, then apply the survivors. The lowest target index
//! wins a tie, which makes "first enumerated match" an explicit rule.

use glam::Vec2;

use super::body::{Aabb, MovingBody};

/// Which sides of the bounds reflect the body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Walls {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl Walls {
    pub const SIDES_AND_TOP: Walls = Walls { left: true, right: true, top: true, bottom: false };
    pub const TOP_AND_BOTTOM: Walls = Walls { left: false, right: false, top: true, bottom: true };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WallHit {
    pub horizontal: bool,
    pub vertical: bool,
}

impl WallHit {
    pub fn any(&self) -> bool {
        self.horizontal || self.vertical
    }
}

/// Reflect `body` off the enabled walls of `bounds` and clamp it back inside.
///
/// The perpendicular velocity component is forced to point into the field,
/// so a body that is already moving away is left alone apart from the clamp.
pub fn bounce_in_bounds(body: &mut MovingBody, bounds: Aabb, walls: Walls) -> WallHit {
    let mut hit = WallHit::default();
    let bb = body.aabb();
    let half = Vec2::new(bb.w / 2.0, bb.h / 2.0);
    let center = body.center();
    let anchor = body.pos - center;

    if walls.left && bb.x <= bounds.x {
        body.vel.x = body.vel.x.abs();
        body.pos.x = bounds.x + half.x + anchor.x;
        hit.horizontal = true;
    } else if walls.right && bb.right() >= bounds.right() {
        body.vel.x = -body.vel.x.abs();
        body.pos.x = bounds.right() - half.x + anchor.x;
        hit.horizontal = true;
    }

    if walls.top && bb.y <= bounds.y {
        body.vel.y = body.vel.y.abs();
        body.pos.y = bounds.y + half.y + anchor.y;
        hit.vertical = true;
    } else if walls.bottom && bb.bottom() >= bounds.bottom() {
        body.vel.y = -body.vel.y.abs();
        body.pos.y = bounds.bottom() - half.y + anchor.y;
        hit.vertical = true;
    }
    hit
}

/// Direction a paddle sends the ball back in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Up,
    Left,
    Right,
}

/// New ball velocity after a paddle hit.
///
/// `hit` is the contact point along the paddle in `[0, 1]` (clamped); the
/// centre returns the ball straight back and the ends deflect it by
/// `max_angle`. The normal component always points along `facing`.
pub fn deflect(speed: f32, hit: f32, max_angle: f32, facing: Facing) -> Vec2 {
    let hit = hit.clamp(0.0, 1.0);
    let angle = (hit - 0.5) * 2.0 * max_angle;
    let along = speed * angle.sin();
    let away = (speed * angle.cos()).abs();
    match facing {
        Facing::Up => Vec2::new(along, -away),
        Facing::Left => Vec2::new(-away, along),
        Facing::Right => Vec2::new(away, along),
    }
}

/// Normalised contact point of `p` along a span starting at `start`.
pub fn hit_fraction(p: f32, start: f32, extent: f32) -> f32 {
    if extent <= 0.0 {
        return 0.5;
    }
    ((p - start) / extent).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Axis to reflect when a mover strikes `target`.
///
/// Compares the centre offset relative to the target's size on each axis.
/// A mover far off to the side relative to the width came in sideways
/// (small horizontal penetration), so its horizontal velocity flips.
pub fn reflect_axis(mover_center: Vec2, target: &Aabb) -> Axis {
    let c = target.center();
    let dx = (mover_center.x - c.x).abs() / target.w.max(f32::EPSILON);
    let dy = (mover_center.y - c.y).abs() / target.h.max(f32::EPSILON);
    if dx > dy { Axis::X } else { Axis::Y }
}

pub fn reflect(vel: &mut Vec2, axis: Axis) {
    match axis {
        Axis::X => vel.x = -vel.x,
        Axis::Y => vel.y = -vel.y,
    }
}

/// Every `(mover, target)` index pair whose boxes overlap.
pub fn collect_pairs(movers: &[Aabb], targets: &[Aabb]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for (mi, m) in movers.iter().enumerate() {
        for (ti, t) in targets.iter().enumerate() {
            if m.intersects(t) {
                pairs.push((mi, ti));
            }
        }
    }
    pairs
}

/// Keep at most one pair per mover and per target.
///
/// Pairs are considered in `(mover, target)` order, so each mover resolves
/// against its lowest-index target and a target claimed by an earlier mover
/// is not available to later ones this tick.
pub fn first_hits(pairs: &[(usize, usize)]) -> Vec<(usize, usize)> {
    let mut sorted = pairs.to_vec();
    sorted.sort_unstable();
    let mut kept: Vec<(usize, usize)> = Vec::new();
    for (m, t) in sorted {
        if kept.iter().any(|&(km, kt)| km == m || kt == t) {
            continue;
        }
        kept.push((m, t));
    }
    kept
}
