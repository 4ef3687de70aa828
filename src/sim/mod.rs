//! Shared simulation pieces used by every scene
//!
//! Nothing in here touches the terminal: bodies, particles, collision
//! helpers, input snapshots, randomness and the fixed-step clock are all
//! plain data so scenes can be driven tick by tick from tests.

pub mod body;
pub mod collision;
pub mod input;
pub mod particles;
pub mod rng;
pub mod step;

pub use body::{Aabb, MovingBody};
pub use input::InputSnapshot;
pub use particles::{Burst, ParticleSystem};
pub use rng::{GameRng, RandomSource};
pub use step::FixedStep;
