//! # pointswarm - Point Swarm Simulation Core
//!
//! CPU simulation of a swarm of colored, disc-shaped points. Emitters spawn
//! points with drifting palettes; every tick the swarm moves, feels drag and
//! an inverse-square pull toward the world center, bounces off the walls,
//! collides elastically with itself, ages, and drops whatever expired.
//!
//! The same code runs flat ([`Vec2`]) or in a box ([`Vec3`]).
//!
//! ## Quick Start
//!
//! ```
//! use pointswarm::prelude::*;
//!
//! let world = World::new(Vec2::new(1024.0, 700.0))
//!     .with_viscosity(0.00001)
//!     .with_attraction(150.0);
//!
//! let mut driver = Driver::seeded(world, Some(7))
//!     .with_emitter(Emitter::new(Vec2::new(170.0, 350.0), 120.0))
//!     .with_emitter(Emitter::new(Vec2::new(853.0, 350.0), 120.0))
//!     .with_capacity(400);
//!
//! for _ in 0..100 {
//!     driver.frame(None);
//! }
//! let frame = driver.snapshot();
//! assert_eq!(frame.len(), driver.swarm().len());
//! ```
//!
//! ## Core Concepts
//!
//! ### Points
//!
//! A [`Point`] has a position, velocity, radius, a mass derived from the
//! radius, a lifetime countdown and a color. Two points collide when their
//! discs overlap; [`Point::bounce_from`] separates them and exchanges an
//! impulse with restitution [`point::RESTITUTION`].
//!
//! ### The step
//!
//! [`Swarm::step`] runs its phases in a fixed order over the whole live set:
//!
//! | Phase | What happens |
//! |-------|--------------|
//! | move | `position += velocity * dt` |
//! | forces | gravity, drag and attraction summed and applied once |
//! | walls | clamp into the box, flip the normal velocity |
//! | collisions | every ordered pair, in index order |
//! | aging | lifetime counts down by the [`Decay`] step |
//! | removal | expired points are dropped, survivors keep their order |
//!
//! ### Emitters
//!
//! An [`Emitter`] makes one point per call. Every `time_to_change` calls it
//! repaints one random channel of its base color, and each point gets its own
//! lighter jitter of that base (up to 80 added per channel).
//!
//! ### Driving and rendering
//!
//! [`Driver`] owns the world, swarm, emitters, clock and random source and
//! keeps the per-frame ordering (emit, then step). Rendering stays outside:
//! a [`Renderer`] receives [`PointInstance`] snapshots.
//!
//! ## Configuration
//!
//! [`SwarmConfig`] loads a whole setup from JSON and builds a driver for
//! either dimension. See the [`config`] module.

pub mod clock;
pub mod config;
pub mod driver;
pub mod emitter;
pub mod error;
pub mod math;
pub mod point;
pub mod reactive;
pub mod render;
pub mod swarm;
pub mod world;

pub use clock::Clock;
pub use config::{EmitterConfig, Origin, SwarmConfig};
pub use driver::{Driver, FrameReport};
pub use emitter::Emitter;
pub use error::ConfigError;
pub use glam::{Vec2, Vec3};
pub use math::{Channel, Color, Vector};
pub use point::{Point, PointId, Resolution};
pub use reactive::{Baseline, Envelope};
pub use render::{HandleFactory, HandleMap, PointInstance, Renderer};
pub use swarm::{StepStats, Swarm};
pub use world::{Decay, World};

/// Convenient imports for typical usage.
///
/// ```
/// use pointswarm::prelude::*;
/// ```
///
/// This imports:
/// - [`Driver`], [`World`], [`Swarm`], [`Emitter`] - the simulation pieces
/// - [`Point`], [`Color`], [`Vector`] - values they work with
/// - [`SwarmConfig`] - JSON setup
/// - [`Renderer`], [`PointInstance`] - the render seam
/// - [`Vec2`], [`Vec3`] - glam vector types
pub mod prelude {
    pub use crate::config::SwarmConfig;
    pub use crate::driver::Driver;
    pub use crate::emitter::Emitter;
    pub use crate::math::{Color, Vector};
    pub use crate::point::Point;
    pub use crate::render::{PointInstance, Renderer};
    pub use crate::swarm::Swarm;
    pub use crate::world::{Decay, World};
    pub use glam::{Vec2, Vec3};
}
