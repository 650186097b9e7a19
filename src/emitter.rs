//! Particle emitters.
//!
//! An [`Emitter`] is a spawn-envelope controller: every call to
//! [`Emitter::generate`] returns one new [`Point`] at the emitter's origin,
//! with a radius drawn from `[min_size, max_size]`, a velocity jittered
//! around `initial_velocity`, and a color taken from a slowly drifting
//! palette. The emitter does not keep the points it makes; ownership goes
//! straight to the caller (normally a [`crate::Swarm`]).
//!
//! # Palette drift
//!
//! The emitter keeps a `base_color` and a counter. Every `time_to_change`
//! emissions one randomly chosen channel of the base is redrawn from
//! `[100, 140]`. Each point's own color is the base plus an independent
//! `[0, 80]` offset per channel, so neighbouring points share a hue that
//! wanders over time instead of being independently random.
//!
//! # Example
//!
//! ```
//! use pointswarm::{Emitter, Swarm};
//! use glam::Vec2;
//! use rand::rngs::SmallRng;
//! use rand::SeedableRng;
//!
//! let mut rng = SmallRng::seed_from_u64(7);
//! let mut emitter = Emitter::new(Vec2::new(170.0, 350.0), 120.0)
//!     .with_velocity_jitter(Vec2::new(20.0, 5.0))
//!     .with_size(5.0, 30.0);
//!
//! let mut swarm = Swarm::new();
//! swarm.insert(emitter.generate(&mut rng));
//! assert_eq!(swarm.len(), 1);
//! ```
//!
//! External drivers may change `lifetime`, the size range, the velocity
//! jitter and `time_to_change` between calls; see [`crate::reactive`].

use crate::math::{Channel, Color, Vector};
use crate::point::Point;
use log::debug;
use rand::Rng;

/// Lowest value a drifting base channel can take.
pub const DRIFT_MIN: i32 = 100;

/// Highest value a drifting base channel can take.
pub const DRIFT_MAX: i32 = 140;

/// Largest per-channel offset added to the base color for one point.
pub const JITTER_MAX: i32 = 80;

/// Source of new points.
#[derive(Clone, Debug, PartialEq)]
pub struct Emitter<V: Vector> {
    /// Spawn origin.
    pub position: V,
    /// Base velocity of spawned points.
    pub initial_velocity: V,
    /// Half-width of the uniform per-axis velocity perturbation.
    pub velocity_jitter: V,
    /// Smallest spawned radius (inclusive).
    pub min_size: f32,
    /// Largest spawned radius (inclusive).
    pub max_size: f32,
    /// `max_lifetime` given to every spawned point.
    pub lifetime: f32,
    /// Emissions between two palette drifts.
    pub time_to_change: u32,
    base_color: Color,
    since_change: u32,
    color_shifts: u64,
}

impl<V: Vector> Emitter<V> {
    /// An emitter at `position` whose points live `lifetime` ticks.
    ///
    /// Starts at rest (no velocity, no jitter) with radii in `5..=30`,
    /// a grey `(120, 120, 120)` base color and a drift every 20 emissions.
    pub fn new(position: V, lifetime: f32) -> Self {
        Self {
            position,
            initial_velocity: V::ZERO,
            velocity_jitter: V::ZERO,
            min_size: 5.0,
            max_size: 30.0,
            lifetime,
            time_to_change: 20,
            base_color: Color::new(120, 120, 120),
            since_change: 0,
            color_shifts: 0,
        }
    }

    pub fn with_velocity(mut self, velocity: V) -> Self {
        self.initial_velocity = velocity;
        self
    }

    pub fn with_velocity_jitter(mut self, jitter: V) -> Self {
        self.velocity_jitter = jitter;
        self
    }

    pub fn with_size(mut self, min_size: f32, max_size: f32) -> Self {
        self.min_size = min_size;
        self.max_size = max_size;
        self
    }

    pub fn with_time_to_change(mut self, emissions: u32) -> Self {
        self.time_to_change = emissions;
        self
    }

    pub fn with_base_color(mut self, color: Color) -> Self {
        self.base_color = color;
        self
    }

    /// Current palette base.
    #[inline]
    pub fn base_color(&self) -> Color {
        self.base_color
    }

    /// How many times the palette has drifted so far.
    #[inline]
    pub fn color_shifts(&self) -> u64 {
        self.color_shifts
    }

    /// Spawn one point.
    pub fn generate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Point<V> {
        self.since_change += 1;
        if self.since_change >= self.time_to_change {
            self.since_change = 0;
            self.drift_palette(rng);
        }

        let radius = self.sample_radius(rng);
        let color = self.sample_color(rng);
        let velocity = self.sample_velocity(rng);
        Point::new(self.position, radius, velocity, self.lifetime, color)
    }

    fn drift_palette<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let channel = Channel::ALL[rng.gen_range(0..Channel::ALL.len())];
        let value = rng.gen_range(DRIFT_MIN..=DRIFT_MAX);
        self.base_color.set_channel(channel, value);
        self.color_shifts += 1;
        debug!("palette drift: {:?} -> {} ({:?})", channel, value, self.base_color);
    }

    fn sample_radius<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        let lo = self.min_size.min(self.max_size);
        let hi = self.min_size.max(self.max_size);
        if !lo.is_finite() {
            return 0.0;
        }
        if hi > lo && hi.is_finite() {
            rng.gen_range(lo..=hi)
        } else {
            lo
        }
    }

    fn sample_color<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
        self.base_color.offset(
            rng.gen_range(0..=JITTER_MAX),
            rng.gen_range(0..=JITTER_MAX),
            rng.gen_range(0..=JITTER_MAX),
        )
    }

    fn sample_velocity<R: Rng + ?Sized>(&self, rng: &mut R) -> V {
        let base = self.initial_velocity;
        let jitter = self.velocity_jitter;
        V::from_fn(|axis| {
            let j = jitter.axis(axis).abs();
            let offset = if j > 0.0 && j.is_finite() {
                rng.gen_range(-j..=j)
            } else {
                0.0
            };
            base.axis(axis) + offset
        })
    }
}
