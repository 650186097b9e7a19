//! Frame driver: emission cadence, capacity and step ordering.
//!
//! A [`Driver`] bundles what an external frame loop would otherwise wire by
//! hand: the world, the live swarm, the emitters, a clock and the random
//! source. Each [`Driver::frame`] keeps the one ordering the simulation
//! relies on:
//!
//! 1. retune emitters from the intensity factor (if an envelope is set)
//! 2. on emission ticks, collect new points from every emitter, skipping
//!    what does not fit under the capacity
//! 3. insert the batch
//! 4. run exactly one [`Swarm::step_by`]
//!
//! Emission and stepping never interleave.
//!
//! # Example
//!
//! ```
//! use pointswarm::{Driver, Emitter, World};
//! use glam::Vec2;
//!
//! let world = World::new(Vec2::new(1024.0, 700.0)).with_attraction(150.0);
//! let mut driver = Driver::seeded(world, Some(1))
//!     .with_emitter(Emitter::new(Vec2::new(170.0, 350.0), 120.0))
//!     .with_capacity(200);
//!
//! for _ in 0..10 {
//!     driver.frame(None);
//! }
//! assert_eq!(driver.swarm().total_spawned(), 10);
//! ```

use crate::clock::Clock;
use crate::emitter::Emitter;
use crate::math::Vector;
use crate::point::Point;
use crate::reactive::{Baseline, Envelope};
use crate::render::{PointInstance, Renderer};
use crate::swarm::{StepStats, Swarm};
use crate::world::World;
use log::{info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// What one [`Driver::frame`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Tick index of this frame (0-based).
    pub tick: u64,
    /// Timestep the step ran with (0 while paused).
    pub dt: f32,
    /// Points inserted before the step.
    pub emitted: usize,
    /// Emissions dropped because the swarm was full.
    pub skipped: usize,
    /// Step outcome; default while paused.
    pub step: StepStats,
}

/// Owns a complete simulation and advances it one frame at a time.
#[derive(Debug)]
pub struct Driver<V: Vector> {
    world: World<V>,
    swarm: Swarm<V>,
    emitters: Vec<Emitter<V>>,
    baselines: Vec<Baseline<V>>,
    envelope: Option<Envelope>,
    clock: Clock,
    rng: SmallRng,
    capacity: usize,
    emit_every: u32,
    at_capacity: bool,
}

impl<V: Vector> Driver<V> {
    /// A driver with no emitters, no capacity limit and emission every tick.
    pub fn new(world: World<V>, rng: SmallRng) -> Self {
        let clock = Clock::new(world.dt);
        Self {
            world,
            swarm: Swarm::new(),
            emitters: Vec::new(),
            baselines: Vec::new(),
            envelope: None,
            clock,
            rng,
            capacity: usize::MAX,
            emit_every: 1,
            at_capacity: false,
        }
    }

    /// Like [`Driver::new`], with a fixed seed or fresh entropy.
    pub fn seeded(world: World<V>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self::new(world, rng)
    }

    pub fn with_emitter(mut self, emitter: Emitter<V>) -> Self {
        self.add_emitter(emitter);
        self
    }

    /// Skip emission once the swarm holds `capacity` points.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Emit on every `ticks`-th frame (at least 1).
    pub fn with_emit_every(mut self, ticks: u32) -> Self {
        self.emit_every = ticks.max(1);
        self
    }

    pub fn with_envelope(mut self, envelope: Envelope) -> Self {
        self.envelope = Some(envelope);
        self
    }

    /// Add an emitter; its current parameters become its envelope baseline.
    pub fn add_emitter(&mut self, emitter: Emitter<V>) {
        self.baselines.push(Baseline::capture(&emitter));
        self.emitters.push(emitter);
    }

    /// Re-capture every emitter's envelope baseline from its current state.
    ///
    /// Call after editing emitters through [`Driver::emitters_mut`].
    pub fn rebase(&mut self) {
        self.baselines = self.emitters.iter().map(Baseline::capture).collect();
    }

    pub fn set_envelope(&mut self, envelope: Option<Envelope>) {
        self.envelope = envelope;
    }

    #[inline]
    pub fn world(&self) -> &World<V> {
        &self.world
    }

    #[inline]
    pub fn world_mut(&mut self) -> &mut World<V> {
        &mut self.world
    }

    #[inline]
    pub fn swarm(&self) -> &Swarm<V> {
        &self.swarm
    }

    #[inline]
    pub fn emitters(&self) -> &[Emitter<V>] {
        &self.emitters
    }

    #[inline]
    pub fn emitters_mut(&mut self) -> &mut [Emitter<V>] {
        &mut self.emitters
    }

    #[inline]
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    #[inline]
    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn emit_every(&self) -> u32 {
        self.emit_every
    }

    /// Advance one frame. `intensity` is the latest activity factor, if any.
    pub fn frame(&mut self, intensity: Option<f32>) -> FrameReport {
        let tick = self.clock.frame();
        if self.clock.is_paused() {
            self.clock.advance();
            return FrameReport {
                tick,
                ..FrameReport::default()
            };
        }

        let per_emitter = self.retune(intensity);

        let mut report = FrameReport {
            tick,
            ..FrameReport::default()
        };
        if tick % u64::from(self.emit_every) == 0 {
            let (batch, skipped) = self.collect_emissions(per_emitter);
            report.emitted = batch.len();
            report.skipped = skipped;
            self.swarm.extend(batch);
        }

        report.dt = self.clock.advance();
        report.step = self.swarm.step_by(&self.world, report.dt);
        report
    }

    /// Apply the envelope, returning how many points each emitter makes.
    fn retune(&mut self, intensity: Option<f32>) -> usize {
        let (Some(envelope), Some(factor)) = (self.envelope, intensity) else {
            return 1;
        };
        for (emitter, baseline) in self.emitters.iter_mut().zip(&self.baselines) {
            envelope.apply(baseline, emitter, factor);
        }
        envelope.spawn_count(factor)
    }

    fn collect_emissions(&mut self, per_emitter: usize) -> (Vec<Point<V>>, usize) {
        let room = self.capacity.saturating_sub(self.swarm.len());
        let wanted = self.emitters.len().saturating_mul(per_emitter);
        let mut batch = Vec::with_capacity(room.min(wanted));
        let mut skipped: usize = 0;

        for emitter in &mut self.emitters {
            let take = per_emitter.min(room - batch.len());
            skipped = skipped.saturating_add(per_emitter - take);
            for _ in 0..take {
                batch.push(emitter.generate(&mut self.rng));
            }
        }

        if skipped > 0 && !self.at_capacity {
            warn!("swarm at capacity ({}), skipping emission", self.capacity);
            self.at_capacity = true;
        } else if skipped == 0 && self.at_capacity {
            info!("swarm below capacity again ({} live)", self.swarm.len());
            self.at_capacity = false;
        }
        (batch, skipped)
    }

    /// Render snapshot of the current live set.
    pub fn snapshot(&self) -> Vec<PointInstance> {
        self.swarm.snapshot()
    }

    /// Hand the current frame to `renderer`.
    pub fn render_to<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        renderer.render(&self.swarm.snapshot());
    }

    /// Change the world bounds and tell `renderer` about it.
    pub fn resize<R: Renderer + ?Sized>(&mut self, extent: V, renderer: &mut R) {
        self.world.resize(extent);
        renderer.resize(self.world.width(), self.world.height(), self.world.depth());
    }
}
