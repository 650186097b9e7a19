//! Simulation clock.
//!
//! Tracks ticks and simulated time for a driver. Time here is simulated,
//! not wall-clock: each [`Clock::advance`] hands out the timestep for one
//! tick, which is the base timestep, optionally overridden for a single
//! tick (intensity-driven drivers vary it) and multiplied by a time scale.
//!
//! # Example
//!
//! ```
//! use pointswarm::clock::Clock;
//!
//! let mut clock = Clock::new(0.1);
//! clock.set_time_scale(2.0);
//! assert_eq!(clock.advance(), 0.2);
//!
//! clock.pause();
//! assert_eq!(clock.advance(), 0.0);
//! assert_eq!(clock.frame(), 1);
//! ```

/// Tick counter and timestep source.
#[derive(Clone, Debug, PartialEq)]
pub struct Clock {
    /// Timestep used when no override is set.
    base_dt: f32,
    /// Timestep for the next tick only.
    dt_override: Option<f32>,
    /// Multiplier applied to every timestep (1.0 = normal speed).
    time_scale: f32,
    /// Ticks advanced while running.
    frame: u64,
    /// Simulated time accumulated while running.
    elapsed: f32,
    /// Timestep handed out by the last advance.
    delta: f32,
    paused: bool,
}

impl Clock {
    /// A running clock stepping by `base_dt`.
    pub fn new(base_dt: f32) -> Self {
        Self {
            base_dt,
            dt_override: None,
            time_scale: 1.0,
            frame: 0,
            elapsed: 0.0,
            delta: 0.0,
            paused: false,
        }
    }

    /// Move to the next tick and return its timestep.
    ///
    /// While paused this returns 0 and neither the frame count nor the
    /// elapsed time move. A pending override is consumed either way.
    pub fn advance(&mut self) -> f32 {
        let raw = self.dt_override.take().unwrap_or(self.base_dt);
        if self.paused {
            self.delta = 0.0;
            return 0.0;
        }

        self.delta = raw * self.time_scale;
        self.elapsed += self.delta;
        self.frame += 1;
        self.delta
    }

    /// Ticks advanced so far.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Simulated time so far.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Timestep of the last tick.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta
    }

    #[inline]
    pub fn base_dt(&self) -> f32 {
        self.base_dt
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn set_base_dt(&mut self, dt: f32) {
        self.base_dt = dt;
    }

    /// Use `dt` instead of the base timestep for the next tick.
    pub fn override_next(&mut self, dt: f32) {
        self.dt_override = Some(dt);
    }

    /// Set the speed multiplier. Negative values clamp to 0.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Back to tick zero, keeping base timestep and time scale.
    pub fn reset(&mut self) {
        self.frame = 0;
        self.elapsed = 0.0;
        self.delta = 0.0;
        self.dt_override = None;
        self.paused = false;
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(0.1)
    }
}
