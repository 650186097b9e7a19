//! Intensity-driven emitter envelopes.
//!
//! An external signal (typically the loudness of an audio stream) is reduced
//! to a scalar activity factor per polling interval. The simulation never
//! computes that factor; it only offers an [`Envelope`] that maps it onto an
//! emitter's parameters before the next [`crate::Emitter::generate`]:
//!
//! | Parameter | Louder input |
//! |-----------|--------------|
//! | `lifetime` | shorter |
//! | `max_size` | larger |
//! | `time_to_change` | palette drifts more often |
//! | `velocity_jitter` | wider spray |
//! | spawn count | more points per emission |
//!
//! Every mapping starts from a [`Baseline`] captured once, so applying the
//! same factor twice gives the same emitter.

use crate::emitter::Emitter;
use crate::math::Vector;
use serde::{Deserialize, Serialize};

/// Gains mapping an activity factor onto emitter parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Envelope {
    /// `lifetime = base / (1 + lifetime_gain * f)`.
    pub lifetime_gain: f32,
    /// `max_size = base + size_gain * f`.
    pub size_gain: f32,
    /// `velocity_jitter = base * (1 + jitter_gain * f)`.
    pub jitter_gain: f32,
    /// `spawn_count = 1 + floor(spawn_gain * f)`.
    pub spawn_gain: f32,
    /// Factors are clamped to `[0, max_factor]`.
    pub max_factor: f32,
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            lifetime_gain: 1.0,
            size_gain: 20.0,
            jitter_gain: 1.0,
            spawn_gain: 2.0,
            max_factor: 4.0,
        }
    }
}

/// Emitter parameters as they were before any envelope touched them.
#[derive(Clone, Debug, PartialEq)]
pub struct Baseline<V: Vector> {
    pub lifetime: f32,
    pub max_size: f32,
    pub time_to_change: u32,
    pub velocity_jitter: V,
}

impl<V: Vector> Baseline<V> {
    pub fn capture(emitter: &Emitter<V>) -> Self {
        Self {
            lifetime: emitter.lifetime,
            max_size: emitter.max_size,
            time_to_change: emitter.time_to_change,
            velocity_jitter: emitter.velocity_jitter,
        }
    }
}

impl Envelope {
    /// Clamp a raw factor into range; non-finite input counts as silence.
    pub fn clamp_factor(&self, factor: f32) -> f32 {
        if factor.is_finite() {
            factor.clamp(0.0, self.max_factor.max(0.0))
        } else {
            0.0
        }
    }

    /// Retune `emitter` for `factor`, starting from `baseline`.
    pub fn apply<V: Vector>(&self, baseline: &Baseline<V>, emitter: &mut Emitter<V>, factor: f32) {
        let f = self.clamp_factor(factor);
        emitter.lifetime = baseline.lifetime / (1.0 + self.lifetime_gain.max(0.0) * f);
        emitter.max_size = baseline.max_size + self.size_gain * f;
        let ttc = (baseline.time_to_change as f32 / (1.0 + f)).floor() as u32;
        emitter.time_to_change = ttc.max(1);
        emitter.velocity_jitter = baseline.velocity_jitter * (1.0 + self.jitter_gain * f);
    }

    /// Points each emitter should produce per emission at `factor`.
    pub fn spawn_count(&self, factor: f32) -> usize {
        let f = self.clamp_factor(factor);
        ((self.spawn_gain.max(0.0) * f).floor() as usize).saturating_add(1)
    }
}
