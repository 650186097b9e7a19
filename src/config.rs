//! Serializable simulation configuration.
//!
//! A [`SwarmConfig`] is everything a driver reads once at startup: world
//! size, global parameters, the particle cap, emission cadence and the
//! emitter list. It round-trips through JSON and turns into a ready
//! [`Driver`] for either dimension with [`SwarmConfig::build`].
//!
//! Every field has a default, so a config file only needs to name what it
//! changes:
//!
//! ```
//! use pointswarm::SwarmConfig;
//! use glam::Vec2;
//!
//! let config = SwarmConfig::from_json(r#"{ "width": 640, "height": 480, "capacity": 40 }"#)
//!     .unwrap();
//! let driver = config.build::<Vec2>().unwrap();
//! assert_eq!(driver.capacity(), 40);
//! assert_eq!(driver.emitters().len(), 2);
//! ```

use crate::driver::Driver;
use crate::emitter::Emitter;
use crate::error::ConfigError;
use crate::math::{Color, Vector};
use crate::reactive::Envelope;
use crate::world::{Decay, World};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Where an emitter sits.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Origin {
    /// Fixed world coordinates.
    Absolute { position: [f32; 3] },
    /// Fractions of the world extent per axis (0.5 = center).
    Relative { fraction: [f32; 3] },
}

impl Origin {
    /// World coordinates for a world of the given extent.
    pub fn resolve(&self, extent: [f32; 3]) -> [f32; 3] {
        match *self {
            Origin::Absolute { position } => position,
            Origin::Relative { fraction } => [
                fraction[0] * extent[0],
                fraction[1] * extent[1],
                fraction[2] * extent[2],
            ],
        }
    }
}

impl Default for Origin {
    fn default() -> Self {
        Origin::Relative {
            fraction: [0.5, 0.5, 0.5],
        }
    }
}

/// One emitter entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    pub origin: Origin,
    pub velocity: [f32; 3],
    pub velocity_jitter: [f32; 3],
    pub min_size: f32,
    pub max_size: f32,
    pub lifetime: f32,
    pub time_to_change: u32,
    pub base_color: Color,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            origin: Origin::default(),
            velocity: [0.0; 3],
            velocity_jitter: [20.0, 5.0, 5.0],
            min_size: 5.0,
            max_size: 30.0,
            lifetime: 120.0,
            time_to_change: 20,
            base_color: Color::new(120, 120, 120),
        }
    }
}

impl EmitterConfig {
    /// Emitter placed at `fraction` of the world extent, other fields default.
    pub fn relative(fraction: [f32; 3]) -> Self {
        Self {
            origin: Origin::Relative { fraction },
            ..Self::default()
        }
    }

    fn validate(&self, index: usize) -> Result<(), ConfigError> {
        if !(self.min_size > 0.0) {
            return Err(ConfigError::invalid(
                "emitters.min_size",
                format!("emitter {index}: must be positive, got {}", self.min_size),
            ));
        }
        if !self.max_size.is_finite() {
            return Err(ConfigError::invalid(
                "emitters.max_size",
                format!("emitter {index}: must be finite, got {}", self.max_size),
            ));
        }
        if !(self.max_size >= self.min_size) {
            return Err(ConfigError::invalid(
                "emitters.max_size",
                format!(
                    "emitter {index}: {} is below min_size {}",
                    self.max_size, self.min_size
                ),
            ));
        }
        if !(self.lifetime > 0.0 && self.lifetime.is_finite()) {
            return Err(ConfigError::invalid(
                "emitters.lifetime",
                format!("emitter {index}: must be positive, got {}", self.lifetime),
            ));
        }
        let vectors = [self.velocity, self.velocity_jitter];
        if vectors.iter().flatten().any(|v| !v.is_finite()) {
            return Err(ConfigError::invalid(
                "emitters.velocity",
                format!("emitter {index}: velocity values must be finite"),
            ));
        }
        Ok(())
    }

    fn to_emitter<V: Vector>(&self, extent: [f32; 3]) -> Emitter<V> {
        Emitter::new(V::from_array3(self.origin.resolve(extent)), self.lifetime)
            .with_velocity(V::from_array3(self.velocity))
            .with_velocity_jitter(V::from_array3(self.velocity_jitter))
            .with_size(self.min_size, self.max_size)
            .with_time_to_change(self.time_to_change)
            .with_base_color(self.base_color)
    }
}

/// Complete simulation configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmConfig {
    pub name: String,
    pub width: f32,
    pub height: f32,
    /// Ignored by flat swarms.
    pub depth: f32,
    pub dt: f32,
    pub viscosity: f32,
    pub attraction: f32,
    pub gravity: [f32; 3],
    /// Emission is skipped while the swarm holds this many points.
    pub capacity: usize,
    /// Ticks between emissions.
    pub emit_every: u32,
    pub decay: Decay,
    pub emitters: Vec<EmitterConfig>,
    /// Intensity mapping; without it the intensity signal is ignored.
    pub envelope: Option<Envelope>,
    /// Fixed RNG seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            name: "twin emitters".into(),
            width: 1024.0,
            height: 700.0,
            depth: 60.0,
            dt: 0.1,
            viscosity: 0.00001,
            attraction: 150.0,
            gravity: [0.0; 3],
            capacity: 400,
            emit_every: 7,
            decay: Decay::default(),
            emitters: vec![
                EmitterConfig::relative([1.0 / 6.0, 0.5, 0.5]),
                EmitterConfig::relative([5.0 / 6.0, 0.5, 0.5]),
            ],
            envelope: None,
            seed: None,
        }
    }
}

impl SwarmConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SwarmConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// World extent as `[width, height, depth]`.
    pub fn extent(&self) -> [f32; 3] {
        [self.width, self.height, self.depth]
    }

    /// Check every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("width", self.width), ("height", self.height)] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::invalid(
                    field,
                    format!("must be positive, got {value}"),
                ));
            }
        }
        if !(self.depth >= 0.0 && self.depth.is_finite()) {
            return Err(ConfigError::invalid(
                "depth",
                format!("must not be negative, got {}", self.depth),
            ));
        }
        if !(self.dt > 0.0 && self.dt.is_finite()) {
            return Err(ConfigError::invalid(
                "dt",
                format!("must be positive, got {}", self.dt),
            ));
        }
        if !(self.viscosity >= 0.0) {
            return Err(ConfigError::invalid(
                "viscosity",
                format!("must not be negative, got {}", self.viscosity),
            ));
        }
        if !self.attraction.is_finite() || self.gravity.iter().any(|g| !g.is_finite()) {
            return Err(ConfigError::invalid(
                "attraction",
                "attraction and gravity must be finite",
            ));
        }
        if self.capacity == 0 {
            return Err(ConfigError::invalid("capacity", "must be at least 1"));
        }
        if self.emit_every == 0 {
            return Err(ConfigError::invalid("emit_every", "must be at least 1"));
        }
        if let Decay::Crowded { step, capacity, .. } = self.decay {
            if capacity == 0 || !(step >= 0.0) {
                return Err(ConfigError::invalid(
                    "decay",
                    "crowded decay needs a capacity and a non-negative step",
                ));
            }
        }
        if let Some(envelope) = &self.envelope {
            validate_envelope(envelope)?;
        }
        for (index, emitter) in self.emitters.iter().enumerate() {
            emitter.validate(index)?;
        }
        Ok(())
    }

    /// Validate and build a driver of dimension `V`.
    pub fn build<V: Vector>(&self) -> Result<Driver<V>, ConfigError> {
        self.validate()?;

        let extent = self.extent();
        let world = World::new(V::from_array3(extent))
            .with_dt(self.dt)
            .with_viscosity(self.viscosity)
            .with_attraction(self.attraction)
            .with_gravity(V::from_array3(self.gravity))
            .with_decay(self.decay);

        let mut driver = Driver::seeded(world, self.seed)
            .with_capacity(self.capacity)
            .with_emit_every(self.emit_every);
        for emitter in &self.emitters {
            driver.add_emitter(emitter.to_emitter(extent));
        }
        driver.set_envelope(self.envelope);
        Ok(driver)
    }
}

fn validate_envelope(envelope: &Envelope) -> Result<(), ConfigError> {
    let gains = [
        ("envelope.lifetime_gain", envelope.lifetime_gain),
        ("envelope.size_gain", envelope.size_gain),
        ("envelope.jitter_gain", envelope.jitter_gain),
        ("envelope.spawn_gain", envelope.spawn_gain),
        ("envelope.max_factor", envelope.max_factor),
    ];
    for (field, value) in gains {
        if !(value >= 0.0 && value.is_finite()) {
            return Err(ConfigError::invalid(
                field,
                format!("must be finite and not negative, got {value}"),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};

    #[test]
    fn test_default_is_valid() {
        assert!(SwarmConfig::default().validate().is_ok());
    }

    #[test]
    fn test_relative_origin() {
        let origin = Origin::Relative {
            fraction: [0.25, 0.5, 1.0],
        };
        assert_eq!(origin.resolve([100.0, 60.0, 10.0]), [25.0, 30.0, 10.0]);
    }

    #[test]
    fn test_build_places_emitters() {
        let driver = SwarmConfig::default().build::<Vec2>().unwrap();
        let emitters = driver.emitters();
        assert_eq!(emitters.len(), 2);
        assert!((emitters[0].position.x - 1024.0 / 6.0).abs() < 1e-3);
        assert_eq!(emitters[0].position.y, 350.0);
        assert_eq!(emitters[0].velocity_jitter, Vec2::new(20.0, 5.0));
    }

    #[test]
    fn test_build_3d_uses_depth() {
        let driver = SwarmConfig::default().build::<Vec3>().unwrap();
        assert_eq!(driver.world().depth(), 60.0);
        assert_eq!(driver.emitters()[1].position.z, 30.0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = SwarmConfig::from_json(
            r#"{
                "dt": 0.05,
                "decay": { "kind": "crowded", "step": 1.0, "capacity": 100, "pressure": 0.5 },
                "emitters": [{ "origin": { "kind": "absolute", "position": [10, 20, 0] } }]
            }"#,
        )
        .unwrap();
        assert_eq!(config.dt, 0.05);
        assert_eq!(config.width, 1024.0);
        assert_eq!(config.emitters.len(), 1);
        assert_eq!(config.emitters[0].lifetime, 120.0);
        assert!(matches!(config.decay, Decay::Crowded { capacity: 100, .. }));
    }

    #[test]
    fn test_rejects_bad_values() {
        let bad = [
            SwarmConfig {
                width: 0.0,
                ..Default::default()
            },
            SwarmConfig {
                dt: -0.1,
                ..Default::default()
            },
            SwarmConfig {
                capacity: 0,
                ..Default::default()
            },
            SwarmConfig {
                emitters: vec![EmitterConfig {
                    min_size: 10.0,
                    max_size: 5.0,
                    ..Default::default()
                }],
                ..Default::default()
            },
            SwarmConfig {
                emitters: vec![EmitterConfig {
                    lifetime: 0.0,
                    ..Default::default()
                }],
                ..Default::default()
            },
        ];
        for config in bad {
            assert!(matches!(
                config.validate(),
                Err(ConfigError::Invalid { .. })
            ));
        }
    }

    #[test]
    fn test_rejects_overflowing_sizes() {
        let result = SwarmConfig::from_json(r#"{ "emitters": [{ "min_size": 5, "max_size": 1e39 }] }"#);
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                field: "emitters.max_size",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_bad_envelope() {
        for json in [
            r#"{ "envelope": { "jitter_gain": 1e39 } }"#,
            r#"{ "envelope": { "size_gain": -1.0 } }"#,
            r#"{ "envelope": { "max_factor": 1e40 } }"#,
        ] {
            assert!(
                matches!(SwarmConfig::from_json(json), Err(ConfigError::Invalid { .. })),
                "{json}"
            );
        }
    }

    #[test]
    fn test_huge_gains_emit_without_panicking() {
        let config = SwarmConfig {
            seed: Some(1),
            emit_every: 1,
            envelope: Some(Envelope {
                jitter_gain: 1e38,
                size_gain: 1e38,
                ..Envelope::default()
            }),
            ..Default::default()
        };
        let mut driver = config.build::<Vec2>().unwrap();
        let report = driver.frame(Some(4.0));
        assert!(report.emitted > 0);
        for p in driver.swarm().points() {
            assert!(p.radius().is_finite());
            assert!(p.velocity.is_finite());
        }
    }

    #[test]
    fn test_parse_error_is_reported() {
        assert!(matches!(
            SwarmConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swarm.json");
        let config = SwarmConfig {
            seed: Some(9),
            envelope: Some(Envelope::default()),
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(SwarmConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            SwarmConfig::load("/nonexistent/swarm.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
