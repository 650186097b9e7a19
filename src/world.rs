//! World bounds and global simulation parameters.
//!
//! The [`World`] is configuration handed to every [`crate::Swarm::step`]:
//! it owns no particles. It holds the box the swarm lives in, the
//! integration timestep and the coefficients of the force model.
//!
//! # Force model
//!
//! Each tick a point receives one summed force:
//!
//! | Term | Formula |
//! |------|---------|
//! | drag | `velocity * radius * PI * -6 * viscosity` |
//! | attraction | `(position - center) / d² * -attraction` |
//! | gravity | `gravity * dt` |

use crate::math::Vector;
use crate::point::Point;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// How fast lifetimes count down.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Decay {
    /// Every point loses `step` per tick.
    Constant {
        step: f32,
    },
    /// The step grows with the population:
    /// `step * (1 + pressure * population / capacity)`.
    Crowded {
        step: f32,
        capacity: usize,
        pressure: f32,
    },
}

impl Decay {
    /// Lifetime lost by each point this tick for a live set of `population`.
    pub fn step_for(&self, population: usize) -> f32 {
        match *self {
            Decay::Constant { step } => step,
            Decay::Crowded {
                step,
                capacity,
                pressure,
            } => {
                let fill = population as f32 / capacity.max(1) as f32;
                step * (1.0 + pressure.max(0.0) * fill)
            }
        }
    }
}

impl Default for Decay {
    fn default() -> Self {
        Decay::Constant { step: 1.0 }
    }
}

/// Bounds and global parameters for a swarm of dimension `V`.
#[derive(Clone, Debug, PartialEq)]
pub struct World<V: Vector> {
    /// Width, height and (for 3D) depth of the box `[0, extent]`.
    pub extent: V,
    /// Integration timestep.
    pub dt: f32,
    /// Drag coefficient.
    pub viscosity: f32,
    /// Strength of the pull toward the world center.
    pub attraction: f32,
    /// Uniform acceleration, zero unless configured.
    pub gravity: V,
    /// Lifetime countdown policy.
    pub decay: Decay,
}

impl<V: Vector> World<V> {
    /// A world of the given size with no forces and `dt = 0.1`.
    pub fn new(extent: V) -> Self {
        Self {
            extent,
            dt: 0.1,
            viscosity: 0.0,
            attraction: 0.0,
            gravity: V::ZERO,
            decay: Decay::default(),
        }
    }

    pub fn with_dt(mut self, dt: f32) -> Self {
        self.dt = dt;
        self
    }

    pub fn with_viscosity(mut self, viscosity: f32) -> Self {
        self.viscosity = viscosity;
        self
    }

    pub fn with_attraction(mut self, attraction: f32) -> Self {
        self.attraction = attraction;
        self
    }

    pub fn with_gravity(mut self, gravity: V) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_decay(mut self, decay: Decay) -> Self {
        self.decay = decay;
        self
    }

    /// Replace the bounds, e.g. after the render surface was resized.
    pub fn resize(&mut self, extent: V) {
        self.extent = extent;
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.extent.axis(0)
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.extent.axis(1)
    }

    /// Depth of the box, `0.0` for flat worlds.
    #[inline]
    pub fn depth(&self) -> f32 {
        if V::DIM >= 3 {
            self.extent.axis(2)
        } else {
            0.0
        }
    }

    #[inline]
    pub fn center(&self) -> V {
        self.extent * 0.5
    }

    /// Simplified Stokes drag opposing the point's velocity.
    pub fn drag(&self, point: &Point<V>) -> V {
        point.velocity * (point.radius() * PI * -6.0 * self.viscosity)
    }

    /// Inverse-square pull toward the world center.
    ///
    /// Zero for a point sitting exactly on the center.
    pub fn attraction_force(&self, point: &Point<V>) -> V {
        let offset = point.position - self.center();
        let d2 = offset.length_squared();
        if d2 <= f32::EPSILON || !d2.is_finite() {
            return V::ZERO;
        }
        offset * (1.0 / d2) * -self.attraction
    }

    /// Sum of every force acting on `point` this tick.
    pub fn net_force(&self, point: &Point<V>, dt: f32) -> V {
        self.gravity * dt + self.drag(point) + self.attraction_force(point)
    }

    /// Clamp `point` into the box and reverse its velocity on every axis
    /// where it touched a wall. Axes are handled independently.
    pub fn contain(&self, point: &mut Point<V>) {
        for axis in 0..V::DIM {
            if point.exiting(axis, self.extent.axis(axis)) {
                point.bounce(axis);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Color;
    use glam::{Vec2, Vec3};

    fn at(x: f32, y: f32) -> Point<Vec2> {
        Point::new(Vec2::new(x, y), 10.0, Vec2::ZERO, 10.0, Color::default())
    }

    #[test]
    fn test_center_and_depth() {
        let flat = World::new(Vec2::new(100.0, 50.0));
        assert_eq!(flat.center(), Vec2::new(50.0, 25.0));
        assert_eq!(flat.depth(), 0.0);

        let deep = World::new(Vec3::new(100.0, 50.0, 60.0));
        assert_eq!(deep.depth(), 60.0);
    }

    #[test]
    fn test_drag_opposes_velocity() {
        let world = World::new(Vec2::new(100.0, 100.0)).with_viscosity(0.01);
        let mut p = at(50.0, 50.0);
        p.velocity = Vec2::new(2.0, 0.0);
        let drag = world.drag(&p);
        assert!(drag.x < 0.0);
        assert!((drag.x - 2.0 * 10.0 * PI * -6.0 * 0.01).abs() < 1e-5);
        assert_eq!(drag.y, 0.0);
    }

    #[test]
    fn test_attraction_points_to_center() {
        let world = World::new(Vec2::new(100.0, 100.0)).with_attraction(150.0);
        let f = world.attraction_force(&at(60.0, 50.0));
        // d = 10: magnitude attraction / d
        assert!((f.x - -15.0).abs() < 1e-5);
        assert_eq!(f.y, 0.0);
    }

    #[test]
    fn test_attraction_at_center_is_zero() {
        let world = World::new(Vec2::new(100.0, 100.0)).with_attraction(150.0);
        assert_eq!(world.attraction_force(&at(50.0, 50.0)), Vec2::ZERO);
    }

    #[test]
    fn test_net_force_includes_gravity_times_dt() {
        let world = World::new(Vec2::new(100.0, 100.0)).with_gravity(Vec2::new(0.0, -9.8));
        let f = world.net_force(&at(50.0, 50.0), 0.1);
        assert!((f.y - -0.98).abs() < 1e-5);
    }

    #[test]
    fn test_contain_bounces_each_axis() {
        let world = World::new(Vec2::new(100.0, 100.0));
        let mut p = at(2.0, 99.0);
        p.velocity = Vec2::new(-1.0, 3.0);
        world.contain(&mut p);
        assert_eq!(p.position, Vec2::new(10.0, 90.0));
        assert_eq!(p.velocity, Vec2::new(1.0, -3.0));
    }

    #[test]
    fn test_crowded_decay_grows_with_population() {
        let decay = Decay::Crowded {
            step: 1.0,
            capacity: 100,
            pressure: 2.0,
        };
        assert_eq!(decay.step_for(0), 1.0);
        assert_eq!(decay.step_for(50), 2.0);
        assert_eq!(decay.step_for(100), 3.0);
        assert_eq!(Decay::default().step_for(1000), 1.0);
    }
}
