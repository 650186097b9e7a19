//! Point particles and their per-step behaviors.
//!
//! A [`Point`] is a circular body with position, velocity, radius, a mass
//! derived from the radius, a lifetime countdown and a fixed color. It knows
//! how to move, take a force, clamp against one world axis, and resolve an
//! elastic collision with another point. Deciding *when* to do each of these
//! is the job of [`crate::Swarm::step`].

use crate::math::{Color, Vector};
use log::debug;
use serde::{Deserialize, Serialize};

/// Radius that yields one unit of mass.
pub const RADIUS_PER_MASS: f32 = 20.0;

/// Mass floor, so small points never take unbounded accelerations.
pub const MIN_MASS: f32 = 0.5;

/// Fraction of closing speed kept after a collision.
pub const RESTITUTION: f32 = 0.8;

/// Stable identifier assigned when a point enters a [`crate::Swarm`].
///
/// Used by renderers to key their own per-point handles. Collision
/// self-exclusion does not rely on it.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PointId(pub u64);

/// Outcome of [`Point::bounce_from`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Centers coincide (or the bodies merely touch); nothing was changed.
    Degenerate,
    /// Bodies were pushed apart but were already moving away from each other.
    Separating,
    /// Bodies were pushed apart and exchanged an impulse.
    Impulse,
}

/// A simulated circular particle.
#[derive(Clone, Debug, PartialEq)]
pub struct Point<V: Vector> {
    /// World-space center.
    pub position: V,
    /// World units per unit of simulated time.
    pub velocity: V,
    /// Remaining life; the point is retired once this reaches zero.
    pub lifetime: f32,
    /// Assigned at spawn and fixed for the point's life.
    pub color: Color,
    radius: f32,
    mass: f32,
    max_lifetime: f32,
    pub(crate) id: PointId,
}

impl<V: Vector> Point<V> {
    /// Create a point. `lifetime` also becomes the point's `max_lifetime`.
    pub fn new(position: V, radius: f32, velocity: V, lifetime: f32, color: Color) -> Self {
        Self {
            position,
            velocity,
            lifetime,
            color,
            radius,
            mass: mass_for_radius(radius),
            max_lifetime: lifetime,
            id: PointId::default(),
        }
    }

    /// Identifier given by the owning swarm (`PointId(0)` before insertion).
    #[inline]
    pub fn id(&self) -> PointId {
        self.id
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// `radius / 20`, floored at [`MIN_MASS`].
    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    #[inline]
    pub fn max_lifetime(&self) -> f32 {
        self.max_lifetime
    }

    /// `lifetime / max_lifetime` clamped to 0.0-1.0; renderers use it as alpha.
    pub fn life_ratio(&self) -> f32 {
        if self.max_lifetime > 0.0 {
            (self.lifetime / self.max_lifetime).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.lifetime > 0.0
    }

    /// Count lifetime down by `step`. Negative steps are ignored.
    pub fn age(&mut self, step: f32) {
        self.lifetime -= step.max(0.0);
    }

    /// Linear integration: `position += velocity * dt`.
    pub fn move_by(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }

    /// Apply a force: `velocity += force / mass`.
    pub fn accelerate(&mut self, force: V) {
        self.velocity += force / self.mass;
    }

    /// Whether the point touches or crosses either wall of `axis` in a world
    /// of the given `extent`. When it does, the position on that axis is
    /// clamped to `[radius, extent - radius]`.
    ///
    /// Calling this again without moving returns the same answer and leaves
    /// the clamped position unchanged.
    pub fn exiting(&mut self, axis: usize, extent: f32) -> bool {
        let at = self.position.axis(axis);
        let low = at <= self.radius;
        let high = at >= extent - self.radius;
        if low {
            self.position.set_axis(axis, self.radius);
        } else if high {
            self.position.set_axis(axis, extent - self.radius);
        }
        low || high
    }

    /// Reverse the velocity component along `axis`.
    pub fn bounce(&mut self, axis: usize) {
        let v = self.velocity.axis(axis);
        self.velocity.set_axis(axis, -v);
    }

    pub fn exiting_x(&mut self, width: f32) -> bool {
        self.exiting(0, width)
    }

    pub fn exiting_y(&mut self, height: f32) -> bool {
        self.exiting(1, height)
    }

    pub fn bounce_x(&mut self) {
        self.bounce(0);
    }

    pub fn bounce_y(&mut self) {
        self.bounce(1);
    }

    /// Always `false` for flat swarms.
    pub fn exiting_z(&mut self, depth: f32) -> bool {
        V::DIM >= 3 && self.exiting(2, depth)
    }

    pub fn bounce_z(&mut self) {
        if V::DIM >= 3 {
            self.bounce(2);
        }
    }

    /// Whether `other` is a different point whose disc overlaps this one.
    ///
    /// Identity is by address, so two distinct points with identical fields
    /// are still tested against each other.
    pub fn check_collision(&self, other: &Point<V>) -> bool {
        if std::ptr::eq(self, other) {
            return false;
        }
        (self.position - other.position).length() < self.radius + other.radius
    }

    /// Resolve an overlap with `other`.
    ///
    /// Both points are first pushed apart along the center line, weighted by
    /// inverse mass. If they are still closing, an impulse with
    /// [`RESTITUTION`] is then exchanged along the same normal.
    pub fn bounce_from(&mut self, other: &mut Point<V>) -> Resolution {
        let delta = self.position - other.position;
        let d = delta.length();
        let Some(normal) = delta.try_normalize() else {
            debug!("coincident points {:?} and {:?}, skipping", self.id, other.id);
            return Resolution::Degenerate;
        };

        // minimum translation distance
        let mtd = normal * (self.radius + other.radius - d);
        let Some(normal) = mtd.try_normalize() else {
            return Resolution::Degenerate;
        };

        let im1 = 1.0 / self.mass;
        let im2 = 1.0 / other.mass;
        let im_sum = im1 + im2;

        self.position += mtd * (im1 / im_sum);
        other.position -= mtd * (im2 / im_sum);

        let vn = (self.velocity - other.velocity).dot(normal);
        if vn > 0.0 {
            return Resolution::Separating;
        }

        let i = -(1.0 + RESTITUTION) * vn / im_sum;
        let impulse = normal * i;
        self.velocity += impulse * im1;
        other.velocity -= impulse * im2;
        Resolution::Impulse
    }
}

/// Mass for a body of the given radius.
pub fn mass_for_radius(radius: f32) -> f32 {
    (radius / RADIUS_PER_MASS).max(MIN_MASS)
}
