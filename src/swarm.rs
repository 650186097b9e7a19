//! The live set of points and the per-tick simulation step.
//!
//! # Step order
//!
//! One call to [`Swarm::step`] runs these phases over the whole live set:
//!
//! 1. integrate: `move_by(dt)`, then one `accelerate` with the summed force
//! 2. walls: clamp and reverse on every axis independently
//! 3. collisions: every ordered pair `(p, q)`, `p != q`, brute force
//! 4. aging: every lifetime counts down by the world's decay step
//! 5. compaction: expired points are dropped, order of survivors is kept
//!
//! Nothing is removed until every other phase has finished, so collision
//! tests never see the collection change under them.

use crate::math::Vector;
use crate::point::{Point, PointId, Resolution};
use crate::render::PointInstance;
use crate::world::World;
use log::trace;

/// What happened during one [`Swarm::step`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Ordered pairs found overlapping.
    pub contacts: usize,
    /// Contacts that exchanged an impulse.
    pub impulses: usize,
    /// Contacts skipped because the centers coincided.
    pub degenerate: usize,
    /// Points removed at the end of the step.
    pub retired: usize,
}

/// Owner of every live point.
#[derive(Clone, Debug)]
pub struct Swarm<V: Vector> {
    points: Vec<Point<V>>,
    next_id: u64,
    spawned: u64,
    retired: u64,
}

impl<V: Vector> Swarm<V> {
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            next_id: 1,
            spawned: 0,
            retired: 0,
        }
    }

    /// Empty swarm with room for `capacity` points before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
            ..Self::new()
        }
    }

    /// Take ownership of a freshly spawned point and give it an id.
    pub fn insert(&mut self, mut point: Point<V>) -> PointId {
        let id = PointId(self.next_id);
        self.next_id += 1;
        self.spawned += 1;
        point.id = id;
        self.points.push(point);
        id
    }

    /// Insert every point from `points`, in order.
    pub fn extend(&mut self, points: impl IntoIterator<Item = Point<V>>) {
        for point in points {
            self.insert(point);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Live points in insertion order.
    #[inline]
    pub fn points(&self) -> &[Point<V>] {
        &self.points
    }

    /// Mutable access for drivers that perturb points between steps.
    #[inline]
    pub fn points_mut(&mut self) -> &mut [Point<V>] {
        &mut self.points
    }

    pub fn get(&self, id: PointId) -> Option<&Point<V>> {
        self.points.iter().find(|p| p.id == id)
    }

    /// Points ever inserted.
    #[inline]
    pub fn total_spawned(&self) -> u64 {
        self.spawned
    }

    /// Points ever removed by aging.
    #[inline]
    pub fn total_retired(&self) -> u64 {
        self.retired
    }

    /// Drop every live point. Counters and id sequence are kept.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Advance one tick using the world's own timestep.
    pub fn step(&mut self, world: &World<V>) -> StepStats {
        self.step_by(world, world.dt)
    }

    /// Advance one tick with an explicit timestep.
    pub fn step_by(&mut self, world: &World<V>, dt: f32) -> StepStats {
        for point in &mut self.points {
            point.move_by(dt);
            let force = world.net_force(point, dt);
            point.accelerate(force);
            world.contain(point);
        }

        let mut stats = self.resolve_collisions();

        let decay = world.decay.step_for(self.points.len());
        for point in &mut self.points {
            point.age(decay);
        }

        let before = self.points.len();
        self.points.retain(Point::is_alive);
        stats.retired = before - self.points.len();
        self.retired += stats.retired as u64;

        trace!(
            "step: {} live, {} contacts, {} retired",
            self.points.len(),
            stats.contacts,
            stats.retired
        );
        stats
    }

    /// Brute-force pass over every ordered pair.
    fn resolve_collisions(&mut self) -> StepStats {
        let mut stats = StepStats::default();
        let n = self.points.len();
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let (p, q) = pair_mut(&mut self.points, i, j);
                if !p.check_collision(q) {
                    continue;
                }
                stats.contacts += 1;
                match p.bounce_from(q) {
                    Resolution::Impulse => stats.impulses += 1,
                    Resolution::Degenerate => stats.degenerate += 1,
                    Resolution::Separating => {}
                }
            }
        }
        stats
    }

    /// Render snapshot of the live set, in order.
    pub fn snapshot(&self) -> Vec<PointInstance> {
        self.points.iter().map(PointInstance::from_point).collect()
    }
}

impl<V: Vector> Default for Swarm<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Two distinct mutable elements of one slice.
fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(i, j);
    if i < j {
        let (head, tail) = items.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = items.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Color;
    use crate::world::Decay;
    use glam::Vec2;

    fn world() -> World<Vec2> {
        World::new(Vec2::new(200.0, 200.0)).with_dt(1.0)
    }

    fn point(x: f32, y: f32, lifetime: f32) -> Point<Vec2> {
        Point::new(Vec2::new(x, y), 5.0, Vec2::ZERO, lifetime, Color::default())
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let mut swarm = Swarm::new();
        let a = swarm.insert(point(20.0, 20.0, 5.0));
        let b = swarm.insert(point(60.0, 20.0, 5.0));
        assert!(a < b);
        assert_eq!(swarm.get(b).map(|p| p.position.x), Some(60.0));
        assert_eq!(swarm.total_spawned(), 2);
    }

    #[test]
    fn test_pair_mut_both_orders() {
        let mut items = [1, 2, 3, 4];
        let (a, b) = pair_mut(&mut items, 0, 3);
        std::mem::swap(a, b);
        let (c, d) = pair_mut(&mut items, 2, 1);
        assert_eq!((*c, *d), (3, 2));
        assert_eq!(items, [4, 2, 3, 1]);
    }

    #[test]
    fn test_step_moves_points() {
        let mut swarm = Swarm::new();
        let mut p = point(50.0, 50.0, 10.0);
        p.velocity = Vec2::new(2.0, 1.0);
        swarm.insert(p);

        swarm.step(&world());
        assert_eq!(swarm.points()[0].position, Vec2::new(52.0, 51.0));
    }

    #[test]
    fn test_lifetime_is_monotone_until_removal() {
        let mut swarm = Swarm::new();
        swarm.insert(point(50.0, 50.0, 3.0));
        let w = world();

        let mut last = f32::INFINITY;
        for _ in 0..2 {
            swarm.step(&w);
            let now = swarm.points()[0].lifetime;
            assert!(now <= last);
            last = now;
        }

        let stats = swarm.step(&w);
        assert_eq!(stats.retired, 1);
        assert!(swarm.is_empty());
        assert_eq!(swarm.total_retired(), 1);
    }

    #[test]
    fn test_crowded_decay_retires_faster() {
        let w = world().with_decay(Decay::Crowded {
            step: 1.0,
            capacity: 2,
            pressure: 1.0,
        });
        let mut swarm = Swarm::new();
        swarm.insert(point(20.0, 20.0, 3.0));
        swarm.insert(point(100.0, 100.0, 3.0));

        // full: each tick costs 2
        swarm.step(&w);
        assert_eq!(swarm.points()[0].lifetime, 1.0);
        swarm.step(&w);
        assert!(swarm.is_empty());
    }

    #[test]
    fn test_overlapping_points_are_separated() {
        let mut swarm = Swarm::new();
        swarm.insert(point(100.0, 100.0, 10.0));
        swarm.insert(point(106.0, 100.0, 10.0));

        let stats = swarm.step(&world());
        assert!(stats.contacts >= 1);
        let gap = (swarm.points()[0].position - swarm.points()[1].position).length();
        assert!(gap >= 10.0 - 1e-4);
    }

    #[test]
    fn test_coincident_points_stay_finite() {
        let mut swarm = Swarm::new();
        swarm.insert(point(100.0, 100.0, 10.0));
        swarm.insert(point(100.0, 100.0, 10.0));

        let stats = swarm.step(&world());
        assert_eq!(stats.degenerate, 2);
        assert!(swarm.points().iter().all(|p| p.position.is_finite()));
    }

    #[test]
    fn test_walls_keep_points_inside() {
        let mut swarm = Swarm::new();
        let mut p = point(195.0, 5.0, 10.0);
        p.velocity = Vec2::new(30.0, -30.0);
        swarm.insert(p);

        swarm.step(&world());
        let p = &swarm.points()[0];
        assert_eq!(p.position, Vec2::new(195.0, 5.0));
        assert_eq!(p.velocity, Vec2::new(-30.0, 30.0));
    }

    #[test]
    fn test_snapshot_in_order() {
        let mut swarm = Swarm::new();
        let a = swarm.insert(point(20.0, 20.0, 4.0));
        let b = swarm.insert(point(80.0, 20.0, 4.0));
        let frame = swarm.snapshot();
        assert_eq!(frame.len(), 2);
        assert_eq!(frame[0].id, a.0);
        assert_eq!(frame[1].id, b.0);
    }
}
