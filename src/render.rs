//! The boundary between the simulation and whatever draws it.
//!
//! Rendering itself lives outside this crate. Once per tick a renderer is
//! handed an ordered snapshot of [`PointInstance`]s, a flat `Pod` record it
//! can upload to a GPU buffer as-is or walk on the CPU for a canvas.
//!
//! Renderers that keep a retained object per point (sprites, scene nodes)
//! key them in a [`HandleMap`] by point id. The point type never carries
//! renderer state.

use crate::math::{Color, Vector};
use crate::point::Point;
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Alpha below which retained renderers drop a point's handle.
pub const DEFAULT_VISIBILITY: f32 = 0.1;

/// One live point, as a renderer sees it.
///
/// `#[repr(C)]` with no padding: 40 bytes, 8-byte aligned.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct PointInstance {
    /// Center; `z` is 0 for flat swarms.
    pub position: [f32; 3],
    pub radius: f32,
    /// RGB clamped to 0.0-1.0, alpha = `lifetime / max_lifetime`.
    pub color: [f32; 4],
    /// The point's [`crate::PointId`].
    pub id: u64,
}

impl PointInstance {
    pub fn from_point<V: Vector>(point: &Point<V>) -> Self {
        let rgb = point.color.to_unit();
        Self {
            position: point.position.to_array3(),
            radius: point.radius(),
            color: [rgb.x, rgb.y, rgb.z, point.life_ratio()],
            id: point.id().0,
        }
    }

    #[inline]
    pub fn alpha(&self) -> f32 {
        self.color[3]
    }
}

/// Raw bytes of a frame, ready for a vertex/instance buffer upload.
pub fn frame_bytes(frame: &[PointInstance]) -> &[u8] {
    bytemuck::cast_slice(frame)
}

/// Consumer of simulation frames.
pub trait Renderer {
    /// The world bounds changed.
    fn resize(&mut self, width: f32, height: f32, depth: f32);

    /// Draw one frame. Called once per tick, after the step.
    fn render(&mut self, frame: &[PointInstance]);
}

/// Creates, updates and destroys a renderer's per-point objects.
pub trait HandleFactory {
    type Handle;

    fn create(&mut self, instance: &PointInstance) -> Self::Handle;

    fn update(&mut self, handle: &mut Self::Handle, instance: &PointInstance);

    fn release(&mut self, handle: Self::Handle);
}

/// Point id to render handle map, owned by the renderer.
#[derive(Debug)]
pub struct HandleMap<H> {
    handles: HashMap<u64, H>,
    visibility: f32,
}

impl<H> HandleMap<H> {
    /// Handles are kept only for points whose alpha exceeds `visibility`.
    pub fn new(visibility: f32) -> Self {
        Self {
            handles: HashMap::new(),
            visibility,
        }
    }

    /// Bring the map in line with `frame`.
    ///
    /// Visible points get a handle created (first time) or updated; handles
    /// of points that faded below the threshold or left the swarm are
    /// released.
    pub fn sync<F>(&mut self, frame: &[PointInstance], factory: &mut F)
    where
        F: HandleFactory<Handle = H>,
    {
        let mut visible = HashSet::with_capacity(frame.len());
        for instance in frame.iter().filter(|i| i.alpha() > self.visibility) {
            visible.insert(instance.id);
            match self.handles.get_mut(&instance.id) {
                Some(handle) => factory.update(handle, instance),
                None => {
                    let handle = factory.create(instance);
                    self.handles.insert(instance.id, handle);
                }
            }
        }

        let stale: Vec<u64> = self
            .handles
            .keys()
            .filter(|id| !visible.contains(*id))
            .copied()
            .collect();
        for id in stale {
            if let Some(handle) = self.handles.remove(&id) {
                factory.release(handle);
            }
        }
    }

    pub fn get(&self, id: u64) -> Option<&H> {
        self.handles.get(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl<H> Default for HandleMap<H> {
    fn default() -> Self {
        Self::new(DEFAULT_VISIBILITY)
    }
}

/// `rgb(r, g, b)` with channels clamped to 0-255.
pub fn css_rgb(color: Color) -> String {
    format!(
        "rgb({}, {}, {})",
        color.r.clamp(0, 255),
        color.g.clamp(0, 255),
        color.b.clamp(0, 255)
    )
}

/// `rgba(r, g, b, a)` with channels clamped to 0-255 and alpha to 0-1.
pub fn css_rgba(color: Color, alpha: f32) -> String {
    format!(
        "rgba({}, {}, {}, {})",
        color.r.clamp(0, 255),
        color.g.clamp(0, 255),
        color.b.clamp(0, 255),
        alpha.clamp(0.0, 1.0)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[derive(Default)]
    struct Sprites {
        created: Vec<u64>,
        released: Vec<u64>,
        updates: usize,
    }

    impl HandleFactory for Sprites {
        type Handle = u64;

        fn create(&mut self, instance: &PointInstance) -> u64 {
            self.created.push(instance.id);
            instance.id
        }

        fn update(&mut self, _handle: &mut u64, _instance: &PointInstance) {
            self.updates += 1;
        }

        fn release(&mut self, handle: u64) {
            self.released.push(handle);
        }
    }

    fn instance(id: u64, alpha: f32) -> PointInstance {
        PointInstance {
            position: [0.0; 3],
            radius: 1.0,
            color: [1.0, 1.0, 1.0, alpha],
            id,
        }
    }

    #[test]
    fn test_instance_layout() {
        assert_eq!(std::mem::size_of::<PointInstance>(), 40);
        let frame = [instance(1, 1.0), instance(2, 0.5)];
        assert_eq!(frame_bytes(&frame).len(), 80);
    }

    #[test]
    fn test_from_point_alpha_and_clamp() {
        let mut p = Point::new(
            Vec2::new(3.0, 4.0),
            6.0,
            Vec2::ZERO,
            100.0,
            Color::new(300, 0, 51),
        );
        p.lifetime = 25.0;
        let i = PointInstance::from_point(&p);
        assert_eq!(i.position, [3.0, 4.0, 0.0]);
        assert_eq!(i.radius, 6.0);
        assert_eq!(i.color, [1.0, 0.0, 0.2, 0.25]);
    }

    #[test]
    fn test_handle_lifecycle() {
        let mut sprites = Sprites::default();
        let mut map = HandleMap::default();

        map.sync(&[instance(1, 1.0), instance(2, 0.05)], &mut sprites);
        assert_eq!(sprites.created, vec![1]);
        assert_eq!(map.len(), 1);

        map.sync(&[instance(1, 0.9), instance(3, 0.8)], &mut sprites);
        assert_eq!(sprites.created, vec![1, 3]);
        assert_eq!(sprites.updates, 1);

        // 1 faded, 3 gone
        map.sync(&[instance(1, 0.05)], &mut sprites);
        sprites.released.sort_unstable();
        assert_eq!(sprites.released, vec![1, 3]);
        assert!(map.is_empty());
    }

    #[test]
    fn test_css_strings_clamp() {
        let c = Color::new(-5, 128, 400);
        assert_eq!(css_rgb(c), "rgb(0, 128, 255)");
        assert_eq!(css_rgba(c, 0.5), "rgba(0, 128, 255, 0.5)");
    }
}
