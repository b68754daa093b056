//! Per-instance render data.
//!
//! The renderer draws one unit quad per [`RectInstance`], scaled by `size`,
//! rotated by `angles` (pitch, yaw, roll, already advanced on the CPU) and
//! placed at `center`. Every instance in a batch uses this pre-rotated
//! convention; settled rectangles simply stop advancing their angles.
//!
//! [`InstanceBatch`] rebuilds the flat array each frame and exposes it as
//! bytes for a vertex buffer upload.

use crate::geometry::BoundingBox;
use crate::lifecycle::EntityPools;
use bytemuck::{Pod, Zeroable};

/// GPU vertex-instance layout, 48 bytes.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct RectInstance {
    /// World-space centre.
    pub center: [f32; 2],
    /// Width and height in world units.
    pub size: [f32; 2],
    /// Linear RGBA in `0..=1`.
    pub color: [f32; 4],
    /// Current pitch, yaw, roll in radians.
    pub angles: [f32; 3],
    /// 1.0 while moving, 0.0 once settled.
    pub moving: f32,
}

impl RectInstance {
    /// Floats per instance.
    pub const FLOATS: usize = std::mem::size_of::<RectInstance>() / std::mem::size_of::<f32>();
}

/// Reusable instance buffer.
#[derive(Debug, Clone, Default)]
pub struct InstanceBatch {
    instances: Vec<RectInstance>,
    culled: usize,
}

impl InstanceBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refill from every live entity whose bounding circle touches `visible`.
    ///
    /// Returns the number of instances written.
    pub fn rebuild(&mut self, pools: &EntityPools, visible: &BoundingBox) -> usize {
        self.instances.clear();
        self.culled = 0;
        for (_, entity) in pools.iter() {
            if !entity.shape.bounding_circle().intersects_box(visible) {
                self.culled += 1;
                continue;
            }
            let center = entity.center();
            let angles = entity.shape.angles();
            self.instances.push(RectInstance {
                center: center.to_array(),
                size: entity.shape.size().to_array(),
                color: entity.shape.color().to_f32(),
                angles: angles.to_array(),
                moving: if entity.moving { 1.0 } else { 0.0 },
            });
        }
        self.instances.len()
    }

    pub fn instances(&self) -> &[RectInstance] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Entities skipped by the last rebuild.
    pub fn culled(&self) -> usize {
        self.culled
    }

    /// Raw bytes for a vertex buffer upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }

    /// Flat float view, [`RectInstance::FLOATS`] per instance.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }
}
