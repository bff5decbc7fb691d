use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// Vertex layout for textured, lit world geometry. Walls use six of these per
/// quad, flats three per fan triangle.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct StaticVertex {
    pub pos: Vec3,
    pub uv: Vec2,
    /// 0.0..=1.0, the sector light level scaled down from 0..=255
    pub light: f32,
    pub alpha: f32,
    /// RGB tint
    pub colour: Vec3,
}

/// Sky geometry only carries a position, the sky renderer does its own
/// projection and has no use for UV or light.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SkyVertex {
    pub pos: Vec3,
}

impl SkyVertex {
    pub const fn new(pos: Vec3) -> Self {
        Self { pos }
    }
}

/// One corner of a wall quad as produced by a triangulator
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct WallCorner {
    pub pos: Vec3,
    pub uv: Vec2,
}

/// The four corners of a wall part, in world space
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct WallQuad {
    pub top_left: WallCorner,
    pub bottom_left: WallCorner,
    pub top_right: WallCorner,
    pub bottom_right: WallCorner,
}

impl WallQuad {
    /// Corners in the order the two triangles use them:
    /// `(TL, BL, TR)` then `(TR, BL, BR)`
    pub const fn triangle_corners(&self) -> [WallCorner; 6] {
        [
            self.top_left,
            self.bottom_left,
            self.top_right,
            self.top_right,
            self.bottom_left,
            self.bottom_right,
        ]
    }
}

/// A polygon point of a flat with its texture coordinate
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FlatPoint {
    pub pos: Vec3,
    pub uv: Vec2,
}

#[cfg(test)]
mod tests {
    use super::{SkyVertex, StaticVertex};

    #[test]
    fn vertex_layouts_are_packed() {
        assert_eq!(std::mem::size_of::<StaticVertex>(), 40);
        assert_eq!(std::mem::size_of::<SkyVertex>(), 12);
        let verts = [StaticVertex::default(); 6];
        let bytes: &[u8] = bytemuck::cast_slice(&verts);
        assert_eq!(bytes.len(), 240);
    }
}
