//! The contracts between the geometry cache and the rest of the renderer.
//!
//! The geometry cache only *produces* vertex batches. Texture lookup,
//! triangulation, GPU upload and view clipping all live on the other side of
//! these traits.

mod vertex;

use glam::Vec2;
use level::{Plane, Side, SubSector, TextureHandle, WallPart};

pub use vertex::{FlatPoint, SkyVertex, StaticVertex, WallCorner, WallQuad};

/// Size of a resolved texture plus the reciprocal used to turn world units
/// in to UV
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureDimension {
    pub width: f32,
    pub height: f32,
    pub uv_inverse: Vec2,
}

impl TextureDimension {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            uv_inverse: Vec2::new(1.0 / width, 1.0 / height),
        }
    }
}

pub trait TextureManager {
    /// `None` if the handle doesn't resolve to anything drawable
    fn resolve(&self, handle: TextureHandle) -> Option<TextureDimension>;

    /// True if the handle is the sky indicator
    fn is_sky(&self, handle: TextureHandle) -> bool;

    /// The texture the sky renderer should draw with
    fn sky_texture(&self) -> TextureHandle;
}

/// Turns level geometry in to untransformed world space positions and UVs
pub trait Triangulator {
    /// The quad for one part of a side, spanning the interpolated heights of
    /// `bottom` and `top`
    fn triangulate_wall(
        &self,
        side: &Side,
        part: WallPart,
        bottom: &Plane,
        top: &Plane,
        texture: &TextureDimension,
        frac: f32,
    ) -> WallQuad;

    /// The polygon of `subsector` placed on `plane`. `out` is cleared first
    /// and receives one point per edge.
    fn triangulate_flat(
        &self,
        subsector: &SubSector,
        plane: &Plane,
        texture: &TextureDimension,
        frac: f32,
        out: &mut Vec<FlatPoint>,
    );
}

/// Where finished batches go. Implementations upload or record, the cache
/// does not care which.
pub trait BufferTarget {
    fn submit(&mut self, texture: TextureHandle, vertices: &[StaticVertex]);

    /// Translucent geometry, already ordered back to front by the caller
    fn submit_alpha_batch(&mut self, texture: TextureHandle, vertices: &[StaticVertex]);

    fn add_sky_batch(&mut self, vertices: &[SkyVertex], sky_texture: TextureHandle, flipped: bool);
}

pub trait ViewClipper {
    /// An edge that fully blocks everything behind it
    fn add_occluder(&mut self, start: Vec2, end: Vec2);
}
