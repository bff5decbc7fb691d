//! Stand-ins for the renderer side of the geometry cache. Nothing is drawn,
//! batches are counted along with the bytes an upload would have moved.

use bytemuck::cast_slice;
use glam::Vec2;
use level::TextureHandle;
use log::info;
use render_trait::{
    BufferTarget, SkyVertex, StaticVertex, TextureDimension, TextureManager, ViewClipper,
};

use crate::map_gen::{CEILING, FLOOR, GLASS, SKY_FLAT, SKY_TEXTURE, STEP, WALL, WATER};

pub struct BenchTextures;

impl TextureManager for BenchTextures {
    fn resolve(&self, handle: TextureHandle) -> Option<TextureDimension> {
        match handle {
            FLOOR | CEILING | WATER | SKY_FLAT => Some(TextureDimension::new(64.0, 64.0)),
            WALL | STEP | GLASS => Some(TextureDimension::new(128.0, 128.0)),
            _ => None,
        }
    }

    fn is_sky(&self, handle: TextureHandle) -> bool {
        handle == SKY_FLAT
    }

    fn sky_texture(&self) -> TextureHandle {
        SKY_TEXTURE
    }
}

#[derive(Debug, Default)]
pub struct UploadCounter {
    pub batches: u64,
    pub alpha_batches: u64,
    pub sky_batches: u64,
    pub vertices: u64,
    pub bytes: u64,
}

impl UploadCounter {
    fn count<V: bytemuck::Pod>(&mut self, vertices: &[V]) {
        self.vertices += vertices.len() as u64;
        self.bytes += cast_slice::<V, u8>(vertices).len() as u64;
    }

    pub fn log_summary(&self, frames: u32) {
        let frames = u64::from(frames.max(1));
        info!(
            "Submitted {} batches, {} alpha, {} sky",
            self.batches, self.alpha_batches, self.sky_batches
        );
        info!(
            "Submitted {} vertices, {} KiB, {} bytes per frame",
            self.vertices,
            self.bytes / 1024,
            self.bytes / frames
        );
    }
}

impl BufferTarget for UploadCounter {
    fn submit(&mut self, _texture: TextureHandle, vertices: &[StaticVertex]) {
        self.batches += 1;
        self.count(vertices);
    }

    fn submit_alpha_batch(&mut self, _texture: TextureHandle, vertices: &[StaticVertex]) {
        self.alpha_batches += 1;
        self.count(vertices);
    }

    fn add_sky_batch(
        &mut self,
        vertices: &[SkyVertex],
        _sky_texture: TextureHandle,
        _flipped: bool,
    ) {
        self.sky_batches += 1;
        self.count(vertices);
    }
}

#[derive(Debug, Default)]
pub struct OccluderCounter {
    pub occluders: u64,
}

impl ViewClipper for OccluderCounter {
    fn add_occluder(&mut self, _start: Vec2, _end: Vec2) {
        self.occluders += 1;
    }
}
