
use std::collections::HashSet;

use glam::{Vec2, Vec3};
use level::{LevelData, TextureHandle};
use render_trait::{
    BufferTarget, SkyVertex, StaticVertex, TextureDimension, TextureManager, ViewClipper,
};

use crate::{GeometryConfig, GeometryRenderer, RenderContext, WorldTriangulator};

pub const FLOOR: TextureHandle = 1;
pub const CEILING: TextureHandle = 2;
pub const WALL: TextureHandle = 3;
pub const UPPER: TextureHandle = 4;
pub const LOWER: TextureHandle = 5;
pub const GLASS: TextureHandle = 6;
pub const WATER: TextureHandle = 7;
/// Resolves to nothing
pub const MISSING: TextureHandle = 50;
pub const SKY_FLAT: TextureHandle = 99;
pub const SKY_TEXTURE: TextureHandle = 100;

pub struct TextureTable;

impl TextureManager for TextureTable {
    fn resolve(&self, handle: TextureHandle) -> Option<TextureDimension> {
        match handle {
            FLOOR | CEILING | WATER => Some(TextureDimension::new(64.0, 64.0)),
            WALL | UPPER | LOWER | GLASS => Some(TextureDimension::new(128.0, 64.0)),
            SKY_FLAT => Some(TextureDimension::new(256.0, 128.0)),
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

#[derive(Default)]
pub struct RecordingTarget {
    pub batches: Vec<(TextureHandle, Vec<StaticVertex>)>,
    pub alpha_batches: Vec<(TextureHandle, Vec<StaticVertex>)>,
    pub sky_batches: Vec<(Vec<SkyVertex>, TextureHandle, bool)>,
}

impl RecordingTarget {
    pub fn clear(&mut self) {
        self.batches.clear();
        self.alpha_batches.clear();
        self.sky_batches.clear();
    }

    pub fn with_texture(&self, texture: TextureHandle) -> Vec<&Vec<StaticVertex>> {
        self.batches
            .iter()
            .filter(|(t, _)| *t == texture)
            .map(|(_, v)| v)
            .collect()
    }
}

impl BufferTarget for RecordingTarget {
    fn submit(&mut self, texture: TextureHandle, vertices: &[StaticVertex]) {
        self.batches.push((texture, vertices.to_vec()));
    }

    fn submit_alpha_batch(&mut self, texture: TextureHandle, vertices: &[StaticVertex]) {
        self.alpha_batches.push((texture, vertices.to_vec()));
    }

    fn add_sky_batch(&mut self, vertices: &[SkyVertex], sky_texture: TextureHandle, flipped: bool) {
        self.sky_batches.push((vertices.to_vec(), sky_texture, flipped));
    }
}

#[derive(Default)]
pub struct CountingClipper {
    pub occluders: Vec<(Vec2, Vec2)>,
}

impl ViewClipper for CountingClipper {
    fn add_occluder(&mut self, start: Vec2, end: Vec2) {
        self.occluders.push((start, end));
    }
}

/// A level plus everything needed to draw frames of it
pub struct Harness {
    pub level: LevelData,
    pub renderer: GeometryRenderer,
    pub target: RecordingTarget,
    pub clipper: CountingClipper,
}

impl Harness {
    pub fn new(level: LevelData) -> Self {
        Self::with_config(level, GeometryConfig::default())
    }

    pub fn with_config(level: LevelData, config: GeometryConfig) -> Self {
        let mut renderer = GeometryRenderer::new(config);
        renderer.update_level(&level);
        Self {
            level,
            renderer,
            target: RecordingTarget::default(),
            clipper: CountingClipper::default(),
        }
    }

    /// Draw `subsectors` in order as one frame, flats once per sector
    pub fn frame(&mut self, view_sector: usize, camera: Vec3, subsectors: &[usize]) {
        self.frame_at(1.0, view_sector, camera, subsectors);
    }

    pub fn frame_at(&mut self, frac: f32, view_sector: usize, camera: Vec3, subsectors: &[usize]) {
        self.begin_frame(frac);
        let mut drawn = HashSet::new();
        for &id in subsectors {
            let sector = self.level.subsector(id).sector;
            let rendered = !drawn.insert(sector);
            self.draw(view_sector, camera, id, rendered);
        }
    }

    pub fn begin_frame(&mut self, frac: f32) {
        self.target.clear();
        self.clipper.occluders.clear();
        self.renderer.clear_frame(frac);
    }

    /// One subsector in to the frame in progress
    pub fn draw(
        &mut self,
        view_sector: usize,
        camera: Vec3,
        subsector: usize,
        sector_rendered: bool,
    ) {
        let mut ctx = RenderContext {
            level: &self.level,
            textures: &TextureTable,
            triangulator: &WorldTriangulator,
            target: &mut self.target,
            clipper: &mut self.clipper,
        };
        self.renderer
            .render_subsector(&mut ctx, view_sector, subsector, camera, sector_rendered);
    }

    /// Resolve the alpha sides collected by the last frame
    pub fn alpha_pass(&mut self) {
        let mut ctx = RenderContext {
            level: &self.level,
            textures: &TextureTable,
            triangulator: &WorldTriangulator,
            target: &mut self.target,
            clipper: &mut self.clipper,
        };
        self.renderer.sort_alpha_sides();
        self.renderer.render_alpha_sides(&mut ctx);
    }
}

pub fn square(x: f32, y: f32, size: f32) -> [Vec2; 4] {
    [
        Vec2::new(x, y),
        Vec2::new(x, y + size),
        Vec2::new(x + size, y + size),
        Vec2::new(x + size, y),
    ]
}
