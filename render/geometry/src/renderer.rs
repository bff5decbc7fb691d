use std::collections::HashSet;

#[cfg(feature = "hprof")]
use coarse_prof::profile;
use glam::Vec3;
use level::{LevelData, PlaneKind, TextureHandle, WallPart};
use log::{debug, info};
use render_trait::{
    BufferTarget, StaticVertex, TextureDimension, TextureManager, Triangulator, ViewClipper,
};

use crate::cache::{CacheStats, FlatSlot, VertexCache};
use crate::config::GeometryConfig;
use crate::scratch::Scratch;
use crate::transfer::{TransferHeightView, VIEW_COUNT, view_for_sector};

/// The collaborators a frame is drawn with. Built by the caller every frame,
/// the renderer keeps none of it.
pub struct RenderContext<'a> {
    pub level: &'a LevelData,
    pub textures: &'a dyn TextureManager,
    pub triangulator: &'a dyn Triangulator,
    pub target: &'a mut dyn BufferTarget,
    pub clipper: &'a mut dyn ViewClipper,
}

/// A translucent middle waiting for the alpha pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlphaSide {
    pub side: usize,
    /// View of the facing sector when it was collected
    pub view: TransferHeightView,
    /// View of the sector behind
    pub back_view: TransferHeightView,
    /// Rebuild in to scratch instead of caching
    pub bypass: bool,
    pub alpha: f32,
    /// From the camera to the middle of the side, in the map plane
    pub distance: f32,
}

/// Produces vertex batches for walls and flats of visible subsectors and
/// keeps them across frames, rebuilding only what changed.
pub struct GeometryRenderer {
    pub(crate) config: GeometryConfig,
    pub(crate) cache: VertexCache,
    /// Current frame id, 0 is never used so it can mean "never drawn"
    pub(crate) frame: u32,
    pub(crate) frac: f32,
    /// Set while drawing through a non-canonical transfer heights view
    pub(crate) cache_override: bool,
    /// Set when the side being drawn must not occlude, sky shows through it
    pub(crate) sky_override: bool,
    pub(crate) scratch: Scratch,
    pub(crate) alpha_sides: Vec<AlphaSide>,
    /// Frame each sector plane was last drawn, indexed by sector id then
    /// `PlaneKind`
    pub(crate) plane_frames: Vec<[u32; 2]>,
    /// Frame each side was last drawn, per view. A side split across
    /// several subsectors is only drawn by the first of them.
    pub(crate) side_frames: Vec<[u32; VIEW_COUNT]>,
    pub(crate) stats: CacheStats,
    missing_textures: HashSet<TextureHandle>,
}

impl GeometryRenderer {
    pub fn new(config: GeometryConfig) -> Self {
        Self {
            config,
            cache: VertexCache::default(),
            frame: 0,
            frac: 1.0,
            cache_override: false,
            sky_override: false,
            scratch: Scratch::default(),
            alpha_sides: Vec::new(),
            plane_frames: Vec::new(),
            side_frames: Vec::new(),
            stats: CacheStats::default(),
            missing_textures: HashSet::new(),
        }
    }

    pub const fn config(&self) -> &GeometryConfig {
        &self.config
    }

    /// Drop everything cached for the previous level and size the tables for
    /// this one
    pub fn update_level(&mut self, level: &LevelData) {
        let side_count = level.sides().len();
        let sector_count = level.sectors().len();
        self.cache.reset(side_count, sector_count);
        self.plane_frames.clear();
        self.plane_frames.resize(sector_count, [0; 2]);
        self.side_frames.clear();
        self.side_frames.resize(side_count, [0; VIEW_COUNT]);
        self.alpha_sides.clear();
        self.missing_textures.clear();
        self.stats = CacheStats::default();
        self.frame = 0;
        info!(
            "Geometry cache sized for {} sides and {} sectors, {} views each",
            side_count,
            sector_count,
            VIEW_COUNT
        );
    }

    /// Start a new frame. `frac` is the interpolation fraction between the
    /// previous and current gametic.
    pub fn clear_frame(&mut self, frac: f32) {
        self.frame = self.frame.wrapping_add(1).max(1);
        self.frac = frac.clamp(0.0, 1.0);
        self.cache_override = false;
        self.sky_override = false;
        self.alpha_sides.clear();
        self.stats = CacheStats::default();
    }

    /// Draw the walls of `subsector` and, unless `sector_rendered`, the
    /// flats of its sector. `view_sector` is the sector the camera is in.
    pub fn render_subsector(
        &mut self,
        ctx: &mut RenderContext,
        view_sector: usize,
        subsector: usize,
        camera: Vec3,
        sector_rendered: bool,
    ) {
        #[cfg(feature = "hprof")]
        profile!("render_subsector");
        let level = ctx.level;
        let ss = level.subsector(subsector);
        let viewer = level.sector(view_sector);
        let view = view_for_sector(level, camera.z, viewer, level.sector(ss.sector), self.frac);
        self.cache_override = !view.is_canonical();

        for edge in ss.edges.iter() {
            if let Some(side) = edge.side {
                self.render_side(ctx, view_sector, side, view, camera);
            }
        }

        if !sector_rendered {
            self.render_flats(ctx, ss.sector, view, camera.z);
        }
        self.cache_override = false;
    }

    /// Statistics of the frame in progress
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub const fn cache_override(&self) -> bool {
        self.cache_override
    }

    /// Whether the last side drawn had its occlusion suppressed
    pub const fn sky_override(&self) -> bool {
        self.sky_override
    }

    pub const fn frame(&self) -> u32 {
        self.frame
    }

    pub fn alpha_sides(&self) -> &[AlphaSide] {
        &self.alpha_sides
    }

    pub fn cached_wall(
        &self,
        side: usize,
        part: WallPart,
        view: TransferHeightView,
    ) -> Option<&[StaticVertex]> {
        self.cache
            .walls
            .get(side, part.index(), view)
            .map(|w| w.vertices.as_slice())
    }

    pub fn cached_flat(
        &self,
        sector: usize,
        slot: FlatSlot,
        view: TransferHeightView,
    ) -> Option<&[StaticVertex]> {
        self.cache
            .flats
            .get(sector, slot.index(), view)
            .map(|f| f.vertices.as_slice())
    }

    pub fn has_sky_wall(&self, side: usize, part: WallPart, view: TransferHeightView) -> bool {
        self.cache.sky_walls.get(side, part.index(), view).is_some()
    }

    /// Frame the plane of a sector was last drawn, `None` if never
    pub fn last_rendered_frame(&self, sector: usize, kind: PlaneKind) -> Option<u32> {
        self.plane_frames
            .get(sector)
            .map(|f| f[kind.index()])
            .filter(|f| *f != 0)
    }

    /// Latest frame the side was drawn in any view, `None` if never
    pub fn side_rendered_frame(&self, side: usize) -> Option<u32> {
        self.side_frames
            .get(side)
            .and_then(|f| f.iter().copied().max())
            .filter(|f| *f != 0)
    }

    /// Both planes of the sector were drawn in the current frame
    pub fn sector_rendered_this_frame(&self, sector: usize) -> bool {
        self.plane_frames
            .get(sector)
            .is_some_and(|f| f.iter().all(|f| *f == self.frame))
    }

    /// Cached batches across every table
    pub fn cached_batches(&self) -> usize {
        self.cache.walls.occupied()
            + self.cache.sky_walls.occupied()
            + self.cache.flats.occupied()
            + self.cache.sky_flats.occupied()
    }

    /// Resolve a texture, a handle that resolves to nothing is logged once
    /// and the surface skipped
    pub(crate) fn resolve_texture(
        &mut self,
        textures: &dyn TextureManager,
        handle: TextureHandle,
    ) -> Option<TextureDimension> {
        let dimension = textures.resolve(handle);
        if dimension.is_none() && self.missing_textures.insert(handle) {
            debug!("Texture {} does not resolve, surfaces using it are skipped", handle);
        }
        dimension
    }

    pub(crate) fn mark_plane(&mut self, sector: usize, kind: PlaneKind) {
        if let Some(frames) = self.plane_frames.get_mut(sector) {
            frames[kind.index()] = self.frame;
        }
    }
}

impl Default for GeometryRenderer {
    fn default() -> Self {
        Self::new(GeometryConfig::default())
    }
}
