//! Floors and ceilings, batched per sector. Every subsector of a sector is
//! triangulated in to one contiguous range so a sector flat is one upload.

#[cfg(feature = "hprof")]
use coarse_prof::profile;
use glam::Vec2;
use level::PlaneKind;
use render_trait::FlatPoint;

use crate::cache::{BuildStamp, CacheAction, CachedFlat, FlatSlot, cache_action};
use crate::renderer::{GeometryRenderer, RenderContext};
use crate::sky::{is_flipped, sky_z};
use crate::transfer::{FlatSurface, TransferHeightView, flat_surfaces, render_planes};
use crate::vertex::{light_to_unit, patch_lighting, push_flat_fan, push_sky_fan};

impl GeometryRenderer {
    /// Every flat of a sector visible from `camera_z`, including control
    /// sector flats in the middle view
    pub(crate) fn render_flats(
        &mut self,
        ctx: &mut RenderContext,
        sector_id: usize,
        view: TransferHeightView,
        camera_z: f32,
    ) {
        let level = ctx.level;
        let sector = level.sector(sector_id);
        for surface in flat_surfaces(level, sector, view).into_iter().flatten() {
            self.render_flat(ctx, sector_id, view, &surface, Some(camera_z));
        }

        // Either sector can be what another viewer sees, both are marked
        for kind in PlaneKind::ALL {
            self.mark_plane(sector_id, kind);
            if let Some(control) = sector.transfer_heights {
                self.mark_plane(control, kind);
            }
        }
    }

    /// Draw one plane of a sector regardless of where the camera is or which
    /// path owns the plane. For callers that need a flat redrawn outside the
    /// normal subsector walk.
    pub fn render_sector_flats(
        &mut self,
        ctx: &mut RenderContext,
        sector_id: usize,
        kind: PlaneKind,
    ) {
        #[cfg(feature = "hprof")]
        profile!("render_sector_flats");
        let level = ctx.level;
        let Some(sector) = level.sectors().get(sector_id) else {
            return;
        };
        let planes = render_planes(level, sector, TransferHeightView::Middle);
        let surface = FlatSurface {
            slot: FlatSlot::for_plane(kind),
            plane: planes.plane(kind),
            light_level: planes.flat_light(kind, TransferHeightView::Middle),
            stamp: planes.stamp,
        };
        self.render_flat(ctx, sector_id, TransferHeightView::Middle, &surface, None);
        self.mark_plane(sector_id, kind);
    }

    /// `camera_z` of `None` skips the visibility and ownership checks
    fn render_flat(
        &mut self,
        ctx: &mut RenderContext,
        sector_id: usize,
        view: TransferHeightView,
        surface: &FlatSurface,
        camera_z: Option<f32>,
    ) {
        let facing = surface.slot.facing();
        if let Some(camera_z) = camera_z {
            if self.config.static_geometry && !surface.plane.dynamic {
                return;
            }
            let visible_z = surface.plane.interpolated_height(self.frac);
            let visible = match facing {
                PlaneKind::Floor => camera_z >= visible_z,
                PlaneKind::Ceiling => camera_z <= visible_z,
            };
            if !visible {
                return;
            }
        }

        if ctx.textures.is_sky(surface.plane.texture()) {
            self.render_sky_flat(ctx, sector_id, view, surface);
            return;
        }
        let Some(dimension) = self.resolve_texture(ctx.textures, surface.plane.texture()) else {
            return;
        };

        let level = ctx.level;
        let triangulator = ctx.triangulator;
        let frac = self.frac;
        let light = light_to_unit(surface.light_level);
        let colour = level.sector(sector_id).colour();
        let cached = self
            .cache
            .flats
            .get(sector_id, surface.slot.index(), view)
            .map(|f| &f.stamp);
        let action = cache_action(false, cached, &surface.stamp);
        self.stats.record(action);

        if matches!(action, CacheAction::Build | CacheAction::Rebuild) {
            let scratch = &mut self.scratch;
            scratch.flat.clear();
            for &ss_id in level.sector_subsectors(sector_id) {
                let subsector = level.subsector(ss_id);
                if subsector.is_degenerate() {
                    continue;
                }
                triangulator.triangulate_flat(
                    subsector,
                    surface.plane,
                    &dimension,
                    frac,
                    &mut scratch.polygon,
                );
                push_flat_fan(&scratch.polygon, facing, light, colour, &mut scratch.flat);
            }
        }

        let Some(slot) = self.cache.flats.slot_mut(sector_id, surface.slot.index(), view) else {
            return;
        };
        match action {
            CacheAction::Build | CacheAction::Rebuild => {
                let built = self.scratch.flat.as_slice();
                // topology is fixed for the level, the range keeps its size
                let same_size = slot.as_ref().is_some_and(|f| f.vertices.len() == built.len());
                if let (true, Some(flat)) = (same_size, slot.as_mut()) {
                    flat.vertices.copy_from_slice(built);
                    flat.stamp = surface.stamp;
                } else {
                    *slot = Some(CachedFlat {
                        vertices: built.to_vec(),
                        stamp: surface.stamp,
                    });
                }
            }
            CacheAction::PatchLight => {
                if let Some(flat) = slot.as_mut() {
                    patch_lighting(&mut flat.vertices, light, colour);
                    flat.stamp = surface.stamp;
                }
            }
            CacheAction::Reuse | CacheAction::Bypass => {}
        }

        if let Some(flat) = slot.as_ref() {
            if !flat.vertices.is_empty() {
                ctx.target.submit(surface.plane.texture(), &flat.vertices);
            }
        }
    }

    /// Sky flats sit at the sky height whatever the plane height is, so the
    /// batch only depends on the polygons and is built once
    fn render_sky_flat(
        &mut self,
        ctx: &mut RenderContext,
        sector_id: usize,
        view: TransferHeightView,
        surface: &FlatSurface,
    ) {
        let level = ctx.level;
        let facing = surface.slot.facing();
        let stamp = BuildStamp::default();
        let cached = self
            .cache
            .sky_flats
            .get(sector_id, surface.slot.index(), view)
            .map(|f| &f.stamp);
        let action = cache_action(false, cached, &stamp);
        self.stats.record(action);
        self.stats.sky_batches += 1;

        let Some(slot) = self.cache.sky_flats.slot_mut(sector_id, surface.slot.index(), view) else {
            return;
        };
        if slot.is_none() {
            let z = sky_z(facing, self.config.sky_height);
            let scratch = &mut self.scratch;
            scratch.sky.clear();
            for &ss_id in level.sector_subsectors(sector_id) {
                let subsector = level.subsector(ss_id);
                scratch.polygon.clear();
                scratch.polygon.extend(subsector.points().map(|p| FlatPoint {
                    pos: p.extend(z),
                    uv: Vec2::ZERO,
                }));
                push_sky_fan(&scratch.polygon, facing, z, &mut scratch.sky);
            }
            *slot = Some(CachedFlat {
                vertices: scratch.sky.as_slice().to_vec(),
                stamp,
            });
        }

        if let Some(flat) = slot.as_ref() {
            if !flat.vertices.is_empty() {
                let sky_texture = ctx.textures.sky_texture();
                ctx.target.add_sky_batch(&flat.vertices, sky_texture, is_flipped(facing));
            }
        }
    }
}
