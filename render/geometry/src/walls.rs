//! Wall dispatch. Decides which parts of a side are visible and runs each
//! through the cache policy.

#[cfg(feature = "hprof")]
use coarse_prof::profile;
use glam::{Vec2, Vec3};
use level::{Plane, Side, TextureHandle, WallPart};
use log::error;
use render_trait::StaticVertex;

use crate::cache::{BuildStamp, CacheAction, CachedWall, cache_action};
use crate::renderer::{AlphaSide, GeometryRenderer, RenderContext};
use crate::sky::{SkyBase, plan_upper};
use crate::transfer::{TransferHeightView, render_planes, view_for_sector};
use crate::vertex::{light_to_unit, patch_lighting, sky_wall_vertices, wall_vertices};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WallPass {
    Opaque,
    Alpha,
}

/// Everything needed to build or fetch one wall part
pub(crate) struct WallPiece<'a> {
    pub side: usize,
    pub part: WallPart,
    pub view: TransferHeightView,
    pub bottom: &'a Plane,
    pub top: &'a Plane,
    pub texture: TextureHandle,
    pub light_level: i32,
    pub alpha: f32,
    pub colour: Vec3,
    pub stamp: BuildStamp,
    pub bypass: bool,
    pub pass: WallPass,
}

/// The taller of two planes at the current interpolation
fn higher<'a>(a: &'a Plane, b: &'a Plane, frac: f32) -> &'a Plane {
    if b.interpolated_height(frac) > a.interpolated_height(frac) { b } else { a }
}

fn lower<'a>(a: &'a Plane, b: &'a Plane, frac: f32) -> &'a Plane {
    if b.interpolated_height(frac) < a.interpolated_height(frac) { b } else { a }
}

impl GeometryRenderer {
    /// Parts not marked dynamic belong to the static geometry path
    fn is_static(&self, side: &Side, part: WallPart) -> bool {
        self.config.static_geometry && !side.is_dynamic(part)
    }

    pub(crate) fn render_side(
        &mut self,
        ctx: &mut RenderContext,
        view_sector: usize,
        side_id: usize,
        view: TransferHeightView,
        camera: Vec3,
    ) {
        let level = ctx.level;
        let side = level.side(side_id);
        self.sky_override = false;
        match self.side_frames.get_mut(side_id) {
            Some(frames) if frames[view.index()] == self.frame => return,
            Some(frames) => frames[view.index()] = self.frame,
            None => {}
        }

        if !side.is_two_sided() {
            self.render_one_sided(ctx, side_id, view);
            return;
        }

        debug_assert!(side.partner.is_some(), "two-sided side {} has no partner", side_id);
        let Some(partner) = side.partner else {
            error!("Two-sided side {} has no partner, skipped", side_id);
            return;
        };
        let back = level.sector(level.side(partner).sector);
        let back_view =
            view_for_sector(level, camera.z, level.sector(view_sector), back, self.frac);
        self.render_two_sided(ctx, side_id, view, back_view, camera);
    }

    fn render_one_sided(
        &mut self,
        ctx: &mut RenderContext,
        side_id: usize,
        view: TransferHeightView,
    ) {
        let level = ctx.level;
        let side = level.side(side_id);
        let front = level.sector(side.sector);
        let planes = render_planes(level, front, view);
        let stamp = planes.stamp.combine(BuildStamp::of_side(side));
        let bypass = self.cache_override;

        if !self.is_static(side, WallPart::Middle) {
            if let Some(texture) = side.texture(WallPart::Middle) {
                self.render_wall_part(
                    ctx,
                    &WallPiece {
                        side: side_id,
                        part: WallPart::Middle,
                        view,
                        bottom: planes.floor,
                        top: planes.ceiling,
                        texture,
                        light_level: planes.light_level,
                        alpha: 1.0,
                        colour: front.colour(),
                        stamp,
                        bypass,
                        pass: WallPass::Opaque,
                    },
                );
            }
        }

        let sky_height = self.config.sky_height;
        if ctx.textures.is_sky(planes.ceiling.texture()) {
            let bottom = planes.ceiling.interpolated_height(self.frac);
            self.render_sky_wall(
                ctx,
                side_id,
                WallPart::Upper,
                view,
                bypass,
                stamp,
                bottom,
                sky_height,
            );
        }
        if ctx.textures.is_sky(planes.floor.texture()) {
            let top = planes.floor.interpolated_height(self.frac);
            self.render_sky_wall(
                ctx,
                side_id,
                WallPart::Lower,
                view,
                bypass,
                stamp,
                -sky_height,
                top,
            );
        }

        if !self.sky_override {
            ctx.clipper.add_occluder(side.v1, side.v2);
        }
    }

    fn render_two_sided(
        &mut self,
        ctx: &mut RenderContext,
        side_id: usize,
        view: TransferHeightView,
        back_view: TransferHeightView,
        camera: Vec3,
    ) {
        let level = ctx.level;
        let frac = self.frac;
        let side = level.side(side_id);
        let front_sector = level.sector(side.sector);
        let Some(back_side) = side.partner.map(|p| level.side(p)) else {
            return;
        };
        let back_sector = level.sector(back_side.sector);
        let front = render_planes(level, front_sector, view);
        let back = render_planes(level, back_sector, back_view);

        let bypass = self.cache_override || !back_view.is_canonical();
        let stamp = front
            .stamp
            .combine(back.stamp)
            .combine(BuildStamp::of_side(side));

        let front_floor = front.floor.interpolated_height(frac);
        let front_ceiling = front.ceiling.interpolated_height(frac);
        let back_floor = back.floor.interpolated_height(frac);
        let back_ceiling = back.ceiling.interpolated_height(frac);
        let no_opening = back_ceiling <= front_floor || back_floor >= front_ceiling;

        let piece = |part: WallPart, bottom, top, texture| WallPiece {
            side: side_id,
            part,
            view,
            bottom,
            top,
            texture,
            light_level: front.light_level,
            alpha: 1.0,
            colour: front_sector.colour(),
            stamp,
            bypass,
            pass: WallPass::Opaque,
        };

        if back_floor > front_floor && !self.is_static(side, WallPart::Lower) {
            if let Some(texture) = side.texture(WallPart::Lower) {
                let lower = piece(WallPart::Lower, front.floor, back.floor, texture);
                self.render_wall_part(ctx, &lower);
            }
        }

        if let Some(texture) = side.texture(WallPart::Middle) {
            if !self.is_static(side, WallPart::Middle) {
                if !self.config.transparency || side.alpha() >= 1.0 {
                    let bottom = higher(front.floor, back.floor, frac);
                    let top = lower(front.ceiling, back.ceiling, frac);
                    self.render_wall_part(ctx, &piece(WallPart::Middle, bottom, top, texture));
                } else {
                    self.alpha_sides.push(AlphaSide {
                        side: side_id,
                        view,
                        back_view,
                        bypass,
                        alpha: side.alpha(),
                        distance: side_middle(side).distance(camera.truncate()),
                    });
                    self.stats.alpha_deferred += 1;
                }
            }
        }

        let upper_texture = side.texture(WallPart::Upper);
        let plan = plan_upper(
            ctx.textures.is_sky(front.ceiling.texture()),
            ctx.textures.is_sky(back.ceiling.texture()),
            upper_texture.is_some(),
            back_ceiling < front_ceiling,
            no_opening,
        );
        self.sky_override = plan.sky_override;

        if let Some(texture) = upper_texture {
            if plan.textured && !self.is_static(side, WallPart::Upper) {
                let upper = piece(WallPart::Upper, back.ceiling, front.ceiling, texture);
                self.render_wall_part(ctx, &upper);
            }
        }
        if let Some(base) = plan.sky {
            let bottom = match base {
                SkyBase::FrontCeiling => front_ceiling,
                SkyBase::BackFloor => back_floor,
            };
            let sky_height = self.config.sky_height;
            self.render_sky_wall(
                ctx,
                side_id,
                WallPart::Upper,
                view,
                bypass,
                stamp,
                bottom,
                sky_height,
            );
        }

        if no_opening && !self.sky_override {
            ctx.clipper.add_occluder(side.v1, side.v2);
        }
    }

    /// Build, rebuild, patch or reuse one wall part and submit it
    pub(crate) fn render_wall_part(&mut self, ctx: &mut RenderContext, piece: &WallPiece) {
        let Some(dimension) = self.resolve_texture(ctx.textures, piece.texture) else {
            return;
        };
        let level = ctx.level;
        let triangulator = ctx.triangulator;
        let side = level.side(piece.side);
        let frac = self.frac;
        let light = light_to_unit(piece.light_level);
        let cached = self
            .cache
            .walls
            .get(piece.side, piece.part.index(), piece.view)
            .map(|w| &w.stamp);
        let action = cache_action(piece.bypass, cached, &piece.stamp);
        self.stats.record(action);

        let build = || {
            let quad = triangulator.triangulate_wall(
                side,
                piece.part,
                piece.bottom,
                piece.top,
                &dimension,
                frac,
            );
            wall_vertices(&quad, light, piece.alpha, piece.colour)
        };

        if action == CacheAction::Bypass {
            self.scratch.wall.clear();
            self.scratch.wall.extend_from_slice(&build());
            submit(ctx, piece, self.scratch.wall.as_slice());
            return;
        }

        let Some(slot) = self
            .cache
            .walls
            .slot_mut(piece.side, piece.part.index(), piece.view)
        else {
            return;
        };
        match action {
            CacheAction::Build | CacheAction::Rebuild => {
                let vertices = build();
                if let Some(wall) = slot.as_mut() {
                    // same size, overwrite in place
                    wall.vertices = vertices;
                    wall.stamp = piece.stamp;
                } else {
                    *slot = Some(CachedWall {
                        vertices,
                        stamp: piece.stamp,
                    });
                }
            }
            CacheAction::PatchLight => {
                if let Some(wall) = slot.as_mut() {
                    patch_lighting(&mut wall.vertices, light, piece.colour);
                    wall.stamp = piece.stamp;
                }
            }
            CacheAction::Reuse | CacheAction::Bypass => {}
        }
        if let Some(wall) = slot.as_ref() {
            submit(ctx, piece, &wall.vertices);
        }
    }

    /// A sky quad in the `part` slot of a side, `bottom..top` in world z
    #[allow(clippy::too_many_arguments)]
    fn render_sky_wall(
        &mut self,
        ctx: &mut RenderContext,
        side_id: usize,
        part: WallPart,
        view: TransferHeightView,
        bypass: bool,
        stamp: BuildStamp,
        bottom: f32,
        top: f32,
    ) {
        let level = ctx.level;
        let side = level.side(side_id);
        // sky has no light to patch
        let stamp = BuildStamp { light: 0, ..stamp };
        let cached = self.cache.sky_walls.get(side_id, part.index(), view).map(|w| &w.stamp);
        let action = cache_action(bypass, cached, &stamp);
        self.stats.record(action);
        self.stats.sky_batches += 1;
        let sky_texture = ctx.textures.sky_texture();

        if action == CacheAction::Bypass {
            self.scratch.sky.clear();
            self.scratch
                .sky
                .extend_from_slice(&sky_wall_vertices(side.v1, side.v2, bottom, top));
            ctx.target.add_sky_batch(self.scratch.sky.as_slice(), sky_texture, false);
            return;
        }

        let Some(slot) = self.cache.sky_walls.slot_mut(side_id, part.index(), view) else {
            return;
        };
        if matches!(action, CacheAction::Build | CacheAction::Rebuild) {
            *slot = Some(CachedWall {
                vertices: sky_wall_vertices(side.v1, side.v2, bottom, top),
                stamp,
            });
        }
        if let Some(wall) = slot.as_ref() {
            ctx.target.add_sky_batch(&wall.vertices, sky_texture, false);
        }
    }

    /// Order the deferred translucent middles far to near
    pub fn sort_alpha_sides(&mut self) {
        self.alpha_sides
            .sort_by(|a, b| b.distance.total_cmp(&a.distance));
    }

    /// Draw every deferred translucent middle in the current order, then
    /// forget them
    pub fn render_alpha_sides(&mut self, ctx: &mut RenderContext) {
        #[cfg(feature = "hprof")]
        profile!("render_alpha_sides");
        let level = ctx.level;
        let frac = self.frac;
        let sides = std::mem::take(&mut self.alpha_sides);
        for alpha in sides.iter() {
            let side = level.side(alpha.side);
            let (Some(texture), Some(partner)) = (side.texture(WallPart::Middle), side.partner)
            else {
                continue;
            };
            let front_sector = level.sector(side.sector);
            let front = render_planes(level, front_sector, alpha.view);
            let back_sector = level.sector(level.side(partner).sector);
            let back = render_planes(level, back_sector, alpha.back_view);
            let stamp = front
                .stamp
                .combine(back.stamp)
                .combine(BuildStamp::of_side(side));
            self.render_wall_part(
                ctx,
                &WallPiece {
                    side: alpha.side,
                    part: WallPart::Middle,
                    view: alpha.view,
                    bottom: higher(front.floor, back.floor, frac),
                    top: lower(front.ceiling, back.ceiling, frac),
                    texture,
                    light_level: front.light_level,
                    alpha: alpha.alpha,
                    colour: front_sector.colour(),
                    stamp,
                    bypass: alpha.bypass,
                    pass: WallPass::Alpha,
                },
            );
        }
        // hand the storage back for the next frame
        self.alpha_sides = sides;
        self.alpha_sides.clear();
    }
}

fn submit(ctx: &mut RenderContext, piece: &WallPiece, vertices: &[StaticVertex]) {
    match piece.pass {
        WallPass::Opaque => ctx.target.submit(piece.texture, vertices),
        WallPass::Alpha => ctx.target.submit_alpha_batch(piece.texture, vertices),
    }
}

/// Midpoint of a side in the map plane
pub fn side_middle(side: &Side) -> Vec2 {
    (side.v1 + side.v2) * 0.5
}
