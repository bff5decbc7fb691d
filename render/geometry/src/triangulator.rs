use glam::Vec2;
use level::{Plane, Side, SubSector, WallPart};
use render_trait::{FlatPoint, TextureDimension, Triangulator, WallCorner, WallQuad};

/// Places walls and flats in world space with planar texture mapping. Enough
/// for any renderer that doesn't need its own UV rules.
#[derive(Debug, Default, Clone, Copy)]
pub struct WorldTriangulator;

impl WorldTriangulator {
    /// The z at which V is zero. Pegging decides which edge of the wall the
    /// texture hangs from.
    fn anchor_z(side: &Side, part: WallPart, bottom: f32, top: f32, tex_height: f32) -> f32 {
        let pin = side.pin();
        match part {
            WallPart::Upper => {
                if pin.unpeg_top() {
                    top
                } else {
                    bottom + tex_height
                }
            }
            WallPart::Middle | WallPart::Lower => {
                if pin.unpeg_bottom() {
                    bottom + tex_height
                } else {
                    top
                }
            }
        }
    }
}

impl Triangulator for WorldTriangulator {
    fn triangulate_wall(
        &self,
        side: &Side,
        part: WallPart,
        bottom: &Plane,
        top: &Plane,
        texture: &TextureDimension,
        frac: f32,
    ) -> WallQuad {
        let bottom_z = bottom.interpolated_height(frac);
        let top_z = top.interpolated_height(frac);
        let offset = side.offset();

        let u_start = offset.x * texture.uv_inverse.x;
        let u_end = (offset.x + side.length()) * texture.uv_inverse.x;
        let anchor = Self::anchor_z(side, part, bottom_z, top_z, texture.height);
        let v = |z: f32| (anchor - z + offset.y) * texture.uv_inverse.y;

        let corner = |p: Vec2, u: f32, z: f32| WallCorner {
            pos: p.extend(z),
            uv: Vec2::new(u, v(z)),
        };
        WallQuad {
            top_left: corner(side.v1, u_start, top_z),
            bottom_left: corner(side.v1, u_start, bottom_z),
            top_right: corner(side.v2, u_end, top_z),
            bottom_right: corner(side.v2, u_end, bottom_z),
        }
    }

    fn triangulate_flat(
        &self,
        subsector: &SubSector,
        plane: &Plane,
        texture: &TextureDimension,
        frac: f32,
        out: &mut Vec<FlatPoint>,
    ) {
        out.clear();
        let z = plane.interpolated_height(frac);
        let offset = plane.offset();
        out.extend(subsector.points().map(|p| FlatPoint {
            pos: p.extend(z),
            uv: (p + offset) * texture.uv_inverse,
        }));
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec3};
    use level::{Edge, LineDefFlags, Plane, PlaneKind, Side, SubSector, WallPart};
    use render_trait::{TextureDimension, Triangulator};

    use super::WorldTriangulator;

    fn side(flags: u32) -> Side {
        let mut side = Side::new(0, Vec2::ZERO, Vec2::new(128.0, 0.0), 0);
        side.line_flags = flags;
        side
    }

    #[test]
    fn wall_positions_follow_planes() {
        let floor = Plane::new(PlaneKind::Floor, 0.0, 1, 160);
        let mut ceiling = Plane::new(PlaneKind::Ceiling, 64.0, 1, 160);
        ceiling.set_height(128.0);
        let tex = TextureDimension::new(64.0, 64.0);

        let quad = WorldTriangulator.triangulate_wall(
            &side(0),
            WallPart::Middle,
            &floor,
            &ceiling,
            &tex,
            0.5,
        );
        assert_eq!(quad.top_left.pos, Vec3::new(0.0, 0.0, 96.0));
        assert_eq!(quad.bottom_right.pos, Vec3::new(128.0, 0.0, 0.0));
        assert_eq!(quad.top_right.uv.x, 2.0);
        // pegged middle hangs from the top
        assert_eq!(quad.top_left.uv.y, 0.0);
        assert_eq!(quad.bottom_left.uv.y, 1.5);
    }

    #[test]
    fn unpegged_lower_sits_on_floor() {
        let floor = Plane::new(PlaneKind::Floor, 0.0, 1, 160);
        let step = Plane::new(PlaneKind::Floor, 24.0, 1, 160);
        let tex = TextureDimension::new(64.0, 64.0);

        let quad = WorldTriangulator.triangulate_wall(
            &side(LineDefFlags::UnpegBottom as u32),
            WallPart::Lower,
            &floor,
            &step,
            &tex,
            1.0,
        );
        assert_eq!(quad.bottom_left.uv.y, 1.0);
        assert_eq!(quad.top_left.uv.y, 1.0 - 24.0 / 64.0);
    }

    #[test]
    fn flat_points_carry_plane_height() {
        let plane = Plane::new(PlaneKind::Ceiling, 72.0, 1, 160);
        let points = [Vec2::ZERO, Vec2::new(0.0, 64.0), Vec2::new(64.0, 0.0)];
        let subsector = SubSector {
            num: 0,
            sector: 0,
            edges: (0..3)
                .map(|i| Edge {
                    start: points[i],
                    end: points[(i + 1) % 3],
                    side: None,
                })
                .collect(),
        };
        let mut out = vec![Default::default(); 8];
        let tex = TextureDimension::new(64.0, 64.0);
        WorldTriangulator.triangulate_flat(&subsector, &plane, &tex, 1.0, &mut out);
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|p| p.pos.z == 72.0));
        assert_eq!(out[1].uv, Vec2::new(0.0, 1.0));
    }
}
