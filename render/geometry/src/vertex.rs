//! Turning triangulator output in to GPU vertices.

use glam::{Vec2, Vec3};
use level::PlaneKind;
use render_trait::{FlatPoint, SkyVertex, StaticVertex, WallQuad};

use crate::scratch::ScratchBuffer;

/// Sector light levels run 0..=255
pub fn light_to_unit(light_level: i32) -> f32 {
    light_level.clamp(0, 255) as f32 / 255.0
}

/// Vertices a fan over `points` polygon points produces
pub const fn fan_vertex_count(points: usize) -> usize {
    points.saturating_sub(2) * 3
}

pub fn wall_vertices(quad: &WallQuad, light: f32, alpha: f32, colour: Vec3) -> [StaticVertex; 6] {
    quad.triangle_corners().map(|c| StaticVertex {
        pos: c.pos,
        uv: c.uv,
        light,
        alpha,
        colour,
    })
}

/// A sky quad along `v1 -> v2` spanning `bottom..top`, same corner order as
/// textured walls
pub fn sky_wall_vertices(v1: Vec2, v2: Vec2, bottom: f32, top: f32) -> [SkyVertex; 6] {
    let top_left = SkyVertex::new(v1.extend(top));
    let bottom_left = SkyVertex::new(v1.extend(bottom));
    let top_right = SkyVertex::new(v2.extend(top));
    let bottom_right = SkyVertex::new(v2.extend(bottom));
    [
        top_left,
        bottom_left,
        top_right,
        top_right,
        bottom_left,
        bottom_right,
    ]
}

/// Fan triangulate a convex polygon on to the end of `out`.
///
/// Subsector points wind clockwise seen from above. Floors are emitted
/// reversed so both kinds of flat face the viewer that can see them.
pub fn push_flat_fan(
    points: &[FlatPoint],
    facing: PlaneKind,
    light: f32,
    colour: Vec3,
    out: &mut ScratchBuffer<StaticVertex>,
) {
    let vertex = |p: &FlatPoint| StaticVertex {
        pos: p.pos,
        uv: p.uv,
        light,
        alpha: 1.0,
        colour,
    };
    for_each_fan_triangle(points.len(), facing, |a, b, c| {
        out.push(vertex(&points[a]));
        out.push(vertex(&points[b]));
        out.push(vertex(&points[c]));
    });
}

pub fn push_sky_fan(
    points: &[FlatPoint],
    facing: PlaneKind,
    z: f32,
    out: &mut ScratchBuffer<SkyVertex>,
) {
    let vertex = |p: &FlatPoint| SkyVertex::new(p.pos.truncate().extend(z));
    for_each_fan_triangle(points.len(), facing, |a, b, c| {
        out.push(vertex(&points[a]));
        out.push(vertex(&points[b]));
        out.push(vertex(&points[c]));
    });
}

fn for_each_fan_triangle(
    count: usize,
    facing: PlaneKind,
    mut emit: impl FnMut(usize, usize, usize),
) {
    for i in 1..count.saturating_sub(1) {
        match facing {
            PlaneKind::Floor => emit(0, i + 1, i),
            PlaneKind::Ceiling => emit(0, i, i + 1),
        }
    }
}

/// Overwrite only the light and tint, positions and UV stay as they are
pub fn patch_lighting(vertices: &mut [StaticVertex], light: f32, colour: Vec3) {
    for v in vertices.iter_mut() {
        v.light = light;
        v.colour = colour;
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec3};
    use level::PlaneKind;
    use render_trait::{FlatPoint, StaticVertex, WallCorner, WallQuad};

    use super::{
        fan_vertex_count, light_to_unit, patch_lighting, push_flat_fan, sky_wall_vertices,
        wall_vertices,
    };
    use crate::scratch::ScratchBuffer;

    fn pentagon() -> Vec<FlatPoint> {
        [(0.0, 0.0), (0.0, 64.0), (32.0, 96.0), (64.0, 64.0), (64.0, 0.0)]
            .into_iter()
            .map(|(x, y)| FlatPoint {
                pos: Vec3::new(x, y, 8.0),
                uv: Vec2::new(x, y) / 64.0,
            })
            .collect()
    }

    #[test]
    fn light_scaling() {
        assert_eq!(light_to_unit(255), 1.0);
        assert_eq!(light_to_unit(0), 0.0);
        assert_eq!(light_to_unit(300), 1.0);
        assert_eq!(light_to_unit(-20), 0.0);
    }

    #[test]
    fn fan_counts() {
        assert_eq!(fan_vertex_count(0), 0);
        assert_eq!(fan_vertex_count(2), 0);
        assert_eq!(fan_vertex_count(3), 3);
        assert_eq!(fan_vertex_count(4), 6);
        assert_eq!(fan_vertex_count(5), 9);

        let points = pentagon();
        let mut out = ScratchBuffer::default();
        push_flat_fan(&points, PlaneKind::Floor, 1.0, Vec3::ONE, &mut out);
        assert_eq!(out.len(), fan_vertex_count(points.len()));
        push_flat_fan(&points[..2], PlaneKind::Floor, 1.0, Vec3::ONE, &mut out);
        assert_eq!(out.len(), 9);
    }

    #[test]
    fn floor_and_ceiling_wind_opposite() {
        let points = pentagon();
        let mut floor = ScratchBuffer::default();
        let mut ceiling = ScratchBuffer::default();
        push_flat_fan(&points, PlaneKind::Floor, 1.0, Vec3::ONE, &mut floor);
        push_flat_fan(&points, PlaneKind::Ceiling, 1.0, Vec3::ONE, &mut ceiling);
        let f = floor.as_slice();
        let c = ceiling.as_slice();
        assert_eq!(f[0].pos, c[0].pos);
        assert_eq!(f[1].pos, c[2].pos);
        assert_eq!(f[2].pos, c[1].pos);
    }

    #[test]
    fn wall_corner_order() {
        let corner = |x: f32, z: f32| WallCorner {
            pos: Vec3::new(x, 0.0, z),
            uv: Vec2::new(x, z),
        };
        let quad = WallQuad {
            top_left: corner(0.0, 64.0),
            bottom_left: corner(0.0, 0.0),
            top_right: corner(32.0, 64.0),
            bottom_right: corner(32.0, 0.0),
        };
        let verts = wall_vertices(&quad, 0.5, 1.0, Vec3::ONE);
        assert_eq!(verts[0].pos, quad.top_left.pos);
        assert_eq!(verts[5].pos, quad.bottom_right.pos);
        assert!(verts.iter().all(|v| v.light == 0.5));

        let sky = sky_wall_vertices(Vec2::ZERO, Vec2::new(32.0, 0.0), 64.0, 1024.0);
        assert_eq!(sky[0].pos, Vec3::new(0.0, 0.0, 1024.0));
        assert_eq!(sky[5].pos, Vec3::new(32.0, 0.0, 64.0));
    }

    #[test]
    fn light_patch_keeps_geometry() {
        let mut verts = [StaticVertex {
            pos: Vec3::new(1.0, 2.0, 3.0),
            uv: Vec2::new(0.5, 0.25),
            light: 0.2,
            alpha: 1.0,
            colour: Vec3::ONE,
        }; 6];
        patch_lighting(&mut verts, 0.9, Vec3::new(1.0, 0.0, 0.0));
        assert!(verts.iter().all(|v| v.light == 0.9));
        assert!(verts.iter().all(|v| v.colour == Vec3::new(1.0, 0.0, 0.0)));
        assert!(verts.iter().all(|v| v.pos == Vec3::new(1.0, 2.0, 3.0)));
        assert!(verts.iter().all(|v| v.uv == Vec2::new(0.5, 0.25)));
    }
}
