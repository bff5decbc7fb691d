use glam::{Vec2, Vec3};

use crate::flags::{ALL_WALL_PARTS, LineDefFlags, WallTexPin};

/// Index in to the texture manager's tables. What it resolves to is up to the
/// texture manager, the level only stores it.
pub type TextureHandle = usize;

#[repr(usize)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaneKind {
    Floor = 0,
    Ceiling = 1,
}

impl PlaneKind {
    pub const ALL: [PlaneKind; 2] = [PlaneKind::Floor, PlaneKind::Ceiling];

    pub const fn index(self) -> usize {
        self as usize
    }
}

#[repr(usize)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WallPart {
    Lower = 0,
    Middle = 1,
    Upper = 2,
}

impl WallPart {
    pub const ALL: [WallPart; 3] = [WallPart::Lower, WallPart::Middle, WallPart::Upper];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// The bit used for this part in `Side::dynamic_parts`
    pub const fn flag(self) -> u8 {
        1 << self as u8
    }
}

/// A floor or ceiling surface of a sector.
///
/// Every mutator bumps a generation counter. The counters only ever
/// increase, which lets a consumer detect "changed since I last looked" by
/// remembering the values it saw.
#[derive(Debug, Clone)]
pub struct Plane {
    pub kind: PlaneKind,
    height: f32,
    /// Height at the start of the current gametic, for interpolation
    prev_height: f32,
    texture: TextureHandle,
    light_level: i32,
    /// Flat scrolling offset
    offset: Vec2,
    /// `false` if the static geometry path owns this plane
    pub dynamic: bool,
    geometry_generation: u32,
    light_generation: u32,
}

impl Plane {
    pub fn new(kind: PlaneKind, height: f32, texture: TextureHandle, light_level: i32) -> Self {
        Self {
            kind,
            height,
            prev_height: height,
            texture,
            light_level,
            offset: Vec2::ZERO,
            dynamic: true,
            geometry_generation: 0,
            light_generation: 0,
        }
    }

    pub const fn height(&self) -> f32 {
        self.height
    }

    pub const fn prev_height(&self) -> f32 {
        self.prev_height
    }

    pub const fn texture(&self) -> TextureHandle {
        self.texture
    }

    pub const fn light_level(&self) -> i32 {
        self.light_level
    }

    pub const fn offset(&self) -> Vec2 {
        self.offset
    }

    pub const fn geometry_generation(&self) -> u32 {
        self.geometry_generation
    }

    pub const fn light_generation(&self) -> u32 {
        self.light_generation
    }

    /// Height blended between the previous and current gametic
    pub fn interpolated_height(&self, frac: f32) -> f32 {
        self.prev_height + (self.height - self.prev_height) * frac
    }

    /// The plane moved during the last gametic, geometry built from it is
    /// only valid for the interpolation fraction it was built with
    pub fn is_animating(&self) -> bool {
        self.prev_height != self.height
    }

    pub fn set_height(&mut self, height: f32) {
        if self.height != height {
            self.height = height;
            self.geometry_generation += 1;
        }
    }

    /// Changes the flat texture. UV extents depend on the texture so this is
    /// a geometry change.
    pub fn set_texture(&mut self, texture: TextureHandle) {
        if self.texture != texture {
            self.texture = texture;
            self.geometry_generation += 1;
        }
    }

    pub fn set_offset(&mut self, offset: Vec2) {
        if self.offset != offset {
            self.offset = offset;
            self.geometry_generation += 1;
        }
    }

    pub fn set_light_level(&mut self, light_level: i32) {
        if self.light_level != light_level {
            self.light_level = light_level;
            self.light_generation += 1;
        }
    }

    /// Snapshot the current height as the interpolation start point
    pub(crate) fn store_prev_height(&mut self) {
        self.prev_height = self.height;
    }
}

/// The SECTORS record, at runtime.
#[derive(Debug, Clone)]
pub struct Sector {
    /// An incremented "ID" of sorts. Also the index in the level's sector array.
    pub num: u32,
    pub floor: Plane,
    pub ceiling: Plane,
    /// Control sector whose planes stand in for this sector's depending on
    /// where the viewer is
    pub transfer_heights: Option<usize>,
    /// RGB tint applied to everything lit by this sector
    colour: Vec3,
}

impl Sector {
    pub fn new(
        num: u32,
        floor_height: f32,
        ceiling_height: f32,
        floor_texture: TextureHandle,
        ceiling_texture: TextureHandle,
        light_level: i32,
    ) -> Self {
        Self {
            num,
            floor: Plane::new(PlaneKind::Floor, floor_height, floor_texture, light_level),
            ceiling: Plane::new(PlaneKind::Ceiling, ceiling_height, ceiling_texture, light_level),
            transfer_heights: None,
            colour: Vec3::ONE,
        }
    }

    pub const fn plane(&self, kind: PlaneKind) -> &Plane {
        match kind {
            PlaneKind::Floor => &self.floor,
            PlaneKind::Ceiling => &self.ceiling,
        }
    }

    pub fn plane_mut(&mut self, kind: PlaneKind) -> &mut Plane {
        match kind {
            PlaneKind::Floor => &mut self.floor,
            PlaneKind::Ceiling => &mut self.ceiling,
        }
    }

    /// Walls take the sector light, which is stored on the floor plane
    pub const fn light_level(&self) -> i32 {
        self.floor.light_level
    }

    /// Sets the light of the whole sector, both planes
    pub fn set_light_level(&mut self, light_level: i32) {
        self.floor.set_light_level(light_level);
        self.ceiling.set_light_level(light_level);
    }

    pub const fn colour(&self) -> Vec3 {
        self.colour
    }

    /// The tint is lighting, a change bumps the light generation of both
    /// planes
    pub fn set_colour(&mut self, colour: Vec3) {
        if self.colour != colour {
            self.colour = colour;
            self.floor.light_generation += 1;
            self.ceiling.light_generation += 1;
        }
    }
}

/// One face of a line. Up to three texture parts, indexed by `WallPart`.
#[derive(Debug, Clone)]
pub struct Side {
    /// Also the index in the level's side array
    pub num: u32,
    /// Vertices, from v1 to v2, in the order that faces this side's sector
    pub v1: Vec2,
    pub v2: Vec2,
    /// Sector the side is facing
    pub sector: usize,
    /// The side on the other face of the line, if two-sided
    pub partner: Option<usize>,
    /// Flags of the owning line, see `LineDefFlags`
    pub line_flags: u32,
    /// Line translucency, 1.0 is opaque
    alpha: f32,
    textures: [Option<TextureHandle>; 3],
    offset: Vec2,
    offset_generation: u32,
    /// Bitmask of `WallPart::flag()` for parts drawn by the dynamic path
    pub dynamic_parts: u8,
}

impl Side {
    pub fn new(num: u32, v1: Vec2, v2: Vec2, sector: usize) -> Self {
        Self {
            num,
            v1,
            v2,
            sector,
            partner: None,
            line_flags: 0,
            alpha: 1.0,
            textures: [None; 3],
            offset: Vec2::ZERO,
            offset_generation: 0,
            dynamic_parts: ALL_WALL_PARTS,
        }
    }

    pub const fn is_two_sided(&self) -> bool {
        self.line_flags & LineDefFlags::TwoSided as u32 != 0
    }

    pub fn pin(&self) -> WallTexPin {
        WallTexPin::from(self.line_flags)
    }

    pub const fn texture(&self, part: WallPart) -> Option<TextureHandle> {
        self.textures[part.index()]
    }

    pub const fn offset(&self) -> Vec2 {
        self.offset
    }

    pub const fn alpha(&self) -> f32 {
        self.alpha
    }

    pub const fn offset_generation(&self) -> u32 {
        self.offset_generation
    }

    pub const fn is_dynamic(&self, part: WallPart) -> bool {
        self.dynamic_parts & part.flag() != 0
    }

    pub fn length(&self) -> f32 {
        (self.v2 - self.v1).length()
    }

    pub fn set_offset(&mut self, offset: Vec2) {
        if self.offset != offset {
            self.offset = offset;
            self.offset_generation += 1;
        }
    }

    /// Switch textures swap UV extents, so a texture change counts as an
    /// offset change
    pub fn set_texture(&mut self, part: WallPart, texture: Option<TextureHandle>) {
        if self.textures[part.index()] != texture {
            self.textures[part.index()] = texture;
            self.offset_generation += 1;
        }
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        if self.alpha != alpha {
            self.alpha = alpha;
            self.offset_generation += 1;
        }
    }
}

/// One edge of a subsector polygon
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    pub start: Vec2,
    pub end: Vec2,
    /// The wall along this edge, `None` for edges made by BSP splits
    pub side: Option<usize>,
}

/// A convex polygon leaf of the BSP. Edges are ordered and each edge's end is
/// the next edge's start.
#[derive(Debug, Clone)]
pub struct SubSector {
    pub num: u32,
    pub sector: usize,
    pub edges: Vec<Edge>,
}

impl SubSector {
    /// Polygon points in edge order
    pub fn points(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.edges.iter().map(|e| e.start)
    }

    pub fn centroid(&self) -> Vec2 {
        if self.edges.is_empty() {
            return Vec2::ZERO;
        }
        self.points().fold(Vec2::ZERO, |acc, p| acc + p) / self.edges.len() as f32
    }

    /// Can this subsector produce at least one triangle
    pub fn is_degenerate(&self) -> bool {
        self.edges.len() < 3
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec3};

    use super::{Plane, PlaneKind, Sector, Side, WallPart};
    use crate::flags::{LineDefFlags, WallPartFlags};

    #[test]
    fn plane_generations_only_bump_on_change() {
        let mut plane = Plane::new(PlaneKind::Floor, 0.0, 1, 160);
        plane.set_height(0.0);
        assert_eq!(plane.geometry_generation(), 0);
        plane.set_height(32.0);
        assert_eq!(plane.geometry_generation(), 1);
        plane.set_texture(2);
        assert_eq!(plane.geometry_generation(), 2);
        plane.set_light_level(200);
        assert_eq!(plane.geometry_generation(), 2);
        assert_eq!(plane.light_generation(), 1);
    }

    #[test]
    fn plane_interpolation() {
        let mut plane = Plane::new(PlaneKind::Ceiling, 64.0, 1, 160);
        plane.set_height(128.0);
        assert!(plane.is_animating());
        assert_eq!(plane.interpolated_height(0.0), 64.0);
        assert_eq!(plane.interpolated_height(0.5), 96.0);
        assert_eq!(plane.interpolated_height(1.0), 128.0);
        plane.store_prev_height();
        assert!(!plane.is_animating());
        assert_eq!(plane.interpolated_height(0.25), 128.0);
    }

    #[test]
    fn sector_light_sets_both_planes() {
        let mut sector = Sector::new(0, 0.0, 128.0, 1, 2, 160);
        sector.set_light_level(96);
        assert_eq!(sector.light_level(), 96);
        assert_eq!(sector.ceiling.light_level(), 96);
        assert_eq!(sector.plane(PlaneKind::Ceiling).light_generation(), 1);
    }

    #[test]
    fn sector_colour_is_lighting() {
        let mut sector = Sector::new(0, 0.0, 128.0, 1, 2, 160);
        assert_eq!(sector.colour(), Vec3::ONE);
        sector.set_colour(Vec3::ONE);
        assert_eq!(sector.floor.light_generation(), 0);
        sector.set_colour(Vec3::new(1.0, 0.5, 0.5));
        assert_eq!(sector.colour(), Vec3::new(1.0, 0.5, 0.5));
        assert_eq!(sector.floor.light_generation(), 1);
        assert_eq!(sector.ceiling.light_generation(), 1);
        assert_eq!(sector.floor.geometry_generation(), 0);
    }

    #[test]
    fn side_dynamic_parts_and_flags() {
        let mut side = Side::new(0, Vec2::ZERO, Vec2::new(64.0, 0.0), 0);
        assert!(WallPart::ALL.iter().all(|p| side.is_dynamic(*p)));
        side.dynamic_parts = WallPartFlags::Middle as u8;
        assert!(side.is_dynamic(WallPart::Middle));
        assert!(!side.is_dynamic(WallPart::Upper));
        assert!(!side.is_two_sided());
        side.line_flags |= LineDefFlags::TwoSided as u32;
        assert!(side.is_two_sided());
        assert_eq!(side.length(), 64.0);
    }

    #[test]
    fn side_offset_generation() {
        let mut side = Side::new(0, Vec2::ZERO, Vec2::X, 0);
        side.set_offset(Vec2::new(8.0, 0.0));
        side.set_texture(WallPart::Upper, Some(3));
        side.set_texture(WallPart::Upper, Some(3));
        assert_eq!(side.offset_generation(), 2);
        assert_eq!(side.texture(WallPart::Upper), Some(3));
        assert_eq!(side.texture(WallPart::Lower), None);
    }
}
