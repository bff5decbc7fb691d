//! Assembles a `LevelData` from plain geometry. Level loaders and tests use
//! this rather than filling the arrays by hand, it keeps ids and partner
//! links consistent.

use glam::Vec2;

use crate::flags::LineDefFlags;
use crate::map_defs::{Edge, Sector, Side, SubSector, TextureHandle, WallPart};
use crate::{LevelData, LevelError};

/// Textures for the three parts of a side
#[derive(Debug, Default, Clone, Copy)]
pub struct SideTextures {
    pub upper: Option<TextureHandle>,
    pub middle: Option<TextureHandle>,
    pub lower: Option<TextureHandle>,
}

impl SideTextures {
    pub const fn middle(texture: TextureHandle) -> Self {
        Self {
            upper: None,
            middle: Some(texture),
            lower: None,
        }
    }

    pub const fn upper_lower(upper: TextureHandle, lower: TextureHandle) -> Self {
        Self {
            upper: Some(upper),
            middle: None,
            lower: Some(lower),
        }
    }
}

#[derive(Default)]
pub struct LevelBuilder {
    sectors: Vec<Sector>,
    sides: Vec<Side>,
    subsectors: Vec<SubSector>,
}

impl LevelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sector(
        &mut self,
        floor_height: f32,
        ceiling_height: f32,
        floor_texture: TextureHandle,
        ceiling_texture: TextureHandle,
        light_level: i32,
    ) -> usize {
        let id = self.sectors.len();
        self.sectors.push(Sector::new(
            id as u32,
            floor_height,
            ceiling_height,
            floor_texture,
            ceiling_texture,
            light_level,
        ));
        id
    }

    /// Link `sector` to a control sector for transfer heights
    pub fn set_transfer_heights(&mut self, sector: usize, control: usize) {
        self.sectors[sector].transfer_heights = Some(control);
    }

    pub fn sector_mut(&mut self, id: usize) -> &mut Sector {
        &mut self.sectors[id]
    }

    pub fn side_mut(&mut self, id: usize) -> &mut Side {
        &mut self.sides[id]
    }

    /// A wall with only a front. Returns the side id.
    pub fn add_one_sided_line(
        &mut self,
        v1: Vec2,
        v2: Vec2,
        sector: usize,
        textures: SideTextures,
        line_flags: u32,
    ) -> usize {
        self.push_side(v1, v2, sector, textures, line_flags & !(LineDefFlags::TwoSided as u32))
    }

    /// A line with a side facing each sector. The back side runs v2 -> v1.
    /// Returns `(front, back)` side ids.
    pub fn add_two_sided_line(
        &mut self,
        v1: Vec2,
        v2: Vec2,
        front_sector: usize,
        back_sector: usize,
        front_textures: SideTextures,
        back_textures: SideTextures,
        line_flags: u32,
    ) -> (usize, usize) {
        let flags = line_flags | LineDefFlags::TwoSided as u32;
        let front = self.push_side(v1, v2, front_sector, front_textures, flags);
        let back = self.push_side(v2, v1, back_sector, back_textures, flags);
        self.sides[front].partner = Some(back);
        self.sides[back].partner = Some(front);
        (front, back)
    }

    fn push_side(
        &mut self,
        v1: Vec2,
        v2: Vec2,
        sector: usize,
        textures: SideTextures,
        line_flags: u32,
    ) -> usize {
        let id = self.sides.len();
        let mut side = Side::new(id as u32, v1, v2, sector);
        side.line_flags = line_flags;
        side.set_texture(WallPart::Upper, textures.upper);
        side.set_texture(WallPart::Middle, textures.middle);
        side.set_texture(WallPart::Lower, textures.lower);
        self.sides.push(side);
        id
    }

    /// A convex polygon. `sides[i]` is the wall along `points[i] -> points[i + 1]`.
    pub fn add_subsector(
        &mut self,
        sector: usize,
        points: &[Vec2],
        sides: &[Option<usize>],
    ) -> usize {
        let id = self.subsectors.len();
        let edges = points
            .iter()
            .enumerate()
            .map(|(i, start)| Edge {
                start: *start,
                end: points[(i + 1) % points.len()],
                side: sides.get(i).copied().flatten(),
            })
            .collect();
        self.subsectors.push(SubSector {
            num: id as u32,
            sector,
            edges,
        });
        id
    }

    pub fn build(self) -> Result<LevelData, LevelError> {
        LevelData::new(self.sectors, self.sides, self.subsectors)
    }
}
