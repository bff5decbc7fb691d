//! A corridor of square rooms generated for the bench. Room kinds cycle so
//! a run passes every path through the geometry cache: lifts that move,
//! lights that flicker, scrolling walls, sky ceilings, translucent windows
//! and pools with a transfer heights control sector.

use glam::Vec2;
use level::{LevelBuilder, LevelData, LevelError, LineDefFlags, SideTextures, TextureHandle};

pub const FLOOR: TextureHandle = 1;
pub const CEILING: TextureHandle = 2;
pub const WALL: TextureHandle = 3;
pub const STEP: TextureHandle = 4;
pub const GLASS: TextureHandle = 5;
pub const WATER: TextureHandle = 6;
pub const SKY_FLAT: TextureHandle = 7;
pub const SKY_TEXTURE: TextureHandle = 8;

pub const ROOM_SIZE: f32 = 128.0;
const HALF: f32 = ROOM_SIZE / 2.0;
/// Keeps the camera off the end walls
const WALK_MARGIN: f32 = 16.0;
const LIFT_TRAVEL: f32 = 48.0;
const LIFT_PERIOD: u32 = 70;
const GLASS_ALPHA: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomKind {
    /// Owned by the static path, the dynamic cache never draws it
    Plain,
    Lift,
    Sky,
    Pool,
    Flicker,
}

impl RoomKind {
    fn for_room(room: usize) -> Self {
        match room % 5 {
            0 => RoomKind::Plain,
            1 => RoomKind::Lift,
            2 => RoomKind::Sky,
            3 => RoomKind::Pool,
            _ => RoomKind::Flicker,
        }
    }
}

pub struct GeneratedMap {
    pub level: LevelData,
    /// Sector id and kind of each room, in corridor order
    pub rooms: Vec<(usize, RoomKind)>,
    lifts: Vec<usize>,
    flickers: Vec<usize>,
    scrollers: Vec<usize>,
    width: f32,
}

/// Clockwise from the bottom left corner
fn rect(x: f32, y: f32, w: f32, h: f32) -> [Vec2; 4] {
    [
        Vec2::new(x, y),
        Vec2::new(x, y + h),
        Vec2::new(x + w, y + h),
        Vec2::new(x + w, y),
    ]
}

impl GeneratedMap {
    pub fn new(room_count: usize) -> Result<Self, LevelError> {
        let room_count = room_count.max(1);
        let mut builder = LevelBuilder::new();
        let mut rooms = Vec::with_capacity(room_count);
        let mut lifts = Vec::new();
        let mut flickers = Vec::new();
        let mut scrollers = Vec::new();

        for room in 0..room_count {
            let kind = RoomKind::for_room(room);
            let sector = match kind {
                RoomKind::Plain | RoomKind::Lift => {
                    builder.add_sector(0.0, 128.0, FLOOR, CEILING, 160)
                }
                RoomKind::Sky => builder.add_sector(8.0, 160.0, FLOOR, SKY_FLAT, 224),
                RoomKind::Pool => {
                    let pool = builder.add_sector(-64.0, 128.0, FLOOR, CEILING, 144);
                    let water = builder.add_sector(0.0, 160.0, WATER, WATER, 96);
                    builder.set_transfer_heights(pool, water);
                    pool
                }
                RoomKind::Flicker => builder.add_sector(0.0, 112.0, FLOOR, CEILING, 192),
            };
            match kind {
                RoomKind::Plain => {
                    let sector = builder.sector_mut(sector);
                    sector.floor.dynamic = false;
                    sector.ceiling.dynamic = false;
                }
                RoomKind::Lift => lifts.push(sector),
                RoomKind::Flicker => flickers.push(sector),
                _ => {}
            }
            rooms.push((sector, kind));
        }

        let mut left_side = None;
        for (room, &(sector, kind)) in rooms.iter().enumerate() {
            let x0 = room as f32 * ROOM_SIZE;
            let x1 = x0 + ROOM_SIZE;

            let outer_wall = |builder: &mut LevelBuilder, v1: Vec2, v2: Vec2| {
                let side =
                    builder.add_one_sided_line(v1, v2, sector, SideTextures::middle(WALL), 0);
                if kind == RoomKind::Plain {
                    builder.side_mut(side).dynamic_parts = 0;
                }
                side
            };

            let left = match left_side {
                Some(side) => side,
                None => outer_wall(&mut builder, Vec2::new(x0, 0.0), Vec2::new(x0, ROOM_SIZE)),
            };
            let mid = x0 + HALF;
            let top_left =
                outer_wall(&mut builder, Vec2::new(x0, ROOM_SIZE), Vec2::new(mid, ROOM_SIZE));
            let top_right =
                outer_wall(&mut builder, Vec2::new(mid, ROOM_SIZE), Vec2::new(x1, ROOM_SIZE));
            let bottom_right = outer_wall(&mut builder, Vec2::new(x1, 0.0), Vec2::new(mid, 0.0));
            let bottom_left = outer_wall(&mut builder, Vec2::new(mid, 0.0), Vec2::new(x0, 0.0));
            if kind == RoomKind::Flicker {
                scrollers.push(top_left);
            }

            let right = match rooms.get(room + 1) {
                Some(&(next, _)) => {
                    let textures = if room % 3 == 2 {
                        SideTextures {
                            middle: Some(GLASS),
                            ..SideTextures::upper_lower(STEP, STEP)
                        }
                    } else {
                        SideTextures::upper_lower(STEP, STEP)
                    };
                    let (front, back) = builder.add_two_sided_line(
                        Vec2::new(x1, ROOM_SIZE),
                        Vec2::new(x1, 0.0),
                        sector,
                        next,
                        textures,
                        textures,
                        LineDefFlags::UnpegTop as u32,
                    );
                    if textures.middle.is_some() {
                        builder.side_mut(front).set_alpha(GLASS_ALPHA);
                        builder.side_mut(back).set_alpha(GLASS_ALPHA);
                    }
                    left_side = Some(back);
                    front
                }
                None => outer_wall(&mut builder, Vec2::new(x1, ROOM_SIZE), Vec2::new(x1, 0.0)),
            };

            // two subsectors per room, split down the middle with no wall
            builder.add_subsector(
                sector,
                &rect(x0, 0.0, HALF, ROOM_SIZE),
                &[Some(left), Some(top_left), None, Some(bottom_left)],
            );
            builder.add_subsector(
                sector,
                &rect(x0 + HALF, 0.0, HALF, ROOM_SIZE),
                &[None, Some(top_right), Some(right), Some(bottom_right)],
            );
        }

        Ok(Self {
            level: builder.build()?,
            rooms,
            lifts,
            flickers,
            scrollers,
            width: room_count as f32 * ROOM_SIZE,
        })
    }

    /// Move everything that moves to where it is at `tic`. Call after
    /// `LevelData::tick` so the previous heights are kept for interpolation.
    pub fn animate(&mut self, tic: u32) {
        let phase = tic % LIFT_PERIOD;
        let half = LIFT_PERIOD / 2;
        let step = if phase < half { phase } else { LIFT_PERIOD - phase };
        let lift_height = LIFT_TRAVEL * step as f32 / half as f32;
        for &sector in &self.lifts {
            self.level.sector_mut(sector).floor.set_height(lift_height);
        }

        let light = if (tic / 4) % 3 == 0 { 96 } else { 192 };
        for &sector in &self.flickers {
            self.level.sector_mut(sector).set_light_level(light);
        }

        for &side in &self.scrollers {
            self.level.side_mut(side).set_offset(Vec2::new(tic as f32, 0.0));
        }
    }

    /// Camera position for `frame` of `frames`. Walks the corridor to the
    /// far end and back.
    pub fn camera(&self, frame: u32, frames: u32) -> Vec2 {
        let t = if frames > 1 {
            frame as f32 / (frames - 1) as f32
        } else {
            0.0
        };
        let there_and_back = 1.0 - (2.0 * t - 1.0).abs();
        let walk = self.width - 2.0 * WALK_MARGIN;
        Vec2::new(WALK_MARGIN + there_and_back * walk, HALF - 8.0)
    }
}
