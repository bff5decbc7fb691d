//! Transfer heights: a sector linked to a control sector borrows the control
//! sector's planes depending on which vertical region the viewer is in.
//!
//! Three views exist. `Middle` is the canonical one where the sector's own
//! planes are used for walls. `Bottom` is picked when the viewer is under the
//! control floor, `Top` when above the control ceiling.

use level::{LevelData, Plane, PlaneKind, Sector};

use crate::cache::{BuildStamp, FlatSlot};

pub const VIEW_COUNT: usize = 3;

#[repr(usize)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferHeightView {
    #[default]
    Middle = 0,
    Top = 1,
    Bottom = 2,
}

impl TransferHeightView {
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn is_canonical(self) -> bool {
        matches!(self, TransferHeightView::Middle)
    }
}

/// Anything out of range is treated as the canonical view
impl From<usize> for TransferHeightView {
    fn from(index: usize) -> Self {
        match index {
            1 => TransferHeightView::Top,
            2 => TransferHeightView::Bottom,
            _ => TransferHeightView::Middle,
        }
    }
}

/// Which view applies to a sector controlled by `control`, for a viewer at
/// `view_z` standing in `view_sector`.
///
/// If the viewer stands in a transfer-heights sector its own control sector
/// decides, the viewer's region is what matters for everything they see.
pub fn select_view(
    level: &LevelData,
    view_z: f32,
    view_sector: &Sector,
    control: &Sector,
    frac: f32,
) -> TransferHeightView {
    let control = level.transfer_heights(view_sector).unwrap_or(control);
    if view_z < control.floor.interpolated_height(frac) {
        TransferHeightView::Bottom
    } else if view_z > control.ceiling.interpolated_height(frac) {
        TransferHeightView::Top
    } else {
        TransferHeightView::Middle
    }
}

/// The view for `sector`, `Middle` if it has no control sector
pub fn view_for_sector(
    level: &LevelData,
    view_z: f32,
    view_sector: &Sector,
    sector: &Sector,
    frac: f32,
) -> TransferHeightView {
    match level.transfer_heights(sector) {
        Some(control) => select_view(level, view_z, view_sector, control, frac),
        None => TransferHeightView::Middle,
    }
}

/// The planes a sector is drawn with in a given view
#[derive(Debug, Clone, Copy)]
pub struct RenderPlanes<'a> {
    pub floor: &'a Plane,
    pub ceiling: &'a Plane,
    pub light_level: i32,
    /// Covers the sector and, if linked, its control sector
    pub stamp: BuildStamp,
}

impl<'a> RenderPlanes<'a> {
    pub const fn plane(&self, kind: PlaneKind) -> &'a Plane {
        match kind {
            PlaneKind::Floor => self.floor,
            PlaneKind::Ceiling => self.ceiling,
        }
    }

    /// Light a flat is drawn with. Each plane carries its own light in the
    /// middle view, the alternate views are lit by the control sector.
    pub fn flat_light(&self, kind: PlaneKind, view: TransferHeightView) -> i32 {
        if view.is_canonical() {
            self.plane(kind).light_level()
        } else {
            self.light_level
        }
    }
}

pub fn render_planes<'a>(
    level: &'a LevelData,
    sector: &'a Sector,
    view: TransferHeightView,
) -> RenderPlanes<'a> {
    let own = BuildStamp::of_sector(sector);
    let Some(control) = level.transfer_heights(sector) else {
        return RenderPlanes {
            floor: &sector.floor,
            ceiling: &sector.ceiling,
            light_level: sector.light_level(),
            stamp: own,
        };
    };

    let stamp = own.combine(BuildStamp::of_sector(control));
    match view {
        TransferHeightView::Middle => RenderPlanes {
            floor: &sector.floor,
            ceiling: &sector.ceiling,
            light_level: sector.light_level(),
            stamp,
        },
        TransferHeightView::Bottom => RenderPlanes {
            floor: &sector.floor,
            ceiling: &control.floor,
            light_level: control.light_level(),
            stamp,
        },
        TransferHeightView::Top => RenderPlanes {
            floor: &control.ceiling,
            ceiling: &sector.ceiling,
            light_level: control.light_level(),
            stamp,
        },
    }
}

/// One flat to draw for a sector: which slot it caches in, and the plane
/// data it is drawn from
#[derive(Debug, Clone, Copy)]
pub struct FlatSurface<'a> {
    pub slot: FlatSlot,
    pub plane: &'a Plane,
    pub light_level: i32,
    pub stamp: BuildStamp,
}

/// Every flat `sector` shows in `view`. Up to four in the middle view: the
/// own floor and ceiling plus the control sector's floor and ceiling.
pub fn flat_surfaces<'a>(
    level: &'a LevelData,
    sector: &'a Sector,
    view: TransferHeightView,
) -> [Option<FlatSurface<'a>>; 4] {
    let planes = render_planes(level, sector, view);
    let mut surfaces = [
        Some(FlatSurface {
            slot: FlatSlot::Floor,
            plane: planes.floor,
            light_level: planes.flat_light(PlaneKind::Floor, view),
            stamp: planes.stamp,
        }),
        Some(FlatSurface {
            slot: FlatSlot::Ceiling,
            plane: planes.ceiling,
            light_level: planes.flat_light(PlaneKind::Ceiling, view),
            stamp: planes.stamp,
        }),
        None,
        None,
    ];

    if view.is_canonical() {
        if let Some(control) = level.transfer_heights(sector) {
            surfaces[2] = Some(FlatSurface {
                slot: FlatSlot::ControlFloor,
                plane: &control.floor,
                light_level: control.floor.light_level(),
                stamp: planes.stamp,
            });
            surfaces[3] = Some(FlatSurface {
                slot: FlatSlot::ControlCeiling,
                plane: &control.ceiling,
                light_level: control.ceiling.light_level(),
                stamp: planes.stamp,
            });
        }
    }
    surfaces
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use level::{LevelBuilder, LevelData};

    use super::{TransferHeightView, flat_surfaces, render_planes, select_view, view_for_sector};
    use crate::cache::FlatSlot;

    /// Sector 0 is the pool, sector 1 the control with a "water" floor at 32
    /// and a ceiling at 96, sector 2 an ordinary room
    fn pool_level() -> LevelData {
        let mut builder = LevelBuilder::new();
        let pool = builder.add_sector(0.0, 128.0, 1, 2, 160);
        let control = builder.add_sector(32.0, 96.0, 5, 6, 80);
        builder.add_sector(0.0, 128.0, 1, 2, 200);
        builder.set_transfer_heights(pool, control);
        let points = [
            Vec2::ZERO,
            Vec2::new(0.0, 64.0),
            Vec2::new(64.0, 64.0),
            Vec2::new(64.0, 0.0),
        ];
        builder.add_subsector(pool, &points, &[None; 4]);
        builder.build().unwrap()
    }

    #[test]
    fn view_from_camera_height() {
        let level = pool_level();
        let pool = level.sector(0);
        let control = level.sector(1);
        let room = level.sector(2);

        assert_eq!(select_view(&level, 16.0, room, control, 1.0), TransferHeightView::Bottom);
        assert_eq!(select_view(&level, 32.0, room, control, 1.0), TransferHeightView::Middle);
        assert_eq!(select_view(&level, 64.0, room, control, 1.0), TransferHeightView::Middle);
        assert_eq!(select_view(&level, 120.0, room, control, 1.0), TransferHeightView::Top);

        assert_eq!(view_for_sector(&level, 16.0, room, room, 1.0), TransferHeightView::Middle);
        assert_eq!(view_for_sector(&level, 16.0, room, pool, 1.0), TransferHeightView::Bottom);
    }

    #[test]
    fn viewer_control_sector_wins() {
        let mut level = pool_level();
        // the room now uses the pool itself as its control, 0..128
        level.sector_mut(2).transfer_heights = Some(0);
        let room = level.sector(2);
        let control = level.sector(1);
        assert_eq!(select_view(&level, 16.0, room, control, 1.0), TransferHeightView::Middle);
        level.sector_mut(2).transfer_heights = None;
        let room = level.sector(2);
        let control = level.sector(1);
        assert_eq!(select_view(&level, 16.0, room, control, 1.0), TransferHeightView::Bottom);
    }

    #[test]
    fn out_of_range_index_is_middle() {
        assert_eq!(TransferHeightView::from(0), TransferHeightView::Middle);
        assert_eq!(TransferHeightView::from(1), TransferHeightView::Top);
        assert_eq!(TransferHeightView::from(2), TransferHeightView::Bottom);
        assert_eq!(TransferHeightView::from(3), TransferHeightView::Middle);
        assert_eq!(TransferHeightView::from(usize::MAX), TransferHeightView::Middle);
    }

    #[test]
    fn substituted_planes() {
        let level = pool_level();
        let pool = level.sector(0);

        let middle = render_planes(&level, pool, TransferHeightView::Middle);
        assert_eq!(middle.floor.height(), 0.0);
        assert_eq!(middle.ceiling.height(), 128.0);
        assert_eq!(middle.light_level, 160);

        let bottom = render_planes(&level, pool, TransferHeightView::Bottom);
        assert_eq!(bottom.floor.height(), 0.0);
        assert_eq!(bottom.ceiling.height(), 32.0);
        assert_eq!(bottom.ceiling.texture(), 5);
        assert_eq!(bottom.light_level, 80);

        let top = render_planes(&level, pool, TransferHeightView::Top);
        assert_eq!(top.floor.height(), 96.0);
        assert_eq!(top.ceiling.height(), 128.0);
    }

    #[test]
    fn control_change_invalidates_stamp() {
        let mut level = pool_level();
        let before = render_planes(&level, level.sector(0), TransferHeightView::Middle).stamp;
        level.sector_mut(1).floor.set_height(40.0);
        let after = render_planes(&level, level.sector(0), TransferHeightView::Middle).stamp;
        assert_ne!(before.geometry, after.geometry);
    }

    #[test]
    fn middle_view_adds_control_flats() {
        let level = pool_level();
        let pool = level.sector(0);

        let middle = flat_surfaces(&level, pool, TransferHeightView::Middle);
        assert_eq!(middle.iter().flatten().count(), 4);
        let control_floor = middle[2].unwrap();
        assert_eq!(control_floor.slot, FlatSlot::ControlFloor);
        assert_eq!(control_floor.plane.height(), 32.0);

        let bottom = flat_surfaces(&level, pool, TransferHeightView::Bottom);
        assert_eq!(bottom.iter().flatten().count(), 2);

        let room = flat_surfaces(&level, level.sector(2), TransferHeightView::Middle);
        assert_eq!(room.iter().flatten().count(), 2);
    }
}
