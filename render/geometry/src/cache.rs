//! Vertex cache tables and the policy deciding what happens to a slot.
//!
//! Tables are dense arrays indexed by side or sector id, one array per
//! transfer-heights view, sized once per level. A slot is either empty (never
//! built) or holds exactly one batch sized for its side or sector.

use std::ops::AddAssign;

use level::{Plane, PlaneKind, Sector, Side};
use render_trait::{SkyVertex, StaticVertex};

use crate::transfer::{TransferHeightView, VIEW_COUNT};

/// What a batch was built from. Generations only ever increase, so the sum
/// over every contributing plane or side changes whenever any one of them
/// does.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildStamp {
    pub geometry: u64,
    pub light: u64,
    /// Built from a moving plane at some interpolation fraction
    pub animating: bool,
}

impl BuildStamp {
    pub fn of_plane(plane: &Plane) -> Self {
        Self {
            geometry: plane.geometry_generation() as u64,
            light: plane.light_generation() as u64,
            animating: plane.is_animating(),
        }
    }

    pub fn of_sector(sector: &Sector) -> Self {
        Self::of_plane(&sector.floor).combine(Self::of_plane(&sector.ceiling))
    }

    pub fn of_side(side: &Side) -> Self {
        Self {
            geometry: side.offset_generation() as u64,
            light: 0,
            animating: false,
        }
    }

    pub const fn combine(self, other: Self) -> Self {
        Self {
            geometry: self.geometry + other.geometry,
            light: self.light + other.light,
            animating: self.animating || other.animating,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheAction {
    /// View dependent, triangulate in to scratch and never store
    Bypass,
    /// Nothing cached yet
    Build,
    /// Geometry changed, triangulate over the existing batch
    Rebuild,
    /// Only the light changed, patch the light of every vertex
    PatchLight,
    /// Submit what is cached
    Reuse,
}

/// Decide what to do with a slot. Checked in order: bypass, empty, geometry
/// change, light change.
pub fn cache_action(
    bypass: bool,
    cached: Option<&BuildStamp>,
    current: &BuildStamp,
) -> CacheAction {
    if bypass {
        return CacheAction::Bypass;
    }
    let Some(cached) = cached else {
        return CacheAction::Build;
    };
    // A batch built mid animation needs one more rebuild after the plane
    // settles, it was built at a fraction that is no longer current
    if cached.geometry != current.geometry || cached.animating || current.animating {
        CacheAction::Rebuild
    } else if cached.light != current.light {
        CacheAction::PatchLight
    } else {
        CacheAction::Reuse
    }
}

/// Count of what each slot visit did during a frame
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub built: u32,
    pub rebuilt: u32,
    pub light_patched: u32,
    pub reused: u32,
    pub bypassed: u32,
    /// Translucent middles deferred to the alpha pass
    pub alpha_deferred: u32,
    pub sky_batches: u32,
}

impl CacheStats {
    pub fn record(&mut self, action: CacheAction) {
        match action {
            CacheAction::Bypass => self.bypassed += 1,
            CacheAction::Build => self.built += 1,
            CacheAction::Rebuild => self.rebuilt += 1,
            CacheAction::PatchLight => self.light_patched += 1,
            CacheAction::Reuse => self.reused += 1,
        }
    }

    /// Slots that had to be triangulated
    pub const fn triangulated(&self) -> u32 {
        self.built + self.rebuilt + self.bypassed
    }
}

impl AddAssign for CacheStats {
    fn add_assign(&mut self, rhs: Self) {
        self.built += rhs.built;
        self.rebuilt += rhs.rebuilt;
        self.light_patched += rhs.light_patched;
        self.reused += rhs.reused;
        self.bypassed += rhs.bypassed;
        self.alpha_deferred += rhs.alpha_deferred;
        self.sky_batches += rhs.sky_batches;
    }
}

/// The six vertices of a wall quad and what they were built from
#[derive(Debug, Clone)]
pub struct CachedWall<V> {
    pub vertices: [V; 6],
    pub stamp: BuildStamp,
}

/// All subsectors of one sector triangulated in to a single range
#[derive(Debug, Clone)]
pub struct CachedFlat<V> {
    pub vertices: Vec<V>,
    pub stamp: BuildStamp,
}

/// Which flat of a sector a slot holds. The control slots are only used in
/// the middle view, where the control sector's planes are drawn in addition
/// to the sector's own.
#[repr(usize)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlatSlot {
    Floor = 0,
    Ceiling = 1,
    ControlFloor = 2,
    ControlCeiling = 3,
}

pub const FLAT_SLOT_COUNT: usize = 4;

impl FlatSlot {
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Which way the surface faces, decides winding and visibility
    pub const fn facing(self) -> PlaneKind {
        match self {
            FlatSlot::Floor | FlatSlot::ControlFloor => PlaneKind::Floor,
            FlatSlot::Ceiling | FlatSlot::ControlCeiling => PlaneKind::Ceiling,
        }
    }

    pub const fn for_plane(kind: PlaneKind) -> Self {
        match kind {
            PlaneKind::Floor => FlatSlot::Floor,
            PlaneKind::Ceiling => FlatSlot::Ceiling,
        }
    }
}

/// Slots for `PARTS` parts of every entity, replicated per view
pub struct SlotTable<T, const PARTS: usize> {
    views: [Vec<[Option<T>; PARTS]>; VIEW_COUNT],
}

impl<T, const PARTS: usize> Default for SlotTable<T, PARTS> {
    fn default() -> Self {
        Self {
            views: std::array::from_fn(|_| Vec::new()),
        }
    }
}

impl<T, const PARTS: usize> SlotTable<T, PARTS> {
    /// Drop everything and size for `count` entities
    pub fn reset(&mut self, count: usize) {
        for view in self.views.iter_mut() {
            view.clear();
            view.resize_with(count, || std::array::from_fn(|_| None));
        }
    }

    /// Number of entities the table was sized for
    pub fn len(&self) -> usize {
        self.views[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: usize, part: usize, view: TransferHeightView) -> Option<&T> {
        self.views[view.index()].get(id)?.get(part)?.as_ref()
    }

    /// The slot itself, `None` if `id` is out of range
    pub fn slot_mut(
        &mut self,
        id: usize,
        part: usize,
        view: TransferHeightView,
    ) -> Option<&mut Option<T>> {
        self.views[view.index()].get_mut(id)?.get_mut(part)
    }

    /// Filled slots across all views
    pub fn occupied(&self) -> usize {
        self.views
            .iter()
            .flat_map(|v| v.iter())
            .flat_map(|parts| parts.iter())
            .filter(|s| s.is_some())
            .count()
    }
}

/// Every table the geometry renderer keeps. Opaque and sky batches never
/// share a table.
#[derive(Default)]
pub struct VertexCache {
    pub walls: SlotTable<CachedWall<StaticVertex>, 3>,
    pub sky_walls: SlotTable<CachedWall<SkyVertex>, 3>,
    pub flats: SlotTable<CachedFlat<StaticVertex>, FLAT_SLOT_COUNT>,
    pub sky_flats: SlotTable<CachedFlat<SkyVertex>, FLAT_SLOT_COUNT>,
}

impl VertexCache {
    pub fn reset(&mut self, side_count: usize, sector_count: usize) {
        self.walls.reset(side_count);
        self.sky_walls.reset(side_count);
        self.flats.reset(sector_count);
        self.sky_flats.reset(sector_count);
    }
}

#[cfg(test)]
mod tests {
    use level::{Plane, PlaneKind, WallPart};
    use render_trait::StaticVertex;

    use super::{BuildStamp, CacheAction, CacheStats, CachedWall, FlatSlot, SlotTable, cache_action};
    use crate::transfer::TransferHeightView;

    #[test]
    fn action_order() {
        let stamp = BuildStamp::default();
        assert_eq!(cache_action(true, Some(&stamp), &stamp), CacheAction::Bypass);
        assert_eq!(cache_action(true, None, &stamp), CacheAction::Bypass);
        assert_eq!(cache_action(false, None, &stamp), CacheAction::Build);
        assert_eq!(cache_action(false, Some(&stamp), &stamp), CacheAction::Reuse);

        let light = BuildStamp { light: 1, ..stamp };
        assert_eq!(cache_action(false, Some(&stamp), &light), CacheAction::PatchLight);

        // geometry wins over light
        let both = BuildStamp {
            geometry: 1,
            light: 1,
            animating: false,
        };
        assert_eq!(cache_action(false, Some(&stamp), &both), CacheAction::Rebuild);
    }

    #[test]
    fn animation_rebuilds_until_settled() {
        let moving = BuildStamp {
            geometry: 3,
            light: 0,
            animating: true,
        };
        assert_eq!(cache_action(false, Some(&moving), &moving), CacheAction::Rebuild);
        let settled = BuildStamp {
            animating: false,
            ..moving
        };
        assert_eq!(cache_action(false, Some(&moving), &settled), CacheAction::Rebuild);
        assert_eq!(cache_action(false, Some(&settled), &settled), CacheAction::Reuse);
    }

    #[test]
    fn stamp_sum_changes_with_any_input() {
        let mut a = Plane::new(PlaneKind::Floor, 0.0, 1, 100);
        let mut b = Plane::new(PlaneKind::Ceiling, 128.0, 1, 100);
        let before = BuildStamp::of_plane(&a).combine(BuildStamp::of_plane(&b));
        b.set_height(120.0);
        let after = BuildStamp::of_plane(&a).combine(BuildStamp::of_plane(&b));
        assert_ne!(before.geometry, after.geometry);
        assert!(after.animating);

        a.set_light_level(50);
        let lit = BuildStamp::of_plane(&a).combine(BuildStamp::of_plane(&b));
        assert_eq!(lit.geometry, after.geometry);
        assert_ne!(lit.light, after.light);
    }

    #[test]
    fn slot_table_views_are_isolated() {
        let mut table: SlotTable<CachedWall<StaticVertex>, 3> = SlotTable::default();
        table.reset(4);
        assert_eq!(table.len(), 4);

        let part = WallPart::Upper.index();
        *table.slot_mut(2, part, TransferHeightView::Middle).unwrap() = Some(CachedWall {
            vertices: [StaticVertex::default(); 6],
            stamp: BuildStamp::default(),
        });
        assert!(table.get(2, part, TransferHeightView::Middle).is_some());
        assert!(table.get(2, part, TransferHeightView::Top).is_none());
        assert!(table.get(2, part, TransferHeightView::Bottom).is_none());
        assert!(table.get(2, WallPart::Lower.index(), TransferHeightView::Middle).is_none());
        assert!(table.slot_mut(9, part, TransferHeightView::Middle).is_none());
        assert_eq!(table.occupied(), 1);

        table.reset(2);
        assert_eq!(table.occupied(), 0);
    }

    #[test]
    fn flat_slot_facing() {
        assert_eq!(FlatSlot::ControlFloor.facing(), PlaneKind::Floor);
        assert_eq!(FlatSlot::ControlCeiling.facing(), PlaneKind::Ceiling);
        assert_eq!(FlatSlot::for_plane(PlaneKind::Ceiling), FlatSlot::Ceiling);
    }

    #[test]
    fn stats_add_up_over_frames() {
        let mut frame = CacheStats::default();
        frame.record(CacheAction::Build);
        frame.record(CacheAction::Bypass);
        frame.alpha_deferred = 2;

        let mut total = CacheStats::default();
        total += frame;
        total += frame;
        assert_eq!(total.built, 2);
        assert_eq!(total.bypassed, 2);
        assert_eq!(total.alpha_deferred, 4);
        assert_eq!(total.triangulated(), 4);
    }
}
