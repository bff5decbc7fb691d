use glam::Vec2;
use log::info;

use crate::LevelError;
use crate::map_defs::{Sector, Side, SubSector};

/// Everything the geometry renderer reads about a loaded level.
///
/// The arrays are sized once at load and never resized, ids handed out by
/// the builder are indexes in to them. Gameplay mutates sectors and sides in
/// place between frames through the `*_mut` accessors.
#[derive(Default)]
pub struct LevelData {
    sectors: Vec<Sector>,
    sides: Vec<Side>,
    subsectors: Vec<SubSector>,
    /// Subsector ids belonging to each sector, indexed by sector id
    sector_subsectors: Vec<Vec<usize>>,
    game_tic: u32,
}

impl LevelData {
    /// Checks referential integrity and groups subsectors by sector.
    pub fn new(
        sectors: Vec<Sector>,
        sides: Vec<Side>,
        subsectors: Vec<SubSector>,
    ) -> Result<Self, LevelError> {
        let mut level = Self {
            sectors,
            sides,
            subsectors,
            sector_subsectors: Vec::new(),
            game_tic: 0,
        };
        level.validate()?;
        level.build_sector_subsector_mapping();
        info!(
            "Level loaded: {} sectors, {} sides, {} subsectors",
            level.sectors.len(),
            level.sides.len(),
            level.subsectors.len()
        );
        Ok(level)
    }

    fn validate(&self) -> Result<(), LevelError> {
        let sector_count = self.sectors.len();
        let side_count = self.sides.len();

        for (id, sector) in self.sectors.iter().enumerate() {
            if let Some(control) = sector.transfer_heights {
                if control >= sector_count {
                    return Err(LevelError::TransferHeightsOutOfRange { sector: id, control });
                }
            }
        }

        for (id, side) in self.sides.iter().enumerate() {
            if side.sector >= sector_count {
                return Err(LevelError::SideSectorOutOfRange {
                    side: id,
                    sector: side.sector,
                });
            }
            if let Some(partner) = side.partner {
                if partner >= side_count {
                    return Err(LevelError::PartnerOutOfRange { side: id, partner });
                }
            }
        }

        for (id, subsector) in self.subsectors.iter().enumerate() {
            if subsector.sector >= sector_count {
                return Err(LevelError::SubSectorSectorOutOfRange {
                    subsector: id,
                    sector: subsector.sector,
                });
            }
            for edge in &subsector.edges {
                if let Some(side) = edge.side {
                    if side >= side_count {
                        return Err(LevelError::EdgeSideOutOfRange { subsector: id, side });
                    }
                }
            }
        }
        Ok(())
    }

    fn build_sector_subsector_mapping(&mut self) {
        self.sector_subsectors = vec![Vec::new(); self.sectors.len()];
        for (subsector_id, subsector) in self.subsectors.iter().enumerate() {
            self.sector_subsectors[subsector.sector].push(subsector_id);
        }
    }

    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    pub fn sector(&self, id: usize) -> &Sector {
        &self.sectors[id]
    }

    pub fn sector_mut(&mut self, id: usize) -> &mut Sector {
        &mut self.sectors[id]
    }

    pub fn sides(&self) -> &[Side] {
        &self.sides
    }

    pub fn side(&self, id: usize) -> &Side {
        &self.sides[id]
    }

    pub fn side_mut(&mut self, id: usize) -> &mut Side {
        &mut self.sides[id]
    }

    pub fn subsectors(&self) -> &[SubSector] {
        &self.subsectors
    }

    pub fn subsector(&self, id: usize) -> &SubSector {
        &self.subsectors[id]
    }

    /// The subsectors that together make up the flats of a sector
    pub fn sector_subsectors(&self, sector_id: usize) -> &[usize] {
        self.sector_subsectors
            .get(sector_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The control sector of `sector`, if it has a valid one
    pub fn transfer_heights(&self, sector: &Sector) -> Option<&Sector> {
        sector.transfer_heights.and_then(|id| self.sectors.get(id))
    }

    pub const fn game_tic(&self) -> u32 {
        self.game_tic
    }

    /// Start a new gametic. Current heights become the interpolation start
    /// point for every plane.
    pub fn tick(&mut self) {
        for sector in self.sectors.iter_mut() {
            sector.floor.store_prev_height();
            sector.ceiling.store_prev_height();
        }
        self.game_tic += 1;
    }

    /// Find the subsector containing `point`. Subsectors are convex so the
    /// point must be on the inner side of every edge.
    pub fn point_in_subsector(&self, point: Vec2) -> Option<usize> {
        self.subsectors.iter().position(|ss| {
            !ss.is_degenerate()
                && ss.edges.iter().all(|e| {
                    let d = e.end - e.start;
                    let p = point - e.start;
                    // subsector edges wind clockwise, inside is to the right
                    d.x * p.y - d.y * p.x <= 0.0
                })
        })
    }

    /// Subsector ids ordered nearest first to `point`. Stands in for a BSP
    /// front to back walk when the caller has no node tree.
    pub fn render_order(&self, point: Vec2) -> Vec<usize> {
        let mut order: Vec<(usize, f32)> = self
            .subsectors
            .iter()
            .enumerate()
            .map(|(i, ss)| (i, ss.centroid().distance_squared(point)))
            .collect();
        order.sort_by(|a, b| a.1.total_cmp(&b.1));
        order.into_iter().map(|(i, _)| i).collect()
    }
}
