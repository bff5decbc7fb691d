//! The data that makes up a loaded level as far as rendering is concerned:
//! sectors with their floor and ceiling planes, sides with their three
//! texture parts, and the convex subsectors the BSP splits the map in to.
//!
//! Gameplay owns mutation. Every mutator bumps a generation counter so the
//! renderer can tell what changed without the level having to know who is
//! watching.

mod builder;
pub mod flags;
mod level_data;
pub mod map_defs;

use std::{error::Error, fmt};

pub use builder::{LevelBuilder, SideTextures};
pub use flags::{LineDefFlags, WallPartFlags, WallTexPin};
pub use glam;
pub use level_data::LevelData;
pub use log;
pub use map_defs::{Edge, Plane, PlaneKind, Sector, Side, SubSector, TextureHandle, WallPart};

/// Broken references found while loading a level
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    SideSectorOutOfRange { side: usize, sector: usize },
    PartnerOutOfRange { side: usize, partner: usize },
    SubSectorSectorOutOfRange { subsector: usize, sector: usize },
    EdgeSideOutOfRange { subsector: usize, side: usize },
    TransferHeightsOutOfRange { sector: usize, control: usize },
}

impl Error for LevelError {}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::SideSectorOutOfRange { side, sector } => {
                write!(f, "side {} faces unknown sector {}", side, sector)
            }
            LevelError::PartnerOutOfRange { side, partner } => {
                write!(f, "side {} has unknown partner side {}", side, partner)
            }
            LevelError::SubSectorSectorOutOfRange { subsector, sector } => {
                write!(f, "subsector {} belongs to unknown sector {}", subsector, sector)
            }
            LevelError::EdgeSideOutOfRange { subsector, side } => {
                write!(f, "subsector {} has an edge on unknown side {}", subsector, side)
            }
            LevelError::TransferHeightsOutOfRange { sector, control } => {
                write!(
                    f,
                    "sector {} uses unknown transfer heights sector {}",
                    sector, control
                )
            }
        }
    }
}
