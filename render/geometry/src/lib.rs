//! Vertex batch caching for a BSP level renderer.
//!
//! For each visible subsector the `GeometryRenderer` works out which wall
//! parts and flats are visible, builds vertex batches for them once, and
//! keeps them until the level data they came from changes. Heights and
//! offsets changing means a rebuild in place, a light change means patching
//! the light of the existing batch, anything else submits what is cached.
//!
//! Sectors linked to a transfer heights control sector get separate caches
//! for each of the three views the camera can be in. Sky surfaces go down a
//! separate path and in to separate tables.

pub mod cache;
mod config;
mod flats;
mod renderer;
mod scratch;
pub mod sky;
pub mod transfer;
mod triangulator;
pub mod vertex;
mod walls;

#[cfg(test)]
mod tests;

pub use cache::{BuildStamp, CacheAction, CacheStats, FlatSlot};
pub use config::{DEFAULT_SKY_HEIGHT, GeometryConfig};
pub use renderer::{AlphaSide, GeometryRenderer, RenderContext};
pub use scratch::ScratchBuffer;
pub use transfer::{TransferHeightView, VIEW_COUNT};
pub use triangulator::WorldTriangulator;
pub use walls::side_middle;
