//! Drives the geometry cache over a generated corridor level the way a
//! renderer would, one subsector at a time nearest first, and logs how each
//! frame was served.

mod cli;
mod config;
mod map_gen;
mod targets;

use std::error::Error;
use std::time::Instant;

#[cfg(feature = "hprof")]
use coarse_prof::profile;
use glam::Vec2;
use log::{debug, info, warn};
use render_geometry::{CacheStats, GeometryRenderer, RenderContext, WorldTriangulator};
use simplelog::TermLogger;

use crate::cli::CLIOptions;
use crate::config::BenchConfig;
use crate::map_gen::GeneratedMap;
use crate::targets::{BenchTextures, OccluderCounter, UploadCounter};

const BASE_DIR: &str = "geometry-bench/";
/// Eye height above the floor the camera stands on
const VIEW_HEIGHT: f32 = 41.0;

fn main() -> Result<(), Box<dyn Error>> {
    let mut options: CLIOptions = argh::from_env();

    TermLogger::init(
        options.verbose.unwrap_or(log::LevelFilter::Info),
        simplelog::ConfigBuilder::default()
            .set_time_level(log::LevelFilter::Trace)
            .build(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let mut config = if options.no_config {
        BenchConfig::default()
    } else {
        BenchConfig::load()
    };
    config.sync_cli(&mut options);
    if !options.no_config {
        config.write();
    }

    let mut map = GeneratedMap::new(config.rooms as usize)?;
    info!(
        "Generated {} rooms: {} sectors, {} sides, {} subsectors",
        map.rooms.len(),
        map.level.sectors().len(),
        map.level.sides().len(),
        map.level.subsectors().len()
    );

    let mut renderer = GeometryRenderer::new(config.geometry.clone());
    renderer.update_level(&map.level);

    let mut target = UploadCounter::default();
    let mut clipper = OccluderCounter::default();
    let mut totals = CacheStats::default();
    let frames_per_tic = config.frames_per_tic.max(1);

    let start = Instant::now();
    for frame in 0..config.frames {
        let step = frame % frames_per_tic;
        if step == 0 {
            map.level.tick();
            let tic = map.level.game_tic();
            map.animate(tic);
        }
        let frac = (step + 1) as f32 / frames_per_tic as f32;
        let camera = map.camera(frame, config.frames);

        let stats = run_frame(&mut renderer, &map, frac, camera, &mut target, &mut clipper);
        debug!("Frame {}: {:?}", frame, stats);
        totals += stats;
    }
    let elapsed = start.elapsed();

    info!(
        "Rendered {} frames in {:.2?}, {:.1} µs per frame",
        config.frames,
        elapsed,
        elapsed.as_secs_f64() * 1_000_000.0 / f64::from(config.frames.max(1))
    );
    info!(
        "Built {}, rebuilt {}, light patched {}, reused {}, bypassed {}",
        totals.built, totals.rebuilt, totals.light_patched, totals.reused, totals.bypassed
    );
    info!(
        "Deferred {} translucent middles, {} sky batches, {} occluders",
        totals.alpha_deferred, totals.sky_batches, clipper.occluders
    );
    info!("{} batches held in the cache", renderer.cached_batches());
    target.log_summary(config.frames);

    #[cfg(feature = "hprof")]
    coarse_prof::write(&mut std::io::stdout())?;
    Ok(())
}

/// One frame from `camera`: every subsector nearest first, flats once per
/// sector, then the alpha pass
fn run_frame(
    renderer: &mut GeometryRenderer,
    map: &GeneratedMap,
    frac: f32,
    camera: Vec2,
    target: &mut UploadCounter,
    clipper: &mut OccluderCounter,
) -> CacheStats {
    #[cfg(feature = "hprof")]
    profile!("run_frame");
    let level = &map.level;
    let Some(view_subsector) = level.point_in_subsector(camera) else {
        warn!("Camera at {} is outside the level", camera);
        return CacheStats::default();
    };
    let view_sector = level.subsector(view_subsector).sector;
    let floor = level.sector(view_sector).floor.interpolated_height(frac);
    let camera = camera.extend(floor + VIEW_HEIGHT);

    renderer.clear_frame(frac);
    let mut ctx = RenderContext {
        level,
        textures: &BenchTextures,
        triangulator: &WorldTriangulator,
        target,
        clipper,
    };
    let mut sector_rendered = vec![false; level.sectors().len()];
    for subsector in level.render_order(camera.truncate()) {
        let sector = level.subsector(subsector).sector;
        renderer.render_subsector(
            &mut ctx,
            view_sector,
            subsector,
            camera,
            sector_rendered[sector],
        );
        sector_rendered[sector] = true;
    }
    renderer.sort_alpha_sides();
    renderer.render_alpha_sides(&mut ctx);
    *renderer.stats()
}
