//! Bench configuration, kept between runs.

use std::fs::{File, OpenOptions, create_dir_all};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use dirs::config_dir;
use log::{error, info, warn};
use nanoserde::{DeRon, SerRon};
use render_geometry::GeometryConfig;

use crate::BASE_DIR;
use crate::cli::CLIOptions;

const LOG_TAG: &str = "BenchConfig";

fn get_cfg_file() -> Option<PathBuf> {
    let mut dir = config_dir()?;
    dir.push(BASE_DIR);
    if !dir.exists() {
        if let Err(e) = create_dir_all(&dir) {
            warn!(target: LOG_TAG, "Couldn't create {:?}: {}", dir, e);
            return None;
        }
    }
    dir.push("bench.ron");
    Some(dir)
}

#[derive(Debug, Clone, PartialEq, DeRon, SerRon)]
pub struct BenchConfig {
    pub frames: u32,
    pub rooms: u32,
    pub frames_per_tic: u32,
    pub geometry: GeometryConfig,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            // a minute at 35 tics, four frames each
            frames: 8400,
            rooms: 20,
            frames_per_tic: 4,
            geometry: GeometryConfig::default(),
        }
    }
}

impl BenchConfig {
    /// `load` reads the config file. Anything unreadable is replaced with a
    /// default config.
    pub fn load() -> Self {
        let Some(path) = get_cfg_file() else {
            warn!(target: LOG_TAG, "No user config dir, using defaults");
            return Self::default();
        };

        let mut file = match OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
        {
            Ok(file) => file,
            Err(e) => {
                warn!(target: LOG_TAG, "Couldn't open {:?}, {}", path, e);
                return Self::default();
            }
        };
        let mut buf = String::new();
        if let Ok(read_len) = file.read_to_string(&mut buf) {
            if read_len == 0 {
                return Self::create_default(&path);
            }
            match BenchConfig::deserialize_ron(&buf) {
                Ok(data) => {
                    info!(target: LOG_TAG, "Loaded bench config file");
                    return data;
                }
                Err(e) => warn!(target: LOG_TAG, "Could not deserialise {:?}: {:?}", path, e),
            }
        }
        Self::create_default(&path)
    }

    fn create_default(path: &Path) -> Self {
        let config = BenchConfig::default();
        match config.write_to(path) {
            Ok(_) => info!(target: LOG_TAG, "Saved default bench config to {:?}", path),
            Err(e) => error!(target: LOG_TAG, "Could not write {:?}: {}", path, e),
        }
        config
    }

    fn write_to(&self, path: &Path) -> io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.serialize_ron().as_bytes())
    }

    pub fn write(&self) {
        if let Some(path) = get_cfg_file() {
            self.write_to(&path)
                .unwrap_or_else(|err| error!(target: LOG_TAG, "Could not write config: {}", err));
        }
    }

    /// Sync the CLI options and the config with each other. Options given on
    /// the command line win and are saved, the rest are filled from the
    /// config.
    pub fn sync_cli(&mut self, cli: &mut CLIOptions) {
        info!(target: LOG_TAG, "Checking CLI options");
        sync(&mut self.frames, &mut cli.frames);
        sync(&mut self.rooms, &mut cli.rooms);
        sync(&mut self.frames_per_tic, &mut cli.frames_per_tic);
        sync(&mut self.geometry.transparency, &mut cli.transparency);
        sync(&mut self.geometry.static_geometry, &mut cli.static_geometry);
        sync(&mut self.geometry.sky_height, &mut cli.sky_height);
    }
}

fn sync<T: Copy + PartialEq>(config: &mut T, cli: &mut Option<T>) {
    match cli {
        Some(value) if *value != *config => *config = *value,
        Some(_) => {}
        None => *cli = Some(*config),
    }
}
