use argh::FromArgs;

/// Walk a camera through a generated level and report how the geometry
/// cache served each frame
#[derive(Debug, Clone, Default, FromArgs)]
pub struct CLIOptions {
    /// verbose level: off, error, warn, info, debug
    #[argh(option)]
    pub verbose: Option<log::LevelFilter>,
    /// number of frames to render
    #[argh(option)]
    pub frames: Option<u32>,
    /// rooms in the generated corridor
    #[argh(option)]
    pub rooms: Option<u32>,
    /// frames rendered per gametic, movement is interpolated in between
    #[argh(option)]
    pub frames_per_tic: Option<u32>,
    /// defer translucent middle textures to a sorted alpha pass
    #[argh(option)]
    pub transparency: Option<bool>,
    /// leave planes and wall parts not marked dynamic to a static path
    #[argh(option)]
    pub static_geometry: Option<bool>,
    /// distance sky walls and flats are pushed out to
    #[argh(option)]
    pub sky_height: Option<f32>,
    /// neither read nor write the config file
    #[argh(switch)]
    pub no_config: bool,
}
