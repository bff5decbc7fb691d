use nanoserde::{DeRon, SerRon};

/// Distance sky geometry is stretched to, it reads as the horizon
pub const DEFAULT_SKY_HEIGHT: f32 = 16384.0;

#[derive(Debug, Clone, PartialEq, DeRon, SerRon)]
pub struct GeometryConfig {
    /// Translucent middle textures are deferred to the alpha pass. When off
    /// every middle is drawn opaque.
    pub transparency: bool,
    pub sky_height: f32,
    /// A static geometry path owns everything not marked dynamic. When off
    /// this cache draws every part and plane.
    pub static_geometry: bool,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            transparency: true,
            sky_height: DEFAULT_SKY_HEIGHT,
            static_geometry: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use nanoserde::{DeRon, SerRon};

    use super::GeometryConfig;

    #[test]
    fn config_ron_round_trip() {
        let config = GeometryConfig {
            transparency: false,
            sky_height: 4096.0,
            static_geometry: false,
        };
        let ron = config.serialize_ron();
        let back = GeometryConfig::deserialize_ron(&ron).unwrap();
        assert!(!back.transparency);
        assert!(!back.static_geometry);
        assert_eq!(back.sky_height, 4096.0);
    }
}
