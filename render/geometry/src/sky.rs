//! Sky decisions. Sky surfaces are not textured quads, they are stretched
//! out to a fixed height and handed to the sky renderer which does its own
//! projection.

use level::PlaneKind;

/// Where the sky quad above an upper wall starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkyBase {
    /// The normal case, sky above the facing sector's ceiling
    FrontCeiling,
    /// Sky hack: closed line between two sky sectors, sky is drawn down to
    /// the neighbour's floor so the gap is closed over
    BackFloor,
}

/// What gets drawn in the upper part of a two-sided side
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UpperPlan {
    pub textured: bool,
    pub sky: Option<SkyBase>,
    /// The edge must not be treated as solid by the clipper, sky shows
    /// through it
    pub sky_override: bool,
}

/// `step_visible` is true when the back ceiling is below the front ceiling,
/// `no_opening` when the floor to ceiling ranges of the two sectors do not
/// overlap.
pub fn plan_upper(
    front_sky: bool,
    back_sky: bool,
    has_texture: bool,
    step_visible: bool,
    no_opening: bool,
) -> UpperPlan {
    if front_sky && back_sky {
        // Both ceilings are sky, the upper is never textured
        return UpperPlan {
            textured: false,
            sky: no_opening.then_some(SkyBase::BackFloor),
            sky_override: !has_texture,
        };
    }
    UpperPlan {
        textured: has_texture && step_visible,
        sky: front_sky.then_some(SkyBase::FrontCeiling),
        sky_override: false,
    }
}

/// Height sky geometry for a plane of this kind is placed at
pub fn sky_z(kind: PlaneKind, sky_height: f32) -> f32 {
    match kind {
        PlaneKind::Floor => -sky_height,
        PlaneKind::Ceiling => sky_height,
    }
}

/// Floor skies are drawn upside down by the sky renderer
pub const fn is_flipped(kind: PlaneKind) -> bool {
    matches!(kind, PlaneKind::Floor)
}
