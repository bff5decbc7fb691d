/// The flags control some attributes of the line a side belongs to
pub enum LineDefFlags {
    /// The line has a side on both faces. If set the side must have a
    /// partner, a missing partner is a broken level
    TwoSided = 1 << 2,
    /// The upper texture is pasted onto the wall from
    /// the top down instead of from the bottom up like usual.
    /// The effect is if a wall moves down, it looks like the
    /// texture is stationary and is appended to as the wall moves
    UnpegTop = 1 << 3,
    /// Lower and middle textures are drawn from the
    /// bottom up, instead of from the top down like usual
    /// The effect is if a wall moves up, it looks like the
    /// texture is stationary and is appended to as the wall moves
    UnpegBottom = 1 << 4,
}

/// Which parts of a side are animated at runtime. Parts that are not marked
/// belong to the static geometry path and are never drawn by the dynamic one.
pub enum WallPartFlags {
    Lower = 1,
    Middle = 1 << 1,
    Upper = 1 << 2,
}

pub const ALL_WALL_PARTS: u8 =
    WallPartFlags::Lower as u8 | WallPartFlags::Middle as u8 | WallPartFlags::Upper as u8;

#[repr(u8)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WallTexPin {
    UnpegTop = 0b0001,
    UnpegBottom = 0b0010,
    UnpegBoth = 0b0011,
    #[default]
    None = 0b1000,
}

impl WallTexPin {
    pub const fn unpeg_top(self) -> bool {
        self as u8 & WallTexPin::UnpegTop as u8 != 0
    }

    pub const fn unpeg_bottom(self) -> bool {
        self as u8 & WallTexPin::UnpegBottom as u8 != 0
    }
}

impl From<u32> for WallTexPin {
    fn from(flags: u32) -> Self {
        if flags & LineDefFlags::UnpegBottom as u32 != 0
            && flags & LineDefFlags::UnpegTop as u32 != 0
        {
            WallTexPin::UnpegBoth
        } else if flags & LineDefFlags::UnpegBottom as u32 != 0 {
            WallTexPin::UnpegBottom
        } else if flags & LineDefFlags::UnpegTop as u32 != 0 {
            WallTexPin::UnpegTop
        } else {
            WallTexPin::None
        }
    }
}
