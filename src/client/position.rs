use std::str::FromStr;

/// Placement mode of a client.
///
/// `None` leaves the client floating wherever it was put, `Tiled` hands it
/// to the monitor's layout and every other variant pins it to a preset
/// region of the work area (or the whole output for the fullscreen modes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    None,
    Fullscreen,
    DoubleFullscreen,
    Tiled,
    Center,
    NorthWest,
    West,
    SouthWest,
    North,
    Fill,
    South,
    NorthEast,
    East,
    SouthEast,
}

impl Position {
    /// Preset positions are re-applied on every arrange.
    pub fn is_preset(self) -> bool {
        !matches!(self, Self::None | Self::Tiled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Fullscreen => "fullscreen",
            Self::DoubleFullscreen => "double_fullscreen",
            Self::Tiled => "tiled",
            Self::Center => "center",
            Self::NorthWest => "north_west",
            Self::West => "west",
            Self::SouthWest => "south_west",
            Self::North => "north",
            Self::Fill => "fill",
            Self::South => "south",
            Self::NorthEast => "north_east",
            Self::East => "east",
            Self::SouthEast => "south_east",
        }
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "floating" => Ok(Self::None),
            "fullscreen" => Ok(Self::Fullscreen),
            "double_fullscreen" => Ok(Self::DoubleFullscreen),
            "tiled" => Ok(Self::Tiled),
            "center" => Ok(Self::Center),
            "north_west" | "nw" => Ok(Self::NorthWest),
            "west" | "w" => Ok(Self::West),
            "south_west" | "sw" => Ok(Self::SouthWest),
            "north" | "n" => Ok(Self::North),
            "fill" => Ok(Self::Fill),
            "south" | "s" => Ok(Self::South),
            "north_east" | "ne" => Ok(Self::NorthEast),
            "east" | "e" => Ok(Self::East),
            "south_east" | "se" => Ok(Self::SouthEast),
            _ => Err(format!("unknown position: {s}")),
        }
    }
}
