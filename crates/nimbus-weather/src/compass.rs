//! Wind bearing to compass point classification.

/// Bearing value meaning "the provider sent no wind direction".
pub const NO_BEARING: f64 = -1.0;

/// One of the eight principal winds, or no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompassPoint {
    North,
    Northeast,
    East,
    Southeast,
    South,
    Southwest,
    West,
    Northwest,
    NotAvailable,
}

impl CompassPoint {
    /// Classify a bearing in degrees.
    ///
    /// Each sector is lower-inclusive: `22.5` is Northeast, `67.5` is East.
    /// The range is not validated. Anything outside the seven tested sectors,
    /// including negative bearings, bearings of 360 and above, and NaN,
    /// lands on North. Only [`NO_BEARING`] maps to [`CompassPoint::NotAvailable`].
    pub fn from_bearing(degrees: f64) -> Self {
        if degrees == NO_BEARING {
            return Self::NotAvailable;
        }

        if (22.5..67.5).contains(&degrees) {
            Self::Northeast
        } else if (67.5..112.5).contains(&degrees) {
            Self::East
        } else if (112.5..157.5).contains(&degrees) {
            Self::Southeast
        } else if (157.5..202.5).contains(&degrees) {
            Self::South
        } else if (202.5..247.5).contains(&degrees) {
            Self::Southwest
        } else if (247.5..292.5).contains(&degrees) {
            Self::West
        } else if (292.5..337.5).contains(&degrees) {
            Self::Northwest
        } else {
            Self::North
        }
    }

    /// English label, also the translation msgid
    pub fn label(&self) -> &'static str {
        match self {
            Self::North => "North",
            Self::Northeast => "Northeast",
            Self::East => "East",
            Self::Southeast => "Southeast",
            Self::South => "South",
            Self::Southwest => "Southwest",
            Self::West => "West",
            Self::Northwest => "Northwest",
            Self::NotAvailable => "Not Available!",
        }
    }
}

/// Classify an optional bearing; a missing bearing counts as [`NO_BEARING`].
pub fn classify(bearing: Option<f64>) -> CompassPoint {
    CompassPoint::from_bearing(bearing.unwrap_or(NO_BEARING))
}
