//! Strongly-typed primitives shared by every part of the engine.
//!
//! - [`MapPoint`] is a coordinate in the host map's native frame.
//! - [`Unit`] is the closed set of linear display units.
//! - [`Angle`] and [`LabelOffset`] describe how a label sits on its segment.

use std::fmt;
use std::str::FromStr;

use glam::DVec2;

/// Error type for invalid numeric values coming from the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is zero when non-zero required
    Zero,
    /// Value is negative when non-negative required
    Negative,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Zero => write!(f, "value is zero"),
            NumericError::Negative => write!(f, "value is negative"),
        }
    }
}

impl std::error::Error for NumericError {}

/// Reject NaN and infinities.
#[inline]
pub fn finite(val: f64) -> Result<f64, NumericError> {
    if val.is_nan() {
        Err(NumericError::NaN)
    } else if val.is_infinite() {
        Err(NumericError::Infinite)
    } else {
        Ok(val)
    }
}

/// Reject NaN, infinities and negative values.
#[inline]
pub fn non_negative(val: f64) -> Result<f64, NumericError> {
    let val = finite(val)?;
    if val < 0.0 { Err(NumericError::Negative) } else { Ok(val) }
}

/// Reject anything that is not a finite, strictly positive value.
#[inline]
pub fn positive(val: f64) -> Result<f64, NumericError> {
    let val = non_negative(val)?;
    if val == 0.0 { Err(NumericError::Zero) } else { Ok(val) }
}

/// Opaque spatial reference of a point (a well-known id, when the host has one).
///
/// Carried through from the host and handed back on label anchors; never
/// interpreted here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct SpatialRef(pub Option<u32>);

impl SpatialRef {
    pub const UNKNOWN: SpatialRef = SpatialRef(None);

    pub const fn wkid(id: u32) -> Self {
        SpatialRef(Some(id))
    }
}

impl fmt::Display for SpatialRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(id) => write!(f, "wkid:{}", id),
            None => write!(f, "wkid:?"),
        }
    }
}

/// A 2-D coordinate in the map's native reference frame
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct MapPoint {
    pub x: f64,
    pub y: f64,
    pub spatial_ref: SpatialRef,
}

impl MapPoint {
    /// Create a point in an unknown reference frame (unchecked).
    pub const fn new(x: f64, y: f64) -> Self {
        MapPoint { x, y, spatial_ref: SpatialRef::UNKNOWN }
    }

    /// Create a point with validation (rejects NaN/infinite coordinates)
    pub fn try_new(x: f64, y: f64, spatial_ref: SpatialRef) -> Result<Self, NumericError> {
        Ok(MapPoint { x: finite(x)?, y: finite(y)?, spatial_ref })
    }

    /// Same coordinates, tagged with `spatial_ref`.
    pub const fn with_ref(self, spatial_ref: SpatialRef) -> Self {
        MapPoint { spatial_ref, ..self }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[inline]
    pub(crate) fn to_dvec2(self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    #[inline]
    pub(crate) fn from_dvec2(v: DVec2, spatial_ref: SpatialRef) -> Self {
        MapPoint { x: v.x, y: v.y, spatial_ref }
    }
}

impl fmt::Display for MapPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One drawn leg of the line; `a` was placed before `b`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub a: MapPoint,
    pub b: MapPoint,
}

/// Linear display units understood by the measurement tool
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Unit {
    Miles,
    Kilometers,
    Feet,
    Meters,
    Yards,
    NauticalMiles,
}

impl Unit {
    pub const ALL: [Unit; 6] = [
        Unit::Miles,
        Unit::Kilometers,
        Unit::Feet,
        Unit::Meters,
        Unit::Yards,
        Unit::NauticalMiles,
    ];

    /// Number of decimal places a length in this unit is displayed with.
    pub const fn precision(self) -> usize {
        match self {
            Unit::Feet | Unit::Meters | Unit::Yards => 1,
            Unit::Miles | Unit::Kilometers | Unit::NauticalMiles => 4,
        }
    }

    /// Dense index into per-unit tables.
    pub(crate) const fn index(self) -> usize {
        match self {
            Unit::Miles => 0,
            Unit::Kilometers => 1,
            Unit::Feet => 2,
            Unit::Meters => 3,
            Unit::Yards => 4,
            Unit::NauticalMiles => 5,
        }
    }

    /// Canonical lowercase name, as accepted by [`Unit::from_str`].
    pub const fn name(self) -> &'static str {
        match self {
            Unit::Miles => "miles",
            Unit::Kilometers => "kilometers",
            Unit::Feet => "feet",
            Unit::Meters => "meters",
            Unit::Yards => "yards",
            Unit::NauticalMiles => "nautical-miles",
        }
    }

    /// Short symbol for display next to a value.
    pub const fn symbol(self) -> &'static str {
        match self {
            Unit::Miles => "mi",
            Unit::Kilometers => "km",
            Unit::Feet => "ft",
            Unit::Meters => "m",
            Unit::Yards => "yd",
            Unit::NauticalMiles => "nmi",
        }
    }

    /// Round `value` to this unit's display precision.
    pub fn round(self, value: f64) -> f64 {
        round_to(value, self.precision())
    }

    /// Render `value` with exactly this unit's number of decimal places.
    pub fn format(self, value: f64) -> String {
        format!("{:.*}", self.precision(), value)
    }
}

/// Round half away from zero to `places` decimal places.
pub fn round_to(value: f64, places: usize) -> f64 {
    let scale = 10f64.powi(places as i32);
    (value * scale).round() / scale
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A unit name the engine does not know
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownUnitName(pub String);

impl fmt::Display for UnknownUnitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown unit: {:?}", self.0)
    }
}

impl std::error::Error for UnknownUnitName {}

impl FromStr for Unit {
    type Err = UnknownUnitName;

    /// Accepts canonical names, symbols, and the host widget's spellings
    /// ("Nautical Miles", "esriFeet", ...), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        let key = folded.strip_prefix("esri").unwrap_or(&folded);
        let unit = match key {
            "miles" | "mile" | "mi" => Unit::Miles,
            "kilometers" | "kilometer" | "kilometres" | "kilometre" | "km" => Unit::Kilometers,
            "feet" | "foot" | "ft" => Unit::Feet,
            "meters" | "meter" | "metres" | "metre" | "m" => Unit::Meters,
            "yards" | "yard" | "yd" => Unit::Yards,
            "nauticalmiles" | "nauticalmile" | "nmi" | "nm" => Unit::NauticalMiles,
            _ => return Err(UnknownUnitName(s.to_string())),
        };
        Ok(unit)
    }
}

/// Measurement tools the host widget offers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tool {
    Distance,
    Area,
    Location,
}

impl Tool {
    pub const fn name(self) -> &'static str {
        match self {
            Tool::Distance => "distance",
            Tool::Area => "area",
            Tool::Location => "location",
        }
    }

    /// Look a tool up by its host name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Tool> {
        [Tool::Distance, Tool::Area, Tool::Location]
            .into_iter()
            .find(|tool| tool.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Label rotation in degrees (screen convention: positive is clockwise)
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
pub struct Angle(pub f64);

impl Angle {
    pub const ZERO: Angle = Angle(0.0);

    #[inline]
    pub fn degrees(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Screen-space displacement of a label from its anchor
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct LabelOffset {
    pub x: f64,
    pub y: f64,
}

impl LabelOffset {
    pub const fn new(x: f64, y: f64) -> Self {
        LabelOffset { x, y }
    }
}
