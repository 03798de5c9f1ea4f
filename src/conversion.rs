//! Unit conversion table: factor and display precision for every unit pair.
//!
//! Factors are listed as literal directed entries rather than derived from a
//! base unit, so a missing or inconsistent entry is a real possibility and is
//! checked exhaustively when the table is built.

use crate::defaults;
use crate::errors::ConfigError;
use crate::types::{Unit, positive, round_to};

const N: usize = Unit::ALL.len();

/// A directed conversion: multiply a value in `.0` by `.2` to get `.1`.
pub type FactorEntry = (Unit, Unit, f64);

/// Conversion factors for the international mile, foot, yard and nautical mile.
pub const STANDARD_FACTORS: &[FactorEntry] = &[
    (Unit::Miles, Unit::Kilometers, 1.609344),
    (Unit::Miles, Unit::Feet, 5280.0),
    (Unit::Miles, Unit::Meters, 1609.344),
    (Unit::Miles, Unit::Yards, 1760.0),
    (Unit::Miles, Unit::NauticalMiles, 0.868976241900648),
    (Unit::Kilometers, Unit::Miles, 0.621371192237334),
    (Unit::Kilometers, Unit::Feet, 3280.83989501312),
    (Unit::Kilometers, Unit::Meters, 1000.0),
    (Unit::Kilometers, Unit::Yards, 1093.61329833771),
    (Unit::Kilometers, Unit::NauticalMiles, 0.539956803455724),
    (Unit::Feet, Unit::Miles, 0.000189393939393939),
    (Unit::Feet, Unit::Kilometers, 0.0003048),
    (Unit::Feet, Unit::Meters, 0.3048),
    (Unit::Feet, Unit::Yards, 0.333333333333333),
    (Unit::Feet, Unit::NauticalMiles, 0.000164578833693305),
    (Unit::Meters, Unit::Miles, 0.000621371192237334),
    (Unit::Meters, Unit::Kilometers, 0.001),
    (Unit::Meters, Unit::Feet, 3.28083989501312),
    (Unit::Meters, Unit::Yards, 1.09361329833771),
    (Unit::Meters, Unit::NauticalMiles, 0.000539956803455724),
    (Unit::Yards, Unit::Miles, 0.000568181818181818),
    (Unit::Yards, Unit::Kilometers, 0.0009144),
    (Unit::Yards, Unit::Feet, 3.0),
    (Unit::Yards, Unit::Meters, 0.9144),
    (Unit::Yards, Unit::NauticalMiles, 0.000493736501079914),
    (Unit::NauticalMiles, Unit::Miles, 1.15077944802354),
    (Unit::NauticalMiles, Unit::Kilometers, 1.852),
    (Unit::NauticalMiles, Unit::Feet, 6076.1154855643),
    (Unit::NauticalMiles, Unit::Meters, 1852.0),
    (Unit::NauticalMiles, Unit::Yards, 2025.37182852143),
];

/// Validated, fully populated unit conversion table
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionTable {
    factors: [[f64; N]; N],
}

impl ConversionTable {
    /// Build the table from [`STANDARD_FACTORS`].
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_entries(STANDARD_FACTORS)
    }

    /// Build a table from directed entries, one per ordered pair of distinct units.
    ///
    /// Fails on a missing, duplicated, identity or non-positive entry, and on
    /// any pair whose two directions do not multiply to 1.
    pub fn from_entries(entries: &[FactorEntry]) -> Result<Self, ConfigError> {
        let mut slots: [[Option<f64>; N]; N] = [[None; N]; N];

        for &(from, to, factor) in entries {
            if from == to {
                return Err(ConfigError::IdentityPair { unit: from });
            }
            let factor =
                positive(factor).map_err(|reason| ConfigError::InvalidFactor { from, to, reason })?;
            let slot = &mut slots[from.index()][to.index()];
            if slot.is_some() {
                return Err(ConfigError::DuplicatePair { from, to });
            }
            *slot = Some(factor);
        }

        let mut factors = [[1.0; N]; N];
        for from in Unit::ALL {
            for to in Unit::ALL {
                if from == to {
                    continue;
                }
                factors[from.index()][to.index()] =
                    slots[from.index()][to.index()].ok_or(ConfigError::MissingPair { from, to })?;
            }
        }

        for (i, &a) in Unit::ALL.iter().enumerate() {
            for &b in &Unit::ALL[i + 1..] {
                let forward = factors[a.index()][b.index()];
                let backward = factors[b.index()][a.index()];
                if ((forward * backward) - 1.0).abs() > defaults::RECIPROCAL_TOLERANCE {
                    return Err(ConfigError::NotReciprocal { a, b, forward, backward });
                }
            }
        }

        Ok(ConversionTable { factors })
    }

    /// Raw multiplicative factor from `from` to `to`.
    #[inline]
    pub fn factor(&self, from: Unit, to: Unit) -> f64 {
        self.factors[from.index()][to.index()]
    }

    /// Factor from `from` to `to` and the number of decimal places of `to`.
    pub fn factor_and_precision(&self, from: Unit, to: Unit) -> (f64, usize) {
        (self.factor(from, to), to.precision())
    }

    /// Convert `value` and round it to the destination unit's precision.
    pub fn convert(&self, value: f64, from: Unit, to: Unit) -> f64 {
        let (factor, precision) = self.factor_and_precision(from, to);
        round_to(value * factor, precision)
    }
}
