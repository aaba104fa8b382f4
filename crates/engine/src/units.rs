//! Measurement units and the direct conversion table.
//!
//! The table is a closed set of pairwise factors. A missing pair is never
//! inferred from its reverse or chained through intermediate units: callers
//! get [`EngineError::NoDirectConversion`] and decide their own fallback.

use std::{collections::HashMap, fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine, util::normalize_name_key};

/// Recognized measurement units.
///
/// The storage code (see [`Unit::code`]) is the short form used by kitchen
/// technical sheets: `cs` for tablespoon, `xic` for cup, `qb` for "to taste".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "mg")]
    Milligram,
    #[serde(rename = "l")]
    Liter,
    #[serde(rename = "dl")]
    Deciliter,
    #[serde(rename = "cl")]
    Centiliter,
    #[serde(rename = "ml")]
    Milliliter,
    #[serde(rename = "cs")]
    Tablespoon,
    #[serde(rename = "cc")]
    Teaspoon,
    #[serde(rename = "xic")]
    Cup,
    #[serde(rename = "pt")]
    Pinch,
    #[serde(rename = "gt")]
    Drop,
    /// A single piece (one egg, one onion).
    #[serde(rename = "und")]
    Piece,
    #[serde(rename = "dz")]
    Dozen,
    /// "Quanto baste": used freely, never costed.
    #[serde(rename = "qb")]
    ToTaste,
}

impl Unit {
    pub const ALL: [Unit; 15] = [
        Unit::Kilogram,
        Unit::Gram,
        Unit::Milligram,
        Unit::Liter,
        Unit::Deciliter,
        Unit::Centiliter,
        Unit::Milliliter,
        Unit::Tablespoon,
        Unit::Teaspoon,
        Unit::Cup,
        Unit::Pinch,
        Unit::Drop,
        Unit::Piece,
        Unit::Dozen,
        Unit::ToTaste,
    ];

    /// Canonical storage code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Unit::Kilogram => "kg",
            Unit::Gram => "g",
            Unit::Milligram => "mg",
            Unit::Liter => "l",
            Unit::Deciliter => "dl",
            Unit::Centiliter => "cl",
            Unit::Milliliter => "ml",
            Unit::Tablespoon => "cs",
            Unit::Teaspoon => "cc",
            Unit::Cup => "xic",
            Unit::Pinch => "pt",
            Unit::Drop => "gt",
            Unit::Piece => "und",
            Unit::Dozen => "dz",
            Unit::ToTaste => "qb",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Unit {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unit = match s.trim().to_ascii_lowercase().as_str() {
            "kg" | "kilogram" => Unit::Kilogram,
            "g" | "gram" => Unit::Gram,
            "mg" | "milligram" => Unit::Milligram,
            "l" | "liter" | "litre" => Unit::Liter,
            "dl" | "deciliter" => Unit::Deciliter,
            "cl" | "centiliter" => Unit::Centiliter,
            "ml" | "milliliter" => Unit::Milliliter,
            "cs" | "tbsp" | "tablespoon" => Unit::Tablespoon,
            "cc" | "tsp" | "teaspoon" => Unit::Teaspoon,
            "xic" | "cup" => Unit::Cup,
            "pt" | "pinch" => Unit::Pinch,
            "gt" | "drop" => Unit::Drop,
            "und" | "unit" | "piece" => Unit::Piece,
            "dz" | "dozen" => Unit::Dozen,
            "qb" | "to-taste" | "to_taste" => Unit::ToTaste,
            other => {
                return Err(EngineError::InvalidName(format!("unknown unit: {other}")));
            }
        };
        Ok(unit)
    }
}

/// `(from, to, mantissa, scale)`: factor is `mantissa * 10^-scale`.
const STANDARD_FACTORS: [(Unit, Unit, i64, u32); 15] = [
    // weight
    (Unit::Kilogram, Unit::Gram, 1000, 0),
    (Unit::Gram, Unit::Kilogram, 1, 3),
    (Unit::Gram, Unit::Milligram, 1000, 0),
    (Unit::Milligram, Unit::Gram, 1, 3),
    // volume
    (Unit::Liter, Unit::Milliliter, 1000, 0),
    (Unit::Milliliter, Unit::Liter, 1, 3),
    (Unit::Liter, Unit::Deciliter, 10, 0),
    (Unit::Deciliter, Unit::Liter, 1, 1),
    (Unit::Deciliter, Unit::Centiliter, 10, 0),
    (Unit::Centiliter, Unit::Deciliter, 1, 1),
    (Unit::Centiliter, Unit::Milliliter, 10, 0),
    (Unit::Milliliter, Unit::Centiliter, 1, 1),
    // kitchen measures, approximated in ml
    (Unit::Tablespoon, Unit::Milliliter, 15, 0),
    (Unit::Teaspoon, Unit::Milliliter, 5, 0),
    (Unit::Cup, Unit::Milliliter, 240, 0),
];

/// Culinary approximations: kilograms per piece, keyed by ingredient name.
const STANDARD_PIECE_WEIGHTS: [(&str, i64, u32); 3] = [
    ("cebola", 150, 3),
    ("alho", 5, 3),
    ("ovo", 50, 3),
];

/// Immutable table of direct unit conversion factors.
///
/// Build it once at start-up (see [`ConversionTable::standard`]) and hand it
/// to the costing engine.
#[derive(Clone, Debug, Default)]
pub struct ConversionTable {
    factors: HashMap<(Unit, Unit), Decimal>,
    piece_weights: HashMap<String, Decimal>,
}

impl ConversionTable {
    /// An empty table: only identity conversions succeed.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard kitchen table, including piece weights for onion,
    /// garlic clove and egg.
    #[must_use]
    pub fn standard() -> Self {
        let factors = STANDARD_FACTORS
            .iter()
            .map(|&(from, to, mantissa, scale)| ((from, to), Decimal::new(mantissa, scale)))
            .collect();
        let piece_weights = STANDARD_PIECE_WEIGHTS
            .iter()
            .map(|&(name, mantissa, scale)| (name.to_string(), Decimal::new(mantissa, scale)))
            .collect();
        Self {
            factors,
            piece_weights,
        }
    }

    /// Add or replace the direct factor for `from -> to`.
    pub fn with_factor(mut self, from: Unit, to: Unit, factor: Decimal) -> ResultEngine<Self> {
        if factor <= Decimal::ZERO {
            return Err(EngineError::InvalidAmount(format!(
                "conversion factor {from} -> {to} must be > 0"
            )));
        }
        self.factors.insert((from, to), factor);
        Ok(self)
    }

    /// Add or replace the weight in kilograms of one piece of `ingredient`.
    pub fn with_piece_weight(mut self, ingredient: &str, kilograms: Decimal) -> ResultEngine<Self> {
        if kilograms <= Decimal::ZERO {
            return Err(EngineError::InvalidAmount(format!(
                "piece weight for '{ingredient}' must be > 0"
            )));
        }
        let key = normalize_name_key(ingredient, "ingredient")?;
        self.piece_weights.insert(key, kilograms);
        Ok(self)
    }

    /// Direct factor for `from -> to`, if any.
    #[must_use]
    pub fn factor(&self, from: Unit, to: Unit) -> Option<Decimal> {
        self.factors.get(&(from, to)).copied()
    }

    /// Kilograms per piece of the named ingredient, if known.
    #[must_use]
    pub fn piece_weight(&self, ingredient: &str) -> Option<Decimal> {
        let key = normalize_name_key(ingredient, "ingredient").ok()?;
        self.piece_weights.get(&key).copied()
    }

    /// Convert `quantity` from one unit to another with a single lookup.
    pub fn convert(&self, quantity: Decimal, from: Unit, to: Unit) -> ResultEngine<Decimal> {
        if from == to {
            return Ok(quantity);
        }
        self.factor(from, to)
            .map(|factor| quantity * factor)
            .ok_or(EngineError::NoDirectConversion { from, to })
    }

    /// Convert a quantity of a named ingredient.
    ///
    /// Falls back to the piece weight when converting pieces to kilograms.
    pub fn convert_ingredient(
        &self,
        quantity: Decimal,
        from: Unit,
        to: Unit,
        ingredient: &str,
    ) -> ResultEngine<Decimal> {
        match self.convert(quantity, from, to) {
            Err(EngineError::NoDirectConversion { .. })
                if from == Unit::Piece && to == Unit::Kilogram =>
            {
                self.piece_weight(ingredient)
                    .map(|weight| quantity * weight)
                    .ok_or(EngineError::NoDirectConversion { from, to })
            }
            other => other,
        }
    }
}
