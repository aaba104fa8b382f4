//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use std::str::FromStr;

use rust_decimal::Decimal;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, Unit};

/// Trim and collapse inner whitespace of a display name.
pub(crate) fn normalize_display_name(input: &str, label: &str) -> ResultEngine<String> {
    let display = input.split_whitespace().collect::<Vec<_>>().join(" ");
    if display.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(display)
}

/// Uniqueness key of a name: accents folded, lowercase, punctuation collapsed.
pub(crate) fn normalize_name_key(input: &str, label: &str) -> ResultEngine<String> {
    let mut out = String::new();
    let mut prev_space = false;
    for ch in input.trim().nfkd() {
        if is_combining_mark(ch) {
            continue;
        }
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
            prev_space = false;
        } else if !out.is_empty() && !prev_space {
            out.push(' ');
            prev_space = true;
        }
    }
    let normalized = out.trim_end();
    if normalized.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(normalized.to_string())
}

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::InvalidId(format!("invalid {label} id")))
}

/// Parse a decimal stored as canonical text.
pub(crate) fn parse_decimal(value: &str, label: &str) -> ResultEngine<Decimal> {
    Decimal::from_str(value.trim())
        .map_err(|_| EngineError::InvalidAmount(format!("invalid {label}: {value}")))
}

pub(crate) fn parse_optional_decimal(
    value: Option<&str>,
    label: &str,
) -> ResultEngine<Option<Decimal>> {
    value.map(|raw| parse_decimal(raw, label)).transpose()
}

/// Parse a unit code stored in the DB into a strongly typed `Unit`.
pub(crate) fn parse_unit(value: &str) -> ResultEngine<Unit> {
    Unit::from_str(value)
}

/// Canonical text used to persist a decimal.
pub(crate) fn decimal_text(value: Decimal) -> String {
    value.normalize().to_string()
}

pub(crate) fn ensure_positive(value: Decimal, label: &str) -> ResultEngine<()> {
    if value <= Decimal::ZERO {
        return Err(EngineError::InvalidAmount(format!("{label} must be > 0")));
    }
    Ok(())
}

pub(crate) fn ensure_non_negative(value: Decimal, label: &str) -> ResultEngine<()> {
    if value < Decimal::ZERO {
        return Err(EngineError::InvalidAmount(format!("{label} must be >= 0")));
    }
    Ok(())
}

/// Reject values with more fractional digits than the column keeps.
pub(crate) fn ensure_places(value: Decimal, places: u32, label: &str) -> ResultEngine<()> {
    if value.normalize().scale() > places {
        return Err(EngineError::InvalidAmount(format!(
            "{label} accepts at most {places} decimals"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_key_folds_accents_case_and_spacing() {
        assert_eq!(normalize_name_key("  Açúcar  Refinado ", "x").unwrap(), "acucar refinado");
        assert_eq!(normalize_name_key("Cebóla", "x").unwrap(), "cebola");
        assert_eq!(normalize_name_key("Sal-grosso", "x").unwrap(), "sal grosso");
        assert!(normalize_name_key(" - ", "x").is_err());
    }

    #[test]
    fn display_name_collapses_whitespace() {
        assert_eq!(
            normalize_display_name("  Molho   de tomate ", "recipe").unwrap(),
            "Molho de tomate"
        );
        assert!(normalize_display_name("   ", "recipe").is_err());
    }

    #[test]
    fn decimal_text_is_canonical() {
        assert_eq!(decimal_text(Decimal::new(2000, 3)), "2");
        assert_eq!(decimal_text(Decimal::new(1505, 3)), "1.505");
        assert_eq!(parse_decimal("1.505", "qty").unwrap(), Decimal::new(1505, 3));
        assert!(parse_decimal("1,5x", "qty").is_err());
    }

    #[test]
    fn places_are_enforced() {
        assert!(ensure_places(Decimal::new(1234, 3), 3, "qty").is_ok());
        assert!(ensure_places(Decimal::new(12345, 4), 3, "qty").is_err());
        assert!(ensure_places(Decimal::new(12300, 4), 2, "qty").is_ok());
    }
}
