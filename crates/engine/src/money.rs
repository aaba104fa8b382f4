use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Sub},
    str::FromStr,
};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Decimal places kept for monetary values.
pub const MONEY_PLACES: u32 = 2;
/// Decimal places kept for quantities (weights, yields, shopping amounts).
pub const QUANTITY_PLACES: u32 = 3;

/// Round `value` to `places` decimals, ties away from zero (round-half-up).
#[must_use]
pub fn round_half_up(value: Decimal, places: u32) -> Decimal {
    value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

/// Round a quantity to [`QUANTITY_PLACES`].
#[must_use]
pub fn round_quantity(value: Decimal) -> Decimal {
    round_half_up(value, QUANTITY_PLACES)
}

/// Monetary amount, always held at 2 decimal places.
///
/// Every constructor rounds half-up, so any value of this type is already in
/// its final representation. Sums of `Money` stay exact.
///
/// # Examples
///
/// ```rust
/// use engine::Money;
/// use rust_decimal::Decimal;
///
/// let amount = Money::new(Decimal::new(2005, 3));
/// assert_eq!(amount.to_string(), "2.01");
/// assert_eq!("10,5".parse::<Money>().unwrap().to_string(), "10.50");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Creates a new amount, rounding half-up to 2 places.
    #[must_use]
    pub fn new(value: Decimal) -> Self {
        let mut rounded = round_half_up(value, MONEY_PLACES);
        rounded.rescale(MONEY_PLACES);
        Self(rounded)
    }

    /// Returns the underlying decimal.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Returns `true` if the amount is below 0.
    #[must_use]
    pub fn is_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Multiply by a decimal factor and round the product.
    #[must_use]
    pub fn scale(self, factor: Decimal) -> Money {
        Money::new(self.0 * factor)
    }

    /// Divide by `divisor`, `None` when the divisor is not positive.
    #[must_use]
    pub fn per(self, divisor: Decimal) -> Option<Money> {
        if divisor > Decimal::ZERO {
            Some(Money::new(self.0 / divisor))
        } else {
            None
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("{:.2}", self.0))
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Money::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses a decimal string.
    ///
    /// Accepts `.` or `,` as decimal separator. Rejects more than 2
    /// fractional digits instead of silently rounding user input.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(EngineError::InvalidAmount("empty amount".to_string()));
        }
        let value = Decimal::from_str(&trimmed.replace(',', "."))
            .map_err(|_| EngineError::InvalidAmount("invalid amount".to_string()))?;
        if value.normalize().scale() > MONEY_PLACES {
            return Err(EngineError::InvalidAmount("too many decimals".to_string()));
        }
        Ok(Money::new(value))
    }
}
