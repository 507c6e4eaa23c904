//! Monetary amounts.
//!
//! The shop trades in whole Rupiah, but intermediate values (a 12.5% discount on
//! an odd price, for instance) may carry a fraction. `Money` keeps those exact on
//! top of `rust_decimal::Decimal`; rounding only happens where a caller asks for
//! it with [`Money::round_whole`].
//!
//! Arithmetic saturates at `Decimal::MAX`/`Decimal::MIN` instead of panicking.
//! Callers that need exact sums bound their inputs well below that.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Sub, SubAssign};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::value_object::ValueObject;

/// An amount of currency (IDR).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// An amount of whole currency units.
    pub fn new(whole: i64) -> Self {
        Self(Decimal::from(whole))
    }

    pub const fn from_decimal(amount: Decimal) -> Self {
        Self(amount)
    }

    pub const fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Coerce negative amounts to zero.
    pub fn non_negative(self) -> Self {
        if self.is_negative() { Self::ZERO } else { self }
    }

    /// `self * quantity`.
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// `self * factor`, unrounded.
    pub fn scale(self, factor: Decimal) -> Self {
        Self(self.0.saturating_mul(factor))
    }

    /// `percent`% of this amount, unrounded.
    pub fn percent(self, percent: Decimal) -> Self {
        match self.0.checked_mul(percent) {
            Some(product) => Self(product / Decimal::ONE_HUNDRED),
            None => Self((self.0 / Decimal::ONE_HUNDRED).saturating_mul(percent)),
        }
    }

    /// Round to whole currency units, half away from zero.
    pub fn round_whole(self) -> Self {
        Self(self.0.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_sub(rhs.0);
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

/// Rupiah display: `Rp 1.250.000`, rounded to whole units with `.` grouping.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.round_whole().0;
        let digits = rounded.abs().trunc().to_string();

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        if rounded < Decimal::ZERO {
            write!(f, "-Rp {grouped}")
        } else {
            write!(f, "Rp {grouped}")
        }
    }
}
