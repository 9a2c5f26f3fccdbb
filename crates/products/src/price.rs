use core::str::FromStr;

use serde::{Deserialize, Serialize};

use shopfront_core::DomainError;

/// Price in the smallest currency unit (e.g. cents).
///
/// Prices are exact two-place decimals; the currency itself is chosen by
/// the formatter at render time.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    pub const ZERO: Price = Price(0);

    pub const fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    /// Build from whole units plus cents (`cents` must be below 100).
    pub fn new(units: u64, cents: u8) -> Result<Self, DomainError> {
        if cents >= 100 {
            return Err(DomainError::validation(format!("cents out of range: {cents}")));
        }
        units
            .checked_mul(100)
            .and_then(|v| v.checked_add(u64::from(cents)))
            .map(Self)
            .ok_or_else(|| DomainError::validation("price overflow"))
    }

    pub fn minor_units(&self) -> u64 {
        self.0
    }

    pub fn units(&self) -> u64 {
        self.0 / 100
    }

    pub fn cents(&self) -> u8 {
        (self.0 % 100) as u8
    }

    /// `percent`% of this price, rounded half-up to the minor unit.
    ///
    /// Whole hundreds and the remainder are scaled separately so no
    /// intermediate product exceeds the result; results past `u64::MAX`
    /// saturate.
    pub fn percent(&self, percent: u64) -> Price {
        let whole = (self.0 / 100).saturating_mul(percent);
        let rest = (self.0 % 100).saturating_mul(percent).saturating_add(50) / 100;
        Price(whole.saturating_add(rest))
    }

    /// Sum that stops at the largest representable price.
    pub fn saturating_add(self, rhs: Price) -> Price {
        Price(self.0.saturating_add(rhs.0))
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.units(), self.cents())
    }
}

impl FromStr for Price {
    type Err = DomainError;

    /// Parses `"3"`, `"1.2"` or `"1.20"`; more than two decimals is an error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || DomainError::validation(format!("invalid price: {s:?}"));

        let (units, frac) = s.split_once('.').unwrap_or((s, ""));
        if units.is_empty() || frac.len() > 2 {
            return Err(invalid());
        }
        let units: u64 = units.parse().map_err(|_| invalid())?;
        let cents: u8 = match frac.len() {
            0 => 0,
            1 => frac.parse::<u8>().map_err(|_| invalid())? * 10,
            _ => frac.parse().map_err(|_| invalid())?,
        };
        Price::new(units, cents)
    }
}
