//! Whole-rupiah money amounts.

use serde::{Deserialize, Deserializer, Serialize};

use crate::format::format_to_rupiah;

/// An amount in Indonesian rupiah.
///
/// Rupiah has no minor unit in practice, so amounts are whole numbers. The
/// backend sends them as plain JSON numbers; fractional values are rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Rupiah(i64);

impl Rupiah {
    pub const ZERO: Self = Self(0);

    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: i64) -> Self {
        Self(amount)
    }

    /// The raw amount.
    #[must_use]
    pub const fn amount(self) -> i64 {
        self.0
    }
}

impl<'de> Deserialize<'de> for Rupiah {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Whole(i64),
            Fractional(f64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Whole(amount) => Self(amount),
            #[allow(clippy::cast_possible_truncation)] // amounts are far below i64::MAX
            Raw::Fractional(amount) => Self(amount.round() as i64),
        })
    }
}

impl From<i64> for Rupiah {
    fn from(amount: i64) -> Self {
        Self(amount)
    }
}

impl std::fmt::Display for Rupiah {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&format_to_rupiah(self.0))
    }
}
