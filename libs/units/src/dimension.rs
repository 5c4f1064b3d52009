use crate::error::{Error, Result};

/// Exponent vector over the seven SI base dimensions, in the order
/// length (m), mass (kg), time (s), current (A), temperature (K),
/// amount (mol), luminous intensity (cd).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dimension(pub [i8; 7]);

/// Base unit symbol for each slot of the exponent vector.
pub(crate) const BASE_SYMBOLS: [&str; 7] = ["m", "kg", "s", "A", "K", "mol", "cd"];

impl Dimension {
    pub const ZERO: Dimension = Dimension([0; 7]);

    pub fn is_dimensionless(&self) -> bool {
        self.0 == [0; 7]
    }

    pub fn checked_add(&self, other: &Dimension) -> Result<Dimension> {
        let mut out = [0i8; 7];
        for i in 0..7 {
            out[i] = self.0[i]
                .checked_add(other.0[i])
                .ok_or(Error::ExponentOverflow)?;
        }
        Ok(Dimension(out))
    }

    pub fn checked_neg(&self) -> Result<Dimension> {
        let mut out = [0i8; 7];
        for i in 0..7 {
            out[i] = self.0[i].checked_neg().ok_or(Error::ExponentOverflow)?;
        }
        Ok(Dimension(out))
    }

    /// The base-symbol rendering of this dimension, e.g. `[("m", 1), ("s", -2)]`.
    pub(crate) fn base_parts(&self) -> Vec<(String, i32)> {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, exp)| **exp != 0)
            .map(|(i, exp)| (BASE_SYMBOLS[i].to_string(), *exp as i32))
            .collect()
    }
}
