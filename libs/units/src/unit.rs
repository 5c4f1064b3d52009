use crate::dimension::Dimension;
use crate::error::{Error, Result};
use std::fmt;

/// A (possibly composed) unit: a linear map `base = value * factor + offset`
/// into SI base dimensions, plus the named parts it was composed from.
///
/// `offset` is non-zero only for affine temperature scales. Affine units may
/// scale a magnitude but never participate in products, quotients or powers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unit {
    pub factor: f64,
    pub offset: f64,
    pub dims: Dimension,
    /// Display composition: unit name paired with its exponent.
    pub parts: Vec<(String, i32)>,
}

impl Unit {
    /// The unit of a plain number.
    pub fn one() -> Unit {
        Unit {
            factor: 1.0,
            offset: 0.0,
            dims: Dimension::ZERO,
            parts: Vec::new(),
        }
    }

    /// The SI base unit for a dimension (factor 1, offset 0).
    pub fn base(dims: Dimension) -> Unit {
        Unit {
            factor: 1.0,
            offset: 0.0,
            parts: dims.base_parts(),
            dims,
        }
    }

    pub fn to_base(&self, value: f64) -> f64 {
        value * self.factor + self.offset
    }

    pub fn from_base(&self, base: f64) -> f64 {
        (base - self.offset) / self.factor
    }

    /// True for the unit of a bare numeric literal: no dimension, no scale.
    pub fn is_scalar(&self) -> bool {
        self.dims.is_dimensionless() && self.factor == 1.0 && self.offset == 0.0
    }

    pub fn is_affine(&self) -> bool {
        self.offset != 0.0
    }

    pub fn multiply(&self, other: &Unit) -> Result<Unit> {
        self.require_linear()?;
        other.require_linear()?;
        Ok(Unit {
            factor: self.factor * other.factor,
            offset: 0.0,
            dims: self.dims.checked_add(&other.dims)?,
            parts: merge_parts(&self.parts, &other.parts),
        })
    }

    pub fn invert(&self) -> Result<Unit> {
        self.require_linear()?;
        Ok(Unit {
            factor: 1.0 / self.factor,
            offset: 0.0,
            dims: self.dims.checked_neg()?,
            parts: self
                .parts
                .iter()
                .map(|(name, exp)| (name.clone(), -exp))
                .collect(),
        })
    }

    fn require_linear(&self) -> Result<()> {
        if self.is_affine() {
            return Err(Error::AffineCompose(self.to_string()));
        }
        Ok(())
    }
}

fn merge_parts(a: &[(String, i32)], b: &[(String, i32)]) -> Vec<(String, i32)> {
    let mut out: Vec<(String, i32)> = a.to_vec();
    for (name, exp) in b {
        match out.iter_mut().find(|(n, _)| n == name) {
            Some((_, e)) => *e += exp,
            None => out.push((name.clone(), *exp)),
        }
    }
    out.retain(|(_, e)| *e != 0);
    out
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let render = |parts: &[(&String, i32)]| -> String {
            parts
                .iter()
                .map(|(name, exp)| {
                    if *exp == 1 {
                        (*name).clone()
                    } else {
                        format!("{}^{}", name, exp)
                    }
                })
                .collect::<Vec<_>>()
                .join(" ")
        };

        let numerator: Vec<(&String, i32)> = self
            .parts
            .iter()
            .filter(|(_, e)| *e > 0)
            .map(|(n, e)| (n, *e))
            .collect();
        let denominator: Vec<(&String, i32)> = self
            .parts
            .iter()
            .filter(|(_, e)| *e < 0)
            .map(|(n, e)| (n, -*e))
            .collect();

        match (numerator.is_empty(), denominator.is_empty()) {
            (true, true) => Ok(()),
            (false, true) => write!(f, "{}", render(&numerator)),
            (true, false) => write!(f, "1 / {}", render(&denominator)),
            (false, false) => write!(f, "{} / {}", render(&numerator), render(&denominator)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_unit_has_no_rendering() {
        assert_eq!(Unit::one().to_string(), "");
        assert!(Unit::one().is_scalar());
    }

    #[test]
    fn merged_parts_cancel() {
        let m = Unit {
            factor: 1.0,
            offset: 0.0,
            dims: Dimension([1, 0, 0, 0, 0, 0, 0]),
            parts: vec![("m".into(), 1)],
        };
        let per_m = m.invert().unwrap();
        let cancelled = m.multiply(&per_m).unwrap();
        assert!(cancelled.parts.is_empty());
        assert!(cancelled.dims.is_dimensionless());
    }

    #[test]
    fn display_splits_numerator_and_denominator() {
        let unit = Unit {
            factor: 1.0,
            offset: 0.0,
            dims: Dimension([1, 0, -2, 0, 0, 0, 0]),
            parts: vec![("meter".into(), 1), ("second".into(), -2)],
        };
        assert_eq!(unit.to_string(), "meter / second^2");
    }
}
