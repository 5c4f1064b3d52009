use crate::dimension::Dimension;
use crate::error::{Error, Result};
use crate::unit::Unit;
use std::fmt;

/// A numeric magnitude paired with a unit. Every expression in the calculator
/// evaluates to exactly one `Quantity`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quantity {
    pub value: f64,
    pub unit: Unit,
}

impl Quantity {
    pub fn new(value: f64, unit: Unit) -> Quantity {
        Quantity { value, unit }
    }

    pub fn dimensionless(value: f64) -> Quantity {
        Quantity {
            value,
            unit: Unit::one(),
        }
    }

    pub fn dims(&self) -> Dimension {
        self.unit.dims
    }

    /// Magnitude expressed in SI base units.
    pub fn base_value(&self) -> f64 {
        self.unit.to_base(self.value)
    }

    /// Decompose into SI base units (`in si`). Affine offsets are applied, so
    /// `25 degC` decomposes to `298.15 K`.
    pub fn to_base(&self) -> Quantity {
        Quantity {
            value: self.base_value(),
            unit: Unit::base(self.unit.dims),
        }
    }

    /// Convert into the given unit. Dimensions must match; affine scales are
    /// converted through their base representation so temperatures come out
    /// right.
    pub fn convert_to(&self, target: &Unit) -> Result<Quantity> {
        if self.unit.dims != target.dims {
            return Err(Error::Incompatible {
                from: display_or_scalar(&self.unit),
                to: display_or_scalar(target),
            });
        }
        Ok(Quantity {
            value: target.from_base(self.base_value()),
            unit: target.clone(),
        })
    }

    pub fn neg(&self) -> Quantity {
        Quantity {
            value: -self.value,
            unit: self.unit.clone(),
        }
    }

    /// Addition; the right operand is converted into the left operand's unit.
    pub fn add(&self, rhs: &Quantity) -> Result<Quantity> {
        self.combine_additive(rhs, |a, b| a + b)
    }

    pub fn sub(&self, rhs: &Quantity) -> Result<Quantity> {
        self.combine_additive(rhs, |a, b| a - b)
    }

    fn combine_additive(&self, rhs: &Quantity, op: fn(f64, f64) -> f64) -> Result<Quantity> {
        if self.unit.dims != rhs.unit.dims {
            return Err(Error::Incompatible {
                from: display_or_scalar(&self.unit),
                to: display_or_scalar(&rhs.unit),
            });
        }
        let base = op(self.base_value(), rhs.base_value());
        Ok(Quantity {
            value: self.unit.from_base(base),
            unit: self.unit.clone(),
        })
    }

    /// Multiplication. Multiplying by a pure number scales the magnitude and
    /// keeps the other operand's unit (so `2 * 25 degC` stays in degC);
    /// otherwise both units must be linear and compose.
    pub fn mul(&self, rhs: &Quantity) -> Result<Quantity> {
        if self.unit.is_scalar() {
            return Ok(Quantity {
                value: self.value * rhs.value,
                unit: rhs.unit.clone(),
            });
        }
        if rhs.unit.is_scalar() {
            return Ok(Quantity {
                value: self.value * rhs.value,
                unit: self.unit.clone(),
            });
        }
        Ok(Quantity {
            value: self.value * rhs.value,
            unit: self.unit.multiply(&rhs.unit)?,
        })
    }

    pub fn div(&self, rhs: &Quantity) -> Result<Quantity> {
        if rhs.unit.is_scalar() {
            return Ok(Quantity {
                value: self.value / rhs.value,
                unit: self.unit.clone(),
            });
        }
        let inverted = rhs.unit.invert()?;
        if self.unit.is_scalar() {
            return Ok(Quantity {
                value: self.value / rhs.value,
                unit: inverted,
            });
        }
        Ok(Quantity {
            value: self.value / rhs.value,
            unit: self.unit.multiply(&inverted)?,
        })
    }
}

fn display_or_scalar(unit: &Unit) -> String {
    let rendered = unit.to_string();
    if rendered.is_empty() {
        "(dimensionless)".to_string()
    } else {
        rendered
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = self.unit.to_string();
        if unit.is_empty() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{} {}", self.value, unit)
        }
    }
}
