//! The built-in unit catalog.
//!
//! Named units are registered with their SI conversion factor (and, for
//! temperature scales, an offset), their dimension vector, and whether they
//! accept metric prefixes. Lookup tries an exact alias first, then a metric
//! prefix split: full prefix names combine with full unit names, prefix
//! symbols with unit symbols (`kilometer` and `km`, never `kilom`).

use crate::dimension::Dimension;
use crate::error::{Error, Result};
use crate::unit::Unit;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::f64::consts::PI;

#[derive(Clone, Copy)]
struct UnitDef {
    factor: f64,
    offset: f64,
    dims: Dimension,
    metric: bool,
}

/// Alias table: name → (definition, alias-is-a-symbol).
type Catalog = HashMap<&'static str, (UnitDef, bool)>;

const fn dim(m: i8, kg: i8, s: i8, a: i8, k: i8, mol: i8, cd: i8) -> Dimension {
    Dimension([m, kg, s, a, k, mol, cd])
}

const DIMLESS: Dimension = dim(0, 0, 0, 0, 0, 0, 0);
const LENGTH: Dimension = dim(1, 0, 0, 0, 0, 0, 0);
const MASS: Dimension = dim(0, 1, 0, 0, 0, 0, 0);
const TIME: Dimension = dim(0, 0, 1, 0, 0, 0, 0);
const CURRENT: Dimension = dim(0, 0, 0, 1, 0, 0, 0);
const TEMPERATURE: Dimension = dim(0, 0, 0, 0, 1, 0, 0);
const AMOUNT: Dimension = dim(0, 0, 0, 0, 0, 1, 0);
const LUMINOUS: Dimension = dim(0, 0, 0, 0, 0, 0, 1);
const AREA: Dimension = dim(2, 0, 0, 0, 0, 0, 0);
const VOLUME: Dimension = dim(3, 0, 0, 0, 0, 0, 0);
const VELOCITY: Dimension = dim(1, 0, -1, 0, 0, 0, 0);
const FREQUENCY: Dimension = dim(0, 0, -1, 0, 0, 0, 0);
const FORCE: Dimension = dim(1, 1, -2, 0, 0, 0, 0);
const PRESSURE: Dimension = dim(-1, 1, -2, 0, 0, 0, 0);
const ENERGY: Dimension = dim(2, 1, -2, 0, 0, 0, 0);
const POWER: Dimension = dim(2, 1, -3, 0, 0, 0, 0);
const CHARGE: Dimension = dim(0, 0, 1, 1, 0, 0, 0);
const VOLTAGE: Dimension = dim(2, 1, -3, -1, 0, 0, 0);
const RESISTANCE: Dimension = dim(2, 1, -3, -2, 0, 0, 0);
const CAPACITANCE: Dimension = dim(-2, -1, 4, 2, 0, 0, 0);
const MAGNETIC_FLUX: Dimension = dim(2, 1, -2, -1, 0, 0, 0);
const FLUX_DENSITY: Dimension = dim(0, 1, -2, -1, 0, 0, 0);
const INDUCTANCE: Dimension = dim(2, 1, -2, -2, 0, 0, 0);

/// Metric prefixes: full name, symbol, factor.
const PREFIXES: [(&str, &str, f64); 15] = [
    ("exa", "E", 1e18),
    ("peta", "P", 1e15),
    ("tera", "T", 1e12),
    ("giga", "G", 1e9),
    ("mega", "M", 1e6),
    ("kilo", "k", 1e3),
    ("hecto", "h", 1e2),
    ("deka", "da", 1e1),
    ("deci", "d", 1e-1),
    ("centi", "c", 1e-2),
    ("milli", "m", 1e-3),
    ("micro", "u", 1e-6),
    ("nano", "n", 1e-9),
    ("pico", "p", 1e-12),
    ("femto", "f", 1e-15),
];

static CATALOG: Lazy<Catalog> = Lazy::new(build_catalog);

fn build_catalog() -> Catalog {
    let mut db = Catalog::new();

    let mut add = |names: &[&'static str],
                   symbols: &[&'static str],
                   factor: f64,
                   offset: f64,
                   dims: Dimension,
                   metric: bool| {
        let def = UnitDef {
            factor,
            offset,
            dims,
            metric,
        };
        for name in names {
            db.insert(name, (def, false));
        }
        for symbol in symbols {
            db.insert(symbol, (def, true));
        }
    };

    // SI base units
    add(&["meter", "metre"], &["m"], 1.0, 0.0, LENGTH, true);
    add(&["gram"], &["g"], 1e-3, 0.0, MASS, true);
    // `kilogram` is the base unit but takes no further prefixes.
    add(&["kilogram"], &["kg"], 1.0, 0.0, MASS, false);
    add(&["second", "seconds"], &["s", "sec"], 1.0, 0.0, TIME, true);
    add(&["ampere"], &["A", "amp"], 1.0, 0.0, CURRENT, true);
    add(&["kelvin"], &["K"], 1.0, 0.0, TEMPERATURE, true);
    add(&["mole"], &["mol"], 1.0, 0.0, AMOUNT, true);
    add(&["candela"], &["cd"], 1.0, 0.0, LUMINOUS, true);

    // Angle (dimensionless in this calculator)
    add(&["radian"], &["rad"], 1.0, 0.0, DIMLESS, true);
    add(&["degree", "deg"], &[], PI / 180.0, 0.0, DIMLESS, false);

    // SI named derived units
    add(&["newton"], &["N"], 1.0, 0.0, FORCE, true);
    add(&["joule"], &["J"], 1.0, 0.0, ENERGY, true);
    add(&["watt"], &["W"], 1.0, 0.0, POWER, true);
    add(&["pascal"], &["Pa"], 1.0, 0.0, PRESSURE, true);
    add(&["hertz"], &["Hz"], 1.0, 0.0, FREQUENCY, true);
    add(&["coulomb"], &["C"], 1.0, 0.0, CHARGE, true);
    add(&["volt"], &["V"], 1.0, 0.0, VOLTAGE, true);
    add(&["ohm"], &[], 1.0, 0.0, RESISTANCE, true);
    add(&["farad"], &["F"], 1.0, 0.0, CAPACITANCE, true);
    add(&["weber"], &["Wb"], 1.0, 0.0, MAGNETIC_FLUX, true);
    add(&["tesla"], &["T"], 1.0, 0.0, FLUX_DENSITY, true);
    add(&["henry"], &["H"], 1.0, 0.0, INDUCTANCE, true);

    // Accepted non-SI units
    add(&["liter", "litre"], &["L", "l"], 1e-3, 0.0, VOLUME, true);
    add(&["tonne", "ton"], &["t"], 1e3, 0.0, MASS, true);
    add(&["minute"], &["min"], 60.0, 0.0, TIME, false);
    add(&["hour"], &["h", "hr"], 3600.0, 0.0, TIME, false);
    add(&["day"], &[], 86400.0, 0.0, TIME, false);
    add(&["year"], &["yr"], 31_557_600.0, 0.0, TIME, false);
    add(&["bar"], &[], 1e5, 0.0, PRESSURE, true);
    add(&["atmosphere"], &["atm"], 101_325.0, 0.0, PRESSURE, false);
    add(&["electronvolt"], &["eV"], 1.602_176_634e-19, 0.0, ENERGY, true);
    add(&["calorie"], &["cal"], 4.184, 0.0, ENERGY, true);
    add(&["angstrom"], &[], 1e-10, 0.0, LENGTH, false);
    add(&["hectare"], &["ha"], 1e4, 0.0, AREA, false);

    // Imperial / US customary
    // `in` is a reserved word of the calculator grammar, so the inch is
    // reachable only by its full name.
    add(&["inch"], &[], 0.0254, 0.0, LENGTH, false);
    add(&["foot", "feet"], &["ft"], 0.3048, 0.0, LENGTH, false);
    add(&["yard"], &["yd"], 0.9144, 0.0, LENGTH, false);
    add(&["mile"], &["mi"], 1609.344, 0.0, LENGTH, false);
    add(&["pound"], &["lb", "lbs"], 0.453_592_37, 0.0, MASS, false);
    add(&["ounce"], &["oz"], 0.028_349_523_125, 0.0, MASS, false);
    add(&["slug"], &[], 14.593_902_94, 0.0, MASS, false);
    add(&["gallon"], &["gal"], 3.785_411_784e-3, 0.0, VOLUME, false);
    add(&["psi"], &[], 6894.757_293_168, 0.0, PRESSURE, false);
    add(&["mph"], &[], 0.447_04, 0.0, VELOCITY, false);

    // Affine temperature scales
    add(
        &["celsius", "degC", "deg_C"],
        &[],
        1.0,
        273.15,
        TEMPERATURE,
        false,
    );
    add(
        &["fahrenheit", "degF", "deg_F"],
        &[],
        5.0 / 9.0,
        459.67 * 5.0 / 9.0,
        TEMPERATURE,
        false,
    );

    db
}

fn instantiate(name: &str, def: &UnitDef, prefix: f64) -> Unit {
    Unit {
        factor: def.factor * prefix,
        offset: def.offset,
        dims: def.dims,
        parts: vec![(name.to_string(), 1)],
    }
}

/// Look a unit up by name or alias, honoring metric prefixes.
pub fn lookup(name: &str) -> Option<Unit> {
    let db = &*CATALOG;
    if let Some((def, _)) = db.get(name) {
        return Some(instantiate(name, def, 1.0));
    }
    for (long, short, factor) in &PREFIXES {
        for (prefix, wants_symbol) in [(*long, false), (*short, true)] {
            let Some(rest) = name.strip_prefix(prefix) else {
                continue;
            };
            if rest.is_empty() {
                continue;
            }
            if let Some((def, is_symbol)) = db.get(rest) {
                if *is_symbol == wants_symbol && def.metric {
                    return Some(instantiate(name, def, *factor));
                }
            }
        }
    }
    None
}

/// Like [`lookup`] but failing with [`Error::UnknownUnit`].
pub fn resolve(name: &str) -> Result<Unit> {
    lookup(name).ok_or_else(|| Error::UnknownUnit(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_alias_beats_prefix_split() {
        // `min` is the minute, not milli-inch or anything else.
        let unit = lookup("min").unwrap();
        assert_eq!(unit.factor, 60.0);
        // `cd` is the candela, not centi-day.
        let unit = lookup("cd").unwrap();
        assert_eq!(unit.dims, LUMINOUS);
    }

    #[test]
    fn symbol_prefixes_pair_with_symbols() {
        assert_eq!(lookup("km").unwrap().factor, 1000.0);
        assert_eq!(lookup("kilometer").unwrap().factor, 1000.0);
        // Mixed forms do not resolve.
        assert!(lookup("kmeter").is_none());
        assert!(lookup("kilom").is_none());
    }

    #[test]
    fn imperial_units_take_no_prefixes() {
        assert!(lookup("kft").is_none());
        assert!(lookup("mile").is_some());
    }

    #[test]
    fn affine_scales_are_not_prefixable() {
        assert!(lookup("mdegC").is_none());
        let celsius = lookup("degC").unwrap();
        assert!(celsius.is_affine());
    }
}
