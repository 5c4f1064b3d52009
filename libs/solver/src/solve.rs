//! Simultaneous-system solving.
//!
//! The strategy is elimination: find an equation linear in one unknown,
//! isolate it, substitute into the rest, and recurse; a residual univariate
//! equation of degree two falls back to quadratic roots, which is where
//! multiple solution sets come from. Coefficients on unknowns may be numeric
//! or symbolic in already-known variables; anything outside this fragment
//! yields zero solution sets.

use crate::error::Error;
use crate::expr::SymExpr;
use crate::parser::parse_relation;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use vernier_lang::{EquationSolver, EvalError};

/// The built-in solver backend.
#[derive(Debug, Default)]
pub struct Solver;

impl Solver {
    pub fn new() -> Solver {
        Solver
    }
}

impl EquationSolver for Solver {
    fn free_symbols(&self, text: &str) -> Result<BTreeSet<String>, EvalError> {
        let relation = parse_relation(text).map_err(equation_error)?;
        Ok(relation.free_symbols())
    }

    fn solve_system(
        &self,
        equations: &[&str],
        unknowns: &[String],
    ) -> Result<Vec<Vec<(String, String)>>, EvalError> {
        let system: Vec<SymExpr> = equations
            .iter()
            .map(|text| parse_relation(text).map_err(equation_error))
            .collect::<Result<_, _>>()?;

        let sets = solve(&system, unknowns);
        Ok(sets
            .into_iter()
            .map(|set| {
                unknowns
                    .iter()
                    .filter_map(|name| set.get(name).map(|expr| (name.clone(), expr.to_string())))
                    .collect()
            })
            .collect())
    }
}

fn equation_error(error: Error) -> EvalError {
    EvalError::Equation(error.to_string())
}

/// Solve the residual system for exactly `unknowns`. Every returned map binds
/// every unknown; an empty vector means no solution was found (or the system
/// is outside the supported fragment).
pub fn solve(system: &[SymExpr], unknowns: &[String]) -> Vec<BTreeMap<String, SymExpr>> {
    solve_rec(system.to_vec(), unknowns.to_vec())
}

fn solve_rec(equations: Vec<SymExpr>, unknowns: Vec<String>) -> Vec<BTreeMap<String, SymExpr>> {
    // Identically-zero residuals carry no information.
    let equations: Vec<SymExpr> = equations
        .into_iter()
        .map(|e| e.simplify())
        .filter(|e| e.as_num() != Some(0.0))
        .collect();

    if unknowns.is_empty() {
        // Leftover residuals mean the system is inconsistent (or cannot be
        // verified); either way there is no solution to report.
        return if equations.is_empty() {
            vec![BTreeMap::new()]
        } else {
            Vec::new()
        };
    }
    if equations.is_empty() {
        // Underdetermined: parametric families are not reported.
        return Vec::new();
    }

    let pivot = find_pivot(&equations, &unknowns, true)
        .or_else(|| find_pivot(&equations, &unknowns, false));
    if let Some((index, unknown, isolated)) = pivot {
        let rest: Vec<SymExpr> = equations
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, e)| e.substitute(&unknown, &isolated))
            .collect();
        let remaining: Vec<String> = unknowns
            .iter()
            .filter(|name| **name != unknown)
            .cloned()
            .collect();

        let mut out = Vec::new();
        for mut set in solve_rec(rest, remaining) {
            let mut value = isolated.clone();
            for (name, solution) in &set {
                value = value.substitute(name, solution);
            }
            set.insert(unknown.clone(), value.simplify());
            out.push(set);
        }
        return out;
    }

    if equations.len() == 1 && unknowns.len() == 1 {
        if let Some(roots) = quadratic_roots(&equations[0], &unknowns[0]) {
            return roots
                .into_iter()
                .map(|root| BTreeMap::from([(unknowns[0].clone(), SymExpr::Num(root))]))
                .collect();
        }
    }

    tracing::debug!(
        equations = equations.len(),
        unknowns = unknowns.len(),
        "system is outside the supported fragment"
    );
    Vec::new()
}

/// Find an equation linear in one unknown and isolate that unknown. The
/// numeric pass requires a numeric coefficient; the symbolic pass accepts any
/// coefficient free of unknowns (division by it is assumed legitimate, as a
/// symbolic solver does generically).
fn find_pivot(
    equations: &[SymExpr],
    unknowns: &[String],
    numeric_only: bool,
) -> Option<(usize, String, SymExpr)> {
    for (index, equation) in equations.iter().enumerate() {
        for unknown in unknowns {
            let Some(coeffs) = poly_coeffs(equation, unknown, 1) else {
                continue;
            };
            if coeffs.len() != 2 {
                continue;
            }
            let slope = &coeffs[1];
            let usable = if numeric_only {
                matches!(slope.as_num(), Some(v) if v != 0.0)
            } else {
                !contains_any(slope, unknowns)
            };
            if usable {
                let isolated =
                    SymExpr::div(SymExpr::neg(coeffs[0].clone()), slope.clone()).simplify();
                return Some((index, unknown.clone(), isolated));
            }
        }
    }
    None
}

fn contains_any(expr: &SymExpr, names: &[String]) -> bool {
    names.iter().any(|name| expr.contains(name))
}

/// Real roots of a univariate residual of degree exactly two with numeric
/// coefficients, smaller root first.
fn quadratic_roots(equation: &SymExpr, unknown: &str) -> Option<Vec<f64>> {
    let coeffs = poly_coeffs(equation, unknown, 2)?;
    if coeffs.len() != 3 {
        return None;
    }
    let c = coeffs[0].as_num()?;
    let b = coeffs[1].as_num()?;
    let a = coeffs[2].as_num()?;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return Some(Vec::new());
    }
    let sqrt_disc = discriminant.sqrt();
    let mut roots = vec![(-b - sqrt_disc) / (2.0 * a)];
    if discriminant > 0.0 {
        roots.push((-b + sqrt_disc) / (2.0 * a));
    }
    roots.sort_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal));
    Some(roots)
}

/// Coefficients of `expr` viewed as a polynomial in `var`, lowest degree
/// first, at most `max_degree`. Coefficients may be symbolic. `None` when the
/// expression is not polynomial in `var` within the degree bound.
fn poly_coeffs(expr: &SymExpr, var: &str, max_degree: usize) -> Option<Vec<SymExpr>> {
    let coeffs = extract(expr, var, max_degree)?;
    let mut coeffs: Vec<SymExpr> = coeffs.into_iter().map(|c| c.simplify()).collect();
    while coeffs.len() > 1 && coeffs.last().and_then(|c| c.as_num()) == Some(0.0) {
        coeffs.pop();
    }
    Some(coeffs)
}

fn extract(expr: &SymExpr, var: &str, max_degree: usize) -> Option<Vec<SymExpr>> {
    if !expr.contains(var) {
        return Some(vec![expr.clone()]);
    }
    match expr {
        SymExpr::Sym(_) => {
            // Must be `var` itself, or `contains` would have been false.
            if max_degree >= 1 {
                Some(vec![SymExpr::Num(0.0), SymExpr::Num(1.0)])
            } else {
                None
            }
        }
        SymExpr::Add(a, b) => Some(poly_add(
            &extract(a, var, max_degree)?,
            &extract(b, var, max_degree)?,
        )),
        SymExpr::Sub(a, b) => Some(poly_add(
            &extract(a, var, max_degree)?,
            &poly_neg(&extract(b, var, max_degree)?),
        )),
        SymExpr::Neg(a) => Some(poly_neg(&extract(a, var, max_degree)?)),
        SymExpr::Mul(a, b) => poly_mul(
            &extract(a, var, max_degree)?,
            &extract(b, var, max_degree)?,
            max_degree,
        ),
        SymExpr::Div(a, b) => {
            if b.contains(var) {
                return None;
            }
            let numerator = extract(a, var, max_degree)?;
            Some(
                numerator
                    .into_iter()
                    .map(|c| SymExpr::div(c, (**b).clone()))
                    .collect(),
            )
        }
        SymExpr::Pow(base, exponent) => {
            if exponent.contains(var) {
                return None;
            }
            let n = exponent.simplify().as_num()?;
            if n < 0.0 || n.fract() != 0.0 {
                return None;
            }
            let n = n as usize;
            let base_coeffs = extract(base, var, max_degree)?;
            let mut acc = vec![SymExpr::Num(1.0)];
            for _ in 0..n {
                acc = poly_mul(&acc, &base_coeffs, max_degree)?;
            }
            Some(acc)
        }
        // Function calls over the unknown are not polynomial.
        SymExpr::Call(..) => None,
        SymExpr::Num(_) => unreachable!("numbers never contain symbols"),
    }
}

fn poly_add(a: &[SymExpr], b: &[SymExpr]) -> Vec<SymExpr> {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| match (a.get(i), b.get(i)) {
            (Some(x), Some(y)) => SymExpr::add(x.clone(), y.clone()),
            (Some(x), None) => x.clone(),
            (None, Some(y)) => y.clone(),
            (None, None) => SymExpr::Num(0.0),
        })
        .collect()
}

fn poly_neg(a: &[SymExpr]) -> Vec<SymExpr> {
    a.iter().map(|c| SymExpr::neg(c.clone())).collect()
}

fn poly_mul(a: &[SymExpr], b: &[SymExpr], max_degree: usize) -> Option<Vec<SymExpr>> {
    let degree = (a.len() - 1) + (b.len() - 1);
    if degree > max_degree {
        // A symbolic-zero leading coefficient could make this spurious, but
        // the simplifier has already folded numeric zeros away.
        return None;
    }
    let mut out = vec![SymExpr::Num(0.0); degree + 1];
    for (i, x) in a.iter().enumerate() {
        for (j, y) in b.iter().enumerate() {
            out[i + j] = SymExpr::add(out[i + j].clone(), SymExpr::mul(x.clone(), y.clone()));
        }
    }
    Some(out)
}
