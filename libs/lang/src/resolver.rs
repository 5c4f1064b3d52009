//! Dependency resolver for `solve`.
//!
//! Starting from the unknown targets, walks the variable <-> equation
//! reference relation to find the minimal closed subsystem that determines
//! them, hands that system to the solver capability, and commits each
//! solution by re-entering the ordinary assignment path.

use crate::engine::{Engine, Outcome};
use crate::error::EvalError;
use crate::session::{EquationId, Session};
use std::collections::BTreeSet;

pub(crate) fn solve_targets(engine: &mut Engine, targets: &[String]) -> Result<Outcome, EvalError> {
    let unknown: Vec<String> = targets
        .iter()
        .filter(|name| !engine.session.is_known(name))
        .cloned()
        .collect();

    // Already-known variables are never recomputed; delete them first to
    // force it.
    if unknown.is_empty() {
        let bindings = targets
            .iter()
            .filter_map(|name| {
                engine
                    .session
                    .variable(name)
                    .map(|value| (name.clone(), value.clone()))
            })
            .collect();
        return Ok(Outcome::Solved {
            sets: 1,
            bindings,
            already_known: true,
        });
    }

    let (variables, equations) = closure(&engine.session, &unknown);
    tracing::debug!(?variables, equations = equations.len(), "dependency closure");

    let texts: Vec<&str> = equations
        .iter()
        .map(|id| engine.session.equation(*id).text.as_str())
        .collect();
    let solution_sets = engine.solver.solve_system(&texts, &variables)?;

    let sets = solution_sets.len();
    let mut bindings = Vec::new();
    for (index, set) in solution_sets.iter().enumerate() {
        for (name, expression) in set {
            let target = if index == 0 {
                name.clone()
            } else {
                format!("{name}_{index}")
            };
            // Re-entry: a solved value is committed through the ordinary
            // assignment path, so it round-trips the grammar and gets
            // unit-aware evaluation.
            let output = engine.execute_line(&format!("{target} = {expression};"));
            output.result.map_err(|error| {
                EvalError::Solve(format!(
                    "solution '{name} = {expression}' failed to evaluate: {error}"
                ))
            })?;
            let value = engine.session.variable(&target).ok_or_else(|| {
                EvalError::Solve(format!("solution for '{name}' produced no binding"))
            })?;
            bindings.push((target, value.clone()));
        }
    }

    Ok(Outcome::Solved {
        sets,
        bindings,
        already_known: false,
    })
}

/// The dependency closure: all variables and equations reachable from the
/// unknown targets, excluding anything already known. The frontier shrinks on
/// every pop and pushes are deduplicated against known/visited/frontier, so
/// the loop terminates.
pub(crate) fn closure(session: &Session, unknown: &[String]) -> (Vec<String>, Vec<EquationId>) {
    let mut visited_vars: BTreeSet<String> = BTreeSet::new();
    let mut visited_eqns: BTreeSet<EquationId> = BTreeSet::new();
    let mut stack: Vec<String> = unknown.to_vec();
    let mut on_frontier: BTreeSet<String> = stack.iter().cloned().collect();

    while let Some(var) = stack.pop() {
        if visited_vars.contains(&var) {
            continue;
        }
        if let Some(ids) = session.equations_for(&var) {
            for id in ids {
                if !visited_eqns.insert(*id) {
                    continue;
                }
                for symbol in &session.equation(*id).symbols {
                    if session.is_known(symbol)
                        || visited_vars.contains(symbol)
                        || on_frontier.contains(symbol)
                    {
                        continue;
                    }
                    stack.push(symbol.clone());
                    on_frontier.insert(symbol.clone());
                }
            }
        }
        on_frontier.remove(&var);
        visited_vars.insert(var);
    }

    (
        visited_vars.into_iter().collect(),
        visited_eqns.into_iter().collect(),
    )
}
