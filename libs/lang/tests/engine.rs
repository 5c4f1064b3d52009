//! Engine and resolver tests against a scripted fake solver.
//!
//! The solver is a capability behind [`EquationSolver`], so these tests
//! substitute a fake that records what the resolver asked for and returns
//! preset solution sets.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;
use vernier_lang::{Engine, EquationSolver, EvalError, Outcome, Quantity};

#[derive(Debug, Clone, PartialEq)]
struct SolveCall {
    equations: Vec<String>,
    unknowns: Vec<String>,
}

#[derive(Default)]
struct FakeSolver {
    calls: Rc<RefCell<Vec<SolveCall>>>,
    solutions: Vec<Vec<(String, String)>>,
}

impl FakeSolver {
    fn scripted(solutions: Vec<Vec<(&str, &str)>>) -> (FakeSolver, Rc<RefCell<Vec<SolveCall>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let solver = FakeSolver {
            calls: Rc::clone(&calls),
            solutions: solutions
                .into_iter()
                .map(|set| {
                    set.into_iter()
                        .map(|(name, expr)| (name.to_string(), expr.to_string()))
                        .collect()
                })
                .collect(),
        };
        (solver, calls)
    }
}

impl EquationSolver for FakeSolver {
    fn free_symbols(&self, text: &str) -> Result<BTreeSet<String>, EvalError> {
        // Good enough for a fake: identifier-shaped words are symbols.
        let mut symbols = BTreeSet::new();
        for word in text.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '.')) {
            if word
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            {
                symbols.insert(word.to_string());
            }
        }
        Ok(symbols)
    }

    fn solve_system(
        &self,
        equations: &[&str],
        unknowns: &[String],
    ) -> Result<Vec<Vec<(String, String)>>, EvalError> {
        self.calls.borrow_mut().push(SolveCall {
            equations: equations.iter().map(|s| s.to_string()).collect(),
            unknowns: unknowns.to_vec(),
        });
        Ok(self.solutions.clone())
    }
}

fn engine_with(solutions: Vec<Vec<(&str, &str)>>) -> (Engine, Rc<RefCell<Vec<SolveCall>>>) {
    let (solver, calls) = FakeSolver::scripted(solutions);
    (Engine::new(Box::new(solver)), calls)
}

fn run(engine: &mut Engine, line: &str) -> Outcome {
    let output = engine.execute_line(line);
    assert!(output.diagnostics.is_empty(), "diagnostics for {line}");
    output.result.unwrap_or_else(|e| panic!("'{line}' failed: {e}"))
}

fn value(engine: &mut Engine, line: &str) -> Quantity {
    match run(engine, line) {
        Outcome::Value(q) => q,
        other => panic!("expected a value from '{line}', got {other:?}"),
    }
}

#[test]
fn assignment_round_trips_through_the_session() {
    let (mut engine, _) = engine_with(vec![]);
    let direct = value(&mut engine, "10 kilogram * 9.8 meter / second^2");
    run(&mut engine, "f = 10 kilogram * 9.8 meter / second^2;");
    let recalled = value(&mut engine, "f");
    assert_eq!(recalled, direct);
}

#[test]
fn suppressed_statements_are_silent() {
    let (mut engine, _) = engine_with(vec![]);
    assert!(matches!(run(&mut engine, "x = 3;"), Outcome::Silent));
    assert!(matches!(run(&mut engine, "x + 1;"), Outcome::Silent));
    assert!(matches!(run(&mut engine, "x + 1"), Outcome::Value(_)));
}

#[test]
fn failed_evaluation_commits_no_binding() {
    let (mut engine, _) = engine_with(vec![]);
    let output = engine.execute_line("x = 1 meter + 1 second");
    assert!(output.result.is_err());
    assert!(engine.session().variable("x").is_none());
}

#[test]
fn delete_is_a_silent_noop_for_absent_names() {
    let (mut engine, _) = engine_with(vec![]);
    assert!(matches!(run(&mut engine, "del ghost"), Outcome::Silent));
}

#[test]
fn variables_lists_bindings_sorted_by_name() {
    let (mut engine, _) = engine_with(vec![]);
    run(&mut engine, "b = 2;");
    run(&mut engine, "a = 1;");
    match run(&mut engine, "variables") {
        Outcome::Variables(bindings) => {
            let names: Vec<&str> = bindings.iter().map(|(n, _)| n.as_str()).collect();
            assert_eq!(names, vec!["a", "b"]);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn reset_empties_the_listing_regardless_of_prior_state() {
    let (mut engine, _) = engine_with(vec![]);
    run(&mut engine, "a = 1;");
    run(&mut engine, "eq a + b = 5;");
    run(&mut engine, "reset");
    match run(&mut engine, "variables") {
        Outcome::Variables(bindings) => assert!(bindings.is_empty()),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(engine.session().equation_count(), 0);
}

#[test]
fn defining_an_equation_indexes_its_free_symbols() {
    let (mut engine, _) = engine_with(vec![]);
    run(&mut engine, "eq a = b + c;");
    let session = engine.session();
    assert_eq!(session.equation_count(), 1);
    assert!(session.equations_for("a").is_some());
    assert!(session.equations_for("b").is_some());
    assert!(session.equations_for("c").is_some());
    assert!(session.equations_for("d").is_none());
}

#[test]
fn solve_of_known_variables_short_circuits_without_calling_the_solver() {
    let (mut engine, calls) = engine_with(vec![]);
    run(&mut engine, "x = 5;");
    match run(&mut engine, "solve x") {
        Outcome::Solved {
            sets,
            bindings,
            already_known,
        } => {
            assert_eq!(sets, 1);
            assert!(already_known);
            assert_eq!(bindings.len(), 1);
            assert_eq!(bindings[0].1, Quantity::dimensionless(5.0));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(calls.borrow().is_empty());
    // The binding is untouched.
    assert_eq!(value(&mut engine, "x"), Quantity::dimensionless(5.0));
}

#[test]
fn resolver_hands_the_solver_exactly_the_dependency_closure() {
    let (mut engine, calls) = engine_with(vec![]);
    run(&mut engine, "c = 1;");
    run(&mut engine, "eq a = b + c;");
    run(&mut engine, "eq b = 2;");
    // This equation references the known `c`; it must not be pulled in.
    run(&mut engine, "eq c = 99 - d;");
    let _ = engine.execute_line("solve a");

    let calls = calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].equations,
        vec!["a = b + c".to_string(), "b = 2".to_string()]
    );
    assert_eq!(calls[0].unknowns, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn solutions_are_committed_through_the_assignment_path() {
    let (mut engine, _) = engine_with(vec![vec![("a", "2 + c"), ("b", "2")]]);
    run(&mut engine, "c = 1;");
    run(&mut engine, "eq a = b + c;");
    run(&mut engine, "eq b = 2;");
    match run(&mut engine, "solve a, b") {
        Outcome::Solved { sets, bindings, .. } => {
            assert_eq!(sets, 1);
            assert_eq!(bindings.len(), 2);
        }
        other => panic!("unexpected {other:?}"),
    }
    // `2 + c` was evaluated against the session when re-injected.
    assert_eq!(value(&mut engine, "a"), Quantity::dimensionless(3.0));
    assert_eq!(value(&mut engine, "b"), Quantity::dimensionless(2.0));
}

#[test]
fn later_solution_sets_bind_suffixed_names() {
    let (mut engine, _) = engine_with(vec![vec![("x", "1")], vec![("x", "2")]]);
    run(&mut engine, "eq x^2 = 3 * x - 2;");
    match run(&mut engine, "solve x") {
        Outcome::Solved { sets, .. } => assert_eq!(sets, 2),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(value(&mut engine, "x"), Quantity::dimensionless(1.0));
    assert_eq!(value(&mut engine, "x_1"), Quantity::dimensionless(2.0));
}

#[test]
fn zero_solution_sets_is_reported_not_raised() {
    let (mut engine, _) = engine_with(vec![]);
    run(&mut engine, "eq x = x + 1;");
    match run(&mut engine, "solve x") {
        Outcome::Solved { sets, bindings, .. } => {
            assert_eq!(sets, 0);
            assert!(bindings.is_empty());
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn deleting_a_variable_leaves_its_equations_reachable() {
    // Deletion does not retract index entries, so a later solve resurrects
    // equations that referenced the deleted variable. Preserved behavior.
    let (mut engine, calls) = engine_with(vec![]);
    run(&mut engine, "b = 5;");
    run(&mut engine, "eq a = b;");
    run(&mut engine, "del b");
    let _ = engine.execute_line("solve a");

    let calls = calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].equations, vec!["a = b".to_string()]);
    // `b` is unknown again, so it is part of the system to solve.
    assert_eq!(calls[0].unknowns, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn import_executes_each_line_and_recovers_from_bad_ones() {
    let path = std::env::temp_dir().join(format!(
        "vernier-import-test-{}.vn",
        std::process::id()
    ));
    std::fs::write(
        &path,
        "left = 2 meter;\n\nthis is not valid +\nright = 3 meter;\nleft + right\n",
    )
    .unwrap();

    let (mut engine, _) = engine_with(vec![]);
    match run(&mut engine, &format!("import {}", path.display())) {
        Outcome::Imported {
            statements,
            reports,
            ..
        } => {
            // The blank line is skipped; the malformed one is reported.
            assert_eq!(statements, 4);
            assert!(reports.iter().any(|r| r.starts_with("error:")));
            assert!(reports.iter().any(|r| r == "5 meter"));
        }
        other => panic!("unexpected {other:?}"),
    }
    // State from before and after the malformed line is present.
    assert!(engine.session().variable("left").is_some());
    assert!(engine.session().variable("right").is_some());

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn import_of_a_missing_file_fails_the_command_only() {
    let (mut engine, _) = engine_with(vec![]);
    let output = engine.execute_line("import /definitely/not/here.vn");
    assert!(matches!(output.result, Err(EvalError::Import { .. })));
    // The session is still usable.
    assert!(matches!(run(&mut engine, "x = 1;"), Outcome::Silent));
}
