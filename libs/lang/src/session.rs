//! Session state: variable bindings, registered equations, and the index
//! from free symbols to the equations referencing them.
//!
//! The session is an explicit object passed to every component; there are no
//! process-wide singletons, so independent sessions can coexist (and tests
//! get a fresh one each).

use std::collections::{BTreeSet, HashMap};
use vernier_units::Quantity;

pub type EquationId = usize;

/// A registered symbolic relation: the raw text handed to the solver
/// capability, plus the free symbols it mentions.
#[derive(Debug, Clone, PartialEq)]
pub struct Equation {
    pub text: String,
    pub symbols: BTreeSet<String>,
}

#[derive(Debug, Default)]
pub struct Session {
    variables: HashMap<String, Quantity>,
    equations: Vec<Equation>,
    index: HashMap<String, BTreeSet<EquationId>>,
}

impl Session {
    pub fn new() -> Session {
        Session::default()
    }

    pub fn variable(&self, name: &str) -> Option<&Quantity> {
        self.variables.get(name)
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn set_variable(&mut self, name: impl Into<String>, value: Quantity) {
        self.variables.insert(name.into(), value);
    }

    /// Remove a binding; deleting an absent name is a silent no-op. Equations
    /// referencing the name stay registered and stay indexed, so a later
    /// `solve` can still reach them.
    pub fn delete_variable(&mut self, name: &str) {
        self.variables.remove(name);
    }

    /// Current bindings, sorted by name for stable output.
    pub fn variables(&self) -> Vec<(String, Quantity)> {
        let mut out: Vec<(String, Quantity)> = self
            .variables
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    /// Register an equation and index it under each of its free symbols.
    /// Re-registering the same text returns the existing id.
    pub fn register_equation(&mut self, text: String, symbols: BTreeSet<String>) -> EquationId {
        if let Some(id) = self.equations.iter().position(|e| e.text == text) {
            return id;
        }
        let id = self.equations.len();
        for symbol in &symbols {
            self.index.entry(symbol.clone()).or_default().insert(id);
        }
        self.equations.push(Equation { text, symbols });
        id
    }

    pub fn equation(&self, id: EquationId) -> &Equation {
        &self.equations[id]
    }

    pub fn equation_count(&self) -> usize {
        self.equations.len()
    }

    /// Equations whose free symbols include `symbol`.
    pub fn equations_for(&self, symbol: &str) -> Option<&BTreeSet<EquationId>> {
        self.index.get(symbol)
    }

    /// Clear bindings, equations, and the symbol index together.
    pub fn reset(&mut self) {
        self.variables.clear();
        self.equations.clear();
        self.index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn registration_indexes_every_symbol() {
        let mut session = Session::new();
        let id = session.register_equation("a + b - 5".into(), symbols(&["a", "b"]));
        assert_eq!(session.equations_for("a"), Some(&BTreeSet::from([id])));
        assert_eq!(session.equations_for("b"), Some(&BTreeSet::from([id])));
        assert_eq!(session.equations_for("c"), None);
    }

    #[test]
    fn duplicate_registration_is_collapsed() {
        let mut session = Session::new();
        let first = session.register_equation("a - 1".into(), symbols(&["a"]));
        let second = session.register_equation("a - 1".into(), symbols(&["a"]));
        assert_eq!(first, second);
        assert_eq!(session.equation_count(), 1);
    }

    #[test]
    fn delete_does_not_retract_index_entries() {
        let mut session = Session::new();
        session.set_variable("a", Quantity::dimensionless(1.0));
        session.register_equation("a - 1".into(), symbols(&["a"]));
        session.delete_variable("a");
        assert!(!session.is_known("a"));
        assert!(session.equations_for("a").is_some());
    }

    #[test]
    fn reset_clears_everything_together() {
        let mut session = Session::new();
        session.set_variable("x", Quantity::dimensionless(2.0));
        session.register_equation("x - 2".into(), symbols(&["x"]));
        session.reset();
        assert!(session.variables().is_empty());
        assert_eq!(session.equation_count(), 0);
        assert_eq!(session.equations_for("x"), None);
    }
}
