//! Statement execution: dispatches parsed statements against the session,
//! drives commands, and owns the solver capability.

use crate::ast::Statement;
use crate::error::EvalError;
use crate::eval::evaluate;
use crate::lexer::{LexDiagnostic, Lexer};
use crate::parser::Parser;
use crate::resolver;
use crate::session::Session;
use std::collections::BTreeSet;
use std::fs;
use vernier_units::Quantity;

/// The symbolic-solver capability, consumed through a narrow, text-based
/// contract so alternate backends (including test fakes) can substitute.
pub trait EquationSolver {
    /// Free symbols of one relation, or an error if the text does not parse.
    fn free_symbols(&self, text: &str) -> Result<BTreeSet<String>, EvalError>;

    /// Solve the system for exactly the given unknowns. Returns zero or more
    /// solution sets; each set maps every unknown to an expression rendered in
    /// the calculator's own textual syntax (`^` for powers), suitable for
    /// re-parsing as the right-hand side of an assignment.
    fn solve_system(
        &self,
        equations: &[&str],
        unknowns: &[String],
    ) -> Result<Vec<Vec<(String, String)>>, EvalError>;
}

/// What a successfully executed statement produced.
#[derive(Debug)]
pub enum Outcome {
    /// Nothing to show (suppressed print, command side effect).
    Silent,
    /// An expression or assignment value to print.
    Value(Quantity),
    /// The `variables` listing, sorted by name.
    Variables(Vec<(String, Quantity)>),
    /// Result of a `solve` command.
    Solved {
        sets: usize,
        bindings: Vec<(String, Quantity)>,
        already_known: bool,
    },
    /// Result of an `import` command; `reports` carries the rendered output
    /// and per-line errors of the imported statements, in order.
    Imported {
        path: String,
        statements: usize,
        reports: Vec<String>,
    },
}

impl Outcome {
    /// Render for display, one line per entry. Empty for [`Outcome::Silent`].
    pub fn render(&self) -> Vec<String> {
        match self {
            Outcome::Silent => Vec::new(),
            Outcome::Value(value) => vec![value.to_string()],
            Outcome::Variables(bindings) => {
                if bindings.is_empty() {
                    vec!["(no variables)".to_string()]
                } else {
                    bindings
                        .iter()
                        .map(|(name, value)| format!("{name} = {value}"))
                        .collect()
                }
            }
            Outcome::Solved {
                sets,
                bindings,
                already_known,
            } => {
                let mut lines = Vec::new();
                if *already_known {
                    lines.push(
                        "All variables are known. Delete the variables to force recomputation."
                            .to_string(),
                    );
                }
                lines.push(format!(
                    "Found {} solution set{}",
                    sets,
                    if *sets == 1 { "" } else { "s" }
                ));
                for (name, value) in bindings {
                    lines.push(format!("{name} = {value}"));
                }
                lines
            }
            Outcome::Imported {
                path,
                statements,
                reports,
            } => {
                let mut lines = vec![format!(
                    "imported {path}: {statements} statement{}",
                    if *statements == 1 { "" } else { "s" }
                )];
                lines.extend(reports.iter().cloned());
                lines
            }
        }
    }
}

/// The result of executing one input line: recoverable lexical diagnostics
/// plus the statement outcome or error.
#[derive(Debug)]
pub struct LineOutput {
    pub diagnostics: Vec<LexDiagnostic>,
    pub result: Result<Outcome, EvalError>,
}

/// One calculator session: state plus the solver capability behind it.
pub struct Engine {
    pub(crate) session: Session,
    pub(crate) solver: Box<dyn EquationSolver>,
}

impl Engine {
    pub fn new(solver: Box<dyn EquationSolver>) -> Engine {
        Engine {
            session: Session::new(),
            solver,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Tokenize, parse, and execute one input line.
    pub fn execute_line(&mut self, line: &str) -> LineOutput {
        let (tokens, diagnostics) = Lexer::tokenize(line);
        let result = Parser::new(tokens)
            .parse_statement()
            .and_then(|statement| self.execute(statement));
        LineOutput {
            diagnostics,
            result,
        }
    }

    /// Execute an already-parsed statement.
    pub fn execute(&mut self, statement: Statement) -> Result<Outcome, EvalError> {
        match statement {
            Statement::Empty => Ok(Outcome::Silent),
            Statement::Expression { expr, print } => {
                let value = evaluate(&expr, &self.session)?;
                Ok(if print {
                    Outcome::Value(value)
                } else {
                    Outcome::Silent
                })
            }
            Statement::Assign { name, expr, print } => {
                // Evaluate fully before committing the binding.
                let value = evaluate(&expr, &self.session)?;
                self.session.set_variable(name, value.clone());
                Ok(if print {
                    Outcome::Value(value)
                } else {
                    Outcome::Silent
                })
            }
            Statement::Delete(name) => {
                self.session.delete_variable(&name);
                Ok(Outcome::Silent)
            }
            Statement::ListVariables => Ok(Outcome::Variables(self.session.variables())),
            Statement::Reset => {
                self.session.reset();
                Ok(Outcome::Silent)
            }
            Statement::DefineEquation(text) => {
                let symbols = self.solver.free_symbols(&text)?;
                let id = self.session.register_equation(text, symbols);
                tracing::debug!(equation = id, "registered equation");
                Ok(Outcome::Silent)
            }
            Statement::Import(path) => self.import(&path),
            Statement::Solve(targets) => resolver::solve_targets(self, &targets),
        }
    }

    /// Execute every non-empty line of a file through the ordinary pipeline.
    /// A malformed line is reported and the import continues; only a missing
    /// or unreadable file fails the command.
    fn import(&mut self, path: &str) -> Result<Outcome, EvalError> {
        let contents = fs::read_to_string(path).map_err(|source| EvalError::Import {
            path: path.to_string(),
            source,
        })?;

        let mut statements = 0;
        let mut reports = Vec::new();
        for line in contents.lines() {
            if line.trim().is_empty() {
                continue;
            }
            statements += 1;
            let output = self.execute_line(line);
            for diagnostic in &output.diagnostics {
                reports.push(diagnostic.to_string());
            }
            match output.result {
                Ok(outcome) => reports.extend(outcome.render()),
                Err(error) => reports.push(format!("error: {error}")),
            }
        }
        tracing::debug!(path, statements, "import finished");
        Ok(Outcome::Imported {
            path: path.to_string(),
            statements,
            reports,
        })
    }
}
