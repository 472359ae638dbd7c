//! Everything established while attempting an exercise.
use std::collections::BTreeSet;

use ndformal::context::Context;
use ndformal::env::Environment;
use ndformal::sentence::Sentence;
use ndformal::term::{Term, TermKind};
use ndformal::variable::{
    BoundVariable, FreeVariable, first_unused_bound_name, first_unused_free_name,
};

/// Facts grouped by environment, plus the formula and term windows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workspace {
    /// Every environment opened so far, including the root, in creation order.
    environments: Vec<Environment>,
    facts: Vec<(Sentence, Environment)>,
    formulas: Vec<Sentence>,
    terms: Vec<Term>,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            environments: vec![Environment::root()],
            ..Default::default()
        }
    }

    /// Open `environment` and every environment enclosing it.
    fn open(&mut self, environment: &Environment) {
        for len in 0..=environment.len() {
            let prefix = environment.prefix(len);
            if !self.environments.contains(&prefix) {
                self.environments.push(prefix);
            }
        }
    }

    /// Add a context to the window it belongs in.
    pub fn add(&mut self, context: Context) {
        match context {
            Context::Formula(s) => self.formulas.push(s),
            Context::Term(t) => self.terms.push(t),
            Context::Environment(e) => self.open(&e),
            Context::Fact {
                sentence,
                environment,
            } => {
                self.open(&environment);
                self.facts.push((sentence, environment));
            }
        }
    }

    pub fn environments(&self) -> &[Environment] {
        &self.environments
    }

    pub fn formulas(&self) -> &[Sentence] {
        &self.formulas
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Every fact, as a context.
    pub fn facts(&self) -> impl Iterator<Item = Context> + '_ {
        self.facts
            .iter()
            .map(|(s, e)| Context::fact(s.clone(), e.clone()))
    }

    /// Facts established directly inside `environment`.
    pub fn facts_in<'a>(&'a self, environment: &'a Environment) -> impl Iterator<Item = &'a Sentence> {
        self.facts
            .iter()
            .filter(move |(_, e)| e == environment)
            .map(|(s, _)| s)
    }

    /// Whether `context` has been established (or opened, for environments).
    pub fn contains(&self, context: &Context) -> bool {
        match context {
            Context::Formula(s) => self.formulas.contains(s),
            Context::Term(t) => self.terms.contains(t),
            Context::Environment(e) => self.environments.contains(e),
            Context::Fact {
                sentence,
                environment,
            } => self
                .facts
                .iter()
                .any(|(s, e)| s == sentence && e == environment),
        }
    }

    fn term_names(&self) -> BTreeSet<&str> {
        self.terms
            .iter()
            .filter(|t| matches!(t.kind(), TermKind::Free(_) | TermKind::Bound(_)))
            .map(Term::short_text)
            .collect()
    }

    /// First free variable name not yet in the term window.
    pub fn fresh_free_variable(&self) -> FreeVariable {
        let taken = self.term_names();
        FreeVariable::new(first_unused_free_name(|name| taken.contains(name)))
    }

    /// First bound variable name not yet in the term window.
    pub fn fresh_bound_variable(&self) -> BoundVariable {
        let taken = self.term_names();
        BoundVariable::new(first_unused_bound_name(|name| taken.contains(name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facts_open_their_environments() {
        let mut ws = Workspace::new();
        let a = Sentence::atomic("A");
        let env = Environment::new([a.clone(), Sentence::atomic("B")]);
        ws.add(Context::fact(a.clone(), env.clone()));
        assert_eq!(ws.environments().len(), 3);
        assert_eq!(ws.facts_in(&env).count(), 1);
        assert_eq!(ws.facts_in(&Environment::root()).count(), 0);
        assert!(ws.contains(&Context::environment(env.prefix(1))));
    }

    #[test]
    fn fresh_variables_skip_used_names() {
        let mut ws = Workspace::new();
        assert_eq!(ws.fresh_free_variable().name(), "x");
        ws.add(Context::term(FreeVariable::new("x")));
        ws.add(Context::term(BoundVariable::new("X")));
        assert_eq!(ws.fresh_free_variable().name(), "y");
        assert_eq!(ws.fresh_bound_variable().name(), "Y");
    }
}
