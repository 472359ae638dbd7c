//! Laws: named inference-rule templates.
use std::collections::HashSet;
use std::fmt;

use crate::context::{Context, deduction_string};
use crate::sentence::{Sentence, SentenceKind};
use crate::term::{Term, TermKind};

/// Identifier of a law inside a [`crate::registry::LawRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LawId(pub(crate) usize);

impl LawId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for LawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a law is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LawKind {
    /// Structural matching of the givens, then substitution into the conclusion.
    Template,
    /// `P(x) [letting x]` plus an explicit bound variable `X` gives `FOR ALL X: P(X)`.
    UniversalIntroduction,
    /// Like [`LawKind::UniversalIntroduction`], picking the first unused bound variable.
    UniversalIntroductionAuto,
    /// `FOR ALL X: P(X)` plus a term `t` gives `P(t)`.
    UniversalSpecification,
}

/// A named rule: given templates and a conclusion template.
#[derive(Debug, Clone)]
pub struct Law {
    name: String,
    kind: LawKind,
    givens: Vec<Context>,
    conclusion: Context,
    /// Creation order; used as a clock to detect circular reasoning.
    index: usize,
    pub(crate) unlocked: bool,
    /// The derived law lifting this one into an arbitrary ambient environment.
    pub(crate) clone: Option<LawId>,
    pub(crate) is_clone: bool,
}

impl Law {
    pub fn new(
        name: impl Into<String>,
        kind: LawKind,
        givens: Vec<Context>,
        conclusion: Context,
        index: usize,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            givens,
            conclusion,
            index,
            unlocked: false,
            clone: None,
            is_clone: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> LawKind {
        self.kind
    }

    pub fn givens(&self) -> &[Context] {
        &self.givens
    }

    pub fn conclusion(&self) -> &Context {
        &self.conclusion
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn clone_law(&self) -> Option<LawId> {
        self.clone
    }

    /// Whether this law was derived from another by [`Law::derive_ambient_clone`].
    pub fn is_ambient_clone(&self) -> bool {
        self.is_clone
    }

    /// Whether no given carries an environment (all are formulas or terms).
    pub fn givens_are_environment_free(&self) -> bool {
        self.givens.iter().all(|g| !g.has_environment())
    }

    /// `Given a, b: deduce C.`
    pub fn statement(&self) -> String {
        deduction_string("Given", &self.givens, &self.conclusion)
    }

    /// `<name>: Given a, b: deduce C.`
    pub fn desc(&self) -> String {
        format!("{}: {}", self.name, self.statement())
    }

    /// Derive the version of this law that fires inside any ambient scope.
    ///
    /// Applies only when no given carries an environment but the conclusion does: the clone
    /// takes an extra root-environment given, whose matched environment becomes the ambient
    /// prefix of the conclusion.
    pub fn derive_ambient_clone(&self, index: usize) -> Option<Law> {
        if !self.givens_are_environment_free() || !self.conclusion.has_environment() {
            return None;
        }
        let mut givens = self.givens.clone();
        givens.push(Context::root_environment());
        let mut clone = Law::new(
            self.name.clone(),
            self.kind,
            givens,
            self.conclusion.clone(),
            index,
        );
        clone.is_clone = true;
        Some(clone)
    }

    /// Primitive names occurring in the templates, in first-occurrence order.
    pub fn primitives(&self) -> Primitives {
        let mut out = Primitives::default();
        for context in self.givens.iter().chain(std::iter::once(&self.conclusion)) {
            out.push_context(context);
        }
        out
    }
}

impl fmt::Display for Law {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.desc())
    }
}

/// Primitives of a law, grouped by kind, each list deduplicated in first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Primitives {
    pub atoms: Vec<Sentence>,
    pub free_variables: Vec<Term>,
    pub bound_variables: Vec<Term>,
    pub terms: Vec<Term>,
    seen: HashSet<String>,
}

impl Primitives {
    fn push_unique<T>(seen: &mut HashSet<String>, list: &mut Vec<T>, key: &str, value: T) {
        if seen.insert(key.to_string()) {
            list.push(value);
        }
    }

    fn push_context(&mut self, context: &Context) {
        if let Some(env) = context.env() {
            for frame in env.frames() {
                if let Some(s) = frame.sentence() {
                    self.push_sentence(s);
                }
                if let Some(v) = frame.variable() {
                    let term = Term::free(v.clone());
                    self.push_term(&term);
                }
            }
        }
        match context {
            Context::Formula(s) | Context::Fact { sentence: s, .. } => self.push_sentence(s),
            Context::Term(t) => self.push_term(t),
            Context::Environment(_) => {}
        }
    }

    fn push_sentence(&mut self, sentence: &Sentence) {
        match sentence.kind() {
            SentenceKind::Atomic(name) => {
                Self::push_unique(&mut self.seen, &mut self.atoms, name, sentence.clone())
            }
            SentenceKind::Predicate { args, .. } => args.iter().for_each(|t| self.push_term(t)),
            SentenceKind::Connective { args, .. } => {
                args.iter().for_each(|s| self.push_sentence(s))
            }
            SentenceKind::Quantifier { variable, body, .. } => {
                let term = Term::bound(variable.clone());
                self.push_term(&term);
                self.push_sentence(body);
            }
        }
    }

    fn push_term(&mut self, term: &Term) {
        match term.kind() {
            TermKind::Free(v) => Self::push_unique(
                &mut self.seen,
                &mut self.free_variables,
                v.name(),
                term.clone(),
            ),
            TermKind::Bound(v) => Self::push_unique(
                &mut self.seen,
                &mut self.bound_variables,
                v.name(),
                term.clone(),
            ),
            TermKind::Primitive(name) => {
                Self::push_unique(&mut self.seen, &mut self.terms, name, term.clone())
            }
            TermKind::Apply { args, .. } => args.iter().for_each(|t| self.push_term(t)),
        }
    }

    /// Whether the law mentions no primitive at all.
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
            && self.free_variables.is_empty()
            && self.bound_variables.is_empty()
            && self.terms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Environment;
    use crate::variable::{BoundVariable, FreeVariable};

    #[test]
    fn statement_and_desc() {
        let a = Sentence::atomic("A");
        let b = Sentence::atomic("B");
        let law = Law::new(
            "Modus ponens",
            LawKind::Template,
            vec![a.clone().into(), a.clone().then(b.clone()).into()],
            b.into(),
            1,
        );
        assert_eq!(law.statement(), "Given A, A IMPLIES B: deduce B.");
        assert_eq!(law.desc(), "Modus ponens: Given A, A IMPLIES B: deduce B.");
    }

    #[test]
    fn clone_only_for_environment_free_givens() {
        let a = Sentence::atomic("A");
        let assume = Law::new(
            "Assumption",
            LawKind::Template,
            vec![Context::formula(a.clone())],
            Context::fact(a.clone(), Environment::new([a.clone()])),
            3,
        );
        let clone = assume.derive_ambient_clone(4).unwrap();
        assert_eq!(clone.givens().len(), 2);
        assert_eq!(clone.givens()[1], Context::root_environment());
        assert_eq!(clone.index(), 4);
        assert!(clone.is_ambient_clone());
        assert!(clone.derive_ambient_clone(5).is_none());

        let mp = Law::new(
            "Modus ponens",
            LawKind::Template,
            vec![a.clone().into()],
            a.into(),
            1,
        );
        assert!(mp.derive_ambient_clone(2).is_none());
    }

    #[test]
    fn primitives_are_deduplicated() {
        let a = Sentence::atomic("A");
        let x = BoundVariable::new("X");
        let law = Law::new(
            "UI",
            LawKind::UniversalIntroduction,
            vec![
                Context::fact(a.clone(), Environment::root().with(FreeVariable::new("x"))),
                Context::term(x.clone()),
            ],
            Context::from(Sentence::for_all(x, a.clone() & a)),
            7,
        );
        let p = law.primitives();
        assert_eq!(p.atoms.len(), 1);
        assert_eq!(p.free_variables.len(), 1);
        assert_eq!(p.bound_variables.len(), 1);
        assert!(p.terms.is_empty());
        assert!(!p.is_empty());
    }
}
