//! Scope legality of contexts.
//!
//! A context is legal when
//! - no bound variable is quantified twice at nested scopes,
//! - (outside formulas) every bound variable is quantified,
//! - no environment frame reintroduces a free variable already in scope,
//! - every free variable is introduced by an enclosing `letting`/`setting` frame.
//!
//! Illegal conclusions are discarded by the matcher, never reported as errors.
use log::trace;

use crate::context::Context;
use crate::env::Assumption;
use crate::sentence::{Sentence, SentenceKind};
use crate::term::{Term, TermKind};
use crate::variable::FreeVariable;

/// Variables available while walking a sentence.
struct Scope<'a> {
    /// `None` means every free variable is acceptable.
    free: Option<&'a [FreeVariable]>,
    bound: Vec<&'a str>,
    allow_unbound: bool,
}

impl<'a> Scope<'a> {
    fn sentence_is_legal(&mut self, sentence: &'a Sentence) -> bool {
        match sentence.kind() {
            SentenceKind::Atomic(_) => true,
            SentenceKind::Predicate { args, .. } => args.iter().all(|t| self.term_is_legal(t)),
            SentenceKind::Connective { args, .. } => {
                args.iter().all(|s| self.sentence_is_legal(s))
            }
            SentenceKind::Quantifier { variable, body, .. } => {
                if self.bound.contains(&variable.name()) {
                    trace!("{} quantifies {} twice", sentence.short_text(), variable);
                    return false;
                }
                self.bound.push(variable.name());
                let legal = self.sentence_is_legal(body);
                self.bound.pop();
                legal
            }
        }
    }

    fn term_is_legal(&self, term: &Term) -> bool {
        match term.kind() {
            TermKind::Free(v) => self.free.is_none_or(|free| free.contains(v)),
            TermKind::Bound(v) => {
                self.allow_unbound || self.bound.iter().any(|b| *b == v.name())
            }
            TermKind::Primitive(_) => true,
            TermKind::Apply { args, .. } => args.iter().all(|t| self.term_is_legal(t)),
        }
    }
}

/// Whether `sentence` is legal given the available free variables.
///
/// `free == None` accepts every free variable. With `allow_unbound`, bound variables that no
/// quantifier introduces are tolerated.
pub fn is_legal_sentence(
    sentence: &Sentence,
    free: Option<&[FreeVariable]>,
    allow_unbound: bool,
) -> bool {
    Scope {
        free,
        bound: Vec::new(),
        allow_unbound,
    }
    .sentence_is_legal(sentence)
}

/// Whether `context` respects the scoping rules.
pub fn is_legal(context: &Context) -> bool {
    let (sentence, environment) = match context {
        Context::Term(_) => return true,
        Context::Formula(sentence) => return is_legal_sentence(sentence, None, true),
        Context::Environment(environment) => (None, environment),
        Context::Fact {
            sentence,
            environment,
        } => (Some(sentence), environment),
    };

    let mut free: Vec<FreeVariable> = Vec::with_capacity(environment.len());
    for frame in environment.frames() {
        if let Assumption::Letting(v) | Assumption::Setting(v, _) = frame {
            if free.contains(v) {
                trace!("{} reintroduces free variable {v}", environment.text());
                return false;
            }
            free.push(v.clone());
        }
        if let Some(s) = frame.sentence() {
            if !is_legal_sentence(s, Some(free.as_slice()), false) {
                return false;
            }
        }
    }

    sentence.is_none_or(|s| is_legal_sentence(s, Some(free.as_slice()), false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Environment;
    use crate::sentence::Predicate;
    use crate::variable::BoundVariable;

    fn p(t: impl Into<Term>) -> Sentence {
        Sentence::predicate(Predicate::new("P", 1), [t.into()]).unwrap()
    }

    #[test]
    fn formulas_tolerate_dangling_bound_variables() {
        let x = BoundVariable::new("X");
        assert!(is_legal(&Context::formula(p(x.clone()))));
        let twice = Sentence::for_all(x.clone(), Sentence::for_all(x.clone(), p(x.clone())));
        assert!(!is_legal(&Context::formula(twice)));
        // sibling scopes may reuse a name
        let siblings = Sentence::for_all(x.clone(), p(x.clone())) & Sentence::for_all(x.clone(), p(x));
        assert!(is_legal(&Context::formula(siblings)));
    }

    #[test]
    fn facts_require_quantified_bound_variables() {
        let x = BoundVariable::new("X");
        assert!(!is_legal(&Context::from(p(x.clone()))));
        assert!(is_legal(&Context::from(Sentence::for_all(x.clone(), p(x)))));
    }

    #[test]
    fn free_variables_must_be_in_scope() {
        let x = FreeVariable::new("x");
        let fact = Context::fact(p(x.clone()), Environment::root());
        assert!(!is_legal(&fact));
        let fact = Context::fact(p(x.clone()), Environment::root().with(x.clone()));
        assert!(is_legal(&fact));
        // an assumption may not mention a variable introduced later
        let env = Environment::root().with(p(x.clone())).with(x.clone());
        assert!(!is_legal(&Context::environment(env)));
    }

    #[test]
    fn repeated_free_variable_is_illegal() {
        let x = FreeVariable::new("x");
        let env = Environment::root()
            .with(x.clone())
            .with(Assumption::Setting(x.clone(), Sentence::atomic("A")));
        assert!(!is_legal(&Context::environment(env)));
    }

    #[test]
    fn terms_are_always_legal() {
        assert!(is_legal(&Context::term(BoundVariable::new("X"))));
    }
}
