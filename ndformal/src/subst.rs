//! Binding maps and template instantiation.
//!
//! Role
//! - [`Bindings`] records what each placeholder of a law was bound to during a match, plus
//!   the ambient environment inherited by the conclusion.
//! - [`subs`] rebuilds a conclusion template from a binding map.
//! - [`free_to_bound`] / [`bound_to_term`] are the leaf rewrites used by the quantifier laws.
//!
//! Both rewrites assume the replacement cannot be captured; they check that precondition and
//! fail with [`LogicError::VariableCapture`] instead of producing a captured result.
use std::collections::BTreeMap;
use std::fmt;

use strum::EnumIs;

use crate::context::Context;
use crate::env::{Assumption, Environment};
use crate::error::{LogicError, LogicResult};
use crate::sentence::{Sentence, SentenceKind};
use crate::term::{Term, TermKind};
use crate::variable::{BoundVariable, FreeVariable};

/// A name occurring in a law's templates.
///
/// Atoms, free variables and bound variables live in separate namespaces.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Placeholder {
    Atom(String),
    Free(String),
    Bound(String),
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placeholder::Atom(n) | Placeholder::Free(n) | Placeholder::Bound(n) => f.write_str(n),
        }
    }
}

/// The concrete value bound to a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, EnumIs)]
pub enum Binding {
    Sentence(Sentence),
    Free(FreeVariable),
    Bound(BoundVariable),
}

/// Per-match binding map.
///
/// Each placeholder is bound at most once; later occurrences must agree with the first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    values: BTreeMap<Placeholder, Binding>,
    /// Ambient environment prefix shared by the justifications.
    pub env: Environment,
}

impl Bindings {
    pub fn new(env: Environment) -> Self {
        Self {
            values: BTreeMap::new(),
            env,
        }
    }

    pub fn get(&self, key: &Placeholder) -> Option<&Binding> {
        self.values.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Placeholder, &Binding)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Bind `key` to `value` unless already bound; returns whether the (new or existing)
    /// binding equals `value`.
    pub fn bind(&mut self, key: Placeholder, value: Binding) -> bool {
        match self.values.get(&key) {
            Some(existing) => *existing == value,
            None => {
                self.values.insert(key, value);
                true
            }
        }
    }

    pub fn sentence(&self, name: &str) -> Option<&Sentence> {
        match self.values.get(&Placeholder::Atom(name.to_string())) {
            Some(Binding::Sentence(s)) => Some(s),
            _ => None,
        }
    }

    pub fn free(&self, name: &str) -> Option<&FreeVariable> {
        match self.values.get(&Placeholder::Free(name.to_string())) {
            Some(Binding::Free(v)) => Some(v),
            _ => None,
        }
    }

    pub fn bound(&self, name: &str) -> Option<&BoundVariable> {
        match self.values.get(&Placeholder::Bound(name.to_string())) {
            Some(Binding::Bound(v)) => Some(v),
            _ => None,
        }
    }
}

fn unbound(placeholder: Placeholder) -> LogicError {
    LogicError::unsupported(format!(
        "placeholder '{placeholder}' appears in the conclusion but in no given"
    ))
}

/// Instantiate a sentence template.
pub fn subs_sentence(template: &Sentence, bindings: &Bindings) -> LogicResult<Sentence> {
    match template.kind() {
        SentenceKind::Atomic(name) => bindings
            .sentence(name)
            .cloned()
            .ok_or_else(|| unbound(Placeholder::Atom(name.to_string()))),
        SentenceKind::Predicate { .. } => Err(LogicError::unsupported(format!(
            "predicate template '{}' in a conclusion",
            template.short_text()
        ))),
        SentenceKind::Connective { connective, args } => {
            let args = args
                .iter()
                .map(|a| subs_sentence(a, bindings))
                .collect::<LogicResult<Vec<_>>>()?;
            Sentence::connective(*connective, args)
        }
        SentenceKind::Quantifier {
            quantifier,
            variable,
            body,
        } => {
            let variable = bindings
                .bound(variable.name())
                .cloned()
                .ok_or_else(|| unbound(Placeholder::Bound(variable.name().to_string())))?;
            Ok(Sentence::quantified(
                *quantifier,
                variable,
                subs_sentence(body, bindings)?,
            ))
        }
    }
}

/// Instantiate a term template. Only variable placeholders are supported.
pub fn subs_term(template: &Term, bindings: &Bindings) -> LogicResult<Term> {
    match template.kind() {
        TermKind::Free(v) => bindings
            .free(v.name())
            .cloned()
            .map(Term::free)
            .ok_or_else(|| unbound(Placeholder::Free(v.name().to_string()))),
        TermKind::Bound(v) => bindings
            .bound(v.name())
            .cloned()
            .map(Term::bound)
            .ok_or_else(|| unbound(Placeholder::Bound(v.name().to_string()))),
        TermKind::Primitive(_) | TermKind::Apply { .. } => Err(LogicError::unsupported(format!(
            "term template '{}' in a conclusion",
            template.short_text()
        ))),
    }
}

fn subs_free(template: &FreeVariable, bindings: &Bindings) -> LogicResult<FreeVariable> {
    bindings
        .free(template.name())
        .cloned()
        .ok_or_else(|| unbound(Placeholder::Free(template.name().to_string())))
}

/// Instantiate environment frames and append them after the ambient prefix.
pub fn subs_environment(template: &Environment, bindings: &Bindings) -> LogicResult<Environment> {
    let mut env = bindings.env.clone();
    for frame in template.frames() {
        let frame = match frame {
            Assumption::Assuming(s) => Assumption::Assuming(subs_sentence(s, bindings)?),
            Assumption::Letting(v) => Assumption::Letting(subs_free(v, bindings)?),
            Assumption::Setting(v, s) => {
                Assumption::Setting(subs_free(v, bindings)?, subs_sentence(s, bindings)?)
            }
        };
        env.push(frame);
    }
    Ok(env)
}

/// Instantiate a conclusion template with the bindings of a successful match.
pub fn subs(template: &Context, bindings: &Bindings) -> LogicResult<Context> {
    Ok(match template {
        Context::Formula(s) => Context::Formula(subs_sentence(s, bindings)?),
        Context::Term(t) => Context::Term(subs_term(t, bindings)?),
        Context::Environment(e) => Context::Environment(subs_environment(e, bindings)?),
        Context::Fact {
            sentence,
            environment,
        } => Context::fact(
            subs_sentence(sentence, bindings)?,
            subs_environment(environment, bindings)?,
        ),
    })
}

/// Homomorphic rewrite of the term leaves of a sentence.
fn map_terms(
    sentence: &Sentence,
    leaf: &mut impl FnMut(&Term) -> LogicResult<Option<Term>>,
) -> LogicResult<Sentence> {
    match sentence.kind() {
        SentenceKind::Atomic(_) => Ok(sentence.clone()),
        SentenceKind::Predicate { predicate, args } => {
            let args = args
                .iter()
                .map(|t| map_term(t, leaf))
                .collect::<LogicResult<Vec<_>>>()?;
            Sentence::predicate(predicate.clone(), args)
        }
        SentenceKind::Connective { connective, args } => {
            let args = args
                .iter()
                .map(|s| map_terms(s, leaf))
                .collect::<LogicResult<Vec<_>>>()?;
            Sentence::connective(*connective, args)
        }
        SentenceKind::Quantifier {
            quantifier,
            variable,
            body,
        } => Ok(Sentence::quantified(
            *quantifier,
            variable.clone(),
            map_terms(body, leaf)?,
        )),
    }
}

fn map_term(
    term: &Term,
    leaf: &mut impl FnMut(&Term) -> LogicResult<Option<Term>>,
) -> LogicResult<Term> {
    if let Some(replacement) = leaf(term)? {
        return Ok(replacement);
    }
    match term.kind() {
        TermKind::Apply { operator, args } => {
            let args = args
                .iter()
                .map(|t| map_term(t, leaf))
                .collect::<LogicResult<Vec<_>>>()?;
            Term::apply(operator.clone(), args)
        }
        _ => Ok(term.clone()),
    }
}

/// Replace every occurrence of `free` in `statement` by `bound`.
///
/// Precondition: `bound` does not already occur in `statement` (quantified or dangling);
/// otherwise the result could be captured and [`LogicError::VariableCapture`] is returned.
pub fn free_to_bound(
    statement: &Sentence,
    free: &FreeVariable,
    bound: &BoundVariable,
) -> LogicResult<Sentence> {
    if statement.bound_variable_names().contains(bound.name()) {
        return Err(LogicError::VariableCapture {
            variable: bound.name().to_string(),
            within: statement.short_text().to_string(),
        });
    }
    map_terms(statement, &mut |t| {
        Ok(match t.kind() {
            TermKind::Free(v) if v == free => Some(Term::bound(bound.clone())),
            _ => None,
        })
    })
}

/// Replace every occurrence of `bound` in `statement` by `term`.
///
/// Precondition: no bound variable of `term` is quantified inside `statement`; otherwise
/// [`LogicError::VariableCapture`] is returned.
pub fn bound_to_term(
    statement: &Sentence,
    bound: &BoundVariable,
    term: &Term,
) -> LogicResult<Sentence> {
    let quantified = statement.quantified_names();
    let mut captured = None;
    term.for_each_variable(&mut |leaf| {
        if let either::Either::Right(b) = leaf {
            if quantified.contains(b.name()) {
                captured = Some(b.name().to_string());
            }
        }
    });
    if let Some(variable) = captured {
        return Err(LogicError::VariableCapture {
            variable,
            within: statement.short_text().to_string(),
        });
    }

    map_terms(statement, &mut |t| {
        Ok(match t.kind() {
            TermKind::Bound(v) if v == bound => Some(term.clone()),
            _ => None,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentence::Predicate;
    use crate::term::Operator;

    fn p(t: impl Into<Term>) -> Sentence {
        Sentence::predicate(Predicate::new("P", 1), [t.into()]).unwrap()
    }

    #[test]
    fn bind_first_wins_then_checks() {
        let mut b = Bindings::default();
        let key = Placeholder::Atom("A".into());
        assert!(b.bind(key.clone(), Binding::Sentence(Sentence::atomic("Rain"))));
        assert!(b.bind(key.clone(), Binding::Sentence(Sentence::atomic("Rain"))));
        assert!(!b.bind(key, Binding::Sentence(Sentence::atomic("Sun"))));
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn subs_rebuilds_template_after_ambient_env() {
        let mut b = Bindings::new(Environment::new([Sentence::atomic("C")]));
        b.bind(
            Placeholder::Atom("A".into()),
            Binding::Sentence(Sentence::atomic("Rain")),
        );
        b.bind(
            Placeholder::Atom("B".into()),
            Binding::Sentence(Sentence::atomic("Wet")),
        );
        let template = Context::fact(
            Sentence::atomic("A").then(Sentence::atomic("B")),
            Environment::new([Sentence::atomic("A")]),
        );
        let out = subs(&template, &b).unwrap();
        assert_eq!(out.name(), "Rain IMPLIES Wet [assuming C, Rain]");
        // the binding map's own environment is left untouched
        assert_eq!(b.env.len(), 1);
    }

    #[test]
    fn subs_rejects_unbound_and_predicate_templates() {
        let b = Bindings::default();
        let err = subs(&Context::from(Sentence::atomic("A")), &b).unwrap_err();
        assert!(err.is_unsupported());
        let err = subs(&Context::from(p(FreeVariable::new("x"))), &b).unwrap_err();
        assert!(err.is_unsupported());
    }

    #[test]
    fn free_to_bound_replaces_leaves() {
        let x = FreeVariable::new("x");
        let big_x = BoundVariable::new("X");
        let f = Operator::new("f", 1);
        let s = p(Term::apply(f, [x.clone()]).unwrap()) & p(FreeVariable::new("y"));
        let out = free_to_bound(&s, &x, &big_x).unwrap();
        assert_eq!(out.short_text(), "P(f(X)) AND P(y)");
    }

    #[test]
    fn free_to_bound_refuses_capture() {
        let x = FreeVariable::new("x");
        let big_x = BoundVariable::new("X");
        let s = Sentence::for_all(big_x.clone(), p(big_x.clone())) & p(x.clone());
        assert!(matches!(
            free_to_bound(&s, &x, &big_x),
            Err(LogicError::VariableCapture { .. })
        ));
    }

    #[test]
    fn bound_to_term_replaces_and_refuses_capture() {
        let big_x = BoundVariable::new("X");
        let big_y = BoundVariable::new("Y");
        let r = Predicate::new("R", 2);
        let body = Sentence::there_exists(
            big_y.clone(),
            Sentence::predicate(r, [big_x.clone(), big_y.clone()]).unwrap(),
        );
        let out = bound_to_term(&body, &big_x, &Term::free(FreeVariable::new("x"))).unwrap();
        assert_eq!(out.short_text(), "THERE EXISTS Y: R(x, Y)");
        assert!(bound_to_term(&body, &big_x, &Term::bound(big_y)).is_err());
    }
}
