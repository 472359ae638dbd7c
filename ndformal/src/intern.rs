//! Append-only interning table for primitives.
//!
//! Maps a primitive's display name to its canonical node so that repeated references to
//! "the same" atom or variable resolve to one object. Entries are added, never replaced.
use std::collections::BTreeMap;

use log::debug;
use strum::{EnumIs, EnumTryAs};

use crate::context::Context;
use crate::error::{LogicError, LogicResult};
use crate::law::Primitives;
use crate::sentence::Sentence;
use crate::term::{Term, TermKind};
use crate::variable::{BoundVariable, FreeVariable};

/// A canonical primitive node.
#[derive(Debug, Clone, PartialEq, Eq, EnumIs, EnumTryAs)]
pub enum Primitive {
    Sentence(Sentence),
    Free(FreeVariable),
    Bound(BoundVariable),
    Term(Term),
}

impl Primitive {
    fn describe(&self) -> &'static str {
        match self {
            Primitive::Sentence(_) => "an atomic sentence",
            Primitive::Free(_) => "a free variable",
            Primitive::Bound(_) => "a bound variable",
            Primitive::Term(_) => "a primitive term",
        }
    }
}

/// Name → canonical primitive.
#[derive(Debug, Clone, Default)]
pub struct Interner {
    entries: BTreeMap<String, Primitive>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Primitive> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Primitive)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Register `primitive` under `name`, returning the canonical entry.
    ///
    /// An existing entry of the same kind wins; an entry of another kind is a type mismatch.
    pub fn register(&mut self, name: &str, primitive: Primitive) -> LogicResult<&Primitive> {
        if let Some(existing) = self.entries.get(name) {
            if std::mem::discriminant(existing) != std::mem::discriminant(&primitive) {
                return Err(LogicError::mismatch(
                    format!("{name} to be {}", existing.describe()),
                    primitive.describe(),
                ));
            }
        } else {
            debug!("interning {} '{name}'", primitive.describe());
        }
        Ok(self.entries.entry(name.to_string()).or_insert(primitive))
    }

    /// The canonical atomic sentence called `name`.
    pub fn atom(&mut self, name: &str) -> LogicResult<Sentence> {
        let entry = self.register(name, Primitive::Sentence(Sentence::atomic(name)))?;
        Ok(entry.clone().try_as_sentence().unwrap_or_else(|| Sentence::atomic(name)))
    }

    /// The canonical free variable called `name`.
    pub fn free(&mut self, name: &str) -> LogicResult<FreeVariable> {
        let entry = self.register(name, Primitive::Free(FreeVariable::new(name)))?;
        Ok(entry.clone().try_as_free().unwrap_or_else(|| FreeVariable::new(name)))
    }

    /// The canonical bound variable called `name`.
    pub fn bound(&mut self, name: &str) -> LogicResult<BoundVariable> {
        let entry = self.register(name, Primitive::Bound(BoundVariable::new(name)))?;
        Ok(entry.clone().try_as_bound().unwrap_or_else(|| BoundVariable::new(name)))
    }

    /// The canonical primitive term called `name`.
    pub fn primitive_term(&mut self, name: &str) -> LogicResult<Term> {
        let entry = self.register(name, Primitive::Term(Term::primitive(name)))?;
        Ok(entry.clone().try_as_term().unwrap_or_else(|| Term::primitive(name)))
    }

    /// Register every primitive a law mentions.
    pub fn register_all(&mut self, primitives: &Primitives) -> LogicResult<()> {
        for atom in &primitives.atoms {
            self.register(atom.short_text(), Primitive::Sentence(atom.clone()))?;
        }
        let terms = primitives
            .free_variables
            .iter()
            .chain(&primitives.bound_variables)
            .chain(&primitives.terms);
        for term in terms {
            let primitive = match term.kind() {
                TermKind::Free(v) => Primitive::Free(v.clone()),
                TermKind::Bound(v) => Primitive::Bound(v.clone()),
                _ => Primitive::Term(term.clone()),
            };
            self.register(term.short_text(), primitive)?;
        }
        Ok(())
    }

    /// A formula context for a registered atomic sentence.
    pub fn formula_context(&self, name: &str) -> LogicResult<Context> {
        match self.entries.get(name) {
            Some(Primitive::Sentence(s)) => Ok(Context::formula(s.clone())),
            Some(other) => Err(LogicError::mismatch("an atomic sentence", other.describe())),
            None => Err(LogicError::mismatch("an atomic sentence", format!("unknown '{name}'"))),
        }
    }

    /// A term context for a registered variable or primitive term.
    pub fn term_context(&self, name: &str) -> LogicResult<Context> {
        match self.entries.get(name) {
            Some(Primitive::Free(v)) => Ok(Context::term(v.clone())),
            Some(Primitive::Bound(v)) => Ok(Context::term(v.clone())),
            Some(Primitive::Term(t)) => Ok(Context::term(t.clone())),
            Some(other) => Err(LogicError::mismatch("a term", other.describe())),
            None => Err(LogicError::mismatch("a term", format!("unknown '{name}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_idempotent() {
        let mut interner = Interner::new();
        let a = interner.atom("Rain").unwrap();
        let b = interner.atom("Rain").unwrap();
        assert_eq!(a, b);
        assert_eq!(interner.len(), 1);
        assert!(interner.formula_context("Rain").unwrap().is_formula());
    }

    #[test]
    fn kind_conflicts_are_type_mismatches() {
        let mut interner = Interner::new();
        interner.free("x").unwrap();
        let err = interner.atom("x").unwrap_err();
        assert!(matches!(err, LogicError::TypeMismatch { .. }));
        assert!(interner.formula_context("x").is_err());
        assert!(interner.term_context("x").unwrap().is_term());
        assert!(interner.term_context("nope").is_err());
    }
}
