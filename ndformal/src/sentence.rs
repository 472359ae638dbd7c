//! Sentences: atomic placeholders, predicate applications, connectives and quantifiers.
//!
//! Role
//! - Immutable expression trees with precomputed `short_text` / `long_text`.
//! - Builders are pure functions of their operands; `&`, `|` and `!` are provided as sugar
//!   for `AND`, `OR` and `NOT`.
//!
//! Display
//! - Binary connectives: `"<a.long> AND <b.long>"`, long form parenthesized.
//! - `NOT <a.long>`, `TRUE`, `FALSE`.
//! - Quantifiers: `"FOR ALL <v>: <body.long>"` and `"THERE EXISTS <v>: <body.long>"`.
use std::collections::BTreeSet;
use std::fmt;
use std::ops::{BitAnd, BitOr, Not};
use std::rc::Rc;

use smallvec::SmallVec;
use strum::{AsRefStr, EnumIs};

use crate::error::{LogicError, LogicResult};
use crate::term::Term;
use crate::variable::{BoundVariable, FreeVariable};

/// Logical connectives, with the keyword used in their rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, strum::Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Connective {
    And,
    Or,
    Implies,
    Iff,
    Not,
    True,
    False,
}

impl Connective {
    /// Number of sentence arguments the connective takes.
    pub fn arity(self) -> usize {
        match self {
            Connective::True | Connective::False => 0,
            Connective::Not => 1,
            Connective::And | Connective::Or | Connective::Implies | Connective::Iff => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, strum::Display)]
pub enum Quantifier {
    #[strum(serialize = "FOR ALL")]
    ForAll,
    #[strum(serialize = "THERE EXISTS")]
    Exists,
}

/// A relation symbol. Infix predicates are written between their two arguments (`x = y`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Predicate {
    name: Rc<str>,
    arity: usize,
    infix: bool,
}

impl Predicate {
    pub fn new(name: impl AsRef<str>, arity: usize) -> Self {
        Self {
            name: Rc::from(name.as_ref()),
            arity,
            infix: false,
        }
    }

    /// A binary relation placed between its arguments.
    pub fn infix(name: impl AsRef<str>) -> Self {
        Self {
            name: Rc::from(name.as_ref()),
            arity: 2,
            infix: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn is_infix(&self) -> bool {
        self.infix
    }
}

/// Shape of a sentence node.
#[derive(Debug, Clone, PartialEq, Eq, EnumIs)]
pub enum SentenceKind {
    /// A propositional atom such as `A` or `Rain`; in law templates, a placeholder.
    Atomic(Rc<str>),
    Predicate {
        predicate: Predicate,
        args: SmallVec<Term, 2>,
    },
    Connective {
        connective: Connective,
        args: SmallVec<Sentence, 2>,
    },
    Quantifier {
        quantifier: Quantifier,
        variable: BoundVariable,
        body: Sentence,
    },
}

#[derive(Debug)]
struct SentenceNode {
    kind: SentenceKind,
    short_text: String,
    long_text: String,
}

/// An immutable sentence; cloning is cheap.
#[derive(Debug, Clone)]
pub struct Sentence(Rc<SentenceNode>);

impl Sentence {
    fn from_parts(kind: SentenceKind, short_text: String, long_text: String) -> Self {
        Sentence(Rc::new(SentenceNode {
            kind,
            short_text,
            long_text,
        }))
    }

    pub fn atomic(name: impl AsRef<str>) -> Self {
        let text = name.as_ref().to_string();
        Self::from_parts(
            SentenceKind::Atomic(Rc::from(name.as_ref())),
            text.clone(),
            text,
        )
    }

    /// Apply `predicate` to exactly `predicate.arity()` terms.
    pub fn predicate(
        predicate: Predicate,
        args: impl IntoIterator<Item = impl Into<Term>>,
    ) -> LogicResult<Self> {
        let args: SmallVec<Term, 2> = args.into_iter().map(Into::into).collect();
        if args.len() != predicate.arity() {
            return Err(LogicError::ArityMismatch {
                symbol: predicate.name().to_string(),
                expected: predicate.arity(),
                found: args.len(),
            });
        }

        let (short_text, long_text) = if predicate.is_infix() {
            let short = format!(
                "{} {} {}",
                args[0].long_text(),
                predicate.name(),
                args[1].long_text()
            );
            let long = format!("({short})");
            (short, long)
        } else if args.is_empty() {
            (predicate.name().to_string(), predicate.name().to_string())
        } else {
            let inner: Vec<&str> = args.iter().map(Term::short_text).collect();
            let short = format!("{}({})", predicate.name(), inner.join(", "));
            (short.clone(), short)
        };

        Ok(Self::from_parts(
            SentenceKind::Predicate { predicate, args },
            short_text,
            long_text,
        ))
    }

    /// Build any connective from its arguments, checking the arity.
    pub fn connective(
        connective: Connective,
        args: impl IntoIterator<Item = Sentence>,
    ) -> LogicResult<Self> {
        let args: SmallVec<Sentence, 2> = args.into_iter().collect();
        if args.len() != connective.arity() {
            return Err(LogicError::ArityMismatch {
                symbol: connective.to_string(),
                expected: connective.arity(),
                found: args.len(),
            });
        }

        let short_text = match args.as_slice() {
            [] => connective.to_string(),
            [a] => format!("{connective} {}", a.long_text()),
            [a, b] => format!("{} {connective} {}", a.long_text(), b.long_text()),
            _ => unreachable!(),
        };
        let long_text = if args.is_empty() {
            short_text.clone()
        } else {
            format!("({short_text})")
        };

        Ok(Self::from_parts(
            SentenceKind::Connective { connective, args },
            short_text,
            long_text,
        ))
    }

    fn binary(connective: Connective, a: Sentence, b: Sentence) -> Self {
        match Self::connective(connective, [a, b]) {
            Ok(s) => s,
            Err(_) => unreachable!("binary connective with two arguments"),
        }
    }

    pub fn and(a: Sentence, b: Sentence) -> Self {
        Self::binary(Connective::And, a, b)
    }

    pub fn or(a: Sentence, b: Sentence) -> Self {
        Self::binary(Connective::Or, a, b)
    }

    pub fn implies(a: Sentence, b: Sentence) -> Self {
        Self::binary(Connective::Implies, a, b)
    }

    pub fn iff(a: Sentence, b: Sentence) -> Self {
        Self::binary(Connective::Iff, a, b)
    }

    pub fn negation(a: Sentence) -> Self {
        let short_text = format!("NOT {}", a.long_text());
        let long_text = format!("({short_text})");
        Self::from_parts(
            SentenceKind::Connective {
                connective: Connective::Not,
                args: SmallVec::from_iter([a]),
            },
            short_text,
            long_text,
        )
    }

    pub fn truth() -> Self {
        Self::from_parts(
            SentenceKind::Connective {
                connective: Connective::True,
                args: SmallVec::new(),
            },
            "TRUE".to_string(),
            "TRUE".to_string(),
        )
    }

    pub fn falsity() -> Self {
        Self::from_parts(
            SentenceKind::Connective {
                connective: Connective::False,
                args: SmallVec::new(),
            },
            "FALSE".to_string(),
            "FALSE".to_string(),
        )
    }

    pub fn quantified(quantifier: Quantifier, variable: BoundVariable, body: Sentence) -> Self {
        let short_text = format!("{quantifier} {variable}: {}", body.long_text());
        let long_text = format!("({short_text})");
        Self::from_parts(
            SentenceKind::Quantifier {
                quantifier,
                variable,
                body,
            },
            short_text,
            long_text,
        )
    }

    /// `FOR ALL variable: body`
    pub fn for_all(variable: BoundVariable, body: Sentence) -> Self {
        Self::quantified(Quantifier::ForAll, variable, body)
    }

    /// `THERE EXISTS variable: body`
    pub fn there_exists(variable: BoundVariable, body: Sentence) -> Self {
        Self::quantified(Quantifier::Exists, variable, body)
    }

    /// Sugar for `Sentence::implies(self, other)`.
    pub fn then(self, other: Sentence) -> Self {
        Sentence::implies(self, other)
    }

    pub fn kind(&self) -> &SentenceKind {
        &self.0.kind
    }

    pub fn short_text(&self) -> &str {
        &self.0.short_text
    }

    pub fn long_text(&self) -> &str {
        &self.0.long_text
    }

    /// Visit every term argument of every predicate, in rendering order.
    pub fn for_each_term(&self, f: &mut impl FnMut(&Term)) {
        match self.kind() {
            SentenceKind::Atomic(_) => {}
            SentenceKind::Predicate { args, .. } => args.iter().for_each(|t| f(t)),
            SentenceKind::Connective { args, .. } => {
                for arg in args {
                    arg.for_each_term(f);
                }
            }
            SentenceKind::Quantifier { body, .. } => body.for_each_term(f),
        }
    }

    /// Names of every bound variable occurring in the sentence, quantified or dangling.
    pub fn bound_variable_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.collect_bound_names(&mut names);
        names
    }

    fn collect_bound_names(&self, names: &mut BTreeSet<String>) {
        if let SentenceKind::Quantifier { variable, body, .. } = self.kind() {
            names.insert(variable.name().to_string());
            body.collect_bound_names(names);
            return;
        }
        if let SentenceKind::Connective { args, .. } = self.kind() {
            for arg in args {
                arg.collect_bound_names(names);
            }
            return;
        }
        self.for_each_term(&mut |t| {
            t.for_each_variable(&mut |leaf| {
                if let either::Either::Right(b) = leaf {
                    names.insert(b.name().to_string());
                }
            })
        });
    }

    /// Names of the bound variables introduced by quantifiers inside the sentence.
    pub fn quantified_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        let mut stack = vec![self];
        while let Some(s) = stack.pop() {
            match s.kind() {
                SentenceKind::Quantifier { variable, body, .. } => {
                    names.insert(variable.name().to_string());
                    stack.push(body);
                }
                SentenceKind::Connective { args, .. } => stack.extend(args.iter()),
                SentenceKind::Atomic(_) | SentenceKind::Predicate { .. } => {}
            }
        }
        names
    }

    /// Whether the free variable `v` occurs in the sentence.
    pub fn mentions_free(&self, v: &FreeVariable) -> bool {
        let mut found = false;
        self.for_each_term(&mut |t| {
            t.for_each_variable(&mut |leaf| {
                if leaf.left() == Some(v) {
                    found = true;
                }
            })
        });
        found
    }
}

impl PartialEq for Sentence {
    fn eq(&self, other: &Self) -> bool {
        if Rc::ptr_eq(&self.0, &other.0) {
            return true;
        }
        match (self.kind(), other.kind()) {
            // Atoms are identified by their rendered name.
            (SentenceKind::Atomic(_), SentenceKind::Atomic(_)) => {
                self.short_text() == other.short_text()
            }
            (a, b) => a == b,
        }
    }
}

impl Eq for Sentence {}

impl BitAnd for Sentence {
    type Output = Sentence;

    fn bitand(self, rhs: Sentence) -> Sentence {
        Sentence::and(self, rhs)
    }
}

impl BitOr for Sentence {
    type Output = Sentence;

    fn bitor(self, rhs: Sentence) -> Sentence {
        Sentence::or(self, rhs)
    }
}

impl Not for Sentence {
    type Output = Sentence;

    fn not(self) -> Sentence {
        Sentence::negation(self)
    }
}

impl From<&str> for Sentence {
    fn from(name: &str) -> Self {
        Sentence::atomic(name)
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connective_texts() {
        let a = Sentence::atomic("A");
        let b = Sentence::atomic("B");
        let s = (a.clone() & b.clone()).then(!a.clone());
        assert_eq!(s.short_text(), "(A AND B) IMPLIES (NOT A)");
        assert_eq!(s.long_text(), "((A AND B) IMPLIES (NOT A))");
        assert_eq!(Sentence::iff(a, b).short_text(), "A IFF B");
        assert_eq!(Sentence::truth().long_text(), "TRUE");
    }

    #[test]
    fn quantifier_texts() {
        let x = BoundVariable::new("X");
        let p = Predicate::new("P", 1);
        let body = Sentence::predicate(p, [x.clone()]).unwrap();
        let q = Sentence::for_all(x.clone(), body.clone());
        assert_eq!(q.short_text(), "FOR ALL X: P(X)");
        let e = Sentence::there_exists(x, q);
        assert_eq!(e.short_text(), "THERE EXISTS X: (FOR ALL X: P(X))");
        assert_eq!(e.quantified_names().len(), 1);
    }

    #[test]
    fn relation_texts() {
        let eq = Predicate::infix("=");
        let s = Sentence::predicate(eq, [FreeVariable::new("x"), FreeVariable::new("y")]).unwrap();
        assert_eq!(s.short_text(), "x = y");
        assert_eq!(s.long_text(), "(x = y)");
        assert!(s.mentions_free(&FreeVariable::new("y")));
        assert!(!s.mentions_free(&FreeVariable::new("z")));
    }

    #[test]
    fn rebuilt_trees_are_equal() {
        let build = || Sentence::or(Sentence::atomic("A"), !Sentence::atomic("B"));
        assert_eq!(build(), build());
        assert_eq!(build().short_text(), build().short_text());
        assert_ne!(build(), Sentence::atomic("A"));
    }
}
