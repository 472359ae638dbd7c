//! Terms: variables, primitive constants and operator applications.
//!
//! Every node carries its two canonical renderings, computed once at construction:
//! `short_text` when it stands alone and `long_text` when nested inside an infix operator
//! or relation (parenthesized if compound).
use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;
use strum::EnumIs;

use crate::error::{LogicError, LogicResult};
use crate::variable::{BoundVariable, FreeVariable};

/// A function symbol. Infix operators are written between their two arguments (`x + y`),
/// the others in call style (`f(x, y)`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Operator {
    name: Rc<str>,
    arity: usize,
    infix: bool,
}

impl Operator {
    pub fn new(name: impl AsRef<str>, arity: usize) -> Self {
        Self {
            name: Rc::from(name.as_ref()),
            arity,
            infix: false,
        }
    }

    /// A binary operator placed between its arguments.
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

/// Shape of a term node.
#[derive(Debug, Clone, PartialEq, Eq, EnumIs)]
pub enum TermKind {
    Free(FreeVariable),
    Bound(BoundVariable),
    Primitive(Rc<str>),
    Apply {
        operator: Operator,
        args: SmallVec<Term, 2>,
    },
}

#[derive(Debug)]
struct TermNode {
    kind: TermKind,
    short_text: String,
    long_text: String,
}

/// An immutable term; cloning is cheap.
#[derive(Debug, Clone)]
pub struct Term(Rc<TermNode>);

impl Term {
    fn from_parts(kind: TermKind, short_text: String, long_text: String) -> Self {
        Term(Rc::new(TermNode {
            kind,
            short_text,
            long_text,
        }))
    }

    pub fn free(v: FreeVariable) -> Self {
        let text = v.name().to_string();
        Self::from_parts(TermKind::Free(v), text.clone(), text)
    }

    pub fn bound(v: BoundVariable) -> Self {
        let text = v.name().to_string();
        Self::from_parts(TermKind::Bound(v), text.clone(), text)
    }

    pub fn primitive(name: impl AsRef<str>) -> Self {
        let text = name.as_ref().to_string();
        Self::from_parts(TermKind::Primitive(Rc::from(name.as_ref())), text.clone(), text)
    }

    /// Apply `operator` to exactly `operator.arity()` arguments.
    pub fn apply(
        operator: Operator,
        args: impl IntoIterator<Item = impl Into<Term>>,
    ) -> LogicResult<Self> {
        let args: SmallVec<Term, 2> = args.into_iter().map(Into::into).collect();
        if args.len() != operator.arity() {
            return Err(LogicError::ArityMismatch {
                symbol: operator.name().to_string(),
                expected: operator.arity(),
                found: args.len(),
            });
        }

        let (short_text, long_text) = if operator.is_infix() {
            let short = format!(
                "{} {} {}",
                args[0].long_text(),
                operator.name(),
                args[1].long_text()
            );
            let long = format!("({short})");
            (short, long)
        } else if args.is_empty() {
            (operator.name().to_string(), operator.name().to_string())
        } else {
            let inner: Vec<&str> = args.iter().map(Term::short_text).collect();
            let short = format!("{}({})", operator.name(), inner.join(", "));
            (short.clone(), short)
        };

        Ok(Self::from_parts(
            TermKind::Apply { operator, args },
            short_text,
            long_text,
        ))
    }

    pub fn kind(&self) -> &TermKind {
        &self.0.kind
    }

    pub fn short_text(&self) -> &str {
        &self.0.short_text
    }

    pub fn long_text(&self) -> &str {
        &self.0.long_text
    }

    /// Visit every variable leaf, left to right.
    pub fn for_each_variable(&self, f: &mut impl FnMut(either::Either<&FreeVariable, &BoundVariable>)) {
        match self.kind() {
            TermKind::Free(v) => f(either::Either::Left(v)),
            TermKind::Bound(v) => f(either::Either::Right(v)),
            TermKind::Primitive(_) => {}
            TermKind::Apply { args, .. } => {
                for arg in args {
                    arg.for_each_variable(f);
                }
            }
        }
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0) || self.0.kind == other.0.kind
    }
}

impl Eq for Term {}

impl From<FreeVariable> for Term {
    fn from(v: FreeVariable) -> Self {
        Term::free(v)
    }
}

impl From<BoundVariable> for Term {
    fn from(v: BoundVariable) -> Self {
        Term::bound(v)
    }
}

impl From<&str> for Term {
    fn from(name: &str) -> Self {
        Term::primitive(name)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_text())
    }
}
