//! Contexts: everything a user can select or a law can conclude.
use std::fmt;

use either::Either;
use strum::{EnumDiscriminants, EnumIs};

use crate::env::{Assumption, Environment};
use crate::error::{LogicError, LogicResult};
use crate::sentence::Sentence;
use crate::term::Term;
use crate::variable::{BoundVariable, FreeVariable};

/// Tagged union over the four selectable / concludable shapes.
#[derive(Debug, Clone, PartialEq, Eq, EnumIs, EnumDiscriminants)]
#[strum_discriminants(name(ContextKind), derive(strum::Display))]
pub enum Context {
    /// A sentence with no environment; any free variable may appear in it.
    Formula(Sentence),
    /// A term from the term window.
    Term(Term),
    /// A bare environment.
    Environment(Environment),
    /// A sentence holding inside an environment.
    Fact {
        sentence: Sentence,
        environment: Environment,
    },
}

impl Context {
    pub fn formula(sentence: Sentence) -> Self {
        Context::Formula(sentence)
    }

    pub fn term(term: impl Into<Term>) -> Self {
        Context::Term(term.into())
    }

    pub fn environment(environment: Environment) -> Self {
        Context::Environment(environment)
    }

    pub fn root_environment() -> Self {
        Context::Environment(Environment::root())
    }

    pub fn fact(sentence: Sentence, environment: Environment) -> Self {
        Context::Fact {
            sentence,
            environment,
        }
    }

    pub fn kind(&self) -> ContextKind {
        self.into()
    }

    /// The sentence payload of formula and fact contexts.
    pub fn sentence(&self) -> Option<&Sentence> {
        match self {
            Context::Formula(s) | Context::Fact { sentence: s, .. } => Some(s),
            Context::Term(_) | Context::Environment(_) => None,
        }
    }

    /// The environment of environment and fact contexts.
    pub fn env(&self) -> Option<&Environment> {
        match self {
            Context::Environment(e) | Context::Fact { environment: e, .. } => Some(e),
            Context::Term(_) | Context::Formula(_) => None,
        }
    }

    /// Whether the context carries an environment.
    pub fn has_environment(&self) -> bool {
        self.env().is_some()
    }

    /// Frames of the carried environment (empty for environment-free contexts).
    pub fn frames(&self) -> impl Iterator<Item = &Assumption> {
        match self.env() {
            Some(env) => Either::Left(env.frames().iter()),
            None => Either::Right(std::iter::empty()),
        }
    }

    /// Canonical display name.
    pub fn name(&self) -> String {
        match self {
            Context::Formula(s) => format!("formula \"{}\"", s.short_text()),
            Context::Term(t) => format!("term \"{}\"", t.short_text()),
            Context::Environment(e) => format!("[{}]", e.text()),
            Context::Fact {
                sentence,
                environment,
            } if environment.is_root() => sentence.short_text().to_string(),
            Context::Fact {
                sentence,
                environment,
            } => format!("{} [{}]", sentence.short_text(), environment.text()),
        }
    }

    /// Copy of this context with `frame` added as the outermost frame of its environment.
    ///
    /// Formulas become facts in the one-frame environment.
    pub fn assuming(&self, frame: impl Into<Assumption>) -> LogicResult<Self> {
        match self {
            Context::Formula(sentence) => Ok(Context::fact(
                sentence.clone(),
                Environment::root().with(frame),
            )),
            Context::Fact {
                sentence,
                environment,
            } => Ok(Context::fact(sentence.clone(), environment.with_outer(frame))),
            Context::Environment(environment) => {
                Ok(Context::Environment(environment.with_outer(frame)))
            }
            Context::Term(_) => Err(LogicError::mismatch(
                "a context with a sentence or environment",
                self.name(),
            )),
        }
    }
}

impl From<Sentence> for Context {
    /// A bare sentence is a fact in the root environment.
    fn from(sentence: Sentence) -> Self {
        Context::fact(sentence, Environment::root())
    }
}

impl From<Term> for Context {
    fn from(term: Term) -> Self {
        Context::Term(term)
    }
}

impl From<BoundVariable> for Context {
    fn from(v: BoundVariable) -> Self {
        Context::Term(Term::bound(v))
    }
}

impl From<FreeVariable> for Context {
    /// A free variable stands for the environment `[letting v be arbitrary]`.
    fn from(v: FreeVariable) -> Self {
        Context::Environment(Environment::root().with(v))
    }
}

impl From<Environment> for Context {
    fn from(env: Environment) -> Self {
        Context::Environment(env)
    }
}

impl TryFrom<Context> for Sentence {
    type Error = LogicError;

    fn try_from(context: Context) -> Result<Self, Self::Error> {
        match context {
            Context::Formula(s) | Context::Fact { sentence: s, .. } => Ok(s),
            other => Err(LogicError::mismatch("a sentence", other.name())),
        }
    }
}

impl TryFrom<Context> for Term {
    type Error = LogicError;

    fn try_from(context: Context) -> Result<Self, Self::Error> {
        match context {
            Context::Term(t) => Ok(t),
            other => Err(LogicError::mismatch("a term", other.name())),
        }
    }
}

impl TryFrom<Context> for Environment {
    type Error = LogicError;

    fn try_from(context: Context) -> Result<Self, Self::Error> {
        match context {
            Context::Environment(e) => Ok(e),
            other => Err(LogicError::mismatch("an environment", other.name())),
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// `"Deduce C."`, or `"<prefix> a, b: deduce C."` when there are justifications.
///
/// Environments are "formed" rather than "deduced".
pub fn deduction_string(prefix: &str, justification: &[Context], conclusion: &Context) -> String {
    let verb = if conclusion.is_environment() {
        "form environment"
    } else {
        "deduce"
    };
    if justification.is_empty() {
        let mut verb = verb.to_string();
        verb[..1].make_ascii_uppercase();
        return format!("{verb} {}.", conclusion.name());
    }
    let list: Vec<String> = justification.iter().map(Context::name).collect();
    format!("{prefix} {}: {verb} {}.", list.join(", "), conclusion.name())
}
