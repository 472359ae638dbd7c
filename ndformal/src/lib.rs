//! Ndformal: rule matching and substitution for a natural-deduction trainer.
//!
//! The crate models first-order sentences and terms, the scope frames (environments) they
//! live in, and laws: named templates "given these contexts, deduce that one". Given a user's
//! selection of one or two contexts, the [`engine::Engine`] tries every unlocked law and
//! reports each legal conclusion it can instantiate.
//!
//! Shape
//!  - AST nodes are immutable, reference-counted and carry their canonical display text,
//!    computed once at construction. That text is part of the contract: atomic placeholders
//!    and ambient environments are compared by it.
//!  - Matching is pure and deterministic; failure is `None`, never an error. Only rule
//!    catalogs using unsupported constructs produce [`error::LogicError`]s, and a scan
//!    collects those as diagnostics without stopping.
//!
//! Example
//! ```
//! use ndformal::prelude::*;
//!
//! let mut engine = Engine::new();
//! StandardLaws::install_unlocked(&mut engine).unwrap();
//!
//! let rain = Sentence::atomic("Rain");
//! let wet = Sentence::atomic("Wet");
//! let selection = [Context::from(rain.clone()), Context::from(rain.then(wet))];
//! let report = engine.make_matches(&selection, None, true);
//! assert!(report.deductions.iter().any(|d| d.conclusion.name() == "Wet"));
//! ```

/// Selectable and concludable contexts.
pub mod context;
/// Engine state and the match scan.
pub mod engine;
/// Scope frames and environments.
pub mod env;
/// Error types.
pub mod error;
/// The standard law catalog.
pub mod catalog;
/// Interning table for primitives.
pub mod intern;
/// Laws and their primitives.
pub mod law;
/// Scope legality checks.
pub mod legality;
/// Structural matching of justifications against laws.
pub mod matcher;
/// Terminal pretty-printing.
pub mod pretty;
/// Law registry.
pub mod registry;
/// Sentences, connectives, quantifiers and predicates.
pub mod sentence;
/// Bindings and substitution.
pub mod subst;
/// Terms and operators.
pub mod term;
/// Free and bound variables, and their name sequences.
pub mod variable;

pub mod prelude {
    //! Convenient re-exports for end users.
    pub use crate::catalog::StandardLaws;
    pub use crate::context::{Context, ContextKind, deduction_string};
    pub use crate::engine::{Deduction, Engine, MatchReport};
    pub use crate::env::{Assumption, AssumptionKind, Environment};
    pub use crate::error::{LogicError, LogicResult};
    pub use crate::intern::{Interner, Primitive};
    pub use crate::law::{Law, LawId, LawKind, Primitives};
    pub use crate::legality::is_legal;
    pub use crate::matcher::{Match, match_with_givens};
    pub use crate::pretty::PrettyNode;
    pub use crate::registry::LawRegistry;
    pub use crate::sentence::{Connective, Predicate, Quantifier, Sentence, SentenceKind};
    pub use crate::subst::{Binding, Bindings, Placeholder, subs};
    pub use crate::term::{Operator, Term, TermKind};
    pub use crate::variable::{
        BoundVariable, FreeVariable, Variable, bound_variable_name, free_variable_name,
    };
}
