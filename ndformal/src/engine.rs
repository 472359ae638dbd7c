//! Engine state: the interning table and the law registry, owned together.
//!
//! Role
//! - Define laws, registering their primitives.
//! - Scan every unlocked law against a selection and report all candidate deductions.
//!
//! Scanning never aborts: match failures and illegal conclusions are dropped silently, and
//! unsupported constructs are collected as diagnostics (at most once per law per scan).
use log::{debug, warn};

use crate::context::{Context, deduction_string};
use crate::error::{LogicError, LogicResult};
use crate::intern::Interner;
use crate::law::{LawId, LawKind};
use crate::matcher::match_with_givens;
use crate::registry::LawRegistry;
use crate::subst::Bindings;

/// A candidate deduction produced by [`Engine::make_matches`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deduction {
    pub law: LawId,
    /// The justification in the order that matched (possibly reversed).
    pub justification: Vec<Context>,
    pub conclusion: Context,
    pub bindings: Bindings,
    /// The law was defined at or after the goal being proved.
    pub circular: bool,
}

/// Result of scanning the unlocked laws.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchReport {
    pub deductions: Vec<Deduction>,
    pub diagnostics: Vec<LogicError>,
}

impl MatchReport {
    pub fn is_empty(&self) -> bool {
        self.deductions.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Engine {
    pub interner: Interner,
    pub laws: LawRegistry,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a law and intern the primitives it mentions.
    pub fn define_law(
        &mut self,
        name: impl Into<String>,
        kind: LawKind,
        givens: Vec<Context>,
        conclusion: Context,
    ) -> LogicResult<LawId> {
        let id = self.laws.define(name, kind, givens, conclusion);
        self.interner.register_all(&self.laws[id].primitives())?;
        Ok(id)
    }

    /// Try every unlocked law against `justification`.
    ///
    /// With exactly two justifications and `try_reversed`, the reversed pair is tried too;
    /// both orders are reported independently. Selecting the same context twice is one order. `goal_index` is the creation index of the law
    /// being proved, used to flag circular deductions.
    pub fn make_matches(
        &self,
        justification: &[Context],
        goal_index: Option<usize>,
        try_reversed: bool,
    ) -> MatchReport {
        let mut report = MatchReport::default();
        let mut orders = vec![justification.to_vec()];
        if try_reversed && justification.len() == 2 && justification[0] != justification[1] {
            orders.push(vec![justification[1].clone(), justification[0].clone()]);
        }

        let mut reported: Vec<LawId> = Vec::new();
        for (id, law) in self.laws.unlocked_laws() {
            for order in &orders {
                match match_with_givens(order, law) {
                    Ok(Some(m)) => {
                        let circular = goal_index.is_some_and(|goal| law.index() >= goal);
                        debug!(
                            "{} [{}{}]",
                            deduction_string("From", order, &m.conclusion),
                            law.name(),
                            if circular { "*" } else { "" }
                        );
                        report.deductions.push(Deduction {
                            law: id,
                            justification: order.clone(),
                            conclusion: m.conclusion,
                            bindings: m.bindings,
                            circular,
                        });
                    }
                    Ok(None) => {}
                    Err(err) => {
                        if !reported.contains(&id) {
                            warn!("{err}");
                            reported.push(id);
                            report.diagnostics.push(err.in_law(law.name()));
                        }
                        break;
                    }
                }
            }
        }
        report
    }
}
