//! Matching justifications against the givens of a law.
//!
//! Algorithm (template laws)
//! 1. The number of justifications must equal the number of givens.
//! 2. For each environment-carrying given, the justification's environment minus the
//!    template's own frames is an outer prefix. All prefixes must agree; the common prefix is
//!    the ambient environment the conclusion inherits.
//! 3. The inner frames and the sentence/term payloads are matched structurally, binding the
//!    template's placeholders (first binding wins, later occurrences must agree).
//! 4. The conclusion template is instantiated from the bindings and legality-checked.
//!
//! Universal introduction and universal specification rename variables instead of matching
//! structurally and are handled separately.
use log::trace;

use crate::context::Context;
use crate::env::{Assumption, Environment};
use crate::error::{LogicError, LogicResult};
use crate::law::{Law, LawKind};
use crate::legality::is_legal;
use crate::sentence::{Quantifier, Sentence, SentenceKind};
use crate::subst::{Binding, Bindings, Placeholder, bound_to_term, free_to_bound, subs};
use crate::term::{Term, TermKind};
use crate::variable::{BoundVariable, FreeVariable, first_unused_bound_name};

/// A successful match: the instantiated conclusion and the bindings that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub conclusion: Context,
    pub bindings: Bindings,
}

/// Try to instantiate `law` from `justification`.
///
/// Returns `Ok(None)` when the law does not apply (including when the conclusion would be
/// illegal), and an error only for constructs the engine does not support.
pub fn match_with_givens(justification: &[Context], law: &Law) -> LogicResult<Option<Match>> {
    let givens = law.givens();
    if justification.len() != givens.len() {
        return Ok(None);
    }

    let Some(env) = ambient_environment(justification, givens) else {
        trace!("{}: ambient environments disagree", law.name());
        return Ok(None);
    };
    let mut bindings = Bindings::new(env);

    let conclusion = match law.kind() {
        LawKind::Template => {
            match_template_law(justification, law, &mut bindings).map_err(|e| e.in_law(law.name()))?
        }
        LawKind::UniversalIntroduction | LawKind::UniversalIntroductionAuto => {
            universal_introduction(justification, law, &mut bindings)
                .map_err(|e| e.in_law(law.name()))?
        }
        LawKind::UniversalSpecification => {
            universal_specification(justification, law, &mut bindings)
                .map_err(|e| e.in_law(law.name()))?
        }
    };
    let Some(conclusion) = conclusion else {
        return Ok(None);
    };

    if !is_legal(&conclusion) {
        trace!("{}: conclusion {} is not legal", law.name(), conclusion.name());
        return Ok(None);
    }
    Ok(Some(Match {
        conclusion,
        bindings,
    }))
}

/// Common outer prefix of the justifications' environments, or `None` if they disagree.
fn ambient_environment(justification: &[Context], givens: &[Context]) -> Option<Environment> {
    let mut proposed: Option<Environment> = None;
    for (context, template) in justification.iter().zip(givens) {
        let Some(template_env) = template.env() else {
            continue;
        };
        let context_env = context.env()?;
        // the template cannot be more deeply nested than the justification
        let outer_len = context_env.len().checked_sub(template_env.len())?;
        let candidate = context_env.prefix(outer_len);
        match &proposed {
            None => proposed = Some(candidate),
            Some(env) if env.text() != candidate.text() => return None,
            Some(_) => {}
        }
    }
    Some(proposed.unwrap_or_default())
}

fn match_template_law(
    justification: &[Context],
    law: &Law,
    bindings: &mut Bindings,
) -> LogicResult<Option<Context>> {
    for (context, template) in justification.iter().zip(law.givens()) {
        if !match_with_given(context, template, bindings)? {
            return Ok(None);
        }
    }
    subs(law.conclusion(), bindings).map(Some)
}

/// Match one justification against one given template.
pub fn match_with_given(
    context: &Context,
    template: &Context,
    bindings: &mut Bindings,
) -> LogicResult<bool> {
    if context.kind() != template.kind() {
        return Ok(false);
    }

    if let (Some(env), Some(template_env)) = (context.env(), template.env()) {
        let offset = bindings.env.len();
        if env.len() != offset + template_env.len() {
            return Ok(false);
        }
        for (frame, template_frame) in env.frames()[offset..].iter().zip(template_env.frames()) {
            if !match_with_given_assumption(frame, template_frame, bindings)? {
                return Ok(false);
            }
        }
    }

    match (context, template) {
        (Context::Term(term), Context::Term(template)) => {
            match_with_given_term(term, template, bindings)
        }
        _ => match (context.sentence(), template.sentence()) {
            (Some(sentence), Some(template)) => {
                match_with_given_sentence(sentence, template, bindings)
            }
            _ => Ok(true),
        },
    }
}

/// Match one environment frame against a template frame.
pub fn match_with_given_assumption(
    frame: &Assumption,
    template: &Assumption,
    bindings: &mut Bindings,
) -> LogicResult<bool> {
    if frame.kind() != template.kind() {
        return Ok(false);
    }
    if let (Some(sentence), Some(template)) = (frame.sentence(), template.sentence()) {
        if !match_with_given_sentence(sentence, template, bindings)? {
            return Ok(false);
        }
    }
    if let (Some(v), Some(template)) = (frame.variable(), template.variable()) {
        return Ok(bind_free(bindings, template, v));
    }
    Ok(true)
}

/// Structurally match a sentence against a template sentence.
pub fn match_with_given_sentence(
    sentence: &Sentence,
    template: &Sentence,
    bindings: &mut Bindings,
) -> LogicResult<bool> {
    match (template.kind(), sentence.kind()) {
        (SentenceKind::Atomic(name), _) => Ok(bindings.bind(
            Placeholder::Atom(name.to_string()),
            Binding::Sentence(sentence.clone()),
        )),
        (SentenceKind::Predicate { .. }, _) => Err(LogicError::unsupported(format!(
            "predicate template '{}' in a given",
            template.short_text()
        ))),
        (
            SentenceKind::Connective {
                connective: expected,
                args: template_args,
            },
            SentenceKind::Connective { connective, args },
        ) if expected == connective => {
            for (arg, template_arg) in args.iter().zip(template_args) {
                if !match_with_given_sentence(arg, template_arg, bindings)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        (
            SentenceKind::Quantifier {
                quantifier: expected,
                variable: template_variable,
                body: template_body,
            },
            SentenceKind::Quantifier {
                quantifier,
                variable,
                body,
            },
        ) if expected == quantifier => Ok(bind_bound(bindings, template_variable, variable)
            && match_with_given_sentence(body, template_body, bindings)?),
        _ => Ok(false),
    }
}

/// Match a term against a template term; only variable placeholders are supported.
pub fn match_with_given_term(
    term: &Term,
    template: &Term,
    bindings: &mut Bindings,
) -> LogicResult<bool> {
    match (template.kind(), term.kind()) {
        (TermKind::Free(placeholder), TermKind::Free(v)) => Ok(bind_free(bindings, placeholder, v)),
        (TermKind::Bound(placeholder), TermKind::Bound(v)) => {
            Ok(bind_bound(bindings, placeholder, v))
        }
        (TermKind::Free(_) | TermKind::Bound(_), _) => Ok(false),
        (TermKind::Primitive(_) | TermKind::Apply { .. }, _) => Err(LogicError::unsupported(
            format!("term template '{}' in a given", template.short_text()),
        )),
    }
}

fn bind_free(bindings: &mut Bindings, placeholder: &FreeVariable, value: &FreeVariable) -> bool {
    bindings.bind(
        Placeholder::Free(placeholder.name().to_string()),
        Binding::Free(value.clone()),
    )
}

fn bind_bound(bindings: &mut Bindings, placeholder: &BoundVariable, value: &BoundVariable) -> bool {
    bindings.bind(
        Placeholder::Bound(placeholder.name().to_string()),
        Binding::Bound(value.clone()),
    )
}

/// Record the quantifier-law bindings under the placeholder names the law's templates use.
fn bind_quantifier_names(
    law: &Law,
    bindings: &mut Bindings,
    statement: &Sentence,
    free: Option<&FreeVariable>,
    bound: &BoundVariable,
) {
    let Some(template) = law.givens().first() else {
        return;
    };
    let template_statement = match template.sentence().map(Sentence::kind) {
        Some(SentenceKind::Quantifier { variable, body, .. }) => {
            bind_bound(bindings, variable, bound);
            Some(body)
        }
        _ => template.sentence(),
    };
    if let Some(SentenceKind::Atomic(name)) = template_statement.map(Sentence::kind) {
        bindings.bind(
            Placeholder::Atom(name.to_string()),
            Binding::Sentence(statement.clone()),
        );
    }
    let template_free = template
        .env()
        .and_then(Environment::innermost)
        .and_then(Assumption::variable);
    if let (Some(placeholder), Some(free)) = (template_free, free) {
        bind_free(bindings, placeholder, free);
    }
    if let Some(SentenceKind::Quantifier { variable, .. }) =
        law.conclusion().sentence().map(Sentence::kind)
    {
        bind_bound(bindings, variable, bound);
    }
}

/// `statement [.., letting x]` gives `FOR ALL X: statement[x := X]`, discharging the frame.
fn universal_introduction(
    justification: &[Context],
    law: &Law,
    bindings: &mut Bindings,
) -> LogicResult<Option<Context>> {
    let (Some(first), Some(second)) = (justification.first(), justification.get(1)) else {
        return Ok(None);
    };
    let Context::Fact {
        sentence: statement,
        environment,
    } = first
    else {
        return Ok(None);
    };
    // the frame right after the ambient prefix must introduce the variable to generalize
    let Some(Assumption::Letting(free)) = environment.frames().get(bindings.env.len()) else {
        return Ok(None);
    };

    let used = statement.bound_variable_names();
    let bound = match (law.kind(), second) {
        (LawKind::UniversalIntroduction, Context::Term(term)) => match term.kind() {
            TermKind::Bound(v) => v.clone(),
            _ => return Ok(None),
        },
        (LawKind::UniversalIntroductionAuto, Context::Environment(_)) => {
            BoundVariable::new(first_unused_bound_name(|name| used.contains(name)))
        }
        _ => return Ok(None),
    };
    if used.contains(bound.name()) {
        trace!("{}: {bound} already occurs in {statement}", law.name());
        return Ok(None);
    }

    bind_quantifier_names(law, bindings, statement, Some(free), &bound);
    let generalized = free_to_bound(statement, free, &bound)?;
    Ok(Some(Context::fact(
        Sentence::for_all(bound, generalized),
        bindings.env.clone(),
    )))
}

/// `FOR ALL X: body` and a term `t` give `body[X := t]` in the same environment.
fn universal_specification(
    justification: &[Context],
    law: &Law,
    bindings: &mut Bindings,
) -> LogicResult<Option<Context>> {
    let (Some(Context::Fact { sentence, .. }), Some(Context::Term(term))) =
        (justification.first(), justification.get(1))
    else {
        return Ok(None);
    };
    let SentenceKind::Quantifier {
        quantifier: Quantifier::ForAll,
        variable,
        body,
    } = sentence.kind()
    else {
        return Ok(None);
    };

    let quantified = body.quantified_names();
    let mut captured = false;
    term.for_each_variable(&mut |leaf| {
        if leaf.right().is_some_and(|b| quantified.contains(b.name())) {
            captured = true;
        }
    });
    if captured {
        trace!("{}: {term} would be captured in {body}", law.name());
        return Ok(None);
    }

    bind_quantifier_names(law, bindings, body, None, variable);
    let specialized = bound_to_term(body, variable, term)?;
    Ok(Some(Context::fact(specialized, bindings.env.clone())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(name: &str) -> Sentence {
        Sentence::atomic(name)
    }

    fn modus_ponens() -> Law {
        Law::new(
            "Modus ponens",
            LawKind::Template,
            vec![atom("A").into(), atom("A").then(atom("B")).into()],
            atom("B").into(),
            1,
        )
    }

    #[test]
    fn arity_mismatch_is_no_match() {
        let m = match_with_givens(&[atom("Rain").into()], &modus_ponens()).unwrap();
        assert!(m.is_none());
    }

    #[test]
    fn bindings_are_reported() {
        let rain = atom("Rain");
        let wet = atom("Wet");
        let m = match_with_givens(
            &[rain.clone().into(), rain.clone().then(wet.clone()).into()],
            &modus_ponens(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(m.bindings.sentence("A"), Some(&rain));
        assert_eq!(m.bindings.sentence("B"), Some(&wet));
        assert!(m.bindings.env.is_root());
    }

    #[test]
    fn ambient_prefix_must_be_shared() {
        let c = atom("C");
        let in_c = |s: Sentence| Context::fact(s, Environment::new([c.clone()]));
        let justification = [in_c(atom("Rain")), in_c(atom("Rain").then(atom("Wet")))];
        let m = match_with_givens(&justification, &modus_ponens()).unwrap().unwrap();
        assert_eq!(m.conclusion.name(), "Wet [assuming C]");
    }

    #[test]
    fn predicate_templates_are_unsupported() {
        let p = crate::sentence::Predicate::new("P", 1);
        let law = Law::new(
            "Odd",
            LawKind::Template,
            vec![Sentence::predicate(p, [FreeVariable::new("x")]).unwrap().into()],
            atom("A").into(),
            1,
        );
        let err = match_with_givens(&[atom("Rain").into()], &law).unwrap_err();
        assert!(matches!(
            err,
            LogicError::UnsupportedConstruct { ref law, .. } if law == "Odd"
        ));
    }
}
