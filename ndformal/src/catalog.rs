//! The standard natural-deduction laws.
use crate::context::Context;
use crate::engine::Engine;
use crate::env::Environment;
use crate::error::LogicResult;
use crate::law::{LawId, LawKind};
use crate::sentence::Sentence;
use crate::variable::{BoundVariable, FreeVariable};

/// Ids of the laws installed by [`StandardLaws::install`]. None of them is unlocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardLaws {
    pub modus_ponens: LawId,
    pub and_introduction: LawId,
    pub and_elimination_left: LawId,
    pub and_elimination_right: LawId,
    pub or_introduction: LawId,
    pub assumption: LawId,
    pub deduction_theorem: LawId,
    pub form_assumption: LawId,
    pub form_letting: LawId,
    pub universal_introduction: LawId,
    pub universal_introduction_auto: LawId,
    pub universal_specification: LawId,
}

impl StandardLaws {
    pub fn install(engine: &mut Engine) -> LogicResult<Self> {
        let a = Sentence::atomic("A");
        let b = Sentence::atomic("B");
        let x = FreeVariable::new("x");
        let big_x = BoundVariable::new("X");
        let fact = |s: &Sentence| Context::from(s.clone());

        let modus_ponens = engine.define_law(
            "Modus ponens",
            LawKind::Template,
            vec![fact(&a), fact(&a.clone().then(b.clone()))],
            fact(&b),
        )?;
        let and_introduction = engine.define_law(
            "Conjunction introduction",
            LawKind::Template,
            vec![fact(&a), fact(&b)],
            fact(&(a.clone() & b.clone())),
        )?;
        let and_elimination_left = engine.define_law(
            "Conjunction elimination (left)",
            LawKind::Template,
            vec![fact(&(a.clone() & b.clone()))],
            fact(&a),
        )?;
        let and_elimination_right = engine.define_law(
            "Conjunction elimination (right)",
            LawKind::Template,
            vec![fact(&(a.clone() & b.clone()))],
            fact(&b),
        )?;
        let or_introduction = engine.define_law(
            "Disjunction introduction",
            LawKind::Template,
            vec![fact(&a), Context::formula(b.clone())],
            fact(&(a.clone() | b.clone())),
        )?;
        let assumption = engine.define_law(
            "Assumption",
            LawKind::Template,
            vec![Context::formula(a.clone())],
            Context::fact(a.clone(), Environment::new([a.clone()])),
        )?;
        let deduction_theorem = engine.define_law(
            "Deduction theorem",
            LawKind::Template,
            vec![Context::fact(b.clone(), Environment::new([a.clone()]))],
            fact(&a.clone().then(b.clone())),
        )?;
        let form_assumption = engine.define_law(
            "Form assumption environment",
            LawKind::Template,
            vec![Context::formula(a.clone())],
            Context::environment(Environment::new([a.clone()])),
        )?;
        let form_letting = engine.define_law(
            "Form arbitrary variable environment",
            LawKind::Template,
            vec![Context::term(x.clone())],
            Context::environment(Environment::root().with(x.clone())),
        )?;

        let generalized = fact(&Sentence::for_all(big_x.clone(), a.clone()));
        let statement = Context::fact(a.clone(), Environment::root().with(x.clone()));
        let universal_introduction = engine.define_law(
            "Universal introduction",
            LawKind::UniversalIntroduction,
            vec![statement.clone(), Context::term(big_x.clone())],
            generalized.clone(),
        )?;
        let universal_introduction_auto = engine.define_law(
            "Universal introduction",
            LawKind::UniversalIntroductionAuto,
            vec![statement, Context::root_environment()],
            generalized.clone(),
        )?;
        let universal_specification = engine.define_law(
            "Universal specification",
            LawKind::UniversalSpecification,
            vec![generalized, Context::term(x)],
            fact(&a),
        )?;

        Ok(Self {
            modus_ponens,
            and_introduction,
            and_elimination_left,
            and_elimination_right,
            or_introduction,
            assumption,
            deduction_theorem,
            form_assumption,
            form_letting,
            universal_introduction,
            universal_introduction_auto,
            universal_specification,
        })
    }

    pub fn all(&self) -> [LawId; 12] {
        [
            self.modus_ponens,
            self.and_introduction,
            self.and_elimination_left,
            self.and_elimination_right,
            self.or_introduction,
            self.assumption,
            self.deduction_theorem,
            self.form_assumption,
            self.form_letting,
            self.universal_introduction,
            self.universal_introduction_auto,
            self.universal_specification,
        ]
    }

    /// Install and unlock every standard law.
    pub fn install_unlocked(engine: &mut Engine) -> LogicResult<Self> {
        let laws = Self::install(engine)?;
        for id in laws.all() {
            engine.laws.unlock(id);
        }
        Ok(laws)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_only_laws_get_clones() {
        let mut engine = Engine::new();
        let laws = StandardLaws::install(&mut engine).unwrap();
        assert!(engine.laws[laws.assumption].clone_law().is_some());
        assert!(engine.laws[laws.form_assumption].clone_law().is_some());
        assert!(engine.laws[laws.form_letting].clone_law().is_some());
        assert!(engine.laws[laws.modus_ponens].clone_law().is_none());
        assert!(engine.laws[laws.universal_introduction].clone_law().is_none());
        assert_eq!(
            engine.laws[laws.modus_ponens].desc(),
            "Modus ponens: Given A, A IMPLIES B: deduce B."
        );
    }
}
