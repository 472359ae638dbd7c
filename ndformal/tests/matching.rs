use ndformal::prelude::*;

fn atom(name: &str) -> Sentence {
    Sentence::atomic(name)
}

fn engine() -> (Engine, StandardLaws) {
    let mut engine = Engine::new();
    let laws = StandardLaws::install_unlocked(&mut engine).unwrap();
    (engine, laws)
}

fn conclusions(report: &MatchReport) -> Vec<String> {
    report
        .deductions
        .iter()
        .map(|d| d.conclusion.name())
        .collect()
}

#[test]
fn modus_ponens_scenario() {
    let (engine, laws) = engine();
    let mp = &engine.laws[laws.modus_ponens];
    let rain = atom("Rain");
    let wet = atom("Wet");

    let m = match_with_givens(
        &[rain.clone().into(), rain.clone().then(wet.clone()).into()],
        mp,
    )
    .unwrap()
    .expect("modus ponens applies");
    assert_eq!(m.conclusion, Context::from(wet.clone()));

    // antecedent mismatch
    let sun = atom("Sun");
    let m = match_with_givens(&[rain.clone().into(), sun.then(wet.clone()).into()], mp).unwrap();
    assert!(m.is_none());

    // facts in different ambient environments
    let under = |s: Sentence, frame: &str| Context::fact(s, Environment::new([atom(frame)]));
    let m = match_with_givens(
        &[under(rain.clone(), "C"), under(rain.clone().then(wet.clone()), "D")],
        mp,
    )
    .unwrap();
    assert!(m.is_none());

    // shared ambient environment is inherited
    let m = match_with_givens(
        &[under(rain.clone(), "C"), under(rain.then(wet), "C")],
        mp,
    )
    .unwrap()
    .unwrap();
    assert_eq!(m.conclusion.name(), "Wet [assuming C]");
}

#[test]
fn reversed_pairs_are_tried() {
    let (engine, laws) = engine();
    let selection = [Context::from(atom("Rain")), Context::from(atom("Sun"))];

    let report = engine.make_matches(&selection, None, true);
    let from_and: Vec<&Deduction> = report
        .deductions
        .iter()
        .filter(|d| d.law == laws.and_introduction)
        .collect();
    assert_eq!(from_and.len(), 2);
    assert_eq!(from_and[0].conclusion.name(), "Rain AND Sun");
    assert_eq!(from_and[1].conclusion.name(), "Sun AND Rain");
    assert_eq!(from_and[1].justification, vec![selection[1].clone(), selection[0].clone()]);

    let report = engine.make_matches(&selection, None, false);
    assert_eq!(
        report
            .deductions
            .iter()
            .filter(|d| d.law == laws.and_introduction)
            .count(),
        1
    );
    assert!(report.diagnostics.is_empty());
}

#[test]
fn ambient_clone_lifts_root_only_laws() {
    let (engine, laws) = engine();
    let selection = [
        Context::formula(atom("Wet")),
        Context::environment(Environment::new([atom("Rain")])),
    ];
    let report = engine.make_matches(&selection, None, true);
    let names = conclusions(&report);
    assert!(names.contains(&"Wet [assuming Rain, Wet]".to_string()));
    assert!(names.contains(&"[assuming Rain, Wet]".to_string()));

    let clone = engine.laws[laws.assumption].clone_law().unwrap();
    assert!(report.deductions.iter().any(|d| d.law == clone));
}

#[test]
fn deduction_theorem_discharges_the_assumption() {
    let (engine, laws) = engine();
    let fact = Context::fact(atom("Wet"), Environment::new([atom("C"), atom("Rain")]));
    let m = match_with_givens(&[fact], &engine.laws[laws.deduction_theorem])
        .unwrap()
        .unwrap();
    assert_eq!(m.conclusion.name(), "Rain IMPLIES Wet [assuming C]");
}

#[test]
fn illegal_conclusions_are_discarded() {
    let (engine, laws) = engine();
    let x = FreeVariable::new("x");
    let selection = [
        Context::term(x.clone()),
        Context::environment(Environment::root().with(x)),
    ];
    let report = engine.make_matches(&selection, None, true);
    let clone = engine.laws[laws.form_letting].clone_law().unwrap();
    assert!(report.deductions.iter().all(|d| d.law != clone));

    for deduction in &report.deductions {
        assert!(is_legal(&deduction.conclusion), "{}", deduction.conclusion);
    }
}

#[test]
fn arbitrary_variables_open_new_scopes() {
    let (engine, laws) = engine();
    let selection = [Context::term(FreeVariable::new("y")), Context::root_environment()];
    let clone = engine.laws[laws.form_letting].clone_law().unwrap();
    let m = match_with_givens(&selection, &engine.laws[clone])
        .unwrap()
        .unwrap();
    assert_eq!(m.conclusion.name(), "[letting y be arbitrary]");
}

#[test]
fn operator_conclusions_are_diagnosed_without_stopping_the_scan() {
    let (mut engine, laws) = engine();
    let successor = Term::apply(Operator::new("s", 1), [FreeVariable::new("x")]).unwrap();
    let odd = engine
        .define_law(
            "Successor",
            LawKind::Template,
            vec![atom("A").into(), atom("B").into()],
            Context::term(successor),
        )
        .unwrap();
    engine.laws.unlock(odd);

    let selection = [Context::from(atom("Rain")), Context::from(atom("Sun"))];
    let report = engine.make_matches(&selection, None, true);

    assert_eq!(report.diagnostics.len(), 1);
    assert!(matches!(
        &report.diagnostics[0],
        LogicError::UnsupportedConstruct { law, construct }
            if law == "Successor" && construct.contains("s(x)")
    ));
    assert!(report.deductions.iter().all(|d| d.law != odd));
    assert_eq!(
        report
            .deductions
            .iter()
            .filter(|d| d.law == laws.and_introduction)
            .count(),
        2
    );
}

#[test]
fn symmetric_laws_agree_in_both_orders() {
    let (mut engine, _) = engine();
    let compatible = engine
        .define_law(
            "Compatible",
            LawKind::Template,
            vec![atom("A").into(), atom("B").into()],
            Sentence::truth().into(),
        )
        .unwrap();
    engine.laws.unlock(compatible);

    let selection = [Context::from(atom("Rain")), Context::from(atom("Sun"))];
    let report = engine.make_matches(&selection, None, true);
    let both: Vec<&Deduction> = report
        .deductions
        .iter()
        .filter(|d| d.law == compatible)
        .collect();
    assert_eq!(both.len(), 2);
    assert_eq!(both[0].conclusion, both[1].conclusion);
    assert_eq!(both[0].conclusion.name(), "TRUE");
    assert_ne!(both[0].justification, both[1].justification);
}

#[test]
fn selecting_one_fact_twice_is_a_single_order() {
    let (engine, laws) = engine();
    let selection = [Context::from(atom("Rain")), Context::from(atom("Rain"))];
    let report = engine.make_matches(&selection, None, true);
    let conjunctions: Vec<&Deduction> = report
        .deductions
        .iter()
        .filter(|d| d.law == laws.and_introduction)
        .collect();
    assert_eq!(conjunctions.len(), 1);
    assert_eq!(conjunctions[0].conclusion.name(), "Rain AND Rain");
}
