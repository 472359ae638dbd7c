use std::cmp::Ordering;

use ndcore::config::SessionConfig;
use ndcore::error::NdError;
use ndcore::exercise::ExerciseId;
use ndcore::magic::LAW_GRANTED;
use ndcore::session::Session;
use ndcore::store::{KeyValueStore, MemoryStore};
use ndformal::prelude::*;

fn rain() -> Sentence {
    Sentence::atomic("Rain")
}

fn wet() -> Sentence {
    Sentence::atomic("Wet")
}

// Helpers
fn define_first_exercise(session: &mut Session, laws: &StandardLaws) -> ExerciseId {
    let id = session
        .define_exercise(
            "Exercise 1",
            None,
            vec![rain().into(), rain().then(wet()).into()],
            wet().into(),
            4,
        )
        .unwrap();
    session.exercise_unlocks(id, laws.modus_ponens).unwrap();
    id
}

fn session() -> (Session, StandardLaws, ExerciseId) {
    let mut session = Session::with_store(SessionConfig::default(), Box::new(MemoryStore::new()));
    let laws = session.install_standard_laws().unwrap();
    let id = define_first_exercise(&mut session, &laws);
    session.activate(id).unwrap();
    session.set_exercise(id).unwrap();
    (session, laws, id)
}

fn givens() -> [Context; 2] {
    [rain().into(), rain().then(wet()).into()]
}

#[test]
fn setting_an_exercise_lists_givens_and_primitives() {
    let (session, _, _) = session();
    assert_eq!(
        session.proof().lines(),
        ["Rain. [given]", "Rain IMPLIES Wet. [given]"]
    );
    assert_eq!(session.workspace().formulas(), [rain(), wet()]);
    assert!(session.workspace().terms().is_empty());
    assert!(!session.can_undo());
}

#[test]
fn solving_an_exercise() {
    let (mut session, laws, id) = session();
    let report = session.select(&givens());
    assert_eq!(report.deductions.len(), 1);
    let deduction = &report.deductions[0];
    assert_eq!(deduction.law, laws.modus_ponens);
    assert!(!deduction.circular);

    let outcome = session.commit(deduction).unwrap();
    assert_eq!(
        outcome.line.as_deref(),
        Some("From Rain, Rain IMPLIES Wet: deduce Wet. [Modus ponens]")
    );
    let summary = outcome.solved.expect("exercise solved");
    assert!(summary.first_time);
    assert!(!summary.circular);
    assert!(summary.new_personal_best);
    assert_eq!(summary.lines, 4);
    assert_eq!(summary.record, Some(Ordering::Equal));
    assert_eq!(session.proof().lines().last().map(String::as_str), Some("QED!"));
    assert!(!session.can_undo());

    let exercise = session.exercise(id).unwrap();
    assert!(exercise.solved);
    assert_eq!(exercise.personal_best, Some(4));
    assert!(session.engine().laws.is_unlocked(exercise.law));

    let store = session.store().unwrap();
    assert_eq!(store.get("Exercise 1").as_deref(), Some("solved"));
    assert_eq!(store.get("lines Exercise 1").as_deref(), Some("4"));
    assert_eq!(store.get("law Exercise 1").as_deref(), Some("PROVED"));
    assert_eq!(store.get("law Modus ponens").as_deref(), Some("UNLOCKED"));
    assert!(store.get("proof Exercise 1").unwrap().ends_with("4. QED!"));
}

#[test]
fn circular_proofs_do_not_set_records() {
    let (mut session, _, id) = session();
    let report = session.select(&givens());
    session.commit(&report.deductions[0]).unwrap();
    session.set_exercise(id).unwrap();

    // the exercise's own law is now available, and using it is circular
    let goal = session.exercise(id).unwrap().law;
    let report = session.select(&givens());
    let circular = report
        .deductions
        .iter()
        .find(|d| d.law == goal)
        .expect("proved law applies");
    assert!(circular.circular);

    let outcome = session.commit(circular).unwrap();
    assert_eq!(
        outcome.line.as_deref(),
        Some("From Rain, Rain IMPLIES Wet: deduce Wet. [Exercise 1*]")
    );
    let summary = outcome.solved.unwrap();
    assert!(!summary.first_time);
    assert!(summary.circular);
    assert_eq!(summary.record, None);
    assert!(!summary.new_personal_best);
    assert_eq!(session.proof().lines().last().map(String::as_str), Some("QED! (again)"));
    assert_eq!(
        session.store().unwrap().get("lines Exercise 1").as_deref(),
        Some("4")
    );
}

#[test]
fn undo_is_single_step() {
    let (mut session, laws, _) = session();
    session.unlock(laws.and_introduction, LAW_GRANTED).unwrap();

    let report = session.select(&[rain().into(), rain().into()]);
    let conjunction = report
        .deductions
        .iter()
        .find(|d| d.law == laws.and_introduction)
        .unwrap()
        .clone();
    let outcome = session.commit(&conjunction).unwrap();
    assert_eq!(
        outcome.line.as_deref(),
        Some("From Rain, Rain: deduce Rain AND Rain. [Conjunction introduction]")
    );
    assert!(outcome.solved.is_none());
    assert!(session.workspace().contains(&conjunction.conclusion));

    assert!(session.undo());
    assert_eq!(session.proof().len(), 2);
    assert!(!session.workspace().contains(&conjunction.conclusion));
    assert!(!session.undo());

    // listing deductions discards the pending undo
    session.commit(&conjunction).unwrap();
    session.select(&[rain().into()]);
    assert!(!session.undo());
}

#[test]
fn environments_are_formed_without_sentence_justifications() {
    let (mut session, laws, _) = session();
    session.unlock(laws.form_assumption, LAW_GRANTED).unwrap();

    let report = session.select(&[Context::formula(wet())]);
    let outcome = session.commit(&report.deductions[0]).unwrap();
    assert_eq!(
        outcome.line.as_deref(),
        Some("Form environment [assuming Wet]. [Form assumption environment]")
    );
    let env = Environment::new([wet()]);
    assert!(session.workspace().environments().contains(&env));
}

#[test]
fn exercises_unlock_in_order() {
    let mut session = Session::new(SessionConfig::default());
    let laws = session.install_standard_laws().unwrap();
    let first = define_first_exercise(&mut session, &laws);
    let second = session
        .define_exercise("Exercise 2", Some("Wet twice"), vec![wet().into()], (wet() & wet()).into(), 3)
        .unwrap();
    session.unlocked_by(second, first).unwrap();
    session.activate(first).unwrap();

    assert!(matches!(
        session.set_exercise(second),
        Err(NdError::ExerciseLocked(name)) if name == "Exercise 2"
    ));

    session.set_exercise(first).unwrap();
    let report = session.select(&givens());
    let summary = session.commit(&report.deductions[0]).unwrap().solved.unwrap();
    assert_eq!(summary.exercise, first);
    assert!(session.exercise(second).unwrap().activated);
    session.set_exercise(second).unwrap();
    assert_eq!(session.law("Wet twice").unwrap(), session.exercise(second).unwrap().law);
    assert!(session.store().is_none());
}

#[test]
fn fresh_variables_are_added_to_the_term_window() {
    let (mut session, _, _) = session();
    assert_eq!(session.add_free_variable().unwrap().name(), "x");
    assert_eq!(session.add_free_variable().unwrap().name(), "y");
    assert_eq!(session.add_bound_variable().unwrap().name(), "X");
    assert_eq!(session.workspace().terms().len(), 3);
}

#[test]
fn reset_requires_an_active_exercise() {
    let mut session = Session::new(SessionConfig::default());
    assert!(matches!(session.reset_exercise(), Err(NdError::NoActiveExercise)));
}

#[test]
fn briefing_publishes_notes_and_the_shortest_proof_once_all_are_solved() {
    let mut session = Session::new(SessionConfig::default());
    let laws = session.install_standard_laws().unwrap();
    let id = define_first_exercise(&mut session, &laws);
    session.activate(id).unwrap();
    {
        let exercise = session.exercise_mut(id).unwrap();
        exercise.notes = "Use modus ponens.".to_string();
        exercise.proof = "1. Rain. [given]".to_string();
    }

    let briefing = session.set_exercise(id).unwrap();
    assert_eq!(briefing.exercise, id);
    assert_eq!(
        briefing.title,
        "Exercise 1: Given Rain, Rain IMPLIES Wet: deduce Wet."
    );
    assert_eq!(briefing.best_length, 4);
    assert_eq!(briefing.notes.as_deref(), Some("Use modus ponens."));
    assert_eq!(briefing.shortest_proof, None);

    let report = session.select(&givens());
    let summary = session.commit(&report.deductions[0]).unwrap().solved.unwrap();
    assert!(summary.all_solved);

    let briefing = session.reset_exercise().unwrap();
    assert_eq!(briefing.shortest_proof.as_deref(), Some("1. Rain. [given]"));
}

#[test]
fn all_solved_waits_for_every_exercise() {
    let mut session = Session::new(SessionConfig::default());
    let laws = session.install_standard_laws().unwrap();
    let first = define_first_exercise(&mut session, &laws);
    let second = session
        .define_exercise("Exercise 2", Some("Wet twice"), vec![wet().into()], (wet() & wet()).into(), 3)
        .unwrap();
    session.unlocked_by(second, first).unwrap();
    session.activate(first).unwrap();

    session.set_exercise(first).unwrap();
    let report = session.select(&givens());
    let summary = session.commit(&report.deductions[0]).unwrap().solved.unwrap();
    assert!(!summary.all_solved);

    let briefing = session.set_exercise(second).unwrap();
    assert_eq!(
        briefing.title,
        "Exercise 2 (Wet twice): Given Wet: deduce Wet AND Wet."
    );
    assert_eq!(briefing.notes, None);
}

#[test]
fn true_and_false_are_revealed_for_good() {
    let mut session = Session::with_store(SessionConfig::default(), Box::new(MemoryStore::new()));
    let laws = session.install_standard_laws().unwrap();
    let first = define_first_exercise(&mut session, &laws);
    session.activate(first).unwrap();
    session.set_exercise(first).unwrap();
    assert!(!session.true_false_revealed());
    assert_eq!(session.workspace().formulas(), [rain(), wet()]);

    let second = session
        .define_exercise("Exercise 2", None, vec![wet().into()], (wet() | Sentence::falsity()).into(), 2)
        .unwrap();
    session.exercise_mut(second).unwrap().reveal_true_false = true;
    session.activate(second).unwrap();
    session.set_exercise(second).unwrap();
    assert!(session.true_false_revealed());
    assert!(session.workspace().formulas().contains(&Sentence::truth()));
    assert!(session.workspace().formulas().contains(&Sentence::falsity()));
    assert_eq!(
        session.store().unwrap().get("true false").as_deref(),
        Some("unlocked")
    );

    // later exercises keep them
    session.set_exercise(first).unwrap();
    assert!(session.workspace().formulas().contains(&Sentence::truth()));
}
