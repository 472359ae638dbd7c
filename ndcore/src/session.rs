//! A trainer session: laws, exercises, the proof in progress and persistence.
//!
//! Role
//! - Own the engine state (interning table and law registry) for the session's lifetime.
//! - Track exercises: activation, attempts, solutions and shortest-proof records.
//! - Turn a user's selection into candidate deductions, and commit one of them.
//!
//! Persistence is optional. Without a store the session behaves identically, it just forgets
//! everything when dropped.
use std::cmp::Ordering;

use log::{debug, info, warn};
use ndformal::catalog::StandardLaws;
use ndformal::context::{Context, deduction_string};
use ndformal::engine::{Deduction, Engine, MatchReport};
use ndformal::law::{LawId, LawKind};
use ndformal::sentence::Sentence;
use ndformal::variable::{BoundVariable, FreeVariable};

use crate::config::SessionConfig;
use crate::error::{NdError, NdResult};
use crate::exercise::{Exercise, ExerciseId, ExerciseLibrary};
use crate::magic::{
    EXERCISE_SOLVED, EXERCISE_UNLOCKED, LAW_GRANTED, LAW_KEY_PREFIX, LAW_PROVED,
    LINES_KEY_PREFIX, PROOF_KEY_PREFIX, TRUE_FALSE_KEY,
};
use crate::proof::ProofLog;
use crate::store::{KeyValueStore, TomlFileStore};
use crate::workspace::Workspace;

/// State restored by [`Session::undo`].
#[derive(Debug, Clone)]
struct Snapshot {
    workspace: Workspace,
    lines: usize,
    has_circularity: bool,
}

/// What happened when a deduction was committed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitOutcome {
    /// The proof line written, if any (formulas and terms are added silently).
    pub line: Option<String>,
    /// The law used was defined at or after the exercise being attempted.
    pub circular: bool,
    /// Set when the commit proved the active exercise.
    pub solved: Option<ProofSummary>,
}

/// Summary of a completed proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofSummary {
    pub exercise: ExerciseId,
    pub lines: usize,
    pub first_time: bool,
    pub circular: bool,
    pub new_personal_best: bool,
    /// Comparison with the shortest known proof; `None` for circular proofs.
    pub record: Option<Ordering>,
    /// Every exercise of the library is now solved.
    pub all_solved: bool,
}

/// What to show when an exercise is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseBriefing {
    pub exercise: ExerciseId,
    /// `"<name> (<law>): <statement>"`, or `"<name>: <statement>"` when both names agree.
    pub title: String,
    pub best_length: usize,
    pub notes: Option<String>,
    /// The shortest known proof, published only once every exercise is solved.
    pub shortest_proof: Option<String>,
}

pub struct Session {
    config: SessionConfig,
    engine: Engine,
    exercises: ExerciseLibrary,
    store: Option<Box<dyn KeyValueStore>>,
    active: Option<ExerciseId>,
    workspace: Workspace,
    proof: ProofLog,
    undo: Option<Snapshot>,
    true_false: bool,
}

impl Session {
    /// A session that persists nothing.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            engine: Engine::new(),
            exercises: ExerciseLibrary::new(),
            store: None,
            active: None,
            workspace: Workspace::new(),
            proof: ProofLog::new(),
            undo: None,
            true_false: false,
        }
    }

    pub fn with_store(config: SessionConfig, store: Box<dyn KeyValueStore>) -> Self {
        let mut session = Self::new(config);
        session.true_false = store.contains(TRUE_FALSE_KEY);
        session.store = Some(store);
        session
    }

    /// Build a session from its configuration, opening the file store if one is configured.
    pub fn open(config: SessionConfig) -> NdResult<Self> {
        match config.store_path.clone() {
            Some(path) => {
                let store = TomlFileStore::open(path)?;
                Ok(Self::with_store(config, Box::new(store)))
            }
            None => Ok(Self::new(config)),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn exercises(&self) -> &ExerciseLibrary {
        &self.exercises
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn proof(&self) -> &ProofLog {
        &self.proof
    }

    pub fn active_exercise(&self) -> Option<ExerciseId> {
        self.active
    }

    pub fn can_undo(&self) -> bool {
        self.undo.is_some()
    }

    pub fn store(&self) -> Option<&dyn KeyValueStore> {
        self.store.as_deref()
    }

    fn store_get(&self, key: &str) -> Option<String> {
        self.store.as_ref().and_then(|store| store.get(key))
    }

    fn store_set(&mut self, key: &str, value: &str) -> NdResult<()> {
        match self.store.as_mut() {
            Some(store) => store.set(key, value),
            None => Ok(()),
        }
    }

    /// Forget all persisted progress.
    pub fn clear_store(&mut self) -> NdResult<()> {
        match self.store.as_mut() {
            Some(store) => store.clear(),
            None => Ok(()),
        }
    }

    pub fn exercise(&self, id: ExerciseId) -> NdResult<&Exercise> {
        self.exercises
            .get(id)
            .ok_or_else(|| NdError::ExerciseNotFound(id.to_string()))
    }

    /// Whether TRUE and FALSE are offered as formulas.
    pub fn true_false_revealed(&self) -> bool {
        self.true_false
    }

    pub fn exercise_mut(&mut self, id: ExerciseId) -> NdResult<&mut Exercise> {
        self.exercises
            .get_mut(id)
            .ok_or_else(|| NdError::ExerciseNotFound(id.to_string()))
    }

    /// Look a base law up by name.
    pub fn law(&self, name: &str) -> NdResult<LawId> {
        self.engine
            .laws
            .find(name)
            .ok_or_else(|| NdError::LawNotFound(name.to_string()))
    }

    // ======================== Laws =========================

    /// Define a law; it is unlocked right away if the store remembers unlocking it.
    pub fn define_law(
        &mut self,
        name: &str,
        kind: LawKind,
        givens: Vec<Context>,
        conclusion: Context,
    ) -> NdResult<LawId> {
        let id = self.engine.define_law(name, kind, givens, conclusion)?;
        self.restore_unlock(id)?;
        Ok(id)
    }

    /// Install the standard catalog, restoring persisted unlocks.
    pub fn install_standard_laws(&mut self) -> NdResult<StandardLaws> {
        let laws = StandardLaws::install(&mut self.engine)?;
        for id in laws.all() {
            self.restore_unlock(id)?;
        }
        Ok(laws)
    }

    fn restore_unlock(&mut self, id: LawId) -> NdResult<()> {
        let key = format!("{LAW_KEY_PREFIX}{}", self.engine.laws[id].name());
        if let Some(text) = self.store_get(&key) {
            self.unlock(id, &text)?;
        }
        Ok(())
    }

    /// Unlock a law (and its ambient clone), persisting `text` as the reason.
    ///
    /// Unlocking twice is a no-op. Returns the ids that were newly unlocked.
    pub fn unlock(&mut self, id: LawId, text: &str) -> NdResult<Vec<LawId>> {
        let newly = self.engine.laws.unlock(id);
        if newly.contains(&id) {
            let law = &self.engine.laws[id];
            info!("{text} {}", law.desc());
            let key = format!("{LAW_KEY_PREFIX}{}", law.name());
            self.store_set(&key, text)?;
        }
        Ok(newly)
    }

    // ======================== Exercises =========================

    /// Define an exercise whose goal is the law `law_name` (defaults to the exercise name).
    ///
    /// Activation and solved state are restored from the store.
    pub fn define_exercise(
        &mut self,
        name: &str,
        law_name: Option<&str>,
        givens: Vec<Context>,
        conclusion: Context,
        best_length: usize,
    ) -> NdResult<ExerciseId> {
        let law = self.define_law(
            law_name.unwrap_or(name),
            LawKind::Template,
            givens,
            conclusion,
        )?;
        let id = self.exercises.insert(Exercise::new(name, law, best_length));
        debug!("defined exercise {name}: {}", self.engine.laws[law].statement());

        let stored = self.store_get(name);
        if matches!(stored.as_deref(), Some(EXERCISE_UNLOCKED | EXERCISE_SOLVED)) {
            self.activate(id)?;
            if stored.as_deref() == Some(EXERCISE_SOLVED) {
                self.exercise_mut(id)?.solved = true;
            }
        }
        Ok(id)
    }

    /// Grant `law` whenever `exercise` is attempted.
    pub fn exercise_unlocks(&mut self, exercise: ExerciseId, law: LawId) -> NdResult<()> {
        self.exercise_mut(exercise)?.unlocks(law);
        Ok(())
    }

    /// Make `exercise` available once `prerequisite` is solved (immediately if it already is).
    pub fn unlocked_by(&mut self, exercise: ExerciseId, prerequisite: ExerciseId) -> NdResult<()> {
        let prerequisite = self.exercise_mut(prerequisite)?;
        prerequisite.new_exercises.push(exercise);
        if prerequisite.solved {
            self.activate(exercise)?;
        }
        Ok(())
    }

    /// Make an exercise available to attempt.
    pub fn activate(&mut self, id: ExerciseId) -> NdResult<()> {
        let exercise = self.exercise_mut(id)?;
        if exercise.activated {
            return Ok(());
        }
        exercise.activated = true;
        let name = exercise.name.clone();
        info!("{name} now available");

        if self.store_get(&name).is_none() {
            self.store_set(&name, EXERCISE_UNLOCKED)?;
        }
        if let Some(lines) = self.store_get(&format!("{LINES_KEY_PREFIX}{name}")) {
            match lines.parse::<usize>() {
                Ok(lines) => {
                    let exercise = self.exercise_mut(id)?;
                    exercise.personal_best = Some(lines);
                    exercise.solved = true;
                }
                Err(err) => warn!("ignoring stored proof length '{lines}' of {name}: {err}"),
            }
        }
        Ok(())
    }

    /// Creation index of the law being proved, if an exercise is active.
    pub fn goal_index(&self) -> Option<usize> {
        let exercise = self.exercises.get(self.active?)?;
        self.engine.laws.get(exercise.law).map(|law| law.index())
    }

    /// Start (or restart) an exercise with a fresh workspace and proof.
    ///
    /// The goal's fact givens become the first proof lines, the laws the exercise grants are
    /// unlocked, and the goal's primitives are placed in the formula and term windows, after
    /// TRUE and FALSE once those are revealed.
    pub fn set_exercise(&mut self, id: ExerciseId) -> NdResult<ExerciseBriefing> {
        let exercise = self.exercise(id)?.clone();
        if !exercise.activated {
            return Err(NdError::ExerciseLocked(exercise.name));
        }
        let goal = self
            .engine
            .laws
            .get(exercise.law)
            .cloned()
            .ok_or_else(|| NdError::LawNotFound(exercise.law.to_string()))?;
        debug!("attempting {}: {}", exercise.name, goal.statement());

        self.active = Some(id);
        self.workspace = Workspace::new();
        self.proof = ProofLog::new();
        self.undo = None;

        for given in goal.givens().iter().filter(|g| g.is_fact()) {
            self.proof.push(format!("{}. [given]", given.name()));
            self.workspace.add(given.clone());
        }

        for law in &exercise.new_laws {
            self.unlock(*law, LAW_GRANTED)?;
        }

        if exercise.reveal_true_false && !self.true_false {
            info!("{LAW_GRANTED} TRUE and FALSE formulas");
            self.true_false = true;
            self.store_set(TRUE_FALSE_KEY, EXERCISE_UNLOCKED)?;
        }
        if self.true_false {
            self.workspace.add(Context::formula(Sentence::truth()));
            self.workspace.add(Context::formula(Sentence::falsity()));
        }

        let primitives = goal.primitives();
        for atom in &primitives.atoms {
            let context = self.engine.interner.formula_context(atom.short_text())?;
            self.workspace.add(context);
        }
        let terms = primitives
            .free_variables
            .iter()
            .chain(&primitives.bound_variables)
            .chain(&primitives.terms);
        for term in terms {
            let context = self.engine.interner.term_context(term.short_text())?;
            self.workspace.add(context);
        }

        let title = if goal.name() == exercise.name {
            format!("{}: {}", exercise.name, goal.statement())
        } else {
            format!("{} ({}): {}", exercise.name, goal.name(), goal.statement())
        };
        let published = self.exercises.all_solved() && !exercise.proof.is_empty();
        Ok(ExerciseBriefing {
            exercise: id,
            title,
            best_length: exercise.best_length,
            notes: (!exercise.notes.is_empty()).then_some(exercise.notes),
            shortest_proof: published.then_some(exercise.proof),
        })
    }

    /// Restart the active exercise.
    pub fn reset_exercise(&mut self) -> NdResult<ExerciseBriefing> {
        let id = self.active.ok_or(NdError::NoActiveExercise)?;
        self.set_exercise(id)
    }

    // ======================== Deductions =========================

    /// Every deduction the unlocked laws allow from `justification`.
    ///
    /// Selecting discards the pending undo, so a hypothesis cannot be undone after the
    /// deductions it enables have been listed.
    pub fn select(&mut self, justification: &[Context]) -> MatchReport {
        self.undo = None;
        let report = self.engine.make_matches(
            justification,
            self.goal_index(),
            self.config.try_reversed_pairs,
        );
        debug!(
            "{} deduction(s), {} diagnostic(s)",
            report.deductions.len(),
            report.diagnostics.len()
        );
        report
    }

    /// Add a fresh free variable to the term window.
    pub fn add_free_variable(&mut self) -> NdResult<FreeVariable> {
        let name = self.workspace.fresh_free_variable();
        let v = self.engine.interner.free(name.name())?;
        self.workspace.add(Context::term(v.clone()));
        Ok(v)
    }

    /// Add a fresh bound variable to the term window.
    pub fn add_bound_variable(&mut self) -> NdResult<BoundVariable> {
        let name = self.workspace.fresh_bound_variable();
        let v = self.engine.interner.bound(name.name())?;
        self.workspace.add(Context::term(v.clone()));
        Ok(v)
    }

    /// Commit a deduction: record its conclusion and check whether the exercise is solved.
    pub fn commit(&mut self, deduction: &Deduction) -> NdResult<CommitOutcome> {
        let snapshot = Snapshot {
            workspace: self.workspace.clone(),
            lines: self.proof.len(),
            has_circularity: self.proof.has_circularity(),
        };
        self.undo = None;

        let conclusion = &deduction.conclusion;
        self.workspace.add(conclusion.clone());
        // formulas and terms are too minor to appear in the proof
        if conclusion.is_formula() || conclusion.is_term() {
            self.undo = Some(snapshot);
            return Ok(CommitOutcome::default());
        }

        let law = self
            .engine
            .laws
            .get(deduction.law)
            .ok_or_else(|| NdError::LawNotFound(deduction.law.to_string()))?;
        let circular = self.goal_index().is_some_and(|goal| law.index() >= goal);
        let mut name = law.name().to_string();
        if circular {
            name.push('*');
            self.proof.mark_circular();
        }

        let facts: Vec<Context> = deduction
            .justification
            .iter()
            .filter(|c| c.is_fact())
            .cloned()
            .collect();
        let line = format!("{} [{name}]", deduction_string("From", &facts, conclusion));
        self.proof.push(line.clone());

        let mut outcome = CommitOutcome {
            line: Some(line),
            circular,
            solved: None,
        };

        let goal_name = self
            .active
            .and_then(|id| self.exercises.get(id))
            .and_then(|exercise| self.engine.laws.get(exercise.law))
            .map(|law| law.conclusion().name());
        match (self.active, goal_name) {
            (Some(id), Some(goal)) if goal == conclusion.name() => {
                // a solved exercise cannot be undone
                outcome.solved = Some(self.complete(id)?);
            }
            _ => self.undo = Some(snapshot),
        }
        Ok(outcome)
    }

    fn complete(&mut self, id: ExerciseId) -> NdResult<ProofSummary> {
        let exercise = self.exercise(id)?.clone();
        let first_time = !exercise.solved;
        if first_time {
            self.proof.push("QED!");
            self.unlock(exercise.law, LAW_PROVED)?;
            self.exercise_mut(id)?.solved = true;
            self.store_set(&exercise.name, EXERCISE_SOLVED)?;
            for next in &exercise.new_exercises {
                self.activate(*next)?;
            }
        } else {
            self.proof.push("QED! (again)");
            self.unlock(exercise.law, LAW_PROVED)?;
        }

        let lines = self.proof.len();
        let circular = self.proof.has_circularity();
        let mut new_personal_best = false;
        if circular {
            info!(
                "{} was proved in {lines} lines, using laws obtained after the exercise was first solved",
                exercise.name
            );
        } else {
            info!("{} was proved in {lines} lines", exercise.name);
            let lines_key = format!("{LINES_KEY_PREFIX}{}", exercise.name);
            let stored = self
                .store_get(&lines_key)
                .and_then(|s| s.parse::<usize>().ok());
            if stored.is_none_or(|stored| stored > lines) {
                self.store_set(&lines_key, &lines.to_string())?;
                let text = self.proof.text();
                self.store_set(&format!("{PROOF_KEY_PREFIX}{}", exercise.name), &text)?;
            }

            let exercise = self.exercise_mut(id)?;
            if exercise.personal_best.is_none_or(|best| lines < best) {
                exercise.personal_best = Some(lines);
                new_personal_best = true;
            }
        }

        let record = (!circular).then(|| lines.cmp(&exercise.best_length));
        if record == Some(Ordering::Less) {
            info!("beat the shortest known proof of {}", exercise.name);
        }
        let all_solved = self.exercises.all_solved();
        if all_solved && first_time {
            info!("all exercises completed");
        }
        Ok(ProofSummary {
            exercise: id,
            lines,
            first_time,
            circular,
            new_personal_best,
            record,
            all_solved,
        })
    }

    /// Undo the last commit. Only one step back is kept, and solving an exercise clears it.
    pub fn undo(&mut self) -> bool {
        match self.undo.take() {
            Some(snapshot) => {
                self.workspace = snapshot.workspace;
                self.proof.rewind(snapshot.lines, snapshot.has_circularity);
                debug!("undid the last deduction");
                true
            }
            None => false,
        }
    }
}
