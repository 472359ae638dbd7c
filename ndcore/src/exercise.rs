//! Exercises: laws to be proved, and the library that orders them.
use std::fmt;

use ndformal::law::LawId;

/// Identifier of an exercise inside an [`ExerciseLibrary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExerciseId(pub(crate) usize);

impl fmt::Display for ExerciseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "exercise #{}", self.0)
    }
}

/// A goal law to prove, with its progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub name: String,
    /// The law stating the exercise. Its index is the circularity clock.
    pub law: LawId,
    /// Shortest known non-circular proof, in lines.
    pub best_length: usize,
    /// Text of the shortest known proof, shown once every exercise is solved.
    pub proof: String,
    /// Shown when the exercise is set.
    pub notes: String,
    /// Setting the exercise reveals the TRUE and FALSE formulas for good.
    pub reveal_true_false: bool,
    pub personal_best: Option<usize>,
    pub activated: bool,
    pub solved: bool,
    /// Laws unlocked as soon as the exercise is attempted.
    pub new_laws: Vec<LawId>,
    /// Exercises activated when this one is solved.
    pub new_exercises: Vec<ExerciseId>,
}

impl Exercise {
    pub fn new(name: impl Into<String>, law: LawId, best_length: usize) -> Self {
        Self {
            name: name.into(),
            law,
            best_length,
            proof: String::new(),
            notes: String::new(),
            reveal_true_false: false,
            personal_best: None,
            activated: false,
            solved: false,
            new_laws: Vec::new(),
            new_exercises: Vec::new(),
        }
    }

    /// Grant `law` when this exercise is attempted.
    pub fn unlocks(&mut self, law: LawId) {
        if !self.new_laws.contains(&law) {
            self.new_laws.push(law);
        }
    }
}

/// A library for managing multiple [`Exercise`]s, in definition order.
#[derive(Debug, Clone, Default)]
pub struct ExerciseLibrary {
    exercises: Vec<Exercise>,
}

impl ExerciseLibrary {
    /// Creates a new, empty [`ExerciseLibrary`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new [`Exercise`] into the library.
    pub fn insert(&mut self, exercise: Exercise) -> ExerciseId {
        self.exercises.push(exercise);
        ExerciseId(self.exercises.len() - 1)
    }

    /// Retrieves a reference to an [`Exercise`] by its id.
    pub fn get(&self, id: ExerciseId) -> Option<&Exercise> {
        self.exercises.get(id.0)
    }

    /// Retrieves a mutable reference to an [`Exercise`] by its id.
    pub fn get_mut(&mut self, id: ExerciseId) -> Option<&mut Exercise> {
        self.exercises.get_mut(id.0)
    }

    /// Looks an exercise up by name.
    pub fn find(&self, name: &str) -> Option<ExerciseId> {
        self.exercises
            .iter()
            .position(|e| e.name == name)
            .map(ExerciseId)
    }

    /// Returns an iterator over all [`Exercise`]s in the library.
    pub fn iter(&self) -> impl Iterator<Item = (ExerciseId, &Exercise)> {
        self.exercises
            .iter()
            .enumerate()
            .map(|(i, e)| (ExerciseId(i), e))
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    /// Whether every exercise has been solved.
    pub fn all_solved(&self) -> bool {
        self.exercises.iter().all(|e| e.solved)
    }
}
