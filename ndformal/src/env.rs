//! Scope frames and environments.
//!
//! An [`Environment`] is an ordered stack of [`Assumption`] frames, outermost first. The empty
//! environment is the root scope. Frame order matters both for display and for aligning
//! environments during matching.
use std::fmt;

use strum::{EnumDiscriminants, EnumIs};

use crate::sentence::Sentence;
use crate::variable::FreeVariable;

/// A single scope-introducing frame.
#[derive(Debug, Clone, PartialEq, Eq, EnumIs, EnumDiscriminants)]
#[strum_discriminants(name(AssumptionKind))]
pub enum Assumption {
    /// `assuming S`
    Assuming(Sentence),
    /// `letting x be arbitrary`
    Letting(FreeVariable),
    /// `setting x s.t. S`
    Setting(FreeVariable, Sentence),
}

impl Assumption {
    pub fn kind(&self) -> AssumptionKind {
        self.into()
    }

    /// The sentence carried by `assuming`/`setting` frames.
    pub fn sentence(&self) -> Option<&Sentence> {
        match self {
            Assumption::Assuming(s) | Assumption::Setting(_, s) => Some(s),
            Assumption::Letting(_) => None,
        }
    }

    /// The free variable introduced by `letting`/`setting` frames.
    pub fn variable(&self) -> Option<&FreeVariable> {
        match self {
            Assumption::Letting(v) | Assumption::Setting(v, _) => Some(v),
            Assumption::Assuming(_) => None,
        }
    }

    /// Standalone label of the frame, e.g. `Let x be arbitrary`.
    pub fn name(&self) -> String {
        match self {
            Assumption::Assuming(s) => format!("Assume {}", s.short_text()),
            Assumption::Letting(v) => format!("Let {v} be arbitrary"),
            Assumption::Setting(v, s) => format!("Set {v} s.t. {}", s.short_text()),
        }
    }
}

impl From<Sentence> for Assumption {
    fn from(s: Sentence) -> Self {
        Assumption::Assuming(s)
    }
}

impl From<FreeVariable> for Assumption {
    fn from(v: FreeVariable) -> Self {
        Assumption::Letting(v)
    }
}

/// Ordered list of frames, outermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    frames: Vec<Assumption>,
}

impl Environment {
    /// The root environment (no frames).
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new(frames: impl IntoIterator<Item = impl Into<Assumption>>) -> Self {
        Self {
            frames: frames.into_iter().map(Into::into).collect(),
        }
    }

    pub fn frames(&self) -> &[Assumption] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_root(&self) -> bool {
        self.frames.is_empty()
    }

    /// A copy of this environment with `frame` appended as the innermost frame.
    pub fn with(&self, frame: impl Into<Assumption>) -> Self {
        let mut frames = self.frames.clone();
        frames.push(frame.into());
        Self { frames }
    }

    /// A copy of this environment with `frame` inserted as the outermost frame.
    pub fn with_outer(&self, frame: impl Into<Assumption>) -> Self {
        let mut frames = Vec::with_capacity(self.frames.len() + 1);
        frames.push(frame.into());
        frames.extend(self.frames.iter().cloned());
        Self { frames }
    }

    /// The first `len` frames.
    pub fn prefix(&self, len: usize) -> Self {
        Self {
            frames: self.frames[..len.min(self.frames.len())].to_vec(),
        }
    }

    pub fn innermost(&self) -> Option<&Assumption> {
        self.frames.last()
    }

    pub fn push(&mut self, frame: impl Into<Assumption>) {
        self.frames.push(frame.into());
    }

    pub fn extend(&mut self, frames: impl IntoIterator<Item = Assumption>) {
        self.frames.extend(frames);
    }

    /// Free variables introduced by the frames, outermost first.
    pub fn free_variables(&self) -> impl Iterator<Item = &FreeVariable> {
        self.frames.iter().filter_map(Assumption::variable)
    }

    /// Canonical text of the frame list.
    ///
    /// Consecutive `assuming` frames share one keyword (`assuming A, B`), consecutive `letting`
    /// frames share one clause (`letting x, y be arbitrary`).
    pub fn text(&self) -> String {
        if self.frames.is_empty() {
            return "root environment".to_string();
        }

        let mut groups: Vec<String> = Vec::new();
        let mut previous: Option<AssumptionKind> = None;
        for frame in &self.frames {
            let kind = frame.kind();
            let continues = previous == Some(kind) && kind != AssumptionKind::Setting;
            match frame {
                Assumption::Assuming(s) if continues => {
                    if let Some(last) = groups.last_mut() {
                        last.push_str(", ");
                        last.push_str(s.short_text());
                    }
                }
                Assumption::Assuming(s) => groups.push(format!("assuming {}", s.short_text())),
                Assumption::Letting(v) if continues => {
                    if let Some(last) = groups.last_mut() {
                        let head = last.trim_end_matches(" be arbitrary").len();
                        last.truncate(head);
                        last.push_str(&format!(", {v} be arbitrary"));
                    }
                }
                Assumption::Letting(v) => groups.push(format!("letting {v} be arbitrary")),
                Assumption::Setting(v, s) => {
                    groups.push(format!("setting {v} s.t. {}", s.short_text()))
                }
            }
            previous = Some(kind);
        }
        groups.join(", ")
    }
}

impl FromIterator<Assumption> for Environment {
    fn from_iter<T: IntoIterator<Item = Assumption>>(iter: T) -> Self {
        Self {
            frames: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}
