//! Law registry: creation-order clock, unlock state and ambient clones.
use std::ops::Index;

use log::debug;

use crate::context::Context;
use crate::law::{Law, LawId, LawKind};

/// Every law defined in a session, in creation order.
#[derive(Debug, Clone, Default)]
pub struct LawRegistry {
    laws: Vec<Law>,
    /// Unlocked laws in unlock order (clones included).
    unlocked: Vec<LawId>,
    counter: usize,
}

impl LawRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_index(&mut self) -> usize {
        self.counter += 1;
        self.counter
    }

    fn push(&mut self, law: Law) -> LawId {
        let id = LawId(self.laws.len());
        self.laws.push(law);
        id
    }

    /// Define a law and, when it needs one, its ambient clone.
    ///
    /// The base law is fully built and stored before the clone is derived, so the clone's
    /// index is always the base index plus one.
    pub fn define(
        &mut self,
        name: impl Into<String>,
        kind: LawKind,
        givens: Vec<Context>,
        conclusion: Context,
    ) -> LawId {
        let index = self.next_index();
        let law = Law::new(name, kind, givens, conclusion, index);
        debug!("defined law {}", law.desc());
        let id = self.push(law);

        let clone_index = self.counter + 1;
        if let Some(clone) = self.laws[id.0].derive_ambient_clone(clone_index) {
            self.next_index();
            debug!("derived ambient clone {}", clone.desc());
            let clone_id = self.push(clone);
            self.laws[id.0].clone = Some(clone_id);
        }
        id
    }

    pub fn get(&self, id: LawId) -> Option<&Law> {
        self.laws.get(id.0)
    }

    /// Base (non-clone) law called `name`.
    pub fn find(&self, name: &str) -> Option<LawId> {
        self.laws
            .iter()
            .position(|law| !law.is_ambient_clone() && law.name() == name)
            .map(LawId)
    }

    pub fn len(&self) -> usize {
        self.laws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.laws.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LawId, &Law)> {
        self.laws.iter().enumerate().map(|(i, law)| (LawId(i), law))
    }

    /// Current value of the creation-order clock.
    pub fn counter(&self) -> usize {
        self.counter
    }

    /// Unlock `id` and its clone. Returns the ids that were newly unlocked.
    pub fn unlock(&mut self, id: LawId) -> Vec<LawId> {
        let mut newly = Vec::new();
        let Some(law) = self.laws.get_mut(id.0) else {
            return newly;
        };
        if !law.unlocked {
            law.unlocked = true;
            debug!("unlocked {}", law.name());
            self.unlocked.push(id);
            newly.push(id);
        }
        if let Some(clone) = self.laws[id.0].clone {
            newly.extend(self.unlock(clone));
        }
        newly
    }

    pub fn is_unlocked(&self, id: LawId) -> bool {
        self.get(id).is_some_and(Law::is_unlocked)
    }

    /// Unlocked laws in unlock order.
    pub fn unlocked_laws(&self) -> impl Iterator<Item = (LawId, &Law)> {
        self.unlocked.iter().map(|&id| (id, &self.laws[id.0]))
    }
}

impl Index<LawId> for LawRegistry {
    type Output = Law;

    fn index(&self, id: LawId) -> &Law {
        &self.laws[id.0]
    }
}
