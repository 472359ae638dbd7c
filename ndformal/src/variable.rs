//! Free and bound variable identifiers.
//!
//! Role
//! - Free variables (`x`, `y`, `z`, `x'`, ...) are introduced by `letting`/`setting` frames.
//! - Bound variables (`X`, `Y`, `Z`, `X'`, ...) are introduced by quantifiers.
//! - The two live in disjoint namespaces; a name is never both.
use std::fmt;
use std::rc::Rc;

use strum::{EnumIs, EnumTryAs};

/// A free variable, scoped by a `letting` or `setting` environment frame.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FreeVariable(Rc<str>);

/// A bound variable, scoped by a quantifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BoundVariable(Rc<str>);

impl FreeVariable {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Rc::from(name.as_ref()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl BoundVariable {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Rc::from(name.as_ref()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FreeVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for BoundVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Either kind of variable.
///
/// `Bound` for variables introduced by a quantifier, `Free` for variables
/// introduced by the surrounding environment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, EnumTryAs)]
pub enum Variable {
    Bound(BoundVariable),
    Free(FreeVariable),
}

impl Variable {
    pub fn name(&self) -> &str {
        match self {
            Variable::Bound(v) => v.name(),
            Variable::Free(v) => v.name(),
        }
    }
}

impl From<FreeVariable> for Variable {
    fn from(v: FreeVariable) -> Self {
        Variable::Free(v)
    }
}

impl From<BoundVariable> for Variable {
    fn from(v: BoundVariable) -> Self {
        Variable::Bound(v)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn cyclic_name(letters: [char; 3], i: usize) -> String {
    let mut name = String::with_capacity(1 + i / 3);
    name.push(letters[i % 3]);
    name.extend(std::iter::repeat_n('\'', i / 3));
    name
}

/// The `i`-th free variable name: `x, y, z, x', y', z', x'', ...`.
pub fn free_variable_name(i: usize) -> String {
    cyclic_name(['x', 'y', 'z'], i)
}

/// The `i`-th bound variable name: `X, Y, Z, X', Y', Z', X'', ...`.
pub fn bound_variable_name(i: usize) -> String {
    cyclic_name(['X', 'Y', 'Z'], i)
}

/// First name of the bound-variable sequence for which `taken` returns false.
pub fn first_unused_bound_name(mut taken: impl FnMut(&str) -> bool) -> String {
    (0..)
        .map(bound_variable_name)
        .find(|name| !taken(name))
        .unwrap_or_default()
}

/// First name of the free-variable sequence for which `taken` returns false.
pub fn first_unused_free_name(mut taken: impl FnMut(&str) -> bool) -> String {
    (0..)
        .map(free_variable_name)
        .find(|name| !taken(name))
        .unwrap_or_default()
}
