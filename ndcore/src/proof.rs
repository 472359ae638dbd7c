//! The proof being written for the current exercise.

/// Numbered proof lines and whether any of them used a circular law.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProofLog {
    lines: Vec<String>,
    has_circularity: bool,
}

impl ProofLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn has_circularity(&self) -> bool {
        self.has_circularity
    }

    pub fn mark_circular(&mut self) {
        self.has_circularity = true;
    }

    /// Rewind to the first `len` lines and the given circularity flag.
    pub fn rewind(&mut self, len: usize, has_circularity: bool) {
        self.lines.truncate(len);
        self.has_circularity = has_circularity;
    }

    /// Numbered listing, one line per proof step.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .enumerate()
            .map(|(i, line)| format!("{}. {line}", i + 1))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewind_restores_length_and_flag() {
        let mut proof = ProofLog::new();
        proof.push("A. [given]");
        proof.push("From A: deduce A AND A. [Conjunction introduction*]");
        proof.mark_circular();
        assert_eq!(
            proof.text(),
            "1. A. [given]\n2. From A: deduce A AND A. [Conjunction introduction*]"
        );
        proof.rewind(1, false);
        assert_eq!(proof.len(), 1);
        assert!(!proof.has_circularity());
    }
}
