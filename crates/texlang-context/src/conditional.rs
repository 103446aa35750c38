/// Source position of a conditional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Locator {
    pub file: Option<String>,
    pub line: usize,
}

/// An entry on the conditional stack.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Conditional {
    /// Where the conditional started.
    pub locator: Locator,
    /// Whether the true branch was taken.
    pub value: bool,
}

/// Stack of the conditionals currently being expanded.
#[derive(Debug, Clone, Default)]
pub struct ConditionalStack(Vec<Conditional>);

impl ConditionalStack {
    pub fn push(&mut self, conditional: Conditional) {
        self.0.push(conditional);
    }

    /// Removes the innermost conditional.
    ///
    /// Returns `None` if the stack is empty; the caller decides whether this is an error.
    pub fn pop(&mut self) -> Option<Conditional> {
        self.0.pop()
    }

    pub fn top(&self) -> Option<&Conditional> {
        self.0.last()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
