//! Lig/kern programs
//!
//! When TeX typesets two adjacent characters it consults the lig/kern program
//!     of the left character.
//! The program is a list of instructions, each of which tests the right character.
//! If the test succeeds the instruction's operation is performed and the program ends;
//!     otherwise execution continues with the next instruction in the list.
//!
//! In a .tfm file the instructions of all characters are interleaved in one table
//!     and the "next" instruction is given as a relative skip.
//! The [`Program`] type is the compacted, validated form of that table
//!     produced while loading a font.

mod builder;

pub(crate) use builder::build;

use super::*;

/// A compacted lig/kern program.
///
/// Following [`Instruction::skip`] from any start index always moves forward,
///     so every walk through the program terminates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Program {
    pub instructions: Vec<Instruction>,
    /// Character that stands for the word boundary when it appears on the right.
    pub boundary_char: Option<Char>,
    /// Start of the program run when the word boundary appears on the left.
    pub boundary_start: Option<usize>,
}

/// A single instruction in a lig/kern program.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instruction {
    /// Number of instructions to skip to reach the next instruction in the program.
    ///
    /// `None` if this is the last instruction.
    pub skip: Option<u16>,
    /// The right character this instruction applies to.
    pub next_char: Char,
    pub operation: Operation,
}

impl Instruction {
    /// Index of the next instruction, given this instruction's index.
    pub fn next_index(&self, pos: usize) -> Option<usize> {
        self.skip.map(|skip| pos + skip as usize + 1)
    }
}

/// Operation performed when an instruction matches.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operation {
    /// Insert a kern between the two characters.
    Kern(Number),
    /// Insert a character between the two characters.
    ///
    /// Afterwards the left and right characters are deleted unless kept,
    ///     and the cursor moves over `step_over` characters.
    /// The step never exceeds the number of kept characters.
    Ligature {
        char_to_insert: Char,
        keep_left: bool,
        keep_right: bool,
        step_over: u8,
    },
}

impl Program {
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Iterates over the instructions of the program starting at the given index.
    pub fn iter_from(&self, start: usize) -> ProgramIter<'_> {
        ProgramIter {
            program: self,
            next: Some(start),
        }
    }

    /// Returns the operation for the right character in the program starting at the given index.
    pub fn lookup(&self, start: usize, right: Char) -> Option<&Operation> {
        self.iter_from(start)
            .find(|(_, instruction)| instruction.next_char == right)
            .map(|(_, instruction)| &instruction.operation)
    }

    /// Returns the kern between the left character whose program starts at `start`
    ///     and the right character, if any.
    pub fn kern(&self, start: usize, right: Char) -> Option<Number> {
        match self.lookup(start, right)? {
            Operation::Kern(kern) => Some(*kern),
            Operation::Ligature { .. } => None,
        }
    }

    /// Returns the character inserted between the left character whose program
    ///     starts at `start` and the right character, if any.
    pub fn ligature(&self, start: usize, right: Char) -> Option<Char> {
        match self.lookup(start, right)? {
            Operation::Kern(_) => None,
            Operation::Ligature { char_to_insert, .. } => Some(*char_to_insert),
        }
    }
}

/// Iterator over the instructions of a single program.
///
/// Yields each instruction along with its index.
pub struct ProgramIter<'a> {
    program: &'a Program,
    next: Option<usize>,
}

impl<'a> Iterator for ProgramIter<'a> {
    type Item = (usize, &'a Instruction);

    fn next(&mut self) -> Option<Self::Item> {
        let i = self.next?;
        let instruction = self.program.instructions.get(i)?;
        self.next = instruction.next_index(i);
        Some((i, instruction))
    }
}
