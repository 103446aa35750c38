//! Compaction of the raw lig/kern table into a [`Program`].
//!
//! The raw table contains instructions that are never executed as part of a program:
//!     boundary char markers at either end of the table,
//!     and restart instructions that redirect a character's start to a larger index.
//! These are removed and the skips of the remaining instructions are recomputed
//!     so that the compacted indices are dense.
//!
//! Building happens in four passes over the table:
//!
//! 1. Boundary setup, which reads the boundary char markers.
//! 2. Label building, which resolves each character's start index through restarts.
//! 3. Activity propagation, which marks every instruction reachable from a start.
//! 4. Compaction, which emits the final instructions and remaps the labels.

use std::collections::BTreeMap;

use super::*;
use crate::error::Warnings;
use crate::format::{CharTag, File, LigKernInstruction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Activity {
    /// No program start reaches the instruction.
    Unreachable,
    /// The instruction is bookkeeping and is never executed.
    PassThrough,
    /// The instruction is part of some character's program.
    Accessible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Char(Char),
    Boundary,
}

struct Builder<'a> {
    file: &'a File,
    activity: Vec<Activity>,
    labels: Vec<(Label, usize)>,
    boundary_char: Option<Char>,
}

/// Builds the lig/kern program of a file.
///
/// Returns the program along with the start index of each character that has one.
pub(crate) fn build(
    file: &File,
    warnings: &mut Warnings,
) -> Result<(Program, BTreeMap<Char, usize>), Error> {
    let mut builder = Builder {
        file,
        activity: vec![Activity::Unreachable; file.lig_kern_instructions.len()],
        labels: vec![],
        boundary_char: None,
    };
    if !file.lig_kern_instructions.is_empty() {
        builder.setup_boundary()?;
    }
    builder.build_labels()?;
    builder.promote_activity()?;
    let result = builder.compact(warnings)?;
    log::debug!(
        "built lig/kern program with {} instructions from {} raw instructions",
        result.0.len(),
        file.lig_kern_instructions.len()
    );
    Ok(result)
}

impl<'a> Builder<'a> {
    fn instructions(&self) -> &'a [LigKernInstruction] {
        &self.file.lig_kern_instructions
    }

    // TFtoPL.2014.69
    fn setup_boundary(&mut self) -> Result<(), Error> {
        let instructions = self.instructions();
        let nl = instructions.len();
        let first = instructions[0];
        if first.means_boundary() {
            self.boundary_char = Some(first.next_char);
            self.activity[0] = Activity::PassThrough;
        }
        let last = instructions[nl - 1];
        if last.means_boundary() {
            self.activity[nl - 1] = Activity::PassThrough;
            let start = last.restart_index();
            if start >= nl {
                return Err(Error::BoundaryCharStartTooLarge(start));
            }
            self.activity[start] = Activity::Accessible;
            self.labels.push((Label::Boundary, start));
        }
        Ok(())
    }

    // TFtoPL.2014.67
    fn build_labels(&mut self) -> Result<(), Error> {
        let instructions = self.instructions();
        let nl = instructions.len();
        for (c, info) in self.file.chars() {
            let CharTag::Ligature(l) = info.tag else {
                continue;
            };
            let mut start = l as usize;
            if let Some(redirect) = instructions.get(start).filter(|i| i.means_restart()) {
                let target = redirect.restart_index();
                if target < nl && self.activity[start] == Activity::Unreachable {
                    self.activity[start] = Activity::PassThrough;
                }
                start = target;
            }
            if start >= nl {
                return Err(Error::LigKernStartTooLarge(c));
            }
            self.labels.push((Label::Char(c), start));
            self.activity[start] = Activity::Accessible;
        }
        Ok(())
    }

    // Instructions only point forward, so a single pass reaches everything.
    fn promote_activity(&mut self) -> Result<(), Error> {
        let instructions = self.instructions();
        let nl = instructions.len();
        for (i, instruction) in instructions.iter().enumerate() {
            if self.activity[i] != Activity::Accessible || instruction.means_stop() {
                continue;
            }
            let next = instruction.next_index(i);
            if next >= nl {
                return Err(Error::StepSkipsTooFar(i));
            }
            self.activity[next] = Activity::Accessible;
        }
        Ok(())
    }

    fn is_emitted(&self, i: usize) -> bool {
        self.activity[i] != Activity::PassThrough && !self.instructions()[i].means_restart()
    }

    fn compact(
        self,
        warnings: &mut Warnings,
    ) -> Result<(Program, BTreeMap<Char, usize>), Error> {
        let instructions = self.instructions();
        let nl = instructions.len();
        let mut compacted_index: Vec<Option<usize>> = vec![None; nl];
        let mut n = 0_usize;
        for (i, slot) in compacted_index.iter_mut().enumerate() {
            if self.is_emitted(i) {
                *slot = Some(n);
                n += 1;
            }
        }

        let mut program = Program {
            instructions: Vec::with_capacity(n),
            boundary_char: self.boundary_char,
            boundary_start: None,
        };
        for (i, raw) in instructions.iter().enumerate() {
            if self.activity[i] == Activity::PassThrough {
                continue;
            }
            if raw.means_restart() {
                // TFtoPL.2014.74
                if raw.restart_index() > nl {
                    return Err(Error::UnconditionalStopAddressTooBig(i));
                }
                continue;
            }
            program.instructions.push(Instruction {
                skip: self.skip(i, &compacted_index),
                next_char: self.check_next_char(i, raw, warnings),
                operation: self.operation(i, raw, warnings),
            });
        }

        let mut starts = BTreeMap::new();
        for (label, raw_start) in &self.labels {
            let start = compacted_index[*raw_start];
            match (label, start) {
                (Label::Char(c), Some(start)) => {
                    starts.insert(*c, start);
                }
                (Label::Char(c), None) => {
                    warnings.push(Warning::LigKernStartIsRestart(*c));
                }
                (Label::Boundary, start) => {
                    if start.is_none() {
                        log::debug!("boundary char program starts at a restart; ignoring it");
                    }
                    program.boundary_start = start;
                }
            }
        }
        Ok((program, starts))
    }

    /// Computes the compacted skip of the instruction at raw index `i`.
    ///
    /// A restart in the middle of a program is never executed, so the instruction
    ///     before it ends the program.
    fn skip(&self, i: usize, compacted_index: &[Option<usize>]) -> Option<u16> {
        let raw = self.instructions()[i];
        if raw.means_stop() {
            return None;
        }
        let next = raw.next_index(i);
        // Only reachable for instructions that no program reaches.
        let next_start = (*compacted_index.get(next)?)?;
        let this_start = compacted_index[i]?;
        (next_start - this_start - 1).try_into().ok()
    }

    // TFtoPL.2014.70
    fn check_next_char(
        &self,
        i: usize,
        raw: &LigKernInstruction,
        warnings: &mut Warnings,
    ) -> Char {
        let c = raw.next_char;
        if self.file.char_exists(c) || Some(c) == self.boundary_char {
            return c;
        }
        warnings.push(Warning::NonExistentNextChar {
            index: i,
            next_char: c,
        });
        self.file.first_existing_char()
    }

    fn operation(&self, i: usize, raw: &LigKernInstruction, warnings: &mut Warnings) -> Operation {
        if raw.means_kern() {
            // TFtoPL.2014.76
            let kern_index = raw.kern_index();
            return match self.file.kerns.get(kern_index) {
                Some(kern) => Operation::Kern(*kern),
                None => {
                    warnings.push(Warning::KernIndexTooLarge {
                        index: i,
                        kern_index,
                    });
                    Operation::Kern(Number::ZERO)
                }
            };
        }
        // TFtoPL.2014.77
        let mut char_to_insert = raw.lig_char();
        if !self.file.char_exists(char_to_insert) {
            warnings.push(Warning::NonExistentLigatureChar {
                index: i,
                lig_char: char_to_insert,
            });
            char_to_insert = self.file.first_existing_char();
        }
        let (keep_left, keep_right, step_over) =
            (raw.keep_left(), raw.keep_right(), raw.step_over());
        if step_over > keep_left as u8 + keep_right as u8 {
            warnings.push(Warning::NonstandardLigatureOp { index: i });
            return Operation::Ligature {
                char_to_insert,
                keep_left: false,
                keep_right: false,
                step_over: 0,
            };
        }
        Operation::Ligature {
            char_to_insert,
            keep_left,
            keep_right,
            step_over,
        }
    }
}
