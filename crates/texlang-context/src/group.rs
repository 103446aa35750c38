//! Dynamically scoped register storage
//!
//! The scope chain is a stack of frames, one for each open group.
//! The bottom frame is the global group and is never removed.
//!
//! A register lookup searches the frames from the innermost group outwards;
//!     if no frame holds a binding, the family's initial value is returned.
//! A local assignment writes to the innermost frame only,
//!     so it disappears when the group ends.
//! A global assignment writes to every frame,
//!     so no frame retains a stale binding that would reappear later.
//!
//! ```
//! # use texlang_context::*;
//! let mut chain = ScopeChain::default();
//! chain.set::<Count>("x".into(), 5, Scope::Local);
//! chain.open_group(GroupType::Simple);
//! chain.set::<Count>("x".into(), 6, Scope::Local);
//! assert_eq!(chain.get::<Count>(&"x".into()), 6);
//! chain.close_group().unwrap();
//! assert_eq!(chain.get::<Count>(&"x".into()), 5);
//! ```

use crate::error::ContextError;
use crate::register::{Bindings, Register, Scope};
use crate::types::{GroupType, Token, TokenList};

/// Bindings and per-group state of one group.
#[derive(Debug, Default, Clone)]
pub struct Frame {
    group_type: GroupType,
    bindings: Bindings,
    after_group: TokenList,
}

impl Frame {
    fn new(group_type: GroupType) -> Frame {
        Frame {
            group_type,
            ..Default::default()
        }
    }

    pub fn group_type(&self) -> GroupType {
        self.group_type
    }

    /// Returns the binding in this frame, if there is one.
    pub fn get<R: Register>(&self, key: &R::Key) -> Option<&R::Value> {
        R::bindings(&self.bindings).get(key)
    }

    /// Tokens to be inserted after this group ends, as queued by `\aftergroup`.
    pub fn after_group_tokens(&self) -> &[Token] {
        &self.after_group
    }

    pub fn into_after_group_tokens(self) -> TokenList {
        self.after_group
    }
}

/// Stack of frames holding register bindings.
#[derive(Debug, Clone)]
pub struct ScopeChain {
    // Never empty: the first frame is the global group.
    frames: Vec<Frame>,
}

impl Default for ScopeChain {
    fn default() -> Self {
        ScopeChain {
            frames: vec![Frame::new(GroupType::BottomLevel)],
        }
    }
}

impl ScopeChain {
    /// Returns the number of open groups; 0 means only the global group is open.
    pub fn level(&self) -> usize {
        self.frames.len() - 1
    }

    pub fn is_global_group(&self) -> bool {
        self.level() == 0
    }

    pub fn group_type(&self) -> GroupType {
        self.innermost().group_type
    }

    fn innermost(&self) -> &Frame {
        // The bottom frame is never popped.
        &self.frames[self.frames.len() - 1]
    }

    fn innermost_mut(&mut self) -> &mut Frame {
        let i = self.frames.len() - 1;
        &mut self.frames[i]
    }

    pub fn open_group(&mut self, group_type: GroupType) {
        self.frames.push(Frame::new(group_type));
        log::debug!("entering {group_type:?} group at level {}", self.level());
    }

    /// Ends the innermost group and returns its frame.
    ///
    /// Returns an error if only the global group is open.
    pub fn close_group(&mut self) -> Result<Frame, ContextError> {
        if self.is_global_group() {
            return Err(ContextError::TooManyRightBraces);
        }
        let level = self.level();
        let frame = self.frames.pop().ok_or(ContextError::TooManyRightBraces)?;
        log::debug!("leaving {:?} group at level {level}", frame.group_type);
        Ok(frame)
    }

    /// Returns the current value of the register.
    pub fn get<R: Register>(&self, key: &R::Key) -> R::Value {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get::<R>(key))
            .cloned()
            .unwrap_or_else(|| R::initial_value(key))
    }

    /// Assigns the register.
    pub fn set<R: Register>(&mut self, key: R::Key, value: R::Value, scope: Scope) {
        log::trace!("{scope:?} assignment {}[{key:?}] = {value:?}", R::NAME);
        match scope {
            Scope::Local => {
                R::bindings_mut(&mut self.innermost_mut().bindings).insert(key, value);
            }
            Scope::Global => {
                for frame in &mut self.frames {
                    R::bindings_mut(&mut frame.bindings).insert(key.clone(), value.clone());
                }
            }
        }
    }

    /// Queues a token to be inserted after the innermost group ends.
    ///
    /// Tokens queued in the global group are never returned.
    pub fn after_group(&mut self, token: Token) {
        self.innermost_mut().after_group.push(token);
    }

    /// Iterates over the frames from the global group to the innermost group.
    pub fn frames(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter()
    }
}
