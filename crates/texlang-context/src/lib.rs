//! Dynamically scoped state for a TeX language interpreter
//!
//! TeX assignments are scoped by groups:
//!     a local assignment made inside a group is undone when the group ends,
//!     while a global assignment persists.
//! This crate stores every kind of register (counts, dimensions, category codes, macros, ...)
//!     in a single [`ScopeChain`] that implements these semantics,
//!     and wraps it in a [`ScopedContext`] that also holds the per-run state
//!     that is not scoped: the conditional stack, marks, the error count and the magnification.
//!
//! ```
//! use texlang_context::*;
//!
//! let mut context = ScopedContext::default();
//! context.open_group(GroupType::Simple);
//! context.set_catcode('@', CatCode::Letter, Scope::Local);
//! context.set::<Count>("pageno".into(), 3, Scope::Global);
//! context.close_group().unwrap();
//!
//! assert_eq!(context.catcode(&'@'), CatCode::Other);
//! assert_eq!(context.get::<Count>(&"pageno".into()), 3);
//! ```
//!
//! Register families are marker types implementing [`Register`];
//!     generic code can be written against the trait and used with any family.

mod catcode;
mod conditional;
mod config;
mod context;
mod error;
mod group;
mod marks;
mod observer;
mod register;
mod types;

pub use catcode::CatCode;
pub use conditional::{Conditional, ConditionalStack, Locator};
pub use config::Config;
pub use context::{AfterGroupAction, ScopedContext};
pub use error::ContextError;
pub use group::{Frame, ScopeChain};
pub use marks::DocumentRunState;
pub use observer::{LifecycleEvent, ObserverId, ObserverKey, Observers};
pub use register::*;
pub use types::*;
