//! Change observers
//!
//! Observers are callbacks invoked after a register is assigned.
//! An observer is registered either for one register of a family
//!     or for every register of the family.
//! When a register is assigned, the observers for that register run first
//!     and then the observers for the whole family, each in registration order.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use crate::conditional::Conditional;
use crate::register::{Register, Scope};
use crate::types::GroupType;

/// Which registers of a family an observer is notified about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObserverKey<K> {
    Named(K),
    Any,
}

/// Handle used to unregister an observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

/// A change to the structure of the context, rather than to a register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    GroupOpened { level: usize, group_type: GroupType },
    GroupClosed { level: usize, group_type: GroupType },
    ConditionalPushed(Conditional),
    ConditionalPopped(Conditional),
}

type Callback<R> = Box<dyn FnMut(&<R as Register>::Key, &<R as Register>::Value, Scope)>;

struct FamilyObservers<R: Register> {
    named: HashMap<R::Key, Vec<(ObserverId, Callback<R>)>>,
    any: Vec<(ObserverId, Callback<R>)>,
}

impl<R: Register> Default for FamilyObservers<R> {
    fn default() -> Self {
        FamilyObservers {
            named: Default::default(),
            any: Default::default(),
        }
    }
}

/// All observers registered with a context.
#[derive(Default)]
pub struct Observers {
    next_id: u64,
    families: HashMap<TypeId, Box<dyn Any>>,
    lifecycle: Vec<(ObserverId, Box<dyn FnMut(&LifecycleEvent)>)>,
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("next_id", &self.next_id)
            .field("families", &self.families.len())
            .field("lifecycle", &self.lifecycle.len())
            .finish()
    }
}

impl Observers {
    fn new_id(&mut self) -> ObserverId {
        self.next_id += 1;
        ObserverId(self.next_id)
    }

    fn family<R: Register>(&self) -> Option<&FamilyObservers<R>> {
        self.families.get(&TypeId::of::<R>())?.downcast_ref()
    }

    fn family_mut<R: Register>(&mut self) -> Option<&mut FamilyObservers<R>> {
        self.families.get_mut(&TypeId::of::<R>())?.downcast_mut()
    }

    fn family_or_insert<R: Register>(&mut self) -> Option<&mut FamilyObservers<R>> {
        self.families
            .entry(TypeId::of::<R>())
            .or_insert_with(|| Box::<FamilyObservers<R>>::default())
            .downcast_mut()
    }

    pub fn register<R, F>(&mut self, key: ObserverKey<R::Key>, callback: F) -> ObserverId
    where
        R: Register,
        F: FnMut(&R::Key, &R::Value, Scope) + 'static,
    {
        let id = self.new_id();
        if let Some(family) = self.family_or_insert::<R>() {
            let entry = (id, Box::new(callback) as Callback<R>);
            match key {
                ObserverKey::Named(key) => family.named.entry(key).or_default().push(entry),
                ObserverKey::Any => family.any.push(entry),
            }
        }
        id
    }

    /// Removes the observer; returns false if no such observer is registered for the family.
    pub fn unregister<R: Register>(&mut self, id: ObserverId) -> bool {
        let Some(family) = self.family_mut::<R>() else {
            return false;
        };
        let mut removed = false;
        for observers in family.named.values_mut().chain(std::iter::once(&mut family.any)) {
            let before = observers.len();
            observers.retain(|(other, _)| *other != id);
            removed |= observers.len() != before;
        }
        family.named.retain(|_, observers| !observers.is_empty());
        removed
    }

    /// Number of observers that would be notified about an assignment to the register.
    pub fn len<R: Register>(&self, key: &R::Key) -> usize {
        self.family::<R>().map_or(0, |family| {
            family.named.get(key).map_or(0, Vec::len) + family.any.len()
        })
    }

    pub(crate) fn notify<R: Register>(&mut self, key: &R::Key, value: &R::Value, scope: Scope) {
        let Some(family) = self.family_mut::<R>() else {
            return;
        };
        if let Some(observers) = family.named.get_mut(key) {
            for (_, callback) in observers {
                callback(key, value, scope);
            }
        }
        for (_, callback) in &mut family.any {
            callback(key, value, scope);
        }
    }

    pub fn register_lifecycle<F>(&mut self, callback: F) -> ObserverId
    where
        F: FnMut(&LifecycleEvent) + 'static,
    {
        let id = self.new_id();
        self.lifecycle.push((id, Box::new(callback)));
        id
    }

    pub fn unregister_lifecycle(&mut self, id: ObserverId) -> bool {
        let before = self.lifecycle.len();
        self.lifecycle.retain(|(other, _)| *other != id);
        self.lifecycle.len() != before
    }

    pub(crate) fn notify_lifecycle(&mut self, event: &LifecycleEvent) {
        for (_, callback) in &mut self.lifecycle {
            callback(event);
        }
    }
}
