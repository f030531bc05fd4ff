//! Handle table for mounted child components
//!
//! A composite component keeps references to its mounted children in a
//! [`HandleMap`] keyed by a small enum of logical child names. Entries are
//! written by the mount/unmount lifecycle and read by the component's public
//! operations. A missing entry is a normal state (not yet mounted, or torn
//! down), so lookups return `Option` and callers treat `None` as a no-op.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Logical name of a child slot
pub trait ChildName: Copy + Eq + Hash + Debug {}

impl<T: Copy + Eq + Hash + Debug> ChildName for T {}

/// Table of live child handles
pub struct HandleMap<K: ChildName, H> {
    slots: HashMap<K, H>,
}

impl<K: ChildName, H> Default for HandleMap<K, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ChildName, H> HandleMap<K, H> {
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    /// Store a handle for a freshly mounted child, returning any handle it replaced
    pub fn mount(&mut self, name: K, handle: H) -> Option<H> {
        tracing::debug!(child = ?name, "child mounted");
        self.slots.insert(name, handle)
    }

    /// Remove a child's handle on teardown
    pub fn unmount(&mut self, name: K) -> Option<H> {
        let handle = self.slots.remove(&name);
        if handle.is_some() {
            tracing::debug!(child = ?name, "child unmounted");
        }
        handle
    }

    /// Remove every handle
    pub fn clear(&mut self) {
        for name in self.slots.keys() {
            tracing::debug!(child = ?name, "child unmounted");
        }
        self.slots.clear();
    }

    pub fn is_mounted(&self, name: K) -> bool {
        self.slots.contains_key(&name)
    }

    pub fn get(&self, name: K) -> Option<&H> {
        self.slots.get(&name)
    }

    pub fn get_mut(&mut self, name: K) -> Option<&mut H> {
        self.slots.get_mut(&name)
    }

    /// Get the handle for `name`, mounting one built by `init` if absent
    pub fn get_or_mount(&mut self, name: K, init: impl FnOnce() -> H) -> &mut H {
        self.slots.entry(name).or_insert_with(|| {
            tracing::debug!(child = ?name, "child mounted");
            init()
        })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Slot {
        Input,
        List,
    }

    #[test]
    fn test_mount_and_lookup() {
        let mut handles = HandleMap::new();
        assert!(handles.mount(Slot::Input, 1).is_none());
        assert_eq!(handles.get(Slot::Input), Some(&1));
        assert!(handles.get(Slot::List).is_none());
        assert!(handles.is_mounted(Slot::Input));
    }

    #[test]
    fn test_remount_returns_previous() {
        let mut handles = HandleMap::new();
        handles.mount(Slot::Input, 1);
        assert_eq!(handles.mount(Slot::Input, 2), Some(1));
        assert_eq!(handles.len(), 1);
    }

    #[test]
    fn test_get_mut_absent_is_none() {
        let mut handles: HandleMap<Slot, i32> = HandleMap::new();
        assert!(handles.get_mut(Slot::List).is_none());

        handles.mount(Slot::List, 1);
        if let Some(v) = handles.get_mut(Slot::List) {
            *v += 1;
        }
        assert_eq!(handles.get(Slot::List), Some(&2));
    }

    #[test]
    fn test_unmount_and_clear() {
        let mut handles = HandleMap::new();
        handles.mount(Slot::Input, "a");
        handles.mount(Slot::List, "b");

        assert_eq!(handles.unmount(Slot::Input), Some("a"));
        assert_eq!(handles.unmount(Slot::Input), None);

        handles.clear();
        assert!(handles.is_empty());
    }

    #[test]
    fn test_get_or_mount_keeps_existing() {
        let mut handles = HandleMap::new();
        *handles.get_or_mount(Slot::List, || 5) += 1;
        *handles.get_or_mount(Slot::List, || 100) += 1;
        assert_eq!(handles.get(Slot::List), Some(&7));
    }
}
