// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

/// A single integer read and replaced only through atomic load and store.
///
/// There is no read-modify-write: concurrent stores race and the last one
/// wins, and a load always sees some complete stored value.
#[derive(Debug, Default)]
pub struct Counter(AtomicI32);

impl Counter {
    pub fn new(value: i32) -> Self {
        Self(AtomicI32::new(value))
    }

    pub fn load(&self) -> i32 {
        self.0.load(Ordering::SeqCst)
    }

    pub fn store(&self, value: i32) {
        self.0.store(value, Ordering::SeqCst);
    }
}

/// Counter storage for one mount, kept in the superblock's private data
/// so independent mounts never share a value.
#[derive(Debug)]
pub struct CounterStore {
    counter: Arc<Counter>,
    bar: Arc<Counter>,
}

impl CounterStore {
    pub fn new(initial: i32) -> Self {
        Self {
            counter: Arc::new(Counter::default()),
            bar: Arc::new(Counter::new(initial)),
        }
    }

    /// The counter served by the mount's counter file.
    pub fn bar(&self) -> &Arc<Counter> {
        &self.bar
    }

    /// Spare counter with no file bound to it.
    pub fn counter(&self) -> &Arc<Counter> {
        &self.counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_replaces() {
        let c = Counter::new(7);
        assert_eq!(c.load(), 7);
        c.store(-3);
        assert_eq!(c.load(), -3);
    }

    #[test]
    fn test_store_counters_are_distinct() {
        let store = CounterStore::new(5);
        assert_eq!(store.bar().load(), 5);
        assert_eq!(store.counter().load(), 0);
        store.bar().store(9);
        assert_eq!(store.counter().load(), 0);
        assert!(!Arc::ptr_eq(store.bar(), store.counter()));
    }
}
