//! Per-key fan-out lifecycle for `multiplex` templates.
//!
//! A `multiplex` node tells the engine to instantiate its first child as
//! an independent template copy per distinct key observed on the id
//! source. Instance storage and evaluation belong to the engine;
//! [`KeyedFanout`] is the pure bookkeeping half of that contract: it
//! answers, for each incoming key, whether to spawn a fresh instance or
//! route to an existing one, and discards a key's instance on its
//! end-of-stream signal. A key that reappears after end-of-stream starts
//! over with no memory of its previous instance.
use log::debug;
use std::collections::HashSet;
use std::hash::Hash;

/// Outcome of presenting an event key to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    /// First observation of the key: spawn a fresh template instance.
    Spawned,
    /// Key already active: route the event to its existing instance.
    Routed,
}

/// Tracks which multiplex keys currently have a live template instance.
#[derive(Debug, Clone)]
pub struct KeyedFanout<K> {
    active: HashSet<K>,
}

impl<K: Eq + Hash> KeyedFanout<K> {
    pub fn new() -> Self {
        KeyedFanout {
            active: HashSet::new(),
        }
    }

    /// Present an event's key. Absent keys become active and must be given
    /// a fresh instance; active keys keep their instance.
    pub fn observe(&mut self, key: K) -> KeyEvent {
        if self.active.insert(key) {
            debug!("fan-out: spawned instance ({} active)", self.active.len());
            KeyEvent::Spawned
        } else {
            KeyEvent::Routed
        }
    }

    /// End-of-stream for `key`: discard its instance state. Returns
    /// whether an instance was actually active.
    pub fn end_of_stream(&mut self, key: &K) -> bool {
        let discarded = self.active.remove(key);
        if discarded {
            debug!(
                "fan-out: discarded instance ({} active)",
                self.active.len()
            );
        }
        discarded
    }

    pub fn is_active(&self, key: &K) -> bool {
        self.active.contains(key)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

impl<K: Eq + Hash> Default for KeyedFanout<K> {
    fn default() -> Self {
        KeyedFanout::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_observation_spawns_then_routes() {
        let mut fanout = KeyedFanout::new();
        assert_eq!(fanout.observe(7), KeyEvent::Spawned);
        assert_eq!(fanout.observe(7), KeyEvent::Routed);
        assert_eq!(fanout.observe(9), KeyEvent::Spawned);
        assert_eq!(fanout.active_count(), 2);
    }

    #[test]
    fn end_of_stream_discards_only_the_signaled_key() {
        let mut fanout = KeyedFanout::new();
        fanout.observe("a");
        fanout.observe("b");
        assert!(fanout.end_of_stream(&"a"));
        assert!(!fanout.is_active(&"a"));
        assert!(fanout.is_active(&"b"));
        // A key with no live instance has nothing to discard.
        assert!(!fanout.end_of_stream(&"a"));
    }

    #[test]
    fn reappearing_key_starts_a_memoryless_instance() {
        let mut fanout = KeyedFanout::new();
        assert_eq!(fanout.observe(3), KeyEvent::Spawned);
        assert!(fanout.end_of_stream(&3));
        assert_eq!(fanout.observe(3), KeyEvent::Spawned);
        assert_eq!(fanout.active_count(), 1);
    }
}
