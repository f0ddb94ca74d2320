use std::collections::{HashSet, VecDeque};

/// Default number of clean keys remembered.
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// Bounded, insertion-ordered set of item keys known to match no rule.
///
/// Eviction is FIFO: once full, adding a new key drops the oldest one.
/// Re-adding a present key does not refresh its position.
#[derive(Debug, Clone)]
pub struct CleanCache {
    capacity: usize,
    order: VecDeque<String>,
    members: HashSet<String>,
}

impl Default for CleanCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl CleanCache {
    /// A cache holding at most `capacity` keys. A zero capacity keeps nothing.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            order: VecDeque::with_capacity(capacity.min(DEFAULT_CACHE_CAPACITY)),
            members: HashSet::with_capacity(capacity.min(DEFAULT_CACHE_CAPACITY)),
        }
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.members.contains(key)
    }

    pub fn add(&mut self, key: &str) {
        if self.capacity == 0 || self.members.contains(key) {
            return;
        }
        while self.order.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.members.remove(&oldest);
                }
                None => break,
            }
        }
        self.order.push_back(key.to_owned());
        self.members.insert(key.to_owned());
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_contains() {
        let mut cache = CleanCache::default();
        assert!(!cache.contains("a"));
        cache.add("a");
        assert!(cache.contains("a"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.capacity(), DEFAULT_CACHE_CAPACITY);
    }

    #[test]
    fn evicts_oldest_first() {
        let mut cache = CleanCache::with_capacity(3);
        for key in ["a", "b", "c", "d"] {
            cache.add(key);
        }
        assert_eq!(cache.len(), 3);
        assert!(!cache.contains("a"));
        assert!(cache.contains("b") && cache.contains("c") && cache.contains("d"));
    }

    #[test]
    fn re_adding_does_not_reorder() {
        let mut cache = CleanCache::with_capacity(2);
        cache.add("a");
        cache.add("b");
        cache.add("a");
        cache.add("c");
        // "a" kept its original slot, so it is still the oldest.
        assert!(!cache.contains("a"));
        assert!(cache.contains("b"));
        assert!(cache.contains("c"));
    }

    #[test]
    fn clear_empties_everything() {
        let mut cache = CleanCache::with_capacity(4);
        cache.add("a");
        cache.add("b");
        cache.clear();
        assert!(cache.is_empty());
        assert!(!cache.contains("a"));
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut cache = CleanCache::with_capacity(0);
        cache.add("a");
        assert!(cache.is_empty());
    }

    #[test]
    fn default_capacity_overflow_by_one() {
        let mut cache = CleanCache::default();
        for i in 0..=DEFAULT_CACHE_CAPACITY {
            cache.add(&format!("k{i}"));
        }
        assert_eq!(cache.len(), DEFAULT_CACHE_CAPACITY);
        assert!(!cache.contains("k0"));
        assert!((1..=DEFAULT_CACHE_CAPACITY).all(|i| cache.contains(&format!("k{i}"))));
    }
}
