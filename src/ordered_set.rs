//! An insertion-ordered set of strings.
//!
//! Used by the three-way merge to compute added, removed and moved patches
//! while keeping the order in which names appear in the series. Elements
//! live in a vector; a hash map from element to slot gives O(1) membership
//! tests. Removal leaves a hole that iteration skips.

use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct OrderedSet {
    slots: Vec<Option<String>>,
    positions: HashMap<String, usize>,
}

impl OrderedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `key` at the end unless it is already present.
    pub fn insert(&mut self, key: impl Into<String>) -> bool {
        let key = key.into();
        if self.positions.contains_key(&key) {
            return false;
        }
        self.positions.insert(key.clone(), self.slots.len());
        self.slots.push(Some(key));
        true
    }

    pub fn remove(&mut self, key: &str) -> bool {
        match self.positions.remove(key) {
            Some(pos) => {
                self.slots[pos] = None;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().filter_map(|s| s.as_deref())
    }

    /// Elements of `self` not in `other`, in `self`'s order.
    pub fn difference(&self, other: &OrderedSet) -> OrderedSet {
        self.iter().filter(|k| !other.contains(k)).collect()
    }

    /// Elements of `self` also in `other`, in `self`'s order.
    pub fn intersection(&self, other: &OrderedSet) -> OrderedSet {
        self.iter().filter(|k| other.contains(k)).collect()
    }

    /// Elements of `self` followed by the new elements of `other`.
    pub fn union(&self, other: &OrderedSet) -> OrderedSet {
        self.iter().chain(other.iter()).collect()
    }
}

impl<S: Into<String>> FromIterator<S> for OrderedSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = OrderedSet::new();
        for key in iter {
            set.insert(key);
        }
        set
    }
}

impl PartialEq for OrderedSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for OrderedSet {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_first_position() {
        let mut set = OrderedSet::new();
        assert!(set.insert("b"));
        assert!(set.insert("a"));
        assert!(!set.insert("b"));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_remove_and_reinsert_moves_to_end() {
        let mut set: OrderedSet = ["a", "b", "c"].into_iter().collect();
        assert!(set.remove("a"));
        assert!(!set.remove("a"));
        set.insert("a");
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_set_operations_keep_order() {
        let base: OrderedSet = ["p1", "p2", "p3"].into_iter().collect();
        let remote: OrderedSet = ["p3", "p4", "p1"].into_iter().collect();

        let added = remote.difference(&base);
        let removed = base.difference(&remote);
        assert_eq!(added.iter().collect::<Vec<_>>(), vec!["p4"]);
        assert_eq!(removed.iter().collect::<Vec<_>>(), vec!["p2"]);
        assert_eq!(
            remote.intersection(&base).iter().collect::<Vec<_>>(),
            vec!["p3", "p1"]
        );
        assert_eq!(
            added.union(&removed).iter().collect::<Vec<_>>(),
            vec!["p4", "p2"]
        );
    }

    #[test]
    fn test_equality_is_order_sensitive() {
        let a: OrderedSet = ["x", "y"].into_iter().collect();
        let b: OrderedSet = ["y", "x"].into_iter().collect();
        assert_ne!(a, b);
        assert_eq!(a, ["x", "y"].into_iter().collect::<OrderedSet>());
    }
}
