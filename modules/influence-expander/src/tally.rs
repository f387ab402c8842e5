use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Accumulates, per key, the set of distinct members seen with it.
///
/// Keys remember the order they were first seen in, so ranking by set size
/// breaks ties the same way on every run over the same input.
pub(crate) struct Tally<K, M> {
    order: Vec<K>,
    members: HashMap<K, HashSet<M>>,
}

impl<K, M> Tally<K, M>
where
    K: Copy + Eq + Hash,
    M: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            members: HashMap::new(),
        }
    }

    pub fn add(&mut self, key: K, member: M) {
        match self.members.entry(key) {
            Entry::Occupied(mut e) => {
                e.get_mut().insert(member);
            }
            Entry::Vacant(e) => {
                self.order.push(key);
                e.insert(HashSet::from([member]));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Keys with their distinct-member counts, largest first, truncated to `limit`.
    pub fn top(self, limit: usize) -> Vec<(K, usize)> {
        let Self { order, members } = self;
        let mut ranked: Vec<(K, usize)> = order
            .into_iter()
            .map(|k| {
                let count = members.get(&k).map_or(0, HashSet::len);
                (k, count)
            })
            .collect();
        // sort_by is stable: equal counts stay in first-seen order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(limit);
        ranked
    }
}
