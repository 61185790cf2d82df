//! Frequency groups for O(1) LFU bookkeeping.
//!
//! Keeps one FIFO-ordered group of keys per access frequency plus a running
//! `min_freq` pointer, so the LFU victim is always the head of one known
//! group and no operation ever scans.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────────┐
//! │                       FrequencyGroups<K> Layout                       │
//! │                                                                       │
//! │  members: SlotArena<Member<K>>       groups: FxHashMap<u64, Group>    │
//! │  ┌──────┬─────────────────────┐      ┌──────┬──────────────────────┐  │
//! │  │ Slot │ Member              │      │ freq │ Group { head, tail } │  │
//! │  ├──────┼─────────────────────┤      ├──────┼──────────────────────┤  │
//! │  │ id_0 │ key: C, prev, next  │      │  1   │ head=id_0 tail=id_1  │  │
//! │  │ id_1 │ key: D, prev, next  │      │  2   │ head=id_3 tail=id_3  │  │
//! │  │ id_2 │ key: A, prev, next  │      │  3   │ head=id_2 tail=id_2  │  │
//! │  │ id_3 │ key: B, prev, next  │      └──────┴──────────────────────┘  │
//! │  └──────┴─────────────────────┘                                       │
//! │                                                                       │
//! │  min_freq = 1                                                         │
//! │                                                                       │
//! │  freq=1: head ──► [C] ◄──► [D] ◄── tail                               │
//! │                  oldest   newest                                      │
//! │                  (victim)                                             │
//! └───────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The owner (the LFU cache) keeps `key → SlotId`; this structure never
//! hashes keys, it only links slots. Each member records its own frequency,
//! so callers name a key by its slot alone. A `SlotId` stays valid until
//! `pop_min` removes its key; after that the slot may be reused by a later
//! `insert`.
//!
//! ## `min_freq` maintenance
//!
//! - `insert` always sets `min_freq = 1`: a new key has frequency 1, which
//!   cannot be above the true minimum.
//! - `promote` moves a key from its recorded `f` to `f + 1`. If that empties
//!   group `f` and `f == min_freq`, `min_freq` becomes `f + 1`. That group is
//!   non-empty because the promoted key was just appended to it, so no scan
//!   is needed.
//! - `pop_min` removes the head of the `min_freq` group. When that empties the
//!   group `min_freq` is left pointing at it; the caller inserts a new key
//!   immediately afterwards, which resets `min_freq` to 1.
//!
//! ## Operations
//!
//! | Operation   | Time | Notes                                        |
//! |-------------|------|----------------------------------------------|
//! | `insert`    | O(1) | Append to group 1                            |
//! | `promote`   | O(1) | Unlink from own `f`, append to `f + 1`       |
//! | `pop_min`   | O(1) | Head of the `min_freq` group                 |
//! | `peek_min`  | O(1) | Read-only victim lookup                      |
//! | `iter`      | O(n log g) | Diagnostic walk, groups sorted by frequency |

use rustc_hash::FxHashMap;

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::{InvariantError, ensure};

#[derive(Debug)]
struct Member<K> {
    key: K,
    freq: u64,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Group {
    head: Option<SlotId>,
    tail: Option<SlotId>,
    len: usize,
}

/// Per-frequency FIFO groups with an O(1) minimum-frequency pointer.
///
/// # Example
///
/// ```
/// use policy_cache::ds::FrequencyGroups;
///
/// let mut groups = FrequencyGroups::new();
/// let a = groups.insert("A");
/// let _b = groups.insert("B");
///
/// assert_eq!(groups.promote(a), Some(2));
/// assert_eq!(groups.frequency(a), Some(2));
/// assert_eq!(groups.min_freq(), Some(1));
/// assert_eq!(groups.peek_min(), Some(&"B"));
/// ```
#[derive(Debug)]
pub struct FrequencyGroups<K> {
    members: SlotArena<Member<K>>,
    groups: FxHashMap<u64, Group>,
    min_freq: u64,
}

impl<K> FrequencyGroups<K> {
    pub fn new() -> Self {
        Self {
            members: SlotArena::new(),
            groups: FxHashMap::default(),
            min_freq: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            members: SlotArena::with_capacity(capacity),
            groups: FxHashMap::default(),
            min_freq: 0,
        }
    }

    /// Number of tracked keys.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Number of non-empty frequency groups.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Smallest populated frequency; `None` while empty.
    pub fn min_freq(&self) -> Option<u64> {
        if self.is_empty() {
            None
        } else {
            Some(self.min_freq)
        }
    }

    /// Key stored in `slot`.
    pub fn key(&self, slot: SlotId) -> Option<&K> {
        self.members.get(slot).map(|member| &member.key)
    }

    /// Frequency recorded for the key in `slot`.
    pub fn frequency(&self, slot: SlotId) -> Option<u64> {
        self.members.get(slot).map(|member| member.freq)
    }

    /// Adds `key` at frequency 1 and returns its slot.
    pub fn insert(&mut self, key: K) -> SlotId {
        let slot = self.members.insert(Member {
            key,
            freq: 1,
            prev: None,
            next: None,
        });
        self.append(1, slot);
        self.min_freq = 1;
        slot
    }

    /// Moves the key in `slot` from its group to the next frequency up.
    ///
    /// Returns the new frequency, or `None` if `slot` holds no key. At
    /// `u64::MAX` the key is re-appended to its own group and the frequency
    /// is unchanged.
    pub fn promote(&mut self, slot: SlotId) -> Option<u64> {
        let freq = self.frequency(slot)?;
        if freq == u64::MAX {
            self.unlink(slot);
            self.append(freq, slot);
            return Some(freq);
        }

        if self.unlink(slot) {
            self.groups.remove(&freq);
            if freq == self.min_freq {
                self.min_freq += 1;
            }
        }

        let next = freq + 1;
        self.append(next, slot);
        Some(next)
    }

    /// Oldest key of the lowest group, without removing it.
    pub fn peek_min(&self) -> Option<&K> {
        let slot = self.groups.get(&self.min_freq)?.head?;
        self.key(slot)
    }

    /// Removes and returns the oldest key of the lowest group.
    ///
    /// Only used right before an `insert`; see the module docs for why
    /// `min_freq` is not advanced here.
    pub(crate) fn pop_min(&mut self) -> Option<K> {
        let freq = self.min_freq;
        let slot = self.groups.get(&freq)?.head?;
        if self.unlink(slot) {
            self.groups.remove(&freq);
        }
        let member = self.members.remove(slot)?;
        if self.members.is_empty() {
            self.min_freq = 0;
        }
        Some(member.key)
    }

    /// Keys at `freq`, oldest first.
    pub fn group(&self, freq: u64) -> GroupIter<'_, K> {
        GroupIter {
            members: &self.members,
            current: self.groups.get(&freq).and_then(|group| group.head),
        }
    }

    /// `(key, frequency)` pairs in eviction order: ascending frequency, then
    /// oldest first within each group.
    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> {
        let mut freqs: Vec<u64> = self.groups.keys().copied().collect();
        freqs.sort_unstable();
        freqs
            .into_iter()
            .flat_map(move |freq| self.group(freq).map(move |key| (key, freq)))
    }

    pub fn clear(&mut self) {
        self.members.clear();
        self.groups.clear();
        self.min_freq = 0;
    }

    /// Appends `slot` at the tail of group `freq`, creating the group.
    fn append(&mut self, freq: u64, slot: SlotId) {
        let group = self.groups.entry(freq).or_default();
        let old_tail = group.tail;
        group.tail = Some(slot);
        if group.head.is_none() {
            group.head = Some(slot);
        }
        group.len += 1;

        if let Some(tail) = old_tail
            && let Some(member) = self.members.get_mut(tail)
        {
            member.next = Some(slot);
        }
        if let Some(member) = self.members.get_mut(slot) {
            member.freq = freq;
            member.prev = old_tail;
            member.next = None;
        }
    }

    /// Unlinks `slot` from its group; returns `true` if the group is now empty.
    ///
    /// The group entry itself is left in place for the caller to drop.
    fn unlink(&mut self, slot: SlotId) -> bool {
        let (freq, prev, next) = match self.members.get_mut(slot) {
            Some(member) => (member.freq, member.prev.take(), member.next.take()),
            None => return false,
        };

        if let Some(prev) = prev
            && let Some(member) = self.members.get_mut(prev)
        {
            member.next = next;
        }
        if let Some(next) = next
            && let Some(member) = self.members.get_mut(next)
        {
            member.prev = prev;
        }

        match self.groups.get_mut(&freq) {
            Some(group) => {
                if group.head == Some(slot) {
                    group.head = next;
                }
                if group.tail == Some(slot) {
                    group.tail = prev;
                }
                group.len = group.len.saturating_sub(1);
                group.len == 0
            },
            None => false,
        }
    }

    /// Checks group links, group sizes and the `min_freq` pointer.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.is_empty() {
            return ensure(self.groups.is_empty(), || {
                format!("{} groups left with no members", self.groups.len())
            });
        }

        let lowest = self.groups.keys().copied().min();
        ensure(lowest == Some(self.min_freq), || {
            format!("min_freq is {} but lowest group is {:?}", self.min_freq, lowest)
        })?;

        let mut total = 0usize;
        for (&freq, group) in &self.groups {
            ensure(group.len > 0, || format!("group {} is empty", freq))?;

            let mut count = 0usize;
            let mut prev = None;
            let mut current = group.head;
            while let Some(slot) = current {
                let member = self.members.get(slot).ok_or_else(|| {
                    InvariantError::new(format!("group {} links a vacant slot", freq))
                })?;
                ensure(member.freq == freq, || {
                    format!("group {} links a key recorded at {}", freq, member.freq)
                })?;
                ensure(member.prev == prev, || {
                    format!("group {} has a broken back link", freq)
                })?;
                prev = Some(slot);
                current = member.next;
                count += 1;
                ensure(count <= group.len, || format!("group {} has a cycle", freq))?;
            }
            ensure(group.tail == prev, || {
                format!("group {} tail does not end its list", freq)
            })?;
            ensure(count == group.len, || {
                format!("group {} holds {} keys but records {}", freq, count, group.len)
            })?;
            total += count;
        }

        ensure(total == self.members.len(), || {
            format!("groups hold {} keys but {} are tracked", total, self.members.len())
        })
    }
}

impl<K> Default for FrequencyGroups<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over one frequency group, oldest key first.
pub struct GroupIter<'a, K> {
    members: &'a SlotArena<Member<K>>,
    current: Option<SlotId>,
}

impl<'a, K> Iterator for GroupIter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.current?;
        let member = self.members.get(slot)?;
        self.current = member.next;
        Some(&member.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group_keys<K: Copy>(groups: &FrequencyGroups<K>, freq: u64) -> Vec<K> {
        groups.group(freq).copied().collect()
    }

    mod basic_operations {
        use super::*;

        #[test]
        fn new_is_empty() {
            let groups: FrequencyGroups<u32> = FrequencyGroups::new();
            assert!(groups.is_empty());
            assert_eq!(groups.min_freq(), None);
            assert_eq!(groups.peek_min(), None);
            groups.check_invariants().unwrap();
        }

        #[test]
        fn insert_appends_to_group_one() {
            let mut groups = FrequencyGroups::with_capacity(4);
            let a = groups.insert('a');
            groups.insert('b');
            groups.insert('c');

            assert_eq!(groups.len(), 3);
            assert_eq!(groups.key(a), Some(&'a'));
            assert_eq!(group_keys(&groups, 1), vec!['a', 'b', 'c']);
            assert_eq!(groups.min_freq(), Some(1));
            groups.check_invariants().unwrap();
        }

        #[test]
        fn promote_moves_to_next_group_tail() {
            let mut groups = FrequencyGroups::new();
            let a = groups.insert('a');
            let b = groups.insert('b');

            assert_eq!(groups.promote(b), Some(2));
            assert_eq!(groups.promote(a), Some(2));
            assert_eq!(group_keys(&groups, 1), Vec::<char>::new());
            assert_eq!(group_keys(&groups, 2), vec!['b', 'a']);
            assert_eq!(groups.group_count(), 1);
            groups.check_invariants().unwrap();
        }
    }

    mod min_freq_tracking {
        use super::*;

        #[test]
        fn emptying_min_group_advances_by_one() {
            let mut groups = FrequencyGroups::new();
            let a = groups.insert("a");

            assert_eq!(groups.promote(a), Some(2));
            assert_eq!(groups.min_freq(), Some(2));
            assert_eq!(groups.promote(a), Some(3));
            assert_eq!(groups.min_freq(), Some(3));
            groups.check_invariants().unwrap();
        }

        #[test]
        fn emptying_higher_group_keeps_min() {
            let mut groups = FrequencyGroups::new();
            let a = groups.insert("a");
            groups.insert("b");

            groups.promote(a);
            groups.promote(a);
            assert_eq!(groups.min_freq(), Some(1));
            assert_eq!(group_keys(&groups, 3), vec!["a"]);
            groups.check_invariants().unwrap();
        }

        #[test]
        fn insert_resets_min_to_one() {
            let mut groups = FrequencyGroups::new();
            let a = groups.insert("a");
            groups.promote(a);
            groups.promote(a);
            assert_eq!(groups.min_freq(), Some(3));

            groups.insert("b");
            assert_eq!(groups.min_freq(), Some(1));
            assert_eq!(groups.peek_min(), Some(&"b"));
            groups.check_invariants().unwrap();
        }
    }

    mod eviction {
        use super::*;

        #[test]
        fn pop_min_takes_oldest_of_lowest_group() {
            let mut groups = FrequencyGroups::new();
            let a = groups.insert("A");
            let b = groups.insert("B");
            groups.insert("C");
            groups.insert("D");

            groups.promote(a);
            groups.promote(a);
            groups.promote(b);

            assert_eq!(groups.peek_min(), Some(&"C"));
            assert_eq!(groups.pop_min(), Some("C"));
            assert_eq!(group_keys(&groups, 1), vec!["D"]);
            groups.check_invariants().unwrap();
        }

        #[test]
        fn pop_then_insert_restores_min() {
            let mut groups = FrequencyGroups::new();
            let a = groups.insert("A");
            let b = groups.insert("B");
            groups.promote(a);
            groups.promote(b);
            // groups: 2 → [A, B]
            assert_eq!(groups.min_freq(), Some(2));

            assert_eq!(groups.pop_min(), Some("A"));
            groups.insert("C");
            assert_eq!(groups.min_freq(), Some(1));
            assert_eq!(group_keys(&groups, 2), vec!["B"]);
            groups.check_invariants().unwrap();
        }

        #[test]
        fn pop_last_member_empties_structure() {
            let mut groups = FrequencyGroups::new();
            groups.insert(1u8);
            assert_eq!(groups.pop_min(), Some(1));
            assert!(groups.is_empty());
            assert_eq!(groups.min_freq(), None);
            assert_eq!(groups.pop_min(), None);
            groups.check_invariants().unwrap();
        }

        #[test]
        fn iter_follows_eviction_order() {
            let mut groups = FrequencyGroups::new();
            let a = groups.insert('a');
            groups.insert('b');
            let c = groups.insert('c');
            groups.promote(c);
            groups.promote(a);
            groups.promote(a);

            let order: Vec<_> = groups.iter().map(|(k, f)| (*k, f)).collect();
            assert_eq!(order, vec![('b', 1), ('c', 2), ('a', 3)]);

            groups.clear();
            assert!(groups.is_empty());
            assert_eq!(groups.iter().count(), 0);
        }
    }

    mod slot_handles {
        use super::*;

        #[test]
        fn promote_of_popped_slot_is_rejected() {
            let mut groups = FrequencyGroups::new();
            let a = groups.insert("a");
            groups.insert("b");

            assert_eq!(groups.pop_min(), Some("a"));
            assert_eq!(groups.promote(a), None);
            assert_eq!(groups.frequency(a), None);
            assert_eq!(group_keys(&groups, 1), vec!["b"]);
            groups.check_invariants().unwrap();
        }

        #[test]
        fn promote_follows_recorded_frequency() {
            let mut groups = FrequencyGroups::new();
            let x = groups.insert("x");
            let y = groups.insert("y");

            assert_eq!(groups.promote(x), Some(2));
            assert_eq!(groups.promote(x), Some(3));
            assert_eq!(groups.frequency(x), Some(3));
            assert_eq!(groups.frequency(y), Some(1));
            assert_eq!(group_keys(&groups, 1), vec!["y"]);
            assert_eq!(group_keys(&groups, 3), vec!["x"]);
            assert_eq!(groups.group_count(), 2);
            groups.check_invariants().unwrap();
        }

        #[test]
        fn promote_saturates_at_max_frequency() {
            let mut groups = FrequencyGroups::new();
            let a = groups.insert("a");
            let b = groups.insert("b");
            groups.unlink(a);
            groups.append(u64::MAX, a);

            assert_eq!(groups.promote(a), Some(u64::MAX));
            assert_eq!(groups.promote(b), Some(2));
            assert_eq!(group_keys(&groups, u64::MAX), vec!["a"]);
            assert_eq!(groups.min_freq(), Some(2));
            groups.check_invariants().unwrap();
        }
    }
}
