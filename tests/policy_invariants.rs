// ==============================================
// CROSS-POLICY INVARIANT TESTS (integration)
// ==============================================
//
// Behavior every policy must share, plus the eviction scenarios that tell the
// policies apart. Each policy is also checked against a small scan-based
// model under random operation sequences.

use policy_cache::prelude::*;

fn filled(policy: CachePolicy, log: &DiscardLog<&'static str>) -> Cache<&'static str, &'static str> {
    let mut cache = CacheBuilder::default()
        .build(policy)
        .with_listener(log.clone());
    cache.put(Some("A"), Some("Hello"));
    cache.put(Some("B"), Some("World"));
    cache.put(Some("C"), Some("Holberton"));
    cache.put(Some("D"), Some("School"));
    cache
}

// ==============================================
// Shared Contract
// ==============================================

mod shared_contract {
    use super::*;

    #[test]
    fn size_never_exceeds_max_items() {
        for policy in CachePolicy::ALL {
            let log = DiscardLog::new();
            let mut cache = filled(policy, &log);
            for key in ["E", "F", "G", "H", "I"] {
                cache.put(Some(key), Some("x"));
                assert_eq!(cache.len(), MAX_ITEMS, "{policy}");
                assert!(cache.is_full());
            }
            assert_eq!(log.len(), 5, "{policy} should discard once per overflow");
        }
    }

    #[test]
    fn absent_key_or_value_changes_nothing() {
        for policy in CachePolicy::ALL {
            let log = DiscardLog::new();
            let mut cache = filled(policy, &log);
            let before: Vec<_> = cache.entries().into_iter().map(|(k, _)| *k).collect();

            assert_eq!(cache.put(None, Some("x")), None);
            assert_eq!(cache.put(Some("E"), None), None);
            assert_eq!(cache.put(None, None), None);
            assert_eq!(cache.lookup(None), None);

            let after: Vec<_> = cache.entries().into_iter().map(|(k, _)| *k).collect();
            assert_eq!(before, after, "{policy}");
            assert!(log.is_empty(), "{policy}");
        }
    }

    #[test]
    fn update_of_present_key_never_evicts() {
        for policy in CachePolicy::ALL {
            let log = DiscardLog::new();
            let mut cache = filled(policy, &log);
            assert_eq!(cache.put(Some("B"), Some("Updated")), None);
            assert_eq!(cache.len(), MAX_ITEMS);
            assert_eq!(cache.get(&"B"), Some(&"Updated"), "{policy}");
            assert!(log.is_empty(), "{policy}");
        }
    }

    #[test]
    fn is_full_tracks_size() {
        for policy in CachePolicy::ALL {
            let mut cache = CacheBuilder::default().build::<u8, u8>(policy);
            for key in 0..MAX_ITEMS as u8 {
                assert!(!cache.is_full());
                cache.insert(key, key);
            }
            assert!(cache.is_full());
        }
    }

    #[test]
    fn zero_capacity_rejects_inserts() {
        for policy in CachePolicy::ALL {
            let mut cache = CacheBuilder::new(0).build::<u8, u8>(policy);
            assert_eq!(cache.insert(1, 1), None);
            assert_eq!(cache.len(), 0, "{policy} with capacity 0 should store nothing");
        }
    }

    #[test]
    fn render_lists_entries_by_key() {
        let log = DiscardLog::new();
        let cache = filled(CachePolicy::Lifo, &log);
        assert_eq!(
            render(&cache),
            "Current cache:\nA: Hello\nB: World\nC: Holberton\nD: School\n"
        );
    }
}

// ==============================================
// Distinguishing Scenarios
// ==============================================

mod scenarios {
    use super::*;

    #[test]
    fn fifo_discards_oldest() {
        let log = DiscardLog::new();
        let mut cache = filled(CachePolicy::Fifo, &log);
        cache.get(&"A");
        cache.put(Some("E"), Some("Battery"));
        assert_eq!(log.lines(), vec!["DISCARD: A"]);
    }

    #[test]
    fn lifo_discards_newest() {
        let log = DiscardLog::new();
        let mut cache = filled(CachePolicy::Lifo, &log);
        cache.put(Some("E"), Some("Battery"));
        assert_eq!(log.lines(), vec!["DISCARD: D"]);
    }

    #[test]
    fn lifo_discards_reinserted_key() {
        let log = DiscardLog::new();
        let mut cache = filled(CachePolicy::Lifo, &log);
        cache.put(Some("C"), Some("Again"));
        cache.put(Some("E"), Some("Battery"));
        assert_eq!(log.lines(), vec!["DISCARD: C"]);
    }

    #[test]
    fn lru_discards_least_recently_touched() {
        let log = DiscardLog::new();
        let mut cache = filled(CachePolicy::Lru, &log);
        cache.get(&"A");
        cache.put(Some("E"), Some("Battery"));
        assert_eq!(log.lines(), vec!["DISCARD: B"]);
    }

    #[test]
    fn lfu_discards_least_frequent() {
        let log = DiscardLog::new();
        let mut cache = filled(CachePolicy::Lfu, &log);
        cache.get(&"A");
        cache.get(&"A");
        cache.get(&"B");
        cache.get(&"D");
        cache.put(Some("E"), Some("Battery"));
        assert_eq!(log.lines(), vec!["DISCARD: C"]);

        let lfu = cache.as_lfu().unwrap();
        assert_eq!(lfu.frequency(&"A"), Some(3));
        assert_eq!(lfu.frequency(&"E"), Some(1));
        assert_eq!(lfu.min_frequency(), Some(1));
    }

    #[test]
    fn lfu_reput_counts_as_use() {
        let log = DiscardLog::new();
        let mut cache = filled(CachePolicy::Lfu, &log);
        cache.put(Some("A"), Some("Bonjour"));
        cache.put(Some("E"), Some("Battery"));
        assert_eq!(log.lines(), vec!["DISCARD: B"]);
        assert_eq!(cache.peek(&"A"), Some(&"Bonjour"));
    }
}

// ==============================================
// Discard Logging
// ==============================================

mod discard_logging {
    use std::io;
    use std::sync::Arc;

    use parking_lot::Mutex;
    use tracing_subscriber::EnvFilter;

    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Runs `f` under a fmt subscriber and returns everything it logged.
    fn capture_discards(f: impl FnOnce()) -> String {
        let buf = SharedBuf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("policy_cache::discard=info"))
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .without_time()
            .finish();

        tracing::subscriber::with_default(subscriber, f);
        String::from_utf8(buf.0.lock().clone()).unwrap()
    }

    #[test]
    fn every_eviction_emits_one_discard_event() {
        let output = capture_discards(|| {
            let mut cache = CacheBuilder::new(2).build::<u32, u32>(CachePolicy::Fifo);
            cache.insert(1, 10);
            cache.insert(2, 20);
            cache.insert(3, 30);
            cache.insert(4, 40);
        });

        let discards: Vec<_> = output.lines().filter(|l| l.contains("DISCARD:")).collect();
        assert_eq!(discards.len(), 2, "{output}");
        assert!(discards[0].contains("DISCARD: 1"));
        assert!(discards[1].contains("DISCARD: 2"));
        assert!(discards[0].contains("policy=\"fifo\""));
    }

    #[test]
    fn string_keys_are_logged_in_debug_form() {
        let log = DiscardLog::new();
        let output = capture_discards(|| {
            let mut cache = CacheBuilder::new(1)
                .build::<&str, u8>(CachePolicy::Lru)
                .with_listener(log.clone());
            cache.insert("A", 1);
            cache.insert("B", 2);
        });

        let line = output
            .lines()
            .find(|l| l.contains("DISCARD:"))
            .unwrap_or_default();
        assert!(line.contains("DISCARD: \"A\""), "{output}");
        assert!(line.contains("key=\"A\""), "{output}");
        assert!(line.contains("policy=\"lru\""), "{output}");
        assert_eq!(log.lines(), vec!["DISCARD: A"]);
    }
}

// ==============================================
// External Synchronization
// ==============================================

mod shared_access {
    use std::sync::Arc;
    use std::thread;

    use parking_lot::Mutex;

    use super::*;

    #[test]
    fn mutex_wrapped_cache_stays_bounded() {
        for policy in CachePolicy::ALL {
            let cache = Arc::new(Mutex::new(
                CacheBuilder::new(8).build_boxed::<u32, u32>(policy),
            ));

            let handles: Vec<_> = (0..4u32)
                .map(|t| {
                    let cache = Arc::clone(&cache);
                    thread::spawn(move || {
                        for i in 0..200u32 {
                            let key = (t * 31 + i) % 20;
                            let mut guard = cache.lock();
                            guard.insert(key, i);
                            guard.get(&((key + 1) % 20));
                        }
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }

            let guard = cache.lock();
            assert!(guard.len() <= 8, "{policy}");
            assert!(guard.is_full(), "{policy}");
        }
    }
}

// ==============================================
// Model-Based Property Tests
// ==============================================

mod property_tests {
    use proptest::prelude::*;

    use super::*;

    /// Scan-based reference: each entry carries its frequency and the tick of
    /// its last reorder; the victim is found by comparing those.
    struct Model {
        policy: CachePolicy,
        capacity: usize,
        tick: u64,
        entries: Vec<(u32, u32, u64, u64)>,
    }

    impl Model {
        fn new(policy: CachePolicy, capacity: usize) -> Self {
            Self {
                policy,
                capacity,
                tick: 0,
                entries: Vec::new(),
            }
        }

        fn next_tick(&mut self) -> u64 {
            self.tick += 1;
            self.tick
        }

        fn insert(&mut self, key: u32, value: u32) -> Option<u32> {
            let tick = self.next_tick();
            let policy = self.policy;
            if let Some(entry) = self.entries.iter_mut().find(|e| e.0 == key) {
                entry.1 = value;
                if policy != CachePolicy::Fifo {
                    entry.3 = tick;
                }
                if policy == CachePolicy::Lfu {
                    entry.2 += 1;
                }
                return None;
            }
            if self.capacity == 0 {
                return None;
            }
            let evicted = if self.entries.len() >= self.capacity {
                self.order().first().copied().map(|victim| {
                    self.entries.retain(|e| e.0 != victim);
                    victim
                })
            } else {
                None
            };
            self.entries.push((key, value, 1, tick));
            evicted
        }

        fn get(&mut self, key: u32) -> Option<u32> {
            let tick = self.next_tick();
            let policy = self.policy;
            let entry = self.entries.iter_mut().find(|e| e.0 == key)?;
            if matches!(policy, CachePolicy::Lru | CachePolicy::Lfu) {
                entry.3 = tick;
            }
            if policy == CachePolicy::Lfu {
                entry.2 += 1;
            }
            Some(entry.1)
        }

        /// Keys in eviction-priority order.
        fn order(&self) -> Vec<u32> {
            let mut entries = self.entries.clone();
            match self.policy {
                CachePolicy::Fifo | CachePolicy::Lru => entries.sort_by_key(|e| e.3),
                CachePolicy::Lifo => entries.sort_by_key(|e| std::cmp::Reverse(e.3)),
                CachePolicy::Lfu => entries.sort_by_key(|e| (e.2, e.3)),
            }
            entries.into_iter().map(|e| e.0).collect()
        }
    }

    #[derive(Debug, Clone)]
    enum Op {
        Put(Option<u32>, Option<u32>),
        Get(Option<u32>),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (proptest::option::weighted(0.95, 0u32..12), proptest::option::weighted(0.95, any::<u32>()))
                .prop_map(|(k, v)| Op::Put(k, v)),
            3 => proptest::option::weighted(0.95, 0u32..12).prop_map(Op::Get),
        ]
    }

    fn policy_strategy() -> impl Strategy<Value = CachePolicy> {
        prop::sample::select(CachePolicy::ALL.to_vec())
    }

    proptest! {
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_matches_reference_model(
            policy in policy_strategy(),
            capacity in 0usize..6,
            ops in prop::collection::vec(op_strategy(), 0..150)
        ) {
            let mut cache = CacheBuilder::new(capacity).build::<u32, u32>(policy);
            let mut model = Model::new(policy, capacity);

            for op in ops {
                match op {
                    Op::Put(key, value) => {
                        let expected = match (key, value) {
                            (Some(k), Some(v)) => model.insert(k, v),
                            _ => None,
                        };
                        prop_assert_eq!(cache.put(key, value), expected);
                    },
                    Op::Get(key) => {
                        let expected = key.and_then(|k| model.get(k));
                        prop_assert_eq!(cache.lookup(key.as_ref()).copied(), expected);
                    },
                }

                let order: Vec<u32> = cache.entries().into_iter().map(|(k, _)| *k).collect();
                prop_assert_eq!(order, model.order());
                prop_assert!(cache.len() <= capacity);
                prop_assert!(cache.check_invariants().is_ok());
            }
        }

        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_lfu_min_frequency_is_lowest_held(
            ops in prop::collection::vec(op_strategy(), 1..120)
        ) {
            let mut cache: LfuCache<u32, u32> = LfuCache::default();
            for op in ops {
                match op {
                    Op::Put(key, value) => { cache.put(key, value); },
                    Op::Get(key) => { cache.lookup(key.as_ref()); },
                }
                let lowest = cache
                    .entries()
                    .into_iter()
                    .filter_map(|(k, _)| cache.frequency(k))
                    .min();
                prop_assert_eq!(cache.min_frequency(), lowest);
                if let Some((victim, _)) = cache.peek_lfu() {
                    prop_assert_eq!(cache.frequency(victim), lowest);
                }
            }
        }
    }
}
