#![no_main]

use libfuzzer_sys::fuzz_target;
use policy_cache::policy::lfu::LfuCache;
use policy_cache::traits::{BoundedStore, LfuStore};

// Fuzz arbitrary put/get/clear sequences on LfuCache
//
// The first byte picks the capacity; every following pair is (op, key).
// After each operation the frequency index must agree with the entries and
// `min_frequency` must name the lowest frequency held.
fuzz_target!(|data: &[u8]| {
    let Some((&cap, rest)) = data.split_first() else {
        return;
    };
    let capacity = usize::from(cap % 16);
    let mut cache: LfuCache<u8, u8> = LfuCache::new(capacity);

    for chunk in rest.chunks_exact(2) {
        let key = chunk[1] % 32;
        match chunk[0] % 8 {
            0..=2 => {
                let was_present = cache.contains(&key);
                let was_full = cache.is_full();
                let evicted = cache.insert(key, chunk[0]);
                if was_present || capacity == 0 || !was_full {
                    assert_eq!(evicted, None);
                } else {
                    assert!(evicted.is_some());
                }
            }
            3..=5 => {
                let before = cache.frequency(&key);
                let hit = cache.get(&key).is_some();
                assert_eq!(hit, before.is_some());
                if let Some(f) = before {
                    assert_eq!(cache.frequency(&key), Some(f.saturating_add(1)));
                }
            }
            6 => {
                let _ = cache.peek_lfu();
            }
            7 => {
                if chunk[1] % 16 == 0 {
                    cache.clear();
                }
            }
            _ => unreachable!(),
        }

        cache.check_invariants().unwrap();
        assert!(cache.len() <= capacity);

        let lowest = cache
            .entries()
            .into_iter()
            .filter_map(|(k, _)| cache.frequency(k))
            .min();
        assert_eq!(cache.min_frequency(), lowest);
    }
});
