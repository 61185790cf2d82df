#![no_main]

use libfuzzer_sys::fuzz_target;
use policy_cache::builder::{CacheBuilder, CachePolicy};
use policy_cache::traits::BoundedStore;

// Fuzz nullable put/lookup sequences through the builder for every policy
//
// Absent keys and values come from reserved op codes, so the no-op paths are
// exercised alongside eviction.
fuzz_target!(|data: &[u8]| {
    let Some((&head, rest)) = data.split_first() else {
        return;
    };
    let policy = CachePolicy::ALL[usize::from(head) % CachePolicy::ALL.len()];
    let capacity = usize::from(head >> 4);
    let mut cache = CacheBuilder::new(capacity).build::<u8, u8>(policy);

    for chunk in rest.chunks_exact(2) {
        let key = chunk[1] % 24;
        let len_before = cache.len();
        match chunk[0] % 6 {
            0 | 1 => {
                cache.put(Some(key), Some(chunk[0]));
            }
            2 => {
                assert_eq!(cache.put(None, Some(chunk[0])), None);
                assert_eq!(cache.len(), len_before);
            }
            3 => {
                assert_eq!(cache.put(Some(key), None), None);
                assert_eq!(cache.len(), len_before);
            }
            4 => {
                let _ = cache.lookup(Some(&key));
            }
            5 => {
                assert_eq!(cache.lookup(None), None);
            }
            _ => unreachable!(),
        }

        cache.check_invariants().unwrap();
        assert!(cache.len() <= capacity);
        assert_eq!(cache.entries().len(), cache.len());
    }
});
