//! Picks a policy by name and compares what each one discards.
//!
//! Run with: cargo run --example basic_builder -- lfu

use policy_cache::prelude::*;

fn run(policy: CachePolicy) {
    let log = DiscardLog::new();
    let mut cache = CacheBuilder::default()
        .build::<&str, u32>(policy)
        .with_listener(log.clone());

    for (i, key) in ["A", "B", "C", "D"].into_iter().enumerate() {
        cache.insert(key, i as u32);
    }
    cache.get(&"A");
    cache.get(&"A");
    cache.get(&"C");
    cache.insert("E", 4);
    cache.insert("F", 5);

    println!("{:<4} discarded {:?}", policy, log.keys());
    let snap = cache.metrics_snapshot();
    println!(
        "     hits={} misses={} evictions={}",
        snap.get_hits, snap.get_misses, snap.evicted_entries
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let requested: Vec<CachePolicy> = match std::env::args().nth(1) {
        Some(name) => match name.parse() {
            Ok(policy) => vec![policy],
            Err(err) => {
                eprintln!("{err}");
                std::process::exit(2);
            },
        },
        None => CachePolicy::ALL.to_vec(),
    };

    for policy in requested {
        run(policy);
    }
}

// Expected output (no argument):
// fifo discarded ["A", "B"]
//      hits=3 misses=0 evictions=2
// lifo discarded ["D", "E"]
//      hits=3 misses=0 evictions=2
// lru  discarded ["B", "D"]
//      hits=3 misses=0 evictions=2
// lfu  discarded ["B", "D"]
//      hits=3 misses=0 evictions=2
