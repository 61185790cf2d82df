use policy_cache::discard::DiscardEvent;
use policy_cache::policy::fifo::FifoCache;
use policy_cache::traits::{BoundedStore, render};

fn main() {
    // RUST_LOG=policy_cache=info also shows the tracing discard events.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut cache = FifoCache::default().with_listener(|event: &DiscardEvent<&'static str>| {
        println!("{event}");
    });

    cache.put(Some("A"), Some("Hello"));
    cache.put(Some("B"), Some("World"));
    cache.put(Some("C"), Some("Holberton"));
    cache.put(Some("D"), Some("School"));
    print!("{}", render(&cache));

    cache.put(Some("E"), Some("Battery"));
    print!("{}", render(&cache));

    cache.put(Some("C"), Some("Street"));
    print!("{}", render(&cache));

    cache.put(Some("F"), Some("Mission"));
    print!("{}", render(&cache));
}

// Expected output:
// Current cache:
// A: Hello
// B: World
// C: Holberton
// D: School
// DISCARD: A
// Current cache:
// B: World
// C: Holberton
// D: School
// E: Battery
// Current cache:
// B: World
// C: Street
// D: School
// E: Battery
// DISCARD: B
// Current cache:
// C: Street
// D: School
// E: Battery
// F: Mission
