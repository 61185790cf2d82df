use policy_cache::discard::DiscardEvent;
use policy_cache::policy::lru::LruCache;
use policy_cache::traits::{BoundedStore, render};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut cache = LruCache::default().with_listener(|event: &DiscardEvent<&'static str>| {
        println!("{event}");
    });

    cache.put(Some("A"), Some("Hello"));
    cache.put(Some("B"), Some("World"));
    cache.put(Some("C"), Some("Holberton"));
    cache.put(Some("D"), Some("School"));

    cache.get(&"A");
    cache.put(Some("E"), Some("Battery"));
    print!("{}", render(&cache));

    cache.get(&"C");
    cache.put(Some("F"), Some("Mission"));
    print!("{}", render(&cache));
}

// Expected output:
// DISCARD: B
// Current cache:
// A: Hello
// C: Holberton
// D: School
// E: Battery
// DISCARD: D
// Current cache:
// A: Hello
// C: Holberton
// E: Battery
// F: Mission
