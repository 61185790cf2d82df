use policy_cache::discard::DiscardEvent;
use policy_cache::policy::lifo::LifoCache;
use policy_cache::traits::{BoundedStore, render};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut cache = LifoCache::default().with_listener(|event: &DiscardEvent<&'static str>| {
        println!("{event}");
    });

    cache.put(Some("A"), Some("Hello"));
    cache.put(Some("B"), Some("World"));
    cache.put(Some("C"), Some("Holberton"));
    cache.put(Some("D"), Some("School"));
    print!("{}", render(&cache));

    cache.put(Some("E"), Some("Battery"));
    print!("{}", render(&cache));

    // Re-putting C makes it the newest insertion again.
    cache.put(Some("C"), Some("Street"));
    cache.put(Some("F"), Some("Mission"));
    print!("{}", render(&cache));
}

// Expected output:
// Current cache:
// A: Hello
// B: World
// C: Holberton
// D: School
// DISCARD: D
// Current cache:
// A: Hello
// B: World
// C: Holberton
// E: Battery
// DISCARD: C
// Current cache:
// A: Hello
// B: World
// E: Battery
// F: Mission
