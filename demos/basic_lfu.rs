use policy_cache::discard::DiscardEvent;
use policy_cache::policy::lfu::LfuCache;
use policy_cache::traits::{BoundedStore, LfuStore, render};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut cache = LfuCache::default().with_listener(|event: &DiscardEvent<&'static str>| {
        println!("{event}");
    });

    cache.put(Some("A"), Some("Hello"));
    cache.put(Some("B"), Some("World"));
    cache.put(Some("C"), Some("Holberton"));
    cache.put(Some("D"), Some("School"));

    cache.get(&"A");
    cache.get(&"A");
    cache.get(&"B");
    cache.get(&"D");
    for key in ["A", "B", "C", "D"] {
        println!("{key}: frequency {:?}", cache.frequency(&key));
    }

    cache.put(Some("E"), Some("Battery"));
    print!("{}", render(&cache));
    println!("min frequency: {:?}", cache.min_frequency());

    cache.put(Some("F"), Some("Mission"));
    print!("{}", render(&cache));
}

// Expected output:
// A: frequency Some(3)
// B: frequency Some(2)
// C: frequency Some(1)
// D: frequency Some(2)
// DISCARD: C
// Current cache:
// A: Hello
// B: World
// D: School
// E: Battery
// min frequency: Some(1)
// DISCARD: E
// Current cache:
// A: Hello
// B: World
// D: School
// F: Mission
