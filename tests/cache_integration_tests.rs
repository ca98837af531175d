//! Integration Tests for Concurrent Cache Use
//!
//! Exercises both caches through the public API from many threads and tasks,
//! together with the background sweeper.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use mini_cache::{
    spawn_sweeper, spawn_sweeper_from_config, CacheError, Clock, Config, LruCache, MockClock,
    TtlCache,
};
use tracing_subscriber::EnvFilter;

const HOUR: Duration = Duration::from_secs(3600);

// == Helper Functions ==

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// == LRU Cache ==

#[test]
fn test_lru_scenarios() {
    init_tracing();

    let cache = LruCache::new(2).unwrap();
    cache.put("a", 1);
    cache.put("b", 2);
    cache.put("c", 3);
    assert_eq!(cache.get("a"), None);
    assert_eq!(cache.get("b"), Some(2));
    assert_eq!(cache.get("c"), Some(3));

    let cache = LruCache::new(2).unwrap();
    cache.put("a", 1);
    cache.put("b", 2);
    cache.get("a");
    cache.put("c", 3);
    assert_eq!(cache.get("a"), Some(1));
    assert_eq!(cache.get("b"), None);
    assert_eq!(cache.get("c"), Some(3));

    let cache = LruCache::new(1).unwrap();
    cache.put("f", "bar");
    cache.put("f", "bar1");
    assert_eq!(cache.get("f"), Some("bar1"));
}

#[test]
fn test_lru_invalid_capacity_stops_construction() {
    assert!(matches!(
        LruCache::<String, u32>::new(0),
        Err(CacheError::InvalidCapacity(0))
    ));
}

#[test]
fn test_lru_shared_across_threads() {
    init_tracing();

    let config = Config {
        lru_capacity: 32,
        ..Config::default()
    };
    let cache = Arc::new(LruCache::from_config(&config).unwrap());

    thread::scope(|scope| {
        for t in 0..8u32 {
            let cache = &cache;
            scope.spawn(move || {
                for i in 0..1_000u32 {
                    let key = format!("key{}", (t * 7 + i) % 100);
                    cache.put(key.clone(), i);
                    if let Some(value) = cache.get(&key) {
                        assert!(value < 1_000);
                    }
                }
            });
        }
    });

    assert_eq!(cache.len(), 32);
    let keys = cache.keys_by_recency();
    assert_eq!(keys.len(), 32);

    let stats = cache.stats();
    assert_eq!(stats.total_entries, 32);
    assert_eq!(stats.hits + stats.misses, 8_000);
}

// == TTL Cache ==

#[test]
fn test_ttl_scenarios() {
    init_tracing();

    let clock = MockClock::new();
    let cache = TtlCache::with_clock(clock.clone());

    cache.put("x", "v", clock.now());
    assert_eq!(cache.get("x"), None);

    cache.put("x", "v", clock.now() + HOUR);
    cache.put("y", "v", clock.now());
    assert_eq!(cache.delete_expired(), 1);
    assert_eq!(cache.get("y"), None);
    assert_eq!(cache.get("x"), Some("v"));
}

#[test]
fn test_ttl_sweep_never_drops_a_racing_put() {
    init_tracing();

    let clock = MockClock::new();
    let cache = Arc::new(TtlCache::with_clock(clock.clone()));
    let done = AtomicBool::new(false);
    let keys: Vec<String> = (0..2_000).map(|i| format!("key{}", i)).collect();

    thread::scope(|scope| {
        scope.spawn(|| {
            // Each key is first stored already expired, then refreshed
            for key in &keys {
                cache.put(key.clone(), "stale", clock.now());
                cache.put(key.clone(), "fresh", clock.now() + HOUR);
            }
            done.store(true, Ordering::Release);
        });

        scope.spawn(|| {
            while !done.load(Ordering::Acquire) {
                cache.delete_expired();
            }
        });
    });

    cache.delete_expired();
    assert_eq!(cache.len(), keys.len());
    for key in &keys {
        assert_eq!(cache.get(key), Some("fresh"), "{} lost its fresh value", key);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_ttl_with_sweeper_under_load() {
    init_tracing();

    let clock = MockClock::new();
    let cache = Arc::new(TtlCache::with_clock(clock.clone()));
    let sweeper = spawn_sweeper(cache.clone(), Duration::from_millis(5)).unwrap();

    let writers: Vec<_> = (0..4)
        .map(|w| {
            let cache = cache.clone();
            let clock = clock.clone();
            tokio::spawn(async move {
                for i in 0..250 {
                    let key = format!("w{}-{}", w, i);
                    if i % 2 == 0 {
                        cache.put(key, i, clock.now() + HOUR);
                    } else {
                        cache.put(key, i, clock.now());
                    }
                    if i % 50 == 0 {
                        tokio::task::yield_now().await;
                    }
                }
            })
        })
        .collect();

    for writer in writers {
        writer.await.unwrap();
    }

    // Let the sweeper catch up with the expired half
    for _ in 0..200 {
        if cache.len() == 500 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    sweeper.shutdown().await;

    assert_eq!(cache.len(), 500);
    assert_eq!(cache.get("w0-0"), Some(0));
    assert_eq!(cache.get("w3-248"), Some(248));
    assert_eq!(cache.get("w1-1"), None);
    assert_eq!(cache.stats().evictions, 500);
}

#[tokio::test(start_paused = true)]
async fn test_ttl_sweeper_from_config_released_on_drop() {
    init_tracing();

    let config = Config {
        sweep_interval: Duration::from_millis(100),
        ..Config::default()
    };
    let clock = MockClock::new();
    let cache = Arc::new(TtlCache::with_clock(clock.clone()));
    cache.put("k".to_string(), 1u32, clock.now());

    let sweeper = spawn_sweeper_from_config(cache.clone(), &config).unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(cache.is_empty());

    drop(sweeper);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(Arc::strong_count(&cache), 1);
}
