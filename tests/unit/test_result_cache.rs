use flowsmith::core::cache::{FifoCache, Fingerprint, ResultCache, DEFAULT_CACHE_CAPACITY};
use flowsmith::types::{ProcessingMetadata, ProcessingResult};
use serde_json::json;
use std::sync::Arc;
use std::thread;

fn result(task_id: &str) -> Arc<ProcessingResult> {
    Arc::new(ProcessingResult {
        data: json!({"task": task_id}),
        metadata: ProcessingMetadata {
            processed_at: chrono::Utc::now(),
            task_id: task_id.to_string(),
            task_name: "Cached".to_string(),
            task_type: "action".to_string(),
            action_type: "dataProcessing".to_string(),
            transformations: 0,
            validated: false,
        },
    })
}

fn fingerprint(n: usize) -> Fingerprint {
    Fingerprint::compute(&format!("task-{}", n), &json!({}), Some(&json!(n)), 100)
}

#[test]
fn test_fifty_one_inserts_evict_the_first() {
    let cache = ResultCache::default();
    assert_eq!(cache.capacity(), DEFAULT_CACHE_CAPACITY);

    for n in 0..=DEFAULT_CACHE_CAPACITY {
        cache.insert(fingerprint(n), result(&format!("task-{}", n)));
    }

    assert_eq!(cache.len(), 50);
    assert!(!cache.contains(&fingerprint(0)));
    assert!(cache.contains(&fingerprint(1)));
    assert!(cache.contains(&fingerprint(50)));
    assert_eq!(cache.keys().first(), Some(&fingerprint(1)));
}

#[test]
fn test_cached_value_is_stable_until_evicted() {
    let cache = ResultCache::new(2);
    let first = result("a");
    cache.insert(fingerprint(1), Arc::clone(&first));

    let hit = cache.get(&fingerprint(1)).unwrap();
    assert!(Arc::ptr_eq(&hit, &first));
    assert!(cache.get(&fingerprint(2)).is_none());
}

#[test]
fn test_evicts_exactly_one_entry_per_overflow() {
    let cache: FifoCache<u32, &str> = FifoCache::new(3);
    for (key, value) in [(1, "a"), (2, "b"), (3, "c")] {
        assert!(cache.insert(key, value).is_none());
    }
    assert_eq!(cache.insert(4, "d"), Some((1, "a")));
    assert_eq!(cache.insert(5, "e"), Some((2, "b")));
    assert_eq!(cache.keys(), vec![3, 4, 5]);
}

#[test]
fn test_clear_empties_the_cache() {
    let cache: FifoCache<u32, u32> = FifoCache::new(3);
    cache.insert(1, 1);
    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn test_cache_is_shareable_across_threads() {
    let cache: Arc<FifoCache<usize, usize>> = Arc::new(FifoCache::new(1000));
    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for n in 0..100 {
                    cache.insert(worker * 100 + n, n);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(cache.len(), 400);
}

#[test]
fn test_fingerprint_uses_input_prefix_only() {
    let params = json!({"transformations": []});
    let shared = "y".repeat(150);
    let a = json!(format!("{}-first", shared));
    let b = json!(format!("{}-second", shared));

    assert_eq!(
        Fingerprint::compute("t", &params, Some(&a), 100),
        Fingerprint::compute("t", &params, Some(&b), 100)
    );
    assert_ne!(
        Fingerprint::compute("t", &params, Some(&a), 100),
        Fingerprint::compute("t", &params, None, 100)
    );
}
