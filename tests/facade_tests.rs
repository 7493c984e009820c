//! Integration Tests for the Simple Cache Facade
//!
//! Exercises the full facade contract over the bundled in-memory pool,
//! including the shared-pool setup with the background purge task.

use std::sync::Arc;

use serde_json::{json, Value};
use tagcache::{
    spawn_purge_task, CacheError, MemoryPool, SimpleCache, Ttl,
};

// == Helper Functions ==

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn cache() -> SimpleCache<MemoryPool> {
    SimpleCache::new(MemoryPool::new(128))
}

// == Basic Operations ==

#[test]
fn test_basic_set_and_get_operations() {
    init_logging();
    let cache = cache();

    assert!(cache.set("key", json!("value"), Ttl::Never).unwrap());
    assert_eq!(cache.get("key").unwrap(), json!("value"));
}

#[test]
fn test_get_with_non_existent_key_returns_null() {
    let cache = cache();
    assert_eq!(cache.get("non-existent").unwrap(), Value::Null);
}

#[test]
fn test_get_with_non_existent_key_returns_the_provided_default() {
    let cache = cache();
    assert_eq!(
        cache.get_or("non-existent", json!("default-value")).unwrap(),
        json!("default-value")
    );
}

#[test]
fn test_has_flips_with_set() {
    let cache = cache();

    assert!(!cache.has("foo").unwrap());
    cache.set("foo", json!("bar"), Ttl::Never).unwrap();
    assert!(cache.has("foo").unwrap());
}

// == Key Validation ==

#[test]
fn test_reserved_keys_rejected_by_every_operation() {
    let cache = cache();

    for key in [
        "foo{bar", "foo}bar", "foo(bar", "foo)bar", "foo/bar", "foo\\bar", "foo@bar", "foo:bar",
        "",
    ] {
        assert!(
            matches!(cache.get(key), Err(CacheError::InvalidKey(_))),
            "get `{key}`"
        );
        assert!(
            matches!(
                cache.set(key, json!("value"), Ttl::Never),
                Err(CacheError::InvalidKey(_))
            ),
            "set `{key}`"
        );
        assert!(
            matches!(cache.has(key), Err(CacheError::InvalidKey(_))),
            "has `{key}`"
        );
        assert!(
            matches!(cache.delete(key), Err(CacheError::InvalidKey(_))),
            "delete `{key}`"
        );
        assert!(
            matches!(cache.get_multiple(&[key]), Err(CacheError::InvalidKey(_))),
            "get_multiple `{key}`"
        );
        assert!(
            matches!(
                cache.delete_multiple(&[key]),
                Err(CacheError::InvalidKey(_))
            ),
            "delete_multiple `{key}`"
        );
    }

    assert!(cache.pool().is_empty(), "no rejected call may write");
}

// == TTL Semantics ==

#[test]
fn test_set_expired_is_accepted_but_never_a_hit() {
    let cache = cache();

    assert!(cache.set("key1", json!("value1"), Ttl::seconds(-10)).unwrap());
    assert!(!cache.has("key1").unwrap());
    assert_eq!(cache.get_or("key1", json!("D")).unwrap(), json!("D"));
}

#[test]
fn test_entry_expires_after_its_ttl() {
    let cache = cache();

    cache
        .set(
            "short",
            json!(1),
            Ttl::After(chrono::Duration::milliseconds(60)),
        )
        .unwrap();
    assert!(cache.has("short").unwrap());

    std::thread::sleep(std::time::Duration::from_millis(120));

    assert!(!cache.has("short").unwrap());
    assert_eq!(cache.get("short").unwrap(), Value::Null);
}

// == Delete & Clear ==

#[test]
fn test_delete() {
    let cache = cache();

    cache.set("key", json!("value"), Ttl::Never).unwrap();
    assert!(cache.delete("key").unwrap());
    assert!(!cache.has("key").unwrap());
}

#[test]
fn test_delete_with_non_existent_key_is_success() {
    let cache = cache();

    assert!(cache.delete("non-existent").unwrap());
    assert!(!cache.has("non-existent").unwrap());
}

#[test]
fn test_clear_twice_leaves_empty_pool() {
    let cache = cache();

    cache.set("key", json!("value"), Ttl::Never).unwrap();
    assert!(cache.clear().unwrap());
    assert!(!cache.has("key").unwrap());
    assert!(cache.clear().unwrap());
    assert!(cache.pool().is_empty());
}

// == Bulk Operations ==

#[test]
fn test_set_multiple_and_get_multiple() {
    let cache = cache();
    let values = [("key1", json!("value1")), ("key2", json!("value2"))];

    assert!(cache.set_multiple(&values, Ttl::Never).unwrap());

    let out = cache.get_multiple(&["key1", "key2"]).unwrap();
    let pairs: Vec<(&str, &Value)> = out.iter().map(|(k, v)| (k.as_str(), v)).collect();
    assert_eq!(
        pairs,
        vec![("key1", &json!("value1")), ("key2", &json!("value2"))]
    );
}

#[test]
fn test_get_multiple_with_non_existent_key_gets_null() {
    let cache = cache();
    cache
        .set_multiple(
            &[("key1", json!("value1")), ("key2", json!("value2"))],
            Ttl::Never,
        )
        .unwrap();

    let out = cache
        .get_multiple(&["key1", "key2", "non-existent"])
        .unwrap();
    assert_eq!(out.len(), 3);
    assert_eq!(out["non-existent"], Value::Null);
}

#[test]
fn test_get_multiple_with_non_existent_key_gets_the_provided_default() {
    let cache = cache();
    cache.set("key1", json!("value1"), Ttl::Never).unwrap();

    let out = cache
        .get_multiple_or(&["key1", "key2"], json!("default-value"))
        .unwrap();
    assert_eq!(out["key1"], json!("value1"));
    assert_eq!(out["key2"], json!("default-value"));
}

#[test]
fn test_set_multiple_with_expired_ttl_reports_failure() {
    let cache = cache();

    assert!(!cache
        .set_multiple(&[("key", json!("value"))], Ttl::seconds(-1))
        .unwrap());
    assert!(!cache.has("key").unwrap());
}

#[test]
fn test_set_multiple_validates_all_keys_before_writing() {
    let cache = cache();
    let values = [("good", json!(1)), ("bad:key", json!(2))];

    assert!(matches!(
        cache.set_multiple(&values, Ttl::Never),
        Err(CacheError::InvalidKey(_))
    ));
    assert!(cache.pool().is_empty());
}

#[test]
fn test_delete_multiple() {
    let cache = cache();
    cache
        .set_multiple(
            &[("key1", json!("value1")), ("key2", json!("value2"))],
            Ttl::Never,
        )
        .unwrap();

    assert!(cache.delete_multiple(&["key1", "key2"]).unwrap());
    assert!(!cache.has("key1").unwrap());
    assert!(!cache.has("key2").unwrap());
}

#[test]
fn test_delete_multiple_validates_whole_collection_first() {
    let cache = cache();
    cache.set("key1", json!("value1"), Ttl::Never).unwrap();

    assert!(matches!(
        cache.delete_multiple(&["key1", "bad@key"]),
        Err(CacheError::InvalidKey(_))
    ));
    assert!(cache.has("key1").unwrap(), "nothing deleted on a bad batch");
}

// == Shared Pool With Purge Task ==

#[tokio::test]
async fn test_facade_over_shared_pool_with_purge_task() {
    init_logging();

    let pool = Arc::new(MemoryPool::new(128));
    let cache = SimpleCache::new(pool.clone());
    let handle = spawn_purge_task(pool.clone(), 1);

    cache
        .set(
            "short",
            json!(1),
            Ttl::After(chrono::Duration::milliseconds(100)),
        )
        .unwrap();
    cache.set("long", json!(2), Ttl::seconds(3600)).unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(2500)).await;

    // the task physically reclaimed the expired entry
    assert_eq!(pool.len(), 1);
    assert!(!cache.has("short").unwrap());
    assert_eq!(cache.get("long").unwrap(), json!(2));

    handle.abort();
}
