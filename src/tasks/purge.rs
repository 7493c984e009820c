//! Expiry Purge Task
//!
//! Background task that periodically drops expired entries from a shared
//! [`MemoryPool`]. Reads already treat expired entries as absent, so the
//! task only reclaims memory and prunes the tag index; correctness never
//! depends on how often it runs.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::pool::MemoryPool;

/// Spawns a task that purges expired entries every `interval_secs` seconds.
///
/// # Arguments
/// * `pool` - Shared pool to maintain
/// * `interval_secs` - Seconds between purge runs
///
/// # Returns
/// A JoinHandle that can be aborted during shutdown.
pub fn spawn_purge_task(pool: Arc<MemoryPool>, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!("starting expiry purge task, interval {interval_secs}s");

        loop {
            tokio::time::sleep(interval).await;

            let removed = pool.purge_expired();
            if removed > 0 {
                info!("purge run dropped {removed} expired entries");
            } else {
                debug!("purge run found nothing to drop");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{ItemPool, Ttl};
    use serde_json::json;

    fn write(pool: &MemoryPool, key: &str, ttl: Ttl) {
        let mut item = pool.get_item(key).unwrap();
        item.set(json!("v")).expires_after(ttl);
        pool.save(item).unwrap();
    }

    #[tokio::test]
    async fn test_purge_task_drops_expired_entries() {
        let pool = Arc::new(MemoryPool::new(64));
        write(&pool, "short-lived", Ttl::After(chrono::Duration::milliseconds(100)));

        let handle = spawn_purge_task(pool.clone(), 1);

        tokio::time::sleep(Duration::from_millis(2500)).await;

        assert!(pool.is_empty(), "expired entry should have been purged");
        handle.abort();
    }

    #[tokio::test]
    async fn test_purge_task_preserves_live_entries() {
        let pool = Arc::new(MemoryPool::new(64));
        write(&pool, "long-lived", Ttl::seconds(3600));

        let handle = spawn_purge_task(pool.clone(), 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(pool.has_item("long-lived").unwrap());
        handle.abort();
    }

    #[tokio::test]
    async fn test_purge_task_can_be_aborted() {
        let pool = Arc::new(MemoryPool::new(64));

        let handle = spawn_purge_task(pool, 1);
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished());
    }
}
