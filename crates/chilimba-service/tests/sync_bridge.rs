//! Remote-wins synchronization into the local cache.
//!
//! The bridge is driven one emission at a time so the tests can observe the
//! cache between the write-through call and the round-trip snapshot.

mod common;

use chilimba_core::model::Group;
use chilimba_db::db::connection::{self, DbPool};
use chilimba_db::db::migrate::run_migrations;
use chilimba_db::db::query;
use chilimba_service::error::RemoteError;
use chilimba_service::remote::memory::MemoryRemoteStore;
use chilimba_service::service::GroupService;
use chilimba_service::sync::{SyncBridge, SyncState};

use common::admin_session;

fn cache_pool() -> DbPool {
    // Single connection keeps every checkout on the same in-memory database.
    let pool = connection::create_pool(":memory:", 1).unwrap();
    let mut conn = connection::checkout(&pool).unwrap();
    run_migrations(&mut conn).unwrap();
    pool
}

fn cached_groups(pool: &DbPool) -> Vec<Group> {
    let mut conn = connection::checkout(pool).unwrap();
    query::group::list(&mut conn).unwrap()
}

#[test_log::test(tokio::test)]
async fn test_states_walk_disconnected_syncing_synced() {
    let pool = cache_pool();
    let store = MemoryRemoteStore::new();
    let mut bridge = SyncBridge::new(store, pool);
    let state = bridge.state();

    assert_eq!(*state.borrow(), SyncState::Disconnected);

    bridge.subscribe();
    assert_eq!(*state.borrow(), SyncState::Syncing);

    assert!(bridge.step().await.unwrap());
    assert_eq!(*state.borrow(), SyncState::Synced);
}

#[test_log::test(tokio::test)]
async fn test_local_cache_reflects_write_only_after_round_trip() {
    let pool = cache_pool();
    let store = MemoryRemoteStore::new();
    let service = GroupService::new(store.clone());
    let admin = admin_session();

    let mut bridge = SyncBridge::new(store, pool.clone());
    bridge.subscribe();
    assert!(bridge.step().await.unwrap()); // initial empty snapshot

    // Write-through: the call resolves against the remote store only.
    let group = service.create_group(&admin, "Chilimba A").await.unwrap();
    assert!(cached_groups(&pool).is_empty());

    assert!(bridge.step().await.unwrap());
    let cached = cached_groups(&pool);
    assert_eq!(cached.len(), 1);
    assert_eq!(cached[0].name, "Chilimba A");
    assert!(!cached[0].id.is_empty());

    // Same rule for a rename: stale until the snapshot lands.
    let renamed = Group {
        name: "Chilimba A (2026)".to_owned(),
        ..group
    };
    service.update_group(&admin, &renamed).await.unwrap();
    assert_eq!(cached_groups(&pool)[0].name, "Chilimba A");

    assert!(bridge.step().await.unwrap());
    assert_eq!(cached_groups(&pool)[0].name, "Chilimba A (2026)");
}

#[test_log::test(tokio::test)]
async fn test_remote_wins_over_the_whole_cached_set() {
    let pool = cache_pool();
    let store = MemoryRemoteStore::new();
    let service = GroupService::new(store.clone());
    let admin = admin_session();

    let first = service.create_group(&admin, "Chilimba A").await.unwrap();
    service.create_group(&admin, "Village Bank").await.unwrap();

    let mut bridge = SyncBridge::new(store, pool.clone());
    bridge.subscribe();
    assert!(bridge.step().await.unwrap());
    assert_eq!(cached_groups(&pool).len(), 2);

    // Deleting remotely drops the group from the next overwrite.
    service.delete_group(&admin, &first.id).await.unwrap();
    assert!(bridge.step().await.unwrap());

    let cached = cached_groups(&pool);
    assert_eq!(cached.len(), 1);
    assert_eq!(cached[0].name, "Village Bank");
}

#[test_log::test(tokio::test)]
async fn test_store_failure_is_terminal_until_resubscribe() {
    let pool = cache_pool();
    let store = MemoryRemoteStore::new();
    let mut bridge = SyncBridge::new(store.clone(), pool);
    let state = bridge.state();

    bridge.subscribe();
    assert!(bridge.step().await.unwrap());

    store.fail_group_watchers(&RemoteError::Unavailable("auth expired".into()));
    assert!(bridge.step().await.is_err());
    assert_eq!(*state.borrow(), SyncState::Error);

    // Re-subscribing is the only way back.
    bridge.subscribe();
    assert_eq!(*state.borrow(), SyncState::Syncing);
    assert!(bridge.step().await.unwrap());
    assert_eq!(*state.borrow(), SyncState::Synced);
}

#[test_log::test(tokio::test)]
async fn test_dropping_the_bridge_deregisters_its_watcher() {
    let pool = cache_pool();
    let store = MemoryRemoteStore::new();
    let mut bridge = SyncBridge::new(store.clone(), pool);

    bridge.subscribe();
    assert_eq!(store.group_watcher_count(), 1);

    drop(bridge);
    assert_eq!(store.group_watcher_count(), 0);
}
