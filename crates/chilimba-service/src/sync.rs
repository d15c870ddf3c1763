//! Remote-wins synchronization of the cached group table.
//!
//! The bridge subscribes to the remote group list and, per snapshot,
//! overwrites the local cache wholesale. No diffing, no conflict resolution:
//! a local edit that has not round-tripped through the remote store is lost
//! on the next inbound snapshot, which is the accepted merge rule. The
//! bridge is the single writer of the cached group table.

use tokio::sync::watch;

use chilimba_core::model::Group;
use chilimba_db::db::connection::{self, DbPool};
use chilimba_db::db::query;
use chilimba_db::error::DbResult;
use chilimba_db::model::group::GroupRow;

use chilimba_core::error::CoreError;

use crate::error::{ServiceError, ServiceResult};
use crate::live::Subscription;
use crate::remote::RemoteStore;

/// Bridge lifecycle. `Error` is terminal until `subscribe` is called again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Disconnected,
    Syncing,
    Synced,
    Error,
}

pub struct SyncBridge<S: RemoteStore> {
    store: S,
    pool: DbPool,
    state_tx: watch::Sender<SyncState>,
    sub: Option<Subscription<Group>>,
}

impl<S: RemoteStore> SyncBridge<S> {
    #[must_use]
    pub fn new(store: S, pool: DbPool) -> Self {
        let (state_tx, _) = watch::channel(SyncState::Disconnected);
        Self {
            store,
            pool,
            state_tx,
            sub: None,
        }
    }

    /// Observer handle for the bridge state machine.
    #[must_use]
    pub fn state(&self) -> watch::Receiver<SyncState> {
        self.state_tx.subscribe()
    }

    /// Attaches to the remote group list and enters `Syncing`. Also the way
    /// out of a terminal `Error`.
    pub fn subscribe(&mut self) {
        self.sub = Some(self.store.watch_groups());
        self.set_state(SyncState::Syncing);
        tracing::debug!("Sync bridge subscribed to remote group list");
    }

    /// ## Summary
    /// Consumes one remote emission and applies it to the cache.
    ///
    /// Returns `true` while the subscription is live, `false` once it closed
    /// cleanly.
    ///
    /// ## Errors
    /// Returns the store failure that terminated the subscription (the
    /// bridge is left in `Error`), or a database error if the overwrite
    /// fails.
    #[tracing::instrument(skip(self))]
    pub async fn step(&mut self) -> ServiceResult<bool> {
        let sub = self.sub.as_mut().ok_or(ServiceError::CoreError(
            CoreError::InvariantViolation("sync bridge stepped before subscribe"),
        ))?;

        match sub.recv().await {
            Ok(Some(groups)) => {
                self.set_state(SyncState::Syncing);
                self.overwrite_cache(groups).await?;
                self.set_state(SyncState::Synced);
                Ok(true)
            }
            Ok(None) => {
                self.sub = None;
                self.set_state(SyncState::Disconnected);
                tracing::info!("Remote group subscription closed");
                Ok(false)
            }
            Err(error) => {
                self.sub = None;
                self.set_state(SyncState::Error);
                tracing::warn!(%error, "Remote group subscription failed");
                Err(error.into())
            }
        }
    }

    /// ## Summary
    /// Runs the bridge until the subscription closes or fails.
    ///
    /// ## Errors
    /// Returns the failure that ended the run; the state observer sees
    /// `Error` in that case.
    pub async fn run(mut self) -> ServiceResult<()> {
        self.subscribe();
        while self.step().await? {}
        Ok(())
    }

    async fn overwrite_cache(&self, groups: Vec<Group>) -> ServiceResult<()> {
        let pool = self.pool.clone();
        let rows: Vec<GroupRow> = groups.iter().map(GroupRow::from_domain).collect();
        let count = rows.len();

        tokio::task::spawn_blocking(move || -> DbResult<()> {
            let mut conn = connection::checkout(&pool)?;
            query::group::replace_all(&mut conn, &rows)
        })
        .await
        .map_err(|e| ServiceError::TaskJoin(e.to_string()))??;

        tracing::debug!(group_count = count, "Cache overwritten from remote snapshot");
        Ok(())
    }

    fn set_state(&self, state: SyncState) {
        // send_replace so the transition applies with or without observers.
        let _ = self.state_tx.send_replace(state);
    }
}
