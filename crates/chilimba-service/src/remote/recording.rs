//! Recording wrapper around a remote store.
//!
//! Counts mutating calls so tests can assert that a rejected operation never
//! reached the persistence adapter at all.

use std::sync::atomic::{AtomicUsize, Ordering};

use chilimba_core::model::{Group, Member, Transaction};
use chilimba_core::types::{GroupId, MemberId};

use crate::error::RemoteResult;
use crate::live::Subscription;
use crate::remote::{NewTransaction, RemoteStore};

pub struct RecordingStore<S> {
    inner: S,
    write_calls: AtomicUsize,
}

impl<S> RecordingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            write_calls: AtomicUsize::new(0),
        }
    }

    /// Number of mutating calls that reached the wrapped store.
    #[must_use]
    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::Relaxed)
    }

    fn record_write(&self) {
        self.write_calls.fetch_add(1, Ordering::Relaxed);
    }
}

impl<S: RemoteStore> RemoteStore for RecordingStore<S> {
    async fn create_group(&self, name: &str) -> RemoteResult<Group> {
        self.record_write();
        self.inner.create_group(name).await
    }

    async fn update_group(&self, group: &Group) -> RemoteResult<()> {
        self.record_write();
        self.inner.update_group(group).await
    }

    async fn delete_group(&self, group_id: &GroupId) -> RemoteResult<()> {
        self.record_write();
        self.inner.delete_group(group_id).await
    }

    fn watch_groups(&self) -> Subscription<Group> {
        self.inner.watch_groups()
    }

    async fn add_member(
        &self,
        group_id: &GroupId,
        name: &str,
        phone: &str,
    ) -> RemoteResult<Member> {
        self.record_write();
        self.inner.add_member(group_id, name, phone).await
    }

    fn watch_members(&self, group_id: &GroupId) -> Subscription<Member> {
        self.inner.watch_members(group_id)
    }

    async fn add_transaction(&self, new: NewTransaction) -> RemoteResult<Transaction> {
        self.record_write();
        self.inner.add_transaction(new).await
    }

    fn watch_transactions(
        &self,
        group_id: &GroupId,
        member_id: &MemberId,
    ) -> Subscription<Transaction> {
        self.inner.watch_transactions(group_id, member_id)
    }

    fn watch_group_transactions(&self, group_id: &GroupId) -> Subscription<Transaction> {
        self.inner.watch_group_transactions(group_id)
    }
}
