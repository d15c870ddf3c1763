//! Remote document store contract.
//!
//! The store is a keyed tree, `groups/{groupId}/members/{memberId}/
//! transactions/{transactionId}`. The store mints the key for every new
//! record and the key is copied back onto the entity's identifier before it
//! is stored. Reads are live sequences of full snapshots; writes are
//! awaited round-trips. The local cache is never written here - it only
//! follows remote snapshots through the synchronization bridge.

pub mod memory;
pub mod recording;

use std::future::Future;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use chilimba_core::model::{Group, Member, Transaction, TransactionKind};
use chilimba_core::types::{GroupId, MemberId};

use crate::error::RemoteResult;
use crate::live::Subscription;

/// A transaction about to be appended. The store mints the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub group_id: GroupId,
    pub member_id: MemberId,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub date: DateTime<Utc>,
    pub description: String,
}

/// The persistence adapter's remote side.
///
/// Watch methods attach a listener and return its subscription; the first
/// emission is the current state of the watched path. Mutating methods
/// resolve once the store has accepted or rejected the write - callers must
/// not advance their own state before that.
pub trait RemoteStore: Send + Sync {
    fn create_group(&self, name: &str) -> impl Future<Output = RemoteResult<Group>> + Send;

    fn update_group(&self, group: &Group) -> impl Future<Output = RemoteResult<()>> + Send;

    fn delete_group(&self, group_id: &GroupId) -> impl Future<Output = RemoteResult<()>> + Send;

    fn watch_groups(&self) -> Subscription<Group>;

    fn add_member(
        &self,
        group_id: &GroupId,
        name: &str,
        phone: &str,
    ) -> impl Future<Output = RemoteResult<Member>> + Send;

    fn watch_members(&self, group_id: &GroupId) -> Subscription<Member>;

    fn add_transaction(
        &self,
        new: NewTransaction,
    ) -> impl Future<Output = RemoteResult<Transaction>> + Send;

    /// Watches one member's transactions.
    fn watch_transactions(
        &self,
        group_id: &GroupId,
        member_id: &MemberId,
    ) -> Subscription<Transaction>;

    /// Watches all transactions of a group, spanning its members.
    fn watch_group_transactions(&self, group_id: &GroupId) -> Subscription<Transaction>;
}
