//! Role-gated facade in front of the persistence adapter.
//!
//! Every mutating call runs the authorization predicate and input validation
//! before the store sees anything; a member-role mutation attempt fails with
//! `Forbidden` without a single adapter call. Writes are awaited round-trips
//! under a bounded timeout - the caller may only advance its own state after
//! the write has resolved, and must not expect the local cache to reflect the
//! write before the next remote snapshot lands.

use std::time::Duration;

use chilimba_core::model::{Group, Member, Transaction};
use chilimba_core::role::{Op, Role, is_permitted};
use chilimba_core::types::{GroupId, MemberId};

use crate::auth::Session;
use crate::error::{RemoteResult, ServiceError, ServiceResult};
use crate::live::Subscription;
use crate::remote::{NewTransaction, RemoteStore};
use crate::validate;

const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(5);

pub struct GroupService<S: RemoteStore> {
    store: S,
    write_timeout: Duration,
}

impl<S: RemoteStore> GroupService<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_write_timeout(store, DEFAULT_WRITE_TIMEOUT)
    }

    #[must_use]
    pub fn with_write_timeout(store: S, write_timeout: Duration) -> Self {
        Self {
            store,
            write_timeout,
        }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// ## Summary
    /// Creates a group with a store-minted key.
    ///
    /// ## Errors
    /// Returns `Forbidden` for a member role, `ValidationError` for a blank
    /// name, and the store's error or `Timeout` if the write fails.
    #[tracing::instrument(skip(self, session), fields(role = %session.role))]
    pub async fn create_group(&self, session: &Session, name: &str) -> ServiceResult<Group> {
        authorize(session.role, Op::CreateGroup)?;
        let name = validate::group_name(name)?;
        self.write("create-group", self.store.create_group(name)).await
    }

    /// ## Summary
    /// Renames an existing group; the cache reflects it only after the next
    /// inbound snapshot.
    ///
    /// ## Errors
    /// Returns `Forbidden` for a member role, `ValidationError` for a blank
    /// name, and the store's error or `Timeout` if the write fails.
    #[tracing::instrument(skip(self, session, group), fields(role = %session.role, group_id = %group.id))]
    pub async fn update_group(&self, session: &Session, group: &Group) -> ServiceResult<()> {
        authorize(session.role, Op::EditGroup)?;
        validate::group_name(&group.name)?;
        self.write("update-group", self.store.update_group(group)).await
    }

    /// ## Summary
    /// Deletes a group; its members and their transactions go with it.
    ///
    /// ## Errors
    /// Returns `Forbidden` for a member role, and the store's error or
    /// `Timeout` if the write fails.
    #[tracing::instrument(skip(self, session), fields(role = %session.role))]
    pub async fn delete_group(&self, session: &Session, group_id: &GroupId) -> ServiceResult<()> {
        authorize(session.role, Op::DeleteGroup)?;
        self.write("delete-group", self.store.delete_group(group_id)).await
    }

    /// ## Summary
    /// Adds a member to a group.
    ///
    /// ## Errors
    /// Returns `Forbidden` for a member role, `ValidationError` for blank
    /// name or phone, and the store's error or `Timeout` if the write fails.
    #[tracing::instrument(skip(self, session), fields(role = %session.role))]
    pub async fn add_member(
        &self,
        session: &Session,
        group_id: &GroupId,
        name: &str,
        phone: &str,
    ) -> ServiceResult<Member> {
        authorize(session.role, Op::AddMember)?;
        let name = validate::member_name(name)?;
        let phone = validate::phone(phone)?;
        self.write("add-member", self.store.add_member(group_id, name, phone))
            .await
    }

    /// ## Summary
    /// Appends a transaction for a member.
    ///
    /// ## Errors
    /// Returns `Forbidden` for a member role, `ValidationError` for a
    /// negative amount, and the store's error or `Timeout` if the write
    /// fails.
    #[tracing::instrument(skip(self, session, new), fields(role = %session.role, kind = %new.kind))]
    pub async fn add_transaction(
        &self,
        session: &Session,
        new: NewTransaction,
    ) -> ServiceResult<Transaction> {
        authorize(session.role, Op::AddTransaction)?;
        validate::amount(new.amount)?;
        self.write("add-transaction", self.store.add_transaction(new))
            .await
    }

    /// ## Summary
    /// Watches the group list.
    ///
    /// ## Errors
    /// Returns `Forbidden` if the role may not view group summaries.
    pub fn watch_groups(&self, session: &Session) -> ServiceResult<Subscription<Group>> {
        authorize(session.role, Op::ViewGroupSummary)?;
        Ok(self.store.watch_groups())
    }

    /// ## Summary
    /// Watches one group's member list.
    ///
    /// ## Errors
    /// Returns `Forbidden` if the role may not view group summaries.
    pub fn watch_members(
        &self,
        session: &Session,
        group_id: &GroupId,
    ) -> ServiceResult<Subscription<Member>> {
        authorize(session.role, Op::ViewGroupSummary)?;
        Ok(self.store.watch_members(group_id))
    }

    /// ## Summary
    /// Watches one member's transaction history.
    ///
    /// ## Errors
    /// Returns `Forbidden` if the role may not view transaction history.
    pub fn watch_member_transactions(
        &self,
        session: &Session,
        group_id: &GroupId,
        member_id: &MemberId,
    ) -> ServiceResult<Subscription<Transaction>> {
        authorize(session.role, Op::ViewOwnHistory)?;
        Ok(self.store.watch_transactions(group_id, member_id))
    }

    /// ## Summary
    /// Watches all transactions of a group across its members; the feed the
    /// reports are derived from.
    ///
    /// ## Errors
    /// Returns `Forbidden` if the role may not view reports.
    pub fn watch_group_transactions(
        &self,
        session: &Session,
        group_id: &GroupId,
    ) -> ServiceResult<Subscription<Transaction>> {
        authorize(session.role, Op::ViewReports)?;
        Ok(self.store.watch_group_transactions(group_id))
    }

    async fn write<T>(
        &self,
        op: &'static str,
        fut: impl Future<Output = RemoteResult<T>>,
    ) -> ServiceResult<T> {
        match tokio::time::timeout(self.write_timeout, fut).await {
            Ok(result) => Ok(result?),
            Err(_) => {
                tracing::warn!(op, timeout = ?self.write_timeout, "Remote write timed out");
                Err(ServiceError::Timeout(op))
            }
        }
    }
}

fn authorize(role: Role, op: Op) -> ServiceResult<()> {
    if is_permitted(role, op) {
        Ok(())
    } else {
        tracing::warn!(%role, %op, "Operation rejected by role gate");
        Err(ServiceError::Forbidden { role, op })
    }
}
