//! In-process reference implementation of the remote store.
//!
//! Holds the document tree under a mutex and fans snapshots out through one
//! hub per watched path. Used as the local-development backend and as the
//! test double; the fault hooks exist for the latter.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chilimba_core::model::{Group, Member, Transaction};
use chilimba_core::types::{GroupId, MemberId, TransactionId};

use crate::error::{RemoteError, RemoteResult};
use crate::live::{Hub, Subscription};
use crate::remote::{NewTransaction, RemoteStore};

#[derive(Default)]
struct Tree {
    groups: BTreeMap<String, GroupNode>,
}

struct GroupNode {
    group: Group,
    members: BTreeMap<String, MemberNode>,
}

struct MemberNode {
    member: Member,
    transactions: BTreeMap<String, Transaction>,
}

#[derive(Default)]
struct Hubs {
    groups: Hub<Group>,
    members: Mutex<HashMap<GroupId, Hub<Member>>>,
    member_txns: Mutex<HashMap<(GroupId, MemberId), Hub<Transaction>>>,
    group_txns: Mutex<HashMap<GroupId, Hub<Transaction>>>,
}

/// In-memory keyed document tree with live watchers.
#[derive(Clone, Default)]
pub struct MemoryRemoteStore {
    tree: Arc<Mutex<Tree>>,
    hubs: Arc<Hubs>,
    deny_writes: Arc<AtomicBool>,
}

fn mint_key() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl MemoryRemoteStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn tree(&self) -> MutexGuard<'_, Tree> {
        self.tree.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_writable(&self) -> RemoteResult<()> {
        if self.deny_writes.load(Ordering::Relaxed) {
            return Err(RemoteError::PermissionDenied(
                "write denied by store".to_owned(),
            ));
        }
        Ok(())
    }

    fn members_hub(&self, group_id: &GroupId) -> Hub<Member> {
        self.hubs
            .members
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(group_id.clone())
            .or_default()
            .clone()
    }

    fn member_txns_hub(&self, group_id: &GroupId, member_id: &MemberId) -> Hub<Transaction> {
        self.hubs
            .member_txns
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry((group_id.clone(), member_id.clone()))
            .or_default()
            .clone()
    }

    fn group_txns_hub(&self, group_id: &GroupId) -> Hub<Transaction> {
        self.hubs
            .group_txns
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(group_id.clone())
            .or_default()
            .clone()
    }

    /// Terminates every group-list subscription with a store failure.
    /// Test hook for the connectivity failure path.
    pub fn fail_group_watchers(&self, error: &RemoteError) {
        self.hubs.groups.fail(error);
    }

    /// Makes every subsequent write fail with `PermissionDenied`.
    /// Test hook for the auth-expired failure path.
    pub fn set_write_denied(&self, denied: bool) {
        self.deny_writes.store(denied, Ordering::Relaxed);
    }

    /// Number of live group-list watchers.
    #[must_use]
    pub fn group_watcher_count(&self) -> usize {
        self.hubs.groups.listener_count()
    }

    fn groups_snapshot(tree: &Tree) -> Vec<Group> {
        let mut groups: Vec<Group> = tree.groups.values().map(|n| n.group.clone()).collect();
        groups.sort_by(|a, b| a.name.cmp(&b.name));
        groups
    }

    fn members_snapshot(tree: &Tree, group_id: &GroupId) -> Vec<Member> {
        let Some(node) = tree.groups.get(group_id.as_str()) else {
            return Vec::new();
        };
        let mut members: Vec<Member> = node.members.values().map(|n| n.member.clone()).collect();
        members.sort_by(|a, b| a.name.cmp(&b.name));
        members
    }

    fn member_txns_snapshot(
        tree: &Tree,
        group_id: &GroupId,
        member_id: &MemberId,
    ) -> Vec<Transaction> {
        let mut txns: Vec<Transaction> = tree
            .groups
            .get(group_id.as_str())
            .and_then(|g| g.members.get(member_id.as_str()))
            .map(|m| m.transactions.values().cloned().collect())
            .unwrap_or_default();
        txns.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
        txns
    }

    fn group_txns_snapshot(tree: &Tree, group_id: &GroupId) -> Vec<Transaction> {
        let mut txns: Vec<Transaction> = tree
            .groups
            .get(group_id.as_str())
            .map(|g| {
                g.members
                    .values()
                    .flat_map(|m| m.transactions.values().cloned())
                    .collect()
            })
            .unwrap_or_default();
        txns.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
        txns
    }

    fn publish_groups(&self, tree: &Tree) {
        self.hubs.groups.publish(&Self::groups_snapshot(tree));
    }
}

impl RemoteStore for MemoryRemoteStore {
    async fn create_group(&self, name: &str) -> RemoteResult<Group> {
        self.check_writable()?;

        let group = Group {
            id: GroupId::new(mint_key()),
            name: name.to_owned(),
        };

        let mut tree = self.tree();
        tree.groups.insert(
            group.id.to_string(),
            GroupNode {
                group: group.clone(),
                members: BTreeMap::new(),
            },
        );
        self.publish_groups(&tree);
        drop(tree);

        tracing::debug!(group_id = %group.id, name = %group.name, "Created group");
        Ok(group)
    }

    async fn update_group(&self, group: &Group) -> RemoteResult<()> {
        self.check_writable()?;

        let mut tree = self.tree();
        let node = tree
            .groups
            .get_mut(group.id.as_str())
            .ok_or_else(|| RemoteError::NotFound(format!("group {}", group.id)))?;
        node.group = group.clone();
        self.publish_groups(&tree);
        drop(tree);

        tracing::debug!(group_id = %group.id, "Updated group");
        Ok(())
    }

    async fn delete_group(&self, group_id: &GroupId) -> RemoteResult<()> {
        self.check_writable()?;

        let mut tree = self.tree();
        let node = tree
            .groups
            .remove(group_id.as_str())
            .ok_or_else(|| RemoteError::NotFound(format!("group {group_id}")))?;
        self.publish_groups(&tree);
        self.members_hub(group_id).publish(&[]);
        self.group_txns_hub(group_id).publish(&[]);
        for member_key in node.members.keys() {
            self.member_txns_hub(group_id, &MemberId::new(member_key.clone()))
                .publish(&[]);
        }
        drop(tree);

        // The subtree's hubs go with it. Surviving subscriptions see the
        // empty snapshot above and then a clean close.
        self.hubs
            .members
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(group_id);
        self.hubs
            .group_txns
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(group_id);
        self.hubs
            .member_txns
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(owner, _), _| owner != group_id);

        tracing::debug!(%group_id, "Deleted group subtree");
        Ok(())
    }

    fn watch_groups(&self) -> Subscription<Group> {
        let tree = self.tree();
        self.hubs.groups.subscribe_with(Self::groups_snapshot(&tree))
    }

    async fn add_member(
        &self,
        group_id: &GroupId,
        name: &str,
        phone: &str,
    ) -> RemoteResult<Member> {
        self.check_writable()?;

        let member = Member {
            id: MemberId::new(mint_key()),
            group_id: group_id.clone(),
            name: name.to_owned(),
            phone: phone.to_owned(),
        };

        let mut tree = self.tree();
        let node = tree
            .groups
            .get_mut(group_id.as_str())
            .ok_or_else(|| RemoteError::NotFound(format!("group {group_id}")))?;
        node.members.insert(
            member.id.to_string(),
            MemberNode {
                member: member.clone(),
                transactions: BTreeMap::new(),
            },
        );
        self.members_hub(group_id)
            .publish(&Self::members_snapshot(&tree, group_id));
        drop(tree);

        tracing::debug!(%group_id, member_id = %member.id, "Added member");
        Ok(member)
    }

    fn watch_members(&self, group_id: &GroupId) -> Subscription<Member> {
        let tree = self.tree();
        self.members_hub(group_id)
            .subscribe_with(Self::members_snapshot(&tree, group_id))
    }

    async fn add_transaction(&self, new: NewTransaction) -> RemoteResult<Transaction> {
        self.check_writable()?;

        let txn = Transaction {
            id: TransactionId::new(mint_key()),
            group_id: new.group_id.clone(),
            member_id: new.member_id.clone(),
            amount: new.amount,
            kind: new.kind,
            date: new.date,
            description: new.description,
        };

        let mut tree = self.tree();
        let member = tree
            .groups
            .get_mut(new.group_id.as_str())
            .ok_or_else(|| RemoteError::NotFound(format!("group {}", new.group_id)))?
            .members
            .get_mut(new.member_id.as_str())
            .ok_or_else(|| RemoteError::NotFound(format!("member {}", new.member_id)))?;
        member.transactions.insert(txn.id.to_string(), txn.clone());

        self.member_txns_hub(&new.group_id, &new.member_id).publish(
            &Self::member_txns_snapshot(&tree, &new.group_id, &new.member_id),
        );
        self.group_txns_hub(&new.group_id)
            .publish(&Self::group_txns_snapshot(&tree, &new.group_id));
        drop(tree);

        tracing::debug!(
            group_id = %txn.group_id,
            member_id = %txn.member_id,
            kind = %txn.kind,
            "Appended transaction"
        );
        Ok(txn)
    }

    fn watch_transactions(
        &self,
        group_id: &GroupId,
        member_id: &MemberId,
    ) -> Subscription<Transaction> {
        let tree = self.tree();
        self.member_txns_hub(group_id, member_id)
            .subscribe_with(Self::member_txns_snapshot(&tree, group_id, member_id))
    }

    fn watch_group_transactions(&self, group_id: &GroupId) -> Subscription<Transaction> {
        let tree = self.tree();
        self.group_txns_hub(group_id)
            .subscribe_with(Self::group_txns_snapshot(&tree, group_id))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use chilimba_core::model::TransactionKind;

    use super::*;

    fn new_txn(group_id: &GroupId, member_id: &MemberId, amount: u32) -> NewTransaction {
        NewTransaction {
            group_id: group_id.clone(),
            member_id: member_id.clone(),
            amount: Decimal::from(amount),
            kind: TransactionKind::Deposit,
            date: Utc::now(),
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn test_store_mints_and_copies_back_keys() {
        let store = MemoryRemoteStore::new();

        let group = store.create_group("Chilimba A").await.unwrap();
        assert!(!group.id.is_empty());

        let member = store.add_member(&group.id, "Grace Phiri", "0991000000").await.unwrap();
        assert!(!member.id.is_empty());
        assert_eq!(member.group_id, group.id);

        let txn = store.add_transaction(new_txn(&group.id, &member.id, 100)).await.unwrap();
        assert!(!txn.id.is_empty());
    }

    #[tokio::test]
    async fn test_watchers_get_snapshot_per_change() {
        let store = MemoryRemoteStore::new();
        let mut sub = store.watch_groups();
        assert_eq!(sub.recv().await.unwrap(), Some(vec![]));

        let group = store.create_group("Chilimba A").await.unwrap();
        assert_eq!(sub.recv().await.unwrap(), Some(vec![group.clone()]));

        let renamed = Group {
            name: "Chilimba A (2026)".to_owned(),
            ..group
        };
        store.update_group(&renamed).await.unwrap();
        assert_eq!(sub.recv().await.unwrap(), Some(vec![renamed]));
    }

    #[tokio::test]
    async fn test_group_transactions_span_members() {
        let store = MemoryRemoteStore::new();
        let group = store.create_group("Chilimba A").await.unwrap();
        let grace = store.add_member(&group.id, "Grace", "01").await.unwrap();
        let john = store.add_member(&group.id, "John", "02").await.unwrap();

        store.add_transaction(new_txn(&group.id, &grace.id, 100)).await.unwrap();
        store.add_transaction(new_txn(&group.id, &john.id, 200)).await.unwrap();

        let mut sub = store.watch_group_transactions(&group.id);
        let snapshot = sub.recv().await.unwrap().unwrap();
        assert_eq!(snapshot.len(), 2);
    }

    #[tokio::test]
    async fn test_update_of_unknown_group_is_not_found() {
        let store = MemoryRemoteStore::new();
        let ghost = Group {
            id: GroupId::new("missing"),
            name: "Ghost".to_owned(),
        };
        assert!(matches!(
            store.update_group(&ghost).await,
            Err(RemoteError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_denied_write_surfaces_permission_error() {
        let store = MemoryRemoteStore::new();
        store.set_write_denied(true);
        assert!(matches!(
            store.create_group("Chilimba A").await,
            Err(RemoteError::PermissionDenied(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_group_clears_subtree_watchers() {
        let store = MemoryRemoteStore::new();
        let group = store.create_group("Chilimba A").await.unwrap();
        let grace = store.add_member(&group.id, "Grace", "01").await.unwrap();
        store.add_transaction(new_txn(&group.id, &grace.id, 100)).await.unwrap();

        let mut members = store.watch_members(&group.id);
        let mut txns = store.watch_group_transactions(&group.id);
        assert_eq!(members.recv().await.unwrap().map(|m| m.len()), Some(1));
        assert_eq!(txns.recv().await.unwrap().map(|t| t.len()), Some(1));

        store.delete_group(&group.id).await.unwrap();

        assert_eq!(members.recv().await.unwrap(), Some(vec![]));
        assert_eq!(txns.recv().await.unwrap(), Some(vec![]));
    }

    #[tokio::test]
    async fn test_delete_group_releases_its_subtree_hubs() {
        let store = MemoryRemoteStore::new();
        let group = store.create_group("Chilimba A").await.unwrap();
        let grace = store.add_member(&group.id, "Grace", "01").await.unwrap();
        store.add_transaction(new_txn(&group.id, &grace.id, 100)).await.unwrap();

        let mut history = store.watch_transactions(&group.id, &grace.id);
        assert_eq!(history.recv().await.unwrap().map(|t| t.len()), Some(1));

        store.delete_group(&group.id).await.unwrap();

        // Final empty snapshot, then a clean close once the hub is gone.
        assert_eq!(history.recv().await.unwrap(), Some(vec![]));
        assert_eq!(history.recv().await.unwrap(), None);

        assert!(store.hubs.members.lock().unwrap().is_empty());
        assert!(store.hubs.group_txns.lock().unwrap().is_empty());
        assert!(store.hubs.member_txns.lock().unwrap().is_empty());
    }
}
