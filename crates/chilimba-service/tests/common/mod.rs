#![expect(dead_code, reason = "Not every helper is used by every test binary")]
//! Shared helpers for service integration tests.

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;

use chilimba_core::model::TransactionKind;
use chilimba_core::role::Role;
use chilimba_core::types::{GroupId, MemberId, UserId};
use chilimba_service::auth::Session;
use chilimba_service::live::Subscription;
use chilimba_service::remote::NewTransaction;

pub fn admin_session() -> Session {
    Session::with_role(UserId::new("u-admin"), Role::Admin)
}

pub fn member_session() -> Session {
    Session::with_role(UserId::new("u-member"), Role::Member)
}

pub fn new_txn(
    group_id: &GroupId,
    member_id: &MemberId,
    kind: TransactionKind,
    amount: i64,
    description: &str,
) -> NewTransaction {
    NewTransaction {
        group_id: group_id.clone(),
        member_id: member_id.clone(),
        amount: Decimal::from(amount),
        kind,
        date: Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap(),
        description: description.to_owned(),
    }
}

/// Receives the next emission, failing the test on a closed or errored
/// sequence.
pub async fn next_snapshot<T>(sub: &mut Subscription<T>) -> Vec<T> {
    sub.recv()
        .await
        .expect("subscription errored")
        .expect("subscription closed")
}
