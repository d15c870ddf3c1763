#![expect(clippy::unwrap_used, reason = "Test fixtures")]
//! Test fixtures for cache database tests.
//!
//! Builds a single-connection in-memory SQLite pool with migrations applied.
//! A pool size of one keeps every checkout on the same in-memory database.

use chilimba_core::model::TransactionKind;
use rust_decimal::Decimal;

use crate::db::connection::{self, DbConnection, DbPool};
use crate::db::migrate::run_migrations;
use crate::db::sqlite_types::{Kind, Money};
use crate::model::group::GroupRow;
use crate::model::member::MemberRow;
use crate::model::transaction::TransactionRow;

/// Creates a migrated in-memory database pool.
#[must_use]
pub fn test_pool() -> DbPool {
    let pool = connection::create_pool(":memory:", 1).unwrap();
    let mut conn = pool.get().unwrap();
    run_migrations(&mut conn).unwrap();
    pool
}

/// Checks out the pool's single connection.
#[must_use]
pub fn checkout(pool: &DbPool) -> DbConnection {
    connection::checkout(pool).unwrap()
}

#[must_use]
pub fn test_group_row(id: &str, name: &str) -> GroupRow {
    GroupRow {
        id: id.to_owned(),
        name: name.to_owned(),
        total_savings: Money(Decimal::ZERO),
        total_loans: Money(Decimal::ZERO),
        number_of_members: 0,
    }
}

#[must_use]
pub fn test_member_row(id: &str, group_id: &str, name: &str) -> MemberRow {
    MemberRow {
        id: id.to_owned(),
        group_id: group_id.to_owned(),
        name: name.to_owned(),
        phone: "0991000000".to_owned(),
        total_savings: Money(Decimal::ZERO),
        total_loan: Money(Decimal::ZERO),
    }
}

#[must_use]
pub fn test_transaction_row(
    id: &str,
    group_id: &str,
    member_id: &str,
    kind: TransactionKind,
    amount: &str,
) -> TransactionRow {
    TransactionRow {
        id: id.to_owned(),
        group_id: group_id.to_owned(),
        member_id: member_id.to_owned(),
        amount: Money(amount.parse().unwrap()),
        kind: Kind(kind),
        date: 1_700_000_000_000,
        description: String::new(),
    }
}
