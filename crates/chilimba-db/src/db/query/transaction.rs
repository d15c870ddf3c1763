//! Queries against the cached `transactions` table.
//!
//! Transactions are append-only: insert and read, no update.

use diesel::prelude::*;
use rust_decimal::Decimal;

use chilimba_core::model::{Transaction, TransactionKind};
use chilimba_core::types::{GroupId, MemberId};

use crate::db::schema::transactions;
use crate::db::sqlite_types::Money;
use crate::error::DbResult;
use crate::model::transaction::TransactionRow;

/// ## Summary
/// Inserts a single cached transaction row.
///
/// ## Errors
/// Returns a database error if the insert fails, including a foreign key
/// violation when the owning member is not cached.
pub fn insert(conn: &mut SqliteConnection, row: &TransactionRow) -> DbResult<()> {
    diesel::insert_into(transactions::table)
        .values(row)
        .execute(conn)?;
    Ok(())
}

/// ## Summary
/// Lists one member's cached transactions, newest first.
///
/// ## Errors
/// Returns a database error if the query fails or a row fails to convert.
pub fn list_for_member(
    conn: &mut SqliteConnection,
    member_id: &MemberId,
) -> DbResult<Vec<Transaction>> {
    let rows = transactions::table
        .filter(transactions::member_id.eq(member_id.as_str()))
        .order(transactions::date.desc())
        .load::<TransactionRow>(conn)?;

    rows.into_iter().map(TransactionRow::into_domain).collect()
}

/// ## Summary
/// Lists all cached transactions of a group across its members, newest first.
///
/// ## Errors
/// Returns a database error if the query fails or a row fails to convert.
pub fn list_for_group(
    conn: &mut SqliteConnection,
    group_id: &GroupId,
) -> DbResult<Vec<Transaction>> {
    let rows = transactions::table
        .filter(transactions::group_id.eq(group_id.as_str()))
        .order(transactions::date.desc())
        .load::<TransactionRow>(conn)?;

    rows.into_iter().map(TransactionRow::into_domain).collect()
}

/// ## Summary
/// Sums one member's cached amounts of a given kind.
///
/// Amounts are decimal text, so the fold happens here rather than as a SQL
/// SUM over floating point.
///
/// ## Errors
/// Returns a database error if the query fails.
pub fn total_for_member(
    conn: &mut SqliteConnection,
    member_id: &MemberId,
    kind: TransactionKind,
) -> DbResult<Decimal> {
    let amounts = transactions::table
        .filter(transactions::member_id.eq(member_id.as_str()))
        .filter(transactions::kind.eq(kind.as_str()))
        .select(transactions::amount)
        .load::<Money>(conn)?;

    Ok(amounts.into_iter().map(|m| m.0).sum())
}

/// ## Summary
/// Sums a group's cached amounts of a given kind across all members.
///
/// ## Errors
/// Returns a database error if the query fails.
pub fn total_for_group(
    conn: &mut SqliteConnection,
    group_id: &GroupId,
    kind: TransactionKind,
) -> DbResult<Decimal> {
    let amounts = transactions::table
        .filter(transactions::group_id.eq(group_id.as_str()))
        .filter(transactions::kind.eq(kind.as_str()))
        .select(transactions::amount)
        .load::<Money>(conn)?;

    Ok(amounts.into_iter().map(|m| m.0).sum())
}
