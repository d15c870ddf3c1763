use chrono::DateTime;
use diesel::{prelude::*, sqlite::Sqlite};

use chilimba_core::error::CoreError;
use chilimba_core::model::Transaction;
use chilimba_core::types::{GroupId, MemberId, TransactionId};

use crate::db::schema::transactions;
use crate::db::sqlite_types::{Kind, Money};
use crate::error::DbResult;

/// Cached transaction record. Dates are stored as epoch milliseconds, the
/// representation the remote tree uses.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = transactions)]
#[diesel(check_for_backend(Sqlite))]
pub struct TransactionRow {
    pub id: String,
    pub group_id: String,
    pub member_id: String,
    pub amount: Money,
    pub kind: Kind,
    pub date: i64,
    pub description: String,
}

impl TransactionRow {
    #[must_use]
    pub fn from_domain(txn: &Transaction) -> Self {
        Self {
            id: txn.id.to_string(),
            group_id: txn.group_id.to_string(),
            member_id: txn.member_id.to_string(),
            amount: Money(txn.amount),
            kind: Kind(txn.kind),
            date: txn.date.timestamp_millis(),
            description: txn.description.clone(),
        }
    }

    /// ## Summary
    /// Converts the row back into the domain transaction.
    ///
    /// ## Errors
    /// Returns an invariant violation if the stored date is outside the
    /// representable range.
    pub fn into_domain(self) -> DbResult<Transaction> {
        let date = DateTime::from_timestamp_millis(self.date)
            .ok_or(CoreError::InvariantViolation("transaction date out of range"))?;

        Ok(Transaction {
            id: TransactionId::new(self.id),
            group_id: GroupId::new(self.group_id),
            member_id: MemberId::new(self.member_id),
            amount: self.amount.0,
            kind: self.kind.0,
            date,
            description: self.description,
        })
    }
}
