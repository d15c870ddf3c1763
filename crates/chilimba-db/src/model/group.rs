use diesel::{prelude::*, sqlite::Sqlite};
use rust_decimal::Decimal;

use chilimba_core::model::Group;
use chilimba_core::types::GroupId;

use crate::db::schema::groups;
use crate::db::sqlite_types::Money;

/// Cached group record.
///
/// The totals columns are denormalized snapshots kept for the external schema
/// contract; readers recompute aggregates from transactions instead of
/// trusting them.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = groups)]
#[diesel(check_for_backend(Sqlite))]
pub struct GroupRow {
    pub id: String,
    pub name: String,
    pub total_savings: Money,
    pub total_loans: Money,
    pub number_of_members: i32,
}

impl GroupRow {
    /// Builds a row from a domain group with zeroed derived columns.
    #[must_use]
    pub fn from_domain(group: &Group) -> Self {
        Self {
            id: group.id.to_string(),
            name: group.name.clone(),
            total_savings: Money(Decimal::ZERO),
            total_loans: Money(Decimal::ZERO),
            number_of_members: 0,
        }
    }

    #[must_use]
    pub fn into_domain(self) -> Group {
        Group {
            id: GroupId::new(self.id),
            name: self.name,
        }
    }
}
