use diesel::{prelude::*, sqlite::Sqlite};
use rust_decimal::Decimal;

use chilimba_core::model::Member;
use chilimba_core::types::{GroupId, MemberId};

use crate::db::schema::members;
use crate::db::sqlite_types::Money;

/// Cached member record. Totals columns follow the same non-authoritative
/// rule as on `GroupRow`.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = members)]
#[diesel(check_for_backend(Sqlite))]
pub struct MemberRow {
    pub id: String,
    pub group_id: String,
    pub name: String,
    pub phone: String,
    pub total_savings: Money,
    pub total_loan: Money,
}

impl MemberRow {
    #[must_use]
    pub fn from_domain(member: &Member) -> Self {
        Self {
            id: member.id.to_string(),
            group_id: member.group_id.to_string(),
            name: member.name.clone(),
            phone: member.phone.clone(),
            total_savings: Money(Decimal::ZERO),
            total_loan: Money(Decimal::ZERO),
        }
    }

    #[must_use]
    pub fn into_domain(self) -> Member {
        Member {
            id: MemberId::new(self.id),
            group_id: GroupId::new(self.group_id),
            name: self.name,
            phone: self.phone,
        }
    }
}
