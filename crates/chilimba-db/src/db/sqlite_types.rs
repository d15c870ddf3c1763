//! Column wrappers with Diesel serialization for SQLite.
//!
//! Amounts are stored as decimal text so no precision is lost to floating
//! point; transaction kinds map to the CHECK-constrained wire spellings.

use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::{Sqlite, SqliteValue};
use rust_decimal::Decimal;

use chilimba_core::model::TransactionKind;

/// Exact monetary amount persisted as decimal text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
pub struct Money(pub Decimal);

impl ToSql<Text, Sqlite> for Money {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.0.to_string());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for Money {
    fn from_sql(bytes: SqliteValue<'_, '_, '_>) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Sqlite>>::from_sql(bytes)?;
        Ok(Self(s.parse::<Decimal>()?))
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

/// Transaction kind persisted with its wire spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
pub struct Kind(pub TransactionKind);

impl ToSql<Text, Sqlite> for Kind {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.0.as_str().to_owned());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for Kind {
    fn from_sql(bytes: SqliteValue<'_, '_, '_>) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Sqlite>>::from_sql(bytes)?;
        TransactionKind::parse(&s)
            .map(Self)
            .ok_or_else(|| format!("unrecognized transaction kind: {s}").into())
    }
}
