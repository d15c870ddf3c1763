//! Queries against the cached `members` table.

use diesel::prelude::*;

use chilimba_core::model::Member;
use chilimba_core::types::{GroupId, MemberId};

use crate::db::schema::members;
use crate::error::DbResult;
use crate::model::member::MemberRow;

/// ## Summary
/// Inserts a single cached member row.
///
/// ## Errors
/// Returns a database error if the insert fails, including a foreign key
/// violation when the owning group is not cached.
pub fn insert(conn: &mut SqliteConnection, row: &MemberRow) -> DbResult<()> {
    diesel::insert_into(members::table).values(row).execute(conn)?;
    Ok(())
}

/// ## Summary
/// Lists the cached members of one group ordered by name.
///
/// ## Errors
/// Returns a database error if the query fails.
pub fn list_for_group(conn: &mut SqliteConnection, group_id: &GroupId) -> DbResult<Vec<Member>> {
    let rows = members::table
        .filter(members::group_id.eq(group_id.as_str()))
        .order(members::name.asc())
        .load::<MemberRow>(conn)?;

    Ok(rows.into_iter().map(MemberRow::into_domain).collect())
}

/// ## Summary
/// Finds a cached member by id.
///
/// ## Errors
/// Returns a database error if the query fails.
pub fn find(conn: &mut SqliteConnection, id: &MemberId) -> DbResult<Option<Member>> {
    let row = members::table
        .find(id.as_str())
        .first::<MemberRow>(conn)
        .optional()?;

    Ok(row.map(MemberRow::into_domain))
}
