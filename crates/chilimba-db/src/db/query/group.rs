//! Queries against the cached `groups` table.
//!
//! Only the synchronization bridge writes here in production; everything else
//! is read-only against the cache.

use diesel::prelude::*;

use chilimba_core::model::Group;
use chilimba_core::types::GroupId;

use crate::db::schema::groups;
use crate::error::DbResult;
use crate::model::group::GroupRow;

/// ## Summary
/// Inserts a single cached group row.
///
/// ## Errors
/// Returns a database error if the insert fails.
pub fn insert(conn: &mut SqliteConnection, row: &GroupRow) -> DbResult<()> {
    diesel::insert_into(groups::table).values(row).execute(conn)?;
    Ok(())
}

/// ## Summary
/// Lists all cached groups ordered by name.
///
/// ## Errors
/// Returns a database error if the query fails.
pub fn list(conn: &mut SqliteConnection) -> DbResult<Vec<Group>> {
    let rows = groups::table
        .order(groups::name.asc())
        .load::<GroupRow>(conn)?;

    Ok(rows.into_iter().map(GroupRow::into_domain).collect())
}

/// ## Summary
/// Finds a cached group by id.
///
/// ## Errors
/// Returns a database error if the query fails.
pub fn find(conn: &mut SqliteConnection, id: &GroupId) -> DbResult<Option<Group>> {
    let row = groups::table
        .find(id.as_str())
        .first::<GroupRow>(conn)
        .optional()?;

    Ok(row.map(GroupRow::into_domain))
}

/// ## Summary
/// Overwrites the whole cached group table with a remote snapshot.
///
/// Delete-all-then-insert-all in one transaction: remote wins, no diffing.
/// Cascade foreign keys clear cached members and transactions of groups that
/// vanish from the snapshot.
///
/// ## Errors
/// Returns a database error if the transaction fails; nothing is applied in
/// that case.
pub fn replace_all(conn: &mut SqliteConnection, rows: &[GroupRow]) -> DbResult<()> {
    conn.transaction::<_, diesel::result::Error, _>(|conn| {
        diesel::delete(groups::table).execute(conn)?;
        if !rows.is_empty() {
            diesel::insert_into(groups::table).values(rows).execute(conn)?;
        }
        Ok(())
    })?;

    tracing::debug!(group_count = rows.len(), "Replaced cached group table");

    Ok(())
}

/// ## Summary
/// Deletes a cached group; members and transactions cascade.
///
/// ## Errors
/// Returns a database error if the delete fails.
pub fn delete(conn: &mut SqliteConnection, id: &GroupId) -> DbResult<usize> {
    Ok(diesel::delete(groups::table.find(id.as_str())).execute(conn)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{checkout, test_group_row, test_pool};

    #[test_log::test]
    fn test_insert_then_list_orders_by_name() {
        let pool = test_pool();
        let mut conn = checkout(&pool);

        insert(&mut conn, &test_group_row("g-2", "Village Bank")).unwrap();
        insert(&mut conn, &test_group_row("g-1", "Chilimba A")).unwrap();

        let names: Vec<String> = list(&mut conn).unwrap().into_iter().map(|g| g.name).collect();
        assert_eq!(names, ["Chilimba A", "Village Bank"]);
    }

    #[test_log::test]
    fn test_replace_all_is_remote_wins() {
        let pool = test_pool();
        let mut conn = checkout(&pool);

        insert(&mut conn, &test_group_row("g-1", "Stale Local Name")).unwrap();

        let snapshot = [
            test_group_row("g-1", "Renamed Remotely"),
            test_group_row("g-3", "Brand New"),
        ];
        replace_all(&mut conn, &snapshot).unwrap();

        let groups = list(&mut conn).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(
            find(&mut conn, &GroupId::new("g-1")).unwrap().unwrap().name,
            "Renamed Remotely"
        );
    }

    #[test_log::test]
    fn test_replace_all_with_empty_snapshot_clears_cache() {
        let pool = test_pool();
        let mut conn = checkout(&pool);

        insert(&mut conn, &test_group_row("g-1", "Chilimba A")).unwrap();
        replace_all(&mut conn, &[]).unwrap();

        assert!(list(&mut conn).unwrap().is_empty());
    }
}
