//! Table definitions for the local cache.
//!
//! Mirrors the remote tree as three relational tables with cascade foreign
//! keys: deleting a group removes its members, deleting a member removes its
//! transactions. `PRAGMA foreign_keys` is switched on per connection in
//! `connection`.

diesel::table! {
    groups (id) {
        id -> Text,
        name -> Text,
        total_savings -> Text,
        total_loans -> Text,
        number_of_members -> Integer,
    }
}

diesel::table! {
    members (id) {
        id -> Text,
        group_id -> Text,
        name -> Text,
        phone -> Text,
        total_savings -> Text,
        total_loan -> Text,
    }
}

diesel::table! {
    transactions (id) {
        id -> Text,
        group_id -> Text,
        member_id -> Text,
        amount -> Text,
        kind -> Text,
        date -> BigInt,
        description -> Text,
    }
}

diesel::joinable!(members -> groups (group_id));
diesel::joinable!(transactions -> members (member_id));

diesel::allow_tables_to_appear_in_same_query!(groups, members, transactions);
