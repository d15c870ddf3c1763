//! Role-based authorization vocabulary.
//!
//! A single pure predicate decides the permitted operation set for a role.
//! Callers must consult it before invoking any mutating persistence call;
//! hiding a control in a front end is not enforcement.

use serde::{Deserialize, Serialize};

/// Role of the signed-in user, resolved by the auth gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Member,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Member => "MEMBER",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operations subject to the role gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    CreateGroup,
    EditGroup,
    DeleteGroup,
    AddMember,
    AddTransaction,
    ViewReports,
    ViewGroupSummary,
    ViewOwnHistory,
}

impl Op {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateGroup => "create-group",
            Self::EditGroup => "edit-group",
            Self::DeleteGroup => "delete-group",
            Self::AddMember => "add-member",
            Self::AddTransaction => "add-transaction",
            Self::ViewReports => "view-reports",
            Self::ViewGroupSummary => "view-group-summary",
            Self::ViewOwnHistory => "view-own-history",
        }
    }

    /// Returns `true` for operations that change stored state.
    #[must_use]
    pub const fn is_mutating(self) -> bool {
        matches!(
            self,
            Self::CreateGroup
                | Self::EditGroup
                | Self::DeleteGroup
                | Self::AddMember
                | Self::AddTransaction
        )
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ## Summary
/// The authorization predicate: may `role` perform `op`?
///
/// Admins may do everything. Members are read-only: their own group's
/// aggregates and their own transaction history.
#[must_use]
pub const fn is_permitted(role: Role, op: Op) -> bool {
    match role {
        Role::Admin => true,
        Role::Member => matches!(op, Op::ViewGroupSummary | Op::ViewOwnHistory),
    }
}
