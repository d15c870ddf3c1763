//! Domain entities for savings groups.
//!
//! `Group` and `Member` intentionally carry no stored totals: every aggregate
//! (savings, loans, member counts) is a pure function of the current
//! transaction set and is recomputed on demand. The summary types here are the
//! derived projections, never authoritative state.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{GroupId, MemberId, TransactionId};

/// A savings circle containing members and their transactions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
}

/// A participant within exactly one group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub group_id: GroupId,
    pub name: String,
    pub phone: String,
}

/// Monetary event classification.
///
/// Serialized with the store's wire spelling (`DEPOSIT`, `LOAN`,
/// `LOAN_REPAYMENT`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Deposit,
    Loan,
    LoanRepayment,
}

impl TransactionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "DEPOSIT",
            Self::Loan => "LOAN",
            Self::LoanRepayment => "LOAN_REPAYMENT",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "DEPOSIT" => Some(Self::Deposit),
            "LOAN" => Some(Self::Loan),
            "LOAN_REPAYMENT" => Some(Self::LoanRepayment),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An append-only monetary event tied to one member.
///
/// There is no update operation anywhere in the system; corrections are
/// expressed as new transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub group_id: GroupId,
    pub member_id: MemberId,
    /// Non-negative amount. Exact decimal, no rounding applied by the core.
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub date: DateTime<Utc>,
    pub description: String,
}

/// Derived per-group totals. Recomputed, never stored as truth.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GroupSummary {
    pub total_savings: Decimal,
    pub total_loans: Decimal,
    /// Deposits plus repayments minus loans handed out: cash on hand.
    pub net_balance: Decimal,
    pub member_count: usize,
}

/// Derived per-member totals. Recomputed, never stored as truth.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MemberSummary {
    pub total_savings: Decimal,
    /// Loans taken minus repayments made. May go negative on over-repayment;
    /// the engine does not clamp.
    pub outstanding_loan: Decimal,
}
