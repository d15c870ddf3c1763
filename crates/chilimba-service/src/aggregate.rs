//! Pure reductions over transaction lists.
//!
//! Aggregates are never cached or stored; every consumer recomputes them from
//! the latest full snapshot. The reductions are order-independent exact sums,
//! so re-running them over a reshuffled list gives identical results. Empty
//! input yields zero everywhere, never an error.

use rust_decimal::Decimal;

use chilimba_core::model::{
    GroupSummary, Member, MemberSummary, Transaction, TransactionKind,
};
use chilimba_core::types::MemberId;

/// Sums the amounts of all transactions of one kind.
#[must_use]
pub fn total_by_kind(txns: &[Transaction], kind: TransactionKind) -> Decimal {
    txns.iter()
        .filter(|t| t.kind == kind)
        .map(|t| t.amount)
        .sum()
}

/// Total deposits across the given transactions.
#[must_use]
pub fn group_savings(txns: &[Transaction]) -> Decimal {
    total_by_kind(txns, TransactionKind::Deposit)
}

/// Total loans handed out across the given transactions.
#[must_use]
pub fn group_loans(txns: &[Transaction]) -> Decimal {
    total_by_kind(txns, TransactionKind::Loan)
}

/// Loans taken minus repayments made, over a member-scoped transaction list.
/// Not clamped: over-repayment shows as a negative balance.
#[must_use]
pub fn outstanding_loan(member_txns: &[Transaction]) -> Decimal {
    total_by_kind(member_txns, TransactionKind::Loan)
        - total_by_kind(member_txns, TransactionKind::LoanRepayment)
}

/// Cash on hand: deposits plus repayments minus loans handed out.
#[must_use]
pub fn net_balance(txns: &[Transaction]) -> Decimal {
    total_by_kind(txns, TransactionKind::Deposit)
        + total_by_kind(txns, TransactionKind::LoanRepayment)
        - total_by_kind(txns, TransactionKind::Loan)
}

/// Derives the group summary from a group-wide transaction snapshot.
#[must_use]
pub fn group_summary(txns: &[Transaction], member_count: usize) -> GroupSummary {
    GroupSummary {
        total_savings: group_savings(txns),
        total_loans: group_loans(txns),
        net_balance: net_balance(txns),
        member_count,
    }
}

/// Derives one member's summary from their transaction snapshot.
#[must_use]
pub fn member_summary(member_txns: &[Transaction]) -> MemberSummary {
    MemberSummary {
        total_savings: total_by_kind(member_txns, TransactionKind::Deposit),
        outstanding_loan: outstanding_loan(member_txns),
    }
}

/// One member's transactions picked out of a group-wide snapshot.
#[must_use]
pub fn for_member<'a>(txns: &'a [Transaction], member_id: &MemberId) -> Vec<&'a Transaction> {
    txns.iter().filter(|t| &t.member_id == member_id).collect()
}

/// A ranked entry of the savings leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopSaver {
    pub rank: usize,
    pub member_id: MemberId,
    pub name: String,
    pub amount: Decimal,
}

/// ## Summary
/// Ranks members by total deposits, largest first.
///
/// Members with zero savings are excluded. Ties break on member name so the
/// ranking is deterministic across recomputations.
#[must_use]
pub fn top_savers(members: &[Member], txns: &[Transaction], limit: usize) -> Vec<TopSaver> {
    let mut ranked: Vec<(&Member, Decimal)> = members
        .iter()
        .map(|member| {
            let savings = txns
                .iter()
                .filter(|t| t.member_id == member.id && t.kind == TransactionKind::Deposit)
                .map(|t| t.amount)
                .sum();
            (member, savings)
        })
        .filter(|(_, savings)| *savings > Decimal::ZERO)
        .collect();

    ranked.sort_by(|(a, sa), (b, sb)| sb.cmp(sa).then_with(|| a.name.cmp(&b.name)));

    ranked
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(idx, (member, amount))| TopSaver {
            rank: idx + 1,
            member_id: member.id.clone(),
            name: member.name.clone(),
            amount,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use chilimba_core::types::{GroupId, TransactionId};

    use super::*;

    fn txn(id: &str, member: &str, kind: TransactionKind, amount: i64) -> Transaction {
        Transaction {
            id: TransactionId::new(id),
            group_id: GroupId::new("g-1"),
            member_id: MemberId::new(member),
            amount: Decimal::from(amount),
            kind,
            date: Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap(),
            description: String::new(),
        }
    }

    fn member(id: &str, name: &str) -> Member {
        Member {
            id: MemberId::new(id),
            group_id: GroupId::new("g-1"),
            name: name.to_owned(),
            phone: "0991000000".to_owned(),
        }
    }

    #[test]
    fn test_empty_list_yields_zero_everywhere() {
        assert_eq!(total_by_kind(&[], TransactionKind::Deposit), Decimal::ZERO);
        assert_eq!(outstanding_loan(&[]), Decimal::ZERO);
        assert_eq!(net_balance(&[]), Decimal::ZERO);
        assert_eq!(group_summary(&[], 0), GroupSummary::default());
    }

    #[test]
    fn test_kinds_partition_the_total() {
        let txns = [
            txn("t-1", "m-1", TransactionKind::Deposit, 5000),
            txn("t-2", "m-1", TransactionKind::Loan, 2000),
            txn("t-3", "m-2", TransactionKind::LoanRepayment, 800),
            txn("t-4", "m-2", TransactionKind::Deposit, 150),
        ];

        let by_kind: Decimal = [
            TransactionKind::Deposit,
            TransactionKind::Loan,
            TransactionKind::LoanRepayment,
        ]
        .into_iter()
        .map(|kind| total_by_kind(&txns, kind))
        .sum();

        let overall: Decimal = txns.iter().map(|t| t.amount).sum();
        assert_eq!(by_kind, overall);
    }

    #[test]
    fn test_outstanding_loan_is_order_independent() {
        let mut txns = vec![
            txn("t-1", "m-1", TransactionKind::Loan, 2000),
            txn("t-2", "m-1", TransactionKind::LoanRepayment, 800),
            txn("t-3", "m-1", TransactionKind::Loan, 500),
        ];

        let forward = outstanding_loan(&txns);
        txns.reverse();
        assert_eq!(outstanding_loan(&txns), forward);
        assert_eq!(forward, Decimal::from(1700));
    }

    #[test]
    fn test_group_summary_matches_scenario() {
        let txns = [
            txn("t-1", "m-1", TransactionKind::Deposit, 5000),
            txn("t-2", "m-1", TransactionKind::Loan, 2000),
        ];

        let summary = group_summary(&txns, 1);
        assert_eq!(summary.total_savings, Decimal::from(5000));
        assert_eq!(summary.total_loans, Decimal::from(2000));
        assert_eq!(summary.net_balance, Decimal::from(3000));
        assert_eq!(summary.member_count, 1);
    }

    #[test]
    fn test_repayment_reduces_outstanding_loan() {
        let txns = [
            txn("t-1", "m-1", TransactionKind::Loan, 2000),
            txn("t-2", "m-1", TransactionKind::LoanRepayment, 800),
        ];
        assert_eq!(outstanding_loan(&txns), Decimal::from(1200));
    }

    #[test]
    fn test_top_savers_ranks_and_excludes_zero() {
        let members = [
            member("m-1", "Grace Phiri"),
            member("m-2", "John Banda"),
            member("m-3", "Never Saved"),
        ];
        let txns = [
            txn("t-1", "m-1", TransactionKind::Deposit, 5000),
            txn("t-2", "m-2", TransactionKind::Deposit, 7000),
            txn("t-3", "m-3", TransactionKind::Loan, 400),
        ];

        let savers = top_savers(&members, &txns, 3);
        assert_eq!(savers.len(), 2);
        assert_eq!(savers[0].rank, 1);
        assert_eq!(savers[0].name, "John Banda");
        assert_eq!(savers[1].name, "Grace Phiri");
    }

    #[test]
    fn test_for_member_filters_group_snapshot() {
        let txns = [
            txn("t-1", "m-1", TransactionKind::Deposit, 5000),
            txn("t-2", "m-2", TransactionKind::Deposit, 150),
        ];
        let mine = for_member(&txns, &MemberId::new("m-1"));
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, TransactionId::new("t-1"));
    }
}
