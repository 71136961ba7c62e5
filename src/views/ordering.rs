use crate::config::{DashboardConfig, StatusRanks};
use crate::models::ClientRecord;
use std::cmp::{Ordering, Reverse};

/// Secondary key applied between records of equal status rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieBreak {
    None,
    BalanceDueDesc,
    /// Newest first; unparsable start dates sort last.
    StartDateDesc,
}

impl TieBreak {
    fn compare(self, a: &ClientRecord, b: &ClientRecord) -> Ordering {
        match self {
            Self::None => Ordering::Equal,
            Self::BalanceDueDesc => b.balance_due.cmp(&a.balance_due),
            // Some(_) > None, so reversing puts undated records at the end
            Self::StartDateDesc => Reverse(a.start()).cmp(&Reverse(b.start())),
        }
    }
}

/// Stable sort by tier rank, then by `tie_break`.
pub fn sort_by_priority<'a>(records: &'a [ClientRecord], ranks: &StatusRanks, tie_break: TieBreak) -> Vec<&'a ClientRecord> {
    let mut sorted: Vec<&ClientRecord> = records.iter().collect();
    sorted.sort_by(|a, b| {
        ranks
            .rank(a)
            .cmp(&ranks.rank(b))
            .then_with(|| tie_break.compare(a, b))
    });
    sorted
}

pub fn client_table<'a>(records: &'a [ClientRecord], config: &DashboardConfig) -> Vec<&'a ClientRecord> {
    sort_by_priority(records, &config.table_ranks, TieBreak::None)
}

pub fn cashflow_view<'a>(records: &'a [ClientRecord], config: &DashboardConfig) -> Vec<&'a ClientRecord> {
    sort_by_priority(records, &config.cashflow_ranks, TieBreak::BalanceDueDesc)
}
