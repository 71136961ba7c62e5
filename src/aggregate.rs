//! Pure, total summaries over a record slice. Every function returns its
//! identity value (0 or an empty sequence) for an empty slice.

use crate::config::RecordFilter;
use crate::models::{
    Amount, AmountField, ClientRecord, DashboardSummary, MonthlyCashflowPoint, MonthlyRevenuePoint,
    PaymentStatus, ProjectStatus, ReconciliationEntry, ReconciliationReport, ReconciliationStatus, YearMonth,
};
use crate::validation::reconcile;
use std::collections::BTreeMap;

pub fn sum_where<F>(records: &[ClientRecord], field: AmountField, predicate: F) -> Amount
where
    F: Fn(&ClientRecord) -> bool,
{
    records
        .iter()
        .filter(|record| predicate(*record))
        .map(|record| record.amount(field))
        .fold(0, Amount::saturating_add)
}

/// Total revenue of the records matching `predicate`.
pub fn revenue_by_status<F>(records: &[ClientRecord], predicate: F) -> Amount
where
    F: Fn(&ClientRecord) -> bool,
{
    sum_where(records, AmountField::TotalRevenue, predicate)
}

pub fn total_contract_value(records: &[ClientRecord]) -> Amount {
    sum_where(records, AmountField::TotalRevenue, |_| true)
}

pub fn cash_collected(records: &[ClientRecord]) -> Amount {
    sum_where(records, AmountField::DepositPaid, |_| true)
}

pub fn balance_due(records: &[ClientRecord]) -> Amount {
    sum_where(records, AmountField::BalanceDue, |_| true)
}

pub fn pipeline_value(records: &[ClientRecord]) -> Amount {
    revenue_by_status(records, ClientRecord::is_lead)
}

pub fn active_revenue(records: &[ClientRecord]) -> Amount {
    revenue_by_status(records, |record| record.project_status == ProjectStatus::Active)
}

pub fn completed_revenue(records: &[ClientRecord]) -> Amount {
    revenue_by_status(records, |record| record.project_status == ProjectStatus::Completed)
}

/// Active work that has a deposit in the bank.
pub fn active_work_value(records: &[ClientRecord]) -> Amount {
    revenue_by_status(records, |record| {
        record.project_status == ProjectStatus::Active && record.payment_status == PaymentStatus::DepositPaid
    })
}

/// Outstanding balance on projects blocked on the client.
pub fn waiting_on_client_revenue(records: &[ClientRecord]) -> Amount {
    sum_where(records, AmountField::BalanceDue, |record| {
        record.project_status == ProjectStatus::WaitingOnClient && record.balance_due > 0
    })
}

/// Records whose start date cannot be placed in a month bucket.
pub fn undated_records(records: &[ClientRecord]) -> Vec<&ClientRecord> {
    records.iter().filter(|record| record.start().is_none()).collect()
}

fn dated<'a>(records: impl Iterator<Item = &'a ClientRecord>) -> impl Iterator<Item = (YearMonth, &'a ClientRecord)> {
    records.filter_map(|record| match record.start() {
        Some(date) => Some((YearMonth::of(date), record)),
        None => {
            tracing::warn!(
                record_id = %record.id,
                start_date = %record.start_date,
                "unparsable start date; excluded from monthly buckets"
            );
            None
        }
    })
}

/// Recognized revenue bucketed by start month, ascending, with a running
/// cumulative total.
pub fn monthly_revenue(records: &[ClientRecord], recognized: &RecordFilter) -> Vec<MonthlyRevenuePoint> {
    let mut buckets: BTreeMap<YearMonth, Amount> = BTreeMap::new();
    for (period, record) in dated(records.iter().filter(|record| recognized.matches(record))) {
        let bucket = buckets.entry(period).or_insert(0);
        *bucket = bucket.saturating_add(record.total_revenue);
    }

    let mut cumulative: Amount = 0;
    buckets
        .into_iter()
        .map(|(period, revenue)| {
            cumulative = cumulative.saturating_add(revenue);
            MonthlyRevenuePoint {
                period,
                label: period.label(),
                revenue,
                cumulative,
            }
        })
        .collect()
}

/// Collected (deposits) and pending (balances) per start month over every
/// record. Not cumulated.
pub fn monthly_cashflow(records: &[ClientRecord]) -> Vec<MonthlyCashflowPoint> {
    let mut buckets: BTreeMap<YearMonth, (Amount, Amount)> = BTreeMap::new();
    for (period, record) in dated(records.iter()) {
        let bucket = buckets.entry(period).or_insert((0, 0));
        bucket.0 = bucket.0.saturating_add(record.deposit_paid);
        bucket.1 = bucket.1.saturating_add(record.balance_due);
    }

    buckets
        .into_iter()
        .map(|(period, (collected, pending))| MonthlyCashflowPoint {
            period,
            label: period.label(),
            collected,
            pending,
        })
        .collect()
}

pub fn summary(records: &[ClientRecord]) -> DashboardSummary {
    let count = |predicate: &dyn Fn(&ClientRecord) -> bool| records.iter().filter(|record| predicate(*record)).count();

    DashboardSummary {
        cash_collected: cash_collected(records),
        balance_due: balance_due(records),
        waiting_on_client: waiting_on_client_revenue(records),
        active_work: active_work_value(records),
        pipeline_value: pipeline_value(records),
        total_contract_value: total_contract_value(records),
        paid_projects: count(&|record| record.payment_status == PaymentStatus::PaidInFull),
        waiting_projects: count(&|record| record.project_status == ProjectStatus::WaitingOnClient),
        active_projects: count(&|record| record.project_status == ProjectStatus::Active && !record.is_lead()),
        leads: count(&ClientRecord::is_lead),
        project_count: records.len(),
    }
}

/// Every record whose split is not exact, plus the net difference between
/// `cash_collected + balance_due` and `total_contract_value`.
pub fn reconciliation_report(records: &[ClientRecord], tolerance: Amount) -> ReconciliationReport {
    let entries = records
        .iter()
        .filter_map(|record| match reconcile(record, tolerance) {
            ReconciliationStatus::Exact => None,
            status => Some(ReconciliationEntry {
                record_id: record.id.clone(),
                status,
            }),
        })
        .collect();

    ReconciliationReport {
        tolerance,
        entries,
        net_difference: cash_collected(records)
            .saturating_add(balance_due(records))
            .saturating_sub(total_contract_value(records)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Currency, ProjectType};

    fn record(id: &str, start: &str, status: ProjectStatus, payment: PaymentStatus, total: Amount, deposit: Amount) -> ClientRecord {
        ClientRecord {
            id: id.to_string(),
            name: format!("Client {}", id),
            project_status: status,
            payment_status: payment,
            total_revenue: total,
            deposit_paid: deposit,
            balance_due: total - deposit,
            currency: Currency::Nzd,
            start_date: start.to_string(),
            end_date: None,
            project_type: ProjectType::FullSite,
            source: "Direct".to_string(),
            notes: None,
            blocked_by: None,
        }
    }

    fn sample() -> Vec<ClientRecord> {
        vec![
            record("1", "2026-01-01", ProjectStatus::Completed, PaymentStatus::PaidInFull, 7500, 7500),
            record("2", "2026-01-10", ProjectStatus::WaitingOnClient, PaymentStatus::DepositPaid, 7500, 3750),
            record("3", "2026-02-01", ProjectStatus::Active, PaymentStatus::DepositPaid, 8750, 4375),
            record("4", "2026-02-15", ProjectStatus::Active, PaymentStatus::Unpaid, 750, 0),
        ]
    }

    #[test]
    fn empty_input_yields_identities() {
        let empty: Vec<ClientRecord> = Vec::new();
        assert_eq!(total_contract_value(&empty), 0);
        assert_eq!(cash_collected(&empty), 0);
        assert_eq!(balance_due(&empty), 0);
        assert_eq!(pipeline_value(&empty), 0);
        assert_eq!(waiting_on_client_revenue(&empty), 0);
        assert!(monthly_revenue(&empty, &RecordFilter::any()).is_empty());
        assert!(monthly_cashflow(&empty).is_empty());
        let summary = summary(&empty);
        assert_eq!(summary.project_count, 0);
        assert_eq!(summary.total_contract_value, 0);
        assert!(reconciliation_report(&empty, 1).entries.is_empty());
    }

    #[test]
    fn card_totals_match_hand_computation() {
        let records = sample();
        assert_eq!(total_contract_value(&records), 24_500);
        assert_eq!(cash_collected(&records), 15_625);
        assert_eq!(balance_due(&records), 8_875);
        assert_eq!(pipeline_value(&records), 750);
        assert_eq!(active_revenue(&records), 9_500);
        assert_eq!(completed_revenue(&records), 7_500);
        assert_eq!(active_work_value(&records), 8_750);
        assert_eq!(waiting_on_client_revenue(&records), 3_750);
    }

    #[test]
    fn summary_counts_projects_by_state() {
        let summary = summary(&sample());
        assert_eq!(summary.paid_projects, 1);
        assert_eq!(summary.waiting_projects, 1);
        assert_eq!(summary.active_projects, 1);
        assert_eq!(summary.leads, 1);
        assert_eq!(summary.project_count, 4);
        assert_eq!(summary.total_contract_value, summary.cash_collected + summary.balance_due);
    }

    #[test]
    fn monthly_revenue_buckets_and_cumulates() {
        let records = vec![
            record("1", "2026-01-01", ProjectStatus::Completed, PaymentStatus::PaidInFull, 7500, 7500),
            record("2", "2026-01-10", ProjectStatus::Active, PaymentStatus::DepositPaid, 7500, 3750),
            record("3", "2026-02-01", ProjectStatus::Active, PaymentStatus::DepositPaid, 8750, 4375),
        ];
        let points = monthly_revenue(&records, &RecordFilter::any());
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].period.to_string(), "2026-01");
        assert_eq!(points[0].label, "Jan 26");
        assert_eq!((points[0].revenue, points[0].cumulative), (15_000, 15_000));
        assert_eq!(points[1].label, "Feb 26");
        assert_eq!((points[1].revenue, points[1].cumulative), (8_750, 23_750));
    }

    #[test]
    fn monthly_revenue_applies_recognition_filter() {
        let filter = RecordFilter {
            exclude_payment_status: vec![PaymentStatus::Unpaid],
            ..RecordFilter::default()
        };
        let points = monthly_revenue(&sample(), &filter);
        let total: Amount = points.iter().map(|point| point.revenue).sum();
        assert_eq!(total, revenue_by_status(&sample(), |record| filter.matches(record)));
        assert_eq!(points.last().map(|point| point.cumulative), Some(23_750));
    }

    #[test]
    fn buckets_sort_across_year_boundary() {
        let records = vec![
            record("a", "2026-01-05", ProjectStatus::Active, PaymentStatus::DepositPaid, 100, 50),
            record("b", "2025-12-20", ProjectStatus::Active, PaymentStatus::DepositPaid, 200, 50),
            record("c", "2025-09-01", ProjectStatus::Active, PaymentStatus::DepositPaid, 300, 50),
        ];
        let labels: Vec<String> = monthly_revenue(&records, &RecordFilter::any())
            .into_iter()
            .map(|point| point.label)
            .collect();
        assert_eq!(labels, vec!["Sep 25", "Dec 25", "Jan 26"]);
    }

    #[test]
    fn unparsable_start_dates_are_skipped_not_fatal() {
        let mut records = sample();
        records.push(record("bad", "TBC", ProjectStatus::Active, PaymentStatus::DepositPaid, 999, 0));
        let points = monthly_revenue(&records, &RecordFilter::any());
        let bucketed: Amount = points.iter().map(|point| point.revenue).sum();
        assert_eq!(bucketed, total_contract_value(&records) - 999);
        let undated: Vec<&str> = undated_records(&records).iter().map(|r| r.id.as_str()).collect();
        assert_eq!(undated, vec!["bad"]);
    }

    #[test]
    fn cashflow_splits_collected_and_pending() {
        let points = monthly_cashflow(&sample());
        assert_eq!(points.len(), 2);
        assert_eq!((points[0].collected, points[0].pending), (11_250, 3_750));
        assert_eq!((points[1].collected, points[1].pending), (4_375, 5_125));
    }

    #[test]
    fn reconciliation_report_lists_rounded_splits() {
        let mut records = sample();
        let mut rounded = record("r", "2026-03-01", ProjectStatus::Active, PaymentStatus::DepositPaid, 8175, 4088);
        rounded.balance_due = 4088;
        records.push(rounded);
        let report = reconciliation_report(&records, 1);
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].record_id, "r");
        assert_eq!(report.entries[0].status, ReconciliationStatus::WithinTolerance { difference: 1 });
        assert_eq!(report.net_difference, 1);
        assert!(!report.has_mismatch());
        assert!(reconciliation_report(&records, 0).has_mismatch());
    }

    #[test]
    fn unvalidated_huge_amounts_saturate() {
        let records = vec![
            record("x", "2026-01-01", ProjectStatus::Active, PaymentStatus::DepositPaid, Amount::MAX, 0),
            record("y", "2026-01-02", ProjectStatus::Active, PaymentStatus::DepositPaid, Amount::MAX, 0),
        ];
        assert_eq!(total_contract_value(&records), Amount::MAX);
        let points = monthly_revenue(&records, &RecordFilter::any());
        assert_eq!(points[0].cumulative, Amount::MAX);
        assert_eq!(monthly_cashflow(&records)[0].pending, Amount::MAX);
        assert_eq!(reconciliation_report(&records, 1).net_difference, 0);
    }
}
