use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whole-currency-unit amount. Mixed currencies are summed raw.
pub type Amount = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    Active,
    WaitingOnClient,
    Completed,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 3] = [Self::Active, Self::WaitingOnClient, Self::Completed];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::WaitingOnClient => "waiting-on-client",
            Self::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentStatus {
    Unpaid,
    DepositPending,
    DepositPaid,
    PaidInFull,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 4] = [
        Self::Unpaid,
        Self::DepositPending,
        Self::DepositPaid,
        Self::PaidInFull,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::DepositPending => "deposit-pending",
            Self::DepositPaid => "deposit-paid",
            Self::PaidInFull => "paid-in-full",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Nzd,
    Aud,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectType {
    LandingPage,
    FullSite,
    Maintenance,
    Redesign,
}

/// Which monetary field of a record an aggregation reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AmountField {
    TotalRevenue,
    DepositPaid,
    BalanceDue,
}

/// One validated client engagement. Only `RecordStore` hands these out in
/// bulk, after the monetary and identity invariants have been checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRecord {
    pub id: String,
    pub name: String,
    pub project_status: ProjectStatus,
    pub payment_status: PaymentStatus,
    pub total_revenue: Amount,
    pub deposit_paid: Amount,
    pub balance_due: Amount,
    pub currency: Currency,
    pub start_date: String,
    pub end_date: Option<String>,
    pub project_type: ProjectType,
    pub source: String,
    pub notes: Option<String>,
    pub blocked_by: Option<String>,
}

impl ClientRecord {
    pub fn amount(&self, field: AmountField) -> Amount {
        match field {
            AmountField::TotalRevenue => self.total_revenue,
            AmountField::DepositPaid => self.deposit_paid,
            AmountField::BalanceDue => self.balance_due,
        }
    }

    pub fn start(&self) -> Option<NaiveDate> {
        parse_iso_date(&self.start_date)
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end_date.as_deref().and_then(parse_iso_date)
    }

    pub fn is_lead(&self) -> bool {
        self.payment_status == PaymentStatus::Unpaid
    }
}

/// Lenient on-disk shape of a record. Every field is optional so that a
/// missing value can be reported against the record id instead of as an
/// anonymous deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRecordInput {
    pub id: Option<String>,
    pub name: Option<String>,
    pub project_status: Option<ProjectStatus>,
    pub payment_status: Option<PaymentStatus>,
    #[serde(alias = "revenue")]
    pub total_revenue: Option<Amount>,
    pub deposit_paid: Option<Amount>,
    pub balance_due: Option<Amount>,
    pub currency: Option<Currency>,
    pub start_date: Option<String>,
    #[serde(alias = "completedDate")]
    pub end_date: Option<String>,
    pub project_type: Option<ProjectType>,
    pub source: Option<String>,
    pub notes: Option<String>,
    pub blocked_by: Option<String>,
}

impl From<ClientRecord> for ClientRecordInput {
    fn from(record: ClientRecord) -> Self {
        Self {
            id: Some(record.id),
            name: Some(record.name),
            project_status: Some(record.project_status),
            payment_status: Some(record.payment_status),
            total_revenue: Some(record.total_revenue),
            deposit_paid: Some(record.deposit_paid),
            balance_due: Some(record.balance_due),
            currency: Some(record.currency),
            start_date: Some(record.start_date),
            end_date: record.end_date,
            project_type: Some(record.project_type),
            source: Some(record.source),
            notes: record.notes,
            blocked_by: record.blocked_by,
        }
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(trimmed).ok().map(|dt| dt.date_naive()))
}

/// Calendar year-month bucket key. Orders chronologically and renders as
/// zero-padded `YYYY-MM`, so string order and date order agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        use chrono::Datelike;
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Short month name and two-digit year, e.g. `Jan 26`.
    pub fn label(self) -> String {
        match NaiveDate::from_ymd_opt(self.year, self.month, 1) {
            Some(first) => first.format("%b %y").to_string(),
            None => self.to_string(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRevenuePoint {
    pub period: YearMonth,
    pub label: String,
    pub revenue: Amount,
    pub cumulative: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCashflowPoint {
    pub period: YearMonth,
    pub label: String,
    pub collected: Amount,
    pub pending: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub cash_collected: Amount,
    pub balance_due: Amount,
    pub waiting_on_client: Amount,
    pub active_work: Amount,
    pub pipeline_value: Amount,
    pub total_contract_value: Amount,
    pub paid_projects: usize,
    pub waiting_projects: usize,
    pub active_projects: usize,
    pub leads: usize,
    pub project_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ReconciliationStatus {
    Exact,
    WithinTolerance { difference: Amount },
    Mismatch { difference: Amount },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationEntry {
    pub record_id: String,
    pub status: ReconciliationStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationReport {
    pub tolerance: Amount,
    pub entries: Vec<ReconciliationEntry>,
    pub net_difference: Amount,
}

impl ReconciliationReport {
    pub fn has_mismatch(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| matches!(entry.status, ReconciliationStatus::Mismatch { .. }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum StartClassification {
    Upcoming { in_days: i64 },
    Elapsed { days: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub record: ClientRecord,
    /// `None` when the start date cannot be parsed.
    pub start: Option<StartClassification>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedEntry {
    pub record: ClientRecord,
    pub completed_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub in_flight: Vec<TimelineEntry>,
    pub completed: Vec<CompletedEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordGroup {
    pub key: String,
    pub label: String,
    pub records: Vec<ClientRecord>,
    pub total_revenue: Amount,
    pub balance_due: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadEntry {
    pub id: String,
    pub name: String,
    pub project_type: ProjectType,
    pub total_revenue: Amount,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProspectsSummary {
    pub target_label: String,
    pub target_amount: Amount,
    pub cash_collected: Amount,
    pub target_percent: u32,
    pub money_to_chase: Amount,
    pub completed_projects: usize,
    pub waiting_projects: usize,
    pub pipeline_value: Amount,
    pub leads: Vec<LeadEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_timestamp_dates() {
        assert_eq!(parse_iso_date("2026-01-10"), NaiveDate::from_ymd_opt(2026, 1, 10));
        assert_eq!(
            parse_iso_date("2026-02-01T09:30:00+13:00"),
            NaiveDate::from_ymd_opt(2026, 2, 1)
        );
        assert_eq!(parse_iso_date("next tuesday"), None);
        assert_eq!(parse_iso_date("2026-13-01"), None);
    }

    #[test]
    fn year_month_renders_padded_key_and_short_label() {
        let period = YearMonth { year: 2026, month: 2 };
        assert_eq!(period.to_string(), "2026-02");
        assert_eq!(period.label(), "Feb 26");
        assert_eq!(serde_json::to_value(period).expect("serialize"), "2026-02");
    }

    #[test]
    fn year_month_orders_chronologically() {
        let dec = YearMonth { year: 2025, month: 12 };
        let jan = YearMonth { year: 2026, month: 1 };
        let oct = YearMonth { year: 2026, month: 10 };
        assert!(dec < jan && jan < oct);
        assert!(dec.to_string() < jan.to_string() && jan.to_string() < oct.to_string());
    }

    #[test]
    fn input_accepts_legacy_field_names() {
        let input: ClientRecordInput = serde_json::from_str(
            r#"{"id":"1","revenue":7500,"completedDate":"2026-01-31","projectStatus":"waiting-on-client","currency":"AUD"}"#,
        )
        .expect("input");
        assert_eq!(input.total_revenue, Some(7500));
        assert_eq!(input.end_date.as_deref(), Some("2026-01-31"));
        assert_eq!(input.project_status, Some(ProjectStatus::WaitingOnClient));
        assert_eq!(input.currency, Some(Currency::Aud));
    }
}
