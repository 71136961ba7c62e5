use crate::errors::{AppError, AppResult};
use crate::models::{Amount, ClientRecord, PaymentStatus, ProjectStatus};
use crate::validation::MAX_AMOUNT;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

const DEFAULT_RECONCILIATION_TOLERANCE: Amount = 1;
const DEFAULT_CASH_TARGET: Amount = 25_000;

/// Data-driven record predicate. Empty lists mean "any"; every constraint
/// that is present must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecordFilter {
    pub project_status: Vec<ProjectStatus>,
    pub payment_status: Vec<PaymentStatus>,
    pub exclude_payment_status: Vec<PaymentStatus>,
    pub has_balance_due: Option<bool>,
}

impl RecordFilter {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn project(statuses: &[ProjectStatus]) -> Self {
        Self {
            project_status: statuses.to_vec(),
            ..Self::default()
        }
    }

    pub fn payment(statuses: &[PaymentStatus]) -> Self {
        Self {
            payment_status: statuses.to_vec(),
            ..Self::default()
        }
    }

    pub fn matches(&self, record: &ClientRecord) -> bool {
        self.matches_parts(record.project_status, record.payment_status, record.balance_due > 0)
    }

    /// A filter only observes these three facts about a record, which is what
    /// makes exhaustiveness of a group list checkable.
    pub fn matches_parts(&self, project: ProjectStatus, payment: PaymentStatus, has_balance: bool) -> bool {
        (self.project_status.is_empty() || self.project_status.contains(&project))
            && (self.payment_status.is_empty() || self.payment_status.contains(&payment))
            && !self.exclude_payment_status.contains(&payment)
            && self.has_balance_due.map_or(true, |wanted| wanted == has_balance)
    }
}

/// One step of a rank table: records accepted by `filter` get `rank`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankTier {
    pub rank: u32,
    #[serde(default)]
    pub filter: RecordFilter,
}

impl RankTier {
    pub fn new(filter: RecordFilter, rank: u32) -> Self {
        Self { rank, filter }
    }
}

/// Ordered priority tiers. The first tier whose filter accepts a record
/// decides its rank; lower ranks sort first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusRanks(Vec<RankTier>);

impl StatusRanks {
    pub fn new(tiers: impl IntoIterator<Item = (RecordFilter, u32)>) -> Self {
        Self(tiers.into_iter().map(|(filter, rank)| RankTier::new(filter, rank)).collect())
    }

    pub fn tiers(&self) -> &[RankTier] {
        &self.0
    }

    pub fn rank(&self, record: &ClientRecord) -> u32 {
        // validate() guarantees some tier matches
        self.0
            .iter()
            .find(|tier| tier.filter.matches(record))
            .map_or(u32::MAX, |tier| tier.rank)
    }

    pub fn validate(&self, name: &str) -> AppResult<()> {
        if self.0.is_empty() {
            return Err(AppError::Config(format!("{} must not be empty", name)));
        }
        match first_uncovered(self.0.iter().map(|tier| &tier.filter)) {
            None => Ok(()),
            Some(shape) => Err(AppError::Config(format!(
                "{} are not exhaustive: no tier accepts {}",
                name,
                describe_shape(shape)
            ))),
        }
    }
}

type RecordShape = (ProjectStatus, PaymentStatus, bool);

/// Finds a record shape that none of the filters accept.
fn first_uncovered<'a>(filters: impl Iterator<Item = &'a RecordFilter> + Clone) -> Option<RecordShape> {
    ProjectStatus::ALL
        .into_iter()
        .flat_map(|project| PaymentStatus::ALL.into_iter().map(move |payment| (project, payment)))
        .flat_map(|(project, payment)| [false, true].into_iter().map(move |has_balance| (project, payment, has_balance)))
        .find(|&(project, payment, has_balance)| {
            !filters
                .clone()
                .any(|filter| filter.matches_parts(project, payment, has_balance))
        })
}

fn describe_shape((project, payment, has_balance): RecordShape) -> String {
    format!(
        "{} / {} / balance due {}",
        project.as_str(),
        payment.as_str(),
        if has_balance { "> 0" } else { "= 0" }
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDefinition {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub filter: RecordFilter,
}

impl GroupDefinition {
    pub fn new(key: &str, label: &str, filter: RecordFilter) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            filter,
        }
    }
}

/// Checks that a first-match-wins group list is usable: non-empty, unique
/// keys, and some group accepts every observable record shape.
pub fn validate_groups(groups: &[GroupDefinition]) -> AppResult<()> {
    if groups.is_empty() {
        return Err(AppError::Config("group list must not be empty".to_string()));
    }

    let mut seen = BTreeSet::new();
    for group in groups {
        if group.key.trim().is_empty() {
            return Err(AppError::Config("group key must not be blank".to_string()));
        }
        if !seen.insert(group.key.as_str()) {
            return Err(AppError::Config(format!("duplicate group key: {}", group.key)));
        }
    }

    if let Some(shape) = first_uncovered(groups.iter().map(|group| &group.filter)) {
        return Err(AppError::Config(format!(
            "groups are not exhaustive: no group accepts {}",
            describe_shape(shape)
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashTarget {
    pub label: String,
    pub amount: Amount,
}

impl Default for CashTarget {
    fn default() -> Self {
        Self {
            label: "Q1 2026".to_string(),
            amount: DEFAULT_CASH_TARGET,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardConfig {
    pub reconciliation_tolerance: Amount,
    pub recognized_revenue: RecordFilter,
    pub cash_target: CashTarget,
    pub table_ranks: StatusRanks,
    pub timeline_ranks: StatusRanks,
    pub cashflow_ranks: StatusRanks,
    pub groups: Vec<GroupDefinition>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let active = RecordFilter::project(&[ProjectStatus::Active]);
        let completed = RecordFilter::project(&[ProjectStatus::Completed]);
        let waiting = RecordFilter::project(&[ProjectStatus::WaitingOnClient]);
        let leads = RecordFilter::payment(&[PaymentStatus::Unpaid]);
        let delivery_first = StatusRanks::new([
            (waiting.clone(), 0),
            (leads.clone(), 2),
            (active.clone(), 1),
            (completed.clone(), 3),
        ]);
        Self {
            reconciliation_tolerance: DEFAULT_RECONCILIATION_TOLERANCE,
            recognized_revenue: RecordFilter {
                exclude_payment_status: vec![PaymentStatus::Unpaid],
                ..RecordFilter::default()
            },
            cash_target: CashTarget::default(),
            table_ranks: StatusRanks::new([(waiting, 2), (leads, 1), (active, 0), (completed, 3)]),
            timeline_ranks: delivery_first.clone(),
            cashflow_ranks: delivery_first,
            groups: default_groups(),
        }
    }
}

pub fn default_groups() -> Vec<GroupDefinition> {
    vec![
        GroupDefinition::new(
            "waiting-on-client",
            "Waiting on client",
            RecordFilter::project(&[ProjectStatus::WaitingOnClient]),
        ),
        GroupDefinition::new("leads", "Leads", RecordFilter::payment(&[PaymentStatus::Unpaid])),
        GroupDefinition::new("in-progress", "In progress", RecordFilter::project(&[ProjectStatus::Active])),
        GroupDefinition::new("completed", "Completed", RecordFilter::project(&[ProjectStatus::Completed])),
    ]
}

impl DashboardConfig {
    pub fn validate(&self) -> AppResult<()> {
        if self.reconciliation_tolerance < 0 {
            return Err(AppError::Config(format!(
                "reconciliationTolerance must be >= 0, got {}",
                self.reconciliation_tolerance
            )));
        }
        if self.cash_target.amount <= 0 || self.cash_target.amount > MAX_AMOUNT {
            return Err(AppError::Config(format!(
                "cashTarget.amount must be in 1..={}, got {}",
                MAX_AMOUNT,
                self.cash_target.amount
            )));
        }
        self.table_ranks.validate("tableRanks")?;
        self.timeline_ranks.validate("timelineRanks")?;
        self.cashflow_ranks.validate("cashflowRanks")?;
        validate_groups(&self.groups)
    }

    /// Reads a `.json`, `.yaml` or `.yml` file; absent keys keep their defaults.
    pub fn load(path: &Path) -> AppResult<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|error| AppError::Io(format!("{}: {}", path.to_string_lossy(), error)))?;
        let config: Self = match path.extension().and_then(|value| value.to_str()) {
            Some("json") => serde_json::from_str(&raw)?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&raw)?,
            _ => {
                return Err(AppError::Config(format!(
                    "unsupported config format: {}",
                    path.to_string_lossy()
                )))
            }
        };
        config.validate()?;
        tracing::debug!(path = %path.to_string_lossy(), groups = config.groups.len(), "loaded dashboard config");
        Ok(config)
    }
}
