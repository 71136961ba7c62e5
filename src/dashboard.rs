use crate::aggregate;
use crate::clock::Clock;
use crate::config::DashboardConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{
    ClientRecord, DashboardSummary, MonthlyCashflowPoint, MonthlyRevenuePoint, ProspectsSummary,
    ReconciliationReport, RecordGroup, Timeline,
};
use crate::store::RecordStore;
use crate::views::{self, StatusGroups};
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

/// Everything the presentation layer renders, computed from one store
/// snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub as_of: NaiveDate,
    pub summary: DashboardSummary,
    pub monthly_revenue: Vec<MonthlyRevenuePoint>,
    pub monthly_cashflow: Vec<MonthlyCashflowPoint>,
    pub timeline: Timeline,
    pub prospects: ProspectsSummary,
    pub table: Vec<ClientRecord>,
    pub cashflow: Vec<ClientRecord>,
    pub groups: Vec<RecordGroup>,
    pub reconciliation: ReconciliationReport,
    pub undated_record_ids: Vec<String>,
}

#[derive(Clone)]
pub struct Dashboard {
    store: RecordStore,
    config: DashboardConfig,
    groups: StatusGroups,
    clock: Arc<dyn Clock>,
}

impl Dashboard {
    pub fn new(store: RecordStore, config: DashboardConfig, clock: Arc<dyn Clock>) -> AppResult<Self> {
        config.validate()?;
        if store.tolerance() > config.reconciliation_tolerance && !store.is_empty() {
            return Err(AppError::Config(format!(
                "store was validated with tolerance {} but config allows {}",
                store.tolerance(),
                config.reconciliation_tolerance
            )));
        }
        let groups = StatusGroups::new(config.groups.clone())?;
        Ok(Self {
            store,
            config,
            groups,
            clock,
        })
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Swaps in a new record set; snapshots already taken are unaffected.
    pub fn with_store(&self, store: RecordStore) -> AppResult<Self> {
        Self::new(store, self.config.clone(), self.clock.clone())
    }

    pub fn summary(&self) -> DashboardSummary {
        aggregate::summary(self.store.records())
    }

    pub fn monthly_revenue(&self) -> Vec<MonthlyRevenuePoint> {
        aggregate::monthly_revenue(self.store.records(), &self.config.recognized_revenue)
    }

    pub fn monthly_cashflow(&self) -> Vec<MonthlyCashflowPoint> {
        aggregate::monthly_cashflow(self.store.records())
    }

    pub fn timeline(&self) -> Timeline {
        views::project_timeline(self.store.records(), &self.config, self.clock.as_ref())
    }

    pub fn prospects(&self) -> ProspectsSummary {
        views::prospects(self.store.records(), &self.config.cash_target)
    }

    pub fn table(&self) -> Vec<ClientRecord> {
        views::client_table(self.store.records(), &self.config)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn cashflow(&self) -> Vec<ClientRecord> {
        views::cashflow_view(self.store.records(), &self.config)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn groups(&self) -> Vec<RecordGroup> {
        self.groups.partition(self.store.records())
    }

    pub fn reconciliation(&self) -> ReconciliationReport {
        aggregate::reconciliation_report(self.store.records(), self.config.reconciliation_tolerance)
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        let undated_record_ids: Vec<String> = aggregate::undated_records(self.store.records())
            .into_iter()
            .map(|record| record.id.clone())
            .collect();
        if !undated_record_ids.is_empty() {
            tracing::warn!(count = undated_record_ids.len(), "records without a usable start date");
        }

        DashboardSnapshot {
            as_of: self.clock.today(),
            summary: self.summary(),
            monthly_revenue: self.monthly_revenue(),
            monthly_cashflow: self.monthly_cashflow(),
            timeline: self.timeline(),
            prospects: self.prospects(),
            table: self.table(),
            cashflow: self.cashflow(),
            groups: self.groups(),
            reconciliation: self.reconciliation(),
            undated_record_ids,
        }
    }
}
