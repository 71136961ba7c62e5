use crate::aggregate::{cash_collected, pipeline_value, waiting_on_client_revenue};
use crate::config::CashTarget;
use crate::models::{Amount, ClientRecord, LeadEntry, ProjectStatus, ProspectsSummary};

/// Rounded share of `target` reached by `collected`, capped at 100.
fn target_percent(collected: Amount, target: Amount) -> u32 {
    if target <= 0 || collected <= 0 {
        return 0;
    }
    // widened so `collected * 100` cannot overflow
    let (collected, target) = (i128::from(collected), i128::from(target));
    let rounded = (collected * 100 + target / 2) / target;
    rounded.min(100) as u32
}

pub fn prospects(records: &[ClientRecord], target: &CashTarget) -> ProspectsSummary {
    let collected = cash_collected(records);

    ProspectsSummary {
        target_label: target.label.clone(),
        target_amount: target.amount,
        cash_collected: collected,
        target_percent: target_percent(collected, target.amount),
        money_to_chase: waiting_on_client_revenue(records),
        completed_projects: records
            .iter()
            .filter(|record| record.project_status == ProjectStatus::Completed)
            .count(),
        waiting_projects: records
            .iter()
            .filter(|record| record.project_status == ProjectStatus::WaitingOnClient)
            .count(),
        pipeline_value: pipeline_value(records),
        leads: records
            .iter()
            .filter(|record| record.is_lead())
            .map(|record| LeadEntry {
                id: record.id.clone(),
                name: record.name.clone(),
                project_type: record.project_type,
                total_revenue: record.total_revenue,
                source: record.source.clone(),
            })
            .collect(),
    }
}
