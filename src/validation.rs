use crate::errors::{AppError, AppResult};
use crate::models::{Amount, ClientRecord, ClientRecordInput, ProjectStatus, ReconciliationStatus};
use std::collections::BTreeSet;

/// Largest amount a single money field may carry. Keeps every sum over a
/// realistic dataset well inside `i64`.
pub const MAX_AMOUNT: Amount = 1_000_000_000_000;

/// Compares `deposit_paid + balance_due` against `total_revenue`.
pub fn reconcile(record: &ClientRecord, tolerance: Amount) -> ReconciliationStatus {
    reconcile_amounts(record.total_revenue, record.deposit_paid, record.balance_due, tolerance)
}

fn reconcile_amounts(total: Amount, deposit: Amount, balance: Amount, tolerance: Amount) -> ReconciliationStatus {
    let Some(difference) = deposit.checked_add(balance).and_then(|paid| paid.checked_sub(total)) else {
        return ReconciliationStatus::Mismatch { difference: Amount::MAX };
    };
    if difference == 0 {
        ReconciliationStatus::Exact
    } else if difference.checked_abs().is_some_and(|gap| gap <= tolerance) {
        ReconciliationStatus::WithinTolerance { difference }
    } else {
        ReconciliationStatus::Mismatch { difference }
    }
}

fn required<T>(value: Option<T>, record_id: &str, field: &'static str) -> AppResult<T> {
    value.ok_or_else(|| AppError::validation(record_id, field, "missing required field"))
}

fn required_text(value: Option<String>, record_id: &str, field: &'static str) -> AppResult<String> {
    let value = required(value, record_id, field)?;
    if value.trim().is_empty() {
        return Err(AppError::validation(record_id, field, "must not be blank"));
    }
    Ok(value)
}

fn non_negative(value: Amount, record_id: &str, field: &'static str) -> AppResult<Amount> {
    if value < 0 {
        return Err(AppError::validation(
            record_id,
            field,
            format!("must be non-negative, got {}", value),
        ));
    }
    if value > MAX_AMOUNT {
        return Err(AppError::validation(
            record_id,
            field,
            format!("must be at most {}, got {}", MAX_AMOUNT, value),
        ));
    }
    Ok(value)
}

/// Turns one lenient input into a checked record. `position` names the
/// record in errors when it has no usable id.
pub fn validate_record(position: usize, input: ClientRecordInput, tolerance: Amount) -> AppResult<ClientRecord> {
    let id = match input.id {
        Some(id) if !id.trim().is_empty() => id,
        _ => {
            return Err(AppError::validation(
                format!("#{}", position),
                "id",
                "missing required field",
            ))
        }
    };

    let name = required_text(input.name, &id, "name")?;
    let project_status = required(input.project_status, &id, "projectStatus")?;
    let payment_status = required(input.payment_status, &id, "paymentStatus")?;
    let total_revenue = non_negative(required(input.total_revenue, &id, "totalRevenue")?, &id, "totalRevenue")?;
    let currency = required(input.currency, &id, "currency")?;
    let start_date = required_text(input.start_date, &id, "startDate")?;
    let project_type = required(input.project_type, &id, "projectType")?;

    if let Some(deposit) = input.deposit_paid {
        non_negative(deposit, &id, "depositPaid")?;
    }
    if let Some(balance) = input.balance_due {
        non_negative(balance, &id, "balanceDue")?;
    }

    let (deposit_paid, balance_due) = match (input.deposit_paid, input.balance_due) {
        (Some(deposit), Some(balance)) => (deposit, balance),
        (Some(deposit), None) => (deposit, non_negative(total_revenue - deposit, &id, "depositPaid")?),
        (None, Some(balance)) => (non_negative(total_revenue - balance, &id, "balanceDue")?, balance),
        (None, None) => (0, total_revenue),
    };

    if let ReconciliationStatus::Mismatch { difference } =
        reconcile_amounts(total_revenue, deposit_paid, balance_due, tolerance)
    {
        return Err(AppError::validation(
            &id,
            "balanceDue",
            format!(
                "depositPaid {} + balanceDue {} differs from totalRevenue {} by {} (tolerance {})",
                deposit_paid, balance_due, total_revenue, difference, tolerance
            ),
        ));
    }

    if input.end_date.is_some() && project_status != ProjectStatus::Completed {
        return Err(AppError::validation(
            &id,
            "endDate",
            format!("only completed projects carry an end date, status is {}", project_status.as_str()),
        ));
    }

    if input.blocked_by.is_some() && project_status != ProjectStatus::WaitingOnClient {
        tracing::debug!(record_id = %id, status = project_status.as_str(), "blockedBy set on record not waiting on client");
    }

    Ok(ClientRecord {
        id,
        name,
        project_status,
        payment_status,
        total_revenue,
        deposit_paid,
        balance_due,
        currency,
        start_date,
        end_date: input.end_date,
        project_type,
        source: input.source.unwrap_or_default(),
        notes: input.notes,
        blocked_by: input.blocked_by,
    })
}

/// Validates a whole dataset, including id uniqueness. Fails on the first
/// offending record.
pub fn validate_records(inputs: Vec<ClientRecordInput>, tolerance: Amount) -> AppResult<Vec<ClientRecord>> {
    let mut ids = BTreeSet::new();
    let mut records = Vec::with_capacity(inputs.len());
    for (index, input) in inputs.into_iter().enumerate() {
        let record = validate_record(index + 1, input, tolerance)?;
        if !ids.insert(record.id.clone()) {
            return Err(AppError::validation(&record.id, "id", "duplicate id"));
        }
        records.push(record);
    }
    Ok(records)
}
