use super::ordering::{sort_by_priority, TieBreak};
use crate::clock::Clock;
use crate::config::DashboardConfig;
use crate::models::{ClientRecord, CompletedEntry, ProjectStatus, StartClassification, Timeline, TimelineEntry};
use chrono::NaiveDate;

/// Whole calendar days between `start` and `today`.
pub fn classify_start(start: NaiveDate, today: NaiveDate) -> StartClassification {
    let days = (today - start).num_days();
    if days < 0 {
        StartClassification::Upcoming { in_days: -days }
    } else {
        StartClassification::Elapsed { days }
    }
}

/// In-flight work by timeline rank (newest start first within a rank), then
/// completed work in dataset order.
pub fn project_timeline(records: &[ClientRecord], config: &DashboardConfig, clock: &dyn Clock) -> Timeline {
    let today = clock.today();

    let in_flight = sort_by_priority(records, &config.timeline_ranks, TieBreak::StartDateDesc)
        .into_iter()
        .filter(|record| record.project_status != ProjectStatus::Completed)
        .map(|record| TimelineEntry {
            start: record.start().map(|start| classify_start(start, today)),
            record: record.clone(),
        })
        .collect();

    let completed = records
        .iter()
        .filter(|record| record.project_status == ProjectStatus::Completed)
        .map(|record| CompletedEntry {
            completed_on: record.end(),
            record: record.clone(),
        })
        .collect();

    Timeline { in_flight, completed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::store::RecordStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn classifies_upcoming_and_elapsed() {
        let today = date(2026, 2, 10);
        assert_eq!(classify_start(date(2026, 2, 15), today), StartClassification::Upcoming { in_days: 5 });
        assert_eq!(classify_start(date(2026, 2, 10), today), StartClassification::Elapsed { days: 0 });
        assert_eq!(classify_start(date(2026, 1, 10), today), StartClassification::Elapsed { days: 31 });
    }

    #[test]
    fn timeline_uses_injected_clock() {
        let store = RecordStore::seeded(1).expect("seed");
        let timeline = project_timeline(store.records(), &DashboardConfig::default(), &FixedClock(date(2026, 2, 10)));

        let order: Vec<&str> = timeline.in_flight.iter().map(|entry| entry.record.id.as_str()).collect();
        assert_eq!(order, vec!["4", "3", "2", "5", "8", "6", "7"]);

        let roofing = timeline.in_flight.iter().find(|entry| entry.record.id == "6").expect("lead");
        assert_eq!(roofing.start, Some(StartClassification::Upcoming { in_days: 5 }));
        let jimmy = timeline.in_flight.iter().find(|entry| entry.record.id == "2").expect("waiting");
        assert_eq!(jimmy.start, Some(StartClassification::Elapsed { days: 31 }));

        assert_eq!(timeline.completed.len(), 1);
        assert_eq!(timeline.completed[0].completed_on, Some(date(2026, 1, 31)));
    }
}
