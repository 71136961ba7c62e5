mod grouping;
mod ordering;
mod prospects;
mod timeline;

pub use grouping::StatusGroups;
pub use ordering::{cashflow_view, client_table, sort_by_priority, TieBreak};
pub use prospects::prospects;
pub use timeline::{classify_start, project_timeline};
