use chrono::{Duration, NaiveDate, Utc};
use serde::Serialize;
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
pub struct VelocityPoint {
    #[ts(type = "string")]
    pub date: NaiveDate,
    pub completed: u32,
}

/// Reporting stub. Completion history is not recorded yet, so velocity is
/// a flat zero series over the trailing week; the route contract is what
/// matters here.
#[derive(Clone, Default)]
pub struct AnalyticsService;

impl AnalyticsService {
    pub fn new() -> Self {
        Self
    }

    pub fn project_velocity(&self, _project_id: Uuid) -> Vec<VelocityPoint> {
        let today = Utc::now().date_naive();
        (0..7)
            .rev()
            .map(|days_ago| VelocityPoint {
                date: today - Duration::days(days_ago),
                completed: 0,
            })
            .collect()
    }
}
