//! Dashboard summary returned by `GET /api/v1/dashboard`.

use serde::{Deserialize, Serialize};

use crate::achievement::LevelProgress;
use crate::budget::BudgetView;
use crate::profile::UserProfile;

/// One actionable hint shown under the dashboard metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub detail: String,
}

impl Recommendation {
    pub fn new(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub profile: Option<UserProfile>,
    pub budget: Option<BudgetView>,
    pub goal_count: usize,
    pub completed_goal_count: usize,
    /// Sum of `current_amount` across all savings goals.
    pub total_saved: f64,
    pub achievement_count: usize,
    pub progress: LevelProgress,
    pub recommendations: Vec<Recommendation>,
}
