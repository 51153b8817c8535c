//! Dashboard hints derived from the user's budget and achievements.

use finley_types::budget::Budget;
use finley_types::dashboard::Recommendation;

/// Needs share above which the dashboard suggests moving money to savings.
const NEEDS_COMFORT_PCT: f64 = 50.0;

pub fn recommendations(budget: Option<&Budget>, has_achievement: bool) -> Vec<Recommendation> {
    let Some(budget) = budget else {
        return vec![
            Recommendation::new(
                "Create your first budget",
                "Add income and allocation percentages to unlock personalized insights.",
            ),
            Recommendation::new(
                "Turn on notifications",
                "Stay gently nudged with reminders to track expenses and celebrate wins.",
            ),
        ];
    };

    let needs_detail = if budget.needs_percentage > NEEDS_COMFORT_PCT {
        "Consider nudging a few essentials into savings to keep goals accelerating."
    } else {
        "You have healthy breathing room, so protect it with automatic transfers."
    };

    let achievement_hint = if has_achievement {
        Recommendation::new(
            "Capture what worked",
            "Journal how you unlocked your latest badge so you can replay the playbook next month.",
        )
    } else {
        Recommendation::new(
            "Claim your first achievement",
            "Track a budget or reach a savings checkpoint to start your streak.",
        )
    };

    vec![
        Recommendation::new("Review needs vs wants", needs_detail),
        Recommendation::new(
            "Lock in savings ritual",
            format!(
                "Automate {}% of income the day it arrives so momentum never stalls.",
                budget.savings_percentage
            ),
        ),
        achievement_hint,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn budget(needs: f64, savings: f64) -> Budget {
        Budget {
            id: Uuid::now_v7(),
            user_id: Uuid::now_v7(),
            monthly_income: 4000.0,
            needs_percentage: needs,
            wants_percentage: 100.0 - needs - savings,
            savings_percentage: savings,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_no_budget_suggests_getting_started() {
        let recs = recommendations(None, true);
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].title, "Create your first budget");
        assert_eq!(recs[1].title, "Turn on notifications");
    }

    #[test]
    fn test_needs_heavy_budget() {
        let b = budget(60.0, 15.0);
        let recs = recommendations(Some(&b), false);
        assert_eq!(recs.len(), 3);
        assert!(recs[0].detail.starts_with("Consider nudging"));
        assert_eq!(
            recs[1].detail,
            "Automate 15% of income the day it arrives so momentum never stalls."
        );
        assert_eq!(recs[2].title, "Claim your first achievement");
    }

    #[test]
    fn test_balanced_budget_with_achievement() {
        let b = budget(50.0, 20.0);
        let recs = recommendations(Some(&b), true);
        assert!(recs[0].detail.starts_with("You have healthy breathing room"));
        assert_eq!(recs[2].title, "Capture what worked");
    }
}
