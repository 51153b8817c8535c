//! FinanceService -- the operations behind the `/api/v1` routes.
//!
//! Generic over `FinanceStore` so finley-core never depends on the hosted
//! backend's client. Every call takes the caller's `UserSession` and only
//! touches rows that session owns.

use chrono::{DateTime, NaiveDate, Utc};
use secrecy::SecretString;
use tracing::{debug, info};
use uuid::Uuid;

use finley_types::achievement::{
    Achievement, AchievementBoard, EvaluationOutcome, LevelProgress, NewAchievement,
};
use finley_types::budget::{
    Budget, BudgetAllocation, BudgetPatch, BudgetView, CreateGoalRequest, GoalView, NewBudget,
    NewSavingsGoal, SavingsGoal, SavingsGoalPatch, SavingsGoalRecord,
};
use finley_types::dashboard::DashboardSummary;
use finley_types::error::{FinanceError, StoreError, ValidationError};
use finley_types::expense::{AddExpenseRequest, Expense, ExpenseLedger};
use finley_types::profile::{NewUserProfile, ProfilePatch, UserProfile};

use crate::achievement::{self, ActivitySnapshot};
use crate::auth::{Clock, SystemClock};
use crate::budget::{
    percent_total, project_goal, recommendations, validate_allocation, validate_goal,
};
use crate::expense;
use crate::store::{FinanceStore, UserSession};

/// Shown until the user picks a display name and has no email on file.
pub const DEFAULT_DISPLAY_NAME: &str = "Guest Explorer";

pub struct FinanceService<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: FinanceStore> FinanceService<S, SystemClock> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: FinanceStore, C: Clock> FinanceService<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.clock.now_ms()).unwrap_or_else(Utc::now)
    }

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// Resolve a bearer token presented by a client into a session.
    pub async fn authenticate(&self, access_token: SecretString) -> Result<UserSession, StoreError> {
        let user = self.store.current_user(&access_token).await?;
        debug!(user_id = %user.id, "authenticated finance session");
        Ok(UserSession { user, access_token })
    }

    // --- Budgets ---

    fn budget_view(budget: Budget) -> BudgetView {
        let allocation = budget.allocation();
        BudgetView {
            breakdown: crate::budget::allocate(
                allocation.monthly_income,
                allocation.needs_pct,
                allocation.wants_pct,
                allocation.savings_pct,
            ),
            percent_total: percent_total(&allocation),
            budget,
        }
    }

    async fn latest_budget(&self, session: &UserSession) -> Result<Option<Budget>, StoreError> {
        let budgets: Vec<Budget> = self.store.select_by_owner(session).await?;
        Ok(budgets.into_iter().next())
    }

    /// The most recently updated budget with its breakdown.
    pub async fn get_budget(&self, session: &UserSession) -> Result<Option<BudgetView>, FinanceError> {
        Ok(self.latest_budget(session).await?.map(Self::budget_view))
    }

    /// Insert the user's first budget, or update the latest one.
    pub async fn save_budget(
        &self,
        session: &UserSession,
        allocation: BudgetAllocation,
    ) -> Result<BudgetView, FinanceError> {
        validate_allocation(&allocation)?;

        let budget = match self.latest_budget(session).await? {
            Some(existing) => {
                let patch = BudgetPatch::from_allocation(&allocation, self.now());
                self.store
                    .update::<Budget>(session, existing.id, &patch)
                    .await?
            }
            None => {
                let row = NewBudget::from_allocation(session.user_id(), &allocation);
                self.store.insert::<Budget>(session, &row).await?
            }
        };

        info!(user_id = %session.user_id(), budget_id = %budget.id, "budget saved");
        Ok(Self::budget_view(budget))
    }

    // --- Savings goals ---

    fn goal_view(&self, goal: SavingsGoalRecord) -> GoalView {
        let projection = project_goal(&goal.goal(), self.today());
        GoalView { goal, projection }
    }

    pub async fn list_goals(&self, session: &UserSession) -> Result<Vec<GoalView>, FinanceError> {
        let goals: Vec<SavingsGoalRecord> = self.store.select_by_owner(session).await?;
        Ok(goals.into_iter().map(|g| self.goal_view(g)).collect())
    }

    pub async fn create_goal(
        &self,
        session: &UserSession,
        request: CreateGoalRequest,
    ) -> Result<GoalView, FinanceError> {
        let goal_name = request.goal_name.trim().to_string();
        if goal_name.is_empty() {
            return Err(ValidationError::MissingGoalName.into());
        }
        let current_amount = request.current_amount.unwrap_or(0.0);
        let goal = SavingsGoal {
            target_amount: request.target_amount,
            current_amount,
            deadline: request.deadline,
        };
        validate_goal(&goal)?;

        let projection = project_goal(&goal, self.today());
        let row = NewSavingsGoal {
            user_id: session.user_id(),
            goal_name,
            target_amount: goal.target_amount,
            current_amount,
            deadline: goal.deadline,
            weekly_target: projection.weekly_target,
            completed: projection.completed,
        };

        let stored = self.store.insert::<SavingsGoalRecord>(session, &row).await?;
        info!(user_id = %session.user_id(), goal_id = %stored.id, "savings goal created");
        Ok(GoalView {
            goal: stored,
            projection,
        })
    }

    /// Record a new saved amount and recompute the stored weekly target.
    pub async fn update_goal_progress(
        &self,
        session: &UserSession,
        goal_id: Uuid,
        current_amount: f64,
    ) -> Result<GoalView, FinanceError> {
        if !current_amount.is_finite() || current_amount < 0.0 {
            return Err(ValidationError::NegativeAmount.into());
        }

        let goals: Vec<SavingsGoalRecord> = self.store.select_by_owner(session).await?;
        let existing = goals
            .into_iter()
            .find(|g| g.id == goal_id)
            .ok_or(StoreError::NotFound)?;

        let goal = SavingsGoal {
            current_amount,
            ..existing.goal()
        };
        validate_goal(&goal)?;
        let projection = project_goal(&goal, self.today());
        let patch = SavingsGoalPatch {
            current_amount: Some(current_amount),
            weekly_target: Some(projection.weekly_target),
            completed: Some(projection.completed),
            updated_at: Some(self.now()),
        };

        let updated = self
            .store
            .update::<SavingsGoalRecord>(session, goal_id, &patch)
            .await?;
        if projection.completed && !existing.completed {
            info!(user_id = %session.user_id(), goal_id = %goal_id, "savings goal completed");
        }
        Ok(GoalView {
            goal: updated,
            projection,
        })
    }

    // --- Expenses ---

    pub async fn list_expenses(&self, session: &UserSession) -> Result<ExpenseLedger, FinanceError> {
        let expenses: Vec<Expense> = self.store.select_by_owner(session).await?;
        Ok(expense::ledger(expenses))
    }

    pub async fn add_expense(
        &self,
        session: &UserSession,
        request: AddExpenseRequest,
    ) -> Result<Expense, FinanceError> {
        let row = expense::validate_expense(session.user_id(), request)?;
        let stored = self.store.insert::<Expense>(session, &row).await?;
        info!(
            user_id = %session.user_id(),
            expense_id = %stored.id,
            amount = stored.amount,
            currency = %stored.currency,
            "expense added"
        );
        Ok(stored)
    }

    // --- Achievements ---

    pub async fn list_achievements(&self, session: &UserSession) -> Result<AchievementBoard, FinanceError> {
        let unlocked: Vec<Achievement> = self.store.select_by_owner(session).await?;
        Ok(achievement::board(unlocked))
    }

    /// Unlock every catalog kind whose condition now holds, then bring the
    /// profile's points and level in line with the unlocked set.
    pub async fn evaluate_achievements(
        &self,
        session: &UserSession,
        chatted: bool,
    ) -> Result<EvaluationOutcome, FinanceError> {
        let budget = self.latest_budget(session).await?;
        let goals: Vec<SavingsGoalRecord> = self.store.select_by_owner(session).await?;
        let expenses: Vec<Expense> = self.store.select_by_owner(session).await?;
        let mut unlocked: Vec<Achievement> = self.store.select_by_owner(session).await?;

        let snapshot = ActivitySnapshot::from_records(chatted, budget.as_ref(), &goals, &expenses);
        let now = self.now();

        let mut newly_unlocked = Vec::new();
        for kind in achievement::newly_unlocked(&snapshot, &unlocked) {
            let row = NewAchievement::unlock(session.user_id(), kind, now);
            let stored = self.store.insert::<Achievement>(session, &row).await?;
            info!(user_id = %session.user_id(), achievement = %kind, points = kind.points(), "achievement unlocked");
            newly_unlocked.push(stored);
        }
        unlocked.extend(newly_unlocked.iter().cloned());

        let progress = achievement::level_progress(achievement::total_points(&unlocked));
        self.sync_profile_progress(session, &progress).await?;

        Ok(EvaluationOutcome {
            newly_unlocked,
            progress,
        })
    }

    async fn sync_profile_progress(
        &self,
        session: &UserSession,
        progress: &LevelProgress,
    ) -> Result<UserProfile, FinanceError> {
        let profile = self.ensure_profile(session).await?;
        if profile.level == progress.level && profile.total_points == progress.total_points {
            return Ok(profile);
        }
        let patch = ProfilePatch {
            level: Some(progress.level),
            total_points: Some(progress.total_points),
            updated_at: Some(self.now()),
            ..Default::default()
        };
        Ok(self
            .store
            .update::<UserProfile>(session, profile.id, &patch)
            .await?)
    }

    // --- Profile ---

    async fn ensure_profile(&self, session: &UserSession) -> Result<UserProfile, StoreError> {
        let profiles: Vec<UserProfile> = self.store.select_by_owner(session).await?;
        if let Some(profile) = profiles.into_iter().next() {
            return Ok(profile);
        }
        let display_name = session
            .user
            .email
            .clone()
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string());
        let row = NewUserProfile {
            id: session.user_id(),
            display_name,
        };
        info!(user_id = %session.user_id(), "creating user profile");
        self.store.insert::<UserProfile>(session, &row).await
    }

    /// The caller's profile, created on first access.
    pub async fn get_profile(&self, session: &UserSession) -> Result<UserProfile, FinanceError> {
        Ok(self.ensure_profile(session).await?)
    }

    pub async fn update_display_name(
        &self,
        session: &UserSession,
        display_name: &str,
    ) -> Result<UserProfile, FinanceError> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(ValidationError::EmptyDisplayName.into());
        }
        let profile = self.ensure_profile(session).await?;
        let patch = ProfilePatch {
            display_name: Some(display_name.to_string()),
            updated_at: Some(self.now()),
            ..Default::default()
        };
        Ok(self
            .store
            .update::<UserProfile>(session, profile.id, &patch)
            .await?)
    }

    // --- Dashboard ---

    pub async fn dashboard(&self, session: &UserSession) -> Result<DashboardSummary, FinanceError> {
        let profile = self.ensure_profile(session).await?;
        let budget = self.latest_budget(session).await?;
        let goals: Vec<SavingsGoalRecord> = self.store.select_by_owner(session).await?;
        let achievements: Vec<Achievement> = self.store.select_by_owner(session).await?;

        let recommendations = recommendations(budget.as_ref(), !achievements.is_empty());
        Ok(DashboardSummary {
            profile: Some(profile),
            budget: budget.map(Self::budget_view),
            goal_count: goals.len(),
            completed_goal_count: goals
                .iter()
                .filter(|g| g.completed || g.current_amount >= g.target_amount)
                .count(),
            total_saved: goals.iter().map(|g| g.current_amount).sum(),
            achievement_count: achievements.len(),
            progress: achievement::level_progress(achievement::total_points(&achievements)),
            recommendations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Duration;
    use finley_types::achievement::AchievementKind;
    use finley_types::profile::AuthUser;

    use crate::store::MemoryStore;

    struct FixedClock(i64);

    impl Clock for FixedClock {
        fn now_ms(&self) -> i64 {
            self.0
        }
    }

    // 2025-06-02T12:00:00Z
    const NOW_MS: i64 = 1_748_865_600_000;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    async fn service() -> (FinanceService<Arc<MemoryStore>, FixedClock>, UserSession) {
        let store = Arc::new(MemoryStore::new());
        let user = AuthUser {
            id: Uuid::now_v7(),
            email: Some("sam@example.com".to_string()),
        };
        store.register_session("jwt-sam", user);
        let service = FinanceService::with_clock(store, FixedClock(NOW_MS));
        let session = service
            .authenticate(SecretString::from("jwt-sam".to_string()))
            .await
            .unwrap();
        (service, session)
    }

    #[tokio::test]
    async fn test_authenticate_rejects_unknown_token() {
        let (service, _) = service().await;
        let err = service
            .authenticate(SecretString::from("stranger".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unauthorized));
    }

    #[tokio::test]
    async fn test_save_budget_inserts_then_updates() {
        let (service, session) = service().await;
        assert!(service.get_budget(&session).await.unwrap().is_none());

        let first = service
            .save_budget(
                &session,
                BudgetAllocation {
                    monthly_income: 1000.0,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(first.breakdown.needs_amount, 500.0);

        let second = service
            .save_budget(
                &session,
                BudgetAllocation {
                    monthly_income: 2000.0,
                    needs_pct: 60.0,
                    wants_pct: 20.0,
                    savings_pct: 30.0,
                },
            )
            .await
            .unwrap();
        assert_eq!(second.budget.id, first.budget.id);
        assert_eq!(second.breakdown.savings_amount, 600.0);
        assert_eq!(second.percent_total, 110.0);
        assert_eq!(service.store().row_count::<Budget>(), 1);
    }

    #[tokio::test]
    async fn test_save_budget_validates() {
        let (service, session) = service().await;
        let err = service
            .save_budget(
                &session,
                BudgetAllocation {
                    needs_pct: 140.0,
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FinanceError::Validation(ValidationError::PercentOutOfRange("needs"))
        ));
    }

    #[tokio::test]
    async fn test_create_goal_stores_projection() {
        let (service, session) = service().await;
        let view = service
            .create_goal(
                &session,
                CreateGoalRequest {
                    goal_name: "  Emergency fund ".to_string(),
                    target_amount: 1000.0,
                    current_amount: Some(200.0),
                    deadline: Some(today() + Duration::days(14)),
                },
            )
            .await
            .unwrap();
        assert_eq!(view.goal.goal_name, "Emergency fund");
        assert_eq!(view.goal.weekly_target, 400.0);
        assert_eq!(view.projection.progress_pct, 20.0);
        assert!(!view.goal.completed);

        let goals = service.list_goals(&session).await.unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].projection.weeks_remaining, Some(2));
    }

    #[tokio::test]
    async fn test_create_goal_validation() {
        let (service, session) = service().await;
        let cases = [
            ("", 100.0, None, ValidationError::MissingGoalName),
            ("Car", 0.0, None, ValidationError::InvalidTarget),
            ("Car", 100.0, Some(-5.0), ValidationError::NegativeAmount),
        ];
        for (name, target, current, expected) in cases {
            let err = service
                .create_goal(
                    &session,
                    CreateGoalRequest {
                        goal_name: name.to_string(),
                        target_amount: target,
                        current_amount: current,
                        deadline: None,
                    },
                )
                .await
                .unwrap_err();
            match err {
                FinanceError::Validation(v) => assert_eq!(v, expected),
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_update_goal_progress_recomputes() {
        let (service, session) = service().await;
        let view = service
            .create_goal(
                &session,
                CreateGoalRequest {
                    goal_name: "Laptop".to_string(),
                    target_amount: 500.0,
                    current_amount: None,
                    deadline: Some(today() + Duration::days(35)),
                },
            )
            .await
            .unwrap();
        assert_eq!(view.goal.weekly_target, 100.0);

        let updated = service
            .update_goal_progress(&session, view.goal.id, 500.0)
            .await
            .unwrap();
        assert!(updated.goal.completed);
        assert_eq!(updated.goal.weekly_target, 0.0);
        assert_eq!(updated.projection.progress_pct, 100.0);

        let err = service
            .update_goal_progress(&session, Uuid::now_v7(), 10.0)
            .await
            .unwrap_err();
        assert!(matches!(err, FinanceError::Store(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_expenses_roundtrip_through_service() {
        let (service, session) = service().await;
        for (day, amount) in [(1, 12.0), (3, 30.5)] {
            service
                .add_expense(
                    &session,
                    AddExpenseRequest {
                        amount: Some(amount),
                        expense_date: NaiveDate::from_ymd_opt(2025, 6, day),
                        currency: Some("usd".to_string()),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
        }

        let ledger = service.list_expenses(&session).await.unwrap();
        assert_eq!(ledger.summary.count, 2);
        assert_eq!(ledger.summary.total_spent, 42.5);
        assert_eq!(ledger.expenses[0].amount, 30.5);
        assert_eq!(ledger.expenses[0].currency, "USD");

        let err = service
            .add_expense(&session, AddExpenseRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FinanceError::Validation(ValidationError::InvalidAmount)
        ));
    }

    #[tokio::test]
    async fn test_evaluate_unlocks_once_and_updates_profile() {
        let (service, session) = service().await;
        service
            .save_budget(&session, BudgetAllocation::default())
            .await
            .unwrap();
        service
            .create_goal(
                &session,
                CreateGoalRequest {
                    goal_name: "Bike".to_string(),
                    target_amount: 150.0,
                    current_amount: Some(150.0),
                    deadline: None,
                },
            )
            .await
            .unwrap();

        let outcome = service.evaluate_achievements(&session, true).await.unwrap();
        let kinds: Vec<AchievementKind> = outcome
            .newly_unlocked
            .iter()
            .filter_map(|a| a.kind())
            .collect();
        assert_eq!(
            kinds,
            vec![
                AchievementKind::FirstChat,
                AchievementKind::FirstBudget,
                AchievementKind::SavingsGoal,
                AchievementKind::Save100,
                AchievementKind::GoalComplete,
            ]
        );
        // 10 + 25 + 25 + 50 + 100
        assert_eq!(outcome.progress.total_points, 210);
        assert_eq!(outcome.progress.level, 3);

        let profile = service.get_profile(&session).await.unwrap();
        assert_eq!(profile.total_points, 210);
        assert_eq!(profile.level, 3);

        let again = service.evaluate_achievements(&session, true).await.unwrap();
        assert!(again.newly_unlocked.is_empty());
        assert_eq!(again.progress.total_points, 210);

        let board = service.list_achievements(&session).await.unwrap();
        assert_eq!(board.unlocked.len(), 5);
        assert_eq!(board.locked.len(), 4);
    }

    #[tokio::test]
    async fn test_profile_created_on_first_access() {
        let (service, session) = service().await;
        let profile = service.get_profile(&session).await.unwrap();
        assert_eq!(profile.display_name, "sam@example.com");
        assert_eq!(profile.level, 1);

        let renamed = service
            .update_display_name(&session, "  Sam  ")
            .await
            .unwrap();
        assert_eq!(renamed.display_name, "Sam");

        let err = service.update_display_name(&session, " ").await.unwrap_err();
        assert!(matches!(
            err,
            FinanceError::Validation(ValidationError::EmptyDisplayName)
        ));
    }

    #[tokio::test]
    async fn test_dashboard_summarizes() {
        let (service, session) = service().await;
        let empty = service.dashboard(&session).await.unwrap();
        assert!(empty.budget.is_none());
        assert_eq!(empty.recommendations[0].title, "Create your first budget");

        service
            .save_budget(
                &session,
                BudgetAllocation {
                    monthly_income: 3000.0,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        service
            .create_goal(
                &session,
                CreateGoalRequest {
                    goal_name: "Trip".to_string(),
                    target_amount: 800.0,
                    current_amount: Some(120.0),
                    deadline: None,
                },
            )
            .await
            .unwrap();

        let summary = service.dashboard(&session).await.unwrap();
        assert_eq!(summary.goal_count, 1);
        assert_eq!(summary.total_saved, 120.0);
        assert_eq!(summary.completed_goal_count, 0);
        assert_eq!(summary.progress.level, 1);
        assert_eq!(summary.recommendations.len(), 3);
        assert_eq!(summary.recommendations[2].title, "Claim your first achievement");
    }
}
