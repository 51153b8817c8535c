//! In-process [`FinanceStore`] keeping rows as JSON objects.
//!
//! Behaves like the hosted REST layer where it matters to callers: the
//! store assigns `id` and timestamps, applies column defaults, scopes every
//! read and write to the session's user and returns rows newest first.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use uuid::Uuid;

use finley_types::error::StoreError;
use finley_types::profile::AuthUser;

use super::{FinanceStore, TableRow, UserSession};

#[derive(Default)]
pub struct MemoryStore {
    sessions: DashMap<String, AuthUser>,
    tables: DashMap<&'static str, Vec<Map<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `access_token` as a bearer for `user`.
    pub fn register_session(&self, access_token: &str, user: AuthUser) {
        self.sessions.insert(access_token.to_string(), user);
    }

    /// Number of rows currently stored for `T`, across all users.
    pub fn row_count<T: TableRow>(&self) -> usize {
        self.tables.get(T::TABLE).map(|rows| rows.len()).unwrap_or(0)
    }

    fn authorize(&self, session: &UserSession) -> Result<(), StoreError> {
        match self.sessions.get(session.access_token.expose_secret()) {
            Some(user) if user.id == session.user.id => Ok(()),
            _ => Err(StoreError::Unauthorized),
        }
    }
}

fn owned_by(row: &Map<String, Value>, column: &str, user_id: Uuid) -> bool {
    row.get(column).and_then(Value::as_str) == Some(user_id.to_string().as_str())
}

/// Normalize timestamps so rows compare chronologically; dates already do.
fn order_key(value: Option<&Value>) -> String {
    match value.and_then(Value::as_str) {
        Some(s) => match s.parse::<DateTime<Utc>>() {
            Ok(ts) => ts.format("%Y-%m-%dT%H:%M:%S%.9f").to_string(),
            Err(_) => s.to_string(),
        },
        None => String::new(),
    }
}

fn to_object<P: serde::Serialize>(payload: &P) -> Result<Map<String, Value>, StoreError> {
    match serde_json::to_value(payload) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(StoreError::Deserialization(format!(
            "expected a JSON object, got {other}"
        ))),
        Err(e) => Err(StoreError::Deserialization(e.to_string())),
    }
}

fn from_object<T: TableRow>(row: Map<String, Value>) -> Result<T, StoreError> {
    serde_json::from_value(Value::Object(row)).map_err(|e| StoreError::Deserialization(e.to_string()))
}

impl FinanceStore for MemoryStore {
    async fn current_user(&self, access_token: &SecretString) -> Result<AuthUser, StoreError> {
        self.sessions
            .get(access_token.expose_secret())
            .map(|user| user.clone())
            .ok_or(StoreError::Unauthorized)
    }

    async fn select_by_owner<T: TableRow>(&self, session: &UserSession) -> Result<Vec<T>, StoreError> {
        self.authorize(session)?;
        let mut rows: Vec<Map<String, Value>> = self
            .tables
            .get(T::TABLE)
            .map(|rows| {
                rows.iter()
                    .filter(|row| owned_by(row, T::OWNER_COLUMN, session.user_id()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        rows.sort_by_cached_key(|row| std::cmp::Reverse(order_key(row.get(T::ORDER_COLUMN))));
        rows.into_iter().map(from_object::<T>).collect()
    }

    async fn insert<T: TableRow>(&self, session: &UserSession, row: &T::Insert) -> Result<T, StoreError> {
        self.authorize(session)?;
        let mut object = to_object(row)?;
        if !owned_by(&object, T::OWNER_COLUMN, session.user_id()) {
            return Err(StoreError::Upstream {
                status: 403,
                body: format!("new row violates row-level security policy for table \"{}\"", T::TABLE),
            });
        }

        let now = Value::String(Utc::now().to_rfc3339());
        object
            .entry("id")
            .or_insert_with(|| Value::String(Uuid::now_v7().to_string()));
        object.entry("created_at").or_insert_with(|| now.clone());
        object.entry("updated_at").or_insert(now);
        for (column, value) in T::column_defaults() {
            object.entry(column).or_insert(value);
        }

        let stored = from_object::<T>(object.clone())?;
        self.tables.entry(T::TABLE).or_insert_with(Vec::new).push(object);
        Ok(stored)
    }

    async fn update<T: TableRow>(
        &self,
        session: &UserSession,
        id: Uuid,
        patch: &T::Patch,
    ) -> Result<T, StoreError> {
        self.authorize(session)?;
        let changes = to_object(patch)?;
        let id = id.to_string();

        let mut rows = self.tables.get_mut(T::TABLE).ok_or(StoreError::NotFound)?;
        let row = rows
            .iter_mut()
            .find(|row| {
                row.get("id").and_then(Value::as_str) == Some(id.as_str())
                    && owned_by(row, T::OWNER_COLUMN, session.user_id())
            })
            .ok_or(StoreError::NotFound)?;
        for (column, value) in changes {
            row.insert(column, value);
        }
        from_object::<T>(row.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use finley_types::budget::{Budget, BudgetPatch, NewBudget};
    use finley_types::expense::{Expense, NewExpense};
    use finley_types::profile::{NewUserProfile, UserProfile};

    fn session(store: &MemoryStore, token: &str) -> UserSession {
        let user = AuthUser {
            id: Uuid::now_v7(),
            email: Some(format!("{token}@example.com")),
        };
        store.register_session(token, user.clone());
        UserSession {
            user,
            access_token: SecretString::from(token.to_string()),
        }
    }

    fn expense(user_id: Uuid, day: u32) -> NewExpense {
        NewExpense {
            user_id,
            amount: 10.0,
            expense_date: NaiveDate::from_ymd_opt(2025, 5, day).unwrap(),
            description: None,
            category_id: None,
            merchant: None,
            payment_method: None,
            currency: "USD".to_string(),
            notes: None,
            is_recurring: false,
            recurrence_period: None,
            tags: None,
        }
    }

    #[tokio::test]
    async fn test_current_user_requires_known_token() {
        let store = MemoryStore::new();
        let s = session(&store, "tok");
        let user = store.current_user(&s.access_token).await.unwrap();
        assert_eq!(user.id, s.user_id());

        let err = store
            .current_user(&SecretString::from("nope".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unauthorized));
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_defaults() {
        let store = MemoryStore::new();
        let s = session(&store, "tok");
        let profile: UserProfile = store
            .insert::<UserProfile>(
                &s,
                &NewUserProfile {
                    id: s.user_id(),
                    display_name: "Sam".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(profile.id, s.user_id());
        assert_eq!(profile.level, 1);
        assert_eq!(profile.total_points, 0);
    }

    #[tokio::test]
    async fn test_select_is_scoped_and_newest_first() {
        let store = MemoryStore::new();
        let alice = session(&store, "alice");
        let bob = session(&store, "bob");

        for day in [3, 12, 7] {
            store
                .insert::<Expense>(&alice, &expense(alice.user_id(), day))
                .await
                .unwrap();
        }
        store
            .insert::<Expense>(&bob, &expense(bob.user_id(), 1))
            .await
            .unwrap();

        let rows: Vec<Expense> = store.select_by_owner(&alice).await.unwrap();
        let days: Vec<u32> = rows
            .iter()
            .map(|e| chrono::Datelike::day(&e.expense_date))
            .collect();
        assert_eq!(days, vec![12, 7, 3]);
        assert_eq!(store.row_count::<Expense>(), 4);
    }

    #[tokio::test]
    async fn test_insert_for_other_user_is_rejected() {
        let store = MemoryStore::new();
        let alice = session(&store, "alice");
        let err = store
            .insert::<Expense>(&alice, &expense(Uuid::now_v7(), 1))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Upstream { status: 403, .. }));
    }

    #[tokio::test]
    async fn test_update_merges_patch_and_checks_owner() {
        let store = MemoryStore::new();
        let alice = session(&store, "alice");
        let bob = session(&store, "bob");

        let budget: Budget = store
            .insert::<Budget>(
                &alice,
                &NewBudget {
                    user_id: alice.user_id(),
                    monthly_income: 1000.0,
                    needs_percentage: 50.0,
                    wants_percentage: 30.0,
                    savings_percentage: 20.0,
                },
            )
            .await
            .unwrap();

        let patch = BudgetPatch {
            monthly_income: Some(2500.0),
            ..Default::default()
        };
        let updated: Budget = store.update::<Budget>(&alice, budget.id, &patch).await.unwrap();
        assert_eq!(updated.monthly_income, 2500.0);
        assert_eq!(updated.needs_percentage, 50.0);

        let err = store
            .update::<Budget>(&bob, budget.id, &patch)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn test_forged_session_is_unauthorized() {
        let store = MemoryStore::new();
        let _alice = session(&store, "alice");
        let forged = UserSession {
            user: AuthUser {
                id: Uuid::now_v7(),
                email: None,
            },
            access_token: SecretString::from("alice".to_string()),
        };
        let err = store.select_by_owner::<Expense>(&forged).await.unwrap_err();
        assert!(matches!(err, StoreError::Unauthorized));
    }
}
