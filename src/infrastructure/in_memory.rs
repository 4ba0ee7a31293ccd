use crate::domain::message::UserId;
use crate::domain::ports::UsageLedger;
use crate::domain::usage::{FREE_LIMIT, UsageState};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory usage ledger.
///
/// Uses `Arc<RwLock<HashMap<UserId, UsageState>>>` so clones share one map.
/// Every mutation happens under the write lock, which keeps increments atomic
/// per user. State is lost when the process exits.
#[derive(Clone)]
pub struct InMemoryUsageLedger {
    limit: u32,
    users: Arc<RwLock<HashMap<UserId, UsageState>>>,
}

impl InMemoryUsageLedger {
    /// Creates an empty ledger with the default free limit.
    pub fn new() -> Self {
        Self::with_limit(FREE_LIMIT)
    }

    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit,
            users: Arc::default(),
        }
    }
}

impl Default for InMemoryUsageLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UsageLedger for InMemoryUsageLedger {
    async fn get_or_init(&self, user: UserId) -> Result<UsageState> {
        if let Some(state) = self.users.read().await.get(&user) {
            return Ok(*state);
        }
        let mut users = self.users.write().await;
        Ok(*users.entry(user).or_default())
    }

    async fn is_blocked(&self, user: UserId) -> Result<bool> {
        let users = self.users.read().await;
        Ok(users
            .get(&user)
            .is_some_and(|state| state.is_blocked(self.limit)))
    }

    async fn record_question_served(&self, user: UserId) -> Result<UsageState> {
        let mut users = self.users.write().await;
        let state = users.entry(user).or_default();
        state.record_served();
        Ok(*state)
    }

    async fn set_paid(&self, user: UserId, paid: bool) -> Result<UsageState> {
        let mut users = self.users.write().await;
        let state = users.entry(user).or_default();
        state.is_paid = paid;
        Ok(*state)
    }

    async fn snapshot(&self) -> Result<Vec<(UserId, UsageState)>> {
        let users = self.users.read().await;
        let mut all: Vec<_> = users.iter().map(|(id, state)| (*id, *state)).collect();
        all.sort_by_key(|(id, _)| *id);
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_or_init_creates_default() {
        let ledger = InMemoryUsageLedger::new();
        let state = ledger.get_or_init(UserId(7)).await.unwrap();
        assert_eq!(state, UsageState::new());

        let all = ledger.snapshot().await.unwrap();
        assert_eq!(all, vec![(UserId(7), UsageState::new())]);
    }

    #[tokio::test]
    async fn test_blocked_after_limit() {
        let ledger = InMemoryUsageLedger::new();
        let user = UserId(1);
        assert!(!ledger.is_blocked(user).await.unwrap());

        for _ in 0..3 {
            ledger.record_question_served(user).await.unwrap();
        }
        assert!(ledger.is_blocked(user).await.unwrap());
        // Stays blocked.
        assert!(ledger.is_blocked(user).await.unwrap());

        let state = ledger.set_paid(user, true).await.unwrap();
        assert_eq!(state.asked_count, 3);
        assert!(!ledger.is_blocked(user).await.unwrap());
    }

    #[tokio::test]
    async fn test_custom_limit() {
        let ledger = InMemoryUsageLedger::with_limit(1);
        ledger.record_question_served(UserId(2)).await.unwrap();
        assert!(ledger.is_blocked(UserId(2)).await.unwrap());
        assert!(!ledger.is_blocked(UserId(3)).await.unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_increments_are_not_lost() {
        let ledger = InMemoryUsageLedger::new();
        let mut handles = Vec::new();
        for _ in 0..50 {
            let ledger = ledger.clone();
            handles.push(tokio::spawn(async move {
                ledger.record_question_served(UserId(9)).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let state = ledger.get_or_init(UserId(9)).await.unwrap();
        assert_eq!(state.asked_count, 50);
    }
}
