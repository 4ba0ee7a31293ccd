use serde::{Deserialize, Serialize};

/// Number of questions a user may receive before the payment gate applies.
pub const FREE_LIMIT: u32 = 3;

/// Per-user trial state.
///
/// `asked_count` only ever grows during the lifetime of the process.
#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub struct UsageState {
    pub asked_count: u32,
    pub is_paid: bool,
}

impl UsageState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the free questions are used up and no payment was recorded.
    pub fn is_blocked(&self, limit: u32) -> bool {
        self.asked_count >= limit && !self.is_paid
    }

    /// Counts one delivered question.
    pub fn record_served(&mut self) {
        self.asked_count = self.asked_count.saturating_add(1);
    }
}
