use std::fmt;

use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UsageAction {
    DocumentAnalysis,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsageDecision {
    Allowed,
    Denied { reason: String },
}

/// Subscription and usage-limit store, seen from the pipeline as
/// "may I perform this action" and "record this usage".
#[async_trait]
pub trait UsageGate: Send + Sync {
    async fn check(
        &self,
        user: UserId,
        action: UsageAction,
    ) -> Result<UsageDecision, UsageGateError>;

    async fn record(&self, user: UserId, action: UsageAction) -> Result<(), UsageGateError>;
}

#[derive(Debug, thiserror::Error)]
pub enum UsageGateError {
    #[error("usage store unavailable: {0}")]
    Unavailable(String),
}
