use async_trait::async_trait;

use crate::application::ports::{UsageAction, UsageDecision, UsageGate, UsageGateError, UserId};

/// Allows every action and records nothing.
#[derive(Default)]
pub struct UnlimitedUsageGate;

#[async_trait]
impl UsageGate for UnlimitedUsageGate {
    async fn check(
        &self,
        _user: UserId,
        _action: UsageAction,
    ) -> Result<UsageDecision, UsageGateError> {
        Ok(UsageDecision::Allowed)
    }

    async fn record(&self, user: UserId, action: UsageAction) -> Result<(), UsageGateError> {
        tracing::debug!(user = %user, action = ?action, "Usage recorded");
        Ok(())
    }
}
