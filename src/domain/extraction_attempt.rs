use std::time::Duration;

use chrono::{DateTime, Utc};

use super::extraction_stage::ExtractionStage;

/// Tagged result of a single engine attempt. Engines never signal stage-local
/// failures through `Err`; the orchestrator reads these variants to decide
/// whether the chain stops or advances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success { text: String, warnings: Vec<String> },
    InsufficientYield { text: String },
    TimedOut,
    ToolUnavailable { tool: String },
    Corrupt { reason: String },
}

impl AttemptOutcome {
    pub fn success(text: impl Into<String>) -> Self {
        Self::Success {
            text: text.into(),
            warnings: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The engine could not produce anything at all, as opposed to producing too little.
    pub fn is_outright_failure(&self) -> bool {
        matches!(
            self,
            Self::TimedOut | Self::ToolUnavailable { .. } | Self::Corrupt { .. }
        )
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::InsufficientYield { .. } => "insufficient_yield",
            Self::TimedOut => "timed_out",
            Self::ToolUnavailable { .. } => "tool_unavailable",
            Self::Corrupt { .. } => "corrupt",
        }
    }

    /// Human readable cause, used when the whole chain is exhausted.
    pub fn describe(&self, stage: ExtractionStage) -> String {
        match self {
            Self::Success { text, .. } => {
                format!("{stage}: produced {} characters", text.chars().count())
            }
            Self::InsufficientYield { text } => format!(
                "{stage}: insufficient yield ({} characters)",
                text.chars().count()
            ),
            Self::TimedOut => format!("{stage}: timed out"),
            Self::ToolUnavailable { tool } => format!("{stage}: {tool} is not available"),
            Self::Corrupt { reason } => format!("{stage}: could not open file: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionAttempt {
    pub stage: ExtractionStage,
    pub timeout_budget: Duration,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub outcome: AttemptOutcome,
}
