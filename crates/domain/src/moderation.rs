//! Moderation actions and lifecycle.
//!
//! State machine: Visible ⇄ Hidden → {Visible, Destroyed}. A destroyed
//! comment cannot be recovered.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::error::DomainError;

/// Action a moderator can take on a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ModerationAction {
    /// Hide the comment without altering content.
    Hide,
    /// Make a hidden comment visible again.
    Approve,
    /// Delete with the same hard/soft policy as author deletion,
    /// bypassing the author-identity check.
    Delete,
}

impl ModerationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationAction::Hide => "hide",
            ModerationAction::Approve => "approve",
            ModerationAction::Delete => "delete",
        }
    }
}

impl FromStr for ModerationAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hide" => Ok(ModerationAction::Hide),
            "approve" => Ok(ModerationAction::Approve),
            "delete" => Ok(ModerationAction::Delete),
            other => Err(DomainError::validation(format!(
                "Invalid moderation action: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_round_trip() {
        for action in [
            ModerationAction::Hide,
            ModerationAction::Approve,
            ModerationAction::Delete,
        ] {
            assert_eq!(action.as_str().parse::<ModerationAction>().unwrap(), action);
        }
    }

    #[test]
    fn test_invalid_action_is_validation_error() {
        assert!(matches!(
            "obliterate".parse::<ModerationAction>(),
            Err(DomainError::Validation(_))
        ));
    }
}
