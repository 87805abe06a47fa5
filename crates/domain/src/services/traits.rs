//! Trait abstractions for external collaborators.
//!
//! The comment engine consumes these but does not implement them; the
//! infrastructure layer provides concrete versions and tests use the
//! mocks in [`super::mocks`].

use async_trait::async_trait;

use crate::comment::ContextKind;
use crate::error::DomainResult;
use crate::role::Role;

/// Checks that the content entity a comment is attached to exists.
#[async_trait]
pub trait ContextValidator: Send + Sync {
    async fn exists(&self, kind: ContextKind, id: i64) -> DomainResult<bool>;
}

/// Issues XP rewards for comment activity.
#[async_trait]
pub trait XpService: Send + Sync {
    async fn award(&self, user_id: i64, amount: i64) -> DomainResult<()>;
}

/// Kind of notification delivered to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Someone replied to the user's comment.
    Reply,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Reply => "reply",
        }
    }
}

/// Delivers notifications. Transport is external; payloads are opaque
/// JSON values.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(
        &self,
        user_id: i64,
        kind: NotificationKind,
        payload: serde_json::Value,
    ) -> DomainResult<()>;
}

/// Resolves a user's role for authority checks.
#[async_trait]
pub trait AuthorityResolver: Send + Sync {
    async fn role_of(&self, user_id: i64) -> DomainResult<Role>;
}
