//! In-memory implementations of the repositories and collaborators.
//!
//! These back the service unit tests: repositories keep their state in
//! mutex-guarded maps (which also gives the vote ledger the atomicity
//! its contract demands), and the collaborator mocks record every call
//! for verification.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::comment::{Comment, CommentRepository, ContextKind, NewComment, ThreadScope};
use crate::error::{DomainError, DomainResult};
use crate::role::Role;
use crate::vote::{Vote, VoteLedgerOp, VoteRepository, VoteState, VoteTally, VoteTransition};

use super::traits::{
    AuthorityResolver, ContextValidator, NotificationKind, NotificationSink, XpService,
};

// ============================================================================
// In-memory comment repository
// ============================================================================

/// Mutex-backed comment store.
#[derive(Default)]
pub struct InMemoryCommentRepository {
    comments: Mutex<HashMap<i64, Comment>>,
    next_id: Mutex<i64>,
}

impl InMemoryCommentRepository {
    pub fn new() -> Self {
        Self {
            next_id: Mutex::new(1),
            ..Default::default()
        }
    }

    /// Adjust counters directly; used by the in-memory vote ledger
    /// while it holds its own lock.
    fn adjust_counters(&self, id: i64, up: i64, down: i64) -> DomainResult<VoteTally> {
        let mut comments = self.comments.lock().unwrap();
        let comment = comments
            .get_mut(&id)
            .ok_or(DomainError::not_found("comment", id))?;
        comment.upvotes += up;
        comment.downvotes += down;
        assert!(comment.upvotes >= 0 && comment.downvotes >= 0);
        Ok(VoteTally {
            upvotes: comment.upvotes,
            downvotes: comment.downvotes,
        })
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Comment>> {
        Ok(self.comments.lock().unwrap().get(&id).cloned())
    }

    async fn list_scope(&self, scope: ThreadScope) -> DomainResult<Vec<Comment>> {
        Ok(self
            .comments
            .lock()
            .unwrap()
            .values()
            .filter(|c| {
                c.context == scope.context
                    && c.parent_id == scope.parent_id
                    && (scope.include_hidden || !c.is_hidden)
            })
            .cloned()
            .collect())
    }

    async fn count_replies(&self, id: i64) -> DomainResult<i64> {
        Ok(self
            .comments
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.parent_id == Some(id))
            .count() as i64)
    }

    async fn create(&self, data: NewComment) -> DomainResult<Comment> {
        let mut next_id = self.next_id.lock().unwrap();
        let id = *next_id;
        *next_id += 1;

        let now = Utc::now();
        let comment = Comment {
            id,
            created_at: now,
            updated_at: now,
            author_id: data.author_id,
            context: data.context,
            parent_id: data.parent_id,
            content: data.content,
            upvotes: 0,
            downvotes: 0,
            is_spoiler: data.is_spoiler,
            is_hidden: false,
            is_edited: false,
        };
        self.comments.lock().unwrap().insert(id, comment.clone());
        Ok(comment)
    }

    async fn update(
        &self,
        id: i64,
        content: Option<String>,
        is_spoiler: Option<bool>,
    ) -> DomainResult<Comment> {
        let mut comments = self.comments.lock().unwrap();
        let comment = comments
            .get_mut(&id)
            .ok_or(DomainError::not_found("comment", id))?;
        if let Some(content) = content {
            comment.content = content;
            comment.is_edited = true;
        }
        if let Some(is_spoiler) = is_spoiler {
            comment.is_spoiler = is_spoiler;
        }
        comment.updated_at = Utc::now();
        Ok(comment.clone())
    }

    async fn set_hidden(&self, id: i64, hidden: bool) -> DomainResult<Comment> {
        let mut comments = self.comments.lock().unwrap();
        let comment = comments
            .get_mut(&id)
            .ok_or(DomainError::not_found("comment", id))?;
        comment.is_hidden = hidden;
        comment.updated_at = Utc::now();
        Ok(comment.clone())
    }

    async fn soft_delete(&self, id: i64, placeholder: &str) -> DomainResult<Comment> {
        let mut comments = self.comments.lock().unwrap();
        let comment = comments
            .get_mut(&id)
            .ok_or(DomainError::not_found("comment", id))?;
        comment.content = placeholder.to_string();
        comment.is_hidden = true;
        comment.updated_at = Utc::now();
        Ok(comment.clone())
    }

    async fn hard_delete(&self, id: i64) -> DomainResult<bool> {
        // Reply check and removal under one lock, per the contract.
        let mut comments = self.comments.lock().unwrap();
        if comments.values().any(|c| c.parent_id == Some(id)) {
            return Ok(false);
        }
        Ok(comments.remove(&id).is_some())
    }
}

// ============================================================================
// In-memory vote ledger
// ============================================================================

/// Mutex-backed vote ledger bound to an [`InMemoryCommentRepository`].
///
/// The whole cast happens under one lock, which satisfies the per-pair
/// serializability the trait contract requires.
pub struct InMemoryVoteRepository {
    comments: Arc<InMemoryCommentRepository>,
    votes: Mutex<HashMap<(i64, i64), Vote>>,
}

impl InMemoryVoteRepository {
    pub fn new(comments: Arc<InMemoryCommentRepository>) -> Self {
        Self {
            comments,
            votes: Mutex::new(HashMap::new()),
        }
    }

    /// Number of ledger rows (for verification).
    pub fn ledger_len(&self) -> usize {
        self.votes.lock().unwrap().len()
    }
}

#[async_trait]
impl VoteRepository for InMemoryVoteRepository {
    async fn cast(
        &self,
        comment_id: i64,
        voter_id: i64,
        is_upvote: bool,
    ) -> DomainResult<(VoteState, VoteTally)> {
        let mut votes = self.votes.lock().unwrap();
        let key = (voter_id, comment_id);
        let existing = votes.get(&key).map(|v| v.is_upvote);
        let transition = VoteTransition::plan(existing, is_upvote);

        match transition.op {
            VoteLedgerOp::Insert { is_upvote } | VoteLedgerOp::Flip { is_upvote } => {
                votes.insert(
                    key,
                    Vote {
                        user_id: voter_id,
                        comment_id,
                        is_upvote,
                        created_at: Utc::now(),
                    },
                );
            }
            VoteLedgerOp::Remove => {
                votes.remove(&key);
            }
        }
        let tally = self.comments.adjust_counters(
            comment_id,
            transition.upvote_delta,
            transition.downvote_delta,
        )?;
        Ok((transition.new_state, tally))
    }

    async fn find(&self, voter_id: i64, comment_id: i64) -> DomainResult<Option<Vote>> {
        Ok(self
            .votes
            .lock()
            .unwrap()
            .get(&(voter_id, comment_id))
            .cloned())
    }

    async fn states_for(
        &self,
        voter_id: i64,
        comment_ids: &[i64],
    ) -> DomainResult<HashMap<i64, VoteState>> {
        let votes = self.votes.lock().unwrap();
        Ok(comment_ids
            .iter()
            .filter_map(|&id| {
                votes
                    .get(&(voter_id, id))
                    .map(|v| (id, VoteState::from_ledger(Some(v.is_upvote))))
            })
            .collect())
    }
}

// ============================================================================
// Collaborator mocks
// ============================================================================

/// Context validator backed by a set of known entities.
#[derive(Default)]
pub struct StaticContextValidator {
    known: Mutex<HashSet<(ContextKind, i64)>>,
}

impl StaticContextValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity as existing.
    pub fn insert(&self, kind: ContextKind, id: i64) {
        self.known.lock().unwrap().insert((kind, id));
    }
}

#[async_trait]
impl ContextValidator for StaticContextValidator {
    async fn exists(&self, kind: ContextKind, id: i64) -> DomainResult<bool> {
        Ok(self.known.lock().unwrap().contains(&(kind, id)))
    }
}

/// XP service that records every award.
#[derive(Default)]
pub struct RecordingXpService {
    awards: Mutex<Vec<(i64, i64)>>,
    should_fail: Mutex<bool>,
}

impl RecordingXpService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.lock().unwrap() = should_fail;
    }

    /// All recorded (user_id, amount) awards.
    pub fn awards(&self) -> Vec<(i64, i64)> {
        self.awards.lock().unwrap().clone()
    }
}

#[async_trait]
impl XpService for RecordingXpService {
    async fn award(&self, user_id: i64, amount: i64) -> DomainResult<()> {
        if *self.should_fail.lock().unwrap() {
            return Err(DomainError::Persistence("xp store unavailable".into()));
        }
        self.awards.lock().unwrap().push((user_id, amount));
        Ok(())
    }
}

/// Notification sink that records every delivery.
#[derive(Default)]
pub struct RecordingNotificationSink {
    delivered: Mutex<Vec<(i64, NotificationKind, serde_json::Value)>>,
}

impl RecordingNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded deliveries.
    pub fn delivered(&self) -> Vec<(i64, NotificationKind, serde_json::Value)> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingNotificationSink {
    async fn notify(
        &self,
        user_id: i64,
        kind: NotificationKind,
        payload: serde_json::Value,
    ) -> DomainResult<()> {
        self.delivered.lock().unwrap().push((user_id, kind, payload));
        Ok(())
    }
}

/// Authority resolver backed by a role map; unknown users are `User`.
#[derive(Default)]
pub struct StaticAuthorityResolver {
    roles: Mutex<HashMap<i64, Role>>,
}

impl StaticAuthorityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_role(&self, user_id: i64, role: Role) {
        self.roles.lock().unwrap().insert(user_id, role);
    }
}

#[async_trait]
impl AuthorityResolver for StaticAuthorityResolver {
    async fn role_of(&self, user_id: i64) -> DomainResult<Role> {
        Ok(self
            .roles
            .lock()
            .unwrap()
            .get(&user_id)
            .copied()
            .unwrap_or_default())
    }
}
