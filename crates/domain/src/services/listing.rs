//! Ranking engine: listing one level of a thread in a chosen order.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::comment::{Comment, CommentContext, CommentRepository, ThreadScope};
use crate::error::DomainResult;
use crate::ranking::{rank_page, PageRequest, Pagination, SortOrder};
use crate::vote::{VoteRepository, VoteState};

use super::traits::AuthorityResolver;

/// Viewer-specific annotations on a listed comment, present only when
/// the caller supplied a viewer id.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ViewerContext {
    pub vote: VoteState,
    pub is_owner: bool,
    pub can_moderate: bool,
}

/// A comment as returned by listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ListedComment {
    #[serde(flatten)]
    pub comment: Comment,
    pub net_score: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer: Option<ViewerContext>,
}

/// Read-only listing service.
///
/// Listings run against a consistent snapshot and tolerate slightly
/// stale counters; no cross-page ordering guarantee is given.
pub struct ListingService {
    comments: Arc<dyn CommentRepository>,
    votes: Arc<dyn VoteRepository>,
    roles: Arc<dyn AuthorityResolver>,
}

impl ListingService {
    pub fn new(
        comments: Arc<dyn CommentRepository>,
        votes: Arc<dyn VoteRepository>,
        roles: Arc<dyn AuthorityResolver>,
    ) -> Self {
        Self {
            comments,
            votes,
            roles,
        }
    }

    /// List one thread level: root comments of a context, or direct
    /// replies to `parent_id`. Deeper nesting is fetched by calling
    /// again with the child as the new parent.
    ///
    /// Hidden comments are excluded.
    pub async fn list(
        &self,
        context: CommentContext,
        parent_id: Option<i64>,
        order: SortOrder,
        page: PageRequest,
        viewer_id: Option<i64>,
    ) -> DomainResult<(Vec<ListedComment>, Pagination)> {
        let rows = self
            .comments
            .list_scope(ThreadScope {
                context,
                parent_id,
                include_hidden: false,
            })
            .await?;

        let ranked = rank_page(rows, order, page);

        let items = match viewer_id {
            Some(viewer_id) => {
                let ids: Vec<i64> = ranked.items.iter().map(|c| c.id).collect();
                let states = self.votes.states_for(viewer_id, &ids).await?;
                let can_moderate = self
                    .roles
                    .role_of(viewer_id)
                    .await?
                    .has_moderation_authority();

                ranked
                    .items
                    .into_iter()
                    .map(|comment| {
                        let viewer = ViewerContext {
                            vote: states.get(&comment.id).copied().unwrap_or_default(),
                            is_owner: comment.author_id == viewer_id,
                            can_moderate,
                        };
                        ListedComment {
                            net_score: comment.net_score(),
                            comment,
                            viewer: Some(viewer),
                        }
                    })
                    .collect()
            }
            None => ranked
                .items
                .into_iter()
                .map(|comment| ListedComment {
                    net_score: comment.net_score(),
                    comment,
                    viewer: None,
                })
                .collect(),
        };

        Ok((items, ranked.pagination))
    }
}
