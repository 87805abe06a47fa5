use std::sync::Arc;

use sqlx::SqlitePool;

use domain::{CommentService, HookDispatcher, ListingService, ModerationService, VoteService};

use crate::config::Config;
use crate::repositories::{
    SqliteAuthorityResolver, SqliteCommentRepository, SqliteContextValidator,
    SqliteNotificationSink, SqliteVoteRepository, SqliteXpService,
};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<Config>,
    pub comments: Arc<CommentService>,
    pub votes: Arc<VoteService>,
    pub listing: Arc<ListingService>,
    pub moderation: Arc<ModerationService>,
}

impl AppState {
    pub fn new(db: SqlitePool, config: Config) -> Self {
        let comment_repo = Arc::new(SqliteCommentRepository::new(db.clone()));
        let vote_repo = Arc::new(SqliteVoteRepository::new(db.clone()));
        let catalog = Arc::new(SqliteContextValidator::new(db.clone()));
        let roles = Arc::new(SqliteAuthorityResolver::new(db.clone()));

        // XP and notifications ride the fire-and-forget queue.
        let hooks = HookDispatcher::spawn(
            Arc::new(SqliteXpService::new(db.clone())),
            Arc::new(SqliteNotificationSink::new(db.clone())),
            config.hook_capacity,
        );

        let comments = Arc::new(CommentService::new(
            comment_repo.clone(),
            catalog,
            roles.clone(),
            hooks,
        ));
        let votes = Arc::new(VoteService::new(comment_repo.clone(), vote_repo.clone()));
        let listing = Arc::new(ListingService::new(
            comment_repo.clone(),
            vote_repo,
            roles.clone(),
        ));
        let moderation = Arc::new(ModerationService::new(comment_repo, roles));

        Self {
            db,
            config: Arc::new(config),
            comments,
            votes,
            listing,
            moderation,
        }
    }
}
