//! Ranking and pagination for comment listings.
//!
//! All four orders are computed over one thread level at a time. Hot and
//! controversial scores are derived in memory from the counters, so a
//! listing only needs the scope's rows, not a specialised query per order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::comment::Comment;
use crate::error::{DomainError, DomainResult};

/// Fixed reference epoch for the hot score (seconds). Chosen so recency
/// and net-vote magnitude trade off on a stable decay curve: an older
/// comment needs a larger net score to outrank a newer one.
pub const HOT_REFERENCE_EPOCH: i64 = 1_134_028_003;

/// Seconds of age that offset one order of magnitude of net votes.
pub const HOT_DECAY_SECONDS: f64 = 45_000.0;

/// Pagination bounds.
pub const MAX_PAGE_LIMIT: u32 = 50;
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Sort order for comment listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Hot,
    New,
    Top,
    Controversial,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Hot => "hot",
            SortOrder::New => "new",
            SortOrder::Top => "top",
            SortOrder::Controversial => "controversial",
        }
    }
}

impl FromStr for SortOrder {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hot" => Ok(SortOrder::Hot),
            "new" => Ok(SortOrder::New),
            "top" => Ok(SortOrder::Top),
            "controversial" => Ok(SortOrder::Controversial),
            other => Err(DomainError::validation(format!(
                "Invalid sort order: {other}"
            ))),
        }
    }
}

/// Time-decayed popularity score combining vote magnitude (logarithmic)
/// and recency (linear).
pub fn hot_score(upvotes: i64, downvotes: i64, created_at: DateTime<Utc>) -> f64 {
    let net = upvotes - downvotes;
    let sign = match net.cmp(&0) {
        Ordering::Greater => 1.0,
        Ordering::Equal => 0.0,
        Ordering::Less => -1.0,
    };
    let magnitude = (net.unsigned_abs().max(1) as f64).log10();
    let age = (created_at.timestamp() - HOT_REFERENCE_EPOCH) as f64;
    sign * magnitude + age / HOT_DECAY_SECONDS
}

/// How evenly split a comment's votes are, weighted toward volume only
/// through the caller's tie-break. 1.0 is a perfect split, 0.0 is
/// one-sided or unvoted.
pub fn controversy_score(upvotes: i64, downvotes: i64) -> f64 {
    let min = upvotes.min(downvotes) as f64;
    let max = upvotes.max(downvotes).max(1) as f64;
    min / max
}

/// Validated page request. `page` is 1-indexed; `limit` is clamped to
/// `[1, MAX_PAGE_LIMIT]`.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> DomainResult<Self> {
        if page < 1 {
            return Err(DomainError::validation("Page must be at least 1"));
        }
        Ok(Self {
            page,
            limit: limit.clamp(1, MAX_PAGE_LIMIT),
        })
    }
}

/// Pagination metadata derived from the total count.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(request: PageRequest, total: u64) -> Self {
        let total_pages = total.div_ceil(u64::from(request.limit)) as u32;
        Self {
            page: request.page,
            limit: request.limit,
            total,
            total_pages,
            has_next: request.page < total_pages,
            has_prev: request.page > 1 && total > 0,
        }
    }
}

/// One ranked, paginated slice of a thread level.
#[derive(Debug, Clone)]
pub struct RankedPage {
    pub items: Vec<Comment>,
    pub pagination: Pagination,
}

fn compare(a: &Comment, b: &Comment, order: SortOrder) -> Ordering {
    match order {
        SortOrder::New => b.created_at.cmp(&a.created_at),
        SortOrder::Top => b
            .net_score()
            .cmp(&a.net_score())
            .then_with(|| b.created_at.cmp(&a.created_at)),
        SortOrder::Hot => {
            let score_a = hot_score(a.upvotes, a.downvotes, a.created_at);
            let score_b = hot_score(b.upvotes, b.downvotes, b.created_at);
            score_b.total_cmp(&score_a)
        }
        SortOrder::Controversial => {
            let score_a = controversy_score(a.upvotes, a.downvotes);
            let score_b = controversy_score(b.upvotes, b.downvotes);
            score_b
                .total_cmp(&score_a)
                .then_with(|| b.vote_volume().cmp(&a.vote_volume()))
        }
    }
}

/// Rank a thread level and cut the requested page out of it.
pub fn rank_page(mut comments: Vec<Comment>, order: SortOrder, request: PageRequest) -> RankedPage {
    comments.sort_by(|a, b| compare(a, b, order));

    let total = comments.len() as u64;
    let offset = (request.page as usize - 1) * request.limit as usize;
    let items: Vec<Comment> = comments
        .into_iter()
        .skip(offset)
        .take(request.limit as usize)
        .collect();

    RankedPage {
        items,
        pagination: Pagination::new(request, total),
    }
}
