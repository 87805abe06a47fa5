//! Comment context: the single content entity a thread is scoped to.

use serde::{Deserialize, Serialize};
use thiserror::Error;
#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Kind of content entity a comment thread can attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ContextKind {
    Anime,
    Manga,
    Chapter,
    Episode,
}

impl ContextKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextKind::Anime => "anime",
            ContextKind::Manga => "manga",
            ContextKind::Chapter => "chapter",
            ContextKind::Episode => "episode",
        }
    }
}

/// Error constructing a comment context.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidContextError {
    /// No context field was supplied.
    #[error("Exactly one of animeId, mangaId, chapterId, episodeId is required")]
    Empty,
    /// More than one context field was supplied.
    #[error("Only one of animeId, mangaId, chapterId, episodeId may be set")]
    Ambiguous,
}

/// The content entity a root comment and all of its descendants are
/// scoped to. Exactly one of the four fields is set; a reply's context
/// must be identical to its parent's, including the three unset fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CommentContext {
    pub anime_id: Option<i64>,
    pub manga_id: Option<i64>,
    pub chapter_id: Option<i64>,
    pub episode_id: Option<i64>,
}

impl CommentContext {
    /// Build a context from the four optional fields, enforcing the
    /// exactly-one invariant.
    pub fn new(
        anime_id: Option<i64>,
        manga_id: Option<i64>,
        chapter_id: Option<i64>,
        episode_id: Option<i64>,
    ) -> Result<Self, InvalidContextError> {
        let set = [anime_id, manga_id, chapter_id, episode_id]
            .iter()
            .filter(|f| f.is_some())
            .count();
        match set {
            0 => Err(InvalidContextError::Empty),
            1 => Ok(Self {
                anime_id,
                manga_id,
                chapter_id,
                episode_id,
            }),
            _ => Err(InvalidContextError::Ambiguous),
        }
    }

    pub fn anime(id: i64) -> Self {
        Self {
            anime_id: Some(id),
            manga_id: None,
            chapter_id: None,
            episode_id: None,
        }
    }

    pub fn manga(id: i64) -> Self {
        Self {
            anime_id: None,
            manga_id: Some(id),
            chapter_id: None,
            episode_id: None,
        }
    }

    pub fn chapter(id: i64) -> Self {
        Self {
            anime_id: None,
            manga_id: None,
            chapter_id: Some(id),
            episode_id: None,
        }
    }

    pub fn episode(id: i64) -> Self {
        Self {
            anime_id: None,
            manga_id: None,
            chapter_id: None,
            episode_id: Some(id),
        }
    }

    /// The kind and id of the single set field.
    pub fn target(&self) -> (ContextKind, i64) {
        if let Some(id) = self.anime_id {
            (ContextKind::Anime, id)
        } else if let Some(id) = self.manga_id {
            (ContextKind::Manga, id)
        } else if let Some(id) = self.chapter_id {
            (ContextKind::Chapter, id)
        } else {
            // Constructor guarantees exactly one field is set.
            (ContextKind::Episode, self.episode_id.unwrap_or_default())
        }
    }

    /// Whether this context is identical to another, all four fields
    /// compared (including the unset ones).
    pub fn matches(&self, other: &CommentContext) -> bool {
        self == other
    }
}
