//! Query layer consumed by the suggestion engine
//!
//! The engine never touches SQL directly. It asks a [`SuggestionStore`] for the
//! handful of lookups each heuristic needs and a [`SocialGraph`] for follow
//! relations, so the same waterfall runs against Postgres or an in-memory fixture.

use async_trait::async_trait;

use super::models::{ActivityType, Article, ArticleId, Author, TagId, User, UserId};
use crate::error::Result;

/// Read-only queries over users, articles, activities and tag relations.
///
/// Every list returned keeps the store's natural order (record id ascending)
/// unless stated otherwise.
#[async_trait]
pub trait SuggestionStore: Send + Sync {
    /// Look up a user by id
    async fn find_user(&self, user_id: UserId) -> Result<Option<User>>;

    /// Look up an article by id
    async fn find_article(&self, article_id: ArticleId) -> Result<Option<Article>>;

    /// Authors credited on an article
    async fn authors_of(&self, article_id: ArticleId) -> Result<Vec<Author>>;

    /// Distinct ids of articles the user has viewed, in order of first view
    async fn viewed_article_ids(&self, user_id: UserId) -> Result<Vec<ArticleId>>;

    /// Distinct ids of tags the user has applied
    async fn tag_ids_used_by(&self, user_id: UserId) -> Result<Vec<TagId>>;

    /// Article ids of tag relations carrying any of `tag_ids`, skipping those made by
    /// `excluding_tagger`. May contain duplicates.
    async fn article_ids_tagged_with(
        &self,
        tag_ids: &[TagId],
        excluding_tagger: UserId,
    ) -> Result<Vec<ArticleId>>;

    /// Article targets of the user's activities of the given type. May contain duplicates.
    async fn activity_target_ids(
        &self,
        user_id: UserId,
        activity_type: ActivityType,
    ) -> Result<Vec<ArticleId>>;

    /// Article with the most view activities; ties go to the lowest article id.
    /// `None` when no article has ever been viewed.
    async fn most_viewed_article_id(&self) -> Result<Option<ArticleId>>;

    /// Target of the most recent tagging activity on an article
    async fn latest_tagged_article_id(&self) -> Result<Option<ArticleId>>;

    /// Every article id in the catalog
    async fn catalog_article_ids(&self) -> Result<Vec<ArticleId>>;
}

/// Follow relations between users
#[async_trait]
pub trait SocialGraph: Send + Sync {
    /// Users following `user_id`
    async fn followers(&self, user_id: UserId) -> Result<Vec<UserId>>;

    /// Users `user_id` follows
    async fn followees(&self, user_id: UserId) -> Result<Vec<UserId>>;
}
