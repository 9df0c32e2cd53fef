//! Postgres store
//!
//! Reads the tables owned by the Wikode web application. The schema is managed
//! there; this crate only issues SELECTs. Integer keys are cast to `bigint` so
//! they decode into `i64` regardless of the column width.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use super::models::{
    ActivityType, Article, ArticleId, Author, TagId, User, UserId, ARTICLE_TARGET_TYPE,
};
use super::store::{SocialGraph, SuggestionStore};
use crate::error::Result;

/// Suggestion queries over the Wikode Postgres database
#[derive(Clone)]
pub struct PgSuggestionStore {
    pool: PgPool,
}

impl PgSuggestionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SuggestionStore for PgSuggestionStore {
    async fn find_user(&self, user_id: UserId) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id::bigint AS id, username
            FROM auth_user
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_article(&self, article_id: ArticleId) -> Result<Option<Article>> {
        let article = sqlx::query_as::<_, Article>(
            r#"
            SELECT id::bigint AS id,
                   "Title" AS title,
                   "PublicationDate" AS publication_date
            FROM "wikodeApp_article"
            WHERE id = $1
            "#,
        )
        .bind(article_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(article)
    }

    async fn authors_of(&self, article_id: ArticleId) -> Result<Vec<Author>> {
        let authors = sqlx::query_as::<_, Author>(
            r#"
            SELECT id::bigint AS id, "Name" AS name
            FROM "wikodeApp_author"
            WHERE article_id = $1
            ORDER BY id
            "#,
        )
        .bind(article_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(authors)
    }

    #[instrument(skip(self))]
    async fn viewed_article_ids(&self, user_id: UserId) -> Result<Vec<ArticleId>> {
        let ids = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT target_id::bigint
            FROM "wikodeApp_activity"
            WHERE user_id = $1 AND activity_type = $2 AND target_type = $3
            GROUP BY target_id
            ORDER BY MIN(id)
            "#,
        )
        .bind(user_id)
        .bind(ActivityType::Viewed.code())
        .bind(ARTICLE_TARGET_TYPE)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn tag_ids_used_by(&self, user_id: UserId) -> Result<Vec<TagId>> {
        let ids = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT tag_id::bigint
            FROM "wikodeApp_tagrelation"
            WHERE tagger_id = $1
            GROUP BY tag_id
            ORDER BY MIN(id)
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    #[instrument(skip(self, tag_ids), fields(tags = tag_ids.len()))]
    async fn article_ids_tagged_with(
        &self,
        tag_ids: &[TagId],
        excluding_tagger: UserId,
    ) -> Result<Vec<ArticleId>> {
        if tag_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT article_id::bigint
            FROM "wikodeApp_tagrelation"
            WHERE tag_id::bigint = ANY($1) AND tagger_id <> $2
            ORDER BY id
            "#,
        )
        .bind(tag_ids)
        .bind(excluding_tagger)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    #[instrument(skip(self))]
    async fn activity_target_ids(
        &self,
        user_id: UserId,
        activity_type: ActivityType,
    ) -> Result<Vec<ArticleId>> {
        let ids = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT target_id::bigint
            FROM "wikodeApp_activity"
            WHERE user_id = $1 AND activity_type = $2 AND target_type = $3
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .bind(activity_type.code())
        .bind(ARTICLE_TARGET_TYPE)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn most_viewed_article_id(&self) -> Result<Option<ArticleId>> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT target_id::bigint
            FROM "wikodeApp_activity"
            WHERE activity_type = $1 AND target_type = $2
            GROUP BY target_id
            ORDER BY COUNT(*) DESC, target_id ASC
            LIMIT 1
            "#,
        )
        .bind(ActivityType::Viewed.code())
        .bind(ARTICLE_TARGET_TYPE)
        .fetch_optional(&self.pool)
        .await?;

        Ok(id)
    }

    async fn latest_tagged_article_id(&self) -> Result<Option<ArticleId>> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT target_id::bigint
            FROM "wikodeApp_activity"
            WHERE activity_type = $1 AND target_type = $2
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(ActivityType::Tagged.code())
        .bind(ARTICLE_TARGET_TYPE)
        .fetch_optional(&self.pool)
        .await?;

        Ok(id)
    }

    async fn catalog_article_ids(&self) -> Result<Vec<ArticleId>> {
        let ids = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT id::bigint FROM "wikodeApp_article" ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }
}

#[async_trait]
impl SocialGraph for PgSuggestionStore {
    async fn followers(&self, user_id: UserId) -> Result<Vec<UserId>> {
        let ids = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT follower_id::bigint
            FROM "wikodeApp_followrelation"
            WHERE followee_id = $1
            GROUP BY follower_id
            ORDER BY MIN(id)
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn followees(&self, user_id: UserId) -> Result<Vec<UserId>> {
        let ids = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT followee_id::bigint
            FROM "wikodeApp_followrelation"
            WHERE follower_id = $1
            GROUP BY followee_id
            ORDER BY MIN(id)
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }
}
