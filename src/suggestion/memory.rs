//! In-memory store
//!
//! Holds the whole data set in vectors and answers the same queries as the
//! Postgres store. Built once through the `with_*`/`record_*` methods, then
//! shared read-only (usually behind an `Arc`).

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

use super::models::{
    Activity, ActivityType, Article, ArticleId, Author, TagId, TagRelation, User, UserId,
    ARTICLE_TARGET_TYPE,
};
use super::store::{SocialGraph, SuggestionStore};
use crate::error::Result;

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    users: Vec<User>,
    articles: Vec<Article>,
    authors: HashMap<ArticleId, Vec<Author>>,
    activities: Vec<Activity>,
    tag_relations: Vec<TagRelation>,
    /// (follower, followee)
    follows: Vec<(UserId, UserId)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, id: UserId, username: &str) -> Self {
        self.users.push(User {
            id,
            username: username.to_string(),
        });
        self
    }

    pub fn with_article(mut self, id: ArticleId, title: &str) -> Self {
        self.articles.push(Article {
            id,
            title: title.to_string(),
            publication_date: None,
        });
        self
    }

    pub fn with_full_article(mut self, article: Article, authors: Vec<Author>) -> Self {
        self.authors.insert(article.id, authors);
        self.articles.push(article);
        self
    }

    pub fn with_follow(mut self, follower: UserId, followee: UserId) -> Self {
        self.follows.push((follower, followee));
        self
    }

    /// Log an activity against an article
    pub fn record_activity(
        mut self,
        user_id: UserId,
        activity_type: ActivityType,
        article_id: ArticleId,
    ) -> Self {
        self.push_activity(user_id, activity_type, ARTICLE_TARGET_TYPE, article_id);
        self
    }

    /// Log an activity against a non-article target
    pub fn record_other_activity(
        mut self,
        user_id: UserId,
        activity_type: ActivityType,
        target_type: i32,
        target_id: i64,
    ) -> Self {
        self.push_activity(user_id, activity_type, target_type, target_id);
        self
    }

    /// Tag an article. Also logs the matching tagging activity.
    pub fn record_tag(mut self, tagger_id: UserId, tag_id: TagId, article_id: ArticleId) -> Self {
        let id = self.tag_relations.len() as i64 + 1;
        self.tag_relations.push(TagRelation {
            id,
            tagger_id,
            tag_id,
            article_id,
        });
        self.push_activity(tagger_id, ActivityType::Tagged, ARTICLE_TARGET_TYPE, article_id);
        self
    }

    fn push_activity(
        &mut self,
        user_id: UserId,
        activity_type: ActivityType,
        target_type: i32,
        target_id: i64,
    ) {
        let id = self.activities.len() as i64 + 1;
        self.activities.push(Activity {
            id,
            user_id,
            activity_type,
            target_type,
            target_id,
        });
    }

    fn article_activities(&self, activity_type: ActivityType) -> impl Iterator<Item = &Activity> {
        self.activities
            .iter()
            .filter(move |a| a.activity_type == activity_type && a.targets_article())
    }
}

/// Keep first occurrences, preserving order
fn distinct<T: Copy + Eq + std::hash::Hash>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    items.into_iter().filter(|item| seen.insert(*item)).collect()
}

#[async_trait]
impl SuggestionStore for MemoryStore {
    async fn find_user(&self, user_id: UserId) -> Result<Option<User>> {
        Ok(self.users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn find_article(&self, article_id: ArticleId) -> Result<Option<Article>> {
        Ok(self.articles.iter().find(|a| a.id == article_id).cloned())
    }

    async fn authors_of(&self, article_id: ArticleId) -> Result<Vec<Author>> {
        Ok(self.authors.get(&article_id).cloned().unwrap_or_default())
    }

    async fn viewed_article_ids(&self, user_id: UserId) -> Result<Vec<ArticleId>> {
        Ok(distinct(
            self.article_activities(ActivityType::Viewed)
                .filter(|a| a.user_id == user_id)
                .map(|a| a.target_id),
        ))
    }

    async fn tag_ids_used_by(&self, user_id: UserId) -> Result<Vec<TagId>> {
        Ok(distinct(
            self.tag_relations
                .iter()
                .filter(|t| t.tagger_id == user_id)
                .map(|t| t.tag_id),
        ))
    }

    async fn article_ids_tagged_with(
        &self,
        tag_ids: &[TagId],
        excluding_tagger: UserId,
    ) -> Result<Vec<ArticleId>> {
        Ok(self
            .tag_relations
            .iter()
            .filter(|t| t.tagger_id != excluding_tagger && tag_ids.contains(&t.tag_id))
            .map(|t| t.article_id)
            .collect())
    }

    async fn activity_target_ids(
        &self,
        user_id: UserId,
        activity_type: ActivityType,
    ) -> Result<Vec<ArticleId>> {
        Ok(self
            .article_activities(activity_type)
            .filter(|a| a.user_id == user_id)
            .map(|a| a.target_id)
            .collect())
    }

    async fn most_viewed_article_id(&self) -> Result<Option<ArticleId>> {
        let mut counts: HashMap<ArticleId, usize> = HashMap::new();
        for activity in self.article_activities(ActivityType::Viewed) {
            *counts.entry(activity.target_id).or_insert(0) += 1;
        }

        Ok(counts
            .into_iter()
            .max_by(|(a_id, a_count), (b_id, b_count)| {
                a_count.cmp(b_count).then_with(|| b_id.cmp(a_id))
            })
            .map(|(id, _)| id))
    }

    async fn latest_tagged_article_id(&self) -> Result<Option<ArticleId>> {
        Ok(self
            .article_activities(ActivityType::Tagged)
            .max_by_key(|a| a.id)
            .map(|a| a.target_id))
    }

    async fn catalog_article_ids(&self) -> Result<Vec<ArticleId>> {
        Ok(self.articles.iter().map(|a| a.id).collect())
    }
}

#[async_trait]
impl SocialGraph for MemoryStore {
    async fn followers(&self, user_id: UserId) -> Result<Vec<UserId>> {
        Ok(distinct(
            self.follows
                .iter()
                .filter(|(_, followee)| *followee == user_id)
                .map(|(follower, _)| *follower),
        ))
    }

    async fn followees(&self, user_id: UserId) -> Result<Vec<UserId>> {
        Ok(distinct(
            self.follows
                .iter()
                .filter(|(follower, _)| *follower == user_id)
                .map(|(_, followee)| *followee),
        ))
    }
}
