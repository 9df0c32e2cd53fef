//! Data model shared by the stores and the engine

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type UserId = i64;
pub type ArticleId = i64;
pub type TagId = i64;

/// A platform user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub username: String,
}

/// A content item that can be suggested
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub publication_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Author {
    pub id: i64,
    pub name: String,
}

/// Kind of logged interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Viewed,
    Tagged,
}

impl ActivityType {
    /// Numeric code stored in the activity table
    pub fn code(self) -> i32 {
        match self {
            ActivityType::Viewed => 1,
            ActivityType::Tagged => 6,
        }
    }
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityType::Viewed => write!(f, "viewed"),
            ActivityType::Tagged => write!(f, "tagged"),
        }
    }
}

/// `target_type` code of activities whose target is an article
pub const ARTICLE_TARGET_TYPE: i32 = 3;

/// A logged interaction of a user with some entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Monotonic; a higher id is a more recent activity
    pub id: i64,
    pub user_id: UserId,
    pub activity_type: ActivityType,
    pub target_type: i32,
    pub target_id: i64,
}

impl Activity {
    pub fn targets_article(&self) -> bool {
        self.target_type == ARTICLE_TARGET_TYPE
    }
}

/// A tag applied to an article by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRelation {
    pub id: i64,
    pub tagger_id: UserId,
    pub tag_id: TagId,
    pub article_id: ArticleId,
}

/// Heuristic that contributed an article to a suggestion list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionSource {
    /// Tagged by other users with a tag the owner also used
    OtherTagged,
    /// Tagged by someone the owner follows
    TaggedByFollowee,
    /// Viewed by someone the owner follows
    ViewedByFollowee,
    /// Globally most viewed article
    MostViewed,
    /// Target of the latest tagging activity
    RecentlyTagged,
    /// Random pick from the catalog
    Random,
}

impl SuggestionSource {
    /// Waterfall order
    pub const ALL: [SuggestionSource; 6] = [
        SuggestionSource::OtherTagged,
        SuggestionSource::TaggedByFollowee,
        SuggestionSource::ViewedByFollowee,
        SuggestionSource::MostViewed,
        SuggestionSource::RecentlyTagged,
        SuggestionSource::Random,
    ];

    /// Relative confidence in the source, higher is stronger
    pub fn rating(self) -> u8 {
        match self {
            SuggestionSource::OtherTagged => 9,
            SuggestionSource::TaggedByFollowee => 8,
            SuggestionSource::ViewedByFollowee => 6,
            SuggestionSource::MostViewed => 4,
            SuggestionSource::RecentlyTagged => 3,
            SuggestionSource::Random => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SuggestionSource::OtherTagged => "other_tagged",
            SuggestionSource::TaggedByFollowee => "tagged_by_followee",
            SuggestionSource::ViewedByFollowee => "viewed_by_followee",
            SuggestionSource::MostViewed => "most_viewed",
            SuggestionSource::RecentlyTagged => "recently_tagged",
            SuggestionSource::Random => "random",
        }
    }
}

impl std::fmt::Display for SuggestionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An article picked by the engine, before author lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestedArticle {
    pub article: Article,
    pub source: SuggestionSource,
}

/// Lightweight suggestion record handed to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSuggestion {
    pub id: ArticleId,
    pub title: String,
    pub publication_date: Option<NaiveDate>,
    pub authors: Vec<Author>,
    pub source: SuggestionSource,
    pub rating: u8,
}

impl ArticleSuggestion {
    pub fn new(suggested: SuggestedArticle, authors: Vec<Author>) -> Self {
        Self {
            id: suggested.article.id,
            title: suggested.article.title,
            publication_date: suggested.article.publication_date,
            authors,
            source: suggested.source,
            rating: suggested.source.rating(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_codes() {
        assert_eq!(ActivityType::Viewed.code(), 1);
        assert_eq!(ActivityType::Tagged.code(), 6);
    }

    #[test]
    fn test_ratings_decrease_along_waterfall() {
        let ratings: Vec<u8> = SuggestionSource::ALL.iter().map(|s| s.rating()).collect();
        assert_eq!(ratings, vec![9, 8, 6, 4, 3, 1]);
    }

    #[test]
    fn test_suggestion_serializes_source_in_snake_case() {
        let suggestion = ArticleSuggestion::new(
            SuggestedArticle {
                article: Article {
                    id: 5,
                    title: "Protein folding".to_string(),
                    publication_date: NaiveDate::from_ymd_opt(2019, 4, 2),
                },
                source: SuggestionSource::TaggedByFollowee,
            },
            vec![Author {
                id: 1,
                name: "A. Author".to_string(),
            }],
        );

        let json = serde_json::to_value(&suggestion).unwrap();
        assert_eq!(json["source"], "tagged_by_followee");
        assert_eq!(json["rating"], 8);
        assert_eq!(json["publication_date"], "2019-04-02");
        assert_eq!(json["authors"][0]["name"], "A. Author");
    }
}
