//! Suggestion Engine
//!
//! Builds a short article list for one user by walking a fixed waterfall of
//! heuristics. Every heuristic proposes candidate article ids; candidates the
//! owner already viewed or that are already in the list are dropped, and the
//! walk stops as soon as the list is full.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::metrics::{PerformanceTimer, SuggestionMetrics};
use super::models::{
    ActivityType, Article, ArticleId, ArticleSuggestion, SuggestedArticle, SuggestionSource,
    User, UserId,
};
use super::store::{SocialGraph, SuggestionStore};
use crate::config::SuggestionConfig;
use crate::error::{Error, Result};

/// Runs slower than this are logged as warnings
const SLOW_RUN_THRESHOLD_MS: u64 = 500;

/// Upper bound on the capacity reserved up front for one run
const MAX_PREALLOCATED: usize = 16;

/// Suggestion engine bound to one owner
pub struct SuggestionEngine {
    store: Arc<dyn SuggestionStore>,
    owner: User,
    followers: Vec<UserId>,
    followees: Vec<UserId>,
    config: SuggestionConfig,
}

/// Articles picked so far in one run
struct SuggestionRun {
    limit: usize,
    picked: Vec<SuggestedArticle>,
    seen: HashSet<ArticleId>,
}

impl SuggestionRun {
    fn new(limit: usize) -> Self {
        let capacity = limit.min(MAX_PREALLOCATED);
        Self {
            limit,
            picked: Vec::with_capacity(capacity),
            seen: HashSet::with_capacity(capacity),
        }
    }

    fn len(&self) -> usize {
        self.picked.len()
    }

    fn is_full(&self) -> bool {
        self.picked.len() >= self.limit
    }

    fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.picked.len())
    }

    fn contains(&self, id: ArticleId) -> bool {
        self.seen.contains(&id)
    }

    fn push(&mut self, article: Article, source: SuggestionSource) {
        if self.seen.insert(article.id) {
            self.picked.push(SuggestedArticle { article, source });
        }
    }
}

impl SuggestionEngine {
    /// Resolve the owner and their social graph. Fails with `NotFound` for an unknown user.
    #[instrument(skip(store, graph, config))]
    pub async fn new(
        store: Arc<dyn SuggestionStore>,
        graph: &dyn SocialGraph,
        user_id: UserId,
        config: SuggestionConfig,
    ) -> Result<Self> {
        let owner = store
            .find_user(user_id)
            .await?
            .ok_or_else(|| Error::not_found("user", user_id))?;

        let followers = graph.followers(user_id).await?;
        let followees = graph.followees(user_id).await?;

        debug!(
            "Resolved user {} ({} followers, {} followees)",
            owner.username,
            followers.len(),
            followees.len()
        );

        Ok(Self {
            store,
            owner,
            followers,
            followees,
            config,
        })
    }

    pub fn owner(&self) -> &User {
        &self.owner
    }

    pub fn followers(&self) -> &[UserId] {
        &self.followers
    }

    pub fn followees(&self) -> &[UserId] {
        &self.followees
    }

    /// Produce the suggestion list. Each call starts from an empty list.
    pub async fn suggest(&self) -> Result<Vec<SuggestedArticle>> {
        let timer = PerformanceTimer::new("suggest");
        let mut run = SuggestionRun::new(self.config.limit);
        let mut metrics = SuggestionMetrics::new(self.owner.id, self.config.limit);

        for source in SuggestionSource::ALL {
            if run.is_full() {
                break;
            }

            let before = run.len();
            match source {
                SuggestionSource::OtherTagged => self.add_other_tagged(&mut run).await?,
                SuggestionSource::TaggedByFollowee => {
                    self.add_from_followees(&mut run, ActivityType::Tagged, source)
                        .await?
                }
                SuggestionSource::ViewedByFollowee => {
                    self.add_from_followees(&mut run, ActivityType::Viewed, source)
                        .await?
                }
                SuggestionSource::MostViewed => self.add_most_viewed(&mut run).await?,
                SuggestionSource::RecentlyTagged => self.add_recently_tagged(&mut run).await?,
                SuggestionSource::Random => self.add_random(&mut run).await?,
            }

            let added = run.len() - before;
            debug!(source = %source, added, "Suggestion source consulted");
            metrics.record(source, added);
        }

        metrics.total_duration_ms = timer.elapsed_ms();
        timer.log_if_slow(SLOW_RUN_THRESHOLD_MS);
        metrics.log();

        Ok(run.picked)
    }

    /// Produce the suggestion list as caller-facing records, authors included
    pub async fn suggestion_list(&self) -> Result<Vec<ArticleSuggestion>> {
        let picked = self.suggest().await?;

        let mut suggestions = Vec::with_capacity(picked.len());
        for suggested in picked {
            let authors = self.store.authors_of(suggested.article.id).await?;
            suggestions.push(ArticleSuggestion::new(suggested, authors));
        }

        Ok(suggestions)
    }

    // ---- Heuristics ----

    /// Articles other users tagged with a tag the owner has used
    async fn add_other_tagged(&self, run: &mut SuggestionRun) -> Result<()> {
        let my_tags = self.store.tag_ids_used_by(self.owner.id).await?;
        if my_tags.is_empty() {
            return Ok(());
        }

        let candidates = self
            .store
            .article_ids_tagged_with(&my_tags, self.owner.id)
            .await?;
        self.admit(run, candidates, SuggestionSource::OtherTagged)
            .await
    }

    /// Articles the owner's followees tagged or viewed
    async fn add_from_followees(
        &self,
        run: &mut SuggestionRun,
        activity_type: ActivityType,
        source: SuggestionSource,
    ) -> Result<()> {
        let mut candidates = Vec::new();
        for followee in &self.followees {
            candidates.extend(
                self.store
                    .activity_target_ids(*followee, activity_type)
                    .await?,
            );
        }

        self.admit(run, candidates, source).await
    }

    async fn add_most_viewed(&self, run: &mut SuggestionRun) -> Result<()> {
        let most_viewed = self
            .store
            .most_viewed_article_id()
            .await?
            .ok_or(Error::NoViewActivity)?;

        self.admit(run, vec![most_viewed], SuggestionSource::MostViewed)
            .await
    }

    async fn add_recently_tagged(&self, run: &mut SuggestionRun) -> Result<()> {
        match self.store.latest_tagged_article_id().await? {
            Some(id) => {
                self.admit(run, vec![id], SuggestionSource::RecentlyTagged)
                    .await
            }
            None => Ok(()),
        }
    }

    /// Fill the remaining slots with random unviewed, unselected catalog articles.
    /// Stops short of the limit once the catalog is exhausted.
    async fn add_random(&self, run: &mut SuggestionRun) -> Result<()> {
        let catalog = self.store.catalog_article_ids().await?;
        if catalog.is_empty() {
            return Err(Error::EmptyCatalog);
        }

        let viewed = self.viewed_ids().await?;
        let mut pool: Vec<ArticleId> = catalog
            .into_iter()
            .filter(|id| !viewed.contains(id) && !run.contains(*id))
            .collect();
        // Fixed order in, so a fixed seed gives a fixed pick
        pool.sort_unstable();
        pool.dedup();

        let mut rng = match self.config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        pool.shuffle(&mut rng);
        pool.truncate(run.remaining());

        for id in pool {
            let article = self.load_article(id).await?;
            run.push(article, SuggestionSource::Random);
        }

        Ok(())
    }

    // ---- Helpers ----

    /// Add candidates in order, skipping viewed and already selected articles
    async fn admit(
        &self,
        run: &mut SuggestionRun,
        candidates: Vec<ArticleId>,
        source: SuggestionSource,
    ) -> Result<()> {
        if candidates.is_empty() {
            return Ok(());
        }

        let viewed = self.viewed_ids().await?;
        for id in candidates {
            if run.is_full() {
                break;
            }
            if viewed.contains(&id) || run.contains(id) {
                continue;
            }
            let article = self.load_article(id).await?;
            run.push(article, source);
        }

        Ok(())
    }

    async fn viewed_ids(&self) -> Result<HashSet<ArticleId>> {
        Ok(self
            .store
            .viewed_article_ids(self.owner.id)
            .await?
            .into_iter()
            .collect())
    }

    async fn load_article(&self, id: ArticleId) -> Result<Article> {
        self.store
            .find_article(id)
            .await?
            .ok_or_else(|| Error::not_found("article", id))
    }
}
