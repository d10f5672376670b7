//! Recommendation pipeline and feedback recording.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use finai_cache::{ttl, CacheKey, ResultCache};

use crate::error::RecommendError;
use crate::profile::{LearningSource, ProfileAggregator};
use crate::ranker::rank;
use crate::scorer::{course_candidate, news_candidate};
use crate::types::{
    Candidate, CourseCandidate, FeedbackEvent, FeedbackType, NewsCandidate, Preferences,
    RankedRecommendationSet,
};

/// Articles older than this are not recommended.
pub const NEWS_WINDOW_DAYS: i64 = 7;
/// Most recent articles considered per request.
pub const NEWS_SCAN_LIMIT: i64 = 100;

/// Candidate items for a user.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Published courses the user has not completed.
    async fn course_candidates(&self, user_id: i64)
        -> Result<Vec<CourseCandidate>, RecommendError>;

    /// Up to `limit` articles published at or after `since`, newest first.
    async fn recent_news(
        &self,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<NewsCandidate>, RecommendError>;
}

pub struct RecommendationService {
    profiles: ProfileAggregator,
    catalog: Arc<dyn CatalogSource>,
    cache: ResultCache,
}

/// Highest-scoring `limit` candidates from one source.
fn top(mut scored: Vec<Candidate>, limit: usize) -> Vec<Candidate> {
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(limit);
    scored
}

impl RecommendationService {
    pub fn new(
        learning: Arc<dyn LearningSource>,
        catalog: Arc<dyn CatalogSource>,
        cache: ResultCache,
    ) -> Self {
        Self {
            profiles: ProfileAggregator::new(learning, cache.clone()),
            catalog,
            cache,
        }
    }

    #[must_use]
    pub fn profiles(&self) -> &ProfileAggregator {
        &self.profiles
    }

    /// Ranked recommendations for `user_id`.
    ///
    /// A cached set is reused only when it was built for the same `limit`
    /// and preferences. Missing courses or news yield fewer items, never an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`RecommendError::InvalidInput`] for a zero `limit`, or
    /// [`RecommendError::Db`] if a source query fails.
    pub async fn get_recommendations(
        &self,
        user_id: i64,
        preferences: &Preferences,
        limit: usize,
    ) -> Result<RankedRecommendationSet, RecommendError> {
        if limit == 0 {
            return Err(RecommendError::InvalidInput(
                "limit must be at least 1".to_owned(),
            ));
        }

        let key = CacheKey::recommendations(user_id);
        let fingerprint = preferences.fingerprint();
        if let Some(cached) = self.cache.get::<RankedRecommendationSet>(&key).await {
            if cached.limit == limit && cached.preferences_fingerprint == fingerprint {
                return Ok(cached);
            }
            tracing::debug!(user_id, "cached recommendations built for other parameters");
        }

        let profile = self.profiles.build(user_id).await?;
        let now = Utc::now();

        let courses = self.catalog.course_candidates(user_id).await?;
        let news = self
            .catalog
            .recent_news(now - Duration::days(NEWS_WINDOW_DAYS), NEWS_SCAN_LIMIT)
            .await?;

        let course_count = courses.len();
        let news_count = news.len();

        let mut candidates = top(
            courses
                .iter()
                .map(|c| course_candidate(c, &profile, preferences, now))
                .collect(),
            limit,
        );
        candidates.extend(top(
            news.iter()
                .map(|n| news_candidate(n, &profile, now))
                .collect(),
            limit,
        ));

        let items = rank(candidates, limit);
        tracing::info!(
            user_id,
            limit,
            course_count,
            news_count,
            returned = items.len(),
            "recommendations ranked"
        );

        let set = RankedRecommendationSet {
            user_id,
            limit,
            preferences_fingerprint: fingerprint,
            items,
            generated_at: now,
        };
        self.cache.set(&key, &set, ttl::RECOMMENDATIONS).await;
        Ok(set)
    }

    /// Store a feedback event and drop the user's cached ranked set so the
    /// next request recomputes.
    ///
    /// # Errors
    ///
    /// Returns [`RecommendError::InvalidInput`] for an empty item id or a
    /// rating outside `[0, 5]`.
    pub async fn record_feedback(
        &self,
        user_id: i64,
        item_id: &str,
        feedback_type: FeedbackType,
        rating: Option<f64>,
    ) -> Result<FeedbackEvent, RecommendError> {
        let item_id = item_id.trim();
        if item_id.is_empty() {
            return Err(RecommendError::InvalidInput(
                "item_id must not be empty".to_owned(),
            ));
        }
        if let Some(r) = rating {
            if !(0.0..=5.0).contains(&r) {
                return Err(RecommendError::InvalidInput(format!(
                    "rating must be between 0 and 5, got {r}"
                )));
            }
        }

        let event = FeedbackEvent {
            user_id,
            item_id: item_id.to_owned(),
            feedback_type,
            rating,
            recorded_at: Utc::now(),
        };
        self.cache
            .set(&CacheKey::feedback(user_id, item_id), &event, ttl::FEEDBACK)
            .await;
        self.cache.delete(&CacheKey::recommendations(user_id)).await;

        tracing::info!(
            user_id,
            item_id,
            feedback = feedback_type.as_str(),
            "feedback recorded"
        );
        Ok(event)
    }
}
