//! Profile aggregation from learning and trading history.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use finai_cache::{ttl, CacheKey, ResultCache};

use crate::error::RecommendError;
use crate::types::{SkillLevel, UserProfile, DEFAULT_RISK_PROFILE};

/// Completed courses in one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryProgress {
    pub category: String,
    pub completed_courses: i64,
    /// Mean assessment percentage, `None` when nothing was assessed.
    pub avg_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SymbolActivity {
    pub symbol: String,
    pub trade_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserRecord {
    pub risk_profile: Option<String>,
}

/// Source-of-truth history for one user.
#[async_trait]
pub trait LearningSource: Send + Sync {
    /// `None` when the user does not exist.
    async fn user_record(&self, user_id: i64) -> Result<Option<UserRecord>, RecommendError>;

    /// Per-category progress in first-completion order.
    async fn learning_progress(&self, user_id: i64)
        -> Result<Vec<CategoryProgress>, RecommendError>;

    async fn trading_activity(&self, user_id: i64) -> Result<Vec<SymbolActivity>, RecommendError>;
}

/// Symbol prefix to sector interest.
const SECTOR_PREFIXES: &[(&str, &str)] = &[("BANK", "banking"), ("IT", "technology")];

/// `advanced` at 10+ completed courses averaging 80+, `intermediate` at 5+
/// averaging 70+, otherwise `beginner`. The average is taken over categories
/// that have a score; with no scores at all the level is `beginner`.
#[must_use]
pub fn skill_level(progress: &[CategoryProgress]) -> SkillLevel {
    let total: i64 = progress.iter().map(|p| p.completed_courses).sum();
    let scores: Vec<f64> = progress.iter().filter_map(|p| p.avg_score).collect();
    if scores.is_empty() {
        return SkillLevel::Beginner;
    }
    #[allow(clippy::cast_precision_loss)]
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;

    if total >= 10 && mean >= 80.0 {
        SkillLevel::Advanced
    } else if total >= 5 && mean >= 70.0 {
        SkillLevel::Intermediate
    } else {
        SkillLevel::Beginner
    }
}

/// Top three categories by completed courses. The sort is stable, so ties
/// keep their first-seen order.
#[must_use]
pub fn preferred_categories(progress: &[CategoryProgress]) -> Vec<String> {
    let mut sorted: Vec<&CategoryProgress> = progress.iter().collect();
    sorted.sort_by(|a, b| b.completed_courses.cmp(&a.completed_courses));
    sorted
        .into_iter()
        .take(3)
        .map(|p| p.category.clone())
        .collect()
}

/// Learning categories plus sectors inferred from traded symbols.
#[must_use]
pub fn interests(progress: &[CategoryProgress], trades: &[SymbolActivity]) -> Vec<String> {
    let mut set: BTreeSet<String> = progress.iter().map(|p| p.category.clone()).collect();
    for trade in trades {
        let symbol = trade.symbol.to_ascii_uppercase();
        if let Some((_, sector)) = SECTOR_PREFIXES
            .iter()
            .find(|(prefix, _)| symbol.starts_with(prefix))
        {
            set.insert((*sector).to_owned());
        }
    }
    set.into_iter().collect()
}

#[derive(Clone)]
pub struct ProfileAggregator {
    source: Arc<dyn LearningSource>,
    cache: ResultCache,
}

impl ProfileAggregator {
    pub fn new(source: Arc<dyn LearningSource>, cache: ResultCache) -> Self {
        Self { source, cache }
    }

    /// Cache-first profile build. A freshly built profile is written back
    /// with the profile TTL; history changes are picked up on expiry.
    ///
    /// # Errors
    ///
    /// Returns [`RecommendError`] if the history source fails.
    pub async fn build(&self, user_id: i64) -> Result<UserProfile, RecommendError> {
        let key = CacheKey::profile(user_id);
        if let Some(profile) = self.cache.get::<UserProfile>(&key).await {
            return Ok(profile);
        }

        let profile = match self.source.user_record(user_id).await? {
            None => {
                tracing::debug!(user_id, "unknown user; using default profile");
                UserProfile::default_for(user_id, Utc::now())
            }
            Some(record) => {
                let progress = self.source.learning_progress(user_id).await?;
                let trades = self.source.trading_activity(user_id).await?;
                UserProfile {
                    user_id,
                    skill_level: skill_level(&progress),
                    preferred_categories: preferred_categories(&progress),
                    interests: interests(&progress, &trades),
                    risk_profile: record
                        .risk_profile
                        .filter(|r| !r.trim().is_empty())
                        .unwrap_or_else(|| DEFAULT_RISK_PROFILE.to_owned()),
                    built_at: Utc::now(),
                }
            }
        };

        tracing::debug!(
            user_id,
            skill_level = %profile.skill_level,
            interests = profile.interests.len(),
            "profile built"
        );
        self.cache.set(&key, &profile, ttl::PROFILE).await;
        Ok(profile)
    }
}
