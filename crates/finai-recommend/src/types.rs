use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use finai_cache::Cacheable;
use serde::{Deserialize, Serialize};

use crate::error::RecommendError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    /// `1..=3`, used to measure level distance.
    #[must_use]
    pub fn rank(self) -> i32 {
        match self {
            SkillLevel::Beginner => 1,
            SkillLevel::Intermediate => 2,
            SkillLevel::Advanced => 3,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SkillLevel::Beginner => "beginner",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced => "advanced",
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillLevel {
    type Err = RecommendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(SkillLevel::Beginner),
            "intermediate" => Ok(SkillLevel::Intermediate),
            "advanced" => Ok(SkillLevel::Advanced),
            other => Err(RecommendError::InvalidInput(format!(
                "unknown skill level '{other}'"
            ))),
        }
    }
}

pub const DEFAULT_RISK_PROFILE: &str = "moderate";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: i64,
    pub skill_level: SkillLevel,
    /// At most three, most completed courses first.
    pub preferred_categories: Vec<String>,
    /// Sorted and deduplicated.
    pub interests: Vec<String>,
    pub risk_profile: String,
    pub built_at: DateTime<Utc>,
}

impl UserProfile {
    /// Profile for a user with no record or history.
    #[must_use]
    pub fn default_for(user_id: i64, built_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            skill_level: SkillLevel::Beginner,
            preferred_categories: Vec::new(),
            interests: Vec::new(),
            risk_profile: DEFAULT_RISK_PROFILE.to_owned(),
            built_at,
        }
    }
}

impl Cacheable for UserProfile {
    const KIND: &'static str = "user_profile";
}

/// Per-request preferences supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub preferred_language: Option<String>,
}

impl Preferences {
    /// Stable identity of the preferences, stored next to a cached ranked set.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        format!(
            "lang={}",
            self.preferred_language
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_ascii_lowercase()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Course,
    News,
}

impl ItemType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::Course => "course",
            ItemType::News => "news",
        }
    }
}

/// A published course the user has not completed.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseCandidate {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    /// Raw level; unknown values are treated as beginner when scoring.
    pub level: String,
    pub language: Option<String>,
    pub created_at: DateTime<Utc>,
    pub avg_rating: Option<f64>,
    pub review_count: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewsCandidate {
    pub id: String,
    pub title: String,
    pub summary: Option<String>,
    pub category: String,
    pub sentiment: Option<String>,
    pub published_at: DateTime<Utc>,
}

/// Source attributes carried through to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateAttributes {
    Course {
        description: Option<String>,
        level: String,
        language: Option<String>,
        rating: f64,
        review_count: i64,
    },
    News {
        summary: Option<String>,
        sentiment: Option<String>,
        published_at: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub item_id: String,
    pub item_type: ItemType,
    pub title: String,
    pub category: String,
    /// Always in `[0, 1]`.
    pub score: f64,
    pub reason: String,
    pub attributes: CandidateAttributes,
}

/// Cached output of one recommendation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRecommendationSet {
    pub user_id: i64,
    pub limit: usize,
    pub preferences_fingerprint: String,
    pub items: Vec<Candidate>,
    pub generated_at: DateTime<Utc>,
}

impl Cacheable for RankedRecommendationSet {
    const KIND: &'static str = "ranked_recommendations";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackType {
    Like,
    Dislike,
    View,
    Complete,
}

impl FeedbackType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FeedbackType::Like => "like",
            FeedbackType::Dislike => "dislike",
            FeedbackType::View => "view",
            FeedbackType::Complete => "complete",
        }
    }
}

impl FromStr for FeedbackType {
    type Err = RecommendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "like" => Ok(FeedbackType::Like),
            "dislike" => Ok(FeedbackType::Dislike),
            "view" => Ok(FeedbackType::View),
            "complete" => Ok(FeedbackType::Complete),
            other => Err(RecommendError::InvalidInput(format!(
                "unknown feedback type '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEvent {
    pub user_id: i64,
    pub item_id: String,
    pub feedback_type: FeedbackType,
    pub rating: Option<f64>,
    pub recorded_at: DateTime<Utc>,
}

impl Cacheable for FeedbackEvent {
    const KIND: &'static str = "feedback";
}
