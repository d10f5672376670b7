//! Personalized recommendations for finai.
//!
//! A [`ProfileAggregator`] condenses learning and trading history into a
//! [`UserProfile`]; course and news candidates are scored against it by
//! [`score_course`] and [`score_news`], and [`rank`] merges them under a
//! per-type diversity cap. [`RecommendationService`] ties the pipeline to the
//! result cache and records feedback.

pub mod error;
pub mod pg;
pub mod profile;
pub mod ranker;
pub mod scorer;
pub mod service;
pub mod types;

pub use error::RecommendError;
pub use pg::PgSources;
pub use profile::{
    interests, preferred_categories, skill_level, CategoryProgress, LearningSource,
    ProfileAggregator, SymbolActivity, UserRecord,
};
pub use ranker::{rank, type_cap};
pub use scorer::{course_candidate, news_candidate, score_course, score_news};
pub use service::{CatalogSource, RecommendationService};
pub use types::{
    Candidate, CandidateAttributes, CourseCandidate, FeedbackEvent, FeedbackType, ItemType,
    NewsCandidate, Preferences, RankedRecommendationSet, SkillLevel, UserProfile,
};
