//! Weighted feature rules for course and news candidates.
//!
//! Rule maxima add up to more than `1.0`; the final clamp is the
//! normalization.

use chrono::{DateTime, Utc};

use crate::types::{
    Candidate, CandidateAttributes, CourseCandidate, ItemType, NewsCandidate, Preferences,
    SkillLevel, UserProfile,
};

const CATEGORY_MATCH: f64 = 0.30;
const LEVEL_EXACT: f64 = 0.25;
const LEVEL_ONE_ABOVE: f64 = 0.15;
const LEVEL_ONE_BELOW: f64 = 0.10;
const RATING_WEIGHT: f64 = 0.20;
const POPULARITY_CAP: f64 = 0.10;
const COURSE_FRESH: f64 = 0.10;
const COURSE_RECENT: f64 = 0.05;
const LANGUAGE_MATCH: f64 = 0.10;
const HIGHLY_RATED: f64 = 4.0;

const INTEREST_MATCH: f64 = 0.30;
const FINANCE_CATEGORY: f64 = 0.20;
const POSITIVE_NEWS: f64 = 0.10;
const NEUTRAL_NEWS: f64 = 0.05;
const NEWS_FRESH: f64 = 0.20;
const NEWS_RECENT: f64 = 0.10;

/// News categories that earn the finance bonus.
pub const FINANCE_CATEGORIES: &[&str] = &["stocks", "mutual_funds", "trading", "investment"];

const FALLBACK_REASON: &str = "Recommended based on your profile";

fn course_level(course: &CourseCandidate) -> SkillLevel {
    course.level.parse().unwrap_or(SkillLevel::Beginner)
}

fn language_matches(course: &CourseCandidate, preferences: &Preferences) -> bool {
    match (&preferences.preferred_language, &course.language) {
        (Some(wanted), Some(actual)) => wanted.trim().eq_ignore_ascii_case(actual.trim()),
        _ => false,
    }
}

/// Score a course against a profile, in `[0, 1]`.
#[must_use]
pub fn score_course(
    course: &CourseCandidate,
    profile: &UserProfile,
    preferences: &Preferences,
    now: DateTime<Utc>,
) -> f64 {
    let mut score = 0.0;

    if profile.preferred_categories.contains(&course.category) {
        score += CATEGORY_MATCH;
    }

    match course_level(course).rank() - profile.skill_level.rank() {
        0 => score += LEVEL_EXACT,
        1 => score += LEVEL_ONE_ABOVE,
        -1 => score += LEVEL_ONE_BELOW,
        _ => {}
    }

    let rating = course.avg_rating.unwrap_or(0.0).clamp(0.0, 5.0);
    score += (rating / 5.0) * RATING_WEIGHT;

    #[allow(clippy::cast_precision_loss)]
    let popularity = (course.review_count.max(0) as f64 / 100.0).min(POPULARITY_CAP);
    score += popularity;

    let days_old = (now - course.created_at).num_days();
    if days_old < 30 {
        score += COURSE_FRESH;
    } else if days_old < 90 {
        score += COURSE_RECENT;
    }

    if language_matches(course, preferences) {
        score += LANGUAGE_MATCH;
    }

    score.min(1.0)
}

fn join_reasons(reasons: &[String]) -> String {
    if reasons.is_empty() {
        FALLBACK_REASON.to_owned()
    } else {
        format!("Recommended because it {}", reasons.join(" and "))
    }
}

/// Human-readable explanation built from the course rules that fired.
#[must_use]
pub fn course_reason(course: &CourseCandidate, profile: &UserProfile) -> String {
    let mut reasons = Vec::new();
    if profile.preferred_categories.contains(&course.category) {
        reasons.push(format!("matches your interest in {}", course.category));
    }
    if course_level(course) == profile.skill_level {
        reasons.push("is appropriate for your skill level".to_owned());
    }
    if course.avg_rating.is_some_and(|r| r >= HIGHLY_RATED) {
        reasons.push("is highly rated by other users".to_owned());
    }
    join_reasons(&reasons)
}

fn matched_interests<'a>(article: &NewsCandidate, interests: &'a [String]) -> Vec<&'a str> {
    let text = format!(
        "{} {}",
        article.title,
        article.summary.as_deref().unwrap_or_default()
    )
    .to_lowercase();
    interests
        .iter()
        .map(String::as_str)
        .filter(|interest| !interest.trim().is_empty() && text.contains(&interest.to_lowercase()))
        .collect()
}

fn hours_old(article: &NewsCandidate, now: DateTime<Utc>) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let seconds = (now - article.published_at).num_seconds() as f64;
    seconds / 3600.0
}

/// Score a news article against the user's interests, in `[0, 1]`.
///
/// Every matched interest adds its bonus; the sum is only bounded by the
/// final clamp.
#[must_use]
pub fn score_news(article: &NewsCandidate, interests: &[String], now: DateTime<Utc>) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let mut score = matched_interests(article, interests).len() as f64 * INTEREST_MATCH;

    if FINANCE_CATEGORIES.contains(&article.category.as_str()) {
        score += FINANCE_CATEGORY;
    }

    match article.sentiment.as_deref() {
        Some("positive") => score += POSITIVE_NEWS,
        Some("neutral") => score += NEUTRAL_NEWS,
        _ => {}
    }

    let hours = hours_old(article, now);
    if hours < 24.0 {
        score += NEWS_FRESH;
    } else if hours < 72.0 {
        score += NEWS_RECENT;
    }

    score.min(1.0)
}

#[must_use]
pub fn news_reason(article: &NewsCandidate, interests: &[String], now: DateTime<Utc>) -> String {
    let mut reasons = Vec::new();
    let matched = matched_interests(article, interests);
    if !matched.is_empty() {
        reasons.push(format!("mentions your interest in {}", matched.join(", ")));
    }
    if FINANCE_CATEGORIES.contains(&article.category.as_str()) {
        reasons.push(format!("covers {}", article.category));
    }
    if hours_old(article, now) < 24.0 {
        reasons.push("was published in the last day".to_owned());
    }
    join_reasons(&reasons)
}

#[must_use]
pub fn course_candidate(
    course: &CourseCandidate,
    profile: &UserProfile,
    preferences: &Preferences,
    now: DateTime<Utc>,
) -> Candidate {
    Candidate {
        item_id: course.id.clone(),
        item_type: ItemType::Course,
        title: course.title.clone(),
        category: course.category.clone(),
        score: score_course(course, profile, preferences, now),
        reason: course_reason(course, profile),
        attributes: CandidateAttributes::Course {
            description: course.description.clone(),
            level: course.level.clone(),
            language: course.language.clone(),
            rating: course.avg_rating.unwrap_or(0.0),
            review_count: course.review_count,
        },
    }
}

#[must_use]
pub fn news_candidate(
    article: &NewsCandidate,
    profile: &UserProfile,
    now: DateTime<Utc>,
) -> Candidate {
    Candidate {
        item_id: article.id.clone(),
        item_type: ItemType::News,
        title: article.title.clone(),
        category: article.category.clone(),
        score: score_news(article, &profile.interests, now),
        reason: news_reason(article, &profile.interests, now),
        attributes: CandidateAttributes::News {
            summary: article.summary.clone(),
            sentiment: article.sentiment.clone(),
            published_at: article.published_at,
        },
    }
}

#[cfg(test)]
#[path = "scorer_test.rs"]
mod tests;
