//! Merge scored candidates under a per-type diversity cap.

use std::collections::{HashMap, HashSet};

use crate::types::{Candidate, ItemType};

/// Most items of one type admitted into a set of `limit`: `ceil(limit * 0.6)`.
#[must_use]
pub fn type_cap(limit: usize) -> usize {
    // Split so `limit * 3` cannot overflow.
    limit / 5 * 3 + (limit % 5 * 3).div_ceil(5)
}

/// Rank candidates by score, highest first, keeping equal scores in input
/// order. A candidate is admitted while its type is under [`type_cap`] and
/// its `item_id` has not been seen. The result may be shorter than `limit`
/// when the cap blocks the remaining candidates.
#[must_use]
pub fn rank(mut candidates: Vec<Candidate>, limit: usize) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));

    let cap = type_cap(limit);
    let mut per_type: HashMap<ItemType, usize> = HashMap::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut ranked = Vec::with_capacity(limit.min(candidates.len()));

    for candidate in candidates {
        if ranked.len() >= limit {
            break;
        }
        let count = per_type.entry(candidate.item_type).or_insert(0);
        if *count >= cap || seen.contains(&candidate.item_id) {
            continue;
        }
        *count += 1;
        seen.insert(candidate.item_id.clone());
        ranked.push(candidate);
    }
    ranked
}
