/// Ranking insertion: decide whether a card's position is determined,
/// and splice it in if so.
///
/// Pure function over `(target, ranking, votes)`: the decision is
/// re-derived from the full vote history on every call, so calling twice
/// with the same inputs always yields the same answer. That makes
/// retry-after-write-conflict safe for the caller with no extra
/// bookkeeping here.
use crate::bounds::{search_bounds, SearchBounds};
use crate::types::{CardId, Vote};

/// Outcome of an insertion attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Position determined: `ranking` is the new sequence with the target
    /// at `index`. If the target was already present the sequence is
    /// returned unchanged with its existing index (idempotent replay).
    Inserted { ranking: Vec<CardId>, index: usize },
    /// Not enough information yet; the ranking is untouched. `bounds` is
    /// the current search window, for the comparison selector.
    NeedsComparison { bounds: SearchBounds },
}

/// Try to place `target` into `ranking` given the complete vote history.
///
/// An empty ranking takes the target without any comparison. A collapsed
/// interval (including the inverted kind produced by conflicting votes)
/// counts as resolved, inserting at `bounds.start`.
pub fn try_insert(target: CardId, ranking: &[CardId], votes: &[Vote]) -> Placement {
    if let Some(index) = ranking.iter().position(|&c| c == target) {
        return Placement::Inserted {
            ranking: ranking.to_vec(),
            index,
        };
    }

    if ranking.is_empty() {
        return Placement::Inserted {
            ranking: vec![target],
            index: 0,
        };
    }

    let bounds = search_bounds(target, ranking, votes);
    if bounds.is_resolved() {
        Placement::Inserted {
            ranking: spliced(ranking, target, bounds.start),
            index: bounds.start,
        }
    } else {
        Placement::NeedsComparison { bounds }
    }
}

fn spliced(ranking: &[CardId], target: CardId, index: usize) -> Vec<CardId> {
    let mut new_ranking = Vec::with_capacity(ranking.len() + 1);
    new_ranking.extend_from_slice(&ranking[..index]);
    new_ranking.push(target);
    new_ranking.extend_from_slice(&ranking[index..]);
    new_ranking
}
