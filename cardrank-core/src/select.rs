/// Comparison selection: which card should the target face next?
///
/// Candidates are the cards sitting inside the current search window,
/// minus any the target has already been compared against. Two policies
/// ship because the original product ran both; `Midpoint` is the default
/// (deterministic, classic binary search), `Random` trades that for an
/// unbiased position distribution within the window.
use rand::Rng;

use crate::bounds::search_bounds;
use crate::types::{CardId, Vote};

/// How to pick among eligible candidates in the search window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectionPolicy {
    /// Middle of the eligible candidates. Deterministic; halves the
    /// window like binary search.
    #[default]
    Midpoint,
    /// Uniformly random among eligible candidates.
    Random,
}

/// Pick the next opponent for `target`, or `None` when no comparison can
/// help any more (resolved bounds, or every card in the window already
/// faced the target). `None` means: insert at `bounds.start`.
pub fn next_opponent(
    target: CardId,
    ranking: &[CardId],
    votes: &[Vote],
    policy: SelectionPolicy,
) -> Option<CardId> {
    next_opponent_filtered(target, ranking, votes, policy, |_| true)
}

/// Scoped variant: `scope` restricts which cards are comparable with the
/// target at all (e.g. only siblings within the same family). The window
/// and already-compared rules apply on top.
pub fn next_opponent_filtered(
    target: CardId,
    ranking: &[CardId],
    votes: &[Vote],
    policy: SelectionPolicy,
    scope: impl Fn(CardId) -> bool,
) -> Option<CardId> {
    let bounds = search_bounds(target, ranking, votes);
    if bounds.is_resolved() {
        return None;
    }

    let candidates: Vec<CardId> = ranking[bounds.start..bounds.end]
        .iter()
        .copied()
        .filter(|&candidate| scope(candidate))
        .filter(|&candidate| !already_compared(target, candidate, votes))
        .collect();

    if candidates.is_empty() {
        return None;
    }

    let picked = match policy {
        SelectionPolicy::Midpoint => candidates[candidates.len() / 2],
        SelectionPolicy::Random => {
            let mut rng = rand::rng();
            candidates[rng.random_range(0..candidates.len())]
        }
    };
    Some(picked)
}

fn already_compared(target: CardId, candidate: CardId, votes: &[Vote]) -> bool {
    votes.iter().any(|v| v.compares(target, candidate))
}
