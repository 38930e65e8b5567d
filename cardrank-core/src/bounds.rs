/// Search-bounds calculator: the leaf of the insertion algorithm.
///
/// Folds a vote log into the tightest known `[start, end)` interval for
/// where a not-yet-placed card belongs in a ranking. Every fold step is a
/// `min`/`max` tightening, so the result is independent of vote order and
/// replaying the same log always reproduces the same bounds. That is the
/// correctness property everything else leans on.
use crate::types::{CardId, Vote};

/// Half-open index interval `[start, end)` over a ranking: the target's
/// final position lies somewhere inside, given the votes folded so far.
///
/// Conflicting or duplicate votes can collapse the interval past zero
/// width (`start > end`); that still means "resolved", with insertion at
/// `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchBounds {
    pub start: usize,
    pub end: usize,
}

impl SearchBounds {
    /// The uninformed interval: the whole ranking.
    pub fn full(ranking_len: usize) -> Self {
        SearchBounds {
            start: 0,
            end: ranking_len,
        }
    }

    /// Remaining candidate positions. Saturates at zero when collapsed.
    pub fn width(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the target's position is fully determined.
    pub fn is_resolved(&self) -> bool {
        self.start >= self.end
    }

    /// Fold one vote into the interval.
    ///
    /// Votes not involving `target` are ignored, as are votes against an
    /// opponent that has no position in `ranking` yet (it carries no
    /// positional information until that opponent is placed). A win means
    /// the target outranks the opponent (`end` shrinks to the opponent's
    /// index); a loss means it ranks below (`start` moves past it).
    pub fn tighten(&mut self, target: CardId, ranking: &[CardId], vote: &Vote) {
        let opponent = match vote.opponent_of(target) {
            Some(opponent) => opponent,
            None => return,
        };
        let opponent_index = match ranking.iter().position(|&c| c == opponent) {
            Some(index) => index,
            None => return,
        };

        if vote.winner() == target {
            self.end = self.end.min(opponent_index);
        } else {
            self.start = self.start.max(opponent_index + 1);
        }
    }
}

/// Derive the tightest bounds for `target` from the complete vote history.
pub fn search_bounds(target: CardId, ranking: &[CardId], votes: &[Vote]) -> SearchBounds {
    let mut bounds = SearchBounds::full(ranking.len());
    for vote in votes {
        bounds.tighten(target, ranking, vote);
    }
    bounds
}
