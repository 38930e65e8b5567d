/// ELO rating updates for the global leaderboard.
///
/// Independent of any personal ranking session: every resolved vote also
/// feeds the cross-session leaderboard. Ratings are rounded to whole
/// points (this is a casual leaderboard, not a certified rating system)
/// and never clamped; a long losing streak can go negative.
use std::collections::HashMap;

use log::debug;

use crate::constants::{CONFIDENCE_SATURATION_VOTES, DEFAULT_ELO_RATING, DEFAULT_K_FACTOR};
use crate::types::CardId;

/// Expected score of a card rated `rating` against `opponent_rating`,
/// on the conventional 400-point logistic scale.
pub fn expected_score(rating: f64, opponent_rating: f64) -> f64 {
    1.0 / (1.0 + 10.0_f64.powf((opponent_rating - rating) / 400.0))
}

/// Apply one resolved outcome to a pair of ratings.
///
/// Returns `(new_winner_rating, new_loser_rating)`, each rounded to the
/// nearest whole point. Pure function; the `RatingBook` below is the
/// stateful convenience wrapper.
pub fn rate_pair(winner_rating: f64, loser_rating: f64, k_factor: f64) -> (f64, f64) {
    let e_winner = expected_score(winner_rating, loser_rating);
    let e_loser = expected_score(loser_rating, winner_rating);
    (
        (winner_rating + k_factor * (1.0 - e_winner)).round(),
        (loser_rating + k_factor * (0.0 - e_loser)).round(),
    )
}

/// Rating state for one card.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardRating {
    /// Current ELO rating.
    pub rating: f64,
    /// Number of resolved outcomes this card has been part of.
    pub votes: u32,
}

impl Default for CardRating {
    fn default() -> Self {
        CardRating {
            rating: DEFAULT_ELO_RATING,
            votes: 0,
        }
    }
}

impl CardRating {
    /// Confidence in the rating, ramping linearly from 0 to 1 over the
    /// first `CONFIDENCE_SATURATION_VOTES` outcomes.
    pub fn confidence(&self) -> f64 {
        (f64::from(self.votes) / f64::from(CONFIDENCE_SATURATION_VOTES)).min(1.0)
    }

    /// Confidence-weighted score used for leaderboard ordering. Damps
    /// cards that got a high rating from very few comparisons.
    pub fn ranking_score(&self) -> f64 {
        self.rating * self.confidence()
    }
}

/// One leaderboard row.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LeaderboardEntry {
    pub card: CardId,
    pub rating: f64,
    pub votes: u32,
    pub score: f64,
}

/// Caller-owned rating store for the global leaderboard.
///
/// Cards enter lazily at the default rating on their first recorded
/// outcome. The book is plain owned state; persistence, sharing and
/// write atomicity are the caller's concern.
#[derive(Debug, Clone, Default)]
pub struct RatingBook {
    ratings: HashMap<CardId, CardRating>,
    k_factor: Option<f64>,
}

impl RatingBook {
    pub fn new() -> Self {
        RatingBook::default()
    }

    pub fn with_k_factor(k_factor: f64) -> Self {
        RatingBook {
            ratings: HashMap::new(),
            k_factor: Some(k_factor),
        }
    }

    pub fn k_factor(&self) -> f64 {
        self.k_factor.unwrap_or(DEFAULT_K_FACTOR)
    }

    /// Current rating for a card (default for cards never seen).
    pub fn rating(&self, card: CardId) -> f64 {
        self.ratings
            .get(&card)
            .copied()
            .unwrap_or_default()
            .rating
    }

    pub fn card(&self, card: CardId) -> Option<&CardRating> {
        self.ratings.get(&card)
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// Fold one resolved outcome into both cards' ratings.
    pub fn record_outcome(&mut self, winner: CardId, loser: CardId) {
        let k = self.k_factor();
        let winner_rating = self.rating(winner);
        let loser_rating = self.rating(loser);
        let (new_winner, new_loser) = rate_pair(winner_rating, loser_rating, k);

        debug!(
            "elo: {winner} {winner_rating} -> {new_winner}, {loser} {loser_rating} -> {new_loser}"
        );

        let w = self.ratings.entry(winner).or_default();
        w.rating = new_winner;
        w.votes += 1;

        let l = self.ratings.entry(loser).or_default();
        l.rating = new_loser;
        l.votes += 1;
    }

    /// Rows sorted by confidence-weighted score, best first. Ties break
    /// on card ID so the ordering is deterministic.
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> = self
            .ratings
            .iter()
            .map(|(&card, r)| LeaderboardEntry {
                card,
                rating: r.rating,
                votes: r.votes,
                score: r.ranking_score(),
            })
            .collect();

        entries.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.card.cmp(&b.card))
        });
        entries
    }
}
