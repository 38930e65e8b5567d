/// Synthetic-voter harness.
///
/// Drives a full session with a simulated voter whose true preference is
/// ascending card ID, optionally flipping answers at random. Useful for
/// eyeballing comparison counts and how badly noise scrambles the result.
use cardrank_core::{
    CardId, RankingSession, RatingBook, SelectionPolicy, SessionConfig, Vote, VoteOutcome,
};
use chrono::Utc;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::bail;

pub struct SimulationReport {
    pub cards: usize,
    pub noise: f64,
    pub seed: u64,
    pub policy: SelectionPolicy,
    pub total_comparisons: usize,
    pub avg_comparisons: f64,
    pub max_comparisons: usize,
    /// Pairs out of order versus the voter's true preference.
    pub inversions: usize,
    pub leaderboard_top: Vec<(CardId, f64)>,
}

pub fn run(cards: usize, noise: f64, seed: u64, policy: SelectionPolicy) -> SimulationReport {
    let mut rng = SmallRng::seed_from_u64(seed);

    // True preference: lower ID is better. Cards arrive shuffled.
    let mut arrival: Vec<CardId> = (1..=cards as CardId).collect();
    arrival.shuffle(&mut rng);

    let mut session = RankingSession::new(SessionConfig { policy });
    let mut book = RatingBook::new();

    let mut total_comparisons = 0usize;
    let mut max_comparisons = 0usize;

    for &card in &arrival {
        let placed = session.ranking().len();
        let mut asked = 0usize;
        loop {
            match session.advance(card) {
                VoteOutcome::Inserted { .. } => break,
                VoteOutcome::NeedsComparison { opponent } => {
                    asked += 1;
                    let honest = if card < opponent { card } else { opponent };
                    let winner = if rng.random::<f64>() < noise {
                        if honest == card {
                            opponent
                        } else {
                            card
                        }
                    } else {
                        honest
                    };
                    let vote = Vote::new(card, opponent, winner, Utc::now())
                        .unwrap_or_else(|e| bail(e));
                    book.record_outcome(vote.winner(), vote.loser());
                    session.record_vote(vote);
                }
            }
        }
        // The candidate window shrinks with every answer, so this can
        // never exceed the number of already-placed cards.
        assert!(asked <= placed);
        total_comparisons += asked;
        max_comparisons = max_comparisons.max(asked);
    }

    let ranking = session.ranking();
    let mut inversions = 0usize;
    for i in 0..ranking.len() {
        for j in (i + 1)..ranking.len() {
            if ranking[i] > ranking[j] {
                inversions += 1;
            }
        }
    }

    let leaderboard_top = book
        .leaderboard()
        .into_iter()
        .take(5)
        .map(|e| (e.card, e.rating))
        .collect();

    SimulationReport {
        cards,
        noise,
        seed,
        policy,
        total_comparisons,
        avg_comparisons: total_comparisons as f64 / cards as f64,
        max_comparisons,
        inversions,
        leaderboard_top,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consistent_voter_perfect_order() {
        let report = run(50, 0.0, 3, SelectionPolicy::Midpoint);
        assert_eq!(report.inversions, 0);
        assert!(report.max_comparisons <= 49);
        // Midpoint selection behaves like binary search: well under the
        // pairwise-total worst case.
        assert!(report.total_comparisons < 50 * 49 / 2);
    }

    #[test]
    fn test_noisy_voter_still_places_everything() {
        let report = run(40, 0.3, 9, SelectionPolicy::Random);
        assert!(report.max_comparisons <= 39);
        assert!(report.inversions > 0);
    }
}
