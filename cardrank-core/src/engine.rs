/// Session orchestrator: one user's ranking, one vote log.
///
/// The caller performs comparisons externally (asks the user, hits a UI)
/// and feeds resolved votes back; the session decides between "placed"
/// and "ask this comparison next". All decisions are re-derived from the
/// full vote history, so a session rebuilt from the same log lands in
/// the same state. Snapshot-consistency across concurrent writers is the
/// caller's job; the session itself never blocks and never does I/O.
use std::collections::HashSet;

use log::debug;

use crate::insert::{try_insert, Placement};
use crate::select::{next_opponent_filtered, SelectionPolicy};
use crate::types::{CardId, Vote};

/// Configuration for a ranking session.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionConfig {
    pub policy: SelectionPolicy,
}

/// What the caller should do next for a target card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// The card now sits at `index` in the ranking (or already did).
    Inserted { index: usize },
    /// Ask the user to compare the target against `opponent`, record the
    /// resulting vote, then advance again.
    NeedsComparison { opponent: CardId },
}

/// One user's authoritative ranking state.
pub struct RankingSession {
    ranking: Vec<CardId>,
    votes: Vec<Vote>,
    config: SessionConfig,
}

impl RankingSession {
    pub fn new(config: SessionConfig) -> Self {
        RankingSession {
            ranking: Vec::new(),
            votes: Vec::new(),
            config,
        }
    }

    /// Resume a session from a persisted ranking and vote log.
    pub fn with_state(ranking: Vec<CardId>, votes: Vec<Vote>, config: SessionConfig) -> Self {
        let mut seen = HashSet::with_capacity(ranking.len());
        for &card in &ranking {
            assert!(seen.insert(card), "Duplicate card ID in ranking: {}", card);
        }
        RankingSession {
            ranking,
            votes,
            config,
        }
    }

    /// Current ranking, best first.
    pub fn ranking(&self) -> &[CardId] {
        &self.ranking
    }

    /// The append-only vote log.
    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    /// Append a resolved comparison to the log. Validation already
    /// happened at `Vote::new`; duplicates are harmless (the bounds fold
    /// no-ops on them).
    pub fn record_vote(&mut self, vote: Vote) {
        debug!(
            "vote: {} vs {} -> {}",
            vote.subject_a(),
            vote.subject_b(),
            vote.winner()
        );
        self.votes.push(vote);
    }

    /// Decide the next step for `target`: insert it if the vote history
    /// pins its position down, otherwise pick the next comparison.
    pub fn advance(&mut self, target: CardId) -> VoteOutcome {
        self.advance_filtered(target, |_| true)
    }

    /// Scoped variant of [`advance`](Self::advance): only cards passing
    /// `scope` may be offered as opponents (family-restricted
    /// comparisons). An exhausted window places the target at the start
    /// of its bounds.
    pub fn advance_filtered(
        &mut self,
        target: CardId,
        scope: impl Fn(CardId) -> bool,
    ) -> VoteOutcome {
        match try_insert(target, &self.ranking, &self.votes) {
            Placement::Inserted { ranking, index } => {
                debug!("placed card {} at index {}", target, index);
                self.ranking = ranking;
                VoteOutcome::Inserted { index }
            }
            Placement::NeedsComparison { bounds } => {
                let picked = next_opponent_filtered(
                    target,
                    &self.ranking,
                    &self.votes,
                    self.config.policy,
                    scope,
                );
                match picked {
                    Some(opponent) => {
                        debug!(
                            "card {}: window [{}, {}), next opponent {}",
                            target, bounds.start, bounds.end, opponent
                        );
                        VoteOutcome::NeedsComparison { opponent }
                    }
                    None => {
                        // Every comparable card in the window was already
                        // faced; the log has nothing more to say.
                        debug!(
                            "card {}: window exhausted, placing at {}",
                            target, bounds.start
                        );
                        self.ranking.insert(bounds.start, target);
                        VoteOutcome::Inserted {
                            index: bounds.start,
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rand::{rngs::SmallRng, seq::SliceRandom, Rng, SeedableRng};

    fn vote(a: CardId, b: CardId, winner: CardId) -> Vote {
        Vote::new(a, b, winner, Utc::now()).unwrap()
    }

    fn midpoint_session() -> RankingSession {
        RankingSession::new(SessionConfig {
            policy: SelectionPolicy::Midpoint,
        })
    }

    #[test]
    fn test_first_card_inserted_without_comparison() {
        let mut session = midpoint_session();
        assert_eq!(session.advance(7), VoteOutcome::Inserted { index: 0 });
        assert_eq!(session.ranking(), &[7]);
        assert!(session.votes().is_empty());
    }

    #[test]
    fn test_insert_fourth_card_step_by_step() {
        // Ranking [A=1, B=2, C=3], liking D=4.
        let mut session = RankingSession::with_state(
            vec![1, 2, 3],
            Vec::new(),
            SessionConfig {
                policy: SelectionPolicy::Midpoint,
            },
        );

        // Full window [0, 3): midpoint candidate is B.
        assert_eq!(
            session.advance(4),
            VoteOutcome::NeedsComparison { opponent: 2 }
        );

        // D loses to B: window narrows to [2, 3), only C left.
        session.record_vote(vote(4, 2, 2));
        assert_eq!(
            session.advance(4),
            VoteOutcome::NeedsComparison { opponent: 3 }
        );

        // D beats C: bounds collapse at 2.
        session.record_vote(vote(4, 3, 4));
        assert_eq!(session.advance(4), VoteOutcome::Inserted { index: 2 });
        assert_eq!(session.ranking(), &[1, 2, 4, 3]);
    }

    #[test]
    fn test_advance_is_idempotent_after_insertion() {
        let mut session = midpoint_session();
        session.advance(5);
        session.advance(5);
        assert_eq!(session.advance(5), VoteOutcome::Inserted { index: 0 });
        assert_eq!(session.ranking(), &[5]);
    }

    #[test]
    fn test_duplicate_vote_does_not_move_insertion() {
        let mut session = RankingSession::with_state(
            vec![1, 2, 3],
            Vec::new(),
            SessionConfig::default(),
        );
        session.record_vote(vote(4, 2, 2));
        session.record_vote(vote(4, 2, 2));
        session.record_vote(vote(4, 3, 4));
        assert_eq!(session.advance(4), VoteOutcome::Inserted { index: 2 });
        assert_eq!(session.ranking(), &[1, 2, 4, 3]);
    }

    #[test]
    fn test_scoped_advance_places_when_no_family_member_comparable() {
        // Nothing in the ranking shares the target's family: the window
        // exhausts immediately and the card lands at the top of it.
        let mut session = RankingSession::with_state(
            vec![10, 20, 30],
            Vec::new(),
            SessionConfig::default(),
        );
        let outcome = session.advance_filtered(99, |_| false);
        assert_eq!(outcome, VoteOutcome::Inserted { index: 0 });
        assert_eq!(session.ranking(), &[99, 10, 20, 30]);
    }

    #[test]
    fn test_scoped_advance_only_offers_family_members() {
        let mut session = RankingSession::with_state(
            vec![10, 21, 30, 41],
            Vec::new(),
            SessionConfig::default(),
        );
        // Family = odd IDs; candidates [21, 41], midpoint picks 41.
        let outcome = session.advance_filtered(99, |c| c % 2 == 1);
        assert_eq!(outcome, VoteOutcome::NeedsComparison { opponent: 41 });
    }

    #[test]
    #[should_panic(expected = "Duplicate card ID")]
    fn test_duplicate_ranking_rejected() {
        let _ = RankingSession::with_state(vec![1, 2, 1], Vec::new(), SessionConfig::default());
    }

    /// Drive a full session with an oracle voter that prefers lower IDs.
    /// Returns comparisons asked per insertion.
    fn run_oracle_session(
        arrival: &[CardId],
        policy: SelectionPolicy,
        flip: Option<(&mut SmallRng, f64)>,
    ) -> (RankingSession, Vec<usize>) {
        let mut session = RankingSession::new(SessionConfig { policy });
        let mut per_card = Vec::with_capacity(arrival.len());
        let mut flip = flip;

        for &card in arrival {
            let mut asked = 0;
            loop {
                match session.advance(card) {
                    VoteOutcome::Inserted { .. } => break,
                    VoteOutcome::NeedsComparison { opponent } => {
                        asked += 1;
                        let mut winner = if card < opponent { card } else { opponent };
                        if let Some((ref mut rng, p)) = flip {
                            if rng.random::<f64>() < p {
                                winner = if winner == card { opponent } else { card };
                            }
                        }
                        session.record_vote(vote(card, opponent, winner));
                    }
                }
            }
            per_card.push(asked);
        }
        (session, per_card)
    }

    #[test]
    fn test_oracle_session_sorts_and_terminates() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut arrival: Vec<CardId> = (1..=25).collect();
        arrival.shuffle(&mut rng);

        let (session, per_card) = run_oracle_session(&arrival, SelectionPolicy::Midpoint, None);

        // A consistent voter yields the true order.
        let expected: Vec<CardId> = (1..=25).collect();
        assert_eq!(session.ranking(), expected.as_slice());

        // Each insertion asks at most as many comparisons as there were
        // cards already placed.
        for (i, &asked) in per_card.iter().enumerate() {
            assert!(
                asked <= i,
                "insertion {} asked {} comparisons against {} placed cards",
                i,
                asked,
                i
            );
        }
    }

    #[test]
    fn test_random_policy_terminates() {
        // Random opponent choice must still converge within n comparisons
        // per insertion, since the window shrinks with every answer.
        let mut rng = SmallRng::seed_from_u64(7);
        let mut arrival: Vec<CardId> = (1..=15).collect();
        arrival.shuffle(&mut rng);

        let (session, per_card) = run_oracle_session(&arrival, SelectionPolicy::Random, None);
        let expected: Vec<CardId> = (1..=15).collect();
        assert_eq!(session.ranking(), expected.as_slice());
        for (i, &asked) in per_card.iter().enumerate() {
            assert!(asked <= i);
        }
    }

    #[test]
    fn test_noisy_voter_still_terminates_and_stays_unique() {
        // Contradictory answers may collapse bounds early; the session
        // must still place every card exactly once.
        let mut rng = SmallRng::seed_from_u64(1234);
        let mut arrival: Vec<CardId> = (1..=20).collect();
        arrival.shuffle(&mut rng);

        let mut voter_rng = SmallRng::seed_from_u64(99);
        let (session, per_card) =
            run_oracle_session(&arrival, SelectionPolicy::Midpoint, Some((&mut voter_rng, 0.2)));

        assert_eq!(session.ranking().len(), 20);
        let unique: HashSet<CardId> = session.ranking().iter().copied().collect();
        assert_eq!(unique.len(), 20);
        for (i, &asked) in per_card.iter().enumerate() {
            assert!(asked <= i);
        }
    }

    #[test]
    fn test_rebuilt_session_reproduces_state() {
        // Re-deriving from the same log is the core replay guarantee.
        let mut arrival: Vec<CardId> = (1..=10).collect();
        let mut rng = SmallRng::seed_from_u64(5);
        arrival.shuffle(&mut rng);

        let (session, _) = run_oracle_session(&arrival, SelectionPolicy::Midpoint, None);
        let log: Vec<Vote> = session.votes().to_vec();

        let mut rebuilt = RankingSession::with_state(
            Vec::new(),
            log,
            SessionConfig {
                policy: SelectionPolicy::Midpoint,
            },
        );
        for &card in &arrival {
            loop {
                match rebuilt.advance(card) {
                    VoteOutcome::Inserted { .. } => break,
                    VoteOutcome::NeedsComparison { .. } => {
                        panic!("replay should never need new comparisons")
                    }
                }
            }
        }
        assert_eq!(rebuilt.ranking(), session.ranking());
    }
}
