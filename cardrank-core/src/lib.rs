/// cardrank-core: Pure-computation card ranking.
///
/// Pairwise votes → binary-insertion personal rankings + ELO leaderboard.
/// No IO, no HTTP, no storage — just the algorithms. Bring your own
/// persistence and your own voters.
///
/// Cards are identified by caller-provided `i64` IDs. Every decision is
/// re-derived from the full vote log, so replaying the same log always
/// reproduces the same ranking; safe retries need no extra bookkeeping.
///
/// # Quick start
///
/// ```rust
/// use cardrank_core::{RankingSession, SessionConfig, Vote, VoteOutcome};
/// use chrono::Utc;
///
/// let mut session = RankingSession::new(SessionConfig::default());
///
/// // First liked card goes straight in.
/// assert_eq!(session.advance(100), VoteOutcome::Inserted { index: 0 });
///
/// // The next one needs a comparison against card 100.
/// assert_eq!(
///     session.advance(200),
///     VoteOutcome::NeedsComparison { opponent: 100 }
/// );
///
/// // The user preferred 200; record the vote and advance again.
/// session.record_vote(Vote::new(200, 100, 200, Utc::now()).unwrap());
/// assert_eq!(session.advance(200), VoteOutcome::Inserted { index: 0 });
/// assert_eq!(session.ranking(), &[200, 100]);
/// ```

pub mod bounds;
pub mod constants;
pub mod elo;
pub mod engine;
pub mod insert;
pub mod select;
pub mod types;

// Re-export primary public API at crate root.
pub use bounds::{search_bounds, SearchBounds};
pub use elo::{expected_score, rate_pair, CardRating, LeaderboardEntry, RatingBook};
pub use engine::{RankingSession, SessionConfig, VoteOutcome};
pub use insert::{try_insert, Placement};
pub use select::{next_opponent, next_opponent_filtered, SelectionPolicy};
pub use types::{CardId, Vote, VoteError};
