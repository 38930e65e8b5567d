/// Core value types for the ranking algorithms.
///
/// Cards are identified by caller-provided `i64` IDs. The crate never
/// generates identifiers; mapping to whatever the caller's store uses
/// (UUIDs, document keys) happens outside.
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Opaque caller-provided card identifier.
pub type CardId = i64;

/// Rejected vote input. Everything else the algorithms encounter
/// (unplaced opponents, exhausted candidate windows, collapsed bounds)
/// is a legitimate state, not an error.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteError {
    #[error("winner {winner} is neither of the compared cards ({subject_a}, {subject_b})")]
    WinnerNotAParticipant {
        subject_a: CardId,
        subject_b: CardId,
        winner: CardId,
    },
    #[error("card {0} cannot be compared against itself")]
    SelfComparison(CardId),
}

/// One resolved pairwise comparison.
///
/// Immutable once constructed; `Vote::new` is the only way in, so every
/// `Vote` in a log satisfies `winner ∈ {subject_a, subject_b}` and
/// `subject_a != subject_b`. The pair is unordered: orientation carries
/// no meaning beyond bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawVote"))]
pub struct Vote {
    subject_a: CardId,
    subject_b: CardId,
    winner: CardId,
    timestamp: DateTime<Utc>,
}

impl Vote {
    /// Validate and construct a vote.
    pub fn new(
        subject_a: CardId,
        subject_b: CardId,
        winner: CardId,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, VoteError> {
        if subject_a == subject_b {
            return Err(VoteError::SelfComparison(subject_a));
        }
        if winner != subject_a && winner != subject_b {
            return Err(VoteError::WinnerNotAParticipant {
                subject_a,
                subject_b,
                winner,
            });
        }
        Ok(Vote {
            subject_a,
            subject_b,
            winner,
            timestamp,
        })
    }

    pub fn subject_a(&self) -> CardId {
        self.subject_a
    }

    pub fn subject_b(&self) -> CardId {
        self.subject_b
    }

    pub fn winner(&self) -> CardId {
        self.winner
    }

    pub fn loser(&self) -> CardId {
        if self.winner == self.subject_a {
            self.subject_b
        } else {
            self.subject_a
        }
    }

    /// When the comparison was resolved. Used by callers for chronological
    /// bookkeeping only; the bounds fold is order-insensitive.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Whether `card` is one of the two compared subjects.
    pub fn involves(&self, card: CardId) -> bool {
        self.subject_a == card || self.subject_b == card
    }

    /// The other subject, if `card` is one of the two.
    pub fn opponent_of(&self, card: CardId) -> Option<CardId> {
        if self.subject_a == card {
            Some(self.subject_b)
        } else if self.subject_b == card {
            Some(self.subject_a)
        } else {
            None
        }
    }

    /// Whether this vote compared exactly the unordered pair `{x, y}`.
    pub fn compares(&self, x: CardId, y: CardId) -> bool {
        (self.subject_a == x && self.subject_b == y)
            || (self.subject_a == y && self.subject_b == x)
    }
}

/// Wire shape for deserialization. Funnels back through `Vote::new` so a
/// hand-edited log can't smuggle in an invalid record.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawVote {
    subject_a: CardId,
    subject_b: CardId,
    winner: CardId,
    timestamp: DateTime<Utc>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawVote> for Vote {
    type Error = VoteError;

    fn try_from(raw: RawVote) -> Result<Self, Self::Error> {
        Vote::new(raw.subject_a, raw.subject_b, raw.winner, raw.timestamp)
    }
}
