/// Initial ELO rating assigned to a card before it has won or lost anything.
/// 1500 is the conventional anchor; ratings drift freely from there.
pub const DEFAULT_ELO_RATING: f64 = 1500.0;

/// Default K-factor for ELO updates. Controls rating volatility: a win
/// against an equal opponent moves both ratings by K/2 = 16 points.
pub const DEFAULT_K_FACTOR: f64 = 32.0;

/// Number of recorded outcomes at which a card's rating confidence
/// saturates at 1.0.
///
/// The leaderboard weights each rating by `min(1, outcomes / 100)` so a
/// card that got lucky in its first handful of comparisons does not jump
/// straight to the top. A hundred outcomes is far past the point where
/// ELO has converged for this K-factor, so established cards are ranked
/// purely by rating.
pub const CONFIDENCE_SATURATION_VOTES: u32 = 100;
