//! Point transfers for the three ways a deal can end.
//!
//! Every function here reads the input vector and returns a new one. Win
//! settlements all go through [`settle_win`]; the named variants only choose
//! which seats are excused from paying.

use serde::{Deserialize, Serialize};

use crate::errors::{SettleError, SettleResult};
use crate::rounding::{split, RoundingStrategy};
use crate::types::{Points, ScoreVector, Seat, SeatFlags, TenpaiFlags, WonFlags};

/// Penalty owed per (ready, not-ready) seat pair at an exhaustive draw.
pub const DEFAULT_PENALTY_PER_PAIR: Points = 1000;

// ---------------------------------------------------------------------------
// Win settlement
// ---------------------------------------------------------------------------

/// Which seats are excused from paying a winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayerExemption {
    /// Every other seat pays (self-draw).
    Nobody,
    /// Only the given seat pays (discard win).
    AllBut(Seat),
    /// Seats flagged as already won sit out (blood-battle self-draw).
    AlreadyWon(WonFlags),
}

impl PayerExemption {
    #[inline]
    pub fn exempts(&self, seat: Seat) -> bool {
        match self {
            PayerExemption::Nobody => false,
            PayerExemption::AllBut(payer) => seat != *payer,
            PayerExemption::AlreadyWon(won) => won.is_set(seat),
        }
    }
}

/// Collects `points` from every non-exempt seat other than `winner` and
/// credits the total to `winner`.
pub fn settle_win(
    scores: &ScoreVector,
    winner: Seat,
    points: Points,
    exemption: PayerExemption,
) -> SettleResult<ScoreVector> {
    let mut next = *scores;
    let amount = points as i64;
    let mut collected = 0i64;
    for payer in winner.others().filter(|&s| !exemption.exempts(s)) {
        next.credit(payer, -amount)?;
        collected += amount;
    }
    next.credit(winner, collected)?;
    Ok(next)
}

/// Discard win: the discarder alone pays `points` to the winner.
pub fn settle_ron(
    scores: &ScoreVector,
    winner: Seat,
    discarder: Seat,
    points: Points,
) -> SettleResult<ScoreVector> {
    if winner == discarder {
        return Err(SettleError::precondition(format!(
            "{} cannot win on its own discard",
            winner
        )));
    }
    settle_win(scores, winner, points, PayerExemption::AllBut(discarder))
}

/// Self-draw: each of the three other seats pays `points`.
pub fn settle_tsumo(
    scores: &ScoreVector,
    winner: Seat,
    points: Points,
) -> SettleResult<ScoreVector> {
    settle_win(scores, winner, points, PayerExemption::Nobody)
}

/// Blood-battle discard win. Same transfer as [`settle_ron`].
pub fn settle_sichuan_ron(
    scores: &ScoreVector,
    winner: Seat,
    discarder: Seat,
    points: Points,
) -> SettleResult<ScoreVector> {
    settle_ron(scores, winner, discarder, points)
}

/// Blood-battle self-draw: seats in `has_won` do not pay again.
pub fn settle_sichuan_tsumo(
    scores: &ScoreVector,
    winner: Seat,
    points: Points,
    has_won: &WonFlags,
) -> SettleResult<ScoreVector> {
    settle_win(scores, winner, points, PayerExemption::AlreadyWon(*has_won))
}

// ---------------------------------------------------------------------------
// Drawn game
// ---------------------------------------------------------------------------

/// How the drawn-game pool is sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "amount", rename_all = "snake_case")]
pub enum DrawPenalty {
    /// `amount x ready x not_ready`, so every not-ready seat pays `amount`
    /// to every ready seat.
    PerPair(Points),
    /// A fixed total split among the ready seats and collected from the
    /// not-ready seats.
    FixedPool(Points),
}

impl Default for DrawPenalty {
    fn default() -> Self {
        DrawPenalty::PerPair(DEFAULT_PENALTY_PER_PAIR)
    }
}

impl DrawPenalty {
    pub fn pool(self, ready: usize, not_ready: usize) -> i64 {
        match self {
            DrawPenalty::PerPair(amount) => amount as i64 * ready as i64 * not_ready as i64,
            DrawPenalty::FixedPool(amount) => amount as i64,
        }
    }
}

/// Exhaustive-draw penalty with every seat taking part.
///
/// All-ready and none-ready settle nothing. Otherwise the not-ready seats
/// share the pool evenly as payers and the ready seats share it evenly as
/// receivers. With a per-pair penalty both shares divide exactly.
pub fn settle_draw_game(
    scores: &ScoreVector,
    tenpai: &TenpaiFlags,
    penalty_per_pair: Points,
) -> SettleResult<ScoreVector> {
    settle_draw_game_with(
        scores,
        tenpai,
        DrawPenalty::PerPair(penalty_per_pair),
        RoundingStrategy::Exact,
        &SeatFlags::all(),
    )
}

/// Exhaustive-draw penalty with an explicit pool rule, rounding strategy and
/// participant mask. Seats outside `participants` neither pay nor receive.
pub fn settle_draw_game_with(
    scores: &ScoreVector,
    tenpai: &TenpaiFlags,
    penalty: DrawPenalty,
    rounding: RoundingStrategy,
    participants: &SeatFlags,
) -> SettleResult<ScoreVector> {
    let (ready, not_ready): (Vec<Seat>, Vec<Seat>) =
        participants.seats().partition(|&s| tenpai.is_set(s));

    if ready.is_empty() || not_ready.is_empty() {
        return Ok(*scores);
    }

    let pool = penalty.pool(ready.len(), not_ready.len());
    let received = split(pool, ready.len(), rounding);
    let paid = split(pool, not_ready.len(), rounding);

    let mut next = *scores;
    for (&seat, share) in ready.iter().zip(received) {
        next.credit(seat, share)?;
    }
    for (&seat, share) in not_ready.iter().zip(paid) {
        next.credit(seat, -share)?;
    }
    Ok(next)
}
