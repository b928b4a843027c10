use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::errors::{SettleError, SettleResult};

/// Seats at the table. Every vector in this crate is indexed by seat.
pub const NUM_PLAYERS: usize = 4;

/// Payment amount derived from a fan tier. Never negative.
pub type Points = u32;

/// Multiplier tier declared by the rule engine. Negative values are accepted
/// and treated like zero.
pub type Fan = i32;

// ---------------------------------------------------------------------------
// Seat newtype
// ---------------------------------------------------------------------------

/// A seat number in the range 0-3. Wraps a `u8` so a seat-indexed write can
/// never land outside the four score slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Seat(u8);

impl Seat {
    pub const ALL: [Seat; NUM_PLAYERS] = [Seat(0), Seat(1), Seat(2), Seat(3)];

    /// Creates a `Seat`, rejecting ids outside 0..4.
    pub fn new(id: u8) -> SettleResult<Self> {
        if (id as usize) < NUM_PLAYERS {
            Ok(Seat(id))
        } else {
            Err(SettleError::precondition(format!(
                "seat index {} out of range 0..{}",
                id, NUM_PLAYERS
            )))
        }
    }

    #[inline]
    pub const fn id(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The three other seats, in seat order.
    pub fn others(self) -> impl Iterator<Item = Seat> {
        Seat::ALL.into_iter().filter(move |&s| s != self)
    }
}

impl TryFrom<u8> for Seat {
    type Error = SettleError;

    fn try_from(id: u8) -> SettleResult<Self> {
        Seat::new(id)
    }
}

impl From<Seat> for u8 {
    fn from(seat: Seat) -> u8 {
        seat.0
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seat {}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ScoreVector
// ---------------------------------------------------------------------------

/// Point balances of the four seats. Settlement functions take this by
/// reference and hand back a fresh vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreVector([i32; NUM_PLAYERS]);

impl ScoreVector {
    pub const fn new(scores: [i32; NUM_PLAYERS]) -> Self {
        Self(scores)
    }

    /// All four seats start from the same balance.
    pub const fn uniform(score: i32) -> Self {
        Self([score; NUM_PLAYERS])
    }

    /// Builds a vector from a caller-owned slice, which must hold exactly four scores.
    pub fn from_slice(scores: &[i32]) -> SettleResult<Self> {
        let arr: [i32; NUM_PLAYERS] = scores.try_into().map_err(|_| {
            SettleError::precondition(format!(
                "score vector must have {} entries, got {}",
                NUM_PLAYERS,
                scores.len()
            ))
        })?;
        Ok(Self(arr))
    }

    #[inline]
    pub fn get(&self, seat: Seat) -> i32 {
        self.0[seat.index()]
    }

    pub fn as_array(&self) -> &[i32; NUM_PLAYERS] {
        &self.0
    }

    pub fn into_array(self) -> [i32; NUM_PLAYERS] {
        self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.0.iter().copied()
    }

    /// Sum of all balances, widened so four extreme balances cannot overflow.
    pub fn total(&self) -> i64 {
        self.0.iter().map(|&s| s as i64).sum()
    }

    /// Per-seat change from `self` to `after`.
    pub fn deltas(&self, after: &ScoreVector) -> [i64; NUM_PLAYERS] {
        std::array::from_fn(|i| after.0[i] as i64 - self.0[i] as i64)
    }

    /// Adds a signed amount to one seat's balance.
    pub(crate) fn credit(&mut self, seat: Seat, amount: i64) -> SettleResult<()> {
        let current = self.0[seat.index()] as i64;
        let next = i32::try_from(current + amount).map_err(|_| {
            SettleError::overflow(format!(
                "{} balance {} cannot absorb {:+}",
                seat, current, amount
            ))
        })?;
        self.0[seat.index()] = next;
        Ok(())
    }
}

impl From<[i32; NUM_PLAYERS]> for ScoreVector {
    fn from(scores: [i32; NUM_PLAYERS]) -> Self {
        Self(scores)
    }
}

impl Index<Seat> for ScoreVector {
    type Output = i32;

    fn index(&self, seat: Seat) -> &i32 {
        &self.0[seat.index()]
    }
}

// ---------------------------------------------------------------------------
// SeatFlags
// ---------------------------------------------------------------------------

/// One boolean per seat: tenpai status at a drawn game, or "already won" in a
/// blood-battle deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatFlags([bool; NUM_PLAYERS]);

/// Ready-hand status of each seat when the wall runs out.
pub type TenpaiFlags = SeatFlags;

/// Seats that have already won in the current blood-battle deal.
pub type WonFlags = SeatFlags;

impl SeatFlags {
    pub const fn new(flags: [bool; NUM_PLAYERS]) -> Self {
        Self(flags)
    }

    pub const fn none() -> Self {
        Self([false; NUM_PLAYERS])
    }

    pub const fn all() -> Self {
        Self([true; NUM_PLAYERS])
    }

    pub fn from_slice(flags: &[bool]) -> SettleResult<Self> {
        let arr: [bool; NUM_PLAYERS] = flags.try_into().map_err(|_| {
            SettleError::precondition(format!(
                "seat flags must have {} entries, got {}",
                NUM_PLAYERS,
                flags.len()
            ))
        })?;
        Ok(Self(arr))
    }

    #[inline]
    pub fn is_set(&self, seat: Seat) -> bool {
        self.0[seat.index()]
    }

    pub fn set(&mut self, seat: Seat, value: bool) {
        self.0[seat.index()] = value;
    }

    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&f| f).count()
    }

    /// Seats whose flag is set, in seat order.
    pub fn seats(&self) -> impl Iterator<Item = Seat> + '_ {
        Seat::ALL.into_iter().filter(|&s| self.is_set(s))
    }

    pub fn as_array(&self) -> &[bool; NUM_PLAYERS] {
        &self.0
    }

    /// Seats set in both `self` and `other`.
    pub fn intersection(&self, other: &SeatFlags) -> Self {
        Self(std::array::from_fn(|i| self.0[i] && other.0[i]))
    }

    /// Flags flipped seat by seat.
    pub fn complement(&self) -> Self {
        Self(self.0.map(|f| !f))
    }
}

impl From<[bool; NUM_PLAYERS]> for SeatFlags {
    fn from(flags: [bool; NUM_PLAYERS]) -> Self {
        Self(flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seat_rejects_out_of_range() {
        assert!(Seat::new(3).is_ok());
        let err = Seat::new(4).unwrap_err();
        assert!(matches!(err, SettleError::PreconditionViolation { .. }));
    }

    #[test]
    fn seat_others_skips_self() {
        let others: Vec<u8> = Seat::ALL[2].others().map(Seat::id).collect();
        assert_eq!(others, vec![0, 1, 3]);
    }

    #[test]
    fn seat_deserialize_checks_range() {
        let ok: Seat = serde_json::from_str("1").unwrap();
        assert_eq!(ok.id(), 1);
        assert!(serde_json::from_str::<Seat>("7").is_err());
    }

    #[test]
    fn score_vector_from_slice_length() {
        assert!(ScoreVector::from_slice(&[1, 2, 3, 4]).is_ok());
        assert!(ScoreVector::from_slice(&[1, 2, 3]).is_err());
        assert!(ScoreVector::from_slice(&[1, 2, 3, 4, 5]).is_err());
    }

    #[test]
    fn score_vector_total_is_widened() {
        let v = ScoreVector::uniform(i32::MAX);
        assert_eq!(v.total(), 4 * i32::MAX as i64);
    }

    #[test]
    fn credit_detects_overflow() {
        let mut v = ScoreVector::new([i32::MAX, 0, 0, 0]);
        let err = v.credit(Seat::ALL[0], 1).unwrap_err();
        assert!(matches!(err, SettleError::Overflow { .. }));
        assert_eq!(v.get(Seat::ALL[0]), i32::MAX, "failed credit leaves balance alone");
    }

    #[test]
    fn seat_flags_count_and_seats() {
        let f = SeatFlags::new([true, false, true, false]);
        assert_eq!(f.count(), 2);
        let seats: Vec<u8> = f.seats().map(Seat::id).collect();
        assert_eq!(seats, vec![0, 2]);
        assert!(SeatFlags::from_slice(&[true]).is_err());
        assert_eq!(f.complement(), SeatFlags::new([false, true, false, true]));
        let g = SeatFlags::new([true, true, false, false]);
        assert_eq!(f.intersection(&g), SeatFlags::new([true, false, false, false]));
    }
}
