#[cfg(feature = "python")]
use pyo3::pyclass;
use serde::{Deserialize, Serialize};

/// How a penalty pool is quantized when it does not divide evenly among the
/// seats sharing it.
#[cfg_attr(
    feature = "python",
    pyclass(module = "jadepay._jadepay", eq, eq_int)
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingStrategy {
    /// Each share truncated. Leftover points are never moved.
    Floor = 0,
    /// Each share rounded half-to-even.
    Bankers = 1,
    /// Floored shares plus one extra point per seat, in seat order, until the
    /// shares add back up to the pool.
    #[default]
    Exact = 2,
}

impl RoundingStrategy {
    /// True when the shares always add up to the pool.
    pub fn conserves(self) -> bool {
        matches!(self, RoundingStrategy::Exact)
    }
}

/// Splits a non-negative `total` into `parts` shares.
pub fn split(total: i64, parts: usize, strategy: RoundingStrategy) -> Vec<i64> {
    if parts == 0 {
        return Vec::new();
    }
    let n = parts as i64;
    let q = total / n;
    let r = total % n;

    match strategy {
        RoundingStrategy::Floor => vec![q; parts],
        RoundingStrategy::Bankers => {
            let share = match (2 * r).cmp(&n) {
                std::cmp::Ordering::Greater => q + 1,
                std::cmp::Ordering::Equal if q % 2 != 0 => q + 1,
                _ => q,
            };
            vec![share; parts]
        }
        RoundingStrategy::Exact => (0..n).map(|i| if i < r { q + 1 } else { q }).collect(),
    }
}
