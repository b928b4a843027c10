//! Batch deal simulation with rayon parallelism.
//!
//! Plays N randomized deals through `DealLedger` on a dedicated rayon
//! ThreadPool. Used to audit conservation across many event sequences and as
//! a benchmark workload.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::warn;

use jadepay_engine::{Fan, Seat, SeatFlags, SettlementRule, NUM_PLAYERS};

use crate::ledger::{DealLedger, DealOutcome};

/// Highest fan the simulator declares. Above the cap on purpose so the
/// ceiling gets exercised.
const MAX_SIM_FAN: Fan = 16;

/// Chance that the wall runs out before the next win.
const DRAW_PROBABILITY: f64 = 0.15;

/// Configuration for a batch simulation run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Number of deals to simulate.
    pub num_deals: usize,
    /// Base seed for deterministic simulation. Each deal gets seed + deal_index.
    pub base_seed: Option<u64>,
    /// Number of threads in the rayon pool. None = use rayon default (num CPUs).
    pub num_threads: Option<usize>,
    pub rule: SettlementRule,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            num_deals: 100,
            base_seed: None,
            num_threads: None,
            rule: SettlementRule::default_plain(),
        }
    }
}

/// Result from a single completed deal.
#[derive(Debug, Clone)]
pub struct DealResult {
    pub scores: [i32; NUM_PLAYERS],
    /// Winning seats in order.
    pub winners: Vec<u8>,
    pub outcome: Option<DealOutcome>,
    pub settlements: u32,
    /// Table total after minus before. Zero unless a lossy draw rounding is configured.
    pub total_drift: i64,
    pub seed: Option<u64>,
    /// Set when the ledger rejected an event and the deal stopped early.
    pub error: Option<String>,
}

/// Simulate one deal with random wins and draws until the ledger closes it.
pub fn simulate_single_deal(seed: Option<u64>, rule: SettlementRule) -> DealResult {
    let mut rng = match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::seed_from_u64(rand::rng().random()),
    };
    let mut ledger = DealLedger::new(rule);
    let start_total = ledger.scores().total();
    let mut settlements = 0u32;
    let mut error = None;

    // One event per iteration; a deal never needs more than NUM_PLAYERS.
    while !ledger.is_complete() && settlements < NUM_PLAYERS as u32 {
        let active: Vec<Seat> = ledger.active_seats().collect();

        let applied = if rng.random_bool(DRAW_PROBABILITY) {
            let tenpai = SeatFlags::new(std::array::from_fn(|_| rng.random_bool(0.5)));
            ledger.draw_game(tenpai).map(|_| ())
        } else {
            let winner = active[rng.random_range(0..active.len())];
            let fan = rng.random_range(0..=MAX_SIM_FAN);
            let discarders: Vec<Seat> = active.iter().copied().filter(|&s| s != winner).collect();
            if rng.random_bool(0.5) || discarders.is_empty() {
                ledger.tsumo(winner, fan).map(|_| ())
            } else {
                let discarder = discarders[rng.random_range(0..discarders.len())];
                ledger.ron(winner, discarder, fan).map(|_| ())
            }
        };

        if let Err(err) = applied {
            warn!(?seed, settlements, error = %err, "deal aborted");
            error = Some(err.to_string());
            break;
        }
        settlements += 1;
    }

    DealResult {
        scores: ledger.scores().into_array(),
        winners: ledger.winners().iter().map(|s| s.id()).collect(),
        outcome: ledger.outcome(),
        settlements,
        total_drift: ledger.scores().total() - start_total,
        seed,
        error,
    }
}

/// Parallel batch simulator using a dedicated rayon ThreadPool.
pub struct BatchSimulator {
    pool: rayon::ThreadPool,
}

impl BatchSimulator {
    /// Create a new batch simulator with the given thread count.
    pub fn new(num_threads: Option<usize>) -> anyhow::Result<Self> {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(n) = num_threads {
            builder = builder.num_threads(n);
        }
        let pool = builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build thread pool: {}", e))?;
        Ok(Self { pool })
    }

    /// Run a batch of deals in parallel. Returns results for all deals.
    pub fn run_batch(&self, config: &BatchConfig) -> Vec<DealResult> {
        self.pool.install(|| run_batch_simple(config))
    }
}

/// Convenience: run a batch without constructing a BatchSimulator.
/// Uses rayon's global thread pool.
pub fn run_batch_simple(config: &BatchConfig) -> Vec<DealResult> {
    let base_seed = config.base_seed;
    let rule = config.rule;

    (0..config.num_deals)
        .into_par_iter()
        .map(|i| {
            let seed = base_seed.map(|s| s.wrapping_add(i as u64));
            simulate_single_deal(seed, rule)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_deal_completes() {
        let result = simulate_single_deal(Some(42), SettlementRule::default_plain());
        assert!(result.settlements > 0);
        assert!(result.outcome.is_some(), "deal should be closed");
        assert_eq!(result.error, None);
    }

    #[test]
    fn seeded_deals_are_deterministic() {
        let rule = SettlementRule::default_sichuan();
        let r1 = simulate_single_deal(Some(999), rule);
        let r2 = simulate_single_deal(Some(999), rule);
        assert_eq!(r1.scores, r2.scores);
        assert_eq!(r1.winners, r2.winners);
        assert_eq!(r1.settlements, r2.settlements);
    }

    #[test]
    fn blood_battle_deals_close() {
        for seed in 0..50u64 {
            let r = simulate_single_deal(Some(seed), SettlementRule::default_sichuan());
            match r.outcome {
                Some(DealOutcome::BloodBattleFinished) => assert_eq!(r.winners.len(), 3),
                Some(DealOutcome::Drawn) => assert!(r.winners.len() < 3),
                other => panic!("seed {seed}: unexpected outcome {other:?}"),
            }
            assert_eq!(r.error, None, "seed {seed}");
        }
    }

    #[test]
    fn batch_returns_correct_count() {
        let config = BatchConfig {
            num_deals: 8,
            base_seed: Some(100),
            ..Default::default()
        };
        let results = run_batch_simple(&config);
        assert_eq!(results.len(), 8);
        assert!(results.iter().all(|r| r.total_drift == 0));
        for r in &results {
            assert!(r.outcome.is_some(), "seed {:?} left open: {:?}", r.seed, r.error);
        }
    }

    #[test]
    fn batch_simulator_with_threads() {
        let sim = BatchSimulator::new(Some(2)).unwrap();
        let config = BatchConfig {
            num_deals: 4,
            base_seed: Some(500),
            rule: SettlementRule::default_beijing(),
            ..Default::default()
        };
        let results = sim.run_batch(&config);
        assert_eq!(results.len(), 4);
        for r in &results {
            assert!(r.settlements > 0);
            assert!(r.error.is_none());
            assert!(r.outcome.is_some());
        }
    }
}
