//! Walks one blood-battle deal through the ledger and prints the popup lines.
//!
//! Run with `RUST_LOG=debug` to see every settlement logged.

use jadepay_core::ledger::DealLedger;
use jadepay_core::simulator::{BatchConfig, BatchSimulator};
use jadepay_engine::{Seat, SeatFlags, SettlementRule};

const NAMES: [&str; 4] = ["Me", "Fox", "Bear", "Bunny"];

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let seat = |id: u8| Seat::new(id);
    let mut deal = DealLedger::new(SettlementRule::default_sichuan());

    deal.tsumo(seat(2)?, 3)?;
    deal.ron(seat(0)?, seat(1)?, 2)?;
    deal.draw_game(SeatFlags::new([false, true, false, true]))?;

    for (i, record) in deal.history().iter().enumerate() {
        let lines: Vec<String> = record.summary(&NAMES).iter().map(|l| l.to_string()).collect();
        tracing::info!("#{} {}: {}", i + 1, record.event.kind(), lines.join(", "));
    }
    tracing::info!("final scores {:?}", deal.scores().as_array());

    let sim = BatchSimulator::new(None)?;
    let config = BatchConfig {
        num_deals: 10_000,
        base_seed: Some(2024),
        rule: SettlementRule::default_sichuan(),
        ..Default::default()
    };
    let results = sim.run_batch(&config);
    let drifted = results.iter().filter(|r| r.total_drift != 0).count();
    let aborted = results.iter().filter(|r| r.error.is_some()).count();
    tracing::info!(
        "{} deals simulated, {} with non-zero drift, {} aborted",
        results.len(),
        drifted,
        aborted
    );
    Ok(())
}
