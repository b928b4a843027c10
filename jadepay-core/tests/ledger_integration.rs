//! Integration tests for the public ledger API.
//!
//! Drives `DealLedger` the way a game controller would: fan values in,
//! settlement records and popup lines out, events round-tripped through JSON.

use jadepay_core::ledger::{DealLedger, DealOutcome, SettlementRecord};
use jadepay_engine::{
    format_delta, DrawPenalty, RoundingStrategy, ScoreVector, Seat, SeatFlags, SettlementEvent,
    SettlementRule,
};

const NAMES: [&str; 4] = ["Me", "Fox", "Bear", "Bunny"];

fn seat(id: u8) -> Seat {
    Seat::new(id).unwrap()
}

#[test]
fn beijing_table_over_several_deals() {
    let rule = SettlementRule::default_beijing();
    let mut deal = DealLedger::new(rule);

    // Deal 1: seat 2 deals into seat 0's 4-fan hand, ron doubled.
    deal.ron(seat(0), seat(2), 4).unwrap();
    assert_eq!(deal.scores().into_array(), [28_200, 25_000, 21_800, 25_000]);
    assert_eq!(deal.outcome(), Some(DealOutcome::Won));

    // Deal 2: seat 3 self-draws a 1-fan hand.
    let mut deal = deal.next_deal();
    deal.tsumo(seat(3), 1).unwrap();
    assert_eq!(deal.scores().into_array(), [28_000, 24_800, 21_600, 25_600]);

    // Deal 3: exhaustive draw, seats 1 and 3 ready.
    let mut deal = deal.next_deal();
    deal.draw_game(SeatFlags::new([false, true, false, true])).unwrap();
    assert_eq!(deal.scores().into_array(), [26_000, 26_800, 19_600, 27_600]);
    assert_eq!(deal.scores().total(), 100_000);

    let lines = deal.summary(&NAMES).unwrap();
    let rendered: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
    assert_eq!(rendered, vec!["Me -2000", "Fox +2000", "Bear -2000", "Bunny +2000"]);
}

#[test]
fn sichuan_blood_battle_full_deal() {
    let mut deal =
        DealLedger::with_scores(SettlementRule::default_sichuan(), ScoreVector::default());

    deal.ron(seat(2), seat(0), 2).unwrap();
    deal.tsumo(seat(1), 0).unwrap();
    assert!(!deal.is_complete());
    assert_eq!(deal.active_seats().collect::<Vec<_>>(), vec![seat(0), seat(3)]);

    deal.tsumo(seat(3), 1).unwrap();
    // ron 400 from 0 -> 2; tsumo 100 from 0 and 3 -> 1; tsumo 200 from 0 only -> 3
    assert_eq!(deal.scores().into_array(), [-700, 200, 400, 100]);
    assert_eq!(deal.outcome(), Some(DealOutcome::BloodBattleFinished));
    assert_eq!(deal.history().len(), 3);

    let kinds: Vec<&str> = deal.history().iter().map(|r| r.event.kind()).collect();
    assert_eq!(kinds, vec!["sichuan_ron", "sichuan_tsumo", "sichuan_tsumo"]);
}

#[test]
fn controller_events_from_json() {
    let events = r#"[
        {"type": "sichuan_tsumo", "winner": 0, "points": 300,
         "has_won": [false, true, false, true]},
        {"type": "draw_game", "tenpai": [true, true, false, false],
         "penalty": {"kind": "per_pair", "amount": 1000}, "rounding": "floor"}
    ]"#;
    let events: Vec<SettlementEvent> = serde_json::from_str(events).unwrap();

    let scores = ScoreVector::default();
    let after_tsumo = events[0].apply(&scores).unwrap();
    assert_eq!(after_tsumo.into_array(), [300, 0, -300, 0]);

    let scores = ScoreVector::uniform(25_000);
    let after_draw = events[1].apply(&scores).unwrap();
    assert_eq!(after_draw.into_array(), [27_000, 27_000, 23_000, 23_000]);
}

#[test]
fn ledger_applies_raw_events() {
    let mut deal = DealLedger::with_scores(SettlementRule::default_plain(), ScoreVector::default());
    let record = deal
        .apply(SettlementEvent::Tsumo {
            winner: seat(0),
            points: 200,
        })
        .unwrap()
        .clone();
    assert_eq!(record.after.into_array(), [600, -200, -200, -200]);
    assert_eq!(record.deltas().map(format_delta), ["+600", "-200", "-200", "-200"]);
}

#[test]
fn records_serialize_for_audit() {
    let mut deal = DealLedger::with_scores(SettlementRule::default_plain(), ScoreVector::default());
    deal.ron(seat(1), seat(2), 3).unwrap();
    let json = serde_json::to_string(deal.last().unwrap()).unwrap();
    let back: SettlementRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back.before.into_array(), [0, 0, 0, 0]);
    assert_eq!(back.after.into_array(), [0, 800, -800, 0]);
}

#[test]
fn fixed_pool_rule_file() {
    let rule = SettlementRule::from_json(
        r#"{"draw_penalty": {"kind": "fixed_pool", "amount": 1000}, "draw_rounding": "exact"}"#,
    )
    .unwrap();
    assert_eq!(rule.draw_penalty, DrawPenalty::FixedPool(1000));
    assert_eq!(rule.draw_rounding, RoundingStrategy::Exact);

    let mut deal = DealLedger::with_scores(rule, ScoreVector::default());
    deal.draw_game(SeatFlags::new([false, false, false, true])).unwrap();
    assert_eq!(deal.scores().into_array(), [-334, -333, -333, 1000]);
}

#[test]
fn out_of_range_seat_never_reaches_the_ledger() {
    assert!(Seat::new(4).is_err());
    assert!(ScoreVector::from_slice(&[1, 2, 3]).is_err());
}

#[test]
fn blood_battle_raw_events_respect_won_seats() {
    // Plain tsumo on a blood-battle table: seat 1 already won and must not pay.
    let mut deal =
        DealLedger::with_scores(SettlementRule::default_sichuan(), ScoreVector::default());
    deal.tsumo(seat(1), 0).unwrap();
    assert_eq!(deal.scores().into_array(), [-100, 300, -100, -100]);
    let record = deal
        .apply(SettlementEvent::Tsumo {
            winner: seat(0),
            points: 100,
        })
        .unwrap()
        .clone();
    assert_eq!(record.after.into_array(), [100, 300, -200, -200]);
    assert_eq!(record.event.kind(), "sichuan_tsumo");

    // Stale has_won from the caller is replaced by the ledger's own flags.
    let mut deal =
        DealLedger::with_scores(SettlementRule::default_sichuan(), ScoreVector::default());
    deal.tsumo(seat(2), 0).unwrap();
    deal.apply(SettlementEvent::SichuanTsumo {
        winner: seat(3),
        points: 100,
        has_won: SeatFlags::none(),
    })
    .unwrap();
    assert_eq!(deal.scores().into_array(), [-200, -200, 300, 100]);

    // Raw ron becomes the blood-battle variant.
    let mut deal =
        DealLedger::with_scores(SettlementRule::default_sichuan(), ScoreVector::default());
    let record = deal
        .apply(SettlementEvent::Ron {
            winner: seat(0),
            discarder: seat(1),
            points: 400,
        })
        .unwrap();
    assert_eq!(record.event.kind(), "sichuan_ron");
}

#[test]
fn blood_battle_raw_draw_excludes_won_seats() {
    let mut deal =
        DealLedger::with_scores(SettlementRule::default_sichuan(), ScoreVector::default());
    deal.tsumo(seat(0), 0).unwrap();
    assert_eq!(deal.scores().into_array(), [300, -100, -100, -100]);

    // Seat 0 claims tenpai with the default all-seat mask but already won.
    deal.apply(SettlementEvent::draw(SeatFlags::new([true, true, false, false])))
        .unwrap();
    assert_eq!(deal.scores().into_array(), [300, 1900, -1100, -1100]);
    assert_eq!(deal.scores().total(), 0);
}

#[test]
fn standard_table_keeps_raw_events_as_given() {
    let mut deal = DealLedger::with_scores(SettlementRule::default_plain(), ScoreVector::default());
    let record = deal
        .apply(SettlementEvent::draw(SeatFlags::new([true, true, false, false])))
        .unwrap();
    assert_eq!(record.event.kind(), "draw_game");
    assert_eq!(record.after.into_array(), [2000, 2000, -2000, -2000]);
}
